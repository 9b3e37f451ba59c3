// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Entry point.
//!
//! ```text
//! cli::parse() --> Logging --> Config --> Command Dispatch
//!   Run | Options | Version
//! ```

use std::process::ExitCode;

use devops_backup::backup::RunStatus;
use devops_backup::cli::global::GlobalOptions;
use devops_backup::cli::{self, Command};
use devops_backup::cmd::options::run_options_command;
use devops_backup::cmd::run::run_backup_command;
use devops_backup::config::Config;
use devops_backup::config::loader::ConfigLoader;
use devops_backup::logging::init_logging;
use tracing::error;

use mimalloc::MiMalloc;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse();

    let _log_guard = match init_logging(&cli.global.log_config()) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Failed to initialize logging: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    dispatch_command(&cli).await
}

async fn dispatch_command(cli: &cli::Cli) -> ExitCode {
    let result = match cli.command {
        Some(Command::Version) => {
            handle_version_command();
            Ok(RunStatus::Success)
        }
        Some(Command::Options) => load_config(&cli.global).map(|config| {
            run_options_command(&config);
            RunStatus::Success
        }),
        Some(Command::Run) => match load_config(&cli.global) {
            Ok(config) => run_backup_command(&config).await,
            Err(e) => Err(e),
        },
        None => {
            eprintln!("No command specified. Use --help for usage information.");
            Err(anyhow::anyhow!("No command specified"))
        }
    };

    match result {
        Ok(status) => ExitCode::from(status.exit_code()),
        Err(e) => {
            error!("Backup aborted: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn handle_version_command() {
    println!("{}", env!("CARGO_PKG_VERSION"));
}

fn build_config_loader(global: &GlobalOptions) -> ConfigLoader {
    let mut loader = ConfigLoader::new().add_toml_file_optional("devops-backup.toml");
    if let Some(path) = &global.config {
        loader = loader.add_toml_file(path);
    }
    loader
}

fn load_config(global: &GlobalOptions) -> devops_backup::error::Result<Config> {
    build_config_loader(global).build()
}
