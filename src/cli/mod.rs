// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! CLI module for devops-backup using clap derive.
//!
//! # Command Structure
//!
//! ```text
//! devops-backup [global options] <command>
//! run
//! options
//! version
//! ```

pub mod global;

#[cfg(test)]
mod tests;

use crate::cli::global::GlobalOptions;
use clap::{Parser, Subcommand};

/// Azure DevOps to SharePoint backup job.
#[derive(Debug, Parser)]
#[command(
    name = "devops-backup",
    author,
    version,
    about = "Back up Azure DevOps repositories and wikis to SharePoint",
    long_about = "devops-backup Copyright (C) 2026 Romeo Ahmed\n\
                  This program comes with ABSOLUTELY NO WARRANTY\n\
                  This is free software, and you are welcome to redistribute it\n\
                  under certain conditions; see LICENSE for details.\n\n\
                  Mirrors every repository and wiki of an Azure DevOps\n\
                  organization into a local cache, zips the ones that changed\n\
                  since the last run and uploads them to a SharePoint library.",
    after_help = "CONFIGURATION:\n\n\
                  Settings are read from `devops-backup.toml` in the current\n\
                  directory if present, then from --config, then from the\n\
                  environment (DEVOPS_PAT, DEVOPS_ORGANIZATION_URL, PATH_CLONE,\n\
                  PATH_ARCHIVE, SHAREPOINT_URL, SHAREPOINT_DIR,\n\
                  SHAREPOINT_CLIENT_ID, SHAREPOINT_CLIENT_SECRET,\n\
                  SHAREPOINT_CHUNK_SIZE). Use `devops-backup options` to see\n\
                  the resolved values.\n\n\
                  EXIT STATUS:\n\n\
                  0 when every repository synced, 1 when any item failed or\n\
                  the run aborted."
)]
pub struct Cli {
    /// Global options shared by all commands
    #[command(flatten)]
    pub global: GlobalOptions,

    /// Command to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// Available commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Runs the backup: sync, archive changes, upload, clean.
    Run,

    /// Lists all options and their resolved values.
    Options,

    /// Shows the version.
    #[command(visible_alias = "-v")]
    Version,
}

/// Parses command-line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
