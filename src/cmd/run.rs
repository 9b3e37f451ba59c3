// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! The `run` command: wire the real collaborators into the pipeline.
//!
//! ```text
//! which git ──► DevOpsClient ─┐
//!               GitMirror    ─┤
//!               ZipArchiver  ─┼──► Pipeline::run() ──► RunStatus
//!               SharePoint   ─┘
//! ```

use anyhow::Context;
use std::path::PathBuf;
use tracing::{info, warn};

use crate::archive::ZipArchiver;
use crate::backup::{Pipeline, RunStatus};
use crate::config::Config;
use crate::devops::DevOpsClient;
use crate::error::{ProcessError, Result};
use crate::git::{GitCredentials, GitMirror};
use crate::sharepoint::SharePointClient;

/// Locate the `git` executable.
///
/// # Errors
///
/// Returns `ProcessError::ExecutableNotFound` if `git` is not in `PATH`.
pub fn find_git() -> std::result::Result<PathBuf, ProcessError> {
    which::which("git").map_err(|_| ProcessError::ExecutableNotFound {
        name: "git".to_string(),
    })
}

/// Run one backup pass.
///
/// # Errors
///
/// Returns an error if `git` is missing, a client cannot be built, or the
/// pipeline fails fatally (enumeration, archiving, upload). Per-item sync
/// failures are reported through the returned status instead.
pub async fn run_backup_command(config: &Config) -> Result<RunStatus> {
    let git = find_git()?;
    info!(git = %git.display(), "Using git");

    let catalog = DevOpsClient::new(
        &config.devops.organization_url,
        config.devops.pat.as_str(),
        config.devops.api_version.as_str(),
    )
    .context("failed to create Azure DevOps client")?;
    let mirror = GitMirror::new(GitCredentials::from_pat(&config.devops.pat));
    let uploader =
        SharePointClient::new(&config.sharepoint).context("failed to create SharePoint client")?;

    let pipeline = Pipeline::builder()
        .catalog(catalog)
        .mirror(mirror)
        .archiver(ZipArchiver::new())
        .uploader(uploader)
        .clone_root(config.paths.clone.clone())
        .archive_root(config.paths.archive.clone())
        .remote_root(config.sharepoint.dir.clone())
        .build();

    let report = pipeline.run().await.context("backup run failed")?;
    let status = report.status();
    if let RunStatus::PartialFailure { failed } = status {
        for item in report.sync.failures() {
            warn!(item = %item.key, "Not backed up this run");
        }
        warn!(failed, "Backup finished with failures");
    }
    Ok(status)
}
