// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Mirror synchronization with change detection.
//!
//! ```text
//! sync(url, path)
//!   path is not a dir ──> clone --mirror ──> changed
//!   path is a repo    ──> snapshot ─> fetch --prune ─> snapshot
//!                         ─> remote update --prune
//!                         ─> changed iff snapshots differ
//! ```

use std::path::Path;
use tracing::{debug, info};

use super::backend::{GixBackend, MirrorMutation, MirrorQuery, RefSnapshot, ShellBackend};
use super::credentials::GitCredentials;
use crate::backup::MirrorSync;
use crate::error::{BackupResult, GitError};

/// Bare mirror cache backed by the git CLI and gix.
#[derive(Debug, Clone, Default)]
pub struct GitMirror {
    credentials: Option<GitCredentials>,
}

impl GitMirror {
    /// A mirror that sends `credentials` with every clone and fetch.
    #[must_use]
    pub const fn new(credentials: GitCredentials) -> Self {
        Self {
            credentials: Some(credentials),
        }
    }

    /// A mirror that relies on git's own credential setup.
    #[must_use]
    pub const fn anonymous() -> Self {
        Self { credentials: None }
    }

    fn update(&self, local_path: &Path) -> BackupResult<bool> {
        if !GixBackend::is_repository(local_path) {
            return Err(GitError::NotAMirror {
                path: local_path.display().to_string(),
            }
            .into());
        }

        let credentials = self.credentials.as_ref();
        let before = GixBackend::ref_snapshot(local_path)?;
        ShellBackend::fetch_prune(local_path, credentials)?;
        let after = GixBackend::ref_snapshot(local_path)?;
        ShellBackend::remote_update_prune(local_path, credentials)?;

        let changed = changed_refs(&before, &after);
        debug!(path = %local_path.display(), changed, "Fetched mirror");
        Ok(changed > 0)
    }
}

impl MirrorSync for GitMirror {
    fn sync(&self, remote_url: &str, local_path: &Path) -> BackupResult<bool> {
        if local_path.is_dir() {
            return self.update(local_path);
        }

        info!(url = remote_url, path = %local_path.display(), "Cloning mirror");
        ShellBackend::clone_mirror(remote_url, local_path, self.credentials.as_ref())?;
        Ok(true)
    }
}

/// Count refs that were created, moved or removed between two snapshots.
#[must_use]
pub fn changed_refs(before: &RefSnapshot, after: &RefSnapshot) -> usize {
    let moved_or_created = after
        .iter()
        .filter(|(name, target)| before.get(*name) != Some(*target))
        .count();
    let removed = before.keys().filter(|name| !after.contains_key(*name)).count();
    moved_or_created + removed
}
