// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Collaborator seams of the pipeline.
//!
//! ```text
//! RemoteCatalog  (async) --> devops::DevOpsClient
//! MirrorSync             --> git::GitMirror
//! ArchiveStore           --> archive::ZipArchiver
//! RemoteUploader (async) --> sharepoint::SharePointClient
//! ```

use async_trait::async_trait;
use std::collections::BTreeSet;
use std::path::Path;

use super::types::{ArchivePaths, RepoItem};
use crate::error::BackupResult;

/// Lists what exists in the organization.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteCatalog: Send + Sync {
    /// Names of every project, across all pages.
    ///
    /// # Errors
    ///
    /// Returns an error if any page request fails.
    async fn list_projects(&self) -> BackupResult<BTreeSet<String>>;

    /// Code repositories of a project.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails.
    async fn list_repos(&self, project: &str) -> BackupResult<Vec<RepoItem>>;

    /// Wiki repositories of a project, resolved to their clone URLs.
    ///
    /// # Errors
    ///
    /// Returns an error if the wiki list or a repository lookup fails.
    async fn list_wikis(&self, project: &str) -> BackupResult<Vec<RepoItem>>;
}

/// Keeps a local mirror in step with its remote.
#[cfg_attr(test, mockall::automock)]
pub trait MirrorSync {
    /// Clone or fetch `remote_url` into `local_path`.
    ///
    /// Returns whether any new data arrived. A fresh clone always counts.
    ///
    /// # Errors
    ///
    /// Returns an error if the clone or fetch fails.
    fn sync(&self, remote_url: &str, local_path: &Path) -> BackupResult<bool>;
}

/// Creates, finds and clears staged archives.
#[cfg_attr(test, mockall::automock)]
pub trait ArchiveStore {
    /// Zip the tree under `source_dir` into `archive_path`.
    ///
    /// # Errors
    ///
    /// Returns an error if the source is missing or the zip cannot be written.
    fn create_archive(&self, source_dir: &Path, archive_path: &Path) -> BackupResult<()>;

    /// Collect staged files and the relative directories holding them.
    ///
    /// # Errors
    ///
    /// Returns an error if the staging tree cannot be walked.
    fn discover(&self, staging_root: &Path) -> BackupResult<ArchivePaths>;

    /// Remove the staging tree if it exists.
    ///
    /// # Errors
    ///
    /// Returns an error if the tree exists but cannot be removed.
    fn clean(&self, staging_root: &Path) -> BackupResult<()>;
}

/// Pushes staged archives to remote storage.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RemoteUploader: Send + Sync {
    /// Make sure `{root_dir}/{relative_dir}` exists, creating every segment.
    ///
    /// # Errors
    ///
    /// Returns an error if a folder cannot be created.
    async fn ensure_folder(&self, root_dir: &str, relative_dir: &str) -> BackupResult<()>;

    /// Upload `file` into `{root_dir}/{relative_dir}`, replacing any file of
    /// the same name.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or the upload fails.
    async fn upload_file(&self, root_dir: &str, relative_dir: &str, file: &Path)
    -> BackupResult<()>;
}
