// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup orchestration.
//!
//! # Phases
//!
//! ```text
//! sync_data()        catalog --> mirror.sync() per item --> SyncReport
//!                    (item errors are recorded, never propagated)
//!      |
//! archive_changes()  ChangeSet empty? --> stop
//!                    else create_archive() per key (errors are fatal)
//!      |
//! upload_changes()   discover() --> ensure_folder() per dir
//!                               --> upload_file() per file
//!                    clean() exactly once, whatever happened above
//! ```
//!
//! Every step is awaited before the next starts; nothing is spawned.

use bon::Builder;
use std::path::PathBuf;
use tracing::{debug, error, info, warn};

use super::traits::{ArchiveStore, MirrorSync, RemoteCatalog, RemoteUploader};
use super::types::{
    ArchivePaths, ChangeKey, ChangeSet, ItemOutcome, ItemReport, RepoItem, RepoKind, RunReport,
    SyncReport,
};
use crate::error::BackupResult;

/// The backup job, generic over its collaborators.
#[derive(Builder)]
pub struct Pipeline<C, M, A, U> {
    catalog: C,
    mirror: M,
    archiver: A,
    uploader: U,
    /// Root of the persistent mirror cache.
    #[builder(into)]
    clone_root: PathBuf,
    /// Root of the ephemeral zip staging tree.
    #[builder(into)]
    archive_root: PathBuf,
    /// Remote folder that mirrors the staging tree.
    #[builder(into)]
    remote_root: String,
}

impl<C, M, A, U> Pipeline<C, M, A, U>
where
    C: RemoteCatalog,
    M: MirrorSync,
    A: ArchiveStore,
    U: RemoteUploader,
{
    /// Run every phase and summarize.
    ///
    /// # Errors
    ///
    /// Returns an error if enumeration, archiving, or uploading fails.
    /// Individual sync failures are reported in the `RunReport` instead.
    pub async fn run(&self) -> BackupResult<RunReport> {
        let sync = self.sync_data().await?;
        let changes = sync.change_set();
        let archived = self.archive_changes(&changes)?;
        let uploaded = self.upload_changes().await?;

        let report = RunReport {
            sync,
            archived,
            uploaded,
        };
        info!(
            items = report.sync.items().len(),
            changed = changes.len(),
            archived = report.archived,
            uploaded = report.uploaded,
            "Backup run finished"
        );
        Ok(report)
    }

    /// Mirror every repository and wiki of every project.
    ///
    /// # Errors
    ///
    /// Returns an error only if listing projects, repositories or wikis fails.
    pub async fn sync_data(&self) -> BackupResult<SyncReport> {
        let mut report = SyncReport::default();
        let projects = self.catalog.list_projects().await?;
        info!(count = projects.len(), "Found projects");

        for project in &projects {
            let repos = self.catalog.list_repos(project).await?;
            debug!(project = %project, count = repos.len(), "Syncing repositories");
            for item in &repos {
                report.push(self.sync_item(project, RepoKind::Git, item));
            }

            let wikis = self.catalog.list_wikis(project).await?;
            debug!(project = %project, count = wikis.len(), "Syncing wikis");
            for item in &wikis {
                report.push(self.sync_item(project, RepoKind::Wiki, item));
            }
        }

        Ok(report)
    }

    fn sync_item(&self, project: &str, kind: RepoKind, item: &RepoItem) -> ItemReport {
        let key = ChangeKey::new(project, kind, item.name.as_str());
        let path = key.mirror_path(&self.clone_root);

        let outcome = match self.mirror.sync(&item.remote_url, &path) {
            Ok(true) => {
                info!(project, %kind, name = %item.name, "Repository changed");
                ItemOutcome::Changed
            }
            Ok(false) => {
                debug!(project, %kind, name = %item.name, "Repository up to date");
                ItemOutcome::Unchanged
            }
            Err(e) => {
                error!(
                    project,
                    %kind,
                    name = %item.name,
                    path = %path.display(),
                    error = %e,
                    "Repository sync failed"
                );
                ItemOutcome::Failed(e.to_string())
            }
        };

        ItemReport { key, outcome }
    }

    /// Zip the mirror of every changed key into the staging tree.
    ///
    /// Returns the number of archives written.
    ///
    /// # Errors
    ///
    /// Returns the first archive error; remaining keys are not archived.
    pub fn archive_changes(&self, changes: &ChangeSet) -> BackupResult<usize> {
        if changes.is_empty() {
            info!("No changes detected");
            return Ok(0);
        }

        for key in changes {
            let source = key.mirror_path(&self.clone_root);
            let archive = key.archive_path(&self.archive_root);
            info!(key = %key, path = %archive.display(), "Archiving");
            self.archiver.create_archive(&source, &archive)?;
        }

        Ok(changes.len())
    }

    /// Upload the staging tree, then clear it.
    ///
    /// Returns the number of files uploaded.
    ///
    /// # Errors
    ///
    /// Returns the first discovery, folder or upload error. A cleanup error is
    /// returned only when everything before it succeeded.
    pub async fn upload_changes(&self) -> BackupResult<usize> {
        let uploaded = self.upload_staged().await;
        let cleaned = self.archiver.clean(&self.archive_root);

        match (uploaded, cleaned) {
            (Ok(count), Ok(())) => Ok(count),
            (Ok(_), Err(e)) => Err(e),
            (Err(e), Ok(())) => Err(e),
            (Err(e), Err(clean_err)) => {
                warn!(
                    path = %self.archive_root.display(),
                    error = %clean_err,
                    "Staging cleanup failed after upload error"
                );
                Err(e)
            }
        }
    }

    async fn upload_staged(&self) -> BackupResult<usize> {
        let ArchivePaths { dirs, files } = self.archiver.discover(&self.archive_root)?;
        if files.is_empty() {
            debug!(path = %self.archive_root.display(), "Nothing staged for upload");
            return Ok(0);
        }

        for dir in &dirs {
            debug!(root = %self.remote_root, dir = %dir, "Ensuring remote folder");
            self.uploader.ensure_folder(&self.remote_root, dir).await?;
        }

        for file in &files {
            info!(
                dir = %file.relative_dir,
                path = %file.path.display(),
                "Uploading"
            );
            self.uploader
                .upload_file(&self.remote_root, &file.relative_dir, &file.path)
                .await?;
        }

        Ok(files.len())
    }
}
