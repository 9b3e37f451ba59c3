// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup pipeline: domain types, collaborator traits and the orchestrator.
//!
//! # Architecture
//!
//! ```text
//! Pipeline<C, M, A, U>
//!   ├── C: RemoteCatalog   list projects / repos / wikis
//!   ├── M: MirrorSync      clone or fetch one mirror, report change
//!   ├── A: ArchiveStore    zip, discover, clean the staging tree
//!   └── U: RemoteUploader  ensure folders, upload files
//! ```

pub mod pipeline;
pub mod traits;
pub mod types;

#[cfg(test)]
mod tests;

pub use pipeline::Pipeline;
pub use traits::{ArchiveStore, MirrorSync, RemoteCatalog, RemoteUploader};
pub use types::{
    ArchiveFile, ArchivePaths, ChangeKey, ChangeSet, ItemOutcome, ItemReport, RepoItem, RepoKind,
    RunReport, RunStatus, SyncReport,
};
