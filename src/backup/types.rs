// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Backup domain types.
//!
//! ```text
//! RepoItem  --sync-->  ItemReport { ChangeKey, ItemOutcome }
//!                             |
//!                        SyncReport --> ChangeSet (Changed keys only)
//!                             |
//!                        RunReport  --> RunStatus --> exit code
//! ```

use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};

/// Which namespace a mirrored repository belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RepoKind {
    /// A project's code repository.
    Git,
    /// The repository backing a project or code wiki.
    Wiki,
}

impl RepoKind {
    /// Path segment used on disk and in SharePoint.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Git => "git",
            Self::Wiki => "wiki",
        }
    }
}

impl fmt::Display for RepoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A repository to mirror, normalized from either the git or the wiki API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoItem {
    pub name: String,
    pub remote_url: String,
}

impl RepoItem {
    #[must_use]
    pub fn new(name: impl Into<String>, remote_url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            remote_url: remote_url.into(),
        }
    }
}

/// Unit of change tracking: `{project}/{kind}/{name}`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ChangeKey {
    project: String,
    kind: RepoKind,
    name: String,
}

impl ChangeKey {
    #[must_use]
    pub fn new(project: impl Into<String>, kind: RepoKind, name: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            kind,
            name: name.into(),
        }
    }

    #[must_use]
    pub fn project(&self) -> &str {
        &self.project
    }

    #[must_use]
    pub const fn kind(&self) -> RepoKind {
        self.kind
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `{project}/{kind}/{name}` as a relative path.
    #[must_use]
    pub fn relative_path(&self) -> PathBuf {
        [self.project.as_str(), self.kind.as_str(), self.name.as_str()]
            .iter()
            .collect()
    }

    /// Location of the bare mirror under the clone root.
    #[must_use]
    pub fn mirror_path(&self, clone_root: &Path) -> PathBuf {
        clone_root.join(self.relative_path())
    }

    /// Location of the zip under the staging root.
    ///
    /// The `.zip` suffix is appended, so a name like `Docs.wiki` stays intact.
    #[must_use]
    pub fn archive_path(&self, archive_root: &Path) -> PathBuf {
        let mut path = archive_root.join(self.relative_path()).into_os_string();
        path.push(".zip");
        PathBuf::from(path)
    }
}

impl fmt::Display for ChangeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.project, self.kind, self.name)
    }
}

/// Keys whose mirrors received new data during this run.
pub type ChangeSet = BTreeSet<ChangeKey>;

/// Result of syncing one repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemOutcome {
    Changed,
    Unchanged,
    Failed(String),
}

/// Per-item sync record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemReport {
    pub key: ChangeKey,
    pub outcome: ItemOutcome,
}

/// Everything the sync phase attempted, in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncReport {
    items: Vec<ItemReport>,
}

impl SyncReport {
    pub(crate) fn push(&mut self, report: ItemReport) {
        self.items.push(report);
    }

    #[must_use]
    pub fn items(&self) -> &[ItemReport] {
        &self.items
    }

    /// Keys of every item that reported new data.
    #[must_use]
    pub fn change_set(&self) -> ChangeSet {
        self.items
            .iter()
            .filter(|item| item.outcome == ItemOutcome::Changed)
            .map(|item| item.key.clone())
            .collect()
    }

    /// Items whose sync failed.
    pub fn failures(&self) -> impl Iterator<Item = &ItemReport> {
        self.items
            .iter()
            .filter(|item| matches!(item.outcome, ItemOutcome::Failed(_)))
    }
}

/// A staged archive, with its directory relative to the staging root.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ArchiveFile {
    /// `/`-separated; empty for files directly under the staging root.
    pub relative_dir: String,
    pub path: PathBuf,
}

/// Output of archive path discovery.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArchivePaths {
    /// Distinct relative directories that directly contain files.
    pub dirs: BTreeSet<String>,
    pub files: BTreeSet<ArchiveFile>,
}

impl ArchivePaths {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

/// Final status of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Success,
    PartialFailure { failed: usize },
}

impl RunStatus {
    /// Process exit code: 0 on success, 1 if any sync item failed.
    #[must_use]
    pub const fn exit_code(self) -> u8 {
        match self {
            Self::Success => 0,
            Self::PartialFailure { .. } => 1,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub sync: SyncReport,
    pub archived: usize,
    pub uploaded: usize,
}

impl RunReport {
    #[must_use]
    pub fn status(&self) -> RunStatus {
        match self.sync.failures().count() {
            0 => RunStatus::Success,
            failed => RunStatus::PartialFailure { failed },
        }
    }
}
