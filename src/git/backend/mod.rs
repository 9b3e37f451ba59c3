// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Git backend abstraction layer.
//!
//! ```text
//! MirrorQuery (read)     --> GixBackend (pure Rust gix)
//! MirrorMutation (write) --> ShellBackend (git CLI)
//! ```

use std::collections::BTreeMap;
use std::path::Path;
use std::process::Command;
use tracing::debug;

use super::credentials::GitCredentials;
use crate::error::{BackupError, BackupResult, GitError, GixError, ProcessError};

/// Every ref of a repository, name to target.
///
/// Direct refs map to their object id, symbolic refs to `ref: <name>`.
pub type RefSnapshot = BTreeMap<String, String>;

// --- Query Trait (Read-only operations) ---

/// Read-only mirror inspection.
pub trait MirrorQuery {
    /// Check if path opens as a git repository (bare or not).
    fn is_repository(path: &Path) -> bool;

    /// Capture every ref and its target.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the repository cannot be opened or its refs
    /// cannot be read.
    fn ref_snapshot(path: &Path) -> BackupResult<RefSnapshot>;
}

// --- Mutation Trait (Write operations) ---

/// Mirror operations that talk to the remote.
pub trait MirrorMutation {
    /// `git clone --mirror` into `dest`, creating its parent directories.
    ///
    /// # Errors
    ///
    /// Returns a `GitError::CloneFailed` if git fails, or an I/O error if the
    /// parent directories cannot be created.
    fn clone_mirror(
        url: &str,
        dest: &Path,
        credentials: Option<&GitCredentials>,
    ) -> BackupResult<()>;

    /// `git fetch --prune origin`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the fetch fails.
    fn fetch_prune(repo_path: &Path, credentials: Option<&GitCredentials>) -> BackupResult<()>;

    /// `git remote update --prune`.
    ///
    /// # Errors
    ///
    /// Returns a `GitError` if the update fails.
    fn remote_update_prune(
        repo_path: &Path,
        credentials: Option<&GitCredentials>,
    ) -> BackupResult<()>;
}

// --- GixBackend Implementation (Pure Rust) ---

/// Pure Rust git backend using gix.
///
/// Reads refs straight from disk without spawning git.
pub struct GixBackend;

impl MirrorQuery for GixBackend {
    fn is_repository(path: &Path) -> bool {
        gix::open(path).is_ok()
    }

    fn ref_snapshot(path: &Path) -> BackupResult<RefSnapshot> {
        let repo = gix::open(path).map_err(|e| GitError::Gix(GixError::Open(Box::new(e))))?;
        let platform = repo
            .references()
            .map_err(|e| GitError::Gix(GixError::References(e.to_string())))?;
        let iter = platform
            .all()
            .map_err(|e| GitError::Gix(GixError::References(e.to_string())))?;

        let mut refs = RefSnapshot::new();
        for reference in iter {
            let reference =
                reference.map_err(|e| GitError::Gix(GixError::References(e.to_string())))?;
            let target = match reference.target() {
                gix::refs::TargetRef::Object(id) => id.to_string(),
                gix::refs::TargetRef::Symbolic(name) => format!("ref: {}", name.as_bstr()),
            };
            refs.insert(reference.name().as_bstr().to_string(), target);
        }
        Ok(refs)
    }
}

// --- ShellBackend Implementation (Git CLI) ---

/// Shell-based git backend using git CLI.
///
/// Used for everything that touches the network, so HTTPS auth goes through
/// git's own transport.
pub struct ShellBackend;

impl ShellBackend {
    /// Execute a git command. Sets `GCM_INTERACTIVE=never` and `GIT_TERMINAL_PROMPT=0`.
    pub(crate) fn git_command(
        args: &[&str],
        cwd: &Path,
        credentials: Option<&GitCredentials>,
    ) -> BackupResult<String> {
        let mut cmd = Command::new("git");
        cmd.args(args)
            .current_dir(cwd)
            .env("GCM_INTERACTIVE", "never")
            .env("GIT_TERMINAL_PROMPT", "0");
        if let Some(credentials) = credentials {
            credentials.apply(&mut cmd);
        }

        debug!(cwd = %cwd.display(), "git {}", args.join(" "));
        let output = cmd.output().map_err(|e| ProcessError::SpawnFailed {
            command: format!("git {}", args.join(" ")),
            source: e,
        })?;

        if !output.status.success() {
            return Err(GitError::CommandFailed {
                command: format!("git {}", args.join(" ")),
                message: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            }
            .into());
        }
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }
}

impl MirrorMutation for ShellBackend {
    fn clone_mirror(
        url: &str,
        dest: &Path,
        credentials: Option<&GitCredentials>,
    ) -> BackupResult<()> {
        let name = dest
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| GitError::CloneFailed {
                url: url.to_string(),
                message: format!("invalid destination path '{}'", dest.display()),
            })?;
        let parent = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(parent)?;

        // Runs inside `parent`, so the destination is just the last segment.
        Self::git_command(
            &["clone", "--mirror", "--quiet", "--", url, name],
            parent,
            credentials,
        )
        .map_err(|e| into_clone_failed(url, e))?;
        Ok(())
    }

    fn fetch_prune(repo_path: &Path, credentials: Option<&GitCredentials>) -> BackupResult<()> {
        Self::git_command(
            &["fetch", "--prune", "--quiet", "origin"],
            repo_path,
            credentials,
        )?;
        Ok(())
    }

    fn remote_update_prune(
        repo_path: &Path,
        credentials: Option<&GitCredentials>,
    ) -> BackupResult<()> {
        Self::git_command(&["remote", "update", "--prune"], repo_path, credentials)?;
        Ok(())
    }
}

/// Reword a failed `git clone` so the URL shows up in the error.
fn into_clone_failed(url: &str, err: BackupError) -> BackupError {
    match err {
        BackupError::Git(git) => match *git {
            GitError::CommandFailed { message, .. } => GitError::CloneFailed {
                url: url.to_string(),
                message,
            }
            .into(),
            other => other.into(),
        },
        other => other,
    }
}
