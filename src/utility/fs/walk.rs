// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

use crate::error::{ArchiveError, BackupResult};
use bon::Builder;
use flume::unbounded;
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Options for parallel directory traversal.
#[derive(Debug, Clone, Builder)]
pub struct WalkOptions {
    /// Follow symbolic links
    #[builder(setters(name = with_follow_links), default = false)]
    follow_links: bool,
    /// Include hidden files/directories
    #[builder(setters(name = with_include_hidden), default = true)]
    include_hidden: bool,
    /// Respect .gitignore and .ignore files
    #[builder(setters(name = with_respect_ignore_files), default = false)]
    respect_ignore_files: bool,
    /// Number of threads (None = auto-detect based on CPU count)
    #[builder(setters(name = with_threads))]
    threads: Option<usize>,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl WalkOptions {
    #[must_use]
    pub const fn follow_links(&self) -> bool {
        self.follow_links
    }

    #[must_use]
    pub const fn include_hidden(&self) -> bool {
        self.include_hidden
    }

    #[must_use]
    pub const fn respect_ignore_files(&self) -> bool {
        self.respect_ignore_files
    }

    #[must_use]
    pub const fn threads(&self) -> Option<usize> {
        self.threads
    }
}

/// Result of a parallel walk, sorted by path.
#[derive(Debug)]
pub struct WalkResult {
    files: Vec<PathBuf>,
    directories: Vec<PathBuf>,
    errors: Vec<String>,
}

impl WalkResult {
    /// Files found below the root.
    #[must_use]
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }

    /// Directories found below the root, excluding the root itself.
    #[must_use]
    pub fn directories(&self) -> &[PathBuf] {
        &self.directories
    }

    /// Messages for entries that could not be read.
    #[must_use]
    pub fn errors(&self) -> &[String] {
        &self.errors
    }
}

/// Builds a `WalkBuilder` with the given options.
pub(super) fn build_walker(root: &Path, options: &WalkOptions) -> WalkBuilder {
    let mut builder = WalkBuilder::new(root);

    builder.follow_links(options.follow_links());
    builder.hidden(!options.include_hidden());

    // Ignore files of any kind, including ones in parent directories
    let respect = options.respect_ignore_files();
    builder.ignore(respect);
    builder.parents(respect);
    builder.git_ignore(respect);
    builder.git_global(respect);
    builder.git_exclude(respect);

    if let Some(threads) = options.threads() {
        builder.threads(threads);
    }

    builder
}

/// Performs parallel directory traversal using `ignore::WalkParallel`.
///
/// Uses flume channels for lock-free result collection. The channels are
/// unbounded because they are drained only after the walk completes.
///
/// # Errors
///
/// Returns `ArchiveError::SourceNotFound` if `root` does not exist.
///
/// # Example
/// ```no_run
/// use devops_backup::utility::fs::walk::{parallel_walk, WalkOptions};
///
/// let result = parallel_walk("/var/backup/clone", &WalkOptions::default())?;
/// println!("Found {} files", result.files().len());
/// # Ok::<(), devops_backup::error::BackupError>(())
/// ```
pub fn parallel_walk<P: AsRef<Path>>(root: P, options: &WalkOptions) -> BackupResult<WalkResult> {
    let root = root.as_ref();

    if !root.exists() {
        return Err(ArchiveError::SourceNotFound(root.display().to_string()).into());
    }

    let (file_tx, file_rx) = unbounded::<PathBuf>();
    let (dir_tx, dir_rx) = unbounded::<PathBuf>();
    let (err_tx, err_rx) = unbounded::<String>();

    let builder = build_walker(root, options);
    let parallel = builder.build_parallel();

    parallel.run(|| {
        let file_tx = file_tx.clone();
        let dir_tx = dir_tx.clone();
        let err_tx = err_tx.clone();

        Box::new(move |entry_result| {
            match entry_result {
                Ok(entry) if entry.depth() == 0 => {}
                Ok(entry) => {
                    let path = entry.path();

                    // Receivers outlive the walk, so sends cannot fail
                    if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                        let _ = dir_tx.send(path.to_path_buf());
                    } else if entry.file_type().is_some_and(|ft| ft.is_file()) {
                        let _ = file_tx.send(path.to_path_buf());
                    }
                }
                Err(e) => {
                    warn!(error = %e, "walk error");
                    let _ = err_tx.send(e.to_string());
                }
            }
            ignore::WalkState::Continue
        })
    });

    drop(file_tx);
    drop(dir_tx);
    drop(err_tx);

    let mut files: Vec<PathBuf> = file_rx.iter().collect();
    let mut directories: Vec<PathBuf> = dir_rx.iter().collect();
    let errors: Vec<String> = err_rx.iter().collect();
    files.sort();
    directories.sort();

    Ok(WalkResult {
        files,
        directories,
        errors,
    })
}

/// `path` relative to `root`, joined with `/`.
///
/// Returns `None` if `path` is not below `root`. The root itself maps to an
/// empty string.
#[must_use]
pub fn relative_slash_path(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy().into_owned())
        .collect();
    Some(parts.join("/"))
}
