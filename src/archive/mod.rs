// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Zip archives of mirrors and the staging tree that holds them.
//!
//! ```text
//! create_archive(src, dst)  parallel_walk(src) --> sorted entries
//!                           --> ZipWriter (deflate) --> dst
//! discover(root)            parallel_walk(root) --> ArchivePaths
//! clean(root)               remove_dir_all(root) if present
//! ```


use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;
use tracing::debug;
use zip::CompressionMethod;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::backup::{ArchiveFile, ArchivePaths, ArchiveStore};
use crate::error::{ArchiveError, BackupResult};
use crate::utility::fs::walk::{WalkOptions, WalkResult, parallel_walk, relative_slash_path};

/// Writes deflated zips and manages the staging tree on local disk.
#[derive(Debug, Clone, Default)]
pub struct ZipArchiver {
    walk: WalkOptions,
}

impl ZipArchiver {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Walk `root` and fail on any unreadable entry.
    fn walk(&self, root: &Path) -> BackupResult<WalkResult> {
        let result = parallel_walk(root, &self.walk)?;
        if let Some(first) = result.errors().first() {
            return Err(ArchiveError::Walk {
                path: root.display().to_string(),
                message: first.clone(),
            }
            .into());
        }
        Ok(result)
    }

    fn write_zip(&self, source_dir: &Path, archive_path: &Path) -> BackupResult<usize> {
        let walked = self.walk(source_dir)?;

        let mut entries: Vec<(String, bool, &Path)> = walked
            .directories()
            .iter()
            .map(|dir| (dir.as_path(), true))
            .chain(walked.files().iter().map(|file| (file.as_path(), false)))
            .filter_map(|(path, is_dir)| {
                relative_slash_path(source_dir, path).map(|name| (name, is_dir, path))
            })
            .collect();
        entries.sort_by(|a, b| a.0.cmp(&b.0));

        let file = File::create(archive_path).map_err(io_error(archive_path))?;
        let mut writer = ZipWriter::new(BufWriter::new(file));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for (name, is_dir, path) in &entries {
            if *is_dir {
                writer
                    .add_directory(name.as_str(), options)
                    .map_err(zip_error(archive_path))?;
                continue;
            }

            let mut input = File::open(path).map_err(io_error(path))?;
            let len = input.metadata().map_err(io_error(path))?.len();
            writer
                .start_file(name.as_str(), options.large_file(len >= u64::from(u32::MAX)))
                .map_err(zip_error(archive_path))?;
            io::copy(&mut input, &mut writer).map_err(io_error(archive_path))?;
        }

        writer
            .finish()
            .map_err(zip_error(archive_path))?
            .flush()
            .map_err(io_error(archive_path))?;
        Ok(entries.len())
    }
}

fn io_error(path: &Path) -> impl Fn(io::Error) -> ArchiveError + '_ {
    move |source| ArchiveError::Io {
        path: path.display().to_string(),
        source,
    }
}

fn zip_error(path: &Path) -> impl Fn(zip::result::ZipError) -> ArchiveError + '_ {
    move |source| ArchiveError::Zip {
        path: path.display().to_string(),
        source,
    }
}

impl ArchiveStore for ZipArchiver {
    fn create_archive(&self, source_dir: &Path, archive_path: &Path) -> BackupResult<()> {
        if !source_dir.is_dir() {
            return Err(ArchiveError::SourceNotFound(source_dir.display().to_string()).into());
        }

        if let Some(parent) = archive_path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error(parent))?;
        }

        let entries = self.write_zip(source_dir, archive_path)?;

        debug!(
            source = %source_dir.display(),
            path = %archive_path.display(),
            entries,
            "Archive written"
        );
        Ok(())
    }

    fn discover(&self, staging_root: &Path) -> BackupResult<ArchivePaths> {
        let mut paths = ArchivePaths::default();
        if !staging_root.is_dir() {
            return Ok(paths);
        }

        for file in self.walk(staging_root)?.files() {
            let Some(parent) = file.parent() else {
                continue;
            };
            let Some(relative_dir) = relative_slash_path(staging_root, parent) else {
                continue;
            };
            paths.dirs.insert(relative_dir.clone());
            paths.files.insert(ArchiveFile {
                relative_dir,
                path: file.clone(),
            });
        }

        debug!(
            path = %staging_root.display(),
            dirs = paths.dirs.len(),
            files = paths.files.len(),
            "Discovered staged archives"
        );
        Ok(paths)
    }

    fn clean(&self, staging_root: &Path) -> BackupResult<()> {
        match std::fs::remove_dir_all(staging_root) {
            Ok(()) => {
                debug!(path = %staging_root.display(), "Staging tree removed");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(io_error(staging_root)(e).into()),
        }
    }
}
