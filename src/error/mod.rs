// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Error handling module.
//!
//! ```text
//!               BackupError (16 bytes)
//!                      |
//!   +-------+-------+--+----+--------+-------+
//!   |       |       |       |        |       |
//!   v       v       v       v        v       v
//!  Git     Net     Cfg   Archive  SharePt  Process/Io
//!  Box     Box     Box     Box      Box     Box
//!
//! Sub-errors (unboxed internally):
//!   Git        NotAMirror, Gix, CommandFailed, CloneFailed
//!   Network    Reqwest, HttpError, InvalidUrl, Decode
//!   Config     ParseError, MissingKey, InvalidValue
//!   Archive    SourceNotFound, Zip, Walk, Io
//!   SharePoint RealmNotFound, TokenRequest, RequestFailed,
//!              FolderOutsideSite, ReadFailed
//!   Process    ExecutableNotFound, SpawnFailed
//!
//! All variants boxed => BackupError stays two words.
//! ```
//!
//! Which of these are fatal depends on the pipeline phase: sync failures are
//! recorded per item, everything else aborts the run.

use thiserror::Error;

/// Convenience alias for `anyhow::Result`.
pub type Result<T> = anyhow::Result<T>;

/// Result type using [`BackupError`].
pub type BackupResult<T> = std::result::Result<T, BackupError>;

/// Top-level application error type.
///
/// All sub-errors are boxed to keep this enum at ~24 bytes on the stack.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Git operation failed.
    #[error("git error: {0}")]
    Git(#[from] Box<GitError>),

    /// Network operation failed.
    #[error("network error: {0}")]
    Network(#[from] Box<NetworkError>),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(#[from] Box<ConfigError>),

    /// Archive creation or staging error.
    #[error("archive error: {0}")]
    Archive(#[from] Box<ArchiveError>),

    /// SharePoint request error.
    #[error("sharepoint error: {0}")]
    SharePoint(#[from] Box<SharePointError>),

    /// Process execution error.
    #[error("process error: {0}")]
    Process(#[from] Box<ProcessError>),

    /// I/O error.
    #[error("io error: {0}")]
    Io(Box<std::io::Error>),
}

// --- From implementations for boxing ---

/// Macro to generate `From` implementations that box the source error.
macro_rules! impl_from_boxed {
    ($($error:ty => $variant:ident),+ $(,)?) => {
        $(
            impl From<$error> for BackupError {
                fn from(err: $error) -> Self {
                    BackupError::$variant(Box::new(err))
                }
            }
        )+
    };
}

impl_from_boxed! {
    GitError => Git,
    NetworkError => Network,
    ConfigError => Config,
    ArchiveError => Archive,
    SharePointError => SharePoint,
    ProcessError => Process,
    std::io::Error => Io,
}

// --- Gix Errors ---

/// Wrapper for gix-specific errors.
///
/// Large error types are boxed to keep enum size manageable.
#[derive(Debug, Error)]
pub enum GixError {
    /// Failed to open repository.
    #[error("failed to open repository: {0}")]
    Open(#[from] Box<gix::open::Error>),

    /// Failed to iterate references.
    #[error("failed to read references: {0}")]
    References(String),
}

// --- Git Errors ---

/// Git operation errors.
#[derive(Debug, Error)]
pub enum GitError {
    /// Local mirror path exists but is not a repository.
    #[error("not a mirror repository: {path}")]
    NotAMirror { path: String },

    /// Git command execution failed.
    #[error("git command failed: {command} - {message}")]
    CommandFailed { command: String, message: String },

    /// Error from gix library.
    #[error("gix error: {0}")]
    Gix(#[from] GixError),

    /// Clone operation failed.
    #[error("failed to clone {url}: {message}")]
    CloneFailed { url: String, message: String },
}

// --- Network Errors ---

/// Network operation errors.
#[derive(Debug, Error)]
pub enum NetworkError {
    /// HTTP error response.
    #[error("http error {status}: {url}")]
    HttpError { status: u16, url: String },

    /// Error from reqwest library.
    #[error("reqwest error: {0}")]
    Reqwest(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("invalid url: {0}")]
    InvalidUrl(String),

    /// Response body did not match the expected shape.
    #[error("unexpected response from {url}: {message}")]
    Decode { url: String, message: String },
}

// --- Config Errors ---

/// Configuration-related errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to parse configuration source.
    #[error("failed to parse config: {message}")]
    ParseError { message: String },

    /// Missing required setting.
    #[error("missing required setting '{env}' (config key '{key}')")]
    MissingKey { env: String, key: String },

    /// Invalid configuration value.
    #[error("invalid value for '{key}': {message}")]
    InvalidValue { key: String, message: String },
}

// --- Archive Errors ---

/// Archive creation and staging errors.
#[derive(Debug, Error)]
pub enum ArchiveError {
    /// The directory to archive does not exist.
    #[error("archive source not found: {0}")]
    SourceNotFound(String),

    /// Error from the zip writer.
    #[error("failed to write zip '{path}': {source}")]
    Zip {
        path: String,
        #[source]
        source: zip::result::ZipError,
    },

    /// The directory walk hit unreadable entries.
    #[error("failed to walk '{path}': {message}")]
    Walk { path: String, message: String },

    /// I/O error on a staging path.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- SharePoint Errors ---

/// SharePoint authentication and upload errors.
#[derive(Debug, Error)]
pub enum SharePointError {
    /// The site did not answer with a bearer challenge carrying a realm.
    #[error("no realm in authentication challenge from {url}")]
    RealmNotFound { url: String },

    /// The token endpoint refused the client credentials.
    #[error("token request failed with status {status}: {message}")]
    TokenRequest { status: u16, message: String },

    /// A REST call against the site failed.
    #[error("request '{operation}' failed with status {status}: {message}")]
    RequestFailed {
        operation: String,
        status: u16,
        message: String,
    },

    /// A server-relative folder does not belong to the configured site.
    #[error("folder '{folder}' is not inside site '{site}'")]
    FolderOutsideSite { folder: String, site: String },

    /// A local file could not be read for upload.
    #[error("failed to read '{path}' for upload: {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

// --- Process Errors ---

/// Process execution errors.
#[derive(Debug, Error)]
pub enum ProcessError {
    /// Executable not found in PATH.
    #[error("executable not found: '{name}' (not in PATH)")]
    ExecutableNotFound { name: String },

    /// Failed to spawn process.
    #[error("failed to spawn process '{command}': {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

#[cfg(test)]
mod tests;
