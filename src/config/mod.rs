// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration management for devops-backup.
//!
//! # Configuration Hierarchy
//!
//! ```text
//! Priority (low → high)
//! 1. defaults
//! 2. devops-backup.toml (cwd, optional)
//! 3. --config FILE
//! 4. environment variables
//! ```
//!
//! # Environment Variable Mapping
//!
//! ```text
//! DEVOPS_PAT               → devops.pat
//! DEVOPS_ORGANIZATION_URL  → devops.organization_url
//! PATH_CLONE               → paths.clone
//! PATH_ARCHIVE             → paths.archive
//! SHAREPOINT_URL           → sharepoint.url
//! SHAREPOINT_DIR           → sharepoint.dir
//! SHAREPOINT_CLIENT_ID     → sharepoint.client_id
//! SHAREPOINT_CLIENT_SECRET → sharepoint.client_secret
//! SHAREPOINT_CHUNK_SIZE    → sharepoint.chunk_size (optional)
//! ```
//!
//! Every setting above except the chunk size is required. A missing or empty
//! value fails the run before any work starts.

pub mod loader;


use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::error::{ConfigError, Result};

use loader::ConfigLoader;

/// Default upload chunk size for SharePoint upload sessions.
pub const DEFAULT_CHUNK_SIZE: usize = 50_000_000;

/// Default Azure DevOps REST API version.
pub const DEFAULT_API_VERSION: &str = "7.1";

/// Default Azure ACS endpoint used for SharePoint app-only tokens.
pub const DEFAULT_ACS_URL: &str = "https://accounts.accesscontrol.windows.net";

/// Environment variables for settings, paired with their config keys.
///
/// Order matters: validation reports the first missing entry.
pub const ENV_KEYS: &[(&str, &str)] = &[
    ("DEVOPS_PAT", "devops.pat"),
    ("DEVOPS_ORGANIZATION_URL", "devops.organization_url"),
    ("PATH_CLONE", "paths.clone"),
    ("PATH_ARCHIVE", "paths.archive"),
    ("SHAREPOINT_URL", "sharepoint.url"),
    ("SHAREPOINT_DIR", "sharepoint.dir"),
    ("SHAREPOINT_CLIENT_ID", "sharepoint.client_id"),
    ("SHAREPOINT_CLIENT_SECRET", "sharepoint.client_secret"),
    ("SHAREPOINT_CHUNK_SIZE", "sharepoint.chunk_size"),
];

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Azure DevOps organization access.
    pub devops: DevOpsConfig,
    /// Local clone cache and archive staging roots.
    pub paths: PathsConfig,
    /// SharePoint upload target.
    pub sharepoint: SharePointConfig,
}

/// Azure DevOps settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DevOpsConfig {
    /// Personal access token, used for the REST API and for git.
    pub pat: String,
    /// Organization base URL, e.g. `https://dev.azure.com/contoso`.
    pub organization_url: String,
    /// REST API version sent with every request.
    pub api_version: String,
}

impl Default for DevOpsConfig {
    fn default() -> Self {
        Self {
            pat: String::new(),
            organization_url: String::new(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }
}

/// Local filesystem roots.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    /// Persistent mirror cache: `{clone}/{project}/{git|wiki}/{name}`.
    pub clone: PathBuf,
    /// Ephemeral zip staging root, cleared after each upload pass.
    pub archive: PathBuf,
}

/// SharePoint settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SharePointConfig {
    /// Site URL, e.g. `https://contoso.sharepoint.com/sites/backup`.
    pub url: String,
    /// Upload root: site-relative (`Shared Documents/Backup`) or
    /// server-relative below the site (`/sites/it/Shared Documents/Backup`).
    pub dir: String,
    /// App-only client id.
    pub client_id: String,
    /// App-only client secret.
    pub client_secret: String,
    /// Bytes per upload-session chunk.
    pub chunk_size: usize,
    /// ACS token endpoint base URL.
    pub acs_url: String,
}

impl Default for SharePointConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            dir: String::new(),
            client_id: String::new(),
            client_secret: String::new(),
            chunk_size: DEFAULT_CHUNK_SIZE,
            acs_url: DEFAULT_ACS_URL.to_string(),
        }
    }
}

impl Config {
    /// Create a new configuration builder.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use devops_backup::config::Config;
    ///
    /// let config = Config::builder()
    ///     .add_toml_file_optional("devops-backup.toml")
    ///     .build()?;
    /// # Ok::<(), anyhow::Error>(())
    /// ```
    #[must_use]
    pub fn builder() -> ConfigLoader {
        ConfigLoader::new()
    }

    /// Load configuration from a TOML string, ignoring the process environment.
    ///
    /// # Errors
    ///
    /// Returns an error if the content is not valid TOML, does not match the
    /// `Config` structure, or lacks a required setting.
    pub fn parse(content: &str) -> Result<Self> {
        Self::builder()
            .add_toml_str(content)
            .with_env_vars(BTreeMap::new())
            .build()
    }

    /// Check that every required setting is present and sane.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingKey` naming the first missing setting's
    /// environment variable, or `ConfigError::InvalidValue` for a zero chunk
    /// size.
    pub fn validate(&self) -> std::result::Result<(), ConfigError> {
        let values: [(&str, bool); 8] = [
            ("devops.pat", self.devops.pat.is_empty()),
            (
                "devops.organization_url",
                self.devops.organization_url.is_empty(),
            ),
            ("paths.clone", is_empty_path(&self.paths.clone)),
            ("paths.archive", is_empty_path(&self.paths.archive)),
            ("sharepoint.url", self.sharepoint.url.is_empty()),
            ("sharepoint.dir", self.sharepoint.dir.is_empty()),
            ("sharepoint.client_id", self.sharepoint.client_id.is_empty()),
            (
                "sharepoint.client_secret",
                self.sharepoint.client_secret.is_empty(),
            ),
        ];

        if let Some((key, _)) = values.iter().find(|(_, missing)| *missing) {
            let env = ENV_KEYS
                .iter()
                .find(|(_, k)| k == key)
                .map_or(*key, |(env, _)| *env);
            return Err(ConfigError::MissingKey {
                env: env.to_string(),
                key: (*key).to_string(),
            });
        }

        if self.sharepoint.chunk_size == 0 {
            return Err(ConfigError::InvalidValue {
                key: "sharepoint.chunk_size".to_string(),
                message: "chunk size must be greater than zero".to_string(),
            });
        }

        Ok(())
    }

    /// Format configuration options for display.
    ///
    /// Secrets are shown as `[hidden]`. Output is ordered by key.
    #[must_use]
    pub fn format_options(&self) -> Vec<String> {
        let mut options = BTreeMap::new();
        let hidden = |s: &str| {
            if s.is_empty() {
                String::new()
            } else {
                "[hidden]".to_string()
            }
        };

        options.insert("devops.pat".to_string(), hidden(&self.devops.pat));
        options.insert(
            "devops.organization_url".to_string(),
            self.devops.organization_url.clone(),
        );
        options.insert(
            "devops.api_version".to_string(),
            self.devops.api_version.clone(),
        );
        options.insert(
            "paths.clone".to_string(),
            self.paths.clone.display().to_string(),
        );
        options.insert(
            "paths.archive".to_string(),
            self.paths.archive.display().to_string(),
        );
        options.insert("sharepoint.url".to_string(), self.sharepoint.url.clone());
        options.insert("sharepoint.dir".to_string(), self.sharepoint.dir.clone());
        options.insert(
            "sharepoint.client_id".to_string(),
            self.sharepoint.client_id.clone(),
        );
        options.insert(
            "sharepoint.client_secret".to_string(),
            hidden(&self.sharepoint.client_secret),
        );
        options.insert(
            "sharepoint.chunk_size".to_string(),
            self.sharepoint.chunk_size.to_string(),
        );
        options.insert(
            "sharepoint.acs_url".to_string(),
            self.sharepoint.acs_url.clone(),
        );

        let max_key_len = options.keys().map(String::len).max().unwrap_or(0);

        options
            .into_iter()
            .map(|(key, value)| format!("{key:<max_key_len$} = {value}"))
            .collect()
    }
}

fn is_empty_path(path: &Path) -> bool {
    path.as_os_str().is_empty()
}
