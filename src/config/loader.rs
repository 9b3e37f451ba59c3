// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Configuration loading from multiple sources.
//!
//! # Loader Pipeline
//!
//! ```text
//! ConfigLoader::new()
//!   .add_toml_file_optional()
//!   .add_toml_file()
//!   .add_toml_str()
//!   .with_env_vars()        (defaults to the process environment)
//!        |
//!        v
//!    build() --> env overrides --> deserialize --> validate --> Config
//! ```

use std::collections::BTreeMap;
use std::env::VarError;
use std::path::Path;

use super::{Config, ENV_KEYS};
use crate::error::{BackupError, ConfigError, Result};

/// Builder for loading configuration from multiple sources.
pub struct ConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env: Option<BTreeMap<String, String>>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self {
            builder: config::Config::builder(),
            env: None,
        }
    }

    /// Adds a TOML configuration file to the loader.
    ///
    /// The file will be read when `build()` is called. If the file doesn't exist
    /// or contains invalid TOML, `build()` will return an error.
    #[must_use]
    pub fn add_toml_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(true));
        self
    }

    #[must_use]
    pub fn add_toml_file_optional<P: AsRef<Path>>(mut self, path: P) -> Self {
        use config::{File, FileFormat};
        let p = path.as_ref();
        self.builder = self
            .builder
            .add_source(File::from(p).format(FileFormat::Toml).required(false));
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        use config::{File, FileFormat};
        self.builder = self
            .builder
            .add_source(File::from_str(content, FileFormat::Toml));
        self
    }

    /// Use the given variables instead of the process environment.
    #[must_use]
    pub fn with_env_vars(mut self, vars: BTreeMap<String, String>) -> Self {
        self.env = Some(vars);
        self
    }

    /// Builds the configuration from all added sources.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - Required configuration files are missing.
    /// - Configuration files have invalid TOML syntax.
    /// - A mapped environment variable is not valid UTF-8.
    /// - `SHAREPOINT_CHUNK_SIZE` is not a number.
    /// - The merged configuration cannot be deserialized into the `Config` struct.
    /// - A required setting is missing or empty.
    pub fn build(self) -> Result<Config> {
        let env = match self.env {
            Some(vars) => vars,
            None => collect_env(|var| std::env::var(var)).map_err(BackupError::from)?,
        };

        let mut builder = self.builder;
        for (var, key) in ENV_KEYS {
            let Some(value) = env.get(*var) else {
                continue;
            };
            builder = if *key == "sharepoint.chunk_size" {
                let size = value
                    .parse::<i64>()
                    .map_err(|e| ConfigError::InvalidValue {
                        key: (*key).to_string(),
                        message: format!("{var}='{value}' is not a number: {e}"),
                    })
                    .map_err(BackupError::from)?;
                builder.set_override(*key, size)
            } else {
                builder.set_override(*key, value.as_str())
            }
            .map_err(parse_error)?;
        }

        let cfg = builder.build().map_err(parse_error)?;
        let config: Config = cfg.try_deserialize().map_err(parse_error)?;
        config.validate().map_err(BackupError::from)?;
        Ok(config)
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Read the mapped variables through `lookup`, skipping unset ones.
///
/// Only the names in `ENV_KEYS` are read, so unrelated variables never
/// matter.
pub(crate) fn collect_env<F>(lookup: F) -> std::result::Result<BTreeMap<String, String>, ConfigError>
where
    F: Fn(&str) -> std::result::Result<String, VarError>,
{
    let mut vars = BTreeMap::new();
    for (var, key) in ENV_KEYS {
        match lookup(var) {
            Ok(value) => {
                vars.insert((*var).to_string(), value);
            }
            Err(VarError::NotPresent) => {}
            Err(VarError::NotUnicode(_)) => {
                return Err(ConfigError::InvalidValue {
                    key: (*key).to_string(),
                    message: format!("{var} is not valid UTF-8"),
                });
            }
        }
    }
    Ok(vars)
}

fn parse_error(err: config::ConfigError) -> BackupError {
    ConfigError::ParseError {
        message: err.to_string(),
    }
    .into()
}
