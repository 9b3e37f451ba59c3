// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! HTTP credentials for git over HTTPS.
//!
//! The header is handed to git through `GIT_CONFIG_COUNT` / `GIT_CONFIG_KEY_n`
//! / `GIT_CONFIG_VALUE_n`, so it stays off the command line and out of the
//! mirror's config file.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use std::fmt;
use std::process::Command;

/// An `Authorization` header for git's `http.extraHeader`.
#[derive(Clone, PartialEq, Eq)]
pub struct GitCredentials {
    header: String,
}

impl GitCredentials {
    /// Basic credentials for a personal access token (empty username).
    #[must_use]
    pub fn from_pat(pat: &str) -> Self {
        Self::basic("", pat)
    }

    #[must_use]
    pub fn basic(username: &str, password: &str) -> Self {
        let token = STANDARD.encode(format!("{username}:{password}"));
        Self {
            header: format!("Authorization: Basic {token}"),
        }
    }

    /// The full header line, including the `Authorization:` name.
    #[must_use]
    pub fn header(&self) -> &str {
        &self.header
    }

    pub(crate) fn apply(&self, cmd: &mut Command) {
        cmd.env("GIT_CONFIG_COUNT", "1")
            .env("GIT_CONFIG_KEY_0", "http.extraHeader")
            .env("GIT_CONFIG_VALUE_0", &self.header);
    }
}

impl fmt::Debug for GitCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitCredentials")
            .field("header", &"Authorization: Basic [hidden]")
            .finish()
    }
}
