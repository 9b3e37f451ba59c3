// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Azure DevOps REST response shapes.
//!
//! Only the fields the backup needs are modeled; everything else in the
//! payload is ignored.

use serde::Deserialize;

/// `{ "count": n, "value": [...] }` envelope used by list endpoints.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub value: Vec<T>,
}

/// Entry of `_apis/projects`.
#[derive(Debug, Deserialize)]
pub struct TeamProject {
    pub name: String,
}

/// Entry of `_apis/git/repositories`, or the single repository lookup.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GitRepository {
    pub name: String,
    pub remote_url: String,
}

/// Entry of `_apis/wiki/wikis`.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wiki {
    pub name: String,
    pub repository_id: String,
}
