// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Azure DevOps enumeration over the REST API.
//!
//! ```text
//! list_projects()   GET {org}/_apis/projects
//!                     ?api-version=..&continuationToken=..
//!                   next token <- x-ms-continuationtoken header
//!                   (absent or empty => done)
//! list_repos(p)     GET {org}/{p}/_apis/git/repositories
//! list_wikis(p)     GET {org}/{p}/_apis/wiki/wikis
//!                   GET {org}/{p}/_apis/git/repositories/{repositoryId}
//!
//! Auth: Basic, empty username, PAT as password
//! ```

pub mod types;


use async_trait::async_trait;
use reqwest::header::{ACCEPT, HeaderMap};
use reqwest::{Client, Url};
use serde::de::DeserializeOwned;
use std::collections::BTreeSet;
use tracing::{debug, warn};

use crate::backup::{RemoteCatalog, RepoItem};
use crate::error::{BackupResult, NetworkError};
use types::{GitRepository, ListResponse, TeamProject, Wiki};

/// Response header carrying the next page cursor.
pub const CONTINUATION_HEADER: &str = "x-ms-continuationtoken";

/// Client for one Azure DevOps organization.
#[derive(Debug, Clone)]
pub struct DevOpsClient {
    client: Client,
    base: Url,
    pat: String,
    api_version: String,
}

impl DevOpsClient {
    /// Create a client for `organization_url`, e.g. `https://dev.azure.com/contoso`.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidUrl` if the URL cannot be parsed or
    /// cannot carry a path, and `NetworkError::Reqwest` if the HTTP client
    /// cannot be built.
    pub fn new(
        organization_url: &str,
        pat: impl Into<String>,
        api_version: impl Into<String>,
    ) -> BackupResult<Self> {
        let base = Url::parse(organization_url)
            .map_err(|e| NetworkError::InvalidUrl(format!("{organization_url}: {e}")))?;
        if base.cannot_be_a_base() {
            return Err(NetworkError::InvalidUrl(organization_url.to_string()).into());
        }

        let client = Client::builder()
            .user_agent(format!("devops-backup/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(NetworkError::Reqwest)?;

        Ok(Self {
            client,
            base,
            pat: pat.into(),
            api_version: api_version.into(),
        })
    }

    /// `{org}/{segments...}?api-version=..`, with each segment percent-encoded.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> BackupResult<Url> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|()| NetworkError::InvalidUrl(self.base.to_string()))?
            .pop_if_empty()
            .extend(segments);
        url.query_pairs_mut()
            .append_pair("api-version", &self.api_version);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> BackupResult<(T, HeaderMap)> {
        debug!(url = %url, "GET");
        let response = self
            .client
            .get(url.clone())
            .basic_auth("", Some(&self.pat))
            .header(ACCEPT, "application/json")
            .send()
            .await
            .map_err(NetworkError::Reqwest)?;

        if !response.status().is_success() {
            return Err(NetworkError::HttpError {
                status: response.status().as_u16(),
                url: url.to_string(),
            }
            .into());
        }

        let headers = response.headers().clone();
        let body = response.text().await.map_err(NetworkError::Reqwest)?;
        let value = serde_json::from_str(&body).map_err(|e| NetworkError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok((value, headers))
    }

    async fn repository(&self, project: &str, repository_id: &str) -> BackupResult<RepoItem> {
        let url = self.endpoint(&[project, "_apis", "git", "repositories", repository_id])?;
        let (repo, _): (GitRepository, _) = self.get_json(url).await?;
        Ok(RepoItem::new(repo.name, repo.remote_url))
    }
}

/// The next page cursor, if the server sent a non-empty one.
fn continuation_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(CONTINUATION_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(String::from)
}

#[async_trait]
impl RemoteCatalog for DevOpsClient {
    async fn list_projects(&self) -> BackupResult<BTreeSet<String>> {
        let mut names = BTreeSet::new();
        let mut token: Option<String> = None;

        loop {
            let mut url = self.endpoint(&["_apis", "projects"])?;
            if let Some(token) = &token {
                url.query_pairs_mut()
                    .append_pair("continuationToken", token);
            }

            let (page, headers): (ListResponse<TeamProject>, _) = self.get_json(url).await?;
            debug!(count = page.value.len(), "Received project page");
            names.extend(page.value.into_iter().map(|project| project.name));

            match continuation_token(&headers) {
                Some(next) if token.as_deref() == Some(next.as_str()) => {
                    warn!(token = %next, "Continuation token did not advance, stopping");
                    break;
                }
                Some(next) => token = Some(next),
                None => break,
            }
        }

        Ok(names)
    }

    async fn list_repos(&self, project: &str) -> BackupResult<Vec<RepoItem>> {
        let url = self.endpoint(&[project, "_apis", "git", "repositories"])?;
        let (repos, _): (ListResponse<GitRepository>, _) = self.get_json(url).await?;
        Ok(repos
            .value
            .into_iter()
            .map(|repo| RepoItem::new(repo.name, repo.remote_url))
            .collect())
    }

    async fn list_wikis(&self, project: &str) -> BackupResult<Vec<RepoItem>> {
        let url = self.endpoint(&[project, "_apis", "wiki", "wikis"])?;
        let (wikis, _): (ListResponse<Wiki>, _) = self.get_json(url).await?;

        let mut items = Vec::with_capacity(wikis.value.len());
        for wiki in wikis.value {
            debug!(project, wiki = %wiki.name, "Resolving wiki repository");
            items.push(self.repository(project, &wiki.repository_id).await?);
        }
        Ok(items)
    }
}
