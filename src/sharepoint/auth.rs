// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! SharePoint app-only authentication through Azure ACS.
//!
//! ```text
//! GET  {site}/_vti_bin/client.svc  (Authorization: Bearer)
//!        401  WWW-Authenticate: Bearer realm="<tenant>",client_id=...
//!                    |
//!                    v
//! POST {acs}/{realm}/tokens/OAuth/2
//!        grant_type=client_credentials
//!        client_id={id}@{realm}
//!        client_secret={secret}
//!        resource=00000003-0000-0ff1-ce00-000000000000/{host}@{realm}
//!                    |
//!                    v
//!             access_token  (fetched once, then cached)
//! ```

use regex::Regex;
use reqwest::header::{AUTHORIZATION, WWW_AUTHENTICATE};
use reqwest::{Client, Url};
use serde::Deserialize;
use std::sync::OnceLock;
use tokio::sync::OnceCell;
use tracing::debug;

use crate::error::{BackupResult, NetworkError, SharePointError};

/// Well-known principal id of SharePoint Online.
pub const SHAREPOINT_PRINCIPAL: &str = "00000003-0000-0ff1-ce00-000000000000";

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Client-credential token source for one site.
#[derive(Debug)]
pub struct AppOnlyAuth {
    client: Client,
    site: Url,
    client_id: String,
    client_secret: String,
    acs_url: String,
    token: OnceCell<String>,
}

impl AppOnlyAuth {
    #[must_use]
    pub fn new(
        client: Client,
        site: Url,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        acs_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            site,
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            acs_url: acs_url.into(),
            token: OnceCell::new(),
        }
    }

    /// The bearer token, requested on first use.
    ///
    /// # Errors
    ///
    /// Returns an error if realm discovery or the token request fails. A
    /// failed attempt is not cached.
    pub async fn token(&self) -> BackupResult<&str> {
        self.token
            .get_or_try_init(|| self.request_token())
            .await
            .map(String::as_str)
    }

    async fn discover_realm(&self) -> BackupResult<String> {
        let url = format!("{}/_vti_bin/client.svc", self.site.as_str().trim_end_matches('/'));
        debug!(url = %url, "Discovering realm");

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, "Bearer")
            .send()
            .await
            .map_err(NetworkError::Reqwest)?;

        response
            .headers()
            .get_all(WWW_AUTHENTICATE)
            .iter()
            .filter_map(|value| value.to_str().ok())
            .find_map(parse_realm)
            .ok_or_else(|| SharePointError::RealmNotFound { url }.into())
    }

    async fn request_token(&self) -> BackupResult<String> {
        let realm = self.discover_realm().await?;
        let url = format!(
            "{}/{realm}/tokens/OAuth/2",
            self.acs_url.trim_end_matches('/')
        );
        let client_id = format!("{}@{realm}", self.client_id);
        let resource = format!("{SHAREPOINT_PRINCIPAL}/{}@{realm}", site_authority(&self.site));
        debug!(url = %url, realm = %realm, "Requesting app-only token");

        let response = self
            .client
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("resource", resource.as_str()),
            ])
            .send()
            .await
            .map_err(NetworkError::Reqwest)?;

        let status = response.status();
        let body = response.text().await.map_err(NetworkError::Reqwest)?;
        if !status.is_success() {
            return Err(SharePointError::TokenRequest {
                status: status.as_u16(),
                message: body.trim().to_string(),
            }
            .into());
        }

        let token: TokenResponse =
            serde_json::from_str(&body).map_err(|e| NetworkError::Decode {
                url,
                message: e.to_string(),
            })?;
        Ok(token.access_token)
    }
}

/// Compiled once per process.
pub(crate) fn realm_pattern() -> Option<&'static Regex> {
    static PATTERN: OnceLock<Option<Regex>> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r#"realm="([^"]+)""#).ok())
        .as_ref()
}

/// Extract `realm="..."` from a `WWW-Authenticate` challenge.
#[must_use]
pub fn parse_realm(challenge: &str) -> Option<String> {
    realm_pattern()?
        .captures(challenge)
        .and_then(|captures| captures.get(1))
        .map(|realm| realm.as_str().to_string())
}

/// `host[:port]` of the site, as ACS expects it in the resource.
#[must_use]
pub fn site_authority(site: &Url) -> String {
    let host = site.host_str().unwrap_or_default();
    match site.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}
