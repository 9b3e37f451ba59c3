// devops-backup: Azure DevOps to SharePoint backup job
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! SharePoint document library uploads over the REST API.
//!
//! ```text
//! ensure_folder(root, dir)
//!   for each cumulative segment of {root}/{dir} below the site path
//!   (a server-relative root must start with the site path):
//!     POST _api/web/folders/add('{path}')
//!
//! upload_file(root, dir, file)
//!   size <= chunk   POST .../Files/add(url='{name}',overwrite=true)  <body>
//!   size >  chunk   POST .../Files/add(url='{name}',overwrite=true)  <empty>
//!                   POST GetFileByServerRelativeUrl('{file}')/StartUpload(uploadId=guid'..')
//!                   POST ...ContinueUpload(uploadId=guid'..',fileOffset=n)   (repeated)
//!                   POST ...FinishUpload(uploadId=guid'..',fileOffset=n)
//! ```
//!
//! Every request carries the app-only bearer token from [`auth`].

pub mod auth;


use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Client, Url};
use std::path::Path;
use tokio::io::AsyncReadExt;
use tracing::{debug, info};
use uuid::Uuid;

use crate::backup::RemoteUploader;
use crate::config::SharePointConfig;
use crate::error::{BackupResult, NetworkError, SharePointError};
use auth::AppOnlyAuth;

/// Upload client for one SharePoint site.
#[derive(Debug)]
pub struct SharePointClient {
    client: Client,
    site: Url,
    auth: AppOnlyAuth,
    chunk_size: usize,
}

impl SharePointClient {
    /// Create a client from the `[sharepoint]` settings.
    ///
    /// No request is made until the first folder or upload call.
    ///
    /// # Errors
    ///
    /// Returns `NetworkError::InvalidUrl` if the site URL cannot be parsed,
    /// and `NetworkError::Reqwest` if the HTTP client cannot be built.
    pub fn new(config: &SharePointConfig) -> BackupResult<Self> {
        let site = Url::parse(config.url.trim_end_matches('/'))
            .map_err(|e| NetworkError::InvalidUrl(format!("{}: {e}", config.url)))?;
        let client = Client::builder()
            .user_agent(format!("devops-backup/{}", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(NetworkError::Reqwest)?;

        let auth = AppOnlyAuth::new(
            client.clone(),
            site.clone(),
            config.client_id.as_str(),
            config.client_secret.as_str(),
            config.acs_url.as_str(),
        );

        Ok(Self {
            client,
            site,
            auth,
            chunk_size: config.chunk_size.max(1),
        })
    }

    /// Server-relative path of a site-relative folder.
    ///
    /// `Shared Documents/Backup` on `https://contoso.sharepoint.com/sites/it`
    /// becomes `/sites/it/Shared Documents/Backup`. Paths that already start
    /// with `/` are taken as server-relative. The site path is used as it
    /// appears in the URL.
    #[must_use]
    pub fn server_relative(&self, folder: &str) -> String {
        let mut path = if folder.starts_with('/') {
            String::new()
        } else {
            self.site_prefix()
        };
        for segment in split_segments(folder) {
            path.push('/');
            path.push_str(segment);
        }
        path
    }

    /// `/sites/it` for a site collection, empty for the root site.
    fn site_prefix(&self) -> String {
        split_segments(self.site.path())
            .into_iter()
            .map(|segment| format!("/{segment}"))
            .collect()
    }

    /// Segments of `folder` below the site, the ones `folders/add` may create.
    ///
    /// Site-relative folders are taken whole. A server-relative folder must
    /// lie inside the site; its site path is dropped.
    fn segments_below_site<'a>(&self, folder: &'a str) -> BackupResult<Vec<&'a str>> {
        let segments = split_segments(folder);
        if !folder.starts_with('/') {
            return Ok(segments);
        }

        let site = split_segments(self.site.path());
        if segments.len() < site.len() || segments[..site.len()] != site[..] {
            return Err(SharePointError::FolderOutsideSite {
                folder: folder.to_string(),
                site: self.site.to_string(),
            }
            .into());
        }
        Ok(segments[site.len()..].to_vec())
    }

    fn api_url(&self, method: &str) -> String {
        format!("{}/_api/web/{method}", self.site.as_str().trim_end_matches('/'))
    }

    async fn post(&self, operation: &str, method: &str, body: Vec<u8>) -> BackupResult<()> {
        let token = self.auth.token().await?;
        let url = self.api_url(method);
        debug!(operation, url = %url, bytes = body.len(), "POST");

        let response = self
            .client
            .post(&url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header(ACCEPT, "application/json;odata=nometadata")
            .body(body)
            .send()
            .await
            .map_err(NetworkError::Reqwest)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(SharePointError::RequestFailed {
                operation: operation.to_string(),
                status: status.as_u16(),
                message: message.trim().to_string(),
            }
            .into());
        }
        Ok(())
    }

    async fn add_file(&self, folder: &str, name: &str, body: Vec<u8>) -> BackupResult<()> {
        let method = format!(
            "GetFolderByServerRelativeUrl('{}')/Files/add(url='{}',overwrite=true)",
            escape_odata(folder),
            escape_odata(name)
        );
        self.post("Files/add", &method, body).await
    }

    async fn upload_session(&self, folder: &str, name: &str, path: &Path, size: u64) -> BackupResult<()> {
        self.add_file(folder, name, Vec::new()).await?;

        let file_url = escape_odata(&format!("{folder}/{name}"));
        let upload_id = Uuid::new_v4();
        let read_failed = |source| SharePointError::ReadFailed {
            path: path.display().to_string(),
            source,
        };

        let mut file = tokio::fs::File::open(path).await.map_err(read_failed)?;
        let mut offset: u64 = 0;
        let mut chunks = 0usize;

        while offset < size {
            let mut chunk = Vec::with_capacity(self.chunk_size);
            (&mut file)
                .take(self.chunk_size as u64)
                .read_to_end(&mut chunk)
                .await
                .map_err(read_failed)?;
            if chunk.is_empty() {
                break;
            }

            let len = chunk.len() as u64;
            let (operation, method) = if offset == 0 {
                (
                    "StartUpload",
                    format!("GetFileByServerRelativeUrl('{file_url}')/StartUpload(uploadId=guid'{upload_id}')"),
                )
            } else if offset + len >= size {
                (
                    "FinishUpload",
                    format!("GetFileByServerRelativeUrl('{file_url}')/FinishUpload(uploadId=guid'{upload_id}',fileOffset={offset})"),
                )
            } else {
                (
                    "ContinueUpload",
                    format!("GetFileByServerRelativeUrl('{file_url}')/ContinueUpload(uploadId=guid'{upload_id}',fileOffset={offset})"),
                )
            };

            self.post(operation, &method, chunk).await?;
            offset += len;
            chunks += 1;
        }

        debug!(file = %path.display(), chunks, "Upload session finished");
        Ok(())
    }
}

#[async_trait]
impl RemoteUploader for SharePointClient {
    async fn ensure_folder(&self, root_dir: &str, relative_dir: &str) -> BackupResult<()> {
        let folder = join_folder(root_dir, relative_dir);
        let mut current = self.site_prefix();

        for segment in self.segments_below_site(&folder)? {
            current.push('/');
            current.push_str(segment);
            let method = format!("folders/add('{}')", escape_odata(&current));
            self.post("folders/add", &method, Vec::new()).await?;
        }
        Ok(())
    }

    async fn upload_file(
        &self,
        root_dir: &str,
        relative_dir: &str,
        file: &Path,
    ) -> BackupResult<()> {
        let folder = self.server_relative(&join_folder(root_dir, relative_dir));
        let name = file
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .ok_or_else(|| SharePointError::ReadFailed {
                path: file.display().to_string(),
                source: std::io::Error::new(std::io::ErrorKind::InvalidInput, "no file name"),
            })?;

        let size = tokio::fs::metadata(file)
            .await
            .map_err(|source| SharePointError::ReadFailed {
                path: file.display().to_string(),
                source,
            })?
            .len();

        info!(folder = %folder, name = %name, size, "Uploading to SharePoint");
        if size <= self.chunk_size as u64 {
            let body = tokio::fs::read(file)
                .await
                .map_err(|source| SharePointError::ReadFailed {
                    path: file.display().to_string(),
                    source,
                })?;
            return self.add_file(&folder, &name, body).await;
        }

        self.upload_session(&folder, &name, file, size).await
    }
}

/// `root/relative`, skipping an empty relative part.
fn join_folder(root_dir: &str, relative_dir: &str) -> String {
    if relative_dir.is_empty() {
        root_dir.to_string()
    } else {
        format!("{}/{relative_dir}", root_dir.trim_end_matches('/'))
    }
}

fn split_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Quote a value for an OData string literal inside a URL path.
///
/// Single quotes are doubled. `%`, `#` and `?` are percent-encoded so the
/// value cannot end the path early; the URL parser encodes the rest.
#[must_use]
pub fn escape_odata(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\'' => out.push_str("''"),
            '%' => out.push_str("%25"),
            '#' => out.push_str("%23"),
            '?' => out.push_str("%3F"),
            _ => out.push(c),
        }
    }
    out
}
