//! Openload API client

use crate::config::{Config, Credentials};
use crate::error::{Error, Result};
use crate::types::*;
use crate::upload::{self, ProgressCallback, UploadRequest};
use futures::future::join_all;
use reqwest::Method;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use tracing::{debug, instrument};

/// Largest number of file IDs accepted by a single batch operation
pub const MAX_BATCH_IDS: usize = 49;

/// Openload API client
///
/// One method per remote operation; each validates its arguments before
/// any request is sent. The client is cheap to share by reference across
/// tasks, and concurrent calls never contend on shared mutable state.
#[derive(Debug)]
pub struct Openload {
    credentials: Credentials,
    config: Config,
    http: reqwest::Client,
}

impl Openload {
    /// Create a new client with the default configuration
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, Config::default())
    }

    /// Create a new client with the given configuration
    pub fn with_config(credentials: Credentials, config: Config) -> Result<Self> {
        if credentials.login().is_empty() || credentials.key().is_empty() {
            return Err(Error::validation("both login and key must be provided"));
        }

        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;

        Ok(Self {
            credentials,
            config,
            http,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    // ==================== Account ====================

    /// Fetch account details for the configured credentials
    #[instrument(skip(self))]
    pub async fn account_info(&self) -> Result<AccountInfo> {
        self.get("/account/info", &[]).await
    }

    // ==================== Downloads ====================

    /// Request a download ticket for a single file ID
    #[instrument(skip(self))]
    pub async fn download_ticket(&self, file: &str) -> Result<DownloadTicket> {
        let file = single_file_id(file)?;
        self.get("/file/dlticket", &[("file", file.to_string())])
            .await
    }

    /// Exchange a ticket for a direct download link
    #[instrument(skip(self))]
    pub async fn download_link(&self, file: &str, ticket: &str) -> Result<DownloadLink> {
        if file.trim().is_empty() || ticket.trim().is_empty() {
            return Err(Error::validation("both file and ticket must be specified"));
        }
        self.get(
            "/file/dl",
            &[("file", file.to_string()), ("ticket", ticket.to_string())],
        )
        .await
    }

    /// Combined ticket-then-link flow. When the ticket carries a captcha
    /// challenge the flow stops early and no link request is made.
    #[instrument(skip(self))]
    pub async fn download(&self, file: &str) -> Result<Download> {
        let ticket = self.download_ticket(file).await?;
        if ticket.requires_captcha() {
            return Ok(Download::CaptchaRequired(ticket));
        }
        let link = self.download_link(file, &ticket.ticket).await?;
        Ok(Download::Link(link))
    }

    // ==================== Files & folders ====================

    /// Fetch status for up to [`MAX_BATCH_IDS`] files in one request
    #[instrument(skip(self, files))]
    pub async fn file_info<S: AsRef<str>>(
        &self,
        files: &[S],
    ) -> Result<HashMap<String, FileStatus>> {
        let ids = batch_file_ids(files)?;
        self.get("/file/info", &[("file", ids.join(","))]).await
    }

    /// Delete up to [`MAX_BATCH_IDS`] files. One request per ID, issued
    /// concurrently and joined without short-circuiting; the returned
    /// results are in input order so the caller decides how to interpret
    /// partial failure.
    #[instrument(skip(self, files))]
    pub async fn delete_files<S: AsRef<str>>(&self, files: &[S]) -> Result<Vec<Result<bool>>> {
        let ids = batch_file_ids(files)?;
        let deletions = ids
            .into_iter()
            .map(|id| async move { self.get::<bool>("/file/delete", &[("file", id)]).await });
        Ok(join_all(deletions).await)
    }

    /// List a folder's subfolders and files, or the account root when
    /// `folder` is `None`
    #[instrument(skip(self))]
    pub async fn list_folder(&self, folder: Option<&str>) -> Result<FolderListing> {
        let mut params = Vec::new();
        if let Some(folder) = folder {
            params.push(("folder", folder.to_string()));
        }
        self.get("/file/listfolder", &params).await
    }

    // ==================== Remote uploads ====================

    /// Queue a remote URL for server-side download into the account
    #[instrument(skip(self, request))]
    pub async fn remote_upload(&self, request: RemoteUploadRequest) -> Result<RemoteUpload> {
        if request.url.trim().is_empty() {
            return Err(Error::validation("no remote URL specified"));
        }
        let mut params = vec![("url", request.url.clone())];
        if let Some(folder) = &request.folder {
            params.push(("folder", folder.clone()));
        }
        if let Some(headers) = &request.headers {
            params.push(("headers", headers.clone()));
        }
        self.get("/remotedl/add", &params).await
    }

    /// Poll remote-upload jobs, optionally narrowed to one job ID or
    /// capped at `limit` results
    #[instrument(skip(self))]
    pub async fn remote_upload_status(
        &self,
        limit: Option<u32>,
        id: Option<&str>,
    ) -> Result<HashMap<String, RemoteUploadStatus>> {
        let mut params = Vec::new();
        if let Some(limit) = limit {
            params.push(("limit", limit.to_string()));
        }
        if let Some(id) = id {
            params.push(("id", id.to_string()));
        }
        self.get("/remotedl/status", &params).await
    }

    // ==================== Uploads ====================

    /// Upload a local file or buffer
    #[instrument(skip(self, request))]
    pub async fn upload(&self, request: UploadRequest) -> Result<UploadedFile> {
        upload::run(self, request, None).await
    }

    /// Upload with a synchronous per-chunk progress observer
    #[instrument(skip(self, request, progress))]
    pub async fn upload_with_progress(
        &self,
        request: UploadRequest,
        progress: ProgressCallback,
    ) -> Result<UploadedFile> {
        upload::run(self, request, Some(progress)).await
    }

    // ==================== Gateway ====================

    pub(crate) async fn get<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        self.request(Method::GET, path, params).await
    }

    /// Send one enveloped API request and unwrap its `result`. Credentials
    /// ride on the query string for GET and in the form body for POST.
    pub(crate) async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let url = format!(
            "{}{}{}",
            self.config.endpoint,
            self.config.location_prefix(),
            path
        );
        let mut pairs: Vec<(&str, String)> = vec![
            ("login", self.credentials.login().to_string()),
            ("key", self.credentials.key().to_string()),
        ];
        pairs.extend(params.iter().map(|(key, value)| (*key, value.clone())));

        let request = if method == Method::POST {
            self.http.post(&url).form(&pairs)
        } else {
            self.http.request(method.clone(), &url).query(&pairs)
        };

        debug!(%method, %url, "sending api request");
        let response = request.send().await?;
        let envelope: Envelope = response.json().await?;
        debug!(api_status = envelope.status, "api response");

        if envelope.status != 200 {
            return Err(Error::Api {
                status: envelope.status,
                message: envelope.msg,
            });
        }
        Ok(serde_json::from_value(envelope.result)?)
    }
}

fn single_file_id(file: &str) -> Result<&str> {
    let file = file.trim();
    if file.is_empty() {
        return Err(Error::validation("no file ID specified"));
    }
    if file.contains(',') {
        return Err(Error::validation(
            "only one file ID allowed, make sure to only include the file ID",
        ));
    }
    Ok(file)
}

fn batch_file_ids<S: AsRef<str>>(files: &[S]) -> Result<Vec<String>> {
    if files.is_empty() {
        return Err(Error::validation("no file IDs specified"));
    }
    if files.len() > MAX_BATCH_IDS {
        return Err(Error::validation(format!(
            "at most {MAX_BATCH_IDS} file IDs allowed per batch, got {}",
            files.len()
        )));
    }
    Ok(files
        .iter()
        .map(|file| file.as_ref().trim().to_string())
        .collect())
}
