//! Wire types for the Openload API

use serde::{Deserialize, Deserializer, Serialize};

/// The `{status, msg, result}` wrapper around every non-upload response
#[derive(Debug, Deserialize)]
pub(crate) struct Envelope {
    #[serde(deserialize_with = "int_or_string")]
    pub status: i64,
    #[serde(default)]
    pub msg: String,
    #[serde(default)]
    pub result: serde_json::Value,
}

/// Account details from `/account/info`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct AccountInfo {
    pub extid: String,
    pub email: String,
    #[serde(default)]
    pub signup_at: Option<String>,
    /// Remaining storage in bytes, `-1` for unlimited
    #[serde(deserialize_with = "int_or_string")]
    pub storage_left: i64,
    #[serde(deserialize_with = "int_or_string")]
    pub storage_used: i64,
    #[serde(default)]
    pub traffic: Option<Traffic>,
    #[serde(default)]
    pub balance: f64,
}

/// Traffic counters nested in [`AccountInfo`]
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Traffic {
    #[serde(deserialize_with = "int_or_string")]
    pub left: i64,
    #[serde(deserialize_with = "int_or_string")]
    pub used_24h: i64,
}

/// Ticket issued by `/file/dlticket`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadTicket {
    pub ticket: String,
    /// Captcha challenge the caller must solve before requesting a link.
    /// The API sends `false` here when no captcha is required.
    #[serde(default, deserialize_with = "false_as_none")]
    pub captcha_url: Option<String>,
    #[serde(default)]
    pub captcha_w: Option<u32>,
    #[serde(default)]
    pub captcha_h: Option<u32>,
    #[serde(default)]
    pub wait_time: Option<u32>,
    #[serde(default)]
    pub valid_until: Option<String>,
}

impl DownloadTicket {
    /// Whether a captcha must be solved before the link request
    pub fn requires_captcha(&self) -> bool {
        self.captcha_url.is_some()
    }
}

/// Direct download link from `/file/dl`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct DownloadLink {
    pub name: String,
    #[serde(deserialize_with = "int_or_string")]
    pub size: i64,
    pub sha1: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub upload_at: Option<String>,
    pub url: String,
    #[serde(default)]
    pub token: Option<String>,
}

/// Outcome of the combined ticket-then-link flow
#[derive(Clone, Debug)]
pub enum Download {
    /// A direct link was retrieved
    Link(DownloadLink),
    /// The ticket carries a captcha challenge; no link request was made
    CaptchaRequired(DownloadTicket),
}

/// Per-file status from `/file/info`. Fields other than `id` and `status`
/// come back as `false` when the file does not exist.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FileStatus {
    pub id: String,
    pub status: i64,
    #[serde(default, deserialize_with = "false_as_none")]
    pub name: Option<String>,
    #[serde(default, deserialize_with = "false_as_none")]
    pub size: Option<u64>,
    #[serde(default, deserialize_with = "false_as_none")]
    pub sha1: Option<String>,
    #[serde(default, deserialize_with = "false_as_none")]
    pub content_type: Option<String>,
}

/// A subfolder entry from `/file/listfolder`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Folder {
    pub id: String,
    pub name: String,
}

/// A file entry from `/file/listfolder`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct FolderFile {
    pub name: String,
    #[serde(default)]
    pub sha1: Option<String>,
    #[serde(rename = "folderid", default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub upload_at: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub size: Option<String>,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub download_count: Option<String>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(rename = "linkextid", default)]
    pub link_ext_id: Option<String>,
}

/// Contents of one folder
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FolderListing {
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub files: Vec<FolderFile>,
}

/// Parameters for queueing a remote-URL upload
#[derive(Clone, Debug, Default)]
pub struct RemoteUploadRequest {
    pub url: String,
    pub folder: Option<String>,
    pub headers: Option<String>,
}

impl RemoteUploadRequest {
    /// Queue the given URL for server-side download
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..Default::default()
        }
    }

    /// Target folder ID
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    /// Extra request headers the remote download should send, one per line
    pub fn headers(mut self, headers: impl Into<String>) -> Self {
        self.headers = Some(headers.into());
        self
    }
}

/// Accepted remote-upload job from `/remotedl/add`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteUpload {
    pub id: String,
    #[serde(rename = "folderid", default)]
    pub folder_id: Option<String>,
}

/// Remote-upload job state from `/remotedl/status`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RemoteUploadStatus {
    #[serde(deserialize_with = "int_or_string")]
    pub id: i64,
    #[serde(rename = "remoteurl")]
    pub remote_url: String,
    pub status: String,
    #[serde(default, deserialize_with = "false_as_none")]
    pub bytes_loaded: Option<String>,
    #[serde(default, deserialize_with = "false_as_none")]
    pub bytes_total: Option<String>,
    #[serde(rename = "folderid", default)]
    pub folder_id: Option<String>,
    #[serde(default)]
    pub added: Option<String>,
    #[serde(default)]
    pub last_update: Option<String>,
    /// File ID of the finished download, `false` until it completes
    #[serde(default, deserialize_with = "false_as_none")]
    pub extid: Option<String>,
    #[serde(default, deserialize_with = "false_as_none")]
    pub url: Option<String>,
}

/// Single-use upload target from `/file/ul`
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadTicket {
    pub url: String,
    #[serde(default)]
    pub valid_until: Option<String>,
}

/// Result of a completed upload
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UploadedFile {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "int_or_string")]
    pub size: i64,
    pub sha1: String,
    #[serde(default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// The API emits some integers as JSON strings
pub(crate) fn int_or_string<'de, D>(deserializer: D) -> std::result::Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Int(i64),
        Str(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Int(value) => Ok(value),
        Raw::Str(value) => value.trim().parse().map_err(serde::de::Error::custom),
    }
}

/// The API uses a literal `false` for fields with no value
fn false_as_none<'de, D, T>(deserializer: D) -> std::result::Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Sentinel<T> {
        Value(T),
        Missing(#[allow(dead_code)] bool),
    }

    Ok(match Option::<Sentinel<T>>::deserialize(deserializer)? {
        Some(Sentinel::Value(value)) => Some(value),
        _ => None,
    })
}
