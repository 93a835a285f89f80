//! Local file and buffer uploads
//!
//! The pipeline runs in strict order: validate the request, hash the
//! payload, fetch a single-use upload ticket, then stream a multipart
//! POST to the ticket's URL. Any failure aborts the whole upload; the
//! caller re-invokes from scratch.

use crate::client::Openload;
use crate::error::{Error, Result};
use crate::hash;
use crate::types::{Envelope, UploadTicket, UploadedFile};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use std::path::PathBuf;
use tokio_util::io::ReaderStream;
use tracing::debug;

/// Field name of the file part, fixed by the remote protocol.
const FILE_FIELD: &str = "file1";

/// Fallback when a path payload's content type cannot be guessed.
const OCTET_STREAM: &str = "application/octet-stream";

/// Chunk size for streaming the multipart body
const STREAM_CHUNK: usize = 64 * 1024;

/// Progress callback type
pub type ProgressCallback = Box<dyn Fn(UploadProgress) + Send + Sync>;

/// Upload progress, reported once per streamed chunk
#[derive(Clone, Copy, Debug)]
pub struct UploadProgress {
    /// Bytes uploaded so far
    pub bytes_uploaded: u64,
    /// Total bytes to upload
    pub total_bytes: u64,
}

impl UploadProgress {
    /// Get percentage complete
    pub fn percentage(&self) -> f64 {
        if self.total_bytes == 0 {
            return 100.0;
        }
        (self.bytes_uploaded as f64 / self.total_bytes as f64) * 100.0
    }
}

/// Upload payload: a file on disk or an in-memory buffer
#[derive(Clone, Debug)]
pub enum Payload {
    /// Stream the file at this path from disk
    Path(PathBuf),
    /// Upload an in-memory buffer
    Buffer(Bytes),
}

/// A pending upload, built with the `from_*` constructors
#[derive(Clone, Debug)]
pub struct UploadRequest {
    payload: Payload,
    filename: Option<String>,
    content_type: Option<String>,
    folder: Option<String>,
}

impl UploadRequest {
    /// Upload the file at `path`. A missing file name or content type is
    /// derived from the path itself.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        Self {
            payload: Payload::Path(path.into()),
            filename: None,
            content_type: None,
            folder: None,
        }
    }

    /// Upload an in-memory buffer. Buffer payloads require both
    /// [`file_name`](Self::file_name) and [`content_type`](Self::content_type);
    /// the API cannot infer them.
    pub fn from_buffer(data: impl Into<Bytes>) -> Self {
        Self {
            payload: Payload::Buffer(data.into()),
            filename: None,
            content_type: None,
            folder: None,
        }
    }

    /// File name reported to the API
    pub fn file_name(mut self, name: impl Into<String>) -> Self {
        self.filename = Some(name.into());
        self
    }

    /// Content type of the file part
    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    /// Target folder ID
    pub fn folder(mut self, folder: impl Into<String>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub(crate) fn payload(&self) -> &Payload {
        &self.payload
    }

    fn validate(&self) -> Result<()> {
        if matches!(self.payload, Payload::Buffer(_))
            && (self.filename.is_none() || self.content_type.is_none())
        {
            return Err(Error::validation(
                "buffer payloads require both a file name and a content type",
            ));
        }
        Ok(())
    }

    fn part_file_name(&self) -> Result<String> {
        if let Some(name) = &self.filename {
            return Ok(name.clone());
        }
        match &self.payload {
            Payload::Path(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .ok_or_else(|| Error::validation("upload path has no file name component")),
            Payload::Buffer(_) => Err(Error::validation("buffer payloads require a file name")),
        }
    }

    fn part_content_type(&self) -> Result<String> {
        if let Some(content_type) = &self.content_type {
            return Ok(content_type.clone());
        }
        match &self.payload {
            Payload::Path(path) => Ok(mime_guess::from_path(path)
                .first_raw()
                .map(str::to_owned)
                .unwrap_or_else(|| OCTET_STREAM.to_string())),
            Payload::Buffer(_) => Err(Error::validation("buffer payloads require a content type")),
        }
    }

    /// Turn the payload into a streaming request body with a known length
    async fn into_body(self, progress: Option<ProgressCallback>) -> Result<(reqwest::Body, u64)> {
        match self.payload {
            Payload::Buffer(bytes) => {
                let total_bytes = bytes.len() as u64;
                let mut chunks = Vec::with_capacity(bytes.len() / STREAM_CHUNK + 1);
                let mut offset = 0;
                while offset < bytes.len() {
                    let end = usize::min(offset + STREAM_CHUNK, bytes.len());
                    chunks.push(bytes.slice(offset..end));
                    offset = end;
                }
                let stream = futures::stream::iter(chunks.into_iter().map(Ok::<_, std::io::Error>));
                Ok((track_progress(stream, total_bytes, progress), total_bytes))
            }
            Payload::Path(path) => {
                let file = tokio::fs::File::open(&path).await?;
                let total_bytes = file.metadata().await?.len();
                let stream = ReaderStream::with_capacity(file, STREAM_CHUNK);
                Ok((track_progress(stream, total_bytes, progress), total_bytes))
            }
        }
    }
}

/// Wrap a chunk stream so the observer fires after every chunk. The
/// callback is purely observational; it never pauses the transfer.
fn track_progress<S>(
    stream: S,
    total_bytes: u64,
    progress: Option<ProgressCallback>,
) -> reqwest::Body
where
    S: Stream<Item = std::io::Result<Bytes>> + Send + 'static,
{
    let mut bytes_uploaded = 0u64;
    let stream = stream.map(move |chunk| {
        if let Ok(chunk) = &chunk {
            bytes_uploaded += chunk.len() as u64;
            if let Some(callback) = &progress {
                callback(UploadProgress {
                    bytes_uploaded,
                    total_bytes,
                });
            }
        }
        chunk
    });
    reqwest::Body::wrap_stream(stream)
}

/// Run the upload pipeline. The multipart POST goes straight to the
/// ticket URL, outside the enveloped gateway.
pub(crate) async fn run(
    client: &Openload,
    request: UploadRequest,
    progress: Option<ProgressCallback>,
) -> Result<UploadedFile> {
    request.validate()?;

    let sha1 = hash::sha1_hex(request.payload()).await?;
    debug!(%sha1, "hashed upload payload");

    let mut params: Vec<(&str, String)> = vec![("sha1", sha1)];
    if let Some(folder) = &request.folder {
        params.push(("folder", folder.clone()));
    }
    let ticket: UploadTicket = client.get("/file/ul", &params).await?;
    debug!(url = %ticket.url, "obtained upload ticket");

    let file_name = request.part_file_name()?;
    let content_type = request.part_content_type()?;
    let (body, total_bytes) = request.into_body(progress).await?;

    let part = reqwest::multipart::Part::stream_with_length(body, total_bytes)
        .file_name(file_name)
        .mime_str(&content_type)?;
    let form = reqwest::multipart::Form::new().part(FILE_FIELD, part);

    let response = client.http().post(&ticket.url).multipart(form).send().await?;
    let text = response.text().await?;
    if text.is_empty() {
        return Err(Error::EmptyResponse);
    }
    parse_upload_response(&text)
}

fn parse_upload_response(body: &str) -> Result<UploadedFile> {
    let envelope: Envelope = serde_json::from_str(body)?;
    if envelope.status != 200 {
        return Err(Error::Api {
            status: envelope.status,
            message: envelope.msg,
        });
    }
    Ok(serde_json::from_value(envelope.result)?)
}
