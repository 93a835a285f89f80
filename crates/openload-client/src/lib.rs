//! # Openload client SDK
//!
//! An async client for the Openload file-hosting HTTP API: account info,
//! file and folder management, download-ticket retrieval, remote-URL
//! uploads, and local file/buffer uploads.
//!
//! ## Features
//!
//! - **Typed endpoints**: one method per API operation, each returning a
//!   deserialized result or a discriminable [`Error`]
//! - **Streaming uploads**: file payloads stream from disk through SHA-1
//!   hashing and the multipart POST without being buffered in memory
//! - **Progress reporting**: an optional per-chunk observer for uploads
//!
//! ## Example
//!
//! ```rust,ignore
//! use openload_client::{Credentials, Openload, UploadRequest};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let client = Openload::new(Credentials::new("api-login", "api-key"))?;
//!
//!     let account = client.account_info().await?;
//!     println!("logged in as {}", account.email);
//!
//!     let uploaded = client
//!         .upload(UploadRequest::from_path("video.mp4"))
//!         .await?;
//!     println!("uploaded {} ({} bytes)", uploaded.name, uploaded.size);
//!
//!     Ok(())
//! }
//! ```

mod client;
mod config;
mod error;
mod hash;
mod types;
mod upload;

pub use client::{Openload, MAX_BATCH_IDS};
pub use config::{Config, Credentials, DEFAULT_ENDPOINT};
pub use error::{Error, Result};
pub use hash::sha1_hex;
pub use types::*;
pub use upload::{Payload, ProgressCallback, UploadProgress, UploadRequest};
