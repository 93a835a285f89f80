//! SHA-1 content hashing for upload payloads

use crate::error::Result;
use crate::upload::Payload;
use sha1::{Digest, Sha1};
use tokio::io::AsyncReadExt;

const READ_CHUNK: usize = 64 * 1024;

/// Hex-encoded SHA-1 digest of the payload bytes.
///
/// File payloads stream through the digest in fixed-size chunks without
/// being loaded into memory; buffers hash in place. Identical bytes yield
/// the identical digest either way.
pub async fn sha1_hex(payload: &Payload) -> Result<String> {
    match payload {
        Payload::Buffer(bytes) => Ok(hex::encode(Sha1::digest(bytes))),
        Payload::Path(path) => {
            let mut file = tokio::fs::File::open(path).await?;
            let mut hasher = Sha1::new();
            let mut buf = vec![0u8; READ_CHUNK];
            loop {
                let n = file.read(&mut buf).await?;
                if n == 0 {
                    break;
                }
                hasher.update(&buf[..n]);
            }
            Ok(hex::encode(hasher.finalize()))
        }
    }
}
