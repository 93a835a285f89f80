//! Queue a remote URL for server-side download and poll until it settles.
//!
//! Usage:
//!   OPENLOAD_API_LOGIN=... OPENLOAD_API_KEY=... \
//!     cargo run --example remote_upload -- <url>

use openload_client::{Credentials, Openload, RemoteUploadRequest};
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let url = std::env::args()
        .nth(1)
        .ok_or_else(|| anyhow::anyhow!("usage: remote_upload <url>"))?;

    let login = std::env::var("OPENLOAD_API_LOGIN")?;
    let key = std::env::var("OPENLOAD_API_KEY")?;
    let client = Openload::new(Credentials::new(login, key))?;

    let job = client.remote_upload(RemoteUploadRequest::new(url)).await?;
    println!("queued remote upload {}", job.id);

    loop {
        tokio::time::sleep(Duration::from_secs(2)).await;
        let jobs = client.remote_upload_status(None, Some(job.id.as_str())).await?;
        let Some(status) = jobs.get(&job.id) else {
            anyhow::bail!("job {} disappeared from the status listing", job.id);
        };
        println!(
            "status: {} ({}/{} bytes)",
            status.status,
            status.bytes_loaded.as_deref().unwrap_or("0"),
            status.bytes_total.as_deref().unwrap_or("?"),
        );
        if status.status == "finished" || status.status == "error" {
            if let Some(file_url) = &status.url {
                println!("file: {file_url}");
            }
            break;
        }
    }

    Ok(())
}
