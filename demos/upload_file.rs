//! Upload a local file with progress output.
//!
//! Usage:
//!   OPENLOAD_API_LOGIN=... OPENLOAD_API_KEY=... \
//!     cargo run --example upload_file -- <path> [folder-id]

use openload_client::{Credentials, Openload, UploadRequest};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = std::env::args().skip(1);
    let path = args
        .next()
        .ok_or_else(|| anyhow::anyhow!("usage: upload_file <path> [folder-id]"))?;

    let login = std::env::var("OPENLOAD_API_LOGIN")?;
    let key = std::env::var("OPENLOAD_API_KEY")?;
    let client = Openload::new(Credentials::new(login, key))?;

    let mut request = UploadRequest::from_path(&path);
    if let Some(folder) = args.next() {
        request = request.folder(folder);
    }

    let uploaded = client
        .upload_with_progress(
            request,
            Box::new(|progress| {
                eprint!("\r{:>5.1}%", progress.percentage());
            }),
        )
        .await?;
    eprintln!();

    println!("uploaded {} ({} bytes)", uploaded.name, uploaded.size);
    println!("sha1: {}", uploaded.sha1);
    if let Some(url) = uploaded.url {
        println!("url: {url}");
    }

    Ok(())
}
