//! Fetch account details and list the root folder.
//!
//! Usage:
//!   OPENLOAD_API_LOGIN=... OPENLOAD_API_KEY=... cargo run --example account_info

use openload_client::{Credentials, Openload};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let login = std::env::var("OPENLOAD_API_LOGIN")?;
    let key = std::env::var("OPENLOAD_API_KEY")?;
    let client = Openload::new(Credentials::new(login, key))?;

    let account = client.account_info().await?;
    println!("account: {} ({})", account.email, account.extid);
    println!("storage used: {} bytes", account.storage_used);

    let listing = client.list_folder(None).await?;
    for folder in &listing.folders {
        println!("folder {:>8}  {}", folder.id, folder.name);
    }
    for file in &listing.files {
        println!("file   {}  {}", file.name, file.link.as_deref().unwrap_or("-"));
    }

    Ok(())
}
