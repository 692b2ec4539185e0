//! Non-interactive session maintenance.

use anyhow::Result;
use chrono::Utc;
use dormchat_core::view;
use dormchat_infrastructure::ClientConfig;

pub async fn list() -> Result<()> {
    let config = ClientConfig::load();
    let store = super::build_store(&config)?;
    let summaries = store.list_sessions().await?;
    if summaries.is_empty() {
        println!("No sessions.");
    } else {
        print!("{}", view::render_sidebar(&summaries, None, Utc::now()));
    }
    Ok(())
}

pub async fn clear() -> Result<()> {
    let config = ClientConfig::load();
    let store = super::build_store(&config)?;
    store.delete_all_sessions().await?;
    println!("All sessions deleted.");
    Ok(())
}
