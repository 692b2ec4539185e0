pub mod chat;
pub mod sessions;

use anyhow::{Context, Result};
use dormchat_core::session::SessionStore;
use dormchat_infrastructure::{ApiSessionStore, BackendKind, ClientConfig, LocalSessionStore};
use std::sync::Arc;

/// Builds the configured session store backend.
pub(crate) fn build_store(config: &ClientConfig) -> Result<Arc<dyn SessionStore>> {
    match config.backend {
        BackendKind::Remote => {
            let token = ClientConfig::bearer_token()
                .context("DORMCHAT_TOKEN must be set for the remote backend")?;
            Ok(Arc::new(ApiSessionStore::new(&config.base_url, token)))
        }
        BackendKind::Local => Ok(Arc::new(LocalSessionStore::default_location()?)),
    }
}
