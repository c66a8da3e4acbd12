//! Application state shared across all request handlers.

use std::sync::Arc;

use khabar_core::ContentStore;

use crate::config::Config;

/// Shared application state available to all request handlers.
#[derive(Clone, Debug)]
pub struct AppState {
    /// Content store client.
    pub store: ContentStore,

    /// Application configuration.
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new application state from configuration and a store handle.
    pub fn new(config: Config, store: ContentStore) -> Self {
        tracing::info!(store = ?store, "application state initialized");

        Self {
            store,
            config: Arc::new(config),
        }
    }
}
