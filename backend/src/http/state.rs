//! Application state for the HTTP server.

use std::sync::Arc;

use super::config::ServerConfig;
use crate::db::repository::FullRepository;
use crate::services::SubscriptionRegistry;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for record queries
    pub repository: Arc<dyn FullRepository>,
    /// Live WebSocket subscriptions
    pub subscriptions: SubscriptionRegistry,
    pub config: Arc<ServerConfig>,
}

impl AppState {
    /// Create a new application state with the given repository and default settings.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        Self::with_config(repository, ServerConfig::default())
    }

    pub fn with_config(repository: Arc<dyn FullRepository>, config: ServerConfig) -> Self {
        Self {
            repository,
            subscriptions: SubscriptionRegistry::new(),
            config: Arc::new(config),
        }
    }
}
