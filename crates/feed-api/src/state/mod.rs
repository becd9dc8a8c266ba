//! Application state
//!
//! Holds the shared state for the Axum application: the service context, the
//! configuration and the server-wide shutdown token.

use std::sync::Arc;

use feed_common::AppConfig;
use feed_service::ServiceContext;
use tokio_util::sync::CancellationToken;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    service_context: Arc<ServiceContext>,
    config: Arc<AppConfig>,
    shutdown: CancellationToken,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service_context: ServiceContext, config: AppConfig) -> Self {
        Self {
            service_context: Arc::new(service_context),
            config: Arc::new(config),
            shutdown: CancellationToken::new(),
        }
    }

    /// Get the service context
    pub fn service_context(&self) -> &ServiceContext {
        &self.service_context
    }

    /// Get the application configuration
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Token cancelled when the server begins shutting down
    pub fn shutdown(&self) -> &CancellationToken {
        &self.shutdown
    }

    /// Token for one live stream; fires on server shutdown
    pub fn stream_token(&self) -> CancellationToken {
        self.shutdown.child_token()
    }
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("service_context", &"ServiceContext")
            .field("config", &"AppConfig")
            .field("shutting_down", &self.shutdown.is_cancelled())
            .finish()
    }
}
