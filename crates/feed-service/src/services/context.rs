//! Service context - dependency container for services
//!
//! Holds the post repository, the event bus, and the presence store.

use std::sync::Arc;

use feed_core::traits::PostRepository;
use feed_realtime::{EventBus, PresenceStore};

use super::error::{ServiceError, ServiceResult};

/// Service context containing all dependencies
///
/// Cheap to clone. The bus and presence store are shared by every clone, so
/// one context built at startup serves the whole process.
#[derive(Clone)]
pub struct ServiceContext {
    post_repo: Arc<dyn PostRepository>,
    bus: EventBus,
    presence: PresenceStore,
}

impl ServiceContext {
    /// Create a new service context with all dependencies
    pub fn new(post_repo: Arc<dyn PostRepository>, bus: EventBus, presence: PresenceStore) -> Self {
        Self {
            post_repo,
            bus,
            presence,
        }
    }

    /// Get the post repository
    pub fn post_repo(&self) -> &dyn PostRepository {
        self.post_repo.as_ref()
    }

    /// Get the event bus
    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    /// Get the presence store
    pub fn presence(&self) -> &PresenceStore {
        &self.presence
    }
}

impl std::fmt::Debug for ServiceContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ServiceContext")
            .field("post_repo", &"...")
            .field("bus", &self.bus)
            .field("presence", &self.presence.len())
            .finish()
    }
}

/// Builder for creating ServiceContext with custom configuration
#[derive(Default)]
pub struct ServiceContextBuilder {
    post_repo: Option<Arc<dyn PostRepository>>,
    bus: Option<EventBus>,
    presence: Option<PresenceStore>,
}

impl ServiceContextBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn post_repo(mut self, repo: Arc<dyn PostRepository>) -> Self {
        self.post_repo = Some(repo);
        self
    }

    pub fn bus(mut self, bus: EventBus) -> Self {
        self.bus = Some(bus);
        self
    }

    pub fn presence(mut self, presence: PresenceStore) -> Self {
        self.presence = Some(presence);
        self
    }

    /// Build the ServiceContext
    ///
    /// A fresh bus and presence store are created when none were given.
    ///
    /// # Errors
    /// Returns `ServiceError::Internal` if the post repository is missing
    pub fn build(self) -> ServiceResult<ServiceContext> {
        Ok(ServiceContext::new(
            self.post_repo
                .ok_or_else(|| ServiceError::internal("post_repo is required"))?,
            self.bus.unwrap_or_default(),
            self.presence.unwrap_or_default(),
        ))
    }
}
