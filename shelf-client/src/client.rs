//! Client composition: cache store, transport, and notification hub.

use std::sync::Arc;

use shelf_cache::CacheStore;

use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::notifications::NotificationHub;
use crate::transport::{HttpTransport, Transport};

/// Handle to the library-management service and its client-side cache.
///
/// Cloning yields another handle over the same cache and transport, so
/// queries and mutations issued anywhere in the application observe one
/// consistent store.
#[derive(Clone)]
pub struct ShelfClient {
    pub(crate) store: CacheStore,
    pub(crate) transport: Arc<dyn Transport>,
    pub(crate) notifications: NotificationHub,
}

impl ShelfClient {
    pub fn new(config: &ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = HttpTransport::new(config)?;
        Ok(Self::with_transport(Arc::new(transport)))
    }

    /// Build over an injected transport with a fresh cache.
    pub fn with_transport(transport: Arc<dyn Transport>) -> Self {
        Self::with_store_and_transport(CacheStore::new(), transport)
    }

    /// Build over an injected cache store and transport. The store is the
    /// only state the client mutates, so sharing or pre-seeding one is
    /// explicit here rather than hidden in a global.
    pub fn with_store_and_transport(store: CacheStore, transport: Arc<dyn Transport>) -> Self {
        Self {
            store,
            transport,
            notifications: NotificationHub::new(),
        }
    }

    /// The cache the UI renders from. Reads and subscriptions only; all
    /// writes flow through the client's queries and mutations.
    pub fn store(&self) -> &CacheStore {
        &self.store
    }

    pub fn notifications(&self) -> &NotificationHub {
        &self.notifications
    }
}
