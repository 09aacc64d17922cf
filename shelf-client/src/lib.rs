//! REST transport and optimistic cache synchronizer for shelf.
//!
//! The client speculatively applies each book mutation to the cache before
//! the network round-trip completes, then reconciles with the authoritative
//! server response or rolls the edit back on failure. Read-side queries
//! populate the same cache and honor the staleness marks that successful
//! mutations leave behind.

pub mod client;
pub mod config;
pub mod error;
pub mod notifications;
pub mod queries;
pub mod sync;
pub mod transport;
pub mod types;

pub use client::ShelfClient;
pub use config::{ClientConfig, ConfigError};
pub use error::ClientError;
pub use notifications::{Notification, NotificationHub, NotificationLevel};
pub use sync::SyncError;
pub use transport::{HttpTransport, Transport, TransportError};
