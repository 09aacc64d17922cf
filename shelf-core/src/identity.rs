//! Identity types for shelf entities

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Timestamp type using UTC timezone.
pub type Timestamp = chrono::DateTime<chrono::Utc>;

/// Placeholder identity for a book that has not been persisted yet.
///
/// Uses UUIDv7 so tokens are timestamp-sortable and unique per create call.
/// A token is captured when the mutation is dispatched and carried through
/// to reconciliation; matching is always by token equality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TempToken(Uuid);

impl TempToken {
    /// Generate a fresh UUIDv7 token.
    pub fn now_v7() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for TempToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "temp-{}", self.0)
    }
}

/// Identity of a book record.
///
/// Persisted books carry the server-assigned id; records awaiting server
/// confirmation carry a [`TempToken`]. The two namespaces are distinct enum
/// variants, so a placeholder can never collide with a real server id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BookId {
    /// Server-assigned identifier. Always non-empty for persisted records.
    Persisted(String),
    /// Placeholder for a record awaiting server confirmation.
    Temporary(TempToken),
}

impl BookId {
    pub fn persisted(id: impl Into<String>) -> Self {
        BookId::Persisted(id.into())
    }

    pub fn is_temporary(&self) -> bool {
        matches!(self, BookId::Temporary(_))
    }

    /// The server id, if this record has been persisted.
    pub fn as_server_id(&self) -> Option<&str> {
        match self {
            BookId::Persisted(id) => Some(id.as_str()),
            BookId::Temporary(_) => None,
        }
    }
}

impl fmt::Display for BookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookId::Persisted(id) => write!(f, "{}", id),
            BookId::Temporary(token) => write!(f, "{}", token),
        }
    }
}

impl From<TempToken> for BookId {
    fn from(token: TempToken) -> Self {
        BookId::Temporary(token)
    }
}
