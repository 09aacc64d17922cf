//! Query identity keys for cached results.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of a cached query result.
///
/// Keys are typed rather than stringly so a lookup cannot be constructed
/// from a malformed string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QueryKey {
    /// The full book list.
    Books,
    /// A single book by its server id.
    BookById(String),
    /// Aggregated borrow counts per book.
    BorrowSummary,
}

impl QueryKey {
    pub fn book(id: impl Into<String>) -> Self {
        QueryKey::BookById(id.into())
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QueryKey::Books => write!(f, "books"),
            QueryKey::BookById(id) => write!(f, "books/{}", id),
            QueryKey::BorrowSummary => write!(f, "borrow-summary"),
        }
    }
}
