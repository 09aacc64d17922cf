//! Borrow transaction types.

use crate::identity::Timestamp;
use serde::{Deserialize, Serialize};

/// A borrow transaction against a persisted book.
///
/// Serialized with the server's camelCase field spellings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Borrow {
    /// Server id of the borrowed book.
    pub book: String,
    pub quantity: u32,
    pub due_date: Timestamp,
}

impl Borrow {
    pub fn new(book: impl Into<String>, quantity: u32, due_date: Timestamp) -> Self {
        Self {
            book: book.into(),
            quantity,
            due_date,
        }
    }
}

/// Minimal book reference carried by a borrow summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BorrowedBookRef {
    pub title: String,
    pub isbn: String,
}

/// Aggregated borrow count per book, as reported by the server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BorrowSummary {
    pub book: BorrowedBookRef,
    pub total_quantity: u32,
}
