//! Cached result values.

use serde::{Deserialize, Serialize};
use shelf_core::{Book, BorrowSummary};

/// A cached query result.
///
/// The list entry preserves insertion/server order; it is not sorted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum CachedValue {
    /// Result of the book-list query.
    Books(Vec<Book>),
    /// Result of a book-by-id query.
    Book(Book),
    /// Result of the borrow-summary query.
    BorrowSummary(Vec<BorrowSummary>),
}

impl CachedValue {
    pub fn as_books(&self) -> Option<&[Book]> {
        match self {
            CachedValue::Books(books) => Some(books),
            _ => None,
        }
    }

    pub fn as_book(&self) -> Option<&Book> {
        match self {
            CachedValue::Book(book) => Some(book),
            _ => None,
        }
    }

    pub fn as_borrow_summary(&self) -> Option<&[BorrowSummary]> {
        match self {
            CachedValue::BorrowSummary(rows) => Some(rows),
            _ => None,
        }
    }
}

impl From<Vec<Book>> for CachedValue {
    fn from(books: Vec<Book>) -> Self {
        CachedValue::Books(books)
    }
}

impl From<Book> for CachedValue {
    fn from(book: Book) -> Self {
        CachedValue::Book(book)
    }
}

impl From<Vec<BorrowSummary>> for CachedValue {
    fn from(rows: Vec<BorrowSummary>) -> Self {
        CachedValue::BorrowSummary(rows)
    }
}
