//! Test utilities, generators, and fixtures for shelf.
//!
//! Proptest strategies generate realistic catalog data (titles, authors,
//! ISBNs, field updates) and fixtures seed cache stores for synchronizer
//! tests.

use proptest::prelude::*;
use shelf_cache::{CacheStore, QueryKey};
use shelf_core::{Book, BookDraft, BookFields, BookId, Genre};

// ============================================================================
// PROPERTY TEST STRATEGIES
// ============================================================================

pub fn genre_strategy() -> impl Strategy<Value = Genre> {
    prop_oneof![
        Just(Genre::Fiction),
        Just(Genre::NonFiction),
        Just(Genre::Science),
        Just(Genre::History),
        Just(Genre::Biography),
        Just(Genre::Fantasy),
    ]
}

/// Realistic book titles with various patterns, including edge cases.
pub fn title_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        // Single word
        "[A-Z][a-z]{2,12}",
        // Multi-word title
        "[A-Z][a-z]{2,10}( [a-z]{2,10}){1,3}",
        // Edge case: single character
        Just("Q".to_string()),
        // Edge case: long title
        "[A-Z][a-z ]{40,80}",
    ]
}

pub fn author_strategy() -> impl Strategy<Value = String> {
    "[A-Z][a-z]{2,10} [A-Z][a-z]{2,12}"
}

/// ISBN-13 shaped strings.
pub fn isbn_strategy() -> impl Strategy<Value = String> {
    "97[89][0-9]{10}"
}

/// Server-id shaped strings (hex, like MongoDB object ids).
pub fn server_id_strategy() -> impl Strategy<Value = String> {
    "[0-9a-f]{24}"
}

pub fn draft_strategy() -> impl Strategy<Value = BookDraft> {
    (
        title_strategy(),
        author_strategy(),
        genre_strategy(),
        isbn_strategy(),
        prop::option::of("[A-Z][a-z ]{5,40}\\."),
        0u32..500,
        any::<bool>(),
    )
        .prop_map(|(title, author, genre, isbn, description, copies, available)| {
            let mut draft = BookDraft::new(title, author, genre, isbn, copies);
            draft.description = description;
            draft.available = available;
            draft
        })
}

pub fn book_strategy() -> impl Strategy<Value = Book> {
    (server_id_strategy(), draft_strategy())
        .prop_map(|(id, draft)| Book::from_draft(draft, BookId::persisted(id)))
}

/// Book lists with unique server ids, like a real list query result.
pub fn book_list_strategy(max_len: usize) -> impl Strategy<Value = Vec<Book>> {
    prop::collection::vec(book_strategy(), 0..max_len).prop_map(|mut books| {
        books.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string()));
        books.dedup_by(|a, b| a.id == b.id);
        books
    })
}

/// Partial updates touching a random subset of fields.
pub fn fields_strategy() -> impl Strategy<Value = BookFields> {
    (
        prop::option::of(title_strategy()),
        prop::option::of(author_strategy()),
        prop::option::of(genre_strategy()),
        prop::option::of(isbn_strategy()),
        prop::option::of("[A-Z][a-z ]{5,40}\\."),
        prop::option::of(0u32..500),
        prop::option::of(any::<bool>()),
    )
        .prop_map(
            |(title, author, genre, isbn, description, copies, available)| BookFields {
                title,
                author,
                genre,
                isbn,
                description,
                copies,
                available,
            },
        )
}

// ============================================================================
// FIXTURES
// ============================================================================

/// A deterministic persisted book for seeding tests.
pub fn persisted_book(id: &str, title: &str, copies: u32) -> Book {
    Book::from_draft(
        BookDraft::new(title, "Test Author", Genre::Fiction, "9780000000000", copies),
        BookId::persisted(id),
    )
}

/// A store whose list entry holds the given books.
pub fn seeded_store(books: Vec<Book>) -> CacheStore {
    let store = CacheStore::new();
    store.put(QueryKey::Books, books);
    store
}

/// The `{ success, message, data }` envelope the server wraps payloads in.
pub fn envelope(data: serde_json::Value) -> serde_json::Value {
    serde_json::json!({
        "success": true,
        "message": "ok",
        "data": data,
    })
}

/// A wire book payload as the server would send it.
pub fn book_payload(id: &str, title: &str, copies: u32) -> serde_json::Value {
    serde_json::json!({
        "_id": id,
        "title": title,
        "author": "Test Author",
        "genre": "FICTION",
        "isbn": "9780000000000",
        "copies": copies,
        "available": true,
    })
}
