//! Property-Based Tests for Cache Store Undo
//!
//! **Property: Reversibility**
//!
//! For any cached book list and any single patch, applying the patch and
//! then undoing it SHALL leave the list observably identical to its
//! pre-patch state - same entries, same order - and a second undo SHALL
//! change nothing.

use proptest::prelude::*;
use shelf_cache::{CacheStore, CachedValue, Patch, QueryKey};
use shelf_core::{Book, BookDraft, BookFields, BookId, Genre, TempToken};

// ============================================================================
// PROPERTY TEST STRATEGIES
// ============================================================================

fn genre_strategy() -> impl Strategy<Value = Genre> {
    prop_oneof![
        Just(Genre::Fiction),
        Just(Genre::NonFiction),
        Just(Genre::Science),
        Just(Genre::History),
        Just(Genre::Biography),
        Just(Genre::Fantasy),
    ]
}

fn book_strategy() -> impl Strategy<Value = Book> {
    (
        "[a-z0-9]{8,24}",
        "[A-Z][a-z]{2,12}( [A-Z][a-z]{2,12})?",
        "[A-Z][a-z]{2,10}",
        genre_strategy(),
        "97[89][0-9]{10}",
        0u32..500,
        any::<bool>(),
    )
        .prop_map(|(id, title, author, genre, isbn, copies, available)| {
            let mut draft = BookDraft::new(title, author, genre, isbn, copies);
            draft.available = available;
            Book::from_draft(draft, BookId::persisted(id))
        })
}

/// Lists with unique server ids, like a real list query result.
fn book_list_strategy() -> impl Strategy<Value = Vec<Book>> {
    prop::collection::vec(book_strategy(), 0..8).prop_map(|mut books| {
        books.sort_by(|a, b| a.id.to_string().cmp(&b.id.to_string()));
        books.dedup_by(|a, b| a.id == b.id);
        books
    })
}

fn fields_strategy() -> impl Strategy<Value = BookFields> {
    (
        prop::option::of("[A-Z][a-z]{2,10}"),
        prop::option::of(0u32..500),
        prop::option::of(any::<bool>()),
    )
        .prop_map(|(title, copies, available)| BookFields {
            title,
            copies,
            available,
            ..Default::default()
        })
}

fn seeded_store(books: Vec<Book>) -> CacheStore {
    let store = CacheStore::new();
    store.put(QueryKey::Books, books);
    store
}

fn list_of(store: &CacheStore) -> Vec<Book> {
    match store.read(&QueryKey::Books) {
        Some(CachedValue::Books(books)) => books,
        other => panic!("expected a book list entry, got {other:?}"),
    }
}

// ============================================================================
// PROPERTIES
// ============================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Removing any present entry and undoing restores the exact list,
    /// including the removed entry's position.
    #[test]
    fn prop_remove_undo_restores_order(books in book_list_strategy(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!books.is_empty());
        let victim = pick.get(&books).id.as_server_id().unwrap().to_string();
        let store = seeded_store(books.clone());

        let mut handle = store.apply(QueryKey::Books, Patch::RemoveByServerId(victim));
        handle.undo();

        prop_assert_eq!(list_of(&store), books);
    }

    /// Undo is idempotent: the second undo observes no further change.
    #[test]
    fn prop_undo_is_idempotent(books in book_list_strategy(), fields in fields_strategy(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!books.is_empty());
        let target = pick.get(&books).id.as_server_id().unwrap().to_string();
        let store = seeded_store(books);

        let mut handle = store.apply(
            QueryKey::Books,
            Patch::MergeByServerId { id: target, fields },
        );
        handle.undo();
        let after_first = list_of(&store);
        handle.undo();

        prop_assert_eq!(list_of(&store), after_first);
    }

    /// Field merges keep the entry at its position and revert exactly.
    #[test]
    fn prop_merge_undo_restores_fields(books in book_list_strategy(), fields in fields_strategy(), pick in any::<prop::sample::Index>()) {
        prop_assume!(!books.is_empty());
        let index = pick.index(books.len());
        let target = books[index].id.as_server_id().unwrap().to_string();
        let store = seeded_store(books.clone());

        let mut handle = store.apply(
            QueryKey::Books,
            Patch::MergeByServerId { id: target.clone(), fields },
        );

        // Position never changes while the merge is speculative.
        let speculative = list_of(&store);
        prop_assert_eq!(speculative[index].id.as_server_id(), Some(target.as_str()));

        handle.undo();
        prop_assert_eq!(list_of(&store), books);
    }

    /// Any subset of concurrently inserted placeholders can roll back in
    /// any order without disturbing the survivors.
    #[test]
    fn prop_concurrent_inserts_roll_back_independently(
        books in book_list_strategy(),
        count in 1usize..5,
        keep_mask in prop::collection::vec(any::<bool>(), 5),
    ) {
        let store = seeded_store(books.clone());

        let mut handles = Vec::new();
        let mut tokens = Vec::new();
        for i in 0..count {
            let token = TempToken::now_v7();
            let temp = Book::from_draft(
                BookDraft::new(format!("Pending {i}"), "Author", Genre::Fiction, "isbn", 1),
                BookId::Temporary(token),
            );
            handles.push(store.apply(QueryKey::Books, Patch::InsertBook(temp)));
            tokens.push(token);
        }

        for (i, handle) in handles.iter_mut().enumerate().rev() {
            if !keep_mask[i] {
                handle.undo();
            }
        }

        let remaining: Vec<_> = list_of(&store)
            .into_iter()
            .filter(|book| book.id.is_temporary())
            .map(|book| book.id)
            .collect();
        let expected: Vec<_> = tokens
            .iter()
            .enumerate()
            .filter(|(i, _)| keep_mask[*i])
            .map(|(_, token)| BookId::Temporary(*token))
            .collect();
        prop_assert_eq!(remaining, expected);
    }
}
