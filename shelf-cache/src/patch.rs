//! Forward cache edits and their recorded inverses.
//!
//! A [`Patch`] describes one edit to one cached entry. Applying a patch
//! computes the exact inverse against the state found at apply time; the
//! inverse is what an [`crate::UndoHandle`] later replays. A patch that
//! finds nothing to edit (wrong entry shape, element already gone) records
//! [`Inverse::Noop`], and so does its undo.

use shelf_core::{Book, BookFields, BookId, TempToken};

use crate::value::CachedValue;

/// A forward edit to a cached entry.
#[derive(Debug, Clone)]
pub enum Patch {
    /// Append a book to the list entry.
    InsertBook(Book),
    /// Replace the list element carrying `token` with the persisted book.
    /// Matching is by token equality, never by scanning for "some" temporary.
    ReplaceByToken { token: TempToken, book: Book },
    /// Merge fields into the list element with the given server id,
    /// keeping the element at its current position.
    MergeByServerId { id: String, fields: BookFields },
    /// Merge fields into a single-book (item) entry.
    MergeFields(BookFields),
    /// Remove the list element with the given server id.
    RemoveByServerId(String),
    /// Remove the list element carrying the given token.
    RemoveByToken(TempToken),
}

/// The recorded inverse of an applied patch.
#[derive(Debug, Clone)]
pub(crate) enum Inverse {
    /// The patch found nothing to edit; undo does nothing.
    Noop,
    /// Remove the list element with this identity (inverse of an insert).
    RemoveById(BookId),
    /// Reinsert a removed element at its original position
    /// (inverse of a removal; position clamped to the current length).
    RestoreAt { index: usize, book: Book },
    /// Overwrite the list element with this identity with its prior value
    /// (inverse of a merge or replacement; position preserved).
    RestoreById { id: BookId, book: Book },
    /// Overwrite an item entry with its prior value
    /// (inverse of an item-entry merge).
    RestoreItem(Book),
}

impl Inverse {
    pub(crate) fn is_noop(&self) -> bool {
        matches!(self, Inverse::Noop)
    }
}

fn position_of(books: &[Book], id: &BookId) -> Option<usize> {
    books.iter().position(|book| &book.id == id)
}

/// Apply `patch` to `value`, returning the inverse computed against the
/// state found here.
pub(crate) fn apply(value: &mut CachedValue, patch: &Patch) -> Inverse {
    match (patch, value) {
        (Patch::InsertBook(book), CachedValue::Books(books)) => {
            books.push(book.clone());
            Inverse::RemoveById(book.id.clone())
        }
        (Patch::ReplaceByToken { token, book }, CachedValue::Books(books)) => {
            match position_of(books, &BookId::Temporary(*token)) {
                Some(index) => {
                    let prior = std::mem::replace(&mut books[index], book.clone());
                    Inverse::RestoreById {
                        id: book.id.clone(),
                        book: prior,
                    }
                }
                None => Inverse::Noop,
            }
        }
        (Patch::MergeByServerId { id, fields }, CachedValue::Books(books)) => {
            match position_of(books, &BookId::Persisted(id.clone())) {
                Some(index) => {
                    let prior = books[index].clone();
                    fields.apply_to(&mut books[index]);
                    Inverse::RestoreById {
                        id: prior.id.clone(),
                        book: prior,
                    }
                }
                None => Inverse::Noop,
            }
        }
        (Patch::MergeFields(fields), CachedValue::Book(book)) => {
            let prior = book.clone();
            fields.apply_to(book);
            Inverse::RestoreItem(prior)
        }
        (Patch::RemoveByServerId(id), CachedValue::Books(books)) => {
            remove_list_element(books, &BookId::Persisted(id.clone()))
        }
        (Patch::RemoveByToken(token), CachedValue::Books(books)) => {
            remove_list_element(books, &BookId::Temporary(*token))
        }
        // Patch aimed at an entry of a different shape: nothing to edit.
        _ => Inverse::Noop,
    }
}

fn remove_list_element(books: &mut Vec<Book>, id: &BookId) -> Inverse {
    match position_of(books, id) {
        Some(index) => {
            let book = books.remove(index);
            Inverse::RestoreAt { index, book }
        }
        None => Inverse::Noop,
    }
}

/// Replay a recorded inverse against the current state.
///
/// Elements that were concurrently removed degrade to a no-op; a reinsert
/// position past the current end clamps to the end.
pub(crate) fn revert(value: &mut CachedValue, inverse: Inverse) {
    match (inverse, value) {
        (Inverse::Noop, _) => {}
        (Inverse::RemoveById(id), CachedValue::Books(books)) => {
            if let Some(index) = position_of(books, &id) {
                books.remove(index);
            }
        }
        (Inverse::RestoreAt { index, book }, CachedValue::Books(books)) => {
            let index = index.min(books.len());
            books.insert(index, book);
        }
        (Inverse::RestoreById { id, book }, CachedValue::Books(books)) => {
            if let Some(index) = position_of(books, &id) {
                books[index] = book;
            }
        }
        (Inverse::RestoreItem(book), CachedValue::Book(current)) => {
            // The entry may have been repopulated with a different book
            // since the patch; only restore the record we edited.
            if current.id == book.id {
                *current = book;
            }
        }
        // Entry shape changed underneath us: nothing left to revert.
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shelf_core::{BookDraft, Genre};

    fn book(id: &str, title: &str, copies: u32) -> Book {
        Book::from_draft(
            BookDraft::new(title, "Author", Genre::Fiction, "isbn", copies),
            BookId::persisted(id),
        )
    }

    #[test]
    fn test_insert_then_undo_removes_only_that_entry() {
        let mut value = CachedValue::Books(vec![book("a", "A", 1), book("b", "B", 1)]);
        let token = TempToken::now_v7();
        let draft = BookDraft::new("C", "Author", Genre::Fantasy, "isbn-c", 1);
        let temp = Book::from_draft(draft, BookId::Temporary(token));

        let inverse = apply(&mut value, &Patch::InsertBook(temp));
        assert_eq!(value.as_books().unwrap().len(), 3);

        revert(&mut value, inverse);
        let books = value.as_books().unwrap();
        assert_eq!(books.len(), 2);
        assert!(books.iter().all(|b| !b.id.is_temporary()));
    }

    #[test]
    fn test_replace_by_token_matches_own_token_only() {
        let token_c = TempToken::now_v7();
        let token_d = TempToken::now_v7();
        let temp_c = Book::from_draft(
            BookDraft::new("C", "Author", Genre::Fiction, "isbn-c", 1),
            BookId::Temporary(token_c),
        );
        let temp_d = Book::from_draft(
            BookDraft::new("D", "Author", Genre::Fiction, "isbn-d", 1),
            BookId::Temporary(token_d),
        );
        let mut value = CachedValue::Books(vec![temp_c, temp_d]);

        let real_d = book("d-real", "D", 1);
        apply(
            &mut value,
            &Patch::ReplaceByToken {
                token: token_d,
                book: real_d,
            },
        );

        let books = value.as_books().unwrap();
        // C's placeholder is untouched even though it sits first.
        assert_eq!(books[0].id, BookId::Temporary(token_c));
        assert_eq!(books[1].id, BookId::persisted("d-real"));
    }

    #[test]
    fn test_remove_restores_at_original_position() {
        let mut value = CachedValue::Books(vec![book("a", "A", 1), book("b", "B", 1), book("c", "C", 1)]);

        let inverse = apply(&mut value, &Patch::RemoveByServerId("b".into()));
        assert_eq!(value.as_books().unwrap().len(), 2);

        revert(&mut value, inverse);
        let books = value.as_books().unwrap();
        assert_eq!(books[1].id, BookId::persisted("b"));
        assert_eq!(books.len(), 3);
    }

    #[test]
    fn test_merge_preserves_position_and_reverts() {
        let mut value = CachedValue::Books(vec![book("a", "A", 1), book("b", "B", 2)]);
        let fields = BookFields {
            copies: Some(9),
            ..Default::default()
        };

        let inverse = apply(
            &mut value,
            &Patch::MergeByServerId {
                id: "b".into(),
                fields,
            },
        );
        assert_eq!(value.as_books().unwrap()[1].copies, 9);

        revert(&mut value, inverse);
        assert_eq!(value.as_books().unwrap()[1].copies, 2);
    }

    #[test]
    fn test_missing_element_is_noop() {
        let mut value = CachedValue::Books(vec![book("a", "A", 1)]);
        let inverse = apply(&mut value, &Patch::RemoveByServerId("ghost".into()));
        assert!(inverse.is_noop());
        assert_eq!(value.as_books().unwrap().len(), 1);
    }

    #[test]
    fn test_item_restore_skips_replaced_entry() {
        let mut value = CachedValue::Book(book("a", "A", 1));
        let inverse = apply(
            &mut value,
            &Patch::MergeFields(BookFields {
                copies: Some(7),
                ..Default::default()
            }),
        );

        // Another operation repopulated the entry with a different book.
        value = CachedValue::Book(book("z", "Z", 4));
        revert(&mut value, inverse);
        assert_eq!(value.as_book().unwrap().id, BookId::persisted("z"));
        assert_eq!(value.as_book().unwrap().copies, 4);
    }
}
