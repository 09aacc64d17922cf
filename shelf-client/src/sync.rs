//! Optimistic cache synchronization for book mutations.
//!
//! Each mutation speculatively edits the cache, then reconciles with the
//! server outcome: create replaces its own placeholder with the persisted
//! book, update and delete commit and mark the affected queries stale so
//! the read side refetches server truth. Any failure - transport or a
//! success response the cache cannot trust - rolls the speculative edits
//! back.
//!
//! Per mutation the phases are `Speculating -> Committed | RolledBack`.
//! The transition out of `Speculating` happens exactly once and is driven
//! only by that mutation's own outcome value. Several mutations may be
//! speculating concurrently; each owns its undo handles and its own
//! placeholder token, so reconciling one never touches another's
//! bookkeeping.

use reqwest::Method;
use tracing::{debug, warn};

use shelf_cache::{Patch, QueryKey, UndoHandle};
use shelf_core::{Book, BookDraft, BookFields, BookId, TempToken};

use crate::client::ShelfClient;
use crate::notifications::{Notification, NotificationLevel};
use crate::transport::TransportError;
use crate::types::{self, BookPayload, CreateBookBody, UpdateBookBody};

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error(transparent)]
    Transport(#[from] TransportError),
    /// The call succeeded but the response cannot reconcile the cache
    /// (e.g. a created book without an id). Treated as a failure: the
    /// speculative edit is rolled back.
    #[error("Reconciliation mismatch: {reason}")]
    ReconciliationMismatch { reason: String },
}

/// The speculative edits of one in-flight mutation.
///
/// Consuming `commit`/`rollback` makes the transition out of Speculating
/// single-shot: once resolved, the handles are gone. Dropping an
/// unresolved speculation - a mutation future abandoned mid-flight -
/// rolls the edits back, so cache consistency never depends on the
/// originating caller staying alive.
struct Speculation {
    label: &'static str,
    handles: Vec<UndoHandle>,
    resolved: bool,
}

impl Speculation {
    fn new(label: &'static str, handles: Vec<UndoHandle>) -> Self {
        debug!(mutation = label, "speculating");
        Self {
            label,
            handles,
            resolved: false,
        }
    }

    fn commit(mut self) {
        self.resolved = true;
        debug!(mutation = self.label, "committed");
    }

    fn rollback(mut self) {
        self.undo_all();
        self.resolved = true;
        debug!(mutation = self.label, "rolled back");
    }

    fn undo_all(&mut self) {
        for handle in self.handles.iter_mut().rev() {
            handle.undo();
        }
    }
}

impl Drop for Speculation {
    fn drop(&mut self) {
        if !self.resolved {
            self.undo_all();
            debug!(mutation = self.label, "rolled back on abandonment");
        }
    }
}

impl ShelfClient {
    /// Create a book.
    ///
    /// The draft is inserted into the list cache under a fresh placeholder
    /// token before the request is sent. On success the placeholder is
    /// replaced - matched by this call's own token - with the persisted
    /// book; on failure the insertion is undone.
    pub async fn create_book(&self, draft: BookDraft) -> Result<Book, SyncError> {
        let body = serde_json::to_value(CreateBookBody::from(&draft))
            .map_err(TransportError::Serde)?;

        let token = TempToken::now_v7();
        let placeholder = Book::from_draft(draft, BookId::Temporary(token));
        let speculation = Speculation::new(
            "create-book",
            vec![self.store.apply(QueryKey::Books, Patch::InsertBook(placeholder))],
        );

        let outcome = self.transport.request(Method::POST, "books", Some(body)).await;

        let persisted = outcome
            .map_err(SyncError::from)
            .and_then(|value| types::decode::<BookPayload>(value))
            .and_then(BookPayload::into_book);

        match persisted {
            Ok(book) => {
                self.store.apply(
                    QueryKey::Books,
                    Patch::ReplaceByToken {
                        token,
                        book: book.clone(),
                    },
                );
                speculation.commit();
                Ok(book)
            }
            Err(err) => {
                speculation.rollback();
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Update a persisted book with the given fields.
    ///
    /// Both the list entry and the item entry (if cached) are merged
    /// speculatively as one patch pair. On success the affected queries
    /// are marked stale - reconciliation with server truth is the read
    /// side's refetch; on failure both merges are undone.
    pub async fn update_book(&self, id: &str, fields: BookFields) -> Result<(), SyncError> {
        let body = serde_json::to_value(UpdateBookBody::from(&fields))
            .map_err(TransportError::Serde)?;

        let item_key = QueryKey::book(id);
        let speculation = Speculation::new(
            "update-book",
            vec![
                self.store.apply(
                    QueryKey::Books,
                    Patch::MergeByServerId {
                        id: id.to_string(),
                        fields: fields.clone(),
                    },
                ),
                self.store.apply(item_key.clone(), Patch::MergeFields(fields)),
            ],
        );

        let outcome = self
            .transport
            .request(Method::PUT, &format!("books/{id}"), Some(body))
            .await;

        match outcome {
            Ok(_) => {
                speculation.commit();
                self.store.invalidate(&QueryKey::Books);
                self.store.invalidate(&item_key);
                Ok(())
            }
            Err(err) => {
                let err = SyncError::from(err);
                speculation.rollback();
                self.report(&err);
                Err(err)
            }
        }
    }

    /// Delete a persisted book.
    ///
    /// The list entry is removed speculatively, recording its position.
    /// On success the removal is permanent, the item entry is dropped and
    /// the list query marked stale; on failure the entry is reinserted at
    /// its original position.
    pub async fn delete_book(&self, id: &str) -> Result<(), SyncError> {
        let item_key = QueryKey::book(id);
        let speculation = Speculation::new(
            "delete-book",
            vec![self
                .store
                .apply(QueryKey::Books, Patch::RemoveByServerId(id.to_string()))],
        );

        let outcome = self
            .transport
            .request(Method::DELETE, &format!("books/{id}"), None)
            .await;

        match outcome {
            Ok(_) => {
                speculation.commit();
                self.store.remove(&item_key);
                self.store.invalidate(&QueryKey::Books);
                Ok(())
            }
            Err(err) => {
                let err = SyncError::from(err);
                speculation.rollback();
                self.report(&err);
                Err(err)
            }
        }
    }

    pub(crate) fn report(&self, err: &SyncError) {
        warn!(error = %err, "mutation failed, cache rolled back");
        self.notifications
            .push(Notification::new(NotificationLevel::Error, err.to_string()));
    }
}
