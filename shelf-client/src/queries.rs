//! Read-side queries: fetch, populate the cache, honor staleness.

use reqwest::Method;
use tracing::debug;

use shelf_cache::{CachedValue, QueryKey};
use shelf_core::{Book, Borrow, BorrowSummary};

use crate::client::ShelfClient;
use crate::sync::SyncError;
use crate::types::{self, BookPayload};

impl ShelfClient {
    /// The book list, from cache unless absent or stale.
    pub async fn books(&self) -> Result<Vec<Book>, SyncError> {
        if !self.store.is_stale(&QueryKey::Books) {
            if let Some(CachedValue::Books(books)) = self.store.read(&QueryKey::Books) {
                debug!("book list served from cache");
                return Ok(books);
            }
        }
        self.fetch_books().await
    }

    /// Fetch the book list from the server and replace the cache entry.
    pub async fn fetch_books(&self) -> Result<Vec<Book>, SyncError> {
        let value = self.transport.request(Method::GET, "books", None).await?;
        let payloads: Vec<BookPayload> = types::decode(value)?;
        let books = payloads
            .into_iter()
            .map(BookPayload::into_book)
            .collect::<Result<Vec<_>, _>>()?;
        self.store.put(QueryKey::Books, books.clone());
        Ok(books)
    }

    /// A single book by server id, from cache unless absent or stale.
    pub async fn book_by_id(&self, id: &str) -> Result<Book, SyncError> {
        let key = QueryKey::book(id);
        if !self.store.is_stale(&key) {
            if let Some(CachedValue::Book(book)) = self.store.read(&key) {
                debug!(id, "book served from cache");
                return Ok(book);
            }
        }
        self.fetch_book(id).await
    }

    /// Fetch one book from the server and replace its cache entry.
    pub async fn fetch_book(&self, id: &str) -> Result<Book, SyncError> {
        let value = self
            .transport
            .request(Method::GET, &format!("books/{id}"), None)
            .await?;
        let payload: BookPayload = types::decode(value)?;
        let book = payload.into_book()?;
        self.store.put(QueryKey::book(id), book.clone());
        Ok(book)
    }

    /// Aggregated borrow counts, from cache unless absent or stale.
    pub async fn borrow_summary(&self) -> Result<Vec<BorrowSummary>, SyncError> {
        if !self.store.is_stale(&QueryKey::BorrowSummary) {
            if let Some(CachedValue::BorrowSummary(rows)) = self.store.read(&QueryKey::BorrowSummary)
            {
                debug!("borrow summary served from cache");
                return Ok(rows);
            }
        }
        self.fetch_borrow_summary().await
    }

    /// Fetch the borrow summary from the server and replace the cache entry.
    pub async fn fetch_borrow_summary(&self) -> Result<Vec<BorrowSummary>, SyncError> {
        let value = self.transport.request(Method::GET, "borrow/", None).await?;
        let rows: Vec<BorrowSummary> = types::decode(value)?;
        self.store.put(QueryKey::BorrowSummary, rows.clone());
        Ok(rows)
    }

    /// Record a borrow transaction.
    ///
    /// No optimistic edit: the summary is an aggregation the client cannot
    /// compute locally, so success just marks it stale for refetch.
    pub async fn borrow(&self, borrow: Borrow) -> Result<(), SyncError> {
        let body = serde_json::to_value(&borrow).map_err(crate::transport::TransportError::Serde)?;
        let outcome = self.transport.request(Method::POST, "borrow", Some(body)).await;
        match outcome {
            Ok(_) => {
                self.store.invalidate(&QueryKey::BorrowSummary);
                Ok(())
            }
            Err(err) => {
                let err = SyncError::from(err);
                self.report(&err);
                Err(err)
            }
        }
    }
}
