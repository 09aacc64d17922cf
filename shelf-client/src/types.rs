//! Wire types for the library-management REST service.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use shelf_core::{Book, BookDraft, BookFields, BookId, Genre};

use crate::sync::SyncError;

/// Response envelope wrapping every payload.
///
/// The client unwraps `data`; `success` and `message` only feed error
/// surfacing, never control flow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<T> {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    pub data: T,
}

/// Lenient error body used to extract a message from non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: String,
}

/// A book as the server sends it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookPayload {
    #[serde(rename = "_id")]
    pub id: Option<String>,
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub isbn: String,
    #[serde(default)]
    pub description: Option<String>,
    pub copies: u32,
    #[serde(default = "default_available")]
    pub available: bool,
}

fn default_available() -> bool {
    true
}

impl BookPayload {
    /// Convert to the cache representation.
    ///
    /// A payload without a non-empty server id cannot be reconciled into
    /// the cache: persisted books always carry one.
    pub fn into_book(self) -> Result<Book, SyncError> {
        let id = match self.id {
            Some(id) if !id.is_empty() => id,
            _ => {
                return Err(SyncError::ReconciliationMismatch {
                    reason: "server payload is missing a book id".to_string(),
                })
            }
        };
        Ok(Book {
            id: BookId::Persisted(id),
            title: self.title,
            author: self.author,
            genre: self.genre,
            isbn: self.isbn,
            description: self.description,
            copies: self.copies,
            available: self.available,
        })
    }
}

/// Body of `POST books`.
#[derive(Debug, Clone, Serialize)]
pub struct CreateBookBody {
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub isbn: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub copies: u32,
    pub available: bool,
}

impl From<&BookDraft> for CreateBookBody {
    fn from(draft: &BookDraft) -> Self {
        Self {
            title: draft.title.clone(),
            author: draft.author.clone(),
            genre: draft.genre,
            isbn: draft.isbn.clone(),
            description: draft.description.clone(),
            copies: draft.copies,
            available: draft.available,
        }
    }
}

/// Body of `PUT books/{id}`: only the changed fields.
#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateBookBody {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub genre: Option<Genre>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub isbn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub copies: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub available: Option<bool>,
}

impl From<&BookFields> for UpdateBookBody {
    fn from(fields: &BookFields) -> Self {
        Self {
            title: fields.title.clone(),
            author: fields.author.clone(),
            genre: fields.genre,
            isbn: fields.isbn.clone(),
            description: fields.description.clone(),
            copies: fields.copies,
            available: fields.available,
        }
    }
}

/// Unwrap an enveloped response into its payload.
pub(crate) fn decode<T: DeserializeOwned>(value: Value) -> Result<T, SyncError> {
    let envelope: Envelope<T> =
        serde_json::from_value(value).map_err(|err| SyncError::ReconciliationMismatch {
            reason: format!("response envelope did not match: {err}"),
        })?;
    Ok(envelope.data)
}
