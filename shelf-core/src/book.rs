//! Book entity and its create/update payload shapes.

use crate::identity::BookId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Genre classification used by the catalog.
///
/// Serialized with the server's SCREAMING_SNAKE_CASE spellings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Genre {
    Fiction,
    NonFiction,
    Science,
    History,
    Biography,
    Fantasy,
}

impl Genre {
    pub fn as_wire_str(&self) -> &'static str {
        match self {
            Genre::Fiction => "FICTION",
            Genre::NonFiction => "NON_FICTION",
            Genre::Science => "SCIENCE",
            Genre::History => "HISTORY",
            Genre::Biography => "BIOGRAPHY",
            Genre::Fantasy => "FANTASY",
        }
    }

    pub fn from_wire_str(s: &str) -> Result<Self, GenreParseError> {
        match s {
            "FICTION" => Ok(Genre::Fiction),
            "NON_FICTION" => Ok(Genre::NonFiction),
            "SCIENCE" => Ok(Genre::Science),
            "HISTORY" => Ok(Genre::History),
            "BIOGRAPHY" => Ok(Genre::Biography),
            "FANTASY" => Ok(Genre::Fantasy),
            _ => Err(GenreParseError(s.to_string())),
        }
    }
}

impl fmt::Display for Genre {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_wire_str())
    }
}

impl FromStr for Genre {
    type Err = GenreParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_wire_str(s)
    }
}

/// Error when parsing an invalid genre string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenreParseError(pub String);

impl fmt::Display for GenreParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid genre: {}", self.0)
    }
}

impl std::error::Error for GenreParseError {}

/// A book record as held in the client cache.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: BookId,
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub isbn: String,
    pub description: Option<String>,
    pub copies: u32,
    pub available: bool,
}

impl Book {
    /// Build a book from a draft and an assigned identity.
    pub fn from_draft(draft: BookDraft, id: BookId) -> Self {
        Self {
            id,
            title: draft.title,
            author: draft.author,
            genre: draft.genre,
            isbn: draft.isbn,
            description: draft.description,
            copies: draft.copies,
            available: draft.available,
        }
    }
}

fn default_available() -> bool {
    true
}

/// A book without identity - the create payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookDraft {
    pub title: String,
    pub author: String,
    pub genre: Genre,
    pub isbn: String,
    pub description: Option<String>,
    pub copies: u32,
    #[serde(default = "default_available")]
    pub available: bool,
}

impl BookDraft {
    pub fn new(
        title: impl Into<String>,
        author: impl Into<String>,
        genre: Genre,
        isbn: impl Into<String>,
        copies: u32,
    ) -> Self {
        Self {
            title: title.into(),
            author: author.into(),
            genre,
            isbn: isbn.into(),
            description: None,
            copies,
            available: true,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Partial update for a book: every field optional, present fields overwrite.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookFields {
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<Genre>,
    pub isbn: Option<String>,
    pub description: Option<String>,
    pub copies: Option<u32>,
    pub available: Option<bool>,
}

impl BookFields {
    /// Merge the present fields into `book`, leaving absent fields untouched.
    pub fn apply_to(&self, book: &mut Book) {
        if let Some(title) = &self.title {
            book.title = title.clone();
        }
        if let Some(author) = &self.author {
            book.author = author.clone();
        }
        if let Some(genre) = self.genre {
            book.genre = genre;
        }
        if let Some(isbn) = &self.isbn {
            book.isbn = isbn.clone();
        }
        if let Some(description) = &self.description {
            book.description = Some(description.clone());
        }
        if let Some(copies) = self.copies {
            book.copies = copies;
        }
        if let Some(available) = self.available {
            book.available = available;
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}
