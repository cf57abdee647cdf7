//! Book domain model.

use crate::error::{Result, ShelfError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Author stored when the reader leaves the field blank ("unknown").
pub const DEFAULT_AUTHOR: &str = "未知";

/// Category preselected for new books ("self-study").
pub const DEFAULT_CATEGORY: &str = "自學";

/// Category shown for records that carry none ("uncategorized").
pub const UNCATEGORIZED: &str = "未分類";

/// Which shelf a book sits on.
///
/// The serialized values are the record store's wire values, shared with the
/// web front end.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BookStatus {
    #[default]
    #[serde(rename = "想閱讀")]
    WantToRead,
    #[serde(rename = "已閱讀")]
    Read,
}

impl BookStatus {
    pub fn as_wire(&self) -> &'static str {
        match self {
            BookStatus::WantToRead => "想閱讀",
            BookStatus::Read => "已閱讀",
        }
    }

    /// Parses a wire value; anything unknown is treated as want-to-read.
    pub fn from_wire(value: &str) -> Self {
        match value.trim() {
            "已閱讀" => BookStatus::Read,
            _ => BookStatus::WantToRead,
        }
    }

    /// The other shelf.
    pub fn toggled(&self) -> Self {
        match self {
            BookStatus::WantToRead => BookStatus::Read,
            BookStatus::Read => BookStatus::WantToRead,
        }
    }
}

impl fmt::Display for BookStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BookStatus::WantToRead => write!(f, "want to read"),
            BookStatus::Read => write!(f, "read"),
        }
    }
}

impl FromStr for BookStatus {
    type Err = ShelfError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "want" | "want-to-read" | "want_to_read" | "想閱讀" => Ok(BookStatus::WantToRead),
            "read" | "done" | "已閱讀" => Ok(BookStatus::Read),
            other => Err(ShelfError::validation(format!("Unknown shelf status: {other}"))),
        }
    }
}

/// A book on a user's shelf.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub author: String,
    pub category: String,
    pub cover_url: String,
    pub status: BookStatus,
}

/// The add-book form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub category: String,
    pub cover_url: String,
}

impl NewBook {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Default::default()
        }
    }

    /// Rejects a blank title.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(ShelfError::validation("Title is required"));
        }
        Ok(())
    }

    /// Builds the stored book, filling defaults for blank optional fields.
    pub fn into_book(self, id: String, user_id: String, status: BookStatus) -> Book {
        let author = if self.author.trim().is_empty() {
            DEFAULT_AUTHOR.to_string()
        } else {
            self.author.trim().to_string()
        };
        let category = if self.category.trim().is_empty() {
            DEFAULT_CATEGORY.to_string()
        } else {
            self.category.trim().to_string()
        };
        Book {
            id,
            user_id,
            title: self.title.trim().to_string(),
            author,
            category,
            cover_url: self.cover_url.trim().to_string(),
            status,
        }
    }
}

/// A book together with its persisted conversation fields.
///
/// `chat_history` and `mind_map_data` are the raw text fields; decoding them
/// is the session codec's job.
#[derive(Debug, Clone, PartialEq)]
pub struct BookRecord {
    pub book: Book,
    pub chat_history: Option<String>,
    pub mind_map_data: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BookRecord {
    pub fn new(book: Book) -> Self {
        Self {
            book,
            chat_history: None,
            mind_map_data: None,
            updated_at: None,
        }
    }
}

/// Partial update of a book record.
///
/// The record store locates rows by title and user id in at least one code
/// path, so both are always sent together with the book id.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct BookPatch {
    pub book_id: String,
    pub title: String,
    pub user_id: String,
    pub status: Option<BookStatus>,
    pub chat_history: Option<String>,
    pub mind_map_data: Option<String>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl BookPatch {
    /// A patch that changes nothing yet, addressed at `book` for `user_id`.
    pub fn for_book(book: &Book, user_id: impl Into<String>) -> Self {
        Self {
            book_id: book.id.clone(),
            title: book.title.clone(),
            user_id: user_id.into(),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_wire_values() {
        assert_eq!(
            serde_json::to_string(&BookStatus::WantToRead).unwrap(),
            "\"想閱讀\""
        );
        assert_eq!(BookStatus::from_wire("已閱讀"), BookStatus::Read);
        assert_eq!(BookStatus::from_wire("something else"), BookStatus::WantToRead);
        assert_eq!(BookStatus::Read.toggled(), BookStatus::WantToRead);
    }

    #[test]
    fn test_status_from_cli_words() {
        assert_eq!("want".parse::<BookStatus>().unwrap(), BookStatus::WantToRead);
        assert_eq!("READ".parse::<BookStatus>().unwrap(), BookStatus::Read);
        assert!("shelved".parse::<BookStatus>().is_err());
    }

    #[test]
    fn test_new_book_validation_and_defaults() {
        assert!(NewBook::new("   ").validate().unwrap_err().is_validation());

        let form = NewBook {
            title: "  Dune ".into(),
            ..Default::default()
        };
        form.validate().unwrap();
        let book = form.into_book("B-1".into(), "alice".into(), BookStatus::Read);

        assert_eq!(book.title, "Dune");
        assert_eq!(book.author, DEFAULT_AUTHOR);
        assert_eq!(book.category, DEFAULT_CATEGORY);
        assert_eq!(book.status, BookStatus::Read);
    }
}
