use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use shelf_core::book::{Book, BookPatch, BookRecord, BookStatus, UNCATEGORIZED};

/// A book row as the record store names its columns.
///
/// Reading goes through [`BookRecordDto::from_json`], which accepts the
/// canonical column names as well as the camel/lower-case aliases older rows
/// use, and numbers where strings are expected. Writing always uses the
/// canonical names.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BookRecordDto {
    #[serde(rename = "Book_ID", skip_serializing_if = "Option::is_none")]
    pub book_id: Option<String>,
    #[serde(rename = "User_ID", skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(rename = "Title", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(rename = "Author", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(rename = "Category", skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    #[serde(rename = "Cover_URL", skip_serializing_if = "Option::is_none")]
    pub cover_url: Option<String>,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Chat_History", skip_serializing_if = "Option::is_none")]
    pub chat_history: Option<String>,
    #[serde(rename = "Mind_Map_Data", skip_serializing_if = "Option::is_none")]
    pub mind_map_data: Option<String>,
    #[serde(rename = "Updated_At", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

const BOOK_ID_KEYS: &[&str] = &["Book_ID", "id", "bookId"];
const USER_ID_KEYS: &[&str] = &["User_ID", "userId", "user_id"];
const TITLE_KEYS: &[&str] = &["Title", "title"];
const AUTHOR_KEYS: &[&str] = &["Author", "author"];
const CATEGORY_KEYS: &[&str] = &["Category", "category"];
const COVER_KEYS: &[&str] = &["Cover_URL", "cover", "coverUrl"];
const STATUS_KEYS: &[&str] = &["Status", "status"];
const CHAT_KEYS: &[&str] = &["Chat_History", "chatHistory"];
const MIND_MAP_KEYS: &[&str] = &["Mind_Map_Data", "mindMapData"];
const UPDATED_KEYS: &[&str] = &["Updated_At", "updatedAt"];

/// First non-empty value among `keys`, rendered as text.
fn field(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| match map.get(*key)? {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        // Some sheets hand back already-parsed JSON for the text columns
        value @ (Value::Array(_) | Value::Object(_)) => Some(value.to_string()),
        _ => None,
    })
}

impl BookRecordDto {
    /// Reads a row; returns `None` when the row is not a JSON object.
    pub fn from_json(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        Some(Self {
            book_id: field(map, BOOK_ID_KEYS),
            user_id: field(map, USER_ID_KEYS),
            title: field(map, TITLE_KEYS),
            author: field(map, AUTHOR_KEYS),
            category: field(map, CATEGORY_KEYS),
            cover_url: field(map, COVER_KEYS),
            status: field(map, STATUS_KEYS),
            chat_history: field(map, CHAT_KEYS),
            mind_map_data: field(map, MIND_MAP_KEYS),
            updated_at: field(map, UPDATED_KEYS),
        })
    }

    /// Normalizes the row into the strict domain record.
    ///
    /// `owner` fills a missing user id (rows are always listed per user) and
    /// `ordinal` makes a placeholder id for rows that have none; such books
    /// can still be matched by title.
    pub fn into_domain(self, owner: &str, ordinal: usize) -> BookRecord {
        let book = Book {
            id: self.book_id.unwrap_or_else(|| format!("local-{ordinal}")),
            user_id: self.user_id.unwrap_or_else(|| owner.to_string()),
            title: self.title.unwrap_or_default(),
            author: self.author.unwrap_or_default(),
            category: self
                .category
                .unwrap_or_else(|| UNCATEGORIZED.to_string()),
            cover_url: self.cover_url.unwrap_or_default(),
            status: self
                .status
                .as_deref()
                .map(BookStatus::from_wire)
                .unwrap_or_default(),
        };
        BookRecord {
            book,
            chat_history: self.chat_history,
            mind_map_data: self.mind_map_data,
            updated_at: self.updated_at.as_deref().and_then(parse_timestamp),
        }
    }
}

fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw.trim())
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

impl From<&BookRecord> for BookRecordDto {
    fn from(record: &BookRecord) -> Self {
        let book = &record.book;
        Self {
            book_id: Some(book.id.clone()),
            user_id: Some(book.user_id.clone()),
            title: Some(book.title.clone()),
            author: Some(book.author.clone()),
            category: Some(book.category.clone()),
            cover_url: Some(book.cover_url.clone()),
            status: Some(book.status.as_wire().to_string()),
            chat_history: record.chat_history.clone(),
            mind_map_data: record.mind_map_data.clone(),
            updated_at: record.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

/// The `updateBook` payload. Absent fields are left untouched by the store.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookPatchDto {
    #[serde(rename = "Book_ID")]
    pub book_id: String,
    #[serde(rename = "Title")]
    pub title: String,
    #[serde(rename = "User_ID")]
    pub user_id: String,
    #[serde(rename = "Status", skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(rename = "Chat_History", skip_serializing_if = "Option::is_none")]
    pub chat_history: Option<String>,
    #[serde(rename = "Mind_Map_Data", skip_serializing_if = "Option::is_none")]
    pub mind_map_data: Option<String>,
    #[serde(rename = "Updated_At", skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

impl From<&BookPatch> for BookPatchDto {
    fn from(patch: &BookPatch) -> Self {
        Self {
            book_id: patch.book_id.clone(),
            title: patch.title.clone(),
            user_id: patch.user_id.clone(),
            status: patch.status.map(|s| s.as_wire().to_string()),
            chat_history: patch.chat_history.clone(),
            mind_map_data: patch.mind_map_data.clone(),
            updated_at: patch.updated_at.map(|dt| dt.to_rfc3339()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use shelf_core::book::DEFAULT_AUTHOR;

    #[test]
    fn test_canonical_row() {
        let row = json!({
            "Book_ID": "B-1700000000000",
            "User_ID": "alice",
            "Title": "Dune",
            "Author": "Frank Herbert",
            "Category": "Fiction",
            "Cover_URL": "https://covers/dune.jpg",
            "Status": "已閱讀",
            "Chat_History": "[]",
            "Mind_Map_Data": "{}",
            "Updated_At": "2026-10-01T08:00:00Z"
        });

        let record = BookRecordDto::from_json(&row).unwrap().into_domain("alice", 0);

        assert_eq!(record.book.id, "B-1700000000000");
        assert_eq!(record.book.status, BookStatus::Read);
        assert_eq!(record.chat_history.as_deref(), Some("[]"));
        assert_eq!(
            record.updated_at.unwrap().to_rfc3339(),
            "2026-10-01T08:00:00+00:00"
        );
    }

    #[test]
    fn test_aliased_and_sparse_row() {
        let row = json!({
            "id": 42,
            "title": "Walden",
            "cover": "",
            "Updated_At": "last tuesday"
        });

        let record = BookRecordDto::from_json(&row).unwrap().into_domain("bob", 3);

        assert_eq!(record.book.id, "42");
        assert_eq!(record.book.user_id, "bob");
        assert_eq!(record.book.title, "Walden");
        assert_eq!(record.book.category, UNCATEGORIZED);
        assert_eq!(record.book.status, BookStatus::WantToRead);
        assert_eq!(record.book.cover_url, "");
        assert_eq!(record.chat_history, None);
        assert_eq!(record.updated_at, None);
    }

    #[test]
    fn test_missing_id_gets_placeholder_and_non_objects_are_skipped() {
        let record = BookRecordDto::from_json(&json!({"Title": "Untitled"}))
            .unwrap()
            .into_domain("guest", 7);
        assert_eq!(record.book.id, "local-7");

        assert!(BookRecordDto::from_json(&json!("just a string")).is_none());
    }

    #[test]
    fn test_parsed_json_columns_are_kept_as_text() {
        let row = json!({
            "Book_ID": "B-1",
            "Chat_History": [{"role": "assistant", "content": "hi"}]
        });

        let dto = BookRecordDto::from_json(&row).unwrap();
        assert_eq!(
            dto.chat_history.as_deref(),
            Some(r#"[{"content":"hi","role":"assistant"}]"#)
        );
    }

    #[test]
    fn test_record_to_dto_uses_canonical_names() {
        let record = BookRecord::new(Book {
            id: "B-1".into(),
            user_id: "alice".into(),
            title: "Dune".into(),
            author: DEFAULT_AUTHOR.into(),
            category: "Fiction".into(),
            cover_url: String::new(),
            status: BookStatus::WantToRead,
        });

        let value = serde_json::to_value(BookRecordDto::from(&record)).unwrap();

        assert_eq!(value["Book_ID"], "B-1");
        assert_eq!(value["Status"], "想閱讀");
        assert!(value.get("Chat_History").is_none());
    }

    #[test]
    fn test_patch_sends_only_present_fields() {
        let patch = BookPatch {
            book_id: "B-1".into(),
            title: "Dune".into(),
            user_id: "alice".into(),
            status: Some(BookStatus::Read),
            ..Default::default()
        };

        let value = serde_json::to_value(BookPatchDto::from(&patch)).unwrap();

        assert_eq!(
            value,
            json!({"Book_ID": "B-1", "Title": "Dune", "User_ID": "alice", "Status": "已閱讀"})
        );
    }
}
