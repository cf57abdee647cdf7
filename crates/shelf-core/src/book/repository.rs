//! Book repository trait.

use super::model::{BookPatch, BookRecord};
use crate::error::Result;
use async_trait::async_trait;

/// An abstract repository for the remote book records.
///
/// This trait decouples the shelf's logic from the record-store transport.
/// Every call is a full round trip; implementations do not cache.
#[async_trait]
pub trait BookRepository: Send + Sync {
    /// Lists every record belonging to `user_id`, in the store's order.
    async fn list_books(&self, user_id: &str) -> Result<Vec<BookRecord>>;

    /// Creates a new record.
    async fn add_book(&self, record: &BookRecord) -> Result<()>;

    /// Applies a partial update. Fields left as `None` are not sent.
    async fn update_book(&self, patch: &BookPatch) -> Result<()>;

    /// Deletes the record with `book_id`.
    async fn delete_book(&self, book_id: &str) -> Result<()>;
}
