//! Shelf use cases: listing, adding, toggling and deleting books.

use crate::account_service::SharedContext;
use crate::confirmation::Confirmation;
use chrono::Utc;
use shelf_core::Result;
use shelf_core::book::{Book, BookPatch, BookRecord, BookRepository, BookStatus, NewBook};
use shelf_core::session::codec::{EMPTY_GRAPH, EMPTY_TRANSCRIPT};
use std::sync::Arc;

/// One shelf as the list view shows it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShelfView {
    pub books: Vec<Book>,
    /// Distinct categories of the shelf, in first-seen order.
    pub categories: Vec<String>,
}

/// Book operations for the signed-in (or guest) user.
///
/// Every listing is a fresh fetch; callers refetch after a mutation instead
/// of patching a local copy.
#[derive(Clone)]
pub struct ShelfService {
    repository: Arc<dyn BookRepository>,
    context: SharedContext,
}

impl ShelfService {
    pub fn new(repository: Arc<dyn BookRepository>, context: SharedContext) -> Self {
        Self {
            repository,
            context,
        }
    }

    pub async fn user_id(&self) -> String {
        self.context.read().await.effective_user_id().to_string()
    }

    /// Books on the `status` shelf, optionally narrowed to one category.
    ///
    /// `categories` is computed before the category filter so the view can
    /// offer every category of the shelf.
    pub async fn list(&self, status: BookStatus, category: Option<&str>) -> Result<ShelfView> {
        let user_id = self.user_id().await;
        let records = self.repository.list_books(&user_id).await?;

        let shelf: Vec<Book> = records
            .into_iter()
            .map(|record| record.book)
            .filter(|book| book.status == status)
            .collect();

        let mut categories: Vec<String> = Vec::new();
        for book in &shelf {
            if !categories.contains(&book.category) {
                categories.push(book.category.clone());
            }
        }

        let books = match category {
            Some(category) => shelf
                .into_iter()
                .filter(|book| book.category == category)
                .collect(),
            None => shelf,
        };

        Ok(ShelfView { books, categories })
    }

    /// Adds a book; a blank title is rejected before any request is made.
    pub async fn add_book(&self, new_book: NewBook, status: BookStatus) -> Result<Book> {
        new_book.validate()?;

        let user_id = self.user_id().await;
        let now = Utc::now();
        let book = new_book.into_book(format!("B-{}", now.timestamp_millis()), user_id, status);

        let mut record = BookRecord::new(book.clone());
        record.chat_history = Some(EMPTY_TRANSCRIPT.to_string());
        record.mind_map_data = Some(EMPTY_GRAPH.to_string());
        record.updated_at = Some(now);

        self.repository.add_book(&record).await?;
        tracing::info!("[ShelfService] Added '{}' as {}", book.title, book.id);
        Ok(book)
    }

    /// Moves `book` to the other shelf and returns its new status.
    pub async fn toggle_status(&self, book: &Book) -> Result<BookStatus> {
        let status = book.status.toggled();
        let mut patch = BookPatch::for_book(book, self.user_id().await);
        patch.status = Some(status);
        patch.updated_at = Some(Utc::now());

        self.repository.update_book(&patch).await?;
        tracing::info!("[ShelfService] '{}' is now {}", book.title, status);
        Ok(status)
    }

    /// Deletes `book` after confirmation. Returns `false` when declined.
    pub async fn delete(&self, book: &Book, confirmation: &dyn Confirmation) -> Result<bool> {
        let prompt = format!(
            "Delete \"{}\"? Its conversation and concept map will be lost.",
            book.title
        );
        if !confirmation.confirm(&prompt) {
            tracing::debug!("[ShelfService] Delete of '{}' declined", book.title);
            return Ok(false);
        }

        self.repository.delete_book(&book.id).await?;
        tracing::info!("[ShelfService] Deleted '{}' ({})", book.title, book.id);
        Ok(true)
    }
}
