//! Session persistence between the open conversation and the record store.

use chrono::Utc;
use shelf_core::Result;
use shelf_core::book::{Book, BookPatch, BookRecord, BookRepository};
use shelf_core::concept_graph::ConceptGraph;
use shelf_core::conversation::Turn;
use shelf_core::session::LoadedSession;
use shelf_core::session::codec::{decode_graph, decode_transcript, encode_graph, encode_transcript};
use std::sync::Arc;

/// Stateless codec/transport for session records.
///
/// Owns neither the transcript nor the graph. Failures never reach the
/// caller as errors: saves report `false`, loads fall back to empty
/// defaults.
#[derive(Clone)]
pub struct SessionPersistence {
    repository: Arc<dyn BookRepository>,
}

impl SessionPersistence {
    pub fn new(repository: Arc<dyn BookRepository>) -> Self {
        Self { repository }
    }

    /// Overwrites the session fields of `book`'s record.
    ///
    /// Title and user id always travel with the patch since the record store
    /// matches rows by them in some code paths.
    pub async fn save(
        &self,
        book: &Book,
        user_id: &str,
        transcript: &[Turn],
        graph: &ConceptGraph,
    ) -> bool {
        match self.try_save(book, user_id, transcript, graph).await {
            Ok(()) => {
                tracing::info!(
                    "[SessionPersistence] Saved '{}' ({} turns, {} concepts)",
                    book.title,
                    transcript.len(),
                    graph.concept_count()
                );
                true
            }
            Err(e) => {
                tracing::error!("[SessionPersistence] Failed to save '{}': {}", book.title, e);
                false
            }
        }
    }

    async fn try_save(
        &self,
        book: &Book,
        user_id: &str,
        transcript: &[Turn],
        graph: &ConceptGraph,
    ) -> Result<()> {
        let mut patch = BookPatch::for_book(book, user_id);
        patch.chat_history = Some(encode_transcript(transcript)?);
        patch.mind_map_data = Some(encode_graph(graph)?);
        patch.updated_at = Some(Utc::now());
        self.repository.update_book(&patch).await
    }

    /// Fetches the stored transcript and graph for `book`.
    pub async fn load(&self, book: &Book, user_id: &str) -> LoadedSession {
        let records = match self.repository.list_books(user_id).await {
            Ok(records) => records,
            Err(e) => {
                tracing::warn!(
                    "[SessionPersistence] Failed to fetch records for '{}': {}",
                    book.title,
                    e
                );
                return LoadedSession::default();
            }
        };

        let Some(record) = locate_record(&records, book, user_id) else {
            tracing::debug!("[SessionPersistence] No stored session for '{}'", book.title);
            return LoadedSession::default();
        };

        LoadedSession {
            transcript: decode_transcript(record.chat_history.as_deref()),
            graph: decode_graph(record.mind_map_data.as_deref()),
        }
    }
}

/// Finds the record that belongs to `book`.
///
/// An id match wins. Otherwise the exact title for `user_id` is used; when
/// several records share that title, the most recently updated one is
/// chosen, records without a timestamp count as oldest, and any remaining
/// tie goes to the record listed last.
pub fn locate_record<'a>(
    records: &'a [BookRecord],
    book: &Book,
    user_id: &str,
) -> Option<&'a BookRecord> {
    if !book.id.is_empty() {
        if let Some(record) = records.iter().find(|r| r.book.id == book.id) {
            return Some(record);
        }
    }

    // max_by_key keeps the last of equal maxima
    records
        .iter()
        .filter(|r| r.book.title == book.title && r.book.user_id == user_id)
        .max_by_key(|r| r.updated_at)
}
