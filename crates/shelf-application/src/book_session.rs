//! One open book conversation: transcript, concept graph and their session
//! record.

use crate::confirmation::Confirmation;
use crate::persistence::SessionPersistence;
use crate::shelf_service::ShelfService;
use shelf_core::Result;
use shelf_core::book::{Book, BookStatus};
use shelf_core::completion::{
    BookContext, ChatReply, CompletionClient, GenerationConfig, build_request, failure_reply,
};
use shelf_core::concept_graph::{ConceptGraph, ConceptGraphBuilder};
use shelf_core::conversation::{ConversationStore, Turn};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::Mutex;

/// Prompt settings for a conversation.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatSettings {
    pub reply_language: String,
    pub generation: GenerationConfig,
}

impl Default for ChatSettings {
    fn default() -> Self {
        Self {
            reply_language: "Traditional Chinese".to_string(),
            generation: GenerationConfig::default(),
        }
    }
}

/// The collaborators a conversation needs, shared across book sessions.
#[derive(Clone)]
pub struct ChatServices {
    pub persistence: SessionPersistence,
    pub completion: Arc<dyn CompletionClient>,
    pub shelf: ShelfService,
    pub settings: ChatSettings,
}

/// What happened to one `send`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// The assistant answered; `keywords` became a new concept layer.
    Replied { text: String, keywords: Vec<String> },
    /// The request failed; `message` was appended as the assistant turn.
    Failed { message: String },
    /// Blank input, or a reply is still pending.
    Ignored,
}

struct SessionState {
    book: Book,
    store: ConversationStore,
    graph: ConceptGraphBuilder,
}

/// Clears the pending flag when the in-flight send finishes.
struct PendingGuard<'a>(&'a AtomicBool);

impl<'a> PendingGuard<'a> {
    fn try_acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for PendingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// A conversation about one book.
///
/// Each open book gets its own transcript and graph; nothing is shared
/// between sessions. The state lock is never held across the completion
/// call, and the pending flag keeps a second `send` from racing the first.
pub struct BookSession {
    user_id: String,
    services: ChatServices,
    state: Mutex<SessionState>,
    pending: AtomicBool,
}

impl BookSession {
    /// Opens `book` for `user_id`, restoring its stored session if any.
    pub async fn open(book: Book, user_id: impl Into<String>, services: ChatServices) -> Self {
        let user_id = user_id.into();
        let mut store = ConversationStore::for_book(&book.title);
        let mut graph = ConceptGraphBuilder::new(book.title.clone());

        let loaded = services.persistence.load(&book, &user_id).await;
        if let Some(turns) = loaded.transcript {
            store.restore(turns);
        }
        if let Some(restored) = loaded.graph {
            graph.restore(restored);
        }

        tracing::info!(
            "[BookSession] Opened '{}' ({} turns, {} concepts, next id {})",
            book.title,
            store.len(),
            graph.concept_count(),
            graph.next_id()
        );

        Self {
            user_id,
            services,
            state: Mutex::new(SessionState { book, store, graph }),
            pending: AtomicBool::new(false),
        }
    }

    /// Sends a user message and records the reply.
    ///
    /// Failures of the completion call become an assistant turn (see
    /// [`failure_reply`]) and add no concepts.
    pub async fn send(&self, input: &str) -> SendOutcome {
        let message = input.trim();
        if message.is_empty() {
            return SendOutcome::Ignored;
        }
        let Some(_pending) = PendingGuard::try_acquire(&self.pending) else {
            tracing::debug!("[BookSession] Send ignored while a reply is pending");
            return SendOutcome::Ignored;
        };

        let request = {
            let mut state = self.state.lock().await;
            let request = build_request(
                &state.store,
                message,
                &BookContext::from(&state.book),
                &self.services.settings.reply_language,
                self.services.settings.generation,
            );
            state.store.append(Turn::user(message));
            request
        };

        match self.services.completion.complete(request).await {
            Ok(raw) => {
                let reply = ChatReply::parse(&raw);
                let mut state = self.state.lock().await;
                state.store.append(Turn::assistant(reply.text.clone()));
                state.graph.add_layer(reply.keywords.as_slice());
                SendOutcome::Replied {
                    text: reply.text,
                    keywords: reply.keywords,
                }
            }
            Err(e) => {
                tracing::warn!("[BookSession] Completion failed: {}", e);
                let message = failure_reply(&e);
                self.state
                    .lock()
                    .await
                    .store
                    .append(Turn::assistant(message.clone()));
                SendOutcome::Failed { message }
            }
        }
    }

    /// Writes the transcript and graph to the record store.
    pub async fn save(&self) -> bool {
        let (book, turns, graph) = {
            let state = self.state.lock().await;
            (
                state.book.clone(),
                state.store.turns().to_vec(),
                state.graph.graph().clone(),
            )
        };
        self.services
            .persistence
            .save(&book, &self.user_id, &turns, &graph)
            .await
    }

    /// Closes the view, saving first.
    pub async fn close(self) -> bool {
        self.save().await
    }

    /// Moves the book to the other shelf.
    pub async fn toggle_status(&self) -> Result<BookStatus> {
        let book = self.book().await;
        let status = self.services.shelf.toggle_status(&book).await?;
        self.state.lock().await.book.status = status;
        Ok(status)
    }

    /// Deletes the book after confirmation. Returns `false` when declined.
    pub async fn delete(&self, confirmation: &dyn Confirmation) -> Result<bool> {
        let book = self.book().await;
        self.services.shelf.delete(&book, confirmation).await
    }

    pub fn is_pending(&self) -> bool {
        self.pending.load(Ordering::Acquire)
    }

    pub async fn book(&self) -> Book {
        self.state.lock().await.book.clone()
    }

    pub async fn transcript(&self) -> Vec<Turn> {
        self.state.lock().await.store.turns().to_vec()
    }

    pub async fn graph(&self) -> ConceptGraph {
        self.state.lock().await.graph.graph().clone()
    }

    /// Number of concepts, root excluded.
    pub async fn concept_count(&self) -> usize {
        self.state.lock().await.graph.concept_count()
    }
}
