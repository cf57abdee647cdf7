//! In-memory fakes of the collaborator traits.
#![allow(dead_code)]

use async_trait::async_trait;
use shelf_application::{
    AccountService, ChatServices, ChatSettings, SessionPersistence, SharedContext, ShelfService,
};
use shelf_core::account::{AccountGateway, AuthResponse};
use shelf_core::book::{Book, BookPatch, BookRecord, BookRepository, BookStatus};
use shelf_core::completion::{CompletionClient, CompletionRequest};
use shelf_core::identity::{IdentityStore, SessionContext};
use shelf_core::{Result, ShelfError};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, RwLock};

pub fn book(id: &str, title: &str) -> Book {
    Book {
        id: id.into(),
        user_id: "alice".into(),
        title: title.into(),
        author: "Frank Herbert".into(),
        category: "Fiction".into(),
        cover_url: String::new(),
        status: BookStatus::WantToRead,
    }
}

pub fn alice() -> SharedContext {
    Arc::new(RwLock::new(SessionContext::signed_in("alice", None)))
}

// ============================================================================
// Book repository
// ============================================================================

#[derive(Default)]
pub struct InMemoryBookRepository {
    pub records: Mutex<Vec<BookRecord>>,
    pub patches: Mutex<Vec<BookPatch>>,
    pub deleted: Mutex<Vec<String>>,
    pub calls: AtomicUsize,
    pub fail_list: AtomicBool,
    pub fail_update: AtomicBool,
}

impl InMemoryBookRepository {
    pub fn with_records(records: Vec<BookRecord>) -> Self {
        Self {
            records: Mutex::new(records),
            ..Default::default()
        }
    }

    pub fn record(&self, book_id: &str) -> Option<BookRecord> {
        self.records
            .lock()
            .unwrap()
            .iter()
            .find(|r| r.book.id == book_id)
            .cloned()
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BookRepository for InMemoryBookRepository {
    async fn list_books(&self, user_id: &str) -> Result<Vec<BookRecord>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_list.load(Ordering::SeqCst) {
            return Err(ShelfError::network("offline"));
        }
        Ok(self
            .records
            .lock()
            .unwrap()
            .iter()
            .filter(|r| r.book.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn add_book(&self, record: &BookRecord) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.records.lock().unwrap().push(record.clone());
        Ok(())
    }

    async fn update_book(&self, patch: &BookPatch) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_update.load(Ordering::SeqCst) {
            return Err(ShelfError::Rejected("Book not found".into()));
        }
        self.patches.lock().unwrap().push(patch.clone());

        let mut records = self.records.lock().unwrap();
        let Some(record) = records.iter_mut().find(|r| r.book.id == patch.book_id) else {
            return Err(ShelfError::Rejected("Book not found".into()));
        };
        if let Some(status) = patch.status {
            record.book.status = status;
        }
        if let Some(history) = &patch.chat_history {
            record.chat_history = Some(history.clone());
        }
        if let Some(map) = &patch.mind_map_data {
            record.mind_map_data = Some(map.clone());
        }
        if patch.updated_at.is_some() {
            record.updated_at = patch.updated_at;
        }
        Ok(())
    }

    async fn delete_book(&self, book_id: &str) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.deleted.lock().unwrap().push(book_id.to_string());
        self.records.lock().unwrap().retain(|r| r.book.id != book_id);
        Ok(())
    }
}

// ============================================================================
// Completion client
// ============================================================================

#[derive(Default)]
pub struct ScriptedCompletion {
    replies: Mutex<VecDeque<Result<String>>>,
    pub requests: Mutex<Vec<CompletionRequest>>,
    gate: Option<Arc<Notify>>,
}

impl ScriptedCompletion {
    pub fn new(replies: Vec<Result<String>>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            ..Default::default()
        }
    }

    /// Each reply waits until `gate` is notified.
    pub fn gated(replies: Vec<Result<String>>, gate: Arc<Notify>) -> Self {
        Self {
            replies: Mutex::new(replies.into()),
            requests: Mutex::default(),
            gate: Some(gate),
        }
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl CompletionClient for ScriptedCompletion {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        self.requests.lock().unwrap().push(request);
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("{}".to_string()))
    }
}

pub fn services(
    repository: Arc<InMemoryBookRepository>,
    completion: Arc<ScriptedCompletion>,
) -> ChatServices {
    ChatServices {
        persistence: SessionPersistence::new(repository.clone()),
        completion,
        shelf: ShelfService::new(repository, alice()),
        settings: ChatSettings::default(),
    }
}

// ============================================================================
// Accounts
// ============================================================================

pub struct FakeGateway {
    pub response: AuthResponse,
    pub calls: Mutex<Vec<(String, Vec<String>)>>,
}

impl FakeGateway {
    pub fn answering(response: AuthResponse) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    fn record(&self, action: &str, args: &[&str]) -> Result<AuthResponse> {
        self.calls.lock().unwrap().push((
            action.to_string(),
            args.iter().map(|a| a.to_string()).collect(),
        ));
        Ok(self.response.clone())
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn last_call(&self) -> Option<(String, Vec<String>)> {
        self.calls.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl AccountGateway for FakeGateway {
    async fn login(&self, user_id: &str, pass_hash: &str) -> Result<AuthResponse> {
        self.record("login", &[user_id, pass_hash])
    }

    async fn sign_up(
        &self,
        user_id: &str,
        pass_hash: &str,
        email: Option<&str>,
    ) -> Result<AuthResponse> {
        self.record("signUp", &[user_id, pass_hash, email.unwrap_or("")])
    }

    async fn send_verification_code(&self, email: &str) -> Result<AuthResponse> {
        self.record("sendVerificationCode", &[email])
    }

    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_pass_hash: &str,
    ) -> Result<AuthResponse> {
        self.record("resetPassword", &[email, code, new_pass_hash])
    }

    async fn bind_email(&self, user_id: &str, email: &str) -> Result<AuthResponse> {
        self.record("bindEmail", &[user_id, email])
    }
}

#[derive(Default)]
pub struct MemoryIdentityStore {
    pub saved: Mutex<Option<SessionContext>>,
}

impl MemoryIdentityStore {
    pub fn holding(context: SessionContext) -> Self {
        Self {
            saved: Mutex::new(Some(context)),
        }
    }

    pub fn stored(&self) -> Option<SessionContext> {
        self.saved.lock().unwrap().clone()
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn load(&self) -> Result<SessionContext> {
        Ok(self.stored().unwrap_or_default())
    }

    fn save(&self, context: &SessionContext) -> Result<()> {
        *self.saved.lock().unwrap() = Some(context.clone());
        Ok(())
    }

    fn clear(&self) -> Result<()> {
        *self.saved.lock().unwrap() = None;
        Ok(())
    }
}

pub fn account_service(
    gateway: Arc<FakeGateway>,
    store: Arc<MemoryIdentityStore>,
) -> AccountService {
    AccountService::new(gateway, store)
}
