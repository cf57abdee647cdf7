//! Wiring of the services behind the `shelf` commands.

use anyhow::{Context, Result, anyhow};
use shelf_application::{
    AccountService, ChatServices, ChatSettings, SessionPersistence, ShelfService,
};
use shelf_core::book::{Book, BookStatus};
use shelf_core::config::{AppConfig, DEFAULT_GEMINI_MODEL};
use shelf_core::secret::SecretService;
use shelf_infrastructure::secret_service::GEMINI_API_KEY_ENV;
use shelf_infrastructure::{
    ConfigService, FileIdentityStore, RecordStoreClient, SecretServiceImpl, ShelfPaths,
};
use shelf_interaction::GeminiCompletionClient;
use std::sync::Arc;

pub struct App {
    pub paths: ShelfPaths,
    pub config: AppConfig,
    pub accounts: AccountService,
    pub shelf: ShelfService,
    persistence: SessionPersistence,
    secrets: SecretServiceImpl,
}

impl App {
    pub fn bootstrap(paths: ShelfPaths) -> Result<Self> {
        let config_file = paths.config_file()?;
        let config = ConfigService::new(config_file.clone())
            .load()
            .with_context(|| format!("Failed to load {}", config_file.display()))?;

        let url = config.record_store.url.clone().ok_or_else(|| {
            anyhow!(
                "No record store configured. Set [record_store] url in {} or SHELF_RECORD_STORE_URL",
                config_file.display()
            )
        })?;
        tracing::info!("[Bootstrap] Record store: {}", url);

        let record_store = Arc::new(RecordStoreClient::new(url));
        let identity_store = Arc::new(FileIdentityStore::new(paths.identity_file()?));
        let accounts = AccountService::new(record_store.clone(), identity_store);
        let shelf = ShelfService::new(record_store.clone(), accounts.context());
        let persistence = SessionPersistence::new(record_store);
        let secrets = SecretServiceImpl::new(paths.secret_file()?);

        Ok(Self {
            paths,
            config,
            accounts,
            shelf,
            persistence,
            secrets,
        })
    }

    /// Builds the collaborators for a chat, creating a secret.json template
    /// on first use.
    pub async fn chat_services(&self) -> Result<ChatServices> {
        if !self.secrets.secret_file_exists().await && std::env::var(GEMINI_API_KEY_ENV).is_err() {
            let path = self.paths.ensure_secret_file()?;
            return Err(anyhow!(
                "No Gemini API key yet. Fill in {} (or set GEMINI_API_KEY) and try again",
                path.display()
            ));
        }

        let completion_settings = &self.config.completion;
        let model = Some(completion_settings.model.as_str()).filter(|m| *m != DEFAULT_GEMINI_MODEL);
        let completion = GeminiCompletionClient::try_from_secrets(&self.secrets, model).await?;
        tracing::info!("[Bootstrap] Gemini model: {}", completion.model());

        Ok(ChatServices {
            persistence: self.persistence.clone(),
            completion: Arc::new(completion),
            shelf: self.shelf.clone(),
            settings: ChatSettings {
                reply_language: completion_settings.reply_language.clone(),
                generation: completion_settings.generation(),
            },
        })
    }

    /// Finds a book on either shelf by id or exact title.
    pub async fn find_book(&self, selector: &str) -> Result<Book> {
        let selector = selector.trim();
        let mut by_title = None;
        for status in [BookStatus::WantToRead, BookStatus::Read] {
            for book in self.shelf.list(status, None).await?.books {
                if book.id == selector {
                    return Ok(book);
                }
                if by_title.is_none() && book.title == selector {
                    by_title = Some(book);
                }
            }
        }
        by_title.ok_or_else(|| anyhow!("No book with id or title \"{selector}\" on your shelves"))
    }
}
