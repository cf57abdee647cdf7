//! Infrastructure layer for the reading shelf.
//!
//! Filesystem-backed configuration, secrets and identity, plus the HTTP
//! client for the spreadsheet record store.

pub mod config_service;
pub mod dto;
pub mod identity_store;
pub mod paths;
pub mod record_store;
pub mod secret_service;

pub use config_service::ConfigService;
pub use identity_store::FileIdentityStore;
pub use paths::ShelfPaths;
pub use record_store::RecordStoreClient;
pub use secret_service::SecretServiceImpl;
