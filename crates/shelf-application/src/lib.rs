//! Application layer for the reading shelf.
//!
//! Use cases that coordinate the domain types with the record store and the
//! completion collaborator: the shelf list, accounts, and one open book
//! conversation.

pub mod account_service;
pub mod book_session;
pub mod confirmation;
pub mod persistence;
pub mod shelf_service;

pub use account_service::{AccountService, SharedContext};
pub use book_session::{BookSession, ChatServices, ChatSettings, SendOutcome};
pub use confirmation::Confirmation;
pub use persistence::SessionPersistence;
pub use shelf_service::{ShelfService, ShelfView};
