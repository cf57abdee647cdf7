//! Conversation domain module.
//!
//! This module contains the chat transcript for one open book and the
//! mapping of its turns onto the completion collaborator's vocabulary.
//!
//! # Module Structure
//!
//! - `message`: Turn types (`Role`, `Turn`, `OutboundRole`, `OutboundTurn`)
//! - `store`: The append-only transcript (`ConversationStore`)

mod message;
mod store;

// Re-export public API
pub use message::{OutboundRole, OutboundTurn, Role, Turn};
pub use store::{ConversationStore, greeting_for};
