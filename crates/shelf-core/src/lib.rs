//! Domain layer of the reading shelf.
//!
//! Holds the models, the seams to external collaborators, and the
//! conversation-and-concept-graph logic. Nothing in this crate performs I/O.

pub mod account;
pub mod book;
pub mod completion;
pub mod concept_graph;
pub mod config;
pub mod conversation;
pub mod error;
pub mod identity;
pub mod secret;
pub mod session;

// Re-export common error type
pub use error::{Result, ShelfError};
