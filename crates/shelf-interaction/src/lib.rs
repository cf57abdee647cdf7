//! Completion collaborators for the reading shelf.

pub mod gemini_client;

pub use gemini_client::GeminiCompletionClient;
