//! Completion collaborator domain module.
//!
//! # Module Structure
//!
//! - `client`: The request type and the `CompletionClient` seam
//! - `prompt`: Building a request from a transcript and a book
//! - `reply`: Lenient parsing of `{text, keywords}` replies
//! - `failure`: Turning failures into displayable assistant text

mod client;
mod failure;
mod prompt;
mod reply;

pub use client::{CompletionClient, CompletionRequest, GenerationConfig};
pub use failure::{CONNECTION_FAILED_MESSAGE, COOLDOWN_MESSAGE, failure_reply};
pub use prompt::{BookContext, build_request, instruction_preamble};
pub use reply::ChatReply;
