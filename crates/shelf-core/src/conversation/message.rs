//! Conversation turn types.

use serde::{Deserialize, Serialize};

/// The speaker of a turn in a book conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Message typed by the reader.
    User,
    /// Message produced by the reading assistant (or synthesized on failure).
    #[serde(alias = "model")]
    Assistant,
}

/// A single message in a chat transcript.
///
/// Turns are immutable once appended to a `ConversationStore`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// The role of the message sender.
    pub role: Role,
    /// The content of the message.
    pub content: String,
}

impl Turn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Role vocabulary of the completion collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutboundRole {
    User,
    Model,
}

impl From<Role> for OutboundRole {
    fn from(role: Role) -> Self {
        match role {
            Role::User => OutboundRole::User,
            Role::Assistant => OutboundRole::Model,
        }
    }
}

/// A turn as sent to the completion collaborator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutboundTurn {
    pub role: OutboundRole,
    pub text: String,
}

impl From<&Turn> for OutboundTurn {
    fn from(turn: &Turn) -> Self {
        Self {
            role: turn.role.into(),
            text: turn.content.clone(),
        }
    }
}
