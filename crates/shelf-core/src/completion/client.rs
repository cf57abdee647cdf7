use crate::conversation::OutboundTurn;
use crate::error::Result;
use async_trait::async_trait;

/// Sampling parameters sent with every completion request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_output_tokens: 1024,
        }
    }
}

/// A fully assembled completion request.
#[derive(Debug, Clone, PartialEq)]
pub struct CompletionRequest {
    /// Conversation context followed by the newest user message.
    pub contents: Vec<OutboundTurn>,
    pub generation: GenerationConfig,
}

/// A hosted language model that answers a conversation.
///
/// Implementations return the raw reply text; interpreting it is left to
/// [`super::ChatReply::parse`].
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: CompletionRequest) -> Result<String>;
}
