use super::client::{CompletionRequest, GenerationConfig};
use crate::book::Book;
use crate::conversation::{ConversationStore, OutboundRole, OutboundTurn};

/// The book facts folded into the instructional preamble.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BookContext {
    pub title: String,
    pub author: String,
    pub category: String,
}

impl From<&Book> for BookContext {
    fn from(book: &Book) -> Self {
        Self {
            title: book.title.clone(),
            author: book.author.clone(),
            category: book.category.clone(),
        }
    }
}

/// Instructions that set up the assistant and its JSON reply format.
pub fn instruction_preamble(book: &BookContext, reply_language: &str) -> String {
    format!(
        "You are a thoughtful reading assistant discussing \"{title}\" (author: {author}, \
         category: {category}) with the user. Reply in JSON with exactly two fields: \
         1. \"text\": your conversational reply, written in {reply_language}, natural and insightful; \
         2. \"keywords\": an array of 2-4 core concepts taken from your reply, written in {reply_language}. \
         Return only the JSON object and nothing else.",
        title = book.title,
        author = book.author,
        category = book.category,
    )
}

/// Builds the request for a new user message.
///
/// The integration has no separate system channel, so on the first exchange
/// (only the greeting in the store) the preamble is folded into the user
/// message. Later exchanges send the history followed by the plain message.
/// `store` must not yet contain `user_message`.
pub fn build_request(
    store: &ConversationStore,
    user_message: &str,
    book: &BookContext,
    reply_language: &str,
    generation: GenerationConfig,
) -> CompletionRequest {
    let mut contents = store.to_outbound_history();
    let text = if contents.is_empty() {
        format!(
            "{}\n\nThe user asks: {}",
            instruction_preamble(book, reply_language),
            user_message
        )
    } else {
        user_message.to_string()
    };
    contents.push(OutboundTurn {
        role: OutboundRole::User,
        text,
    });

    CompletionRequest {
        contents,
        generation,
    }
}
