use serde::Deserialize;

/// A parsed assistant reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatReply {
    pub text: String,
    pub keywords: Vec<String>,
}

#[derive(Deserialize)]
struct ReplyDto {
    text: String,
    #[serde(default)]
    keywords: Vec<String>,
}

impl ChatReply {
    /// Parses a `{text, keywords}` reply, tolerating code fences.
    ///
    /// Anything that is not such an object degrades to a plain-text reply
    /// (the fence-stripped raw text) with no keywords. Blank keywords are
    /// dropped.
    pub fn parse(raw: &str) -> Self {
        let cleaned = strip_code_fences(raw);
        match serde_json::from_str::<ReplyDto>(&cleaned) {
            Ok(dto) => Self {
                text: dto.text,
                keywords: dto
                    .keywords
                    .into_iter()
                    .map(|k| k.trim().to_string())
                    .filter(|k| !k.is_empty())
                    .collect(),
            },
            Err(err) => {
                tracing::debug!("[ChatReply] Reply is not structured JSON: {}", err);
                Self {
                    text: cleaned,
                    keywords: Vec::new(),
                }
            }
        }
    }
}

fn strip_code_fences(raw: &str) -> String {
    raw.replace("```json\n", "")
        .replace("```json", "")
        .replace("```\n", "")
        .replace("```", "")
        .trim()
        .to_string()
}
