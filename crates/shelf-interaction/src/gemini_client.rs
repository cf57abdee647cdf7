//! GeminiCompletionClient - Direct REST API implementation for Gemini.
//!
//! Sends the book conversation to `generateContent` and returns the raw reply
//! text. The API key comes from `secret.json` (or `GEMINI_API_KEY`).

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use shelf_core::completion::{CompletionClient, CompletionRequest};
use shelf_core::config::DEFAULT_GEMINI_MODEL;
use shelf_core::conversation::OutboundRole;
use shelf_core::secret::SecretService;
use shelf_core::{Result, ShelfError};

const BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Returned when the response carries no text, so reply parsing falls back
/// to an empty reply.
const EMPTY_REPLY: &str = "{}";

/// Completion client that talks to the Gemini HTTP API.
#[derive(Clone)]
pub struct GeminiCompletionClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl GeminiCompletionClient {
    /// Creates a new client with the provided API key and model.
    pub fn new(api_key: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            model: model.into(),
            base_url: BASE_URL.to_string(),
        }
    }

    /// Loads the API key from the secret service.
    ///
    /// Model precedence: `model` argument, then `model_name` in secret.json,
    /// then the default model.
    pub async fn try_from_secrets(
        service: &dyn SecretService,
        model: Option<&str>,
    ) -> Result<Self> {
        let secret_config = service
            .load_secrets()
            .await
            .map_err(|e| ShelfError::config(format!("Failed to load secret.json: {e}")))?;

        let gemini_config = secret_config.gemini.ok_or_else(|| {
            ShelfError::config("Gemini configuration not found in secret.json")
        })?;

        if gemini_config.api_key.trim().is_empty() {
            return Err(ShelfError::config("Gemini api_key in secret.json is empty"));
        }

        let model = model
            .map(str::to_string)
            .or(gemini_config.model_name)
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());

        Ok(Self::new(gemini_config.api_key, model))
    }

    /// Overrides the model after construction.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Points the client at a different API root.
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    async fn send_request(&self, body: &GenerateContentRequest) -> Result<String> {
        let url = format!(
            "{}/{model}:generateContent?key={api_key}",
            self.base_url,
            model = self.model,
            api_key = self.api_key
        );

        let response = self
            .client
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|err| transport_error("Gemini API request failed", err))?;

        if !response.status().is_success() {
            let status = response.status();
            let body_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to read Gemini error body".to_string());
            let err = map_http_error(status, body_text);
            tracing::warn!("[GeminiClient] {}", err);
            return Err(err);
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|err| transport_error("Failed to read Gemini response", err))?;

        Ok(extract_text_response(parsed))
    }
}

#[async_trait]
impl CompletionClient for GeminiCompletionClient {
    async fn complete(&self, request: CompletionRequest) -> Result<String> {
        tracing::debug!(
            "[GeminiClient] model={} turns={}",
            self.model,
            request.contents.len()
        );
        self.send_request(&GenerateContentRequest::from(&request))
            .await
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfigBody,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfigBody {
    temperature: f32,
    max_output_tokens: u32,
}

impl From<&CompletionRequest> for GenerateContentRequest {
    fn from(request: &CompletionRequest) -> Self {
        let contents = request
            .contents
            .iter()
            .map(|turn| Content {
                role: match turn.role {
                    OutboundRole::User => "user",
                    OutboundRole::Model => "model",
                },
                parts: vec![Part {
                    text: turn.text.clone(),
                }],
            })
            .collect();

        Self {
            contents,
            generation_config: GenerationConfigBody {
                temperature: request.generation.temperature,
                max_output_tokens: request.generation.max_output_tokens,
            },
        }
    }
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<ContentResponse>,
}

#[derive(Deserialize)]
struct ContentResponse {
    #[serde(default)]
    parts: Vec<PartResponse>,
}

#[derive(Deserialize)]
struct PartResponse {
    text: Option<String>,
}

#[derive(Deserialize)]
struct ErrorWrapper {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    status: Option<String>,
}

/// The request URL carries the API key, so it is dropped from the message.
fn transport_error(context: &str, err: reqwest::Error) -> ShelfError {
    ShelfError::network(format!("{context}: {}", err.without_url()))
}

/// First candidate's first text part, or `"{}"` when there is none.
fn extract_text_response(response: GenerateContentResponse) -> String {
    response
        .candidates
        .and_then(|candidates| candidates.into_iter().next())
        .and_then(|candidate| candidate.content)
        .and_then(|content| content.parts.into_iter().find_map(|part| part.text))
        .unwrap_or_else(|| EMPTY_REPLY.to_string())
}

fn map_http_error(status: StatusCode, body: String) -> ShelfError {
    let (status_text, message) = serde_json::from_str::<ErrorWrapper>(&body)
        .map(|wrapper| {
            let status_text = wrapper.error.status.unwrap_or_default();
            let msg = wrapper.error.message.unwrap_or_else(|| body.clone());
            (status_text, msg)
        })
        .unwrap_or_else(|_| (String::new(), body.clone()));

    let message = if status_text.is_empty() {
        message
    } else {
        format!("{status_text}: {message}")
    };

    let quota = status == StatusCode::TOO_MANY_REQUESTS
        || status_text == "RESOURCE_EXHAUSTED"
        || message.to_lowercase().contains("quota");

    if quota {
        ShelfError::QuotaExceeded(message)
    } else {
        ShelfError::Completion {
            status_code: Some(status.as_u16()),
            message,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::json;
    use shelf_core::completion::GenerationConfig;
    use shelf_core::config::{GeminiConfig, SecretConfig};
    use shelf_core::conversation::OutboundTurn;

    struct StaticSecrets(SecretConfig);

    #[async_trait]
    impl SecretService for StaticSecrets {
        async fn load_secrets(&self) -> std::result::Result<SecretConfig, String> {
            Ok(self.0.clone())
        }

        async fn secret_file_exists(&self) -> bool {
            true
        }
    }

    fn secrets(model_name: Option<&str>) -> StaticSecrets {
        StaticSecrets(SecretConfig {
            gemini: Some(GeminiConfig {
                api_key: "test-key".into(),
                model_name: model_name.map(str::to_string),
            }),
        })
    }

    #[test]
    fn test_request_body_shape() {
        let request = CompletionRequest {
            contents: vec![
                OutboundTurn {
                    role: OutboundRole::User,
                    text: "hello".into(),
                },
                OutboundTurn {
                    role: OutboundRole::Model,
                    text: "hi".into(),
                },
            ],
            generation: GenerationConfig {
                temperature: 0.5,
                max_output_tokens: 256,
            },
        };

        let body = serde_json::to_value(GenerateContentRequest::from(&request)).unwrap();

        assert_eq!(
            body,
            json!({
                "contents": [
                    {"role": "user", "parts": [{"text": "hello"}]},
                    {"role": "model", "parts": [{"text": "hi"}]}
                ],
                "generationConfig": {"temperature": 0.5, "maxOutputTokens": 256}
            })
        );
    }

    #[test]
    fn test_extract_first_candidate_text() {
        let response: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [
                {"content": {"parts": [{"text": "first"}, {"text": "second"}]}},
                {"content": {"parts": [{"text": "other candidate"}]}}
            ]
        }))
        .unwrap();
        assert_eq!(extract_text_response(response), "first");

        let empty: GenerateContentResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(extract_text_response(empty), "{}");

        let no_parts: GenerateContentResponse =
            serde_json::from_value(json!({"candidates": [{"content": {}}]})).unwrap();
        assert_eq!(extract_text_response(no_parts), "{}");
    }

    #[test]
    fn test_http_error_mapping() {
        let err = map_http_error(StatusCode::TOO_MANY_REQUESTS, "slow down".into());
        assert!(matches!(err, ShelfError::QuotaExceeded(_)));

        let body = r#"{"error": {"code": 429, "message": "Quota exceeded for metric", "status": "RESOURCE_EXHAUSTED"}}"#;
        let err = map_http_error(StatusCode::BAD_REQUEST, body.into());
        assert_eq!(
            err,
            ShelfError::QuotaExceeded("RESOURCE_EXHAUSTED: Quota exceeded for metric".into())
        );

        let body = r#"{"error": {"message": "API key not valid", "status": "INVALID_ARGUMENT"}}"#;
        let err = map_http_error(StatusCode::BAD_REQUEST, body.into());
        assert_eq!(
            err,
            ShelfError::Completion {
                status_code: Some(400),
                message: "INVALID_ARGUMENT: API key not valid".into(),
            }
        );
        assert!(!err.is_quota());
    }

    #[tokio::test]
    async fn test_try_from_secrets_model_precedence() {
        let client = GeminiCompletionClient::try_from_secrets(&secrets(None), None)
            .await
            .unwrap();
        assert_eq!(client.model(), DEFAULT_GEMINI_MODEL);

        let client = GeminiCompletionClient::try_from_secrets(&secrets(Some("gemini-pro")), None)
            .await
            .unwrap();
        assert_eq!(client.model(), "gemini-pro");

        let client =
            GeminiCompletionClient::try_from_secrets(&secrets(Some("gemini-pro")), Some("custom"))
                .await
                .unwrap();
        assert_eq!(client.model(), "custom");
    }

    #[tokio::test]
    async fn test_try_from_secrets_requires_gemini_section() {
        let service = StaticSecrets(SecretConfig::default());
        let err = GeminiCompletionClient::try_from_secrets(&service, None)
            .await
            .err()
            .unwrap();
        assert!(matches!(err, ShelfError::Config(_)));
    }

    #[tokio::test]
    async fn test_unreachable_api_is_network_error() {
        let client = GeminiCompletionClient::new("secret-api-key", "model")
            .with_base_url("http://127.0.0.1:9/v1beta");
        let request = CompletionRequest {
            contents: vec![],
            generation: GenerationConfig::default(),
        };
        let err = client.complete(request).await.unwrap_err();
        assert!(err.is_network());
        assert!(!err.to_string().contains("secret-api-key"));
        assert!(!err.to_string().contains("key="));
        assert_eq!(
            shelf_core::completion::failure_reply(&err),
            shelf_core::completion::CONNECTION_FAILED_MESSAGE
        );
    }
}
