//! RecordStoreClient - the spreadsheet-backed record store over HTTP.
//!
//! Every call is a POST to one endpoint with an action-tagged JSON body. The
//! body goes out as `text/plain` because the endpoint cannot answer a CORS
//! preflight, and the web front end shares the same contract.

use crate::dto::{ApiEnvelope, BookPatchDto, BookRecordDto};
use async_trait::async_trait;
use reqwest::{Client, header::CONTENT_TYPE};
use serde::Serialize;
use serde_json::{Map, Value, json};
use shelf_core::account::{AccountGateway, AuthResponse};
use shelf_core::book::{BookPatch, BookRecord, BookRepository};
use shelf_core::{Result, ShelfError};

/// Client for the action-tagged record-store endpoint.
#[derive(Clone)]
pub struct RecordStoreClient {
    client: Client,
    endpoint: String,
}

impl RecordStoreClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            endpoint: endpoint.into(),
        }
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call(&self, action: &str, payload: Value) -> Result<ApiEnvelope> {
        let body = action_body(action, payload)?;
        tracing::debug!("[RecordStore] POST action={}", action);

        let response = self
            .client
            .post(&self.endpoint)
            .header(CONTENT_TYPE, "text/plain;charset=utf-8")
            .body(body.to_string())
            .send()
            .await
            .map_err(|err| ShelfError::network(format!("Record store request failed: {err}")))?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            tracing::warn!("[RecordStore] {} answered {}: {}", action, status, detail);
            return Err(ShelfError::network(format!(
                "Record store answered {status} for {action}"
            )));
        }

        let text = response
            .text()
            .await
            .map_err(|err| ShelfError::network(format!("Failed to read record store body: {err}")))?;
        parse_envelope(&text)
    }

    /// Calls a book mutation; `success: false` becomes `Rejected`.
    async fn mutate(&self, action: &str, payload: Value) -> Result<()> {
        let envelope = self.call(action, payload).await?;
        if envelope.success {
            Ok(())
        } else {
            let reason = envelope.reason();
            tracing::warn!("[RecordStore] {} rejected: {}", action, reason);
            Err(ShelfError::Rejected(reason))
        }
    }
}

/// Builds `{"action": action, ...payload}`.
pub fn action_body(action: &str, payload: Value) -> Result<Value> {
    let mut body = match payload {
        Value::Object(map) => map,
        Value::Null => Map::new(),
        other => {
            return Err(ShelfError::internal(format!(
                "Record store payload must be an object, got {other}"
            )));
        }
    };
    body.insert("action".to_string(), Value::String(action.to_string()));
    Ok(Value::Object(body))
}

fn to_payload<T: Serialize>(value: &T) -> Result<Value> {
    Ok(serde_json::to_value(value)?)
}

/// Parses a response body; a body that is not an envelope counts as a
/// transport failure.
pub fn parse_envelope(text: &str) -> Result<ApiEnvelope> {
    serde_json::from_str(text).map_err(|err| {
        tracing::warn!("[RecordStore] Unparseable response: {}", err);
        ShelfError::network(format!("Record store returned an unreadable response: {err}"))
    })
}

/// Normalizes the rows of a `getBooks` response, skipping non-object rows.
pub fn records_from_envelope(envelope: &ApiEnvelope, owner: &str) -> Vec<BookRecord> {
    envelope
        .rows()
        .iter()
        .enumerate()
        .filter_map(|(ordinal, row)| {
            BookRecordDto::from_json(row).map(|dto| dto.into_domain(owner, ordinal))
        })
        .collect()
}

#[async_trait]
impl BookRepository for RecordStoreClient {
    async fn list_books(&self, user_id: &str) -> Result<Vec<BookRecord>> {
        let envelope = self.call("getBooks", json!({ "User_ID": user_id })).await?;
        if !envelope.success && envelope.data.is_none() {
            tracing::warn!("[RecordStore] getBooks failed: {}", envelope.reason());
        }
        let records = records_from_envelope(&envelope, user_id);
        tracing::debug!("[RecordStore] {} books for {}", records.len(), user_id);
        Ok(records)
    }

    async fn add_book(&self, record: &BookRecord) -> Result<()> {
        let payload = to_payload(&BookRecordDto::from(record))?;
        self.mutate("addBook", payload).await
    }

    async fn update_book(&self, patch: &BookPatch) -> Result<()> {
        let payload = to_payload(&BookPatchDto::from(patch))?;
        self.mutate("updateBook", payload).await
    }

    async fn delete_book(&self, book_id: &str) -> Result<()> {
        self.mutate("delete", json!({ "Book_ID": book_id })).await
    }
}

#[async_trait]
impl AccountGateway for RecordStoreClient {
    async fn login(&self, user_id: &str, pass_hash: &str) -> Result<AuthResponse> {
        let envelope = self
            .call("login", json!({ "id": user_id, "passHash": pass_hash }))
            .await?;
        Ok(envelope.into())
    }

    async fn sign_up(
        &self,
        user_id: &str,
        pass_hash: &str,
        email: Option<&str>,
    ) -> Result<AuthResponse> {
        let envelope = self
            .call(
                "signUp",
                json!({ "id": user_id, "passHash": pass_hash, "email": email.unwrap_or("") }),
            )
            .await?;
        Ok(envelope.into())
    }

    async fn send_verification_code(&self, email: &str) -> Result<AuthResponse> {
        let envelope = self
            .call("sendVerificationCode", json!({ "email": email }))
            .await?;
        Ok(envelope.into())
    }

    async fn reset_password(
        &self,
        email: &str,
        code: &str,
        new_pass_hash: &str,
    ) -> Result<AuthResponse> {
        let envelope = self
            .call(
                "resetPassword",
                json!({ "email": email, "code": code, "newPassHash": new_pass_hash }),
            )
            .await?;
        Ok(envelope.into())
    }

    async fn bind_email(&self, user_id: &str, email: &str) -> Result<AuthResponse> {
        let envelope = self
            .call("bindEmail", json!({ "userId": user_id, "email": email }))
            .await?;
        Ok(envelope.into())
    }
}
