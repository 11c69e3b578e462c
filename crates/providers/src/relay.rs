//! Relay completion client.
//!
//! Talks to the Folio relay's `/api/chat` endpoint instead of the
//! upstream directly, so the widget process never holds the upstream
//! credential. Wire contract: request `{messages, model, max_tokens,
//! temperature}`, success `{response, usage}`, failure `{error}`.

use async_trait::async_trait;
use folio_core::completion::{CompletionRequest, CompletionResponse, CompletionService, Usage};
use folio_core::error::CompletionError;
use folio_core::message::{Role, Turn};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A client for the Folio relay.
pub struct RelayClient {
    base_url: String,
    client: reqwest::Client,
}

impl RelayClient {
    /// Create a new relay client. `base_url` is the relay root,
    /// e.g. `http://127.0.0.1:8787`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        }
    }

    fn to_wire_messages(messages: &[Turn]) -> Vec<WireMessage> {
        messages
            .iter()
            .map(|t| WireMessage {
                role: match t.role {
                    Role::System => "system".into(),
                    Role::User => "user".into(),
                    Role::Assistant => "assistant".into(),
                },
                content: t.content.clone(),
            })
            .collect()
    }
}

#[async_trait]
impl CompletionService for RelayClient {
    fn name(&self) -> &str {
        "relay"
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> std::result::Result<CompletionResponse, CompletionError> {
        let url = format!("{}/api/chat", self.base_url);

        let body = RelayRequest {
            messages: Self::to_wire_messages(&request.messages),
            model: request.model.clone(),
            max_tokens: request.max_tokens,
            temperature: request.temperature,
        };

        debug!(model = %request.model, "Sending completion request via relay");

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    CompletionError::Timeout(e.to_string())
                } else {
                    CompletionError::Network(e.to_string())
                }
            })?;

        let status = response.status().as_u16();
        if status != 200 {
            let error_body = response.text().await.unwrap_or_default();
            return Err(CompletionError::ApiError {
                status_code: status,
                message: error_body,
            });
        }

        let relay_response: RelayResponse = response
            .json()
            .await
            .map_err(|e| CompletionError::MalformedResponse(e.to_string()))?;

        Ok(CompletionResponse {
            text: relay_response.response,
            usage: relay_response.usage,
            model: request.model,
        })
    }

    async fn health_check(&self) -> std::result::Result<bool, CompletionError> {
        let url = format!("{}/health", self.base_url);
        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CompletionError::Network(e.to_string()))?;

        Ok(response.status().is_success())
    }
}

// --- Wire types (internal) ---

#[derive(Debug, Serialize)]
struct RelayRequest {
    messages: Vec<WireMessage>,
    model: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct RelayResponse {
    response: String,
    #[serde(default)]
    usage: Option<Usage>,
}
