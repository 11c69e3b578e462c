//! HTTP relay for Folio.
//!
//! The relay is the only process that holds the upstream API credential.
//! It exposes one chat endpoint that validates the request, forwards it
//! to the OpenAI-compatible upstream, and returns the completion text:
//!
//! - `POST /api/chat` — `{messages, model?, max_tokens?, temperature?}`
//!   → `{response, usage}` on success, `{error}` otherwise
//! - `GET  /health`   — liveness check
//!
//! CORS is fully open (the widget is served from arbitrary static
//! hosting); `OPTIONS` preflights are answered with 200 and no body.
//! Wrong methods get 405 from the method router.

use axum::{
    Router,
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
};
use folio_config::{AppConfig, ChatConfig};
use folio_core::completion::{CompletionRequest, CompletionService};
use folio_core::message::Turn;
use folio_providers::OpenAiCompatClient;
use serde::Deserialize;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};

/// Shared relay state.
pub struct RelayState {
    /// The upstream client; `None` when no API key is configured.
    pub upstream: Option<Arc<dyn CompletionService>>,
    /// Default generation parameters for requests that omit them.
    pub defaults: ChatConfig,
}

pub type SharedState = Arc<RelayState>;

/// Build relay state from the application config.
pub fn state_from_config(config: &AppConfig) -> SharedState {
    let upstream: Option<Arc<dyn CompletionService>> = config.api_key.as_ref().map(|key| {
        Arc::new(OpenAiCompatClient::new(
            "openai",
            config.relay.upstream_url.clone(),
            key.clone(),
        )) as Arc<dyn CompletionService>
    });

    if upstream.is_none() {
        warn!("No API key configured — /api/chat will answer 500");
    }

    Arc::new(RelayState {
        upstream,
        defaults: config.chat.clone(),
    })
}

/// Build the relay router.
pub fn build_router(state: SharedState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/api/chat", post(chat_handler))
        .route("/health", get(health_handler))
        .layer(cors)
        .layer(tower_http::trace::TraceLayer::new_for_http())
        .with_state(state)
}

/// Start the relay HTTP server.
pub async fn serve(config: AppConfig) -> Result<(), Box<dyn std::error::Error>> {
    let addr = format!("{}:{}", config.relay.host, config.relay.port);
    let state = state_from_config(&config);
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(addr = %addr, "Relay listening");
    axum::serve(listener, router).await?;
    Ok(())
}

// ── Handlers ──────────────────────────────────────────────────────────────

/// One incoming prompt message on the wire.
#[derive(Debug, Deserialize)]
struct WireMessage {
    role: String,
    content: String,
}

async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn chat_handler(
    State(state): State<SharedState>,
    Json(body): Json<serde_json::Value>,
) -> (StatusCode, Json<serde_json::Value>) {
    // Validate before touching the upstream: messages must be an array
    // of {role, content} objects.
    let Some(raw_messages) = body.get("messages").filter(|m| m.is_array()) else {
        return error_response(StatusCode::BAD_REQUEST, "Invalid messages format");
    };

    let wire_messages: Vec<WireMessage> = match serde_json::from_value(raw_messages.clone()) {
        Ok(messages) => messages,
        Err(_) => return error_response(StatusCode::BAD_REQUEST, "Invalid messages format"),
    };

    let mut messages = Vec::with_capacity(wire_messages.len());
    for wire in &wire_messages {
        let turn = match wire.role.as_str() {
            "system" => Turn::system(&wire.content),
            "user" => Turn::user(&wire.content),
            "assistant" => Turn::assistant(&wire.content),
            _ => return error_response(StatusCode::BAD_REQUEST, "Invalid messages format"),
        };
        messages.push(turn);
    }

    // The credential check happens after validation but before any
    // upstream traffic; the body never says more than this.
    let Some(upstream) = &state.upstream else {
        warn!("Chat request received but no API key is configured");
        return error_response(StatusCode::INTERNAL_SERVER_ERROR, "API key not configured");
    };

    let request = CompletionRequest {
        model: body
            .get("model")
            .and_then(|m| m.as_str())
            .unwrap_or(&state.defaults.model)
            .to_string(),
        messages,
        temperature: body
            .get("temperature")
            .and_then(|t| t.as_f64())
            .map(|t| t as f32)
            .unwrap_or(state.defaults.temperature),
        max_tokens: Some(
            body.get("max_tokens")
                .and_then(|m| m.as_u64())
                .map(|m| m as u32)
                .unwrap_or(state.defaults.max_tokens),
        ),
    };

    match upstream.complete(request).await {
        Ok(response) => (
            StatusCode::OK,
            Json(serde_json::json!({
                "response": response.text,
                "usage": response.usage,
            })),
        ),
        Err(e) => {
            warn!(error = %e, "Upstream completion failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
        }
    }
}

fn error_response(status: StatusCode, message: &str) -> (StatusCode, Json<serde_json::Value>) {
    (status, Json(serde_json::json!({ "error": message })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use axum::body::Body;
    use axum::http::{Method, Request};
    use folio_core::completion::{CompletionResponse, Usage};
    use folio_core::error::CompletionError;
    use http_body_util::BodyExt;
    use std::sync::Mutex;
    use tower::ServiceExt;

    struct MockUpstream {
        result: Result<String, CompletionError>,
        call_count: Mutex<usize>,
    }

    impl MockUpstream {
        fn ok(reply: &str) -> Self {
            Self {
                result: Ok(reply.into()),
                call_count: Mutex::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                result: Err(CompletionError::Network("connection refused".into())),
                call_count: Mutex::new(0),
            }
        }
    }

    #[async_trait]
    impl CompletionService for MockUpstream {
        fn name(&self) -> &str {
            "mock"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            *self.call_count.lock().unwrap() += 1;
            match &self.result {
                Ok(text) => Ok(CompletionResponse {
                    text: text.clone(),
                    usage: Some(Usage {
                        prompt_tokens: 10,
                        completion_tokens: 5,
                        total_tokens: 15,
                    }),
                    model: "test-model".into(),
                }),
                Err(e) => Err(e.clone()),
            }
        }
    }

    fn router_with(upstream: Option<Arc<dyn CompletionService>>) -> Router {
        build_router(Arc::new(RelayState {
            upstream,
            defaults: ChatConfig::default(),
        }))
    }

    fn chat_request(body: &str) -> Request<Body> {
        Request::builder()
            .method(Method::POST)
            .uri("/api/chat")
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn get_on_chat_returns_405() {
        let router = router_with(Some(Arc::new(MockUpstream::ok("hi"))));
        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::GET)
                    .uri("/api/chat")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn preflight_options_returns_200() {
        let router = router_with(Some(Arc::new(MockUpstream::ok("hi"))));
        let response = router
            .oneshot(
                Request::builder()
                    .method(Method::OPTIONS)
                    .uri("/api/chat")
                    .header("origin", "https://example.com")
                    .header("access-control-request-method", "POST")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn missing_messages_returns_400() {
        let router = router_with(Some(Arc::new(MockUpstream::ok("hi"))));
        let response = router.oneshot(chat_request(r#"{"model":"m"}"#)).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(body_json(response).await["error"].is_string());
    }

    #[tokio::test]
    async fn non_array_messages_returns_400() {
        let router = router_with(Some(Arc::new(MockUpstream::ok("hi"))));
        let response = router
            .oneshot(chat_request(r#"{"messages":"nope"}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn unknown_role_returns_400() {
        let router = router_with(Some(Arc::new(MockUpstream::ok("hi"))));
        let response = router
            .oneshot(chat_request(
                r#"{"messages":[{"role":"robot","content":"hi"}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn missing_credential_returns_500_without_upstream_call() {
        let router = router_with(None);
        let response = router
            .oneshot(chat_request(
                r#"{"messages":[{"role":"user","content":"hi"}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert!(body["error"].is_string());
        // The body stays generic: no key material, no env var names
        assert!(!body["error"].as_str().unwrap().contains("OPENAI"));
    }

    #[tokio::test]
    async fn valid_request_returns_response_and_usage() {
        let upstream = Arc::new(MockUpstream::ok("Hello from upstream"));
        let router = router_with(Some(upstream.clone()));

        let response = router
            .oneshot(chat_request(
                r#"{"messages":[{"role":"user","content":"hi"}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = body_json(response).await;
        assert_eq!(body["response"], "Hello from upstream");
        assert_eq!(body["usage"]["total_tokens"], 15);
        assert_eq!(*upstream.call_count.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn upstream_failure_returns_generic_500() {
        let router = router_with(Some(Arc::new(MockUpstream::failing())));
        let response = router
            .oneshot(chat_request(
                r#"{"messages":[{"role":"user","content":"hi"}]}"#,
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let body = body_json(response).await;
        assert_eq!(body["error"], "Internal server error");
    }

    #[tokio::test]
    async fn validation_rejects_before_credential_check() {
        // Malformed body on a credential-less relay: 400, not 500
        let router = router_with(None);
        let response = router
            .oneshot(chat_request(r#"{"messages":42}"#))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn health_endpoint() {
        let router = router_with(None);
        let response = router
            .oneshot(
                Request::builder()
                    .uri("/health")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
