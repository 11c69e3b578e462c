//! # Folio Assistant
//!
//! Response orchestration for the portfolio chat widget: assembles the
//! prompt (persona + knowledge context + recent history + new query),
//! delegates to a remote completion service, and degrades to canned
//! replies when that service fails. The conversation log is only written
//! on the success path.

pub mod actions;
pub mod fallback;
pub mod policy;
pub mod prompt;

pub use actions::{QuickAction, suggest_actions};
pub use fallback::fallback_reply;
pub use policy::InputPolicy;

use folio_core::completion::{CompletionRequest, CompletionService};
use folio_core::message::{Conversation, Turn};
use folio_knowledge::{KnowledgeBase, build_context};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// One reply surfaced to the hosting UI.
#[derive(Debug, Clone)]
pub struct ChatReply {
    /// The reply text (completion, canned fallback, or policy notice)
    pub text: String,

    /// Suggested quick actions, when any triggered
    pub actions: Option<Vec<QuickAction>>,
}

/// The response orchestrator. Owns the conversation log for one session;
/// turns are strictly sequential (`respond` takes `&mut self`).
pub struct Assistant {
    service: Arc<dyn CompletionService>,
    kb: KnowledgeBase,
    conversation: Conversation,
    policy: InputPolicy,
    model: String,
    temperature: f32,
    max_tokens: u32,
}

impl Assistant {
    /// Create an assistant with default generation parameters
    /// (gpt-4o-mini, temperature 0.7, 800 max tokens).
    pub fn new(service: Arc<dyn CompletionService>, kb: KnowledgeBase) -> Self {
        Self {
            service,
            kb,
            conversation: Conversation::new(),
            policy: InputPolicy::default(),
            model: "gpt-4o-mini".into(),
            temperature: 0.7,
            max_tokens: 800,
        }
    }

    /// Set the model identifier sent to the completion service.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the sampling temperature.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    /// Set the max tokens per completion.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Set the input policy limits.
    pub fn with_limits(mut self, max_chars: usize, min_interval: Duration) -> Self {
        self.policy = InputPolicy::new(max_chars, min_interval);
        self
    }

    /// The conversation log (read-only).
    pub fn conversation(&self) -> &Conversation {
        &self.conversation
    }

    /// Handle one visitor query and produce a reply.
    ///
    /// Policy violations return a notice without building a prompt. A
    /// completion failure selects a canned fallback and leaves the
    /// conversation log untouched; only a successful completion appends
    /// the (user, assistant) turn pair.
    pub async fn respond(&mut self, query: &str) -> ChatReply {
        if let Some(notice) = self.policy.check(query) {
            debug!("Query rejected by input policy");
            return ChatReply {
                text: notice,
                actions: None,
            };
        }

        let context = build_context(query, &self.kb);
        let messages = prompt::assemble(
            prompt::system_prompt(&self.kb),
            &context,
            self.conversation.recent(prompt::HISTORY_WINDOW),
            query,
        );

        let request = CompletionRequest {
            model: self.model.clone(),
            messages,
            temperature: self.temperature,
            max_tokens: Some(self.max_tokens),
        };

        match self.service.complete(request).await {
            Ok(response) => {
                self.conversation.push(Turn::user(query));
                self.conversation.push(Turn::assistant(&response.text));

                let actions = suggest_actions(query, &response.text);
                ChatReply {
                    text: response.text,
                    actions,
                }
            }
            Err(e) => {
                warn!(error = %e, "Completion service failed, using canned fallback");
                let text = fallback_reply(query);
                let actions = suggest_actions(query, &text);
                ChatReply { text, actions }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use folio_core::completion::CompletionResponse;
    use folio_core::error::CompletionError;
    use folio_core::message::Role;
    use std::sync::Mutex;

    /// A mock service that always succeeds and records requests.
    struct SuccessService {
        reply: String,
        requests: Mutex<Vec<CompletionRequest>>,
    }

    impl SuccessService {
        fn new(reply: &str) -> Self {
            Self {
                reply: reply.into(),
                requests: Mutex::new(Vec::new()),
            }
        }

        fn calls(&self) -> usize {
            self.requests.lock().unwrap().len()
        }
    }

    #[async_trait]
    impl CompletionService for SuccessService {
        fn name(&self) -> &str {
            "success"
        }

        async fn complete(
            &self,
            request: CompletionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            self.requests.lock().unwrap().push(request);
            Ok(CompletionResponse {
                text: self.reply.clone(),
                usage: None,
                model: "test-model".into(),
            })
        }
    }

    /// A mock service that always fails.
    struct FailingService {
        call_count: Mutex<usize>,
    }

    impl FailingService {
        fn new() -> Self {
            Self {
                call_count: Mutex::new(0),
            }
        }

        fn calls(&self) -> usize {
            *self.call_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl CompletionService for FailingService {
        fn name(&self) -> &str {
            "failing"
        }

        async fn complete(
            &self,
            _request: CompletionRequest,
        ) -> Result<CompletionResponse, CompletionError> {
            *self.call_count.lock().unwrap() += 1;
            Err(CompletionError::Network("connection refused".into()))
        }
    }

    fn no_rate_limit(assistant: Assistant) -> Assistant {
        assistant.with_limits(500, Duration::from_millis(0))
    }

    #[tokio::test]
    async fn success_returns_text_verbatim_and_appends_two_turns() {
        let service = Arc::new(SuccessService::new("Here is my answer."));
        let mut assistant = Assistant::new(service, KnowledgeBase::fallback());

        let reply = assistant.respond("What do you do?").await;

        assert_eq!(reply.text, "Here is my answer.");
        let turns = &assistant.conversation().turns;
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::User);
        assert_eq!(turns[0].content, "What do you do?");
        assert_eq!(turns[1].role, Role::Assistant);
        assert_eq!(turns[1].content, "Here is my answer.");
    }

    #[tokio::test]
    async fn failure_returns_fallback_and_leaves_history_untouched() {
        let service = Arc::new(FailingService::new());
        let mut assistant = Assistant::new(service.clone(), KnowledgeBase::fallback());

        let reply = assistant.respond("Tell me about your healthcare work").await;

        assert!(!reply.text.is_empty());
        assert!(reply.text.contains("healthcare"));
        assert_eq!(service.calls(), 1);
        assert!(assistant.conversation().is_empty());
    }

    #[tokio::test]
    async fn prompt_contains_system_context_history_and_query() {
        let service = Arc::new(SuccessService::new("ok"));
        let mut assistant = no_rate_limit(Assistant::new(
            service.clone(),
            KnowledgeBase::fallback(),
        ));

        assistant.respond("first question").await;
        assistant.respond("second question").await;

        let requests = service.requests.lock().unwrap();
        let messages = &requests[1].messages;

        // system prompt, context, 2 history turns, new user turn
        assert_eq!(messages.len(), 5);
        assert_eq!(messages[0].role, Role::System);
        assert!(messages[1].content.starts_with("Relevant Context:\n"));
        assert_eq!(messages[2].content, "first question");
        assert_eq!(messages[3].content, "ok");
        assert_eq!(messages[4].content, "second question");
    }

    #[tokio::test]
    async fn history_window_is_capped_at_six() {
        let service = Arc::new(SuccessService::new("ok"));
        let mut assistant = no_rate_limit(Assistant::new(
            service.clone(),
            KnowledgeBase::fallback(),
        ));

        for i in 0..5 {
            assistant.respond(&format!("question {i}")).await;
        }

        let requests = service.requests.lock().unwrap();
        // Fifth call: 8 turns in the log, only the last 6 replayed
        let messages = &requests[4].messages;
        assert_eq!(messages.len(), 2 + 6 + 1);
        assert_eq!(messages[2].content, "question 1");
    }

    #[tokio::test]
    async fn generation_parameters_forwarded() {
        let service = Arc::new(SuccessService::new("ok"));
        let mut assistant = Assistant::new(service.clone(), KnowledgeBase::fallback())
            .with_model("gpt-4o")
            .with_temperature(0.2)
            .with_max_tokens(100);

        assistant.respond("hello there").await;

        let requests = service.requests.lock().unwrap();
        assert_eq!(requests[0].model, "gpt-4o");
        assert!((requests[0].temperature - 0.2).abs() < f32::EPSILON);
        assert_eq!(requests[0].max_tokens, Some(100));
    }

    #[tokio::test]
    async fn rapid_resubmission_is_rejected_without_upstream_call() {
        let service = Arc::new(SuccessService::new("ok"));
        let mut assistant = Assistant::new(service.clone(), KnowledgeBase::fallback());

        let first = assistant.respond("first").await;
        let second = assistant.respond("second").await;

        assert_eq!(first.text, "ok");
        assert!(second.text.contains("wait a moment"));
        assert_eq!(service.calls(), 1);
        // The rejected turn never reaches the log
        assert_eq!(assistant.conversation().len(), 2);
    }

    #[tokio::test]
    async fn over_length_message_rejected_without_upstream_call() {
        let service = Arc::new(SuccessService::new("ok"));
        let mut assistant = Assistant::new(service.clone(), KnowledgeBase::fallback());

        let reply = assistant.respond(&"a".repeat(501)).await;

        assert!(reply.text.contains("500 characters"));
        assert_eq!(service.calls(), 0);
        assert!(assistant.conversation().is_empty());
    }

    #[tokio::test]
    async fn boundary_length_message_accepted() {
        let service = Arc::new(SuccessService::new("ok"));
        let mut assistant = Assistant::new(service.clone(), KnowledgeBase::fallback());

        let reply = assistant.respond(&"a".repeat(500)).await;

        assert_eq!(reply.text, "ok");
        assert_eq!(service.calls(), 1);
    }

    #[tokio::test]
    async fn actions_suggested_from_query_and_reply() {
        let service = Arc::new(SuccessService::new("Check out this project of mine."));
        let mut assistant = Assistant::new(service, KnowledgeBase::fallback());

        let reply = assistant.respond("can I try the demo?").await;

        let actions = reply.actions.unwrap();
        assert!(actions.contains(&QuickAction::TryModelDemo));
        assert!(actions.contains(&QuickAction::SeeAllProjects));
    }
}
