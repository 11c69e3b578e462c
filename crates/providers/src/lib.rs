//! # Folio Providers
//!
//! `CompletionService` implementations:
//!
//! - [`OpenAiCompatClient`] — talks to any OpenAI-compatible
//!   `/chat/completions` endpoint. Used by the relay (and directly by the
//!   CLI when an API key is configured).
//! - [`RelayClient`] — talks to the Folio relay's `/api/chat` endpoint,
//!   keeping the upstream credential out of the client process.

pub mod openai;
pub mod relay;

pub use openai::OpenAiCompatClient;
pub use relay::RelayClient;
