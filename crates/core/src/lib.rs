//! # Folio Core
//!
//! Domain types, traits, and error definitions for the Folio portfolio
//! assistant. This crate has **zero framework dependencies** — it defines
//! the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The completion backend is defined as a trait here; implementations live
//! in `folio-providers`. This enables:
//! - Swapping the remote service via configuration
//! - Easy testing with mock/stub implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod completion;
pub mod error;
pub mod message;

// Re-export key types at crate root for ergonomics
pub use completion::{CompletionRequest, CompletionResponse, CompletionService, Usage};
pub use error::{Error, Result};
pub use message::{Conversation, Role, Turn};
