pub mod chat;
pub mod relay;
