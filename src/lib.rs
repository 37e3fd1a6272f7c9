// Public modules
pub mod chat;
pub mod client;
pub mod error;
pub mod render;
pub mod store;
pub mod types;

// Re-exports
pub use client::Gemini;
pub use error::{Error, Result};
pub use store::{ChatMessage, ConversationStore, MessageRole, StreamTicket};
pub use types::*;
