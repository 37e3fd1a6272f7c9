//! Interactive chat functionality for the Gemini API.
//!
//! This module provides the pieces of the interactive chat client: slash
//! command parsing, session configuration, and the streaming session
//! itself. The `geminius-chat` binary wires them to a readline loop.

pub mod commands;
pub mod config;
pub mod session;

pub use commands::{ChatCommand, help_text, parse_command};
pub use config::{ChatArgs, ChatConfig, DEFAULT_SYSTEM_INSTRUCTION};
pub use session::{CONNECTION_FAILURE_NOTICE, ChatSession, SessionStats};

pub use crate::render::{PlainTextRenderer, Renderer};
