//! Configuration types for the chat application.
//!
//! This module provides CLI argument parsing via `arrrg` and configuration
//! structures for controlling chat behavior.

use arrrg_derive::CommandLine;

use crate::types::{KnownModel, Model};

/// The system instruction supplied with every request unless overridden.
pub const DEFAULT_SYSTEM_INSTRUCTION: &str =
    "You are a helpful assistant. Answer clearly and concisely.";

/// Command-line arguments for the geminius-chat tool.
#[derive(CommandLine, Debug, Default, PartialEq, Eq)]
pub struct ChatArgs {
    /// Model to use for chat.
    #[arrrg(optional, "Model to use (default: gemini-2.5-flash)", "MODEL")]
    pub model: Option<String>,

    /// System instruction to set context for the conversation.
    #[arrrg(optional, "System instruction for the conversation", "PROMPT")]
    pub system: Option<String>,

    /// Maximum tokens per response.
    #[arrrg(optional, "Max tokens per response (default: model default)", "TOKENS")]
    pub max_tokens: Option<u32>,

    /// Disable ANSI colors and styles.
    #[arrrg(flag, "Disable ANSI colors/styles")]
    pub no_color: bool,
}

/// Configuration for a chat session.
///
/// This struct holds the resolved configuration values after processing
/// command-line arguments with appropriate defaults.
#[derive(Debug, Clone)]
pub struct ChatConfig {
    /// The model to use for generating responses.
    pub model: Model,

    /// The system instruction sent with every request.
    pub system_instruction: String,

    /// Whether to use ANSI colors and styles in output.
    pub use_color: bool,

    /// Optional sampling temperature.
    pub temperature: Option<f32>,

    /// Optional top-p nucleus sampling value.
    pub top_p: Option<f32>,

    /// Optional top-k sampling limit.
    pub top_k: Option<u32>,

    /// Optional maximum tokens per response.
    pub max_output_tokens: Option<u32>,
}

impl ChatConfig {
    /// Creates a new ChatConfig with default values.
    ///
    /// Defaults:
    /// - Model: gemini-2.5-flash
    /// - System instruction: [`DEFAULT_SYSTEM_INSTRUCTION`]
    /// - Color: enabled
    /// - Sampling and length limits: model defaults
    pub fn new() -> Self {
        Self {
            model: Model::Known(KnownModel::Gemini25Flash),
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_string(),
            use_color: true,
            temperature: None,
            top_p: None,
            top_k: None,
            max_output_tokens: None,
        }
    }

    /// Sets the model to use.
    pub fn with_model(mut self, model: Model) -> Self {
        self.model = model;
        self
    }

    /// Sets the system instruction.
    pub fn with_system_instruction(mut self, instruction: String) -> Self {
        self.system_instruction = instruction;
        self
    }

    /// Disables ANSI color output.
    pub fn without_color(mut self) -> Self {
        self.use_color = false;
        self
    }

    /// Sets the sampling temperature.
    pub fn with_temperature(mut self, temperature: Option<f32>) -> Self {
        self.temperature = temperature;
        self
    }

    /// Sets the top-p value.
    pub fn with_top_p(mut self, top_p: Option<f32>) -> Self {
        self.top_p = top_p;
        self
    }

    /// Sets the top-k value.
    pub fn with_top_k(mut self, top_k: Option<u32>) -> Self {
        self.top_k = top_k;
        self
    }

    /// Sets the maximum output tokens per response.
    pub fn with_max_output_tokens(mut self, max_output_tokens: Option<u32>) -> Self {
        self.max_output_tokens = max_output_tokens;
        self
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl From<ChatArgs> for ChatConfig {
    fn from(args: ChatArgs) -> Self {
        let model = args
            .model
            .map(|s| s.parse::<Model>().unwrap_or(Model::Custom(s)))
            .unwrap_or(Model::Known(KnownModel::Gemini25Flash));

        ChatConfig {
            model,
            system_instruction: args
                .system
                .unwrap_or_else(|| DEFAULT_SYSTEM_INSTRUCTION.to_string()),
            use_color: !args.no_color,
            max_output_tokens: args.max_tokens,
            ..ChatConfig::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = ChatConfig::new();
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Flash));
        assert_eq!(config.system_instruction, DEFAULT_SYSTEM_INSTRUCTION);
        assert!(config.use_color);
        assert!(config.temperature.is_none());
        assert!(config.top_p.is_none());
        assert!(config.top_k.is_none());
        assert!(config.max_output_tokens.is_none());
    }

    #[test]
    fn config_from_args_defaults() {
        let args = ChatArgs::default();
        let config = ChatConfig::from(args);
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Flash));
        assert_eq!(config.system_instruction, DEFAULT_SYSTEM_INSTRUCTION);
        assert!(config.use_color);
    }

    #[test]
    fn config_from_args_custom() {
        let args = ChatArgs {
            model: Some("gemini-2.5-pro".to_string()),
            system: Some("You are terse.".to_string()),
            max_tokens: Some(8192),
            no_color: true,
        };
        let config = ChatConfig::from(args);
        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(config.system_instruction, "You are terse.");
        assert_eq!(config.max_output_tokens, Some(8192));
        assert!(!config.use_color);
    }

    #[test]
    fn config_builder_pattern() {
        let config = ChatConfig::new()
            .with_model(Model::Known(KnownModel::Gemini25Pro))
            .with_system_instruction("Test prompt".to_string())
            .without_color()
            .with_temperature(Some(0.6))
            .with_top_p(Some(0.9))
            .with_top_k(Some(64))
            .with_max_output_tokens(Some(2048));

        assert_eq!(config.model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(config.system_instruction, "Test prompt");
        assert!(!config.use_color);
        assert_eq!(config.temperature, Some(0.6));
        assert_eq!(config.top_p, Some(0.9));
        assert_eq!(config.top_k, Some(64));
        assert_eq!(config.max_output_tokens, Some(2048));
    }
}
