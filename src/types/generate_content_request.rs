use serde::{Deserialize, Serialize};

use crate::types::{Content, GenerationConfig, SystemInstruction};

/// The body of a `generateContent` or `streamGenerateContent` request.
///
/// The model identifier travels in the URL path, not the body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    /// The conversation so far, oldest turn first.
    pub contents: Vec<Content>,

    /// Optional system instruction applied to the whole request.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<SystemInstruction>,

    /// Optional sampling and length controls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

impl GenerateContentRequest {
    /// Create a new request from conversation turns.
    pub fn new(contents: Vec<Content>) -> Self {
        Self {
            contents,
            system_instruction: None,
            generation_config: None,
        }
    }

    /// Sets the system instruction.
    pub fn with_system_instruction(mut self, instruction: impl Into<SystemInstruction>) -> Self {
        self.system_instruction = Some(instruction.into());
        self
    }

    /// Sets the generation config. Empty configs are dropped.
    pub fn with_generation_config(mut self, config: GenerationConfig) -> Self {
        self.generation_config = if config.is_empty() {
            None
        } else {
            Some(config)
        };
        self
    }
}
