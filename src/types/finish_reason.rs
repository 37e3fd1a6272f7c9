use serde::{Deserialize, Serialize};

/// The reason a candidate stopped generating.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FinishReason {
    /// Natural end of generation.
    Stop,

    /// The maximum output token limit was reached.
    MaxTokens,

    /// Generation was stopped for safety reasons.
    Safety,

    /// Generation was stopped for recitation of source material.
    Recitation,

    /// Any other, unspecified reason.
    #[serde(other)]
    Other,
}
