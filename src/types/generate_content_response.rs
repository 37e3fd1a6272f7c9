use serde::{Deserialize, Serialize};

use crate::types::Candidate;

/// A non-streaming response, or one chunk of a streaming response.
///
/// A streaming response is a sequence of these objects; each carries the
/// text delta for that chunk, and the final chunk carries usage metadata
/// and a finish reason.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    /// The generated candidates; chat requests produce at most one.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub candidates: Vec<Candidate>,

    /// Token accounting, present on non-streaming responses and the final
    /// chunk of a stream.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_metadata: Option<UsageMetadata>,
}

/// Token accounting for a request.
#[derive(Debug, Copy, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    /// Tokens consumed by the prompt.
    #[serde(default)]
    pub prompt_token_count: u64,

    /// Tokens produced across all candidates.
    #[serde(default)]
    pub candidates_token_count: u64,

    /// Total tokens for the request.
    #[serde(default)]
    pub total_token_count: u64,
}

impl GenerateContentResponse {
    /// The text delta carried by this chunk: the concatenation of the
    /// first candidate's text parts. Empty if the chunk carries no text.
    pub fn text_delta(&self) -> String {
        self.candidates
            .first()
            .and_then(Candidate::text)
            .unwrap_or_default()
    }
}
