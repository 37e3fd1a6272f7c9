use serde::{Deserialize, Serialize};

use crate::types::{Content, FinishReason};

/// One generated candidate within a response chunk.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    /// The content generated so far for this candidate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<Content>,

    /// Why this candidate stopped, present on the final chunk.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub finish_reason: Option<FinishReason>,
}

impl Candidate {
    /// Concatenation of the candidate's text parts, if any content exists.
    pub fn text(&self) -> Option<String> {
        self.content.as_ref().map(Content::text)
    }
}
