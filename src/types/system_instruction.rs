use serde::{Deserialize, Serialize};

use crate::types::Part;

/// The system instruction supplied with a request.
///
/// On the wire this is a role-less content object with text parts only.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SystemInstruction {
    /// The instruction text, as parts.
    pub parts: Vec<Part>,
}

impl SystemInstruction {
    /// Create a system instruction from a single string.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            parts: vec![Part::text(text)],
        }
    }
}

impl From<String> for SystemInstruction {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&str> for SystemInstruction {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::{json, to_value};

    #[test]
    fn serialization() {
        let instruction = SystemInstruction::new("You are a concise assistant.");
        let json = to_value(&instruction).unwrap();
        assert_eq!(
            json,
            json!({
                "parts": [{"text": "You are a concise assistant."}]
            })
        );
    }
}
