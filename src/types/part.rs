use serde::{Deserialize, Serialize};

use crate::types::InlineData;

/// One typed unit of content within a conversational turn.
///
/// A part is either inline media (an image) or text. There is no escape
/// hatch to an untyped payload; everything sent to or received from the
/// API passes through this union.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum Part {
    /// An inline-data (image) part.
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },

    /// A text part.
    Text { text: String },
}

impl Part {
    /// Create a text part.
    pub fn text(text: impl Into<String>) -> Self {
        Part::Text { text: text.into() }
    }

    /// Create an inline-data part.
    pub fn inline_data(inline_data: InlineData) -> Self {
        Part::InlineData { inline_data }
    }

    /// Returns the text content if this is a text part.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Part::Text { text } => Some(text),
            Part::InlineData { .. } => None,
        }
    }

    /// Returns true if this is an inline-data part.
    pub fn is_inline_data(&self) -> bool {
        matches!(self, Part::InlineData { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageMediaType;
    use serde_json::{from_value, json, to_value};

    #[test]
    fn text_part_serialization() {
        let part = Part::text("Hello");
        let json = to_value(&part).unwrap();
        assert_eq!(json, json!({"text": "Hello"}));
    }

    #[test]
    fn inline_data_part_serialization() {
        let part = Part::inline_data(InlineData::new(
            "AAAA".to_string(),
            ImageMediaType::Png,
        ));
        let json = to_value(&part).unwrap();
        assert_eq!(
            json,
            json!({
                "inlineData": {
                    "mimeType": "image/png",
                    "data": "AAAA"
                }
            })
        );
    }

    #[test]
    fn part_deserialization() {
        let part: Part = from_value(json!({"text": "hi"})).unwrap();
        assert_eq!(part.as_text(), Some("hi"));

        let part: Part = from_value(json!({
            "inlineData": {"mimeType": "image/jpeg", "data": "AAAA"}
        }))
        .unwrap();
        assert!(part.is_inline_data());
        assert!(part.as_text().is_none());
    }
}
