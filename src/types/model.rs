use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Represents a Gemini model identifier.
///
/// This can be a predefined model version or a custom string value
/// for models that may be added in the future.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Model {
    /// Known model versions
    Known(KnownModel),

    /// Custom model identifier (for future models or private models)
    Custom(String),
}

/// Known Gemini model versions
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KnownModel {
    /// Gemini 2.5 Flash, the fast general-purpose variant.
    #[serde(rename = "gemini-2.5-flash")]
    Gemini25Flash,

    /// Gemini 2.5 Pro, the higher-quality reasoning variant.
    #[serde(rename = "gemini-2.5-pro")]
    Gemini25Pro,
}

impl fmt::Display for Model {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Model::Known(known_model) => write!(f, "{}", known_model),
            Model::Custom(custom) => write!(f, "{}", custom),
        }
    }
}

impl fmt::Display for KnownModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KnownModel::Gemini25Flash => write!(f, "gemini-2.5-flash"),
            KnownModel::Gemini25Pro => write!(f, "gemini-2.5-pro"),
        }
    }
}

impl FromStr for Model {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "gemini-2.5-flash" => Model::Known(KnownModel::Gemini25Flash),
            "gemini-2.5-pro" => Model::Known(KnownModel::Gemini25Pro),
            other => Model::Custom(other.to_string()),
        })
    }
}

impl From<KnownModel> for Model {
    fn from(model: KnownModel) -> Self {
        Model::Known(model)
    }
}

impl From<String> for Model {
    fn from(model: String) -> Self {
        Model::Custom(model)
    }
}

impl From<&str> for Model {
    fn from(model: &str) -> Self {
        Model::Custom(model.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_model_serialization() {
        let model = Model::Known(KnownModel::Gemini25Flash);
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""gemini-2.5-flash""#);

        let model = Model::Known(KnownModel::Gemini25Pro);
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""gemini-2.5-pro""#);
    }

    #[test]
    fn test_custom_model_serialization() {
        let model = Model::Custom("gemini-experimental".to_string());
        let json = serde_json::to_string(&model).unwrap();
        assert_eq!(json, r#""gemini-experimental""#);
    }

    #[test]
    fn test_model_deserialization() {
        let json = r#""gemini-2.5-flash""#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(model, Model::Known(KnownModel::Gemini25Flash));

        let json = r#""gemini-experimental""#;
        let model: Model = serde_json::from_str(json).unwrap();
        assert_eq!(model, Model::Custom("gemini-experimental".to_string()));
    }

    #[test]
    fn test_from_str_round_trips_display() {
        let model: Model = "gemini-2.5-pro".parse().unwrap();
        assert_eq!(model, Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(model.to_string(), "gemini-2.5-pro");

        let model: Model = "my-tuned-model".parse().unwrap();
        assert_eq!(model, Model::Custom("my-tuned-model".to_string()));
        assert_eq!(model.to_string(), "my-tuned-model");
    }
}
