use crate::types::{KnownModel, Model};

/// Display metadata for a selectable model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    /// The model this entry describes.
    pub model: Model,

    /// A human-readable name for the model.
    pub display_name: &'static str,

    /// One-line description shown in model pickers.
    pub description: &'static str,
}

/// The static catalog of first-party selectable models.
///
/// This is display metadata only; any model identifier can still be used
/// via `Model::Custom`.
pub fn catalog() -> Vec<ModelInfo> {
    vec![
        ModelInfo {
            model: Model::Known(KnownModel::Gemini25Flash),
            display_name: "Gemini 2.5 Flash",
            description: "Fast responses for everyday chat",
        },
        ModelInfo {
            model: Model::Known(KnownModel::Gemini25Pro),
            display_name: "Gemini 2.5 Pro",
            description: "Stronger reasoning, slower and costlier",
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_both_variants() {
        let entries = catalog();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].model, Model::Known(KnownModel::Gemini25Flash));
        assert_eq!(entries[1].model, Model::Known(KnownModel::Gemini25Pro));
    }

    #[test]
    fn catalog_ids_are_unique() {
        let entries = catalog();
        let ids: Vec<String> = entries.iter().map(|e| e.model.to_string()).collect();
        let mut deduped = ids.clone();
        deduped.dedup();
        assert_eq!(ids, deduped);
    }
}
