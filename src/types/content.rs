use serde::{Deserialize, Serialize};

use crate::types::{InlineData, Part};

/// The role attached to a turn of content on the wire.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentRole {
    /// The end user.
    User,

    /// The model.
    Model,
}

/// One conversational turn: a role plus an ordered list of parts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Content {
    /// The role of the turn.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<ContentRole>,

    /// The parts of the turn, inline-data parts first.
    pub parts: Vec<Part>,
}

impl Content {
    /// Create a new `Content` with the given role and parts.
    ///
    /// Prefer [`Content::builder`], which enforces the API's part
    /// ordering contract.
    pub fn new(role: ContentRole, parts: Vec<Part>) -> Self {
        Self {
            role: Some(role),
            parts,
        }
    }

    /// Start building a turn for the given role.
    pub fn builder(role: ContentRole) -> ContentBuilder {
        ContentBuilder {
            role,
            images: Vec::new(),
            texts: Vec::new(),
        }
    }

    /// Create a user turn with a single text part.
    pub fn user(text: impl Into<String>) -> Self {
        Self::new(ContentRole::User, vec![Part::text(text)])
    }

    /// Create a model turn with a single text part.
    pub fn model(text: impl Into<String>) -> Self {
        Self::new(ContentRole::Model, vec![Part::text(text)])
    }

    /// Concatenation of all text parts in this turn.
    pub fn text(&self) -> String {
        self.parts
            .iter()
            .filter_map(Part::as_text)
            .collect::<Vec<_>>()
            .concat()
    }
}

/// Builds a `Content` turn while enforcing part ordering.
///
/// The API requires inline-data parts to precede text parts within a
/// turn. The builder emits them in that order regardless of the order
/// the caller supplied them.
#[derive(Debug)]
pub struct ContentBuilder {
    role: ContentRole,
    images: Vec<Part>,
    texts: Vec<Part>,
}

impl ContentBuilder {
    /// Add an inline-data (image) part.
    pub fn image(mut self, inline_data: InlineData) -> Self {
        self.images.push(Part::inline_data(inline_data));
        self
    }

    /// Add an optional inline-data part.
    pub fn maybe_image(self, inline_data: Option<InlineData>) -> Self {
        match inline_data {
            Some(inline_data) => self.image(inline_data),
            None => self,
        }
    }

    /// Add a text part. Empty text is skipped.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.texts.push(Part::text(text));
        }
        self
    }

    /// Finish the turn. Inline-data parts always precede text parts.
    pub fn build(self) -> Content {
        let mut parts = self.images;
        parts.extend(self.texts);
        Content {
            role: Some(self.role),
            parts,
        }
    }
}
