//! In-memory conversation state.
//!
//! The store owns the ordered message history and enforces the streaming
//! invariants: at most one in-flight assistant message, a busy flag that
//! rejects overlapping sends, and a generation token that lets a cleared
//! store discard fragments from a stream that outlived it.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{Error, Result};
use crate::types::InlineData;

/// The role of a stored message.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// A message authored by the user.
    User,

    /// A message authored by the model.
    Assistant,
}

/// One message in a conversation.
///
/// The id and role never change after creation. Only the text of the
/// unique in-flight assistant placeholder may grow, and only through
/// [`ConversationStore::apply_fragment`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChatMessage {
    /// Opaque identifier, unique within the store.
    pub id: String,

    /// Who authored the message.
    pub role: MessageRole,

    /// The message text. Append-only for in-flight assistant messages.
    pub text: String,

    /// When the message was created.
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,

    /// Optional image attachment.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachment: Option<InlineData>,
}

/// Permit to mutate one streaming placeholder.
///
/// Issued by [`ConversationStore::begin_stream`]; fragment application and
/// stream completion both require it. The embedded generation makes the
/// ticket stale once the store is cleared, so late deliveries from an
/// abandoned stream are discarded rather than resurrected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StreamTicket {
    placeholder_id: String,
    generation: u64,
}

impl StreamTicket {
    /// The id of the placeholder message this ticket targets.
    pub fn placeholder_id(&self) -> &str {
        &self.placeholder_id
    }
}

/// Ordered, in-memory message history for one conversation.
#[derive(Debug, Default)]
pub struct ConversationStore {
    messages: Vec<ChatMessage>,
    next_id: u64,
    generation: u64,
    in_flight: Option<StreamTicket>,
}

impl ConversationStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// The messages in chronological order.
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// The number of messages in the conversation.
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// Returns true if the conversation is empty.
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Returns true while a stream is mutating a placeholder.
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some()
    }

    /// The current generation, advanced by [`clear`](Self::clear).
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Appends a user message and returns its id.
    pub fn push_user(&mut self, text: impl Into<String>, attachment: Option<InlineData>) -> String {
        self.push(MessageRole::User, text.into(), attachment)
    }

    /// Appends a completed assistant message and returns its id.
    pub fn push_assistant(&mut self, text: impl Into<String>) -> String {
        self.push(MessageRole::Assistant, text.into(), None)
    }

    /// Begins a streaming turn: sets the busy flag and appends an empty
    /// assistant placeholder.
    ///
    /// # Errors
    ///
    /// Returns a bad-request error if a stream is already in flight. The
    /// store is not modified in that case.
    pub fn begin_stream(&mut self) -> Result<StreamTicket> {
        if self.in_flight.is_some() {
            return Err(Error::bad_request(
                "a response is already streaming",
                Some("busy".to_string()),
            ));
        }
        let placeholder_id = self.push(MessageRole::Assistant, String::new(), None);
        let ticket = StreamTicket {
            placeholder_id,
            generation: self.generation,
        };
        self.in_flight = Some(ticket.clone());
        Ok(ticket)
    }

    /// Appends a text fragment to the placeholder named by `ticket`.
    ///
    /// Fragments apply in call order; the text only ever grows. Returns
    /// false without touching the store if the ticket is stale (the store
    /// was cleared) or does not match the in-flight placeholder.
    pub fn apply_fragment(&mut self, ticket: &StreamTicket, fragment: &str) -> bool {
        if self.in_flight.as_ref() != Some(ticket) {
            return false;
        }
        let Some(message) = self
            .messages
            .iter_mut()
            .find(|m| m.id == ticket.placeholder_id)
        else {
            return false;
        };
        message.text.push_str(fragment);
        true
    }

    /// Ends the stream named by `ticket`, releasing the busy flag.
    ///
    /// Safe to call on every exit path; stale tickets are ignored (a
    /// `clear` already released the flag).
    pub fn finish_stream(&mut self, ticket: &StreamTicket) {
        if self.in_flight.as_ref() == Some(ticket) {
            self.in_flight = None;
        }
    }

    /// Empties the conversation, releases the busy flag, and advances the
    /// generation so in-flight tickets become stale.
    pub fn clear(&mut self) {
        self.messages.clear();
        self.in_flight = None;
        self.generation += 1;
    }

    fn push(&mut self, role: MessageRole, text: String, attachment: Option<InlineData>) -> String {
        let id = format!("msg_{:08}", self.next_id);
        self.next_id += 1;
        self.messages.push(ChatMessage {
            id: id.clone(),
            role,
            text,
            created_at: OffsetDateTime::now_utc(),
            attachment,
        });
        id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ImageMediaType;

    fn sample_attachment() -> InlineData {
        InlineData::new("AAAA".to_string(), ImageMediaType::Png)
    }

    #[test]
    fn append_order_and_unique_ids() {
        let mut store = ConversationStore::new();
        let a = store.push_user("one", None);
        let b = store.push_assistant("two");
        let c = store.push_user("three", Some(sample_attachment()));

        let texts: Vec<&str> = store.messages().iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "two", "three"]);
        assert_ne!(a, b);
        assert_ne!(b, c);
        assert_ne!(a, c);
        assert!(store.messages()[2].attachment.is_some());
    }

    #[test]
    fn begin_stream_rejects_while_busy() {
        let mut store = ConversationStore::new();
        let _ticket = store.begin_stream().unwrap();
        assert!(store.is_busy());

        let err = store.begin_stream().unwrap_err();
        assert!(err.is_bad_request());
        // The rejected call must not have appended a second placeholder.
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn fragment_accumulation_is_associative() {
        let mut split = ConversationStore::new();
        let ticket = split.begin_stream().unwrap();
        assert!(split.apply_fragment(&ticket, "Hel"));
        assert!(split.apply_fragment(&ticket, "lo"));
        split.finish_stream(&ticket);

        let mut whole = ConversationStore::new();
        let ticket = whole.begin_stream().unwrap();
        assert!(whole.apply_fragment(&ticket, "Hello"));
        whole.finish_stream(&ticket);

        assert_eq!(split.messages()[0].text, "Hello");
        assert_eq!(split.messages()[0].text, whole.messages()[0].text);
        assert!(!split.is_busy());
    }

    #[test]
    fn finish_stream_releases_busy() {
        let mut store = ConversationStore::new();
        let ticket = store.begin_stream().unwrap();
        store.finish_stream(&ticket);
        assert!(!store.is_busy());
        // A second finish with the same ticket is harmless.
        store.finish_stream(&ticket);
        assert!(!store.is_busy());
    }

    #[test]
    fn clear_resets_everything() {
        let mut store = ConversationStore::new();
        store.push_user("hi", Some(sample_attachment()));
        let ticket = store.begin_stream().unwrap();
        store.apply_fragment(&ticket, "partial");

        store.clear();
        assert!(store.is_empty());
        assert!(!store.is_busy());
    }

    #[test]
    fn stale_ticket_discarded_after_clear() {
        let mut store = ConversationStore::new();
        let ticket = store.begin_stream().unwrap();
        store.clear();

        // Late deliveries from the abandoned stream must not mutate the
        // (now different) conversation.
        store.push_user("fresh start", None);
        let fresh = store.begin_stream().unwrap();
        assert!(!store.apply_fragment(&ticket, "stale"));
        assert_eq!(store.messages()[1].text, "");

        // Finishing the stale stream must not release the fresh one.
        store.finish_stream(&ticket);
        assert!(store.is_busy());
        store.finish_stream(&fresh);
        assert!(!store.is_busy());
    }

    #[test]
    fn apply_fragment_ignores_non_placeholder_ids() {
        let mut store = ConversationStore::new();
        store.push_user("hi", None);
        let forged = StreamTicket {
            placeholder_id: "msg_00000000".to_string(),
            generation: store.generation(),
        };
        assert!(!store.apply_fragment(&forged, "nope"));
        assert_eq!(store.messages()[0].text, "hi");
    }
}
