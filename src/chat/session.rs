//! Core chat session management.
//!
//! This module provides the `ChatSession` struct which manages conversation
//! state and handles streaming API interactions.

use futures::{Stream, StreamExt};

use crate::chat::config::ChatConfig;
use crate::client::Gemini;
use crate::error::{Error, Result};
use crate::render::Renderer;
use crate::store::{ConversationStore, MessageRole, StreamTicket};
use crate::types::{
    Content, ContentRole, GenerateContentRequest, GenerateContentResponse, GenerationConfig,
    InlineData, Model, UsageMetadata,
};

/// The fixed notice appended as a new assistant message when a stream
/// fails to open or dies mid-flight.
pub const CONNECTION_FAILURE_NOTICE: &str =
    "I'm having trouble connecting right now. Please try again.";

/// A chat session that manages conversation state and API interactions.
///
/// The session owns the conversation store and runs the one-at-a-time
/// streaming state machine: Idle until `send_streaming` is called, then
/// Sending (user message + placeholder appended), then Streaming
/// (fragments accumulate into the placeholder), then back to Idle on
/// completion or failure. The store's busy flag rejects overlapping
/// sends.
pub struct ChatSession {
    client: Gemini,
    config: ChatConfig,
    store: ConversationStore,
    pending_attachment: Option<InlineData>,
    usage_totals: UsageMetadata,
    last_turn_usage: Option<UsageMetadata>,
    request_count: u64,
}

/// Aggregated stats for a chat session.
#[derive(Debug, Clone)]
pub struct SessionStats {
    /// The model used for the session.
    pub model: Model,
    /// The number of messages in the conversation.
    pub message_count: usize,
    /// The system instruction.
    pub system_instruction: String,
    /// The sampling temperature, if set.
    pub temperature: Option<f32>,
    /// The top-p value, if set.
    pub top_p: Option<f32>,
    /// The top-k value, if set.
    pub top_k: Option<u32>,
    /// The maximum output tokens, if set.
    pub max_output_tokens: Option<u32>,
    /// MIME type of the staged attachment, if any.
    pub pending_attachment: Option<&'static str>,
    /// Total prompt tokens across all requests.
    pub total_prompt_tokens: u64,
    /// Total response tokens across all requests.
    pub total_response_tokens: u64,
    /// Total number of API requests made.
    pub total_requests: u64,
    /// Prompt tokens for the last turn, if reported.
    pub last_turn_prompt_tokens: Option<u64>,
    /// Response tokens for the last turn, if reported.
    pub last_turn_response_tokens: Option<u64>,
}

impl ChatSession {
    /// Creates a new chat session with the given client and configuration.
    pub fn new(client: Gemini, config: ChatConfig) -> Self {
        Self {
            client,
            config,
            store: ConversationStore::new(),
            pending_attachment: None,
            usage_totals: UsageMetadata::default(),
            last_turn_usage: None,
            request_count: 0,
        }
    }

    /// Sends a user message and streams the response.
    ///
    /// This method:
    /// 1. Consumes the staged attachment (whether or not the send succeeds)
    /// 2. Appends the user message and an empty assistant placeholder
    /// 3. Streams the response, folding each fragment into the placeholder
    /// 4. On failure, appends a new assistant message with a fixed notice,
    ///    leaving the placeholder exactly as it was
    ///
    /// The busy flag is released on every exit path.
    ///
    /// # Errors
    ///
    /// Returns an error if a response is already streaming, if there is
    /// nothing to send, or if the API request fails.
    pub async fn send_streaming(
        &mut self,
        user_input: &str,
        renderer: &mut dyn Renderer,
    ) -> Result<()> {
        if self.store.is_busy() {
            return Err(Error::bad_request(
                "a response is already streaming",
                Some("busy".to_string()),
            ));
        }
        if user_input.is_empty() && self.pending_attachment.is_none() {
            return Err(Error::validation(
                "nothing to send: no text and no staged attachment",
                Some("message".to_string()),
            ));
        }

        // The staged attachment is consumed the instant the send starts,
        // success or failure alike.
        let attachment = self.pending_attachment.take();
        self.store.push_user(user_input, attachment);

        let request = self.build_request();
        let ticket = self.store.begin_stream()?;
        let outcome = self.stream_turn(&ticket, &request, renderer).await;
        self.store.finish_stream(&ticket);
        renderer.finish_response();

        match outcome {
            Ok(usage) => {
                self.record_usage(usage);
                Ok(())
            }
            Err(err) => {
                // The partially-filled placeholder stays as it was; the
                // failure is a new message of its own.
                self.store.push_assistant(CONNECTION_FAILURE_NOTICE);
                Err(err)
            }
        }
    }

    async fn stream_turn(
        &mut self,
        ticket: &StreamTicket,
        request: &GenerateContentRequest,
        renderer: &mut dyn Renderer,
    ) -> Result<Option<UsageMetadata>> {
        let stream = self
            .client
            .stream_generate(&self.config.model, request)
            .await?;
        consume_stream(&mut self.store, ticket, stream, renderer).await
    }

    /// Builds the outgoing request from the full conversation history.
    ///
    /// Each stored message becomes one wire turn; the attachment part, if
    /// any, precedes the text part. Messages with no parts at all (an
    /// empty placeholder abandoned by a failed stream) are skipped since
    /// the API rejects part-less turns.
    fn build_request(&self) -> GenerateContentRequest {
        let contents: Vec<Content> = self
            .store
            .messages()
            .iter()
            .map(|message| {
                let role = match message.role {
                    MessageRole::User => ContentRole::User,
                    MessageRole::Assistant => ContentRole::Model,
                };
                Content::builder(role)
                    .maybe_image(message.attachment.clone())
                    .text(&message.text)
                    .build()
            })
            .filter(|content| !content.parts.is_empty())
            .collect();

        GenerateContentRequest::new(contents)
            .with_system_instruction(self.config.system_instruction.as_str())
            .with_generation_config(self.generation_config())
    }

    fn generation_config(&self) -> GenerationConfig {
        GenerationConfig {
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            top_k: self.config.top_k,
            max_output_tokens: self.config.max_output_tokens,
        }
    }

    fn record_usage(&mut self, usage: Option<UsageMetadata>) {
        self.request_count = self.request_count.saturating_add(1);
        self.last_turn_usage = usage;
        if let Some(usage) = usage {
            self.usage_totals.prompt_token_count += usage.prompt_token_count;
            self.usage_totals.candidates_token_count += usage.candidates_token_count;
            self.usage_totals.total_token_count += usage.total_token_count;
        }
    }

    /// Clears the conversation history, the staged attachment, and the
    /// busy flag.
    pub fn clear(&mut self) {
        self.store.clear();
        self.pending_attachment = None;
    }

    /// The conversation store.
    pub fn store(&self) -> &ConversationStore {
        &self.store
    }

    /// Returns the number of messages in the conversation.
    pub fn message_count(&self) -> usize {
        self.store.len()
    }

    /// Stages an attachment for the next message, replacing any previous
    /// one.
    pub fn stage_attachment(&mut self, attachment: InlineData) {
        self.pending_attachment = Some(attachment);
    }

    /// Reads an image file and stages it for the next message.
    ///
    /// On failure the previously staged attachment, if any, is untouched.
    pub fn attach_file(&mut self, path: &str) -> Result<()> {
        let attachment = InlineData::from_path(path)?;
        self.stage_attachment(attachment);
        Ok(())
    }

    /// Drops the staged attachment, if any.
    pub fn drop_attachment(&mut self) -> bool {
        self.pending_attachment.take().is_some()
    }

    /// The staged attachment, if any.
    pub fn pending_attachment(&self) -> Option<&InlineData> {
        self.pending_attachment.as_ref()
    }

    /// Changes the model used for future responses.
    pub fn set_model(&mut self, model: Model) {
        self.config.model = model;
    }

    /// Returns the current model.
    pub fn model(&self) -> &Model {
        &self.config.model
    }

    /// Sets the system instruction; `None` restores the default.
    pub fn set_system_instruction(&mut self, instruction: Option<String>) {
        self.config.system_instruction =
            instruction.unwrap_or_else(|| crate::chat::DEFAULT_SYSTEM_INSTRUCTION.to_string());
    }

    /// Returns the current system instruction.
    pub fn system_instruction(&self) -> &str {
        &self.config.system_instruction
    }

    /// Sets the sampling temperature.
    pub fn set_temperature(&mut self, temperature: Option<f32>) {
        self.config.temperature = temperature;
    }

    /// Sets the top-p value.
    pub fn set_top_p(&mut self, top_p: Option<f32>) {
        self.config.top_p = top_p;
    }

    /// Sets the top-k value.
    pub fn set_top_k(&mut self, top_k: Option<u32>) {
        self.config.top_k = top_k;
    }

    /// Sets the maximum output tokens per response.
    pub fn set_max_output_tokens(&mut self, max_output_tokens: Option<u32>) {
        self.config.max_output_tokens = max_output_tokens;
    }

    /// Returns the current session statistics snapshot.
    pub fn stats(&self) -> SessionStats {
        SessionStats {
            model: self.config.model.clone(),
            message_count: self.message_count(),
            system_instruction: self.config.system_instruction.clone(),
            temperature: self.config.temperature,
            top_p: self.config.top_p,
            top_k: self.config.top_k,
            max_output_tokens: self.config.max_output_tokens,
            pending_attachment: self
                .pending_attachment
                .as_ref()
                .map(|a| a.mime_type.as_str()),
            total_prompt_tokens: self.usage_totals.prompt_token_count,
            total_response_tokens: self.usage_totals.candidates_token_count,
            total_requests: self.request_count,
            last_turn_prompt_tokens: self.last_turn_usage.map(|u| u.prompt_token_count),
            last_turn_response_tokens: self.last_turn_usage.map(|u| u.candidates_token_count),
        }
    }
}

/// Folds a stream of response chunks into the placeholder named by
/// `ticket`, notifying the renderer once per applied fragment.
///
/// Fragments apply in arrival order. The first stream error stops
/// consumption; whatever accumulated stays in place.
async fn consume_stream<S>(
    store: &mut ConversationStore,
    ticket: &StreamTicket,
    stream: S,
    renderer: &mut dyn Renderer,
) -> Result<Option<UsageMetadata>>
where
    S: Stream<Item = Result<GenerateContentResponse>>,
{
    futures::pin_mut!(stream);
    let mut usage = None;
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if let Some(metadata) = chunk.usage_metadata {
            usage = Some(metadata);
        }
        let delta = chunk.text_delta();
        if !delta.is_empty() && store.apply_fragment(ticket, &delta) {
            renderer.print_text(&delta);
        }
    }
    Ok(usage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingRenderer;
    use crate::types::{Candidate, ImageMediaType, KnownModel, Part};
    use futures::stream;

    fn test_session() -> ChatSession {
        let client = Gemini::new(Some("test-key".to_string())).unwrap();
        ChatSession::new(client, ChatConfig::default())
    }

    fn chunk(text: &str) -> Result<GenerateContentResponse> {
        Ok(GenerateContentResponse {
            candidates: vec![Candidate {
                content: Some(Content::model(text)),
                finish_reason: None,
            }],
            usage_metadata: None,
        })
    }

    #[test]
    fn new_session_empty() {
        let session = test_session();
        assert_eq!(session.message_count(), 0);
        assert!(session.pending_attachment().is_none());
    }

    #[tokio::test]
    async fn send_rejected_while_busy() {
        let mut session = test_session();
        let _ticket = session.store.begin_stream().unwrap();
        let len_before = session.store.len();

        let mut renderer = RecordingRenderer::default();
        let err = session
            .send_streaming("second message", &mut renderer)
            .await
            .unwrap_err();
        assert!(err.is_bad_request());
        // The rejected send appended nothing.
        assert_eq!(session.store.len(), len_before);
    }

    #[tokio::test]
    async fn send_rejects_empty_input_without_attachment() {
        let mut session = test_session();
        let mut renderer = RecordingRenderer::default();
        let err = session.send_streaming("", &mut renderer).await.unwrap_err();
        assert!(err.is_validation());
        assert_eq!(session.message_count(), 0);
    }

    #[tokio::test]
    async fn send_failure_appends_notice_and_releases_busy() {
        // Connection refused: nothing is listening on this address.
        let client = Gemini::with_options(
            Some("test-key".to_string()),
            Some("http://127.0.0.1:1/".to_string()),
            None,
        )
        .unwrap();
        let mut session = ChatSession::new(client, ChatConfig::default());
        let mut renderer = RecordingRenderer::default();

        let err = session.send_streaming("Hi", &mut renderer).await.unwrap_err();
        assert!(err.is_connection() || matches!(err, Error::HttpClient { .. }));

        // [user "Hi", untouched empty placeholder, failure notice]
        let messages = session.store.messages();
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].text, "Hi");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].text, "");
        assert_eq!(messages[2].text, CONNECTION_FAILURE_NOTICE);
        assert!(!session.store.is_busy());
    }

    #[tokio::test]
    async fn scenario_send_hi_receive_hello() {
        let mut session = test_session();
        session.store.push_user("Hi", None);
        let ticket = session.store.begin_stream().unwrap();
        let mut renderer = RecordingRenderer::default();

        let fragments = stream::iter(vec![chunk("He"), chunk("llo!")]);
        consume_stream(&mut session.store, &ticket, fragments, &mut renderer)
            .await
            .unwrap();
        session.store.finish_stream(&ticket);

        let messages = session.store.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].text, "Hi");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].text, "Hello!");
        assert!(!session.store.is_busy());
        assert_eq!(renderer.fragments, vec!["He", "llo!"]);
    }

    #[tokio::test]
    async fn mid_flight_failure_leaves_partial_placeholder() {
        let mut session = test_session();
        session.store.push_user("Hi", None);
        let ticket = session.store.begin_stream().unwrap();
        let mut renderer = RecordingRenderer::default();

        let fragments = stream::iter(vec![
            chunk("Hel"),
            Err(Error::streaming("connection reset", None)),
            // Never reached; consumption stops at the first error.
            chunk("lo!"),
        ]);
        let err = consume_stream(&mut session.store, &ticket, fragments, &mut renderer)
            .await
            .unwrap_err();
        assert!(err.is_streaming());

        assert_eq!(session.store.messages()[1].text, "Hel");
        assert_eq!(renderer.fragments, vec!["Hel"]);
    }

    #[test]
    fn build_request_orders_image_before_text() {
        let mut session = test_session();
        let attachment = InlineData::new("AAAA".to_string(), ImageMediaType::Png);
        session.store.push_user("what is this?", Some(attachment));

        let request = session.build_request();
        assert_eq!(request.contents.len(), 1);
        let parts = &request.contents[0].parts;
        assert_eq!(parts.len(), 2);
        assert!(parts[0].is_inline_data());
        assert_eq!(parts[1].as_text(), Some("what is this?"));
        assert!(request.system_instruction.is_some());
    }

    #[test]
    fn build_request_attachment_only_message() {
        let mut session = test_session();
        let attachment = InlineData::new("AAAA".to_string(), ImageMediaType::Jpeg);
        session.store.push_user("", Some(attachment));

        let request = session.build_request();
        let parts = &request.contents[0].parts;
        assert_eq!(parts.len(), 1);
        assert!(parts[0].is_inline_data());
    }

    #[test]
    fn build_request_skips_empty_placeholder() {
        let mut session = test_session();
        session.store.push_user("Hi", None);
        session.store.push_assistant("");
        session.store.push_assistant(CONNECTION_FAILURE_NOTICE);

        let request = session.build_request();
        assert_eq!(request.contents.len(), 2);
        assert_eq!(request.contents[0].parts, vec![Part::text("Hi")]);
        assert_eq!(request.contents[1].role, Some(ContentRole::Model));
    }

    #[test]
    fn clear_session_resets_attachment() {
        let mut session = test_session();
        session.store.push_user("test", None);
        session.stage_attachment(InlineData::new("AAAA".to_string(), ImageMediaType::Png));
        assert_eq!(session.message_count(), 1);

        session.clear();
        assert_eq!(session.message_count(), 0);
        assert!(session.pending_attachment().is_none());
    }

    #[test]
    fn set_model() {
        let mut session = test_session();
        assert_eq!(session.model(), &Model::Known(KnownModel::Gemini25Flash));

        session.set_model(Model::Known(KnownModel::Gemini25Pro));
        assert_eq!(session.model(), &Model::Known(KnownModel::Gemini25Pro));
    }

    #[test]
    fn set_system_instruction_none_restores_default() {
        let mut session = test_session();
        session.set_system_instruction(Some("Be terse.".to_string()));
        assert_eq!(session.system_instruction(), "Be terse.");

        session.set_system_instruction(None);
        assert_eq!(
            session.system_instruction(),
            crate::chat::DEFAULT_SYSTEM_INSTRUCTION
        );
    }

    #[test]
    fn attach_file_failure_keeps_previous_attachment() {
        let mut session = test_session();
        let staged = InlineData::new("AAAA".to_string(), ImageMediaType::Png);
        session.stage_attachment(staged.clone());

        assert!(session.attach_file("/no/such/image.png").is_err());
        assert_eq!(session.pending_attachment(), Some(&staged));
    }
}
