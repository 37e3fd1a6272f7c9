use bytes::Bytes;
use futures::Stream;
use futures::stream::{self, StreamExt};
use reqwest::header::{HeaderMap, HeaderValue};
use reqwest::{Client as ReqwestClient, Response, header};
use serde::Deserialize;
use std::env;
use std::pin::Pin;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::types::{GenerateContentRequest, GenerateContentResponse, Model};

const DEFAULT_API_URL: &str = "https://generativelanguage.googleapis.com/v1beta/";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Client for the Gemini API.
#[derive(Debug, Clone)]
pub struct Gemini {
    api_key: HeaderValue,
    client: ReqwestClient,
    base_url: String,
    timeout: Duration,
}

impl Gemini {
    /// Create a new Gemini client.
    ///
    /// The API key can be provided directly or read from the GEMINI_API_KEY
    /// environment variable. Without a key no outbound request is possible,
    /// so a missing key is an error here rather than at send time.
    pub fn new(api_key: Option<String>) -> Result<Self> {
        Self::with_options(api_key, None, None)
    }

    /// Create a new client with custom settings.
    pub fn with_options(
        api_key: Option<String>,
        base_url: Option<String>,
        timeout: Option<Duration>,
    ) -> Result<Self> {
        let api_key = match api_key {
            Some(key) => key,
            None => env::var("GEMINI_API_KEY").map_err(|_| {
                Error::authentication(
                    "API key not provided and GEMINI_API_KEY environment variable not set",
                )
            })?,
        };

        // Header values reject control and non-ASCII bytes; catch a
        // malformed key here rather than panicking at send time.
        let api_key = HeaderValue::from_str(&api_key)
            .map_err(|_| Error::authentication("API key contains invalid header characters"))?;

        let timeout = timeout.unwrap_or(DEFAULT_TIMEOUT);
        let client = ReqwestClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| {
                Error::http_client(
                    format!("Failed to build HTTP client: {}", e),
                    Some(Box::new(e)),
                )
            })?;

        Ok(Self {
            api_key,
            client,
            base_url: base_url.unwrap_or_else(|| DEFAULT_API_URL.to_string()),
            timeout,
        })
    }

    /// Create and return default headers for API requests.
    fn default_headers(&self) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        headers.insert(header::ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", self.api_key.clone());
        headers
    }

    /// Process API response errors and convert to our Error type
    async fn process_error_response(response: Response) -> Error {
        let status_code = response.status().as_u16();

        let retry_after = response
            .headers()
            .get("retry-after")
            .and_then(|val| val.to_str().ok())
            .and_then(|val| val.parse::<u64>().ok());

        // Try to parse error response body
        #[derive(Deserialize)]
        struct ErrorResponse {
            error: Option<ErrorDetail>,
        }

        #[derive(Deserialize)]
        struct ErrorDetail {
            status: Option<String>,
            message: Option<String>,
        }

        let error_body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                return Error::http_client(
                    format!("Failed to read error response: {}", e),
                    Some(Box::new(e)),
                );
            }
        };

        let parsed_error = serde_json::from_str::<ErrorResponse>(&error_body).ok();
        let error_status = parsed_error
            .as_ref()
            .and_then(|e| e.error.as_ref())
            .and_then(|e| e.status.clone());
        let error_message = parsed_error
            .as_ref()
            .and_then(|e| e.error.as_ref())
            .and_then(|e| e.message.clone())
            .unwrap_or_else(|| error_body.clone());

        // Map HTTP status code to appropriate error type
        match status_code {
            400 => Error::bad_request(error_message, None),
            401 => Error::authentication(error_message),
            403 => Error::permission(error_message),
            404 => Error::not_found(error_message),
            408 => Error::timeout(error_message, None),
            429 => Error::rate_limit(error_message, retry_after),
            500 => Error::internal_server(error_message),
            502..=504 => Error::service_unavailable(error_message, retry_after),
            _ => Error::api(status_code, error_status, error_message),
        }
    }

    fn map_request_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::timeout(
                format!("Request timed out: {}", e),
                Some(self.timeout.as_secs_f64()),
            )
        } else if e.is_connect() {
            Error::connection(format!("Connection error: {}", e), Some(Box::new(e)))
        } else {
            Error::http_client(format!("Request failed: {}", e), Some(Box::new(e)))
        }
    }

    /// Send a request to the API and get a non-streaming response.
    pub async fn generate(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse> {
        let url = format!("{}models/{}:generateContent", self.base_url, model);

        let response = self
            .client
            .post(&url)
            .headers(self.default_headers())
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        response.json::<GenerateContentResponse>().await.map_err(|e| {
            Error::serialization(
                format!("Failed to parse response: {}", e),
                Some(Box::new(e)),
            )
        })
    }

    /// Send a request to the API and get a streaming response.
    ///
    /// Returns a stream of GenerateContentResponse chunks that can be
    /// processed incrementally; each chunk carries a text delta.
    pub async fn stream_generate(
        &self,
        model: &Model,
        request: &GenerateContentRequest,
    ) -> Result<Pin<Box<dyn Stream<Item = Result<GenerateContentResponse>> + Send>>> {
        let url = format!(
            "{}models/{}:streamGenerateContent?alt=sse",
            self.base_url, model
        );

        let mut headers = self.default_headers();
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/event-stream"),
        );

        let response = self
            .client
            .post(&url)
            .headers(headers)
            .json(request)
            .send()
            .await
            .map_err(|e| self.map_request_error(e))?;

        if !response.status().is_success() {
            return Err(Self::process_error_response(response).await);
        }

        let stream = response.bytes_stream();
        let event_stream = process_sse(stream);

        Ok(Box::pin(event_stream))
    }
}

/// Process a stream of bytes into a stream of server-sent event chunks
fn process_sse<S>(byte_stream: S) -> impl Stream<Item = Result<GenerateContentResponse>>
where
    S: Stream<Item = std::result::Result<Bytes, reqwest::Error>> + Unpin + Send + 'static,
{
    // Convert reqwest errors to our error type
    let stream = byte_stream.map(|result| {
        result.map_err(|e| {
            Error::streaming(format!("Error in HTTP stream: {}", e), Some(Box::new(e)))
        })
    });

    // Use a state machine to process the SSE stream. Reads are raw
    // bytes; a multi-byte character may straddle two reads, so undecoded
    // bytes are carried in `pending` until the rest of the sequence
    // arrives.
    let buffer = String::new();
    let pending: Vec<u8> = Vec::new();

    stream::unfold(
        (stream, buffer, pending),
        move |(mut stream, mut buffer, mut pending)| async move {
            loop {
                // First check if we have a complete event in the buffer
                if let Some((event, remaining)) = extract_event(&buffer) {
                    buffer = remaining;
                    match event {
                        Some(event) => return Some((event, (stream, buffer, pending))),
                        // Comment/empty event; keep scanning.
                        None => continue,
                    }
                }

                // Read more data
                match stream.next().await {
                    Some(Ok(bytes)) => {
                        pending.extend_from_slice(&bytes);
                        match decode_valid_prefix(&mut pending) {
                            // The server delimits events with CRLF pairs;
                            // normalize so extract_event only sees "\n\n".
                            Ok(text) => buffer.push_str(&text.replace('\r', "")),
                            Err(e) => {
                                return Some((Err(e), (stream, buffer, pending)));
                            }
                        }
                    }
                    Some(Err(e)) => {
                        return Some((Err(e), (stream, buffer, pending)));
                    }
                    None => {
                        // End of stream
                        if !pending.is_empty() {
                            pending.clear();
                            return Some((
                                Err(Error::encoding(
                                    "stream ended inside a UTF-8 sequence",
                                    None,
                                )),
                                (stream, buffer, pending),
                            ));
                        }
                        if !buffer.is_empty() {
                            buffer.push_str("\n\n");
                            if let Some((Some(event), remaining)) = extract_event(&buffer) {
                                buffer = remaining;
                                return Some((event, (stream, buffer, pending)));
                            }
                            buffer.clear();
                        }
                        return None;
                    }
                }
            }
        },
    )
}

/// Decode the longest valid UTF-8 prefix of `pending`, leaving any
/// trailing incomplete sequence in place for the next read. Bytes that
/// can never begin a valid sequence are an error.
fn decode_valid_prefix(pending: &mut Vec<u8>) -> Result<String> {
    match std::str::from_utf8(pending) {
        Ok(text) => {
            let text = text.to_string();
            pending.clear();
            Ok(text)
        }
        // error_len() of None means the buffer ends mid-sequence; the
        // remaining bytes arrive with the next read.
        Err(e) if e.error_len().is_none() => {
            let valid = e.valid_up_to();
            let text = String::from_utf8_lossy(&pending[..valid]).into_owned();
            pending.drain(..valid);
            Ok(text)
        }
        Err(e) => Err(Error::encoding(
            format!("Invalid UTF-8 in stream: {}", e),
            Some(Box::new(e)),
        )),
    }
}

/// Extract a complete SSE event from a buffer string.
///
/// Returns the parsed chunk and the unconsumed remainder, or None if the
/// buffer does not yet hold a full event. An event with no data field
/// (comments, keep-alives) yields `Some((None, rest))`.
fn extract_event(buffer: &str) -> Option<(Option<Result<GenerateContentResponse>>, String)> {
    // Simple SSE parsing - each event is delimited by double newlines
    let parts: Vec<&str> = buffer.splitn(2, "\n\n").collect();
    if parts.len() != 2 {
        return None;
    }

    let event_text = parts[0];
    let rest = parts[1].to_string();

    // Process the event data; multiple data lines concatenate with
    // newlines.
    let mut data: Option<String> = None;
    for line in event_text.lines() {
        if let Some(value) = line.strip_prefix("data: ") {
            match data.as_mut() {
                Some(existing) => {
                    existing.push('\n');
                    existing.push_str(value);
                }
                None => data = Some(value.to_string()),
            }
        }
    }

    match data {
        Some(json_str) => match serde_json::from_str::<GenerateContentResponse>(&json_str) {
            Ok(event) => Some((Some(Ok(event)), rest)),
            Err(e) => Some((
                Some(Err(Error::serialization(
                    format!("Failed to parse event JSON: {}", e),
                    Some(Box::new(e)),
                ))),
                rest,
            )),
        },
        None => Some((None, rest)),
    }
}
