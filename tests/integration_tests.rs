//! Integration tests for the Geminius library.
//! These tests require an API key in the environment to run.

#[cfg(test)]
mod tests {
    use futures::StreamExt;

    use geminius::{Content, Gemini, GenerateContentRequest, KnownModel, Model};

    #[tokio::test]
    async fn test_simple_generate_request() {
        // This test requires GEMINI_API_KEY to be set
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        if api_key.is_none() {
            eprintln!("Skipping test: GEMINI_API_KEY not set");
            return;
        }

        let client = Gemini::new(api_key).expect("Failed to create client");

        let request = GenerateContentRequest::new(vec![Content::user("Say 'test passed'")]);
        let model = Model::Known(KnownModel::Gemini25Flash);

        let response = client.generate(&model, &request).await;
        assert!(
            response.is_ok(),
            "Request should succeed with valid API key"
        );
    }

    #[tokio::test]
    async fn test_streaming_response() {
        let api_key = std::env::var("GEMINI_API_KEY").ok();
        if api_key.is_none() {
            eprintln!("Skipping test: GEMINI_API_KEY not set");
            return;
        }

        let client = Gemini::new(api_key).expect("Failed to create client");

        let request = GenerateContentRequest::new(vec![Content::user("Count to 3")]);
        let model = Model::Known(KnownModel::Gemini25Flash);

        let stream = client.stream_generate(&model, &request).await;
        assert!(stream.is_ok(), "Stream request should succeed");

        let mut stream = stream.unwrap();
        let mut text = String::new();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.expect("Chunk should deserialize");
            text.push_str(&chunk.text_delta());
        }
        assert!(!text.is_empty(), "Stream should produce some text");
    }
}
