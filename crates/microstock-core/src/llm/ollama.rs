//! Ollama LLM provider for local vision model inference.
//!
//! Talks to a local Ollama instance via its HTTP API.
//! No authentication required, only a running Ollama server.

use super::provider::{status_error, transport_error, LlmProvider, LlmRequest, LlmResponse};
use crate::error::DescriptorError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Ollama provider for local vision model inference.
pub struct OllamaProvider {
    endpoint: String,
    model: String,
    timeout: Duration,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(endpoint: &str, model: &str, timeout: Duration) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            timeout,
            client: reqwest::Client::new(),
        }
    }
}

/// Ollama /api/generate request body.
#[derive(Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    images: Vec<String>,
    stream: bool,
    /// Constrains the reply to valid JSON
    format: String,
    options: OllamaOptions,
}

#[derive(Serialize)]
struct OllamaOptions {
    temperature: f32,
    num_predict: u32,
}

/// Ollama /api/generate response.
#[derive(Deserialize)]
struct OllamaResponse {
    response: String,
}

#[async_trait]
impl LlmProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.endpoint);
        match self.client.get(&url).timeout(Duration::from_secs(5)).send().await {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, DescriptorError> {
        let url = format!("{}/api/generate", self.endpoint);
        let start = Instant::now();

        let body = OllamaRequest {
            model: self.model.clone(),
            prompt: request.prompt.clone(),
            images: vec![request.image.data.clone()],
            stream: false,
            format: "json".to_string(),
            options: OllamaOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        };

        let resp = self
            .client
            .post(&url)
            .json(&body)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| transport_error("Ollama", e, self.timeout))?;

        if !resp.status().is_success() {
            return Err(status_error("Ollama", resp).await);
        }

        let ollama_resp: OllamaResponse = resp
            .json()
            .await
            .map_err(|e| DescriptorError::Malformed(format!("Ollama response body: {e}")))?;

        let text = ollama_resp.response.trim().to_string();
        if text.is_empty() {
            return Err(DescriptorError::Malformed(
                "Ollama returned an empty response".to_string(),
            ));
        }

        Ok(LlmResponse {
            text,
            model: self.model.clone(),
            tokens_used: None, // Ollama doesn't report token counts in generate endpoint
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llava", Duration::from_secs(1));
        assert_eq!(provider.endpoint, "http://localhost:11434");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_request_error() {
        // Port 9 (discard) on loopback is closed in test environments.
        let provider = OllamaProvider::new("http://127.0.0.1:9", "llava", Duration::from_secs(2));
        let request = LlmRequest::describe_image(crate::llm::provider::ImageInput::from_bytes(
            &[1, 2, 3],
            "jpeg",
        ));
        let err = provider.generate(&request).await.unwrap_err();
        assert!(matches!(
            err,
            DescriptorError::Request { .. } | DescriptorError::Timeout { .. }
        ));
        assert!(!provider.is_available().await);
    }
}
