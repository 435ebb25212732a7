//! LLM provider trait and request/response types.
//!
//! Defines the interface that all vision providers implement, plus the
//! factory that creates the right provider from CLI flags and config.

use crate::config::LlmConfig;
use crate::error::{ConfigError, DescriptorError};
use async_trait::async_trait;
use base64::Engine;
use std::time::Duration;

/// Prompt sent with every preview. The reply must be one JSON object.
pub const DESCRIPTOR_PROMPT: &str = "You are tagging an abstract stock background image. \
Reply with a single JSON object and nothing else, using exactly these keys: \
\"main_color\" (one lowercase color word), \
\"secondary_colors\" (array of color words), \
\"shapes\" (array of short noun phrases, e.g. \"waves\", \"particles\"), \
\"style\" (array of adjectives, e.g. \"minimal\", \"futuristic\"), \
\"mood\" (array of adjectives), \
\"best_use\" (array of short phrases describing where the image fits). \
Use at most five entries per array.";

/// Base64-encoded image ready to send to an LLM API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type ("image/jpeg" or "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and format string.
    pub fn from_bytes(bytes: &[u8], format: &str) -> Self {
        let media_type = match format {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            other => {
                tracing::warn!("Unknown image format '{other}', defaulting to image/jpeg");
                "image/jpeg"
            }
        };

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Return a data URL suitable for OpenAI-style APIs.
    pub fn data_url(&self) -> String {
        format!("data:{};base64,{}", self.media_type, self.data)
    }
}

/// A request for a structured image descriptor.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    /// The image to describe
    pub image: ImageInput,
    /// Text prompt for the model
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl LlmRequest {
    /// Build a descriptor request for an image preview.
    pub fn describe_image(image: ImageInput) -> Self {
        Self {
            image,
            prompt: DESCRIPTOR_PROMPT.to_string(),
            max_tokens: 400,
            temperature: 0.2,
        }
    }
}

/// The response from an LLM call.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    /// Raw generated text
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Number of tokens used (input + output), if reported
    pub tokens_used: Option<u32>,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all LLM providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn LlmProvider>` for dynamic dispatch).
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name for logging (e.g., "anthropic", "ollama").
    fn name(&self) -> &str;

    /// Check whether the provider is configured and reachable, without
    /// sending an image.
    async fn is_available(&self) -> bool;

    /// Generate a reply for the given request.
    async fn generate(&self, request: &LlmRequest) -> Result<LlmResponse, DescriptorError>;
}

/// Map a transport error, distinguishing client-side timeouts.
pub(crate) fn transport_error(
    provider: &str,
    err: reqwest::Error,
    timeout: Duration,
) -> DescriptorError {
    if err.is_timeout() {
        DescriptorError::Timeout {
            timeout_ms: timeout.as_millis() as u64,
        }
    } else {
        DescriptorError::Request {
            message: format!("{provider} request failed: {err}"),
            status_code: None,
        }
    }
}

/// Turn a non-success HTTP response into a request error.
pub(crate) async fn status_error(provider: &str, resp: reqwest::Response) -> DescriptorError {
    let status = resp.status();
    let text = resp.text().await.unwrap_or_default();
    DescriptorError::Request {
        message: format!("{provider} HTTP {status}: {text}"),
        status_code: Some(status.as_u16()),
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok().filter(|v| !v.is_empty())
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the appropriate provider from CLI flags and config.
pub struct LlmProviderFactory;

impl LlmProviderFactory {
    /// Create an LLM provider based on provider name, config, and optional model override.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier ("ollama", "anthropic", "openai")
    /// * `config` - The full LLM config section
    /// * `model_override` - Optional model name that overrides the config default
    /// * `timeout` - Per-request timeout
    ///
    /// Fails with `MissingCredentials` when the provider needs an API key that
    /// does not resolve, and `ValidationError` for unknown provider names.
    pub fn create(
        provider: &str,
        config: &LlmConfig,
        model_override: Option<&str>,
        timeout: Duration,
    ) -> Result<Box<dyn LlmProvider>, ConfigError> {
        match provider {
            "ollama" => {
                let cfg = config.ollama.clone().unwrap_or_default();
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(super::ollama::OllamaProvider::new(
                    &cfg.endpoint,
                    &model,
                    timeout,
                )))
            }
            "anthropic" => {
                let cfg = config.anthropic.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    ConfigError::MissingCredentials(
                        "Anthropic API key not set. Set ANTHROPIC_API_KEY env var.".to_string(),
                    )
                })?;
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(super::anthropic::AnthropicProvider::new(
                    &api_key, &model, timeout,
                )))
            }
            "openai" => {
                let cfg = config.openai.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| {
                    ConfigError::MissingCredentials(
                        "OpenAI API key not set. Set OPENAI_API_KEY env var.".to_string(),
                    )
                })?;
                let model = model_override.map(String::from).unwrap_or(cfg.model);
                Ok(Box::new(super::openai::OpenAiProvider::new(
                    &cfg.endpoint,
                    &api_key,
                    &model,
                    timeout,
                )))
            }
            other => Err(ConfigError::ValidationError(format!(
                "Unknown LLM provider: {other} (expected anthropic, openai or ollama)"
            ))),
        }
    }
}
