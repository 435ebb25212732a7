//! Vision-model providers backing the external descriptor source.
//!
//! Provides a provider abstraction over multiple LLM backends (Ollama,
//! Anthropic, OpenAI and OpenAI-compatible endpoints). Each call sends one
//! image preview and returns the raw reply text.

pub(crate) mod anthropic;
pub(crate) mod ollama;
pub(crate) mod openai;
pub(crate) mod provider;

pub use provider::{ImageInput, LlmProvider, LlmProviderFactory, LlmRequest, LlmResponse};
