//! External descriptors and their merge with local analysis.
//!
//! An external source (normally a vision model) may add colors, shapes,
//! styles and best-use phrases to what local analysis found. It is strictly
//! optional: every failure degrades to the local-only descriptor set.

mod merge;
mod parse;

pub use merge::{merge, DescriptorMerger, ExternalStatus, LocalDescriptors, MergeOutcome};
pub use parse::parse_descriptor;

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use crate::config::{DescriptorConfig, LlmConfig};
use crate::error::{ConfigError, DescriptorError};
use crate::llm::{ImageInput, LlmProvider, LlmProviderFactory, LlmRequest};
use crate::types::ExternalDescriptor;

/// Anything that can describe an image preview.
///
/// Called at most once per image; the caller enforces the timeout.
#[async_trait]
pub trait DescriptorSource: Send + Sync {
    /// Source name for logging.
    fn name(&self) -> &str;

    async fn describe(&self, image: &ImageInput) -> Result<ExternalDescriptor, DescriptorError>;

    /// Cheap readiness check (credentials present, endpoint answering).
    async fn is_ready(&self) -> bool {
        true
    }
}

/// Descriptor source backed by a vision-capable LLM provider.
pub struct VisionDescriber {
    provider: Box<dyn LlmProvider>,
}

impl VisionDescriber {
    pub fn new(provider: Box<dyn LlmProvider>) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl DescriptorSource for VisionDescriber {
    fn name(&self) -> &str {
        self.provider.name()
    }

    async fn describe(&self, image: &ImageInput) -> Result<ExternalDescriptor, DescriptorError> {
        let request = LlmRequest::describe_image(image.clone());
        let response = self.provider.generate(&request).await?;
        tracing::trace!(
            "  {} replied in {}ms (model {}, tokens {:?})",
            self.provider.name(),
            response.latency_ms,
            response.model,
            response.tokens_used
        );
        parse_descriptor(&response.text)
    }

    async fn is_ready(&self) -> bool {
        self.provider.is_available().await
    }
}

/// Build the configured descriptor source, if any.
///
/// Returns `Ok(None)` when no provider is configured, or when the provider's
/// credentials are missing and the external source is optional (a warning is
/// logged). Missing credentials are an error when `require_external` is set.
pub fn source_from_config(
    descriptor: &DescriptorConfig,
    llm: &LlmConfig,
) -> Result<Option<Arc<dyn DescriptorSource>>, ConfigError> {
    let Some(provider_name) = descriptor.provider.as_deref() else {
        if descriptor.require_external {
            return Err(ConfigError::MissingCredentials(
                "an external descriptor is required but no provider is configured".to_string(),
            ));
        }
        return Ok(None);
    };

    let timeout = Duration::from_millis(descriptor.timeout_ms);
    match LlmProviderFactory::create(provider_name, llm, descriptor.model.as_deref(), timeout) {
        Ok(provider) => {
            tracing::debug!("External descriptors via {}", provider.name());
            Ok(Some(Arc::new(VisionDescriber::new(provider))))
        }
        Err(ConfigError::MissingCredentials(message)) if !descriptor.require_external => {
            tracing::warn!("{message} Continuing with local analysis only.");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
