//! Error types for the microstock metadata pipeline.
//!
//! Errors are split by concern so callers can tell a bad config (fatal to the
//! whole batch) from a bad image (fatal to that image only) from an unavailable
//! vision model (recovered locally and never surfaced).

use std::path::PathBuf;
use thiserror::Error;

/// Top-level error type for microstock operations.
#[derive(Error, Debug)]
pub enum MicrostockError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Per-image pipeline errors
    #[error("Pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// General I/O errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// CSV export errors
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Configuration-specific errors. Any of these halts a batch before the
/// first image is touched.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),

    /// External descriptors are required but no usable credentials exist
    #[error("Missing credentials: {0}")]
    MissingCredentials(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image decoding failed
    #[error("Decode error for {path}: {message}")]
    Decode { path: PathBuf, message: String },

    /// Decoded image cannot be analyzed (e.g. zero pixels)
    #[error("Invalid input {path}: {message}")]
    InvalidInput { path: PathBuf, message: String },

    /// Operation timed out
    #[error("Timeout in {stage} stage for {path} after {timeout_ms}ms")]
    Timeout {
        path: PathBuf,
        stage: String,
        timeout_ms: u64,
    },

    /// File exceeds size limit
    #[error("File too large: {path} ({size_mb}MB > {max_mb}MB)")]
    FileTooLarge {
        path: PathBuf,
        size_mb: u64,
        max_mb: u64,
    },

    /// Image dimensions exceed limit
    #[error("Image too large: {path} ({width}x{height} > {max_dim})")]
    ImageTooLarge {
        path: PathBuf,
        width: u32,
        height: u32,
        max_dim: u32,
    },

    /// Unsupported image format
    #[error("Unsupported format for {path}: {format}")]
    UnsupportedFormat { path: PathBuf, format: String },

    /// File not found
    #[error("File not found: {0}")]
    FileNotFound(PathBuf),
}

impl PipelineError {
    /// Stable machine-readable code recorded on skipped batch rows.
    pub fn reason_code(&self) -> &'static str {
        match self {
            PipelineError::Decode { .. } => "decode_failed",
            PipelineError::InvalidInput { .. } => "invalid_input",
            PipelineError::Timeout { .. } => "timeout",
            PipelineError::FileTooLarge { .. } => "file_too_large",
            PipelineError::ImageTooLarge { .. } => "image_too_large",
            PipelineError::UnsupportedFormat { .. } => "unsupported_format",
            PipelineError::FileNotFound(_) => "file_not_found",
        }
    }
}

/// Errors from the pure analysis stages (sampling, color, texture).
///
/// Only precondition violations live here; a non-empty grid never fails.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl AnalysisError {
    /// Attach the source path, turning this into a per-image pipeline error.
    pub fn at(self, path: impl Into<PathBuf>) -> PipelineError {
        match self {
            AnalysisError::InvalidInput(message) => PipelineError::InvalidInput {
                path: path.into(),
                message,
            },
        }
    }
}

/// Failures of the external descriptor collaborator.
///
/// The merger treats every variant the same way: fall back to local signals.
#[derive(Error, Debug, Clone)]
pub enum DescriptorError {
    /// HTTP or transport failure talking to the provider
    #[error("Descriptor request failed: {message}")]
    Request {
        message: String,
        status_code: Option<u16>,
    },

    /// Provider did not answer in time
    #[error("Descriptor request timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// Provider answered with something that is not a descriptor record
    #[error("Malformed descriptor response: {0}")]
    Malformed(String),
}

/// Convenience type alias for microstock results.
pub type Result<T> = std::result::Result<T, MicrostockError>;

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
