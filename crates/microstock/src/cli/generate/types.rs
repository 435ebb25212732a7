//! CLI enum types for the generate command: export format, field, strategy, provider.

use clap::ValueEnum;
use microstock_core::config::ColorStrategy;
use microstock_core::{ExportFormat, MetadataField};

/// Supported export formats.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum FormatArg {
    /// Filename,Title,Description,Keywords with a header row
    Csv,
    /// Single JSON array
    Json,
    /// One JSON object per line (newline-delimited)
    Jsonl,
    /// Human-readable blocks
    Txt,
}

impl std::fmt::Display for FormatArg {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormatArg::Csv => write!(f, "csv"),
            FormatArg::Json => write!(f, "json"),
            FormatArg::Jsonl => write!(f, "jsonl"),
            FormatArg::Txt => write!(f, "txt"),
        }
    }
}

impl From<FormatArg> for ExportFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => ExportFormat::Csv,
            FormatArg::Json => ExportFormat::Json,
            FormatArg::Jsonl => ExportFormat::JsonLines,
            FormatArg::Txt => ExportFormat::Text,
        }
    }
}

/// A single metadata field to print as plain text.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum FieldArg {
    Title,
    Description,
    Keywords,
}

impl From<FieldArg> for MetadataField {
    fn from(arg: FieldArg) -> Self {
        match arg {
            FieldArg::Title => MetadataField::Title,
            FieldArg::Description => MetadataField::Description,
            FieldArg::Keywords => MetadataField::Keywords,
        }
    }
}

/// Color classification strategy.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum StrategyArg {
    /// Average hue of bright, saturated pixels
    Hue,
    /// Per-pixel vote for the nearest reference color
    Reference,
}

impl From<StrategyArg> for ColorStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Hue => ColorStrategy::HueBucket,
            StrategyArg::Reference => ColorStrategy::NearestReference,
        }
    }
}

/// Supported LLM providers for the external descriptor.
#[derive(Clone, Copy, Debug, ValueEnum, PartialEq, Eq)]
pub enum LlmProvider {
    /// Local Ollama instance
    Ollama,
    /// Anthropic API
    Anthropic,
    /// OpenAI API
    Openai,
}

impl std::fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LlmProvider::Ollama => write!(f, "ollama"),
            LlmProvider::Anthropic => write!(f, "anthropic"),
            LlmProvider::Openai => write!(f, "openai"),
        }
    }
}
