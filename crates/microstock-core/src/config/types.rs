//! Sub-configuration structs with their reference defaults.

use crate::types::ColorLabel;
use serde::{Deserialize, Serialize};

/// Resampling filter used when shrinking an image to the analysis grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    #[default]
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3,
}

impl From<ResampleFilter> for image::imageops::FilterType {
    fn from(filter: ResampleFilter) -> Self {
        use image::imageops::FilterType;
        match filter {
            ResampleFilter::Nearest => FilterType::Nearest,
            ResampleFilter::Triangle => FilterType::Triangle,
            ResampleFilter::CatmullRom => FilterType::CatmullRom,
            ResampleFilter::Gaussian => FilterType::Gaussian,
            ResampleFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Pixel sampler settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Side length of the square analysis grid
    pub grid_size: u32,

    /// Resampling filter
    pub filter: ResampleFilter,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            grid_size: 100,
            filter: ResampleFilter::Triangle,
        }
    }
}

/// Which color classification strategy to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ColorStrategy {
    /// Average the hue of bright, saturated pixels and bucket it
    HueBucket,
    /// Vote each pixel to its nearest reference color
    #[default]
    NearestReference,
}

/// A half-open hue interval `[start, end)` on the 0..1 hue circle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HueBand {
    pub start: f32,
    pub end: f32,
    pub label: ColorLabel,
}

impl HueBand {
    pub fn new(start: f32, end: f32, label: ColorLabel) -> Self {
        Self { start, end, label }
    }

    pub fn contains(&self, hue: f32) -> bool {
        hue >= self.start && hue < self.end
    }
}

/// Color classifier settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColorConfig {
    /// Classification strategy
    pub strategy: ColorStrategy,

    /// Hue-bucket: pixels below this saturation are washed out and ignored
    pub saturation_threshold: f32,

    /// Hue-bucket: pixels below this value are background and ignored
    pub value_threshold: f32,

    /// Hue-bucket: ordered hue bands, first match wins
    pub hue_bands: Vec<HueBand>,

    /// Nearest-reference: more distinct labels than this means "colorful"
    pub diversity_threshold: usize,

    /// Nearest-reference: report the runner-up label as a secondary color
    pub report_secondary: bool,
}

impl Default for ColorConfig {
    fn default() -> Self {
        Self {
            strategy: ColorStrategy::NearestReference,
            saturation_threshold: 0.35,
            value_threshold: 0.25,
            hue_bands: default_hue_bands(),
            diversity_threshold: 6,
            report_secondary: true,
        }
    }
}

/// Reference hue bands. Red wraps around both ends of the circle.
pub fn default_hue_bands() -> Vec<HueBand> {
    vec![
        HueBand::new(0.00, 0.05, ColorLabel::Red),
        HueBand::new(0.05, 0.11, ColorLabel::Orange),
        HueBand::new(0.11, 0.19, ColorLabel::Yellow),
        HueBand::new(0.19, 0.45, ColorLabel::Green),
        HueBand::new(0.45, 0.50, ColorLabel::Teal),
        HueBand::new(0.50, 0.55, ColorLabel::Cyan),
        HueBand::new(0.55, 0.72, ColorLabel::Blue),
        HueBand::new(0.72, 0.83, ColorLabel::Purple),
        HueBand::new(0.83, 0.95, ColorLabel::Pink),
        HueBand::new(0.95, 1.01, ColorLabel::Red),
    ]
}

/// One edge-density band of the texture classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeBand {
    /// Exclusive upper bound on edge density; `None` catches everything above
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub below: Option<f32>,
    pub shapes: Vec<String>,
    pub styles: Vec<String>,
}

impl EdgeBand {
    fn new(below: Option<f32>, shapes: &[&str], styles: &[&str]) -> Self {
        Self {
            below,
            shapes: shapes.iter().map(|s| s.to_string()).collect(),
            styles: styles.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Texture/style analyzer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TextureConfig {
    /// Sobel magnitude above which a pixel counts as an edge
    pub edge_threshold: f32,

    /// Gaussian sigma for the noise-proxy blur
    pub blur_sigma: f32,

    /// Mean |gray - blurred| below this is "clean", otherwise "dynamic"
    pub noise_threshold: f32,

    /// Ordered edge-density bands
    pub bands: Vec<EdgeBand>,
}

impl Default for TextureConfig {
    fn default() -> Self {
        Self {
            edge_threshold: 100.0,
            blur_sigma: 2.0,
            noise_threshold: 8.0,
            bands: default_edge_bands(),
        }
    }
}

/// Reference edge-density bands.
pub fn default_edge_bands() -> Vec<EdgeBand> {
    vec![
        EdgeBand::new(Some(0.02), &["smooth shapes"], &["minimal", "gradient"]),
        EdgeBand::new(Some(0.06), &["waves"], &["fluid", "flowing"]),
        EdgeBand::new(Some(0.12), &["lines"], &["geometric", "modern"]),
        EdgeBand::new(None, &["particles", "mesh"], &["futuristic", "technology"]),
    ]
}

/// Metadata synthesizer settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataConfig {
    /// Maximum keywords per image (at most 50)
    pub keyword_cap: usize,

    /// Generic stock terms placed first in every keyword list
    pub base_keywords: Vec<String>,

    /// Best-use phrases contributed by local analysis
    pub default_best_use: Vec<String>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            keyword_cap: crate::metadata::MAX_KEYWORDS,
            base_keywords: [
                "abstract",
                "background",
                "abstract background",
                "technology",
                "modern",
                "digital",
                "design",
                "creative",
                "wallpaper",
                "backdrop",
                "technology background",
                "digital background",
                "modern background",
                "innovation",
                "business",
                "corporate",
                "presentation",
                "banner",
                "website background",
                "template",
                "contemporary",
            ]
            .iter()
            .map(|s| s.to_string())
            .collect(),
            default_best_use: vec![
                "technology concepts".to_string(),
                "digital innovation".to_string(),
            ],
        }
    }
}

/// External descriptor (vision model) settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptorConfig {
    /// LLM provider name ("anthropic", "openai", "ollama"); unset = local only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,

    /// Model override for the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,

    /// Let a parseable external main color override the local one
    pub prefer_external: bool,

    /// Refuse to start a batch without a usable external provider
    pub require_external: bool,

    /// Per-image timeout for the descriptor call in milliseconds
    pub timeout_ms: u64,

    /// Longest edge of the JPEG preview sent to the provider
    pub preview_size: u32,
}

impl Default for DescriptorConfig {
    fn default() -> Self {
        Self {
            provider: None,
            model: None,
            prefer_external: false,
            require_external: false,
            timeout_ms: 30_000,
            preview_size: 512,
        }
    }
}

/// Resource limits to protect against problematic inputs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum file size in megabytes
    pub max_file_size_mb: u64,

    /// Maximum image dimension (width or height)
    pub max_image_dimension: u32,

    /// Decode timeout in milliseconds
    pub decode_timeout_ms: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_file_size_mb: 100,
            max_image_dimension: 20000,
            decode_timeout_ms: 5000,
        }
    }
}

/// Output settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Default export format ("csv", "json", "jsonl" or "txt")
    pub format: String,

    /// Pretty-print JSON output
    pub pretty: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "csv".to_string(),
            pretty: false,
        }
    }
}

/// Logging settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: error, warn, info, debug, trace
    pub level: String,

    /// Log format: "pretty" or "json"
    pub format: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

/// LLM provider configurations.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LlmConfig {
    /// Ollama (local) configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama: Option<OllamaConfig>,

    /// Anthropic configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub anthropic: Option<AnthropicConfig>,

    /// OpenAI (or OpenAI-compatible) configuration
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<OpenAiConfig>,
}

/// Ollama configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Ollama API endpoint
    pub endpoint: String,

    /// Model name
    pub model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            endpoint: "http://localhost:11434".to_string(),
            model: "llama3.2-vision".to_string(),
        }
    }
}

/// Anthropic configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnthropicConfig {
    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,
}

impl Default for AnthropicConfig {
    fn default() -> Self {
        Self {
            api_key: "${ANTHROPIC_API_KEY}".to_string(),
            model: "claude-sonnet-4-20250514".to_string(),
        }
    }
}

/// OpenAI configuration. Point `endpoint` at any Chat Completions
/// compatible server to use another vendor.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAiConfig {
    /// Chat Completions endpoint
    pub endpoint: String,

    /// API key (supports ${ENV_VAR} syntax)
    pub api_key: String,

    /// Model name
    pub model: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://api.openai.com/v1/chat/completions".to_string(),
            api_key: "${OPENAI_API_KEY}".to_string(),
            model: "gpt-4o-mini".to_string(),
        }
    }
}
