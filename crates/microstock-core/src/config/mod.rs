//! Configuration management for microstock.
//!
//! Configuration is loaded from the platform config directory with the
//! reference thresholds as defaults. The whole object is passed explicitly
//! into the orchestrator; nothing is read from ambient state after loading.

mod types;
mod validate;

pub use types::*;

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root configuration structure for microstock.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Pixel sampler settings
    pub sampling: SamplingConfig,

    /// Color classifier settings
    pub color: ColorConfig,

    /// Texture/style analyzer settings
    pub texture: TextureConfig,

    /// Title/description/keyword settings
    pub metadata: MetadataConfig,

    /// External descriptor settings
    pub descriptor: DescriptorConfig,

    /// Resource limits
    pub limits: LimitsConfig,

    /// Output settings
    pub output: OutputConfig,

    /// Logging settings
    pub logging: LoggingConfig,

    /// LLM provider settings
    pub llm: LlmConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Returns default configuration if the file doesn't exist.
    pub fn load() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parse and validate configuration from a TOML string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default config file path.
    ///
    /// Uses platform-appropriate directories:
    /// - macOS: ~/Library/Application Support/com.microstock.microstock/config.toml
    /// - Linux: ~/.config/microstock/config.toml
    /// - Windows: C:\Users\<User>\AppData\Roaming\microstock\config\config.toml
    ///
    /// Falls back to ~/.microstock/config.toml if directory detection fails.
    pub fn default_path() -> PathBuf {
        directories::ProjectDirs::from("com", "microstock", "microstock")
            .map(|dirs| dirs.config_dir().to_path_buf().join("config.toml"))
            .unwrap_or_else(|| {
                let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
                PathBuf::from(home).join(".microstock").join("config.toml")
            })
    }

    /// Serialize the config to a pretty TOML string.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::ValidationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ColorLabel;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.sampling.grid_size, 100);
        assert_eq!(config.color.diversity_threshold, 6);
        assert_eq!(config.metadata.keyword_cap, 50);
        assert!(!config.descriptor.prefer_external);
    }

    #[test]
    fn test_config_to_toml() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[sampling]"));
        assert!(toml.contains("[color]"));
        assert!(toml.contains("hue_bands"));
    }

    #[test]
    fn test_config_toml_roundtrip_keeps_bands() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        let parsed = Config::from_toml(&toml).unwrap();
        assert_eq!(parsed.color.hue_bands, config.color.hue_bands);
        assert_eq!(parsed.texture.bands, config.texture.bands);
    }

    #[test]
    fn test_partial_toml_fills_defaults() {
        let config = Config::from_toml(
            r#"
            [color]
            strategy = "hue_bucket"
            saturation_threshold = 0.4

            [descriptor]
            provider = "ollama"
            "#,
        )
        .unwrap();
        assert_eq!(config.color.strategy, ColorStrategy::HueBucket);
        assert_eq!(config.color.saturation_threshold, 0.4);
        assert_eq!(config.color.value_threshold, 0.25);
        assert_eq!(config.color.hue_bands[0].label, ColorLabel::Red);
        assert_eq!(config.descriptor.provider.as_deref(), Some("ollama"));
        assert_eq!(config.sampling.grid_size, 100);
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sampling]\ngrid_size = 120\n").unwrap();
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.sampling.grid_size, 120);
    }

    #[test]
    fn test_load_from_rejects_invalid_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[metadata]\nkeyword_cap = 80\n").unwrap();
        let err = Config::load_from(&path).unwrap_err();
        assert!(err.to_string().contains("keyword_cap"));
    }
}
