//! The `microstock config` command for configuration management.

use clap::{Args, Subcommand};
use microstock_core::descriptor::source_from_config;
use microstock_core::Config;
use std::path::Path;

/// Arguments for the `config` command.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

/// Subcommands for configuration management.
#[derive(Subcommand, Debug)]
pub enum ConfigCommand {
    /// Display the effective configuration, thresholds included
    Show,

    /// Show config file path
    Path,

    /// Write a config file with the reference thresholds
    Init {
        /// Overwrite existing config file
        #[arg(long)]
        force: bool,
    },

    /// Range-check every value and ping the configured vision provider
    Check,
}

/// Execute the config command.
pub async fn execute(args: ConfigArgs) -> anyhow::Result<()> {
    match args.command {
        ConfigCommand::Show => {
            let config = Config::load()?;
            println!("{}", config.to_toml()?);
        }

        ConfigCommand::Path => {
            println!("{}", Config::default_path().display());
        }

        ConfigCommand::Init { force } => {
            let path = Config::default_path();
            write_default_config(&path, force)?;
            tracing::info!("Config file created at: {}", path.display());
            println!("Configuration initialized at: {}", path.display());
        }

        ConfigCommand::Check => {
            let config = Config::load()?;
            config.validate()?;
            println!("Configuration is valid");

            match descriptor_readiness(&config).await? {
                None => println!("External descriptor: none (local analysis only)"),
                Some((name, true)) => println!("External descriptor: {name} (ready)"),
                Some((name, false)) if config.descriptor.require_external => {
                    anyhow::bail!("External descriptor {name} is required but not reachable")
                }
                Some((name, false)) => println!(
                    "External descriptor: {name} (not reachable, images will use local analysis)"
                ),
            }
        }
    }

    Ok(())
}

/// Name and readiness of the configured descriptor source, if any.
async fn descriptor_readiness(config: &Config) -> anyhow::Result<Option<(String, bool)>> {
    let Some(source) = source_from_config(&config.descriptor, &config.llm)? else {
        return Ok(None);
    };
    let ready = source.is_ready().await;
    tracing::debug!("Descriptor source {} ready: {ready}", source.name());
    Ok(Some((source.name().to_string(), ready)))
}

fn write_default_config(path: &Path, force: bool) -> anyhow::Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "Config file already exists at: {}\nUse --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default().to_toml()?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use microstock_core::config::OllamaConfig;

    #[test]
    fn init_writes_loadable_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        write_default_config(&path, false).unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.sampling.grid_size, 100);
        assert_eq!(config.metadata.keyword_cap, 50);
        config.validate().unwrap();
    }

    #[test]
    fn init_refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[sampling]\ngrid_size = 64\n").unwrap();

        let err = write_default_config(&path, false).unwrap_err();
        assert!(err.to_string().contains("--force"));

        write_default_config(&path, true).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().sampling.grid_size, 100);
    }

    #[tokio::test]
    async fn readiness_without_provider_is_none() {
        assert!(descriptor_readiness(&Config::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn readiness_reports_unreachable_ollama() {
        let mut config = Config::default();
        config.descriptor.provider = Some("ollama".to_string());
        config.llm.ollama = Some(OllamaConfig {
            endpoint: "http://127.0.0.1:9".to_string(),
            ..OllamaConfig::default()
        });

        let readiness = descriptor_readiness(&config).await.unwrap();
        assert_eq!(readiness, Some(("ollama".to_string(), false)));
    }
}
