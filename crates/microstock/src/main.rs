//! Microstock CLI - stock-photo titles, descriptions and keywords from images.
//!
//! Microstock analyzes the colors and texture of each image, optionally asks
//! a vision model for extra descriptors, and writes upload-ready metadata.
//!
//! # Usage
//!
//! ```bash
//! # Metadata for a single image as CSV on stdout
//! microstock generate background.jpg
//!
//! # A whole directory into a JSON Lines file
//! microstock generate ./backgrounds/ -f jsonl --output metadata.jsonl
//!
//! # Just the keywords, with a vision model
//! microstock generate wave.png --only keywords --llm anthropic
//!
//! # View configuration
//! microstock config show
//! ```

use clap::{Parser, Subcommand};

mod cli;
mod logging;

/// Microstock - stock-photo metadata from raw pixels.
#[derive(Parser, Debug)]
#[command(name = "microstock")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Output logs in JSON format
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

/// Available commands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Generate titles, descriptions and keywords for images
    Generate(cli::generate::GenerateArgs),

    /// View and manage configuration
    Config(cli::config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Logging isn't initialized yet, so config warnings go through eprintln.
    let config = match microstock_core::Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!(
                "Warning: Failed to load config: {e}\n  \
                 Using default configuration. Check your config file with `microstock config path`."
            );
            microstock_core::Config::default()
        }
    };
    logging::init_from_config(&config, cli.verbose, cli.json_logs);

    tracing::debug!("Microstock v{}", microstock_core::VERSION);

    match cli.command {
        Commands::Generate(args) => cli::generate::execute(args).await,
        Commands::Config(args) => cli::config::execute(args).await,
    }
}
