//! The `microstock generate` command for producing stock metadata.

mod batch;
mod setup;
pub mod types;

pub use types::{FieldArg, FormatArg, LlmProvider, StrategyArg};

use clap::Args;
use microstock_core::pipeline::DiscoveredFile;
use microstock_core::{BatchOrchestrator, ExportFormat};
use std::path::PathBuf;

use batch::generate_batch;
use setup::setup_generator;

/// Arguments for the `generate` command.
#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Image file or directory to process
    #[arg(required = true)]
    pub input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Output format (defaults to the config file's [output] format, csv)
    #[arg(short, long, value_enum)]
    pub format: Option<FormatArg>,

    /// Print only this field as plain text, one line per image
    #[arg(long, value_enum)]
    pub only: Option<FieldArg>,

    /// Color classification strategy
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    /// Side length of the analysis grid in pixels
    #[arg(long)]
    pub grid_size: Option<u32>,

    /// LLM provider used as external descriptor
    #[arg(long, value_enum)]
    pub llm: Option<LlmProvider>,

    /// LLM model name (provider-specific)
    #[arg(long)]
    pub llm_model: Option<String>,

    /// Let the model's main color override the local one
    #[arg(long)]
    pub prefer_external: bool,

    /// Fail before processing when no external descriptor is usable
    #[arg(long)]
    pub require_external: bool,
}

/// Manual Default impl for constructing GenerateArgs outside of clap.
impl Default for GenerateArgs {
    fn default() -> Self {
        Self {
            input: PathBuf::new(),
            output: None,
            format: None,
            only: None,
            strategy: None,
            grid_size: None,
            llm: None,
            llm_model: None,
            prefer_external: false,
            require_external: false,
        }
    }
}

/// Everything assembled by setup_generator().
pub(crate) struct GenerateContext {
    pub orchestrator: BatchOrchestrator,
    pub files: Vec<DiscoveredFile>,
    pub format: ExportFormat,
    pub pretty: bool,
}

/// Execute the generate command.
pub async fn execute(args: GenerateArgs) -> anyhow::Result<()> {
    let ctx = setup_generator(&args)?;

    if ctx.files.is_empty() {
        tracing::warn!("No supported image files found at {:?}", args.input);
        return Ok(());
    }
    tracing::info!("Found {} image(s) to process", ctx.files.len());

    generate_batch(ctx, &args).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser)]
    struct TestCli {
        #[command(flatten)]
        args: GenerateArgs,
    }

    #[test]
    fn generate_args_default_option_fields_are_none() {
        let args = GenerateArgs::default();
        assert!(args.output.is_none());
        assert!(args.format.is_none());
        assert!(args.only.is_none());
        assert!(args.llm.is_none());
        assert!(args.llm_model.is_none());
    }

    #[test]
    fn generate_args_default_bool_flags_are_false() {
        let args = GenerateArgs::default();
        assert!(!args.prefer_external);
        assert!(!args.require_external);
    }

    #[test]
    fn generate_args_parse_flags() {
        let cli = TestCli::parse_from([
            "test",
            "./images",
            "-f",
            "jsonl",
            "--only",
            "title",
            "--strategy",
            "hue",
            "--grid-size",
            "64",
            "--llm",
            "openai",
            "--require-external",
        ]);
        let args = cli.args;
        assert_eq!(args.input, PathBuf::from("./images"));
        assert_eq!(args.format, Some(FormatArg::Jsonl));
        assert_eq!(args.only, Some(FieldArg::Title));
        assert_eq!(args.strategy, Some(StrategyArg::Hue));
        assert_eq!(args.grid_size, Some(64));
        assert_eq!(args.llm, Some(LlmProvider::Openai));
        assert!(args.require_external);
        assert!(!args.prefer_external);
    }

    #[test]
    fn generate_args_reject_unknown_format() {
        let result = TestCli::try_parse_from(["test", "a.jpg", "--format", "xml"]);
        assert!(result.is_err());
    }
}
