//! Generate setup: config overrides, file discovery, orchestrator creation.

use microstock_core::pipeline::DiscoveredFile;
use microstock_core::{BatchOrchestrator, Config, ExportFormat, FileDiscovery};

use super::{GenerateArgs, GenerateContext};

/// Validate input, load config, apply CLI overrides and build the orchestrator.
pub fn setup_generator(args: &GenerateArgs) -> anyhow::Result<GenerateContext> {
    if !args.input.exists() {
        anyhow::bail!(
            "Input path does not exist: {:?}\n\n  Hint: Check the file path and try again.",
            args.input
        );
    }

    let mut config = Config::load()?;
    apply_overrides(&mut config, args);

    let format = resolve_format(&config, args)?;

    let orchestrator = match BatchOrchestrator::new(&config) {
        Ok(orchestrator) => orchestrator,
        Err(e) if config.descriptor.require_external => anyhow::bail!(
            "{e}\n\n  Hint: Set the provider's API key (for example ANTHROPIC_API_KEY) \
             or drop --require-external."
        ),
        Err(e) => return Err(e.into()),
    };

    if orchestrator.processor().has_external_source() {
        tracing::info!(
            "External descriptor enabled ({})",
            config.descriptor.provider.as_deref().unwrap_or("unknown")
        );
    } else {
        tracing::debug!("Using local analysis only");
    }

    let files = FileDiscovery::new().discover(&args.input);

    Ok(GenerateContext {
        orchestrator,
        files,
        format,
        pretty: config.output.pretty,
    })
}

/// Copy command-line overrides into the loaded configuration.
pub(crate) fn apply_overrides(config: &mut Config, args: &GenerateArgs) {
    if let Some(strategy) = args.strategy {
        config.color.strategy = strategy.into();
    }
    if let Some(grid_size) = args.grid_size {
        config.sampling.grid_size = grid_size;
    }
    if let Some(provider) = args.llm {
        config.descriptor.provider = Some(provider.to_string());
    }
    if let Some(ref model) = args.llm_model {
        config.descriptor.model = Some(model.clone());
    }
    if args.prefer_external {
        config.descriptor.prefer_external = true;
    }
    if args.require_external {
        config.descriptor.require_external = true;
    }
}

/// The `--format` flag wins over `[output] format` in the config file.
pub(crate) fn resolve_format(config: &Config, args: &GenerateArgs) -> anyhow::Result<ExportFormat> {
    if let Some(format) = args.format {
        return Ok(format.into());
    }
    ExportFormat::parse(&config.output.format).ok_or_else(|| {
        anyhow::anyhow!(
            "Unknown output format in config: {:?} (expected csv, json, jsonl or txt)",
            config.output.format
        )
    })
}

/// Total bytes across discovered files, for the summary throughput line.
pub(crate) fn total_bytes(files: &[DiscoveredFile]) -> u64 {
    files.iter().map(|f| f.size).sum()
}
