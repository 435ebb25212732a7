//! Batch generation: progress bar, export and summary table.

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

use microstock_core::types::{BatchReport, BatchStats};
use microstock_core::ExportWriter;

use super::setup::total_bytes;
use super::{GenerateArgs, GenerateContext};

/// Run the orchestrator over all discovered files and write the results.
pub async fn generate_batch(ctx: GenerateContext, args: &GenerateArgs) -> anyhow::Result<()> {
    let paths: Vec<PathBuf> = ctx.files.iter().map(|f| f.path.clone()).collect();
    let total_size = total_bytes(&ctx.files);

    // A single image finishes too quickly for a bar to be useful.
    let progress = if paths.len() > 1 {
        create_progress_bar(paths.len() as u64)
    } else {
        indicatif::ProgressBar::hidden()
    };

    let start_time = Instant::now();
    let report = ctx
        .orchestrator
        .run_with_progress(&paths, |p| {
            progress.set_position(p.done as u64);
            let elapsed = start_time.elapsed().as_secs_f64();
            if elapsed > 0.0 {
                progress.set_message(format!("{:.1} img/sec", p.done as f64 / elapsed));
            }
        })
        .await;
    progress.finish_and_clear();

    if let Some(ref output_path) = args.output {
        let file = File::create(output_path)?;
        write_report(BufWriter::new(file), &ctx, args, &report)?;
        tracing::info!("Output written to {:?}", output_path);
    } else {
        write_report(std::io::stdout().lock(), &ctx, args, &report)?;
    }

    for skipped in &report.skipped {
        tracing::warn!(
            "{}: skipped ({}) {}",
            skipped.filename,
            skipped.reason_code,
            skipped.message
        );
    }

    print_summary(&report.stats, total_size);

    if report.rows.is_empty() && !report.skipped.is_empty() {
        anyhow::bail!("No metadata generated: all {} image(s) failed", report.skipped.len());
    }

    Ok(())
}

fn write_report<W: Write>(
    writer: W,
    ctx: &GenerateContext,
    args: &GenerateArgs,
    report: &BatchReport,
) -> anyhow::Result<()> {
    let mut writer = ExportWriter::new(writer, ctx.format, ctx.pretty);
    match args.only {
        Some(field) => writer.write_field(&report.rows, field.into())?,
        None => writer.write_rows(&report.rows)?,
    }
    writer.flush()?;
    Ok(())
}

/// Create a progress bar for batch processing.
fn create_progress_bar(total: u64) -> indicatif::ProgressBar {
    use indicatif::{ProgressBar, ProgressStyle};

    let pb = ProgressBar::new(total);
    let style = ProgressStyle::default_bar()
        .template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}",
        )
        .map(|s| s.progress_chars("##-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb.set_message("starting...");
    pb
}

/// Print a formatted summary table after generation.
fn print_summary(stats: &BatchStats, total_bytes: u64) {
    let total = stats.succeeded + stats.skipped;
    let mb_processed = total_bytes as f64 / 1_000_000.0;
    let throughput = if stats.total_seconds > 0.0 {
        mb_processed / stats.total_seconds
    } else {
        0.0
    };

    eprintln!();
    eprintln!("  ====================================");
    eprintln!("               Summary");
    eprintln!("  ====================================");
    eprintln!("    Succeeded:    {:>8}", stats.succeeded);
    if stats.skipped > 0 {
        eprintln!("    Skipped:      {:>8}", stats.skipped);
    }
    if stats.external_fallbacks > 0 {
        eprintln!("    Local only:   {:>8}", stats.external_fallbacks);
    }
    eprintln!("  ------------------------------------");
    eprintln!("    Total:        {:>8}", total);
    eprintln!("    Duration:     {:>7.1}s", stats.total_seconds);
    eprintln!("    Rate:         {:>7.1} img/sec", stats.images_per_second);
    eprintln!("    Throughput:   {:>7.1} MB/sec", throughput);
    eprintln!("  ====================================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::generate::types::FieldArg;
    use image::{Rgb, RgbImage};
    use microstock_core::{BatchOrchestrator, Config, ExportFormat, FileDiscovery};

    fn context(dir: &std::path::Path, format: ExportFormat) -> GenerateContext {
        GenerateContext {
            orchestrator: BatchOrchestrator::new(&Config::default()).unwrap(),
            files: FileDiscovery::new().discover(dir),
            format,
            pretty: false,
        }
    }

    #[tokio::test]
    async fn writes_csv_to_output_file() {
        let dir = tempfile::tempdir().unwrap();
        RgbImage::from_pixel(24, 24, Rgb([20, 60, 220]))
            .save(dir.path().join("blue.png"))
            .unwrap();
        RgbImage::from_pixel(24, 24, Rgb([220, 30, 30]))
            .save(dir.path().join("red.png"))
            .unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let out = out_dir.path().join("metadata.csv");

        let args = GenerateArgs {
            input: dir.path().to_path_buf(),
            output: Some(out.clone()),
            ..GenerateArgs::default()
        };
        generate_batch(context(dir.path(), ExportFormat::Csv), &args)
            .await
            .unwrap();

        let csv = std::fs::read_to_string(&out).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Filename,Title,Description,Keywords");
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("blue.png,"));
        assert!(lines[2].starts_with("red.png,"));
    }

    #[tokio::test]
    async fn only_flag_writes_single_field() {
        let dir = tempfile::tempdir().unwrap();
        let image = dir.path().join("green.png");
        RgbImage::from_pixel(24, 24, Rgb([30, 180, 60]))
            .save(&image)
            .unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let out = out_dir.path().join("keywords.txt");

        let args = GenerateArgs {
            input: image.clone(),
            output: Some(out.clone()),
            only: Some(FieldArg::Keywords),
            ..GenerateArgs::default()
        };
        generate_batch(context(&image, ExportFormat::Csv), &args)
            .await
            .unwrap();

        let text = std::fs::read_to_string(&out).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("abstract, background"));
    }

    #[tokio::test]
    async fn all_failed_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let junk = dir.path().join("broken.jpg");
        std::fs::write(&junk, b"not an image").unwrap();
        let out_dir = tempfile::tempdir().unwrap();

        let args = GenerateArgs {
            input: junk.clone(),
            output: Some(out_dir.path().join("out.csv")),
            ..GenerateArgs::default()
        };
        let result = generate_batch(context(&junk, ExportFormat::Csv), &args).await;
        assert!(result.is_err());
    }
}
