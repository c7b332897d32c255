//! Batch processing command for multiple documents.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use clap::Args;
use console::style;
use glob::glob;
use indicatif::{ProgressBar, ProgressStyle};
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use doku_core::{ClassTemplate, ExtractionResult, GroupTemplate, TemplateProcessor};

use super::extract::{format_result, OutputFormat};
use super::{load_config, load_group_templates, load_labels, read_text};

/// Arguments for the batch command.
#[derive(Args)]
pub struct BatchArgs {
    /// Input files or glob pattern
    #[arg(required = true)]
    input: String,

    /// Output directory
    #[arg(short, long)]
    output_dir: Option<PathBuf>,

    /// Output format for each file
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Also generate a summary CSV
    #[arg(long)]
    summary: bool,

    /// Number of parallel workers
    #[arg(short = 'j', long, default_value = "4")]
    jobs: usize,

    /// Continue on error
    #[arg(long)]
    continue_on_error: bool,
}

/// Outcome of processing a single file.
enum Outcome {
    Extracted(ExtractionResult),
    /// No class template matched the document.
    Unmatched,
    Failed(String),
}

/// Result of processing a single file.
struct ProcessResult {
    path: PathBuf,
    outcome: Outcome,
    processing_time_ms: u64,
}

pub async fn run(args: BatchArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let labels = load_labels(&config)?;

    let files: Vec<PathBuf> = glob(&args.input)?
        .filter_map(|r| r.ok())
        .filter(|p| p.is_file())
        .collect();

    if files.is_empty() {
        anyhow::bail!("No matching files found for pattern: {}", args.input);
    }

    println!(
        "{} Found {} files to process",
        style("ℹ").blue(),
        files.len()
    );

    if let Some(ref output_dir) = args.output_dir {
        fs::create_dir_all(output_dir)?;
    }

    // Templates are loaded once and shared read-only by all workers
    let processor = Arc::new(TemplateProcessor::new(config));
    let templates = Arc::new(processor.store().load_class_templates()?);
    let groups = Arc::new(load_group_templates(processor.store())?);

    let overall_pb = ProgressBar::new(files.len() as u64);
    overall_pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} files")?
            .progress_chars("=>-"),
    );

    let semaphore = Arc::new(Semaphore::new(args.jobs.max(1)));
    let mut handles = Vec::with_capacity(files.len());

    for path in files {
        let permit = Arc::clone(&semaphore).acquire_owned().await?;
        let processor = Arc::clone(&processor);
        let templates = Arc::clone(&templates);
        let groups = Arc::clone(&groups);

        handles.push(tokio::task::spawn_blocking(move || {
            let _permit = permit;
            let file_start = Instant::now();
            let outcome = match process_single_file(&path, &processor, &templates, &groups) {
                Ok(Some(extraction)) => Outcome::Extracted(extraction),
                Ok(None) => Outcome::Unmatched,
                Err(e) => Outcome::Failed(e.to_string()),
            };

            ProcessResult {
                path,
                outcome,
                processing_time_ms: file_start.elapsed().as_millis() as u64,
            }
        }));
    }

    let mut results = Vec::with_capacity(handles.len());
    for handle in handles {
        let result = handle.await?;

        match &result.outcome {
            Outcome::Unmatched => info!("No template matched {}", result.path.display()),
            Outcome::Failed(error_msg) if args.continue_on_error => {
                warn!("Failed to process {}: {}", result.path.display(), error_msg);
            }
            Outcome::Failed(error_msg) => {
                error!("Failed to process {}: {}", result.path.display(), error_msg);
                overall_pb.abandon();
                anyhow::bail!("Processing failed: {}", error_msg);
            }
            Outcome::Extracted(_) => {}
        }

        overall_pb.inc(1);
        results.push(result);
    }

    overall_pb.finish_with_message("Complete");

    let successful = results.iter().filter(|r| matches!(r.outcome, Outcome::Extracted(_))).count();
    let unmatched: Vec<_> = results.iter().filter(|r| matches!(r.outcome, Outcome::Unmatched)).collect();
    let failed: Vec<_> = results.iter().filter(|r| matches!(r.outcome, Outcome::Failed(_))).collect();

    if let Some(output_dir) = &args.output_dir {
        for result in &results {
            if let Outcome::Extracted(extraction) = &result.outcome {
                let output_name = result.path
                    .file_stem()
                    .and_then(|s| s.to_str())
                    .unwrap_or("document");

                let output_path = output_dir.join(format!("{}.{}", output_name, args.format.extension()));
                fs::write(&output_path, format_result(extraction, args.format, &labels)?)?;
                debug!("Wrote output to {}", output_path.display());
            }
        }
    }

    if args.summary {
        let summary_path = args.output_dir
            .as_ref()
            .map(|d| d.join("summary.csv"))
            .unwrap_or_else(|| PathBuf::from("summary.csv"));

        write_summary(&summary_path, &results)?;
        println!(
            "{} Summary written to {}",
            style("✓").green(),
            summary_path.display()
        );
    }

    println!();
    println!(
        "{} Processed {} files in {:?}",
        style("✓").green(),
        results.len(),
        start.elapsed()
    );
    println!(
        "   {} successful, {} unmatched, {} failed",
        style(successful).green(),
        style(unmatched.len()).yellow(),
        style(failed.len()).red()
    );

    if !unmatched.is_empty() {
        println!();
        println!("{}", style("No template matched:").yellow());
        for result in &unmatched {
            println!("  - {}", result.path.display());
        }
    }

    if !failed.is_empty() {
        println!();
        println!("{}", style("Failed files:").red());
        for result in &failed {
            if let Outcome::Failed(error_msg) = &result.outcome {
                println!("  - {}: {}", result.path.display(), error_msg);
            }
        }
    }

    Ok(())
}

fn process_single_file(
    path: &Path,
    processor: &TemplateProcessor,
    templates: &[ClassTemplate],
    groups: &[GroupTemplate],
) -> anyhow::Result<Option<ExtractionResult>> {
    let text = read_text(path)?;
    if text.trim().is_empty() {
        anyhow::bail!("Document is empty");
    }

    Ok(processor.classify_and_extract(templates, groups, &text))
}

fn write_summary(path: &Path, results: &[ProcessResult]) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_path(path)?;

    wtr.write_record([
        "filename",
        "status",
        "class_name",
        "group_name",
        "missing_fields",
        "calculations_valid",
        "processing_time_ms",
        "error",
    ])?;

    for result in results {
        let filename = result.path.file_name()
            .and_then(|s| s.to_str())
            .unwrap_or("");

        let processing_time_ms = result.processing_time_ms.to_string();

        match &result.outcome {
            Outcome::Extracted(extraction) => wtr.write_record([
                filename,
                "success",
                &extraction.class_name,
                &extraction.group_name,
                &extraction.missing_fields().join(";"),
                &extraction.all_calculations_valid().to_string(),
                &processing_time_ms,
                "",
            ])?,
            Outcome::Unmatched => wtr.write_record([
                filename,
                "unmatched",
                "",
                "",
                "",
                "",
                &processing_time_ms,
                "",
            ])?,
            Outcome::Failed(error_msg) => wtr.write_record([
                filename,
                "error",
                "",
                "",
                "",
                "",
                &processing_time_ms,
                error_msg,
            ])?,
        }
    }

    wtr.flush()?;
    Ok(())
}
