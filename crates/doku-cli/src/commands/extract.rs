//! Extract command - extract fields from a single document.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use clap::Args;
use console::style;
use tracing::{debug, info};

use doku_core::{ExtractionResult, FieldKindLabels, TemplateProcessor};

use super::{load_config, load_group_templates, load_labels, read_text};

/// Arguments for the extract command.
#[derive(Args)]
pub struct ExtractArgs {
    /// Input text file
    #[arg(required = true)]
    input: PathBuf,

    /// Output file (default: stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "json")]
    format: OutputFormat,

    /// Use this class template instead of classifying
    #[arg(short, long)]
    template: Option<String>,
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    /// JSON output
    Json,
    /// CSV output, one row per field
    Csv,
    /// Plain text summary
    Text,
}

impl OutputFormat {
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Text => "txt",
        }
    }
}

pub async fn run(args: ExtractArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let start = Instant::now();

    let config = load_config(config_path)?;
    let text = read_text(&args.input)?;
    let labels = load_labels(&config)?;

    let processor = TemplateProcessor::new(config);
    let templates = processor.store().load_class_templates()?;
    let groups = load_group_templates(processor.store())?;

    info!("Processing file: {}", args.input.display());

    let template = match &args.template {
        Some(name) => templates
            .iter()
            .find(|t| &t.class_name == name)
            .ok_or_else(|| anyhow::anyhow!("Template not found: {}", name))?,
        None => match processor.match_templates(&templates, &text).template {
            Some(template) => template,
            None => {
                info!("No template matched {}", args.input.display());
                println!("{} No template matched", style("ℹ").yellow());
                return Ok(());
            }
        },
    };

    let result = processor.extract_data(template, &groups, &text);

    if !result.all_calculations_valid() {
        eprintln!("{}", style("Calculation checks failed:").yellow());
        for check in result.calculation_results.iter().filter(|c| !c.is_valid) {
            eprintln!("  - {}", check.name);
        }
    }

    let output = format_result(&result, args.format, &labels)?;

    if let Some(output_path) = &args.output {
        fs::write(output_path, &output)?;
        println!(
            "{} Output written to {}",
            style("✓").green(),
            output_path.display()
        );
    } else {
        println!("{}", output);
    }

    debug!("Total processing time: {:?}", start.elapsed());

    Ok(())
}

/// Render an extraction result in the requested format.
pub fn format_result(result: &ExtractionResult, format: OutputFormat, labels: &FieldKindLabels) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(result)?),
        OutputFormat::Csv => format_csv(result),
        OutputFormat::Text => Ok(format_text(result, labels)),
    }
}

fn format_csv(result: &ExtractionResult) -> anyhow::Result<String> {
    let mut wtr = csv::Writer::from_writer(vec![]);

    wtr.write_record(["class_name", "field", "kind", "value"])?;

    for field in &result.fields {
        wtr.write_record([
            result.class_name.as_str(),
            field.name.as_str(),
            field.kind.as_str(),
            field.value.as_str(),
        ])?;
    }

    let data = String::from_utf8(wtr.into_inner()?)?;
    Ok(data)
}

fn format_text(result: &ExtractionResult, labels: &FieldKindLabels) -> String {
    let mut output = String::new();

    output.push_str(&format!("Template: {} ({})\n", result.class_name, result.group_name));
    output.push('\n');

    output.push_str("Fields:\n");
    for field in &result.fields {
        let value = if field.value.is_empty() { "-" } else { field.value.as_str() };
        output.push_str(&format!("  {} [{}]: {}\n", field.name, labels.label(field.kind), value));
    }

    if !result.calculation_results.is_empty() {
        output.push('\n');
        output.push_str("Checks:\n");
        for check in &result.calculation_results {
            output.push_str(&format!(
                "  {}: {} / {} {}\n",
                check.name,
                check.expression_value,
                check.validation_value,
                if check.is_valid { "ok" } else { "FAILED" }
            ));
        }
    }

    output
}
