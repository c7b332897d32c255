//! Templates command - list, inspect, create and check class templates.

use std::path::{Path, PathBuf};

use clap::{Args, Subcommand};
use console::style;

use doku_core::rules::format_iban;
use doku_core::{FieldKind, TemplateProcessor};

use super::{load_config, load_labels, read_text};

/// Arguments for the templates command.
#[derive(Args)]
pub struct TemplatesArgs {
    #[command(subcommand)]
    command: TemplatesCommand,
}

#[derive(Subcommand)]
enum TemplatesCommand {
    /// List stored class templates
    List,

    /// Print a class template as JSON
    Show {
        /// Class template name
        name: String,
    },

    /// Create a class template from a sample document
    Create(CreateArgs),

    /// Check that a regex extracts the expected value from a document
    Check {
        /// Input text file
        input: PathBuf,
        /// Regex with a capturing group
        regex: String,
        /// Expected value of the first group
        expected: String,
    },

    /// Suggest a regex for a value near an anchor
    Suggest(SuggestArgs),
}

#[derive(Args)]
struct CreateArgs {
    /// Name of the new class template
    name: String,

    /// Sample document text file
    sample: PathBuf,

    /// Group template to derive fields from (default: configured generic group)
    #[arg(short, long)]
    group: Option<String>,

    /// Print the template instead of saving it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args)]
struct SuggestArgs {
    /// Input text file
    input: PathBuf,

    /// Literal text next to the value
    #[arg(short, long)]
    anchor: Option<String>,

    /// Regex placed in front of the value instead of an anchor
    #[arg(short, long, conflicts_with = "anchor")]
    seed: Option<String>,

    /// Kind of the value
    #[arg(short, long, default_value = "text")]
    kind: FieldKind,
}

pub async fn run(args: TemplatesArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let processor = TemplateProcessor::new(config);

    match args.command {
        TemplatesCommand::List => list_templates(&processor),
        TemplatesCommand::Show { name } => show_template(&processor, &name),
        TemplatesCommand::Create(create_args) => create_template(&processor, create_args),
        TemplatesCommand::Check { input, regex, expected } => check_regex(&processor, &input, &regex, &expected),
        TemplatesCommand::Suggest(suggest_args) => suggest_regex(&processor, suggest_args),
    }
}

fn list_templates(processor: &TemplateProcessor) -> anyhow::Result<()> {
    let templates = processor.store().load_class_templates()?;

    if templates.is_empty() {
        println!("{} No class templates in {}", style("ℹ").blue(), processor.store().class_dir().display());
        return Ok(());
    }

    println!("{:<30} {:<20} {:>6}  {}", "Template", "Group", "Fields", "IBAN");
    println!("{}", "-".repeat(80));

    for template in &templates {
        println!(
            "{:<30} {:<20} {:>6}  {}",
            template.class_name,
            template.group_name,
            template.fields.len(),
            format_iban(&template.preselection_key.iban)
        );
    }

    Ok(())
}

fn show_template(processor: &TemplateProcessor, name: &str) -> anyhow::Result<()> {
    let templates = processor.store().load_class_templates()?;
    let template = templates
        .iter()
        .find(|t| t.class_name == name)
        .ok_or_else(|| anyhow::anyhow!("Template not found: {}", name))?;

    println!("{}", serde_json::to_string_pretty(template)?);

    Ok(())
}

fn create_template(processor: &TemplateProcessor, args: CreateArgs) -> anyhow::Result<()> {
    let text = read_text(&args.sample)?;

    let template = match &args.group {
        Some(group_name) => {
            let group = processor
                .store()
                .group_template_by_name(group_name)?
                .ok_or_else(|| anyhow::anyhow!("Group template not found: {}", group_name))?;
            processor.auto_create_class_template(&args.name, &text, &group)
        }
        None => processor.auto_create_class_template_from_store(&args.name, &text)?,
    };

    if args.dry_run {
        println!("{}", serde_json::to_string_pretty(&template)?);
        return Ok(());
    }

    processor.store().save_class_templates(std::slice::from_ref(&template))?;

    let labels = load_labels(processor.config())?;
    for field in &template.fields {
        if field.regex_candidates.is_empty() {
            println!(
                "{} No regex found for {} [{}]",
                style("!").yellow(),
                field.name,
                labels.label(field.kind)
            );
        }
    }

    println!(
        "{} Created template {} at {}",
        style("✓").green(),
        template.class_name,
        processor.store().class_template_path(&template.class_name).display()
    );

    Ok(())
}

fn check_regex(processor: &TemplateProcessor, input: &Path, regex: &str, expected: &str) -> anyhow::Result<()> {
    let text = read_text(input)?;

    if !processor.check_regex_expression(&text, regex, expected) {
        let actual = doku_core::engine::extract_field(&text, [regex]);
        anyhow::bail!("Regex extracts {:?}, expected {:?}", actual, expected);
    }

    println!("{} Regex extracts {:?}", style("✓").green(), expected);

    Ok(())
}

fn suggest_regex(processor: &TemplateProcessor, args: SuggestArgs) -> anyhow::Result<()> {
    let text = read_text(&args.input)?;

    let result = processor
        .try_find_regex_match_expression(&text, args.seed.as_deref(), args.anchor.as_deref(), args.kind)
        .ok_or_else(|| anyhow::anyhow!("No regex found for a {} value", args.kind))?;

    println!("{}", result.regex_expression);
    println!("{} Matches {:?}", style("✓").green(), result.matching_value);

    Ok(())
}
