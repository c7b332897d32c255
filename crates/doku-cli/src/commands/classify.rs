//! Classify command - find the class template matching a document.

use std::path::{Path, PathBuf};

use clap::Args;
use console::style;
use tracing::info;

use doku_core::TemplateProcessor;

use super::{load_config, read_text};

/// Arguments for the classify command.
#[derive(Args)]
pub struct ClassifyArgs {
    /// Input text file
    #[arg(required = true)]
    input: PathBuf,

    /// Print the templates preselected by IBAN
    #[arg(long)]
    show_preselection: bool,
}

pub async fn run(args: ClassifyArgs, config_path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(config_path)?;
    let text = read_text(&args.input)?;

    let processor = TemplateProcessor::new(config);
    let templates = processor.store().load_class_templates()?;

    info!("Classifying {} against {} templates", args.input.display(), templates.len());

    if args.show_preselection {
        let preselected = processor.preselect_templates(&templates, &text);
        if preselected.is_empty() {
            println!("{} No template preselected by IBAN", style("ℹ").blue());
        }
        for template in preselected {
            println!("{} Preselected {}", style("ℹ").blue(), template.class_name);
        }
    }

    match processor.match_templates(&templates, &text).template {
        Some(template) => println!(
            "{} {} (group {})",
            style("✓").green(),
            template.class_name,
            template.group_name
        ),
        None => println!("{} No template matched", style("ℹ").yellow()),
    }

    Ok(())
}
