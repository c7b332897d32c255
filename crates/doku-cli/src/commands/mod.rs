//! Subcommands of the `doku` binary and the helpers they share.

pub mod batch;
pub mod classify;
pub mod config;
pub mod extract;
pub mod templates;

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use doku_core::{DokuConfig, FieldKindLabels, GroupTemplate, TemplateStore};

/// Default configuration file location.
pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("doku")
        .join("config.json")
}

/// Load the configuration from `path`, the default location, or fall back to defaults.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<DokuConfig> {
    if let Some(path) = path {
        return Ok(DokuConfig::from_file(path)?);
    }

    let default_path = default_config_path();
    if default_path.exists() {
        debug!("Using config file {}", default_path.display());
        Ok(DokuConfig::from_file(&default_path)?)
    } else {
        Ok(DokuConfig::default())
    }
}

/// Read a document's text.
pub fn read_text(path: &Path) -> anyhow::Result<String> {
    if !path.exists() {
        anyhow::bail!("Input file not found: {}", path.display());
    }
    Ok(fs::read_to_string(path)?)
}

/// Group templates are optional for extraction; a missing directory means none.
pub fn load_group_templates(store: &TemplateStore) -> anyhow::Result<Vec<GroupTemplate>> {
    if !store.group_dir().exists() {
        debug!("Group template directory {} does not exist", store.group_dir().display());
        return Ok(Vec::new());
    }
    Ok(store.load_group_templates()?)
}

/// Field kind labels for the configured culture.
pub fn load_labels(config: &DokuConfig) -> anyhow::Result<FieldKindLabels> {
    match &config.labels.label_dir {
        Some(dir) => Ok(FieldKindLabels::load(dir, &config.labels.culture)?),
        None => Ok(FieldKindLabels::builtin(&config.labels.culture)),
    }
}
