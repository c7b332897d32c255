//! Configuration structures for classification, extraction and synthesis.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Default suffix appended to template names to form their file names.
pub const DEFAULT_TEMPLATE_SUFFIX: &str = ".json.txt";

/// Main configuration for doku.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DokuConfig {
    /// Template storage configuration.
    pub storage: StorageConfig,

    /// Classification configuration.
    pub classification: ClassificationConfig,

    /// Template synthesis configuration.
    pub synthesis: SynthesisConfig,

    /// Field-kind label configuration.
    pub labels: LabelConfig,
}

/// Template storage locations.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding one file per class template.
    pub class_template_dir: PathBuf,

    /// Directory holding one file per group template.
    pub group_template_dir: PathBuf,

    /// Suffix appended to the template name to form the file name.
    pub file_suffix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::under(Path::new("."))
    }
}

impl StorageConfig {
    /// Storage layout below an application root directory.
    pub fn under(root: &Path) -> Self {
        Self {
            class_template_dir: root.join("ExtractorClassTemplates"),
            group_template_dir: root.join("ExtractorGroupTemplates"),
            file_suffix: DEFAULT_TEMPLATE_SUFFIX.to_string(),
        }
    }
}

/// Template classification configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassificationConfig {
    /// Narrow candidates by the IBAN found in the text before keyword matching.
    pub enable_preselection: bool,

    /// Only accept IBAN tokens with a valid checksum.
    pub validate_iban: bool,
}

impl Default for ClassificationConfig {
    fn default() -> Self {
        Self {
            enable_preselection: true,
            validate_iban: true,
        }
    }
}

/// Template synthesis configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Group template used as the blueprint for new class templates.
    pub generic_group: String,

    /// Maximum number of characters allowed between an anchor and its value.
    pub max_anchor_gap: usize,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            generic_group: "Invoice".to_string(),
            max_anchor_gap: 40,
        }
    }
}

/// Field-kind label configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Culture identifier, e.g. "en" or "de".
    pub culture: String,

    /// Directory with `labels_<culture>.json` files. Built-in labels are used when unset.
    pub label_dir: Option<PathBuf>,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            culture: "en".to_string(),
            label_dir: None,
        }
    }
}

impl DokuConfig {
    /// Configuration with template directories below `root`.
    pub fn for_root(root: &Path) -> Self {
        Self {
            storage: StorageConfig::under(root),
            ..Default::default()
        }
    }

    /// Load configuration from a JSON file.
    pub fn from_file(path: &Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self).map_err(|e| {
            std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string())
        })?;
        std::fs::write(path, content)
    }
}
