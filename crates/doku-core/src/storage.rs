//! JSON template persistence, one file per template.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Result, StorageError};
use crate::models::{ClassTemplate, GroupTemplate, StorageConfig, DEFAULT_TEMPLATE_SUFFIX};

/// Reads and writes class and group templates in two directories.
///
/// File names are the template name plus a fixed suffix. Loading reads every regular file in
/// the directory in file-name order; one unreadable or malformed file fails the whole load.
#[derive(Debug, Clone)]
pub struct TemplateStore {
    class_dir: PathBuf,
    group_dir: PathBuf,
    suffix: String,
}

impl TemplateStore {
    pub fn new(class_dir: impl Into<PathBuf>, group_dir: impl Into<PathBuf>) -> Self {
        Self {
            class_dir: class_dir.into(),
            group_dir: group_dir.into(),
            suffix: DEFAULT_TEMPLATE_SUFFIX.to_string(),
        }
    }

    pub fn from_config(config: &StorageConfig) -> Self {
        Self::new(&config.class_template_dir, &config.group_template_dir).with_suffix(&config.file_suffix)
    }

    /// Set the file name suffix.
    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = suffix.into();
        self
    }

    pub fn class_dir(&self) -> &Path {
        &self.class_dir
    }

    pub fn group_dir(&self) -> &Path {
        &self.group_dir
    }

    /// Path of the file a class template with this name is stored in.
    pub fn class_template_path(&self, class_name: &str) -> PathBuf {
        self.class_dir.join(format!("{}{}", class_name, self.suffix))
    }

    /// Path of the file a group template with this name is stored in.
    pub fn group_template_path(&self, group_name: &str) -> PathBuf {
        self.group_dir.join(format!("{}{}", group_name, self.suffix))
    }

    pub fn load_class_templates(&self) -> Result<Vec<ClassTemplate>> {
        let templates: Vec<ClassTemplate> = load_dir(&self.class_dir)?;
        info!("Loaded {} class templates from {}", templates.len(), self.class_dir.display());
        Ok(templates)
    }

    pub fn load_group_templates(&self) -> Result<Vec<GroupTemplate>> {
        let templates: Vec<GroupTemplate> = load_dir(&self.group_dir)?;
        info!("Loaded {} group templates from {}", templates.len(), self.group_dir.display());
        Ok(templates)
    }

    /// Load all group templates and return the first one named `group_name`.
    pub fn group_template_by_name(&self, group_name: &str) -> Result<Option<GroupTemplate>> {
        Ok(self
            .load_group_templates()?
            .into_iter()
            .find(|g| g.group_name == group_name))
    }

    pub fn save_class_templates(&self, templates: &[ClassTemplate]) -> Result<()> {
        self.save_class_templates_to(&self.class_dir, templates)
    }

    pub fn save_group_templates(&self, templates: &[GroupTemplate]) -> Result<()> {
        self.save_group_templates_to(&self.group_dir, templates)
    }

    /// Write class templates to `dir`, creating it if needed.
    pub fn save_class_templates_to(&self, dir: &Path, templates: &[ClassTemplate]) -> Result<()> {
        ensure_dir(dir)?;
        for template in templates {
            write_template(dir, &template.class_name, &self.suffix, template)?;
        }
        Ok(())
    }

    /// Write group templates to `dir`, creating it if needed.
    pub fn save_group_templates_to(&self, dir: &Path, templates: &[GroupTemplate]) -> Result<()> {
        ensure_dir(dir)?;
        for template in templates {
            write_template(dir, &template.group_name, &self.suffix, template)?;
        }
        Ok(())
    }
}

impl Default for TemplateStore {
    fn default() -> Self {
        Self::from_config(&StorageConfig::default())
    }
}

fn load_dir<T: DeserializeOwned>(dir: &Path) -> Result<Vec<T>> {
    let read_error = |source| StorageError::Read {
        path: dir.to_path_buf(),
        source,
    };

    let mut paths = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_error)? {
        let path = entry.map_err(read_error)?.path();
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    let mut templates = Vec::with_capacity(paths.len());
    for path in paths {
        let content = fs::read_to_string(&path).map_err(|source| StorageError::Read {
            path: path.clone(),
            source,
        })?;
        let template = serde_json::from_str(&content).map_err(|source| StorageError::Parse {
            path: path.clone(),
            source,
        })?;
        debug!("Loaded template file {}", path.display());
        templates.push(template);
    }

    Ok(templates)
}

fn ensure_dir(dir: &Path) -> Result<()> {
    fs::create_dir_all(dir).map_err(|source| StorageError::Write {
        path: dir.to_path_buf(),
        source,
    })?;
    Ok(())
}

fn write_template<T: Serialize>(dir: &Path, name: &str, suffix: &str, template: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(template).map_err(|source| StorageError::Serialize {
        name: name.to_string(),
        source,
    })?;

    let path = dir.join(format!("{}{}", name, suffix));
    fs::write(&path, json).map_err(|source| StorageError::Write {
        path: path.clone(),
        source,
    })?;

    debug!("Saved template {} to {}", name, path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DokuError;
    use crate::models::{FieldKind, FieldTemplate, GroupFieldTemplate};
    use pretty_assertions::assert_eq;

    fn store(root: &Path) -> TemplateStore {
        TemplateStore::from_config(&StorageConfig::under(root))
    }

    #[test]
    fn test_save_creates_dir_and_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let templates = vec![
            ClassTemplate::new("Beta", "Invoice").with_keywords(["Beta GmbH"]),
            ClassTemplate::new("Alpha", "Invoice")
                .with_field(FieldTemplate::new("Total", FieldKind::Currency).with_regex(r"Total (\S+)")),
        ];

        store.save_class_templates(&templates).unwrap();

        assert!(store.class_template_path("Alpha").exists());
        assert!(dir.path().join("ExtractorClassTemplates/Beta.json.txt").exists());

        let loaded = store.load_class_templates().unwrap();
        let names: Vec<&str> = loaded.iter().map(|t| t.class_name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Beta"]);
        assert_eq!(loaded[0], templates[1]);
    }

    #[test]
    fn test_save_overwrites() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());

        store.save_class_templates(&[ClassTemplate::new("A", "Old")]).unwrap();
        store.save_class_templates(&[ClassTemplate::new("A", "New")]).unwrap();

        let loaded = store.load_class_templates().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].group_name, "New");
    }

    #[test]
    fn test_corrupt_file_aborts_load() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        store.save_class_templates(&[ClassTemplate::new("Good", "Invoice")]).unwrap();
        fs::write(store.class_template_path("Bad"), "{ not json").unwrap();

        let err = store.load_class_templates().unwrap_err();
        match err {
            DokuError::Storage(StorageError::Parse { path, .. }) => assert!(path.ends_with("Bad.json.txt")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_dir_is_read_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = store(dir.path()).load_group_templates().unwrap_err();
        assert!(matches!(err, DokuError::Storage(StorageError::Read { .. })));
    }

    #[test]
    fn test_group_template_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = store(dir.path());
        let invoice = GroupTemplate::new("Invoice")
            .with_field(GroupFieldTemplate::new("Total", FieldKind::Currency, ["Total", "Summe"]));
        store
            .save_group_templates(&[invoice.clone(), GroupTemplate::new("Reminder")])
            .unwrap();

        assert_eq!(store.group_template_by_name("Invoice").unwrap(), Some(invoice));
        assert_eq!(store.group_template_by_name("Contract").unwrap(), None);
    }

    #[test]
    fn test_save_to_explicit_dir_with_suffix() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("export");
        let store = store(dir.path()).with_suffix(".json");

        store
            .save_group_templates_to(&target, &[GroupTemplate::new("Invoice")])
            .unwrap();

        assert!(target.join("Invoice.json").exists());
        assert!(!store.group_dir().exists());
    }
}
