//! Display labels for field kinds, keyed by culture.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{DokuError, Result};
use crate::models::FieldKind;

/// String table with one label per [`FieldKind`].
///
/// Label files are JSON objects named `labels_<culture>.json`; missing entries fall back to
/// the English labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldKindLabels {
    pub text: String,
    pub date: String,
    pub currency: String,
    pub iban: String,
    pub anchorless_iban: String,
    pub vat_id: String,
    pub term: String,
}

impl FieldKindLabels {
    pub fn english() -> Self {
        Self {
            text: "Text".to_string(),
            date: "Date".to_string(),
            currency: "Currency".to_string(),
            iban: "IBAN".to_string(),
            anchorless_iban: "IBAN (without label)".to_string(),
            vat_id: "VAT ID".to_string(),
            term: "Payment term (days)".to_string(),
        }
    }

    pub fn german() -> Self {
        Self {
            text: "Text".to_string(),
            date: "Datum".to_string(),
            currency: "Betrag".to_string(),
            iban: "IBAN".to_string(),
            anchorless_iban: "IBAN (ohne Bezeichner)".to_string(),
            vat_id: "USt-IdNr.".to_string(),
            term: "Zahlungsziel (Tage)".to_string(),
        }
    }

    /// Built-in labels for `culture`, English for unknown cultures.
    ///
    /// Only the language part of the culture is considered, so `de-AT` resolves to German.
    pub fn builtin(culture: &str) -> Self {
        let language = culture.split(['-', '_']).next().unwrap_or_default();
        if language.eq_ignore_ascii_case("de") {
            Self::german()
        } else {
            Self::english()
        }
    }

    /// Load `labels_<culture>.json` from `dir`, or the built-in labels if there is no such file.
    pub fn load(dir: &Path, culture: &str) -> Result<Self> {
        let path = dir.join(format!("labels_{}.json", culture.to_lowercase()));

        match fs::read_to_string(&path) {
            Ok(content) => {
                debug!("Loading field kind labels from {}", path.display());
                serde_json::from_str(&content)
                    .map_err(|e| DokuError::Config(format!("invalid label file {}: {}", path.display(), e)))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No label file for culture {:?}, using built-in labels", culture);
                Ok(Self::builtin(culture))
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn label(&self, kind: FieldKind) -> &str {
        match kind {
            FieldKind::Text => &self.text,
            FieldKind::Date => &self.date,
            FieldKind::Currency => &self.currency,
            FieldKind::Iban => &self.iban,
            FieldKind::AnchorlessIban => &self.anchorless_iban,
            FieldKind::VatId => &self.vat_id,
            FieldKind::Term => &self.term,
        }
    }
}

impl Default for FieldKindLabels {
    fn default() -> Self {
        Self::english()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_every_kind_has_a_label() {
        for labels in [FieldKindLabels::english(), FieldKindLabels::german()] {
            for kind in FieldKind::ALL {
                assert!(!labels.label(kind).is_empty());
            }
        }
    }

    #[test]
    fn test_builtin_by_culture() {
        assert_eq!(FieldKindLabels::builtin("de-AT").label(FieldKind::Currency), "Betrag");
        assert_eq!(FieldKindLabels::builtin("fr").label(FieldKind::Currency), "Currency");
    }

    #[test]
    fn test_load_from_file_with_fallbacks() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("labels_nl.json"),
            r#"{ "date": "Datum", "currency": "Bedrag" }"#,
        )
        .unwrap();

        let labels = FieldKindLabels::load(dir.path(), "NL").unwrap();

        assert_eq!(labels.label(FieldKind::Currency), "Bedrag");
        assert_eq!(labels.label(FieldKind::Iban), "IBAN");
    }

    #[test]
    fn test_missing_file_uses_builtin() {
        let dir = tempfile::tempdir().unwrap();
        let labels = FieldKindLabels::load(dir.path(), "de").unwrap();
        assert_eq!(labels, FieldKindLabels::german());
    }

    #[test]
    fn test_malformed_file_is_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("labels_en.json"), "[1, 2").unwrap();

        let err = FieldKindLabels::load(dir.path(), "en").unwrap_err();
        assert!(matches!(err, DokuError::Config(_)));
    }
}
