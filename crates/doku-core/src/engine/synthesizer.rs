//! Class template synthesis from a sample text and a generic group template.

use tracing::{debug, info};

use super::{PatternSynthesizer, SynthesisRequest};
use crate::models::{ClassTemplate, FieldTemplate, GroupTemplate};
use crate::rules::{find_anchorless_iban, normalize_iban};

/// Derives new class templates through a [`PatternSynthesizer`].
pub struct TemplateSynthesizer<'s> {
    finder: &'s dyn PatternSynthesizer,
    validate_iban: bool,
}

impl<'s> TemplateSynthesizer<'s> {
    pub fn new(finder: &'s dyn PatternSynthesizer) -> Self {
        Self {
            finder,
            validate_iban: true,
        }
    }

    /// Set IBAN checksum validation for the preselection key.
    pub fn with_iban_validation(mut self, validate: bool) -> Self {
        self.validate_iban = validate;
        self
    }

    /// Create a class template named `template_name` for documents like `text`.
    ///
    /// Every field of `generic_group` is carried over in order. The regex of a field comes
    /// from the first anchor the finder can turn into a working expression; fields without
    /// such an anchor get no regex candidates. The result has no keyword groups.
    pub fn synthesize(&self, template_name: &str, text: &str, generic_group: &GroupTemplate) -> ClassTemplate {
        let mut template = ClassTemplate::new(template_name, generic_group.group_name.as_str());

        if let Some(iban) = find_anchorless_iban(text, self.validate_iban) {
            template.preselection_key.iban = normalize_iban(iban);
        }

        for group_field in &generic_group.fields {
            let mut field = FieldTemplate::new(group_field.name.as_str(), group_field.kind);

            let found = group_field.text_anchors.iter().find_map(|anchor| {
                self.finder
                    .try_synthesize(&SynthesisRequest::anchored(text, anchor, group_field.kind))
            });

            match found {
                Some(result) => {
                    debug!("Field {}: {:?} -> {:?}", field.name, result.regex_expression, result.matching_value);
                    field.regex_candidates = vec![result.regex_expression];
                }
                None => debug!("Field {}: no anchor produced a working regex", field.name),
            }

            template.fields.push(field);
        }

        let resolved = template.fields.iter().filter(|f| !f.regex_candidates.is_empty()).count();
        info!(
            "Synthesized template {} with {}/{} fields resolved",
            template.class_name,
            resolved,
            template.fields.len()
        );

        template
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{extract_field, RegexFinder};
    use crate::models::{FieldKind, GroupFieldTemplate, SynthesisResult};
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    const SAMPLE: &str = "Beispiel AG\n\
        Invoice number: 2024-0815\n\
        Invoice date: 03.02.2024\n\
        Total: 1.190,00\n\
        DE89 3704 0044 0532 0130 00";

    fn generic_group() -> GroupTemplate {
        GroupTemplate::new("Invoice")
            .with_field(GroupFieldTemplate::new("Number", FieldKind::Text, ["Rechnungsnummer", "Invoice number"]))
            .with_field(GroupFieldTemplate::new("Date", FieldKind::Date, ["Invoice date"]))
            .with_field(GroupFieldTemplate::new("Due", FieldKind::Date, ["Due date", "Fällig"]))
            .with_field(GroupFieldTemplate::new("Total", FieldKind::Currency, ["Total"]))
    }

    #[test]
    fn test_synthesize_from_sample() {
        let finder = RegexFinder::new();
        let template = TemplateSynthesizer::new(&finder).synthesize("Beispiel", SAMPLE, &generic_group());

        assert_eq!(template.class_name, "Beispiel");
        assert_eq!(template.group_name, "Invoice");
        assert_eq!(template.preselection_key.iban, "DE89370400440532013000");
        assert!(template.keyword_groups.is_empty());

        let names: Vec<&str> = template.fields.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["Number", "Date", "Due", "Total"]);

        assert_eq!(extract_field(SAMPLE, &template.fields[0].regex_candidates), "2024-0815");
        assert_eq!(extract_field(SAMPLE, &template.fields[1].regex_candidates), "03.02.2024");
        assert!(template.fields[2].regex_candidates.is_empty());
        assert_eq!(extract_field(SAMPLE, &template.fields[3].regex_candidates), "1.190,00");
    }

    #[test]
    fn test_no_iban_leaves_preselection_empty() {
        let finder = RegexFinder::new();
        let template = TemplateSynthesizer::new(&finder).synthesize("X", "Total: 5,00", &generic_group());
        assert!(!template.preselection_key.has_iban());
    }

    /// Records every anchor it is asked about and succeeds on one of them.
    struct RecordingFinder {
        accept: &'static str,
        seen: Mutex<Vec<String>>,
    }

    impl PatternSynthesizer for RecordingFinder {
        fn try_synthesize(&self, request: &SynthesisRequest<'_>) -> Option<SynthesisResult> {
            let anchor = request.anchor.unwrap_or_default().to_string();
            self.seen.lock().unwrap().push(anchor.clone());
            (anchor == self.accept).then(|| SynthesisResult {
                matching_value: "v".to_string(),
                regex_expression: format!("{anchor}(v)"),
            })
        }
    }

    #[test]
    fn test_first_successful_anchor_wins() {
        let group = GroupTemplate::new("G")
            .with_field(GroupFieldTemplate::new("F", FieldKind::Text, ["a", "b", "c"]));
        let finder = RecordingFinder {
            accept: "b",
            seen: Mutex::new(Vec::new()),
        };

        let template = TemplateSynthesizer::new(&finder).synthesize("T", "", &group);

        assert_eq!(template.fields[0].regex_candidates, vec!["b(v)".to_string()]);
        assert_eq!(*finder.seen.lock().unwrap(), vec!["a".to_string(), "b".to_string()]);
    }
}
