//! Regex-based field extraction.

use regex::Regex;
use tracing::{debug, warn};

use super::CalculationEngine;
use crate::models::{ClassTemplate, ExtractionResult, FieldResult, GroupTemplate};

/// Execute regex candidates against `text` and return the first group of the first match.
///
/// A candidate counts only if it matches and declares at least one capturing group. Invalid
/// candidates are skipped. Returns an empty string when no candidate yields a value.
pub fn extract_field<I, S>(text: &str, regex_candidates: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    for candidate in regex_candidates {
        let candidate = candidate.as_ref();

        let re = match Regex::new(candidate) {
            Ok(re) => re,
            Err(e) => {
                warn!("Skipping invalid regex {:?}: {}", candidate, e);
                continue;
            }
        };

        // Group 0 is the whole match
        if re.captures_len() < 2 {
            debug!("Skipping regex without capturing group: {:?}", candidate);
            continue;
        }

        if let Some(caps) = re.captures(text) {
            return caps.get(1).map(|m| m.as_str().to_string()).unwrap_or_default();
        }
    }

    String::new()
}

/// Check whether `regex` extracts exactly `target` from `text`.
pub fn check_regex(text: &str, regex: &str, target: &str) -> bool {
    extract_field(text, [regex]) == target
}

/// Extract all fields of `template` and run the calculation checks of its group.
///
/// A missing group template is not an error; the result then has no calculation results.
pub fn extract_template(
    template: &ClassTemplate,
    group_templates: &[GroupTemplate],
    text: &str,
    calculator: &dyn CalculationEngine,
) -> ExtractionResult {
    let fields: Vec<FieldResult> = template
        .fields
        .iter()
        .map(|field| FieldResult {
            name: field.name.clone(),
            kind: field.kind,
            value: extract_field(text, &field.regex_candidates),
        })
        .collect();

    let mut result = ExtractionResult {
        class_name: template.class_name.clone(),
        group_name: template.group_name.clone(),
        fields,
        calculation_results: Vec::new(),
    };

    match group_templates.iter().find(|g| g.group_name == template.group_name) {
        Some(group) => {
            result.calculation_results = group
                .calculation_fields
                .iter()
                .map(|definition| calculator.evaluate(definition, &result.fields))
                .collect();
        }
        None => debug!(
            "No group template {:?} for class {}, skipping calculations",
            template.group_name, template.class_name
        ),
    }

    debug!(
        "Extracted {} fields ({} empty) with template {}",
        result.fields.len(),
        result.missing_fields().len(),
        template.class_name
    );

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::FieldCalculator;
    use crate::models::{CalculationFieldDefinition, FieldKind, FieldTemplate};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_first_candidate_with_group_wins() {
        let candidates = ["no-match-regex", r"(?<v>\d+)", r"(?<v>[a-z]+)"];
        assert_eq!(extract_field("42", candidates), "42");
    }

    #[test]
    fn test_no_match_returns_empty() {
        assert_eq!(extract_field("42", ["abc(\\d)"]), "");
        assert_eq!(extract_field("42", Vec::<String>::new()), "");
    }

    #[test]
    fn test_match_without_group_is_skipped() {
        assert_eq!(extract_field("Total 42", [r"Total \d+", r"Total (\d+)"]), "42");
    }

    #[test]
    fn test_invalid_regex_is_skipped() {
        assert_eq!(extract_field("Total 42", [r"Total (\d+", r"Total (\d+)"]), "42");
    }

    #[test]
    fn test_non_participating_group_yields_empty_and_stops() {
        assert_eq!(extract_field("Total", [r"Total(:)?", r"(Total)"]), "");
    }

    #[test]
    fn test_check_regex() {
        assert!(check_regex("Total: 123,45", r"Total:\s*([0-9,.]+)", "123,45"));
        assert!(!check_regex("Total: 123,45", r"Total:\s*([0-9]+)", "123,45"));
    }

    #[test]
    fn test_extract_template_total() {
        let template = ClassTemplate::new("T", "Invoice").with_field(
            FieldTemplate::new("Total", FieldKind::Currency).with_regex(r"Total:\s*([0-9,.]+)"),
        );

        let result = extract_template(&template, &[], "Total: 123,45", &FieldCalculator::new());

        assert_eq!(
            result.fields,
            vec![FieldResult {
                name: "Total".to_string(),
                kind: FieldKind::Currency,
                value: "123,45".to_string(),
            }]
        );
        assert!(result.calculation_results.is_empty());
        assert_eq!(result.class_name, "T");
        assert_eq!(result.group_name, "Invoice");
    }

    #[test]
    fn test_extract_template_keeps_order_and_duplicates() {
        let template = ClassTemplate::new("T", "Invoice")
            .with_field(FieldTemplate::new("B", FieldKind::Text).with_regex(r"B=(\w+)"))
            .with_field(FieldTemplate::new("A", FieldKind::Text).with_regex(r"A=(\w+)"))
            .with_field(FieldTemplate::new("B", FieldKind::Text).with_regex(r"B=(\w+)"));

        let result = extract_template(&template, &[], "A=1 B=2", &FieldCalculator::new());
        let names: Vec<&str> = result.fields.iter().map(|f| f.name.as_str()).collect();

        assert_eq!(names, vec!["B", "A", "B"]);
        assert_eq!(result.field("A").unwrap().value, "1");
    }

    #[test]
    fn test_extract_template_runs_group_calculations() {
        let template = ClassTemplate::new("T", "Invoice")
            .with_field(FieldTemplate::new("Net", FieldKind::Currency).with_regex(r"Net:\s*([\d.,]+)"))
            .with_field(FieldTemplate::new("Vat", FieldKind::Currency).with_regex(r"VAT:\s*([\d.,]+)"))
            .with_field(FieldTemplate::new("Total", FieldKind::Currency).with_regex(r"Total:\s*([\d.,]+)"));
        let groups = vec![
            GroupTemplate::new("Other"),
            GroupTemplate::new("Invoice").with_calculation(CalculationFieldDefinition {
                name: "Gross".to_string(),
                kind: FieldKind::Currency,
                expression: "Net + Vat".to_string(),
                validation_expression: "Total".to_string(),
                tolerance: None,
            }),
        ];
        let text = "Net: 100,00\nVAT: 19,00\nTotal: 119,00";

        let result = extract_template(&template, &groups, text, &FieldCalculator::new());

        assert_eq!(result.calculation_results.len(), 1);
        assert!(result.calculation_results[0].is_valid);
    }

    #[test]
    fn test_extract_template_survives_extreme_amounts() {
        let template = ClassTemplate::new("T", "Invoice")
            .with_field(FieldTemplate::new("Net", FieldKind::Currency).with_regex(r"Net:\s*(\d+)"))
            .with_field(FieldTemplate::new("Vat", FieldKind::Currency).with_regex(r"VAT:\s*(\d+)"))
            .with_field(FieldTemplate::new("Total", FieldKind::Currency).with_regex(r"Total:\s*([\d,]+)"));
        let groups = vec![GroupTemplate::new("Invoice").with_calculation(CalculationFieldDefinition {
            name: "Gross".to_string(),
            kind: FieldKind::Currency,
            expression: "Net + Vat".to_string(),
            validation_expression: "Total".to_string(),
            tolerance: None,
        })];
        let text = "Net: 79228162514264337593543950335\nVAT: 79228162514264337593543950335\nTotal: 1,00";

        let result = extract_template(&template, &groups, text, &FieldCalculator::new());

        assert_eq!(result.field("Total").unwrap().value, "1,00");
        assert_eq!(result.calculation_results.len(), 1);
        assert!(!result.calculation_results[0].is_valid);
    }
}
