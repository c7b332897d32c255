//! Classification and extraction results.

use serde::{Deserialize, Serialize};

use super::template::{ClassTemplate, FieldKind};

/// Outcome of classifying a text against class templates.
///
/// A miss is a normal outcome, not an error.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MatchResult<'a> {
    /// The matched template, if any.
    pub template: Option<&'a ClassTemplate>,
}

impl<'a> MatchResult<'a> {
    pub fn matched(template: &'a ClassTemplate) -> Self {
        Self {
            template: Some(template),
        }
    }

    pub fn miss() -> Self {
        Self { template: None }
    }

    pub fn is_match(&self) -> bool {
        self.template.is_some()
    }
}

/// Value extracted for one field. `value` is empty when no regex candidate matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldResult {
    pub name: String,
    pub kind: FieldKind,
    pub value: String,
}

/// Result of one cross-field check.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationFieldResult {
    /// Name of the check.
    pub name: String,

    /// Kind the operands were interpreted as.
    pub kind: FieldKind,

    /// Computed value of the expression, empty if it could not be evaluated.
    pub expression_value: String,

    /// Computed value of the validation expression, empty if it could not be evaluated.
    pub validation_value: String,

    /// Whether both sides evaluated and agree.
    pub is_valid: bool,
}

/// Result of one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Class template used.
    pub class_name: String,

    /// Group of the class template.
    pub group_name: String,

    /// Extracted fields in template declaration order.
    pub fields: Vec<FieldResult>,

    /// Cross-field check results in group declaration order.
    pub calculation_results: Vec<CalculationFieldResult>,
}

impl ExtractionResult {
    /// Look up the first field with the given name.
    pub fn field(&self, name: &str) -> Option<&FieldResult> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Names of fields that came back empty.
    pub fn missing_fields(&self) -> Vec<&str> {
        self.fields
            .iter()
            .filter(|f| f.value.is_empty())
            .map(|f| f.name.as_str())
            .collect()
    }

    /// Whether every calculation check passed. True when there are none.
    pub fn all_calculations_valid(&self) -> bool {
        self.calculation_results.iter().all(|c| c.is_valid)
    }
}

/// Output of a pattern synthesis attempt.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SynthesisResult {
    /// Representative value found in the text.
    pub matching_value: String,

    /// Regex with one capturing group isolating the value.
    pub regex_expression: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extraction_result_json_keeps_field_order() {
        let result = ExtractionResult {
            class_name: "ACME".to_string(),
            group_name: "Invoice".to_string(),
            fields: vec![
                FieldResult { name: "Zeta".to_string(), kind: FieldKind::Text, value: "z".to_string() },
                FieldResult { name: "Alpha".to_string(), kind: FieldKind::Text, value: String::new() },
            ],
            calculation_results: Vec::new(),
        };

        let json = serde_json::to_string_pretty(&result).unwrap();
        let zeta = json.find("Zeta").unwrap();
        let alpha = json.find("Alpha").unwrap();
        assert!(zeta < alpha);
        assert!(json.contains("\"value\": \"\""));
        assert_eq!(result.missing_fields(), vec!["Alpha"]);
        assert!(result.all_calculations_valid());
    }
}
