//! Default pattern synthesizer: anchor + separator + typed value group.

use tracing::{debug, trace};

use super::extractor::{check_regex, extract_field};
use super::{PatternSynthesizer, SynthesisRequest};
use crate::models::{FieldKind, SynthesisResult};
use crate::rules::find_anchorless_iban;
use crate::rules::patterns::{value_pattern, ANCHORLESS_IBAN};

/// Builds extraction regexes from an anchor (or a regex seed) and the value pattern of the
/// field kind.
///
/// Candidates are tried nearest-first: value on the anchor's line right after an optional
/// `:`/`#`/`.` separator, then further right on the same line, then on the following lines.
/// A candidate is accepted once it extracts a non-empty value from the text.
#[derive(Debug, Clone)]
pub struct RegexFinder {
    /// Maximum characters between anchor and value.
    max_anchor_gap: usize,
    /// Whether anchorless IBANs must pass the checksum.
    validate_iban: bool,
}

impl RegexFinder {
    pub fn new() -> Self {
        Self {
            max_anchor_gap: 40,
            validate_iban: true,
        }
    }

    /// Set the maximum gap between anchor and value.
    pub fn with_max_anchor_gap(mut self, gap: usize) -> Self {
        self.max_anchor_gap = gap;
        self
    }

    /// Set IBAN checksum validation for anchorless IBANs.
    pub fn with_iban_validation(mut self, validate: bool) -> Self {
        self.validate_iban = validate;
        self
    }

    fn candidate_expressions(&self, prefix: &str, kind: FieldKind) -> Vec<String> {
        let value = value_pattern(kind);
        let gap = self.max_anchor_gap;

        let mut expressions = vec![format!(r"{prefix}[^\S\n]*[:#.]*[^\S\n]*({value})")];

        if kind == FieldKind::Text {
            // Anything after the anchor on the same line is the value, so only look below
            expressions.push(format!(r"{prefix}[^\S\n]*[:#.]*[^\S\n]*\n\s*({value})"));
        } else {
            expressions.push(format!(r"{prefix}[^\n]{{0,{gap}}}?({value})"));
            expressions.push(format!(r"{prefix}[\s\S]{{0,{gap}}}?({value})"));
        }

        expressions
    }

    fn find_anchorless(&self, text: &str) -> Option<SynthesisResult> {
        let value = find_anchorless_iban(text, self.validate_iban)?;
        let generic = ANCHORLESS_IBAN.as_str();

        // The generic pattern yields the first IBAN-shaped token, untrimmed
        let regex_expression = if check_regex(text, generic, value) {
            generic.to_string()
        } else {
            debug!("Generic IBAN pattern misses {}, using the literal value", value);
            format!(r"\b({})\b", regex::escape(value))
        };

        Some(SynthesisResult {
            matching_value: value.to_string(),
            regex_expression,
        })
    }
}

impl Default for RegexFinder {
    fn default() -> Self {
        Self::new()
    }
}

impl PatternSynthesizer for RegexFinder {
    fn try_synthesize(&self, request: &SynthesisRequest<'_>) -> Option<SynthesisResult> {
        if request.kind == FieldKind::AnchorlessIban {
            return self.find_anchorless(request.text);
        }

        let prefix = match (request.anchor, request.seed) {
            (Some(anchor), _) if !anchor.is_empty() => {
                if !request.text.contains(anchor) {
                    trace!("Anchor {:?} not present in text", anchor);
                    return None;
                }
                regex::escape(anchor)
            }
            (_, Some(seed)) if !seed.is_empty() => {
                // A group in the seed would shadow the value group
                match regex::Regex::new(seed) {
                    Ok(re) if re.captures_len() == 1 => seed.to_string(),
                    _ => {
                        debug!("Rejecting seed {:?}: invalid or contains capturing groups", seed);
                        return None;
                    }
                }
            }
            _ => return None,
        };

        for expression in self.candidate_expressions(&prefix, request.kind) {
            let value = extract_field(request.text, [&expression]);
            if !value.trim().is_empty() {
                debug!("Synthesized {:?} yielding {:?}", expression, value);
                return Some(SynthesisResult {
                    matching_value: value,
                    regex_expression: expression,
                });
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::check_regex;

    const TEXT: &str = "ACME GmbH\n\
        Rechnungsnummer: RE-2024-001\n\
        Rechnungsdatum 15.01.2024\n\
        Zahlbar innerhalb von 14 Tagen\n\
        USt-IdNr.: DE123456789\n\
        Gesamtbetrag\n\
        EUR 1.234,56\n\
        IBAN DE89 3704 0044 0532 0130 00";

    fn synthesize(anchor: &str, kind: FieldKind) -> Option<SynthesisResult> {
        RegexFinder::new().try_synthesize(&SynthesisRequest::anchored(TEXT, anchor, kind))
    }

    #[test]
    fn test_text_after_anchor() {
        let result = synthesize("Rechnungsnummer", FieldKind::Text).unwrap();
        assert_eq!(result.matching_value, "RE-2024-001");
        assert!(check_regex(TEXT, &result.regex_expression, "RE-2024-001"));
    }

    #[test]
    fn test_date_after_anchor() {
        let result = synthesize("Rechnungsdatum", FieldKind::Date).unwrap();
        assert_eq!(result.matching_value, "15.01.2024");
    }

    #[test]
    fn test_term_further_right_on_line() {
        let result = synthesize("Zahlbar innerhalb", FieldKind::Term).unwrap();
        assert_eq!(result.matching_value, "14");
    }

    #[test]
    fn test_currency_on_next_line() {
        let result = synthesize("Gesamtbetrag", FieldKind::Currency).unwrap();
        assert_eq!(result.matching_value, "1.234,56");
        assert!(check_regex(TEXT, &result.regex_expression, "1.234,56"));
    }

    #[test]
    fn test_vat_id_and_iban() {
        assert_eq!(synthesize("USt-IdNr.", FieldKind::VatId).unwrap().matching_value, "DE123456789");
        assert_eq!(
            synthesize("IBAN", FieldKind::Iban).unwrap().matching_value,
            "DE89 3704 0044 0532 0130 00"
        );
    }

    #[test]
    fn test_anchorless_iban() {
        let result = RegexFinder::new()
            .try_synthesize(&SynthesisRequest::anchorless(TEXT, FieldKind::AnchorlessIban))
            .unwrap();
        assert_eq!(result.matching_value, "DE89 3704 0044 0532 0130 00");
        assert!(check_regex(TEXT, &result.regex_expression, "DE89 3704 0044 0532 0130 00"));
    }

    #[test]
    fn test_anchorless_iban_with_trailing_group() {
        let text = "Ref DE00 3704 0044 0532 0130 00\nKonto BE68 5390 0754 7034 2024";
        let result = RegexFinder::new()
            .try_synthesize(&SynthesisRequest::anchorless(text, FieldKind::AnchorlessIban))
            .unwrap();
        assert_eq!(result.matching_value, "BE68 5390 0754 7034");
        assert!(check_regex(text, &result.regex_expression, "BE68 5390 0754 7034"));
    }

    #[test]
    fn test_seed_is_used_verbatim() {
        let result = RegexFinder::new()
            .try_synthesize(&SynthesisRequest::seeded(TEXT, r"Rechnungs(?:datum|tag)", FieldKind::Date))
            .unwrap();
        assert_eq!(result.matching_value, "15.01.2024");
    }

    #[test]
    fn test_failures() {
        assert!(synthesize("Lieferdatum", FieldKind::Date).is_none());
        assert!(synthesize("Zahlbar innerhalb", FieldKind::Date).is_none());
        assert!(RegexFinder::new()
            .try_synthesize(&SynthesisRequest::anchorless(TEXT, FieldKind::Date))
            .is_none());
        assert!(RegexFinder::new()
            .try_synthesize(&SynthesisRequest::seeded(TEXT, r"Rechnungs(datum)", FieldKind::Date))
            .is_none());
    }
}
