//! Template matching, field extraction and template synthesis.

mod calculator;
mod classifier;
mod extractor;
mod finder;
mod processor;
mod synthesizer;

pub use calculator::FieldCalculator;
pub use classifier::{match_keywords, TemplateClassifier, WordHitCache};
pub use extractor::{check_regex, extract_field, extract_template};
pub use finder::RegexFinder;
pub use processor::TemplateProcessor;
pub use synthesizer::TemplateSynthesizer;

use crate::models::{CalculationFieldDefinition, CalculationFieldResult, FieldKind, FieldResult, SynthesisResult};

/// Input for a pattern synthesis attempt.
#[derive(Debug, Clone, Copy)]
pub struct SynthesisRequest<'a> {
    /// Full document text.
    pub text: &'a str,
    /// Regex prefix to place in front of the value group.
    pub seed: Option<&'a str>,
    /// Literal text expected near the value.
    pub anchor: Option<&'a str>,
    /// Kind of the value to isolate.
    pub kind: FieldKind,
}

impl<'a> SynthesisRequest<'a> {
    pub fn anchored(text: &'a str, anchor: &'a str, kind: FieldKind) -> Self {
        Self { text, seed: None, anchor: Some(anchor), kind }
    }

    pub fn seeded(text: &'a str, seed: &'a str, kind: FieldKind) -> Self {
        Self { text, seed: Some(seed), anchor: None, kind }
    }

    pub fn anchorless(text: &'a str, kind: FieldKind) -> Self {
        Self { text, seed: None, anchor: None, kind }
    }
}

/// Turns a textual hint into a working extraction regex.
///
/// A successful result carries a regex with exactly one capturing group that yields
/// `matching_value` when executed against the request text.
pub trait PatternSynthesizer: Send + Sync {
    fn try_synthesize(&self, request: &SynthesisRequest<'_>) -> Option<SynthesisResult>;
}

/// Evaluates group-level calculation checks over extracted fields.
pub trait CalculationEngine: Send + Sync {
    fn evaluate(&self, definition: &CalculationFieldDefinition, fields: &[FieldResult]) -> CalculationFieldResult;
}
