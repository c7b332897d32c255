//! Facade bundling configuration, storage and the pluggable capabilities.

use tracing::info;

use super::{
    check_regex, extract_template, CalculationEngine, FieldCalculator, PatternSynthesizer, RegexFinder,
    SynthesisRequest, TemplateClassifier, TemplateSynthesizer,
};
use crate::error::{DokuError, Result};
use crate::models::{ClassTemplate, DokuConfig, ExtractionResult, FieldKind, GroupTemplate, MatchResult, SynthesisResult};
use crate::storage::TemplateStore;

/// Entry point for classification, extraction and template creation.
///
/// Templates are passed in by the caller and only read. The processor holds no per-document
/// state, so one instance can serve many documents concurrently.
pub struct TemplateProcessor {
    config: DokuConfig,
    store: TemplateStore,
    synthesizer: Box<dyn PatternSynthesizer>,
    calculator: Box<dyn CalculationEngine>,
}

impl TemplateProcessor {
    /// Create a processor using the default finder and calculator.
    pub fn new(config: DokuConfig) -> Self {
        let finder = RegexFinder::new()
            .with_max_anchor_gap(config.synthesis.max_anchor_gap)
            .with_iban_validation(config.classification.validate_iban);

        Self {
            store: TemplateStore::from_config(&config.storage),
            synthesizer: Box::new(finder),
            calculator: Box::new(FieldCalculator::new()),
            config,
        }
    }

    /// Replace the pattern synthesizer.
    pub fn with_synthesizer(mut self, synthesizer: Box<dyn PatternSynthesizer>) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    /// Replace the calculation engine.
    pub fn with_calculator(mut self, calculator: Box<dyn CalculationEngine>) -> Self {
        self.calculator = calculator;
        self
    }

    pub fn config(&self) -> &DokuConfig {
        &self.config
    }

    pub fn store(&self) -> &TemplateStore {
        &self.store
    }

    fn classifier(&self) -> TemplateClassifier {
        TemplateClassifier::new()
            .with_preselection(self.config.classification.enable_preselection)
            .with_iban_validation(self.config.classification.validate_iban)
    }

    /// Find the class template matching `text`: IBAN preselection first, then keywords.
    pub fn match_templates<'a>(&self, templates: &'a [ClassTemplate], text: &str) -> MatchResult<'a> {
        self.classifier().classify(templates, text)
    }

    /// Templates whose preselection IBAN occurs in `text`.
    pub fn preselect_templates<'a>(&self, templates: &'a [ClassTemplate], text: &str) -> Vec<&'a ClassTemplate> {
        self.classifier().preselect(templates, text)
    }

    /// Match by keywords only.
    pub fn match_templates_via_keywords<'a>(&self, templates: &'a [ClassTemplate], text: &str) -> MatchResult<'a> {
        self.classifier().match_via_keywords(templates, text)
    }

    /// Extract the fields of `template` and run its group's calculation checks.
    pub fn extract_data(&self, template: &ClassTemplate, group_templates: &[GroupTemplate], text: &str) -> ExtractionResult {
        extract_template(template, group_templates, text, self.calculator.as_ref())
    }

    /// [`extract_data`](Self::extract_data) as indented JSON.
    pub fn extract_data_as_json(
        &self,
        template: &ClassTemplate,
        group_templates: &[GroupTemplate],
        text: &str,
    ) -> Result<String> {
        let result = self.extract_data(template, group_templates, text);
        Ok(serde_json::to_string_pretty(&result)?)
    }

    /// Classify and extract in one step. `None` when no template matches.
    pub fn classify_and_extract(
        &self,
        templates: &[ClassTemplate],
        group_templates: &[GroupTemplate],
        text: &str,
    ) -> Option<ExtractionResult> {
        let template = self.match_templates(templates, text).template?;
        Some(self.extract_data(template, group_templates, text))
    }

    /// Create a class template for documents like `text` from a generic group template.
    pub fn auto_create_class_template(&self, template_name: &str, text: &str, generic_group: &GroupTemplate) -> ClassTemplate {
        TemplateSynthesizer::new(self.synthesizer.as_ref())
            .with_iban_validation(self.config.classification.validate_iban)
            .synthesize(template_name, text, generic_group)
    }

    /// Like [`auto_create_class_template`](Self::auto_create_class_template), with the
    /// configured generic group loaded from the store.
    pub fn auto_create_class_template_from_store(&self, template_name: &str, text: &str) -> Result<ClassTemplate> {
        let group_name = &self.config.synthesis.generic_group;
        let group = self
            .store
            .group_template_by_name(group_name)?
            .ok_or_else(|| DokuError::GroupNotFound(group_name.clone()))?;

        info!("Creating template {} from group {}", template_name, group.group_name);
        Ok(self.auto_create_class_template(template_name, text, &group))
    }

    /// Whether `regex` extracts exactly `target_value` from `text`.
    pub fn check_regex_expression(&self, text: &str, regex: &str, target_value: &str) -> bool {
        check_regex(text, regex, target_value)
    }

    /// Ask the configured synthesizer for an expression.
    pub fn try_find_regex_match_expression(
        &self,
        text: &str,
        seed: Option<&str>,
        anchor: Option<&str>,
        kind: FieldKind,
    ) -> Option<SynthesisResult> {
        self.synthesizer.try_synthesize(&SynthesisRequest { text, seed, anchor, kind })
    }
}

impl Default for TemplateProcessor {
    fn default() -> Self {
        Self::new(DokuConfig::default())
    }
}
