//! Core library for template-based document data extraction.
//!
//! This crate provides:
//! - Class and group template models with JSON persistence
//! - Template classification by IBAN preselection and keyword groups
//! - Regex field extraction with cross-field calculation checks
//! - Synthesis of new class templates from a generic group template

pub mod engine;
pub mod error;
pub mod labels;
pub mod models;
pub mod rules;
pub mod storage;

pub use engine::{
    CalculationEngine, FieldCalculator, PatternSynthesizer, RegexFinder, SynthesisRequest, TemplateClassifier,
    TemplateProcessor, TemplateSynthesizer,
};
pub use error::{DokuError, Result, StorageError};
pub use labels::FieldKindLabels;
pub use models::{
    CalculationFieldDefinition, CalculationFieldResult, ClassTemplate, DokuConfig, ExtractionResult, FieldKind,
    FieldResult, FieldTemplate, GroupFieldTemplate, GroupTemplate, KeywordGroup, MatchResult, SynthesisResult,
};
pub use storage::TemplateStore;
