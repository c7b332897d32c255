//! Data models for templates, results and configuration.

pub mod config;
pub mod result;
pub mod template;

pub use config::{
    ClassificationConfig, DokuConfig, LabelConfig, StorageConfig, SynthesisConfig, DEFAULT_TEMPLATE_SUFFIX,
};
pub use result::{CalculationFieldResult, ExtractionResult, FieldResult, MatchResult, SynthesisResult};
pub use template::{
    CalculationFieldDefinition, ClassTemplate, FieldKind, FieldTemplate, GroupFieldTemplate,
    GroupTemplate, KeywordGroup, PreselectionKey, TableDefinition,
};
