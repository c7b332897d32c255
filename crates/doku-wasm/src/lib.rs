//! WASM bindings for template-based document extraction.
//!
//! Templates cross the boundary as JSON strings in the same format as the template files;
//! results come back as JavaScript objects.

use wasm_bindgen::prelude::*;

use doku_core::engine::extract_field as extract_field_value;
use doku_core::{ClassTemplate, ExtractionResult, GroupTemplate, TemplateProcessor};

/// Initialize panic hook for better error messages in console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Version information.
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn to_js_error(e: impl std::fmt::Display) -> JsValue {
    JsValue::from_str(&e.to_string())
}

fn parse_json<T: serde::de::DeserializeOwned>(json: &str, what: &str) -> Result<T, String> {
    serde_json::from_str(json).map_err(|e| format!("invalid {}: {}", what, e))
}

fn classify_json(templates_json: &str, text: &str) -> Result<Option<String>, String> {
    let templates: Vec<ClassTemplate> = parse_json(templates_json, "class templates")?;
    let processor = TemplateProcessor::default();
    Ok(processor
        .match_templates(&templates, text)
        .template
        .map(|t| t.class_name.clone()))
}

fn extract_json(templates_json: &str, groups_json: &str, text: &str) -> Result<Option<ExtractionResult>, String> {
    let templates: Vec<ClassTemplate> = parse_json(templates_json, "class templates")?;
    let groups: Vec<GroupTemplate> = parse_json(groups_json, "group templates")?;
    Ok(TemplateProcessor::default().classify_and_extract(&templates, &groups, text))
}

fn extract_field_json(text: &str, regexes_json: &str) -> Result<String, String> {
    let regexes: Vec<String> = parse_json(regexes_json, "regex list")?;
    Ok(extract_field_value(text, &regexes))
}

fn synthesize_json(name: &str, text: &str, group_json: &str) -> Result<ClassTemplate, String> {
    let group: GroupTemplate = parse_json(group_json, "group template")?;
    Ok(TemplateProcessor::default().auto_create_class_template(name, text, &group))
}

/// Name of the class template matching `text`, or `undefined`.
#[wasm_bindgen]
pub fn classify(templates_json: &str, text: &str) -> Result<Option<String>, JsValue> {
    classify_json(templates_json, text).map_err(to_js_error)
}

/// Classify `text` and extract its fields. Returns `null` when no template matches.
#[wasm_bindgen]
pub fn extract(templates_json: &str, groups_json: &str, text: &str) -> Result<JsValue, JsValue> {
    let result = extract_json(templates_json, groups_json, text).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&result).map_err(to_js_error)
}

/// Value of the first group of the first matching regex in a JSON array of regexes.
#[wasm_bindgen]
pub fn extract_field(text: &str, regexes_json: &str) -> Result<String, JsValue> {
    extract_field_json(text, regexes_json).map_err(to_js_error)
}

/// Whether `regex` extracts exactly `expected` from `text`.
#[wasm_bindgen]
pub fn check_regex(text: &str, regex: &str, expected: &str) -> bool {
    TemplateProcessor::default().check_regex_expression(text, regex, expected)
}

/// Create a class template for documents like `text` from a group template.
#[wasm_bindgen]
pub fn synthesize(name: &str, text: &str, group_json: &str) -> Result<JsValue, JsValue> {
    let template = synthesize_json(name, text, group_json).map_err(to_js_error)?;
    serde_wasm_bindgen::to_value(&template).map_err(to_js_error)
}

/// Template set loaded once for repeated extraction in the browser.
#[wasm_bindgen]
pub struct DocumentExtractor {
    processor: TemplateProcessor,
    templates: Vec<ClassTemplate>,
    groups: Vec<GroupTemplate>,
}

#[wasm_bindgen]
impl DocumentExtractor {
    /// Create an extractor from JSON arrays of class and group templates.
    #[wasm_bindgen(constructor)]
    pub fn new(templates_json: &str, groups_json: &str) -> Result<DocumentExtractor, JsValue> {
        Ok(Self {
            processor: TemplateProcessor::default(),
            templates: parse_json(templates_json, "class templates").map_err(to_js_error)?,
            groups: parse_json(groups_json, "group templates").map_err(to_js_error)?,
        })
    }

    /// Number of loaded class templates.
    #[wasm_bindgen(getter)]
    pub fn template_count(&self) -> usize {
        self.templates.len()
    }

    /// Name of the matching class template, or `undefined`.
    #[wasm_bindgen]
    pub fn classify(&self, text: &str) -> Option<String> {
        self.processor
            .match_templates(&self.templates, text)
            .template
            .map(|t| t.class_name.clone())
    }

    /// Classify and extract. Returns `null` when no template matches.
    #[wasm_bindgen]
    pub fn extract(&self, text: &str) -> Result<JsValue, JsValue> {
        let result = self.processor.classify_and_extract(&self.templates, &self.groups, text);
        serde_wasm_bindgen::to_value(&result).map_err(to_js_error)
    }

    /// Extraction result with timing information.
    #[wasm_bindgen]
    pub fn extract_with_metadata(&self, text: &str) -> Result<JsValue, JsValue> {
        let start = js_sys::Date::now();
        let result = self.processor.classify_and_extract(&self.templates, &self.groups, text);

        #[derive(serde::Serialize)]
        struct ExtractOutput {
            result: Option<ExtractionResult>,
            missing_fields: Vec<String>,
            processing_time_ms: f64,
        }

        let missing_fields = result
            .as_ref()
            .map(|r| r.missing_fields().into_iter().map(String::from).collect())
            .unwrap_or_default();

        let output = ExtractOutput {
            result,
            missing_fields,
            processing_time_ms: js_sys::Date::now() - start,
        };

        serde_wasm_bindgen::to_value(&output).map_err(to_js_error)
    }
}
