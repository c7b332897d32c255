//! Keyword-based template classification with IBAN preselection.

use std::collections::HashMap;

use tracing::{debug, info, trace};

use crate::models::{ClassTemplate, MatchResult};
use crate::rules::{find_anchorless_iban, normalize_iban};

/// Occurrence counts of keyword literals in one text.
///
/// Each literal is counted at most once, however many templates or groups reference it.
/// A cache belongs to a single classification call and is never shared between texts.
#[derive(Debug)]
pub struct WordHitCache<'t> {
    text: &'t str,
    counts: HashMap<String, usize>,
}

impl<'t> WordHitCache<'t> {
    pub fn new(text: &'t str) -> Self {
        Self {
            text,
            counts: HashMap::new(),
        }
    }

    /// Number of non-overlapping occurrences of `word` in the text.
    pub fn count(&mut self, word: &str) -> usize {
        if let Some(&count) = self.counts.get(word) {
            return count;
        }

        let count = self.text.matches(word).count();
        trace!("Keyword {:?} occurs {} times", word, count);
        self.counts.insert(word.to_string(), count);
        count
    }

    /// Cached count for `word`, if it has been computed.
    pub fn cached(&self, word: &str) -> Option<usize> {
        self.counts.get(word).copied()
    }

    /// Number of distinct literals counted so far.
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }
}

/// Return the first template whose keyword groups are all satisfied.
///
/// A group is satisfied by its first alternative occurring in the text; remaining
/// alternatives are not counted. A template fails at its first unsatisfied group.
pub fn match_keywords<'a, I>(templates: I, hits: &mut WordHitCache<'_>) -> MatchResult<'a>
where
    I: IntoIterator<Item = &'a ClassTemplate>,
{
    for template in templates {
        if template.keyword_groups.is_empty() {
            debug!("Template {} has no keyword groups, matching unconditionally", template.class_name);
            return MatchResult::matched(template);
        }

        let is_match = template
            .keyword_groups
            .iter()
            .all(|group| group.alternatives().iter().any(|word| hits.count(word) >= 1));

        if is_match {
            return MatchResult::matched(template);
        }
    }

    MatchResult::miss()
}

/// Selects the class template matching a text.
#[derive(Debug, Clone)]
pub struct TemplateClassifier {
    /// Whether to run the IBAN preselection pass.
    enable_preselection: bool,
    /// Whether IBAN tokens must pass the checksum.
    validate_iban: bool,
}

impl TemplateClassifier {
    /// Create a classifier with preselection and IBAN validation enabled.
    pub fn new() -> Self {
        Self {
            enable_preselection: true,
            validate_iban: true,
        }
    }

    /// Set whether the IBAN preselection pass runs.
    pub fn with_preselection(mut self, enable: bool) -> Self {
        self.enable_preselection = enable;
        self
    }

    /// Set IBAN checksum validation.
    pub fn with_iban_validation(mut self, validate: bool) -> Self {
        self.validate_iban = validate;
        self
    }

    /// Classify `text` against `candidates`.
    ///
    /// Templates preselected by IBAN are tried first. If none of them matches by keywords,
    /// all candidates are tried in their original order, so a wrong or missing IBAN never
    /// prevents a keyword match.
    pub fn classify<'a>(&self, candidates: &'a [ClassTemplate], text: &str) -> MatchResult<'a> {
        let mut hits = WordHitCache::new(text);

        if self.enable_preselection {
            let preselected = self.preselect(candidates, text);
            if !preselected.is_empty() {
                let result = match_keywords(preselected, &mut hits);
                if let Some(template) = result.template {
                    info!("Matched template {} via IBAN preselection", template.class_name);
                    return result;
                }
                debug!("Preselected templates did not match by keywords, trying all templates");
            }
        }

        let result = match_keywords(candidates, &mut hits);
        match result.template {
            Some(template) => info!("Matched template {}", template.class_name),
            None => info!("No template matched ({} candidates)", candidates.len()),
        }
        result
    }

    /// Templates whose preselection IBAN equals the first IBAN found in `text`.
    pub fn preselect<'a>(&self, candidates: &'a [ClassTemplate], text: &str) -> Vec<&'a ClassTemplate> {
        let Some(token) = find_anchorless_iban(text, self.validate_iban) else {
            return Vec::new();
        };

        let iban = normalize_iban(token);
        let selected: Vec<&ClassTemplate> = candidates
            .iter()
            .filter(|t| t.preselection_key.iban == iban)
            .collect();

        debug!("IBAN {} preselected {} templates", iban, selected.len());
        selected
    }

    /// Keyword pass only, without preselection.
    pub fn match_via_keywords<'a>(&self, candidates: &'a [ClassTemplate], text: &str) -> MatchResult<'a> {
        match_keywords(candidates, &mut WordHitCache::new(text))
    }
}

impl Default for TemplateClassifier {
    fn default() -> Self {
        Self::new()
    }
}
