//! Class and group template models.
//!
//! A class template describes one concrete document layout (one vendor's invoice, for
//! example): the keywords that identify it and the regexes that pull its fields out of the
//! text. A group template describes a family of layouts that share field semantics and
//! cross-field calculation rules.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Kind of a data field.
///
/// Determines the value shape a synthesized regex has to capture and which label is shown
/// for the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldKind {
    /// Free text up to the end of the line.
    #[default]
    Text,
    /// A calendar date.
    Date,
    /// A monetary amount.
    Currency,
    /// An IBAN following a textual label.
    Iban,
    /// A bare IBAN token anywhere in the text.
    AnchorlessIban,
    /// A VAT identification number.
    VatId,
    /// A payment term in days.
    Term,
}

impl FieldKind {
    /// All field kinds in declaration order.
    pub const ALL: [FieldKind; 7] = [
        FieldKind::Text,
        FieldKind::Date,
        FieldKind::Currency,
        FieldKind::Iban,
        FieldKind::AnchorlessIban,
        FieldKind::VatId,
        FieldKind::Term,
    ];

    /// Stable identifier, identical to the serialized form.
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Date => "date",
            FieldKind::Currency => "currency",
            FieldKind::Iban => "iban",
            FieldKind::AnchorlessIban => "anchorless_iban",
            FieldKind::VatId => "vat_id",
            FieldKind::Term => "term",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for FieldKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown field kind: {}", s))
    }
}

/// Conditions evaluated before keyword matching to narrow the candidate templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreselectionKey {
    /// Normalized IBAN (no whitespace, upper case). Empty when not set.
    pub iban: String,
}

impl PreselectionKey {
    /// Whether an IBAN preselection value is present.
    pub fn has_iban(&self) -> bool {
        !self.iban.is_empty()
    }
}

/// A group of alternative keywords.
///
/// The group is satisfied when at least one alternative occurs in the text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "KeywordGroupRepr", into = "Vec<String>")]
pub struct KeywordGroup {
    alternatives: Vec<String>,
}

impl KeywordGroup {
    /// Create a group from its alternatives. Empty alternatives are dropped.
    pub fn new<I, S>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            alternatives: alternatives
                .into_iter()
                .map(Into::into)
                .filter(|s: &String| !s.is_empty())
                .collect(),
        }
    }

    /// Parse the pipe-delimited form used by older template files (`"Total|Amount"`).
    pub fn parse_delimited(s: &str) -> Self {
        Self::new(s.split('|'))
    }

    /// Alternatives in declaration order.
    pub fn alternatives(&self) -> &[String] {
        &self.alternatives
    }

    pub fn is_empty(&self) -> bool {
        self.alternatives.is_empty()
    }
}

impl From<KeywordGroup> for Vec<String> {
    fn from(group: KeywordGroup) -> Self {
        group.alternatives
    }
}

/// On-disk forms accepted for a keyword group.
#[derive(Deserialize)]
#[serde(untagged)]
enum KeywordGroupRepr {
    List(Vec<String>),
    Delimited(String),
}

impl From<KeywordGroupRepr> for KeywordGroup {
    fn from(repr: KeywordGroupRepr) -> Self {
        match repr {
            KeywordGroupRepr::List(items) => KeywordGroup::new(items),
            KeywordGroupRepr::Delimited(s) => KeywordGroup::parse_delimited(&s),
        }
    }
}

/// A field to extract from documents matching a class template.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldTemplate {
    /// Field name. Expected to be unique within a template, not enforced.
    pub name: String,

    /// Field kind.
    #[serde(default)]
    pub kind: FieldKind,

    /// Regex candidates, tried in order. The first capturing group holds the value.
    #[serde(default)]
    pub regex_candidates: Vec<String>,
}

impl FieldTemplate {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            regex_candidates: Vec::new(),
        }
    }

    pub fn with_regex(mut self, regex: impl Into<String>) -> Self {
        self.regex_candidates.push(regex.into());
        self
    }
}

/// Definition of a data table. Stored and round-tripped, not interpreted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableDefinition {
    /// Table name.
    pub name: String,

    /// Regex marking the start of the table region.
    pub start_regex: String,

    /// Regex marking the end of the table region.
    pub end_regex: String,

    /// Column names.
    pub columns: Vec<String>,
}

/// Template for one specific document layout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassTemplate {
    /// Unique class name, also used as the storage file name.
    pub class_name: String,

    /// Name of the group template this class belongs to.
    pub group_name: String,

    /// Fast-path discriminator evaluated before keyword matching.
    #[serde(default)]
    pub preselection_key: PreselectionKey,

    /// Keyword groups. Every group must be satisfied for the template to match.
    #[serde(default)]
    pub keyword_groups: Vec<KeywordGroup>,

    /// Fields in output order.
    #[serde(default)]
    pub fields: Vec<FieldTemplate>,

    /// Table definitions.
    #[serde(default)]
    pub tables: Vec<TableDefinition>,
}

impl ClassTemplate {
    pub fn new(class_name: impl Into<String>, group_name: impl Into<String>) -> Self {
        Self {
            class_name: class_name.into(),
            group_name: group_name.into(),
            ..Default::default()
        }
    }

    /// Add a keyword group built from its alternatives.
    pub fn with_keywords<I, S>(mut self, alternatives: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.keyword_groups.push(KeywordGroup::new(alternatives));
        self
    }

    pub fn with_field(mut self, field: FieldTemplate) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_preselection_iban(mut self, iban: impl Into<String>) -> Self {
        self.preselection_key.iban = iban.into();
        self
    }
}

/// A field of a group template, carrying anchor hints for template synthesis.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupFieldTemplate {
    /// Field name.
    pub name: String,

    /// Field kind.
    #[serde(default)]
    pub kind: FieldKind,

    /// Literal text fragments expected near the value, tried in order.
    #[serde(default)]
    pub text_anchors: Vec<String>,
}

impl GroupFieldTemplate {
    pub fn new<I, S>(name: impl Into<String>, kind: FieldKind, anchors: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            kind,
            text_anchors: anchors.into_iter().map(Into::into).collect(),
        }
    }
}

/// A cross-field check evaluated after extraction.
///
/// Expressions are `+`/`-` sequences of operands, each operand being a field name or a
/// literal, e.g. `"NetAmount + VatAmount"` validated against `"GrossAmount"`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalculationFieldDefinition {
    /// Name of the check.
    pub name: String,

    /// Kind the operands are interpreted as.
    #[serde(default)]
    pub kind: FieldKind,

    /// Expression computed from the extracted fields.
    pub expression: String,

    /// Expression the computed value is compared against.
    pub validation_expression: String,

    /// Allowed absolute difference for currency checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<Decimal>,
}

/// Template for a family of document classes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GroupTemplate {
    /// Unique group name, also used as the storage file name.
    pub group_name: String,

    /// Fields with anchor hints, used for synthesis.
    #[serde(default)]
    pub fields: Vec<GroupFieldTemplate>,

    /// Cross-field checks.
    #[serde(default)]
    pub calculation_fields: Vec<CalculationFieldDefinition>,
}

impl GroupTemplate {
    pub fn new(group_name: impl Into<String>) -> Self {
        Self {
            group_name: group_name.into(),
            ..Default::default()
        }
    }

    pub fn with_field(mut self, field: GroupFieldTemplate) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_calculation(mut self, calculation: CalculationFieldDefinition) -> Self {
        self.calculation_fields.push(calculation);
        self
    }
}
