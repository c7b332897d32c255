//! Value patterns per field kind.
//!
//! The `*_VALUE` strings contain no capturing groups so they can be wrapped into a larger
//! expression whose first group isolates the value.

use lazy_static::lazy_static;
use regex::Regex;

use crate::models::FieldKind;

/// Rest of the line, trimmed on both ends.
pub const TEXT_VALUE: &str = r"\S(?:[^\n]*\S)?";

/// Numeric dates (15.01.2024, 15/01/24, 2024-01-15) and day-month-name dates (15. Januar 2024).
pub const DATE_VALUE: &str = r"\d{1,2}\.[^\S\n]?(?:\d{1,2}\.[^\S\n]?|[A-Za-zÄÖÜäöüéû]+\.?[^\S\n])\d{2,4}|\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\d{4}-\d{2}-\d{2}";

/// Amounts with two decimals and optional thousands separators (1.234,56 / 1,234.56 / 1 234,56).
pub const CURRENCY_VALUE: &str = r"-?\d{1,3}(?:[.,' ]?\d{3})*[.,]\d{2}\b";

/// IBAN, printed with or without groups of four.
pub const IBAN_VALUE: &str = r"[A-Z]{2}\d{2}(?:[ ]?[A-Z0-9]{4}){2,7}(?:[ ]?[A-Z0-9]{1,3})?";

/// VAT identification number with country prefix.
pub const VAT_ID_VALUE: &str = r"[A-Z]{2}[ ]?[0-9A-Z]{8,12}";

/// Payment term as a number of days.
pub const TERM_VALUE: &str = r"\d{1,3}";

lazy_static! {
    /// Bare IBAN token, not tied to any label.
    pub static ref ANCHORLESS_IBAN: Regex = Regex::new(
        r"\b([A-Z]{2}\d{2}(?:[ ]?[A-Z0-9]{4}){3,7}(?:[ ]?[A-Z0-9]{1,3})?)\b"
    ).unwrap();
}

/// Value pattern for a field kind.
pub fn value_pattern(kind: FieldKind) -> &'static str {
    match kind {
        FieldKind::Text => TEXT_VALUE,
        FieldKind::Date => DATE_VALUE,
        FieldKind::Currency => CURRENCY_VALUE,
        FieldKind::Iban | FieldKind::AnchorlessIban => IBAN_VALUE,
        FieldKind::VatId => VAT_ID_VALUE,
        FieldKind::Term => TERM_VALUE,
    }
}
