//! Value-level rules shared by classification, synthesis and calculation.
//!
//! Patterns describing what a value of each [`FieldKind`](crate::models::FieldKind) looks
//! like, plus the parsers that turn extracted strings back into typed values.

pub mod amounts;
pub mod dates;
pub mod iban;
pub mod patterns;

pub use amounts::parse_amount;
pub use dates::parse_date;
pub use iban::{find_anchorless_iban, format_iban, normalize_iban, validate_iban};
pub use patterns::value_pattern;
