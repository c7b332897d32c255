//! IBAN detection, normalization and validation.

use tracing::trace;

use super::patterns::ANCHORLESS_IBAN;

/// Find the first bare IBAN token in `text`.
///
/// Returns the token as printed (spaces kept). With `validate` set, a token failing the
/// checksum is cut back one space-separated group at a time, since the pattern also swallows
/// a group printed right after the IBAN (a year, a reference). If no prefix passes, the
/// search continues with the next token.
pub fn find_anchorless_iban(text: &str, validate: bool) -> Option<&str> {
    ANCHORLESS_IBAN
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str())
        .find_map(|candidate| {
            if !validate {
                return Some(candidate);
            }
            let found = valid_prefix(candidate);
            if found.is_none() {
                trace!("Skipping IBAN-shaped token with bad checksum: {}", candidate);
            }
            found
        })
}

/// Longest prefix of `token`, ending at a group boundary, that passes the checksum.
fn valid_prefix(token: &str) -> Option<&str> {
    let mut end = token.len();
    loop {
        let prefix = &token[..end];
        if validate_iban(prefix) {
            return Some(prefix);
        }
        end = prefix.rfind(' ')?;
    }
}

/// Remove whitespace and upper-case an IBAN.
pub fn normalize_iban(iban: &str) -> String {
    iban.chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_uppercase()
}

/// Validate an IBAN using the checksum algorithm.
///
/// Algorithm:
/// 1. Move first 4 characters to the end
/// 2. Replace letters with numbers (A=10, B=11, ..., Z=35)
/// 3. The resulting number mod 97 should equal 1
pub fn validate_iban(iban: &str) -> bool {
    let iban = normalize_iban(iban);

    // Shortest IBANs in use (Norway) have 15 characters
    if iban.len() < 15 || iban.len() > 34 || !iban.is_ascii() {
        return false;
    }

    let country_code = &iban[..2];
    let check_digits = &iban[2..4];

    if !country_code.chars().all(|c| c.is_ascii_alphabetic()) {
        return false;
    }
    if !check_digits.chars().all(|c| c.is_ascii_digit()) {
        return false;
    }

    let rearranged = format!("{}{}", &iban[4..], &iban[..4]);

    // Fold digit by digit, the number is too large for u64
    let mut remainder: u32 = 0;
    for c in rearranged.chars() {
        let value = match c {
            '0'..='9' => c as u32 - '0' as u32,
            'A'..='Z' => c as u32 - 'A' as u32 + 10,
            _ => return false,
        };
        remainder = if value >= 10 {
            (remainder * 100 + value) % 97
        } else {
            (remainder * 10 + value) % 97
        };
    }

    remainder == 1
}

/// Format IBAN in groups of 4 characters.
pub fn format_iban(iban: &str) -> String {
    normalize_iban(iban)
        .chars()
        .collect::<Vec<char>>()
        .chunks(4)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<String>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_iban_valid() {
        assert!(validate_iban("DE89370400440532013000"));
        assert!(validate_iban("DE89 3704 0044 0532 0130 00"));
        assert!(validate_iban("PL61109010140000071219812874"));
        assert!(validate_iban("GB82 WEST 1234 5698 7654 32"));
    }

    #[test]
    fn test_validate_iban_invalid() {
        assert!(!validate_iban("DE00370400440532013000"));
        assert!(!validate_iban("DE89"));
        assert!(!validate_iban("1289370400440532013000"));
    }

    #[test]
    fn test_find_anchorless_iban_skips_bad_checksum() {
        let text = "Ref DE00 3704 0044 0532 0130 00\nPay to DE89 3704 0044 0532 0130 00";
        assert_eq!(
            find_anchorless_iban(text, true),
            Some("DE89 3704 0044 0532 0130 00")
        );
        assert_eq!(
            find_anchorless_iban(text, false),
            Some("DE00 3704 0044 0532 0130 00")
        );
        assert_eq!(find_anchorless_iban("no account here", true), None);
    }

    #[test]
    fn test_find_anchorless_iban_drops_trailing_group() {
        let text = "Konto BE68 5390 0754 7034 2024 Ref";
        assert_eq!(find_anchorless_iban(text, true), Some("BE68 5390 0754 7034"));
        assert_eq!(find_anchorless_iban(text, false), Some("BE68 5390 0754 7034 2024"));

        let text = "AT61 1904 3002 3457 3201 4711\nDE89 3704 0044 0532 0130 00";
        assert_eq!(find_anchorless_iban(text, true), Some("AT61 1904 3002 3457 3201"));
    }

    #[test]
    fn test_find_anchorless_iban_no_valid_prefix() {
        assert_eq!(find_anchorless_iban("BE00 5390 0754 7034 2024", true), None);
        assert_eq!(find_anchorless_iban("BE685390075470342024", true), None);
    }

    #[test]
    fn test_normalize_and_format() {
        assert_eq!(normalize_iban("de89 3704 0044 0532 0130 00"), "DE89370400440532013000");
        assert_eq!(format_iban("DE89370400440532013000"), "DE89 3704 0044 0532 0130 00");
    }
}
