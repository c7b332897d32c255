//! Date parsing.

use chrono::NaiveDate;

// Two-digit year forms first, `%Y` would read "24" as the year 24
const NUMERIC_FORMATS: [&str; 6] = ["%d.%m.%y", "%d.%m.%Y", "%d/%m/%y", "%d/%m/%Y", "%Y-%m-%d", "%d-%m-%Y"];

/// Parse a date as printed on a document.
///
/// Accepts numeric forms (15.01.2024, 15.01.24, 15/01/2024, 2024-01-15, 15-01-2024) and
/// day-month-name forms in English or German (15. Januar 2024, 3 Dec 2023).
pub fn parse_date(s: &str) -> Option<NaiveDate> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();

    for format in NUMERIC_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(&compact, format) {
            return Some(date);
        }
    }

    parse_named_month(s)
}

fn parse_named_month(s: &str) -> Option<NaiveDate> {
    let parts: Vec<&str> = s
        .split(|c: char| c.is_whitespace() || c == '.')
        .filter(|p| !p.is_empty())
        .collect();

    if parts.len() != 3 {
        return None;
    }

    let day: u32 = parts[0].parse().ok()?;
    let month = month_number(parts[1])?;
    let year: i32 = match parts[2].parse::<i32>().ok()? {
        y if y < 100 => 2000 + y,
        y => y,
    };

    NaiveDate::from_ymd_opt(year, month, day)
}

fn month_number(name: &str) -> Option<u32> {
    let name = name.to_lowercase();
    let month = match name.as_str() {
        "januar" | "january" | "jan" | "jänner" => 1,
        "februar" | "february" | "feb" => 2,
        "märz" | "maerz" | "march" | "mar" | "mär" => 3,
        "april" | "apr" => 4,
        "mai" | "may" => 5,
        "juni" | "june" | "jun" => 6,
        "juli" | "july" | "jul" => 7,
        "august" | "aug" => 8,
        "september" | "sep" | "sept" => 9,
        "oktober" | "october" | "okt" | "oct" => 10,
        "november" | "nov" => 11,
        "dezember" | "december" | "dez" | "dec" => 12,
        _ => return None,
    };
    Some(month)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_parse_numeric_dates() {
        assert_eq!(parse_date("15.01.2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("15. 01. 2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("15/01/2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("2024-01-15"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("15-01-2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("15.01.24"), Some(ymd(2024, 1, 15)));
    }

    #[test]
    fn test_parse_named_month_dates() {
        assert_eq!(parse_date("15. Januar 2024"), Some(ymd(2024, 1, 15)));
        assert_eq!(parse_date("3 Dec 2023"), Some(ymd(2023, 12, 3)));
        assert_eq!(parse_date("3. Dec. 23"), Some(ymd(2023, 12, 3)));
    }

    #[test]
    fn test_parse_invalid_dates() {
        assert_eq!(parse_date("31.02.2024"), None);
        assert_eq!(parse_date("tomorrow"), None);
        assert_eq!(parse_date(""), None);
    }
}
