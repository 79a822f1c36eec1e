use chrono::{Duration, NaiveDate};

/// A single spreadsheet cell, already shed of formatting.
///
/// Register exports are hand-edited, so a column rarely has one consistent
/// type: share counts arrive as floats, as `"1 000"` text, or as
/// `"NOK 1 000"`. Coercion therefore happens per target field, never per
/// column.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Cell {
    #[default]
    Empty,
    Text(String),
    Number(f64),
    Date(NaiveDate),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// Cell content as trimmed text. Numbers render without a trailing
    /// `.0` so registration numbers stored as floats survive intact.
    pub fn as_text(&self) -> Option<String> {
        match self {
            Cell::Empty => None,
            Cell::Text(s) => {
                let t = s.trim();
                if t.is_empty() {
                    None
                } else {
                    Some(t.to_string())
                }
            }
            Cell::Number(n) => {
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    Some(format!("{}", *n as i64))
                } else {
                    Some(format!("{}", n))
                }
            }
            Cell::Date(d) => Some(d.format("%Y-%m-%d").to_string()),
        }
    }

    /// Whole-number coercion for share counts and vote counts.
    pub fn as_count(&self) -> Option<i64> {
        match self {
            Cell::Number(n) => float_to_count(*n),
            Cell::Text(s) => parse_decimal(s).and_then(float_to_count),
            _ => None,
        }
    }

    /// Decimal coercion for monetary values and percentages.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(s) => parse_decimal(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Cell::Date(d) => Some(*d),
            Cell::Text(s) => parse_date(s),
            _ => None,
        }
    }

    /// Truthiness for flag columns (pledge markers and the like).
    pub fn as_flag(&self) -> bool {
        match self {
            Cell::Number(n) => *n != 0.0,
            Cell::Text(s) => {
                matches!(
                    s.trim().to_lowercase().as_str(),
                    "ja" | "yes" | "true" | "x" | "1"
                )
            }
            _ => false,
        }
    }
}

fn float_to_count(n: f64) -> Option<i64> {
    if n.fract() == 0.0 && n.abs() < 9e15 {
        Some(n as i64)
    } else {
        None
    }
}

/// Parse a decimal from hand-edited register text.
///
/// Strips a leading 3-letter currency code and a trailing `%`, drops
/// whitespace (including NBSP) and thousands-commas between digit groups,
/// and accepts a Norwegian decimal comma. Returns `None` instead of failing.
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let mut s = raw.trim();
    if s.is_empty() {
        return None;
    }

    // Currency prefix: exactly three letters, then the number ("NOK 1 000").
    let prefix_len = s.chars().take_while(|c| c.is_ascii_alphabetic()).count();
    if prefix_len == 3 {
        s = s[3..].trim_start();
    }

    s = s.trim_end_matches('%').trim_end();
    if s.is_empty() {
        return None;
    }

    let cleaned: String = s
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .collect();

    let normalized = if cleaned.contains(',') {
        if cleaned.contains('.') {
            // Both present: commas are group separators.
            cleaned.replace(',', "")
        } else {
            let after = cleaned.rsplit(',').next().unwrap_or("");
            let single_comma = cleaned.matches(',').count() == 1;
            if single_comma && (1..=2).contains(&after.len()) {
                // Decimal comma: "12,5"
                cleaned.replace(',', ".")
            } else {
                // Group separators: "1,000,000"
                cleaned.replace(',', "")
            }
        }
    } else {
        cleaned
    };

    normalized.parse::<f64>().ok()
}

/// Parse a date from register text. ISO first, then the day-first formats
/// Norwegian exports actually use.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }
    for fmt in ["%Y-%m-%d", "%d.%m.%Y", "%d/%m/%Y", "%d-%m-%Y"] {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Some(d);
        }
    }
    None
}

/// Strict `YYYY-MM-DD` check, used to classify the shared
/// registration-number/birth-date column.
pub fn is_iso_date(raw: &str) -> bool {
    let s = raw.trim();
    let b = s.as_bytes();
    if b.len() != 10 || b[4] != b'-' || b[7] != b'-' {
        return false;
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
}

/// Convert an Excel serial date (1900 system) to a calendar date.
/// Calamine hands serials through as floats; the time fraction is dropped.
pub fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    let days = serial.floor() as i64;
    if days <= 0 || days > 200_000 {
        return None;
    }
    NaiveDate::from_ymd_opt(1899, 12, 30).map(|epoch| epoch + Duration::days(days))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn decimal_parsing_handles_register_formats() {
        assert_eq!(parse_decimal("1000"), Some(1000.0));
        assert_eq!(parse_decimal("1 000"), Some(1000.0));
        assert_eq!(parse_decimal("1\u{a0}000\u{a0}500"), Some(1_000_500.0));
        assert_eq!(parse_decimal("1,000,000"), Some(1_000_000.0));
        assert_eq!(parse_decimal("1,234.56"), Some(1234.56));
        assert_eq!(parse_decimal("12,5"), Some(12.5));
        assert_eq!(parse_decimal("NOK 1 000"), Some(1000.0));
        assert_eq!(parse_decimal("EUR 99.90"), Some(99.9));
        assert_eq!(parse_decimal("45 %"), Some(45.0));
        assert_eq!(parse_decimal("45%"), Some(45.0));
        assert_eq!(parse_decimal("-250"), Some(-250.0));
        assert_eq!(parse_decimal(""), None);
        assert_eq!(parse_decimal("n/a"), None);
        assert_eq!(parse_decimal("NOK"), None);
    }

    #[test]
    fn count_coercion_rejects_fractions() {
        assert_eq!(Cell::Text("150".into()).as_count(), Some(150));
        assert_eq!(Cell::Number(150.0).as_count(), Some(150));
        assert_eq!(Cell::Number(150.5).as_count(), None);
        assert_eq!(Cell::Text("1 500".into()).as_count(), Some(1500));
        assert_eq!(Cell::Empty.as_count(), None);
    }

    #[test]
    fn text_coercion_renders_numeric_org_numbers() {
        // Org numbers often arrive as float cells from Excel.
        assert_eq!(Cell::Number(910000001.0).as_text().as_deref(), Some("910000001"));
        assert_eq!(Cell::Text("  Alpha AS  ".into()).as_text().as_deref(), Some("Alpha AS"));
        assert_eq!(Cell::Text("   ".into()).as_text(), None);
    }

    #[test]
    fn date_parsing_accepts_norwegian_formats() {
        let d = NaiveDate::from_ymd_opt(1980, 5, 17).unwrap();
        assert_eq!(parse_date("1980-05-17"), Some(d));
        assert_eq!(parse_date("17.05.1980"), Some(d));
        assert_eq!(parse_date("17/05/1980"), Some(d));
        assert_eq!(parse_date("17-05-1980"), Some(d));
        assert_eq!(parse_date("yesterday"), None);
    }

    #[test]
    fn iso_date_check_is_strict() {
        assert!(is_iso_date("1980-05-17"));
        assert!(!is_iso_date("17.05.1980"));
        assert!(!is_iso_date("1980-13-40"));
        assert!(!is_iso_date("910000001"));
    }

    #[test]
    fn excel_serials_convert_to_dates() {
        // 2020-01-01 is serial 43831 in the 1900 system.
        assert_eq!(
            excel_serial_to_date(43831.0),
            NaiveDate::from_ymd_opt(2020, 1, 1)
        );
        assert_eq!(excel_serial_to_date(43831.75), NaiveDate::from_ymd_opt(2020, 1, 1));
        assert_eq!(excel_serial_to_date(0.0), None);
        assert_eq!(excel_serial_to_date(-5.0), None);
    }

    #[test]
    fn flags_accept_norwegian_yes() {
        assert!(Cell::Text("Ja".into()).as_flag());
        assert!(Cell::Text("x".into()).as_flag());
        assert!(Cell::Number(1.0).as_flag());
        assert!(!Cell::Text("Nei".into()).as_flag());
        assert!(!Cell::Empty.as_flag());
    }

    proptest! {
        #[test]
        fn decimal_parsing_never_panics(s in "\\PC*") {
            let _ = parse_decimal(&s);
        }

        #[test]
        fn date_parsing_never_panics(s in "\\PC*") {
            let _ = parse_date(&s);
        }
    }
}
