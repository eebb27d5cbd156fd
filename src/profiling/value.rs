//! Cell-level helpers shared by inference, statistics and the scorers.
//!
//! Cells arrive as untyped JSON scalars. These helpers decide emptiness, render
//! a cell as text, and apply the lenient number, date and boolean parsers that
//! the type rules are defined in terms of.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::Regex;
use serde_json::Value;
use std::borrow::Cow;
use std::sync::LazyLock;

static ISO_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})").expect("valid regex"));

static US_DATE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{1,2})/(\d{1,2})/(\d{4}|\d{2})").expect("valid regex"));

static TIME_SUFFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^(?:T| +)(\d{1,2}):(\d{2})(?::(\d{2})(?:\.(\d{1,9}))?)?(?: *([AaPp][Mm]))?(?:Z|[+-]\d{2}:?\d{2})?$",
    )
    .expect("valid regex")
});

const BOOLEAN_LITERALS: [&str; 10] = ["true", "false", "yes", "no", "1", "0", "t", "f", "y", "n"];

/// Returns true for a missing key, JSON `null`, or the empty string.
///
/// Whitespace-only strings are not empty.
pub fn is_empty_cell(cell: Option<&Value>) -> bool {
    match cell {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(_) => false,
    }
}

/// Renders a cell the way it would be displayed: strings verbatim, numbers in
/// shortest form (`1.0` becomes `1`), nested values as compact JSON.
pub fn cell_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::Null => Cow::Borrowed(""),
        Value::String(s) => Cow::Borrowed(s.as_str()),
        Value::Bool(true) => Cow::Borrowed("true"),
        Value::Bool(false) => Cow::Borrowed("false"),
        Value::Number(n) => Cow::Owned(format_number(n)),
        Value::Array(_) | Value::Object(_) => Cow::Owned(value.to_string()),
    }
}

/// Identity key for distinct-value counting. The string `"1"` and the number
/// `1` are different values.
pub fn value_key(value: &Value) -> String {
    value.to_string()
}

fn format_number(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map_or_else(|| n.to_string(), format_float)
    }
}

/// Shortest round-trip rendering of a float (`100` rather than `100.0`).
pub fn format_float(x: f64) -> String {
    format!("{x}")
}

/// Lenient prefix parse: skips leading whitespace and reads the longest valid
/// decimal literal, ignoring trailing garbage (`"12kg"` is 12).
///
/// `Infinity` is accepted here and rejected later by [`parse_finite`].
pub fn parse_float(text: &str) -> Option<f64> {
    let s = text.trim_start();
    let bytes = s.as_bytes();

    let mut end = usize::from(matches!(bytes.first(), Some(b'+' | b'-')));
    if s.get(end..).is_some_and(|rest| rest.starts_with("Infinity")) {
        return Some(if s.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        });
    }

    let int_start = end;
    while bytes.get(end).is_some_and(u8::is_ascii_digit) {
        end += 1;
    }
    let mut digits = end - int_start;

    if bytes.get(end) == Some(&b'.') {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while bytes.get(frac_end).is_some_and(u8::is_ascii_digit) {
            frac_end += 1;
        }
        if digits + (frac_end - frac_start) > 0 {
            digits += frac_end - frac_start;
            end = frac_end;
        }
    }

    if digits == 0 {
        return None;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while bytes.get(exp_end).is_some_and(u8::is_ascii_digit) {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s.get(..end)?.parse::<f64>().ok()
}

/// Parses a cell to a finite float. JSON numbers parse to themselves,
/// strings go through [`parse_float`], everything else fails.
pub fn parse_finite(value: &Value) -> Option<f64> {
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => parse_float(s),
        _ => None,
    };
    parsed.filter(|v| v.is_finite())
}

/// Numeric test used by type inference: the lenient prefix parse must succeed
/// and the whole (trimmed) text must itself be a finite number, so `"12kg"`
/// and `"2024-01-15"` are not numeric even though they have numeric prefixes.
pub fn is_numeric_cell(value: &Value) -> bool {
    match value {
        Value::Number(n) => n.as_f64().is_some_and(f64::is_finite),
        Value::String(s) => {
            parse_float(s).is_some() && s.trim().parse::<f64>().is_ok_and(f64::is_finite)
        }
        _ => false,
    }
}

/// True when the text starts like `YYYY-MM-DD` or `M/D/YY[YY]`.
fn is_date_shaped(text: &str) -> bool {
    ISO_DATE.is_match(text) || US_DATE.is_match(text)
}

/// Parses date-shaped text, optionally followed by a time of day and zone
/// suffix. The time may be 24-hour or carry an `AM`/`PM` marker. The zone is
/// ignored and wall-clock time is kept.
///
/// Bare numbers and timestamps never parse: the text must carry a date shape
/// and the calendar date must exist.
pub fn parse_date(text: &str) -> Option<NaiveDateTime> {
    if !is_date_shaped(text) {
        return None;
    }
    let (date, rest) = if let Some(caps) = ISO_DATE.captures(text) {
        let year = caps.get(1)?.as_str().parse().ok()?;
        let month = caps.get(2)?.as_str().parse().ok()?;
        let day = caps.get(3)?.as_str().parse().ok()?;
        (
            NaiveDate::from_ymd_opt(year, month, day)?,
            text.get(caps.get(0)?.end()..)?,
        )
    } else if let Some(caps) = US_DATE.captures(text) {
        let month = caps.get(1)?.as_str().parse().ok()?;
        let day = caps.get(2)?.as_str().parse().ok()?;
        let year_text = caps.get(3)?.as_str();
        let mut year: i32 = year_text.parse().ok()?;
        if year_text.len() == 2 {
            year += if year < 50 { 2000 } else { 1900 };
        }
        (
            NaiveDate::from_ymd_opt(year, month, day)?,
            text.get(caps.get(0)?.end()..)?,
        )
    } else {
        return None;
    };

    Some(date.and_time(parse_time_suffix(rest)?))
}

fn parse_time_suffix(rest: &str) -> Option<NaiveTime> {
    if rest.is_empty() {
        return NaiveTime::from_hms_opt(0, 0, 0);
    }
    let caps = TIME_SUFFIX.captures(rest)?;
    let mut hour: u32 = caps.get(1)?.as_str().parse().ok()?;
    if let Some(meridiem) = caps.get(5) {
        if !(1..=12).contains(&hour) {
            return None;
        }
        hour %= 12;
        if meridiem.as_str().eq_ignore_ascii_case("pm") {
            hour += 12;
        }
    }
    let minute = caps.get(2)?.as_str().parse().ok()?;
    let second = caps.get(3).map_or(Some(0), |m| m.as_str().parse().ok())?;
    let nanos = match caps.get(4) {
        Some(frac) => format!("{:0<9}", frac.as_str()).parse().ok()?,
        None => 0,
    };
    NaiveTime::from_hms_nano_opt(hour, minute, second, nanos)
}

/// Parses a cell as a date via its text form.
pub fn parse_date_cell(value: &Value) -> Option<NaiveDateTime> {
    match value {
        Value::String(s) => parse_date(s),
        _ => None,
    }
}

/// JSON booleans, or text matching one of the common boolean spellings
/// case-insensitively.
pub fn is_boolean_literal(value: &Value) -> bool {
    match value {
        Value::Bool(_) => true,
        Value::Null | Value::Array(_) | Value::Object(_) => false,
        Value::String(_) | Value::Number(_) => {
            let text = cell_text(value).to_lowercase();
            BOOLEAN_LITERALS.contains(&text.as_str())
        }
    }
}

/// Rounds half toward positive infinity at the given number of decimals.
pub fn round_half_up(x: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (x * factor + 0.5).floor() / factor
}

/// `part / whole` as a percentage, zero when `whole` is zero.
pub fn percentage(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_cells() {
        assert!(is_empty_cell(None));
        assert!(is_empty_cell(Some(&Value::Null)));
        assert!(is_empty_cell(Some(&json!(""))));
        assert!(!is_empty_cell(Some(&json!(" "))));
        assert!(!is_empty_cell(Some(&json!(0))));
        assert!(!is_empty_cell(Some(&json!(false))));
    }

    #[test]
    fn test_parse_float_prefix_semantics() {
        assert_eq!(parse_float("42"), Some(42.0));
        assert_eq!(parse_float("  -3.5"), Some(-3.5));
        assert_eq!(parse_float("12kg"), Some(12.0));
        assert_eq!(parse_float("1e3"), Some(1000.0));
        assert_eq!(parse_float("1e"), Some(1.0));
        assert_eq!(parse_float(".5"), Some(0.5));
        assert_eq!(parse_float("5."), Some(5.0));
        assert_eq!(parse_float("0x10"), Some(0.0));
        assert_eq!(parse_float("abc"), None);
        assert_eq!(parse_float("."), None);
        assert_eq!(parse_float(""), None);
        assert_eq!(parse_float("$5"), None);
        assert_eq!(parse_float("-Infinity"), Some(f64::NEG_INFINITY));
    }

    #[test]
    fn test_parse_finite_by_value_kind() {
        assert_eq!(parse_finite(&json!(7)), Some(7.0));
        assert_eq!(parse_finite(&json!("2.25")), Some(2.25));
        assert_eq!(parse_finite(&json!("Infinity")), None);
        assert_eq!(parse_finite(&json!(true)), None);
        assert_eq!(parse_finite(&Value::Null), None);
    }

    #[test]
    fn test_numeric_cell_requires_whole_value() {
        assert!(is_numeric_cell(&json!(3)));
        assert!(is_numeric_cell(&json!("1e3")));
        assert!(is_numeric_cell(&json!(" 42 ")));
        assert!(is_numeric_cell(&json!("-0.5")));
        assert!(!is_numeric_cell(&json!("12kg")));
        assert!(!is_numeric_cell(&json!("2024-01-15")));
        assert!(!is_numeric_cell(&json!("1/2/2024")));
        assert!(!is_numeric_cell(&json!("Infinity")));
        assert!(!is_numeric_cell(&json!("inf")));
        assert!(!is_numeric_cell(&json!(true)));
    }

    #[test]
    fn test_cell_text_numbers_are_shortest_form() {
        assert_eq!(cell_text(&json!(1.0)), "1");
        assert_eq!(cell_text(&json!(2.5)), "2.5");
        assert_eq!(cell_text(&json!(-4)), "-4");
        assert_eq!(cell_text(&json!(true)), "true");
    }

    #[test]
    fn test_date_shapes() {
        assert!(is_date_shaped("2024-01-15"));
        assert!(is_date_shaped("1/5/24"));
        assert!(is_date_shaped("12/31/2023"));
        assert!(!is_date_shaped("20240115"));
        assert!(!is_date_shaped("Jan 5 2024"));
    }

    #[test]
    fn test_parse_date_variants() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
            .and_then(|d| d.and_hms_opt(0, 0, 0))
            .expect("valid date");
        assert_eq!(parse_date("2024-01-15"), Some(expected));
        assert_eq!(parse_date("1/15/2024"), Some(expected));
        assert_eq!(parse_date("1/15/24"), Some(expected));

        let with_time = parse_date("2024-01-15T10:30:15.250Z").expect("timestamp parses");
        assert_eq!(with_time.format("%H:%M:%S%.3f").to_string(), "10:30:15.250");

        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date("2024-01-15 25:00"), None);
        assert_eq!(parse_date("2024-01-15abc"), None);
        assert_eq!(parse_date("1705276800"), None);
        assert_eq!(
            parse_date("3/4/75").map(|d| d.format("%Y").to_string()),
            Some("1975".to_owned())
        );
    }

    #[test]
    fn test_parse_date_twelve_hour_clock() {
        let at = |text: &str| parse_date(text).map(|d| d.format("%Y-%m-%d %H:%M:%S").to_string());
        assert_eq!(at("1/15/2024 10:30 AM"), Some("2024-01-15 10:30:00".to_owned()));
        assert_eq!(at("1/15/2024 9:05:07 pm"), Some("2024-01-15 21:05:07".to_owned()));
        assert_eq!(at("1/15/2024 12:00 AM"), Some("2024-01-15 00:00:00".to_owned()));
        assert_eq!(at("1/15/2024 12:45PM"), Some("2024-01-15 12:45:00".to_owned()));
        assert_eq!(at("2024-01-15 7:30 PM"), Some("2024-01-15 19:30:00".to_owned()));
        assert_eq!(at("1/15/2024 13:30 PM"), None);
        assert_eq!(at("1/15/2024 0:30 AM"), None);
        assert_eq!(at("1/15/2024 10:30 XM"), None);
    }

    #[test]
    fn test_boolean_literals() {
        for v in [json!(true), json!("Yes"), json!("N"), json!(1), json!("0"), json!("FALSE")] {
            assert!(is_boolean_literal(&v), "{v} should be boolean");
        }
        for v in [json!("maybe"), json!(2), json!("on"), Value::Null] {
            assert!(!is_boolean_literal(&v), "{v} should not be boolean");
        }
    }

    #[test]
    fn test_round_half_up() {
        assert_eq!(round_half_up(2.125, 2), 2.13);
        assert_eq!(round_half_up(12.25, 1), 12.3);
        assert_eq!(round_half_up(-2.5, 0), -2.0);
        assert_eq!(round_half_up(77.5, 0), 78.0);
    }
}
