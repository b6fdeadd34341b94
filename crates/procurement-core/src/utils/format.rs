//! Indonesian-locale formatting for amounts and dates.

use chrono::{DateTime, Locale, NaiveDate, NaiveDateTime, TimeZone, Utc};

/// Rupiah symbol, written directly before the digits
const CURRENCY_PREFIX: &str = "Rp";

/// Indonesian digit grouping separator
const THOUSANDS_SEPARATOR: char = '.';

/// Text rendered for a date that cannot be parsed
pub const INVALID_DATE: &str = "Invalid Date";

/// Day, full month name, year: "14 Maret 2024"
const LONG_DATE_FORMAT: &str = "%-d %B %Y";

/// Format an amount as Indonesian Rupiah with no fractional digits.
///
/// Rounds half away from zero and groups thousands with dots:
/// `15000.0` becomes `Rp15.000`, `-2500.5` becomes `-Rp2.501`.
pub fn format_currency(amount: f64) -> String {
    if amount.is_nan() {
        return format!("{}NaN", CURRENCY_PREFIX);
    }

    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };

    if rounded.is_infinite() {
        return format!("{}{}∞", sign, CURRENCY_PREFIX);
    }

    let digits = format!("{:.0}", rounded.abs());
    format!("{}{}{}", sign, CURRENCY_PREFIX, group_thousands(&digits))
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(THOUSANDS_SEPARATOR);
        }
        out.push(c);
    }
    out
}

/// Format a date string as a long Indonesian date, e.g. "14 Maret 2024".
///
/// Accepts `YYYY-MM-DD`, RFC 3339 timestamps (the calendar day is taken in
/// the timestamp's own offset), and naive `YYYY-MM-DDTHH:MM:SS` timestamps.
/// Anything else renders as "Invalid Date".
pub fn format_date(date: &str) -> String {
    parse_calendar_day(date.trim())
        .and_then(|day| day.and_hms_opt(0, 0, 0))
        .map(|midnight| {
            Utc.from_utc_datetime(&midnight)
                .format_localized(LONG_DATE_FORMAT, Locale::id_ID)
                .to_string()
        })
        .unwrap_or_else(|| INVALID_DATE.to_string())
}

fn parse_calendar_day(date: &str) -> Option<NaiveDate> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(date) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}

/// Truncate a string to a maximum length, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_currency() {
        assert_eq!(format_currency(15000.0), "Rp15.000");
        assert_eq!(format_currency(0.0), "Rp0");
        assert_eq!(format_currency(999.0), "Rp999");
        assert_eq!(format_currency(1000.0), "Rp1.000");
        assert_eq!(format_currency(1_250_000.0), "Rp1.250.000");
        assert_eq!(format_currency(123_456_789.0), "Rp123.456.789");
    }

    #[test]
    fn test_format_currency_rounding_and_sign() {
        assert_eq!(format_currency(1499.4), "Rp1.499");
        assert_eq!(format_currency(1499.5), "Rp1.500");
        assert_eq!(format_currency(-2500.5), "-Rp2.501");
        assert_eq!(format_currency(-0.4), "Rp0");
    }

    #[test]
    fn test_format_currency_non_finite() {
        assert_eq!(format_currency(f64::NAN), "RpNaN");
        assert_eq!(format_currency(f64::INFINITY), "Rp∞");
        assert_eq!(format_currency(f64::NEG_INFINITY), "-Rp∞");
    }

    #[test]
    fn test_format_date() {
        assert_eq!(format_date("2024-03-14"), "14 Maret 2024");
        assert_eq!(format_date("2024-01-01"), "1 Januari 2024");
        assert_eq!(format_date("2023-08-17"), "17 Agustus 2023");
        assert_eq!(format_date("2024-12-31"), "31 Desember 2024");
    }

    #[test]
    fn test_format_date_timestamps() {
        assert_eq!(format_date("2024-05-02T23:30:00+07:00"), "2 Mei 2024");
        assert_eq!(format_date("2024-02-29T10:00:00.123456Z"), "29 Februari 2024");
        assert_eq!(format_date("2024-06-10T08:00:00"), "10 Juni 2024");
    }

    #[test]
    fn test_format_date_invalid() {
        assert_eq!(format_date("not a date"), INVALID_DATE);
        assert_eq!(format_date("2024-02-30"), INVALID_DATE);
        assert_eq!(format_date(""), INVALID_DATE);
    }

    #[test]
    fn test_truncate_string() {
        assert_eq!(truncate_string("Kertas", 10), "Kertas");
        assert_eq!(truncate_string("PT Sumber Makmur Abadi", 10), "PT Sumb...");
        assert_eq!(truncate_string("Hi", 2), "Hi");
        assert_eq!(truncate_string("Hello", 3), "Hel");
    }
}
