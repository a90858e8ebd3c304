//! Display formatting shared by the dashboard, wallet, history and profile views.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use crate::shared::constants::CURRENCY_SYMBOL;

/// `₱1,234.50` style label: currency symbol, thousands separators, two decimals
pub fn format_money(amount: Decimal) -> String {
    let rounded = format!("{:.2}", amount.round_dp(2));
    let (sign, digits) = match rounded.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", rounded.as_str()),
    };
    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, "00"));

    format!(
        "{}{}{}.{}",
        sign,
        CURRENCY_SYMBOL,
        group_thousands(whole),
        fraction
    )
}

fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Accepts `YYYY-MM-DD`, `MM/DD/YYYY` and `MM/DD/YY`
pub fn parse_flexible_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(date) = NaiveDate::parse_from_str(input, "%Y-%m-%d") {
        return Some(date);
    }

    let year_digits = input.rsplit('/').next().map(str::len).unwrap_or(0);
    let format = if year_digits == 2 { "%m/%d/%y" } else { "%m/%d/%Y" };
    NaiveDate::parse_from_str(input, format).ok()
}

pub fn iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// `MM/DD/YY`
pub fn short_date(date: NaiveDate) -> String {
    date.format("%m/%d/%y").to_string()
}

/// `MM/DD/YYYY`
pub fn long_date(date: NaiveDate) -> String {
    date.format("%m/%d/%Y").to_string()
}

/// `Jan 2025`
pub fn month_year(date: NaiveDate) -> String {
    date.format("%b %Y").to_string()
}

/// `14:05`
pub fn clock_time(at: DateTime<Utc>) -> String {
    at.format("%H:%M").to_string()
}

/// `Jan 05, 2025 09:30 AM`
pub fn card_datetime(at: DateTime<Utc>) -> String {
    at.format("%b %d, %Y %I:%M %p").to_string()
}

/// `2:05 PM`
pub fn message_time(at: DateTime<Utc>) -> String {
    at.format("%-I:%M %p").to_string()
}

pub fn distance_label(km: f64) -> String {
    format!("{:.1} km", km)
}

pub fn duration_label(minutes: i32) -> String {
    format!("{} mins", minutes)
}

/// Cuts `text` to `max_chars` characters and appends `...` when anything was dropped
pub fn truncate_chars(text: &str, max_chars: usize) -> String {
    if text.chars().count() <= max_chars {
        return text.to_string();
    }
    let mut cut: String = text.chars().take(max_chars).collect();
    cut.push_str("...");
    cut
}

/// Up to two uppercase initials taken from the first two words
pub fn initials(name: &str) -> String {
    let letters: String = name
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .take(2)
        .flat_map(char::to_uppercase)
        .collect();

    if letters.is_empty() {
        "?".to_string()
    } else {
        letters
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use std::str::FromStr;

    #[test]
    fn test_format_money_groups_thousands() {
        assert_eq!(format_money(Decimal::from_str("0").unwrap()), "₱0.00");
        assert_eq!(format_money(Decimal::from_str("450").unwrap()), "₱450.00");
        assert_eq!(format_money(Decimal::from_str("1500.5").unwrap()), "₱1,500.50");
        assert_eq!(
            format_money(Decimal::from_str("1234567.891").unwrap()),
            "₱1,234,567.89"
        );
        assert_eq!(format_money(Decimal::from_str("-999.99").unwrap()), "-₱999.99");
    }

    #[test]
    fn test_parse_flexible_date() {
        let expected = NaiveDate::from_ymd_opt(2027, 3, 9).unwrap();
        assert_eq!(parse_flexible_date("2027-03-09"), Some(expected));
        assert_eq!(parse_flexible_date("03/09/2027"), Some(expected));
        assert_eq!(parse_flexible_date("03/09/27"), Some(expected));
        assert_eq!(parse_flexible_date(" 2027-03-09 "), Some(expected));
        assert_eq!(parse_flexible_date(""), None);
        assert_eq!(parse_flexible_date("next tuesday"), None);
        assert_eq!(parse_flexible_date("13/40/2027"), None);
    }

    #[test]
    fn test_date_labels() {
        let date = NaiveDate::from_ymd_opt(2025, 1, 5).unwrap();
        assert_eq!(iso_date(date), "2025-01-05");
        assert_eq!(short_date(date), "01/05/25");
        assert_eq!(long_date(date), "01/05/2025");
        assert_eq!(month_year(date), "Jan 2025");

        let at = Utc.with_ymd_and_hms(2025, 1, 5, 14, 5, 0).unwrap();
        assert_eq!(clock_time(at), "14:05");
        assert_eq!(card_datetime(at), "Jan 05, 2025 02:05 PM");
        assert_eq!(message_time(at), "2:05 PM");
    }

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("short", 40), "short");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
        // multi-byte characters count as one
        assert_eq!(truncate_chars("ññññ", 2), "ññ...");
    }

    #[test]
    fn test_initials() {
        assert_eq!(initials("Maria Santos"), "MS");
        assert_eq!(initials("juan dela cruz"), "JD");
        assert_eq!(initials("Cher"), "C");
        assert_eq!(initials("   "), "?");
    }
}
