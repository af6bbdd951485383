//! Display formatting of field values.
//!
//! Format strings use the familiar .NET shapes stored in field configuration:
//! `N0`/`N2` (grouped number), `F2` (fixed, ungrouped), `C2` (currency) and
//! custom date patterns such as `dd MMM yyyy`.

use chrono::{NaiveDate, NaiveDateTime};

use transerp_metadata::FieldValue;

pub const DEFAULT_NUMBER_FORMAT: &str = "N2";
pub const DEFAULT_DATE_FORMAT: &str = "dd MMM yyyy";
pub const DEFAULT_DATE_TIME_FORMAT: &str = "dd MMM yyyy HH:mm";
pub const CURRENCY_SYMBOL: &str = "₹";

/// Render `value` for a grid cell.
pub fn format_value(value: &FieldValue, format: Option<&str>) -> String {
    match value {
        FieldValue::Empty => String::new(),
        FieldValue::Date(date) => format_date(*date, format.unwrap_or(DEFAULT_DATE_FORMAT)),
        FieldValue::DateTime(at) => format_date_time(*at, format.unwrap_or(DEFAULT_DATE_TIME_FORMAT)),
        other => match (other.as_f64(), format.and_then(NumberFormat::parse)) {
            (Some(number), Some(number_format)) => number_format.apply(number),
            _ => other.to_string(),
        },
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum NumberStyle {
    Grouped,
    Fixed,
    Currency,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NumberFormat {
    style: NumberStyle,
    decimals: usize,
}

impl NumberFormat {
    fn parse(format: &str) -> Option<Self> {
        let mut chars = format.chars();
        let style = match chars.next()?.to_ascii_uppercase() {
            'N' => NumberStyle::Grouped,
            'F' => NumberStyle::Fixed,
            'C' => NumberStyle::Currency,
            _ => return None,
        };
        let rest = chars.as_str();
        let decimals = if rest.is_empty() { 2 } else { rest.parse().ok()? };
        Some(Self { style, decimals })
    }

    fn apply(self, number: f64) -> String {
        let grouped = !matches!(self.style, NumberStyle::Fixed);
        let body = format_number(number.abs(), self.decimals, grouped);
        let sign = if number < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
            "-"
        } else {
            ""
        };
        match self.style {
            NumberStyle::Currency => format!("{sign}{CURRENCY_SYMBOL}{body}"),
            _ => format!("{sign}{body}"),
        }
    }
}

fn format_number(value: f64, decimals: usize, grouped: bool) -> String {
    let fixed = format!("{value:.decimals$}");
    let (whole, fraction) = match fixed.split_once('.') {
        Some((w, f)) => (w, Some(f)),
        None => (fixed.as_str(), None),
    };

    let mut out = if grouped { group_thousands(whole) } else { whole.to_string() };
    if let Some(fraction) = fraction {
        out.push('.');
        out.push_str(fraction);
    }
    out
}

fn group_thousands(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn format_date(date: NaiveDate, pattern: &str) -> String {
    date.format(&to_strftime(pattern)).to_string()
}

pub fn format_date_time(at: NaiveDateTime, pattern: &str) -> String {
    at.format(&to_strftime(pattern)).to_string()
}

/// Translate a .NET custom date pattern into a chrono format string.
///
/// Unknown letters are copied through; single-quoted text is literal.
pub fn to_strftime(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];

        if c == '\'' {
            i += 1;
            while i < chars.len() && chars[i] != '\'' {
                push_literal(&mut out, chars[i]);
                i += 1;
            }
            i += 1;
            continue;
        }

        let mut run = 1;
        while i + run < chars.len() && chars[i + run] == c {
            run += 1;
        }

        let token = match (c, run) {
            ('y', 1..=2) => Some("%y"),
            ('y', _) => Some("%Y"),
            ('M', 1) => Some("%-m"),
            ('M', 2) => Some("%m"),
            ('M', 3) => Some("%b"),
            ('M', _) => Some("%B"),
            ('d', 1) => Some("%-d"),
            ('d', 2) => Some("%d"),
            ('d', 3) => Some("%a"),
            ('d', _) => Some("%A"),
            ('H', 1) => Some("%-H"),
            ('H', _) => Some("%H"),
            ('h', 1) => Some("%-I"),
            ('h', _) => Some("%I"),
            ('m', 1) => Some("%-M"),
            ('m', _) => Some("%M"),
            ('s', 1) => Some("%-S"),
            ('s', _) => Some("%S"),
            ('t', _) => Some("%p"),
            _ => None,
        };

        match token {
            Some(token) => out.push_str(token),
            None => (0..run).for_each(|_| push_literal(&mut out, c)),
        }
        i += run;
    }
    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use transerp_metadata::Amount;

    #[test]
    fn grouped_numbers() {
        assert_eq!(format_value(&FieldValue::Integer(1_234_567), Some("N0")), "1,234,567");
        assert_eq!(format_value(&FieldValue::Float(10.5), Some("N2")), "10.50");
        assert_eq!(format_value(&FieldValue::Float(-1234.5), Some("N2")), "-1,234.50");
        assert_eq!(format_value(&FieldValue::Float(999.0), Some("N0")), "999");
    }

    #[test]
    fn fixed_and_currency() {
        let amount = FieldValue::Decimal(Amount::from_minor(123_450));
        assert_eq!(format_value(&amount, Some("C2")), "₹1,234.50");
        assert_eq!(format_value(&amount, Some("F1")), "1234.5");
        assert_eq!(format_value(&FieldValue::Float(-0.001), Some("N2")), "0.00");
    }

    #[test]
    fn unknown_number_format_falls_back_to_display() {
        assert_eq!(format_value(&FieldValue::Integer(2020), Some("yyyy")), "2020");
        assert_eq!(format_value(&FieldValue::Integer(2020), None), "2020");
        assert_eq!(format_value(&FieldValue::text("MH12"), Some("N2")), "MH12");
        assert_eq!(format_value(&FieldValue::Empty, Some("N2")), "");
    }

    #[test]
    fn dotnet_date_patterns() {
        let date = NaiveDate::from_ymd_opt(2025, 3, 7).unwrap();
        assert_eq!(format_date(date, "dd MMM yyyy"), "07 Mar 2025");
        assert_eq!(format_date(date, "d/M/yy"), "7/3/25");
        assert_eq!(format_date(date, "yyyy-MM-dd"), "2025-03-07");
        assert_eq!(format_date(date, "dddd, MMMM d"), "Friday, March 7");
        assert_eq!(format_date(date, "'Day' dd"), "Day 07");

        let at = date.and_hms_opt(14, 5, 0).unwrap();
        assert_eq!(format_date_time(at, "dd/MM/yyyy hh:mm tt"), "07/03/2025 02:05 PM");
        assert_eq!(format_value(&FieldValue::DateTime(at), None), "07 Mar 2025 14:05");
        assert_eq!(format_value(&FieldValue::Date(date), None), "07 Mar 2025");
    }

    #[test]
    fn percent_is_escaped() {
        assert_eq!(to_strftime("dd%"), "%d%%");
    }
}
