//! Dynamic field values exchanged between records and generated controls.
//!
//! A record field is read into a [`FieldValue`] for display and written back
//! from one when a control changes. [`FieldType`] is the typed bridge: it is
//! implemented for every Rust type a record field may have and performs the
//! lenient conversions a form needs (text into numbers, integers into
//! decimals, blank into "cleared").

use core::fmt;
use core::str::FromStr;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Broad class of a field's declared Rust type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueClass {
    Bool,
    Integer,
    Decimal,
    Float,
    Date,
    DateTime,
    Text,
}

impl ValueClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Bool => "bool",
            Self::Integer => "integer",
            Self::Decimal => "decimal",
            Self::Float => "float",
            Self::Date => "date",
            Self::DateTime => "datetime",
            Self::Text => "text",
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, Self::Integer | Self::Decimal | Self::Float)
    }

    pub fn is_temporal(&self) -> bool {
        matches!(self, Self::Date | Self::DateTime)
    }
}

impl fmt::Display for ValueClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared type of a record field: its class plus whether it is optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValueType {
    pub class: ValueClass,
    pub nullable: bool,
}

impl ValueType {
    pub const fn required(class: ValueClass) -> Self {
        Self {
            class,
            nullable: false,
        }
    }

    pub const fn nullable(self) -> Self {
        Self {
            class: self.class,
            nullable: true,
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Amount
// ─────────────────────────────────────────────────────────────────────────────

/// Fixed-point decimal with two fractional digits, stored in minor units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Minor units per major unit.
    pub const SCALE: i64 = 100;
    pub const ZERO: Self = Self(0);

    pub const fn from_minor(minor: i64) -> Self {
        Self(minor)
    }

    pub fn from_major(major: i64) -> Option<Self> {
        major.checked_mul(Self::SCALE).map(Self)
    }

    pub fn from_f64(value: f64) -> Option<Self> {
        if !value.is_finite() {
            return None;
        }
        let minor = (value * Self::SCALE as f64).round();
        if minor < i64::MIN as f64 || minor > i64::MAX as f64 {
            return None;
        }
        Some(Self(minor as i64))
    }

    pub const fn minor(self) -> i64 {
        self.0
    }

    pub fn to_f64(self) -> f64 {
        self.0 as f64 / Self::SCALE as f64
    }

    /// Rounds half away from zero to a whole major unit.
    pub fn round_to_major(self) -> i64 {
        let half = Self::SCALE / 2;
        if self.0 >= 0 {
            (self.0 + half) / Self::SCALE
        } else {
            (self.0 - half) / Self::SCALE
        }
    }

    pub fn is_whole(self) -> bool {
        self.0 % Self::SCALE == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    pub fn checked_sub(self, other: Self) -> Option<Self> {
        self.0.checked_sub(other.0).map(Self)
    }

    pub fn checked_mul_int(self, factor: i64) -> Option<Self> {
        self.0.checked_mul(factor).map(Self)
    }

    /// Saturating sum, used for document totals.
    pub fn sum<I: IntoIterator<Item = Amount>>(iter: I) -> Self {
        Self(iter.into_iter().fold(0i64, |acc, a| acc.saturating_add(a.0)))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let scale = Self::SCALE as u64;
        write!(f, "{sign}{}.{:02}", abs / scale, abs % scale)
    }
}

impl FromStr for Amount {
    type Err = ValueError;

    /// Parses `12`, `12.5`, `-3.05`; extra fractional digits round half up.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parse_err = || ValueError::Parse {
            expected: ValueClass::Decimal,
            input: s.to_string(),
        };

        let trimmed = s.trim().replace(',', "");
        let (negative, digits) = match trimmed.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, trimmed.as_str()),
        };

        let (whole, frac) = match digits.split_once('.') {
            Some((w, f)) => (w, f),
            None => (digits, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(parse_err());
        }
        if !whole.chars().all(|c| c.is_ascii_digit()) || !frac.chars().all(|c| c.is_ascii_digit()) {
            return Err(parse_err());
        }

        let whole: i64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| parse_err())?
        };

        let mut frac_digits: Vec<u32> = frac.chars().filter_map(|c| c.to_digit(10)).collect();
        let round_up = frac_digits.get(2).is_some_and(|d| *d >= 5);
        frac_digits.resize(2, 0);
        let mut cents = i64::from(frac_digits[0] * 10 + frac_digits[1]);
        if round_up {
            cents += 1;
        }

        let minor = whole
            .checked_mul(Self::SCALE)
            .and_then(|m| m.checked_add(cents))
            .ok_or(ValueError::OutOfRange {
                expected: ValueClass::Decimal,
            })?;

        Ok(Self(if negative { -minor } else { minor }))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// FieldValue
// ─────────────────────────────────────────────────────────────────────────────

/// A field value detached from its record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum FieldValue {
    Empty,
    Bool(bool),
    Integer(i64),
    Decimal(Amount),
    Float(f64),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
    Text(String),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    /// `Empty` or whitespace-only text.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Empty => "empty",
            Self::Bool(_) => "bool",
            Self::Integer(_) => "integer",
            Self::Decimal(_) => "decimal",
            Self::Float(_) => "float",
            Self::Date(_) => "date",
            Self::DateTime(_) => "datetime",
            Self::Text(_) => "text",
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Numeric view used by range validation and number formatting.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Integer(i) => Some(*i as f64),
            Self::Decimal(a) => Some(a.to_f64()),
            Self::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s.as_str()),
            _ => None,
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => Ok(()),
            Self::Bool(b) => write!(f, "{b}"),
            Self::Integer(i) => write!(f, "{i}"),
            Self::Decimal(a) => write!(f, "{a}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Self::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        Self::Integer(value)
    }
}

impl From<Amount> for FieldValue {
    fn from(value: Amount) -> Self {
        Self::Decimal(value)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Conversion errors
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValueError {
    #[error("cannot assign a {found} value to a {expected} field")]
    Mismatch {
        expected: ValueClass,
        found: &'static str,
    },

    #[error("cannot parse '{input}' as {expected}")]
    Parse { expected: ValueClass, input: String },

    #[error("value out of range for a {expected} field")]
    OutOfRange { expected: ValueClass },
}

// ─────────────────────────────────────────────────────────────────────────────
// FieldType
// ─────────────────────────────────────────────────────────────────────────────

/// Rust types usable as record fields.
pub trait FieldType: Sized {
    const VALUE_TYPE: ValueType;

    fn to_value(&self) -> FieldValue;

    /// Convert an incoming control value, coercing where a form would.
    fn from_value(value: FieldValue) -> Result<Self, ValueError>;
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%d %b %Y", "%d/%m/%Y", "%d-%m-%Y"];
const DATETIME_FORMATS: [&str; 3] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M"];

fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(input, fmt).ok())
}

fn parse_datetime(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| parse_date(input).and_then(|d| d.and_hms_opt(0, 0, 0)))
}

fn to_i64(value: FieldValue) -> Result<i64, ValueError> {
    let expected = ValueClass::Integer;
    match value {
        FieldValue::Empty => Ok(0),
        FieldValue::Integer(i) => Ok(i),
        FieldValue::Bool(b) => Ok(i64::from(b)),
        FieldValue::Decimal(a) => Ok(a.round_to_major()),
        FieldValue::Float(f) => {
            let rounded = f.round();
            if !rounded.is_finite() || rounded < i64::MIN as f64 || rounded > i64::MAX as f64 {
                Err(ValueError::OutOfRange { expected })
            } else {
                Ok(rounded as i64)
            }
        }
        FieldValue::Text(s) if s.trim().is_empty() => Ok(0),
        FieldValue::Text(s) => s
            .trim()
            .replace(',', "")
            .parse::<i64>()
            .map_err(|_| ValueError::Parse { expected, input: s }),
        other => Err(ValueError::Mismatch {
            expected,
            found: other.kind_name(),
        }),
    }
}

impl FieldType for bool {
    const VALUE_TYPE: ValueType = ValueType::required(ValueClass::Bool);

    fn to_value(&self) -> FieldValue {
        FieldValue::Bool(*self)
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        let expected = ValueClass::Bool;
        match value {
            FieldValue::Empty => Ok(false),
            FieldValue::Bool(b) => Ok(b),
            FieldValue::Integer(i) => Ok(i != 0),
            FieldValue::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "" | "false" | "0" | "no" | "off" => Ok(false),
                "true" | "1" | "yes" | "on" => Ok(true),
                _ => Err(ValueError::Parse { expected, input: s }),
            },
            other => Err(ValueError::Mismatch {
                expected,
                found: other.kind_name(),
            }),
        }
    }
}

impl FieldType for i64 {
    const VALUE_TYPE: ValueType = ValueType::required(ValueClass::Integer);

    fn to_value(&self) -> FieldValue {
        FieldValue::Integer(*self)
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        to_i64(value)
    }
}

impl FieldType for i32 {
    const VALUE_TYPE: ValueType = ValueType::required(ValueClass::Integer);

    fn to_value(&self) -> FieldValue {
        FieldValue::Integer(i64::from(*self))
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        let wide = to_i64(value)?;
        i32::try_from(wide).map_err(|_| ValueError::OutOfRange {
            expected: ValueClass::Integer,
        })
    }
}

impl FieldType for u32 {
    const VALUE_TYPE: ValueType = ValueType::required(ValueClass::Integer);

    fn to_value(&self) -> FieldValue {
        FieldValue::Integer(i64::from(*self))
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        let wide = to_i64(value)?;
        u32::try_from(wide).map_err(|_| ValueError::OutOfRange {
            expected: ValueClass::Integer,
        })
    }
}

impl FieldType for Amount {
    const VALUE_TYPE: ValueType = ValueType::required(ValueClass::Decimal);

    fn to_value(&self) -> FieldValue {
        FieldValue::Decimal(*self)
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        let expected = ValueClass::Decimal;
        match value {
            FieldValue::Empty => Ok(Amount::ZERO),
            FieldValue::Decimal(a) => Ok(a),
            FieldValue::Integer(i) => Amount::from_major(i).ok_or(ValueError::OutOfRange { expected }),
            FieldValue::Float(f) => Amount::from_f64(f).ok_or(ValueError::OutOfRange { expected }),
            FieldValue::Text(s) if s.trim().is_empty() => Ok(Amount::ZERO),
            FieldValue::Text(s) => s.parse(),
            other => Err(ValueError::Mismatch {
                expected,
                found: other.kind_name(),
            }),
        }
    }
}

impl FieldType for f64 {
    const VALUE_TYPE: ValueType = ValueType::required(ValueClass::Float);

    fn to_value(&self) -> FieldValue {
        FieldValue::Float(*self)
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        let expected = ValueClass::Float;
        match value {
            FieldValue::Empty => Ok(0.0),
            FieldValue::Float(f) => Ok(f),
            FieldValue::Integer(i) => Ok(i as f64),
            FieldValue::Decimal(a) => Ok(a.to_f64()),
            FieldValue::Text(s) if s.trim().is_empty() => Ok(0.0),
            FieldValue::Text(s) => s
                .trim()
                .replace(',', "")
                .parse::<f64>()
                .map_err(|_| ValueError::Parse { expected, input: s }),
            other => Err(ValueError::Mismatch {
                expected,
                found: other.kind_name(),
            }),
        }
    }
}

impl FieldType for NaiveDate {
    const VALUE_TYPE: ValueType = ValueType::required(ValueClass::Date);

    fn to_value(&self) -> FieldValue {
        FieldValue::Date(*self)
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        let expected = ValueClass::Date;
        match value {
            FieldValue::Empty => Ok(NaiveDate::default()),
            FieldValue::Date(d) => Ok(d),
            FieldValue::DateTime(dt) => Ok(dt.date()),
            FieldValue::Text(s) => parse_date(&s).ok_or(ValueError::Parse { expected, input: s }),
            other => Err(ValueError::Mismatch {
                expected,
                found: other.kind_name(),
            }),
        }
    }
}

impl FieldType for NaiveDateTime {
    const VALUE_TYPE: ValueType = ValueType::required(ValueClass::DateTime);

    fn to_value(&self) -> FieldValue {
        FieldValue::DateTime(*self)
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        let expected = ValueClass::DateTime;
        match value {
            FieldValue::Empty => Ok(NaiveDateTime::default()),
            FieldValue::DateTime(dt) => Ok(dt),
            FieldValue::Date(d) => d
                .and_hms_opt(0, 0, 0)
                .ok_or(ValueError::OutOfRange { expected }),
            FieldValue::Text(s) => {
                parse_datetime(&s).ok_or(ValueError::Parse { expected, input: s })
            }
            other => Err(ValueError::Mismatch {
                expected,
                found: other.kind_name(),
            }),
        }
    }
}

impl FieldType for String {
    const VALUE_TYPE: ValueType = ValueType::required(ValueClass::Text);

    fn to_value(&self) -> FieldValue {
        FieldValue::Text(self.clone())
    }

    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        Ok(match value {
            FieldValue::Text(s) => s,
            other => other.to_string(),
        })
    }
}

macro_rules! impl_id_field {
    ($($t:ty),+ $(,)?) => {
        $(
            impl FieldType for $t {
                const VALUE_TYPE: ValueType = ValueType::required(ValueClass::Integer);

                fn to_value(&self) -> FieldValue {
                    FieldValue::Integer(i64::from(self.get()))
                }

                fn from_value(value: FieldValue) -> Result<Self, ValueError> {
                    i32::from_value(value).map(<$t>::new)
                }
            }
        )+
    };
}

impl_id_field!(
    transerp_core::RecordId,
    transerp_core::UserId,
    transerp_core::MenuId,
    transerp_core::RightsId,
);

impl<T: FieldType> FieldType for Option<T> {
    const VALUE_TYPE: ValueType = T::VALUE_TYPE.nullable();

    fn to_value(&self) -> FieldValue {
        match self {
            Some(inner) => inner.to_value(),
            None => FieldValue::Empty,
        }
    }

    /// `Empty` clears. Blank text clears too, except for text fields where
    /// it is a value of its own.
    fn from_value(value: FieldValue) -> Result<Self, ValueError> {
        match value {
            FieldValue::Empty => Ok(None),
            FieldValue::Text(s) if s.trim().is_empty() && T::VALUE_TYPE.class != ValueClass::Text => {
                Ok(None)
            }
            other => T::from_value(other).map(Some),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn amount_parses_and_displays_two_places() {
        assert_eq!("12".parse::<Amount>().unwrap(), Amount::from_minor(1200));
        assert_eq!("12.5".parse::<Amount>().unwrap(), Amount::from_minor(1250));
        assert_eq!("-3.05".parse::<Amount>().unwrap(), Amount::from_minor(-305));
        assert_eq!("1,000.005".parse::<Amount>().unwrap(), Amount::from_minor(100_001));
        assert_eq!(Amount::from_minor(-305).to_string(), "-3.05");
        assert_eq!(Amount::from_minor(7).to_string(), "0.07");
        assert!("12.x".parse::<Amount>().is_err());
        assert!("".parse::<Amount>().is_err());
    }

    #[test]
    fn integers_accept_text_and_reject_garbage() {
        assert_eq!(i32::from_value(FieldValue::text(" 2024 ")).unwrap(), 2024);
        assert_eq!(i32::from_value(FieldValue::Empty).unwrap(), 0);
        assert_eq!(i32::from_value(FieldValue::Decimal(Amount::from_minor(250))).unwrap(), 3);
        assert!(matches!(
            i32::from_value(FieldValue::text("twelve")),
            Err(ValueError::Parse { .. })
        ));
        assert!(matches!(
            i32::from_value(FieldValue::Integer(i64::MAX)),
            Err(ValueError::OutOfRange { .. })
        ));
    }

    #[test]
    fn decimals_widen_from_integers() {
        assert_eq!(
            Amount::from_value(FieldValue::Integer(4)).unwrap(),
            Amount::from_minor(400)
        );
        assert_eq!(f64::from_value(FieldValue::Decimal(Amount::from_minor(150))).unwrap(), 1.5);
    }

    #[test]
    fn optional_fields_clear_on_empty_input() {
        assert_eq!(Option::<String>::from_value(FieldValue::Empty).unwrap(), None);
        assert_eq!(
            Option::<String>::from_value(FieldValue::text("  ")).unwrap(),
            Some("  ".to_string())
        );
        assert_eq!(Option::<NaiveDate>::from_value(FieldValue::text(" ")).unwrap(), None);
        assert_eq!(Option::<i32>::from_value(FieldValue::Empty).unwrap(), None);
        assert_eq!(Option::<i32>::from_value(FieldValue::text("5")).unwrap(), Some(5));
        assert!(<Option<i32> as FieldType>::VALUE_TYPE.nullable);
    }

    #[test]
    fn dates_parse_common_layouts() {
        let expected = NaiveDate::from_ymd_opt(2025, 3, 14).unwrap();
        for input in ["2025-03-14", "14 Mar 2025", "14/03/2025"] {
            assert_eq!(NaiveDate::from_value(FieldValue::text(input)).unwrap(), expected);
        }
        let dt = NaiveDateTime::from_value(FieldValue::Date(expected)).unwrap();
        assert_eq!(dt.date(), expected);
    }

    #[test]
    fn bools_accept_checkbox_style_text() {
        assert!(bool::from_value(FieldValue::text("on")).unwrap());
        assert!(!bool::from_value(FieldValue::text("0")).unwrap());
        assert!(bool::from_value(FieldValue::Float(1.0)).is_err());
    }

    #[test]
    fn field_value_serializes_with_tag() {
        let json = serde_json::to_value(FieldValue::Integer(3)).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "integer", "value": 3 }));
    }
}
