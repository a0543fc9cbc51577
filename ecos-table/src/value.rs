use chrono::NaiveDate;
use ecos_utils::{dates, numbers};
use std::fmt;

/// A single table cell.
///
/// Cells start out as `Text` (or `Missing` when the row had no such field or
/// the field had no text) and may be coerced to `Date` or `Number`.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Missing,
    Text(String),
    Date(NaiveDate),
    Number(f64),
}

/// Target representation for [`Value::coerce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    /// `YYYYMM` text to the first day of that month.
    YearMonth,
    Numeric,
}

impl Value {
    /// Convert to the requested representation.
    ///
    /// Never fails: anything that cannot be represented becomes `Missing`.
    /// Coercing a value that already has the target type returns it as is.
    pub fn coerce(&self, to: Coercion) -> Value {
        match (self, to) {
            (Value::Date(d), Coercion::YearMonth) => Value::Date(*d),
            (Value::Number(n), Coercion::Numeric) => Value::Number(*n),
            (Value::Text(s), Coercion::YearMonth) => {
                dates::parse_year_month(s).map_or(Value::Missing, Value::Date)
            }
            (Value::Text(s), Coercion::Numeric) => {
                numbers::parse_number(s).map_or(Value::Missing, Value::Number)
            }
            _ => Value::Missing,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) => Some(*n),
            _ => None,
        }
    }
}

impl From<Option<&str>> for Value {
    fn from(text: Option<&str>) -> Self {
        match text {
            Some(s) => Value::Text(s.to_string()),
            None => Value::Missing,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing => Ok(()),
            Value::Text(s) => f.write_str(s),
            Value::Date(d) => f.write_str(&dates::format_date(d)),
            Value::Number(n) => write!(f, "{}", n),
        }
    }
}
