use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, TimeZone, Utc};

/// A value supplied for a placeholder.
#[derive(Debug, Clone, PartialEq)]
pub enum PlaceholderValue {
    String(String),
    Number(f64),
    Boolean(bool),
    BigInt(i128),
    Date(DateTime<Utc>),
}

impl PlaceholderValue {
    /// Numeric view used by `plural`, `selectordinal` and `number`.
    ///
    /// Strings are parsed, booleans are 1/0 and dates are epoch milliseconds.
    /// Anything that does not yield a finite number is 0.
    pub fn to_number(&self) -> f64 {
        let number = match self {
            PlaceholderValue::Number(n) => *n,
            PlaceholderValue::BigInt(n) => *n as f64,
            PlaceholderValue::Boolean(b) => {
                if *b {
                    1.0
                } else {
                    0.0
                }
            }
            PlaceholderValue::String(s) => s.trim().parse::<f64>().unwrap_or(0.0),
            PlaceholderValue::Date(date) => date.timestamp_millis() as f64,
        };
        if number.is_finite() { number } else { 0.0 }
    }

    /// Date view used by `date` and `time`. Numbers are epoch milliseconds,
    /// strings are RFC 3339; anything else is the Unix epoch.
    pub fn to_date(&self) -> DateTime<Utc> {
        match self {
            PlaceholderValue::Date(date) => *date,
            PlaceholderValue::Number(n) if n.is_finite() => from_millis(*n as i64),
            PlaceholderValue::BigInt(n) => i64::try_from(*n).map(from_millis).unwrap_or_else(|_| epoch()),
            PlaceholderValue::String(s) => DateTime::parse_from_rfc3339(s.trim())
                .map(|date| date.with_timezone(&Utc))
                .unwrap_or_else(|_| epoch()),
            _ => epoch(),
        }
    }
}

fn epoch() -> DateTime<Utc> {
    DateTime::<Utc>::default()
}

fn from_millis(millis: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(millis).single().unwrap_or_else(epoch)
}

impl fmt::Display for PlaceholderValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlaceholderValue::String(s) => f.write_str(s),
            PlaceholderValue::Number(n) if n.is_nan() => f.write_str("NaN"),
            PlaceholderValue::Number(n) if n.is_infinite() => {
                f.write_str(if *n > 0.0 { "Infinity" } else { "-Infinity" })
            }
            PlaceholderValue::Number(n) if *n == 0.0 => f.write_str("0"),
            PlaceholderValue::Number(n) => write!(f, "{}", n),
            PlaceholderValue::Boolean(b) => write!(f, "{}", b),
            PlaceholderValue::BigInt(n) => write!(f, "{}", n),
            PlaceholderValue::Date(date) => write!(f, "{}", date.to_rfc3339()),
        }
    }
}

impl From<&str> for PlaceholderValue {
    fn from(value: &str) -> Self {
        PlaceholderValue::String(value.to_string())
    }
}

impl From<String> for PlaceholderValue {
    fn from(value: String) -> Self {
        PlaceholderValue::String(value)
    }
}

impl From<bool> for PlaceholderValue {
    fn from(value: bool) -> Self {
        PlaceholderValue::Boolean(value)
    }
}

impl From<i128> for PlaceholderValue {
    fn from(value: i128) -> Self {
        PlaceholderValue::BigInt(value)
    }
}

impl From<DateTime<Utc>> for PlaceholderValue {
    fn from(value: DateTime<Utc>) -> Self {
        PlaceholderValue::Date(value)
    }
}

macro_rules! number_from {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for PlaceholderValue {
                fn from(value: $ty) -> Self {
                    PlaceholderValue::Number(value as f64)
                }
            }
        )*
    };
}

number_from!(f64, f32, i8, i16, i32, i64, u8, u16, u32, u64, usize, isize);

#[derive(Debug, Clone, PartialEq)]
pub struct PlaceholderEntry {
    pub key: String,
    pub value: PlaceholderValue,
}

/// Ordered placeholder values for one render call.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Placeholder(pub Vec<PlaceholderEntry>);

impl Placeholder {
    pub fn new() -> Self {
        Placeholder(Vec::new())
    }

    pub fn with(mut self, key: &str, value: impl Into<PlaceholderValue>) -> Self {
        self.push(key, value);
        self
    }

    pub fn push(&mut self, key: &str, value: impl Into<PlaceholderValue>) -> &mut Self {
        self.0.push(PlaceholderEntry {
            key: key.to_string(),
            value: value.into(),
        });
        self
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Key → value map; when a key repeats, the last occurrence wins.
    pub fn to_map(&self) -> HashMap<String, PlaceholderValue> {
        self.0
            .iter()
            .map(|entry| (entry.key.clone(), entry.value.clone()))
            .collect()
    }
}

impl<K: Into<String>, V: Into<PlaceholderValue>> FromIterator<(K, V)> for Placeholder {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Placeholder(
            iter.into_iter()
                .map(|(key, value)| PlaceholderEntry {
                    key: key.into(),
                    value: value.into(),
                })
                .collect(),
        )
    }
}
