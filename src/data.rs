//! Scalar cell values and the ordered records that hold them.
//!
//! A [`Record`] keeps its keys in insertion order so the first record of a
//! table can define the column order. Missing keys read as the empty string.

use std::{fmt, sync::OnceLock};

use regex::Regex;
use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    de::{MapAccess, Visitor},
    ser::SerializeMap,
};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl Value {
    pub fn empty() -> Self {
        Value::Text(String::new())
    }

    pub fn as_display(&self) -> String {
        match self {
            Value::Text(s) => s.clone(),
            Value::Number(n) => format_number(*n),
            Value::Boolean(b) => b.to_string(),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Value::Text(s) if s.trim().is_empty())
    }

    /// Numeric reading of the cell; `None` for booleans, blanks and anything
    /// outside the plain decimal / exponent grammar.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Value::Number(n) if n.is_finite() => Some(*n),
            Value::Number(_) | Value::Boolean(_) => None,
            Value::Text(s) => parse_number(s),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_display())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Number(value)
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

fn numeric_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^[+-]?(\d+\.?\d*|\.\d+)([eE][+-]?\d+)?$").expect("numeric pattern compiles")
    })
}

pub fn parse_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() || !numeric_pattern().is_match(trimmed) {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

pub fn format_number(value: f64) -> String {
    // -0.0 prints as "-0"
    let value = if value == 0.0 { 0.0 } else { value };
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{value:.0}")
    } else {
        value.to_string()
    }
}

/// Ordered column → value mapping for one decoded row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    fields: Vec<(String, Value)>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            fields: Vec::with_capacity(capacity),
        }
    }

    /// Sets `key`, replacing the value in place when the key already exists.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.fields.iter_mut().find(|(existing, _)| *existing == key) {
            Some(slot) => slot.1 = value,
            None => self.fields.push((key, value)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, value)| value)
    }

    /// Stringified cell; absent keys read as the empty string.
    pub fn display(&self, key: &str) -> String {
        self.get(key).map(Value::as_display).unwrap_or_default()
    }

    pub fn number(&self, key: &str) -> Option<f64> {
        self.get(key).and_then(Value::as_number)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(key, value)| (key.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Record {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        let mut record = Record::new();
        for (key, value) in iter {
            record.insert(key, value);
        }
        record
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (key, value) in &self.fields {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RecordVisitor;

        impl<'de> Visitor<'de> for RecordVisitor {
            type Value = Record;

            fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
                formatter.write_str("a map of column names to scalar values")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Record, A::Error> {
                let mut record = Record::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((key, value)) = access.next_entry::<String, Value>()? {
                    record.insert(key, value);
                }
                Ok(record)
            }
        }

        deserializer.deserialize_map(RecordVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_number_accepts_decimal_and_exponent_forms() {
        assert_eq!(parse_number("42"), Some(42.0));
        assert_eq!(parse_number("  -3.5 "), Some(-3.5));
        assert_eq!(parse_number(".25"), Some(0.25));
        assert_eq!(parse_number("1e3"), Some(1000.0));
        assert_eq!(parse_number("+2.5E-1"), Some(0.25));
    }

    #[test]
    fn parse_number_rejects_blank_and_words() {
        assert_eq!(parse_number(""), None);
        assert_eq!(parse_number("   "), None);
        assert_eq!(parse_number("inf"), None);
        assert_eq!(parse_number("NaN"), None);
        assert_eq!(parse_number("12abc"), None);
        assert_eq!(parse_number("1,000"), None);
    }

    #[test]
    fn booleans_are_not_numeric() {
        assert_eq!(Value::Boolean(true).as_number(), None);
        assert_eq!(Value::Number(7.0).as_number(), Some(7.0));
    }

    #[test]
    fn display_drops_zero_fraction() {
        assert_eq!(Value::Number(7.0).as_display(), "7");
        assert_eq!(Value::Number(2.5).as_display(), "2.5");
        assert_eq!(Value::Boolean(false).as_display(), "false");
    }

    #[test]
    fn negative_zero_displays_as_zero() {
        assert_eq!(format_number(-0.0), "0");
        assert_eq!(Value::Number(-0.0).as_display(), "0");
        assert_eq!(format_number(-0.5), "-0.5");
    }

    #[test]
    fn record_insert_keeps_first_position() {
        let mut record = Record::new();
        record.insert("a", Value::from("1"));
        record.insert("b", Value::from("2"));
        record.insert("a", Value::from("3"));
        assert_eq!(record.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_eq!(record.display("a"), "3");
        assert_eq!(record.display("missing"), "");
    }

    #[test]
    fn record_serializes_in_key_order() {
        let record: Record = [
            ("zeta", Value::from(1.0)),
            ("alpha", Value::from("x")),
            ("flag", Value::from(true)),
        ]
        .into_iter()
        .collect();
        let json = serde_json::to_string(&record).expect("serialize");
        assert_eq!(json, r#"{"zeta":1.0,"alpha":"x","flag":true}"#);
        let back: Record = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back, record);
    }
}
