//! Field values and records
//!
//! A [`Record`] is the loosely typed field-bag view of one sortable entity
//! (a torrent, a file of a torrent, a row of a table). Values are tagged
//! when they enter the system so the comparator switches on the tag instead
//! of inspecting types at comparison time.

use crate::error::CompareError;
use std::any::Any;
use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// A comparable value that is neither text, boolean nor number.
///
/// Comparing two opaque values may fail (different concrete types, or a
/// type with no total order); the failure is reported to the comparator's
/// error policy rather than propagated.
pub trait OpaqueValue: fmt::Debug + Send + Sync {
    /// Name used in error messages
    fn type_name(&self) -> &str;

    fn as_any(&self) -> &dyn Any;

    /// Natural ordering of `self` against `other`
    fn try_compare(&self, other: &dyn OpaqueValue) -> Result<Ordering, CompareError>;
}

/// Tagged field value
#[derive(Debug, Clone)]
pub enum FieldValue {
    Text(String),
    Bool(bool),
    Integer(i64),
    Float(f64),
    Other(Arc<dyn OpaqueValue>),
}

impl FieldValue {
    /// Wrap an opaque comparable value
    pub fn other<V: OpaqueValue + 'static>(value: V) -> Self {
        FieldValue::Other(Arc::new(value))
    }

    /// Name of the value's tag, as shown in comparison errors
    pub fn kind_name(&self) -> &str {
        match self {
            FieldValue::Text(_) => "text",
            FieldValue::Bool(_) => "bool",
            FieldValue::Integer(_) => "integer",
            FieldValue::Float(_) => "float",
            FieldValue::Other(v) => v.type_name(),
        }
    }

    pub fn is_numeric(&self) -> bool {
        matches!(self, FieldValue::Integer(_) | FieldValue::Float(_))
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Integer view; floats are truncated toward zero
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            FieldValue::Float(f) => Some(*f as i64),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(n) => Some(*n as f64),
            FieldValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Type a raw text cell.
    ///
    /// Empty cells are missing. Integers win over floats, and a float must
    /// contain at least one digit so words like `nan` or `inf` stay text.
    pub fn infer(cell: &str) -> Option<FieldValue> {
        if cell.is_empty() {
            return None;
        }
        if let Ok(n) = cell.parse::<i64>() {
            return Some(FieldValue::Integer(n));
        }
        if cell.bytes().any(|b| b.is_ascii_digit()) {
            if let Ok(f) = cell.parse::<f64>() {
                return Some(FieldValue::Float(f));
            }
        }
        if cell.eq_ignore_ascii_case("true") {
            return Some(FieldValue::Bool(true));
        }
        if cell.eq_ignore_ascii_case("false") {
            return Some(FieldValue::Bool(false));
        }
        Some(FieldValue::Text(cell.to_string()))
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Text(s) => write!(f, "{s}"),
            FieldValue::Bool(b) => write!(f, "{b}"),
            FieldValue::Integer(n) => write!(f, "{n}"),
            FieldValue::Float(x) => write!(f, "{x}"),
            FieldValue::Other(v) => write!(f, "{v:?}"),
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::Text(s)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl From<i32> for FieldValue {
    fn from(n: i32) -> Self {
        FieldValue::Integer(i64::from(n))
    }
}

impl From<i64> for FieldValue {
    fn from(n: i64) -> Self {
        FieldValue::Integer(n)
    }
}

impl From<u32> for FieldValue {
    fn from(n: u32) -> Self {
        FieldValue::Integer(i64::from(n))
    }
}

impl From<f32> for FieldValue {
    fn from(x: f32) -> Self {
        FieldValue::Float(f64::from(x))
    }
}

impl From<f64> for FieldValue {
    fn from(x: f64) -> Self {
        FieldValue::Float(x)
    }
}

/// Read-only field-bag keyed by field name. A key that is not present is a
/// missing value.
#[derive(Debug, Clone, Default)]
pub struct Record {
    fields: HashMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, key: &str, value: impl Into<FieldValue>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<FieldValue>) -> Option<FieldValue> {
        self.fields.insert(key.to_string(), value.into())
    }

    pub fn get(&self, key: &str) -> Option<&FieldValue> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for Record
where
    K: Into<String>,
    V: Into<FieldValue>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
