//! Sort keys and ordered sort specifications

use crate::error::{SortError, SortResult};
use itertools::Itertools;
use std::fmt;
use std::str::FromStr;

/// Sort order enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Ascending,
    Descending,
}

impl SortOrder {
    pub fn from_ascending(ascending: bool) -> Self {
        if ascending {
            SortOrder::Ascending
        } else {
            SortOrder::Descending
        }
    }

    pub fn is_ascending(self) -> bool {
        self == SortOrder::Ascending
    }

    pub fn reverse(self) -> Self {
        match self {
            SortOrder::Ascending => SortOrder::Descending,
            SortOrder::Descending => SortOrder::Ascending,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            SortOrder::Ascending => "asc",
            SortOrder::Descending => "desc",
        }
    }
}

impl FromStr for SortOrder {
    type Err = SortError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" | "a" | "ascending" => Ok(SortOrder::Ascending),
            "desc" | "d" | "descending" => Ok(SortOrder::Descending),
            _ => Err(SortError::invalid_key_spec(&format!(
                "unknown direction: {s}"
            ))),
        }
    }
}

/// One field of a sort specification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortKey {
    /// Field key looked up in each record
    pub field: String,
    pub order: SortOrder,
}

impl SortKey {
    pub fn new(field: &str, order: SortOrder) -> Self {
        Self {
            field: field.to_string(),
            order,
        }
    }

    pub fn ascending(field: &str) -> Self {
        Self::new(field, SortOrder::Ascending)
    }

    pub fn descending(field: &str) -> Self {
        Self::new(field, SortOrder::Descending)
    }

    /// Parse a key definition like "name", "size:desc" or "3:a"
    pub fn parse(keydef: &str) -> SortResult<Self> {
        let (field, order) = match keydef.rsplit_once(':') {
            Some((field, dir)) => (field, dir.parse::<SortOrder>()?),
            None => (keydef, SortOrder::Ascending),
        };

        if field.is_empty() {
            return Err(SortError::invalid_key_spec(&format!(
                "empty field name in key: {keydef}"
            )));
        }

        Ok(Self::new(field, order))
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.field, self.order.label())
    }
}

/// Ordered sort keys. Index 0 is the primary key, later keys only break
/// ties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SortSpec {
    keys: Vec<SortKey>,
}

impl SortSpec {
    pub fn new(keys: Vec<SortKey>) -> Self {
        Self { keys }
    }

    /// Build from parallel field-key and ascending-flag arrays, the form
    /// list views hand over their sort state in.
    pub fn from_parallel<S: AsRef<str>>(fields: &[S], ascending: &[bool]) -> SortResult<Self> {
        if fields.len() != ascending.len() {
            return Err(SortError::MismatchedSortSpec {
                keys: fields.len(),
                flags: ascending.len(),
            });
        }

        Ok(Self {
            keys: fields
                .iter()
                .zip(ascending)
                .map(|(field, &asc)| SortKey::new(field.as_ref(), SortOrder::from_ascending(asc)))
                .collect(),
        })
    }

    pub fn then(mut self, key: SortKey) -> Self {
        self.keys.push(key);
        self
    }

    pub fn keys(&self) -> &[SortKey] {
        &self.keys
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Same keys with every direction flipped
    pub fn reversed(&self) -> Self {
        Self {
            keys: self
                .keys
                .iter()
                .map(|k| SortKey::new(&k.field, k.order.reverse()))
                .collect(),
        }
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.keys.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_key() {
        let key = SortKey::parse("size:desc").expect("Failed to parse key");
        assert_eq!(key, SortKey::descending("size"));

        let key = SortKey::parse("name").expect("Failed to parse key");
        assert_eq!(key, SortKey::ascending("name"));

        let key = SortKey::parse("3:A").expect("Failed to parse key");
        assert_eq!(key, SortKey::ascending("3"));

        assert!(SortKey::parse("size:up").is_err());
        assert!(SortKey::parse(":desc").is_err());
        assert!(SortKey::parse("").is_err());
    }

    #[test]
    fn test_from_parallel() {
        let spec = SortSpec::from_parallel(&["size", "name"], &[false, true])
            .expect("Failed to build spec");
        assert_eq!(spec.len(), 2);
        assert_eq!(spec.keys()[0], SortKey::descending("size"));
        assert_eq!(spec.keys()[1], SortKey::ascending("name"));
    }

    #[test]
    fn test_from_parallel_mismatch() {
        match SortSpec::from_parallel(&["size", "name"], &[true]) {
            Err(SortError::MismatchedSortSpec { keys, flags }) => {
                assert_eq!((keys, flags), (2, 1));
            }
            other => panic!("unexpected: {other:?}"),
        }
    }

    #[test]
    fn test_display_and_reverse() {
        let spec = SortSpec::default()
            .then(SortKey::descending("size"))
            .then(SortKey::ascending("name"));
        assert_eq!(spec.to_string(), "size desc, name asc");
        assert_eq!(spec.reversed().to_string(), "size asc, name desc");
    }
}
