//! Core data types for the aggregate record.
//!
//! A [`FieldMapping`] is a flat map from field name to [`FieldValue`]. The
//! external reasoning service marks a recognized-but-absent field with the
//! literal string `"N/A"`; internally that state is the explicit
//! [`FieldValue::Unknown`] variant so application code never compares against
//! a magic string. The sentinel exists only at the serialization boundary.

use std::collections::BTreeMap;

use serde::de::{Deserializer, Error as DeError};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};

/// The wire sentinel for a field that was recognized but has no value.
pub const NA_SENTINEL: &str = "N/A";

/// A single extracted field value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A concrete observed value.
    Present(String),
    /// Recognized field with no value found (`"N/A"` on the wire).
    Unknown,
}

impl FieldValue {
    /// Whether this is a concrete observed value.
    pub fn is_present(&self) -> bool {
        matches!(self, Self::Present(_))
    }

    /// The concrete value, if any.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Present(s) => Some(s),
            Self::Unknown => None,
        }
    }

    /// Render for output, using the wire sentinel for unknowns.
    pub fn display_text(&self) -> &str {
        match self {
            Self::Present(s) => s,
            Self::Unknown => NA_SENTINEL,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        if s == NA_SENTINEL {
            Self::Unknown
        } else {
            Self::Present(s.to_string())
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.display_text())
    }
}

impl<'de> Deserialize<'de> for FieldValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        // Tolerate non-string scalars (numbers, booleans) by stringifying;
        // the reasoning service does not always quote numeric fields.
        let value = serde_json::Value::deserialize(deserializer)?;
        match value {
            serde_json::Value::String(s) => Ok(FieldValue::from(s.as_str())),
            serde_json::Value::Number(n) => Ok(FieldValue::Present(n.to_string())),
            serde_json::Value::Bool(b) => Ok(FieldValue::Present(b.to_string())),
            serde_json::Value::Null => Ok(FieldValue::Unknown),
            other => Err(D::Error::custom(format!(
                "field value must be a scalar, got {other}"
            ))),
        }
    }
}

/// An ordered-irrelevant mapping from field name to extracted value.
///
/// Serializes as a flat JSON object of strings, with `"N/A"` standing in
/// for [`FieldValue::Unknown`]. Backed by a `BTreeMap` so serialization is
/// deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldMapping {
    fields: BTreeMap<String, FieldValue>,
}

impl FieldMapping {
    /// An empty mapping.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    /// Insert or overwrite a field.
    pub fn insert(&mut self, name: impl Into<String>, value: FieldValue) {
        self.fields.insert(name.into(), value);
    }

    /// Iterate fields in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &FieldValue)> {
        self.fields.iter()
    }

    /// Serialize to the on-disk JSON object form.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Pretty-printed JSON for display and prompt embedding.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl FromIterator<(String, FieldValue)> for FieldMapping {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn na_string_deserializes_to_unknown() {
        let mapping: FieldMapping =
            serde_json::from_str(r#"{"name": "Jane Doe", "email": "N/A"}"#).unwrap();
        assert_eq!(
            mapping.get("name"),
            Some(&FieldValue::Present("Jane Doe".into()))
        );
        assert_eq!(mapping.get("email"), Some(&FieldValue::Unknown));
    }

    #[test]
    fn unknown_serializes_to_na_string() {
        let mut mapping = FieldMapping::new();
        mapping.insert("email", FieldValue::Unknown);
        mapping.insert("name", FieldValue::Present("Jane".into()));
        let json = mapping.to_json().unwrap();
        assert_eq!(json, r#"{"email":"N/A","name":"Jane"}"#);
    }

    #[test]
    fn round_trip_preserves_values() {
        let original: FieldMapping =
            serde_json::from_str(r#"{"a": "1", "b": "N/A", "c": "hello world"}"#).unwrap();
        let reparsed: FieldMapping = serde_json::from_str(&original.to_json().unwrap()).unwrap();
        assert_eq!(original, reparsed);
    }

    #[test]
    fn sentinel_match_is_exact() {
        // Lowercase "n/a" is real data, not the sentinel.
        let mapping: FieldMapping = serde_json::from_str(r#"{"x": "n/a"}"#).unwrap();
        assert_eq!(mapping.get("x"), Some(&FieldValue::Present("n/a".into())));
    }

    #[test]
    fn numeric_scalars_become_present_strings() {
        let mapping: FieldMapping =
            serde_json::from_str(r#"{"age": 34, "verified": true, "note": null}"#).unwrap();
        assert_eq!(mapping.get("age"), Some(&FieldValue::Present("34".into())));
        assert_eq!(
            mapping.get("verified"),
            Some(&FieldValue::Present("true".into()))
        );
        assert_eq!(mapping.get("note"), Some(&FieldValue::Unknown));
    }

    #[test]
    fn nested_objects_are_rejected() {
        let result: Result<FieldMapping, _> =
            serde_json::from_str(r#"{"address": {"city": "Springfield"}}"#);
        assert!(result.is_err());
    }

    #[test]
    fn display_text_uses_sentinel() {
        assert_eq!(FieldValue::Unknown.display_text(), "N/A");
        assert_eq!(FieldValue::Present("x".into()).display_text(), "x");
    }
}
