//! Schema entries for settings and secrets
//!
//! A [`Schema`] declares the expected type of one key, optionally with a
//! default value and a documentation string. Schemas are namespace-scoped:
//! one [`SchemaSet`] for settings, another for secrets.

use crate::error::{Error, Result};
use crate::key::Key;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;

// =============================================================================
// Value Types
// =============================================================================

/// Declared type of a setting value.
///
/// Drives both stringly coercion (how a raw string becomes a typed value)
/// and validation (whether a resolved value is acceptable).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// UTF-8 string, passed through coercion unchanged
    Str,
    /// Boolean
    Bool,
    /// Signed integer
    Int,
    /// Floating-point number
    Float,
    /// UUID in hyphenated form
    Uuid,
    /// Absolute URI
    Uri,
    /// Keyword-style identifier, with optional `ns/` segment
    Keyword,
    /// Sequence of values
    List,
    /// String-keyed map of values
    Map,
    /// Any value; coerced best-effort, never rejected by validation
    #[default]
    Any,
}

impl fmt::Display for ValueType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueType::Str => "str",
            ValueType::Bool => "bool",
            ValueType::Int => "int",
            ValueType::Float => "float",
            ValueType::Uuid => "uuid",
            ValueType::Uri => "uri",
            ValueType::Keyword => "keyword",
            ValueType::List => "list",
            ValueType::Map => "map",
            ValueType::Any => "any",
        };
        f.write_str(name)
    }
}

impl ValueType {
    /// Structural types whose string form must be a well-formed literal
    #[must_use]
    pub fn is_structural(&self) -> bool {
        matches!(self, ValueType::List | ValueType::Map)
    }
}

// =============================================================================
// Schema Entry
// =============================================================================

/// Schema for a single setting or secret key.
///
/// # Example
///
/// ```
/// use conflux::{Key, Schema, ValueType};
/// use serde_json::json;
///
/// let port = Schema::new(Key::parse("http/port"), ValueType::Int)
///     .default(json!(8080))
///     .doc("TCP port the HTTP listener binds");
/// assert_eq!(port.default.as_ref().unwrap(), &json!(8080));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    /// Key this schema applies to
    pub key: Key,
    /// Declared value type
    #[serde(rename = "type")]
    pub value_type: ValueType,
    /// Default value, consulted only by a `Defaults` source
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Documentation string
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc: Option<String>,
}

impl Schema {
    /// Create a schema for a key with the given declared type
    pub fn new(key: impl Into<Key>, value_type: ValueType) -> Self {
        Self {
            key: key.into(),
            value_type,
            default: None,
            doc: None,
        }
    }

    /// Set the default value
    #[must_use]
    pub fn default(mut self, value: Value) -> Self {
        self.default = Some(value);
        self
    }

    /// Set the documentation string
    #[must_use]
    pub fn doc(mut self, doc: impl Into<String>) -> Self {
        self.doc = Some(doc.into());
        self
    }

    /// Validate a resolved value against the declared type.
    ///
    /// Only ever applied to a value some source actually produced; absence
    /// is reported as [`Error::MissingSetting`] before validation is
    /// considered.
    pub fn validate(&self, value: &Value) -> Result<()> {
        let ok = match self.value_type {
            ValueType::Str | ValueType::Keyword => value.is_string(),
            ValueType::Bool => value.is_boolean(),
            ValueType::Int => value.is_i64() || value.is_u64(),
            ValueType::Float => value.is_number(),
            // Coercion already canonicalized these; anything still
            // non-string was supplied pre-typed and is wrong.
            ValueType::Uuid => value.as_str().is_some_and(|s| uuid::Uuid::parse_str(s).is_ok()),
            ValueType::Uri => value.as_str().is_some_and(|s| url::Url::parse(s).is_ok()),
            ValueType::List => value.is_array(),
            ValueType::Map => value.is_object(),
            ValueType::Any => true,
        };
        if ok {
            Ok(())
        } else {
            Err(Error::InvalidSetting {
                key: self.key.clone(),
                value: value.clone(),
                schema: self.value_type.to_string(),
            })
        }
    }
}

// =============================================================================
// Schema Set
// =============================================================================

/// Namespace-scoped collection of schemas, keyed by [`Key`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaSet {
    entries: HashMap<Key, Schema>,
}

impl SchemaSet {
    /// Create an empty schema set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up the schema for a key
    pub fn get(&self, key: &Key) -> Option<&Schema> {
        self.entries.get(key)
    }

    /// Number of schema entries
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no entries
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate over all entries
    pub fn iter(&self) -> impl Iterator<Item = &Schema> {
        self.entries.values()
    }
}

impl FromIterator<Schema> for SchemaSet {
    fn from_iter<I: IntoIterator<Item = Schema>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|schema| (schema.key.clone(), schema))
                .collect(),
        }
    }
}

/// Macro for building a [`SchemaSet`] more cleanly
///
/// # Example
/// ```
/// use conflux::{schemas, Schema, ValueType};
/// use serde_json::json;
///
/// let set = schemas![
///     Schema::new("http/port", ValueType::Int).default(json!(8080)),
///     Schema::new("http/host", ValueType::Str),
/// ];
/// assert_eq!(set.len(), 2);
/// ```
#[macro_export]
macro_rules! schemas {
    ($($schema:expr),* $(,)?) => {{
        [$($schema),*].into_iter().collect::<$crate::SchemaSet>()
    }};
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_schema_builder() {
        let schema = Schema::new("http/port", ValueType::Int)
            .default(json!(8080))
            .doc("listener port");

        assert_eq!(schema.key, Key::parse("http/port"));
        assert_eq!(schema.value_type, ValueType::Int);
        assert_eq!(schema.default, Some(json!(8080)));
        assert_eq!(schema.doc.as_deref(), Some("listener port"));
    }

    #[test]
    fn test_int_validation() {
        let schema = Schema::new("n", ValueType::Int);
        assert!(schema.validate(&json!(42)).is_ok());
        assert!(schema.validate(&json!("42")).is_err());
        assert!(schema.validate(&json!(4.2)).is_err());
    }

    #[test]
    fn test_bool_validation_accepts_false() {
        let schema = Schema::new("flag", ValueType::Bool);
        assert!(schema.validate(&json!(false)).is_ok());
        assert!(schema.validate(&json!("false")).is_err());
    }

    #[test]
    fn test_float_validation_accepts_integers() {
        let schema = Schema::new("ratio", ValueType::Float);
        assert!(schema.validate(&json!(0.5)).is_ok());
        assert!(schema.validate(&json!(2)).is_ok());
    }

    #[test]
    fn test_uuid_validation() {
        let schema = Schema::new("id", ValueType::Uuid);
        assert!(schema
            .validate(&json!("86550586-4c98-42a5-ba71-a0ac3010db19"))
            .is_ok());
        assert!(schema.validate(&json!("not-a-uuid")).is_err());
        assert!(schema.validate(&json!(17)).is_err());
    }

    #[test]
    fn test_structural_validation() {
        let list = Schema::new("xs", ValueType::List);
        assert!(list.validate(&json!([1, 2])).is_ok());
        assert!(list.validate(&json!({"a": 1})).is_err());

        let map = Schema::new("m", ValueType::Map);
        assert!(map.validate(&json!({"a": 1})).is_ok());
        assert!(map.validate(&json!([1, 2])).is_err());
    }

    #[test]
    fn test_any_accepts_everything() {
        let schema = Schema::new("blob", ValueType::Any);
        assert!(schema.validate(&json!(null)).is_ok());
        assert!(schema.validate(&json!([{"deep": true}])).is_ok());
    }

    #[test]
    fn test_invalid_setting_error_carries_context() {
        let schema = Schema::new("http/port", ValueType::Int);
        let err = schema.validate(&json!("high")).unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("http/port"));
        assert!(msg.contains("high"));
        assert!(msg.contains("int"));
    }
}
