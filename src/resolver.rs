//! Setup resolution: merging config sources and substituting placeholders
//!
//! A [`Setup`] describes one resolution run: ordered settings/secrets/config
//! sources plus the schema sets for both namespaces. [`resolve`] builds a
//! [`SettingsProvider`] per namespace, shallow-merges the config sources into
//! a base object, then walks that object depth-first replacing every
//! placeholder with its resolved value. The returned object is the config
//! graph handed to the downstream lifecycle engine.

use crate::error::Result;
use crate::key::Key;
use crate::provider::SettingsProvider;
use crate::schema::SchemaSet;
use crate::source::{read_config_file, Source};
use log::{debug, trace};
use serde_json::{json, Map, Value};
use std::path::PathBuf;

// =============================================================================
// Placeholders
// =============================================================================

/// Which namespace a placeholder resolves against
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PlaceholderKind {
    Setting,
    Secret,
}

const SETTING_TAG: &str = "$setting";
const SECRET_TAG: &str = "$secret";

/// Marker embedded in a config graph: "substitute the resolved value here".
///
/// Wire form is a single-entry object, expressible in every config file
/// format the file reader supports:
///
/// ```json
/// {"port": {"$setting": "http/port"}, "token": {"$secret": "api/token"}}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Placeholder {
    pub kind: PlaceholderKind,
    pub key: Key,
}

impl Placeholder {
    /// Placeholder for a setting key
    pub fn setting(key: impl Into<Key>) -> Self {
        Self {
            kind: PlaceholderKind::Setting,
            key: key.into(),
        }
    }

    /// Placeholder for a secret key
    pub fn secret(key: impl Into<Key>) -> Self {
        Self {
            kind: PlaceholderKind::Secret,
            key: key.into(),
        }
    }

    /// Render as the wire-form value for embedding in a config graph
    #[must_use]
    pub fn to_value(&self) -> Value {
        let tag = match self.kind {
            PlaceholderKind::Setting => SETTING_TAG,
            PlaceholderKind::Secret => SECRET_TAG,
        };
        json!({ tag: self.key.to_string() })
    }

    /// Recognize a wire-form placeholder
    #[must_use]
    pub fn from_value(value: &Value) -> Option<Self> {
        let map = value.as_object()?;
        if map.len() != 1 {
            return None;
        }
        let (tag, key) = map.iter().next()?;
        let kind = match tag.as_str() {
            SETTING_TAG => PlaceholderKind::Setting,
            SECRET_TAG => PlaceholderKind::Secret,
            _ => return None,
        };
        Some(Self {
            kind,
            key: Key::parse(key.as_str()?),
        })
    }
}

impl From<Placeholder> for Value {
    fn from(placeholder: Placeholder) -> Self {
        placeholder.to_value()
    }
}

// =============================================================================
// Setup descriptor
// =============================================================================

/// A config source feeding the merged base map (not key-lookup based)
#[derive(Debug, Clone)]
pub enum ConfigSource {
    /// Inline object, merged directly
    Map(Map<String, Value>),
    /// File parsed by extension (JSON/TOML/YAML), then merged
    File(PathBuf),
}

/// Ordered source lists for one resolution run
#[derive(Debug, Clone, Default)]
pub struct SourceSpec {
    pub settings: Vec<Source>,
    pub secrets: Vec<Source>,
    pub config: Vec<ConfigSource>,
}

/// Schema sets for both namespaces
#[derive(Debug, Clone, Default)]
pub struct SchemaSpec {
    pub settings: SchemaSet,
    pub secrets: SchemaSet,
}

/// Declarative input for one resolution run, supplied by the embedding
/// application
#[derive(Debug, Clone, Default)]
pub struct Setup {
    pub sources: SourceSpec,
    pub schemas: SchemaSpec,
}

impl Setup {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a settings source (consulted after any already added)
    #[must_use]
    pub fn settings_source(mut self, source: Source) -> Self {
        self.sources.settings.push(source);
        self
    }

    /// Append a secrets source
    #[must_use]
    pub fn secrets_source(mut self, source: Source) -> Self {
        self.sources.secrets.push(source);
        self
    }

    /// Append a config source (later sources override earlier top-level keys)
    #[must_use]
    pub fn config_source(mut self, source: ConfigSource) -> Self {
        self.sources.config.push(source);
        self
    }

    /// Set the settings schema set
    #[must_use]
    pub fn settings_schemas(mut self, schemas: SchemaSet) -> Self {
        self.schemas.settings = schemas;
        self
    }

    /// Set the secrets schema set
    #[must_use]
    pub fn secrets_schemas(mut self, schemas: SchemaSet) -> Self {
        self.schemas.secrets = schemas;
        self
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Resolve a setup into the final config graph.
///
/// Builds one provider per namespace, merges the config sources, and
/// substitutes every placeholder. Fully eager: the whole graph is resolved
/// before anything is returned, and the first error aborts the run.
pub fn resolve(setup: Setup) -> Result<Value> {
    let settings = SettingsProvider::build(setup.sources.settings, setup.schemas.settings)?;
    let secrets = SettingsProvider::build(setup.sources.secrets, setup.schemas.secrets)?;

    let base = merge_config_sources(setup.sources.config)?;
    debug!("resolving config graph with {} top-level keys", base.len());
    substitute(Value::Object(base), &settings, &secrets)
}

/// Shallow-merge the config sources in order: later sources override earlier
/// ones at the top level only
fn merge_config_sources(sources: Vec<ConfigSource>) -> Result<Map<String, Value>> {
    let mut merged = Map::new();
    for source in sources {
        let layer = match source {
            ConfigSource::Map(map) => map,
            ConfigSource::File(path) => read_config_file(&path)?,
        };
        for (key, value) in layer {
            merged.insert(key, value);
        }
    }
    Ok(merged)
}

/// Post-order walk: children are substituted before the container holding
/// them, so placeholders nested anywhere in maps or sequences are each
/// visited exactly once
fn substitute(value: Value, settings: &SettingsProvider, secrets: &SettingsProvider) -> Result<Value> {
    if let Some(placeholder) = Placeholder::from_value(&value) {
        trace!("substituting {:?} placeholder '{}'", placeholder.kind, placeholder.key);
        return match placeholder.kind {
            PlaceholderKind::Setting => settings.fetch(&placeholder.key),
            PlaceholderKind::Secret => secrets.fetch(&placeholder.key),
        };
    }
    match value {
        Value::Object(map) => {
            let mut out = Map::with_capacity(map.len());
            for (key, child) in map {
                out.insert(key, substitute(child, settings, secrets)?);
            }
            Ok(Value::Object(out))
        }
        Value::Array(items) => items
            .into_iter()
            .map(|child| substitute(child, settings, secrets))
            .collect::<Result<Vec<_>>>()
            .map(Value::Array),
        scalar => Ok(scalar),
    }
}

// =============================================================================
// Tests
// =============================================================================
