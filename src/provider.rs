//! First-match-wins resolution over an ordered source list
//!
//! A [`SettingsProvider`] scopes one namespace (settings XOR secrets): it
//! adapts every source up front, then answers `fetch(key)` by consulting the
//! adapted sources strictly in list order.

use crate::coerce::coerce;
use crate::error::{Error, Result};
use crate::key::Key;
use crate::schema::SchemaSet;
use crate::source::{AdaptOptions, AdaptedSource, Source};
use log::{debug, trace};
use serde_json::Value;

/// Resolves keys for one namespace against its ordered sources and schemas
pub struct SettingsProvider {
    sources: Vec<AdaptedSource>,
    schemas: SchemaSet,
}

impl std::fmt::Debug for SettingsProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SettingsProvider")
            .field("sources", &self.sources.len())
            .field("schemas", &self.schemas)
            .finish()
    }
}

impl SettingsProvider {
    /// Adapt the sources and build a provider.
    ///
    /// Source-shape errors ([`Error::InvalidSource`]) surface here, before
    /// any key is looked up.
    pub fn build(sources: Vec<Source>, schemas: SchemaSet) -> Result<Self> {
        let opts = AdaptOptions {
            schemas: schemas.clone(),
        };
        let sources = sources
            .into_iter()
            .map(|source| source.adapt(&opts))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { sources, schemas })
    }

    /// Resolve one key: first source with a present value wins.
    ///
    /// Presence is tracked with `Option`, so falsy-but-present values
    /// (`false`, `0`, `null`) count as found. A found string value with a
    /// schema is coerced before validation; a value that fails its schema is
    /// [`Error::InvalidSetting`]; absence across every source is
    /// [`Error::MissingSetting`].
    pub fn fetch(&self, key: &Key) -> Result<Value> {
        for source in &self.sources {
            let Some(found) = source.lookup(key)? else {
                trace!("{}: absent in {}", key, source.describe());
                continue;
            };
            debug!("{}: resolved from {}", key, source.describe());
            return self.check(key, found);
        }
        Err(Error::MissingSetting(key.clone()))
    }

    /// Coerce (for stringly values) and validate against the key's schema,
    /// if one exists
    fn check(&self, key: &Key, value: Value) -> Result<Value> {
        let Some(schema) = self.schemas.get(key) else {
            return Ok(value);
        };
        let value = match value {
            Value::String(raw) => coerce(Some(schema), key, &raw)?,
            typed => typed,
        };
        schema.validate(&value)?;
        Ok(value)
    }
}

// =============================================================================
// Tests
// =============================================================================
