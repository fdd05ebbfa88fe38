//! Settings sources and their uniform lookup adapters
//!
//! A [`Source`] is one provider of key-value lookups: an in-memory map, a
//! lookup function, a config file, the process environment, a dotenv file,
//! a CLI argument vector, or the schema-declared defaults. Adapting a source
//! yields an [`AdaptedSource`] with a single capability:
//! `lookup(key) -> Result<Option<Value>>`. `None` means the source has no
//! value for the key, and presence is tracked independently of the value
//! itself so that `false`, `0`, and `null` still count as found.

mod cli;

pub use cli::ArgsSource;

use crate::coerce::coerce;
use crate::error::{Error, Result};
use crate::key::Key;
use crate::schema::SchemaSet;
use log::{debug, warn};
use serde_json::{Map, Value};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Lookup function source: `(schemas, key) -> value | absent`.
///
/// The function is responsible for any string coercion itself.
pub type SourceFn = Arc<dyn Fn(&SchemaSet, &Key) -> Option<Value>>;

/// One provider of setting lookups, consulted in list order
#[derive(Clone)]
pub enum Source {
    /// In-memory map keyed by the key's display form (`ns/name`).
    /// Values are already typed; no coercion at the source.
    Map(Map<String, Value>),
    /// Lookup function
    Fn(SourceFn),
    /// Config file, format picked by extension (JSON/TOML/YAML).
    /// A missing file is an always-absent source, never an error.
    File(PathBuf),
    /// Process environment, via the key's env-var form
    Env,
    /// Dotenv-style file; existence re-checked on every lookup
    Dotenv(PathBuf),
    /// CLI argument vector, flags derived from the schema set
    Args(Vec<String>),
    /// Schema-declared `default` values
    Defaults,
}

impl fmt::Debug for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Source::Map(m) => f.debug_tuple("Map").field(&m.len()).finish(),
            Source::Fn(_) => f.write_str("Fn(..)"),
            Source::File(p) => f.debug_tuple("File").field(p).finish(),
            Source::Env => f.write_str("Env"),
            Source::Dotenv(p) => f.debug_tuple("Dotenv").field(p).finish(),
            Source::Args(a) => f.debug_tuple("Args").field(a).finish(),
            Source::Defaults => f.write_str("Defaults"),
        }
    }
}

/// Options threaded through adaptation: the namespace's schema subset
#[derive(Debug, Clone, Default)]
pub struct AdaptOptions {
    pub schemas: SchemaSet,
}

impl Source {
    /// Turn this source into a uniform lookup adapter.
    ///
    /// Source-shape problems surface here, immediately at setup time.
    pub fn adapt(self, opts: &AdaptOptions) -> Result<AdaptedSource> {
        let inner = match self {
            Source::Map(map) => Adapter::Map(map),
            Source::Fn(f) => Adapter::Fn(f),
            Source::File(path) => {
                // The file may legitimately not exist (absent source), but an
                // existing path that is not a regular file can never yield a
                // value and is reported up front.
                if path.exists() && !path.is_file() {
                    return Err(Error::InvalidSource {
                        kind: "file".to_string(),
                        detail: format!("'{}' exists but is not a regular file", path.display()),
                    });
                }
                Adapter::File(path)
            }
            Source::Env => Adapter::Env,
            Source::Dotenv(path) => Adapter::Dotenv(path),
            Source::Args(argv) => Adapter::Args(ArgsSource::new(argv, &opts.schemas)),
            Source::Defaults => Adapter::Defaults,
        };
        Ok(AdaptedSource {
            inner,
            schemas: opts.schemas.clone(),
        })
    }
}

// =============================================================================
// Adapted Source
// =============================================================================

enum Adapter {
    Map(Map<String, Value>),
    Fn(SourceFn),
    File(PathBuf),
    Env,
    Dotenv(PathBuf),
    Args(ArgsSource),
    Defaults,
}

/// Uniform `key -> value | absent` view over one adapted [`Source`]
pub struct AdaptedSource {
    inner: Adapter,
    schemas: SchemaSet,
}

impl AdaptedSource {
    /// Look up a key in this source.
    ///
    /// `Ok(None)` means absent; the caller decides whether that is an error.
    pub fn lookup(&self, key: &Key) -> Result<Option<Value>> {
        match &self.inner {
            Adapter::Map(map) => Ok(map.get(&key.to_string()).cloned()),
            Adapter::Fn(f) => Ok(f(&self.schemas, key)),
            Adapter::File(path) => self.lookup_file(path, key),
            Adapter::Env => match std::env::var(key.to_env_var()) {
                Ok(raw) => coerce(self.schemas.get(key), key, &raw).map(Some),
                Err(_) => Ok(None),
            },
            Adapter::Dotenv(path) => self.lookup_dotenv(path, key),
            Adapter::Args(args) => args.lookup(&self.schemas, key),
            Adapter::Defaults => Ok(self
                .schemas
                .get(key)
                .and_then(|schema| schema.default.clone())),
        }
    }

    /// Human-readable source description, for logging
    #[must_use]
    pub fn describe(&self) -> String {
        match &self.inner {
            Adapter::Map(m) => format!("map({} entries)", m.len()),
            Adapter::Fn(_) => "fn".to_string(),
            Adapter::File(p) => format!("file({})", p.display()),
            Adapter::Env => "env".to_string(),
            Adapter::Dotenv(p) => format!("dotenv({})", p.display()),
            Adapter::Args(_) => "args".to_string(),
            Adapter::Defaults => "defaults".to_string(),
        }
    }

    fn lookup_file(&self, path: &Path, key: &Key) -> Result<Option<Value>> {
        // Existence is checked immediately before each read; files are never
        // cached across lookups.
        if !path.exists() {
            debug!("config file {} not present, treating as absent", path.display());
            return Ok(None);
        }
        let parsed = match read_config_file(path) {
            Ok(map) => map,
            Err(Error::FileRead { source, .. })
                if source.kind() == std::io::ErrorKind::NotFound =>
            {
                // Deleted between the existence check and the read; the
                // design accepts this race and treats the source as absent.
                warn!("config file {} vanished before read", path.display());
                return Ok(None);
            }
            Err(e) => return Err(e),
        };
        Ok(parsed.get(&key.to_string()).cloned())
    }

    fn lookup_dotenv(&self, path: &Path, key: &Key) -> Result<Option<Value>> {
        if !path.exists() {
            return Ok(None);
        }
        let wanted = key.to_env_var();
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => {
                // Deleted between the existence check and the read; the
                // design accepts this race and treats the source as absent.
                warn!("dotenv file {} vanished before read", path.display());
                return Ok(None);
            }
            Err(e) => {
                return Err(Error::Parse {
                    path: path.to_path_buf(),
                    detail: e.to_string(),
                })
            }
        };
        for item in iter {
            let (name, raw) = item.map_err(|e| Error::Parse {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
            if name == wanted {
                return coerce(self.schemas.get(key), key, &raw).map(Some);
            }
        }
        Ok(None)
    }
}

/// Parse a config file into a top-level object.
///
/// Format is detected from the extension (JSON, TOML, YAML). Keys are
/// preserved verbatim: case, dots, and slashes all survive, so lookups by a
/// key's display form and pass-through of non-placeholder graphs stay exact.
pub(crate) fn read_config_file(path: &Path) -> Result<Map<String, Value>> {
    let contents = std::fs::read_to_string(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    let parse_err = |detail: String| Error::Parse {
        path: path.to_path_buf(),
        detail,
    };
    let value: Value = match extension.as_str() {
        "json" => serde_json::from_str(&contents).map_err(|e| parse_err(e.to_string()))?,
        "toml" => toml::from_str(&contents).map_err(|e| parse_err(e.to_string()))?,
        "yaml" | "yml" => serde_yaml::from_str(&contents).map_err(|e| parse_err(e.to_string()))?,
        other => {
            return Err(Error::InvalidSource {
                kind: "file".to_string(),
                detail: format!(
                    "'{}' has unsupported config format '{}'",
                    path.display(),
                    other
                ),
            })
        }
    };
    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::InvalidSource {
            kind: "file".to_string(),
            detail: format!(
                "'{}' did not parse to a top-level map (got {})",
                path.display(),
                type_name(&other)
            ),
        }),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Tests
// =============================================================================
