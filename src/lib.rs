//! # conflux - Layered Configuration Resolution
//!
//! A library for resolving application settings and secrets from multiple
//! layered sources into a single validated config graph, ready to hand to a
//! component-graph/lifecycle engine.
//!
//! ## Features
//!
//! - **Layered Sources**: in-memory maps, lookup functions, config files
//!   (JSON/TOML/YAML), environment variables, dotenv files, CLI
//!   arguments, and schema-declared defaults - consulted in order,
//!   first match wins
//! - **Placeholders**: embed `{"$setting": "http/port"}` / `{"$secret":
//!   "api/token"}` markers anywhere in the config graph; resolution
//!   substitutes each with its resolved, validated value
//! - **Stringly Coercion**: env/dotenv/CLI strings are coerced against
//!   schemas (int, bool, uuid, uri, keyword, collections) or best-effort
//!   literal-parsed when no schema exists
//! - **Schema Validation**: every resolved value with a schema is validated;
//!   failures identify key, value, and expected shape
//! - **Two Namespaces**: settings and secrets resolve independently, each
//!   with its own source list and schema set
//!
//! ## Quick Start
//!
//! ```rust
//! use conflux::{resolve, ConfigSource, Schema, Setup, Source, ValueType, schemas};
//! use serde_json::json;
//!
//! # fn main() -> conflux::Result<()> {
//! let config = json!({
//!     "server": {"port": {"$setting": "http/port"}},
//!     "token": {"$secret": "api/token"}
//! });
//!
//! let setup = Setup::new()
//!     .config_source(ConfigSource::Map(config.as_object().unwrap().clone()))
//!     .settings_source(Source::Env)
//!     .settings_source(Source::Defaults)
//!     .settings_schemas(schemas![
//!         Schema::new("http/port", ValueType::Int).default(json!(8080)),
//!     ])
//!     .secrets_source(Source::Map(
//!         json!({"api/token": "hunter2"}).as_object().unwrap().clone(),
//!     ));
//!
//! let resolved = resolve(setup)?;
//! assert_eq!(resolved["server"]["port"], json!(8080));
//! assert_eq!(resolved["token"], json!("hunter2"));
//! # Ok(())
//! # }
//! ```
//!
//! ## Source Precedence
//!
//! Sources are consulted strictly in the order they were added; the first one
//! with a present value wins. Presence is independent of truthiness: a source
//! that yields `false`, `0`, or `null` has answered. Put a
//! [`Source::Defaults`] last to fall back to schema-declared defaults; a key
//! absent from every source is a [`Error::MissingSetting`], never a silent
//! default.
//!
//! ## CLI Arguments
//!
//! A [`Source::Args`] derives its long flags from the schema set
//! (`--http-port 9400`; booleans get `--flag`/`--no-flag` pairs) and parses
//! the vector at most once per process. A parse error prints diagnostics and
//! exits with code 1; `--help` prints usage and exits 0. This is the only
//! direct process exit in the crate.
//!
//! ## Lifecycle Handoff
//!
//! The resolved graph is consumed by an external component-graph engine
//! behind the [`LifecycleEngine`] trait; [`boot`] resolves, registers, and
//! signals `Start` in one call. The engine itself - start/stop ordering,
//! hot reload, shutdown hooks - is out of scope here.

// Core modules
mod coerce;
mod docs;
mod error;
mod key;
mod provider;
mod resolver;
mod schema;

// Grouped modules
pub mod lifecycle;
pub mod source;

// Re-exports from core
pub use coerce::coerce;
pub use docs::{generate_docs, DocsConfig};
pub use error::{Error, Result};
pub use key::Key;
pub use provider::SettingsProvider;
pub use resolver::{
    resolve, ConfigSource, Placeholder, PlaceholderKind, SchemaSpec, Setup, SourceSpec,
};
pub use schema::{Schema, SchemaSet, ValueType};
pub use source::{AdaptOptions, AdaptedSource, Source, SourceFn};

// Lifecycle re-exports
pub use lifecycle::{boot, LifecycleEngine, LifecycleEvent, Registration};
