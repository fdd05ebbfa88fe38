//! Common test utilities for conflux integration tests
//!
//! Provides shared schema sets, file fixtures, and helper functions.

#![allow(dead_code)]

use conflux::{schemas, Schema, SchemaSet, ValueType};
use serde_json::{json, Map, Value};
use std::path::PathBuf;
use tempfile::TempDir;

// =============================================================================
// Test Schema Sets
// =============================================================================

/// Schema set covering the settings namespace used across the suites
pub fn settings_schemas() -> SchemaSet {
    schemas![
        Schema::new("http/port", ValueType::Int)
            .default(json!(8080))
            .doc("TCP port the HTTP listener binds"),
        Schema::new("http/host", ValueType::Str).doc("Bind address"),
        Schema::new("log/verbose", ValueType::Bool).default(json!(false)),
        Schema::new("instance/id", ValueType::Uuid),
        Schema::new("upstream/endpoint", ValueType::Uri),
        Schema::new("log/level", ValueType::Keyword).default(json!("info")),
    ]
}

/// Schema set for the secrets namespace
pub fn secrets_schemas() -> SchemaSet {
    schemas![Schema::new("api/token", ValueType::Str).doc("Upstream API token")]
}

// =============================================================================
// Fixtures
// =============================================================================

/// Temp directory with helpers for writing source files
pub struct TestFixture {
    pub dir: TempDir,
}

impl TestFixture {
    pub fn new() -> Self {
        let _ = env_logger::builder().is_test(true).try_init();
        Self {
            dir: TempDir::new().expect("create temp dir"),
        }
    }

    /// Write a file under the fixture dir and return its path
    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture file");
        path
    }

    /// Path under the fixture dir that does not exist
    pub fn missing(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }
}

// =============================================================================
// Helpers
// =============================================================================

/// Unwrap a JSON value into its object form
pub fn obj(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {other}"),
    }
}
