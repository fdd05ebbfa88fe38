//! Documentation generator for schema sets
//!
//! Generates a markdown settings reference from a [`SchemaSet`].

use crate::schema::SchemaSet;
use serde_json::Value;

/// Configuration for docs generation
#[derive(Debug, Clone, Default)]
pub struct DocsConfig {
    /// Title for the documentation
    pub title: Option<String>,
    /// Description/introduction text
    pub description: Option<String>,
}

impl DocsConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[must_use]
    pub fn with_description(mut self, desc: impl Into<String>) -> Self {
        self.description = Some(desc.into());
        self
    }
}

/// Generate a markdown settings reference from a schema set, sorted by key
#[must_use]
pub fn generate_docs(schemas: &SchemaSet, config: DocsConfig) -> String {
    use std::fmt::Write;

    let mut output = String::new();

    let title = config
        .title
        .unwrap_or_else(|| "Settings Reference".to_string());
    writeln!(output, "# {title}\n").unwrap();

    if let Some(desc) = config.description {
        writeln!(output, "{desc}\n").unwrap();
    }

    let mut entries: Vec<_> = schemas.iter().collect();
    entries.sort_by_key(|schema| schema.key.to_string());

    writeln!(output, "| Key | Type | Default | Description |").unwrap();
    writeln!(output, "|-----|------|---------|-------------|").unwrap();
    for schema in entries {
        writeln!(
            output,
            "| `{}` | {} | {} | {} |",
            schema.key,
            schema.value_type,
            schema
                .default
                .as_ref()
                .map_or("required".to_string(), format_default),
            schema.doc.as_deref().unwrap_or("")
        )
        .unwrap();
    }

    output
}

fn format_default(value: &Value) -> String {
    format!("`{value}`")
}

// =============================================================================
// Tests
// =============================================================================
