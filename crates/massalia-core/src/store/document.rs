//! Front-matter document parsing and rendering.
//!
//! Persisted events are markdown files of the form
//! `---\n<yaml>\n---\n<body>`.  Parsing is per-document and callers treat a
//! failure as "skip this file", never as a fatal condition.

use std::fs;
use std::path::Path;

use serde_yaml::{Mapping, Value};

use crate::errors::{EngineError, EngineResult};

/// A parsed front-matter document: YAML mapping plus markdown body.
#[derive(Clone, Debug, Default)]
pub struct Document {
    pub matter: Mapping,
    pub body: String,
}

impl Document {
    /// String value of a front-matter field, or `""` when absent or not a
    /// string.
    pub fn str_field(&self, key: &str) -> String {
        self.matter
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    }

    /// String value of a front-matter field, `None` when absent, null, empty,
    /// or not a string.
    pub fn opt_str_field(&self, key: &str) -> Option<String> {
        self.matter
            .get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    /// String items of a front-matter list field; absent or malformed fields
    /// yield an empty list.
    pub fn str_list_field(&self, key: &str) -> Vec<String> {
        self.matter
            .get(key)
            .and_then(Value::as_sequence)
            .map(|seq| {
                seq.iter()
                    .filter_map(Value::as_str)
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Set a string field, replacing any existing value.
    pub fn set_str(&mut self, key: &str, value: &str) {
        self.matter.insert(
            Value::String(key.to_string()),
            Value::String(value.to_string()),
        );
    }

    /// Set a list-of-strings field, replacing any existing value.
    pub fn set_str_list(&mut self, key: &str, values: &[String]) {
        let seq = values
            .iter()
            .map(|v| Value::String(v.clone()))
            .collect::<Vec<_>>();
        self.matter
            .insert(Value::String(key.to_string()), Value::Sequence(seq));
    }
}

/// Parse a front-matter document from raw text.
pub fn parse(text: &str) -> EngineResult<Document> {
    let rest = text.strip_prefix("---").ok_or_else(|| {
        EngineError::FrontMatter("document does not start with a front matter fence".to_string())
    })?;
    let end = rest.find("\n---").ok_or_else(|| {
        EngineError::FrontMatter("unterminated front matter fence".to_string())
    })?;
    let raw_matter = &rest[..end];
    let matter: Mapping = if raw_matter.trim().is_empty() {
        Mapping::new()
    } else {
        serde_yaml::from_str(raw_matter)?
    };
    let after = &rest[end + 4..];
    let body = after.trim_start_matches('\n').to_string();
    Ok(Document { matter, body })
}

/// Render a document back to its on-disk form.
pub fn render(doc: &Document) -> EngineResult<String> {
    let yaml = serde_yaml::to_string(&doc.matter)?;
    if doc.body.trim().is_empty() {
        Ok(format!("---\n{yaml}---\n"))
    } else {
        Ok(format!("---\n{yaml}---\n\n{}", doc.body))
    }
}

/// Load and parse a document from disk.
pub fn load(path: &Path) -> EngineResult<Document> {
    let text = fs::read_to_string(path)?;
    parse(&text)
}

/// Render and write a document back to disk.
pub fn save(path: &Path, doc: &Document) -> EngineResult<()> {
    let text = render(doc)?;
    fs::write(path, text)?;
    Ok(())
}
