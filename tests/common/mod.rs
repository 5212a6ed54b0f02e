//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value, json};
use tempfile::TempDir;

/// Builder for a directory of snapshot files
pub struct SnapshotDirBuilder {
    temp_dir: TempDir,
}

impl SnapshotDirBuilder {
    /// Create a new builder with an empty directory
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self { temp_dir }
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    /// Add a file with raw content at a path relative to the directory root
    pub fn with_file(self, relative: &str, content: &str) -> Self {
        let path = self.temp_dir.path().join(relative);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).expect("Failed to create snapshot subdirectory");
        }
        fs::write(path, content).expect("Failed to write snapshot file");
        self
    }

    /// Add a `.json` snapshot holding the rows as a plain array
    pub fn with_json_rows(self, relative: &str, rows: &[RowBuilder]) -> Self {
        let content = rows_array(rows).to_string();
        self.with_file(relative, &content)
    }

    /// Add a `.json` snapshot in the hosted table API envelope
    pub fn with_api_response(self, relative: &str, rows: &[RowBuilder]) -> Self {
        let content = json!({"data": rows_array(rows), "error": null}).to_string();
        self.with_file(relative, &content)
    }

    /// Add a `.jsonl` snapshot, one row per line
    pub fn with_jsonl_rows(self, relative: &str, rows: &[RowBuilder]) -> Self {
        let content = rows.iter().map(|r| r.to_value().to_string()).collect::<Vec<_>>().join("\n");
        self.with_file(relative, &content)
    }

    pub fn file_path(&self, relative: &str) -> PathBuf {
        self.temp_dir.path().join(relative)
    }

    /// Build and return the temp directory (consumes self)
    pub fn build(self) -> TempDir {
        self.temp_dir
    }
}

impl Default for SnapshotDirBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn rows_array(rows: &[RowBuilder]) -> Value {
    Value::Array(rows.iter().map(RowBuilder::to_value).collect())
}

/// Builder for one row of the conversation analysis table
#[derive(Clone)]
pub struct RowBuilder {
    id: Value,
    session_id: Value,
    history: Option<Value>,
    extra: Map<String, Value>,
}

impl RowBuilder {
    /// A row with a two-message bare-string history
    pub fn new(id: i64, session_id: &str) -> Self {
        Self {
            id: json!(id),
            session_id: json!(session_id),
            history: Some(json!(["Hello, I need help", "Sure, what can I do?"])),
            extra: Map::new(),
        }
    }

    pub fn string_id(mut self, id: &str) -> Self {
        self.id = json!(id);
        self
    }

    /// Store a null `session_id`
    pub fn without_session(mut self) -> Self {
        self.session_id = Value::Null;
        self
    }

    pub fn history(mut self, history: Value) -> Self {
        self.history = Some(history);
        self
    }

    /// Drop the `conversation_history` column entirely
    pub fn without_history(mut self) -> Self {
        self.history = None;
        self
    }

    /// Set an analysis column (status, journeys, timing)
    pub fn field(mut self, key: &str, value: Value) -> Self {
        self.extra.insert(key.to_string(), value);
        self
    }

    pub fn to_value(&self) -> Value {
        let mut row = self.extra.clone();
        row.insert("id".to_string(), self.id.clone());
        row.insert("session_id".to_string(), self.session_id.clone());
        if let Some(history) = &self.history {
            row.insert("conversation_history".to_string(), history.clone());
        }
        Value::Object(row)
    }
}

/// A history alternating customer and agent bare strings, `turns` exchanges long
pub fn alternating_history(turns: usize) -> Value {
    let records: Vec<Value> = (0..turns)
        .flat_map(|i| [json!(format!("Question {}", i + 1)), json!(format!("Answer {}", i + 1))])
        .collect();
    Value::Array(records)
}
