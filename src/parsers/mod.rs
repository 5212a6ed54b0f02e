//! Snapshot parsers for exported conversation tables
//!
//! # Error Handling Strategy
//!
//! This module follows a **graceful degradation** approach suitable for CLI tools:
//!
//! - **Individual row failures**: Rows that fail to deserialize (missing `id`, wrong
//!   types, malformed JSONL lines) are logged as warnings and skipped.
//!
//! - **Catastrophic failure detection**: If >50% of a file's rows fail, or >100 consecutive
//!   rows fail, the file is rejected. In directory mode, the load fails when >50% of the
//!   snapshot files are rejected.
//!
//! - **Upstream errors**: A snapshot saved from the table API that carries a non-null
//!   `error` object is surfaced as `Database error: <message>`.
//!
//! - **Error propagation**: Uses `anyhow::Result` with context. Callers (the CLI and the
//!   TUI loader thread) render the message; they never match on error types.

pub mod deserializers;
pub mod rows;

pub use rows::{LoadOptions, load_conversations, load_conversations_with, parse_rows_file};
