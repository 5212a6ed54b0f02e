use std::cmp::Ordering;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use rayon::prelude::*;
use serde_json::Value;
use tracing::{debug, info, warn};
use walkdir::WalkDir;

use crate::models::{Conversation, ConversationRow};
use crate::utils::{DEFAULT_MAX_FILE_SIZE_BYTES, safe_open_file};

const MAX_CONSECUTIVE_ERRORS: usize = 100;

/// Maximum directory depth scanned for snapshot files
const MAX_SCAN_DEPTH: usize = 4;

/// Options controlling how snapshots are read
#[derive(Debug, Clone, Copy)]
pub struct LoadOptions {
    pub max_file_size: u64,
}

impl Default for LoadOptions {
    fn default() -> Self {
        Self { max_file_size: DEFAULT_MAX_FILE_SIZE_BYTES }
    }
}

/// Tracks row-level failures against the corruption thresholds
struct ParseTally<'a> {
    path: &'a Path,
    rows: Vec<ConversationRow>,
    total: usize,
    skipped: usize,
    consecutive_errors: usize,
}

impl<'a> ParseTally<'a> {
    fn new(path: &'a Path) -> Self {
        Self { path, rows: Vec::new(), total: 0, skipped: 0, consecutive_errors: 0 }
    }

    fn accept(&mut self, row: ConversationRow) {
        self.total += 1;
        self.rows.push(row);
        self.consecutive_errors = 0;
    }

    fn reject(&mut self, location: &str, error: impl std::fmt::Display) -> Result<()> {
        warn!("Failed to parse {} in {}: {}", location, self.path.display(), error);
        self.total += 1;
        self.skipped += 1;
        self.consecutive_errors += 1;

        if self.consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
            bail!(
                "Too many consecutive parse errors ({}) in {} - file may be corrupted",
                self.consecutive_errors,
                self.path.display()
            );
        }
        Ok(())
    }

    fn finish(self) -> Result<Vec<ConversationRow>> {
        if self.total > 0 {
            let failure_rate = (self.skipped as f64) / (self.total as f64);
            if failure_rate > 0.5 {
                bail!(
                    "Too many parse failures in {}: {} of {} rows failed ({:.1}%)",
                    self.path.display(),
                    self.skipped,
                    self.total,
                    failure_rate * 100.0
                );
            }
        }

        if self.skipped > 0 {
            info!(
                "Parsed {}: {} rows ({} skipped)",
                self.path.display(),
                self.rows.len(),
                self.skipped
            );
        }

        Ok(self.rows)
    }
}

fn is_snapshot_file(path: &Path) -> bool {
    matches!(path.extension().and_then(|ext| ext.to_str()), Some("json") | Some("jsonl"))
}

/// Parse one snapshot file into table rows.
///
/// `.jsonl` files hold one row per line. Any other file must be a JSON document:
/// either an array of rows or an API response object `{"data": [...], "error": ...}`.
/// Malformed rows are logged and skipped; the file fails when more than half of its
/// rows, or more than 100 consecutive rows, cannot be parsed.
pub fn parse_rows_file(path: &Path, options: &LoadOptions) -> Result<Vec<ConversationRow>> {
    let file = safe_open_file(path, options.max_file_size)?;

    if path.extension().and_then(|ext| ext.to_str()) == Some("jsonl") {
        parse_jsonl(BufReader::new(file), path)
    } else {
        let mut content = String::new();
        BufReader::new(file)
            .read_to_string(&mut content)
            .with_context(|| format!("Failed to read snapshot file: {}", path.display()))?;
        parse_json_document(&content, path)
    }
}

fn parse_jsonl(reader: impl BufRead, path: &Path) -> Result<Vec<ConversationRow>> {
    let mut tally = ParseTally::new(path);

    for (line_num, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line from snapshot file")?;

        // Skip empty lines
        if line.trim().is_empty() {
            continue;
        }

        match serde_json::from_str::<ConversationRow>(&line) {
            Ok(row) => tally.accept(row),
            Err(e) => tally.reject(&format!("line {}", line_num + 1), e)?,
        }
    }

    tally.finish()
}

fn parse_json_document(content: &str, path: &Path) -> Result<Vec<ConversationRow>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let document: Value = serde_json::from_str(content)
        .with_context(|| format!("Invalid JSON in snapshot file: {}", path.display()))?;

    let items = match document {
        Value::Array(items) => items,
        Value::Object(mut response) => {
            if let Some(error) = response.remove("error").filter(|e| !e.is_null()) {
                let message = error
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .unwrap_or_else(|| error.to_string());
                bail!("Database error: {}", message);
            }
            match response.remove("data") {
                Some(Value::Array(items)) => items,
                Some(Value::Null) | None => Vec::new(),
                Some(_) => bail!("Snapshot 'data' must be an array: {}", path.display()),
            }
        }
        _ => bail!("Snapshot must be an array of rows or a response object: {}", path.display()),
    };

    let mut tally = ParseTally::new(path);
    for (idx, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<ConversationRow>(item) {
            Ok(row) => tally.accept(row),
            Err(e) => tally.reject(&format!("row {}", idx + 1), e)?,
        }
    }

    tally.finish()
}

/// Find snapshot files (`.json`, `.jsonl`) below a directory, in path order.
/// Symlinks are not followed.
pub fn discover_snapshot_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).max_depth(MAX_SCAN_DEPTH).follow_links(false).sort_by_file_name()
    {
        let entry = entry
            .with_context(|| format!("Failed to scan snapshot directory: {}", dir.display()))?;
        if entry.file_type().is_file() && is_snapshot_file(entry.path()) {
            files.push(entry.into_path());
        }
    }

    Ok(files)
}

fn load_directory(dir: &Path, options: &LoadOptions) -> Result<Vec<ConversationRow>> {
    let files = discover_snapshot_files(dir)?;

    let results: Vec<(PathBuf, Result<Vec<ConversationRow>>)> = files
        .into_par_iter()
        .map(|file| {
            let parsed = parse_rows_file(&file, options);
            (file, parsed)
        })
        .collect();

    let mut rows = Vec::new();
    let mut files_success = 0;
    let mut files_failed = 0;

    for (file, parsed) in results {
        match parsed {
            Ok(file_rows) => {
                files_success += 1;
                rows.extend(file_rows);
            }
            Err(e) => {
                files_failed += 1;
                warn!("Failed to parse snapshot file {}: {:#}", file.display(), e);
            }
        }
    }

    // Fail if >50% of snapshot files failed
    let total_files = files_success + files_failed;
    if total_files > 0 {
        let failure_rate = files_failed as f64 / total_files as f64;
        if failure_rate > 0.5 {
            bail!(
                "Loading failed: {}/{} snapshot files failed to parse ({}% failure rate)",
                files_failed,
                total_files,
                (failure_rate * 100.0) as u32
            );
        }
    }

    info!("Read {} rows ({} files parsed, {} failed)", rows.len(), files_success, files_failed);
    Ok(rows)
}

/// Compare identifiers numerically when both are integers, textually otherwise
pub fn compare_ids(a: &str, b: &str) -> Ordering {
    match (a.parse::<i64>(), b.parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => a.cmp(b),
    }
}

/// Order conversations by session id (rows without one last), then by row id
pub fn order_conversations(conversations: &mut [Conversation]) {
    conversations.sort_by(|a, b| {
        let by_session = match (&a.session_id, &b.session_id) {
            (Some(x), Some(y)) => compare_ids(x, y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        };
        by_session.then_with(|| compare_ids(&a.id, &b.id))
    });
}

/// Load every conversation with a usable history from a snapshot file or directory
///
/// # Errors
///
/// Returns an error if:
/// - The path does not exist or cannot be read
/// - A file exceeds the size limit
/// - The snapshot reports a database error
/// - Parse failure thresholds are exceeded
pub fn load_conversations_with(path: &Path, options: &LoadOptions) -> Result<Vec<Conversation>> {
    let rows = if path.is_dir() {
        load_directory(path, options)?
    } else {
        parse_rows_file(path, options)?
    };

    let row_count = rows.len();
    let mut conversations: Vec<Conversation> =
        rows.into_iter().filter_map(Conversation::from_row).collect();

    let excluded = row_count - conversations.len();
    if excluded > 0 {
        debug!(excluded, "excluded rows without conversation_history");
    }

    order_conversations(&mut conversations);
    info!(
        "Loaded {} conversations with conversation_history from {}",
        conversations.len(),
        path.display()
    );

    Ok(conversations)
}

/// [`load_conversations_with`] using default options
pub fn load_conversations(path: &Path) -> Result<Vec<Conversation>> {
    load_conversations_with(path, &LoadOptions::default())
}
