use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use anyhow::{Context, Result};
use tracing_subscriber::EnvFilter;

/// Where log lines go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogTarget<'a> {
    /// Plain commands log to stderr
    Stderr,
    /// The TUI owns the terminal; logs are dropped unless a file is given
    Discard,
    File(&'a Path),
}

/// Build the log filter. An explicit level wins over `RUST_LOG`, which wins over `fallback`.
pub fn build_filter(explicit: Option<&str>, fallback: &str) -> Result<EnvFilter> {
    if let Some(level) = explicit {
        return EnvFilter::try_new(level).with_context(|| format!("Invalid log level: {}", level));
    }

    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(fallback)
            .with_context(|| format!("Invalid log level: {}", fallback)),
    }
}

/// Install the global tracing subscriber
pub fn init_logging(filter: EnvFilter, target: LogTarget<'_>) -> Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(filter).with_target(false);

    let installed = match target {
        LogTarget::Stderr => builder.with_writer(std::io::stderr).try_init(),
        LogTarget::Discard => builder.with_writer(std::io::sink).try_init(),
        LogTarget::File(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file: {}", path.display()))?;
            builder.with_ansi(false).with_writer(Mutex::new(file)).try_init()
        }
    };

    installed.map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_level_wins() {
        let filter = build_filter(Some("debug"), "warn").unwrap();
        assert_eq!(filter.to_string(), "debug");
    }

    #[test]
    fn test_directive_level() {
        let filter = build_filter(Some("transcript_navigator=trace"), "warn").unwrap();
        assert_eq!(filter.to_string(), "transcript_navigator=trace");
    }

    #[test]
    fn test_invalid_level_is_error() {
        let err = build_filter(Some("transcript_navigator=loudest"), "warn").unwrap_err();
        assert!(err.to_string().contains("Invalid log level"));
    }
}
