//! Command-line entry point
//!
//! `run()` merges flags, environment and the config file, installs the
//! tracing subscriber and dispatches to a subcommand.

pub mod commands;
pub mod logging;

pub use commands::{Cli, Commands, CorpusStats, render_conversation_text, run};
