//! Transcript Navigator - Browse customer/agent conversations one interaction at a time
//!
//! This library reads exported conversation-analysis tables and turns each
//! row's free-form `conversation_history` into a sequence of interactions: one
//! customer message plus the agent replies that follow it. It supports:
//!
//! - Loading `.json`/`.jsonl` snapshots, or whole directories of them
//! - Normalizing history records written by producers with different schemas
//! - Grouping normalized messages into numbered interactions
//! - Navigating conversations and interactions, with the selected session kept
//!   in a shareable URL
//!
//! # Example
//!
//! ```no_run
//! use std::path::PathBuf;
//! use transcript_navigator::{group_interactions, load_conversations};
//!
//! let conversations = load_conversations(&PathBuf::from("exports/conversation_analysis.json"))?;
//! for conversation in &conversations {
//!     let interactions = group_interactions(&conversation.history);
//!     println!("{}: {} interactions", conversation.session_label(), interactions.len());
//! }
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cli;
pub mod clipboard;
pub mod config;
pub mod details;
pub mod grouping;
pub mod models;
pub mod navigation;
pub mod parsers;
pub mod tui;
pub mod utils;

// Re-export commonly used types
pub use grouping::{group_interactions, normalize};
pub use models::{Conversation, Interaction, NormalizedMessage, Speaker};
pub use navigation::Navigator;
pub use parsers::load_conversations;
pub use utils::paths::format_path_with_tilde;
