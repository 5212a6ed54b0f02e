//! Data models for conversation transcripts.
//!
//! This module defines the data structures used throughout the application:
//!
//! - [`ConversationRow`] - One row of the exported analysis table, as deserialized
//! - [`Conversation`] - A row whose `conversation_history` is usable by the grouper
//! - [`RawRecord`] - One unprocessed element of a conversation history
//! - [`Speaker`], [`NormalizedMessage`] - Output of the record normalizer
//! - [`Interaction`] - One customer message plus the agent replies that follow it
//!
//! Row identifiers use lenient deserializers (string or number) from the
//! `parsers::deserializers` module because the upstream table is not schema-controlled.

pub mod conversation;
pub mod interaction;

pub use conversation::{Conversation, ConversationRow, RawRecord};
pub use interaction::{Interaction, NormalizedMessage, Speaker};
