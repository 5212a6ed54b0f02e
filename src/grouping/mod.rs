//! Conversation normalization and interaction grouping
//!
//! # Error Handling Strategy
//!
//! Nothing in this module fails. Histories are written by producers that do
//! not share a schema, so malformed records are an expected steady state:
//!
//! - **Unrecognized records**: Records matching no known shape, or matching one
//!   but yielding no text, are skipped and counted in [`GroupingStats`].
//!
//! - **Orphan agent messages**: Agent messages that arrive before the first
//!   customer message have no interaction to join and are skipped and counted.
//!
//! - **Empty results**: A history with no usable records groups into an empty
//!   sequence, which callers present as "nothing to show".

pub mod grouper;
pub mod normalizer;

pub use grouper::{GroupingStats, InteractionGrouper, group_interactions, group_with_stats};
pub use normalizer::{NormalizedRecord, conversation_preview, normalize};
