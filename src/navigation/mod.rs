//! Navigation state for the transcript viewer
//!
//! [`Navigator`] owns the loaded conversations and the selected
//! conversation/interaction indices. [`selection`] keeps the selected session
//! in a URL query parameter so a view can be reopened or shared.

pub mod controller;
pub mod selection;

pub use controller::{DataState, Navigator, SessionGroup, TimelineSlot, ViewState};
pub use selection::{SessionSync, read_session_param, shareable_url, write_session_param};
