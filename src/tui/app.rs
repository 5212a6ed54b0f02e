//! TUI application state and event handling.
//!
//! The `App` owns a [`Navigator`] and everything the terminal front end adds
//! around it:
//!
//! - **Background loading**: Snapshots are read on a worker thread; the result
//!   arrives over a channel while the UI shows the loading state
//! - **Conversation picker**: An overlay listing conversations grouped by session
//! - **Session sync**: Every conversation change is written back to the session URL
//! - **Status messages**: Transient feedback for share links, reloads and errors
//! - **Dirty state tracking**: Rendering only when state changes
//!
//! # Example
//!
//! ```rust,ignore
//! let loader: Loader = Arc::new(move || load_conversations(&path));
//! let mut app = App::new(loader, SessionSync::new(url), base_url, "rows.json");
//! app.run(&mut terminal)?;
//! ```

use std::sync::Arc;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Result;
use ratatui::Terminal;
use ratatui::backend::Backend;
use tracing::{debug, info, warn};

use super::events::{Action, poll_event};
use super::rendering::{RenderState, render_ui};
use crate::clipboard::copy_share_link;
use crate::models::Conversation;
use crate::navigation::{DataState, Navigator, SessionSync};

/// Duration for success status messages (milliseconds)
const STATUS_SUCCESS_DURATION_MS: u64 = 3000;
/// Duration for error status messages (milliseconds)
const STATUS_ERROR_DURATION_MS: u64 = 5000;

/// Produces the conversation list; runs on a worker thread
pub type Loader = Arc<dyn Fn() -> Result<Vec<Conversation>> + Send + Sync>;

/// Type of status message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Success,
    Error,
}

/// Transient status message with expiry
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub text: String,
    pub message_type: MessageType,
    pub expires_at: Instant,
}

pub struct App {
    navigator: Navigator,
    loader: Loader,
    pending_load: Option<Receiver<Result<Vec<Conversation>>>>,
    /// Session to select once the pending load completes
    pending_session: Option<String>,
    session_sync: SessionSync,
    base_url: String,
    source_label: String,
    /// Highlighted conversation while the picker is open
    picker: Option<usize>,
    should_quit: bool,
    status_message: Option<StatusMessage>,
    // Dirty state tracking for efficient rendering
    needs_redraw: bool,
    last_draw_time: Instant,
}

impl App {
    pub fn new(
        loader: Loader,
        session_sync: SessionSync,
        base_url: impl Into<String>,
        source_label: impl Into<String>,
    ) -> Self {
        let pending_session = session_sync.initial_session();

        Self {
            navigator: Navigator::loading(),
            loader,
            pending_load: None,
            pending_session,
            session_sync,
            base_url: base_url.into(),
            source_label: source_label.into(),
            picker: None,
            should_quit: false,
            status_message: None,
            needs_redraw: true, // Initial draw needed
            last_draw_time: Instant::now(),
        }
    }

    pub fn navigator(&self) -> &Navigator {
        &self.navigator
    }

    /// URL reflecting the current selection
    pub fn session_url(&self) -> &str {
        self.session_sync.url()
    }

    /// Start loading on a worker thread, replacing any load in flight
    pub fn start_load(&mut self) {
        let (tx, rx) = mpsc::channel();
        let loader = Arc::clone(&self.loader);

        thread::spawn(move || {
            // Receiver may be gone if a newer load replaced this one
            let _ = tx.send(loader());
        });

        self.navigator.set_loading();
        self.pending_load = Some(rx);
        self.picker = None;
        self.needs_redraw = true;
    }

    /// Take the load result if the worker has finished
    fn poll_load(&mut self) {
        let Some(rx) = &self.pending_load else {
            return;
        };

        match rx.try_recv() {
            Ok(result) => {
                self.pending_load = None;
                self.finish_load(result);
            }
            Err(TryRecvError::Empty) => {}
            Err(TryRecvError::Disconnected) => {
                self.pending_load = None;
                self.finish_load(Err(anyhow::anyhow!("Loader thread exited without a result")));
            }
        }
    }

    fn finish_load(&mut self, result: Result<Vec<Conversation>>) {
        match result {
            Ok(conversations) => {
                info!(count = conversations.len(), "Conversations loaded");
                self.navigator.set_loaded(conversations);

                if let Some(session) = self.pending_session.take()
                    && !self.navigator.select_session(&session)
                {
                    warn!(session = %session, "Requested session not found");
                    self.set_status(
                        format!("✗ Session {} not found", session),
                        MessageType::Error,
                        STATUS_ERROR_DURATION_MS,
                    );
                }
                self.sync_session();
            }
            Err(e) => {
                warn!(error = %format!("{:#}", e), "Loading conversations failed");
                self.navigator.set_failed(format!("{:#}", e));
            }
        }
        self.needs_redraw = true;
    }

    /// Set a transient status message with automatic expiry
    fn set_status(&mut self, text: impl Into<String>, message_type: MessageType, duration_ms: u64) {
        self.status_message = Some(StatusMessage {
            text: text.into(),
            message_type,
            expires_at: Instant::now() + Duration::from_millis(duration_ms),
        });
        self.needs_redraw = true;
    }

    /// Check and clear expired status messages
    fn check_and_clear_expired_status(&mut self) {
        let should_clear =
            self.status_message.as_ref().is_some_and(|msg| Instant::now() >= msg.expires_at);
        if should_clear {
            self.status_message = None;
            self.needs_redraw = true;
        }
    }

    fn sync_session(&mut self) {
        self.session_sync.sync(self.navigator.current_session());
        debug!(url = self.session_sync.url(), "Session selection synced");
    }

    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        if self.pending_load.is_none() && matches!(self.navigator.data_state(), DataState::Loading)
        {
            self.start_load();
        }

        while !self.should_quit {
            self.poll_load();
            self.check_and_clear_expired_status();

            // Draw if dirty or if it's been >100ms (for terminal resize handling)
            let now = Instant::now();
            let elapsed = now.duration_since(self.last_draw_time);
            if self.needs_redraw || elapsed >= Duration::from_millis(100) {
                terminal.draw(|f| {
                    let state = RenderState {
                        navigator: &self.navigator,
                        picker_selected: self.picker,
                        status_message: self.status_message.as_ref(),
                        source_label: &self.source_label,
                    };
                    render_ui(f, &state);
                })?;
                self.needs_redraw = false;
                self.last_draw_time = now;
            }

            let action = poll_event(Duration::from_millis(100))?;
            self.handle_action(action);
        }

        Ok(())
    }

    /// Handle a user action (extracted for testing)
    fn handle_action(&mut self, action: Action) {
        if self.picker.is_some() {
            self.handle_picker_action(action);
        } else {
            self.handle_viewer_action(action);
        }
    }

    fn handle_viewer_action(&mut self, action: Action) {
        let changed = match action {
            Action::Quit | Action::Back => {
                self.should_quit = true;
                false
            }
            Action::NextInteraction | Action::MoveDown => self.navigator.next_interaction(),
            Action::PreviousInteraction | Action::MoveUp => self.navigator.previous_interaction(),
            Action::FirstInteraction => self.navigator.first_interaction(),
            Action::LastInteraction => self.navigator.last_interaction(),
            Action::JumpTo(index) => self.navigator.jump_to_interaction(index),
            Action::NextConversation => self.change_conversation(Navigator::next_conversation),
            Action::PreviousConversation => {
                self.change_conversation(Navigator::previous_conversation)
            }
            Action::TogglePicker => {
                if self.navigator.conversations().is_empty() {
                    false
                } else {
                    self.picker = Some(self.navigator.conversation_index());
                    true
                }
            }
            Action::Select => false,
            Action::CopyShareLink => {
                self.copy_share_link();
                false
            }
            Action::Refresh => {
                self.refresh();
                false
            }
            Action::None => false,
        };

        if changed {
            self.needs_redraw = true;
        }
    }

    fn handle_picker_action(&mut self, action: Action) {
        let total = self.navigator.conversations().len();
        let Some(selected) = self.picker else {
            return;
        };

        match action {
            Action::Quit => self.should_quit = true,
            Action::Back | Action::TogglePicker => self.picker = None,
            Action::MoveUp => self.picker = Some(selected.saturating_sub(1)),
            Action::MoveDown => self.picker = Some((selected + 1).min(total.saturating_sub(1))),
            Action::FirstInteraction => self.picker = Some(0),
            Action::LastInteraction => self.picker = Some(total.saturating_sub(1)),
            Action::Select => {
                self.picker = None;
                self.change_conversation(|navigator| navigator.select_conversation(selected));
            }
            Action::Refresh => self.refresh(),
            _ => return,
        }
        self.needs_redraw = true;
    }

    fn change_conversation(&mut self, step: impl FnOnce(&mut Navigator) -> bool) -> bool {
        let changed = step(&mut self.navigator);
        if changed {
            self.sync_session();
        }
        changed
    }

    fn copy_share_link(&mut self) {
        let Some(session) = self.navigator.current_session().map(str::to_string) else {
            self.set_status("✗ No conversation selected", MessageType::Error, STATUS_ERROR_DURATION_MS);
            return;
        };

        match copy_share_link(&self.base_url, &session) {
            Ok(link) => {
                self.set_status(
                    format!("✓ Copied link: {}", link),
                    MessageType::Success,
                    STATUS_SUCCESS_DURATION_MS,
                );
            }
            Err(e) => {
                self.set_status(
                    format!("✗ Clipboard error: {}", e),
                    MessageType::Error,
                    STATUS_ERROR_DURATION_MS,
                );
            }
        }
    }

    /// Reload from the source, keeping the current session selected if it still exists
    fn refresh(&mut self) {
        if let Some(session) = self.navigator.current_session() {
            self.pending_session = Some(session.to_string());
        }
        self.start_load();
        self.set_status("Reloading conversations...", MessageType::Success, STATUS_SUCCESS_DURATION_MS);
    }
}
