//! Navigation over loaded conversations and their interactions.
//!
//! [`Navigator`] owns the load state, the index of the active conversation and
//! the index of the active interaction within it. The active conversation's
//! interactions are regrouped every time the selection changes; nothing is
//! cached across selections.

use tracing::debug;

use crate::grouping::{GroupingStats, group_with_stats};
use crate::models::{Conversation, Interaction};

/// Where the conversation list currently stands
#[derive(Debug, Clone, PartialEq)]
pub enum DataState {
    Loading,
    Failed(String),
    Loaded(Vec<Conversation>),
}

/// What the presentation layer should show
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewState<'a> {
    Loading,
    Error(&'a str),
    NoConversations,
    NoInteractions { conversation: &'a Conversation },
    Ready { conversation: &'a Conversation, interaction: &'a Interaction },
}

/// One of the three timeline positions around the active interaction
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimelineSlot<'a> {
    Empty,
    Interaction { index: usize, interaction: &'a Interaction, current: bool },
}

/// Conversations sharing a session id, with their positions in the full list
#[derive(Debug, Clone, PartialEq)]
pub struct SessionGroup<'a> {
    pub session_id: &'a str,
    pub conversations: Vec<(usize, &'a Conversation)>,
}

#[derive(Debug)]
pub struct Navigator {
    data: DataState,
    conversation_idx: usize,
    interaction_idx: usize,
    interactions: Vec<Interaction>,
    stats: GroupingStats,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::loading()
    }
}

impl Navigator {
    pub fn loading() -> Self {
        Self {
            data: DataState::Loading,
            conversation_idx: 0,
            interaction_idx: 0,
            interactions: Vec::new(),
            stats: GroupingStats::default(),
        }
    }

    /// Build a navigator from the outcome of a load
    pub fn from_load(result: anyhow::Result<Vec<Conversation>>) -> Self {
        let mut navigator = Self::loading();
        match result {
            Ok(conversations) => navigator.set_loaded(conversations),
            Err(e) => navigator.set_failed(format!("{:#}", e)),
        }
        navigator
    }

    pub fn set_loading(&mut self) {
        self.data = DataState::Loading;
        self.reset_selection();
    }

    pub fn set_failed(&mut self, message: impl Into<String>) {
        self.data = DataState::Failed(message.into());
        self.reset_selection();
    }

    pub fn set_loaded(&mut self, conversations: Vec<Conversation>) {
        self.data = DataState::Loaded(conversations);
        self.reset_selection();
        self.regroup();
    }

    pub fn data_state(&self) -> &DataState {
        &self.data
    }

    pub fn conversations(&self) -> &[Conversation] {
        match &self.data {
            DataState::Loaded(conversations) => conversations.as_slice(),
            _ => &[],
        }
    }

    pub fn conversation_index(&self) -> usize {
        self.conversation_idx
    }

    pub fn interaction_index(&self) -> usize {
        self.interaction_idx
    }

    pub fn current_conversation(&self) -> Option<&Conversation> {
        self.conversations().get(self.conversation_idx)
    }

    pub fn current_session(&self) -> Option<&str> {
        self.current_conversation().map(Conversation::session_label)
    }

    /// Interactions of the active conversation
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    pub fn current_interaction(&self) -> Option<&Interaction> {
        self.interactions.get(self.interaction_idx)
    }

    /// Drop counters from grouping the active conversation
    pub fn grouping_stats(&self) -> GroupingStats {
        self.stats
    }

    pub fn view_state(&self) -> ViewState<'_> {
        match &self.data {
            DataState::Loading => ViewState::Loading,
            DataState::Failed(message) => ViewState::Error(message),
            DataState::Loaded(conversations) => match conversations.get(self.conversation_idx) {
                None => ViewState::NoConversations,
                Some(conversation) => match self.interactions.get(self.interaction_idx) {
                    None => ViewState::NoInteractions { conversation },
                    Some(interaction) => ViewState::Ready { conversation, interaction },
                },
            },
        }
    }

    pub fn has_next(&self) -> bool {
        self.interaction_idx + 1 < self.interactions.len()
    }

    pub fn has_previous(&self) -> bool {
        self.interaction_idx > 0
    }

    pub fn has_next_conversation(&self) -> bool {
        self.conversation_idx + 1 < self.conversations().len()
    }

    pub fn has_previous_conversation(&self) -> bool {
        self.conversation_idx > 0
    }

    /// Step to the next interaction; returns whether the position changed
    pub fn next_interaction(&mut self) -> bool {
        if !self.has_next() {
            return false;
        }
        self.interaction_idx += 1;
        true
    }

    pub fn previous_interaction(&mut self) -> bool {
        if !self.has_previous() {
            return false;
        }
        self.interaction_idx -= 1;
        true
    }

    pub fn first_interaction(&mut self) -> bool {
        self.jump_to_interaction(0)
    }

    pub fn last_interaction(&mut self) -> bool {
        match self.interactions.len() {
            0 => false,
            len => self.jump_to_interaction(len - 1),
        }
    }

    /// Jump to an interaction by position. Out-of-range positions are ignored.
    pub fn jump_to_interaction(&mut self, index: usize) -> bool {
        if index >= self.interactions.len() || index == self.interaction_idx {
            return false;
        }
        self.interaction_idx = index;
        true
    }

    pub fn next_conversation(&mut self) -> bool {
        if !self.has_next_conversation() {
            return false;
        }
        self.select_conversation(self.conversation_idx + 1)
    }

    pub fn previous_conversation(&mut self) -> bool {
        if !self.has_previous_conversation() {
            return false;
        }
        self.select_conversation(self.conversation_idx - 1)
    }

    /// Make the conversation at `index` active, restarting at its first interaction.
    /// Out-of-range positions are ignored.
    pub fn select_conversation(&mut self, index: usize) -> bool {
        if index >= self.conversations().len() {
            return false;
        }
        self.conversation_idx = index;
        self.interaction_idx = 0;
        self.regroup();
        true
    }

    /// Make the first conversation of `session_id` active
    pub fn select_session(&mut self, session_id: &str) -> bool {
        let position = self
            .conversations()
            .iter()
            .position(|conversation| conversation.session_label() == session_id);

        match position {
            Some(index) => self.select_conversation(index),
            None => {
                debug!(session_id, "no conversation for requested session");
                false
            }
        }
    }

    /// Previous, current and next interaction around the active one
    pub fn timeline_window(&self) -> [TimelineSlot<'_>; 3] {
        let slot = |index: Option<usize>, current: bool| match index
            .and_then(|i| self.interactions.get(i).map(|interaction| (i, interaction)))
        {
            Some((index, interaction)) => TimelineSlot::Interaction { index, interaction, current },
            None => TimelineSlot::Empty,
        };

        [
            slot(self.interaction_idx.checked_sub(1), false),
            slot(Some(self.interaction_idx), true),
            slot(Some(self.interaction_idx + 1), false),
        ]
    }

    /// Conversations grouped by session id, in order of first appearance
    pub fn session_groups(&self) -> Vec<SessionGroup<'_>> {
        let mut groups: Vec<SessionGroup<'_>> = Vec::new();

        for (index, conversation) in self.conversations().iter().enumerate() {
            let session_id = conversation.session_label();
            match groups.iter_mut().find(|group| group.session_id == session_id) {
                Some(group) => group.conversations.push((index, conversation)),
                None => groups
                    .push(SessionGroup { session_id, conversations: vec![(index, conversation)] }),
            }
        }

        groups
    }

    fn reset_selection(&mut self) {
        self.conversation_idx = 0;
        self.interaction_idx = 0;
        self.interactions.clear();
        self.stats = GroupingStats::default();
    }

    fn regroup(&mut self) {
        let (interactions, stats) = match self.current_conversation() {
            Some(conversation) => group_with_stats(&conversation.history),
            None => (Vec::new(), GroupingStats::default()),
        };
        self.interactions = interactions;
        self.stats = stats;
    }
}
