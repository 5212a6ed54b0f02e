//! Interaction grouper: folds a normalized history into customer/agent exchanges.
//!
//! The grouper is a two-state machine. While no interaction is open, agent
//! messages have nothing to attach to and are dropped. A customer message
//! (or the customer half of a combined record) closes the open interaction
//! and opens the next one. Closing appends to the output, so an
//! interaction's number is its 1-based output position.

use tracing::{debug, trace};

use super::normalizer::{NormalizedRecord, normalize, record_annotations};
use crate::models::{Interaction, NormalizedMessage, RawRecord, Speaker};

/// Counters describing what happened to each record of a history
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupingStats {
    pub records: usize,
    /// Records no shape could turn into a message
    pub dropped_unusable: usize,
    /// Agent messages seen before any customer message
    pub dropped_orphan_agent: usize,
}

impl GroupingStats {
    pub fn dropped(&self) -> usize {
        self.dropped_unusable + self.dropped_orphan_agent
    }

    pub fn absorb(&mut self, other: GroupingStats) {
        self.records += other.records;
        self.dropped_unusable += other.dropped_unusable;
        self.dropped_orphan_agent += other.dropped_orphan_agent;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum GroupState {
    NoOpenGroup,
    OpenGroup(Interaction),
}

/// Single-pass builder of the interaction sequence for one conversation
#[derive(Debug)]
pub struct InteractionGrouper {
    state: GroupState,
    output: Vec<Interaction>,
    stats: GroupingStats,
}

impl Default for InteractionGrouper {
    fn default() -> Self {
        Self::new()
    }
}

impl InteractionGrouper {
    pub fn new() -> Self {
        Self { state: GroupState::NoOpenGroup, output: Vec::new(), stats: GroupingStats::default() }
    }

    /// Feed the record found at `position` in the history
    pub fn push(&mut self, position: usize, record: &RawRecord) {
        self.stats.records += 1;

        match normalize(record, position) {
            Some(NormalizedRecord::Exchange { customer, agent }) => {
                self.open(customer, record);
                if let Some(agent) = agent {
                    self.answer(agent);
                }
            }
            Some(NormalizedRecord::Message(NormalizedMessage { speaker, text })) => match speaker {
                Speaker::Customer => self.open(text, record),
                Speaker::Agent => self.answer(text),
            },
            None => {
                trace!(position, "skipping record with no usable speaker and text");
                self.stats.dropped_unusable += 1;
            }
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(self.state, GroupState::OpenGroup(_))
    }

    /// Interactions closed so far
    pub fn closed(&self) -> &[Interaction] {
        &self.output
    }

    pub fn stats(&self) -> GroupingStats {
        self.stats
    }

    /// Close any open interaction and return the full sequence
    pub fn finish(mut self) -> (Vec<Interaction>, GroupingStats) {
        self.close();
        (self.output, self.stats)
    }

    fn open(&mut self, customer_message: String, record: &RawRecord) {
        self.close();

        let (result, timestamp) = record_annotations(record);
        self.state = GroupState::OpenGroup(Interaction {
            customer_message,
            agent_messages: Vec::new(),
            interaction_number: self.output.len() + 1,
            result,
            timestamp,
        });
    }

    fn answer(&mut self, text: String) {
        match &mut self.state {
            GroupState::OpenGroup(interaction) => interaction.agent_messages.push(text),
            GroupState::NoOpenGroup => {
                trace!("dropping agent message that precedes any customer message");
                self.stats.dropped_orphan_agent += 1;
            }
        }
    }

    fn close(&mut self) {
        if let GroupState::OpenGroup(interaction) =
            std::mem::replace(&mut self.state, GroupState::NoOpenGroup)
        {
            self.output.push(interaction);
        }
    }
}

/// Group a conversation history into interactions and report dropped records
pub fn group_with_stats(history: &[RawRecord]) -> (Vec<Interaction>, GroupingStats) {
    let mut grouper = InteractionGrouper::new();
    for (position, record) in history.iter().enumerate() {
        grouper.push(position, record);
    }

    let (interactions, stats) = grouper.finish();
    debug!(
        records = stats.records,
        interactions = interactions.len(),
        dropped = stats.dropped(),
        "grouped conversation history"
    );
    (interactions, stats)
}

/// Group a conversation history into interactions
pub fn group_interactions(history: &[RawRecord]) -> Vec<Interaction> {
    group_with_stats(history).0
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_starts_with_no_open_group() {
        let grouper = InteractionGrouper::new();
        assert!(!grouper.is_open());
        assert!(grouper.closed().is_empty());
    }

    #[test]
    fn test_customer_opens_group_without_closing_anything() {
        let mut grouper = InteractionGrouper::new();
        grouper.push(0, &json!({"customer": "first"}));

        assert!(grouper.is_open());
        assert!(grouper.closed().is_empty());
    }

    #[test]
    fn test_second_customer_closes_previous_group() {
        let mut grouper = InteractionGrouper::new();
        grouper.push(0, &json!({"customer": "first"}));
        grouper.push(1, &json!({"ai_agent": "reply"}));
        grouper.push(2, &json!({"customer": "second"}));

        assert!(grouper.is_open());
        assert_eq!(grouper.closed().len(), 1);
        assert_eq!(grouper.closed()[0].customer_message, "first");
        assert_eq!(grouper.closed()[0].agent_messages, vec!["reply"]);
    }

    #[test]
    fn test_agent_without_open_group_is_counted_and_dropped() {
        let mut grouper = InteractionGrouper::new();
        grouper.push(0, &json!({"ai_agent": "too early"}));

        assert!(!grouper.is_open());
        assert_eq!(grouper.stats().dropped_orphan_agent, 1);

        let (interactions, _) = grouper.finish();
        assert!(interactions.is_empty());
    }

    #[test]
    fn test_exchange_closes_open_group_and_answers_new_one() {
        let mut grouper = InteractionGrouper::new();
        grouper.push(0, &json!({"customer": "first"}));
        grouper.push(1, &json!({"user": "second", "assistant": "answer"}));

        assert_eq!(grouper.closed().len(), 1);
        let (interactions, _) = grouper.finish();
        assert_eq!(interactions[1].customer_message, "second");
        assert_eq!(interactions[1].agent_messages, vec!["answer"]);
        assert_eq!(interactions[1].interaction_number, 2);
    }

    #[test]
    fn test_unusable_record_leaves_state_untouched() {
        let mut grouper = InteractionGrouper::new();
        grouper.push(0, &json!({"customer": "first"}));
        grouper.push(1, &json!({"noise": true}));
        grouper.push(2, &json!({"ai_agent": "reply"}));

        assert!(grouper.is_open());
        assert_eq!(grouper.stats().dropped_unusable, 1);
        let (interactions, stats) = grouper.finish();
        assert_eq!(interactions[0].agent_messages, vec!["reply"]);
        assert_eq!(stats.records, 3);
    }

    #[test]
    fn test_finish_closes_trailing_group() {
        let mut grouper = InteractionGrouper::new();
        grouper.push(0, &json!("only customer"));
        let (interactions, _) = grouper.finish();

        assert_eq!(interactions.len(), 1);
        assert!(interactions[0].agent_messages.is_empty());
    }

    #[test]
    fn test_annotations_come_from_opening_record() {
        let history = vec![
            json!({"customer": "hi", "result": "success", "timestamp": "2025-01-15T10:30:00Z"}),
            json!({"ai_agent": "hello", "result": "failed"}),
            json!({"customer": "bye"}),
        ];

        let interactions = group_interactions(&history);
        assert_eq!(interactions[0].result.as_deref(), Some("success"));
        assert!(interactions[0].timestamp.is_some());
        assert!(interactions[1].result.is_none());
        assert!(interactions[1].timestamp.is_none());
    }

    #[test]
    fn test_multiple_agent_messages_keep_order() {
        let history = vec![json!("q"), json!({"ai_agent": "a1"}), json!({"ai_agent": "a2"})];
        let interactions = group_interactions(&history);

        assert_eq!(interactions.len(), 1);
        assert_eq!(interactions[0].agent_messages, vec!["a1", "a2"]);
    }

    #[test]
    fn test_stats_absorb() {
        let mut total = GroupingStats::default();
        total.absorb(GroupingStats { records: 3, dropped_unusable: 1, dropped_orphan_agent: 0 });
        total.absorb(GroupingStats { records: 2, dropped_unusable: 0, dropped_orphan_agent: 2 });

        assert_eq!(total.records, 5);
        assert_eq!(total.dropped(), 3);
    }
}
