/// Navigation integration tests
///
/// These tests load real snapshot files and drive the navigator the way the viewer does
mod common;

use common::{RowBuilder, SnapshotDirBuilder, alternating_history};
use serde_json::json;
use transcript_navigator::navigation::{
    Navigator, SessionSync, TimelineSlot, ViewState, read_session_param,
};
use transcript_navigator::{Conversation, load_conversations};

fn load_fixture() -> Vec<Conversation> {
    let rows = [
        RowBuilder::new(1, "alpha").history(alternating_history(3)),
        RowBuilder::new(2, "alpha").history(json!([{"ai_agent": "orphan"}])),
        RowBuilder::new(3, "beta").history(alternating_history(1)),
        RowBuilder::new(4, "gamma team").history(alternating_history(2)),
    ];
    let dir = SnapshotDirBuilder::new().with_json_rows("rows.json", &rows).build();
    load_conversations(&dir.path().join("rows.json")).unwrap()
}

fn timeline_numbers(navigator: &Navigator) -> Vec<Option<usize>> {
    navigator
        .timeline_window()
        .iter()
        .map(|slot| match slot {
            TimelineSlot::Empty => None,
            TimelineSlot::Interaction { interaction, .. } => Some(interaction.interaction_number),
        })
        .collect()
}

#[test]
fn test_walk_through_interactions() {
    let mut navigator = Navigator::from_load(Ok(load_fixture()));

    assert_eq!(navigator.interactions().len(), 3);
    assert_eq!(timeline_numbers(&navigator), vec![None, Some(1), Some(2)]);

    assert!(navigator.next_interaction());
    assert!(navigator.next_interaction());
    assert!(!navigator.next_interaction(), "stepping past the last interaction is a no-op");
    assert_eq!(navigator.interaction_index(), 2);
    assert_eq!(timeline_numbers(&navigator), vec![Some(2), Some(3), None]);

    assert!(navigator.first_interaction());
    assert!(!navigator.previous_interaction());
    assert_eq!(navigator.interaction_index(), 0);
}

#[test]
fn test_conversation_without_interactions() {
    let mut navigator = Navigator::from_load(Ok(load_fixture()));

    assert!(navigator.next_conversation());
    assert!(navigator.interactions().is_empty());
    assert!(matches!(navigator.view_state(), ViewState::NoInteractions { .. }));
    assert_eq!(navigator.grouping_stats().dropped_orphan_agent, 1);
    assert!(!navigator.next_interaction());
    assert!(!navigator.last_interaction());
}

#[test]
fn test_conversation_change_resets_interaction() {
    let mut navigator = Navigator::from_load(Ok(load_fixture()));

    assert!(navigator.last_interaction());
    assert!(navigator.select_session("gamma team"));
    assert_eq!(navigator.interaction_index(), 0);
    assert_eq!(navigator.current_session(), Some("gamma team"));

    assert!(navigator.previous_conversation());
    assert_eq!(navigator.current_session(), Some("beta"));
}

#[test]
fn test_unknown_session_keeps_position() {
    let mut navigator = Navigator::from_load(Ok(load_fixture()));
    navigator.next_interaction();

    assert!(!navigator.select_session("missing"));
    assert_eq!(navigator.current_session(), Some("alpha"));
    assert_eq!(navigator.interaction_index(), 1);
}

#[test]
fn test_session_groups_for_picker() {
    let conversations = load_fixture();
    let navigator = Navigator::from_load(Ok(conversations));

    let groups: Vec<(&str, Vec<usize>)> = navigator
        .session_groups()
        .iter()
        .map(|group| {
            (group.session_id, group.conversations.iter().map(|(index, _)| *index).collect())
        })
        .collect();

    assert_eq!(groups, vec![("alpha", vec![0, 1]), ("beta", vec![2]), ("gamma team", vec![3])]);
}

#[test]
fn test_failed_load_view() {
    let navigator = Navigator::from_load(Err(anyhow::anyhow!("Database error: timeout")));

    match navigator.view_state() {
        ViewState::Error(message) => assert!(message.contains("Database error: timeout")),
        _ => panic!("expected error view"),
    }
    assert!(navigator.conversations().is_empty());
}

#[test]
fn test_session_selection_round_trip_through_url() {
    let mut sync = SessionSync::new("https://viewer.example.com/?tab=details#top");
    let mut navigator = Navigator::from_load(Ok(load_fixture()));

    navigator.select_session("gamma team");
    sync.sync(navigator.current_session());
    assert_eq!(sync.url(), "https://viewer.example.com/?tab=details&session_id=gamma%20team#top");

    // A fresh viewer opened on that URL restores the same conversation
    let reopened = SessionSync::new(sync.url());
    let mut restored = Navigator::from_load(Ok(load_fixture()));
    let session = reopened.initial_session().unwrap();
    assert!(restored.select_session(&session));
    assert_eq!(restored.conversation_index(), 3);

    assert_eq!(
        sync.shareable_url().as_deref(),
        Some("https://viewer.example.com/?session_id=gamma%20team")
    );
}

#[test]
fn test_clearing_selection_removes_param() {
    let mut sync = SessionSync::new("http://localhost:3000/?session_id=alpha&tab=x");
    sync.sync(None);

    assert_eq!(read_session_param(sync.url()), None);
    assert!(sync.url().contains("tab=x"));
}
