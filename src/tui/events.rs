use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};

/// User actions from keyboard events
#[derive(Debug, PartialEq)]
pub enum Action {
    Quit,
    /// Close the picker, or quit from the viewer
    Back,
    NextInteraction,
    PreviousInteraction,
    FirstInteraction,
    LastInteraction,
    /// Jump to the interaction at this zero-based index
    JumpTo(usize),
    NextConversation,
    PreviousConversation,
    MoveUp,
    MoveDown,
    TogglePicker,
    Select,
    CopyShareLink,
    Refresh,
    None,
}

/// Poll for keyboard events and convert to actions
pub fn poll_event(timeout: Duration) -> anyhow::Result<Action> {
    if event::poll(timeout)?
        && let Event::Key(key) = event::read()?
    {
        return Ok(key_to_action(key));
    }
    Ok(Action::None)
}

fn key_to_action(key: KeyEvent) -> Action {
    match (key.code, key.modifiers) {
        // Quit
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => Action::Quit,
        (KeyCode::Char('q'), KeyModifiers::NONE) => Action::Quit,
        (KeyCode::Esc, _) => Action::Back,

        (KeyCode::Char('r'), KeyModifiers::CONTROL) => Action::Refresh,

        // Interactions
        (KeyCode::Left, _) | (KeyCode::Char('h'), KeyModifiers::NONE) => {
            Action::PreviousInteraction
        }
        (KeyCode::Right, _) | (KeyCode::Char('l'), KeyModifiers::NONE) => Action::NextInteraction,
        (KeyCode::Home, _) | (KeyCode::Char('g'), KeyModifiers::NONE) => Action::FirstInteraction,
        (KeyCode::End, _) | (KeyCode::Char('G'), _) => Action::LastInteraction,
        (KeyCode::Char(c @ '1'..='9'), KeyModifiers::NONE) => {
            Action::JumpTo(c as usize - '1' as usize)
        }

        // Conversations
        (KeyCode::PageDown, _) | (KeyCode::Char('n'), KeyModifiers::NONE) => {
            Action::NextConversation
        }
        (KeyCode::PageUp, _) | (KeyCode::Char('p'), KeyModifiers::NONE) => {
            Action::PreviousConversation
        }

        // Vertical movement (picker list, or timeline)
        (KeyCode::Up, _) | (KeyCode::Char('k'), KeyModifiers::NONE) => Action::MoveUp,
        (KeyCode::Down, _) | (KeyCode::Char('j'), KeyModifiers::NONE) => Action::MoveDown,

        (KeyCode::Tab, _) => Action::TogglePicker,
        (KeyCode::Enter, _) => Action::Select,
        (KeyCode::Char('y'), KeyModifiers::NONE) => Action::CopyShareLink,

        _ => Action::None,
    }
}
