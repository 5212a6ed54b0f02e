use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};

use super::app::{MessageType, StatusMessage};
use super::layout::{AppLayout, centered_rect};
use super::timestamps::format_optional_timestamp;
use crate::details::{DetailsCard, StatusKind};
use crate::grouping::conversation_preview;
use crate::models::{Conversation, Interaction};
use crate::navigation::{Navigator, TimelineSlot, ViewState};
use crate::utils::strip_ansi_codes;

const BRIGHT: Color = Color::Rgb(250, 250, 250);
const MUTED: Color = Color::Rgb(113, 113, 122);
const ACCENT: Color = Color::Rgb(16, 185, 129);
const SURFACE: Color = Color::Rgb(24, 24, 27);
const DANGER: Color = Color::Rgb(239, 68, 68);
const CUSTOMER: Color = Color::Rgb(96, 165, 250);
const AGENT: Color = Color::Rgb(167, 139, 250);

/// Everything one frame needs
pub struct RenderState<'a> {
    pub navigator: &'a Navigator,
    /// Highlighted conversation index while the picker is open
    pub picker_selected: Option<usize>,
    pub status_message: Option<&'a StatusMessage>,
    /// Where the conversations were loaded from
    pub source_label: &'a str,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area());
    let navigator = state.navigator;

    render_header(frame, layout.header_area, navigator, state.source_label);

    match navigator.view_state() {
        ViewState::Loading => {
            render_message(frame, main_area(&layout), "Loading conversations...", BRIGHT);
        }
        ViewState::Error(message) => {
            render_message(frame, main_area(&layout), &format!("Error: {}", message), DANGER);
        }
        ViewState::NoConversations => {
            render_message(frame, main_area(&layout), "No conversations found", MUTED);
        }
        ViewState::NoInteractions { conversation } => {
            render_timeline(frame, layout.timeline_area, navigator);
            render_message(
                frame,
                layout.interaction_area,
                "No interactions found in this conversation",
                MUTED,
            );
            render_details(frame, layout.details_area, &DetailsCard::new(conversation, 0));
        }
        ViewState::Ready { conversation, interaction } => {
            render_timeline(frame, layout.timeline_area, navigator);
            render_interaction(
                frame,
                layout.interaction_area,
                interaction,
                navigator.interactions().len(),
            );
            render_details(
                frame,
                layout.details_area,
                &DetailsCard::new(conversation, interaction.interaction_number),
            );
        }
    }

    render_status_bar(frame, layout.status_area, state);

    if let Some(selected) = state.picker_selected {
        render_picker(frame, frame.area(), navigator, selected);
    }
}

fn main_area(layout: &AppLayout) -> Rect {
    layout.timeline_area.union(layout.interaction_area).union(layout.details_area)
}

fn panel(title: &str) -> Block<'static> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(MUTED))
        .title(format!(" {} ", title))
}

/// Conversation selector: `Session: <s> | ID: <id> (k/N)`
fn render_header(frame: &mut Frame, area: Rect, navigator: &Navigator, source_label: &str) {
    let total = navigator.conversations().len();
    let line = match navigator.current_conversation() {
        Some(conversation) => Line::from(vec![
            Span::styled("Session: ", Style::default().fg(MUTED)),
            Span::styled(
                strip_ansi_codes(conversation.session_label()),
                Style::default().fg(BRIGHT).add_modifier(Modifier::BOLD),
            ),
            Span::styled(" | ID: ", Style::default().fg(MUTED)),
            Span::raw(strip_ansi_codes(&conversation.id)),
            Span::styled(
                format!(" ({}/{})", navigator.conversation_index() + 1, total),
                Style::default().fg(MUTED),
            ),
        ]),
        None => Line::from(Span::styled("No conversation selected", Style::default().fg(MUTED))),
    };

    let paragraph = Paragraph::new(line).block(panel(&format!("Transcripts: {}", source_label)));
    frame.render_widget(paragraph, area);
}

fn render_message(frame: &mut Frame, area: Rect, message: &str, color: Color) {
    let paragraph = Paragraph::new(message.to_string())
        .style(Style::default().fg(color))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(MUTED)));
    frame.render_widget(paragraph, area);
}

/// First line of `text`, shortened to `max_chars`
fn excerpt(text: &str, max_chars: usize) -> String {
    let first_line = strip_ansi_codes(text.lines().next().unwrap_or(""));
    if first_line.chars().count() > max_chars {
        let mut short: String = first_line.chars().take(max_chars.saturating_sub(1)).collect();
        short.push('…');
        short
    } else {
        first_line
    }
}

fn render_timeline(frame: &mut Frame, area: Rect, navigator: &Navigator) {
    let total = navigator.interactions().len();
    let width = area.width.saturating_sub(4) as usize;

    let items: Vec<ListItem> = navigator
        .timeline_window()
        .iter()
        .map(|slot| match slot {
            TimelineSlot::Empty => ListItem::new(Text::from(vec![Line::from(""), Line::from("")])),
            TimelineSlot::Interaction { interaction, current, .. } => {
                let style = if *current {
                    Style::default().fg(BRIGHT).bg(ACCENT).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(MUTED)
                };
                let heading = format!(
                    "#{} · {} msgs",
                    interaction.interaction_number,
                    interaction.message_count()
                );
                ListItem::new(Text::from(vec![
                    Line::from(heading),
                    Line::from(excerpt(&interaction.customer_message, width)),
                ]))
                .style(style)
            }
        })
        .collect();

    let list = List::new(items).block(panel(&format!("Timeline ({})", total)));
    frame.render_widget(list, area);
}

fn render_interaction(frame: &mut Frame, area: Rect, interaction: &Interaction, total: usize) {
    let mut lines = vec![Line::from(Span::styled(
        "Customer",
        Style::default().fg(CUSTOMER).add_modifier(Modifier::BOLD),
    ))];
    lines.extend(interaction.customer_message.lines().map(|l| Line::from(strip_ansi_codes(l))));

    for message in &interaction.agent_messages {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            "Agent",
            Style::default().fg(AGENT).add_modifier(Modifier::BOLD),
        )));
        lines.extend(message.lines().map(|l| Line::from(strip_ansi_codes(l))));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled("Result: ", Style::default().fg(MUTED)),
        Span::raw(strip_ansi_codes(interaction.result.as_deref().unwrap_or("N/A"))),
        Span::styled("  When: ", Style::default().fg(MUTED)),
        Span::raw(format_optional_timestamp(interaction.timestamp.as_ref())),
    ]));

    let title = format!("Interaction {} of {}", interaction.interaction_number, total);
    let paragraph = Paragraph::new(Text::from(lines)).block(panel(&title)).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

fn status_color(kind: StatusKind) -> Color {
    match kind {
        StatusKind::Success => Color::Rgb(74, 222, 128),
        StatusKind::Pending => Color::Rgb(250, 204, 21),
        StatusKind::Failed => DANGER,
        StatusKind::InProgress => CUSTOMER,
        StatusKind::Unknown => MUTED,
    }
}

fn render_details(frame: &mut Frame, area: Rect, card: &DetailsCard) {
    let lines: Vec<Line> = card
        .rows()
        .into_iter()
        .flat_map(|(label, value)| {
            let value_style = if label == "Status" {
                Style::default().fg(status_color(card.status.kind)).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(BRIGHT)
            };
            [
                Line::from(Span::styled(label, Style::default().fg(MUTED))),
                Line::from(Span::styled(strip_ansi_codes(&value), value_style)),
            ]
        })
        .collect();

    let paragraph = Paragraph::new(Text::from(lines)).block(panel("Details")).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}

fn picker_label(index: usize, conversation: &Conversation, width: usize) -> String {
    let prefix = format!("  {:>3}. ID {} | ", index + 1, strip_ansi_codes(&conversation.id));
    let room = width.saturating_sub(prefix.chars().count()).max(8);
    format!("{}{}", prefix, excerpt(&conversation_preview(&conversation.history), room))
}

/// Conversation picker overlay grouped by session
fn render_picker(frame: &mut Frame, area: Rect, navigator: &Navigator, selected: usize) {
    let overlay = centered_rect(70, 70, area);
    let width = overlay.width.saturating_sub(2) as usize;

    let mut items = Vec::new();
    let mut selected_row = None;
    for group in navigator.session_groups() {
        items.push(
            ListItem::new(format!(
                "{} ({})",
                strip_ansi_codes(group.session_id),
                group.conversations.len()
            ))
            .style(Style::default().fg(CUSTOMER).add_modifier(Modifier::BOLD)),
        );
        for (index, conversation) in group.conversations {
            if index == selected {
                selected_row = Some(items.len());
            }
            let style = if index == navigator.conversation_index() {
                Style::default().fg(ACCENT)
            } else {
                Style::default().fg(BRIGHT)
            };
            items.push(ListItem::new(picker_label(index, conversation, width)).style(style));
        }
    }

    let list = List::new(items)
        .block(panel("Conversations (Enter: open, Esc: close)").style(Style::default().bg(SURFACE)))
        .highlight_style(Style::default().fg(BRIGHT).bg(ACCENT).add_modifier(Modifier::BOLD));
    let mut list_state = ListState::default().with_selected(selected_row);

    frame.render_widget(Clear, overlay);
    frame.render_stateful_widget(list, overlay, &mut list_state);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState) {
    let navigator = state.navigator;

    let (status_text, style) = if let Some(message) = state.status_message {
        let color = match message.message_type {
            MessageType::Success => ACCENT,
            MessageType::Error => DANGER,
        };
        (format!(" {} ", message.text), Style::default().fg(color).bg(SURFACE))
    } else if state.picker_selected.is_some() {
        (
            " ↑/↓: move | Enter: open | Esc/Tab: close | q: quit ".to_string(),
            Style::default().fg(BRIGHT).bg(SURFACE),
        )
    } else {
        let mut parts = vec![];

        let total = navigator.interactions().len();
        if total > 0 {
            parts.push(format!("interaction {}/{}", navigator.interaction_index() + 1, total));
        }
        let dropped = navigator.grouping_stats().dropped();
        if dropped > 0 {
            parts.push(format!("{} records skipped", dropped));
        }

        parts.push("←/→: interaction".to_string());
        parts.push("n/p: conversation".to_string());
        parts.push("Tab: picker".to_string());
        parts.push("y: copy link".to_string());
        parts.push("Ctrl+R: reload".to_string());
        parts.push("q: quit".to_string());

        (format!(" {} ", parts.join(" | ")), Style::default().fg(BRIGHT).bg(SURFACE))
    };

    let paragraph = Paragraph::new(status_text).style(style);
    frame.render_widget(paragraph, area);
}
