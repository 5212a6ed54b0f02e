use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Viewer layout
pub struct AppLayout {
    pub header_area: Rect,
    pub timeline_area: Rect,
    pub interaction_area: Rect,
    pub details_area: Rect,
    pub status_area: Rect,
}

impl AppLayout {
    /// Create the viewer layout:
    /// - Header: 3 rows (conversation selector)
    /// - Timeline 25% | Interaction 45% | Details 30%
    /// - Status bar: bottom row
    pub fn new(area: Rect) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(3),    // Main area
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        let horizontal_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(25),
                Constraint::Percentage(45),
                Constraint::Percentage(30),
            ])
            .split(vertical_chunks[1]);

        Self {
            header_area: vertical_chunks[0],
            timeline_area: horizontal_chunks[0],
            interaction_area: horizontal_chunks[1],
            details_area: horizontal_chunks[2],
            status_area: vertical_chunks[2],
        }
    }
}

/// A rectangle of `percent_x` by `percent_y` centred in `area` (picker overlay)
pub fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
