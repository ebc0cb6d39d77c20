//! Layout components (header, panel sections, status bar)

use super::components::{BUTTON_HEIGHT, BUTTON_WIDTH};
use crate::panel::PanelState;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Areas of the panel screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PanelLayout {
    pub header: Rect,
    pub epic: Rect,
    pub button: Rect,
    pub status: Rect,
    pub summary: Rect,
    pub status_bar: Rect,
}

/// Split the screen into panel sections
pub fn create_layout(area: Rect) -> PanelLayout {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),             // Header
            Constraint::Length(4),             // Epic
            Constraint::Length(BUTTON_HEIGHT), // Generate button
            Constraint::Length(3),             // Status
            Constraint::Min(0),                // Last run
            Constraint::Length(1),             // Status bar
        ])
        .split(area);

    let button_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(1), // Left margin
            Constraint::Length(BUTTON_WIDTH),
            Constraint::Min(0),
        ])
        .split(chunks[2]);

    PanelLayout {
        header: chunks[0],
        epic: chunks[1],
        button: button_row[1],
        status: chunks[3],
        summary: chunks[4],
        status_bar: chunks[5],
    }
}

/// Draw the status bar with key hints
pub fn draw_status_bar(frame: &mut Frame, area: Rect, state: &PanelState) {
    let indicator = if state.failure().is_some() {
        Span::styled(" ○ ", Style::default().fg(Color::Red))
    } else if state.is_busy() {
        Span::styled(" ◌ ", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(" ● ", Style::default().fg(Color::Green))
    };

    let spans = vec![
        indicator,
        Span::styled(get_hints(state), Style::default().fg(Color::Gray)),
    ];

    let status = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::DarkGray));
    frame.render_widget(status, area);
}

/// Keyboard hints for the current lifecycle
fn get_hints(state: &PanelState) -> &'static str {
    if state.failure().is_some() {
        "q:quit"
    } else if state.trigger_enabled() {
        "Enter:generate  h:health  r:refresh  q:quit"
    } else {
        "working...  q:quit"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::panel::Lifecycle;

    #[test]
    fn test_layout_fills_height() {
        let layout = create_layout(Rect::new(0, 0, 80, 30));
        assert_eq!(layout.header.y, 0);
        assert_eq!(layout.button, Rect::new(1, 7, BUTTON_WIDTH, BUTTON_HEIGHT));
        assert_eq!(layout.status.y, 10);
        assert_eq!(layout.status_bar, Rect::new(0, 29, 80, 1));
        assert_eq!(layout.summary.height, 16);
    }

    #[test]
    fn test_hints_follow_lifecycle() {
        let mut state = PanelState::default();
        assert_eq!(get_hints(&state), "working...  q:quit");
        state.lifecycle = Lifecycle::Ready;
        assert!(get_hints(&state).starts_with("Enter:generate"));
        state.lifecycle = Lifecycle::Failed("boom".to_string());
        assert_eq!(get_hints(&state), "q:quit");
    }
}
