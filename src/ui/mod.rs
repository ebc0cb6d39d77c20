//! UI module for rendering the panel

mod components;
mod epic_panel;
mod layout;

use crate::app::App;
use ratatui::{layout::Rect, Frame};

pub use layout::create_layout;

/// Main draw function
pub fn draw(frame: &mut Frame, app: &App) {
    let state = app.snapshot();
    let areas = create_layout(frame.area());

    epic_panel::draw(frame, &areas, &state);
    layout::draw_status_bar(frame, areas.status_bar, &state);

    if let Some(message) = state.failure() {
        components::render_error_dialog(
            frame,
            "Panel failed to load",
            message,
            "Press q to quit",
        );
    }
}

/// Screen area of the generate button for a terminal of the given size
pub fn button_area(width: u16, height: u16) -> Rect {
    create_layout(Rect::new(0, 0, width, height)).button
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{StoryResult, WikiPage};
    use crate::host::{EpicRef, WorkItemId};
    use crate::panel::{Lifecycle, PanelState, RunSummary, StatusMessage};
    use chrono::Utc;
    use ratatui::{backend::TestBackend, Terminal};
    use tokio::sync::{mpsc, watch};

    fn render(state: PanelState) -> String {
        let (_tx, rx) = watch::channel(state);
        let (commands, _receiver) = mpsc::channel(1);
        let app = App::new(rx, commands);

        let mut terminal = Terminal::new(TestBackend::new(80, 30)).unwrap();
        terminal.draw(|frame| draw(frame, &app)).unwrap();

        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    fn ready_state() -> PanelState {
        PanelState {
            lifecycle: Lifecycle::Ready,
            status: StatusMessage::info("Ready. Press Enter to generate user stories."),
            epic: Some(EpicRef {
                id: WorkItemId(4711),
                title: "Checkout Flow".to_string(),
            }),
            last_run: None,
        }
    }

    #[test]
    fn test_draw_ready_panel() {
        let text = render(ready_state());
        assert!(text.contains("#4711"));
        assert!(text.contains("Checkout Flow"));
        assert!(text.contains(epic_panel::BUTTON_LABEL));
        assert!(text.contains("No stories generated yet."));
        assert!(text.contains("Enter:generate"));
    }

    #[test]
    fn test_draw_busy_button() {
        let state = PanelState {
            lifecycle: Lifecycle::Busy,
            status: StatusMessage::loading("Found 2 wiki pages. Generating user stories..."),
            ..ready_state()
        };
        let text = render(state);
        assert!(text.contains(epic_panel::BUTTON_BUSY_LABEL));
        assert!(text.contains("Generating user stories..."));
    }

    #[test]
    fn test_draw_run_summary() {
        let mut payment = WikiPage::new("Checkout/Payment");
        payment.confidence = Some(0.85);
        let mut created = StoryResult::with_status("created");
        created.title = Some("User Story: Pay by card".to_string());
        let mut skipped = StoryResult::with_status("skipped");
        skipped.title = Some("User Story: Gift wrap".to_string());

        let state = PanelState {
            status: StatusMessage::success("Created 1 user stories!"),
            last_run: Some(RunSummary {
                pages: vec![WikiPage::new("Checkout/Cart"), payment],
                stories: vec![created, skipped],
                created: 1,
                finished_at: Utc::now(),
            }),
            ..ready_state()
        };
        let text = render(state);
        assert!(text.contains("Created 1 user stories!"));
        assert!(text.contains("created 1 of 2 stories"));
        assert!(text.contains("Checkout/Payment  85%"));
        assert!(text.contains("[skipped] User Story: Gift wrap"));
    }

    #[test]
    fn test_draw_load_failure_dialog() {
        let state = PanelState {
            lifecycle: Lifecycle::Failed("Failed to initialize host: AZURE_TOKEN is not configured".to_string()),
            status: StatusMessage::error("Failed to initialize host: AZURE_TOKEN is not configured"),
            epic: None,
            last_run: None,
        };
        let text = render(state);
        assert!(text.contains("Panel failed to load"));
        assert!(text.contains("Press q to quit"));
    }

    #[test]
    fn test_button_area_matches_layout() {
        let area = button_area(80, 30);
        assert_eq!(area, create_layout(Rect::new(0, 0, 80, 30)).button);
        assert!(area.width > 0 && area.height > 0);
    }
}
