//! Application state and input handling
//!
//! The app never talks to the host or backend itself: it reads the panel
//! state published by the controller and turns key presses and clicks into
//! [`PanelCommand`]s.

use crate::panel::{PanelCommand, PanelState};
use crate::ui;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::Position;
use tokio::sync::{mpsc, watch};

/// Main application struct
pub struct App {
    /// Panel state published by the controller
    state: watch::Receiver<PanelState>,
    /// Commands for the controller task
    commands: mpsc::Sender<PanelCommand>,
    /// Whether the app should quit
    quit: bool,
    /// Terminal size for hit testing (height, width)
    pub terminal_size: Option<(u16, u16)>,
}

impl App {
    /// Create a new App instance
    pub fn new(state: watch::Receiver<PanelState>, commands: mpsc::Sender<PanelCommand>) -> Self {
        Self {
            state,
            commands,
            quit: false,
            terminal_size: None,
        }
    }

    /// Current panel state
    pub fn snapshot(&self) -> PanelState {
        self.state.borrow().clone()
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.quit = true,
            KeyCode::Enter | KeyCode::Char('g') => self.press_button(),
            KeyCode::Char('h') => self.send_when_ready(PanelCommand::CheckBackend),
            KeyCode::Char('r') => self.send_when_ready(PanelCommand::Refresh),
            _ => {}
        }
    }

    /// Handle a mouse event; a left click on the button presses it
    pub fn handle_mouse(&mut self, mouse: MouseEvent) {
        if mouse.kind != MouseEventKind::Down(MouseButton::Left) {
            return;
        }
        let Some((height, width)) = self.terminal_size else {
            return;
        };
        if ui::button_area(width, height).contains(Position::new(mouse.column, mouse.row)) {
            self.press_button();
        }
    }

    /// A disabled button ignores presses
    fn press_button(&mut self) {
        self.send_when_ready(PanelCommand::Trigger);
    }

    fn send_when_ready(&mut self, command: PanelCommand) {
        if !self.state.borrow().trigger_enabled() {
            tracing::debug!("Ignoring {command:?}: panel is not ready");
            return;
        }
        if let Err(err) = self.commands.try_send(command) {
            tracing::debug!("Dropping {command:?}: {err}");
        }
    }
}
