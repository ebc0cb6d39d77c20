//! Panel controller, its state and error taxonomy

mod controller;
mod error;
mod state;

pub use controller::{PanelCommand, PanelController, DEFAULT_REFRESH_DELAY};
pub use state::*;
