//! GUI module - Plot window components

mod app;
mod control_panel;

pub use app::RunViewerApp;
pub use control_panel::{ControlPanel, ControlPanelAction};
