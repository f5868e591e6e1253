//! holo-tui: Terminal UI components
//!
//! Widgets for rendering a conversation with the assistant, plus the
//! terminal session that hosts them. Built on ratatui and crossterm.

pub mod app;
pub mod input;
pub mod theme;
pub mod widgets;

pub use app::{App, AppState};
pub use input::Action;
pub use theme::Theme;
