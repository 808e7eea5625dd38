//! UI rendering module for sup.
//!
//! `render()` is the single entry point called from the event loop's
//! `terminal.draw()` closure. Line building lives in `table.rs`; key and mouse
//! translation in `keybindings.rs`.

pub mod keybindings;
pub mod table;

use ratatui::{widgets::Paragraph, Frame};
use sup_core::session::Session;

use crate::theme::Theme;

/// Draws one frame of the dashboard over the whole terminal.
///
/// # Arguments
///
/// * `frame` — current render frame provided by `terminal.draw()`
/// * `session` — state to show; never mutated here
/// * `theme` — active color theme
pub fn render(frame: &mut Frame, session: &Session, theme: &Theme) {
    let area = frame.area();
    let lines = table::build_lines(session, theme, area.height);
    frame.render_widget(Paragraph::new(lines), area);
}
