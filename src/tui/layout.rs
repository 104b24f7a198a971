//! Layout definitions for the TUI
//!
//! Tab bar on top, the active view in the middle, status bar at the bottom.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Layout regions for the TUI
pub struct AppLayout {
    pub tabs: Rect,
    /// Filter / grouping / sort summary for the active view
    pub toolbar: Rect,
    pub main: Rect,
    pub status_bar: Rect,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1), // Tabs
                Constraint::Length(1), // Toolbar
                Constraint::Min(3),    // Grid
                Constraint::Length(1), // Status bar
            ])
            .split(area);

        Self {
            tabs: chunks[0],
            toolbar: chunks[1],
            main: chunks[2],
            status_bar: chunks[3],
        }
    }
}

/// Three side-by-side panes of the configuration view, above which sit
/// the partner names
pub struct ConfigLayout {
    pub partners: Rect,
    pub lists: [Rect; 3],
}

impl ConfigLayout {
    pub fn new(area: Rect) -> Self {
        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(4), Constraint::Min(3)])
            .split(area);
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
                Constraint::Ratio(1, 3),
            ])
            .split(vertical[1]);

        Self {
            partners: vertical[0],
            lists: [columns[0], columns[1], columns[2]],
        }
    }
}

/// Create a fixed-size centered rect for dialogs
pub fn centered_rect_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width.min(r.width), height.min(r.height))
}

/// Toast area in the top-right corner
pub fn notification_rect(r: Rect) -> Rect {
    let width = 44.min(r.width);
    let height = 5.min(r.height);
    Rect::new(r.x + r.width - width, r.y + 1.min(r.height), width, height)
}
