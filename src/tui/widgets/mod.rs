//! Reusable TUI widgets

pub mod grid;
pub mod notification;

pub use grid::{render_grid, GridColumn, GridHitMap, GridLine, GridScroll};
pub use notification::{Notification, NotificationQueue, NotificationWidget, Severity};
