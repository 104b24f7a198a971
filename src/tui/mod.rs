//! Terminal User Interface module
//!
//! Spreadsheet-style editing of expenses and incomes plus a configuration
//! tab for partners, categories, budgets and payment methods.

pub mod app;
pub mod event;
pub mod handler;
pub mod terminal;

// Views
pub mod views;

// Widgets
pub mod widgets;

// Dialogs
pub mod dialogs;

// Layout
pub mod layout;

pub use app::App;
pub use terminal::run_tui;
