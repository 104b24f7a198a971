//! CLI command handlers
//!
//! This module contains the implementation of CLI commands,
//! bridging the clap argument parsing with the service layer.

pub mod expense;
pub mod export;
pub mod income;
pub mod reference;
pub mod report;

pub use expense::{handle_expense_command, ExpenseCommands, ViewArgs};
pub use export::{handle_export_command, ExportCommands};
pub use income::{handle_income_command, IncomeCommands};
pub use reference::{handle_account_command, handle_reference_command, ReferenceCommands};
pub use report::handle_report_command;
