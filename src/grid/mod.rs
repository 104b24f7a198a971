//! Spreadsheet-style grid model
//!
//! An explicit `Idle` / `Editing` state machine plus the column
//! configuration for the expense and income grids. Rendering lives in
//! `tui`; nothing here draws anything.

pub mod columns;
pub mod convert;
pub mod expense_grid;
pub mod income_grid;
pub mod state;

pub use columns::{Align, CellContext, CellEditor, Choice, ColumnSpec, Header, SelectOption};
pub use expense_grid::{ExpenseColumn, ExpenseGrid, EXPENSE_COLUMNS};
pub use income_grid::{IncomeColumn, IncomeGrid, INCOME_COLUMNS};
pub use state::{GridCoord, GridEffect, GridEvent, GridKey, GridMode, GridSource, GridState};
