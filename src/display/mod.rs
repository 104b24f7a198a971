//! Display formatting for terminal output
//!
//! Plain-text tables for the CLI. Figures are rounded to whole currency
//! units here and nowhere else.

pub mod expense;
pub mod income;
pub mod reference;

pub use expense::{format_expense_report, format_expense_table};
pub use income::{format_income_list, format_ratio};
pub use reference::format_reference_list;

use tabled::builder::Builder;
use tabled::settings::object::Columns;
use tabled::settings::{Alignment, Modify, Style};

/// Build a table from a header and rows, right-aligning `numeric` columns
pub(crate) fn render_table(
    header: &[&str],
    rows: Vec<Vec<String>>,
    numeric: std::ops::RangeFrom<usize>,
) -> String {
    let mut builder = Builder::default();
    builder.push_record(header.iter().map(|h| h.to_string()));
    for row in rows {
        builder.push_record(row);
    }
    let mut table = builder.build();
    table
        .with(Style::psql())
        .with(Modify::new(Columns::new(numeric)).with(Alignment::right()));
    table.to_string()
}
