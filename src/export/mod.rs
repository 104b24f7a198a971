//! Export in three formats
//!
//! - CSV: the visible expense view, spreadsheet-friendly
//! - JSON: every record plus summary figures
//! - YAML: the same document, human-readable

pub mod csv;
pub mod json;
pub mod yaml;

pub use self::csv::export_expenses_csv;
pub use json::{export_full_json, ExportSummary, FullExport, EXPORT_SCHEMA_VERSION};
pub use yaml::export_full_yaml;
