//! Column configuration
//!
//! Each grid column is described by a [`ColumnSpec`]: its id, header,
//! how to render and edit a cell, whether and how it sorts, and its width.

use crate::models::{
    BudgetId, CategoryId, FrequencyType, LinkedAccountId, Partner, PartnerNames, ReferenceKind,
};

/// How a cell is edited
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellEditor {
    Text,
    Number,
    Currency,
    Percent,
    /// Pick one of a list of options
    Select,
    /// Boolean flag flipped in place
    Toggle,
    ReadOnly,
}

impl CellEditor {
    /// Cells edited by typing
    pub fn is_text_entry(self) -> bool {
        matches!(self, Self::Text | Self::Number | Self::Currency | Self::Percent)
    }

    pub fn is_editable(self) -> bool {
        self != Self::ReadOnly
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

/// Column header, some of which mention partner names
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Header {
    Text(&'static str),
    Benefit(Partner),
    FairShare(Partner),
}

impl Header {
    pub fn render(self, names: &PartnerNames) -> String {
        match self {
            Self::Text(text) => text.to_string(),
            Self::Benefit(p) => format!("{} %", names.name(p)),
            Self::FairShare(p) => format!("Fair {}", names.name(p)),
        }
    }
}

/// Household-wide values cells need to render
#[derive(Debug, Clone, Copy)]
pub struct CellContext<'a> {
    pub names: &'a PartnerNames,
    pub currency: &'a str,
}

/// Static description of one column
///
/// `K` identifies the column, `R` is the row type and `S` the sort key the
/// column maps to (if sortable).
pub struct ColumnSpec<K, R, S> {
    pub key: K,
    pub id: &'static str,
    pub header: Header,
    /// Rendered cell
    pub display: fn(&R, &CellContext<'_>) -> String,
    /// Value the editor starts from; commits compare against it
    pub edit_text: fn(&R) -> String,
    pub editor: fn(&R) -> CellEditor,
    pub sort: Option<S>,
    pub width: u16,
    pub align: Align,
}

impl<K, R, S> ColumnSpec<K, R, S> {
    pub fn is_sortable(&self) -> bool {
        self.sort.is_some()
    }
}

impl<K: std::fmt::Debug, R, S: std::fmt::Debug> std::fmt::Debug for ColumnSpec<K, R, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnSpec")
            .field("key", &self.key)
            .field("id", &self.id)
            .field("header", &self.header)
            .field("sort", &self.sort)
            .field("width", &self.width)
            .finish()
    }
}

/// A value picked from a select cell
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Choice {
    /// Clear the reference
    Unassigned,
    Category(CategoryId),
    Budget(BudgetId),
    Account(LinkedAccountId),
    Frequency(FrequencyType),
    Partner(Partner),
    /// Create an entry of this kind, then pick it
    New(ReferenceKind),
}

/// One entry in a select cell's picker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectOption {
    pub label: String,
    pub choice: Choice,
}

impl SelectOption {
    pub fn new(label: impl Into<String>, choice: Choice) -> Self {
        Self {
            label: label.into(),
            choice,
        }
    }
}

/// Editor for a frequency parameter cell: typed when the frequency needs
/// one, read-only otherwise
pub fn param_editor(frequency: FrequencyType) -> CellEditor {
    if frequency.needs_param() {
        CellEditor::Number
    } else {
        CellEditor::ReadOnly
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_entry_kinds() {
        assert!(CellEditor::Currency.is_text_entry());
        assert!(CellEditor::Percent.is_text_entry());
        assert!(!CellEditor::Select.is_text_entry());
        assert!(!CellEditor::Toggle.is_text_entry());
        assert!(CellEditor::Toggle.is_editable());
        assert!(!CellEditor::ReadOnly.is_editable());
    }

    #[test]
    fn test_header_render() {
        let names = PartnerNames::new("Ana", "Ben");
        assert_eq!(Header::FairShare(Partner::Y).render(&names), "Fair Ben");
        assert_eq!(Header::Benefit(Partner::X).render(&names), "Ana %");
        assert_eq!(Header::Text("Name").render(&names), "Name");
    }

    #[test]
    fn test_param_editor() {
        assert_eq!(param_editor(FrequencyType::EveryNDays), CellEditor::Number);
        assert_eq!(param_editor(FrequencyType::Monthly), CellEditor::ReadOnly);
    }
}
