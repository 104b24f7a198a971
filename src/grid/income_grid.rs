//! Income grid: columns, cell source and commit conversion

use super::columns::{param_editor, Align, CellContext, CellEditor, Choice, ColumnSpec, Header, SelectOption};
use super::convert;
use super::expense_grid::frequency_options;
use super::state::{GridCoord, GridSource};
use crate::error::{FairShareError, FairShareResult};
use crate::models::{IncomeId, IncomePatch, Partner, PartnerNames};
use crate::view::{IncomeRow, IncomeSortColumn, IncomeView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IncomeColumn {
    Name,
    Partner,
    Amount,
    Frequency,
    Param,
    Monthly,
}

pub type IncomeColumnSpec = ColumnSpec<IncomeColumn, IncomeRow, IncomeSortColumn>;

fn text(_: &IncomeRow) -> CellEditor {
    CellEditor::Text
}

fn select(_: &IncomeRow) -> CellEditor {
    CellEditor::Select
}

fn currency(_: &IncomeRow) -> CellEditor {
    CellEditor::Currency
}

fn read_only(_: &IncomeRow) -> CellEditor {
    CellEditor::ReadOnly
}

fn param_cell(row: &IncomeRow) -> CellEditor {
    param_editor(row.income.frequency_type)
}

fn name_display(row: &IncomeRow, _: &CellContext<'_>) -> String {
    row.income.name.clone()
}

fn name_edit(row: &IncomeRow) -> String {
    row.income.name.clone()
}

fn partner_display(row: &IncomeRow, ctx: &CellContext<'_>) -> String {
    ctx.names.name(row.income.partner).to_string()
}

fn partner_edit(row: &IncomeRow) -> String {
    row.income.partner.label().to_string()
}

fn amount_display(row: &IncomeRow, ctx: &CellContext<'_>) -> String {
    row.income.amount.format_whole(ctx.currency)
}

fn amount_edit(row: &IncomeRow) -> String {
    row.income.amount.edit_text()
}

fn frequency_display(row: &IncomeRow, _: &CellContext<'_>) -> String {
    row.income.frequency_type.label().to_string()
}

fn frequency_edit(row: &IncomeRow) -> String {
    row.income.frequency_type.key().to_string()
}

fn param_display(row: &IncomeRow, _: &CellContext<'_>) -> String {
    match (row.income.frequency_type.needs_param(), row.income.frequency_param) {
        (false, _) => String::new(),
        (true, Some(n)) => n.to_string(),
        (true, None) => "?".to_string(),
    }
}

fn param_edit(row: &IncomeRow) -> String {
    row.income
        .frequency_param
        .map(|n| n.to_string())
        .unwrap_or_default()
}

fn monthly_display(row: &IncomeRow, ctx: &CellContext<'_>) -> String {
    row.monthly.format_whole(ctx.currency)
}

fn empty(_: &IncomeRow) -> String {
    String::new()
}

pub static INCOME_COLUMNS: [IncomeColumnSpec; 6] = [
    ColumnSpec {
        key: IncomeColumn::Name,
        id: "name",
        header: Header::Text("Name"),
        display: name_display,
        edit_text: name_edit,
        editor: text,
        sort: Some(IncomeSortColumn::Name),
        width: 24,
        align: Align::Left,
    },
    ColumnSpec {
        key: IncomeColumn::Partner,
        id: "partner_label",
        header: Header::Text("Partner"),
        display: partner_display,
        edit_text: partner_edit,
        editor: select,
        sort: Some(IncomeSortColumn::Partner),
        width: 14,
        align: Align::Left,
    },
    ColumnSpec {
        key: IncomeColumn::Amount,
        id: "amount",
        header: Header::Text("Amount"),
        display: amount_display,
        edit_text: amount_edit,
        editor: currency,
        sort: Some(IncomeSortColumn::Amount),
        width: 10,
        align: Align::Right,
    },
    ColumnSpec {
        key: IncomeColumn::Frequency,
        id: "frequency",
        header: Header::Text("Frequency"),
        display: frequency_display,
        edit_text: frequency_edit,
        editor: select,
        sort: Some(IncomeSortColumn::Frequency),
        width: 15,
        align: Align::Left,
    },
    ColumnSpec {
        key: IncomeColumn::Param,
        id: "frequency_param",
        header: Header::Text("N"),
        display: param_display,
        edit_text: param_edit,
        editor: param_cell,
        sort: None,
        width: 4,
        align: Align::Right,
    },
    ColumnSpec {
        key: IncomeColumn::Monthly,
        id: "monthly",
        header: Header::Text("Monthly"),
        display: monthly_display,
        edit_text: empty,
        editor: read_only,
        sort: Some(IncomeSortColumn::Monthly),
        width: 10,
        align: Align::Right,
    },
];

/// The income view as seen by the grid state machine
pub struct IncomeGrid<'a> {
    pub view: &'a IncomeView,
}

impl<'a> IncomeGrid<'a> {
    pub fn new(view: &'a IncomeView) -> Self {
        Self { view }
    }

    pub fn spec(&self, col: usize) -> Option<&'static IncomeColumnSpec> {
        INCOME_COLUMNS.get(col)
    }

    pub fn row(&self, row: usize) -> Option<&'a IncomeRow> {
        self.view.rows.get(row)
    }

    pub fn display(&self, coord: GridCoord, ctx: &CellContext<'_>) -> String {
        match (self.row(coord.row), self.spec(coord.col)) {
            (Some(row), Some(spec)) => (spec.display)(row, ctx),
            _ => String::new(),
        }
    }

    pub fn commit(&self, coord: GridCoord, value: &str) -> FairShareResult<(IncomeId, IncomePatch)> {
        let row = self
            .row(coord.row)
            .ok_or_else(|| FairShareError::Validation("No such row".into()))?;
        let key = self
            .spec(coord.col)
            .map(|s| s.key)
            .ok_or_else(|| FairShareError::Validation("No such column".into()))?;

        let mut patch = IncomePatch::default();
        match key {
            IncomeColumn::Name => {
                if value.trim().is_empty() {
                    return Err(FairShareError::Validation("Income name cannot be empty".into()));
                }
                patch.name = Some(value.to_string());
            }
            IncomeColumn::Amount => patch.amount = Some(convert::parse_amount(value)?),
            IncomeColumn::Param => patch.frequency_param = Some(convert::parse_param(value)?),
            _ => {
                return Err(FairShareError::Validation(
                    "That column cannot be typed into".into(),
                ))
            }
        }
        Ok((row.id(), patch))
    }

    pub fn options(&self, coord: GridCoord, names: &PartnerNames) -> Vec<SelectOption> {
        match self.spec(coord.col).map(|s| s.key) {
            Some(IncomeColumn::Partner) => vec![
                SelectOption::new(names.x.clone(), Choice::Partner(Partner::X)),
                SelectOption::new(names.y.clone(), Choice::Partner(Partner::Y)),
            ],
            Some(IncomeColumn::Frequency) => frequency_options(),
            _ => Vec::new(),
        }
    }

    pub fn choose(&self, coord: GridCoord, choice: Choice) -> FairShareResult<(IncomeId, IncomePatch)> {
        let row = self
            .row(coord.row)
            .ok_or_else(|| FairShareError::Validation("No such row".into()))?;
        let key = self
            .spec(coord.col)
            .map(|s| s.key)
            .ok_or_else(|| FairShareError::Validation("No such column".into()))?;
        Ok((row.id(), choice_patch(key, choice)?))
    }
}

/// Patch for a picked option
pub fn choice_patch(column: IncomeColumn, choice: Choice) -> FairShareResult<IncomePatch> {
    let mut patch = IncomePatch::default();
    match (column, choice) {
        (IncomeColumn::Partner, Choice::Partner(p)) => patch.partner = Some(p),
        (IncomeColumn::Frequency, Choice::Frequency(f)) => patch.frequency_type = Some(f),
        _ => {
            return Err(FairShareError::Validation(
                "That choice does not apply to this column".into(),
            ))
        }
    }
    Ok(patch)
}

impl GridSource for IncomeGrid<'_> {
    fn row_count(&self) -> usize {
        self.view.len()
    }

    fn column_count(&self) -> usize {
        INCOME_COLUMNS.len()
    }

    fn editor(&self, coord: GridCoord) -> CellEditor {
        match (self.row(coord.row), self.spec(coord.col)) {
            (Some(row), Some(spec)) => (spec.editor)(row),
            _ => CellEditor::ReadOnly,
        }
    }

    fn cell_text(&self, coord: GridCoord) -> String {
        match (self.row(coord.row), self.spec(coord.col)) {
            (Some(row), Some(spec)) => (spec.edit_text)(row),
            _ => String::new(),
        }
    }
}
