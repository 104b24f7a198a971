//! Expense grid: columns, cell source and commit conversion

use super::columns::{param_editor, Align, CellContext, CellEditor, Choice, ColumnSpec, Header, SelectOption};
use super::convert;
use super::state::{GridCoord, GridSource};
use crate::error::{FairShareError, FairShareResult};
use crate::models::{
    ExpenseId, ExpensePatch, FrequencyType, Household, Partner, PartnerNames, ReferenceEntity,
    ReferenceKind,
};
use crate::view::{locale_cmp, ExpenseRow, ExpenseView, SortColumn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExpenseColumn {
    Name,
    Category,
    Budget,
    Amount,
    Estimate,
    Frequency,
    Param,
    Monthly,
    PaymentMethod,
    Payer,
    BenefitX,
    BenefitY,
    FairX,
    FairY,
}

pub type ExpenseColumnSpec = ColumnSpec<ExpenseColumn, ExpenseRow, SortColumn>;

fn text(_: &ExpenseRow) -> CellEditor {
    CellEditor::Text
}

fn select(_: &ExpenseRow) -> CellEditor {
    CellEditor::Select
}

fn currency(_: &ExpenseRow) -> CellEditor {
    CellEditor::Currency
}

fn percent(_: &ExpenseRow) -> CellEditor {
    CellEditor::Percent
}

fn toggle(_: &ExpenseRow) -> CellEditor {
    CellEditor::Toggle
}

fn read_only(_: &ExpenseRow) -> CellEditor {
    CellEditor::ReadOnly
}

fn param_cell(row: &ExpenseRow) -> CellEditor {
    param_editor(row.expense.frequency_type)
}

fn or_dash(s: &str) -> String {
    if s.is_empty() {
        "-".to_string()
    } else {
        s.to_string()
    }
}

fn name_display(row: &ExpenseRow, _: &CellContext<'_>) -> String {
    row.expense.name.clone()
}

fn name_edit(row: &ExpenseRow) -> String {
    row.expense.name.clone()
}

fn category_display(row: &ExpenseRow, _: &CellContext<'_>) -> String {
    or_dash(&row.category)
}

fn budget_display(row: &ExpenseRow, _: &CellContext<'_>) -> String {
    or_dash(&row.budget)
}

fn amount_display(row: &ExpenseRow, ctx: &CellContext<'_>) -> String {
    row.expense.amount.format_whole(ctx.currency)
}

fn amount_edit(row: &ExpenseRow) -> String {
    row.expense.amount.edit_text()
}

fn estimate_display(row: &ExpenseRow, _: &CellContext<'_>) -> String {
    let mark = if row.expense.is_estimate { "[x]" } else { "[ ]" };
    mark.to_string()
}

fn estimate_edit(row: &ExpenseRow) -> String {
    row.expense.is_estimate.to_string()
}

fn frequency_display(row: &ExpenseRow, _: &CellContext<'_>) -> String {
    row.expense.frequency_type.label().to_string()
}

fn frequency_edit(row: &ExpenseRow) -> String {
    row.expense.frequency_type.key().to_string()
}

fn param_display(row: &ExpenseRow, _: &CellContext<'_>) -> String {
    match (row.expense.frequency_type.needs_param(), row.expense.frequency_param) {
        (false, _) => String::new(),
        (true, Some(n)) => n.to_string(),
        (true, None) => "?".to_string(),
    }
}

fn param_edit(row: &ExpenseRow) -> String {
    row.expense
        .frequency_param
        .map(|n| n.to_string())
        .unwrap_or_default()
}

fn monthly_display(row: &ExpenseRow, ctx: &CellContext<'_>) -> String {
    row.share.monthly.format_whole(ctx.currency)
}

fn account_display(row: &ExpenseRow, _: &CellContext<'_>) -> String {
    or_dash(&row.account)
}

fn payer_display(row: &ExpenseRow, ctx: &CellContext<'_>) -> String {
    ctx.names.name_or_dash(row.expense.payer).to_string()
}

fn payer_edit(row: &ExpenseRow) -> String {
    row.expense.payer.map(|p| p.label().to_string()).unwrap_or_default()
}

fn benefit_x_display(row: &ExpenseRow, _: &CellContext<'_>) -> String {
    format!("{}%", row.expense.benefit_x.x())
}

fn benefit_x_edit(row: &ExpenseRow) -> String {
    row.expense.benefit_x.x().to_string()
}

fn benefit_y_display(row: &ExpenseRow, _: &CellContext<'_>) -> String {
    format!("{}%", row.expense.benefit_x.y())
}

fn benefit_y_edit(row: &ExpenseRow) -> String {
    row.expense.benefit_x.y().to_string()
}

fn fair_x_display(row: &ExpenseRow, ctx: &CellContext<'_>) -> String {
    row.share.x.format_whole(ctx.currency)
}

fn fair_y_display(row: &ExpenseRow, ctx: &CellContext<'_>) -> String {
    row.share.y.format_whole(ctx.currency)
}

fn empty(_: &ExpenseRow) -> String {
    String::new()
}

/// Expense grid columns, in display order
pub static EXPENSE_COLUMNS: [ExpenseColumnSpec; 14] = [
    ColumnSpec {
        key: ExpenseColumn::Name,
        id: "name",
        header: Header::Text("Name"),
        display: name_display,
        edit_text: name_edit,
        editor: text,
        sort: Some(SortColumn::Name),
        width: 22,
        align: Align::Left,
    },
    ColumnSpec {
        key: ExpenseColumn::Category,
        id: "category",
        header: Header::Text("Category"),
        display: category_display,
        edit_text: empty,
        editor: select,
        sort: Some(SortColumn::Category),
        width: 16,
        align: Align::Left,
    },
    ColumnSpec {
        key: ExpenseColumn::Budget,
        id: "budget",
        header: Header::Text("Budget"),
        display: budget_display,
        edit_text: empty,
        editor: select,
        sort: None,
        width: 14,
        align: Align::Left,
    },
    ColumnSpec {
        key: ExpenseColumn::Amount,
        id: "amount",
        header: Header::Text("Amount"),
        display: amount_display,
        edit_text: amount_edit,
        editor: currency,
        sort: Some(SortColumn::Amount),
        width: 10,
        align: Align::Right,
    },
    ColumnSpec {
        key: ExpenseColumn::Estimate,
        id: "estimate",
        header: Header::Text("Est"),
        display: estimate_display,
        edit_text: estimate_edit,
        editor: toggle,
        sort: Some(SortColumn::Estimate),
        width: 5,
        align: Align::Center,
    },
    ColumnSpec {
        key: ExpenseColumn::Frequency,
        id: "frequency",
        header: Header::Text("Frequency"),
        display: frequency_display,
        edit_text: frequency_edit,
        editor: select,
        sort: Some(SortColumn::Frequency),
        width: 15,
        align: Align::Left,
    },
    ColumnSpec {
        key: ExpenseColumn::Param,
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
        key: ExpenseColumn::Monthly,
        id: "monthly",
        header: Header::Text("Monthly"),
        display: monthly_display,
        edit_text: empty,
        editor: read_only,
        sort: Some(SortColumn::Monthly),
        width: 10,
        align: Align::Right,
    },
    ColumnSpec {
        key: ExpenseColumn::PaymentMethod,
        id: "payment_method",
        header: Header::Text("Payment Method"),
        display: account_display,
        edit_text: empty,
        editor: select,
        sort: Some(SortColumn::PaymentMethod),
        width: 16,
        align: Align::Left,
    },
    ColumnSpec {
        key: ExpenseColumn::Payer,
        id: "payer",
        header: Header::Text("Payer"),
        display: payer_display,
        edit_text: payer_edit,
        editor: select,
        sort: Some(SortColumn::Payer),
        width: 12,
        align: Align::Left,
    },
    ColumnSpec {
        key: ExpenseColumn::BenefitX,
        id: "benefit_x",
        header: Header::Benefit(Partner::X),
        display: benefit_x_display,
        edit_text: benefit_x_edit,
        editor: percent,
        sort: Some(SortColumn::BenefitX),
        width: 8,
        align: Align::Right,
    },
    ColumnSpec {
        key: ExpenseColumn::BenefitY,
        id: "benefit_y",
        header: Header::Benefit(Partner::Y),
        display: benefit_y_display,
        edit_text: benefit_y_edit,
        editor: percent,
        sort: Some(SortColumn::BenefitY),
        width: 8,
        align: Align::Right,
    },
    ColumnSpec {
        key: ExpenseColumn::FairX,
        id: "fair_x",
        header: Header::FairShare(Partner::X),
        display: fair_x_display,
        edit_text: empty,
        editor: read_only,
        sort: Some(SortColumn::FairX),
        width: 10,
        align: Align::Right,
    },
    ColumnSpec {
        key: ExpenseColumn::FairY,
        id: "fair_y",
        header: Header::FairShare(Partner::Y),
        display: fair_y_display,
        edit_text: empty,
        editor: read_only,
        sort: Some(SortColumn::FairY),
        width: 10,
        align: Align::Right,
    },
];

/// Column spec by key
pub fn expense_column(key: ExpenseColumn) -> &'static ExpenseColumnSpec {
    EXPENSE_COLUMNS
        .iter()
        .find(|c| c.key == key)
        .unwrap_or(&EXPENSE_COLUMNS[0])
}

/// The expense view as seen by the grid state machine
pub struct ExpenseGrid<'a> {
    pub view: &'a ExpenseView,
}

impl<'a> ExpenseGrid<'a> {
    pub fn new(view: &'a ExpenseView) -> Self {
        Self { view }
    }

    pub fn spec(&self, col: usize) -> Option<&'static ExpenseColumnSpec> {
        EXPENSE_COLUMNS.get(col)
    }

    pub fn row(&self, row: usize) -> Option<&'a ExpenseRow> {
        self.view.row(row)
    }

    /// Rendered text of a cell
    pub fn display(&self, coord: GridCoord, ctx: &CellContext<'_>) -> String {
        match (self.row(coord.row), self.spec(coord.col)) {
            (Some(row), Some(spec)) => (spec.display)(row, ctx),
            _ => String::new(),
        }
    }

    /// Turn a committed text value into an update for the row's expense
    pub fn commit(&self, coord: GridCoord, value: &str) -> FairShareResult<(ExpenseId, ExpensePatch)> {
        let row = self
            .row(coord.row)
            .ok_or_else(|| FairShareError::Validation("No such row".into()))?;
        let spec = self
            .spec(coord.col)
            .ok_or_else(|| FairShareError::Validation("No such column".into()))?;
        let patch = text_patch(spec.key, value)?;
        Ok((row.id(), patch))
    }

    /// Update for activating a toggle cell
    pub fn toggle(&self, coord: GridCoord) -> Option<(ExpenseId, ExpensePatch)> {
        let row = self.row(coord.row)?;
        match self.spec(coord.col)?.key {
            ExpenseColumn::Estimate => Some((
                row.id(),
                ExpensePatch {
                    is_estimate: Some(!row.expense.is_estimate),
                    ..Default::default()
                },
            )),
            _ => None,
        }
    }

    /// Picker entries for a select cell
    pub fn options(&self, coord: GridCoord, household: &Household, names: &PartnerNames) -> Vec<SelectOption> {
        match self.spec(coord.col).map(|s| s.key) {
            Some(ExpenseColumn::Category) => {
                let mut options = reference_options(&household.categories, Choice::Category);
                options.push(new_option(ReferenceKind::Category));
                options
            }
            Some(ExpenseColumn::Budget) => {
                let mut options = reference_options(&household.budgets, Choice::Budget);
                options.push(new_option(ReferenceKind::Budget));
                options
            }
            Some(ExpenseColumn::PaymentMethod) => {
                let mut options = vec![SelectOption::new("(none)", Choice::Unassigned)];
                let mut accounts: Vec<_> = household.accounts.iter().collect();
                accounts.sort_by(|a, b| locale_cmp(&a.name, &b.name));
                options.extend(accounts.into_iter().map(|a| {
                    let label = match a.owner {
                        Some(owner) => format!("{} ({})", a.name, names.name(owner)),
                        None => a.name.clone(),
                    };
                    SelectOption::new(label, Choice::Account(a.id))
                }));
                options.push(new_option(ReferenceKind::LinkedAccount));
                options
            }
            Some(ExpenseColumn::Frequency) => frequency_options(),
            Some(ExpenseColumn::Payer) => vec![
                SelectOption::new("(none)", Choice::Unassigned),
                SelectOption::new(names.x.clone(), Choice::Partner(Partner::X)),
                SelectOption::new(names.y.clone(), Choice::Partner(Partner::Y)),
            ],
            _ => Vec::new(),
        }
    }

    /// Update for a picked option
    pub fn choose(
        &self,
        coord: GridCoord,
        choice: Choice,
        household: &Household,
    ) -> FairShareResult<(ExpenseId, ExpensePatch)> {
        let row = self
            .row(coord.row)
            .ok_or_else(|| FairShareError::Validation("No such row".into()))?;
        let key = self
            .spec(coord.col)
            .map(|s| s.key)
            .ok_or_else(|| FairShareError::Validation("No such column".into()))?;
        let patch = choice_patch(key, choice, household)?;
        Ok((row.id(), patch))
    }
}

impl GridSource for ExpenseGrid<'_> {
    fn row_count(&self) -> usize {
        self.view.len()
    }

    fn column_count(&self) -> usize {
        EXPENSE_COLUMNS.len()
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

/// Patch for a typed value
pub fn text_patch(column: ExpenseColumn, value: &str) -> FairShareResult<ExpensePatch> {
    let mut patch = ExpensePatch::default();
    match column {
        ExpenseColumn::Name => patch.name = Some(value.to_string()),
        ExpenseColumn::Amount => patch.amount = Some(convert::parse_amount(value)?),
        ExpenseColumn::Param => patch.frequency_param = Some(convert::parse_param(value)?),
        ExpenseColumn::BenefitX => patch.benefit_x = Some(convert::parse_benefit_x(value)?),
        ExpenseColumn::BenefitY => patch.benefit_x = Some(convert::parse_benefit_y(value)?),
        other => {
            return Err(FairShareError::Validation(format!(
                "Column '{}' cannot be typed into",
                expense_column(other).id
            )))
        }
    }
    Ok(patch)
}

/// Patch for a picked option
pub fn choice_patch(column: ExpenseColumn, choice: Choice, household: &Household) -> FairShareResult<ExpensePatch> {
    let mut patch = ExpensePatch::default();
    match (column, choice) {
        (ExpenseColumn::Category, Choice::Unassigned) => patch.category_id = Some(None),
        (ExpenseColumn::Category, Choice::Category(id)) => patch.category_id = Some(Some(id)),
        (ExpenseColumn::Budget, Choice::Unassigned) => patch.budget_id = Some(None),
        (ExpenseColumn::Budget, Choice::Budget(id)) => patch.budget_id = Some(Some(id)),
        (ExpenseColumn::PaymentMethod, Choice::Unassigned) => patch.set_linked_account(None),
        (ExpenseColumn::PaymentMethod, Choice::Account(id)) => {
            let account = household.account(id).ok_or_else(|| FairShareError::NotFound {
                entity_type: "Payment method",
                identifier: id.to_string(),
            })?;
            patch.set_linked_account(Some(account));
        }
        (ExpenseColumn::Frequency, Choice::Frequency(f)) => patch.frequency_type = Some(f),
        (ExpenseColumn::Payer, Choice::Unassigned) => patch.payer = Some(None),
        (ExpenseColumn::Payer, Choice::Partner(p)) => patch.payer = Some(Some(p)),
        (column, _) => {
            return Err(FairShareError::Validation(format!(
                "That choice does not apply to column '{}'",
                expense_column(column).id
            )))
        }
    }
    Ok(patch)
}

fn reference_options<T: ReferenceEntity>(items: &[T], wrap: fn(T::Id) -> Choice) -> Vec<SelectOption> {
    let mut sorted: Vec<&T> = items.iter().collect();
    sorted.sort_by(|a, b| locale_cmp(a.name(), b.name()));
    std::iter::once(SelectOption::new("(none)", Choice::Unassigned))
        .chain(sorted.into_iter().map(|t| SelectOption::new(t.name(), wrap(t.id()))))
        .collect()
}

fn new_option(kind: ReferenceKind) -> SelectOption {
    SelectOption::new("(new…)", Choice::New(kind))
}

/// Select column holding references of `kind`
pub fn reference_column(kind: ReferenceKind) -> ExpenseColumn {
    match kind {
        ReferenceKind::Category => ExpenseColumn::Category,
        ReferenceKind::Budget => ExpenseColumn::Budget,
        ReferenceKind::LinkedAccount => ExpenseColumn::PaymentMethod,
    }
}

/// Frequency picker entries, in picker order
pub fn frequency_options() -> Vec<SelectOption> {
    FrequencyType::PICKER_ORDER
        .iter()
        .map(|f| SelectOption::new(f.label(), Choice::Frequency(*f)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::state::{GridEffect, GridEvent, GridKey, GridState};
    use crate::models::{Category, Expense, LinkedAccount, Money, NewExpense};
    use crate::view::{derive_expense_view, ViewQuery};

    fn household() -> Household {
        let mut h = Household::default();
        let food = Category::new("Food");
        h.expenses.push(Expense::create(
            ExpenseId::new(),
            NewExpense {
                name: "Groceries".into(),
                amount: Money::from_cents(10050),
                category_id: Some(food.id),
                ..Default::default()
            },
        ));
        h.categories.push(food);
        h.categories.push(Category::new("bills"));
        h.accounts.push(LinkedAccount::with_owner("Visa", Some(Partner::Y)));
        h
    }

    fn col(key: ExpenseColumn) -> usize {
        EXPENSE_COLUMNS.iter().position(|c| c.key == key).unwrap()
    }

    #[test]
    fn test_column_ids_are_unique() {
        let mut ids: Vec<&str> = EXPENSE_COLUMNS.iter().map(|c| c.id).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), EXPENSE_COLUMNS.len());
    }

    #[test]
    fn test_cell_display() {
        let h = household();
        let view = derive_expense_view(&h, &PartnerNames::default(), &ViewQuery::default());
        let grid = ExpenseGrid::new(&view);
        let names = PartnerNames::default();
        let ctx = CellContext {
            names: &names,
            currency: "$",
        };
        assert_eq!(grid.display(GridCoord::new(0, col(ExpenseColumn::Amount)), &ctx), "$101");
        assert_eq!(grid.display(GridCoord::new(0, col(ExpenseColumn::Category)), &ctx), "Food");
        assert_eq!(grid.display(GridCoord::new(0, col(ExpenseColumn::Payer)), &ctx), "-");
        assert_eq!(grid.display(GridCoord::new(0, col(ExpenseColumn::BenefitY)), &ctx), "50%");
        assert_eq!(grid.cell_text(GridCoord::new(0, col(ExpenseColumn::Amount))), "100.5");
    }

    #[test]
    fn test_param_cell_read_only_unless_parametrized() {
        let mut h = household();
        let view = derive_expense_view(&h, &PartnerNames::default(), &ViewQuery::default());
        let coord = GridCoord::new(0, col(ExpenseColumn::Param));
        assert_eq!(ExpenseGrid::new(&view).editor(coord), CellEditor::ReadOnly);

        h.expenses[0].frequency_type = FrequencyType::EveryNWeeks;
        let view = derive_expense_view(&h, &PartnerNames::default(), &ViewQuery::default());
        assert_eq!(ExpenseGrid::new(&view).editor(coord), CellEditor::Number);
    }

    #[test]
    fn test_edit_amount_through_state_machine() {
        let h = household();
        let view = derive_expense_view(&h, &PartnerNames::default(), &ViewQuery::default());
        let grid = ExpenseGrid::new(&view);
        let coord = GridCoord::new(0, col(ExpenseColumn::Amount));

        let mut state = GridState::new();
        state.dispatch(GridEvent::PointerDown(coord), &grid);
        for _ in 0..5 {
            state.dispatch(GridEvent::Backspace, &grid);
        }
        for c in "250".chars() {
            state.dispatch(GridEvent::Input(c), &grid);
        }
        let effect = state.dispatch(GridEvent::Key(GridKey::Tab), &grid);
        let Some(GridEffect::Commit { coord, value }) = effect else {
            panic!("expected commit, got {:?}", effect);
        };
        let (id, patch) = grid.commit(coord, &value).unwrap();
        assert_eq!(id, h.expenses[0].id);
        assert_eq!(patch.amount, Some(Money::from_whole(250)));
    }

    #[test]
    fn test_text_patch_conversions() {
        let patch = text_patch(ExpenseColumn::BenefitY, "30").unwrap();
        assert_eq!(patch.benefit_x.map(|b| b.x()), Some(70));

        let patch = text_patch(ExpenseColumn::Param, "").unwrap();
        assert_eq!(patch.frequency_param, Some(None));

        assert!(text_patch(ExpenseColumn::Amount, "twelve").is_err());
        assert!(text_patch(ExpenseColumn::Monthly, "5").is_err());
    }

    #[test]
    fn test_choosing_account_sets_payer() {
        let h = household();
        let visa = h.accounts[0].id;
        let patch = choice_patch(ExpenseColumn::PaymentMethod, Choice::Account(visa), &h).unwrap();
        assert_eq!(patch.linked_account_id, Some(Some(visa)));
        assert_eq!(patch.payer, Some(Some(Partner::Y)));

        let patch = choice_patch(ExpenseColumn::PaymentMethod, Choice::Unassigned, &h).unwrap();
        assert_eq!(patch.linked_account_id, Some(None));
        assert_eq!(patch.payer, Some(None));
    }

    #[test]
    fn test_options_sorted_with_none_first() {
        let h = household();
        let view = derive_expense_view(&h, &PartnerNames::default(), &ViewQuery::default());
        let grid = ExpenseGrid::new(&view);
        let options = grid.options(
            GridCoord::new(0, col(ExpenseColumn::Category)),
            &h,
            &PartnerNames::default(),
        );
        let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["(none)", "bills", "Food", "(new…)"]);
        assert_eq!(options[3].choice, Choice::New(ReferenceKind::Category));

        let freq = grid.options(
            GridCoord::new(0, col(ExpenseColumn::Frequency)),
            &h,
            &PartnerNames::default(),
        );
        assert_eq!(freq[0].choice, Choice::Frequency(FrequencyType::Weekly));
        assert_eq!(freq.len(), 10);
    }

    #[test]
    fn test_toggle_estimate() {
        let h = household();
        let view = derive_expense_view(&h, &PartnerNames::default(), &ViewQuery::default());
        let grid = ExpenseGrid::new(&view);
        let (_, patch) = grid
            .toggle(GridCoord::new(0, col(ExpenseColumn::Estimate)))
            .unwrap();
        assert_eq!(patch.is_estimate, Some(true));
        assert!(grid.toggle(GridCoord::new(0, col(ExpenseColumn::Name))).is_none());
    }
}
