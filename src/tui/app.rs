//! Application state for the TUI
//!
//! The app keeps its own copy of the household. Every edit is applied to
//! that copy at once and handed to the write queue; a failed write comes
//! back later as an error notification and the copy is left as typed.

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::config::preferences::{
    load_expense_query, load_income_sort, save_expense_query, save_income_sort, PreferenceStore,
};
use crate::config::settings::{validate_partner_names, Settings};
use crate::error::FairShareError;
use crate::grid::expense_grid::{self, EXPENSE_COLUMNS};
use crate::grid::income_grid::{self, INCOME_COLUMNS};
use crate::grid::{
    CellContext, Choice, ExpenseGrid, GridCoord, GridEffect, GridEvent, GridState, IncomeGrid,
    SelectOption,
};
use crate::models::reference::validate_name;
use crate::models::{
    Budget, Category, ExpenseId, ExpensePatch, Household, HouseholdReference, IncomeId,
    IncomePatch, LinkedAccount, NewExpense, NewIncome, Partner, PartnerNames, ReferenceEntity,
    ReferenceKind,
};
use crate::persistence::{ReferenceId, Ticket, WriteOutcome, WriteQueue, WriteReceipt, WriteRequest};
use crate::view::{derive_income_view, ExpenseView, IncomeSortKey, IncomeView, ViewCache, ViewQuery};

use super::dialogs::{
    ConfirmAction, ConfirmState, InputPurpose, InputState, PickerState, PickerTarget,
};
use super::widgets::{GridHitMap, GridScroll, Notification, NotificationQueue};

/// Which tab is showing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ActiveView {
    #[default]
    Expenses,
    Incomes,
    Config,
}

impl ActiveView {
    pub const ALL: [ActiveView; 3] = [Self::Expenses, Self::Incomes, Self::Config];

    pub fn title(self) -> &'static str {
        match self {
            Self::Expenses => "Expenses",
            Self::Incomes => "Incomes",
            Self::Config => "Configuration",
        }
    }
}

/// Sections of the configuration tab
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfigSection {
    #[default]
    Partners,
    Categories,
    Budgets,
    Accounts,
}

impl ConfigSection {
    pub const ALL: [ConfigSection; 4] = [
        Self::Partners,
        Self::Categories,
        Self::Budgets,
        Self::Accounts,
    ];

    pub fn kind(self) -> Option<ReferenceKind> {
        match self {
            Self::Partners => None,
            Self::Categories => Some(ReferenceKind::Category),
            Self::Budgets => Some(ReferenceKind::Budget),
            Self::Accounts => Some(ReferenceKind::LinkedAccount),
        }
    }

    fn shifted(self, delta: isize) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0) as isize;
        let len = Self::ALL.len() as isize;
        Self::ALL[(idx + delta).rem_euclid(len) as usize]
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigState {
    pub section: ConfigSection,
    pub selected: usize,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum ActiveDialog {
    #[default]
    None,
    Help,
    Picker(PickerState),
    Confirm(ConfirmState),
    Input(InputState),
}

/// A category, budget or payment method as listed on the config tab
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceEntry {
    pub id: ReferenceId,
    pub name: String,
    pub owner: Option<Partner>,
    pub usage: usize,
}

fn entries_of<T: HouseholdReference>(
    household: &Household,
    wrap: fn(T::Id) -> ReferenceId,
    owner: fn(&T) -> Option<Partner>,
) -> Vec<ReferenceEntry> {
    household
        .references::<T>()
        .iter()
        .map(|r| ReferenceEntry {
            id: wrap(r.id()),
            name: r.name().to_string(),
            owner: owner(r),
            usage: household.usage_count::<T>(r.id()),
        })
        .collect()
}

/// Entries of one kind, in creation order
pub fn reference_entries(household: &Household, kind: ReferenceKind) -> Vec<ReferenceEntry> {
    match kind {
        ReferenceKind::Category => entries_of::<Category>(household, ReferenceId::Category, |_| None),
        ReferenceKind::Budget => entries_of::<Budget>(household, ReferenceId::Budget, |_| None),
        ReferenceKind::LinkedAccount => {
            entries_of::<LinkedAccount>(household, ReferenceId::Account, |a| a.owner)
        }
    }
}

/// Name rules for a new or renamed entry, checked before any write
fn check_reference_name(
    household: &Household,
    kind: ReferenceKind,
    name: &str,
    except: Option<ReferenceId>,
) -> Result<(), String> {
    validate_name(name).map_err(|e| e.to_string())?;
    let taken = reference_entries(household, kind)
        .into_iter()
        .any(|e| Some(e.id) != except && e.name.to_lowercase() == name.to_lowercase());
    if taken {
        return Err(format!(
            "{} '{}' already exists",
            kind.label(),
            name
        ));
    }
    Ok(())
}

fn rename_local<T: HouseholdReference>(household: &mut Household, id: T::Id, name: &str) {
    if let Some(record) = household.references_mut::<T>().iter_mut().find(|r| r.id() == id) {
        record.set_name(name.to_string());
    }
}

/// Repoint (or clear) every expense using `id`, then drop the entry
fn remove_local<T: HouseholdReference>(household: &mut Household, id: T::Id, to: Option<T::Id>) {
    let target = to.and_then(|t| {
        household
            .references::<T>()
            .iter()
            .find(|r| r.id() == t)
            .cloned()
    });
    let patch = T::repoint(target.as_ref());
    for expense in household
        .expenses
        .iter_mut()
        .filter(|e| T::referenced_by(e) == Some(id))
    {
        expense.apply(&patch);
    }
    household.references_mut::<T>().retain(|r| r.id() != id);
}

fn remove_reference_local(household: &mut Household, id: ReferenceId, to: Option<ReferenceId>) {
    match (id, to) {
        (ReferenceId::Category(id), Some(ReferenceId::Category(to))) => {
            remove_local::<Category>(household, id, Some(to))
        }
        (ReferenceId::Category(id), _) => remove_local::<Category>(household, id, None),
        (ReferenceId::Budget(id), Some(ReferenceId::Budget(to))) => {
            remove_local::<Budget>(household, id, Some(to))
        }
        (ReferenceId::Budget(id), _) => remove_local::<Budget>(household, id, None),
        (ReferenceId::Account(id), Some(ReferenceId::Account(to))) => {
            remove_local::<LinkedAccount>(household, id, Some(to))
        }
        (ReferenceId::Account(id), _) => remove_local::<LinkedAccount>(household, id, None),
    }
}

/// Store a record the backend returned; `insert` for fresh adds only
fn upsert_local<T: HouseholdReference>(household: &mut Household, record: T, insert: bool) -> bool {
    let records = household.references_mut::<T>();
    match records.iter_mut().find(|r| r.id() == record.id()) {
        Some(existing) => {
            *existing = record;
            true
        }
        None if insert => {
            records.push(record);
            true
        }
        None => false,
    }
}

fn choice_reference(choice: Choice) -> Option<ReferenceId> {
    match choice {
        Choice::Category(id) => Some(ReferenceId::Category(id)),
        Choice::Budget(id) => Some(ReferenceId::Budget(id)),
        Choice::Account(id) => Some(ReferenceId::Account(id)),
        _ => None,
    }
}

fn reference_choice(id: ReferenceId) -> Choice {
    match id {
        ReferenceId::Category(id) => Choice::Category(id),
        ReferenceId::Budget(id) => Choice::Budget(id),
        ReferenceId::Account(id) => Choice::Account(id),
    }
}

/// Work left after a grid transition, once the view borrow has ended
enum Followup {
    None,
    UpdateExpense(ExpenseId, ExpensePatch),
    UpdateIncome(IncomeId, IncomePatch),
    Pick(PickerState),
    Invalid(FairShareError),
}

#[derive(Debug, Clone, Copy)]
enum NewRow {
    Expense(ExpenseId),
    Income(IncomeId),
}

fn expense_activation(
    grid: &ExpenseGrid<'_>,
    coord: GridCoord,
    household: &Household,
    names: &PartnerNames,
) -> Followup {
    if let Some((id, patch)) = grid.toggle(coord) {
        return Followup::UpdateExpense(id, patch);
    }
    let (Some(row), Some(spec)) = (grid.row(coord.row), grid.spec(coord.col)) else {
        return Followup::None;
    };
    let options = grid.options(coord, household, names);
    if options.is_empty() {
        return Followup::None;
    }
    let current = grid.display(coord, &CellContext { names, currency: "" });
    let target = PickerTarget::Expense {
        id: row.id(),
        column: spec.key,
    };
    Followup::Pick(PickerState::new(spec.header.render(names), target, options).preselect(&current))
}

fn income_activation(grid: &IncomeGrid<'_>, coord: GridCoord, names: &PartnerNames) -> Followup {
    let (Some(row), Some(spec)) = (grid.row(coord.row), grid.spec(coord.col)) else {
        return Followup::None;
    };
    let options = grid.options(coord, names);
    if options.is_empty() {
        return Followup::None;
    }
    let current = grid.display(coord, &CellContext { names, currency: "" });
    let target = PickerTarget::Income {
        id: row.id(),
        column: spec.key,
    };
    Followup::Pick(PickerState::new(spec.header.render(names), target, options).preselect(&current))
}

/// Main application state
pub struct App {
    pub household: Household,
    pub settings: Settings,
    preferences: Box<dyn PreferenceStore>,
    queue: WriteQueue,
    /// Adds whose record should be inserted (and focused) when they land
    pending_adds: HashSet<Ticket>,
    /// Expense that takes the entry created by an add, keyed by its ticket
    pending_assignments: HashMap<Ticket, ExpenseId>,
    /// Bumped on every local data change; keys the view cache
    revision: u64,
    view_cache: ViewCache,
    pub expense_query: ViewQuery,
    pub income_sort: IncomeSortKey,
    pub expense_grid: GridState,
    pub income_grid: GridState,
    expense_shape: Vec<ExpenseId>,
    income_shape: Vec<IncomeId>,
    pub expense_scroll: GridScroll,
    pub income_scroll: GridScroll,
    pub expense_hits: GridHitMap,
    pub income_hits: GridHitMap,
    /// (view, first x, last x) of each tab title
    pub tab_hits: Vec<(ActiveView, u16, u16)>,
    pub active_view: ActiveView,
    pub active_dialog: ActiveDialog,
    pub config: ConfigState,
    pub notifications: NotificationQueue,
    pub should_quit: bool,
}

impl App {
    pub fn new(
        household: Household,
        settings: Settings,
        preferences: Box<dyn PreferenceStore>,
        queue: WriteQueue,
    ) -> Self {
        let expense_query = load_expense_query(preferences.as_ref());
        let income_sort = load_income_sort(preferences.as_ref());
        let mut app = Self {
            household,
            settings,
            preferences,
            queue,
            pending_adds: HashSet::new(),
            pending_assignments: HashMap::new(),
            revision: 0,
            view_cache: ViewCache::new(),
            expense_query,
            income_sort,
            expense_grid: GridState::new(),
            income_grid: GridState::new(),
            expense_shape: Vec::new(),
            income_shape: Vec::new(),
            expense_scroll: GridScroll::default(),
            income_scroll: GridScroll::default(),
            expense_hits: GridHitMap::default(),
            income_hits: GridHitMap::default(),
            tab_hits: Vec::new(),
            active_view: ActiveView::default(),
            active_dialog: ActiveDialog::default(),
            config: ConfigState::default(),
            notifications: NotificationQueue::new(),
            should_quit: false,
        };
        app.refresh_shapes(None);
        app
    }

    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    pub fn names(&self) -> &PartnerNames {
        &self.settings.partners
    }

    /// The memoized expense view for the current query
    pub fn expense_view(&mut self) -> &ExpenseView {
        self.view_cache.get(
            &self.household,
            &self.settings.partners,
            &self.expense_query,
            self.revision,
        )
    }

    pub fn income_view(&self) -> IncomeView {
        derive_income_view(&self.household, &self.income_sort)
    }

    /// Writes not yet acknowledged by the backend
    pub fn writes_in_flight(&self) -> usize {
        self.queue.in_flight()
    }

    fn notify_error(&mut self, message: impl Into<String>) {
        self.notifications.push(Notification::error(message));
    }

    // ---- writes ------------------------------------------------------

    fn submit(&mut self, request: WriteRequest) -> Ticket {
        debug!(request = %request.describe(), "submitting write");
        self.queue.submit(request)
    }

    /// Handle every outcome that has arrived, without blocking
    pub fn poll_writes(&mut self) {
        for outcome in self.queue.poll() {
            self.handle_outcome(outcome);
        }
    }

    /// Wait for every submitted write and handle the outcomes
    pub fn settle_writes(&mut self) {
        for outcome in self.queue.drain() {
            self.handle_outcome(outcome);
        }
    }

    fn handle_outcome(&mut self, outcome: WriteOutcome) {
        let is_add = self.pending_adds.remove(&outcome.ticket);
        let assign_to = self.pending_assignments.remove(&outcome.ticket);
        let receipt = match outcome.result {
            Ok(receipt) => receipt,
            Err(err) => {
                warn!(request = %outcome.label, error = %err, "write failed");
                self.notify_error(format!("{} failed: {}", outcome.label, err));
                return;
            }
        };

        let created = match &receipt {
            WriteReceipt::Category(c) => Some(ReferenceId::Category(c.id)),
            WriteReceipt::Budget(b) => Some(ReferenceId::Budget(b.id)),
            WriteReceipt::Account(a) => Some(ReferenceId::Account(a.id)),
            _ => None,
        };
        let changed = match receipt {
            WriteReceipt::Expense(expense) if is_add => {
                let id = expense.id;
                self.household.expenses.push(expense);
                self.mark_changed(Some(NewRow::Expense(id)));
                return;
            }
            WriteReceipt::Income(income) if is_add => {
                let id = income.id;
                self.household.incomes.push(income);
                self.mark_changed(Some(NewRow::Income(id)));
                return;
            }
            WriteReceipt::Category(c) => upsert_local(&mut self.household, c, is_add),
            WriteReceipt::Budget(b) => upsert_local(&mut self.household, b, is_add),
            WriteReceipt::Account(a) => upsert_local(&mut self.household, a, is_add),
            _ => false,
        };
        if changed {
            self.mark_changed(None);
        }
        if let (Some(expense), Some(created)) = (assign_to, created) {
            self.assign_reference(expense, created);
        }
    }

    /// Point an expense at an entry created from its picker
    fn assign_reference(&mut self, expense: ExpenseId, id: ReferenceId) {
        let column = expense_grid::reference_column(id.kind());
        match expense_grid::choice_patch(column, reference_choice(id), &self.household) {
            Ok(patch) => self.update_expense(expense, patch),
            Err(e) => self.notify_error(e.to_string()),
        }
    }

    // ---- shape tracking ----------------------------------------------

    fn mark_changed(&mut self, new_row: Option<NewRow>) {
        self.revision += 1;
        self.refresh_shapes(new_row);
    }

    /// Reset (or hand to a new row) grid focus when rows were added,
    /// removed or reordered
    fn refresh_shapes(&mut self, new_row: Option<NewRow>) {
        let view = self.view_cache.get(
            &self.household,
            &self.settings.partners,
            &self.expense_query,
            self.revision,
        );
        let added = match new_row {
            Some(NewRow::Expense(id)) => {
                let position = view.position_of(id);
                if position.is_none() {
                    self.notifications
                        .push(Notification::info("Added expense is hidden by the payer filter"));
                }
                position
            }
            _ => None,
        };
        let ids = view.row_ids();
        if ids != self.expense_shape {
            let event = added.map_or(GridEvent::RowsReshaped, |row| GridEvent::RowAdded { row });
            self.expense_grid.dispatch(event, &ExpenseGrid::new(view));
            self.expense_shape = ids;
        }

        let view = derive_income_view(&self.household, &self.income_sort);
        let ids = view.row_ids();
        if ids != self.income_shape {
            let added = match new_row {
                Some(NewRow::Income(id)) => view.position_of(id),
                _ => None,
            };
            let event = added.map_or(GridEvent::RowsReshaped, |row| GridEvent::RowAdded { row });
            self.income_grid.dispatch(event, &IncomeGrid::new(&view));
            self.income_shape = ids;
        }
    }

    // ---- grids -------------------------------------------------------

    pub fn expense_event(&mut self, event: GridEvent) {
        let followup = {
            let view = self.view_cache.get(
                &self.household,
                &self.settings.partners,
                &self.expense_query,
                self.revision,
            );
            let grid = ExpenseGrid::new(view);
            match self.expense_grid.dispatch(event, &grid) {
                None => Followup::None,
                Some(GridEffect::Commit { coord, value }) => match grid.commit(coord, &value) {
                    Ok((id, patch)) => Followup::UpdateExpense(id, patch),
                    Err(e) => Followup::Invalid(e),
                },
                Some(GridEffect::Activate(coord)) => {
                    expense_activation(&grid, coord, &self.household, &self.settings.partners)
                }
            }
        };
        self.follow(followup);
    }

    pub fn income_event(&mut self, event: GridEvent) {
        let view = derive_income_view(&self.household, &self.income_sort);
        let grid = IncomeGrid::new(&view);
        let followup = match self.income_grid.dispatch(event, &grid) {
            None => Followup::None,
            Some(GridEffect::Commit { coord, value }) => match grid.commit(coord, &value) {
                Ok((id, patch)) => Followup::UpdateIncome(id, patch),
                Err(e) => Followup::Invalid(e),
            },
            Some(GridEffect::Activate(coord)) => {
                income_activation(&grid, coord, &self.settings.partners)
            }
        };
        self.follow(followup);
    }

    /// Feed an event to whichever grid is showing
    pub fn grid_event(&mut self, event: GridEvent) {
        match self.active_view {
            ActiveView::Expenses => self.expense_event(event),
            ActiveView::Incomes => self.income_event(event),
            ActiveView::Config => {}
        }
    }

    pub fn active_grid(&self) -> Option<&GridState> {
        match self.active_view {
            ActiveView::Expenses => Some(&self.expense_grid),
            ActiveView::Incomes => Some(&self.income_grid),
            ActiveView::Config => None,
        }
    }

    pub fn is_editing(&self) -> bool {
        self.active_grid().is_some_and(GridState::is_editing)
    }

    /// Commit a pending edit as if focus had left the grid
    pub fn blur(&mut self) {
        self.grid_event(GridEvent::Blur);
    }

    fn follow(&mut self, followup: Followup) {
        match followup {
            Followup::None => {}
            Followup::UpdateExpense(id, patch) => self.update_expense(id, patch),
            Followup::UpdateIncome(id, patch) => self.update_income(id, patch),
            Followup::Pick(picker) => self.active_dialog = ActiveDialog::Picker(picker),
            Followup::Invalid(err) => self.notify_error(err.to_string()),
        }
    }

    pub fn update_expense(&mut self, id: ExpenseId, patch: ExpensePatch) {
        if patch.is_empty() {
            return;
        }
        let Some(expense) = self.household.expense_mut(id) else {
            return;
        };
        let mut candidate = expense.clone();
        candidate.apply(&patch);
        if let Err(e) = candidate.validate() {
            self.notifications.push(Notification::error(e.to_string()));
            return;
        }
        *expense = candidate;
        self.submit(WriteRequest::UpdateExpense { id, patch });
        self.mark_changed(None);
    }

    pub fn update_income(&mut self, id: IncomeId, patch: IncomePatch) {
        if patch.is_empty() {
            return;
        }
        let Some(income) = self.household.income_mut(id) else {
            return;
        };
        let mut candidate = income.clone();
        candidate.apply(&patch);
        if let Err(e) = candidate.validate() {
            self.notifications.push(Notification::error(e.to_string()));
            return;
        }
        *income = candidate;
        self.submit(WriteRequest::UpdateIncome { id, patch });
        self.mark_changed(None);
    }

    /// Add a row to the active grid; it takes focus once created
    pub fn add_row(&mut self) {
        let request = match self.active_view {
            ActiveView::Expenses => WriteRequest::AddExpense(NewExpense::default()),
            ActiveView::Incomes => WriteRequest::AddIncome(NewIncome::default()),
            ActiveView::Config => return,
        };
        let ticket = self.submit(request);
        self.pending_adds.insert(ticket);
    }

    /// Ask before deleting the focused row
    pub fn request_row_delete(&mut self) {
        match self.active_view {
            ActiveView::Expenses => {
                let Some(focus) = self.expense_grid.focus() else {
                    return;
                };
                let Some(row) = self.expense_view().row(focus.row) else {
                    return;
                };
                let message = format!("Delete expense '{}'?", row.expense.display_name());
                let action = ConfirmAction::RemoveExpense(row.id());
                self.active_dialog = ActiveDialog::Confirm(ConfirmState::new(message, action));
            }
            ActiveView::Incomes => {
                let Some(focus) = self.income_grid.focus() else {
                    return;
                };
                let view = self.income_view();
                let Some(row) = view.rows.get(focus.row) else {
                    return;
                };
                let message = format!("Delete income '{}'?", row.income.name);
                let action = ConfirmAction::RemoveIncome(row.id());
                self.active_dialog = ActiveDialog::Confirm(ConfirmState::new(message, action));
            }
            ActiveView::Config => self.request_reference_delete(),
        }
    }

    pub fn confirm(&mut self, action: ConfirmAction) {
        match action {
            ConfirmAction::RemoveExpense(id) => {
                self.household.expenses.retain(|e| e.id != id);
                self.submit(WriteRequest::RemoveExpense(id));
            }
            ConfirmAction::RemoveIncome(id) => {
                self.household.incomes.retain(|i| i.id != id);
                self.submit(WriteRequest::RemoveIncome(id));
            }
            ConfirmAction::RemoveReference(id) => {
                remove_reference_local(&mut self.household, id, None);
                self.submit(WriteRequest::RemoveReference(id));
                self.clamp_config_selection();
            }
        }
        self.mark_changed(None);
    }

    pub fn pick(&mut self, target: PickerTarget, choice: Choice) {
        if let (PickerTarget::Expense { id, .. }, Choice::New(kind)) = (target, choice) {
            let title = format!("New {}", kind.label().to_lowercase());
            let purpose = InputPurpose::AddReferenceFor { kind, expense: id };
            self.active_dialog = ActiveDialog::Input(InputState::new(title, purpose, ""));
            return;
        }
        match target {
            PickerTarget::Expense { id, column } => {
                match expense_grid::choice_patch(column, choice, &self.household) {
                    Ok(patch) => self.update_expense(id, patch),
                    Err(e) => self.notify_error(e.to_string()),
                }
            }
            PickerTarget::Income { id, column } => match income_grid::choice_patch(column, choice) {
                Ok(patch) => self.update_income(id, patch),
                Err(e) => self.notify_error(e.to_string()),
            },
            PickerTarget::Reassign(id) => {
                let to = choice_reference(choice);
                remove_reference_local(&mut self.household, id, to);
                self.submit(WriteRequest::RemoveReferenceReassigning { id, to });
                self.clamp_config_selection();
                self.mark_changed(None);
            }
        }
    }

    // ---- view query --------------------------------------------------

    pub fn set_expense_query(&mut self, query: ViewQuery) {
        if query == self.expense_query {
            return;
        }
        self.expense_query = query;
        if let Err(e) = save_expense_query(self.preferences.as_mut(), &query) {
            warn!(error = %e, "could not save grid preferences");
            self.notify_error(e.to_string());
        }
        self.refresh_shapes(None);
    }

    pub fn set_income_sort(&mut self, sort: IncomeSortKey) {
        if sort == self.income_sort {
            return;
        }
        self.income_sort = sort;
        if let Err(e) = save_income_sort(self.preferences.as_mut(), &sort) {
            warn!(error = %e, "could not save grid preferences");
            self.notify_error(e.to_string());
        }
        self.refresh_shapes(None);
    }

    /// Header-click sorting on column `col` of the active grid
    pub fn sort_by_column(&mut self, col: usize) {
        match self.active_view {
            ActiveView::Expenses => {
                if let Some(column) = EXPENSE_COLUMNS.get(col).and_then(|c| c.sort) {
                    let mut query = self.expense_query;
                    query.sort = query.sort.clicked(column);
                    self.set_expense_query(query);
                }
            }
            ActiveView::Incomes => {
                if let Some(column) = INCOME_COLUMNS.get(col).and_then(|c| c.sort) {
                    self.set_income_sort(self.income_sort.clicked(column));
                }
            }
            ActiveView::Config => {}
        }
    }

    pub fn cycle_payer_filter(&mut self) {
        let mut query = self.expense_query;
        query.filter = query.filter.cycle();
        self.set_expense_query(query);
    }

    pub fn cycle_grouping(&mut self) {
        let mut query = self.expense_query;
        query.group_by = query.group_by.cycle();
        self.set_expense_query(query);
    }

    pub fn switch_view(&mut self, view: ActiveView) {
        if view != self.active_view {
            self.blur();
            self.active_view = view;
        }
    }

    // ---- configuration tab -------------------------------------------

    fn config_len(&self) -> usize {
        match self.config.section.kind() {
            None => Partner::ALL.len(),
            Some(kind) => reference_entries(&self.household, kind).len(),
        }
    }

    fn clamp_config_selection(&mut self) {
        let len = self.config_len();
        self.config.selected = self.config.selected.min(len.saturating_sub(1));
    }

    pub fn config_move(&mut self, delta: isize) {
        let len = self.config_len();
        if len == 0 {
            self.config.selected = 0;
            return;
        }
        let next = (self.config.selected as isize + delta).clamp(0, len as isize - 1);
        self.config.selected = next as usize;
    }

    pub fn config_section(&mut self, delta: isize) {
        self.config.section = self.config.section.shifted(delta);
        self.config.selected = 0;
    }

    pub fn selected_reference(&self) -> Option<ReferenceEntry> {
        let kind = self.config.section.kind()?;
        reference_entries(&self.household, kind)
            .into_iter()
            .nth(self.config.selected)
    }

    pub fn begin_add_reference(&mut self) {
        if let Some(kind) = self.config.section.kind() {
            let title = format!("New {}", kind.label().to_lowercase());
            self.active_dialog =
                ActiveDialog::Input(InputState::new(title, InputPurpose::AddReference(kind), ""));
        }
    }

    /// Rename the selected entry, or edit the selected partner's name
    pub fn begin_rename(&mut self) {
        let state = match self.config.section {
            ConfigSection::Partners => {
                let partner = Partner::ALL[self.config.selected.min(1)];
                InputState::new(
                    format!("Partner {} name", partner),
                    InputPurpose::PartnerName(partner),
                    self.settings.partners.name(partner),
                )
            }
            _ => {
                let Some(entry) = self.selected_reference() else {
                    return;
                };
                InputState::new(
                    format!("Rename {}", entry.id.kind().label().to_lowercase()),
                    InputPurpose::RenameReference(entry.id),
                    entry.name,
                )
            }
        };
        self.active_dialog = ActiveDialog::Input(state);
    }

    pub fn submit_input(&mut self, state: InputState) {
        let value = state.value.trim().to_string();
        match state.purpose {
            InputPurpose::AddReference(kind) => self.add_reference(kind, value, None),
            InputPurpose::AddReferenceFor { kind, expense } => {
                self.add_reference(kind, value, Some(expense))
            }
            InputPurpose::RenameReference(id) => {
                if let Err(e) = check_reference_name(&self.household, id.kind(), &value, Some(id)) {
                    self.notify_error(e);
                    return;
                }
                match id {
                    ReferenceId::Category(id) => rename_local::<Category>(&mut self.household, id, &value),
                    ReferenceId::Budget(id) => rename_local::<Budget>(&mut self.household, id, &value),
                    ReferenceId::Account(id) => {
                        rename_local::<LinkedAccount>(&mut self.household, id, &value)
                    }
                }
                self.submit(WriteRequest::RenameReference { id, name: value });
                self.mark_changed(None);
            }
            InputPurpose::PartnerName(partner) => {
                let names = &self.settings.partners;
                let (x, y) = match partner {
                    Partner::X => (value.clone(), names.y.clone()),
                    Partner::Y => (names.x.clone(), value.clone()),
                };
                match validate_partner_names(&x, &y) {
                    Ok(names) => {
                        self.settings.partners = names.clone();
                        self.submit(WriteRequest::RenamePartners {
                            x: names.x,
                            y: names.y,
                        });
                        self.mark_changed(None);
                    }
                    Err(e) => self.notify_error(e.to_string()),
                }
            }
        }
    }

    fn add_reference(&mut self, kind: ReferenceKind, name: String, assign_to: Option<ExpenseId>) {
        if let Err(e) = check_reference_name(&self.household, kind, &name, None) {
            self.notify_error(e);
            return;
        }
        let ticket = self.submit(WriteRequest::AddReference {
            kind,
            name,
            owner: None,
        });
        self.pending_adds.insert(ticket);
        if let Some(expense) = assign_to {
            self.pending_assignments.insert(ticket, expense);
        }
    }

    /// Delete the selected entry: confirm when unused, otherwise ask
    /// where its expenses should go
    pub fn request_reference_delete(&mut self) {
        let Some(entry) = self.selected_reference() else {
            return;
        };
        if entry.usage == 0 {
            let message = format!(
                "Delete {} '{}'?",
                entry.id.kind().label().to_lowercase(),
                entry.name
            );
            self.active_dialog = ActiveDialog::Confirm(ConfirmState::new(
                message,
                ConfirmAction::RemoveReference(entry.id),
            ));
            return;
        }

        let mut options = vec![SelectOption::new("(unassign)", Choice::Unassigned)];
        options.extend(
            reference_entries(&self.household, entry.id.kind())
                .into_iter()
                .filter(|e| e.id != entry.id)
                .map(|e| SelectOption::new(e.name, reference_choice(e.id))),
        );
        let picker = PickerState::new(
            format!("Delete '{}'", entry.name),
            PickerTarget::Reassign(entry.id),
            options,
        )
        .with_prompt(format!("Used by {} expense(s). Move them to:", entry.usage));
        self.active_dialog = ActiveDialog::Picker(picker);
    }

    /// Payment method owner: joint, then X, then Y
    pub fn cycle_account_owner(&mut self) {
        let Some(ReferenceEntry {
            id: ReferenceId::Account(id),
            owner,
            ..
        }) = self.selected_reference()
        else {
            return;
        };
        let owner = match owner {
            None => Some(Partner::X),
            Some(Partner::X) => Some(Partner::Y),
            Some(Partner::Y) => None,
        };
        let Some(account) = self.household.accounts.iter_mut().find(|a| a.id == id) else {
            return;
        };
        account.owner = owner;
        let patch = LinkedAccount::repoint(Some(&*account));
        for expense in self
            .household
            .expenses
            .iter_mut()
            .filter(|e| e.linked_account_id == Some(id))
        {
            expense.apply(&patch);
        }
        self.submit(WriteRequest::SetAccountOwner { id, owner });
        self.mark_changed(None);
    }

    /// Commit any pending edit, stop the worker and return the outcomes
    /// that had not been handled yet
    pub fn shutdown(mut self) -> Vec<WriteOutcome> {
        self.blur();
        self.queue.shutdown()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::preferences::{MemoryPreferenceStore, EXPENSES_GROUP_BY};
    use crate::error::FairShareResult;
    use crate::grid::{GridKey, GridMode};
    use crate::models::{Expense, Money};
    use crate::persistence::Persistence;
    use crate::view::{GroupBy, PayerFilter};

    /// Accepts everything, or fails everything
    struct Backend {
        fail: bool,
    }

    impl Persistence for Backend {
        fn execute(&mut self, request: WriteRequest) -> FairShareResult<WriteReceipt> {
            if self.fail {
                return Err(FairShareError::Persistence("disk full".into()));
            }
            Ok(match request {
                WriteRequest::AddExpense(fields) => {
                    WriteReceipt::Expense(Expense::create(ExpenseId::new(), fields))
                }
                WriteRequest::AddReference { name, .. } => WriteReceipt::Category(Category::new(name)),
                _ => WriteReceipt::Removed,
            })
        }
    }

    fn household() -> Household {
        let mut h = Household::default();
        h.expenses.push(Expense::create(
            ExpenseId::new(),
            NewExpense {
                name: "Rent".into(),
                amount: Money::from_whole(1000),
                ..Default::default()
            },
        ));
        h
    }

    fn app(fail: bool) -> App {
        App::new(
            household(),
            Settings::default(),
            Box::new(MemoryPreferenceStore::new()),
            WriteQueue::spawn(Backend { fail }),
        )
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            app.expense_event(GridEvent::Input(c));
        }
    }

    fn amount_col() -> usize {
        EXPENSE_COLUMNS
            .iter()
            .position(|c| c.key == expense_grid::ExpenseColumn::Amount)
            .unwrap()
    }

    #[test]
    fn test_commit_applies_locally() {
        let mut app = app(false);
        app.expense_event(GridEvent::PointerDown(GridCoord::new(0, amount_col())));
        assert!(app.expense_grid.is_editing());
        for _ in 0..10 {
            app.expense_event(GridEvent::Backspace);
        }
        type_text(&mut app, "1200");
        app.expense_event(GridEvent::Key(GridKey::Enter));

        assert_eq!(app.household.expenses[0].amount, Money::from_whole(1200));
        app.settle_writes();
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn test_failed_write_keeps_value_and_notifies() {
        let mut app = app(true);
        app.expense_event(GridEvent::PointerDown(GridCoord::new(0, 0)));
        type_text(&mut app, "!");
        app.expense_event(GridEvent::Blur);

        assert_eq!(app.household.expenses[0].name, "Rent!");
        app.settle_writes();
        let notice = app.notifications.current().unwrap();
        assert!(notice.message.contains("disk full"));
        assert_eq!(app.household.expenses[0].name, "Rent!");
    }

    #[test]
    fn test_invalid_commit_issues_no_write() {
        let mut app = app(false);
        app.expense_event(GridEvent::PointerDown(GridCoord::new(0, amount_col())));
        type_text(&mut app, "abc");
        app.expense_event(GridEvent::Key(GridKey::Enter));

        assert_eq!(app.writes_in_flight(), 0);
        assert_eq!(app.household.expenses[0].amount, Money::from_whole(1000));
        assert!(!app.notifications.is_empty());
    }

    #[test]
    fn test_added_row_starts_editing() {
        let mut app = app(false);
        app.add_row();
        app.settle_writes();

        assert_eq!(app.household.expenses.len(), 2);
        let new_id = app.household.expenses[1].id;
        let row = app.expense_view().position_of(new_id).unwrap();
        match app.expense_grid.mode() {
            GridMode::Editing { coord, .. } => assert_eq!(*coord, GridCoord::new(row, 0)),
            other => panic!("expected editing, got {:?}", other),
        }
    }

    #[test]
    fn test_filtered_out_add_is_reported() {
        let mut app = app(false);
        let mut query = app.expense_query;
        query.filter = PayerFilter::Only(Partner::X);
        app.set_expense_query(query);
        assert!(app.notifications.is_empty());

        app.add_row();
        app.settle_writes();

        assert_eq!(app.household.expenses.len(), 2);
        let notice = app.notifications.current().unwrap();
        assert_eq!(notice.message, "Added expense is hidden by the payer filter");
        assert!(!app.expense_grid.is_editing());
    }

    #[test]
    fn test_query_change_is_saved() {
        let mut app = app(false);
        app.cycle_grouping();
        assert_eq!(app.expense_query.group_by, GroupBy::Category);
        assert_eq!(
            app.preferences.get(EXPENSES_GROUP_BY).as_deref(),
            Some("category")
        );
    }

    #[test]
    fn test_in_use_reference_asks_for_reassignment() {
        let mut app = app(false);
        let food = Category::new("Food");
        let home = Category::new("Home");
        app.household.expenses[0].category_id = Some(food.id);
        app.household.categories.push(food.clone());
        app.household.categories.push(home.clone());

        app.config.section = ConfigSection::Categories;
        app.config.selected = 0;
        app.request_reference_delete();

        let ActiveDialog::Picker(picker) = app.active_dialog.clone() else {
            panic!("expected reassignment picker");
        };
        assert_eq!(picker.options.len(), 2);
        app.pick(picker.target, Choice::Category(home.id));

        assert_eq!(app.household.categories, vec![home.clone()]);
        assert_eq!(app.household.expenses[0].category_id, Some(home.id));
    }

    #[test]
    fn test_category_created_from_picker_is_assigned() {
        let mut app = app(false);
        let col = EXPENSE_COLUMNS
            .iter()
            .position(|c| c.key == expense_grid::ExpenseColumn::Category)
            .unwrap();
        app.expense_event(GridEvent::PointerDown(GridCoord::new(0, col)));
        app.expense_event(GridEvent::Key(GridKey::Enter));

        let ActiveDialog::Picker(picker) = app.active_dialog.clone() else {
            panic!("expected category picker");
        };
        let last = picker.options.last().unwrap();
        assert_eq!(last.choice, Choice::New(ReferenceKind::Category));
        app.pick(picker.target, last.choice);

        let ActiveDialog::Input(mut input) = std::mem::take(&mut app.active_dialog) else {
            panic!("expected name input");
        };
        input.value = "Housing".into();
        app.submit_input(input);
        app.settle_writes();
        app.settle_writes();

        assert_eq!(app.household.categories.len(), 1);
        let housing = app.household.categories[0].id;
        assert_eq!(app.household.expenses[0].category_id, Some(housing));
        assert!(app.notifications.is_empty());
    }

    #[test]
    fn test_duplicate_reference_name_rejected() {
        let mut app = app(false);
        app.household.categories.push(Category::new("Food"));
        app.submit_input(InputState::new(
            "New category",
            InputPurpose::AddReference(ReferenceKind::Category),
            " food ",
        ));
        assert_eq!(app.writes_in_flight(), 0);
        assert!(!app.notifications.is_empty());
    }

    #[test]
    fn test_blank_partner_name_rejected() {
        let mut app = app(false);
        app.submit_input(InputState::new("Partner X name", InputPurpose::PartnerName(Partner::X), "  "));
        assert_eq!(app.settings.partners, PartnerNames::default());
        assert_eq!(app.writes_in_flight(), 0);
    }
}
