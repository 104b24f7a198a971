//! Derived expense and income views
//!
//! A view is a pure function of the household snapshot and the user's
//! (filter, sort, group) choice: filter first, then a single stable sort,
//! then grouping that preserves sorted order inside each group. Totals
//! only ever cover the filtered rows.

pub mod filter;
pub mod group;
pub mod sort;

use std::collections::HashMap;
use std::ops::Range;

use crate::models::{Expense, ExpenseId, Household, Income, IncomeId, Money, PartnerNames};
use crate::split::{fair_share, FairShare, HouseholdIncome, IncomeRatio};

pub use filter::PayerFilter;
pub use group::{GroupBy, GroupKey, UNGROUPED_LABEL};
pub use sort::{
    locale_cmp, IncomeSortColumn, IncomeSortKey, SortColumn, SortDirection, SortKey,
};

/// The user's view choice for the expense grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct ViewQuery {
    pub filter: PayerFilter,
    pub sort: SortKey,
    pub group_by: GroupBy,
}

/// One visible expense with its resolved names and computed figures
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseRow {
    pub expense: Expense,
    pub share: FairShare,
    pub category: String,
    pub budget: String,
    pub account: String,
}

impl ExpenseRow {
    fn new(expense: &Expense, household: &Household, ratio: IncomeRatio) -> Self {
        Self {
            share: fair_share(expense, ratio),
            category: household.category_name(expense.category_id).to_string(),
            budget: household.budget_name(expense.budget_id).to_string(),
            account: household.account_name(expense.linked_account_id).to_string(),
            expense: expense.clone(),
        }
    }

    pub fn id(&self) -> ExpenseId {
        self.expense.id
    }
}

/// Sums over a set of rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Totals {
    pub count: usize,
    pub monthly: Money,
    pub fair_x: Money,
    pub fair_y: Money,
}

impl Totals {
    pub fn of(rows: &[ExpenseRow]) -> Self {
        let monthly: Money = rows.iter().map(|r| r.share.monthly).sum();
        let fair_x: Money = rows.iter().map(|r| r.share.x).sum();
        Self {
            count: rows.len(),
            monthly,
            fair_x,
            fair_y: monthly - fair_x,
        }
    }
}

/// A contiguous run of rows sharing a group key
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseGroup {
    pub key: GroupKey,
    pub label: String,
    /// Indices into [`ExpenseView::rows`]
    pub rows: Range<usize>,
    pub totals: Totals,
}

/// Everything the expense grid shows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpenseView {
    /// Visible rows in display order; grouped rows are concatenated in
    /// group order, so a row's position is its visible row index
    pub rows: Vec<ExpenseRow>,
    pub groups: Option<Vec<ExpenseGroup>>,
    pub totals: Totals,
    pub ratio: IncomeRatio,
}

impl ExpenseView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&ExpenseRow> {
        self.rows.get(index)
    }

    /// Visible index of an expense, if it passes the filter
    pub fn position_of(&self, id: ExpenseId) -> Option<usize> {
        self.rows.iter().position(|r| r.expense.id == id)
    }

    /// Group containing the visible row `index`
    pub fn group_of(&self, index: usize) -> Option<&ExpenseGroup> {
        self.groups
            .as_ref()?
            .iter()
            .find(|g| g.rows.contains(&index))
    }

    /// Visible row ids in order, used to detect reshaping
    pub fn row_ids(&self) -> Vec<ExpenseId> {
        self.rows.iter().map(|r| r.expense.id).collect()
    }
}

/// Derive the expense view
pub fn derive_expense_view(
    household: &Household,
    names: &PartnerNames,
    query: &ViewQuery,
) -> ExpenseView {
    let ratio = HouseholdIncome::from_incomes(&household.incomes).ratio();

    let mut rows: Vec<ExpenseRow> = household
        .expenses
        .iter()
        .filter(|e| query.filter.matches(e))
        .map(|e| ExpenseRow::new(e, household, ratio))
        .collect();

    query.sort.sort(&mut rows);

    let totals = Totals::of(&rows);

    let (rows, groups) = match group_rows(rows, household, names, query.group_by) {
        Grouped::Flat(rows) => (rows, None),
        Grouped::Groups(rows, groups) => (rows, Some(groups)),
    };

    ExpenseView {
        rows,
        groups,
        totals,
        ratio,
    }
}

enum Grouped {
    Flat(Vec<ExpenseRow>),
    Groups(Vec<ExpenseRow>, Vec<ExpenseGroup>),
}

fn group_rows(
    rows: Vec<ExpenseRow>,
    household: &Household,
    names: &PartnerNames,
    group_by: GroupBy,
) -> Grouped {
    if group_by == GroupBy::None {
        return Grouped::Flat(rows);
    }

    // Buckets in first-appearance order, rows in sorted order
    let mut order: Vec<GroupKey> = Vec::new();
    let mut buckets: HashMap<GroupKey, Vec<ExpenseRow>> = HashMap::new();
    for row in rows {
        let key = group_by
            .key_for(&row.expense, household)
            .unwrap_or(GroupKey::Ungrouped);
        buckets
            .entry(key)
            .or_insert_with(|| {
                order.push(key);
                Vec::new()
            })
            .push(row);
    }

    let mut labelled: Vec<(GroupKey, String)> = order
        .into_iter()
        .map(|key| (key, key.label(household, names)))
        .collect();
    labelled.sort_by(|a, b| group::compare_groups((&a.0, &a.1), (&b.0, &b.1)));

    let mut flat = Vec::new();
    let mut groups = Vec::with_capacity(labelled.len());
    for (key, label) in labelled {
        let members = buckets.remove(&key).unwrap_or_default();
        let start = flat.len();
        let totals = Totals::of(&members);
        flat.extend(members);
        groups.push(ExpenseGroup {
            key,
            label,
            rows: start..flat.len(),
            totals,
        });
    }

    Grouped::Groups(flat, groups)
}

/// Memoizes the last derived expense view
///
/// Keyed by the query and a data revision the owner bumps on every record
/// or partner-name change.
#[derive(Debug, Default)]
pub struct ViewCache {
    entry: Option<(ViewQuery, u64, ExpenseView)>,
}

impl ViewCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(
        &mut self,
        household: &Household,
        names: &PartnerNames,
        query: &ViewQuery,
        revision: u64,
    ) -> &ExpenseView {
        let fresh = matches!(&self.entry, Some((q, r, _)) if q == query && *r == revision);
        if !fresh {
            self.entry = None;
        }
        let (_, _, view) = self
            .entry
            .get_or_insert_with(|| (*query, revision, derive_expense_view(household, names, query)));
        view
    }
}

/// One visible income
#[derive(Debug, Clone, PartialEq)]
pub struct IncomeRow {
    pub income: Income,
    pub monthly: Money,
}

impl IncomeRow {
    pub fn id(&self) -> IncomeId {
        self.income.id
    }
}

/// Everything the income grid shows
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IncomeView {
    pub rows: Vec<IncomeRow>,
    pub totals: HouseholdIncome,
    pub ratio: IncomeRatio,
}

impl IncomeView {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn position_of(&self, id: IncomeId) -> Option<usize> {
        self.rows.iter().position(|r| r.income.id == id)
    }

    pub fn row_ids(&self) -> Vec<IncomeId> {
        self.rows.iter().map(|r| r.income.id).collect()
    }
}

/// Derive the income view
pub fn derive_income_view(household: &Household, sort: &IncomeSortKey) -> IncomeView {
    let mut rows: Vec<IncomeRow> = household
        .incomes
        .iter()
        .map(|income| IncomeRow {
            monthly: income.monthly(),
            income: income.clone(),
        })
        .collect();
    sort.sort(&mut rows);

    let totals = HouseholdIncome::from_incomes(&household.incomes);
    IncomeView {
        rows,
        ratio: totals.ratio(),
        totals,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        BenefitWeight, Category, ExpenseId, FrequencyType, IncomeId, LinkedAccount, NewExpense,
        NewIncome, Partner,
    };

    fn expense(name: &str, amount: i64, f: impl FnOnce(&mut NewExpense)) -> Expense {
        let mut fields = NewExpense {
            name: name.into(),
            amount: Money::from_whole(amount),
            ..Default::default()
        };
        f(&mut fields);
        Expense::create(ExpenseId::new(), fields)
    }

    fn household() -> Household {
        let food = Category::new("Food");
        let housing = Category::new("housing");
        let card = LinkedAccount::with_owner("Card", Some(Partner::X));

        let mut h = Household::default();
        h.expenses = vec![
            expense("Rent", 1500, |e| {
                e.category_id = Some(housing.id);
                e.payer = Some(Partner::Y);
            }),
            expense("groceries", 100, |e| {
                e.frequency_type = FrequencyType::Weekly;
                e.category_id = Some(food.id);
                e.payer = Some(Partner::X);
                e.linked_account_id = Some(card.id);
                e.is_estimate = true;
            }),
            expense("Gym", 40, |e| {
                e.benefit_x = BenefitWeight::ALL_X;
                e.payer = Some(Partner::X);
            }),
            expense("Dining", 200, |e| {
                e.category_id = Some(food.id);
                e.is_estimate = true;
            }),
            expense("Orphan", 10, |e| {
                e.category_id = Some(crate::models::CategoryId::new());
            }),
        ];
        h.incomes = vec![
            Income::create(
                IncomeId::new(),
                NewIncome {
                    name: "X pay".into(),
                    amount: Money::from_whole(6000),
                    partner: Partner::X,
                    ..Default::default()
                },
            ),
            Income::create(
                IncomeId::new(),
                NewIncome {
                    name: "Y pay".into(),
                    amount: Money::from_whole(4000),
                    partner: Partner::Y,
                    ..Default::default()
                },
            ),
        ];
        h.categories = vec![food, housing];
        h.accounts = vec![card];
        h
    }

    fn names(view: &ExpenseView) -> Vec<&str> {
        view.rows.iter().map(|r| r.expense.name.as_str()).collect()
    }

    #[test]
    fn test_default_view_sorted_by_name() {
        let h = household();
        let view = derive_expense_view(&h, &PartnerNames::default(), &ViewQuery::default());
        assert_eq!(names(&view), vec!["Dining", "groceries", "Gym", "Orphan", "Rent"]);
        assert!(view.groups.is_none());
        assert_eq!(view.totals.count, 5);
        assert_eq!(view.ratio.percent(Partner::X), 60);
    }

    #[test]
    fn test_filter_applies_before_totals() {
        let h = household();
        let query = ViewQuery {
            filter: PayerFilter::Only(Partner::X),
            ..Default::default()
        };
        let view = derive_expense_view(&h, &PartnerNames::default(), &query);
        assert_eq!(names(&view), vec!["groceries", "Gym"]);
        assert_eq!(view.totals.monthly, Money::from_whole(473));
    }

    #[test]
    fn test_sort_by_resolved_category_name() {
        let h = household();
        let query = ViewQuery {
            sort: SortKey::new(SortColumn::Category, SortDirection::Asc),
            ..Default::default()
        };
        let view = derive_expense_view(&h, &PartnerNames::default(), &query);
        // "" (none or dangling) < Food < housing; ties keep insertion order
        assert_eq!(names(&view), vec!["Gym", "Orphan", "groceries", "Dining", "Rent"]);
        let categories: Vec<&str> = view.rows.iter().map(|r| r.category.as_str()).collect();
        assert_eq!(categories, vec!["", "", "Food", "Food", "housing"]);
    }

    #[test]
    fn test_sort_desc_by_monthly() {
        let h = household();
        let query = ViewQuery {
            sort: SortKey::new(SortColumn::Monthly, SortDirection::Desc),
            ..Default::default()
        };
        let view = derive_expense_view(&h, &PartnerNames::default(), &query);
        assert_eq!(names(&view), vec!["Rent", "groceries", "Dining", "Gym", "Orphan"]);
    }

    #[test]
    fn test_group_by_category_orders_and_totals() {
        let h = household();
        let query = ViewQuery {
            group_by: GroupBy::Category,
            ..Default::default()
        };
        let view = derive_expense_view(&h, &PartnerNames::default(), &query);
        let groups = view.groups.as_ref().unwrap();
        let labels: Vec<&str> = groups.iter().map(|g| g.label.as_str()).collect();
        assert_eq!(labels, vec!["Food", "housing", "Uncategorized"]);

        // Sorted order preserved within groups, visible indices sequential
        assert_eq!(names(&view), vec!["Dining", "groceries", "Rent", "Gym", "Orphan"]);
        assert_eq!(groups[0].rows, 0..2);
        assert_eq!(groups[2].rows, 3..5);
        assert_eq!(view.group_of(4).map(|g| g.key), Some(GroupKey::Ungrouped));

        let sum: Money = groups.iter().map(|g| g.totals.monthly).sum();
        assert_eq!(sum, view.totals.monthly);
    }

    #[test]
    fn test_group_totals_match_grand_total_for_every_dimension() {
        let h = household();
        for group_by in GroupBy::ALL {
            for filter in [PayerFilter::All, PayerFilter::Only(Partner::X)] {
                let query = ViewQuery {
                    filter,
                    group_by,
                    ..Default::default()
                };
                let view = derive_expense_view(&h, &PartnerNames::default(), &query);
                if let Some(groups) = &view.groups {
                    let monthly: Money = groups.iter().map(|g| g.totals.monthly).sum();
                    let fair_x: Money = groups.iter().map(|g| g.totals.fair_x).sum();
                    assert_eq!(monthly, view.totals.monthly, "{:?}", group_by);
                    assert_eq!(fair_x, view.totals.fair_x, "{:?}", group_by);
                }
                assert_eq!(view.totals.fair_x + view.totals.fair_y, view.totals.monthly);
            }
        }
    }

    #[test]
    fn test_group_by_payer_uses_partner_names() {
        let h = household();
        let query = ViewQuery {
            group_by: GroupBy::Payer,
            ..Default::default()
        };
        let view = derive_expense_view(&h, &PartnerNames::new("Zoe", "Adam"), &query);
        let labels: Vec<&str> = view
            .groups
            .as_ref()
            .unwrap()
            .iter()
            .map(|g| g.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Adam", "Zoe", "Uncategorized"]);
    }

    #[test]
    fn test_group_by_estimated() {
        let h = household();
        let query = ViewQuery {
            group_by: GroupBy::Estimated,
            ..Default::default()
        };
        let view = derive_expense_view(&h, &PartnerNames::default(), &query);
        let labels: Vec<&str> = view
            .groups
            .as_ref()
            .unwrap()
            .iter()
            .map(|g| g.label.as_str())
            .collect();
        assert_eq!(labels, vec!["Actual", "Estimated"]);
    }

    #[test]
    fn test_view_cache_reuses_until_revision_changes() {
        let mut h = household();
        let names = PartnerNames::default();
        let query = ViewQuery::default();
        let mut cache = ViewCache::new();

        assert_eq!(cache.get(&h, &names, &query, 1).len(), 5);
        h.expenses.pop();
        // Same revision: stale by contract
        assert_eq!(cache.get(&h, &names, &query, 1).len(), 5);
        assert_eq!(cache.get(&h, &names, &query, 2).len(), 4);
    }

    #[test]
    fn test_income_view() {
        let h = household();
        let sort = IncomeSortKey::new(IncomeSortColumn::Monthly, SortDirection::Desc);
        let view = derive_income_view(&h, &sort);
        assert_eq!(view.rows[0].income.name, "X pay");
        assert_eq!(view.totals.total(), Money::from_whole(10000));
        assert_eq!(view.ratio.percent(Partner::Y), 40);
    }
}
