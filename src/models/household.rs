//! In-memory snapshot of every record a household owns
//!
//! The derived views and the grid work off a `Household`; they never reach
//! back into storage.

use super::account::LinkedAccount;
use super::budget::Budget;
use super::category::Category;
use super::expense::Expense;
use super::ids::{BudgetId, CategoryId, ExpenseId, IncomeId, LinkedAccountId};
use super::income::Income;
use super::reference::ReferenceEntity;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Household {
    pub expenses: Vec<Expense>,
    pub incomes: Vec<Income>,
    pub categories: Vec<Category>,
    pub budgets: Vec<Budget>,
    pub accounts: Vec<LinkedAccount>,
}

impl Household {
    pub fn expense(&self, id: ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| e.id == id)
    }

    pub fn expense_mut(&mut self, id: ExpenseId) -> Option<&mut Expense> {
        self.expenses.iter_mut().find(|e| e.id == id)
    }

    pub fn income(&self, id: IncomeId) -> Option<&Income> {
        self.incomes.iter().find(|i| i.id == id)
    }

    pub fn income_mut(&mut self, id: IncomeId) -> Option<&mut Income> {
        self.incomes.iter_mut().find(|i| i.id == id)
    }

    pub fn category(&self, id: CategoryId) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn budget(&self, id: BudgetId) -> Option<&Budget> {
        self.budgets.iter().find(|b| b.id == id)
    }

    pub fn account(&self, id: LinkedAccountId) -> Option<&LinkedAccount> {
        self.accounts.iter().find(|a| a.id == id)
    }

    /// Resolved category name; dangling or absent references are empty
    pub fn category_name(&self, id: Option<CategoryId>) -> &str {
        id.and_then(|id| self.category(id)).map_or("", |c| c.name.as_str())
    }

    pub fn budget_name(&self, id: Option<BudgetId>) -> &str {
        id.and_then(|id| self.budget(id)).map_or("", |b| b.name.as_str())
    }

    pub fn account_name(&self, id: Option<LinkedAccountId>) -> &str {
        id.and_then(|id| self.account(id)).map_or("", |a| a.name.as_str())
    }

    /// Number of expenses pointing at the reference entity `id`
    pub fn usage_count<T: ReferenceEntity>(&self, id: T::Id) -> usize {
        self.expenses
            .iter()
            .filter(|e| T::referenced_by(e) == Some(id))
            .count()
    }

    /// The records of kind `T`
    pub fn references<T: HouseholdReference>(&self) -> &[T] {
        T::slice(self)
    }

    pub fn references_mut<T: HouseholdReference>(&mut self) -> &mut Vec<T> {
        T::vec_mut(self)
    }
}

/// Access to the collection of one reference kind inside a [`Household`]
pub trait HouseholdReference: ReferenceEntity {
    fn slice(household: &Household) -> &[Self];
    fn vec_mut(household: &mut Household) -> &mut Vec<Self>;
}

impl HouseholdReference for Category {
    fn slice(household: &Household) -> &[Self] {
        &household.categories
    }

    fn vec_mut(household: &mut Household) -> &mut Vec<Self> {
        &mut household.categories
    }
}

impl HouseholdReference for Budget {
    fn slice(household: &Household) -> &[Self] {
        &household.budgets
    }

    fn vec_mut(household: &mut Household) -> &mut Vec<Self> {
        &mut household.budgets
    }
}

impl HouseholdReference for LinkedAccount {
    fn slice(household: &Household) -> &[Self] {
        &household.accounts
    }

    fn vec_mut(household: &mut Household) -> &mut Vec<Self> {
        &mut household.accounts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::expense::NewExpense;

    #[test]
    fn test_dangling_reference_resolves_to_empty_name() {
        let mut household = Household::default();
        let groceries = Category::new("Groceries");
        household.categories.push(groceries.clone());

        assert_eq!(household.category_name(Some(groceries.id)), "Groceries");
        assert_eq!(household.category_name(Some(CategoryId::new())), "");
        assert_eq!(household.category_name(None), "");
    }

    #[test]
    fn test_usage_count() {
        let mut household = Household::default();
        let card = LinkedAccount::new("Card");
        for i in 0..3 {
            household.expenses.push(Expense::create(
                ExpenseId::new(),
                NewExpense {
                    name: format!("e{}", i),
                    linked_account_id: (i < 2).then_some(card.id),
                    ..Default::default()
                },
            ));
        }
        household.accounts.push(card.clone());

        assert_eq!(household.usage_count::<LinkedAccount>(card.id), 2);
        assert_eq!(household.usage_count::<Category>(CategoryId::new()), 0);
        assert_eq!(household.references::<LinkedAccount>().len(), 1);
    }
}
