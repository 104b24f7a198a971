//! Expense service
//!
//! Validation and CRUD for expenses on top of storage. Every write is
//! checked before it touches a repository, and references must point at
//! records that exist.

use tracing::{debug, info};

use crate::error::{FairShareError, FairShareResult};
use crate::models::{Expense, ExpenseId, ExpensePatch, NewExpense};
use crate::storage::Storage;

/// Service for expense management
pub struct ExpenseService<'a> {
    storage: &'a Storage,
}

impl<'a> ExpenseService<'a> {
    pub fn new(storage: &'a Storage) -> Self {
        Self { storage }
    }

    /// All expenses in creation order
    pub fn list(&self) -> FairShareResult<Vec<Expense>> {
        self.storage.expenses.get_all()
    }

    pub fn get(&self, id: ExpenseId) -> FairShareResult<Option<Expense>> {
        self.storage.expenses.get(id)
    }

    /// Find by id (full or short form) or by case-insensitive name
    pub fn find(&self, identifier: &str) -> FairShareResult<Option<Expense>> {
        if let Some(expense) = self.storage.expenses.find(|e| e.id.matches(identifier))? {
            return Ok(Some(expense));
        }
        let needle = identifier.trim().to_lowercase();
        self.storage
            .expenses
            .find(|e| e.name.trim().to_lowercase() == needle)
    }

    /// Find or fail with `NotFound`
    pub fn resolve(&self, identifier: &str) -> FairShareResult<Expense> {
        self.find(identifier)?
            .ok_or_else(|| FairShareError::expense_not_found(identifier))
    }

    pub fn add(&self, fields: NewExpense) -> FairShareResult<Expense> {
        let expense = Expense::create(ExpenseId::new(), fields);
        self.check(&expense)?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        info!(id = %expense.id, name = %expense.name, "added expense");
        Ok(expense)
    }

    pub fn update(&self, id: ExpenseId, patch: &ExpensePatch) -> FairShareResult<Expense> {
        let mut expense = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| FairShareError::expense_not_found(id.to_string()))?;

        if patch.is_empty() {
            debug!(%id, "empty expense patch, nothing to write");
            return Ok(expense);
        }

        expense.apply(patch);
        self.check(&expense)?;

        self.storage.expenses.upsert(expense.clone())?;
        self.storage.expenses.save()?;

        debug!(%id, "updated expense");
        Ok(expense)
    }

    pub fn remove(&self, id: ExpenseId) -> FairShareResult<Expense> {
        let expense = self
            .storage
            .expenses
            .get(id)?
            .ok_or_else(|| FairShareError::expense_not_found(id.to_string()))?;

        self.storage.expenses.delete(id)?;
        self.storage.expenses.save()?;

        info!(%id, name = %expense.name, "removed expense");
        Ok(expense)
    }

    fn check(&self, expense: &Expense) -> FairShareResult<()> {
        expense
            .validate()
            .map_err(|e| FairShareError::Validation(e.to_string()))?;

        if let Some(id) = expense.category_id {
            if self.storage.categories.get(id)?.is_none() {
                return Err(FairShareError::NotFound {
                    entity_type: "Category",
                    identifier: id.to_string(),
                });
            }
        }
        if let Some(id) = expense.budget_id {
            if self.storage.budgets.get(id)?.is_none() {
                return Err(FairShareError::NotFound {
                    entity_type: "Budget",
                    identifier: id.to_string(),
                });
            }
        }
        if let Some(id) = expense.linked_account_id {
            if self.storage.accounts.get(id)?.is_none() {
                return Err(FairShareError::NotFound {
                    entity_type: "Payment method",
                    identifier: id.to_string(),
                });
            }
        }
        Ok(())
    }
}
