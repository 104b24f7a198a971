//! Storage layer for FairShare
//!
//! JSON file repositories with atomic writes, one file per record kind.
//! This is the default persistence collaborator behind the services.

pub mod file_io;
pub mod init;
pub mod repository;

pub use file_io::{read_json, write_json_atomic};
pub use init::initialize_storage;
pub use repository::{JsonRepository, Record};

use crate::config::paths::FairSharePaths;
use crate::error::FairShareError;
use crate::models::{Budget, Category, Expense, Household, Income, LinkedAccount};

pub type ExpenseRepository = JsonRepository<Expense>;
pub type IncomeRepository = JsonRepository<Income>;
pub type CategoryRepository = JsonRepository<Category>;
pub type BudgetRepository = JsonRepository<Budget>;
pub type AccountRepository = JsonRepository<LinkedAccount>;

/// Owns every repository
pub struct Storage {
    paths: FairSharePaths,
    pub expenses: ExpenseRepository,
    pub incomes: IncomeRepository,
    pub categories: CategoryRepository,
    pub budgets: BudgetRepository,
    pub accounts: AccountRepository,
}

impl Storage {
    pub fn new(paths: FairSharePaths) -> Result<Self, FairShareError> {
        paths.ensure_directories()?;

        Ok(Self {
            expenses: JsonRepository::new(paths.expenses_file()),
            incomes: JsonRepository::new(paths.incomes_file()),
            categories: JsonRepository::new(paths.categories_file()),
            budgets: JsonRepository::new(paths.budgets_file()),
            accounts: JsonRepository::new(paths.accounts_file()),
            paths,
        })
    }

    pub fn paths(&self) -> &FairSharePaths {
        &self.paths
    }

    pub fn load_all(&mut self) -> Result<(), FairShareError> {
        self.expenses.load()?;
        self.incomes.load()?;
        self.categories.load()?;
        self.budgets.load()?;
        self.accounts.load()?;
        Ok(())
    }

    pub fn save_all(&self) -> Result<(), FairShareError> {
        self.expenses.save()?;
        self.incomes.save()?;
        self.categories.save()?;
        self.budgets.save()?;
        self.accounts.save()?;
        Ok(())
    }

    /// Copy of every record, in creation order
    pub fn snapshot(&self) -> Result<Household, FairShareError> {
        Ok(Household {
            expenses: self.expenses.get_all()?,
            incomes: self.incomes.get_all()?,
            categories: self.categories.get_all()?,
            budgets: self.budgets.get_all()?,
            accounts: self.accounts.get_all()?,
        })
    }

    pub fn is_initialized(&self) -> bool {
        self.paths.is_initialized()
    }

    /// Repository for record kind `T`
    pub fn repository<T: Stored>(&self) -> &JsonRepository<T> {
        T::repository(self)
    }
}

/// Record kinds that have a repository in [`Storage`]
pub trait Stored: Record {
    fn repository(storage: &Storage) -> &JsonRepository<Self>;
}

macro_rules! impl_stored {
    ($ty:ty, $field:ident) => {
        impl Stored for $ty {
            fn repository(storage: &Storage) -> &JsonRepository<Self> {
                &storage.$field
            }
        }
    };
}

impl_stored!(Expense, expenses);
impl_stored!(Income, incomes);
impl_stored!(Category, categories);
impl_stored!(Budget, budgets);
impl_stored!(LinkedAccount, accounts);
