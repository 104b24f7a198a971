//! Service layer for FairShare
//!
//! Business rules on top of storage: validation, referential checks and
//! reassignment of references.

pub mod expense;
pub mod income;
pub mod reference;

pub use expense::ExpenseService;
pub use income::IncomeService;
pub use reference::{RefId, ReferenceService};

use crate::models::{Budget, Category, LinkedAccount};

pub type CategoryService<'a> = ReferenceService<'a, Category>;
pub type BudgetService<'a> = ReferenceService<'a, Budget>;
pub type AccountService<'a> = ReferenceService<'a, LinkedAccount>;
