//! Core data models for FairShare
//!
//! This module contains the records a household tracks: expenses, incomes,
//! and the categories, budgets and payment methods expenses point at, plus
//! the money and frequency primitives they are built on.

pub mod account;
pub mod budget;
pub mod category;
pub mod expense;
pub mod frequency;
pub mod household;
pub mod ids;
pub mod income;
pub mod money;
pub mod partner;
pub mod reference;

pub use account::LinkedAccount;
pub use budget::Budget;
pub use category::Category;
pub use expense::{BenefitWeight, Expense, ExpensePatch, ExpenseValidationError, NewExpense};
pub use frequency::{to_monthly, FrequencyType};
pub use household::{Household, HouseholdReference};
pub use ids::{BudgetId, CategoryId, ExpenseId, IncomeId, LinkedAccountId};
pub use income::{Income, IncomePatch, IncomeValidationError, NewIncome};
pub use money::Money;
pub use partner::{Partner, PartnerNames};
pub use reference::{ReferenceEntity, ReferenceKind, ReferenceValidationError};
