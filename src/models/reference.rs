//! Shared behavior of the entities an expense can point at
//!
//! Categories, budgets and linked accounts (payment methods) are simple
//! named records. Expenses reference them by id; a reference to a record
//! that no longer exists is treated as unassigned everywhere.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::hash::Hash;
use std::str::FromStr;

use super::expense::{Expense, ExpensePatch};

/// Maximum length of a reference entity's name
pub const MAX_NAME_LEN: usize = 50;

/// The three kinds of referenced entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceKind {
    Category,
    Budget,
    LinkedAccount,
}

impl ReferenceKind {
    pub const ALL: [ReferenceKind; 3] = [Self::Category, Self::Budget, Self::LinkedAccount];

    /// Singular label used in messages
    pub fn label(self) -> &'static str {
        match self {
            Self::Category => "Category",
            Self::Budget => "Budget",
            Self::LinkedAccount => "Payment method",
        }
    }

    /// Plural label used for headings
    pub fn plural(self) -> &'static str {
        match self {
            Self::Category => "Categories",
            Self::Budget => "Budgets",
            Self::LinkedAccount => "Payment methods",
        }
    }
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validation errors for reference entities
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReferenceValidationError {
    EmptyName,
    NameTooLong(usize),
}

impl fmt::Display for ReferenceValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Name cannot be empty"),
            Self::NameTooLong(len) => write!(
                f,
                "Name too long ({} characters, max {})",
                len, MAX_NAME_LEN
            ),
        }
    }
}

impl std::error::Error for ReferenceValidationError {}

/// Check a reference entity name
pub fn validate_name(name: &str) -> Result<(), ReferenceValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ReferenceValidationError::EmptyName);
    }
    let len = trimmed.chars().count();
    if len > MAX_NAME_LEN {
        return Err(ReferenceValidationError::NameTooLong(len));
    }
    Ok(())
}

/// A named record that expenses may reference
pub trait ReferenceEntity: Clone + fmt::Debug + Serialize + DeserializeOwned + Send + Sync {
    type Id: Copy + Eq + Hash + Ord + fmt::Debug + fmt::Display + FromStr + Send + Sync;

    const KIND: ReferenceKind;

    fn id(&self) -> Self::Id;

    fn name(&self) -> &str;

    fn color(&self) -> Option<&str>;

    /// A fresh record with a new id
    fn named(name: String) -> Self;

    fn set_name(&mut self, name: String);

    /// The id of this kind the expense points at, if any
    fn referenced_by(expense: &Expense) -> Option<Self::Id>;

    /// Patch that repoints an expense at `target`, or clears the reference
    fn repoint(target: Option<&Self>) -> ExpensePatch;
}
