//! Budget model
//!
//! A budget is a label an expense is charged against (e.g. "Household",
//! "Travel fund"). It carries no amount of its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::expense::{Expense, ExpensePatch};
use super::ids::BudgetId;
use super::reference::{self, ReferenceEntity, ReferenceKind, ReferenceValidationError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: BudgetId,
    pub name: String,
    #[serde(default)]
    pub color: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Budget {
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: BudgetId::new(),
            name: name.into(),
            color: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ReferenceValidationError> {
        reference::validate_name(&self.name)
    }
}

impl ReferenceEntity for Budget {
    type Id = BudgetId;

    const KIND: ReferenceKind = ReferenceKind::Budget;

    fn id(&self) -> BudgetId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    fn named(name: String) -> Self {
        Budget::new(name)
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    fn referenced_by(expense: &Expense) -> Option<BudgetId> {
        expense.budget_id
    }

    fn repoint(target: Option<&Self>) -> ExpensePatch {
        ExpensePatch {
            budget_id: Some(target.map(|t| t.id)),
            ..Default::default()
        }
    }
}

impl fmt::Display for Budget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
