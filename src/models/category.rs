//! Expense category model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::expense::{Expense, ExpensePatch};
use super::ids::CategoryId;
use super::reference::{self, ReferenceEntity, ReferenceKind, ReferenceValidationError};

/// A category used to group expenses (e.g. "Housing", "Groceries")
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    /// Unique identifier
    pub id: CategoryId,

    /// Category name
    pub name: String,

    /// Optional display color (any CSS-style color string)
    #[serde(default)]
    pub color: Option<String>,

    /// When the category was created
    pub created_at: DateTime<Utc>,

    /// When the category was last modified
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Create a new category
    pub fn new(name: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            id: CategoryId::new(),
            name: name.into(),
            color: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Validate the category
    pub fn validate(&self) -> Result<(), ReferenceValidationError> {
        reference::validate_name(&self.name)
    }
}

impl ReferenceEntity for Category {
    type Id = CategoryId;

    const KIND: ReferenceKind = ReferenceKind::Category;

    fn id(&self) -> CategoryId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    fn named(name: String) -> Self {
        Category::new(name)
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    fn referenced_by(expense: &Expense) -> Option<CategoryId> {
        expense.category_id
    }

    fn repoint(target: Option<&Self>) -> ExpensePatch {
        ExpensePatch {
            category_id: Some(target.map(|t| t.id)),
            ..Default::default()
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)
    }
}
