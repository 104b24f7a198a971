//! Linked account (payment method) model
//!
//! A linked account is the card or bank account an expense is paid from.
//! It may belong to one partner, in which case that partner is the payer
//! of every expense paid through it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::expense::{Expense, ExpensePatch};
use super::ids::LinkedAccountId;
use super::partner::Partner;
use super::reference::{self, ReferenceEntity, ReferenceKind, ReferenceValidationError};

/// A payment method
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedAccount {
    /// Unique identifier
    pub id: LinkedAccountId,

    /// Account name (e.g., "Joint Visa")
    pub name: String,

    #[serde(default)]
    pub color: Option<String>,

    /// Partner who owns the account, if it is not joint
    #[serde(default, rename = "owner_partner")]
    pub owner: Option<Partner>,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LinkedAccount {
    /// Create a joint account (no owner)
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_owner(name, None)
    }

    /// Create an account owned by `owner`
    pub fn with_owner(name: impl Into<String>, owner: Option<Partner>) -> Self {
        let now = Utc::now();
        Self {
            id: LinkedAccountId::new(),
            name: name.into(),
            color: None,
            owner,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn validate(&self) -> Result<(), ReferenceValidationError> {
        reference::validate_name(&self.name)
    }
}

impl ReferenceEntity for LinkedAccount {
    type Id = LinkedAccountId;

    const KIND: ReferenceKind = ReferenceKind::LinkedAccount;

    fn id(&self) -> LinkedAccountId {
        self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn color(&self) -> Option<&str> {
        self.color.as_deref()
    }

    fn named(name: String) -> Self {
        LinkedAccount::new(name)
    }

    fn set_name(&mut self, name: String) {
        self.name = name;
        self.updated_at = Utc::now();
    }

    fn referenced_by(expense: &Expense) -> Option<LinkedAccountId> {
        expense.linked_account_id
    }

    fn repoint(target: Option<&Self>) -> ExpensePatch {
        ExpensePatch::default().with_linked_account(target)
    }
}

impl fmt::Display for LinkedAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.owner {
            Some(owner) => write!(f, "{} ({})", self.name, owner),
            None => write!(f, "{}", self.name),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_account_is_joint() {
        let account = LinkedAccount::new("Joint checking");
        assert_eq!(account.owner, None);
        assert_eq!(account.to_string(), "Joint checking");
    }

    #[test]
    fn test_owner_serialized_as_owner_partner() {
        let account = LinkedAccount::with_owner("Visa", Some(Partner::X));
        let json = serde_json::to_value(&account).unwrap();
        assert_eq!(json["owner_partner"], "X");
        assert_eq!(account.to_string(), "Visa (X)");
    }
}
