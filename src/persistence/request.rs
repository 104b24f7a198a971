//! Write requests and their receipts

use std::fmt;

use crate::models::{
    Budget, BudgetId, Category, CategoryId, Expense, ExpenseId, ExpensePatch, Income, IncomeId,
    IncomePatch, LinkedAccount, LinkedAccountId, NewExpense, NewIncome, Partner, PartnerNames,
    ReferenceKind,
};

/// Id of any reference entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReferenceId {
    Category(CategoryId),
    Budget(BudgetId),
    Account(LinkedAccountId),
}

impl ReferenceId {
    pub fn kind(self) -> ReferenceKind {
        match self {
            Self::Category(_) => ReferenceKind::Category,
            Self::Budget(_) => ReferenceKind::Budget,
            Self::Account(_) => ReferenceKind::LinkedAccount,
        }
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Category(id) => id.fmt(f),
            Self::Budget(id) => id.fmt(f),
            Self::Account(id) => id.fmt(f),
        }
    }
}

/// One write against the persistence collaborator
#[derive(Debug, Clone, PartialEq)]
pub enum WriteRequest {
    AddExpense(NewExpense),
    UpdateExpense { id: ExpenseId, patch: ExpensePatch },
    RemoveExpense(ExpenseId),
    AddIncome(NewIncome),
    UpdateIncome { id: IncomeId, patch: IncomePatch },
    RemoveIncome(IncomeId),
    AddReference {
        kind: ReferenceKind,
        name: String,
        /// Only meaningful for payment methods
        owner: Option<Partner>,
    },
    RenameReference { id: ReferenceId, name: String },
    RemoveReference(ReferenceId),
    /// Repoint every user of `from`; `to: None` unassigns
    ReassignReferences {
        from: ReferenceId,
        to: Option<ReferenceId>,
    },
    /// Reassign, then remove `id`
    RemoveReferenceReassigning {
        id: ReferenceId,
        to: Option<ReferenceId>,
    },
    SetAccountOwner {
        id: LinkedAccountId,
        owner: Option<Partner>,
    },
    RenamePartners { x: String, y: String },
}

impl WriteRequest {
    /// Short description for logs and failure notices
    pub fn describe(&self) -> String {
        match self {
            Self::AddExpense(_) => "add expense".into(),
            Self::UpdateExpense { id, .. } => format!("update expense {}", id),
            Self::RemoveExpense(id) => format!("remove expense {}", id),
            Self::AddIncome(_) => "add income".into(),
            Self::UpdateIncome { id, .. } => format!("update income {}", id),
            Self::RemoveIncome(id) => format!("remove income {}", id),
            Self::AddReference { kind, name, .. } => {
                format!("add {} '{}'", kind.label().to_lowercase(), name)
            }
            Self::RenameReference { id, .. } => {
                format!("rename {} {}", id.kind().label().to_lowercase(), id)
            }
            Self::RemoveReference(id) | Self::RemoveReferenceReassigning { id, .. } => {
                format!("remove {} {}", id.kind().label().to_lowercase(), id)
            }
            Self::ReassignReferences { from, .. } => {
                format!("reassign {} {}", from.kind().label().to_lowercase(), from)
            }
            Self::SetAccountOwner { id, .. } => format!("set owner of {}", id),
            Self::RenamePartners { .. } => "rename partners".into(),
        }
    }
}

/// What a successful write produced
#[derive(Debug, Clone, PartialEq)]
pub enum WriteReceipt {
    Expense(Expense),
    Income(Income),
    Category(Category),
    Budget(Budget),
    Account(LinkedAccount),
    /// Number of expenses repointed
    Reassigned(usize),
    Removed,
    Partners(PartnerNames),
}
