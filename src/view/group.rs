//! Grouping dimension and group keys

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::sort::locale_cmp;
use crate::models::{CategoryId, Expense, Household, LinkedAccountId, Partner, PartnerNames};

/// Label of the group collecting rows with no (or a dangling) key
pub const UNGROUPED_LABEL: &str = "Uncategorized";

/// Dimension to group expenses by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GroupBy {
    #[default]
    None,
    Category,
    Estimated,
    Payer,
    PaymentMethod,
}

impl GroupBy {
    pub const ALL: [GroupBy; 5] = [
        Self::None,
        Self::Category,
        Self::Estimated,
        Self::Payer,
        Self::PaymentMethod,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Category => "category",
            Self::Estimated => "estimated",
            Self::Payer => "payer",
            Self::PaymentMethod => "payment_method",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::None => "No grouping",
            Self::Category => "Group by Category",
            Self::Estimated => "Group by Estimated",
            Self::Payer => "Group by Payer",
            Self::PaymentMethod => "Group by Payment Method",
        }
    }

    /// Next option, wrapping around
    pub fn cycle(self) -> Self {
        let idx = Self::ALL.iter().position(|g| *g == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }

    /// Key of the group an expense falls into; `None` when not grouping
    pub fn key_for(self, expense: &Expense, household: &Household) -> Option<GroupKey> {
        let key = match self {
            Self::None => return None,
            Self::Category => expense
                .category_id
                .filter(|id| household.category(*id).is_some())
                .map_or(GroupKey::Ungrouped, GroupKey::Category),
            Self::Estimated => GroupKey::Estimated(expense.is_estimate),
            Self::Payer => expense.payer.map_or(GroupKey::Ungrouped, GroupKey::Payer),
            Self::PaymentMethod => expense
                .linked_account_id
                .filter(|id| household.account(*id).is_some())
                .map_or(GroupKey::Ungrouped, GroupKey::PaymentMethod),
        };
        Some(key)
    }
}

impl fmt::Display for GroupBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for GroupBy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|g| g.key() == needle)
            .ok_or_else(|| format!("Unknown grouping '{}'", s.trim()))
    }
}

/// Identity of one group
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Category(CategoryId),
    Estimated(bool),
    Payer(Partner),
    PaymentMethod(LinkedAccountId),
    Ungrouped,
}

impl GroupKey {
    pub fn is_ungrouped(&self) -> bool {
        matches!(self, Self::Ungrouped)
    }

    pub fn label(&self, household: &Household, names: &PartnerNames) -> String {
        match self {
            Self::Category(id) => household
                .category(*id)
                .map_or(UNGROUPED_LABEL, |c| c.name.as_str())
                .to_string(),
            Self::Estimated(true) => "Estimated".to_string(),
            Self::Estimated(false) => "Actual".to_string(),
            Self::Payer(p) => names.name(*p).to_string(),
            Self::PaymentMethod(id) => household
                .account(*id)
                .map_or(UNGROUPED_LABEL, |a| a.name.as_str())
                .to_string(),
            Self::Ungrouped => UNGROUPED_LABEL.to_string(),
        }
    }
}

/// Group order: by label, with the ungrouped sentinel always last
pub fn compare_groups(a: (&GroupKey, &str), b: (&GroupKey, &str)) -> Ordering {
    match (a.0.is_ungrouped(), b.0.is_ungrouped()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => locale_cmp(a.1, b.1),
    }
}
