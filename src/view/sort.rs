//! Sort keys for the expense and income grids

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use super::{ExpenseRow, IncomeRow};

/// Locale-style string comparison
///
/// Case-folded order first; among strings equal ignoring case, lowercase
/// sorts before uppercase.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| b.cmp(a))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn key(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("Unknown sort direction '{}'", other)),
        }
    }
}

/// Sortable expense columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SortColumn {
    #[default]
    Name,
    Category,
    Amount,
    Estimate,
    Frequency,
    Monthly,
    PaymentMethod,
    Payer,
    BenefitX,
    BenefitY,
    FairX,
    FairY,
}

impl SortColumn {
    pub const ALL: [SortColumn; 12] = [
        Self::Name,
        Self::Category,
        Self::Amount,
        Self::Estimate,
        Self::Frequency,
        Self::Monthly,
        Self::PaymentMethod,
        Self::Payer,
        Self::BenefitX,
        Self::BenefitY,
        Self::FairX,
        Self::FairY,
    ];

    /// Column id, also the preference value
    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Category => "category",
            Self::Amount => "amount",
            Self::Estimate => "estimate",
            Self::Frequency => "frequency",
            Self::Monthly => "monthly",
            Self::PaymentMethod => "payment_method",
            Self::Payer => "payer",
            Self::BenefitX => "benefit_x",
            Self::BenefitY => "benefit_y",
            Self::FairX => "fair_x",
            Self::FairY => "fair_y",
        }
    }

    /// Compare two rows on this column, ascending
    ///
    /// Referenced entities compare by resolved name (dangling ids resolve
    /// to the empty string); computed columns compare the live value.
    pub fn compare(self, a: &ExpenseRow, b: &ExpenseRow) -> Ordering {
        match self {
            Self::Name => locale_cmp(&a.expense.name, &b.expense.name),
            Self::Category => locale_cmp(&a.category, &b.category),
            Self::Amount => a.expense.amount.cmp(&b.expense.amount),
            Self::Estimate => a.expense.is_estimate.cmp(&b.expense.is_estimate),
            Self::Frequency => locale_cmp(
                a.expense.frequency_type.key(),
                b.expense.frequency_type.key(),
            ),
            Self::Monthly => a.share.monthly.cmp(&b.share.monthly),
            Self::PaymentMethod => locale_cmp(&a.account, &b.account),
            Self::Payer => locale_cmp(
                a.expense.payer.map_or("", |p| p.label()),
                b.expense.payer.map_or("", |p| p.label()),
            ),
            Self::BenefitX => a.expense.benefit_x.x().cmp(&b.expense.benefit_x.x()),
            Self::BenefitY => a.expense.benefit_x.y().cmp(&b.expense.benefit_x.y()),
            Self::FairX => a.share.x.cmp(&b.share.x),
            Self::FairY => a.share.y.cmp(&b.share.y),
        }
    }
}

impl fmt::Display for SortColumn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.key() == needle)
            .ok_or_else(|| format!("Unknown sort column '{}'", s.trim()))
    }
}

/// A single (column, direction) sort for expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SortKey {
    pub column: SortColumn,
    pub direction: SortDirection,
}

impl SortKey {
    pub fn new(column: SortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    /// Header-click behavior: same column flips direction, a new column
    /// starts ascending
    pub fn clicked(self, column: SortColumn) -> Self {
        if self.column == column {
            Self::new(column, self.direction.toggled())
        } else {
            Self::new(column, SortDirection::Asc)
        }
    }

    /// Stable in-place sort
    pub fn sort(self, rows: &mut [ExpenseRow]) {
        rows.sort_by(|a, b| self.direction.apply(self.column.compare(a, b)));
    }
}

/// Sortable income columns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum IncomeSortColumn {
    #[default]
    Name,
    Partner,
    Amount,
    Frequency,
    Monthly,
}

impl IncomeSortColumn {
    pub const ALL: [IncomeSortColumn; 5] = [
        Self::Name,
        Self::Partner,
        Self::Amount,
        Self::Frequency,
        Self::Monthly,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Self::Name => "name",
            Self::Partner => "partner_label",
            Self::Amount => "amount",
            Self::Frequency => "frequency",
            Self::Monthly => "monthly",
        }
    }

    pub fn compare(self, a: &IncomeRow, b: &IncomeRow) -> Ordering {
        match self {
            Self::Name => locale_cmp(&a.income.name, &b.income.name),
            Self::Partner => a.income.partner.cmp(&b.income.partner),
            Self::Amount => a.income.amount.cmp(&b.income.amount),
            Self::Frequency => locale_cmp(
                a.income.frequency_type.key(),
                b.income.frequency_type.key(),
            ),
            Self::Monthly => a.monthly.cmp(&b.monthly),
        }
    }
}

impl FromStr for IncomeSortColumn {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        if needle == "partner" {
            return Ok(Self::Partner);
        }
        Self::ALL
            .into_iter()
            .find(|c| c.key() == needle)
            .ok_or_else(|| format!("Unknown sort column '{}'", s.trim()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct IncomeSortKey {
    pub column: IncomeSortColumn,
    pub direction: SortDirection,
}

impl IncomeSortKey {
    pub fn new(column: IncomeSortColumn, direction: SortDirection) -> Self {
        Self { column, direction }
    }

    pub fn clicked(self, column: IncomeSortColumn) -> Self {
        if self.column == column {
            Self::new(column, self.direction.toggled())
        } else {
            Self::new(column, SortDirection::Asc)
        }
    }

    pub fn sort(self, rows: &mut [IncomeRow]) {
        rows.sort_by(|a, b| self.direction.apply(self.column.compare(a, b)));
    }
}
