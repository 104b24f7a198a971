//! Shared household expense model
//!
//! An expense recurs on some schedule, benefits the two partners in some
//! proportion, and may point at a category, budget and payment method.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::account::LinkedAccount;
use super::frequency::{self, FrequencyType};
use super::ids::{BudgetId, CategoryId, ExpenseId, LinkedAccountId};
use super::money::{Money, MAX_AMOUNT};
use super::partner::Partner;

/// Validation errors for expenses
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExpenseValidationError {
    NegativeAmount,
    AmountTooLarge,
    ZeroParam,
    UnexpectedParam(FrequencyType),
    BenefitOutOfRange(i64),
}

impl fmt::Display for ExpenseValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NegativeAmount => write!(f, "Expense amount cannot be negative"),
            Self::AmountTooLarge => write!(f, "Expense amount is too large"),
            Self::ZeroParam => write!(f, "Frequency parameter must be a positive whole number"),
            Self::UnexpectedParam(freq) => {
                write!(f, "{} frequency does not take a parameter", freq.label())
            }
            Self::BenefitOutOfRange(v) => {
                write!(f, "Benefit must be between 0 and 100 (got {})", v)
            }
        }
    }
}

impl std::error::Error for ExpenseValidationError {}

/// Share of an expense's benefit attributed to Partner X, as a whole
/// percentage. Partner Y's share is the complement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct BenefitWeight(u8);

impl BenefitWeight {
    pub const EVEN: BenefitWeight = BenefitWeight(50);
    pub const ALL_X: BenefitWeight = BenefitWeight(100);
    pub const ALL_Y: BenefitWeight = BenefitWeight(0);

    /// Strict constructor, rejects anything outside 0..=100
    pub fn new(percent: i64) -> Result<Self, ExpenseValidationError> {
        u8::try_from(percent)
            .ok()
            .filter(|p| *p <= 100)
            .map(Self)
            .ok_or(ExpenseValidationError::BenefitOutOfRange(percent))
    }

    /// Lenient constructor for free-form input: rounds, then clamps
    pub fn clamped(percent: f64) -> Self {
        if percent.is_nan() {
            return Self::ALL_Y;
        }
        Self(percent.round().clamp(0.0, 100.0) as u8)
    }

    /// Benefit weight that gives Partner Y `percent`
    pub fn from_y(percent: f64) -> Self {
        let y = Self::clamped(percent);
        Self(100 - y.0)
    }

    /// Partner X's percentage
    pub fn x(self) -> u8 {
        self.0
    }

    /// Partner Y's percentage
    pub fn y(self) -> u8 {
        100 - self.0
    }

    /// Percentage for the given partner
    pub fn for_partner(self, partner: Partner) -> u8 {
        match partner {
            Partner::X => self.x(),
            Partner::Y => self.y(),
        }
    }
}

impl Default for BenefitWeight {
    fn default() -> Self {
        Self::EVEN
    }
}

impl TryFrom<i64> for BenefitWeight {
    type Error = ExpenseValidationError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<BenefitWeight> for u8 {
    fn from(value: BenefitWeight) -> Self {
        value.0
    }
}

impl fmt::Display for BenefitWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}%", self.0)
    }
}

/// A recurring shared expense
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Expense {
    pub id: ExpenseId,

    #[serde(default)]
    pub name: String,

    /// Amount per occurrence
    pub amount: Money,

    #[serde(default)]
    pub frequency_type: FrequencyType,

    /// Required (positive) for parametrized frequencies; a missing value
    /// means "not configured yet" and normalizes to zero
    #[serde(default)]
    pub frequency_param: Option<u32>,

    #[serde(default)]
    pub benefit_x: BenefitWeight,

    #[serde(default)]
    pub payer: Option<Partner>,

    #[serde(default)]
    pub category_id: Option<CategoryId>,

    #[serde(default)]
    pub budget_id: Option<BudgetId>,

    /// Payment method
    #[serde(default)]
    pub linked_account_id: Option<LinkedAccountId>,

    /// Informational only
    #[serde(default)]
    pub is_estimate: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Expense {
    /// Materialize a new expense under a freshly minted identity
    pub fn create(id: ExpenseId, fields: NewExpense) -> Self {
        let now = Utc::now();
        let frequency_param = fields
            .frequency_param
            .filter(|_| fields.frequency_type.needs_param());
        Self {
            id,
            name: fields.name,
            amount: fields.amount,
            frequency_type: fields.frequency_type,
            frequency_param,
            benefit_x: fields.benefit_x,
            payer: fields.payer,
            category_id: fields.category_id,
            budget_id: fields.budget_id,
            linked_account_id: fields.linked_account_id,
            is_estimate: fields.is_estimate,
            created_at: now,
            updated_at: now,
        }
    }

    /// Monthly-equivalent amount
    pub fn monthly(&self) -> Money {
        frequency::to_monthly(self.amount, self.frequency_type, self.frequency_param)
    }

    /// Schedule description for display, e.g. `Every 2 Weeks`
    pub fn schedule(&self) -> String {
        frequency::describe(self.frequency_type, self.frequency_param)
    }

    /// Apply a partial update and bump `updated_at`
    pub fn apply(&mut self, patch: &ExpensePatch) {
        if let Some(name) = &patch.name {
            self.name = name.clone();
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(freq) = patch.frequency_type {
            self.frequency_type = freq;
            if !freq.needs_param() {
                self.frequency_param = None;
            }
        }
        if let Some(param) = patch.frequency_param {
            self.frequency_param = param;
        }
        if let Some(benefit) = patch.benefit_x {
            self.benefit_x = benefit;
        }
        if let Some(payer) = patch.payer {
            self.payer = payer;
        }
        if let Some(category) = patch.category_id {
            self.category_id = category;
        }
        if let Some(budget) = patch.budget_id {
            self.budget_id = budget;
        }
        if let Some(account) = patch.linked_account_id {
            self.linked_account_id = account;
        }
        if let Some(estimate) = patch.is_estimate {
            self.is_estimate = estimate;
        }
        self.updated_at = Utc::now();
    }

    /// Validate the expense
    pub fn validate(&self) -> Result<(), ExpenseValidationError> {
        if self.amount.is_negative() {
            return Err(ExpenseValidationError::NegativeAmount);
        }
        if self.amount.amount() > MAX_AMOUNT {
            return Err(ExpenseValidationError::AmountTooLarge);
        }
        if self.frequency_param == Some(0) {
            return Err(ExpenseValidationError::ZeroParam);
        }
        if self.frequency_param.is_some() && !self.frequency_type.needs_param() {
            return Err(ExpenseValidationError::UnexpectedParam(self.frequency_type));
        }
        Ok(())
    }

    /// Display name, with a placeholder for unnamed rows
    pub fn display_name(&self) -> &str {
        if self.name.trim().is_empty() {
            "(unnamed)"
        } else {
            &self.name
        }
    }
}

impl fmt::Display for Expense {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {})", self.display_name(), self.amount, self.schedule())
    }
}

/// Fields for a new expense; defaults match a freshly added grid row
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewExpense {
    pub name: String,
    pub amount: Money,
    pub frequency_type: FrequencyType,
    pub frequency_param: Option<u32>,
    pub benefit_x: BenefitWeight,
    pub payer: Option<Partner>,
    pub category_id: Option<CategoryId>,
    pub budget_id: Option<BudgetId>,
    pub linked_account_id: Option<LinkedAccountId>,
    pub is_estimate: bool,
}

/// Partial update of an expense
///
/// Outer `None` leaves a field alone; for nullable fields `Some(None)`
/// clears it.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ExpensePatch {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub frequency_type: Option<FrequencyType>,
    pub frequency_param: Option<Option<u32>>,
    pub benefit_x: Option<BenefitWeight>,
    pub payer: Option<Option<Partner>>,
    pub category_id: Option<Option<CategoryId>>,
    pub budget_id: Option<Option<BudgetId>>,
    pub linked_account_id: Option<Option<LinkedAccountId>>,
    pub is_estimate: Option<bool>,
}

impl ExpensePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Point the expense at a payment method; the payer follows the
    /// account's owner, and clearing the method clears the payer
    pub fn set_linked_account(&mut self, account: Option<&LinkedAccount>) {
        self.linked_account_id = Some(account.map(|a| a.id));
        self.payer = Some(account.and_then(|a| a.owner));
    }

    pub fn with_linked_account(mut self, account: Option<&LinkedAccount>) -> Self {
        self.set_linked_account(account);
        self
    }
}
