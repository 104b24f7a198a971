//! Income stream model
//!
//! Incomes only matter in aggregate: their monthly totals per partner drive
//! the household income ratio used to split every expense.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::frequency::{self, FrequencyType};
use super::ids::IncomeId;
use super::money::{Money, MAX_AMOUNT};
use super::partner::Partner;

/// Validation errors for incomes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IncomeValidationError {
    EmptyName,
    NegativeAmount,
    AmountTooLarge,
    ZeroParam,
    UnexpectedParam(FrequencyType),
}

impl fmt::Display for IncomeValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyName => write!(f, "Income name cannot be empty"),
            Self::NegativeAmount => write!(f, "Income amount cannot be negative"),
            Self::AmountTooLarge => write!(f, "Income amount is too large"),
            Self::ZeroParam => write!(f, "Frequency parameter must be a positive whole number"),
            Self::UnexpectedParam(freq) => {
                write!(f, "{} frequency does not take a parameter", freq.label())
            }
        }
    }
}

impl std::error::Error for IncomeValidationError {}

/// A recurring income belonging to one partner
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Income {
    pub id: IncomeId,
    pub name: String,
    pub amount: Money,

    #[serde(default)]
    pub frequency_type: FrequencyType,

    #[serde(default)]
    pub frequency_param: Option<u32>,

    #[serde(rename = "partner_label")]
    pub partner: Partner,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Income {
    /// Materialize a new income under a freshly minted identity
    pub fn create(id: IncomeId, fields: NewIncome) -> Self {
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
            partner: fields.partner,
            created_at: now,
            updated_at: now,
        }
    }

    /// Monthly-equivalent amount
    pub fn monthly(&self) -> Money {
        frequency::to_monthly(self.amount, self.frequency_type, self.frequency_param)
    }

    pub fn schedule(&self) -> String {
        frequency::describe(self.frequency_type, self.frequency_param)
    }

    /// Apply a partial update and bump `updated_at`
    pub fn apply(&mut self, patch: &IncomePatch) {
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
        if let Some(partner) = patch.partner {
            self.partner = partner;
        }
        self.updated_at = Utc::now();
    }

    /// Validate the income
    pub fn validate(&self) -> Result<(), IncomeValidationError> {
        if self.name.trim().is_empty() {
            return Err(IncomeValidationError::EmptyName);
        }
        if self.amount.is_negative() {
            return Err(IncomeValidationError::NegativeAmount);
        }
        if self.amount.amount() > MAX_AMOUNT {
            return Err(IncomeValidationError::AmountTooLarge);
        }
        if self.frequency_param == Some(0) {
            return Err(IncomeValidationError::ZeroParam);
        }
        if self.frequency_param.is_some() && !self.frequency_type.needs_param() {
            return Err(IncomeValidationError::UnexpectedParam(self.frequency_type));
        }
        Ok(())
    }
}

impl fmt::Display for Income {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} {}, {})", self.name, self.amount, self.schedule(), self.partner)
    }
}

/// Fields for a new income
#[derive(Debug, Clone, PartialEq)]
pub struct NewIncome {
    pub name: String,
    pub amount: Money,
    pub frequency_type: FrequencyType,
    pub frequency_param: Option<u32>,
    pub partner: Partner,
}

impl Default for NewIncome {
    fn default() -> Self {
        Self {
            name: "New income".to_string(),
            amount: Money::zero(),
            frequency_type: FrequencyType::Monthly,
            frequency_param: None,
            partner: Partner::X,
        }
    }
}

/// Partial update of an income
#[derive(Debug, Clone, PartialEq, Default)]
pub struct IncomePatch {
    pub name: Option<String>,
    pub amount: Option<Money>,
    pub frequency_type: Option<FrequencyType>,
    pub frequency_param: Option<Option<u32>>,
    pub partner: Option<Partner>,
}

impl IncomePatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_income_defaults() {
        let income = Income::create(IncomeId::new(), NewIncome::default());
        assert_eq!(income.name, "New income");
        assert_eq!(income.partner, Partner::X);
        assert_eq!(income.frequency_type, FrequencyType::Monthly);
        assert!(income.validate().is_ok());
    }

    #[test]
    fn test_monthly() {
        let income = Income::create(
            IncomeId::new(),
            NewIncome {
                name: "Salary".into(),
                amount: Money::from_whole(2000),
                frequency_type: FrequencyType::EveryNWeeks,
                frequency_param: Some(2),
                partner: Partner::Y,
            },
        );
        assert_eq!(income.monthly(), Money::from_whole(4330));
    }

    #[test]
    fn test_validation_empty_name() {
        let mut income = Income::create(IncomeId::new(), NewIncome::default());
        income.apply(&IncomePatch {
            name: Some("   ".into()),
            ..Default::default()
        });
        assert_eq!(income.validate(), Err(IncomeValidationError::EmptyName));
    }

    #[test]
    fn test_param_on_fixed_frequency_rejected() {
        let mut income = Income::create(IncomeId::new(), NewIncome::default());
        income.apply(&IncomePatch {
            frequency_param: Some(Some(2)),
            ..Default::default()
        });
        assert_eq!(
            income.validate(),
            Err(IncomeValidationError::UnexpectedParam(FrequencyType::Monthly))
        );

        income.apply(&IncomePatch {
            frequency_type: Some(FrequencyType::KTimesMonthly),
            ..Default::default()
        });
        assert!(income.validate().is_ok());
    }

    #[test]
    fn test_partner_serialized_as_partner_label() {
        let income = Income::create(IncomeId::new(), NewIncome::default());
        let json = serde_json::to_value(&income).unwrap();
        assert_eq!(json["partner_label"], "X");
    }
}
