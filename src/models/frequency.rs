//! Recurrence patterns and the monthly normalizer
//!
//! Every expense and income carries a frequency; all aggregation happens on
//! the monthly-equivalent amount produced by [`to_monthly`].

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::money::Money;

/// Average weeks per month (4.33)
pub const WEEKS_PER_MONTH: Decimal = Decimal::from_parts(433, 0, 0, false, 2);

/// Average days per month (30.44)
pub const DAYS_PER_MONTH: Decimal = Decimal::from_parts(3044, 0, 0, false, 2);

const MONTHS_PER_YEAR: Decimal = Decimal::from_parts(12, 0, 0, false, 0);

/// How often an amount recurs
///
/// Stored as snake_case strings. Anything unrecognized loads as
/// [`FrequencyType::Unknown`] and normalizes to zero instead of failing the
/// whole data file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FrequencyType {
    #[default]
    Monthly,
    TwiceMonthly,
    Weekly,
    EveryNWeeks,
    EveryNMonths,
    EveryNDays,
    Annual,
    KTimesAnnually,
    KTimesMonthly,
    KTimesWeekly,
    Unknown,
}

impl FrequencyType {
    /// Order in which frequencies are offered in pickers
    pub const PICKER_ORDER: [FrequencyType; 10] = [
        Self::Weekly,
        Self::TwiceMonthly,
        Self::Monthly,
        Self::Annual,
        Self::EveryNDays,
        Self::EveryNWeeks,
        Self::EveryNMonths,
        Self::KTimesWeekly,
        Self::KTimesMonthly,
        Self::KTimesAnnually,
    ];

    /// Storage key, e.g. `every_n_weeks`
    pub fn key(self) -> &'static str {
        match self {
            Self::Monthly => "monthly",
            Self::TwiceMonthly => "twice_monthly",
            Self::Weekly => "weekly",
            Self::EveryNWeeks => "every_n_weeks",
            Self::EveryNMonths => "every_n_months",
            Self::EveryNDays => "every_n_days",
            Self::Annual => "annual",
            Self::KTimesAnnually => "k_times_annually",
            Self::KTimesMonthly => "k_times_monthly",
            Self::KTimesWeekly => "k_times_weekly",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable label
    pub fn label(self) -> &'static str {
        match self {
            Self::Monthly => "Monthly",
            Self::TwiceMonthly => "Twice Monthly",
            Self::Weekly => "Weekly",
            Self::EveryNWeeks => "Every X Weeks",
            Self::EveryNMonths => "Every X Months",
            Self::EveryNDays => "Every X Days",
            Self::Annual => "Yearly",
            Self::KTimesAnnually => "X/Year",
            Self::KTimesMonthly => "X/Month",
            Self::KTimesWeekly => "X/Week",
            Self::Unknown => "Unknown",
        }
    }

    /// Whether this frequency needs a positive integer parameter
    pub fn needs_param(self) -> bool {
        matches!(
            self,
            Self::EveryNWeeks
                | Self::EveryNMonths
                | Self::EveryNDays
                | Self::KTimesAnnually
                | Self::KTimesMonthly
                | Self::KTimesWeekly
        )
    }
}

impl fmt::Display for FrequencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for FrequencyType {
    type Err = String;

    /// Accepts the storage key or the label, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_lowercase();
        Self::PICKER_ORDER
            .into_iter()
            .find(|f| f.key() == needle || f.label().to_lowercase() == needle)
            .ok_or_else(|| {
                format!(
                    "Unknown frequency '{}'. Expected one of: {}",
                    s.trim(),
                    Self::PICKER_ORDER
                        .iter()
                        .map(|f| f.key())
                        .collect::<Vec<_>>()
                        .join(", ")
                )
            })
    }
}

impl From<String> for FrequencyType {
    fn from(value: String) -> Self {
        value.parse().unwrap_or(Self::Unknown)
    }
}

impl From<FrequencyType> for String {
    fn from(value: FrequencyType) -> Self {
        value.key().to_string()
    }
}

/// Convert a recurring amount to its monthly equivalent
///
/// Total: a parametrized frequency with a missing or zero parameter, or an
/// unknown frequency, yields zero ("not yet configured").
pub fn to_monthly(amount: Money, frequency: FrequencyType, param: Option<u32>) -> Money {
    let n = param.filter(|p| *p > 0).map(Decimal::from);
    let one = Decimal::ONE;

    match (frequency, n) {
        (FrequencyType::Monthly, _) => amount,
        (FrequencyType::TwiceMonthly, _) => amount.scale(Decimal::TWO, one),
        (FrequencyType::Weekly, _) => amount.scale(WEEKS_PER_MONTH, one),
        (FrequencyType::Annual, _) => amount.scale(one, MONTHS_PER_YEAR),
        (FrequencyType::EveryNWeeks, Some(n)) => amount.scale(WEEKS_PER_MONTH, n),
        (FrequencyType::EveryNMonths, Some(n)) => amount.scale(one, n),
        (FrequencyType::EveryNDays, Some(n)) => amount.scale(DAYS_PER_MONTH, n),
        (FrequencyType::KTimesAnnually, Some(n)) => amount.scale(n, MONTHS_PER_YEAR),
        (FrequencyType::KTimesMonthly, Some(n)) => amount.scale(n, one),
        (FrequencyType::KTimesWeekly, Some(n)) => {
            amount.scale(n, one).scale(WEEKS_PER_MONTH, one)
        }
        _ => Money::zero(),
    }
}

/// Short schedule description, e.g. `Every 3 Weeks` or `2/Month`
pub fn describe(frequency: FrequencyType, param: Option<u32>) -> String {
    match (frequency, param) {
        (FrequencyType::EveryNWeeks, Some(n)) => format!("Every {} Weeks", n),
        (FrequencyType::EveryNMonths, Some(n)) => format!("Every {} Months", n),
        (FrequencyType::EveryNDays, Some(n)) => format!("Every {} Days", n),
        (FrequencyType::KTimesAnnually, Some(n)) => format!("{}/Year", n),
        (FrequencyType::KTimesMonthly, Some(n)) => format!("{}/Month", n),
        (FrequencyType::KTimesWeekly, Some(n)) => format!("{}/Week", n),
        (f, _) => f.label().to_string(),
    }
}
