//! Household income ratio

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;

use crate::models::{Income, Money, Partner};

/// Partner X's share of total monthly household income, in `[0, 1]`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct IncomeRatio(Decimal);

impl IncomeRatio {
    /// Neutral 50/50 split, used whenever household income is zero
    pub const EVEN: IncomeRatio = IncomeRatio(Decimal::from_parts(5, 0, 0, false, 1));

    /// Ratio from the two partners' monthly totals
    pub fn from_totals(x: Money, y: Money) -> Self {
        let total = x + y;
        if !total.is_positive() {
            return Self::EVEN;
        }
        x.amount()
            .checked_div(total.amount())
            .map(Self)
            .unwrap_or(Self::EVEN)
    }

    /// Ratio from an exact fraction; values outside `[0, 1]` are clamped
    pub fn from_fraction(x: Decimal) -> Self {
        Self(x.clamp(Decimal::ZERO, Decimal::ONE))
    }

    /// Partner X's share
    pub fn x(self) -> Decimal {
        self.0
    }

    /// Partner Y's share, always `1 - x`
    pub fn y(self) -> Decimal {
        Decimal::ONE - self.0
    }

    pub fn for_partner(self, partner: Partner) -> Decimal {
        match partner {
            Partner::X => self.x(),
            Partner::Y => self.y(),
        }
    }

    /// Whole-number percentage for a partner, for display
    pub fn percent(self, partner: Partner) -> i64 {
        (self.for_partner(partner) * Decimal::ONE_HUNDRED)
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_i64()
            .unwrap_or(50)
    }
}

impl Default for IncomeRatio {
    fn default() -> Self {
        Self::EVEN
    }
}

impl fmt::Display for IncomeRatio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "X {}% / Y {}%",
            self.percent(Partner::X),
            self.percent(Partner::Y)
        )
    }
}

/// Monthly income totals per partner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HouseholdIncome {
    pub x: Money,
    pub y: Money,
}

impl HouseholdIncome {
    /// Sum every income's monthly equivalent by partner
    pub fn from_incomes<'a>(incomes: impl IntoIterator<Item = &'a Income>) -> Self {
        incomes
            .into_iter()
            .fold(Self::default(), |mut acc, income| {
                match income.partner {
                    Partner::X => acc.x += income.monthly(),
                    Partner::Y => acc.y += income.monthly(),
                }
                acc
            })
    }

    pub fn total(&self) -> Money {
        self.x + self.y
    }

    pub fn for_partner(&self, partner: Partner) -> Money {
        match partner {
            Partner::X => self.x,
            Partner::Y => self.y,
        }
    }

    pub fn ratio(&self) -> IncomeRatio {
        IncomeRatio::from_totals(self.x, self.y)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{FrequencyType, IncomeId, NewIncome};

    fn income(partner: Partner, amount: i64, frequency: FrequencyType) -> Income {
        Income::create(
            IncomeId::new(),
            NewIncome {
                name: "pay".into(),
                amount: Money::from_whole(amount),
                frequency_type: frequency,
                frequency_param: None,
                partner,
            },
        )
    }

    #[test]
    fn test_zero_income_is_even() {
        let ratio = HouseholdIncome::from_incomes(&[]).ratio();
        assert_eq!(ratio, IncomeRatio::EVEN);
        assert_eq!(ratio.x(), Decimal::new(5, 1));
        assert_eq!(ratio.percent(Partner::X), 50);
    }

    #[test]
    fn test_ratio_from_incomes() {
        let incomes = vec![
            income(Partner::X, 3000, FrequencyType::Monthly),
            income(Partner::Y, 24000, FrequencyType::Annual),
        ];
        let totals = HouseholdIncome::from_incomes(&incomes);
        assert_eq!(totals.x, Money::from_whole(3000));
        assert_eq!(totals.y, Money::from_whole(2000));
        assert_eq!(totals.total(), Money::from_whole(5000));

        let ratio = totals.ratio();
        assert_eq!(ratio.x(), Decimal::new(6, 1));
        assert_eq!(ratio.y(), Decimal::new(4, 1));
        assert_eq!(ratio.to_string(), "X 60% / Y 40%");
    }

    #[test]
    fn test_one_sided_income() {
        let incomes = vec![income(Partner::Y, 1000, FrequencyType::Monthly)];
        let ratio = HouseholdIncome::from_incomes(&incomes).ratio();
        assert_eq!(ratio.x(), Decimal::ZERO);
        assert_eq!(ratio.y(), Decimal::ONE);
    }

    #[test]
    fn test_from_fraction_clamps() {
        assert_eq!(IncomeRatio::from_fraction(Decimal::TWO).x(), Decimal::ONE);
        assert_eq!(IncomeRatio::from_fraction(-Decimal::ONE).x(), Decimal::ZERO);
    }
}
