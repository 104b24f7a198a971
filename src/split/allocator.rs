//! Per-expense fair share
//!
//! Benefit weight and income ratio are blended multiplicatively:
//! `wx = bx * r`, `wy = (1 - bx) * (1 - r)`, and X owes
//! `monthly * wx / (wx + wy)`. Y owes the remainder, so the two shares
//! always add up to the monthly amount exactly.

use rust_decimal::Decimal;

use super::ratio::IncomeRatio;
use crate::models::{BenefitWeight, Expense, Money, Partner};

const SHARE_DECIMALS: u32 = 10;

/// Each partner's share of one monthly amount
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FairShare {
    pub monthly: Money,
    pub x: Money,
    pub y: Money,
}

impl FairShare {
    pub fn for_partner(&self, partner: Partner) -> Money {
        match partner {
            Partner::X => self.x,
            Partner::Y => self.y,
        }
    }
}

impl std::ops::Add for FairShare {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            monthly: self.monthly + other.monthly,
            x: self.x + other.x,
            y: self.y + other.y,
        }
    }
}

impl std::iter::Sum for FairShare {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::default(), |acc, s| acc + s)
    }
}

/// Split a monthly amount between the partners
pub fn split_monthly(monthly: Money, benefit: BenefitWeight, ratio: IncomeRatio) -> FairShare {
    let bx = Decimal::from(benefit.x()) / Decimal::ONE_HUNDRED;
    let by = Decimal::ONE - bx;
    let wx = bx * ratio.x();
    let wy = by * ratio.y();

    let mut total_weight = wx + wy;
    if total_weight.is_zero() {
        total_weight = Decimal::ONE;
    }

    // Keep X at a bounded scale so `monthly - x` is representable exactly.
    let dp = monthly.amount().scale().max(SHARE_DECIMALS);
    let x = Money::new(monthly.scale(wx, total_weight).amount().round_dp(dp));
    FairShare {
        monthly,
        x,
        y: monthly - x,
    }
}

/// Fair share of one expense's monthly equivalent
pub fn fair_share(expense: &Expense, ratio: IncomeRatio) -> FairShare {
    split_monthly(expense.monthly(), expense.benefit_x, ratio)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{ExpenseId, FrequencyType, NewExpense};

    fn benefit(x: i64) -> BenefitWeight {
        BenefitWeight::new(x).unwrap()
    }

    #[test]
    fn test_shares_always_sum_to_monthly() {
        let monthly = Money::parse("433.37").unwrap();
        let ratios = [
            IncomeRatio::EVEN,
            IncomeRatio::from_fraction(Decimal::new(1, 3)),
            IncomeRatio::from_fraction(Decimal::new(7, 1)),
            IncomeRatio::from_fraction(Decimal::ZERO),
            IncomeRatio::from_fraction(Decimal::ONE),
            IncomeRatio::from_totals(Money::from_whole(1), Money::from_whole(2)),
        ];
        for ratio in ratios {
            for b in 0..=100 {
                let share = split_monthly(monthly, benefit(b), ratio);
                assert_eq!(share.x + share.y, monthly, "benefit {} ratio {:?}", b, ratio);
            }
        }
    }

    #[test]
    fn test_full_benefit_full_income() {
        let monthly = Money::from_whole(900);
        let share = split_monthly(monthly, BenefitWeight::ALL_X, IncomeRatio::from_fraction(Decimal::ONE));
        assert_eq!(share.x, monthly);
        assert_eq!(share.y, Money::zero());
    }

    #[test]
    fn test_even_benefit_follows_income() {
        let ratio = IncomeRatio::from_totals(Money::from_whole(6000), Money::from_whole(4000));
        let share = split_monthly(Money::from_whole(1000), BenefitWeight::EVEN, ratio);
        assert_eq!(share.x, Money::from_whole(600));
        assert_eq!(share.y, Money::from_whole(400));
    }

    #[test]
    fn test_degenerate_weights_give_x_nothing() {
        // bx = 0 and r = 1 leaves both weights at zero
        let ratio = IncomeRatio::from_fraction(Decimal::ONE);
        let share = split_monthly(Money::from_whole(100), BenefitWeight::ALL_Y, ratio);
        assert_eq!(share.x, Money::zero());
        assert_eq!(share.y, Money::from_whole(100));
    }

    #[test]
    fn test_full_benefit_no_income_is_not_full_cost() {
        // X benefits fully but earns nothing: weights are both zero
        let ratio = IncomeRatio::from_fraction(Decimal::ZERO);
        let share = split_monthly(Money::from_whole(100), BenefitWeight::ALL_X, ratio);
        assert_eq!(share.x, Money::zero());
    }

    #[test]
    fn test_fair_share_of_expense() {
        let expense = Expense::create(
            ExpenseId::new(),
            NewExpense {
                name: "Groceries".into(),
                amount: Money::from_whole(100),
                frequency_type: FrequencyType::Weekly,
                ..Default::default()
            },
        );
        let share = fair_share(&expense, IncomeRatio::EVEN);
        assert_eq!(share.monthly, Money::from_whole(433));
        assert_eq!(share.x, Money::parse("216.5").unwrap());
        assert_eq!(share.x.rounded(), 217);
        assert_eq!(share.y.rounded(), 217);
    }

    #[test]
    fn test_sum_of_shares() {
        let a = split_monthly(Money::from_whole(10), BenefitWeight::EVEN, IncomeRatio::EVEN);
        let b = split_monthly(Money::from_whole(30), BenefitWeight::ALL_X, IncomeRatio::EVEN);
        let total: FairShare = vec![a, b].into_iter().sum();
        assert_eq!(total.monthly, Money::from_whole(40));
        assert_eq!(total.x, Money::from_whole(35));
        assert_eq!(total.y, Money::from_whole(5));
    }
}
