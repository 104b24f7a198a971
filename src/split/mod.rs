//! Fair-split allocation
//!
//! Turns the household's incomes into an income ratio and uses it, along
//! with each expense's benefit weight, to decide what each partner owes.
//! Nothing here can fail: degenerate inputs fall back to a 50/50 ratio or
//! a zero share.

pub mod allocator;
pub mod ratio;

pub use allocator::{fair_share, split_monthly, FairShare};
pub use ratio::{HouseholdIncome, IncomeRatio};
