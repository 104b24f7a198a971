//! Payer filter

use std::fmt;
use std::str::FromStr;

use crate::models::{Expense, Partner};

/// Which expenses to show, by payer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PayerFilter {
    #[default]
    All,
    Only(Partner),
}

impl PayerFilter {
    pub fn matches(self, expense: &Expense) -> bool {
        match self {
            Self::All => true,
            Self::Only(partner) => expense.payer == Some(partner),
        }
    }

    /// Preference value: `all`, `X` or `Y`
    pub fn key(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Only(p) => p.label(),
        }
    }

    /// Next filter in the All -> X -> Y cycle
    pub fn cycle(self) -> Self {
        match self {
            Self::All => Self::Only(Partner::X),
            Self::Only(Partner::X) => Self::Only(Partner::Y),
            Self::Only(Partner::Y) => Self::All,
        }
    }
}

impl fmt::Display for PayerFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for PayerFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.parse::<Partner>().map(Self::Only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_key() {
        assert_eq!("all".parse::<PayerFilter>().unwrap(), PayerFilter::All);
        assert_eq!(
            "Y".parse::<PayerFilter>().unwrap(),
            PayerFilter::Only(Partner::Y)
        );
        assert!("both".parse::<PayerFilter>().is_err());
        assert_eq!(PayerFilter::Only(Partner::X).key(), "X");
    }

    #[test]
    fn test_cycle() {
        let f = PayerFilter::All.cycle().cycle().cycle();
        assert_eq!(f, PayerFilter::All);
    }
}
