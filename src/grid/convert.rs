//! Conversions from committed cell text to field values
//!
//! These are the only places user-typed text becomes typed data, so they
//! reject garbage with a validation error before any write is issued.

use crate::error::{FairShareError, FairShareResult};
use crate::models::{BenefitWeight, Money};

/// Amount cell: empty means zero, otherwise a non-negative decimal
pub fn parse_amount(value: &str) -> FairShareResult<Money> {
    if value.trim().is_empty() {
        return Ok(Money::zero());
    }
    let amount = Money::parse(value)
        .map_err(|e| FairShareError::Validation(e.to_string()))?;
    if amount.is_negative() {
        return Err(FairShareError::Validation(
            "Amount cannot be negative".into(),
        ));
    }
    Ok(amount)
}

/// Frequency parameter cell: empty clears it, otherwise a positive integer
pub fn parse_param(value: &str) -> FairShareResult<Option<u32>> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    match trimmed.parse::<u32>() {
        Ok(n) if n > 0 => Ok(Some(n)),
        _ => Err(FairShareError::Validation(format!(
            "'{}' is not a positive whole number",
            trimmed
        ))),
    }
}

/// Benefit cell: empty means zero, any number is rounded and clamped
fn parse_percent(value: &str) -> FairShareResult<f64> {
    let trimmed = value.trim().trim_end_matches('%').trim();
    if trimmed.is_empty() {
        return Ok(0.0);
    }
    trimmed
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| FairShareError::Validation(format!("'{}' is not a percentage", trimmed)))
}

/// Benefit weight typed into Partner X's column
pub fn parse_benefit_x(value: &str) -> FairShareResult<BenefitWeight> {
    parse_percent(value).map(BenefitWeight::clamped)
}

/// Benefit weight typed into Partner Y's column
pub fn parse_benefit_y(value: &str) -> FairShareResult<BenefitWeight> {
    parse_percent(value).map(BenefitWeight::from_y)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_amount() {
        assert_eq!(parse_amount("").unwrap(), Money::zero());
        assert_eq!(parse_amount("$1,250.50").unwrap(), Money::from_cents(125050));
        assert!(parse_amount("abc").unwrap_err().is_validation());
        assert!(parse_amount("-5").unwrap_err().is_validation());
    }

    #[test]
    fn test_parse_param() {
        assert_eq!(parse_param(" ").unwrap(), None);
        assert_eq!(parse_param("3").unwrap(), Some(3));
        assert!(parse_param("0").is_err());
        assert!(parse_param("-2").is_err());
        assert!(parse_param("1.5").is_err());
    }

    #[test]
    fn test_parse_benefit() {
        assert_eq!(parse_benefit_x("120").unwrap().x(), 100);
        assert_eq!(parse_benefit_x("-4").unwrap().x(), 0);
        assert_eq!(parse_benefit_x("62.5%").unwrap().x(), 63);
        assert_eq!(parse_benefit_x("").unwrap().x(), 0);
        assert_eq!(parse_benefit_y("25").unwrap().x(), 75);
        assert!(parse_benefit_x("lots").is_err());
    }
}
