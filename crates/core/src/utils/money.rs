//! Helpers for monetary amounts.
//!
//! All ledger arithmetic is done on [`Decimal`]; amounts are stored and
//! emitted with exactly [`AMOUNT_SCALE`] fractional digits.

use rust_decimal::Decimal;
use std::str::FromStr;

use crate::constants::{AMOUNT_SCALE, MAX_AMOUNT};
use crate::errors::{Result, ValidationError};

/// Upper bound of a DECIMAL(10,2) column.
pub fn max_amount() -> Decimal {
    Decimal::from_str(MAX_AMOUNT).unwrap_or(Decimal::MAX)
}

/// Validates a strictly positive amount and rescales it to [`AMOUNT_SCALE`].
///
/// Rejects zero, negatives, values with more than two significant fractional
/// digits (`10.005`) and values above [`MAX_AMOUNT`]. Trailing zeros are
/// accepted, so `10.500` becomes `10.50`.
pub fn normalize_amount(field: &str, amount: Decimal) -> Result<Decimal> {
    if amount <= Decimal::ZERO {
        return Err(ValidationError::invalid_amount(field, "must be greater than zero").into());
    }
    if amount.normalize().scale() > AMOUNT_SCALE {
        return Err(ValidationError::invalid_amount(
            field,
            format!("at most {} decimal places are allowed", AMOUNT_SCALE),
        )
        .into());
    }
    if amount > max_amount() {
        return Err(
            ValidationError::invalid_amount(field, format!("must not exceed {}", MAX_AMOUNT))
                .into(),
        );
    }

    let mut scaled = amount.normalize();
    scaled.rescale(AMOUNT_SCALE);
    Ok(scaled)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Error;
    use rust_decimal_macros::dec;

    #[test]
    fn test_normalize_pads_to_two_places() {
        assert_eq!(normalize_amount("amount", dec!(40)).unwrap().to_string(), "40.00");
        assert_eq!(normalize_amount("amount", dec!(10.5)).unwrap().to_string(), "10.50");
        assert_eq!(normalize_amount("amount", dec!(10.500)).unwrap().to_string(), "10.50");
    }

    #[test]
    fn test_normalize_rejects_zero_and_negative() {
        for value in [dec!(0), dec!(0.00), dec!(-1), dec!(-0.01)] {
            let err = normalize_amount("amount", value).unwrap_err();
            assert!(matches!(err, Error::Validation(_)), "{} should be rejected", value);
        }
    }

    #[test]
    fn test_normalize_rejects_sub_cent_precision() {
        assert!(normalize_amount("amount", dec!(10.005)).is_err());
        assert!(normalize_amount("amount", dec!(0.001)).is_err());
    }

    #[test]
    fn test_normalize_enforces_column_range() {
        assert!(normalize_amount("amount", dec!(99999999.99)).is_ok());
        assert!(normalize_amount("amount", dec!(100000000.00)).is_err());
    }

    #[test]
    fn test_max_amount_matches_constant() {
        assert_eq!(max_amount(), dec!(99999999.99));
    }
}
