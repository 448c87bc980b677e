//! Column conversion helpers shared by the repository models.
//!
//! Amounts are stored as TEXT with exactly two fractional digits so that
//! SQLite never rounds them through a float.

use rust_decimal::Decimal;
use std::str::FromStr;

use healthpal_core::constants::AMOUNT_SCALE;
use healthpal_core::errors::{DatabaseError, Error, Result};

/// Renders an amount for storage, always with two fractional digits.
pub fn amount_to_column(amount: Decimal) -> String {
    let mut value = amount;
    value.rescale(AMOUNT_SCALE);
    value.to_string()
}

/// Parses a stored amount. A malformed value means the row is corrupt.
pub fn amount_from_column(column: &str, value: &str) -> Result<Decimal> {
    let mut amount = Decimal::from_str(value).map_err(|e| {
        Error::Database(DatabaseError::Internal(format!(
            "Stored {} '{}' is not a decimal: {}",
            column, value, e
        )))
    })?;
    amount.rescale(AMOUNT_SCALE);
    Ok(amount)
}

/// Parses a stored enum column through the domain type's `FromStr`.
pub fn enum_from_column<T>(column: &str, value: &str) -> Result<T>
where
    T: FromStr<Err = Error>,
{
    T::from_str(value).map_err(|e| {
        Error::Database(DatabaseError::Internal(format!(
            "Stored {} '{}' is invalid: {}",
            column, value, e
        )))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use healthpal_core::treatments::TreatmentStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_amount_column_keeps_two_places() {
        assert_eq!(amount_to_column(dec!(110)), "110.00");
        assert_eq!(amount_to_column(dec!(0.3)), "0.30");
        assert_eq!(amount_from_column("amount", "40").unwrap().to_string(), "40.00");
    }

    #[test]
    fn test_corrupt_amount_is_internal_error() {
        assert!(matches!(
            amount_from_column("amount", "forty"),
            Err(Error::Database(DatabaseError::Internal(_)))
        ));
    }

    #[test]
    fn test_enum_column() {
        let status: TreatmentStatus = enum_from_column("status", "funded").unwrap();
        assert_eq!(status, TreatmentStatus::Funded);
        assert!(enum_from_column::<TreatmentStatus>("status", "paused").is_err());
    }
}
