//! Helpers for mapping SQLite text columns onto domain types.

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::errors::corrupt_record;
use lendbook_core::errors::Result;
use lendbook_core::Money;

/// Parses a decimal stored as text. Also accepts scientific notation, which older
/// rows written from floating point values may contain.
pub fn parse_decimal_column(value: &str, table: &str, id: &str, column: &str) -> Result<Decimal> {
    let trimmed = value.trim();
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .map_err(|e| corrupt_record(table, id, format!("{} '{}': {}", column, value, e)))
}

pub fn parse_money_column(value: &str, table: &str, id: &str, column: &str) -> Result<Money> {
    parse_decimal_column(value, table, id, column).map(Money::new)
}

pub fn parse_optional_decimal_column(
    value: Option<&str>,
    table: &str,
    id: &str,
    column: &str,
) -> Result<Option<Decimal>> {
    value
        .map(|v| parse_decimal_column(v, table, id, column))
        .transpose()
}

/// Parses an enum stored by its wire name.
pub fn parse_enum_column<T>(value: &str, table: &str, id: &str, column: &str) -> Result<T>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .parse::<T>()
        .map_err(|e| corrupt_record(table, id, format!("{}: {}", column, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use lendbook_core::errors::{DatabaseError, Error};
    use lendbook_core::loans::LoanStatus;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_plain_and_scientific_decimals() {
        assert_eq!(
            parse_decimal_column("100000.50", "loans", "l1", "principal_amount").unwrap(),
            dec!(100000.50)
        );
        assert_eq!(
            parse_decimal_column("1.2e5", "loans", "l1", "principal_amount").unwrap(),
            dec!(120000)
        );
    }

    #[test]
    fn test_garbage_decimal_is_corrupt_record() {
        let err = parse_decimal_column("abc", "loans", "l1", "principal_amount").unwrap_err();
        assert!(matches!(err, Error::Database(DatabaseError::CorruptRecord(_))));
    }

    #[test]
    fn test_parse_enum_column() {
        let status: LoanStatus = parse_enum_column("BAD_DEBT", "loans", "l1", "status").unwrap();
        assert_eq!(status, LoanStatus::BadDebt);
        assert!(parse_enum_column::<LoanStatus>("LOST", "loans", "l1", "status").is_err());
    }
}
