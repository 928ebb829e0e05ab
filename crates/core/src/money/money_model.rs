//! Fixed-point money amount.

use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};
use std::str::FromStr;

use num_traits::Zero;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};

/// A monetary amount backed by `rust_decimal::Decimal`.
///
/// Arithmetic is exact; rounding only happens through [`Money::round_for_display`].
/// Equality and ordering compare the numeric value, so `10` and `10.00` are equal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(Decimal);

impl Money {
    pub const ZERO: Money = Money(Decimal::ZERO);

    pub const fn new(amount: Decimal) -> Self {
        Money(amount)
    }

    pub fn amount(&self) -> Decimal {
        self.0
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative() && !self.0.is_zero()
    }

    pub fn is_positive(&self) -> bool {
        self.0.is_sign_positive() && !self.0.is_zero()
    }

    /// Rounds half away from zero to `minor_units` decimal places.
    pub fn round_for_display(&self, minor_units: u32) -> Money {
        Money(
            self.0
                .round_dp_with_strategy(minor_units, RoundingStrategy::MidpointAwayFromZero),
        )
    }

    /// `self × numerator ÷ denominator`, multiplying first so that evenly divisible
    /// splits stay exact. Returns `None` on a zero denominator or overflow.
    pub fn checked_mul_div(&self, numerator: Decimal, denominator: Decimal) -> Option<Money> {
        if denominator.is_zero() {
            return None;
        }
        self.0
            .checked_mul(numerator)?
            .checked_div(denominator)
            .map(|v| Money(v.normalize()))
    }

    /// Clamps negative amounts to zero.
    pub fn non_negative(self) -> Money {
        if self.is_negative() {
            Money::ZERO
        } else {
            self
        }
    }
}

impl From<Decimal> for Money {
    fn from(amount: Decimal) -> Self {
        Money(amount)
    }
}

impl From<Money> for Decimal {
    fn from(money: Money) -> Self {
        money.0
    }
}

impl FromStr for Money {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s.trim()).map(Money)
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl Add for Money {
    type Output = Money;

    fn add(self, rhs: Money) -> Money {
        Money(self.0 + rhs.0)
    }
}

impl AddAssign for Money {
    fn add_assign(&mut self, rhs: Money) {
        self.0 += rhs.0;
    }
}

impl Sub for Money {
    type Output = Money;

    fn sub(self, rhs: Money) -> Money {
        Money(self.0 - rhs.0)
    }
}

impl SubAssign for Money {
    fn sub_assign(&mut self, rhs: Money) {
        self.0 -= rhs.0;
    }
}

impl Neg for Money {
    type Output = Money;

    fn neg(self) -> Money {
        Money(-self.0)
    }
}

impl Mul<Decimal> for Money {
    type Output = Money;

    fn mul(self, rhs: Decimal) -> Money {
        Money(self.0 * rhs)
    }
}

impl Zero for Money {
    fn zero() -> Self {
        Money::ZERO
    }

    fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::ZERO, Add::add)
    }
}

impl<'a> Sum<&'a Money> for Money {
    fn sum<I: Iterator<Item = &'a Money>>(iter: I) -> Self {
        iter.copied().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_equality_ignores_scale() {
        assert_eq!(Money::new(dec!(10)), Money::new(dec!(10.00)));
    }

    #[test]
    fn test_round_for_display_is_half_up() {
        assert_eq!(
            Money::new(dec!(2.345)).round_for_display(2),
            Money::new(dec!(2.35))
        );
        assert_eq!(
            Money::new(dec!(2.355)).round_for_display(2),
            Money::new(dec!(2.36))
        );
        assert_eq!(
            Money::new(dec!(-2.345)).round_for_display(2),
            Money::new(dec!(-2.35))
        );
        assert_eq!(
            Money::new(dec!(2.344)).round_for_display(2),
            Money::new(dec!(2.34))
        );
    }

    #[test]
    fn test_checked_mul_div_stays_exact_when_divisible() {
        let remaining = Money::new(dec!(12000));
        let split = remaining
            .checked_mul_div(dec!(100000), dec!(120000))
            .unwrap();
        assert_eq!(split, Money::new(dec!(10000)));
    }

    #[test]
    fn test_checked_mul_div_rejects_zero_denominator() {
        assert!(Money::new(dec!(1)).checked_mul_div(dec!(1), dec!(0)).is_none());
    }

    #[test]
    fn test_sum_is_order_independent() {
        let amounts = [dec!(0.1), dec!(0.2), dec!(0.3), dec!(1000000.07)].map(Money::new);
        let forward: Money = amounts.iter().sum();
        let backward: Money = amounts.iter().rev().sum();
        assert_eq!(forward, backward);
        assert_eq!(forward, Money::new(dec!(1000000.67)));
    }

    #[test]
    fn test_non_negative_clamps() {
        assert_eq!(Money::new(dec!(-1000)).non_negative(), Money::ZERO);
        assert_eq!(Money::new(dec!(5)).non_negative(), Money::new(dec!(5)));
    }

    #[test]
    fn test_serializes_as_exact_string() {
        let json = serde_json::to_string(&Money::new(dec!(1234.50))).unwrap();
        assert_eq!(json, "\"1234.50\"");
        let parsed: Money = serde_json::from_str("\"1234.5\"").unwrap();
        assert_eq!(parsed, Money::new(dec!(1234.5)));
    }
}
