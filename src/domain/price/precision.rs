//! Price precision derived from the exchange tick size

use rust_decimal::{Decimal, RoundingStrategy};
use std::fmt;
use std::str::FromStr;

use crate::shared::errors::TickerError;

/// Largest precision the integer-scaled comparison supports
pub const MAX_PRECISION: u32 = 18;

/// Number of decimal digits quoted for the tracked asset.
///
/// Resolved once per run; every rounding and comparison in that run uses
/// the same value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PricePrecision(u32);

impl PricePrecision {
    pub fn new(digits: u32) -> Result<Self, TickerError> {
        if digits > MAX_PRECISION {
            return Err(TickerError::InvalidTickSize(format!(
                "precision {} exceeds {}",
                digits, MAX_PRECISION
            )));
        }
        Ok(Self(digits))
    }

    /// `"0.01000000"` -> 2, `"1.00000000"` -> 0
    pub fn from_tick_size(tick_size: &str) -> Result<Self, TickerError> {
        let tick = Decimal::from_str(tick_size.trim())
            .map_err(|_| TickerError::InvalidTickSize(tick_size.to_string()))?;
        if tick <= Decimal::ZERO {
            return Err(TickerError::InvalidTickSize(tick_size.to_string()));
        }
        Self::new(tick.normalize().scale())
    }

    pub fn digits(&self) -> u32 {
        self.0
    }

    /// `10^precision`
    pub fn multiplier(&self) -> Decimal {
        Decimal::from_i128_with_scale(10i128.pow(self.0), 0)
    }

    /// Round a quoted price to this precision, like the exchange displays it
    pub fn round(&self, price: Decimal) -> Decimal {
        price.round_dp_with_strategy(self.0, RoundingStrategy::MidpointAwayFromZero)
    }

    /// Scale by `10^precision` and round half up to a whole number of ticks.
    /// Saturates at the `Decimal` range.
    pub fn to_units(&self, price: Decimal) -> i128 {
        let mut units = price
            .saturating_mul(self.multiplier())
            .saturating_add(Decimal::new(5, 1))
            .floor();
        units.rescale(0);
        units.mantissa()
    }
}

impl fmt::Display for PricePrecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_from_tick_size() {
        assert_eq!(PricePrecision::from_tick_size("0.01000000").unwrap().digits(), 2);
        assert_eq!(PricePrecision::from_tick_size("0.00001000").unwrap().digits(), 5);
        assert_eq!(PricePrecision::from_tick_size("1.00000000").unwrap().digits(), 0);
        assert_eq!(PricePrecision::from_tick_size("10.000").unwrap().digits(), 0);
    }

    #[test]
    fn test_from_tick_size_rejects_garbage() {
        assert!(PricePrecision::from_tick_size("").is_err());
        assert!(PricePrecision::from_tick_size("abc").is_err());
        assert!(PricePrecision::from_tick_size("0.00000000").is_err());
        assert!(PricePrecision::from_tick_size("0.0000000000000000001").is_err());
    }

    #[test]
    fn test_round() {
        let p = PricePrecision::new(2).unwrap();
        assert_eq!(p.round(dec!(50000.125)), dec!(50000.13));
        assert_eq!(p.round(dec!(50000.12499)), dec!(50000.12));
        assert_eq!(p.round(dec!(7)), dec!(7));
    }

    #[test]
    fn test_to_units_rounds_half_up() {
        let p = PricePrecision::new(2).unwrap();
        assert_eq!(p.to_units(dec!(100.00)), 10000);
        assert_eq!(p.to_units(dec!(99.005)), 9901);
        assert_eq!(p.to_units(dec!(99.0049)), 9900);

        let p = PricePrecision::new(0).unwrap();
        assert_eq!(p.to_units(dec!(2.5)), 3);
        assert_eq!(p.to_units(dec!(-2.5)), -2);
    }
}
