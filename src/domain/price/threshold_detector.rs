//! Crossing detection against today's recorded extremes.
//!
//! Both operands are scaled to whole ticks and rounded independently before
//! subtracting. Rounding the difference instead changes the outcome at
//! half-tick boundaries.

use rust_decimal::Decimal;

use super::precision::PricePrecision;

/// True iff `current` is above `recorded_high` by at least `threshold_up`
pub fn is_new_high(
    current: Decimal,
    recorded_high: Option<Decimal>,
    precision: PricePrecision,
    threshold_up: Decimal,
) -> bool {
    let Some(high) = recorded_high else {
        return false;
    };

    precision.to_units(current) - precision.to_units(high) >= precision.to_units(threshold_up)
}

/// True iff `current` is below `recorded_low` by at least `threshold_down`
pub fn is_new_low(
    current: Decimal,
    recorded_low: Option<Decimal>,
    precision: PricePrecision,
    threshold_down: Decimal,
) -> bool {
    let Some(low) = recorded_low else {
        return false;
    };

    precision.to_units(low) - precision.to_units(current) >= precision.to_units(threshold_down)
}
