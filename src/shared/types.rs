//! Common types used across the application

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Observed price of the tracked asset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSample {
    pub price: Decimal,
    pub asset: String,
    pub observed_at: DateTime<Utc>,
}

impl PriceSample {
    pub fn new(price: Decimal, asset: impl Into<String>) -> Self {
        Self {
            price,
            asset: asset.into(),
            observed_at: Utc::now(),
        }
    }
}

/// Which daily extreme was crossed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    High,
    Low,
}

impl Direction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Direction::High => "highest",
            Direction::Low => "lowest",
        }
    }
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Payload handed to a notifier when a crossing is confirmed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAlert {
    pub asset: String,
    pub price: Decimal,
    /// Daily extreme the price was compared against
    pub previous: Decimal,
    pub direction: Direction,
}

/// Alert thresholds, in quote currency
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    pub up: Option<Decimal>,
    pub down: Option<Decimal>,
}

impl Thresholds {
    /// Alerting runs only when at least one side is configured
    pub fn is_active(&self) -> bool {
        self.up.is_some() || self.down.is_some()
    }
}
