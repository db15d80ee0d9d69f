//! Price persistence

pub mod sqlite_store;

pub use sqlite_store::SqlitePriceStore;

use serde::Deserialize;
use std::str::FromStr;

/// Which calendar day "today" means to the database clock
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DayBoundary {
    #[default]
    Local,
    Utc,
}

impl DayBoundary {
    /// `created_at` is stored in UTC. The local day's bounds are converted to
    /// UTC so the bare column stays usable by `idx_prices_coin_created_at`.
    pub fn window_clause(&self) -> &'static str {
        match self {
            DayBoundary::Local => {
                "created_at >= datetime('now', 'localtime', 'start of day', 'utc') \
                 AND created_at < datetime('now', 'localtime', 'start of day', '+1 day', 'utc')"
            }
            DayBoundary::Utc => {
                "created_at >= datetime('now', 'start of day') \
                 AND created_at < datetime('now', 'start of day', '+1 day')"
            }
        }
    }
}

impl FromStr for DayBoundary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" | "localtime" => Ok(DayBoundary::Local),
            "utc" => Ok(DayBoundary::Utc),
            other => Err(other.to_string()),
        }
    }
}
