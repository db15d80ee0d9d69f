//! Price domain - precision, crossing detection and storage contract

mod precision;
mod price_store;
pub mod threshold_detector;

pub use precision::{PricePrecision, MAX_PRECISION};
pub use price_store::PriceRepository;
pub use threshold_detector::{is_new_high, is_new_low};
