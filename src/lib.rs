//! pricewatch - exchange price watcher
//! Polls a ticker, keeps a daily price log and emails on new highs and lows

pub mod app;
pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod shared;

// Re-export main types for convenience
pub use application::PriceWatcher;
pub use domain::price::{is_new_high, is_new_low, PricePrecision, PriceRepository};
pub use infrastructure::storage::SqlitePriceStore;
