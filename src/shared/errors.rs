//! Error handling for the application

use thiserror::Error;

/// Ticker API errors
#[derive(Error, Debug)]
pub enum TickerError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Ticker API returned status: {0}")]
    Status(u16),

    #[error("Invalid price in ticker response: {0}")]
    InvalidPrice(String),

    #[error("No tick size found for symbol {0}")]
    MissingTickSize(String),

    #[error("Invalid tick size: {0}")]
    InvalidTickSize(String),
}

/// Price store errors
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid stored price: {0}")]
    InvalidPrice(String),
}

/// Notification errors
#[derive(Error, Debug)]
pub enum NotifyError {
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("Failed to build email: {0}")]
    Message(#[from] lettre::error::Error),

    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    #[error("Mail transport is not configured")]
    NotConfigured,
}

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Read(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}
