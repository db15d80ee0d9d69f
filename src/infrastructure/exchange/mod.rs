pub mod binance_client;

pub use binance_client::BinanceClient;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::price::PricePrecision;
use crate::shared::errors::TickerError;

/// Read-only market data source
#[async_trait]
pub trait TickerApiClient: Send + Sync {
    /// Last traded price for `symbol`, unrounded
    async fn last_price(&self, symbol: &str) -> Result<Decimal, TickerError>;

    /// Minimum price increment for `symbol`, as the exchange prints it
    async fn tick_size(&self, symbol: &str) -> Result<String, TickerError>;

    /// Full 24h ticker payload, used by the pre-flight check
    async fn raw_ticker(&self, symbol: &str) -> Result<serde_json::Value, TickerError>;

    async fn price_precision(&self, symbol: &str) -> Result<PricePrecision, TickerError> {
        let tick_size = self.tick_size(symbol).await?;
        PricePrecision::from_tick_size(&tick_size)
    }
}
