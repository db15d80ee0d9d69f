use async_trait::async_trait;
use reqwest::Client;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use super::TickerApiClient;
use crate::shared::errors::TickerError;

pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// 24h ticker response, only the fields we read
#[derive(Debug, Deserialize)]
struct TickerResponse {
    #[serde(rename = "lastPrice")]
    last_price: String,
}

#[derive(Debug, Deserialize)]
struct ExchangeInfoResponse {
    symbols: Vec<SymbolInfo>,
}

#[derive(Debug, Deserialize)]
struct SymbolInfo {
    symbol: String,
    filters: Vec<SymbolFilter>,
}

#[derive(Debug, Deserialize)]
struct SymbolFilter {
    #[serde(rename = "filterType")]
    filter_type: String,
    #[serde(rename = "tickSize")]
    tick_size: Option<String>,
}

/// Binance spot REST client
pub struct BinanceClient {
    http_client: Client,
    base_url: String,
}

impl BinanceClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, TickerError> {
        let http_client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    async fn get(&self, path: &str, symbol: &str) -> Result<reqwest::Response, TickerError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("GET {}?symbol={}", url, symbol);

        let response = self
            .http_client
            .get(&url)
            .query(&[("symbol", symbol)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(TickerError::Status(response.status().as_u16()));
        }
        Ok(response)
    }
}

fn parse_last_price(ticker: &TickerResponse) -> Result<Decimal, TickerError> {
    Decimal::from_str(ticker.last_price.trim())
        .map_err(|_| TickerError::InvalidPrice(ticker.last_price.clone()))
}

/// Prefer the PRICE_FILTER entry; fall back to the first filter carrying a tick size
fn select_tick_size(info: &ExchangeInfoResponse, symbol: &str) -> Result<String, TickerError> {
    let symbol_info = info
        .symbols
        .iter()
        .find(|s| s.symbol.eq_ignore_ascii_case(symbol))
        .or_else(|| info.symbols.first())
        .ok_or_else(|| TickerError::MissingTickSize(symbol.to_string()))?;

    symbol_info
        .filters
        .iter()
        .find(|f| f.filter_type == "PRICE_FILTER" && f.tick_size.is_some())
        .or_else(|| symbol_info.filters.iter().find(|f| f.tick_size.is_some()))
        .and_then(|f| f.tick_size.clone())
        .ok_or_else(|| TickerError::MissingTickSize(symbol.to_string()))
}

#[async_trait]
impl TickerApiClient for BinanceClient {
    async fn last_price(&self, symbol: &str) -> Result<Decimal, TickerError> {
        let ticker: TickerResponse = self.get("/api/v3/ticker/24hr", symbol).await?.json().await?;
        parse_last_price(&ticker)
    }

    async fn tick_size(&self, symbol: &str) -> Result<String, TickerError> {
        let info: ExchangeInfoResponse = self.get("/api/v3/exchangeInfo", symbol).await?.json().await?;
        select_tick_size(&info, symbol)
    }

    async fn raw_ticker(&self, symbol: &str) -> Result<serde_json::Value, TickerError> {
        Ok(self.get("/api/v3/ticker/24hr", symbol).await?.json().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    const EXCHANGE_INFO: &str = r#"{
        "timezone": "UTC",
        "symbols": [{
            "symbol": "BTCUSDT",
            "status": "TRADING",
            "filters": [
                {"filterType": "PRICE_FILTER", "minPrice": "0.01000000", "maxPrice": "1000000.00000000", "tickSize": "0.01000000"},
                {"filterType": "LOT_SIZE", "minQty": "0.00001000", "maxQty": "9000.00000000", "stepSize": "0.00001000"}
            ]
        }]
    }"#;

    #[test]
    fn test_parse_ticker() {
        let ticker: TickerResponse = serde_json::from_str(
            r#"{"symbol":"BTCUSDT","priceChange":"-94.99","lastPrice":"50000.12000000","volume":"1.0"}"#,
        )
        .unwrap();
        assert_eq!(parse_last_price(&ticker).unwrap(), dec!(50000.12));
    }

    #[test]
    fn test_parse_ticker_rejects_bad_price() {
        let ticker = TickerResponse { last_price: "n/a".to_string() };
        assert!(matches!(parse_last_price(&ticker), Err(TickerError::InvalidPrice(_))));
    }

    #[test]
    fn test_select_price_filter_tick_size() {
        let info: ExchangeInfoResponse = serde_json::from_str(EXCHANGE_INFO).unwrap();
        assert_eq!(select_tick_size(&info, "BTCUSDT").unwrap(), "0.01000000");
    }

    #[test]
    fn test_select_tick_size_when_price_filter_not_first() {
        let info: ExchangeInfoResponse = serde_json::from_str(
            r#"{"symbols":[{"symbol":"ETHUSDT","filters":[
                {"filterType":"LOT_SIZE","stepSize":"0.0001"},
                {"filterType":"PRICE_FILTER","tickSize":"0.10000000"}
            ]}]}"#,
        )
        .unwrap();
        assert_eq!(select_tick_size(&info, "ETHUSDT").unwrap(), "0.10000000");
    }

    #[test]
    fn test_select_tick_size_missing() {
        let info: ExchangeInfoResponse = serde_json::from_str(r#"{"symbols":[]}"#).unwrap();
        assert!(matches!(
            select_tick_size(&info, "BTCUSDT"),
            Err(TickerError::MissingTickSize(_))
        ));
    }

    #[test]
    fn test_base_url_trailing_slash() {
        let client = BinanceClient::new("https://api.binance.com/", Duration::from_secs(1)).unwrap();
        assert_eq!(client.base_url, "https://api.binance.com");
    }
}
