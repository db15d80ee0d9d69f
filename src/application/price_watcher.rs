//! Poll loop: fetch, store, detect, notify.

use rust_decimal::Decimal;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::domain::price::{is_new_high, is_new_low, PricePrecision, PriceRepository};
use crate::infrastructure::exchange::TickerApiClient;
use crate::infrastructure::mail::Notifier;
use crate::shared::types::{Direction, PriceAlert, PriceSample, Thresholds};
use crate::shared::utils::calculate_percentage_change;

/// Poll loop configuration
#[derive(Debug, Clone)]
pub struct WatcherCfg {
    /// Tracked coin, as stored in the `coin` column
    pub asset: String,
    /// Exchange symbol, e.g. `BTCUSDT`
    pub symbol: String,
    pub request_delay: Duration,
    pub thresholds: Thresholds,
}

/// Outcome of a single poll
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PollReport {
    /// Rounded sample, `None` when the fetch failed
    pub sample: Option<PriceSample>,
    /// Whether this poll wrote the first row of the day
    pub first_of_day: bool,
    pub alerts: Vec<PriceAlert>,
    /// Rows stored for the asset today, after this poll's writes
    pub stored_today: Option<i64>,
}

impl PollReport {
    pub fn price(&self) -> Option<Decimal> {
        self.sample.as_ref().map(|s| s.price)
    }
}

pub struct PriceWatcher {
    cfg: WatcherCfg,
    ticker: Arc<dyn TickerApiClient>,
    store: Arc<dyn PriceRepository>,
    notifier: Arc<dyn Notifier>,
}

impl PriceWatcher {
    pub fn new(
        cfg: WatcherCfg,
        ticker: Arc<dyn TickerApiClient>,
        store: Arc<dyn PriceRepository>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            cfg,
            ticker,
            store,
            notifier,
        }
    }

    /// Poll until `shutdown` resolves. Nothing inside the loop is fatal.
    pub async fn run<F>(&self, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        tokio::pin!(shutdown);

        if !self.cfg.thresholds.is_active() {
            warn!("⚠️ No price thresholds configured, alerts are disabled");
        }

        let precision = loop {
            match self.ticker.price_precision(&self.cfg.symbol).await {
                Ok(precision) => {
                    info!("🎯 {} price precision: {} digits", self.cfg.symbol, precision);
                    break precision;
                }
                Err(e) => error!("❌ Failed to resolve price precision for {}: {}", self.cfg.symbol, e),
            }

            tokio::select! {
                _ = &mut shutdown => return,
                _ = tokio::time::sleep(self.cfg.request_delay) => {}
            }
        };

        info!("🚀 Watching {} every {:?}", self.cfg.symbol, self.cfg.request_delay);

        loop {
            self.poll_once(precision).await;
            info!("---------------------------------------");

            tokio::select! {
                _ = &mut shutdown => break,
                _ = tokio::time::sleep(self.cfg.request_delay) => {}
            }
        }

        info!("🛑 Price watcher stopped");
    }

    /// One Polling step. Each sub-step logs its own failure and never aborts the others.
    pub async fn poll_once(&self, precision: PricePrecision) -> PollReport {
        let mut report = PollReport::default();
        let asset = self.cfg.asset.as_str();

        let price = match self.ticker.last_price(&self.cfg.symbol).await {
            Ok(price) => precision.round(price),
            Err(e) => {
                error!("❌ Error fetching {} price: {}", self.cfg.symbol, e);
                return report;
            }
        };
        report.sample = Some(PriceSample::new(price, asset));
        info!("💲 ${} {} current price", price, asset);

        match self.store.insert_if_none_today(price, asset).await {
            Ok(inserted) => report.first_of_day = inserted,
            Err(e) => error!("❌ Error storing first price of the day: {}", e),
        }

        if let Some(up) = self.cfg.thresholds.up {
            if let Some(alert) = self.check_extreme(Direction::High, price, precision, up).await {
                report.alerts.push(alert);
            }
        }

        if let Some(down) = self.cfg.thresholds.down {
            if let Some(alert) = self.check_extreme(Direction::Low, price, precision, down).await {
                report.alerts.push(alert);
            }
        }

        match self.store.count_today(asset).await {
            Ok(count) => {
                info!("🗂️ {} {} prices stored today", count, asset);
                report.stored_today = Some(count);
            }
            Err(e) => error!("❌ Error counting today's prices: {}", e),
        }

        report
    }

    async fn check_extreme(
        &self,
        direction: Direction,
        price: Decimal,
        precision: PricePrecision,
        threshold: Decimal,
    ) -> Option<PriceAlert> {
        let asset = self.cfg.asset.as_str();

        let recorded = match direction {
            Direction::High => self.store.highest_today(asset).await,
            Direction::Low => self.store.lowest_today(asset).await,
        }
        .unwrap_or_else(|e| {
            error!("❌ Error reading today's {} price: {}", direction, e);
            None
        });

        let crossed = match direction {
            Direction::High => is_new_high(price, recorded, precision, threshold),
            Direction::Low => is_new_low(price, recorded, precision, threshold),
        };

        let previous = match recorded {
            Some(previous) if crossed => previous,
            _ => {
                let shown = recorded.map_or_else(|| "-".to_string(), |p| format!("${}", p));
                info!("{} {} today the {} price", direction_icon(direction), shown, direction);
                return None;
            }
        };

        let alert = PriceAlert {
            asset: asset.to_string(),
            price,
            previous,
            direction,
        };

        if let Err(e) = self.notifier.notify(&alert).await {
            error!("❌ Error sending {} price notification: {}", direction, e);
        }

        info!(
            "🔔 Today the {} price update: ${} -> ${} ({}%)",
            direction,
            previous,
            price,
            calculate_percentage_change(previous, price)
        );

        if let Err(e) = self.store.insert_sample(price, asset).await {
            error!("❌ Error storing new {} price: {}", direction, e);
        }

        Some(alert)
    }
}

fn direction_icon(direction: Direction) -> &'static str {
    match direction {
        Direction::High => "📈",
        Direction::Low => "📉",
    }
}
