// src/app.rs
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

use crate::application::preflight::{log_report, run_preflight};
use crate::application::price_watcher::{PriceWatcher, WatcherCfg};
use crate::config::{Config, SmtpSettings};
use crate::domain::price::PriceRepository;
use crate::infrastructure::exchange::binance_client::DEFAULT_BASE_URL;
use crate::infrastructure::exchange::BinanceClient;
use crate::infrastructure::mail::{LogNotifier, Notifier, SmtpNotifier};
use crate::infrastructure::storage::{DayBoundary, SqlitePriceStore};
use crate::shared::types::Thresholds;
use crate::shared::utils::{non_blank, trading_pair};

pub const DEFAULT_COIN: &str = "BTC";
pub const DEFAULT_QUOTE: &str = "USDT";
pub const DEFAULT_REQUEST_DELAY_MS: u64 = 10_000;
pub const DEFAULT_TIMEOUT_MS: u64 = 10_000;
pub const DEFAULT_DATABASE: &str = "database.sqlite";

/// Resolved runtime configuration, built once at startup
#[derive(Debug, Clone)]
pub struct AppCfg {
    pub coin: String,
    pub quote: String,
    pub base_url: String,
    pub request_delay: Duration,
    pub request_timeout: Duration,
    pub thresholds: Thresholds,
    pub database_path: PathBuf,
    pub day_boundary: DayBoundary,
    pub smtp: Option<SmtpSettings>,
}

impl AppCfg {
    /// Fill unset values with defaults. Missing settings were already reported by `Config::validate`.
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            coin: non_blank(cfg.ticker.coin.clone())
                .unwrap_or_else(|| DEFAULT_COIN.to_string())
                .to_uppercase(),
            quote: non_blank(cfg.ticker.quote.clone())
                .unwrap_or_else(|| DEFAULT_QUOTE.to_string())
                .to_uppercase(),
            base_url: non_blank(cfg.ticker.base_url.clone())
                .unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_delay: Duration::from_millis(
                cfg.ticker.request_delay_ms.unwrap_or(DEFAULT_REQUEST_DELAY_MS),
            ),
            request_timeout: Duration::from_millis(cfg.ticker.timeout_ms.unwrap_or(DEFAULT_TIMEOUT_MS)),
            thresholds: Thresholds {
                up: cfg.thresholds.price_change_up,
                down: cfg.thresholds.price_change_down,
            },
            database_path: non_blank(cfg.store.path.clone())
                .unwrap_or_else(|| DEFAULT_DATABASE.to_string())
                .into(),
            day_boundary: cfg.store.day_boundary.unwrap_or_default(),
            smtp: cfg.smtp_settings(),
        }
    }

    pub fn symbol(&self) -> String {
        trading_pair(&self.coin, &self.quote)
    }

    pub fn watcher_cfg(&self) -> WatcherCfg {
        WatcherCfg {
            asset: self.coin.clone(),
            symbol: self.symbol(),
            request_delay: self.request_delay,
            thresholds: self.thresholds.clone(),
        }
    }

    fn ticker_client(&self) -> Result<BinanceClient> {
        BinanceClient::new(self.base_url.clone(), self.request_timeout).context("build HTTP client")
    }

    async fn open_store(&self) -> Result<SqlitePriceStore> {
        let store = SqlitePriceStore::open(&self.database_path, self.day_boundary)
            .await
            .with_context(|| format!("Error opening database {}", self.database_path.display()))?;
        store.ensure_schema().await.context("create prices table")?;
        Ok(store)
    }
}

/// Long-running watcher. Only a storage failure at startup is fatal.
pub async fn run(cfg: &Config, app_cfg: AppCfg, reset: bool) -> Result<()> {
    info!("Starting price watcher");
    info!("Configuration: {:?}", app_cfg);

    let report = cfg.validate();
    let problems = report.failures().count();
    if problems > 0 {
        warn!("⚠️ {} configuration problem(s), continuing with defaults", problems);
    }
    log_report(&report);

    let store = Arc::new(app_cfg.open_store().await?);
    if reset {
        let removed = store.clear().await.context("clear prices table")?;
        warn!("🧹 Cleared {} stored prices", removed);
    }

    let ticker = Arc::new(app_cfg.ticker_client()?);
    let notifier: Arc<dyn Notifier> = match &app_cfg.smtp {
        Some(smtp) => Arc::new(SmtpNotifier::new(smtp.clone())),
        None => {
            warn!("📭 SMTP settings are incomplete, alerts will only be logged");
            Arc::new(LogNotifier)
        }
    };

    let watcher = PriceWatcher::new(app_cfg.watcher_cfg(), ticker, store.clone(), notifier);
    watcher.run(shutdown_signal()).await;

    store.close().await;
    Ok(())
}

/// Explicit maintenance: delete every stored price
pub async fn reset(app_cfg: &AppCfg) -> Result<()> {
    let store = app_cfg.open_store().await?;
    let removed = store.clear().await.context("clear prices table")?;
    info!("🧹 Cleared {} stored prices from {}", removed, app_cfg.database_path.display());
    store.close().await;
    Ok(())
}

/// Pre-flight check. Returns whether everything passed.
pub async fn check(cfg: &Config, app_cfg: &AppCfg) -> Result<bool> {
    let report = cfg.validate();
    let ticker = app_cfg.ticker_client()?;
    let mailer = app_cfg.smtp.clone().map(SmtpNotifier::new);

    // without a configured coin there is nothing meaningful to probe
    let symbol = non_blank(cfg.ticker.coin.clone()).map(|_| app_cfg.symbol());

    let outcome = run_preflight(&report, symbol.as_deref(), &ticker, mailer.as_ref()).await;
    Ok(outcome.passed())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Received Ctrl-C, shutting down"),
        Err(e) => {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    }
}
