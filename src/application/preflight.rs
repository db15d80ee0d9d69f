//! Pre-flight check: configuration report, ticker probe, test email.

use tracing::{error, info};

use crate::config::ValidationReport;
use crate::infrastructure::exchange::TickerApiClient;
use crate::infrastructure::mail::SmtpNotifier;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PreflightOutcome {
    pub config_ok: bool,
    pub ticker_ok: bool,
    /// `None` when no test email was attempted
    pub email_ok: Option<bool>,
}

impl PreflightOutcome {
    pub fn passed(&self) -> bool {
        self.config_ok && self.ticker_ok && self.email_ok.unwrap_or(false)
    }
}

/// Log the configuration report line by line
pub fn log_report(report: &ValidationReport) {
    for check in &report.checks {
        if check.is_ok() {
            info!("✅ {}", check);
        } else {
            error!("❌ {}", check);
        }
    }
}

/// Probe the ticker for `symbol` and, when `mailer` is set, send a test email
/// carrying the scraped last price.
pub async fn run_preflight(
    report: &ValidationReport,
    symbol: Option<&str>,
    ticker: &dyn TickerApiClient,
    mailer: Option<&SmtpNotifier>,
) -> PreflightOutcome {
    let mut outcome = PreflightOutcome {
        config_ok: report.is_ok(),
        ..Default::default()
    };
    log_report(report);

    let Some(symbol) = symbol else {
        return outcome;
    };

    let json = match ticker.raw_ticker(symbol).await {
        Ok(json) => json,
        Err(e) => {
            error!("❌ Request API URL error: {}", e);
            return outcome;
        }
    };
    info!("✅ API URL response: {}", json);
    outcome.ticker_ok = true;

    let Some(mailer) = mailer else {
        return outcome;
    };

    let probe = json
        .get("lastPrice")
        .and_then(|v| v.as_str())
        .unwrap_or("-")
        .to_string();

    match mailer.send_test_email(&probe).await {
        Ok(()) => {
            info!("✅ Test email sent");
            outcome.email_ok = Some(true);
        }
        Err(e) => {
            error!("❌ Error sending email: {}", e);
            outcome.email_ok = Some(false);
        }
    }

    outcome
}
