//! Alert delivery

pub mod smtp_notifier;
pub mod templates;

pub use smtp_notifier::SmtpNotifier;

use async_trait::async_trait;
use tracing::warn;

use crate::shared::errors::NotifyError;
use crate::shared::types::PriceAlert;

/// Best-effort alert sink. Callers log failures and move on.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn notify(&self, alert: &PriceAlert) -> Result<(), NotifyError>;
}

/// Stand-in when no mail transport is configured
pub struct LogNotifier;

#[async_trait]
impl Notifier for LogNotifier {
    async fn notify(&self, alert: &PriceAlert) -> Result<(), NotifyError> {
        warn!(
            "📭 Mail is not configured, alert not sent: {} {} ${} (was ${})",
            alert.asset, alert.direction, alert.price, alert.previous
        );
        Ok(())
    }
}
