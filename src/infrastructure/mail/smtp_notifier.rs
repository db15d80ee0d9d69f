use async_trait::async_trait;
use lettre::message::{Mailbox, MultiPart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};
use tracing::info;

use super::{templates, Notifier};
use crate::config::SmtpSettings;
use crate::shared::errors::NotifyError;
use crate::shared::types::PriceAlert;

/// Sends alerts through a plain (non-TLS) authenticated SMTP relay
pub struct SmtpNotifier {
    settings: SmtpSettings,
    transport: AsyncSmtpTransport<Tokio1Executor>,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings) -> Self {
        let transport = AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(settings.host.as_str())
            .port(settings.port)
            .credentials(Credentials::new(
                settings.user.clone(),
                settings.password.clone(),
            ))
            .build();

        Self { settings, transport }
    }

    fn build_message(&self, subject: String, text: String, html: String) -> Result<Message, NotifyError> {
        let from: Mailbox = format!("\"{}\" <{}>", templates::SENDER_NAME, self.settings.user).parse()?;
        let to: Mailbox = self.settings.recipient.parse()?;

        Ok(Message::builder()
            .from(from)
            .to(to)
            .subject(subject)
            .multipart(MultiPart::alternative_plain_html(text, html))?)
    }

    async fn send(&self, message: Message) -> Result<(), NotifyError> {
        let response = self.transport.send(message).await?;
        info!("📧 Email sent: {}", response.code());
        Ok(())
    }

    /// One-off message used by the pre-flight check
    pub async fn send_test_email(&self, probe: &str) -> Result<(), NotifyError> {
        let message = self.build_message(
            "Test email".to_string(),
            templates::test_text(probe),
            templates::test_html(probe),
        )?;
        self.send(message).await
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn notify(&self, alert: &PriceAlert) -> Result<(), NotifyError> {
        let message = self.build_message(
            templates::alert_subject(alert),
            templates::alert_text(alert),
            templates::alert_html(alert),
        )?;
        self.send(message).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(recipient: &str) -> SmtpSettings {
        SmtpSettings {
            host: "localhost".to_string(),
            port: 2525,
            user: "robot@example.com".to_string(),
            password: "secret".to_string(),
            recipient: recipient.to_string(),
        }
    }

    #[tokio::test]
    async fn test_build_message_headers() {
        let notifier = SmtpNotifier::new(settings("me@example.com"));
        let message = notifier
            .build_message("BTC price update".to_string(), "text".to_string(), "<b>html</b>".to_string())
            .unwrap();

        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: BTC price update"));
        assert!(raw.contains("To: me@example.com"));
        assert!(raw.contains("RoboRate"));
        assert!(raw.contains("multipart/alternative"));
    }

    #[tokio::test]
    async fn test_invalid_recipient_is_reported() {
        let notifier = SmtpNotifier::new(settings("not an address"));
        let result = notifier.build_message("s".to_string(), "t".to_string(), "h".to_string());
        assert!(matches!(result, Err(NotifyError::Address(_))));
    }
}
