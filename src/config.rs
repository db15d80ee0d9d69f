//! Settings loaded from `Config.toml`, overridden by environment variables.
//!
//! Every field is optional here. Missing or malformed values are reported by
//! [`Config::validate`] and filled with defaults by `AppCfg::from_config`.
//! Nothing in this module stops the process.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use std::{fs, path::Path};

use crate::infrastructure::storage::DayBoundary;
use tracing::warn;

use crate::shared::errors::ConfigError;
use crate::shared::utils::non_blank;

pub const DEFAULT_CONFIG_FILE: &str = "Config.toml";

/// Report key used when the config file itself cannot be read
pub const CONFIG_FILE_KEY: &str = "CONFIG_FILE";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TickerCfg {
    pub coin: Option<String>,
    pub quote: Option<String>,
    pub base_url: Option<String>,
    pub request_delay_ms: Option<u64>,
    pub timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ThresholdsCfg {
    pub price_change_up: Option<Decimal>,
    pub price_change_down: Option<Decimal>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct StoreCfg {
    pub path: Option<String>,
    pub day_boundary: Option<DayBoundary>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SmtpCfg {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub recipient: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub ticker: TickerCfg,
    pub thresholds: ThresholdsCfg,
    pub store: StoreCfg,
    pub smtp: SmtpCfg,

    /// Settings that were present but unparsable, as `(key, raw value)`
    #[serde(skip)]
    pub invalid: Vec<(&'static str, String)>,
}

/// Complete mail transport settings
#[derive(Clone, PartialEq, Eq)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: String,
    pub recipient: String,
}

impl fmt::Debug for SmtpSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpSettings")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"***")
            .field("recipient", &self.recipient)
            .finish()
    }
}

/// One line of the startup configuration report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Check {
    Present(&'static str),
    Missing(&'static str),
    Invalid { key: &'static str, value: String },
    NoThreshold,
}

impl Check {
    pub fn is_ok(&self) -> bool {
        matches!(self, Check::Present(_))
    }
}

impl fmt::Display for Check {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Check::Present(key) => write!(f, "{} presents", key),
            Check::Missing(key) => write!(f, "No setting {} in environment or config file", key),
            Check::Invalid { key, value } => {
                write!(f, "Setting {} has invalid value {:?}, ignoring it", key, value)
            }
            Check::NoThreshold => f.write_str(
                "Neither PRICE_CHANGE_UP, nor PRICE_CHANGE_DOWN is set. Need to set at least one of them.",
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationReport {
    pub checks: Vec<Check>,
}

impl ValidationReport {
    pub fn is_ok(&self) -> bool {
        self.checks.iter().all(Check::is_ok)
    }

    pub fn failures(&self) -> impl Iterator<Item = &Check> {
        self.checks.iter().filter(|c| !c.is_ok())
    }
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let s = fs::read_to_string(path.as_ref())?;
        let cfg: Self = toml::from_str(&s)?;
        Ok(cfg)
    }

    /// Read `path` (or `Config.toml` when present), then apply process environment overrides.
    /// An unreadable file is recorded in the report and treated as empty.
    pub fn load(path: Option<&Path>) -> Self {
        let file = match path {
            Some(path) => Some(path),
            None => Some(Path::new(DEFAULT_CONFIG_FILE)).filter(|p| p.exists()),
        };

        let mut cfg = match file.map(|p| (p, Self::from_file(p))) {
            Some((_, Ok(cfg))) => cfg,
            Some((p, Err(e))) => {
                warn!("⚠️ Ignoring config file {}: {}", p.display(), e);
                let mut cfg = Self::default();
                cfg.invalid
                    .push((CONFIG_FILE_KEY, format!("{}: {}", p.display(), e)));
                cfg
            }
            None => Self::default(),
        };
        cfg.apply_env(|key| std::env::var(key).ok());
        cfg
    }

    /// Parse a raw setting, recording it as invalid (and unset) when it does not parse
    fn parse_setting<T: FromStr>(&mut self, key: &'static str, value: String) -> Option<T> {
        match value.parse() {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                self.invalid.push((key, value));
                None
            }
        }
    }

    /// Overlay non-blank values found through `lookup`
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| non_blank(lookup(key));

        if let Some(v) = get("COIN") {
            self.ticker.coin = Some(v);
        }
        if let Some(v) = get("QUOTE_ASSET") {
            self.ticker.quote = Some(v);
        }
        if let Some(v) = get("API_BASE_URL") {
            self.ticker.base_url = Some(v);
        }
        if let Some(v) = get("REQUEST_DELAY") {
            self.ticker.request_delay_ms = self.parse_setting("REQUEST_DELAY", v);
        }
        if let Some(v) = get("REQUEST_TIMEOUT") {
            self.ticker.timeout_ms = self.parse_setting("REQUEST_TIMEOUT", v);
        }
        if let Some(v) = get("PRICE_CHANGE_UP") {
            self.thresholds.price_change_up = self.parse_setting("PRICE_CHANGE_UP", v);
        }
        if let Some(v) = get("PRICE_CHANGE_DOWN") {
            self.thresholds.price_change_down = self.parse_setting("PRICE_CHANGE_DOWN", v);
        }
        if let Some(v) = get("DATABASE_PATH") {
            self.store.path = Some(v);
        }
        if let Some(v) = get("DAY_BOUNDARY") {
            self.store.day_boundary = self.parse_setting("DAY_BOUNDARY", v);
        }
        if let Some(v) = get("SMTP_HOST") {
            self.smtp.host = Some(v);
        }
        if let Some(v) = get("SMTP_PORT") {
            self.smtp.port = self.parse_setting("SMTP_PORT", v);
        }
        if let Some(v) = get("SMTP_USER") {
            self.smtp.user = Some(v);
        }
        if let Some(v) = get("SMTP_PASSWORD") {
            self.smtp.password = Some(v);
        }
        if let Some(v) = get("EMAIL_RECIPIENT") {
            self.smtp.recipient = Some(v);
        }
    }

    fn coin(&self) -> Option<String> {
        non_blank(self.ticker.coin.clone())
    }

    /// Mail settings, only when every field is present
    pub fn smtp_settings(&self) -> Option<SmtpSettings> {
        Some(SmtpSettings {
            host: non_blank(self.smtp.host.clone())?,
            port: self.smtp.port?,
            user: non_blank(self.smtp.user.clone())?,
            password: non_blank(self.smtp.password.clone())?,
            recipient: non_blank(self.smtp.recipient.clone())?,
        })
    }

    pub fn validate(&self) -> ValidationReport {
        let mut checks = Vec::new();
        let mut reported = Vec::new();
        let mut check = |key: &'static str, present: bool| {
            let invalid = self.invalid.iter().find(|(k, _)| *k == key);
            checks.push(match (present, invalid) {
                (true, _) => Check::Present(key),
                (false, Some((_, value))) => {
                    reported.push(key);
                    Check::Invalid { key, value: value.clone() }
                }
                (false, None) => Check::Missing(key),
            });
        };

        check("COIN", self.coin().is_some());

        let up = self.thresholds.price_change_up.is_some();
        let down = self.thresholds.price_change_down.is_some();
        if up {
            check("PRICE_CHANGE_UP", true);
        }
        if down {
            check("PRICE_CHANGE_DOWN", true);
        }

        check("REQUEST_DELAY", self.ticker.request_delay_ms.is_some());
        check("EMAIL_RECIPIENT", non_blank(self.smtp.recipient.clone()).is_some());
        check("SMTP_HOST", non_blank(self.smtp.host.clone()).is_some());
        check("SMTP_PORT", self.smtp.port.is_some());
        check("SMTP_USER", non_blank(self.smtp.user.clone()).is_some());
        check("SMTP_PASSWORD", non_blank(self.smtp.password.clone()).is_some());

        if !up && !down {
            checks.insert(1, Check::NoThreshold);
        }

        for (key, value) in &self.invalid {
            if !reported.contains(key) {
                checks.push(Check::Invalid {
                    key: *key,
                    value: value.clone(),
                });
            }
        }

        ValidationReport { checks }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    const FILE: &str = r#"
        [ticker]
        coin = "ETH"
        request_delay_ms = 5000

        [thresholds]
        price_change_up = "25.5"

        [store]
        path = "prices.sqlite"
        day_boundary = "utc"

        [smtp]
        host = "smtp.example.com"
        port = 587
    "#;

    #[test]
    fn test_parse_file() {
        let cfg: Config = toml::from_str(FILE).unwrap();
        assert_eq!(cfg.ticker.coin.as_deref(), Some("ETH"));
        assert_eq!(cfg.ticker.request_delay_ms, Some(5000));
        assert_eq!(cfg.thresholds.price_change_up, Some(dec!(25.5)));
        assert_eq!(cfg.thresholds.price_change_down, None);
        assert_eq!(cfg.store.day_boundary, Some(DayBoundary::Utc));
        assert_eq!(cfg.smtp.port, Some(587));
    }

    #[test]
    fn test_env_overrides_file() {
        let mut cfg: Config = toml::from_str(FILE).unwrap();
        cfg.apply_env(env(&[
            ("COIN", "BTC"),
            ("REQUEST_DELAY", "1000"),
            ("PRICE_CHANGE_DOWN", "50"),
        ]));

        assert_eq!(cfg.ticker.coin.as_deref(), Some("BTC"));
        assert_eq!(cfg.ticker.request_delay_ms, Some(1000));
        assert_eq!(cfg.thresholds.price_change_up, Some(dec!(25.5)));
        assert_eq!(cfg.thresholds.price_change_down, Some(dec!(50)));
    }

    #[test]
    fn test_blank_env_is_unset() {
        let mut cfg: Config = toml::from_str(FILE).unwrap();
        cfg.apply_env(env(&[("COIN", ""), ("PRICE_CHANGE_UP", "  ")]));
        assert_eq!(cfg.ticker.coin.as_deref(), Some("ETH"));
        assert_eq!(cfg.thresholds.price_change_up, Some(dec!(25.5)));
    }

    #[test]
    fn test_invalid_env_value_is_reported_and_unset() {
        let mut cfg: Config = toml::from_str(FILE).unwrap();
        cfg.apply_env(env(&[
            ("SMTP_PORT", "twenty-five"),
            ("REQUEST_DELAY", "x"),
            ("PRICE_CHANGE_UP", "abc"),
        ]));

        assert_eq!(cfg.smtp.port, None);
        assert_eq!(cfg.ticker.request_delay_ms, None);
        assert_eq!(cfg.thresholds.price_change_up, None);

        let report = cfg.validate();
        assert!(!report.is_ok());
        assert!(report.checks.contains(&Check::Invalid {
            key: "SMTP_PORT",
            value: "twenty-five".to_string()
        }));
        assert!(report.checks.contains(&Check::Invalid {
            key: "REQUEST_DELAY",
            value: "x".to_string()
        }));
        assert!(report.checks.contains(&Check::Invalid {
            key: "PRICE_CHANGE_UP",
            value: "abc".to_string()
        }));
        assert!(report.checks.contains(&Check::NoThreshold));
        assert!(!report.checks.contains(&Check::Missing("SMTP_PORT")));
    }

    #[test]
    fn test_unreadable_config_file_is_reported() {
        let path = std::env::temp_dir().join("pricewatch-no-such-config.toml");
        let cfg = Config::load(Some(&path));

        let report = cfg.validate();
        assert!(report
            .failures()
            .any(|c| matches!(c, Check::Invalid { key: CONFIG_FILE_KEY, .. })));
    }

    #[test]
    fn test_smtp_settings_require_every_field() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "25"),
            ("SMTP_USER", "robot@example.com"),
            ("SMTP_PASSWORD", "secret"),
        ]));
        assert!(cfg.smtp_settings().is_none());

        cfg.apply_env(env(&[("EMAIL_RECIPIENT", "me@example.com")]));
        let smtp = cfg.smtp_settings().unwrap();
        assert_eq!(smtp.port, 25);
        assert!(!format!("{:?}", smtp).contains("secret"));
    }

    #[test]
    fn test_validate_reports_missing_keys() {
        let report = Config::default().validate();
        assert!(!report.is_ok());
        assert_eq!(report.checks[0], Check::Missing("COIN"));
        assert_eq!(report.checks[1], Check::NoThreshold);
        assert_eq!(report.failures().count(), report.checks.len());
    }

    #[test]
    fn test_validate_complete_config() {
        let mut cfg = Config::default();
        cfg.apply_env(env(&[
            ("COIN", "BTC"),
            ("PRICE_CHANGE_UP", "100"),
            ("REQUEST_DELAY", "10000"),
            ("EMAIL_RECIPIENT", "me@example.com"),
            ("SMTP_HOST", "smtp.example.com"),
            ("SMTP_PORT", "25"),
            ("SMTP_USER", "robot@example.com"),
            ("SMTP_PASSWORD", "secret"),
        ]));

        let report = cfg.validate();
        assert!(report.is_ok());
        assert!(report.checks.contains(&Check::Present("PRICE_CHANGE_UP")));
        assert!(!report.checks.contains(&Check::Present("PRICE_CHANGE_DOWN")));
    }
}
