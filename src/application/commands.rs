//! CLI commands and handlers
use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::app::{self, AppCfg};
use crate::config::Config;

#[derive(Parser, Debug)]
#[command(name = "pricewatch")]
#[command(version, about = "Exchange price watcher with daily high/low email alerts")]
pub struct Cli {
    #[command(flatten)]
    pub overrides: Overrides,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// CLI overrides, applied on top of config file and environment
#[derive(Args, Debug, Default)]
pub struct Overrides {
    /// Path to config file (defaults to Config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Coin to track (overrides COIN)
    #[arg(long, global = true)]
    pub coin: Option<String>,

    /// Poll delay in milliseconds (overrides REQUEST_DELAY)
    #[arg(long, global = true)]
    pub request_delay: Option<u64>,

    /// SQLite database file (overrides DATABASE_PATH)
    #[arg(long, global = true)]
    pub database: Option<String>,
}

impl Overrides {
    pub fn apply(&self, cfg: &mut Config) {
        if let Some(coin) = &self.coin {
            cfg.ticker.coin = Some(coin.clone());
        }
        if let Some(delay) = self.request_delay {
            cfg.ticker.request_delay_ms = Some(delay);
        }
        if let Some(database) = &self.database {
            cfg.store.path = Some(database.clone());
        }
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Poll the ticker and send alerts (default)
    Run {
        /// Delete all stored prices before starting
        #[arg(long)]
        reset: bool,
    },

    /// Validate settings, probe the ticker API and send a test email
    Check,

    /// Delete all stored prices and exit
    Reset,
}

pub struct CommandExecutor;

impl CommandExecutor {
    /// Execute the selected command
    pub async fn execute(cli: Cli) -> Result<()> {
        let mut cfg = Config::load(cli.overrides.config.as_deref());
        cli.overrides.apply(&mut cfg);
        let app_cfg = AppCfg::from_config(&cfg);

        match cli.command.unwrap_or(Commands::Run { reset: false }) {
            Commands::Run { reset } => app::run(&cfg, app_cfg, reset).await,
            Commands::Check => {
                info!("🧪 Running pre-flight check...");
                if app::check(&cfg, &app_cfg).await? {
                    info!("✅ All checks passed");
                    Ok(())
                } else {
                    bail!("pre-flight check failed")
                }
            }
            Commands::Reset => app::reset(&app_cfg).await,
        }
    }
}
