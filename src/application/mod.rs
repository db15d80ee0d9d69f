//! Application layer - use cases and services

pub mod commands;
pub mod preflight;
pub mod price_watcher;

pub use commands::{Cli, Commands, CommandExecutor};
pub use price_watcher::{PollReport, PriceWatcher, WatcherCfg};
