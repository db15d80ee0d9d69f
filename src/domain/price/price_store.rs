//! Price store interface

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::shared::errors::StoreError;

/// Append-only log of observed prices with derived daily extremes.
///
/// "Today" is evaluated by the storage engine's clock, not the caller's.
#[async_trait]
pub trait PriceRepository: Send + Sync {
    /// Create the price table if it does not exist. Never deletes rows.
    async fn ensure_schema(&self) -> Result<(), StoreError>;

    /// Delete every stored row, returning how many were removed
    async fn clear(&self) -> Result<u64, StoreError>;

    /// Append one sample inside its own transaction
    async fn insert_sample(&self, price: Decimal, asset: &str) -> Result<(), StoreError>;

    /// Append a sample only if `asset` has no row today. Returns whether a row was written.
    async fn insert_if_none_today(&self, price: Decimal, asset: &str) -> Result<bool, StoreError>;

    async fn highest_today(&self, asset: &str) -> Result<Option<Decimal>, StoreError>;

    async fn lowest_today(&self, asset: &str) -> Result<Option<Decimal>, StoreError>;

    async fn count_today(&self, asset: &str) -> Result<i64, StoreError>;
}
