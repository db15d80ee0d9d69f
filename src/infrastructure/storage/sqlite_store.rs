use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info, warn};

use super::DayBoundary;
use crate::domain::price::PriceRepository;
use crate::shared::errors::StoreError;

// NUMERIC keeps prices as REAL: exact up to 15 significant digits, which
// covers every quoted price at its tick precision.
const CREATE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS prices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        price NUMERIC NOT NULL,
        coin VARCHAR(255) NOT NULL
    )
"#;

const CREATE_INDEX: &str =
    "CREATE INDEX IF NOT EXISTS idx_prices_coin_created_at ON prices (coin, created_at)";

/// SQLite-backed price log
pub struct SqlitePriceStore {
    pool: SqlitePool,
    day_boundary: DayBoundary,
}

impl SqlitePriceStore {
    /// Open (creating if missing) the database file at `path`
    pub async fn open(path: impl AsRef<Path>, day_boundary: DayBoundary) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::new()
            .filename(path.as_ref())
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect_with(options)
            .await?;

        info!("🗄️ Opened price database at {}", path.as_ref().display());
        Ok(Self { pool, day_boundary })
    }

    /// Private in-memory database, mainly for tests and dry runs
    pub async fn in_memory(day_boundary: DayBoundary) -> Result<Self, StoreError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?;
        // every pooled connection to :memory: is a separate database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;
        Ok(Self { pool, day_boundary })
    }

    pub async fn close(&self) {
        self.pool.close().await;
        info!("Database connection closed.");
    }

    async fn extreme_today(&self, aggregate: &str, asset: &str) -> Result<Option<Decimal>, StoreError> {
        let query = format!(
            "SELECT CAST({}(price) AS TEXT) FROM prices WHERE coin = ? AND {}",
            aggregate,
            self.day_boundary.window_clause()
        );

        let value: Option<String> = sqlx::query_scalar(&query)
            .bind(asset)
            .fetch_one(&self.pool)
            .await?;

        value.as_deref().map(parse_stored_price).transpose()
    }
}

/// SQLite renders large or tiny REAL values in exponent form
fn parse_stored_price(raw: &str) -> Result<Decimal, StoreError> {
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map(|d| d.normalize())
        .map_err(|_| StoreError::InvalidPrice(raw.to_string()))
}

#[async_trait]
impl PriceRepository for SqlitePriceStore {
    async fn ensure_schema(&self) -> Result<(), StoreError> {
        sqlx::query(CREATE_TABLE).execute(&self.pool).await?;
        sqlx::query(CREATE_INDEX).execute(&self.pool).await?;
        debug!("Table \"prices\" is ready");
        Ok(())
    }

    async fn clear(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM prices").execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn insert_sample(&self, price: Decimal, asset: &str) -> Result<(), StoreError> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO prices (price, coin, created_at) VALUES (?, ?, datetime('now'))",
        )
        .bind(price.to_string())
        .bind(asset)
        .execute(&mut *tx)
        .await;

        if let Err(e) = inserted {
            warn!("Error inserting price: {}", e);
            if let Err(rollback_err) = tx.rollback().await {
                warn!("Rollback failed: {}", rollback_err);
            }
            return Err(e.into());
        }

        tx.commit().await?;
        Ok(())
    }

    async fn insert_if_none_today(&self, price: Decimal, asset: &str) -> Result<bool, StoreError> {
        let query = format!(
            "INSERT INTO prices (price, coin, created_at) \
             SELECT ?1, ?2, datetime('now') \
             WHERE NOT EXISTS (SELECT 1 FROM prices WHERE coin = ?2 AND {})",
            self.day_boundary.window_clause()
        );

        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(&query)
            .bind(price.to_string())
            .bind(asset)
            .execute(&mut *tx)
            .await;

        match inserted {
            Ok(result) => {
                tx.commit().await?;
                Ok(result.rows_affected() > 0)
            }
            Err(e) => {
                warn!("Error inserting first price of the day: {}", e);
                if let Err(rollback_err) = tx.rollback().await {
                    warn!("Rollback failed: {}", rollback_err);
                }
                Err(e.into())
            }
        }
    }

    async fn highest_today(&self, asset: &str) -> Result<Option<Decimal>, StoreError> {
        self.extreme_today("MAX", asset).await
    }

    async fn lowest_today(&self, asset: &str) -> Result<Option<Decimal>, StoreError> {
        self.extreme_today("MIN", asset).await
    }

    async fn count_today(&self, asset: &str) -> Result<i64, StoreError> {
        let query = format!(
            "SELECT COUNT(*) FROM prices WHERE coin = ? AND {}",
            self.day_boundary.window_clause()
        );
        let count: i64 = sqlx::query_scalar(&query)
            .bind(asset)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}
