use std::path::Path;
use std::str::FromStr;

use anyhow::{Context, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use sqlx::Row;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use tax_core::{DeductionLimitRepository, DeductionLimits, RepositoryError};
use tracing::{debug, info};

use crate::decimal::{decimal_to_f64, get_decimal};

pub struct SqliteRepository {
    pool: SqlitePool,
}

impl SqliteRepository {
    /// Open `database_url`, creating the file when it does not exist.
    ///
    /// Accepts bare paths (`taxes.db`), sqlx URLs (`sqlite://taxes.db`) and
    /// `:memory:`.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .with_context(|| format!("Invalid database url: {}", database_url))?
            .create_if_missing(true);

        // Every in-memory connection would otherwise see its own database.
        let max_connections = if database_url.contains(":memory:") { 1 } else { 5 };

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to connect to database: {}", database_url))?;

        debug!(database_url, "connected to sqlite");
        Ok(Self { pool })
    }

    pub async fn new_with_pool(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .context("Failed to run database migrations")?;
        Ok(())
    }

    /// Execute every `.sql` file in `seeds_dir`, in filename order.
    pub async fn run_seeds(
        &self,
        seeds_dir: &Path,
    ) -> Result<()> {
        let mut entries: Vec<_> = std::fs::read_dir(seeds_dir)
            .with_context(|| format!("Failed to read seeds directory '{}'", seeds_dir.display()))?
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.path().extension().is_some_and(|ext| ext == "sql"))
            .collect();

        entries.sort_by_key(|entry| entry.file_name());

        for entry in entries {
            let path = entry.path();
            let sql = std::fs::read_to_string(&path)
                .with_context(|| format!("Failed to read seed file '{}'", path.display()))?;

            sqlx::raw_sql(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("Failed to execute seed file '{}'", path.display()))?;

            debug!(seed = %path.display(), "applied seed file");
        }

        Ok(())
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl DeductionLimitRepository for SqliteRepository {
    async fn get_limits(&self) -> Result<DeductionLimits, RepositoryError> {
        let rows = sqlx::query("SELECT name, max_amount FROM deductions ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?;

        rows.iter()
            .map(|row| {
                let name: String = row
                    .try_get("name")
                    .map_err(|e| RepositoryError::Database(e.to_string()))?;
                Ok::<_, RepositoryError>((name, get_decimal(row, "max_amount")?))
            })
            .collect()
    }

    async fn get_limit(
        &self,
        category: &str,
    ) -> Result<Decimal, RepositoryError> {
        let row = sqlx::query("SELECT max_amount FROM deductions WHERE name = ?")
            .bind(category)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepositoryError::Database(e.to_string()))?
            .ok_or(RepositoryError::NotFound)?;

        get_decimal(&row, "max_amount")
    }

    async fn set_limit(
        &self,
        category: &str,
        amount: Decimal,
    ) -> Result<Decimal, RepositoryError> {
        let row = sqlx::query(
            "INSERT INTO deductions (name, max_amount) VALUES (?, ?)
             ON CONFLICT(name) DO UPDATE
                 SET max_amount = excluded.max_amount,
                     updated_at = CURRENT_TIMESTAMP
             RETURNING max_amount",
        )
        .bind(category)
        .bind(decimal_to_f64(amount))
        .fetch_one(&self.pool)
        .await
        .map_err(|e| RepositoryError::Database(e.to_string()))?;

        let stored = get_decimal(&row, "max_amount")?;
        info!(category, %stored, "stored deduction limit");
        Ok(stored)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    fn seeds_path() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("seeds")
    }

    async fn setup_test_db() -> SqliteRepository {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("Failed to create in-memory database");

        let repo = SqliteRepository::new_with_pool(pool).await;
        repo.run_migrations()
            .await
            .expect("Failed to run migrations");
        repo
    }

    async fn setup_seeded_db() -> SqliteRepository {
        let repo = setup_test_db().await;
        repo.run_seeds(&seeds_path())
            .await
            .expect("Failed to run seeds");
        repo
    }

    // =========================================================================
    // migrations and seeds
    // =========================================================================

    #[tokio::test]
    async fn test_migrated_table_starts_empty() {
        let repo = setup_test_db().await;

        let limits = repo.get_limits().await.expect("Should list limits");

        assert!(limits.is_empty());
    }

    #[tokio::test]
    async fn test_seeds_load_default_limits() {
        let repo = setup_seeded_db().await;

        let limits = repo.get_limits().await.expect("Should list limits");

        assert_eq!(limits, DeductionLimits::seeded());
    }

    #[tokio::test]
    async fn test_reseeding_keeps_admin_changes() {
        let repo = setup_seeded_db().await;
        repo.set_limit("personal", dec!(70000))
            .await
            .expect("Should update limit");

        repo.run_seeds(&seeds_path())
            .await
            .expect("Failed to rerun seeds");

        assert_eq!(repo.get_limit("personal").await, Ok(dec!(70000)));
    }

    #[tokio::test]
    async fn test_run_seeds_missing_directory() {
        let repo = setup_test_db().await;

        let result = repo.run_seeds(Path::new("/nonexistent/seeds")).await;

        assert!(result.is_err());
    }

    // =========================================================================
    // get_limit
    // =========================================================================

    #[tokio::test]
    async fn test_get_limit_seeded_values() {
        let repo = setup_seeded_db().await;

        assert_eq!(repo.get_limit("personal").await, Ok(dec!(60000)));
        assert_eq!(repo.get_limit("k-receipt").await, Ok(dec!(50000)));
        assert_eq!(repo.get_limit("donation").await, Ok(dec!(100000)));
    }

    #[tokio::test]
    async fn test_get_limit_not_found() {
        let repo = setup_seeded_db().await;

        let result = repo.get_limit("spouse").await;

        assert_eq!(result, Err(RepositoryError::NotFound));
    }

    // =========================================================================
    // set_limit
    // =========================================================================

    #[tokio::test]
    async fn test_set_limit_updates_existing_row() {
        let repo = setup_seeded_db().await;

        let stored = repo
            .set_limit("k-receipt", dec!(80000))
            .await
            .expect("Should update limit");

        assert_eq!(stored, dec!(80000));
        assert_eq!(repo.get_limit("k-receipt").await, Ok(dec!(80000)));
        assert_eq!(repo.get_limits().await.map(|l| l.len()), Ok(3));
    }

    #[tokio::test]
    async fn test_set_limit_inserts_new_category() {
        let repo = setup_seeded_db().await;

        repo.set_limit("spouse", dec!(60000))
            .await
            .expect("Should insert limit");

        let limits = repo.get_limits().await.expect("Should list limits");
        assert_eq!(limits.len(), 4);
        assert_eq!(limits.get("spouse"), Some(dec!(60000)));
    }

    #[tokio::test]
    async fn test_set_limit_keeps_fraction() {
        let repo = setup_test_db().await;

        let stored = repo
            .set_limit("donation", dec!(12345.5))
            .await
            .expect("Should insert limit");

        assert_eq!(stored, dec!(12345.5));
    }

    #[tokio::test]
    async fn test_set_limit_refreshes_updated_at() {
        let repo = setup_seeded_db().await;
        sqlx::query("UPDATE deductions SET updated_at = '2000-01-01 00:00:00'")
            .execute(repo.pool())
            .await
            .expect("Failed to backdate rows");

        repo.set_limit("donation", dec!(90000))
            .await
            .expect("Should update limit");

        let row = sqlx::query("SELECT updated_at FROM deductions WHERE name = 'donation'")
            .fetch_one(repo.pool())
            .await
            .expect("Failed to fetch row");
        let updated_at: String = row.try_get("updated_at").expect("Should read updated_at");
        assert!(updated_at.as_str() > "2000-01-01 00:00:00");
    }

    // =========================================================================
    // new
    // =========================================================================

    #[tokio::test]
    async fn test_new_accepts_memory_url() {
        let repo = SqliteRepository::new(":memory:")
            .await
            .expect("Should open in-memory database");
        repo.run_migrations()
            .await
            .expect("Failed to run migrations");

        assert_eq!(repo.get_limit("personal").await, Err(RepositoryError::NotFound));
    }
}
