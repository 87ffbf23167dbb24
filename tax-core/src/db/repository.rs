use async_trait::async_trait;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::models::DeductionLimits;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RepositoryError {
    #[error("Record not found")]
    NotFound,

    #[error("Database error: {0}")]
    Database(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

/// Persistent store of deduction limits keyed by category name.
#[async_trait]
pub trait DeductionLimitRepository: Send + Sync {
    /// Every stored limit.
    async fn get_limits(&self) -> Result<DeductionLimits, RepositoryError>;

    /// One stored limit; [`RepositoryError::NotFound`] when the category has
    /// never been set.
    async fn get_limit(
        &self,
        category: &str,
    ) -> Result<Decimal, RepositoryError>;

    /// Insert or replace the limit for `category` and return the stored
    /// value.
    async fn set_limit(
        &self,
        category: &str,
        amount: Decimal,
    ) -> Result<Decimal, RepositoryError>;
}
