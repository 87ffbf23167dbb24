pub mod batch;
pub mod calculations;
pub mod db;
pub mod limits;
pub mod models;

pub use batch::{BatchError, BatchTable, MalformedFieldPolicy, calculate_batch};
pub use calculations::calculate;
pub use db::repository::{DeductionLimitRepository, RepositoryError};
pub use limits::{LimitUpdate, LimitUpdateError, LimitValidationError, validate_limit_update};
pub use models::*;
