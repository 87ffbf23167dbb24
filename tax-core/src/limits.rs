//! Administrative updates to deduction limits.
//!
//! | Category    | Accepted range (inclusive) |
//! |-------------|----------------------------|
//! | `personal`  | 10,000 - 100,000           |
//! | `k-receipt` | 0 - 100,000                |
//! | `donation`  | 0 - 100,000                |
//! | other       | any value                  |

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal_macros::dec;
use serde::ser::{Serialize, SerializeMap, Serializer};
use thiserror::Error;
use tracing::{info, warn};

use crate::db::repository::{DeductionLimitRepository, RepositoryError};
use crate::models::DeductionCategory;

/// Inclusive range an administrator may set a limit to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LimitBounds {
    pub min: Decimal,
    pub max: Decimal,
}

impl LimitBounds {
    pub fn contains(
        &self,
        value: Decimal,
    ) -> bool {
        value >= self.min && value <= self.max
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LimitValidationError {
    #[error("amount for '{category}' must be between {} - {}", group_thousands(*min), group_thousands(*max))]
    OutOfRange {
        category: String,
        min: Decimal,
        max: Decimal,
        value: Decimal,
    },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum LimitUpdateError {
    #[error(transparent)]
    Validation(#[from] LimitValidationError),

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// A limit as stored after an update.
///
/// Serializes as a single-key object, e.g. `{"personalDeduction": 70000.0}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitUpdate {
    pub category: String,
    pub amount: Decimal,
}

impl LimitUpdate {
    pub fn response_key(&self) -> &str {
        DeductionCategory::parse(&self.category)
            .map(|c| c.response_key())
            .unwrap_or(self.category.as_str())
    }
}

impl Serialize for LimitUpdate {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(self.response_key(), &self.amount.to_f64())?;
        map.end()
    }
}

/// The accepted range for `category`, or `None` when it is unrestricted.
pub fn limit_bounds(category: &str) -> Option<LimitBounds> {
    match DeductionCategory::parse(category)? {
        DeductionCategory::Personal => Some(LimitBounds {
            min: dec!(10000),
            max: dec!(100000),
        }),
        DeductionCategory::KReceipt | DeductionCategory::Donation => Some(LimitBounds {
            min: dec!(0),
            max: dec!(100000),
        }),
    }
}

/// Checks a proposed limit and returns it unchanged when acceptable.
pub fn validate_limit_update(
    category: &str,
    proposed: Decimal,
) -> Result<Decimal, LimitValidationError> {
    match limit_bounds(category) {
        Some(bounds) if !bounds.contains(proposed) => Err(LimitValidationError::OutOfRange {
            category: category.to_string(),
            min: bounds.min,
            max: bounds.max,
            value: proposed,
        }),
        Some(_) => Ok(proposed),
        None => {
            warn!(category, %proposed, "no bounds for category, accepting as-is");
            Ok(proposed)
        }
    }
}

/// Validates `proposed`, then stores it. A rejected value never reaches the
/// repository.
pub async fn update_deduction_limit<R>(
    repo: &R,
    category: &str,
    proposed: Decimal,
) -> Result<LimitUpdate, LimitUpdateError>
where
    R: DeductionLimitRepository + ?Sized,
{
    let accepted = validate_limit_update(category, proposed)?;
    let amount = repo.set_limit(category, accepted).await?;

    info!(category, %amount, "deduction limit updated");

    Ok(LimitUpdate {
        category: category.to_string(),
        amount,
    })
}

/// Formats an amount with comma thousands separators, e.g. `100,000`.
fn group_thousands(value: Decimal) -> String {
    let text = value.normalize().to_string();
    let (sign, unsigned) = match text.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", text.as_str()),
    };
    let (int_part, frac_part) = match unsigned.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (unsigned, None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (idx, ch) in int_part.chars().enumerate() {
        if idx > 0 && (int_part.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    match frac_part {
        Some(frac) => format!("{sign}{grouped}.{frac}"),
        None => format!("{sign}{grouped}"),
    }
}
