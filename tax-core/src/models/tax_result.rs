use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::BracketResult;

/// Outcome of a single calculation.
///
/// At most one of `tax` and `refund` is non-zero. `refund` is `None` (and
/// omitted from JSON) whenever nothing is owed back to the taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,

    #[serde(
        rename = "taxRefund",
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub refund: Option<Decimal>,

    #[serde(rename = "taxLevel")]
    pub brackets: Vec<BracketResult>,
}
