use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{DeductionCategory, TaxRequest};

/// One parsed row of a batch upload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchRow {
    pub total_income: Decimal,
    #[serde(rename = "wht")]
    pub withholding: Decimal,
    pub donation: Decimal,
}

impl BatchRow {
    pub fn new(
        total_income: Decimal,
        withholding: Decimal,
        donation: Decimal,
    ) -> Self {
        Self {
            total_income,
            withholding,
            donation,
        }
    }

    /// The equivalent single request: one synthesized donation allowance,
    /// nothing else.
    pub fn to_request(&self) -> TaxRequest {
        TaxRequest::new(self.total_income, self.withholding)
            .with_allowance(DeductionCategory::Donation.as_str(), self.donation)
    }
}

/// Per-row outcome of a batch calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchResult {
    #[serde(with = "rust_decimal::serde::float")]
    pub total_income: Decimal,

    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,

    #[serde(
        rename = "taxRefund",
        default,
        skip_serializing_if = "Option::is_none",
        with = "rust_decimal::serde::float_option"
    )]
    pub refund: Option<Decimal>,
}

/// A row the batch runner refused to calculate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RejectedRow {
    /// 1-based data row number (the header is row 0).
    pub row: usize,
    pub field: String,
    pub value: String,
}

/// Everything a batch run produced, in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchReport {
    #[serde(rename = "taxes")]
    pub results: Vec<BatchResult>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub rejected: Vec<RejectedRow>,
}
