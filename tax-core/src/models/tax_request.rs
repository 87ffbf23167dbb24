use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a request fails boundary validation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RequestError {
    #[error("totalIncome must not be negative (got {0})")]
    NegativeIncome(Decimal),

    #[error("wht must not be negative (got {0})")]
    NegativeWithholding(Decimal),

    #[error("allowance '{category}' must not be negative (got {amount})")]
    NegativeAllowance { category: String, amount: Decimal },
}

/// A single itemized allowance claimed by the taxpayer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Allowance {
    /// Free-form category name, e.g. `"donation"` or `"k-receipt"`.
    #[serde(rename = "allowanceType")]
    pub category: String,
    pub amount: Decimal,
}

impl Allowance {
    pub fn new(
        category: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            category: category.into(),
            amount,
        }
    }
}

/// One taxpayer's inputs for one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxRequest {
    pub total_income: Decimal,

    /// Tax already withheld at source.
    #[serde(rename = "wht", default)]
    pub withholding: Decimal,

    #[serde(default)]
    pub allowances: Vec<Allowance>,
}

impl TaxRequest {
    pub fn new(
        total_income: Decimal,
        withholding: Decimal,
    ) -> Self {
        Self {
            total_income,
            withholding,
            allowances: Vec::new(),
        }
    }

    pub fn with_allowance(
        mut self,
        category: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        self.allowances.push(Allowance::new(category, amount));
        self
    }

    /// Checks that every amount on the request is non-negative.
    ///
    /// The calculator itself accepts any value; this runs at the boundary,
    /// before a request reaches it.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.total_income < Decimal::ZERO {
            return Err(RequestError::NegativeIncome(self.total_income));
        }
        if self.withholding < Decimal::ZERO {
            return Err(RequestError::NegativeWithholding(self.withholding));
        }
        if let Some(bad) = self
            .allowances
            .iter()
            .find(|a| a.amount < Decimal::ZERO)
        {
            return Err(RequestError::NegativeAllowance {
                category: bad.category.clone(),
                amount: bad.amount,
            });
        }
        Ok(())
    }
}
