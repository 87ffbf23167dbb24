//! Progressive bracket calculation.
//!
//! The Thai personal income tax schedule:
//!
//! | Level | Width | Rate |
//! |-------|-------|------|
//! | 0-150,000 | 150,000 | 0% |
//! | 150,001-500,000 | 350,000 | 10% |
//! | 500,001-1,000,000 | 500,000 | 15% |
//! | 1,000,001-2,000,000 | 1,000,000 | 20% |
//! | 2,000,001 ขึ้นไป | unbounded | 35% |
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::BracketTable;
//!
//! let breakdown = BracketTable::thai().compute_tax(dec!(2000001));
//!
//! assert_eq!(breakdown.total_tax, dec!(310000.35));
//! assert_eq!(breakdown.brackets[4].tax, dec!(0.35));
//! ```

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use thiserror::Error;
use tracing::debug;

use crate::models::{BracketResult, BracketSpec, BracketWidth};

/// The schedule every calculation uses unless a caller supplies another table.
pub static THAI_BRACKETS: [BracketSpec; 5] = [
    BracketSpec::new("0-150,000", BracketWidth::Bounded(dec!(150000)), dec!(0)),
    BracketSpec::new("150,001-500,000", BracketWidth::Bounded(dec!(350000)), dec!(0.10)),
    BracketSpec::new("500,001-1,000,000", BracketWidth::Bounded(dec!(500000)), dec!(0.15)),
    BracketSpec::new("1,000,001-2,000,000", BracketWidth::Bounded(dec!(1000000)), dec!(0.20)),
    BracketSpec::new("2,000,001 ขึ้นไป", BracketWidth::Unbounded, dec!(0.35)),
];

/// Reasons a set of brackets does not partition `[0, ∞)`.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BracketTableError {
    #[error("no tax brackets provided")]
    Empty,

    #[error("bracket '{0}' must have a positive width")]
    NonPositiveWidth(String),

    #[error("bracket '{0}' is unbounded but is not the last bracket")]
    UnboundedBeforeEnd(String),

    #[error("last bracket '{0}' must be unbounded")]
    BoundedTail(String),

    #[error("bracket '{label}' has rate {rate} outside [0, 1]")]
    RateOutOfRange { label: String, rate: Decimal },
}

/// Total tax and how it splits across brackets, before withholding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BracketBreakdown {
    pub total_tax: Decimal,
    /// One entry per bracket, in table order, zeros included.
    pub brackets: Vec<BracketResult>,
}

/// An ordered, validated bracket schedule.
#[derive(Debug, Clone, Copy)]
pub struct BracketTable<'a> {
    brackets: &'a [BracketSpec],
}

impl BracketTable<'static> {
    pub fn thai() -> Self {
        Self {
            brackets: &THAI_BRACKETS,
        }
    }
}

impl<'a> BracketTable<'a> {
    /// Wraps `brackets` after checking they cover `[0, ∞)` exactly once:
    /// every bracket but the last has a positive width, the last is
    /// unbounded, and every rate lies in `[0, 1]`.
    pub fn new(brackets: &'a [BracketSpec]) -> Result<Self, BracketTableError> {
        let (last, head) = brackets.split_last().ok_or(BracketTableError::Empty)?;

        for spec in brackets {
            if spec.rate < Decimal::ZERO || spec.rate > Decimal::ONE {
                return Err(BracketTableError::RateOutOfRange {
                    label: spec.label.to_string(),
                    rate: spec.rate,
                });
            }
        }

        for spec in head {
            match spec.width {
                BracketWidth::Unbounded => {
                    return Err(BracketTableError::UnboundedBeforeEnd(spec.label.to_string()));
                }
                BracketWidth::Bounded(width) if width <= Decimal::ZERO => {
                    return Err(BracketTableError::NonPositiveWidth(spec.label.to_string()));
                }
                BracketWidth::Bounded(_) => {}
            }
        }

        if let BracketWidth::Bounded(_) = last.width {
            return Err(BracketTableError::BoundedTail(last.label.to_string()));
        }

        Ok(Self { brackets })
    }

    /// Walks the brackets in order against `taxable_income`.
    ///
    /// A negative base yields zero in every bracket. Otherwise each bounded
    /// bracket the remainder strictly exceeds is taxed in full, and the first
    /// bracket the remainder fits in (or the unbounded tail) takes the rest.
    pub fn compute_tax(
        &self,
        taxable_income: Decimal,
    ) -> BracketBreakdown {
        let mut remaining = taxable_income;
        let mut total_tax = Decimal::ZERO;
        let mut brackets = Vec::with_capacity(self.brackets.len());

        for (idx, spec) in self.brackets.iter().enumerate() {
            if remaining < Decimal::ZERO {
                brackets.extend(self.brackets[idx..].iter().map(BracketResult::zero));
                break;
            }

            let tax = match spec.width {
                BracketWidth::Bounded(width) if remaining > width => {
                    remaining = remaining.saturating_sub(width);
                    width.saturating_mul(spec.rate)
                }
                _ => {
                    let tax = remaining.saturating_mul(spec.rate);
                    remaining = Decimal::ZERO;
                    tax
                }
            };

            total_tax = total_tax.saturating_add(tax);
            brackets.push(BracketResult::new(spec, tax));
        }

        debug!(%taxable_income, %total_tax, "computed bracket tax");

        BracketBreakdown {
            total_tax,
            brackets,
        }
    }
}
