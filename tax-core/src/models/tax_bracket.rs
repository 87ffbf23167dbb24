use std::borrow::Cow;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// How much taxable income a bracket absorbs before the next one starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BracketWidth {
    Bounded(Decimal),
    /// Absorbs everything that is left. Only valid for the final bracket.
    Unbounded,
}

/// One tier of a progressive schedule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketSpec {
    pub label: Cow<'static, str>,
    pub width: BracketWidth,
    /// Marginal rate as a fraction, e.g. `0.10` for 10%.
    pub rate: Decimal,
}

impl BracketSpec {
    pub const fn new(
        label: &'static str,
        width: BracketWidth,
        rate: Decimal,
    ) -> Self {
        Self {
            label: Cow::Borrowed(label),
            width,
            rate,
        }
    }
}

/// Tax attributed to a single bracket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BracketResult {
    #[serde(rename = "level")]
    pub label: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub tax: Decimal,
}

impl BracketResult {
    pub fn new(
        spec: &BracketSpec,
        tax: Decimal,
    ) -> Self {
        Self {
            label: spec.label.to_string(),
            tax,
        }
    }

    pub fn zero(spec: &BracketSpec) -> Self {
        Self::new(spec, Decimal::ZERO)
    }
}
