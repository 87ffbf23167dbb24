use std::collections::BTreeMap;

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use super::DeductionCategory;

/// Snapshot of the maximum deductible amount per category.
///
/// Read once from the limit store at the start of a calculation and passed
/// into the calculator by reference; the calculator never mutates it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeductionLimits {
    limits: BTreeMap<String, Decimal>,
}

impl DeductionLimits {
    /// An empty snapshot. Every lookup falls back to the calculator's ceilings.
    pub fn new() -> Self {
        Self::default()
    }

    /// The values the store is seeded with.
    pub fn seeded() -> Self {
        Self::new()
            .with_limit(DeductionCategory::Personal.as_str(), dec!(60000))
            .with_limit(DeductionCategory::KReceipt.as_str(), dec!(50000))
            .with_limit(DeductionCategory::Donation.as_str(), dec!(100000))
    }

    pub fn with_limit(
        mut self,
        category: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        self.insert(category, amount);
        self
    }

    /// Sets the limit for `category`, replacing any previous value.
    pub fn insert(
        &mut self,
        category: impl Into<String>,
        amount: Decimal,
    ) -> Option<Decimal> {
        self.limits.insert(category.into(), amount)
    }

    pub fn get(
        &self,
        category: &str,
    ) -> Option<Decimal> {
        self.limits.get(category).copied()
    }

    pub fn get_category(
        &self,
        category: DeductionCategory,
    ) -> Option<Decimal> {
        self.get(category.as_str())
    }

    /// Categories and limits in alphabetical order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.limits.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.limits.len()
    }

    pub fn is_empty(&self) -> bool {
        self.limits.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, Decimal)> for DeductionLimits {
    fn from_iter<I: IntoIterator<Item = (K, Decimal)>>(iter: I) -> Self {
        Self {
            limits: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn new_snapshot_is_empty() {
        let limits = DeductionLimits::new();

        assert!(limits.is_empty());
        assert_eq!(limits.get("donation"), None);
    }

    #[test]
    fn seeded_snapshot_has_three_categories() {
        let limits = DeductionLimits::seeded();

        assert_eq!(limits.len(), 3);
        assert_eq!(limits.get_category(DeductionCategory::Personal), Some(dec!(60000)));
        assert_eq!(limits.get_category(DeductionCategory::KReceipt), Some(dec!(50000)));
        assert_eq!(limits.get_category(DeductionCategory::Donation), Some(dec!(100000)));
    }

    #[test]
    fn insert_replaces_previous_value() {
        let mut limits = DeductionLimits::new().with_limit("donation", dec!(100000));

        let previous = limits.insert("donation", dec!(40000));

        assert_eq!(previous, Some(dec!(100000)));
        assert_eq!(limits.get("donation"), Some(dec!(40000)));
    }

    #[test]
    fn lookup_is_case_sensitive() {
        let limits = DeductionLimits::new().with_limit("donation", dec!(1));

        assert_eq!(limits.get("Donation"), None);
    }

    #[test]
    fn iter_is_alphabetical() {
        let limits: DeductionLimits = [("personal", dec!(1)), ("donation", dec!(2))]
            .into_iter()
            .collect();

        let names: Vec<_> = limits.iter().map(|(name, _)| name).collect();

        assert_eq!(names, vec!["donation", "personal"]);
    }
}
