//! Single-taxpayer calculation pipeline.
//!
//! ```text
//! total income, allowances, limits ─► taxable income
//! taxable income, brackets         ─► total tax + per-bracket breakdown
//! total tax - withholding          ─► net tax ─► (tax, refund)
//! ```
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::TaxCalculator;
//! use tax_core::{DeductionLimits, TaxRequest};
//!
//! let limits = DeductionLimits::seeded();
//! let request = TaxRequest::new(dec!(500000), dec!(0)).with_allowance("donation", dec!(200000));
//!
//! let result = TaxCalculator::thai(&limits).calculate(&request);
//!
//! assert_eq!(result.tax, dec!(19000));
//! assert_eq!(result.refund, None);
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::progressive::{BracketBreakdown, BracketTable};
use crate::calculations::settlement::format_net_tax;
use crate::calculations::taxable_income::resolve_taxable_income;
use crate::models::{DeductionLimits, TaxRequest, TaxResult};

/// Intermediate values of one calculation, before formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaxAssessment {
    pub taxable_income: Decimal,
    pub breakdown: BracketBreakdown,
    /// `total_tax - withholding`; negative when withholding exceeds the tax.
    pub net_tax: Decimal,
}

/// Runs the calculation pipeline against one bracket table and one limits
/// snapshot. Holds no state of its own; cheap to build per request.
#[derive(Debug, Clone, Copy)]
pub struct TaxCalculator<'a> {
    brackets: BracketTable<'a>,
    limits: &'a DeductionLimits,
}

impl<'a> TaxCalculator<'a> {
    pub fn new(
        brackets: BracketTable<'a>,
        limits: &'a DeductionLimits,
    ) -> Self {
        Self { brackets, limits }
    }

    /// Calculator using the Thai schedule.
    pub fn thai(limits: &'a DeductionLimits) -> Self {
        Self::new(BracketTable::thai(), limits)
    }

    /// Runs every step and keeps the intermediate values.
    pub fn assess(
        &self,
        request: &TaxRequest,
    ) -> TaxAssessment {
        let taxable_income =
            resolve_taxable_income(request.total_income, &request.allowances, self.limits);
        let breakdown = self.brackets.compute_tax(taxable_income);
        let net_tax = breakdown.total_tax.saturating_sub(request.withholding);

        debug!(
            total_tax = %breakdown.total_tax,
            withholding = %request.withholding,
            %net_tax,
            "assessed request"
        );

        TaxAssessment {
            taxable_income,
            breakdown,
            net_tax,
        }
    }

    /// Calculates tax, refund, and the per-bracket breakdown for `request`.
    pub fn calculate(
        &self,
        request: &TaxRequest,
    ) -> TaxResult {
        let assessment = self.assess(request);
        let settlement = format_net_tax(assessment.net_tax);

        TaxResult {
            tax: settlement.tax,
            refund: settlement.refund,
            brackets: assessment.breakdown.brackets,
        }
    }
}

/// Calculates `request` with the Thai schedule and the given limits.
pub fn calculate(
    request: &TaxRequest,
    limits: &DeductionLimits,
) -> TaxResult {
    TaxCalculator::thai(limits).calculate(request)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;
    use crate::models::BracketResult;

    fn levels(amounts: [Decimal; 5]) -> Vec<BracketResult> {
        let labels = [
            "0-150,000",
            "150,001-500,000",
            "500,001-1,000,000",
            "1,000,001-2,000,000",
            "2,000,001 ขึ้นไป",
        ];
        labels
            .iter()
            .zip(amounts)
            .map(|(label, tax)| BracketResult {
                label: label.to_string(),
                tax,
            })
            .collect()
    }

    fn run(request: TaxRequest) -> TaxResult {
        calculate(&request, &DeductionLimits::seeded())
    }

    fn income(total_income: Decimal) -> TaxRequest {
        TaxRequest::new(total_income, Decimal::ZERO)
    }

    fn huge() -> Decimal {
        Decimal::from_scientific("5e28").unwrap()
    }

    // =========================================================================
    // assess tests
    // =========================================================================

    #[test]
    fn assess_exposes_intermediate_values() {
        let limits = DeductionLimits::seeded();
        let request = TaxRequest::new(dec!(500000), dec!(30000));

        let assessment = TaxCalculator::thai(&limits).assess(&request);

        assert_eq!(assessment.taxable_income, dec!(440000));
        assert_eq!(assessment.breakdown.total_tax, dec!(29000));
        assert_eq!(assessment.net_tax, dec!(-1000));
    }

    #[test]
    fn assess_negative_taxable_income_still_credits_withholding() {
        let limits = DeductionLimits::seeded();
        let request = TaxRequest::new(dec!(10000), dec!(500));

        let assessment = TaxCalculator::thai(&limits).assess(&request);

        assert_eq!(assessment.taxable_income, dec!(-50000));
        assert_eq!(assessment.breakdown.total_tax, Decimal::ZERO);
        assert_eq!(assessment.net_tax, dec!(-500));
    }

    // =========================================================================
    // calculate tests: income only
    // =========================================================================

    #[test]
    fn calculate_income_at_personal_allowance() {
        let result = run(income(dec!(60000)));

        assert_eq!(result.tax, dec!(0));
        assert_eq!(result.refund, None);
        assert_eq!(result.brackets, levels([dec!(0); 5]));
    }

    #[test]
    fn calculate_income_500k() {
        let result = run(income(dec!(500000)));

        assert_eq!(result.tax, dec!(29000));
        assert_eq!(
            result.brackets,
            levels([dec!(0), dec!(29000), dec!(0), dec!(0), dec!(0)])
        );
    }

    #[test]
    fn calculate_income_560k() {
        let result = run(income(dec!(560000)));

        assert_eq!(result.tax, dec!(35000));
        assert_eq!(
            result.brackets,
            levels([dec!(0), dec!(35000), dec!(0), dec!(0), dec!(0)])
        );
    }

    #[test]
    fn calculate_income_1_060k() {
        let result = run(income(dec!(1060000)));

        assert_eq!(result.tax, dec!(110000));
        assert_eq!(
            result.brackets,
            levels([dec!(0), dec!(35000), dec!(75000), dec!(0), dec!(0)])
        );
    }

    #[test]
    fn calculate_income_2_060k() {
        let result = run(income(dec!(2060000)));

        assert_eq!(result.tax, dec!(310000));
        assert_eq!(
            result.brackets,
            levels([dec!(0), dec!(35000), dec!(75000), dec!(200000), dec!(0)])
        );
    }

    #[test]
    fn calculate_income_just_into_top_bracket() {
        let result = run(income(dec!(2060001)));

        assert_eq!(result.tax, dec!(310000.35));
        assert_eq!(
            result.brackets,
            levels([dec!(0), dec!(35000), dec!(75000), dec!(200000), dec!(0.35)])
        );
    }

    #[test]
    fn calculate_income_below_personal_allowance() {
        let result = run(income(dec!(1000)));

        assert_eq!(result.tax, dec!(0));
        assert_eq!(result.refund, None);
        assert_eq!(result.brackets, levels([dec!(0); 5]));
    }

    // =========================================================================
    // calculate tests: withholding
    // =========================================================================

    #[test]
    fn calculate_withholding_without_tax_is_refunded() {
        let result = run(TaxRequest::new(dec!(150000), dec!(1000)));

        assert_eq!(result.tax, dec!(0));
        assert_eq!(result.refund, Some(dec!(1000)));
        assert_eq!(result.brackets, levels([dec!(0); 5]));
    }

    #[test]
    fn calculate_partial_withholding_reduces_tax() {
        let result = run(TaxRequest::new(dec!(500000), dec!(25000)));

        assert_eq!(result.tax, dec!(4000));
        assert_eq!(result.refund, None);
    }

    #[test]
    fn calculate_exact_withholding_leaves_nothing() {
        let result = run(TaxRequest::new(dec!(500000), dec!(29000)));

        assert_eq!(result.tax, dec!(0));
        assert_eq!(result.refund, None);
    }

    #[test]
    fn calculate_excess_withholding_keeps_bracket_breakdown() {
        let result = run(TaxRequest::new(dec!(500000), dec!(30000)));

        assert_eq!(result.tax, dec!(0));
        assert_eq!(result.refund, Some(dec!(1000)));
        assert_eq!(
            result.brackets,
            levels([dec!(0), dec!(29000), dec!(0), dec!(0), dec!(0)])
        );
    }

    // =========================================================================
    // calculate tests: allowances
    // =========================================================================

    #[test]
    fn calculate_donation_above_cap_is_truncated() {
        let result = run(income(dec!(500000)).with_allowance("donation", dec!(200000)));

        assert_eq!(result.tax, dec!(19000));
        assert_eq!(
            result.brackets,
            levels([dec!(0), dec!(19000), dec!(0), dec!(0), dec!(0)])
        );
    }

    #[test]
    fn calculate_donation_at_cap() {
        let result = run(income(dec!(500000)).with_allowance("donation", dec!(100000)));

        assert_eq!(result.tax, dec!(19000));
    }

    #[test]
    fn calculate_donation_below_cap() {
        let result = run(income(dec!(500000)).with_allowance("donation", dec!(50000)));

        assert_eq!(result.tax, dec!(24000));
        assert_eq!(
            result.brackets,
            levels([dec!(0), dec!(24000), dec!(0), dec!(0), dec!(0)])
        );
    }

    #[test]
    fn calculate_donation_cap_defaults_without_limits() {
        let request = income(dec!(500000)).with_allowance("donation", dec!(200000));

        let result = calculate(&request, &DeductionLimits::new());

        assert_eq!(result.tax, dec!(19000));
    }

    #[test]
    fn calculate_k_receipt_has_no_effect() {
        // k-receipt is accepted on requests but not applied to taxable income.
        for k_receipt in [dec!(49999), dec!(50000), dec!(200000)] {
            let result = run(income(dec!(500000))
                .with_allowance("k-receipt", k_receipt)
                .with_allowance("donation", dec!(100000)));

            assert_eq!(result.tax, dec!(19000), "k-receipt {k_receipt}");
        }
    }

    #[test]
    fn calculate_huge_allowances_do_not_overflow() {
        let request = income(dec!(500000))
            .with_allowance("donation", huge())
            .with_allowance("donation", huge());
        assert_eq!(request.validate(), Ok(()));

        let result = run(request);

        assert_eq!(result.tax, dec!(19000));
        assert_eq!(result.refund, None);
    }

    #[test]
    fn calculate_extreme_withholding_saturates_refund() {
        let result = run(TaxRequest::new(Decimal::MIN, Decimal::MAX));

        assert_eq!(result.tax, dec!(0));
        assert_eq!(result.refund, Some(Decimal::MAX));
        assert_eq!(result.brackets, levels([dec!(0); 5]));
    }

    #[test]
    fn calculate_unknown_allowance_is_ignored() {
        let result = run(income(dec!(500000)).with_allowance("spouse", dec!(60000)));

        assert_eq!(result.tax, dec!(29000));
    }

    // =========================================================================
    // custom tables
    // =========================================================================

    #[test]
    fn calculate_with_custom_table() {
        use crate::models::{BracketSpec, BracketWidth};

        let specs = [
            BracketSpec::new("low", BracketWidth::Bounded(dec!(100)), dec!(0)),
            BracketSpec::new("high", BracketWidth::Unbounded, dec!(0.5)),
        ];
        let limits = DeductionLimits::new();
        let calculator = TaxCalculator::new(BracketTable::new(&specs).unwrap(), &limits);

        let result = calculator.calculate(&income(dec!(60300)));

        assert_eq!(result.tax, dec!(100));
        assert_eq!(result.brackets.len(), 2);
    }
}
