//! Gross income to taxable base.
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Total income |
//! | 2    | Personal allowance (fixed 60,000) |
//! | 3    | Donations claimed (sum of every `"donation"` allowance) |
//! | 4    | Donations allowed (line 3 capped at the donation limit) |
//! | 5    | Taxable income (line 1 - line 2 - line 4, may be negative) |
//!
//! Other allowance categories are accepted on the request but reduce
//! nothing. In particular `"k-receipt"` is a no-op even though the limit
//! store tracks a cap for it.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tracing::debug;

use crate::models::{Allowance, DeductionCategory, DeductionLimits};

/// Baseline reduction applied to every taxpayer.
///
/// Not read from [`DeductionLimits`]; the `"personal"` limit in the store is
/// currently write-only.
pub const PERSONAL_ALLOWANCE: Decimal = dec!(60000);

/// Donation cap used when the limits snapshot has no `"donation"` entry.
pub const DONATION_CEILING: Decimal = dec!(100000);

/// Sums every allowance whose category matches `category` exactly.
/// Saturates at `Decimal::MAX`/`Decimal::MIN` instead of overflowing.
pub fn sum_allowances(
    allowances: &[Allowance],
    category: DeductionCategory,
) -> Decimal {
    allowances
        .iter()
        .filter(|a| a.category == category.as_str())
        .fold(Decimal::ZERO, |acc, a| acc.saturating_add(a.amount))
}

/// Truncates `claimed` to `cap`. Never fails; excess is dropped silently.
pub fn cap_deduction(
    claimed: Decimal,
    cap: Decimal,
) -> Decimal {
    claimed.min(cap)
}

/// The donation cap in effect for `limits`.
pub fn donation_cap(limits: &DeductionLimits) -> Decimal {
    limits
        .get_category(DeductionCategory::Donation)
        .unwrap_or(DONATION_CEILING)
}

/// Converts gross income into the base fed to the bracket calculator.
pub fn resolve_taxable_income(
    total_income: Decimal,
    allowances: &[Allowance],
    limits: &DeductionLimits,
) -> Decimal {
    let claimed = sum_allowances(allowances, DeductionCategory::Donation);
    let allowed = cap_deduction(claimed, donation_cap(limits));
    let taxable = total_income
        .saturating_sub(PERSONAL_ALLOWANCE)
        .saturating_sub(allowed);

    debug!(
        %total_income,
        donation_claimed = %claimed,
        donation_allowed = %allowed,
        %taxable,
        "resolved taxable income"
    );

    taxable
}
