//! Tax calculation modules for Thai personal income tax.
//!
//! The pipeline runs leaf-first: [`taxable_income`] turns gross income into
//! a taxable base, [`progressive`] spreads that base across the bracket
//! table, and [`settlement`] turns the signed result into tax or refund.
//! [`income_tax`] wires the three together.

pub mod income_tax;
pub mod progressive;
pub mod settlement;
pub mod taxable_income;

pub use income_tax::{TaxAssessment, TaxCalculator, calculate};
pub use progressive::{BracketBreakdown, BracketTable, BracketTableError, THAI_BRACKETS};
pub use settlement::{Settlement, format_net_tax};
pub use taxable_income::{
    DONATION_CEILING, PERSONAL_ALLOWANCE, cap_deduction, donation_cap, resolve_taxable_income,
    sum_allowances,
};
