mod batch;
mod deduction_category;
mod deduction_limits;
mod tax_bracket;
mod tax_request;
mod tax_result;

pub use batch::{BatchReport, BatchResult, BatchRow, RejectedRow};
pub use deduction_category::DeductionCategory;
pub use deduction_limits::DeductionLimits;
pub use tax_bracket::{BracketResult, BracketSpec, BracketWidth};
pub use tax_request::{Allowance, RequestError, TaxRequest};
pub use tax_result::TaxResult;
