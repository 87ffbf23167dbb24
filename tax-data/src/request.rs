use std::io::Read;

use tax_core::{RequestError, TaxRequest};
use thiserror::Error;

/// Errors that can occur when reading a single calculation request.
#[derive(Debug, Error)]
pub enum RequestLoadError {
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("Invalid request: {0}")]
    Invalid(#[from] RequestError),
}

/// Read a JSON tax request and check it at the boundary.
///
/// ```json
/// {"totalIncome": 500000.0, "wht": 0.0,
///  "allowances": [{"allowanceType": "donation", "amount": 200000.0}]}
/// ```
pub fn load_request<R: Read>(reader: R) -> Result<TaxRequest, RequestLoadError> {
    let request: TaxRequest = serde_json::from_reader(reader)?;
    request.validate()?;
    Ok(request)
}
