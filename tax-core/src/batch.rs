//! Batch calculation over tabular input.
//!
//! Input arrives as raw string records (header plus data rows); parsing the
//! file itself is the loader's job. The runner checks the table's shape once,
//! parses each row, and calculates every row independently with the same
//! limits snapshot. Output order always matches input order.
//!
//! ```csv
//! totalIncome,wht,donation
//! 500000.0,0.0,0.0
//! 600000.0,40000.0,20000.0
//! 750000.0,50000.0,15000.0
//! ```

use rust_decimal::Decimal;
use thiserror::Error;
use tracing::{info, warn};

use crate::calculations::{TaxCalculator, format_net_tax};
use crate::models::{BatchReport, BatchResult, BatchRow, DeductionLimits, RejectedRow};

/// Column names a batch header must contain, in this order.
pub const BATCH_HEADER: [&str; 3] = ["totalIncome", "wht", "donation"];

/// Whole-batch failures. No row is calculated when one of these is returned.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchError {
    #[error(
        "Invalid file format. The CSV file must have a header row with 'totalIncome', 'wht' and 'donation'"
    )]
    InvalidHeader { found: Vec<String> },

    #[error("Invalid file format. The CSV file must contain at least one data row")]
    NoRows,

    #[error("Invalid file format. Row {row} has {found} fields, expected {expected}")]
    FieldCount {
        row: usize,
        expected: usize,
        found: usize,
    },
}

/// What to do with a field that does not parse as a number.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MalformedFieldPolicy {
    /// Treat the field as zero and keep going.
    #[default]
    CoerceToZero,
    /// Skip the row and report it in [`BatchReport::rejected`].
    RejectRow,
}

/// Header and records exactly as read from the source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchTable {
    pub header: Vec<String>,
    pub records: Vec<Vec<String>>,
}

impl BatchTable {
    pub fn new(
        header: Vec<String>,
        records: Vec<Vec<String>>,
    ) -> Self {
        Self { header, records }
    }

    /// Checks header names, header order, record arity, and that at least
    /// one data row exists.
    pub fn validate(&self) -> Result<(), BatchError> {
        let header_matches = self.header.len() == BATCH_HEADER.len()
            && self
                .header
                .iter()
                .zip(BATCH_HEADER)
                .all(|(found, expected)| found.trim() == expected);
        if !header_matches {
            return Err(BatchError::InvalidHeader {
                found: self.header.clone(),
            });
        }

        if self.records.is_empty() {
            return Err(BatchError::NoRows);
        }

        if let Some((idx, record)) = self
            .records
            .iter()
            .enumerate()
            .find(|(_, record)| record.len() != BATCH_HEADER.len())
        {
            return Err(BatchError::FieldCount {
                row: idx + 1,
                expected: BATCH_HEADER.len(),
                found: record.len(),
            });
        }

        Ok(())
    }
}

/// Parses a numeric cell. Accepts plain and scientific notation; surrounding
/// whitespace is ignored. Digit-group separators (`1_000`) are malformed.
fn parse_amount(raw: &str) -> Option<Decimal> {
    let trimmed = raw.trim();
    if trimmed.contains('_') {
        return None;
    }
    trimmed
        .parse::<Decimal>()
        .ok()
        .or_else(|| Decimal::from_scientific(trimmed).ok())
}

/// Parses one record into a [`BatchRow`].
///
/// `row` is the 1-based data row number used in logs and rejections. The
/// record must already have exactly three fields.
pub fn parse_row(
    record: &[String],
    row: usize,
    policy: MalformedFieldPolicy,
) -> Result<BatchRow, RejectedRow> {
    let mut values = [Decimal::ZERO; 3];

    for ((slot, raw), field) in values.iter_mut().zip(record).zip(BATCH_HEADER) {
        match parse_amount(raw) {
            Some(value) => *slot = value,
            None => match policy {
                MalformedFieldPolicy::CoerceToZero => {
                    warn!(row, field, value = %raw, "malformed number treated as zero");
                }
                MalformedFieldPolicy::RejectRow => {
                    return Err(RejectedRow {
                        row,
                        field: field.to_string(),
                        value: raw.clone(),
                    });
                }
            },
        }
    }

    let [total_income, withholding, donation] = values;
    Ok(BatchRow::new(total_income, withholding, donation))
}

/// Calculates every row independently and returns results in row order.
pub fn run_batch(
    rows: &[BatchRow],
    limits: &DeductionLimits,
) -> Vec<BatchResult> {
    let calculator = TaxCalculator::thai(limits);

    rows.iter()
        .map(|row| {
            let assessment = calculator.assess(&row.to_request());
            let settlement = format_net_tax(assessment.net_tax);
            BatchResult {
                total_income: row.total_income,
                tax: settlement.tax,
                refund: settlement.refund,
            }
        })
        .collect()
}

/// Validates `table`, then parses and calculates each row under `policy`.
///
/// # Errors
///
/// Returns [`BatchError`] if the header is wrong, there are no data rows, or
/// a record has the wrong number of fields. Malformed numbers are never a
/// whole-batch failure.
pub fn calculate_batch_with_policy(
    table: &BatchTable,
    limits: &DeductionLimits,
    policy: MalformedFieldPolicy,
) -> Result<BatchReport, BatchError> {
    table.validate()?;

    let mut rows = Vec::with_capacity(table.records.len());
    let mut rejected = Vec::new();

    for (idx, record) in table.records.iter().enumerate() {
        match parse_row(record, idx + 1, policy) {
            Ok(row) => rows.push(row),
            Err(rejection) => {
                warn!(
                    row = rejection.row,
                    field = %rejection.field,
                    value = %rejection.value,
                    "rejected batch row"
                );
                rejected.push(rejection);
            }
        }
    }

    let results = run_batch(&rows, limits);

    info!(
        rows = table.records.len(),
        calculated = results.len(),
        rejected = rejected.len(),
        "batch calculated"
    );

    Ok(BatchReport { results, rejected })
}

/// Validates and calculates `table`, treating malformed numbers as zero.
pub fn calculate_batch(
    table: &BatchTable,
    limits: &DeductionLimits,
) -> Result<Vec<BatchResult>, BatchError> {
    calculate_batch_with_policy(table, limits, MalformedFieldPolicy::CoerceToZero)
        .map(|report| report.results)
}
