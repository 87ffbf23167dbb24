use std::io::Read;

use tax_core::BatchTable;
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when reading a batch file.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BatchLoadError {
    #[error("CSV parse error: {0}")]
    CsvParse(String),
}

impl From<csv::Error> for BatchLoadError {
    fn from(err: csv::Error) -> Self {
        BatchLoadError::CsvParse(err.to_string())
    }
}

/// Reads batch CSV files into raw [`BatchTable`]s.
///
/// The first record becomes the header. No numeric parsing happens here and
/// rows of any width are accepted; the batch runner decides what is valid.
///
/// ```csv
/// totalIncome,wht,donation
/// 500000.0,0.0,0.0
/// ```
pub struct BatchCsvLoader;

impl BatchCsvLoader {
    /// Parse a batch table from any reader, such as a file or a byte slice.
    pub fn parse<R: Read>(reader: R) -> Result<BatchTable, BatchLoadError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let mut rows = Vec::new();
        for result in csv_reader.records() {
            let record = result?;
            rows.push(record.iter().map(str::to_string).collect::<Vec<_>>());
        }

        let mut rows = rows.into_iter();
        let header = rows.next().unwrap_or_default();
        let records: Vec<_> = rows.collect();

        debug!(columns = header.len(), rows = records.len(), "read batch csv");
        Ok(BatchTable::new(header, records))
    }
}
