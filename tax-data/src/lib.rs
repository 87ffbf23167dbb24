//! Readers that turn files into the core's input types.

mod loader;
mod request;

pub use loader::{BatchCsvLoader, BatchLoadError};
pub use request::{RequestLoadError, load_request};
