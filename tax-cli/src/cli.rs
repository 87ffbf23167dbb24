use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use rust_decimal::Decimal;
use tax_core::db::DbConfig;

/// Thai personal income tax calculator.
///
/// Reads deduction limits from the configured database, calculates tax for
/// one taxpayer or a CSV batch, and prints JSON to stdout.
#[derive(Debug, Parser)]
#[command(name = "thai-tax", version)]
pub struct Cli {
    /// Database backend to use.
    #[arg(long, env = "TAX_DB_BACKEND", default_value = "sqlite", global = true)]
    pub backend: String,

    /// Database connection string.
    /// For SQLite this is a file path (e.g. `taxes.db`) or `:memory:`.
    #[arg(long, env = "DATABASE_URL", default_value = "taxes.db", global = true)]
    pub database: String,

    /// Log filter, e.g. `debug` or `info,tax_core=trace`. Defaults to
    /// `RUST_LOG`, then `info`.
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Also append log output to this file.
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    pub fn db_config(&self) -> DbConfig {
        DbConfig::new(&self.backend, &self.database)
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Calculate tax for one taxpayer.
    Calculate(CalculateArgs),

    /// Calculate tax for every row of a CSV file.
    Batch {
        /// CSV with a `totalIncome,wht,donation` header.
        file: PathBuf,

        /// Reject rows with non-numeric fields instead of reading them as 0.
        #[arg(long)]
        strict: bool,
    },

    /// Change a deduction limit.
    SetLimit {
        /// `personal`, `k-receipt`, `donation`, or any other category.
        category: String,

        #[arg(allow_negative_numbers = true)]
        amount: Decimal,
    },

    /// Print the stored deduction limits.
    Limits,
}

#[derive(Debug, Args)]
pub struct CalculateArgs {
    /// JSON request file. Replaces the amount flags.
    #[arg(long, conflicts_with_all = ["income", "wht", "donation", "k_receipt"])]
    pub file: Option<PathBuf>,

    /// Total income for the year.
    #[arg(long, required_unless_present = "file")]
    pub income: Option<Decimal>,

    /// Tax already withheld.
    #[arg(long)]
    pub wht: Option<Decimal>,

    /// Donation allowance claimed.
    #[arg(long)]
    pub donation: Option<Decimal>,

    /// k-receipt allowance claimed.
    #[arg(long)]
    pub k_receipt: Option<Decimal>,
}
