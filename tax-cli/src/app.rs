use std::collections::BTreeMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use tax_core::batch::calculate_batch_with_policy;
use tax_core::db::{DbConfig, RepositoryRegistry};
use tax_core::limits::update_deduction_limit;
use tax_core::{
    BatchReport, DeductionLimitRepository, DeductionLimits, LimitUpdate, MalformedFieldPolicy,
    TaxRequest, TaxResult, calculate,
};
use tax_data::{BatchCsvLoader, load_request};
use tax_db_sqlite::SqliteRepositoryFactory;
use tracing::{debug, info};

use crate::cli::CalculateArgs;

/// Registry with every backend this binary ships.
pub fn build_registry() -> RepositoryRegistry {
    let mut registry = RepositoryRegistry::new();
    registry.register(Box::new(SqliteRepositoryFactory));
    registry
}

pub async fn open_repository(config: &DbConfig) -> Result<Box<dyn DeductionLimitRepository>> {
    debug!(backend = %config.backend, database = %config.connection_string, "opening database");
    build_registry()
        .create(config)
        .await
        .with_context(|| {
            format!(
                "cannot open {} database '{}'",
                config.backend, config.connection_string
            )
        })
}

/// Builds the request described by the `calculate` flags.
pub fn request_from_args(args: &CalculateArgs) -> Result<TaxRequest> {
    if let Some(path) = &args.file {
        let file = File::open(path)
            .with_context(|| format!("cannot open request file '{}'", path.display()))?;
        return load_request(file)
            .with_context(|| format!("cannot read request file '{}'", path.display()));
    }

    let income = args.income.context("--income is required without --file")?;
    let mut request = TaxRequest::new(income, args.wht.unwrap_or(Decimal::ZERO));
    if let Some(donation) = args.donation {
        request = request.with_allowance("donation", donation);
    }
    if let Some(k_receipt) = args.k_receipt {
        request = request.with_allowance("k-receipt", k_receipt);
    }
    request.validate()?;
    Ok(request)
}

pub async fn run_calculate<R>(
    repo: &R,
    request: &TaxRequest,
) -> Result<TaxResult>
where
    R: DeductionLimitRepository + ?Sized,
{
    let limits = repo.get_limits().await.context("cannot load deduction limits")?;
    let result = calculate(request, &limits);

    info!(tax = %result.tax, refund = ?result.refund, "calculated tax");
    Ok(result)
}

pub async fn run_batch<R, T>(
    repo: &R,
    reader: T,
    strict: bool,
) -> Result<BatchReport>
where
    R: DeductionLimitRepository + ?Sized,
    T: Read,
{
    let table = BatchCsvLoader::parse(reader)?;
    let limits = repo.get_limits().await.context("cannot load deduction limits")?;
    let policy = if strict {
        MalformedFieldPolicy::RejectRow
    } else {
        MalformedFieldPolicy::CoerceToZero
    };

    Ok(calculate_batch_with_policy(&table, &limits, policy)?)
}

pub async fn run_batch_file<R>(
    repo: &R,
    path: &Path,
    strict: bool,
) -> Result<BatchReport>
where
    R: DeductionLimitRepository + ?Sized,
{
    let file =
        File::open(path).with_context(|| format!("cannot open batch file '{}'", path.display()))?;
    run_batch(repo, file, strict)
        .await
        .with_context(|| format!("batch file '{}' rejected", path.display()))
}

pub async fn run_set_limit<R>(
    repo: &R,
    category: &str,
    amount: Decimal,
) -> Result<LimitUpdate>
where
    R: DeductionLimitRepository + ?Sized,
{
    Ok(update_deduction_limit(repo, category, amount).await?)
}

/// Stored limits as a plain `{category: amount}` JSON object.
pub async fn run_limits<R>(repo: &R) -> Result<BTreeMap<String, f64>>
where
    R: DeductionLimitRepository + ?Sized,
{
    let limits = repo.get_limits().await.context("cannot load deduction limits")?;
    Ok(limits_report(&limits))
}

fn limits_report(limits: &DeductionLimits) -> BTreeMap<String, f64> {
    limits
        .iter()
        .map(|(name, amount)| (name.to_string(), amount.to_f64().unwrap_or(0.0)))
        .collect()
}
