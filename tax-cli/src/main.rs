use anyhow::Result;
use clap::Parser;
use serde::Serialize;
use tracing::debug;

use tax_cli::app;
use tax_cli::cli::{Cli, Command};
use tax_cli::logging;

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init_logging(cli.log_level.as_deref(), cli.log_file.as_deref())?;

    let db_config = cli.db_config();
    debug!(?db_config, "starting");

    // Validate flag input before touching the database.
    let request = match &cli.command {
        Command::Calculate(args) => Some(app::request_from_args(args)?),
        _ => None,
    };

    let repo = app::open_repository(&db_config).await?;

    match cli.command {
        Command::Calculate(_) => {
            if let Some(request) = request {
                print_json(&app::run_calculate(&*repo, &request).await?)?;
            }
        }
        Command::Batch { file, strict } => {
            print_json(&app::run_batch_file(&*repo, &file, strict).await?)?;
        }
        Command::SetLimit { category, amount } => {
            print_json(&app::run_set_limit(&*repo, &category, amount).await?)?;
        }
        Command::Limits => {
            print_json(&app::run_limits(&*repo).await?)?;
        }
    }

    Ok(())
}
