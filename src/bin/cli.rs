use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use trivia_api::db::{self, transfer};
use trivia_api::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Database path
    db_path: PathBuf,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Replace all categories and questions with the CSV files in a directory
    Import { path: PathBuf },
    /// Write all categories and questions as CSV files into a directory
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let url = format!("sqlite:{}", cli.db_path.display());
    let pool = db::establish_connection(&url)
        .await
        .context("Cannot connect to DB")?;
    db::run_migrations(&pool).await?;

    match cli.command {
        Commands::Export { path } => transfer::export_data(&pool, &path)
            .await
            .context("Cannot export")?,
        Commands::Import { path } => transfer::import_data(&pool, &path)
            .await
            .context("Cannot import")?,
    }
    Ok(())
}
