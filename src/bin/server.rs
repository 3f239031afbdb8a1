use anyhow::Context;
use trivia_api::config::Settings;
use trivia_api::db;
use trivia_api::server::app::run_server;
use trivia_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::load().context("Failed to load settings")?;
    init_tracing();
    tracing::info!(
        address = %settings.address(),
        database = %settings.database_url,
        "Loaded settings"
    );

    let pool = db::establish_connection(&settings.database_url)
        .await
        .context("Cannot connect to DB")?;

    tracing::info!("Running db migrations...");
    db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    run_server(pool, settings).await
}
