//! Backend entry-point: serves the booking API, applies migrations, or seeds
//! demo accounts.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

mod server;

use actix_web::web;
use clap::{Parser, Subcommand};
use color_eyre::eyre::{Result, WrapErr};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use booking_backend::domain::seed::Seeder;
use booking_backend::inbound::http::health::HealthState;
use booking_backend::outbound::persistence::{DbPool, run_pending_migrations};

use server::{AppSettings, ServerConfig, TokenSettings, create_server, seed_adapters};

/// Doctor appointment booking service.
#[derive(Debug, Parser)]
#[command(name = "booking-backend", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Clone, Copy, Subcommand)]
enum Command {
    /// Run the HTTP server (default).
    Serve,
    /// Apply pending database migrations and exit.
    Migrate,
    /// Create the admin account and sample doctors, skipping existing ones.
    Seed,
}

#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let cli = Cli::parse();
    let settings = AppSettings::load_from_env()?;

    match cli.command.unwrap_or(Command::Serve) {
        Command::Serve => serve(settings).await,
        Command::Migrate => migrate(&settings).await,
        Command::Seed => seed(&settings).await,
    }
}

async fn migrate(settings: &AppSettings) -> Result<()> {
    let applied = run_pending_migrations(&settings.database_url())
        .await
        .wrap_err("migrate database")?;
    info!(applied, "migrations complete");
    Ok(())
}

async fn connect(settings: &AppSettings) -> Result<DbPool> {
    DbPool::new(settings.pool_config())
        .await
        .wrap_err("create database pool")
}

async fn seed(settings: &AppSettings) -> Result<()> {
    let pool = connect(settings).await?;
    let (users, hasher) = seed_adapters(&pool);
    let outcome = Seeder::new(users, hasher)
        .run()
        .await
        .wrap_err("seed demo accounts")?;
    info!(created = outcome.created, skipped = outcome.skipped, "seed complete");
    Ok(())
}

async fn serve(settings: AppSettings) -> Result<()> {
    if settings.auto_migrate() {
        migrate(&settings).await?;
    }
    let secret = settings.jwt_secret(cfg!(debug_assertions))?;
    let pool = connect(&settings).await?;
    let config = ServerConfig::new(
        settings.bind_addr()?,
        pool,
        TokenSettings::new(secret, settings.token_ttl()),
    )
    .with_request_timeout(settings.request_timeout());
    #[cfg(feature = "metrics")]
    let config = config.with_metrics(Some(server::prometheus_metrics()?));

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), config)?;
    let outcome = server.await;
    health_state.mark_unhealthy();
    outcome.wrap_err("HTTP server failed")
}
