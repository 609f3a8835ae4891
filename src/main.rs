use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tracing::info;

use user_api::api::routes::create_routes;
use user_api::config::{run_migrations, AppConfig, DatabaseConfig};
use user_api::repositories::PgUserRepository;
use user_api::services::UserService;
use user_api::telemetry::init_tracing;

#[tokio::main]
async fn main() -> Result<()> {
    if dotenvy::dotenv().is_err() {
        eprintln!("No .env file found, using system env vars");
    }

    let app_config = AppConfig::from_env()?;
    init_tracing(&app_config)?;

    if let Err(e) = run(app_config).await {
        tracing::error!(error = %format!("{:#}", e), "server terminated");
        return Err(e);
    }

    Ok(())
}

async fn run(app_config: AppConfig) -> Result<()> {
    let db_config = DatabaseConfig::from_env()?;

    let pool = db_config
        .create_pool()
        .await
        .context("database connection failed")?;
    run_migrations(&pool).await.context("database migration failed")?;

    let repository = Arc::new(PgUserRepository::new(pool, db_config.statement_timeout));
    let app = create_routes(UserService::new(repository));

    let address = app_config.server_address();
    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {}", address))?;
    info!(address = %address, environment = %app_config.environment, "server starting up");
    info!("Health check available at http://{}/health", address);

    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
