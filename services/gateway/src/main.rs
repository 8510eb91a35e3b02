use alerting::AlertService;
use alerting::audit::TracingAuditSink;
use alerting::store::Database;
use clap::Parser;
use gateway::auth::TokenVerifier;
use gateway::config::Config;
use gateway::logging::init_logging;
use gateway::router::create_router;
use gateway::state::AppState;
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    let config = Config::parse();
    config.validate()?;

    init_logging(config.log_level, config.log_format)?;

    tracing::info!("Starting threat monitoring API");

    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    let alerts = AlertService::new(db, Arc::new(TracingAuditSink));
    let state = AppState::new(alerts, TokenVerifier::new(config.jwt_secret.as_bytes()));

    let app = create_router(state);

    let listener = TcpListener::bind(config.listen_addr).await?;

    tracing::info!("Listening on {}", config.listen_addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
}
