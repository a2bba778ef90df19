//! Careflow Web Server
//!
//! Run with: cargo run -p careflow-web

use tracing::info;
use tracing_subscriber::EnvFilter;

use careflow_common::CareflowConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CareflowConfig::load()?;

    // Initialise structured logging; RUST_LOG overrides the configured filter
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.filter)),
        )
        .init();

    info!("Starting Careflow Web Server...");
    info!("Version: {}", env!("CARGO_PKG_VERSION"));

    let addr = config.server.socket_addr()?;
    info!(
        max_sessions = config.sessions.max_sessions,
        max_age = config.intake.max_age,
        "configuration ready"
    );

    // Create app state
    let state = careflow_web::state::AppState::new(config);

    // Build router
    let app = careflow_web::router::build_router(state);

    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
