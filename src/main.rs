//! crewreg-gateway server entry point.
//!
//! Starts the Axum HTTP server with REST and WebSocket endpoints.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::routing::get;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use crewreg_gateway::api;
use crewreg_gateway::app_state::AppState;
use crewreg_gateway::assets::{AssetStore, FsAssetStore, MemoryAssetStore};
use crewreg_gateway::config::GatewayConfig;
use crewreg_gateway::domain::{EventRegistry, ViewNotifier};
use crewreg_gateway::persistence::PostgresArchive;
use crewreg_gateway::service::{
    AcceptanceService, EligibilityService, ExportService, RegistrationService, RequirementService,
};
use crewreg_gateway::ws::handler::ws_handler;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting crewreg-gateway");

    // Build domain layer
    let registry = Arc::new(EventRegistry::new());
    let notifier = ViewNotifier::new(config.notifier_capacity);

    let assets: Arc<dyn AssetStore> = match &config.asset_store_dir {
        Some(dir) => Arc::new(FsAssetStore::new(dir.clone(), config.asset_base_url.clone())),
        None => {
            tracing::warn!("ASSET_STORE_DIR not set, using in-memory asset store");
            Arc::new(MemoryAssetStore::new())
        }
    };

    let archive = if config.persistence_enabled {
        let archive = PostgresArchive::connect(&config).await?;
        tracing::info!("postgres archive connected");
        Some(archive)
    } else {
        None
    };

    // Build service layer
    let upload_timeout = Duration::from_secs(config.asset_upload_timeout_secs);
    let eligibility = Arc::new(EligibilityService::new(Arc::clone(&registry)));
    let registration = Arc::new(RegistrationService::new(
        Arc::clone(&registry),
        Arc::clone(&assets),
        notifier.clone(),
        archive.clone(),
        upload_timeout,
    ));
    let acceptance = Arc::new(AcceptanceService::new(
        Arc::clone(&registry),
        notifier.clone(),
        archive.clone(),
    ));
    let requirements = Arc::new(RequirementService::new(
        Arc::clone(&registry),
        notifier.clone(),
        archive.clone(),
    ));
    let export = Arc::new(ExportService::new(Arc::clone(&registry)));

    // Build application state
    let app_state = AppState {
        registry,
        eligibility,
        registration,
        acceptance,
        requirements,
        export,
        notifier,
        archive,
    };

    // Build router
    let app = Router::new()
        .merge(api::build_router())
        .route("/ws", get(ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
