//! GreenSignal parcel monitor - backend server

use std::{net::SocketAddr, sync::Arc, time::Duration};

use greensignal_backend::{
    create_app,
    external::{HttpImageryClient, ImageryProvider, LinearYieldModel},
    services::{ParcelService, SeriesAssembler},
    AppState, Config,
};
use shared::DecisionEngine;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "gs_server=debug,greensignal_backend=debug,tower_http=debug".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load()?;

    tracing::info!("Starting GreenSignal Parcel Monitor");
    tracing::info!("Environment: {}", config.environment);

    let provider: Option<Arc<dyn ImageryProvider>> =
        match HttpImageryClient::from_config(&config.imagery)? {
            Some(client) => {
                tracing::info!(
                    "Imagery provider configured (timeout {:?})",
                    Duration::from_secs(config.imagery.timeout_secs)
                );
                Some(Arc::new(client))
            }
            None => {
                tracing::warn!("No imagery endpoint configured, series will be simulated");
                None
            }
        };

    // A broken model file disables yield prediction rather than the server
    let engine = match config.yield_model.path.as_deref() {
        Some(path) => match LinearYieldModel::load(path) {
            Ok(model) => {
                tracing::info!("Yield model loaded from {}", path);
                DecisionEngine::with_yield_model(Arc::new(model))
            }
            Err(e) => {
                tracing::warn!("Yield prediction disabled: {}", e);
                DecisionEngine::new()
            }
        },
        None => DecisionEngine::new(),
    };

    let assembler = SeriesAssembler::new(
        provider,
        config.series.clone(),
        config.imagery.scale_m,
    );

    // Create application state
    let state = AppState {
        config: Arc::new(config.clone()),
        parcels: ParcelService::new(assembler, engine),
    };

    // Build application
    let app = create_app(state);

    // Start server
    let host: std::net::IpAddr = config.server.host.parse()?;
    let addr = SocketAddr::from((host, config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
