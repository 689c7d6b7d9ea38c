// src/bin/api_server.rs

use criptopay_session::infra::config;
use criptopay_session::transport;
use criptopay_session::{
    FileKeyValueStore, HttpProvider, KeyValueStore, SessionConfig, WalletProvider, WalletSession,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let session_config = SessionConfig::from_env()?;
    info!(?session_config, "session configuration loaded");

    // --- Provider ---
    let provider: Option<Arc<dyn WalletProvider>> = match HttpProvider::from_env()? {
        Some(provider) => {
            let provider = Arc::new(provider);
            let every = config::provider_poll_interval()?;
            provider.spawn_change_watcher(every);
            let poll_ms = every.as_millis() as u64;
            info!(rpc_url = %provider.rpc_url(), poll_ms, "wallet provider ready");
            Some(provider as Arc<dyn WalletProvider>)
        }
        None => {
            warn!("CRIPTOPAY_RPC_URL is not set; running without a wallet provider");
            None
        }
    };

    // --- Flag store ---
    let state_file = config::state_file();
    info!(path = %state_file.display(), "using state file");
    let store: Arc<dyn KeyValueStore> = Arc::new(FileKeyValueStore::new(state_file));

    // --- Session (runs the start-up connection check) ---
    let session = WalletSession::start(provider, store, session_config).await;
    let snapshot = session.snapshot();
    info!(
        connected = snapshot.is_connected(),
        account = %snapshot.account(),
        network = %snapshot.network(),
        balance = %snapshot.balance(),
        "wallet session initialized"
    );

    // --- API Server Initialization ---
    let app_state = transport::http::AppState {
        session: session.clone(),
    };
    let cors = CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any);
    let app = transport::http::create_router(app_state)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", transport::http::ApiDoc::openapi()))
        .layer(cors);

    let bind_addr = config::bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    info!(addr = %bind_addr, "API server listening; Swagger UI at /swagger-ui");

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = tokio::signal::ctrl_c() => {
            info!("shutdown signal received");
        }
    }

    Ok(())
}
