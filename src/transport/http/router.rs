use crate::transport::http::handlers::{health, network, session, transfer};
use crate::transport::http::types::{
    ApiResponse, NetworkView, SessionView, SwitchNetworkRequest, TransferKindParam,
    ValidateTransferRequest,
};
use axum::routing::{get, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        session::get_session_handler,
        session::guard_handler,
        session::connect_handler,
        session::disconnect_handler,
        session::reconnect_handler,
        session::refresh_balance_handler,
        session::switch_network_handler,
        network::list_networks_handler,
        network::resolve_network_handler,
        transfer::validate_transfer_handler
    ),
    components(schemas(
        ApiResponse,
        SessionView,
        NetworkView,
        SwitchNetworkRequest,
        TransferKindParam,
        ValidateTransferRequest
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: crate::transport::http::types::AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/session", get(session::get_session_handler))
        .route("/api/session/guard", get(session::guard_handler))
        .route("/api/session/connect", post(session::connect_handler))
        .route("/api/session/disconnect", post(session::disconnect_handler))
        .route("/api/session/reconnect", post(session::reconnect_handler))
        .route(
            "/api/session/refresh-balance",
            post(session::refresh_balance_handler),
        )
        .route(
            "/api/session/switch-network",
            post(session::switch_network_handler),
        )
        .route("/api/networks", get(network::list_networks_handler))
        .route("/api/networks/:chain_id", get(network::resolve_network_handler))
        .route(
            "/api/transfers/validate",
            post(transfer::validate_transfer_handler),
        )
        .with_state(app_state)
}
