use crate::app::auth_guard::AuthGuard;
use crate::transport::http::handlers::common::{
    ok_response, to_json, wallet_error_response,
};
use crate::transport::http::types::{ApiResponse, AppState, SessionView, SwitchNetworkRequest};
use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

fn session_view(state: &AppState) -> serde_json::Value {
    to_json(&SessionView::from(&state.session.snapshot()))
}

#[utoipa::path(
    get,
    path = "/api/session",
    responses(
        (status = 200, description = "Current session snapshot", body = ApiResponse)
    )
)]
pub async fn get_session_handler(State(state): State<AppState>) -> impl IntoResponse {
    ok_response(session_view(&state))
}

#[utoipa::path(
    get,
    path = "/api/session/guard",
    responses(
        (status = 200, description = "Whether gated pages may be shown (waits for a running connection check)", body = ApiResponse)
    )
)]
pub async fn guard_handler(State(state): State<AppState>) -> impl IntoResponse {
    let decision = AuthGuard::new(&state.session).can_activate().await;
    ok_response(json!({
        "allowed": decision.is_allowed(),
        "decision": decision,
    }))
}

#[utoipa::path(
    post,
    path = "/api/session/connect",
    responses(
        (status = 200, description = "Wallet connected", body = ApiResponse),
        (status = 403, description = "User rejected the request or selected no account", body = ApiResponse),
        (status = 502, description = "Provider error", body = ApiResponse),
        (status = 503, description = "No wallet provider installed", body = ApiResponse)
    )
)]
pub async fn connect_handler(State(state): State<AppState>) -> impl IntoResponse {
    match state.session.connect().await {
        Ok(account) => ok_response(json!({
            "account": account,
            "session": session_view(&state),
        })),
        Err(e) => wallet_error_response(&e),
    }
}

#[utoipa::path(
    post,
    path = "/api/session/disconnect",
    responses(
        (status = 200, description = "Wallet disconnected", body = ApiResponse)
    )
)]
pub async fn disconnect_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.session.disconnect();
    ok_response(session_view(&state))
}

#[utoipa::path(
    post,
    path = "/api/session/reconnect",
    responses(
        (status = 200, description = "Result of the silent reconnect attempt", body = ApiResponse)
    )
)]
pub async fn reconnect_handler(State(state): State<AppState>) -> impl IntoResponse {
    let connected = state.session.auto_reconnect().await;
    ok_response(json!({
        "connected": connected,
        "session": session_view(&state),
    }))
}

#[utoipa::path(
    post,
    path = "/api/session/refresh-balance",
    responses(
        (status = 200, description = "Balance refreshed (or kept when the provider failed)", body = ApiResponse)
    )
)]
pub async fn refresh_balance_handler(State(state): State<AppState>) -> impl IntoResponse {
    state.session.refresh_balance().await;
    ok_response(session_view(&state))
}

#[utoipa::path(
    post,
    path = "/api/session/switch-network",
    request_body = SwitchNetworkRequest,
    responses(
        (status = 200, description = "Switch requested; network updates when the provider reports the change", body = ApiResponse),
        (status = 400, description = "Network not configured in the wallet", body = ApiResponse),
        (status = 502, description = "Provider error", body = ApiResponse),
        (status = 503, description = "No wallet provider installed", body = ApiResponse)
    )
)]
pub async fn switch_network_handler(
    State(state): State<AppState>,
    Json(request): Json<SwitchNetworkRequest>,
) -> impl IntoResponse {
    let chain_id = request.chain_id.trim();
    match state.session.switch_network(chain_id).await {
        Ok(()) => ok_response(json!({ "requested_chain_id": chain_id })),
        Err(e) => wallet_error_response(&e),
    }
}
