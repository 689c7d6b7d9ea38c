use crate::domain::network::{network_by_chain_id, NETWORKS, UNKNOWN_NETWORK};
use crate::transport::http::handlers::common::{ok_response, to_json};
use crate::transport::http::types::{ApiResponse, NetworkView};
use axum::extract::Path;
use axum::response::IntoResponse;

#[utoipa::path(
    get,
    path = "/api/networks",
    responses(
        (status = 200, description = "Known networks", body = ApiResponse)
    )
)]
pub async fn list_networks_handler() -> impl IntoResponse {
    let networks: Vec<NetworkView> = NETWORKS.iter().map(NetworkView::from).collect();
    ok_response(to_json(&networks))
}

#[utoipa::path(
    get,
    path = "/api/networks/{chain_id}",
    params(
        ("chain_id" = String, Path, description = "Hex chain id (e.g. 0x89)")
    ),
    responses(
        (status = 200, description = "Resolved network; unknown ids resolve to \"Unknown\"", body = ApiResponse)
    )
)]
pub async fn resolve_network_handler(Path(chain_id): Path<String>) -> impl IntoResponse {
    let view = match network_by_chain_id(&chain_id) {
        Some(entry) => NetworkView::from(entry),
        None => NetworkView {
            chain_id,
            name: UNKNOWN_NETWORK.to_string(),
            payment_contract: None,
        },
    };
    ok_response(to_json(&view))
}
