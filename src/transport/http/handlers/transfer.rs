use crate::domain::transfer::validate_transfer;
use crate::transport::http::handlers::common::{error_response, ok_response};
use crate::transport::http::types::{ApiResponse, AppState, ValidateTransferRequest};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

#[utoipa::path(
    post,
    path = "/api/transfers/validate",
    request_body = ValidateTransferRequest,
    responses(
        (status = 200, description = "Transfer is valid; returns normalized recipient and wei value", body = ApiResponse),
        (status = 400, description = "Invalid recipient, amount or network", body = ApiResponse)
    )
)]
pub async fn validate_transfer_handler(
    State(state): State<AppState>,
    Json(request): Json<ValidateTransferRequest>,
) -> impl IntoResponse {
    let network = state.session.snapshot().network().to_string();
    match validate_transfer(&request.recipient, &request.amount, request.kind.into(), &network) {
        Ok(transfer) => ok_response(json!({
            "recipient": transfer.recipient,
            "value_wei": transfer.value_wei.to_string(),
            "contract": transfer.contract,
            "network": network,
        })),
        Err(e) => error_response(StatusCode::BAD_REQUEST, e.to_string()),
    }
}
