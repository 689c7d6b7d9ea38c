use crate::domain::error::WalletError;
use crate::transport::http::types::ApiResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::Value as JsonValue;

pub fn ok_response(data: JsonValue) -> Response {
    (StatusCode::OK, Json(ApiResponse::ok(data))).into_response()
}

pub fn error_response(status: StatusCode, error: impl Into<String>) -> Response {
    (status, Json(ApiResponse::err(error))).into_response()
}

pub fn wallet_error_status(err: &WalletError) -> StatusCode {
    match err {
        WalletError::NoProvider => StatusCode::SERVICE_UNAVAILABLE,
        WalletError::UserRejected { .. } | WalletError::NoAccounts => StatusCode::FORBIDDEN,
        WalletError::UnconfiguredNetwork { .. } => StatusCode::BAD_REQUEST,
        WalletError::Provider { .. } | WalletError::BalanceFetch(_) => StatusCode::BAD_GATEWAY,
    }
}

pub fn wallet_error_response(err: &WalletError) -> Response {
    error_response(wallet_error_status(err), err.to_string())
}

/// Serializes a response payload. Our view types always serialize; `Null` is the fallback.
pub fn to_json<T: serde::Serialize>(value: &T) -> JsonValue {
    serde_json::to_value(value).unwrap_or_default()
}
