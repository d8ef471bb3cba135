//! API route definitions

mod basket;
mod events;
mod health;
mod themes;

use crate::AppState;
use axum::{http::StatusCode, Json, Router};
use basket_core::BasketError;
use serde::Serialize;

/// Create all API routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(basket::routes())
        .merge(events::routes())
        .merge(health::routes())
        .merge(themes::routes())
}

/// Error response body shared by all routes
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

/// Map the error taxonomy onto HTTP statuses
pub fn error_response(err: &BasketError) -> (StatusCode, Json<ErrorResponse>) {
    let status = match err {
        BasketError::Validation(_) => StatusCode::BAD_REQUEST,
        BasketError::NotFound(_) => StatusCode::NOT_FOUND,
        BasketError::Api(_) | BasketError::Network(_) => StatusCode::BAD_GATEWAY,
        BasketError::Config(_) | BasketError::Parse(_) | BasketError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (
        status,
        Json(ErrorResponse {
            error: err.to_string(),
        }),
    )
}
