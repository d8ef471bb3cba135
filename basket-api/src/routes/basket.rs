//! Basket preview, execute, and generate endpoints

use axum::{
    extract::State,
    http::StatusCode,
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use basket_core::{BasketTheme, LegOverride};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::collections::HashMap;
use tracing::info;

use crate::routes::{error_response, ErrorResponse};
use crate::AppState;

/// Body for preview and execute: a theme by id or inline, a budget, and
/// optional per-leg overrides
#[derive(Debug, Deserialize)]
struct BasketRequest {
    #[serde(default)]
    theme_id: String,

    total_budget_dollars: Decimal,

    #[serde(default)]
    overrides: HashMap<String, LegOverride>,

    /// When set, used instead of the theme_id lookup
    #[serde(default)]
    theme: Option<BasketTheme>,
}

/// Body for basket generation
#[derive(Debug, Deserialize)]
struct GenerateRequest {
    query: String,
}

/// Create basket routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/basket/preview", post(basket_preview))
        .route("/basket/execute", post(basket_execute))
        .route("/basket/generate", post(basket_generate))
}

/// Preview a basket: estimated cost and contract counts per leg
async fn basket_preview(
    State(state): State<AppState>,
    Json(body): Json<BasketRequest>,
) -> impl IntoResponse {
    let theme = match state.catalog.resolve(body.theme, &body.theme_id) {
        Ok(theme) => theme,
        Err(e) => return error_response(&e).into_response(),
    };

    match basket_engine::preview(
        state.kalshi.as_ref(),
        &theme,
        body.total_budget_dollars,
        &body.overrides,
    )
    .await
    {
        Ok(preview) => (StatusCode::OK, Json(preview)).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// Execute a basket as one batched order submission
async fn basket_execute(
    State(state): State<AppState>,
    Json(body): Json<BasketRequest>,
) -> impl IntoResponse {
    let theme = match state.catalog.resolve(body.theme, &body.theme_id) {
        Ok(theme) => theme,
        Err(e) => return error_response(&e).into_response(),
    };

    info!(
        "Executing basket '{}' with budget {}",
        theme.theme_id, body.total_budget_dollars
    );

    match basket_engine::execute(
        state.kalshi.as_ref(),
        &theme,
        body.total_budget_dollars,
        &body.overrides,
    )
    .await
    {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}

/// Generate a basket from a natural-language trend
async fn basket_generate(
    State(state): State<AppState>,
    Json(body): Json<GenerateRequest>,
) -> impl IntoResponse {
    let Some(generator) = state.generator.as_ref() else {
        return (
            StatusCode::SERVICE_UNAVAILABLE,
            Json(ErrorResponse {
                error: "Basket generation not configured (OPENAI_API_KEY not set)".to_string(),
            }),
        )
            .into_response();
    };
    if body.query.trim().is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(ErrorResponse {
                error: "Query must not be empty".to_string(),
            }),
        )
            .into_response();
    }

    match generator.generate(state.kalshi.as_ref(), &body.query).await {
        Ok(theme) => (StatusCode::OK, Json(theme)).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}
