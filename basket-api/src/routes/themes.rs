//! Theme catalog endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use basket_core::BasketTheme;
use serde::Serialize;

use crate::routes::ErrorResponse;
use crate::AppState;

/// Response for listing themes
#[derive(Debug, Serialize)]
struct ThemesResponse {
    themes: Vec<BasketTheme>,
}

/// Create theme routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/themes", get(list_themes))
        .route("/themes/{theme_id}", get(get_theme))
}

/// List all basket themes
async fn list_themes(State(state): State<AppState>) -> Json<ThemesResponse> {
    Json(ThemesResponse {
        themes: state.catalog.themes().to_vec(),
    })
}

/// Get one theme by id
async fn get_theme(
    State(state): State<AppState>,
    Path(theme_id): Path<String>,
) -> impl IntoResponse {
    match state.catalog.get(&theme_id) {
        Some(theme) => (StatusCode::OK, Json(theme.clone())).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Theme not found".to_string(),
            }),
        )
            .into_response(),
    }
}
