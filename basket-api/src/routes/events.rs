//! Event index endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use basket_catalog::{theme_from_event, EventRecord};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::routes::{error_response, ErrorResponse};
use crate::AppState;

/// Query parameters for event search
#[derive(Debug, Deserialize)]
struct SearchQuery {
    /// Keyword; empty returns top events by volume
    q: Option<String>,
    limit: Option<usize>,
}

/// Response for event search
#[derive(Debug, Serialize)]
struct EventsResponse {
    events: Vec<EventRecord>,
    count: usize,
}

/// Create event routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/search", get(search_events))
        .route("/events/{event_ticker}", get(get_event))
        .route("/events/{event_ticker}/theme", get(event_theme))
}

/// Search events by keyword, top results by volume
async fn search_events(
    State(state): State<AppState>,
    Query(params): Query<SearchQuery>,
) -> impl IntoResponse {
    let limit = params.limit.unwrap_or(20);
    match state.events.search(params.q.as_deref(), limit) {
        Ok(events) => {
            let count = events.len();
            (StatusCode::OK, Json(EventsResponse { events, count })).into_response()
        }
        Err(e) => {
            error!("Event search failed: {}", e);
            error_response(&e).into_response()
        }
    }
}

/// Get one event by ticker
async fn get_event(
    State(state): State<AppState>,
    Path(event_ticker): Path<String>,
) -> impl IntoResponse {
    match state.events.get(&event_ticker) {
        Ok(Some(event)) => (StatusCode::OK, Json(event)).into_response(),
        Ok(None) => (
            StatusCode::NOT_FOUND,
            Json(ErrorResponse {
                error: "Event not found".to_string(),
            }),
        )
            .into_response(),
        Err(e) => {
            error!("Event lookup failed: {}", e);
            error_response(&e).into_response()
        }
    }
}

/// Derive an equal-weight theme from an event's market list
async fn event_theme(
    State(state): State<AppState>,
    Path(event_ticker): Path<String>,
) -> impl IntoResponse {
    let event = match state.events.get(&event_ticker) {
        Ok(Some(event)) => event,
        Ok(None) => {
            return (
                StatusCode::NOT_FOUND,
                Json(ErrorResponse {
                    error: "Event not found".to_string(),
                }),
            )
                .into_response()
        }
        Err(e) => {
            error!("Event lookup failed: {}", e);
            return error_response(&e).into_response();
        }
    };

    match theme_from_event(&event) {
        Ok(theme) => (StatusCode::OK, Json(theme)).into_response(),
        Err(e) => error_response(&e).into_response(),
    }
}
