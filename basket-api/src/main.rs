//! Basket Terminal API Server
//!
//! HTTP API exposing theme browsing, event search, and basket
//! preview/execute/generate against Kalshi.

mod routes;

use axum::{
    http::{header, Method},
    Router,
};
use basket_catalog::{EventStore, ThemeCatalog};
use basket_kalshi::{KalshiClient, KalshiConfig};
use basket_llm::BasketGenerator;
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Application state shared across handlers
///
/// Everything is constructed once here and passed down; there are no
/// lazily-initialized globals, and the signing key inside the Kalshi
/// client is loaded exactly once.
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<ThemeCatalog>,
    pub events: Arc<EventStore>,
    pub kalshi: Arc<KalshiClient>,
    /// Basket generator (optional - requires OPENAI_API_KEY)
    pub generator: Option<Arc<BasketGenerator>>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env if present
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,basket_api=debug")),
        )
        .init();

    info!("Starting Basket Terminal API");

    // Initialize the Kalshi client; unusable key material is fatal
    let kalshi_config = KalshiConfig::from_env();
    let kalshi = KalshiClient::from_config(&kalshi_config)?;
    if kalshi.is_authenticated() {
        info!("Kalshi signing key loaded - order submission enabled");
    } else {
        info!("No Kalshi signing key configured - preview only");
    }

    // Load the theme catalog
    let themes_path = std::env::var("THEMES_PATH").unwrap_or_else(|_| "themes.json".to_string());
    let catalog = match ThemeCatalog::from_file(&themes_path) {
        Ok(catalog) => catalog,
        Err(e) => {
            warn!("Theme catalog unavailable: {}. Serving inline themes only.", e);
            ThemeCatalog::empty()
        }
    };

    // Open the event index
    let events_db_path =
        std::env::var("EVENTS_DB_PATH").unwrap_or_else(|_| "data/events.db".to_string());
    info!("Opening event index at: {}", events_db_path);
    let events = EventStore::new(&events_db_path)?;

    // Initialize the basket generator (optional - may fail if API key not set)
    let generator = match BasketGenerator::from_env() {
        Ok(generator) => {
            info!("Basket generator enabled");
            Some(Arc::new(generator))
        }
        Err(e) => {
            info!(
                "Basket generator not available: {}. Set OPENAI_API_KEY to enable.",
                e
            );
            None
        }
    };

    let state = AppState {
        catalog: Arc::new(catalog),
        events: Arc::new(events),
        kalshi: Arc::new(kalshi),
        generator,
    };

    // Configure CORS for the frontend
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]);

    let app = Router::new()
        .nest("/api", routes::api_routes())
        .layer(cors)
        .with_state(state);

    let port = std::env::var("SERVER_PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(8000);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
