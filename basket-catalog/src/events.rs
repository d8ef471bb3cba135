//! SQLite keyword event index
//!
//! A local store of exchange events with their nested markets, searchable
//! by substring and ordered by volume. Populated out-of-band; read-mostly
//! at request time.

use basket_core::{BasketError, BasketLeg, BasketResult, BasketTheme, Direction};
use rusqlite::{params, Connection, OptionalExtension};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Mutex;

/// One market nested under an event
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventMarket {
    pub market_ticker: String,

    #[serde(default)]
    pub event_ticker: Option<String>,

    #[serde(default)]
    pub title: Option<String>,
}

/// A searchable event row
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventRecord {
    pub event_ticker: String,
    pub title: String,
    pub series_ticker: String,
    pub category: String,
    pub market_count: i64,
    pub volume: i64,
    pub markets: Vec<EventMarket>,
}

/// Event index backed by SQLite
pub struct EventStore {
    conn: Mutex<Connection>,
}

impl EventStore {
    /// Open (or create) the index at the given path.
    pub fn new<P: AsRef<Path>>(db_path: P) -> BasketResult<Self> {
        if let Some(parent) = db_path.as_ref().parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                BasketError::internal(format!("Failed to create database directory: {}", e))
            })?;
        }
        let conn = Connection::open(db_path)
            .map_err(|e| BasketError::internal(format!("Database error: {}", e)))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    /// In-memory index (useful for testing).
    pub fn new_in_memory() -> BasketResult<Self> {
        let conn = Connection::open_in_memory()
            .map_err(|e| BasketError::internal(format!("Database error: {}", e)))?;
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> BasketResult<()> {
        let conn = self.lock()?;
        conn.execute_batch(
            r#"
            CREATE TABLE IF NOT EXISTS events (
                event_ticker TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                series_ticker TEXT,
                category TEXT,
                market_count INTEGER DEFAULT 0,
                volume INTEGER DEFAULT 0,
                markets_json TEXT
            );

            CREATE INDEX IF NOT EXISTS idx_events_volume ON events(volume DESC);
            CREATE INDEX IF NOT EXISTS idx_events_title ON events(title);
            CREATE INDEX IF NOT EXISTS idx_events_series ON events(series_ticker);
            "#,
        )
        .map_err(|e| BasketError::internal(format!("Database error: {}", e)))?;
        Ok(())
    }

    fn lock(&self) -> BasketResult<std::sync::MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| BasketError::internal("Failed to acquire database lock"))
    }

    /// Insert or replace one event.
    pub fn upsert_event(&self, event: &EventRecord) -> BasketResult<()> {
        let markets_json = serde_json::to_string(&event.markets)
            .map_err(|e| BasketError::internal(format!("Failed to encode markets: {}", e)))?;
        let conn = self.lock()?;
        conn.execute(
            r#"
            INSERT INTO events (event_ticker, title, series_ticker, category, market_count, volume, markets_json)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            ON CONFLICT(event_ticker) DO UPDATE SET
                title = excluded.title,
                series_ticker = excluded.series_ticker,
                category = excluded.category,
                market_count = excluded.market_count,
                volume = excluded.volume,
                markets_json = excluded.markets_json
            "#,
            params![
                event.event_ticker,
                event.title,
                event.series_ticker,
                event.category,
                event.market_count,
                event.volume,
                markets_json,
            ],
        )
        .map_err(|e| BasketError::internal(format!("Database error: {}", e)))?;
        Ok(())
    }

    /// Search events by keyword over title/series/event/category, top
    /// `limit` by volume. No query returns the top events outright.
    pub fn search(&self, query: Option<&str>, limit: usize) -> BasketResult<Vec<EventRecord>> {
        let conn = self.lock()?;
        let query = query.map(str::trim).filter(|q| !q.is_empty());

        let mut rows: Vec<EventRow> = Vec::new();
        match query {
            Some(q) => {
                let pattern = format!("%{}%", q);
                let mut stmt = conn
                    .prepare(
                        r#"
                        SELECT event_ticker, title, series_ticker, category, market_count, volume, markets_json
                        FROM events
                        WHERE title LIKE ?1 OR series_ticker LIKE ?1 OR event_ticker LIKE ?1 OR category LIKE ?1
                        ORDER BY volume DESC
                        LIMIT ?2
                        "#,
                    )
                    .map_err(|e| BasketError::internal(format!("Database error: {}", e)))?;
                let mapped = stmt
                    .query_map(params![pattern, limit as i64], row_tuple)
                    .map_err(|e| BasketError::internal(format!("Database error: {}", e)))?;
                for row in mapped {
                    rows.push(row.map_err(|e| {
                        BasketError::internal(format!("Database error: {}", e))
                    })?);
                }
            }
            None => {
                let mut stmt = conn
                    .prepare(
                        r#"
                        SELECT event_ticker, title, series_ticker, category, market_count, volume, markets_json
                        FROM events
                        ORDER BY volume DESC
                        LIMIT ?1
                        "#,
                    )
                    .map_err(|e| BasketError::internal(format!("Database error: {}", e)))?;
                let mapped = stmt
                    .query_map(params![limit as i64], row_tuple)
                    .map_err(|e| BasketError::internal(format!("Database error: {}", e)))?;
                for row in mapped {
                    rows.push(row.map_err(|e| {
                        BasketError::internal(format!("Database error: {}", e))
                    })?);
                }
            }
        }

        Ok(rows.into_iter().map(record_from_row).collect())
    }

    /// Get one event by ticker.
    pub fn get(&self, event_ticker: &str) -> BasketResult<Option<EventRecord>> {
        let conn = self.lock()?;
        let row = conn
            .query_row(
                "SELECT event_ticker, title, series_ticker, category, market_count, volume, markets_json FROM events WHERE event_ticker = ?1",
                params![event_ticker],
                row_tuple,
            )
            .optional()
            .map_err(|e| BasketError::internal(format!("Database error: {}", e)))?;
        Ok(row.map(record_from_row))
    }
}

type EventRow = (
    String,
    String,
    Option<String>,
    Option<String>,
    i64,
    i64,
    Option<String>,
);

fn row_tuple(row: &rusqlite::Row<'_>) -> rusqlite::Result<EventRow> {
    Ok((
        row.get(0)?,
        row.get(1)?,
        row.get(2)?,
        row.get(3)?,
        row.get(4)?,
        row.get(5)?,
        row.get(6)?,
    ))
}

fn record_from_row(
    (event_ticker, title, series_ticker, category, market_count, volume, markets_json): EventRow,
) -> EventRecord {
    // Tolerate malformed market blobs; the row is still useful without them.
    let markets = markets_json
        .as_deref()
        .and_then(|json| serde_json::from_str(json).ok())
        .unwrap_or_default();
    EventRecord {
        event_ticker,
        title,
        series_ticker: series_ticker.unwrap_or_default(),
        category: category.unwrap_or_default(),
        market_count,
        volume,
        markets,
    }
}

/// Derive an equal-weight BUY_YES theme from an event's market list.
pub fn theme_from_event(event: &EventRecord) -> BasketResult<BasketTheme> {
    let markets: Vec<&EventMarket> = event
        .markets
        .iter()
        .filter(|m| !m.market_ticker.is_empty())
        .collect();
    if markets.is_empty() {
        return Err(BasketError::validation(format!(
            "Event {} has no markets",
            event.event_ticker
        )));
    }

    let weight = Decimal::ONE / Decimal::from(markets.len() as i64);
    let legs = markets
        .iter()
        .map(|m| BasketLeg {
            market_ticker: m.market_ticker.clone(),
            event_ticker: m
                .event_ticker
                .clone()
                .unwrap_or_else(|| event.event_ticker.clone()),
            title: m
                .title
                .clone()
                .unwrap_or_else(|| m.market_ticker.clone()),
            direction: Direction::BuyYes,
            weight,
            enabled: true,
        })
        .collect();

    let theme = BasketTheme {
        theme_id: event.event_ticker.to_lowercase().replace('-', "_"),
        name: event.title.clone(),
        description: format!("Event: {}", event.title),
        legs,
    };
    theme.validate()?;
    Ok(theme)
}
