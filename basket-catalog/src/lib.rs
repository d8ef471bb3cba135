//! Theme catalog and keyword event index for the Basket Terminal
//!
//! Both are caller-side sources of `BasketTheme`s: a JSON catalog of
//! predefined themes, and a local SQLite index of events searchable by
//! keyword, from which a theme can be derived on demand.

pub mod events;
pub mod themes;

pub use events::{theme_from_event, EventMarket, EventRecord, EventStore};
pub use themes::ThemeCatalog;
