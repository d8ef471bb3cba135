//! Predefined theme catalog
//!
//! Loaded once at startup from a JSON file and held immutable for the
//! process lifetime; preview/execute requests resolve against it by id
//! unless they carry an inline theme.

use basket_core::{BasketError, BasketResult, BasketTheme};
use std::path::Path;
use tracing::info;

pub struct ThemeCatalog {
    themes: Vec<BasketTheme>,
}

impl ThemeCatalog {
    /// Empty catalog; only inline themes will resolve.
    pub fn empty() -> Self {
        Self { themes: Vec::new() }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> BasketResult<Self> {
        let raw = std::fs::read_to_string(&path).map_err(|e| {
            BasketError::config(format!(
                "Failed to read themes file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        let catalog = Self::from_json_str(&raw)?;
        info!(
            "Loaded {} themes from {}",
            catalog.themes.len(),
            path.as_ref().display()
        );
        Ok(catalog)
    }

    /// Parse and validate a catalog; any invalid theme rejects the file.
    pub fn from_json_str(raw: &str) -> BasketResult<Self> {
        let themes: Vec<BasketTheme> = serde_json::from_str(raw)
            .map_err(|e| BasketError::parse(format!("Failed to parse themes: {}", e)))?;
        for theme in &themes {
            theme.validate()?;
        }
        Ok(Self { themes })
    }

    pub fn themes(&self) -> &[BasketTheme] {
        &self.themes
    }

    pub fn get(&self, theme_id: &str) -> Option<&BasketTheme> {
        self.themes.iter().find(|t| t.theme_id == theme_id)
    }

    /// Resolve a request's theme: an inline definition wins over a catalog id.
    pub fn resolve(
        &self,
        inline: Option<BasketTheme>,
        theme_id: &str,
    ) -> BasketResult<BasketTheme> {
        if let Some(theme) = inline {
            theme.validate()?;
            return Ok(theme);
        }
        if theme_id.trim().is_empty() {
            return Err(BasketError::validation("Provide theme_id or theme"));
        }
        self.get(theme_id)
            .cloned()
            .ok_or_else(|| BasketError::not_found("Theme not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use basket_core::Direction;
    use rust_decimal_macros::dec;

    const CATALOG_JSON: &str = r#"[
        {
            "theme_id": "ai_progress",
            "name": "AI progress",
            "description": "Milestones in AI capability",
            "legs": [
                {
                    "market_ticker": "KXAI-26",
                    "event_ticker": "KXAI",
                    "title": "AI milestone reached",
                    "direction": "BUY_YES",
                    "weight": 0.7
                },
                {
                    "market_ticker": "KXCHIP-26",
                    "event_ticker": "KXCHIP",
                    "title": "Chip export limits",
                    "direction": "BUY_NO",
                    "weight": 0.3,
                    "enabled": false
                }
            ]
        }
    ]"#;

    #[test]
    fn test_catalog_parses_and_looks_up() {
        let catalog = ThemeCatalog::from_json_str(CATALOG_JSON).unwrap();
        assert_eq!(catalog.themes().len(), 1);

        let theme = catalog.get("ai_progress").unwrap();
        assert_eq!(theme.legs.len(), 2);
        assert_eq!(theme.legs[0].weight, dec!(0.7));
        assert_eq!(theme.legs[1].direction, Direction::BuyNo);
        assert!(!theme.legs[1].enabled);
        assert!(catalog.get("missing").is_none());
    }

    #[test]
    fn test_catalog_rejects_duplicate_tickers() {
        let raw = r#"[{
            "theme_id": "bad",
            "name": "Bad",
            "description": "",
            "legs": [
                {"market_ticker": "A", "event_ticker": "A", "title": "a", "weight": 0.5},
                {"market_ticker": "A", "event_ticker": "A", "title": "a", "weight": 0.5}
            ]
        }]"#;
        assert!(ThemeCatalog::from_json_str(raw).is_err());
    }

    #[test]
    fn test_resolve_prefers_inline_theme() {
        let catalog = ThemeCatalog::from_json_str(CATALOG_JSON).unwrap();
        let inline = catalog.get("ai_progress").unwrap().clone();
        let resolved = catalog.resolve(Some(inline), "some_other_id").unwrap();
        assert_eq!(resolved.theme_id, "ai_progress");
    }

    #[test]
    fn test_resolve_by_id_and_errors() {
        let catalog = ThemeCatalog::from_json_str(CATALOG_JSON).unwrap();

        assert!(catalog.resolve(None, "ai_progress").is_ok());
        assert!(matches!(
            catalog.resolve(None, "").unwrap_err(),
            BasketError::Validation(_)
        ));
        assert!(matches!(
            catalog.resolve(None, "nope").unwrap_err(),
            BasketError::NotFound(_)
        ));
    }
}
