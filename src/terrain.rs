//! Terrain metadata: the table that drives every fill color and glyph.
//!
//! The engine knows nothing about what a terrain *means*. World maps and
//! city maps ship different tables against the same renderer.

#[cfg(test)]
#[path = "terrain_test.rs"]
mod terrain_test;

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::GridError;

/// Visual description of one terrain or content type.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct TerrainStyle {
    #[serde(default)]
    pub glyph: String,
    pub fill: String,
    #[serde(alias = "hoverFill")]
    pub hover_fill: String,
    #[serde(alias = "symbolColor")]
    pub symbol_color: String,
    #[serde(alias = "hoveredSymbolColor")]
    pub hovered_symbol_color: String,
    #[serde(default)]
    pub label: String,
}

impl TerrainStyle {
    /// Neutral style used when neither the requested key nor the empty key is known.
    #[must_use]
    pub fn fallback() -> Self {
        Self {
            glyph: String::new(),
            fill: "#1b1f24".to_owned(),
            hover_fill: "#2a3038".to_owned(),
            symbol_color: "#8a8f98".to_owned(),
            hovered_symbol_color: "#ffffff".to_owned(),
            label: String::new(),
        }
    }
}

/// Immutable terrain key → style table.
#[derive(Debug, Clone)]
pub struct TerrainMap {
    styles: HashMap<String, TerrainStyle>,
    empty_key: String,
    fallback: TerrainStyle,
}

impl TerrainMap {
    /// Wrap a style table. `empty_key` names the style used for blank or unknown terrain.
    #[must_use]
    pub fn new(styles: HashMap<String, TerrainStyle>, empty_key: impl Into<String>) -> Self {
        Self { styles, empty_key: empty_key.into(), fallback: TerrainStyle::fallback() }
    }

    /// Parse a JSON object of `{ key: style }`.
    ///
    /// # Errors
    ///
    /// Returns [`GridError::Parse`] if any style is missing a required color.
    pub fn from_json(raw: &str, empty_key: impl Into<String>) -> Result<Self, GridError> {
        let styles: HashMap<String, TerrainStyle> = serde_json::from_str(raw)?;
        Ok(Self::new(styles, empty_key))
    }

    /// Same table with a different empty key.
    #[must_use]
    pub fn with_empty_key(mut self, empty_key: impl Into<String>) -> Self {
        self.empty_key = empty_key.into();
        self
    }

    #[must_use]
    pub fn empty_key(&self) -> &str {
        &self.empty_key
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.styles.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.styles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    /// Style for `key`, falling back to the empty style, then to the built-in neutral style.
    #[must_use]
    pub fn style_for(&self, key: &str) -> &TerrainStyle {
        let key = if key.is_empty() { self.empty_key.as_str() } else { key };
        self.styles
            .get(key)
            .or_else(|| self.styles.get(&self.empty_key))
            .unwrap_or(&self.fallback)
    }

    /// Style for padding cells that lie outside the grid.
    #[must_use]
    pub fn empty_style(&self) -> &TerrainStyle {
        self.style_for(&self.empty_key)
    }
}
