//! Stylesheet system for sheet colours
//!
//! A stylesheet maps colour tokens to hex values and carries the background
//! opacity. Tokens missing from a user stylesheet fall back to the default
//! palette, so a stylesheet only needs to name what it changes.

use std::collections::HashMap;
use std::path::Path;

use image::Rgba;
use serde::Deserialize;
use thiserror::Error;

/// Errors that can occur when loading or parsing stylesheets
#[derive(Error, Debug)]
pub enum StylesheetError {
    #[error("Failed to read stylesheet file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse stylesheet TOML: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// A stylesheet mapping colour tokens to concrete values
#[derive(Debug, Clone)]
pub struct Stylesheet {
    /// Optional name for the stylesheet
    pub name: Option<String>,
    /// Optional description
    pub description: Option<String>,
    /// Colour mappings: token name -> hex colour
    pub colors: HashMap<String, String>,
    /// Opacity of the sheet background in percent
    pub background_alpha: Option<u8>,
}

/// TOML structure for deserializing stylesheets
#[derive(Deserialize)]
struct TomlStylesheet {
    metadata: Option<TomlMetadata>,
    #[serde(default)]
    colors: HashMap<String, String>,
    canvas: Option<TomlCanvas>,
}

#[derive(Deserialize)]
struct TomlMetadata {
    name: Option<String>,
    description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "kebab-case")]
struct TomlCanvas {
    background_alpha: Option<u8>,
}

/// Default palette: black on white with orange for acquired skills
const DEFAULT_PALETTE: &str = r##"
[colors]
# Composed sheet
background = "#ffffff"
text = "#000000"
learned = "#ffa500"

# Tiled sheet strip
tile-background = "#00000064"
tile-text = "#ffffff"
tile-learned = "#ffa500"
footer-text = "#ffffff"

[canvas]
background-alpha = 100
"##;

/// Colours resolved for painting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    /// Sheet background with the stylesheet opacity applied
    pub background: Rgba<u8>,
    pub text: Rgba<u8>,
    pub learned: Rgba<u8>,
    pub tile_background: Rgba<u8>,
    pub tile_text: Rgba<u8>,
    pub tile_learned: Rgba<u8>,
    pub footer_text: Rgba<u8>,
}

impl Stylesheet {
    /// Load stylesheet from TOML file
    pub fn from_file(path: &Path) -> Result<Self, StylesheetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_str(&content)
    }

    /// Load stylesheet from TOML string
    pub fn from_str(content: &str) -> Result<Self, StylesheetError> {
        let parsed: TomlStylesheet = toml::from_str(content)?;

        Ok(Stylesheet {
            name: parsed.metadata.as_ref().and_then(|m| m.name.clone()),
            description: parsed.metadata.as_ref().and_then(|m| m.description.clone()),
            colors: parsed.colors,
            background_alpha: parsed.canvas.and_then(|c| c.background_alpha),
        })
    }

    /// Override one colour token
    pub fn with_color(mut self, token: impl Into<String>, hex: impl Into<String>) -> Self {
        self.colors.insert(token.into(), hex.into());
        self
    }

    /// Set the background opacity in percent; values above 100 are clamped
    pub fn with_background_alpha(mut self, percent: u8) -> Self {
        self.background_alpha = Some(percent.min(100));
        self
    }

    /// Resolve a colour token to a concrete value
    ///
    /// Returns None if the token is not defined in this stylesheet.
    pub fn resolve(&self, token: &str) -> Option<&str> {
        self.colors.get(token).map(|s| s.as_str())
    }

    /// Resolve a colour token with fallback to the default palette
    ///
    /// Fallback order:
    /// 1. Check this stylesheet for exact token
    /// 2. Check default palette for exact token
    /// 3. Use category default (background → white, everything else black)
    pub fn resolve_or_default(&self, token: &str) -> String {
        if let Some(color) = self.resolve(token) {
            return color.to_string();
        }

        if let Some(color) = default_palette().resolve(token) {
            return color.to_string();
        }

        if token.ends_with("background") {
            return "#ffffff".to_string();
        }
        "#000000".to_string()
    }

    /// Resolve a token to RGBA; an unparsable value falls back to the
    /// default palette with a warning
    pub fn color(&self, token: &str) -> Rgba<u8> {
        let value = self.resolve_or_default(token);
        if let Some(color) = parse_hex_color(&value) {
            return color;
        }
        log::warn!("invalid colour '{}' for '{}', using default", value, token);
        let fallback = default_palette().resolve_or_default(token);
        parse_hex_color(&fallback).unwrap_or(Rgba([0, 0, 0, 255]))
    }

    /// Background opacity in percent, 0 to 100
    pub fn background_alpha(&self) -> u8 {
        self.background_alpha
            .or_else(|| default_palette().background_alpha)
            .unwrap_or(100)
            .min(100)
    }

    /// Resolve every colour used for painting
    pub fn palette(&self) -> Palette {
        let mut background = self.color("background");
        background.0[3] = percent_to_alpha(self.background_alpha());
        Palette {
            background,
            text: self.color("text"),
            learned: self.color("learned"),
            tile_background: self.color("tile-background"),
            tile_text: self.color("tile-text"),
            tile_learned: self.color("tile-learned"),
            footer_text: self.color("footer-text"),
        }
    }
}

impl Default for Stylesheet {
    fn default() -> Self {
        default_palette()
    }
}

fn default_palette() -> Stylesheet {
    Stylesheet::from_str(DEFAULT_PALETTE).expect("Default palette should be valid TOML")
}

/// Parse `#rrggbb` or `#rrggbbaa` (the `#` is optional)
pub fn parse_hex_color(value: &str) -> Option<Rgba<u8>> {
    let hex = value.trim().trim_start_matches('#');
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

/// Convert an opacity percentage to an alpha byte, truncating
pub fn percent_to_alpha(percent: u8) -> u8 {
    (u32::from(percent.min(100)) * 255 / 100) as u8
}
