//! Sheet Composer - character sheet images for a tabletop RPG
//!
//! This library provides the sheet model, a layout engine and a raster
//! renderer that turn character stats into a PNG sheet.
//!
//! # Example
//!
//! ```rust
//! use sheet_composer::{compose_with_config, ComposeConfig, Fonts, SheetRequest};
//!
//! let config = ComposeConfig::from_fonts(Fonts::none());
//! let sheet = compose_with_config(&SheetRequest::new().with_name("Kiri"), &config).unwrap();
//! assert_eq!((sheet.width, sheet.height), (1010, 530));
//! assert_eq!(sheet.file_stem, "Kiri");
//! ```

pub mod config;
pub mod error;
pub mod font;
pub mod layout;
pub mod renderer;
pub mod sheet;
pub mod stylesheet;

pub use config::{AppConfig, ConfigError};
pub use error::{ComposeError, InputError};
pub use font::{FontFace, FontSizes, Fonts};
pub use layout::{LayoutConfig, SheetLayout, TileConfig};
pub use renderer::{downscale_png, RasterConfig};
pub use sheet::{AttributeGroup, CharacterFile, Faction, Score, Scores, SheetRequest, Skill, SkillFlags};

// Re-export Stylesheet for public API
pub use stylesheet::{Stylesheet, StylesheetError};

use base64::Engine;
use image::RgbaImage;

/// Configuration for the complete compose pipeline
#[derive(Debug, Clone)]
pub struct ComposeConfig {
    /// Sheet geometry, including mirroring
    pub layout: LayoutConfig,
    /// Tiled sheet geometry
    pub tiles: TileConfig,
    /// Painting options
    pub raster: RasterConfig,
    /// Colours and background opacity
    pub stylesheet: Stylesheet,
    /// Painting and reference fonts
    pub fonts: Fonts,
    /// Multiplier applied to every normalised font size
    pub font_scale: f32,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self::from_fonts(Fonts::discover())
    }
}

impl ComposeConfig {
    /// Create a new configuration with defaults and a discovered system font
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a configuration with defaults around already loaded fonts
    pub fn from_fonts(fonts: Fonts) -> Self {
        Self {
            layout: LayoutConfig::default(),
            tiles: TileConfig::default(),
            raster: RasterConfig::default(),
            stylesheet: Stylesheet::default(),
            fonts,
            font_scale: 1.0,
        }
    }

    /// Set the layout configuration
    pub fn with_layout(mut self, config: LayoutConfig) -> Self {
        self.layout = config;
        self
    }

    /// Set the tiled sheet configuration
    pub fn with_tiles(mut self, config: TileConfig) -> Self {
        self.tiles = config;
        self
    }

    /// Set the stylesheet for colour resolution
    pub fn with_stylesheet(mut self, stylesheet: Stylesheet) -> Self {
        self.stylesheet = stylesheet;
        self
    }

    /// Set the fonts
    pub fn with_fonts(mut self, fonts: Fonts) -> Self {
        self.fonts = fonts;
        self
    }

    /// Set the font scale; non-positive or non-finite values reset it to 1
    pub fn with_font_scale(mut self, scale: f32) -> Self {
        self.font_scale = if scale.is_finite() && scale > 0.0 { scale } else { 1.0 };
        self
    }

    /// Put the stats on the left and the portrait on the right
    pub fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.layout = self.layout.with_mirrored(mirrored);
        self
    }

    /// Enable or disable debug mode: region outlines on the output
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.raster = self.raster.with_debug_outlines(debug);
        self
    }
}

/// A finished sheet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposedSheet {
    /// PNG-encoded image
    pub png: Vec<u8>,
    pub width: u32,
    pub height: u32,
    /// Suggested output file name without extension
    pub file_stem: String,
}

impl ComposedSheet {
    /// The PNG as a `data:` URL
    pub fn to_data_url(&self) -> String {
        format!(
            "data:image/png;base64,{}",
            base64::engine::general_purpose::STANDARD.encode(&self.png)
        )
    }

    /// File name for the PNG: the stem with path separators replaced.
    ///
    /// The result is always a single path component, so joining it onto an
    /// output directory stays inside that directory.
    pub fn file_name(&self) -> String {
        let stem: String = self
            .file_stem
            .chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '\0' => '_',
                c => c,
            })
            .collect();
        match stem.trim_matches('.') {
            "" => "output.png".to_string(),
            _ => format!("{}.png", stem),
        }
    }

    /// Resize by `factor` in (0, 1]
    pub fn downscaled(&self, factor: f64) -> Result<ComposedSheet, ComposeError> {
        let png = downscale_png(&self.png, factor)?;
        let (width, height) = png_dimensions(&png)?;
        Ok(ComposedSheet {
            png,
            width,
            height,
            file_stem: self.file_stem.clone(),
        })
    }
}

/// Compose a sheet with default configuration
///
/// This is the main entry point for the library. It decodes the portrait,
/// computes the layout, paints it and encodes PNG.
pub fn compose(request: &SheetRequest) -> Result<ComposedSheet, ComposeError> {
    compose_with_config(request, &ComposeConfig::default())
}

/// Compose a sheet with custom configuration
///
/// # Example
///
/// ```rust
/// use sheet_composer::{compose_with_config, ComposeConfig, Fonts, SheetRequest};
///
/// let config = ComposeConfig::from_fonts(Fonts::none()).with_mirrored(true);
///
/// let sheet = compose_with_config(&SheetRequest::new(), &config).unwrap();
/// assert_eq!(sheet.width, 1010);
/// assert_eq!(sheet.file_stem, "output");
/// ```
pub fn compose_with_config(
    request: &SheetRequest,
    config: &ComposeConfig,
) -> Result<ComposedSheet, ComposeError> {
    let sizes = FontSizes::normalized(&config.fonts, config.font_scale);
    let portrait = request.portrait.as_deref().and_then(renderer::decode_portrait);

    let sheet_layout = layout::compute(
        request,
        portrait.as_ref().map(|p| p.dimensions()),
        &config.layout,
        &sizes,
        config.fonts.measure(),
    );
    log::debug!("sheet layout:\n{}", sheet_layout.describe());

    let palette = config.stylesheet.palette();
    let image = renderer::render_sheet(
        &sheet_layout,
        portrait.as_ref(),
        &palette,
        &config.fonts,
        &sizes,
        &config.raster,
    );
    finish(&image, request)
}

/// Compose the tiled 2x2 sheet.
///
/// The template decides the sheet size; without one a plain sheet of the
/// configured size is used.
pub fn compose_tiled(
    request: &SheetRequest,
    config: &ComposeConfig,
    template: Option<&RgbaImage>,
) -> Result<ComposedSheet, ComposeError> {
    let tiles = match template {
        Some(t) => config.tiles.clone().with_sheet_size(t.width(), t.height()),
        None => config.tiles.clone(),
    };
    let measure = config.fonts.measure();

    let strip_layout = layout::compute_strip(request, &tiles, measure);
    log::debug!("strip layout:\n{}", strip_layout.describe());
    let tiled_layout = layout::compute_tiles(request, &tiles, measure);

    let palette = config.stylesheet.palette();
    let strip = renderer::render_strip(&strip_layout, &palette, &config.fonts);
    let image = renderer::render_tiled(&strip, &tiled_layout, template, &palette, &config.fonts);
    finish(&image, request)
}

fn finish(image: &RgbaImage, request: &SheetRequest) -> Result<ComposedSheet, ComposeError> {
    Ok(ComposedSheet {
        png: renderer::encode_png(image)?,
        width: image.width(),
        height: image.height(),
        file_stem: request.file_stem().to_string(),
    })
}

fn png_dimensions(png: &[u8]) -> Result<(u32, u32), ComposeError> {
    let image = image::load_from_memory(png).map_err(ComposeError::Decode)?;
    Ok((image.width(), image.height()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn config() -> ComposeConfig {
        ComposeConfig::from_fonts(Fonts::none())
    }

    fn portrait_png(width: u32, height: u32) -> Vec<u8> {
        renderer::encode_png(&RgbaImage::from_pixel(width, height, Rgba([200, 10, 10, 255]))).unwrap()
    }

    #[test]
    fn test_compose_without_portrait() {
        let sheet = compose_with_config(&SheetRequest::new(), &config()).unwrap();
        assert_eq!((sheet.width, sheet.height), (1010, 530));
        assert_eq!(sheet.file_stem, "output");
        let decoded = image::load_from_memory(&sheet.png).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (1010, 530));
    }

    #[test]
    fn test_compose_with_portrait() {
        let request = SheetRequest::new().with_portrait(portrait_png(640, 480));
        let sheet = compose_with_config(&request, &config()).unwrap();
        assert_eq!((sheet.width, sheet.height), (1010, 500));

        let decoded = image::load_from_memory(&sheet.png).unwrap().to_rgba8();
        // Portrait placed at (0, 85) with size 320x240
        assert_eq!(*decoded.get_pixel(160, 200), Rgba([200, 10, 10, 255]));
        assert_eq!(*decoded.get_pixel(160, 40), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_undecodable_portrait_is_skipped() {
        let request = SheetRequest::new().with_portrait(b"nope".to_vec());
        let sheet = compose_with_config(&request, &config()).unwrap();
        assert_eq!(sheet.height, 530);
    }

    #[test]
    fn test_config_builders() {
        let config = config()
            .with_mirrored(true)
            .with_debug(true)
            .with_font_scale(-2.0);
        assert!(config.layout.mirrored);
        assert!(config.raster.debug_outlines);
        assert_eq!(config.font_scale, 1.0);
        assert_eq!(config.clone().with_font_scale(1.5).font_scale, 1.5);
    }

    #[test]
    fn test_data_url() {
        let sheet = ComposedSheet {
            png: vec![1, 2, 3],
            width: 1,
            height: 1,
            file_stem: "x".to_string(),
        };
        assert_eq!(sheet.to_data_url(), "data:image/png;base64,AQID");
    }

    #[test]
    fn test_file_name_stays_in_one_component() {
        let named = |stem: &str| ComposedSheet {
            png: Vec::new(),
            width: 1,
            height: 1,
            file_stem: stem.to_string(),
        };
        assert_eq!(named("Kiri").file_name(), "Kiri.png");
        assert_eq!(named("../../etc/x").file_name(), ".._.._etc_x.png");
        assert_eq!(named("a\\b:c").file_name(), "a_b_c.png");
        assert_eq!(named("..").file_name(), "output.png");

        let dir = std::path::Path::new("/tmp/sheets");
        let path = dir.join(named("../escape").file_name());
        assert_eq!(path.parent(), Some(dir));
    }

    #[test]
    fn test_downscaled_sheet() {
        let sheet = compose_with_config(&SheetRequest::new(), &config()).unwrap();
        let half = sheet.downscaled(0.5).unwrap();
        assert_eq!((half.width, half.height), (505, 265));
        assert!(sheet.downscaled(2.0).is_err());
    }

    #[test]
    fn test_compose_tiled_dimensions() {
        let sheet = compose_tiled(&SheetRequest::new().with_name("Kiri"), &config(), None).unwrap();
        assert_eq!((sheet.width, sheet.height), (504, 864));
        assert_eq!(sheet.file_stem, "Kiri");
    }

    #[test]
    fn test_compose_tiled_follows_template_size() {
        let template = RgbaImage::from_pixel(600, 900, Rgba([0, 0, 255, 255]));
        let sheet = compose_tiled(&SheetRequest::new(), &config(), Some(&template)).unwrap();
        assert_eq!((sheet.width, sheet.height), (600, 948));
    }
}
