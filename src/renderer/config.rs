//! Configuration for raster rendering

use image::imageops::FilterType;
use image::Rgba;

/// Configuration options for painting a layout
#[derive(Debug, Clone)]
pub struct RasterConfig {
    /// Draw region and portrait outlines on top of the sheet
    pub debug_outlines: bool,

    /// Colour of debug outlines
    pub outline_color: Rgba<u8>,

    /// Filter used when resizing portraits and finished sheets
    pub filter: FilterType,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            debug_outlines: false,
            outline_color: Rgba([255, 0, 255, 255]),
            filter: FilterType::Lanczos3,
        }
    }
}

impl RasterConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set whether debug outlines are drawn
    pub fn with_debug_outlines(mut self, enabled: bool) -> Self {
        self.debug_outlines = enabled;
        self
    }

    /// Set the debug outline colour
    pub fn with_outline_color(mut self, color: Rgba<u8>) -> Self {
        self.outline_color = color;
        self
    }

    /// Set the resize filter
    pub fn with_filter(mut self, filter: FilterType) -> Self {
        self.filter = filter;
        self
    }
}
