//! Configuration for the layout engine

/// Geometry of the portrait + stats sheet
#[derive(Debug, Clone)]
pub struct LayoutConfig {
    /// Width of the portrait / character info region
    pub image_area_width: u32,

    /// Width of the stats region
    pub stats_area_width: u32,

    /// Portrait height used when there is no portrait
    pub default_image_height: u32,

    /// Upper bound for the resized portrait height
    pub max_portrait_height: u32,

    /// Height of the faction + name band under the portrait
    pub char_info_height: u32,

    /// Minimum canvas height, the height the stats need
    pub content_height: u32,

    /// Y of the first group title
    pub stats_top: i32,

    /// Vertical distance between consecutive stats lines
    pub line_height: i32,

    /// Left inset of stats text inside the stats region
    pub stats_indent: i32,

    /// Horizontal gap between skill runs
    pub skill_gap: i32,

    /// Offset of the faction label from the info band origin
    pub faction_offset: (i32, i32),

    /// Offset of the name from the info band origin
    pub name_offset: (i32, i32),

    /// Horizontal margin the name must leave inside the image region
    pub name_margin: u32,

    /// Put the stats region on the left and the image region on the right
    pub mirrored: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            image_area_width: 320,
            stats_area_width: 690,
            default_image_height: 440,
            max_portrait_height: 390,
            char_info_height: 90,
            content_height: 500,
            stats_top: 20,
            line_height: 60,
            stats_indent: 20,
            skill_gap: 20,
            faction_offset: (10, 10),
            name_offset: (15, 50),
            name_margin: 40,
            mirrored: false,
        }
    }
}

impl LayoutConfig {
    /// Create a new configuration with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Total canvas width
    pub fn total_width(&self) -> u32 {
        self.image_area_width + self.stats_area_width
    }

    /// Swap the portrait and stats regions
    pub fn with_mirrored(mut self, mirrored: bool) -> Self {
        self.mirrored = mirrored;
        self
    }

    /// Set the region widths
    pub fn with_area_widths(mut self, image: u32, stats: u32) -> Self {
        self.image_area_width = image;
        self.stats_area_width = stats;
        self
    }

    /// Set the gap between skill runs
    pub fn with_skill_gap(mut self, gap: i32) -> Self {
        self.skill_gap = gap;
        self
    }
}

/// Geometry of the legacy tiled sheet
#[derive(Debug, Clone)]
pub struct TileConfig {
    /// Size of the stats strip before it is cut
    pub strip_size: (u32, u32),

    /// Font size of strip text
    pub font_px: u32,

    /// Left margin and line spacing of strip text
    pub margin: i32,

    /// Y of the first strip line
    pub first_line_y: i32,

    /// Extra space after each group
    pub group_gap: i32,

    /// Indent of the signature skill relative to the margin
    pub signature_indent: i32,

    /// Size of each cell cut from the strip
    pub cell_size: (u32, u32),

    /// Template sheet size
    pub sheet_size: (u32, u32),

    /// Offset of the first cell on the sheet
    pub sheet_margin: (i32, i32),

    /// Gap between cells on the sheet
    pub cell_gap: (i32, i32),

    /// Height of the footer band added under the sheet
    pub footer_height: u32,

    /// Footer font size before shrinking
    pub footer_font_px: u32,

    /// Footer stops shrinking once at or below this size
    pub footer_min_font_px: u32,

    /// Footer shrink step
    pub footer_font_step: u32,
}

impl Default for TileConfig {
    fn default() -> Self {
        Self {
            strip_size: (230, 1520),
            font_px: 35,
            margin: 20,
            first_line_y: 40,
            group_gap: 50,
            signature_indent: 5,
            cell_size: (230, 380),
            sheet_size: (504, 816),
            sheet_margin: (19, 25),
            cell_gap: (6, 6),
            footer_height: 48,
            footer_font_px: 50,
            footer_min_font_px: 25,
            footer_font_step: 2,
        }
    }
}

impl TileConfig {
    /// Set the template sheet size
    pub fn with_sheet_size(mut self, width: u32, height: u32) -> Self {
        self.sheet_size = (width, height);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = LayoutConfig::default();
        assert_eq!(config.image_area_width, 320);
        assert_eq!(config.stats_area_width, 690);
        assert_eq!(config.total_width(), 1010);
        assert_eq!(config.default_image_height, 440);
        assert_eq!(config.max_portrait_height, 390);
        assert!(!config.mirrored);
    }

    #[test]
    fn test_builder_pattern() {
        let config = LayoutConfig::new()
            .with_mirrored(true)
            .with_area_widths(300, 600)
            .with_skill_gap(40);

        assert!(config.mirrored);
        assert_eq!(config.total_width(), 900);
        assert_eq!(config.skill_gap, 40);
    }

    #[test]
    fn test_default_tile_config() {
        let config = TileConfig::default();
        assert_eq!(config.strip_size, (230, 1520));
        assert_eq!(config.cell_size, (230, 380));
        assert_eq!(config.sheet_size, (504, 816));
    }
}
