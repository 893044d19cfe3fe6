//! Font loading, text measurement and size normalisation
//!
//! Fonts are optional everywhere. When no font file can be loaded the layout
//! falls back to [`ApproxMetrics`] and the renderer skips text, so a sheet is
//! always produced.

use std::fmt;
use std::path::{Path, PathBuf};

use ab_glyph::{point, Font, FontArc, Glyph, PxScale, ScaleFont};
use thiserror::Error;

/// Text used to compare the visual height of two fonts
pub const SAMPLE_TEXT_FOR_MEASURE: &str = "あいうえおアイウエオ漢字";

/// Base pixel sizes of the four text roles (large, medium, small, tiny)
pub const TARGET_FONT_SIZES: [u32; 4] = [40, 35, 28, 20];

/// Pixel size the scale presets are expressed against
const PRESET_BASE: f32 = 28.0;

/// Per-font sizes that make the bundled fonts look alike at base 28
const FONT_SIZE_PRESETS: &[(&str, u32)] = &[
    ("DelaGothicOne-Regular", 20),
    ("DotGothic16-Regular", 23),
    ("HachiMaruPop-Regular", 22),
    ("KaiseiTokumin-Regular", 24),
    ("KosugiMaru-Regular", 23),
    ("MPLUSRounded1c-Regular", 23),
    ("NotoSansJP-Regular", 26),
    ("NotoSerifJP-Regular", 26),
    ("ReggaeOne-Regular", 21),
    ("WDXLLubrifontJPN-Regular", 30),
    ("YujiMai-Regular", 22),
    ("ZenKurenaido-Regular", 26),
    ("ZenMaruGothic-Regular", 26),
];

/// Well-known locations of fonts with Japanese coverage, tried in order
const SYSTEM_FONT_CANDIDATES: &[&str] = &[
    "assets/fonts/NotoSansJP-Regular.ttf",
    "/usr/share/fonts/opentype/noto/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/google-noto-cjk/NotoSansCJK-Regular.ttc",
    "/usr/share/fonts/truetype/fonts-japanese-gothic.ttf",
    "/System/Library/Fonts/ヒラギノ角ゴシック W3.ttc",
    "/Library/Fonts/Arial Unicode.ttf",
    "C:\\Windows\\Fonts\\meiryo.ttc",
    "C:\\Windows\\Fonts\\msgothic.ttc",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
];

/// Errors that can occur when loading a font file
#[derive(Error, Debug)]
pub enum FontError {
    #[error("Failed to read font file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid font data: {0}")]
    InvalidFont(#[from] ab_glyph::InvalidFont),
}

/// Measures text for layout purposes
pub trait TextMeasure {
    /// Advance width of `text` at `px`
    fn text_width(&self, text: &str, px: f32) -> f32;

    /// Height of the inked area of `text` at `px`
    fn ink_height(&self, text: &str, px: f32) -> f32;
}

/// Font-free metrics: ASCII is half an em wide, everything else one em
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproxMetrics;

impl TextMeasure for ApproxMetrics {
    fn text_width(&self, text: &str, px: f32) -> f32 {
        text.chars()
            .map(|c| if c.is_ascii() { px * 0.5 } else { px })
            .sum()
    }

    fn ink_height(&self, text: &str, px: f32) -> f32 {
        if text.is_empty() {
            0.0
        } else {
            px
        }
    }
}

/// A loaded outline font
#[derive(Clone)]
pub struct FontFace {
    font: FontArc,
    source: PathBuf,
}

impl fmt::Debug for FontFace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontFace")
            .field("source", &self.source)
            .finish()
    }
}

impl FontFace {
    /// Load a TTF/OTF (or the first face of a TTC) from disk
    pub fn load(path: &Path) -> Result<Self, FontError> {
        let bytes = std::fs::read(path)?;
        let font = FontArc::try_from_vec(bytes)?;
        Ok(Self {
            font,
            source: path.to_path_buf(),
        })
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    /// Position the glyphs of `text` with the top-left of the line at (x, y)
    pub fn layout_glyphs(&self, text: &str, px: f32, x: f32, y: f32) -> Vec<Glyph> {
        let scale = PxScale::from(px);
        let scaled = self.font.as_scaled(scale);
        let baseline = y + scaled.ascent();
        let mut caret = x;
        let mut prev = None;
        let mut glyphs = Vec::with_capacity(text.len());

        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                caret += scaled.kern(prev, id);
            }
            glyphs.push(Glyph {
                id,
                scale,
                position: point(caret, baseline),
            });
            caret += scaled.h_advance(id);
            prev = Some(id);
        }
        glyphs
    }

    pub(crate) fn font(&self) -> &FontArc {
        &self.font
    }
}

impl TextMeasure for FontFace {
    fn text_width(&self, text: &str, px: f32) -> f32 {
        let scaled = self.font.as_scaled(PxScale::from(px));
        let mut width = 0.0;
        let mut prev = None;
        for ch in text.chars() {
            let id = scaled.glyph_id(ch);
            if let Some(prev) = prev {
                width += scaled.kern(prev, id);
            }
            width += scaled.h_advance(id);
            prev = Some(id);
        }
        width
    }

    fn ink_height(&self, text: &str, px: f32) -> f32 {
        let mut top = f32::MAX;
        let mut bottom = f32::MIN;
        for glyph in self.layout_glyphs(text, px, 0.0, 0.0) {
            if let Some(outline) = self.font.outline_glyph(glyph) {
                let bounds = outline.px_bounds();
                top = top.min(bounds.min.y);
                bottom = bottom.max(bounds.max.y);
            }
        }
        if bottom > top {
            bottom - top
        } else {
            0.0
        }
    }
}

/// The font used for painting plus the reference font sizes are matched to
#[derive(Debug, Clone, Default)]
pub struct Fonts {
    face: Option<FontFace>,
    reference: Option<FontFace>,
}

impl Fonts {
    /// No fonts: approximate metrics, no text painted
    pub fn none() -> Self {
        Self::default()
    }

    /// Use an already loaded face as both the painting and reference font
    pub fn from_face(face: FontFace) -> Self {
        Self {
            reference: Some(face.clone()),
            face: Some(face),
        }
    }

    /// Load fonts with fallback: `primary`, then `reference`, then a
    /// discovered system font. Failures are logged, never returned.
    pub fn load(primary: Option<&Path>, reference: Option<&Path>) -> Self {
        let reference = reference.and_then(load_logged).or_else(discover_system_font);
        let face = primary
            .and_then(load_logged)
            .or_else(|| reference.clone());

        if face.is_none() {
            log::warn!("no usable font found; sheet text will not be drawn");
        }
        Self { face, reference }
    }

    /// Load a discovered system font only
    pub fn discover() -> Self {
        Self::load(None, None)
    }

    pub fn face(&self) -> Option<&FontFace> {
        self.face.as_ref()
    }

    pub fn reference(&self) -> Option<&FontFace> {
        self.reference.as_ref()
    }

    /// The measurer layout should use
    pub fn measure(&self) -> &dyn TextMeasure {
        match &self.face {
            Some(face) => face,
            None => &ApproxMetrics,
        }
    }
}

fn load_logged(path: &Path) -> Option<FontFace> {
    match FontFace::load(path) {
        Ok(face) => Some(face),
        Err(e) => {
            log::warn!("failed to load font '{}': {}", path.display(), e);
            None
        }
    }
}

fn discover_system_font() -> Option<FontFace> {
    SYSTEM_FONT_CANDIDATES
        .iter()
        .map(Path::new)
        .filter(|p| p.is_file())
        .find_map(|p| FontFace::load(p).ok())
        .inspect(|face| log::debug!("using system font {}", face.source().display()))
}

/// Pixel sizes for the four text roles of a sheet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FontSizes {
    pub large: f32,
    pub medium: f32,
    pub small: f32,
    pub tiny: f32,
}

impl Default for FontSizes {
    fn default() -> Self {
        Self {
            large: 40.0,
            medium: 35.0,
            small: 28.0,
            tiny: 20.0,
        }
    }
}

impl FontSizes {
    /// Sizes matched to the reference font's visual height, then scaled
    pub fn normalized(fonts: &Fonts, scale: f32) -> Self {
        let [large, medium, small, tiny] =
            TARGET_FONT_SIZES.map(|base| normalized_size(fonts, base, scale));
        Self {
            large,
            medium,
            small,
            tiny,
        }
    }
}

/// Size for `base` so the painting font's sample ink height matches the
/// reference font's, multiplied by `scale`
pub fn normalized_size(fonts: &Fonts, base: u32, scale: f32) -> f32 {
    let base_px = base as f32;
    let matched = match (fonts.face(), fonts.reference()) {
        (Some(face), Some(reference)) => {
            let current = face.ink_height(SAMPLE_TEXT_FOR_MEASURE, base_px).max(1.0);
            let target = reference.ink_height(SAMPLE_TEXT_FOR_MEASURE, base_px).max(1.0);
            (base_px * target / current).round().max(1.0)
        }
        _ => base_px,
    };
    (matched * scale).round().max(1.0)
}

/// Font scale preset for a font file stem; unknown fonts scale by 1
pub fn scale_preset(font_name: &str) -> f32 {
    FONT_SIZE_PRESETS
        .iter()
        .find(|(name, _)| *name == font_name)
        .map(|(_, px)| *px as f32 / PRESET_BASE)
        .unwrap_or(1.0)
}

/// Font files in `dir` keyed by file stem, sorted case-insensitively.
///
/// A missing directory lists nothing.
pub fn list_local_fonts(dir: &Path) -> Vec<(String, PathBuf)> {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return Vec::new();
    };

    let mut fonts: Vec<(String, PathBuf)> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|e| e.to_str())
                .map(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc"))
                .unwrap_or(false)
        })
        .filter_map(|path| {
            let stem = path.file_stem()?.to_str()?.to_string();
            Some((stem, path))
        })
        .collect();

    fonts.sort_by_key(|(name, _)| name.to_lowercase());
    fonts
}
