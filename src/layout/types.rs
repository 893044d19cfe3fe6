//! Core types for the layout engine

use std::fmt;

use crate::font::FontSizes;
use crate::sheet::{AttributeGroup, Skill};

/// A pixel position on the canvas
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// A pixel rectangle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BoundingBox {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl BoundingBox {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge x-coordinate (exclusive)
    pub fn right(&self) -> i32 {
        self.x + self.width as i32
    }

    /// Bottom edge y-coordinate (exclusive)
    pub fn bottom(&self) -> i32 {
        self.y + self.height as i32
    }

    /// Check if this box lies entirely inside `outer`
    pub fn fits_within(&self, outer: &BoundingBox) -> bool {
        self.x >= outer.x
            && self.y >= outer.y
            && self.right() <= outer.right()
            && self.bottom() <= outer.bottom()
    }
}

/// Which of the computed font sizes a text run uses
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Large,
    Medium,
    Small,
    Tiny,
    /// An explicit pixel size, used by the tiled sheet
    Fixed(u32),
}

impl FontRole {
    /// Pixel size of this role under `sizes`
    pub fn px(self, sizes: &FontSizes) -> f32 {
        match self {
            FontRole::Large => sizes.large,
            FontRole::Medium => sizes.medium,
            FontRole::Small => sizes.small,
            FontRole::Tiny => sizes.tiny,
            FontRole::Fixed(px) => px as f32,
        }
    }
}

/// Which stylesheet colour a text run is painted with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ink {
    Text,
    Learned,
}

/// What a text run shows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextRole {
    GroupTitle(AttributeGroup),
    Skill(Skill),
    Faction,
    Name,
    Footer,
}

impl fmt::Display for TextRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TextRole::GroupTitle(g) => write!(f, "title:{}", g),
            TextRole::Skill(s) => write!(f, "skill:{}", s),
            TextRole::Faction => f.write_str("faction"),
            TextRole::Name => f.write_str("name"),
            TextRole::Footer => f.write_str("footer"),
        }
    }
}

/// A positioned line of text; `position` is the top-left of the line box
#[derive(Debug, Clone, PartialEq)]
pub struct TextRun {
    pub role: TextRole,
    pub content: String,
    pub position: Point,
    pub font: FontRole,
    pub ink: Ink,
}

/// Where the resized portrait goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortraitPlacement {
    pub bounds: BoundingBox,
}

/// The complete geometry of a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetLayout {
    pub width: u32,
    pub height: u32,
    /// Portrait plus faction and name
    pub image_area: BoundingBox,
    /// Group titles and skills
    pub stats_area: BoundingBox,
    pub portrait: Option<PortraitPlacement>,
    pub texts: Vec<TextRun>,
}

impl SheetLayout {
    /// Find the first run with the given role
    pub fn text(&self, role: TextRole) -> Option<&TextRun> {
        self.texts.iter().find(|t| t.role == role)
    }

    /// One line per region and text run, for debugging and snapshots
    pub fn describe(&self) -> String {
        let mut out = format!("canvas {}x{}\n", self.width, self.height);
        out.push_str(&describe_box("image", &self.image_area));
        out.push_str(&describe_box("stats", &self.stats_area));
        if let Some(p) = &self.portrait {
            out.push_str(&describe_box("portrait", &p.bounds));
        }
        for run in &self.texts {
            out.push_str(&describe_run(run));
        }
        out
    }
}

/// The vertical stats strip the tiled sheet is cut from
#[derive(Debug, Clone, PartialEq)]
pub struct StripLayout {
    pub width: u32,
    pub height: u32,
    pub texts: Vec<TextRun>,
}

impl StripLayout {
    pub fn describe(&self) -> String {
        let mut out = format!("strip {}x{}\n", self.width, self.height);
        for run in &self.texts {
            out.push_str(&describe_run(run));
        }
        out
    }
}

/// One strip cell and its destination on the template sheet
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileCell {
    /// Area of the strip to cut
    pub source: BoundingBox,
    /// Top-left on the sheet
    pub destination: Point,
    /// False when the cell would spill over the sheet edge
    pub fits: bool,
}

/// Geometry of a tiled sheet: cells plus the footer line
#[derive(Debug, Clone, PartialEq)]
pub struct TiledLayout {
    pub sheet_width: u32,
    pub sheet_height: u32,
    /// Sheet height plus footer band
    pub height: u32,
    pub cells: Vec<TileCell>,
    pub footer: TextRun,
}

fn describe_box(name: &str, b: &BoundingBox) -> String {
    format!("{} {},{} {}x{}\n", name, b.x, b.y, b.width, b.height)
}

fn describe_run(run: &TextRun) -> String {
    let ink = match run.ink {
        Ink::Text => "",
        Ink::Learned => " *",
    };
    format!(
        "{} {},{} {:?}{} {}\n",
        run.role, run.position.x, run.position.y, run.font, ink, run.content
    )
}
