//! Layout engine for computing region and text positions
//!
//! This module takes a sheet request and computes the spatial layout,
//! producing a [`SheetLayout`] (or the strip and tile geometry of the tiled
//! sheet) that the renderer paints without further decisions.

pub mod config;
pub mod engine;
pub mod types;

pub use config::{LayoutConfig, TileConfig};
pub use engine::{compute, compute_strip, compute_tiles, fit_portrait};
pub use types::*;
