//! Raster renderer for generating images from layouts
//!
//! This module takes a computed layout and paints it onto an RGBA canvas,
//! then encodes the result as PNG.

pub mod config;
pub mod raster;
pub mod tiles;

pub use config::RasterConfig;
pub use raster::{decode_portrait, downscale_png, encode_png, render_sheet};
pub use tiles::{load_template, render_strip, render_tiled};
