//! Tiled sheet: a stats strip cut into cells and pasted onto a template

use std::path::Path;

use image::imageops;
use image::RgbaImage;

use crate::font::{FontSizes, Fonts};
use crate::layout::{Ink, StripLayout, TiledLayout};
use crate::stylesheet::Palette;

use super::raster::draw_text;

/// Paint the vertical stats strip
pub fn render_strip(layout: &StripLayout, palette: &Palette, fonts: &Fonts) -> RgbaImage {
    let mut strip = RgbaImage::from_pixel(layout.width, layout.height, palette.tile_background);
    let sizes = FontSizes::default();
    for run in &layout.texts {
        let color = match run.ink {
            Ink::Text => palette.tile_text,
            Ink::Learned => palette.tile_learned,
        };
        draw_text(&mut strip, fonts, run, run.font.px(&sizes), color);
    }
    strip
}

/// Load a template sheet; an unreadable file is skipped with a warning
pub fn load_template(path: &Path) -> Option<RgbaImage> {
    match image::open(path) {
        Ok(image) => Some(image.to_rgba8()),
        Err(e) => {
            log::warn!("template '{}' unusable, using a plain sheet: {}", path.display(), e);
            None
        }
    }
}

/// Cut `strip` into cells, paste them onto the template and add the footer.
///
/// Without a template the cells go onto a plain sheet in the strip
/// background colour. Cells that would spill over the sheet edge are
/// skipped.
pub fn render_tiled(
    strip: &RgbaImage,
    layout: &TiledLayout,
    template: Option<&RgbaImage>,
    palette: &Palette,
    fonts: &Fonts,
) -> RgbaImage {
    let mut sheet = match template {
        Some(template) => template.clone(),
        None => RgbaImage::from_pixel(layout.sheet_width, layout.sheet_height, palette.tile_background),
    };

    for (index, cell) in layout.cells.iter().enumerate() {
        if !cell.fits {
            log::warn!(
                "cell {} does not fit the {}x{} sheet at {},{}; skipped",
                index,
                layout.sheet_width,
                layout.sheet_height,
                cell.destination.x,
                cell.destination.y
            );
            continue;
        }
        let piece = imageops::crop_imm(
            strip,
            cell.source.x.max(0) as u32,
            cell.source.y.max(0) as u32,
            cell.source.width,
            cell.source.height,
        )
        .to_image();
        imageops::replace(
            &mut sheet,
            &piece,
            cell.destination.x as i64,
            cell.destination.y as i64,
        );
    }

    // Footer band stays transparent apart from its text
    let mut output = RgbaImage::new(sheet.width(), layout.height);
    imageops::replace(&mut output, &sheet, 0, 0);
    let footer = &layout.footer;
    draw_text(&mut output, fonts, footer, footer.font.px(&FontSizes::default()), palette.footer_text);
    output
}
