//! Raster painting of sheet layouts

use std::io::Cursor;

use ab_glyph::Font;
use image::imageops;
use image::{ImageFormat, Pixel, Rgba, RgbaImage};

use crate::error::ComposeError;
use crate::font::{FontSizes, Fonts};
use crate::layout::{BoundingBox, Ink, SheetLayout, TextRun};
use crate::stylesheet::Palette;

use super::RasterConfig;

/// Paint a sheet layout.
///
/// `portrait` is the decoded portrait at its original size; it is resized to
/// the placement the layout computed.
pub fn render_sheet(
    layout: &SheetLayout,
    portrait: Option<&RgbaImage>,
    palette: &Palette,
    fonts: &Fonts,
    sizes: &FontSizes,
    config: &RasterConfig,
) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(layout.width, layout.height, palette.background);

    if let (Some(placement), Some(image)) = (&layout.portrait, portrait) {
        let flat = flatten_portrait(image, &placement.bounds, palette.background, config);
        imageops::replace(
            &mut canvas,
            &flat,
            placement.bounds.x as i64,
            placement.bounds.y as i64,
        );
    }

    for run in &layout.texts {
        let color = match run.ink {
            Ink::Text => palette.text,
            Ink::Learned => palette.learned,
        };
        draw_text(&mut canvas, fonts, run, run.font.px(sizes), color);
    }

    if config.debug_outlines {
        draw_outline(&mut canvas, &layout.image_area, config.outline_color);
        draw_outline(&mut canvas, &layout.stats_area, config.outline_color);
        if let Some(placement) = &layout.portrait {
            draw_outline(&mut canvas, &placement.bounds, config.outline_color);
        }
    }

    canvas
}

/// Decode portrait bytes; undecodable data is skipped with a warning
pub fn decode_portrait(bytes: &[u8]) -> Option<RgbaImage> {
    match image::load_from_memory(bytes) {
        Ok(image) => Some(image.to_rgba8()),
        Err(e) => {
            log::warn!("skipping portrait: {}", e);
            None
        }
    }
}

/// Resize the portrait into `bounds` and composite it over the background
/// so transparent areas show the sheet colour, not what lies beneath
fn flatten_portrait(
    image: &RgbaImage,
    bounds: &BoundingBox,
    background: Rgba<u8>,
    config: &RasterConfig,
) -> RgbaImage {
    let resized = imageops::resize(image, bounds.width, bounds.height, config.filter);
    let mut flat = RgbaImage::from_pixel(bounds.width, bounds.height, background);
    imageops::overlay(&mut flat, &resized, 0, 0);
    flat
}

/// Paint one text run; without a font nothing is drawn
pub(crate) fn draw_text(canvas: &mut RgbaImage, fonts: &Fonts, run: &TextRun, px: f32, color: Rgba<u8>) {
    let Some(face) = fonts.face() else {
        return;
    };
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    let glyphs = face.layout_glyphs(
        &run.content,
        px,
        run.position.x as f32,
        run.position.y as f32,
    );

    for glyph in glyphs {
        let Some(outline) = face.font().outline_glyph(glyph) else {
            continue;
        };
        let bounds = outline.px_bounds();
        let (left, top) = (bounds.min.x as i32, bounds.min.y as i32);
        outline.draw(|gx, gy, coverage| {
            let x = left + gx as i32;
            let y = top + gy as i32;
            if x < 0 || y < 0 || x >= width || y >= height {
                return;
            }
            let mut src = color;
            src.0[3] = (f32::from(color.0[3]) * coverage.clamp(0.0, 1.0)).round() as u8;
            canvas.get_pixel_mut(x as u32, y as u32).blend(&src);
        });
    }
}

/// Draw a one pixel rectangle outline clipped to the canvas
fn draw_outline(canvas: &mut RgbaImage, bounds: &BoundingBox, color: Rgba<u8>) {
    if bounds.width == 0 || bounds.height == 0 {
        return;
    }
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    let mut put = |x: i32, y: i32| {
        if x >= 0 && y >= 0 && x < width && y < height {
            canvas.put_pixel(x as u32, y as u32, color);
        }
    };
    let (right, bottom) = (bounds.right() - 1, bounds.bottom() - 1);
    for x in bounds.x..=right {
        put(x, bounds.y);
        put(x, bottom);
    }
    for y in bounds.y..=bottom {
        put(bounds.x, y);
        put(right, y);
    }
}

/// Encode an image as PNG bytes
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, ComposeError> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, ImageFormat::Png)
        .map_err(ComposeError::Encode)?;
    Ok(buffer.into_inner())
}

/// Resize finished PNG bytes by `factor`, which must lie in (0, 1]
pub fn downscale_png(png: &[u8], factor: f64) -> Result<Vec<u8>, ComposeError> {
    if !(factor > 0.0 && factor <= 1.0) {
        return Err(ComposeError::InvalidScale(factor));
    }
    let image = image::load_from_memory(png)
        .map_err(ComposeError::Decode)?
        .to_rgba8();
    let width = ((f64::from(image.width()) * factor) as u32).max(1);
    let height = ((f64::from(image.height()) * factor) as u32).max(1);
    let resized = imageops::resize(&image, width, height, imageops::FilterType::Lanczos3);
    encode_png(&resized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{FontRole, Point, PortraitPlacement, TextRole};
    use crate::stylesheet::Stylesheet;

    fn blank_layout(width: u32, height: u32) -> SheetLayout {
        SheetLayout {
            width,
            height,
            image_area: BoundingBox::new(0, 0, width / 2, height),
            stats_area: BoundingBox::new((width / 2) as i32, 0, width / 2, height),
            portrait: None,
            texts: vec![],
        }
    }

    #[test]
    fn test_background_fill() {
        let palette = Stylesheet::default()
            .with_color("background", "#336699")
            .with_background_alpha(50)
            .palette();
        let canvas = render_sheet(
            &blank_layout(20, 10),
            None,
            &palette,
            &Fonts::none(),
            &FontSizes::default(),
            &RasterConfig::default(),
        );
        assert_eq!(canvas.dimensions(), (20, 10));
        assert_eq!(*canvas.get_pixel(19, 9), Rgba([0x33, 0x66, 0x99, 127]));
    }

    #[test]
    fn test_portrait_is_flattened_over_background() {
        let mut layout = blank_layout(40, 40);
        layout.portrait = Some(PortraitPlacement {
            bounds: BoundingBox::new(10, 10, 4, 4),
        });
        let transparent = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 0]));
        let palette = Stylesheet::default().palette();

        let canvas = render_sheet(
            &layout,
            Some(&transparent),
            &palette,
            &Fonts::none(),
            &FontSizes::default(),
            &RasterConfig::default(),
        );
        assert_eq!(*canvas.get_pixel(11, 11), palette.background);
    }

    #[test]
    fn test_opaque_portrait_is_pasted() {
        let mut layout = blank_layout(40, 40);
        layout.portrait = Some(PortraitPlacement {
            bounds: BoundingBox::new(10, 10, 4, 4),
        });
        let red = RgbaImage::from_pixel(8, 8, Rgba([255, 0, 0, 255]));
        let palette = Stylesheet::default().palette();

        let canvas = render_sheet(
            &layout,
            Some(&red),
            &palette,
            &Fonts::none(),
            &FontSizes::default(),
            &RasterConfig::default(),
        );
        assert_eq!(*canvas.get_pixel(12, 12), Rgba([255, 0, 0, 255]));
        assert_eq!(*canvas.get_pixel(9, 9), palette.background);
        assert_eq!(*canvas.get_pixel(14, 14), palette.background);
    }

    #[test]
    fn test_text_without_font_is_skipped() {
        let mut layout = blank_layout(100, 60);
        layout.texts.push(TextRun {
            role: TextRole::Name,
            content: "Kiri".to_string(),
            position: Point::new(5, 5),
            font: FontRole::Small,
            ink: Ink::Text,
        });
        let palette = Stylesheet::default().palette();
        let canvas = render_sheet(
            &layout,
            None,
            &palette,
            &Fonts::none(),
            &FontSizes::default(),
            &RasterConfig::default(),
        );
        assert!(canvas.pixels().all(|p| *p == palette.background));
    }

    #[test]
    fn test_debug_outlines() {
        let palette = Stylesheet::default().palette();
        let config = RasterConfig::default().with_debug_outlines(true);
        let canvas = render_sheet(
            &blank_layout(20, 10),
            None,
            &palette,
            &Fonts::none(),
            &FontSizes::default(),
            &config,
        );
        assert_eq!(*canvas.get_pixel(0, 0), config.outline_color);
        assert_eq!(*canvas.get_pixel(10, 5), config.outline_color);
        assert_eq!(*canvas.get_pixel(5, 5), palette.background);
    }

    #[test]
    fn test_decode_portrait_rejects_garbage() {
        assert!(decode_portrait(b"not an image").is_none());
    }

    #[test]
    fn test_encode_and_downscale() {
        let image = RgbaImage::from_pixel(101, 40, Rgba([10, 20, 30, 255]));
        let png = encode_png(&image).unwrap();
        assert_eq!(&png[1..4], b"PNG");

        let half = downscale_png(&png, 0.5).unwrap();
        let decoded = image::load_from_memory(&half).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (50, 20));
    }

    #[test]
    fn test_downscale_rejects_bad_factor() {
        let png = encode_png(&RgbaImage::new(4, 4)).unwrap();
        for factor in [0.0, -1.0, 1.5, f64::NAN] {
            assert!(matches!(
                downscale_png(&png, factor),
                Err(ComposeError::InvalidScale(_))
            ));
        }
    }

    #[test]
    fn test_downscale_rejects_non_png() {
        assert!(matches!(
            downscale_png(b"garbage", 0.5),
            Err(ComposeError::Decode(_))
        ));
    }
}
