//! Layout computation
//!
//! Everything here is pure geometry: a request, a configuration and a text
//! measurer go in, positioned regions and text runs come out. Nothing is
//! drawn and nothing fails.

use crate::font::{FontSizes, TextMeasure};
use crate::sheet::{AttributeGroup, SheetRequest};

use super::config::{LayoutConfig, TileConfig};
use super::types::*;

/// Fit a portrait of `src_width` x `src_height` into the image region.
///
/// The portrait fills the region width; when that makes it taller than the
/// bound, the height is clamped and the width follows the aspect ratio.
/// Returns `None` for a degenerate source.
pub fn fit_portrait(src_width: u32, src_height: u32, config: &LayoutConfig) -> Option<(u32, u32)> {
    if src_width == 0 || src_height == 0 {
        return None;
    }
    let (w, h) = (src_width as u64, src_height as u64);
    let mut target_w = config.image_area_width as u64;
    let mut target_h = target_w * h / w;
    if target_h > config.max_portrait_height as u64 {
        target_h = config.max_portrait_height as u64;
        target_w = target_h * w / h;
    }
    Some((target_w.max(1) as u32, target_h.max(1) as u32))
}

/// Compute the sheet layout.
///
/// `portrait_size` is the decoded portrait's pixel size, if there is one.
pub fn compute(
    request: &SheetRequest,
    portrait_size: Option<(u32, u32)>,
    config: &LayoutConfig,
    sizes: &FontSizes,
    measure: &dyn TextMeasure,
) -> SheetLayout {
    let fitted = portrait_size.and_then(|(w, h)| fit_portrait(w, h, config));
    let image_height = fitted.map_or(config.default_image_height, |(_, h)| h);
    let height = (image_height + config.char_info_height).max(config.content_height);
    let width = config.total_width();

    let (image_x, stats_x) = if config.mirrored {
        (config.stats_area_width as i32, 0)
    } else {
        (0, config.image_area_width as i32)
    };
    let image_area = BoundingBox::new(image_x, 0, config.image_area_width, height);
    let stats_area = BoundingBox::new(stats_x, 0, config.stats_area_width, height);

    // Portrait sits centred in the part of the image region above the info band
    let portrait_area_height = height - config.char_info_height;
    let portrait = fitted.map(|(w, h)| {
        let x = image_x + (config.image_area_width.saturating_sub(w) / 2) as i32;
        let y = (portrait_area_height.saturating_sub(h) / 2) as i32;
        PortraitPlacement {
            bounds: BoundingBox::new(x, y, w, h),
        }
    });

    let mut texts = Vec::with_capacity(22);
    let info_y = portrait_area_height as i32;

    texts.push(TextRun {
        role: TextRole::Faction,
        content: request.faction.label().to_string(),
        position: Point::new(image_x + config.faction_offset.0, info_y + config.faction_offset.1),
        font: FontRole::Small,
        ink: Ink::Text,
    });

    let name = request.display_name();
    let available = config.image_area_width.saturating_sub(config.name_margin) as f32;
    let name_font = if measure.text_width(name, sizes.small) > available {
        FontRole::Tiny
    } else {
        FontRole::Small
    };
    texts.push(TextRun {
        role: TextRole::Name,
        content: name.to_string(),
        position: Point::new(image_x + config.name_offset.0, info_y + config.name_offset.1),
        font: name_font,
        ink: Ink::Text,
    });

    let left = stats_x + config.stats_indent;
    let mut y = config.stats_top;
    for group in AttributeGroup::ALL {
        texts.push(TextRun {
            role: TextRole::GroupTitle(group),
            content: format!("【{}】：{}", group.label(), request.scores.get(group)),
            position: Point::new(left, y),
            font: FontRole::Large,
            ink: Ink::Text,
        });
        y += config.line_height;

        let mut x = left;
        for skill in group.skills() {
            let content = format!("{}:{}", skill.label(), request.skill_value(skill));
            let advance = measure.text_width(&content, sizes.medium).ceil() as i32;
            texts.push(TextRun {
                role: TextRole::Skill(skill),
                content,
                position: Point::new(x, y),
                font: FontRole::Medium,
                ink: ink_for(request, skill),
            });
            x += advance + config.skill_gap;
        }
        y += config.line_height;
    }

    SheetLayout {
        width,
        height,
        image_area,
        stats_area,
        portrait,
        texts,
    }
}

/// Compute the vertical stats strip of the tiled sheet
pub fn compute_strip(
    request: &SheetRequest,
    config: &TileConfig,
    measure: &dyn TextMeasure,
) -> StripLayout {
    let px = config.font_px as f32;
    let font = FontRole::Fixed(config.font_px);
    let advance = config.font_px as i32 + config.margin;
    // Non-signature skills line up with the text after the star
    let aligned_x = config.margin + measure.text_width("★", px).round() as i32 + config.signature_indent;

    let mut texts = Vec::with_capacity(24);
    let mut y = config.first_line_y;
    for group in AttributeGroup::ALL {
        texts.push(TextRun {
            role: TextRole::GroupTitle(group),
            content: format!("【{}】{}", group.label(), request.scores.get(group)),
            position: Point::new(config.margin, y),
            font,
            ink: Ink::Text,
        });
        y += advance;

        for skill in group.skills() {
            let x = if skill.is_signature() {
                config.margin + config.signature_indent
            } else {
                aligned_x
            };
            texts.push(TextRun {
                role: TextRole::Skill(skill),
                content: format!("{}: {}", skill.label(), request.skill_value(skill)),
                position: Point::new(x, y),
                font,
                ink: ink_for(request, skill),
            });
            y += advance;
        }
        y += config.group_gap;
    }

    StripLayout {
        width: config.strip_size.0,
        height: config.strip_size.1,
        texts,
    }
}

/// Compute cell placement and the footer of the tiled sheet
pub fn compute_tiles(
    request: &SheetRequest,
    config: &TileConfig,
    measure: &dyn TextMeasure,
) -> TiledLayout {
    let (sheet_w, sheet_h) = config.sheet_size;
    let (cell_w, cell_h) = config.cell_size;
    let sheet = BoundingBox::new(0, 0, sheet_w, sheet_h);
    let count = (config.strip_size.1 / cell_h.max(1)).min(4);

    let cells = (0..count)
        .map(|i| {
            let col = (i % 2) as i32;
            let row = (i / 2) as i32;
            let destination = Point::new(
                config.sheet_margin.0 + col * (cell_w as i32 + config.cell_gap.0),
                config.sheet_margin.1 + row * (cell_h as i32 + config.cell_gap.1),
            );
            let target = BoundingBox::new(destination.x, destination.y, cell_w, cell_h);
            TileCell {
                source: BoundingBox::new(0, (i * cell_h) as i32, cell_w, cell_h),
                destination,
                fits: target.fits_within(&sheet),
            }
        })
        .collect();

    let content = format!("{} | {}", request.faction.label(), request.file_stem());
    let max_width = sheet_w as f32 - 2.0 * config.sheet_margin.0 as f32;
    let step = config.footer_font_step.max(1);
    let mut px = config.footer_font_px;
    let mut width = measure.text_width(&content, px as f32);
    while width > max_width && px > config.footer_min_font_px && px > step {
        px -= step;
        width = measure.text_width(&content, px as f32);
    }
    let x = (sheet_w as i32 - width as i32).div_euclid(2);

    TiledLayout {
        sheet_width: sheet_w,
        sheet_height: sheet_h,
        height: sheet_h + config.footer_height,
        cells,
        footer: TextRun {
            role: TextRole::Footer,
            content,
            position: Point::new(x, sheet_h as i32),
            font: FontRole::Fixed(px),
            ink: Ink::Text,
        },
    }
}

fn ink_for(request: &SheetRequest, skill: crate::sheet::Skill) -> Ink {
    if request.skills.is_acquired(skill) {
        Ink::Learned
    } else {
        Ink::Text
    }
}
