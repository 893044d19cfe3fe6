//! Tests that paint and measure with real outline fonts
//!
//! The fixtures under `tests/fixtures/fonts` are DejaVu faces; see the
//! `LICENSE` file next to them.

use std::path::PathBuf;

use image::{Rgba, RgbaImage};

use sheet_composer::font::{normalized_size, TextMeasure, SAMPLE_TEXT_FOR_MEASURE, TARGET_FONT_SIZES};
use sheet_composer::layout::{compute, FontRole, TextRole};
use sheet_composer::{
    compose_tiled, compose_with_config, AttributeGroup, ComposeConfig, FontFace, FontSizes, Fonts,
    LayoutConfig, Scores, SheetRequest, Skill, SkillFlags,
};

fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/fonts")
        .join(name)
}

fn mono() -> FontFace {
    FontFace::load(&fixture("DejaVuSansMono.ttf")).expect("fixture font loads")
}

fn serif() -> FontFace {
    FontFace::load(&fixture("DejaVuSerif.ttf")).expect("fixture font loads")
}

fn decode(png: &[u8]) -> RgbaImage {
    image::load_from_memory(png).expect("valid PNG").to_rgba8()
}

/// Mostly-covered pixels of the default learned ink over white
fn is_learned_ink(p: &Rgba<u8>) -> bool {
    p.0[0] > 200 && p.0[1] > 100 && p.0[1] < 230 && p.0[2] < 80
}

fn count(image: &RgbaImage, pred: impl Fn(&Rgba<u8>) -> bool) -> usize {
    image.pixels().filter(|p| pred(p)).count()
}

#[test]
fn test_acquired_skills_paint_learned_ink() {
    let config = ComposeConfig::from_fonts(Fonts::from_face(mono()));
    let scores = Scores::default().with(AttributeGroup::Body, 3);

    let plain = SheetRequest::new().with_scores(scores);
    let image = decode(&compose_with_config(&plain, &config).unwrap().png);
    assert_eq!(count(&image, is_learned_ink), 0);
    // Black text is still painted
    assert!(count(&image, |p| p.0[0] < 60 && p.0[3] == 255) > 0);

    let learned = plain.with_skills(SkillFlags::default().with(Skill::Melee));
    let image = decode(&compose_with_config(&learned, &config).unwrap().png);
    let orange = count(&image, is_learned_ink);
    assert!(orange > 0);

    // All of it sits on the first skill row of the stats region
    let row = image
        .enumerate_pixels()
        .filter(|(x, y, p)| *x >= 320 && (60..140).contains(y) && is_learned_ink(p))
        .count();
    assert_eq!(row, orange);
}

#[test]
fn test_long_name_drops_to_tiny_font() {
    let fonts = Fonts::from_face(mono());
    let sizes = FontSizes::normalized(&fonts, 1.0);
    let config = LayoutConfig::default();

    let layout = |name: &str| {
        let request = SheetRequest::new().with_name(name);
        compute(&request, None, &config, &sizes, fonts.measure())
    };

    let short = layout("Kiri");
    assert_eq!(short.text(TextRole::Name).unwrap().font, FontRole::Small);

    let long_name = "W".repeat(40);
    assert!(fonts.measure().text_width(&long_name, sizes.small) > 280.0);
    let long = layout(&long_name);
    assert_eq!(long.text(TextRole::Name).unwrap().font, FontRole::Tiny);
}

#[test]
fn test_name_is_painted_in_info_band() {
    let config = ComposeConfig::from_fonts(Fonts::from_face(mono()));
    let request = SheetRequest::new().with_name("W".repeat(40));
    let image = decode(&compose_with_config(&request, &config).unwrap().png);
    assert_eq!(image.dimensions(), (1010, 530));

    let dark = image
        .enumerate_pixels()
        .filter(|(x, y, p)| *x < 320 && *y >= 488 && p.0[0] < 100)
        .count();
    assert!(dark > 0);
}

#[test]
fn test_normalized_size_matches_reference_ink_height() {
    let (face, reference) = (mono(), serif());
    let fonts = Fonts::load(Some(&fixture("DejaVuSansMono.ttf")), Some(&fixture("DejaVuSerif.ttf")));
    assert_eq!(fonts.face().unwrap().source(), face.source());
    assert_eq!(fonts.reference().unwrap().source(), reference.source());

    for base in TARGET_FONT_SIZES {
        let px = base as f32;
        let current = face.ink_height(SAMPLE_TEXT_FOR_MEASURE, px).max(1.0);
        let target = reference.ink_height(SAMPLE_TEXT_FOR_MEASURE, px).max(1.0);
        let expected = (px * target / current).round().max(1.0);
        assert_eq!(normalized_size(&fonts, base, 1.0), expected, "base {}", base);
        assert_eq!(normalized_size(&fonts, base, 2.0), (expected * 2.0).round());
    }

    // Matching a face against itself keeps the base size
    let same = Fonts::from_face(mono());
    for base in TARGET_FONT_SIZES {
        assert_eq!(normalized_size(&same, base, 1.0), base as f32);
    }
}

#[test]
fn test_glyphs_advance_left_to_right() {
    let face = mono();
    let glyphs = face.layout_glyphs("Kiri", 28.0, 15.0, 490.0);
    assert_eq!(glyphs.len(), 4);
    assert_eq!(glyphs[0].position.x, 15.0);
    assert!(glyphs[0].position.y > 490.0);
    assert!(glyphs.windows(2).all(|w| w[1].position.x > w[0].position.x));
    assert!(glyphs.iter().all(|g| g.position.y == glyphs[0].position.y));

    let width = face.text_width("Kiri", 28.0);
    assert!(width > 0.0);
    assert!(face.ink_height("Kiri", 28.0) > 0.0);
    assert_eq!(face.ink_height("", 28.0), 0.0);
}

#[test]
fn test_tiled_footer_is_painted() {
    let config = ComposeConfig::from_fonts(Fonts::from_face(mono()));
    let sheet = compose_tiled(&SheetRequest::new().with_name("Kiri"), &config, None).unwrap();
    let image = decode(&sheet.png);
    assert_eq!(image.dimensions(), (504, 864));

    let footer = image
        .enumerate_pixels()
        .filter(|(_, y, p)| *y >= 816 && p.0[3] > 0)
        .count();
    assert!(footer > 0);
}
