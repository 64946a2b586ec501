use sfnt_decoder::{Font, GlyphId, LineMetrics, Rect, Tag, Weight, Width};
use pretty_assertions::assert_eq;

use crate::font;

#[test]
fn global_metrics() {
    let data = font::triangle_font().build();
    let font = Font::from_data(&data).unwrap();

    assert_eq!(font.number_of_glyphs(), 2);
    assert_eq!(font.units_per_em(), 1000);
    assert_eq!(font.global_bounding_box(), Rect { x_min: 0, y_min: 0, x_max: 500, y_max: 700 });
    assert_eq!(font.ascender(), 800);
    assert_eq!(font.descender(), -200);
    assert_eq!(font.height(), 1000);
    assert_eq!(font.line_gap(), 90);
    assert_eq!(font.x_height(), Some(450));
    assert_eq!(font.capital_height(), Some(700));
    assert_eq!(font.underline_metrics(), LineMetrics { position: -100, thickness: 50 });
    assert_eq!(font.strikeout_metrics(), LineMetrics { position: 300, thickness: 50 });
    assert!(!font.is_monospaced());
}

#[test]
fn typographic_metrics() {
    // USE_TYPO_METRICS
    let data = font::triangle_font()
        .table(Tag::OS_2, font::os2(400, 1 << 7))
        .build();
    let font = Font::from_data(&data).unwrap();

    assert_eq!(font.ascender(), 900);
    assert_eq!(font.descender(), -200);
    assert_eq!(font.height(), 1100);
    assert_eq!(font.line_gap(), 100);
}

#[test]
fn style() {
    let data = font::triangle_font().build();
    let font = Font::from_data(&data).unwrap();
    assert!(font.is_regular());
    assert!(!font.is_italic());
    assert!(!font.is_bold());
    assert!(!font.is_oblique());
    assert_eq!(font.weight(), Weight::Normal);
    assert_eq!(font.width(), Width::Normal);
    assert_eq!(font.italic_angle(), 0.0);

    // ITALIC | BOLD | OBLIQUE
    let data = font::triangle_font()
        .table(Tag::OS_2, font::os2(700, 1 | 1 << 5 | 1 << 9))
        .table(Tag::POST, font::post(-0xB8000, &[None, Some("triangle")]))
        .build();
    let font = Font::from_data(&data).unwrap();
    assert!(!font.is_regular());
    assert!(font.is_italic());
    assert!(font.is_bold());
    assert!(font.is_oblique());
    assert_eq!(font.weight(), Weight::Bold);
    assert_eq!(font.italic_angle(), -11.5);
}

#[test]
fn names() {
    let data = font::triangle_font().build();
    let font = Font::from_data(&data).unwrap();
    assert_eq!(font.family_name(), Some("Triangle".to_string()));
    assert_eq!(font.post_script_name(), Some("Triangle-Regular".to_string()));

    // Typographic Family is preferred.
    let data = font::triangle_font()
        .table(Tag::NAME, font::name(&[(1, "Triangle Bold"), (16, "Triangle")]))
        .build();
    let font = Font::from_data(&data).unwrap();
    assert_eq!(font.family_name(), Some("Triangle".to_string()));
    assert_eq!(font.post_script_name(), None);
}

#[test]
fn glyph_names() {
    let data = font::triangle_font().build();
    let font = Font::from_data(&data).unwrap();

    #[cfg(feature = "glyph-names")]
    assert_eq!(font.glyph_name(GlyphId(0)), ".notdef");
    assert_eq!(font.glyph_name(GlyphId(1)), "triangle");
    assert_eq!(font.glyph_name(GlyphId(2)), "");
}

#[test]
fn post_glyph_count_mismatch() {
    let data = font::triangle_font()
        .table(Tag::POST, font::post(0, &[None, Some("triangle"), Some("extra")]))
        .build();

    let err = Font::from_data(&data).unwrap_err();
    assert_eq!(err.table(), Some(Tag::POST));
}
