use std::num::NonZeroU16;

use sfnt_decoder::{ErrorKind, Font, GlyphId, Tag};
use sfnt_decoder::tables::hmtx::Table;
use pretty_assertions::assert_eq;

use crate::font;

macro_rules! nzu16 {
    ($n:expr) => { NonZeroU16::new($n).unwrap() };
}

#[test]
fn simple_case() {
    let data = &[
        0x00, 0x01, // advance width [0]: 1
        0x00, 0x02, // side bearing [0]: 2
    ];

    let table = Table::parse(data, nzu16!(1), nzu16!(1)).unwrap();
    assert_eq!(table.number_of_glyphs(), 1);
    assert_eq!(table.advance(GlyphId(0)), Some(1));
    assert_eq!(table.side_bearing(GlyphId(0)), Some(2));
}

#[test]
fn empty() {
    let err = Table::parse(&[], nzu16!(1), nzu16!(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedTable);
    assert_eq!(err.table(), Some(Tag::HMTX));
}

#[test]
fn more_metrics_than_glyphs() {
    let data = &[
        0x00, 0x01, // advance width [0]: 1
        0x00, 0x02, // side bearing [0]: 2

        0x00, 0x03, // advance width [1]: 3
        0x00, 0x04, // side bearing [1]: 4
    ];

    assert!(Table::parse(data, nzu16!(2), nzu16!(1)).is_err());
}

#[test]
fn smaller_than_glyphs_count() {
    let data = &[
        0x00, 0x01, // advance width [0]: 1
        0x00, 0x02, // side bearing [0]: 2

        0x00, 0x03, // side bearing [1]: 3
    ];

    let table = Table::parse(data, nzu16!(1), nzu16!(2)).unwrap();
    assert_eq!(table.number_of_glyphs(), 2);
    assert_eq!(table.advance(GlyphId(0)), Some(1));
    assert_eq!(table.side_bearing(GlyphId(0)), Some(2));
    assert_eq!(table.advance(GlyphId(1)), Some(1));
    assert_eq!(table.side_bearing(GlyphId(1)), Some(3));
}

#[test]
fn missing_side_bearings() {
    let data = &[
        0x00, 0x01, // advance width [0]: 1
        0x00, 0x02, // side bearing [0]: 2
    ];

    assert!(Table::parse(data, nzu16!(1), nzu16!(2)).is_err());
}

#[test]
fn trailing_data() {
    let data = &[
        0x00, 0x01, // advance width [0]: 1
        0x00, 0x02, // side bearing [0]: 2
        0x00, 0x00, // padding
    ];

    assert!(Table::parse(data, nzu16!(1), nzu16!(1)).is_err());
}

#[test]
fn glyph_out_of_bounds() {
    let data = &[
        0x00, 0x01, // advance width [0]: 1
        0x00, 0x02, // side bearing [0]: 2

        0x00, 0x03, // side bearing [1]: 3
    ];

    let table = Table::parse(data, nzu16!(1), nzu16!(2)).unwrap();
    assert_eq!(table.advance(GlyphId(2)), None);
    assert_eq!(table.side_bearing(GlyphId(2)), None);
}

#[test]
fn through_font() {
    let data = font::triangle_font().build();
    let font = Font::from_data(&data).unwrap();

    assert_eq!(font.glyph_advance(GlyphId(0)), 500);
    assert_eq!(font.glyph_advance(GlyphId(1)), 600);
    assert_eq!(font.glyph_left_side_bearing(GlyphId(1)), Some(0));
    assert_eq!(font.glyph_advance(GlyphId(2)), 0);
    assert_eq!(font.glyph_left_side_bearing(GlyphId(2)), None);
}

#[test]
fn number_of_metrics_past_glyph_count() {
    let data = font::triangle_font()
        .table(Tag::HHEA, font::hhea(800, -200, 90, 3))
        .build();

    let err = Font::from_data(&data).unwrap_err();
    assert_eq!(err.table(), Some(Tag::HHEA));
}
