use sfnt_decoder::{ErrorKind, Font, GlyphId, Tag};
use pretty_assertions::assert_eq;

use crate::font;

#[test]
fn without_kern_table() {
    let data = font::triangle_font().build();
    let font = Font::from_data(&data).unwrap();
    assert!(font.kern().is_none());
    assert_eq!(font.glyphs_kerning(GlyphId(1), GlyphId(1)), 0);
}

#[test]
fn pairs() {
    let data = font::triangle_font()
        .table(Tag::KERN, font::kern(&[(0, 1, 20), (1, 1, -50)]))
        .build();
    let font = Font::from_data(&data).unwrap();

    let subtables = font.kern().unwrap().subtables();
    assert_eq!(subtables.len(), 1);
    assert!(subtables[0].is_horizontal());
    assert_eq!(subtables[0].number_of_pairs(), 2);

    assert_eq!(font.glyphs_kerning(GlyphId(1), GlyphId(1)), -50);
    assert_eq!(font.glyphs_kerning(GlyphId(0), GlyphId(1)), 20);
    assert_eq!(font.glyphs_kerning(GlyphId(1), GlyphId(0)), 0);
}

#[test]
fn apple_table_is_ignored() {
    let data = font::triangle_font()
        .table(Tag::KERN, vec![
            0x00, 0x01, 0x00, 0x00, // version: 1.0
            0x00, 0x00, 0x00, 0x00, // number of tables: 0
        ])
        .build();
    let font = Font::from_data(&data).unwrap();
    assert!(font.kern().is_none());
    assert_eq!(font.glyphs_kerning(GlyphId(1), GlyphId(1)), 0);
}

#[test]
fn unsorted_pairs() {
    let data = font::triangle_font()
        .table(Tag::KERN, font::kern(&[(1, 1, -50), (0, 1, 20)]))
        .build();

    let err = Font::from_data(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedTable);
    assert_eq!(err.table(), Some(Tag::KERN));
}
