use std::fmt::Write;

use sfnt_decoder::{Error, ErrorKind, Font, GlyphId, OutlineBuilder, Point, Rect, Tag};
use pretty_assertions::assert_eq;

use crate::font::{self, TRIANGLE};

struct Builder(String);

impl OutlineBuilder for Builder {
    fn move_to(&mut self, x: f32, y: f32) {
        write!(&mut self.0, "M {} {} ", x, y).unwrap();
    }

    fn line_to(&mut self, x: f32, y: f32) {
        write!(&mut self.0, "L {} {} ", x, y).unwrap();
    }

    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32) {
        write!(&mut self.0, "Q {} {} {} {} ", x1, y1, x, y).unwrap();
    }

    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32) {
        write!(&mut self.0, "C {} {} {} {} {} {} ", x1, y1, x2, y2, x, y).unwrap();
    }

    fn close(&mut self) {
        write!(&mut self.0, "Z ").unwrap();
    }
}

fn on_curve(points: &[(i16, i16)]) -> Vec<Point> {
    points.iter().map(|&(x, y)| Point { x, y, on_curve: true }).collect()
}

fn font_with_glyphs(glyphs: &[Vec<u8>]) -> Vec<u8> {
    let count = glyphs.len() as u16;
    let (glyf, loca) = font::glyf_and_loca(glyphs, 1);
    let metrics: Vec<(u16, i16)> = glyphs.iter().map(|_| (600, 0)).collect();
    let names: Vec<Option<&str>> = glyphs.iter().map(|_| None).collect();

    font::triangle_font_with(1)
        .table(Tag::GLYF, glyf)
        .table(Tag::LOCA, loca)
        .table(Tag::MAXP, font::maxp_true_type(count))
        .table(Tag::HHEA, font::hhea(800, -200, 90, count))
        .table(Tag::HMTX, font::hmtx(&metrics))
        .table(Tag::POST, font::post(0, &names))
        .build()
}

#[test]
fn triangle() {
    for format in &[0, 1] {
        let data = font::triangle_font_with(*format).build();
        let font = Font::from_data(&data).unwrap();

        assert_eq!(font.glyph_outline(GlyphId(0)).unwrap(), None);

        let contour = font.glyph_outline(GlyphId(1)).unwrap().unwrap();
        assert_eq!(contour.glyph_id, GlyphId(1));
        assert_eq!(contour.end_points, vec![2]);
        assert_eq!(contour.points, on_curve(TRIANGLE));
        assert_eq!(contour.bbox, Rect { x_min: 0, y_min: 0, x_max: 500, y_max: 700 });
        assert!(contour.instructions.is_empty());
    }
}

#[test]
fn outline_triangle() {
    let data = font::triangle_font().build();
    let font = Font::from_data(&data).unwrap();

    let mut builder = Builder(String::new());
    let bbox = font.outline_glyph(GlyphId(1), &mut builder).unwrap();
    assert_eq!(bbox, Some(Rect { x_min: 0, y_min: 0, x_max: 500, y_max: 700 }));
    assert_eq!(builder.0, "M 0 0 L 500 0 L 250 700 L 0 0 Z ");

    let mut builder = Builder(String::new());
    assert_eq!(font.outline_glyph(GlyphId(0), &mut builder).unwrap(), None);
    assert_eq!(builder.0, "");
}

#[test]
fn multiple_contours() {
    let square: &[(i16, i16)] = &[(600, 0), (700, 0), (700, 100), (600, 100)];
    let data = font_with_glyphs(&[Vec::new(), font::simple_glyph(&[TRIANGLE, square])]);
    let font = Font::from_data(&data).unwrap();

    let contour = font.glyph_outline(GlyphId(1)).unwrap().unwrap();
    assert_eq!(contour.end_points, vec![2, 6]);

    let contours: Vec<&[Point]> = contour.contours().collect();
    assert_eq!(contours.len(), 2);
    assert_eq!(contours[0], on_curve(TRIANGLE).as_slice());
    assert_eq!(contours[1], on_curve(square).as_slice());
}

#[test]
fn out_of_range_glyph() {
    let data = font::triangle_font().build();
    let font = Font::from_data(&data).unwrap();

    let err = font.glyph_outline(GlyphId(2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedTable);
    assert_eq!(err.table(), Some(Tag::GLYF));
}

#[test]
fn composite_with_offset() {
    let data = font_with_glyphs(&[
        Vec::new(),
        font::simple_glyph(&[TRIANGLE]),
        font::composite_glyph(1, 100, -50, None),
    ]);
    let font = Font::from_data(&data).unwrap();

    let contour = font.glyph_outline(GlyphId(2)).unwrap().unwrap();
    assert_eq!(contour.glyph_id, GlyphId(2));
    assert_eq!(contour.end_points, vec![2]);
    assert_eq!(contour.points, on_curve(&[(100, -50), (600, -50), (350, 650)]));
}

#[test]
fn composite_with_scale() {
    let data = font_with_glyphs(&[
        Vec::new(),
        font::simple_glyph(&[TRIANGLE]),
        font::composite_glyph(1, 10, 10, Some(0x2000)), // 0.5
    ]);
    let font = Font::from_data(&data).unwrap();

    // Scaling is applied before the offset.
    let contour = font.glyph_outline(GlyphId(2)).unwrap().unwrap();
    assert_eq!(contour.points, on_curve(&[(10, 10), (260, 10), (135, 360)]));
}

#[test]
fn nested_composite() {
    let data = font_with_glyphs(&[
        Vec::new(),
        font::simple_glyph(&[TRIANGLE]),
        font::composite_glyph(1, 100, 0, None),
        font::composite_glyph(2, 0, 100, None),
    ]);
    let font = Font::from_data(&data).unwrap();

    let contour = font.glyph_outline(GlyphId(3)).unwrap().unwrap();
    assert_eq!(contour.points, on_curve(&[(100, 100), (600, 100), (350, 800)]));
}

#[test]
fn nested_scaled_composite() {
    let data = font_with_glyphs(&[
        Vec::new(),
        font::simple_glyph(&[TRIANGLE]),
        font::composite_glyph(1, 10, 10, Some(0x2000)), // 0.5
        font::composite_glyph(2, 3, 5, Some(0x2000)), // 0.5
    ]);
    let font = Font::from_data(&data).unwrap();

    let child = font.glyph_outline(GlyphId(2)).unwrap().unwrap();
    let parent = font.glyph_outline(GlyphId(3)).unwrap().unwrap();

    // The parent transform applied to the already flattened child.
    // Products are rounded by adding half of the 2.14 unit before shifting.
    let scale = |n: i16| ((i32::from(n) * 0x2000 + 0x2000) >> 14) as i16;
    let expected: Vec<Point> = child.points.iter()
        .map(|p| Point { x: scale(p.x) + 3, y: scale(p.y) + 5, on_curve: p.on_curve })
        .collect();

    assert_eq!(parent.points, expected);
    assert_eq!(parent.points, on_curve(&[(8, 10), (133, 10), (71, 185)]));
    assert_eq!(parent.end_points, child.end_points);
}

#[test]
fn composite_of_empty_glyph() {
    let data = font_with_glyphs(&[Vec::new(), font::composite_glyph(0, 0, 0, None)]);
    let font = Font::from_data(&data).unwrap();
    assert_eq!(font.glyph_outline(GlyphId(1)).unwrap(), None);
}

#[test]
fn self_referencing_composite() {
    let data = font_with_glyphs(&[Vec::new(), font::composite_glyph(1, 0, 0, None)]);
    let font = Font::from_data(&data).unwrap();

    let err = font.glyph_outline(GlyphId(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceLimitExceeded);
    assert_eq!(err.table(), Some(Tag::GLYF));
}

#[test]
fn mutually_recursive_composites() {
    let data = font_with_glyphs(&[
        Vec::new(),
        font::composite_glyph(2, 0, 0, None),
        font::composite_glyph(1, 0, 0, None),
    ]);
    let font = Font::from_data(&data).unwrap();

    let err = font.glyph_outline(GlyphId(2)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ResourceLimitExceeded);
}

#[test]
fn decreasing_loca_offsets() {
    let data = font::triangle_font()
        .table(Tag::LOCA, vec![
            0x00, 0x00, // offset [0]: 0
            0x00, 0x10, // offset [1]: 32
            0x00, 0x0F, // offset [2]: 30
        ])
        .build();

    let err = Font::from_data(&data).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::MalformedTable);
    assert_eq!(err.table(), Some(Tag::LOCA));
}

#[test]
fn glyf_length_mismatch() {
    let data = font::triangle_font()
        .table(Tag::LOCA, vec![
            0x00, 0x00, // offset [0]: 0
            0x00, 0x00, // offset [1]: 0
            0x00, 0x0E, // offset [2]: 28
        ])
        .build();

    match Font::from_data(&data).unwrap_err() {
        Error::MalformedTable { table, reason } => {
            assert_eq!(table, Tag::GLYF);
            assert_eq!(reason, "invalid length 30, expected 28");
        }
        e => panic!("unexpected error: {:?}", e),
    }
}
