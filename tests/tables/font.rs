//! Synthetic fonts, assembled table by table.
//!
//! Every table is padded to a 4-byte boundary and gets a valid checksum,
//! so a test can corrupt exactly one thing at a time.

use sfnt_decoder::{table_checksum, Tag};

pub const SFNT_TRUE_TYPE: u32 = 0x00010000;
pub const SFNT_CFF: u32 = 0x4F54544F;

// Offset of `checkSumAdjustment` inside `head`.
const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;


/// A big-endian byte sink.
#[derive(Default)]
pub struct Writer(pub Vec<u8>);

impl Writer {
    pub fn new() -> Self {
        Writer(Vec::new())
    }

    pub fn u8(&mut self, n: u8) -> &mut Self {
        self.0.push(n);
        self
    }

    pub fn u16(&mut self, n: u16) -> &mut Self {
        self.0.extend_from_slice(&n.to_be_bytes());
        self
    }

    pub fn i16(&mut self, n: i16) -> &mut Self {
        self.0.extend_from_slice(&n.to_be_bytes());
        self
    }

    pub fn u32(&mut self, n: u32) -> &mut Self {
        self.0.extend_from_slice(&n.to_be_bytes());
        self
    }

    pub fn u64(&mut self, n: u64) -> &mut Self {
        self.0.extend_from_slice(&n.to_be_bytes());
        self
    }

    pub fn bytes(&mut self, data: &[u8]) -> &mut Self {
        self.0.extend_from_slice(data);
        self
    }

    pub fn finish(&mut self) -> Vec<u8> {
        std::mem::take(&mut self.0)
    }
}


/// Assembles a font from raw tables.
///
/// Tables are stored in insertion order.
pub struct FontBuilder {
    sfnt_version: u32,
    tables: Vec<(Tag, Vec<u8>)>,
}

impl FontBuilder {
    pub fn new(sfnt_version: u32) -> Self {
        FontBuilder { sfnt_version, tables: Vec::new() }
    }

    /// Adds or replaces a table.
    pub fn table(mut self, tag: Tag, data: Vec<u8>) -> Self {
        match self.tables.iter_mut().find(|(t, _)| *t == tag) {
            Some(entry) => entry.1 = data,
            None => self.tables.push((tag, data)),
        }

        self
    }

    pub fn without(mut self, tag: Tag) -> Self {
        self.tables.retain(|(t, _)| *t != tag);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut w = Writer::new();
        let num_tables = self.tables.len() as u16;
        let entry_selector = if num_tables == 0 { 0 } else { 15 - num_tables.leading_zeros() as u16 };
        let search_range = (1u16 << entry_selector) * 16;
        w.u32(self.sfnt_version)
            .u16(num_tables)
            .u16(search_range)
            .u16(entry_selector)
            .u16((num_tables * 16).saturating_sub(search_range));

        let mut offset = 12 + 16 * self.tables.len();
        let mut body = Vec::new();
        let mut head_offset = None;
        for (tag, data) in &self.tables {
            let mut padded = data.clone();
            while padded.len() % 4 != 0 {
                padded.push(0);
            }

            if *tag == Tag::HEAD {
                if let Some(field) = padded.get_mut(CHECKSUM_ADJUSTMENT_OFFSET..CHECKSUM_ADJUSTMENT_OFFSET + 4) {
                    field.copy_from_slice(&[0; 4]);
                    head_offset = Some(offset);
                }
            }

            w.bytes(&tag.0)
                .u32(table_checksum(&padded))
                .u32(offset as u32)
                .u32(data.len() as u32);

            offset += padded.len();
            body.extend_from_slice(&padded);
        }

        let mut font = w.finish();
        font.extend_from_slice(&body);

        if let Some(head_offset) = head_offset {
            let adjustment = 0xB1B0AFBAu32.wrapping_sub(table_checksum(&font));
            let start = head_offset + CHECKSUM_ADJUSTMENT_OFFSET;
            font[start..start + 4].copy_from_slice(&adjustment.to_be_bytes());
        }

        font
    }
}


/// A glyph with a single triangle contour of three on-curve points.
pub const TRIANGLE: &[(i16, i16)] = &[(0, 0), (500, 0), (250, 700)];

pub fn simple_glyph(contours: &[&[(i16, i16)]]) -> Vec<u8> {
    let points: Vec<(i16, i16)> = contours.iter().flat_map(|c| c.iter().copied()).collect();
    let x_min = points.iter().map(|p| p.0).min().unwrap_or(0);
    let y_min = points.iter().map(|p| p.1).min().unwrap_or(0);
    let x_max = points.iter().map(|p| p.0).max().unwrap_or(0);
    let y_max = points.iter().map(|p| p.1).max().unwrap_or(0);

    let mut w = Writer::new();
    w.i16(contours.len() as i16).i16(x_min).i16(y_min).i16(x_max).i16(y_max);

    let mut end = 0u16;
    for contour in contours {
        end += contour.len() as u16;
        w.u16(end - 1);
    }

    w.u16(0); // instructionLength
    for _ in &points {
        w.u8(0x01); // on curve, word coordinates
    }

    let mut prev = 0;
    for p in &points {
        w.i16(p.0 - prev);
        prev = p.0;
    }

    prev = 0;
    for p in &points {
        w.i16(p.1 - prev);
        prev = p.1;
    }

    w.finish()
}

/// A single component composite glyph with word offsets.
pub fn composite_glyph(glyph_id: u16, dx: i16, dy: i16, scale: Option<i16>) -> Vec<u8> {
    let mut flags = 0x0001 | 0x0002; // ARG_1_AND_2_ARE_WORDS | ARGS_ARE_XY_VALUES
    if scale.is_some() {
        flags |= 0x0008; // WE_HAVE_A_SCALE
    }

    let mut w = Writer::new();
    w.i16(-1).i16(0).i16(0).i16(0).i16(0);
    w.u16(flags).u16(glyph_id).i16(dx).i16(dy);
    if let Some(scale) = scale {
        w.i16(scale);
    }

    w.finish()
}

/// Returns `(glyf, loca)`. Glyphs are padded to an even length.
pub fn glyf_and_loca(glyphs: &[Vec<u8>], index_to_loc_format: i16) -> (Vec<u8>, Vec<u8>) {
    let mut glyf = Vec::new();
    let mut offsets = vec![0usize];
    for glyph in glyphs {
        glyf.extend_from_slice(glyph);
        if glyf.len() % 2 != 0 {
            glyf.push(0);
        }

        offsets.push(glyf.len());
    }

    let mut loca = Writer::new();
    for offset in offsets {
        if index_to_loc_format == 0 {
            loca.u16((offset / 2) as u16);
        } else {
            loca.u32(offset as u32);
        }
    }

    (glyf, loca.finish())
}

pub fn head(units_per_em: u16, index_to_loc_format: i16) -> Vec<u8> {
    Writer::new()
        .u16(1).u16(0) // version
        .u32(0x00010000) // fontRevision
        .u32(0) // checkSumAdjustment
        .u32(0x5F0F3CF5) // magicNumber
        .u16(0) // flags
        .u16(units_per_em)
        .u64(0).u64(0) // created, modified
        .i16(0).i16(0).i16(500).i16(700) // bbox
        .u16(0) // macStyle
        .u16(8) // lowestRecPPEM
        .i16(2) // fontDirectionHint
        .i16(index_to_loc_format)
        .i16(0) // glyphDataFormat
        .finish()
}

pub fn maxp_true_type(number_of_glyphs: u16) -> Vec<u8> {
    let mut w = Writer::new();
    w.u32(0x00010000).u16(number_of_glyphs);
    for _ in 0..13 {
        w.u16(0);
    }

    w.finish()
}

pub fn maxp_cff(number_of_glyphs: u16) -> Vec<u8> {
    Writer::new().u32(0x00005000).u16(number_of_glyphs).finish()
}

pub fn hhea(ascender: i16, descender: i16, line_gap: i16, number_of_h_metrics: u16) -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(1).u16(0).i16(ascender).i16(descender).i16(line_gap);
    w.u16(600); // advanceWidthMax
    // Side bearings, extent, caret, reserved fields and metricDataFormat.
    for _ in 0..11 {
        w.i16(0);
    }

    w.u16(number_of_h_metrics);
    w.finish()
}

/// Long metrics for every glyph.
pub fn hmtx(metrics: &[(u16, i16)]) -> Vec<u8> {
    let mut w = Writer::new();
    for (advance, lsb) in metrics {
        w.u16(*advance).i16(*lsb);
    }

    w.finish()
}

/// A single Windows Unicode BMP record pointing at a format 4 subtable.
///
/// Segments are `(start, end, delta)`, the final 0xFFFF segment is appended.
pub fn cmap_format4(segments: &[(u16, u16, i16)]) -> Vec<u8> {
    let seg_count = segments.len() as u16 + 1;
    let mut sub = Writer::new();
    sub.u16(4).u16(16 + 8 * seg_count).u16(0).u16(seg_count * 2);
    sub.u16(0).u16(0).u16(0); // searchRange, entrySelector, rangeShift
    for s in segments {
        sub.u16(s.1);
    }
    sub.u16(0xFFFF);
    sub.u16(0); // reservedPad
    for s in segments {
        sub.u16(s.0);
    }
    sub.u16(0xFFFF);
    for s in segments {
        sub.i16(s.2);
    }
    sub.i16(1);
    for _ in 0..seg_count {
        sub.u16(0);
    }

    Writer::new()
        .u16(0) // version
        .u16(1) // numTables
        .u16(3).u16(1).u32(12) // Windows, Unicode BMP
        .bytes(&sub.finish())
        .finish()
}

/// Windows English names.
pub fn name(names: &[(u16, &str)]) -> Vec<u8> {
    let mut storage = Vec::new();
    let mut w = Writer::new();
    w.u16(0).u16(names.len() as u16).u16(6 + 12 * names.len() as u16);
    for (name_id, value) in names {
        let encoded: Vec<u8> = value.encode_utf16().flat_map(|c| c.to_be_bytes().to_vec()).collect();
        w.u16(3).u16(1).u16(0x0409).u16(*name_id)
            .u16(encoded.len() as u16)
            .u16(storage.len() as u16);
        storage.extend_from_slice(&encoded);
    }

    w.bytes(&storage).finish()
}

/// A version 4 table.
pub fn os2(weight_class: u16, selection: u16) -> Vec<u8> {
    Writer::new()
        .u16(4) // version
        .i16(500) // xAvgCharWidth
        .u16(weight_class)
        .u16(5) // usWidthClass
        .u16(0) // fsType
        .i16(650).i16(600).i16(0).i16(75) // subscript
        .i16(650).i16(600).i16(0).i16(350) // superscript
        .i16(50) // yStrikeoutSize
        .i16(300) // yStrikeoutPosition
        .i16(0) // sFamilyClass
        .bytes(&[0; 10]) // panose
        .u32(1).u32(0).u32(0).u32(0) // ulUnicodeRange
        .bytes(b"TEST")
        .u16(selection)
        .u16(0x20).u16(0xFFFF) // first and last char index
        .i16(900).i16(-200).i16(100) // typographic metrics
        .u16(1000).u16(250) // usWinAscent, usWinDescent
        .u32(1).u32(0) // ulCodePageRange
        .i16(450) // sxHeight
        .i16(700) // sCapHeight
        .u16(0).u16(0x20).u16(1) // default char, break char, max context
        .finish()
}

/// A version 2 table with custom names.
///
/// `None` picks the standard `.notdef` name.
pub fn post(italic_angle: i32, names: &[Option<&str>]) -> Vec<u8> {
    let mut w = Writer::new();
    w.u32(0x00020000)
        .u32(italic_angle as u32)
        .i16(-100).i16(50) // underline position and thickness
        .u32(0) // isFixedPitch
        .u32(0).u32(0).u32(0).u32(0);

    w.u16(names.len() as u16);
    let mut custom = 0u16;
    for name in names {
        match name {
            Some(_) => {
                w.u16(258 + custom);
                custom += 1;
            }
            None => {
                w.u16(0);
            }
        }
    }

    for name in names.iter().flatten() {
        w.u8(name.len() as u8).bytes(name.as_bytes());
    }

    w.finish()
}

/// A single horizontal format 0 subtable. Pairs must be sorted.
pub fn kern(pairs: &[(u16, u16, i16)]) -> Vec<u8> {
    let mut w = Writer::new();
    w.u16(0).u16(1); // version, nTables
    w.u16(0).u16(14 + 6 * pairs.len() as u16).u8(0).u8(0x01);
    w.u16(pairs.len() as u16).u16(0).u16(0).u16(0);
    for (left, right, value) in pairs {
        w.u16(*left).u16(*right).i16(*value);
    }

    w.finish()
}


/// Two glyphs: an empty `.notdef` and a triangle mapped from 'A'.
pub fn triangle_font() -> FontBuilder {
    triangle_font_with(0)
}

pub fn triangle_font_with(index_to_loc_format: i16) -> FontBuilder {
    let glyphs = vec![Vec::new(), simple_glyph(&[TRIANGLE])];
    let (glyf, loca) = glyf_and_loca(&glyphs, index_to_loc_format);

    FontBuilder::new(SFNT_TRUE_TYPE)
        .table(Tag::CMAP, cmap_format4(&[(0x41, 0x41, -0x40)]))
        .table(Tag::GLYF, glyf)
        .table(Tag::HEAD, head(1000, index_to_loc_format))
        .table(Tag::HHEA, hhea(800, -200, 90, 2))
        .table(Tag::HMTX, hmtx(&[(500, 0), (600, 0)]))
        .table(Tag::LOCA, loca)
        .table(Tag::MAXP, maxp_true_type(2))
        .table(Tag::NAME, name(&[(1, "Triangle"), (6, "Triangle-Regular")]))
        .table(Tag::OS_2, os2(400, 1 << 6))
        .table(Tag::POST, post(0, &[None, Some("triangle")]))
}

/// The same two glyphs, with a placeholder `CFF ` table.
pub fn cff_font() -> FontBuilder {
    FontBuilder::new(SFNT_CFF)
        .table(Tag::CFF, vec![1, 0, 4, 4])
        .table(Tag::CMAP, cmap_format4(&[(0x41, 0x41, -0x40)]))
        .table(Tag::HEAD, head(1000, 0))
        .table(Tag::HHEA, hhea(800, -200, 90, 2))
        .table(Tag::HMTX, hmtx(&[(500, 0), (600, 0)]))
        .table(Tag::MAXP, maxp_cff(2))
        .table(Tag::NAME, name(&[(1, "Triangle"), (6, "Triangle-Regular")]))
        .table(Tag::OS_2, os2(400, 1 << 6))
        .table(Tag::POST, post(0, &[None, Some("triangle")]))
}
