// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values

use core::convert::TryFrom;
use core::num::NonZeroU16;

use crate::{Error, GlyphId, Result, Tag};
use crate::error::Context;
use crate::parser::{LazyArray16, Stream};
use super::MAX_CMAP_SEGMENTS;

// The final segment of a format 4 subtable maps this code point to the missing glyph.
const LAST_CODE_POINT: u16 = 0xFFFF;

/// A [format 4](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-4-segment-mapping-to-delta-values)
/// subtable.
///
/// Every segment is validated during parsing, so lookups never leave the glyph index array
/// and never produce a glyph ID past `maxp.numGlyphs`.
#[derive(Clone, Copy, Debug)]
pub struct Subtable4<'a> {
    start_codes: LazyArray16<'a, u16>,
    end_codes: LazyArray16<'a, u16>,
    id_deltas: LazyArray16<'a, i16>,
    id_range_offsets: LazyArray16<'a, u16>,
    glyph_ids: LazyArray16<'a, u16>,
}

impl<'a> Subtable4<'a> {
    /// Parses a subtable from raw data.
    ///
    /// `data` must be exactly the subtable's declared range.
    pub fn parse(data: &'a [u8], number_of_glyphs: NonZeroU16) -> Result<Self> {
        let mut s = Stream::new(data);
        s.advance(6); // format + length + language
        let seg_count_x2: u16 = s.read().context(Tag::CMAP, "truncated format 4 header")?;
        if seg_count_x2 % 2 != 0 {
            return Err(Error::malformed(
                Tag::CMAP,
                format!("format 4 segCountX2 {} is odd", seg_count_x2),
            ));
        }

        let seg_count = seg_count_x2 / 2;
        if usize::from(seg_count) > MAX_CMAP_SEGMENTS {
            return Err(Error::limit(
                Tag::CMAP,
                format!("{} format 4 segments exceed the limit of {}", seg_count, MAX_CMAP_SEGMENTS),
            ));
        }

        s.advance(6); // searchRange + entrySelector + rangeShift
        let end_codes = s.read_array16::<u16>(seg_count)
            .context(Tag::CMAP, "truncated format 4 end codes")?;
        s.read::<u16>().context(Tag::CMAP, "truncated format 4 end codes")?; // reservedPad
        let start_codes = s.read_array16::<u16>(seg_count)
            .context(Tag::CMAP, "truncated format 4 start codes")?;
        let id_deltas = s.read_array16::<i16>(seg_count)
            .context(Tag::CMAP, "truncated format 4 deltas")?;
        let id_range_offsets = s.read_array16::<u16>(seg_count)
            .context(Tag::CMAP, "truncated format 4 range offsets")?;

        let tail = s.tail().unwrap_or_default();
        if tail.len() % 2 != 0 {
            return Err(Error::malformed(Tag::CMAP, "format 4 glyph index array has odd length"));
        }

        let subtable = Subtable4 {
            start_codes,
            end_codes,
            id_deltas,
            id_range_offsets,
            glyph_ids: LazyArray16::new(tail),
        };

        let mut prev_end = None;
        for index in 0..seg_count {
            let start = start_codes.get(index).unwrap_or(0);
            let end = end_codes.get(index).unwrap_or(0);
            if start > end {
                return Err(Error::malformed(
                    Tag::CMAP,
                    format!("format 4 segment {} starts after its end", index),
                ));
            }

            if let Some(prev_end) = prev_end {
                if start <= prev_end {
                    return Err(Error::malformed(
                        Tag::CMAP,
                        format!("format 4 segment {} overlaps the previous one", index),
                    ));
                }
            }
            prev_end = Some(end);

            if id_range_offsets.get(index).unwrap_or(0) % 2 != 0 {
                return Err(Error::malformed(
                    Tag::CMAP,
                    format!("format 4 segment {} has an odd idRangeOffset", index),
                ));
            }

            // Segments cannot overlap, so the whole loop visits at most 65536 code points.
            for code_point in start..=end {
                if code_point == LAST_CODE_POINT {
                    continue;
                }

                let id = subtable.segment_glyph(index, code_point).ok_or_else(|| Error::malformed(
                    Tag::CMAP,
                    format!("format 4 segment {} points outside the glyph index array", index),
                ))?;

                if id >= number_of_glyphs.get() {
                    return Err(Error::malformed(
                        Tag::CMAP,
                        format!("format 4 code point U+{:04X} maps to an out of range glyph {}", code_point, id),
                    ));
                }
            }
        }

        Ok(subtable)
    }

    /// Returns the number of segments.
    #[inline]
    pub fn segments_count(&self) -> u16 {
        self.end_codes.len()
    }

    /// Returns a glyph index for a code point.
    pub fn glyph_index(&self, code_point: u32) -> Option<GlyphId> {
        // This subtable supports code points only in a u16 range.
        let code_point = u16::try_from(code_point).ok()?;
        if code_point == LAST_CODE_POINT {
            return None;
        }

        // A custom binary search for the first segment that ends at or after the code point.
        let mut start = 0;
        let mut end = self.segments_count();
        while end > start {
            let index = (start + end) / 2;
            let end_value = self.end_codes.get(index)?;
            if end_value >= code_point {
                let start_value = self.start_codes.get(index)?;
                if start_value > code_point {
                    end = index;
                } else {
                    return self.segment_glyph(index, code_point)
                        .filter(|id| *id != 0)
                        .map(GlyphId);
                }
            } else {
                start = index + 1;
            }
        }

        None
    }

    /// Calls `f` for each codepoint defined in this table.
    pub fn codepoints(&self, mut f: impl FnMut(u32)) {
        for (start, end) in self.start_codes.into_iter().zip(self.end_codes) {
            // Segments are validated, so `start <= end` always.
            for code_point in start..=end {
                if code_point != LAST_CODE_POINT {
                    f(u32::from(code_point));
                }
            }
        }
    }

    // Returns `None` only when the segment points outside the glyph index array.
    fn segment_glyph(&self, index: u16, code_point: u16) -> Option<u16> {
        let start = self.start_codes.get(index)?;
        let id_delta = self.id_deltas.get(index)?;
        let id_range_offset = self.id_range_offsets.get(index)?;

        if id_range_offset == 0 {
            return Some(code_point.wrapping_add(id_delta as u16));
        }

        // 'glyphId = *(idRangeOffset[i]/2 + (c - startCode[i]) + &idRangeOffset[i])',
        // rebased from `idRangeOffset[i]` onto the start of the glyph index array.
        let pos = i32::from(id_range_offset / 2)
            + i32::from(code_point - start)
            - (i32::from(self.segments_count()) - i32::from(index));
        let pos = u16::try_from(pos).ok()?;
        let value = self.glyph_ids.get(pos)?;

        // 0 indicates missing glyph and is never adjusted by the delta.
        if value == 0 {
            Some(0)
        } else {
            Some(value.wrapping_add(id_delta as u16))
        }
    }
}
