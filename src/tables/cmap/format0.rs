// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-0-byte-encoding-table

use core::convert::TryFrom;
use core::num::NonZeroU16;

use crate::{Error, GlyphId, Result, Tag};
use crate::parser::Stream;

const SUBTABLE_SIZE: usize = 262;

/// A [format 0](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-0-byte-encoding-table)
/// subtable.
#[derive(Clone, Copy, Debug)]
pub struct Subtable0<'a> {
    glyph_ids: &'a [u8],
}

impl<'a> Subtable0<'a> {
    /// Parses a subtable from raw data.
    ///
    /// `data` must be exactly the subtable's declared range.
    pub fn parse(data: &'a [u8], number_of_glyphs: NonZeroU16) -> Result<Self> {
        if data.len() != SUBTABLE_SIZE {
            return Err(Error::malformed(
                Tag::CMAP,
                format!("format 0 subtable has invalid length {}", data.len()),
            ));
        }

        let mut s = Stream::new(data);
        s.advance(6); // format + length + language
        let glyph_ids = s.tail().unwrap_or_default();

        if let Some(pos) = glyph_ids.iter().position(|id| u16::from(*id) >= number_of_glyphs.get()) {
            return Err(Error::malformed(
                Tag::CMAP,
                format!("format 0 code point {} maps to an out of range glyph", pos),
            ));
        }

        Ok(Subtable0 { glyph_ids })
    }

    /// Returns a glyph index for a code point.
    pub fn glyph_index(&self, code_point: u32) -> Option<GlyphId> {
        let id = *self.glyph_ids.get(usize::try_from(code_point).ok()?)?;
        // 0 indicates missing glyph.
        if id != 0 {
            Some(GlyphId(u16::from(id)))
        } else {
            None
        }
    }

    /// Calls `f` for each codepoint defined in this table.
    pub fn codepoints(&self, mut f: impl FnMut(u32)) {
        for (i, glyph_id) in self.glyph_ids.iter().enumerate() {
            // The array always covers 0..256, so unmapped entries are skipped.
            if *glyph_id != 0 {
                f(i as u32);
            }
        }
    }
}
