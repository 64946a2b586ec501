// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-6-trimmed-table-mapping

use core::convert::TryFrom;
use core::num::NonZeroU16;

use crate::{Error, GlyphId, Result, Tag};
use crate::error::Context;
use crate::parser::{LazyArray16, Stream};

/// A [format 6](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-6-trimmed-table-mapping)
/// subtable.
#[derive(Clone, Copy, Debug)]
pub struct Subtable6<'a> {
    /// First character code of subrange.
    pub first_code_point: u16,
    glyphs: LazyArray16<'a, u16>,
}

impl<'a> Subtable6<'a> {
    /// Parses a subtable from raw data.
    pub fn parse(data: &'a [u8], number_of_glyphs: NonZeroU16) -> Result<Self> {
        let mut s = Stream::new(data);
        s.advance(6); // format + length + language
        let first_code_point: u16 = s.read().context(Tag::CMAP, "truncated format 6 header")?;
        let count: u16 = s.read().context(Tag::CMAP, "truncated format 6 header")?;
        if u32::from(first_code_point) + u32::from(count) > 0x10000 {
            return Err(Error::malformed(Tag::CMAP, "format 6 range extends past U+FFFF"));
        }

        let glyphs = s.read_array16::<u16>(count)
            .context(Tag::CMAP, "truncated format 6 glyph index array")?;

        if let Some(pos) = glyphs.into_iter().position(|id| id >= number_of_glyphs.get()) {
            return Err(Error::malformed(
                Tag::CMAP,
                format!("format 6 entry {} maps to an out of range glyph", pos),
            ));
        }

        Ok(Subtable6 { first_code_point, glyphs })
    }

    /// Returns a glyph index for a code point.
    pub fn glyph_index(&self, code_point: u32) -> Option<GlyphId> {
        // This subtable supports code points only in a u16 range.
        let code_point = u16::try_from(code_point).ok()?;
        let idx = code_point.checked_sub(self.first_code_point)?;
        self.glyphs.get(idx).filter(|id| *id != 0).map(GlyphId)
    }

    /// Calls `f` for each codepoint defined in this table.
    pub fn codepoints(&self, mut f: impl FnMut(u32)) {
        let start = u32::from(self.first_code_point);
        for i in 0..u32::from(self.glyphs.len()) {
            f(start + i);
        }
    }
}
