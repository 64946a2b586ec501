// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage

use core::cmp::Ordering;
use core::convert::TryFrom;
use core::num::NonZeroU16;

use crate::{Error, GlyphId, Result, Tag};
use crate::error::Context;
use crate::parser::{FromData, LazyArray32, NumFrom, Stream};
use super::MAX_CMAP_SEGMENTS;

#[derive(Clone, Copy, Debug)]
struct SequentialMapGroup {
    start_char_code: u32,
    end_char_code: u32,
    start_glyph_id: u32,
}

impl FromData for SequentialMapGroup {
    const SIZE: usize = 12;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(SequentialMapGroup {
            start_char_code: s.read::<u32>()?,
            end_char_code: s.read::<u32>()?,
            start_glyph_id: s.read::<u32>()?,
        })
    }
}


/// A [format 12](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap#format-12-segmented-coverage)
/// subtable.
#[derive(Clone, Copy, Debug)]
pub struct Subtable12<'a> {
    groups: LazyArray32<'a, SequentialMapGroup>,
}

impl<'a> Subtable12<'a> {
    /// Parses a subtable from raw data.
    pub fn parse(data: &'a [u8], number_of_glyphs: NonZeroU16) -> Result<Self> {
        let mut s = Stream::new(data);
        s.skip::<u16>(); // format
        s.skip::<u16>(); // reserved
        s.skip::<u32>(); // length
        s.skip::<u32>(); // language
        let count: u32 = s.read().context(Tag::CMAP, "truncated format 12 header")?;
        if usize::num_from(count) > MAX_CMAP_SEGMENTS {
            return Err(Error::limit(
                Tag::CMAP,
                format!("{} format 12 groups exceed the limit of {}", count, MAX_CMAP_SEGMENTS),
            ));
        }

        let groups = s.read_array32::<SequentialMapGroup>(count)
            .context(Tag::CMAP, "truncated format 12 groups")?;

        let number_of_glyphs = u32::from(number_of_glyphs.get());
        let mut prev_end = None;
        for (index, group) in groups.into_iter().enumerate() {
            if group.start_char_code > group.end_char_code {
                return Err(Error::malformed(
                    Tag::CMAP,
                    format!("format 12 group {} starts after its end", index),
                ));
            }

            if let Some(prev_end) = prev_end {
                if group.start_char_code <= prev_end {
                    return Err(Error::malformed(
                        Tag::CMAP,
                        format!("format 12 group {} overlaps the previous one", index),
                    ));
                }
            }
            prev_end = Some(group.end_char_code);

            // The last glyph of the group is `start_glyph_id + span`.
            let span = group.end_char_code - group.start_char_code;
            let is_valid = span < number_of_glyphs
                && group.start_glyph_id < number_of_glyphs - span;
            if !is_valid {
                return Err(Error::malformed(
                    Tag::CMAP,
                    format!("format 12 group {} maps to out of range glyphs", index),
                ));
            }
        }

        Ok(Subtable12 { groups })
    }

    /// Returns a glyph index for a code point.
    pub fn glyph_index(&self, code_point: u32) -> Option<GlyphId> {
        let (_, group) = self.groups.binary_search_by(|group| {
            if group.end_char_code < code_point {
                Ordering::Less
            } else if group.start_char_code > code_point {
                Ordering::Greater
            } else {
                Ordering::Equal
            }
        })?;

        let id = group.start_glyph_id + (code_point - group.start_char_code);
        u16::try_from(id).ok().filter(|id| *id != 0).map(GlyphId)
    }

    /// Calls `f` for each codepoint defined in this table.
    pub fn codepoints(&self, mut f: impl FnMut(u32)) {
        for group in self.groups {
            for code_point in group.start_char_code..=group.end_char_code {
                f(code_point);
            }
        }
    }
}
