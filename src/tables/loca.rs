//! An [Index to Location Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/loca) implementation.

use core::num::NonZeroU16;
use core::ops::Range;

use crate::{Error, GlyphId, Result, Tag};
use crate::parser::{FromData, LazyArray32, NumFrom};
use crate::tables::head::IndexToLocationFormat;

/// An [Index to Location Table](https://docs.microsoft.com/en-us/typography/opentype/spec/loca).
///
/// Holds exactly `numGlyphs + 1` non-decreasing offsets.
#[derive(Clone, Copy, Debug)]
pub enum Table<'a> {
    /// Offsets divided by 2.
    Short(LazyArray32<'a, u16>),
    /// Actual offsets.
    Long(LazyArray32<'a, u32>),
}

impl<'a> Table<'a> {
    /// Parses a table from raw data.
    pub fn parse(
        data: &'a [u8],
        number_of_glyphs: NonZeroU16,
        format: IndexToLocationFormat,
    ) -> Result<Self> {
        // The number of offsets is `maxp.numGlyphs + 1`.
        let total = usize::from(number_of_glyphs.get()) + 1;
        let entry_size = match format {
            IndexToLocationFormat::Short => u16::SIZE,
            IndexToLocationFormat::Long => u32::SIZE,
        };

        if data.len() != total * entry_size {
            return Err(Error::malformed(
                Tag::LOCA,
                format!("invalid length {}, expected {}", data.len(), total * entry_size),
            ));
        }

        let table = match format {
            IndexToLocationFormat::Short => Table::Short(LazyArray32::new(data)),
            IndexToLocationFormat::Long => Table::Long(LazyArray32::new(data)),
        };

        // 'The offsets must be in ascending order.'
        let mut prev = 0;
        for i in 0..table.len() {
            let offset = table.offset(i).unwrap_or(0);
            if offset < prev {
                return Err(Error::malformed(
                    Tag::LOCA,
                    format!("offset {} is smaller than the previous one", i),
                ));
            }

            prev = offset;
        }

        Ok(table)
    }

    /// Returns the number of offsets.
    #[inline]
    pub fn len(&self) -> u32 {
        match self {
            Table::Short(ref array) => array.len(),
            Table::Long(ref array) => array.len(),
        }
    }

    /// Checks that there are no offsets.
    ///
    /// Never true for a parsed table.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns an actual offset at index.
    #[inline]
    pub fn offset(&self, index: u32) -> Option<usize> {
        match self {
            // 'The actual local offset divided by 2 is stored.'
            Table::Short(ref array) => array.get(index).map(|n| usize::from(n) * 2),
            Table::Long(ref array) => array.get(index).map(usize::num_from),
        }
    }

    /// Returns the last offset, which is the expected `glyf` length.
    #[inline]
    pub fn last_offset(&self) -> Option<usize> {
        self.offset(self.len().checked_sub(1)?)
    }

    /// Returns a glyph data range inside `glyf`.
    ///
    /// The range is empty for glyphs without an outline.
    #[inline]
    pub fn glyph_range(&self, glyph_id: GlyphId) -> Option<Range<usize>> {
        let index = u32::from(glyph_id.0);
        let start = self.offset(index)?;
        let end = self.offset(index + 1)?;
        Some(start..end)
    }
}
