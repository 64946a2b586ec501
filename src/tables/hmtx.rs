//! A [Horizontal Metrics Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx) implementation.

use core::num::NonZeroU16;

use crate::{Error, GlyphId, Result, Tag};
use crate::error::Context;
use crate::parser::{FromData, LazyArray16, Stream};


#[derive(Clone, Copy, Debug)]
struct HorizontalMetrics {
    advance_width: u16,
    lsb: i16,
}

impl FromData for HorizontalMetrics {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(HorizontalMetrics {
            advance_width: s.read::<u16>()?,
            lsb: s.read::<i16>()?,
        })
    }
}


/// A [Horizontal Metrics Table](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx).
#[derive(Clone, Copy, Debug)]
pub struct Table<'a> {
    metrics: LazyArray16<'a, HorizontalMetrics>,
    bearings: LazyArray16<'a, i16>,
}

impl<'a> Table<'a> {
    /// Parses a table from raw data.
    ///
    /// The table length must match the number of metrics and glyphs exactly.
    pub fn parse(
        data: &'a [u8],
        number_of_h_metrics: NonZeroU16,
        number_of_glyphs: NonZeroU16,
    ) -> Result<Self> {
        // 'If the number_of_hmetrics is less than the total number of glyphs,
        // then that array is followed by an array for the left side bearing values
        // of the remaining glyphs.'
        let bearings_count = number_of_glyphs.get()
            .checked_sub(number_of_h_metrics.get())
            .context(Tag::HMTX, "more metrics than glyphs")?;

        let expected = 4 * usize::from(number_of_h_metrics.get()) + 2 * usize::from(bearings_count);
        if data.len() != expected {
            return Err(Error::malformed(
                Tag::HMTX,
                format!("invalid length {}, expected {}", data.len(), expected),
            ));
        }

        let mut s = Stream::new(data);
        let metrics = s.read_array16::<HorizontalMetrics>(number_of_h_metrics.get())
            .context(Tag::HMTX, "truncated metrics")?;
        let bearings = s.read_array16::<i16>(bearings_count)
            .context(Tag::HMTX, "truncated side bearings")?;

        Ok(Table { metrics, bearings })
    }

    /// Returns the number of glyphs covered by the table.
    #[inline]
    pub fn number_of_glyphs(&self) -> u16 {
        self.metrics.len().saturating_add(self.bearings.len())
    }

    /// Returns glyph's advance width.
    ///
    /// Glyphs past the long metrics array use the last advance.
    #[inline]
    pub fn advance(&self, glyph_id: GlyphId) -> Option<u16> {
        if glyph_id.0 >= self.number_of_glyphs() {
            return None;
        }

        if let Some(metrics) = self.metrics.get(glyph_id.0) {
            Some(metrics.advance_width)
        } else {
            // 'As an optimization, the number of records can be less than the number of glyphs,
            // in which case the advance width value of the last record applies
            // to all remaining glyph IDs.'
            self.metrics.last().map(|m| m.advance_width)
        }
    }

    /// Returns glyph's left side bearing.
    #[inline]
    pub fn side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        if let Some(metrics) = self.metrics.get(glyph_id.0) {
            Some(metrics.lsb)
        } else {
            self.bearings.get(glyph_id.0.checked_sub(self.metrics.len())?)
        }
    }
}
