//! A [Horizontal Header Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/hhea) implementation.

use core::num::NonZeroU16;

use crate::{Error, Result, Tag};
use crate::error::Context;
use crate::parser::Stream;

const TABLE_SIZE: usize = 36;

/// A [Horizontal Header Table](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea).
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub struct Table {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
    pub advance_width_max: u16,
    pub min_left_side_bearing: i16,
    pub min_right_side_bearing: i16,
    pub x_max_extent: i16,
    pub caret_slope_rise: i16,
    pub caret_slope_run: i16,
    pub caret_offset: i16,
    pub metric_data_format: i16,
    /// Number of long metrics in `hmtx`.
    ///
    /// Guarantee to be not greater than the number of glyphs.
    pub number_of_h_metrics: NonZeroU16,
}

impl Table {
    /// Parses a table from raw data.
    pub fn parse(data: &[u8], number_of_glyphs: NonZeroU16) -> Result<Self> {
        if data.len() != TABLE_SIZE {
            return Err(Error::malformed(Tag::HHEA, format!("invalid length {}", data.len())));
        }

        let mut s = Stream::new(data);
        let major_version: u16 = s.read().context(Tag::HHEA, "truncated")?;
        s.skip::<u16>(); // minor version
        if major_version != 1 {
            return Err(Error::malformed(Tag::HHEA, format!("invalid version {}", major_version)));
        }

        let ascender: i16 = s.read().context(Tag::HHEA, "truncated")?;
        let descender: i16 = s.read().context(Tag::HHEA, "truncated")?;
        let line_gap: i16 = s.read().context(Tag::HHEA, "truncated")?;
        let advance_width_max: u16 = s.read().context(Tag::HHEA, "truncated")?;
        let min_left_side_bearing: i16 = s.read().context(Tag::HHEA, "truncated")?;
        let min_right_side_bearing: i16 = s.read().context(Tag::HHEA, "truncated")?;
        let x_max_extent: i16 = s.read().context(Tag::HHEA, "truncated")?;
        let caret_slope_rise: i16 = s.read().context(Tag::HHEA, "truncated")?;
        let caret_slope_run: i16 = s.read().context(Tag::HHEA, "truncated")?;
        let caret_offset: i16 = s.read().context(Tag::HHEA, "truncated")?;
        s.advance(8); // reserved
        let metric_data_format: i16 = s.read().context(Tag::HHEA, "truncated")?;
        let number_of_h_metrics: u16 = s.read().context(Tag::HHEA, "truncated")?;

        let number_of_h_metrics = NonZeroU16::new(number_of_h_metrics)
            .filter(|n| *n <= number_of_glyphs)
            .ok_or_else(|| Error::malformed(
                Tag::HHEA,
                format!("invalid numberOfHMetrics {}", number_of_h_metrics),
            ))?;

        Ok(Table {
            ascender,
            descender,
            line_gap,
            advance_width_max,
            min_left_side_bearing,
            min_right_side_bearing,
            x_max_extent,
            caret_slope_rise,
            caret_slope_run,
            caret_offset,
            metric_data_format,
            number_of_h_metrics,
        })
    }
}
