/*!
A [character to glyph index mapping](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap)
table implementation.

This module provides a low-level alternative to
[`Font::glyph_index`](../../struct.Font.html#method.glyph_index).
*/

use core::num::NonZeroU16;
use core::ops::Range;

use crate::{Error, GlyphId, Result, Tag};
use crate::error::Context;
use crate::parser::{FromData, NumFrom, Stream};

mod format0;
mod format4;
mod format6;
mod format12;

pub use format0::Subtable0;
pub use format4::Subtable4;
pub use format6::Subtable6;
pub use format12::Subtable12;

/// The maximum number of segments in a format 4 subtable
/// and groups in a format 12 subtable.
pub const MAX_CMAP_SEGMENTS: usize = 20_000;

// Every known subtable starts with at least a format and a length.
const MIN_SUBTABLE_SIZE: usize = 8;


#[derive(Clone, Copy)]
struct RawEncodingRecord {
    platform_id: u16,
    encoding_id: u16,
    offset: u32,
}

impl FromData for RawEncodingRecord {
    const SIZE: usize = 8;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(RawEncodingRecord {
            platform_id: s.read()?,
            encoding_id: s.read()?,
            offset: s.read()?,
        })
    }
}


/// An encoding record.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct EncodingRecord {
    /// Platform ID.
    pub platform_id: u16,
    /// Platform-specific encoding ID.
    pub encoding_id: u16,
    /// Format of the referenced subtable.
    pub format: u16,
    /// Index into [`Table::subtables`].
    ///
    /// `None` for formats that are recognized, but not decoded.
    pub subtable_index: Option<usize>,
}


/// A decoded character encoding subtable.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub enum Subtable<'a> {
    Format0(Subtable0<'a>),
    Format4(Subtable4<'a>),
    Format6(Subtable6<'a>),
    Format12(Subtable12<'a>),
}

impl<'a> Subtable<'a> {
    /// Returns subtable's format.
    #[inline]
    pub fn format(&self) -> u16 {
        match self {
            Subtable::Format0(_) => 0,
            Subtable::Format4(_) => 4,
            Subtable::Format6(_) => 6,
            Subtable::Format12(_) => 12,
        }
    }

    /// Maps a code point to a glyph ID.
    ///
    /// Returns `None` for unmapped code points, including the ones mapped to glyph 0.
    #[inline]
    pub fn glyph_index(&self, code_point: u32) -> Option<GlyphId> {
        match self {
            Subtable::Format0(ref subtable) => subtable.glyph_index(code_point),
            Subtable::Format4(ref subtable) => subtable.glyph_index(code_point),
            Subtable::Format6(ref subtable) => subtable.glyph_index(code_point),
            Subtable::Format12(ref subtable) => subtable.glyph_index(code_point),
        }
    }

    /// Calls `f` for each codepoint defined in this subtable.
    #[inline]
    pub fn codepoints<F: FnMut(u32)>(&self, f: F) {
        match self {
            Subtable::Format0(ref subtable) => subtable.codepoints(f),
            Subtable::Format4(ref subtable) => subtable.codepoints(f),
            Subtable::Format6(ref subtable) => subtable.codepoints(f),
            Subtable::Format12(ref subtable) => subtable.codepoints(f),
        }
    }
}


struct KnownSubtable {
    range: Range<usize>,
    format: u16,
    index: Option<usize>,
}


/// A [Character to Glyph Index Mapping Table](
/// https://docs.microsoft.com/en-us/typography/opentype/spec/cmap).
#[derive(Clone, Debug)]
pub struct Table<'a> {
    records: Vec<EncodingRecord>,
    subtables: Vec<Subtable<'a>>,
}

impl<'a> Table<'a> {
    /// Parses a table from raw data.
    ///
    /// Every subtable is decoded and validated up front.
    /// Records that point to the same byte range share a single decoded subtable.
    pub fn parse(data: &'a [u8], number_of_glyphs: NonZeroU16) -> Result<Self> {
        let mut s = Stream::new(data);
        let version: u16 = s.read().context(Tag::CMAP, "truncated header")?;
        if version != 0 {
            return Err(Error::malformed(Tag::CMAP, format!("invalid version {}", version)));
        }

        let count: u16 = s.read().context(Tag::CMAP, "truncated header")?;
        let raw_records = s.read_array16::<RawEncodingRecord>(count)
            .context(Tag::CMAP, "truncated encoding records")?;
        let header_end = s.offset();

        let mut known: Vec<KnownSubtable> = Vec::new();
        let mut records = Vec::with_capacity(usize::from(count));
        let mut subtables = Vec::new();
        for (i, record) in raw_records.into_iter().enumerate() {
            let offset = usize::num_from(record.offset);
            if offset < header_end {
                return Err(Error::malformed(
                    Tag::CMAP,
                    format!("subtable {} overlaps the header", i),
                ));
            }

            let (format, length) = subtable_header(data, offset).ok_or_else(|| Error::malformed(
                Tag::CMAP,
                format!("subtable {} is out of bounds", i),
            ))?;

            let length = length?;
            let range = offset..offset.checked_add(length).unwrap_or(usize::MAX);
            if length < MIN_SUBTABLE_SIZE || range.end > data.len() {
                return Err(Error::malformed(
                    Tag::CMAP,
                    format!("subtable {} has invalid length {}", i, length),
                ));
            }

            if let Some(same) = known.iter().find(|k| k.range == range) {
                records.push(EncodingRecord {
                    platform_id: record.platform_id,
                    encoding_id: record.encoding_id,
                    format: same.format,
                    subtable_index: same.index,
                });
                continue;
            }

            if known.iter().any(|k| k.range.start < range.end && range.start < k.range.end) {
                return Err(Error::malformed(
                    Tag::CMAP,
                    format!("subtable {} overlaps another subtable", i),
                ));
            }

            let subtable_data = data.get(range.clone()).unwrap_or_default();
            let subtable = match format {
                0 => Some(Subtable::Format0(Subtable0::parse(subtable_data, number_of_glyphs)?)),
                4 => Some(Subtable::Format4(Subtable4::parse(subtable_data, number_of_glyphs)?)),
                6 => Some(Subtable::Format6(Subtable6::parse(subtable_data, number_of_glyphs)?)),
                12 => Some(Subtable::Format12(Subtable12::parse(subtable_data, number_of_glyphs)?)),
                _ => {
                    warn!("Skipping a format {} subtable in the 'cmap' table.", format);
                    None
                }
            };

            let index = subtable.map(|subtable| {
                subtables.push(subtable);
                subtables.len() - 1
            });

            known.push(KnownSubtable { range, format, index });
            records.push(EncodingRecord {
                platform_id: record.platform_id,
                encoding_id: record.encoding_id,
                format,
                subtable_index: index,
            });
        }

        Ok(Table { records, subtables })
    }

    /// Returns encoding records in the file order.
    #[inline]
    pub fn records(&self) -> &[EncodingRecord] {
        &self.records
    }

    /// Returns decoded subtables without duplicates.
    #[inline]
    pub fn subtables(&self) -> &[Subtable<'a>] {
        &self.subtables
    }

    /// Maps a code point to a glyph ID.
    ///
    /// Subtables are tried in the encoding record order, the first one that maps
    /// the code point to a non-zero glyph wins.
    pub fn glyph_index(&self, code_point: u32) -> Option<GlyphId> {
        self.records.iter()
            .filter_map(|record| self.subtables.get(record.subtable_index?))
            .find_map(|subtable| subtable.glyph_index(code_point))
    }
}

// Returns the subtable format and its declared length.
//
// The outer `None` indicates that the header itself is out of bounds.
fn subtable_header(data: &[u8], offset: usize) -> Option<(u16, Result<usize>)> {
    if data.len().checked_sub(MIN_SUBTABLE_SIZE)? < offset {
        return None;
    }

    let format: u16 = Stream::read_at(data, offset)?;
    let length = match format {
        0 | 2 | 4 | 6 => usize::from(Stream::read_at::<u16>(data, offset + 2)?),
        8 | 10 | 12 | 13 => usize::num_from(Stream::read_at::<u32>(data, offset + 4)?),
        14 => usize::num_from(Stream::read_at::<u32>(data, offset + 2)?),
        _ => {
            let e = Error::malformed(Tag::CMAP, format!("unknown subtable format {}", format));
            return Some((format, Err(e)));
        }
    };

    Some((format, Ok(length)))
}
