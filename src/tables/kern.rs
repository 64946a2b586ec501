/*!
A [kerning table](https://docs.microsoft.com/en-us/typography/opentype/spec/kern) implementation.

Only the OpenType variant with format 0 subtables is decoded.
The Apple variant and other subtable formats are skipped with a warning.
*/

use crate::{Error, GlyphId, Result, Tag};
use crate::error::Context;
use crate::parser::{FromData, LazyArray16, Stream};

const SUBTABLE_HEADER_SIZE: usize = 6;


#[derive(Clone, Copy, Debug)]
struct Coverage(u8);

impl Coverage {
    #[inline]
    fn is_horizontal(self) -> bool {
        self.0 & (1 << 0) != 0
    }

    #[inline]
    fn has_minimum_values(self) -> bool {
        self.0 & (1 << 1) != 0
    }

    #[inline]
    fn has_cross_stream(self) -> bool {
        self.0 & (1 << 2) != 0
    }

    #[inline]
    fn is_override(self) -> bool {
        self.0 & (1 << 3) != 0
    }
}


#[derive(Clone, Copy, Debug)]
struct KerningRecord {
    // In the OpenType kern table, a kerning pair is stored as two u16,
    // but we are using one u32, so we can binary search it directly.
    pair: u32,
    value: i16,
}

impl FromData for KerningRecord {
    const SIZE: usize = 6;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(KerningRecord {
            pair: s.read::<u32>()?,
            value: s.read::<i16>()?,
        })
    }
}


/// A format 0 kerning subtable.
#[derive(Clone, Copy, Debug)]
pub struct Subtable<'a> {
    coverage: Coverage,
    pairs: LazyArray16<'a, KerningRecord>,
}

impl<'a> Subtable<'a> {
    fn parse(data: &'a [u8], index: u16) -> Result<Self> {
        let mut s = Stream::new(data);
        let number_of_pairs: u16 = s.read()
            .ok_or_else(|| Error::malformed(Tag::KERN, format!("subtable {} is truncated", index)))?;
        s.advance(6); // search_range (u16) + entry_selector (u16) + range_shift (u16)
        let pairs = s.read_array16::<KerningRecord>(number_of_pairs)
            .ok_or_else(|| Error::malformed(Tag::KERN, format!("subtable {} pairs are truncated", index)))?;

        let mut prev = None;
        for record in pairs {
            if prev.map_or(false, |prev| record.pair <= prev) {
                return Err(Error::malformed(
                    Tag::KERN,
                    format!("subtable {} pairs are not sorted", index),
                ));
            }

            prev = Some(record.pair);
        }

        Ok(Subtable { coverage: Coverage(0), pairs })
    }

    /// Checks that subtable is for horizontal text.
    #[inline]
    pub fn is_horizontal(&self) -> bool {
        self.coverage.is_horizontal()
    }

    /// Checks that subtable stores minimum values.
    #[inline]
    pub fn has_minimum_values(&self) -> bool {
        self.coverage.has_minimum_values()
    }

    /// Checks that subtable has a cross-stream values.
    #[inline]
    pub fn has_cross_stream(&self) -> bool {
        self.coverage.has_cross_stream()
    }

    /// Checks that subtable values replace the accumulated ones.
    #[inline]
    pub fn is_override(&self) -> bool {
        self.coverage.is_override()
    }

    /// Returns the number of kerning pairs.
    #[inline]
    pub fn number_of_pairs(&self) -> u16 {
        self.pairs.len()
    }

    /// Returns kerning for a pair of glyphs.
    ///
    /// Returns `None` when the pair is not present in this subtable.
    #[inline]
    pub fn glyphs_kerning(&self, left: GlyphId, right: GlyphId) -> Option<i16> {
        let needle = u32::from(left.0) << 16 | u32::from(right.0);
        self.pairs.binary_search_by(|v| v.pair.cmp(&needle)).map(|(_, v)| v.value)
    }
}


/// A [Kerning Table](https://docs.microsoft.com/en-us/typography/opentype/spec/kern).
#[derive(Clone, Debug)]
pub struct Table<'a> {
    subtables: Vec<Subtable<'a>>,
}

impl<'a> Table<'a> {
    /// Parses a table from raw data.
    ///
    /// Returns `Ok(None)` for table versions other than 0.
    pub fn parse(data: &'a [u8]) -> Result<Option<Self>> {
        // The Apple variant starts with a 1.0 Fixed version,
        // so its first two bytes are 0x0001 and not 0x0000.
        let mut s = Stream::new(data);
        let version: u16 = s.read().context(Tag::KERN, "truncated header")?;
        if version != 0 {
            warn!("Unsupported 'kern' table version: {}.", version);
            return Ok(None);
        }

        let number_of_tables: u16 = s.read().context(Tag::KERN, "truncated header")?;

        let mut subtables = Vec::new();
        for index in 0..number_of_tables {
            let header = s.read_bytes(SUBTABLE_HEADER_SIZE)
                .ok_or_else(|| Error::malformed(Tag::KERN, format!("subtable {} header is truncated", index)))?;
            let mut hs = Stream::new(header);
            let subtable_version: u16 = hs.read().unwrap_or(0);
            let length: u16 = hs.read().unwrap_or(0);
            // In the OpenType variant, `format` comes first.
            let format: u8 = hs.read().unwrap_or(0);
            let coverage = Coverage(hs.read().unwrap_or(0));

            let data_len = if number_of_tables == 1 {
                // With a single subtable the length field can be ignored.
                // This is abused by some fonts, to get around the `u16` size limit.
                s.remaining()
            } else {
                usize::from(length).checked_sub(SUBTABLE_HEADER_SIZE).ok_or_else(|| Error::malformed(
                    Tag::KERN,
                    format!("subtable {} has invalid length {}", index, length),
                ))?
            };

            let subtable_data = s.read_bytes(data_len)
                .ok_or_else(|| Error::malformed(Tag::KERN, format!("subtable {} is out of bounds", index)))?;

            if subtable_version != 0 || format != 0 {
                warn!(
                    "Skipping a 'kern' subtable with version {} and format {}.",
                    subtable_version, format
                );
                continue;
            }

            let mut subtable = Subtable::parse(subtable_data, index)?;
            subtable.coverage = coverage;
            subtables.push(subtable);
        }

        Ok(Some(Table { subtables }))
    }

    /// Returns decoded subtables.
    #[inline]
    pub fn subtables(&self) -> &[Subtable<'a>] {
        &self.subtables
    }

    /// Returns a combined kerning value for a pair of glyphs.
    ///
    /// Only horizontal subtables without cross-stream values are used.
    /// Returns `0` when no subtable contains the pair.
    pub fn glyphs_kerning(&self, left: GlyphId, right: GlyphId) -> i16 {
        let mut total: i16 = 0;
        for subtable in &self.subtables {
            if !subtable.is_horizontal() || subtable.has_cross_stream() {
                continue;
            }

            let value = match subtable.glyphs_kerning(left, right) {
                Some(value) => value,
                None => continue,
            };

            total = if subtable.is_override() {
                value
            } else if subtable.has_minimum_values() {
                total.max(value)
            } else {
                total.saturating_add(value)
            };
        }

        total
    }
}
