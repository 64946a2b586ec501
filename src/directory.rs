// https://docs.microsoft.com/en-us/typography/opentype/spec/otff#organization-of-an-opentype-font

use core::convert::TryFrom;
use core::ops::Range;

use crate::parser::{FromData, NumFrom, Stream};
use crate::{Error, Flavor, Result, Tag};

const SFNT_VERSION_TRUE_TYPE: u32 = 0x00010000;
const SFNT_VERSION_OPEN_TYPE: u32 = 0x4F54544F; // OTTO

const OFFSET_TABLE_SIZE: usize = 12;

// Byte offset of `checkSumAdjustment` inside `head`.
const CHECKSUM_ADJUSTMENT_OFFSET: usize = 8;

/// Tables required by both flavors.
const REQUIRED_TABLES: &[Tag] = &[
    Tag::CMAP,
    Tag::HEAD,
    Tag::HHEA,
    Tag::HMTX,
    Tag::MAXP,
    Tag::NAME,
    Tag::OS_2,
    Tag::POST,
];

/// A [Table Record](https://docs.microsoft.com/en-us/typography/opentype/spec/otff#table-directory).
///
/// A stored record always points inside the font data.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TableRecord {
    /// Table tag.
    pub tag: Tag,
    /// Stored table checksum.
    pub checksum: u32,
    /// Offset from the beginning of the font data.
    pub offset: u32,
    /// Table length, without padding.
    pub length: u32,
}

impl TableRecord {
    /// Returns the table byte range.
    #[inline]
    pub fn range(&self) -> Range<usize> {
        let start = usize::num_from(self.offset);
        start..start + usize::num_from(self.length)
    }

    /// Returns the table data.
    #[inline]
    pub fn data<'a>(&self, font_data: &'a [u8]) -> Option<&'a [u8]> {
        font_data.get(self.range())
    }

    // Tables are padded with zeros to a 4-byte boundary.
    #[inline]
    fn padded_end(&self) -> Option<usize> {
        let padding = (4 - (self.length & 3)) & 3;
        usize::num_from(self.offset)
            .checked_add(usize::num_from(self.length))?
            .checked_add(usize::num_from(padding))
    }
}

impl FromData for TableRecord {
    const SIZE: usize = 16;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(TableRecord {
            tag: s.read()?,
            checksum: s.read()?,
            offset: s.read()?,
            length: s.read()?,
        })
    }
}


/// Calculates a table checksum.
///
/// The sum of all big-endian `u32` words, with a trailing partial word padded by zeros.
pub fn table_checksum(data: &[u8]) -> u32 {
    let mut sum = 0u32;
    let mut chunks = data.chunks_exact(4);
    for chunk in &mut chunks {
        let word = u32::parse(chunk).unwrap_or(0);
        sum = sum.wrapping_add(word);
    }

    let rest = chunks.remainder();
    if !rest.is_empty() {
        let mut last = [0u8; 4];
        last[..rest.len()].copy_from_slice(rest);
        sum = sum.wrapping_add(u32::from_be_bytes(last));
    }

    sum
}


/// A validated table directory.
#[derive(Clone, Debug)]
pub(crate) struct Directory {
    flavor: Flavor,
    records: Vec<TableRecord>,
}

impl Directory {
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < OFFSET_TABLE_SIZE {
            return Err(Error::MalformedDirectory("font data is too short"));
        }

        if u32::try_from(data.len()).is_err() {
            return Err(Error::MalformedDirectory("font data is too long"));
        }

        let mut s = Stream::new(data);
        let sfnt_version: u32 = s.read().ok_or(Error::MalformedDirectory("truncated header"))?;
        let flavor = match sfnt_version {
            SFNT_VERSION_TRUE_TYPE => Flavor::TrueType,
            SFNT_VERSION_OPEN_TYPE => Flavor::Cff,
            _ => return Err(Error::UnknownMagic(sfnt_version)),
        };

        let num_tables: u16 = s.read().ok_or(Error::MalformedDirectory("truncated header"))?;
        s.advance(6); // searchRange (u16) + entrySelector (u16) + rangeShift (u16)
        let records = s.read_array16::<TableRecord>(num_tables)
            .ok_or(Error::MalformedDirectory("table count exceeds font data"))?;

        let mut list: Vec<TableRecord> = Vec::with_capacity(usize::from(num_tables));
        for record in records {
            let end = record.padded_end().ok_or(Error::TableOutOfBounds(record.tag))?;
            if usize::num_from(record.offset) >= data.len() || end > data.len() {
                return Err(Error::TableOutOfBounds(record.tag));
            }

            if list.iter().any(|r| r.tag == record.tag) {
                return Err(Error::DuplicateTable(record.tag));
            }

            let padded = data.get(usize::num_from(record.offset)..end)
                .ok_or(Error::TableOutOfBounds(record.tag))?;
            let computed = if record.tag == Tag::HEAD {
                head_checksum(padded).ok_or(Error::MalformedDirectory("head table is too short"))?
            } else {
                table_checksum(padded)
            };

            if computed != record.checksum {
                return Err(Error::ChecksumMismatch {
                    table: record.tag,
                    stored: record.checksum,
                    computed,
                });
            }

            list.push(record);
        }

        check_overlaps(&list)?;

        let dir = Directory { flavor, records: list };
        dir.check_required()?;
        Ok(dir)
    }

    #[inline]
    pub fn flavor(&self) -> Flavor {
        self.flavor
    }

    #[inline]
    pub fn records(&self) -> &[TableRecord] {
        &self.records
    }

    #[inline]
    pub fn find(&self, tag: Tag) -> Option<&TableRecord> {
        self.records.iter().find(|r| r.tag == tag)
    }

    /// Returns the data of a table that was checked to be present.
    pub fn required<'a>(&self, data: &'a [u8], tag: Tag) -> Result<&'a [u8]> {
        let record = self.find(tag).ok_or(Error::MissingTable(tag))?;
        record.data(data).ok_or(Error::TableOutOfBounds(tag))
    }

    fn check_required(&self) -> Result<()> {
        for tag in REQUIRED_TABLES {
            if self.find(*tag).is_none() {
                return Err(Error::MissingTable(*tag));
            }
        }

        match self.flavor {
            Flavor::TrueType => {
                for tag in &[Tag::GLYF, Tag::LOCA] {
                    if self.find(*tag).is_none() {
                        return Err(Error::MissingTable(*tag));
                    }
                }
            }
            Flavor::Cff => {
                match (self.find(Tag::CFF).is_some(), self.find(Tag::CFF2).is_some()) {
                    (false, false) => return Err(Error::MissingTable(Tag::CFF)),
                    (true, true) => return Err(Error::ConflictingTables(Tag::CFF, Tag::CFF2)),
                    _ => {}
                }
            }
        }

        Ok(())
    }
}

// The `checkSumAdjustment` field is treated as zero.
fn head_checksum(padded: &[u8]) -> Option<u32> {
    let adjustment: u32 = Stream::read_at(padded, CHECKSUM_ADJUSTMENT_OFFSET)?;
    Some(table_checksum(padded).wrapping_sub(adjustment))
}

fn check_overlaps(records: &[TableRecord]) -> Result<()> {
    let mut sorted: Vec<&TableRecord> = records.iter().filter(|r| r.length != 0).collect();
    sorted.sort_by_key(|r| r.offset);
    for pair in sorted.windows(2) {
        if let [prev, next] = pair {
            if next.range().start < prev.range().end {
                return Err(Error::OverlappingTables(prev.tag, next.tag));
            }
        }
    }

    Ok(())
}
