//! A [Font Header Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/head) implementation.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::{Error, Rect, Result, Tag};
use crate::error::Context;
use crate::parser::{Fixed, Stream};

const TABLE_SIZE: usize = 54;
const MAGIC_NUMBER: u32 = 0x5F0F3CF5;

/// An index format used by the [Index to Location Table](
/// https://docs.microsoft.com/en-us/typography/opentype/spec/loca).
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum IndexToLocationFormat {
    Short,
    Long,
}


/// A timestamp, in seconds since 1904-01-01T00:00:00Z.
///
/// Guarantee to be non-negative.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
pub struct LongDateTime(pub i64);

impl LongDateTime {
    // Seconds between 1904-01-01 and 1970-01-01.
    const UNIX_OFFSET: i64 = 2_082_844_800;

    /// Returns the number of seconds since the Unix epoch.
    ///
    /// Negative for dates before 1970.
    #[inline]
    pub fn to_unix_seconds(self) -> i64 {
        self.0 - Self::UNIX_OFFSET
    }

    /// Converts the timestamp into `SystemTime`.
    pub fn to_system_time(self) -> SystemTime {
        let secs = self.to_unix_seconds();
        if secs >= 0 {
            UNIX_EPOCH + Duration::from_secs(secs as u64)
        } else {
            UNIX_EPOCH - Duration::from_secs(secs.unsigned_abs())
        }
    }
}


/// A [Font Header Table](https://docs.microsoft.com/en-us/typography/opentype/spec/head).
#[derive(Clone, Copy, Debug)]
pub struct Table {
    /// Set by font manufacturer.
    pub font_revision: Fixed,
    /// A whole-font checksum adjustment.
    pub checksum_adjustment: u32,
    /// Raw flags.
    pub flags: u16,
    /// Units per EM.
    pub units_per_em: u16,
    /// Creation time.
    pub created: LongDateTime,
    /// Last modification time.
    pub modified: LongDateTime,
    /// A bounding box that large enough to enclose any glyph from the face.
    pub global_bbox: Rect,
    /// Raw Mac style flags.
    pub mac_style: u16,
    /// Smallest readable size in pixels.
    pub lowest_rec_ppem: u16,
    /// Deprecated font direction hint.
    pub font_direction_hint: i16,
    /// An index format used by the [Index to Location Table](
    /// https://docs.microsoft.com/en-us/typography/opentype/spec/loca).
    pub index_to_location_format: IndexToLocationFormat,
    /// Glyph data format. Should be 0.
    pub glyph_data_format: i16,
}

impl Table {
    /// Parses a table from raw data.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() != TABLE_SIZE {
            return Err(Error::malformed(Tag::HEAD, format!("invalid length {}", data.len())));
        }

        let mut s = Stream::new(data);
        let major_version: u16 = s.read().context(Tag::HEAD, "truncated")?;
        s.skip::<u16>(); // minor version
        if major_version != 1 {
            return Err(Error::malformed(Tag::HEAD, format!("invalid version {}", major_version)));
        }

        let font_revision: Fixed = s.read().context(Tag::HEAD, "truncated")?;
        let checksum_adjustment: u32 = s.read().context(Tag::HEAD, "truncated")?;
        let magic: u32 = s.read().context(Tag::HEAD, "truncated")?;
        if magic != MAGIC_NUMBER {
            return Err(Error::malformed(Tag::HEAD, format!("invalid magic number 0x{:08X}", magic)));
        }

        let flags: u16 = s.read().context(Tag::HEAD, "truncated")?;
        let units_per_em: u16 = s.read().context(Tag::HEAD, "truncated")?;
        let created = parse_date(&mut s, "creation")?;
        let modified = parse_date(&mut s, "modification")?;
        let x_min: i16 = s.read().context(Tag::HEAD, "truncated")?;
        let y_min: i16 = s.read().context(Tag::HEAD, "truncated")?;
        let x_max: i16 = s.read().context(Tag::HEAD, "truncated")?;
        let y_max: i16 = s.read().context(Tag::HEAD, "truncated")?;
        let mac_style: u16 = s.read().context(Tag::HEAD, "truncated")?;
        let lowest_rec_ppem: u16 = s.read().context(Tag::HEAD, "truncated")?;
        let font_direction_hint: i16 = s.read().context(Tag::HEAD, "truncated")?;
        let index_to_location_format: i16 = s.read().context(Tag::HEAD, "truncated")?;
        let glyph_data_format: i16 = s.read().context(Tag::HEAD, "truncated")?;

        let index_to_location_format = match index_to_location_format {
            0 => IndexToLocationFormat::Short,
            1 => IndexToLocationFormat::Long,
            n => {
                return Err(Error::malformed(Tag::HEAD, format!("invalid indexToLocFormat {}", n)));
            }
        };

        Ok(Table {
            font_revision,
            checksum_adjustment,
            flags,
            units_per_em,
            created,
            modified,
            global_bbox: Rect { x_min, y_min, x_max, y_max },
            mac_style,
            lowest_rec_ppem,
            font_direction_hint,
            index_to_location_format,
            glyph_data_format,
        })
    }
}

fn parse_date(s: &mut Stream, name: &str) -> Result<LongDateTime> {
    let raw: u64 = s.read().context(Tag::HEAD, "truncated")?;
    if raw > i64::MAX as u64 {
        return Err(Error::malformed(Tag::HEAD, format!("{} date is too large", name)));
    }

    Ok(LongDateTime(raw as i64))
}
