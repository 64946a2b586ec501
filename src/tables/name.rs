//! A [Naming Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/name) implementation.

use crate::{Error, Result, Tag};
use crate::error::Context;
use crate::parser::{FromData, LazyArray16, Stream};


/// A list of [name ID](https://docs.microsoft.com/en-us/typography/opentype/spec/name#name-ids)'s.
pub mod name_id {
    #![allow(missing_docs)]

    pub const COPYRIGHT_NOTICE: u16                     = 0;
    pub const FAMILY: u16                               = 1;
    pub const SUBFAMILY: u16                            = 2;
    pub const UNIQUE_ID: u16                            = 3;
    pub const FULL_NAME: u16                            = 4;
    pub const VERSION: u16                              = 5;
    pub const POST_SCRIPT_NAME: u16                     = 6;
    pub const TRADEMARK: u16                            = 7;
    pub const MANUFACTURER: u16                         = 8;
    pub const DESIGNER: u16                             = 9;
    pub const DESCRIPTION: u16                          = 10;
    pub const VENDOR_URL: u16                           = 11;
    pub const DESIGNER_URL: u16                         = 12;
    pub const LICENSE: u16                              = 13;
    pub const LICENSE_URL: u16                          = 14;
    //        RESERVED                                  = 15
    pub const TYPOGRAPHIC_FAMILY: u16                   = 16;
    pub const TYPOGRAPHIC_SUBFAMILY: u16                = 17;
    pub const COMPATIBLE_FULL: u16                      = 18;
    pub const SAMPLE_TEXT: u16                          = 19;
    pub const POST_SCRIPT_CID: u16                      = 20;
    pub const WWS_FAMILY: u16                           = 21;
    pub const WWS_SUBFAMILY: u16                        = 22;
    pub const LIGHT_BACKGROUND_PALETTE: u16             = 23;
    pub const DARK_BACKGROUND_PALETTE: u16              = 24;
    pub const VARIATIONS_POST_SCRIPT_NAME_PREFIX: u16   = 25;
}


/// A [platform ID](https://docs.microsoft.com/en-us/typography/opentype/spec/name#platform-ids).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum PlatformId {
    Unicode,
    Macintosh,
    Iso,
    Windows,
    Custom,
}

impl PlatformId {
    fn from_u16(n: u16) -> Option<Self> {
        match n {
            0 => Some(PlatformId::Unicode),
            1 => Some(PlatformId::Macintosh),
            2 => Some(PlatformId::Iso),
            3 => Some(PlatformId::Windows),
            4 => Some(PlatformId::Custom),
            _ => None,
        }
    }
}


#[inline]
fn is_unicode_encoding(platform_id: PlatformId, encoding_id: u16) -> bool {
    // https://docs.microsoft.com/en-us/typography/opentype/spec/name#windows-encoding-ids
    const WINDOWS_SYMBOL_ENCODING_ID: u16 = 0;
    const WINDOWS_UNICODE_BMP_ENCODING_ID: u16 = 1;
    const WINDOWS_UNICODE_FULL_REPERTOIRE_ENCODING_ID: u16 = 10;

    match platform_id {
        PlatformId::Unicode => true,
        PlatformId::Windows => match encoding_id {
            WINDOWS_SYMBOL_ENCODING_ID |
            WINDOWS_UNICODE_BMP_ENCODING_ID |
            WINDOWS_UNICODE_FULL_REPERTOIRE_ENCODING_ID => true,
            _ => false,
        }
        _ => false,
    }
}

fn utf16_be_to_string(data: &[u8]) -> Option<String> {
    if data.len() % 2 != 0 {
        return None;
    }

    let name: Vec<u16> = LazyArray16::<u16>::new(data).into_iter().collect();
    String::from_utf16(&name).ok()
}


#[derive(Clone, Copy, Debug)]
struct NameRecord {
    platform_id: u16,
    encoding_id: u16,
    language_id: u16,
    name_id: u16,
    length: u16,
    offset: u16,
}

impl FromData for NameRecord {
    const SIZE: usize = 12;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(NameRecord {
            platform_id: s.read::<u16>()?,
            encoding_id: s.read::<u16>()?,
            language_id: s.read::<u16>()?,
            name_id: s.read::<u16>()?,
            length: s.read::<u16>()?,
            offset: s.read::<u16>()?,
        })
    }
}


#[derive(Clone, Copy, Debug)]
struct LangTagRecord {
    length: u16,
    offset: u16,
}

impl FromData for LangTagRecord {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        let mut s = Stream::new(data);
        Some(LangTagRecord {
            length: s.read::<u16>()?,
            offset: s.read::<u16>()?,
        })
    }
}

fn string_range(storage: &[u8], offset: u16, length: u16) -> Option<&[u8]> {
    let start = usize::from(offset);
    storage.get(start..start + usize::from(length))
}


/// A [Name Record](https://docs.microsoft.com/en-us/typography/opentype/spec/name#name-records).
#[derive(Clone, Copy)]
pub struct Name<'a> {
    platform_id: PlatformId,
    record: NameRecord,
    name: &'a [u8],
}

impl<'a> Name<'a> {
    /// Returns the platform ID.
    #[inline]
    pub fn platform_id(&self) -> PlatformId {
        self.platform_id
    }

    /// Returns the platform-specific encoding ID.
    #[inline]
    pub fn encoding_id(&self) -> u16 {
        self.record.encoding_id
    }

    /// Returns the language ID.
    #[inline]
    pub fn language_id(&self) -> u16 {
        self.record.language_id
    }

    /// Returns the [Name ID](https://docs.microsoft.com/en-us/typography/opentype/spec/name#name-ids).
    ///
    /// A predefined list of ID's can be found in the [`name_id`](name_id/index.html) module.
    #[inline]
    pub fn name_id(&self) -> u16 {
        self.record.name_id
    }

    /// Returns the Name's data as bytes.
    ///
    /// Can be empty.
    #[inline]
    pub fn name(&self) -> &'a [u8] {
        self.name
    }

    /// Returns the Name's data as a UTF-8 string.
    ///
    /// Supports:
    /// - Unicode Platform ID
    /// - Windows Platform ID + Symbol, Unicode BMP or Unicode full repertoire
    /// - Macintosh Platform ID + Roman, when the name is plain ASCII
    #[inline(never)]
    pub fn to_string(&self) -> Option<String> {
        const MACINTOSH_ROMAN_ENCODING_ID: u16 = 0;

        if self.is_unicode() {
            utf16_be_to_string(self.name)
        } else if self.platform_id == PlatformId::Macintosh
            && self.encoding_id() == MACINTOSH_ROMAN_ENCODING_ID
            && self.name.is_ascii()
        {
            core::str::from_utf8(self.name).ok().map(String::from)
        } else {
            None
        }
    }

    /// Checks that the current Name data has a Unicode encoding.
    #[inline]
    pub fn is_unicode(&self) -> bool {
        is_unicode_encoding(self.platform_id(), self.encoding_id())
    }
}

impl<'a> core::fmt::Debug for Name<'a> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        let name = self.to_string();
        f.debug_struct("Name")
            .field("name", &name.as_ref().map(core::ops::Deref::deref)
                                .unwrap_or("unsupported encoding"))
            .field("platform_id", &self.platform_id())
            .field("encoding_id", &self.encoding_id())
            .field("language_id", &self.language_id())
            .field("name_id", &self.name_id())
            .finish()
    }
}


/// An iterator over font's names.
#[derive(Clone, Copy)]
#[allow(missing_debug_implementations)]
pub struct Names<'a> {
    records: LazyArray16<'a, NameRecord>,
    storage: &'a [u8],
    index: u16,
}

impl<'a> Iterator for Names<'a> {
    type Item = Name<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let record = self.records.get(self.index)?;
            self.index += 1;

            // Records with a custom platform are skipped.
            let platform_id = match PlatformId::from_u16(record.platform_id) {
                Some(id) => id,
                None => continue,
            };

            // String ranges are validated during parsing.
            let name = string_range(self.storage, record.offset, record.length)?;
            return Some(Name { platform_id, record, name });
        }
    }
}


/// A [Naming Table](https://docs.microsoft.com/en-us/typography/opentype/spec/name).
#[derive(Clone, Copy, Debug)]
pub struct Table<'a> {
    records: LazyArray16<'a, NameRecord>,
    lang_tags: LazyArray16<'a, LangTagRecord>,
    storage: &'a [u8],
}

impl<'a> Table<'a> {
    /// Parses a table from raw data.
    ///
    /// Every record must point inside the string storage.
    /// Records with an unknown platform ID are kept, but not reported by [`Table::names`].
    pub fn parse(data: &'a [u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let format: u16 = s.read().context(Tag::NAME, "truncated header")?;
        let count: u16 = s.read().context(Tag::NAME, "truncated header")?;
        let storage_offset: u16 = s.read().context(Tag::NAME, "truncated header")?;

        if format > 1 {
            return Err(Error::malformed(Tag::NAME, format!("invalid format {}", format)));
        }

        let records = s.read_array16::<NameRecord>(count)
            .context(Tag::NAME, "truncated name records")?;

        // https://docs.microsoft.com/en-us/typography/opentype/spec/name#naming-table-format-1
        let lang_tags = if format == 1 {
            let lang_tag_count: u16 = s.read().context(Tag::NAME, "truncated language tag records")?;
            s.read_array16::<LangTagRecord>(lang_tag_count)
                .context(Tag::NAME, "truncated language tag records")?
        } else {
            LazyArray16::default()
        };

        let storage_offset = usize::from(storage_offset);
        if storage_offset < s.offset() || storage_offset > data.len() {
            return Err(Error::malformed(
                Tag::NAME,
                format!("invalid storage offset {}", storage_offset),
            ));
        }

        let storage = data.get(storage_offset..).unwrap_or_default();

        for (i, record) in records.into_iter().enumerate() {
            if string_range(storage, record.offset, record.length).is_none() {
                return Err(Error::malformed(
                    Tag::NAME,
                    format!("record {} string is out of bounds", i),
                ));
            }
        }

        for (i, record) in lang_tags.into_iter().enumerate() {
            if string_range(storage, record.offset, record.length).is_none() {
                return Err(Error::malformed(
                    Tag::NAME,
                    format!("language tag {} is out of bounds", i),
                ));
            }
        }

        Ok(Table { records, lang_tags, storage })
    }

    /// Returns an iterator over names.
    #[inline]
    pub fn names(&self) -> Names<'a> {
        Names {
            records: self.records,
            storage: self.storage,
            index: 0,
        }
    }

    /// Returns a language tag for a format 1 language ID.
    ///
    /// Language IDs starting from `0x8000` reference language tags.
    pub fn language_tag(&self, language_id: u16) -> Option<String> {
        let index = language_id.checked_sub(0x8000)?;
        let record = self.lang_tags.get(index)?;
        utf16_be_to_string(string_range(self.storage, record.offset, record.length)?)
    }

    /// Returns the first decodable name with the specified ID.
    pub fn name_by_id(&self, name_id: u16) -> Option<String> {
        self.names()
            .filter(|name| name.name_id() == name_id)
            .find_map(|name| name.to_string())
    }

    /// Returns font's family name.
    ///
    /// The typographic family name is preferred when present.
    pub fn family_name(&self) -> Option<String> {
        self.name_by_id(name_id::TYPOGRAPHIC_FAMILY)
            .or_else(|| self.name_by_id(name_id::FAMILY))
    }

    /// Returns font's PostScript name.
    #[inline]
    pub fn post_script_name(&self) -> Option<String> {
        self.name_by_id(name_id::POST_SCRIPT_NAME)
    }
}
