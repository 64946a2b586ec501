//! A [PostScript Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/post) implementation.

use core::num::NonZeroU16;

use crate::{Error, GlyphId, LineMetrics, Result, Tag};
use crate::error::Context;
use crate::parser::{Fixed, LazyArray16, Stream};

const TABLE_SIZE: usize = 32;
const MACINTOSH_NAMES_COUNT: u16 = 258;

const VERSION_1_0: u32 = 0x00010000;
const VERSION_2_0: u32 = 0x00020000;
const VERSION_2_5: u32 = 0x00025000;
const VERSION_3_0: u32 = 0x00030000;

// https://developer.apple.com/fonts/TrueType-Reference-Manual/RM06/Chap6post.html
/// A list of Macintosh glyph names.
#[cfg(feature = "glyph-names")]
const MACINTOSH_NAMES: &[&str] = &[
    ".notdef",
    ".null",
    "nonmarkingreturn",
    "space",
    "exclam",
    "quotedbl",
    "numbersign",
    "dollar",
    "percent",
    "ampersand",
    "quotesingle",
    "parenleft",
    "parenright",
    "asterisk",
    "plus",
    "comma",
    "hyphen",
    "period",
    "slash",
    "zero",
    "one",
    "two",
    "three",
    "four",
    "five",
    "six",
    "seven",
    "eight",
    "nine",
    "colon",
    "semicolon",
    "less",
    "equal",
    "greater",
    "question",
    "at",
    "A",
    "B",
    "C",
    "D",
    "E",
    "F",
    "G",
    "H",
    "I",
    "J",
    "K",
    "L",
    "M",
    "N",
    "O",
    "P",
    "Q",
    "R",
    "S",
    "T",
    "U",
    "V",
    "W",
    "X",
    "Y",
    "Z",
    "bracketleft",
    "backslash",
    "bracketright",
    "asciicircum",
    "underscore",
    "grave",
    "a",
    "b",
    "c",
    "d",
    "e",
    "f",
    "g",
    "h",
    "i",
    "j",
    "k",
    "l",
    "m",
    "n",
    "o",
    "p",
    "q",
    "r",
    "s",
    "t",
    "u",
    "v",
    "w",
    "x",
    "y",
    "z",
    "braceleft",
    "bar",
    "braceright",
    "asciitilde",
    "Adieresis",
    "Aring",
    "Ccedilla",
    "Eacute",
    "Ntilde",
    "Odieresis",
    "Udieresis",
    "aacute",
    "agrave",
    "acircumflex",
    "adieresis",
    "atilde",
    "aring",
    "ccedilla",
    "eacute",
    "egrave",
    "ecircumflex",
    "edieresis",
    "iacute",
    "igrave",
    "icircumflex",
    "idieresis",
    "ntilde",
    "oacute",
    "ograve",
    "ocircumflex",
    "odieresis",
    "otilde",
    "uacute",
    "ugrave",
    "ucircumflex",
    "udieresis",
    "dagger",
    "degree",
    "cent",
    "sterling",
    "section",
    "bullet",
    "paragraph",
    "germandbls",
    "registered",
    "copyright",
    "trademark",
    "acute",
    "dieresis",
    "notequal",
    "AE",
    "Oslash",
    "infinity",
    "plusminus",
    "lessequal",
    "greaterequal",
    "yen",
    "mu",
    "partialdiff",
    "summation",
    "product",
    "pi",
    "integral",
    "ordfeminine",
    "ordmasculine",
    "Omega",
    "ae",
    "oslash",
    "questiondown",
    "exclamdown",
    "logicalnot",
    "radical",
    "florin",
    "approxequal",
    "Delta",
    "guillemotleft",
    "guillemotright",
    "ellipsis",
    "nonbreakingspace",
    "Agrave",
    "Atilde",
    "Otilde",
    "OE",
    "oe",
    "endash",
    "emdash",
    "quotedblleft",
    "quotedblright",
    "quoteleft",
    "quoteright",
    "divide",
    "lozenge",
    "ydieresis",
    "Ydieresis",
    "fraction",
    "currency",
    "guilsinglleft",
    "guilsinglright",
    "fi",
    "fl",
    "daggerdbl",
    "periodcentered",
    "quotesinglbase",
    "quotedblbase",
    "perthousand",
    "Acircumflex",
    "Ecircumflex",
    "Aacute",
    "Edieresis",
    "Egrave",
    "Iacute",
    "Icircumflex",
    "Idieresis",
    "Igrave",
    "Oacute",
    "Ocircumflex",
    "apple",
    "Ograve",
    "Uacute",
    "Ucircumflex",
    "Ugrave",
    "dotlessi",
    "circumflex",
    "tilde",
    "macron",
    "breve",
    "dotaccent",
    "ring",
    "cedilla",
    "hungarumlaut",
    "ogonek",
    "caron",
    "Lslash",
    "lslash",
    "Scaron",
    "scaron",
    "Zcaron",
    "zcaron",
    "brokenbar",
    "Eth",
    "eth",
    "Yacute",
    "yacute",
    "Thorn",
    "thorn",
    "minus",
    "multiply",
    "onesuperior",
    "twosuperior",
    "threesuperior",
    "onehalf",
    "onequarter",
    "threequarters",
    "franc",
    "Gbreve",
    "gbreve",
    "Idotaccent",
    "Scedilla",
    "scedilla",
    "Cacute",
    "cacute",
    "Ccaron",
    "ccaron",
    "dcroat",
];

#[cfg(feature = "glyph-names")]
fn macintosh_name(index: u16) -> Option<&'static str> {
    MACINTOSH_NAMES.get(usize::from(index)).copied()
}

#[cfg(not(feature = "glyph-names"))]
fn macintosh_name(_: u16) -> Option<&'static str> {
    None
}


#[derive(Clone, Debug)]
enum Names<'a> {
    None,
    Standard,
    Custom {
        indices: LazyArray16<'a, u16>,
        pool: Vec<&'a str>,
    },
}


/// A [PostScript Table](https://docs.microsoft.com/en-us/typography/opentype/spec/post).
#[derive(Clone, Debug)]
pub struct Table<'a> {
    /// Italic angle in counter-clockwise degrees from the vertical.
    pub italic_angle: Fixed,
    /// Underline metrics.
    pub underline_metrics: LineMetrics,
    /// Flag that indicates that the font is monospaced.
    pub is_fixed_pitch: bool,
    /// Minimum memory usage when the font is downloaded as a Type 42 font.
    pub min_mem_type42: u32,
    /// Maximum memory usage when the font is downloaded as a Type 42 font.
    pub max_mem_type42: u32,
    /// Minimum memory usage when the font is downloaded as a Type 1 font.
    pub min_mem_type1: u32,
    /// Maximum memory usage when the font is downloaded as a Type 1 font.
    pub max_mem_type1: u32,
    version: u32,
    names: Names<'a>,
}

impl<'a> Table<'a> {
    /// Parses a table from raw data.
    ///
    /// Version 2.5 is recognized, but not supported.
    pub fn parse(data: &'a [u8], number_of_glyphs: NonZeroU16) -> Result<Self> {
        if data.len() < TABLE_SIZE {
            return Err(Error::malformed(Tag::POST, format!("invalid length {}", data.len())));
        }

        let mut s = Stream::new(data);
        let version: u32 = s.read().context(Tag::POST, "truncated")?;
        let italic_angle: Fixed = s.read().context(Tag::POST, "truncated")?;
        let underline_position: i16 = s.read().context(Tag::POST, "truncated")?;
        let underline_thickness: i16 = s.read().context(Tag::POST, "truncated")?;
        let is_fixed_pitch: u32 = s.read().context(Tag::POST, "truncated")?;
        let mut read = || s.read::<u32>().context(Tag::POST, "truncated");
        let min_mem_type42 = read()?;
        let max_mem_type42 = read()?;
        let min_mem_type1 = read()?;
        let max_mem_type1 = read()?;

        let names = match version {
            VERSION_1_0 | VERSION_3_0 => {
                if data.len() != TABLE_SIZE {
                    return Err(Error::malformed(
                        Tag::POST,
                        format!("invalid length {} for version 0x{:08X}", data.len(), version),
                    ));
                }

                if version == VERSION_1_0 { Names::Standard } else { Names::None }
            }
            VERSION_2_0 => parse_names(&mut s, number_of_glyphs)?,
            VERSION_2_5 => return Err(Error::unsupported(Tag::POST, "version 2.5")),
            _ => {
                return Err(Error::malformed(Tag::POST, format!("invalid version 0x{:08X}", version)));
            }
        };

        Ok(Table {
            italic_angle,
            underline_metrics: LineMetrics {
                position: underline_position,
                thickness: underline_thickness,
            },
            is_fixed_pitch: is_fixed_pitch != 0,
            min_mem_type42,
            max_mem_type42,
            min_mem_type1,
            max_mem_type1,
            version,
            names,
        })
    }

    /// Returns the table version as a 16.16 number, like `0x00020000`.
    #[inline]
    pub fn version(&self) -> u32 {
        self.version
    }

    /// Returns a glyph name by ID.
    ///
    /// Returns `None` for version 3.0 tables, empty names and,
    /// without the `glyph-names` feature, names from the standard Macintosh set.
    pub fn glyph_name(&self, glyph_id: GlyphId) -> Option<&'a str> {
        let name = match self.names {
            Names::None => None,
            // 'the glyph names are those in the standard Macintosh ordering'
            Names::Standard => macintosh_name(glyph_id.0),
            Names::Custom { ref indices, ref pool } => {
                let index = indices.get(glyph_id.0)?;
                // 'If the name index is between 0 and 257, treat the name index
                // as a glyph index in the Macintosh standard order.'
                match index.checked_sub(MACINTOSH_NAMES_COUNT) {
                    Some(index) => pool.get(usize::from(index)).copied(),
                    None => macintosh_name(index),
                }
            }
        };

        name.filter(|name| !name.is_empty())
    }
}

fn parse_names<'a>(s: &mut Stream<'a>, number_of_glyphs: NonZeroU16) -> Result<Names<'a>> {
    let count: u16 = s.read().context(Tag::POST, "truncated glyph name indices")?;
    if count != number_of_glyphs.get() {
        return Err(Error::malformed(
            Tag::POST,
            format!("glyph count {} does not match maxp glyph count {}", count, number_of_glyphs),
        ));
    }

    let indices = s.read_array16::<u16>(count)
        .context(Tag::POST, "truncated glyph name indices")?;

    // The rest of the table is a list of Pascal strings.
    let mut pool = Vec::new();
    while !s.at_end() {
        let len: u8 = s.read().context(Tag::POST, "truncated glyph name")?;
        let name = s.read_bytes(usize::from(len)).ok_or_else(|| Error::malformed(
            Tag::POST,
            format!("glyph name {} is truncated", pool.len()),
        ))?;
        let name = core::str::from_utf8(name).map_err(|_| Error::malformed(
            Tag::POST,
            format!("glyph name {} is not valid UTF-8", pool.len()),
        ))?;
        pool.push(name);
    }

    for (glyph_id, index) in indices.into_iter().enumerate() {
        let is_valid = match index.checked_sub(MACINTOSH_NAMES_COUNT) {
            Some(index) => usize::from(index) < pool.len(),
            None => true,
        };

        if !is_valid {
            return Err(Error::malformed(
                Tag::POST,
                format!("glyph {} name index {} is out of range", glyph_id, index),
            ));
        }
    }

    Ok(Names::Custom { indices, pool })
}
