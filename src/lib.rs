/*!
A strict, validating TrueType and OpenType font decoder.

## Features

- Decodes the SFNT table directory, verifies every table checksum
  and enforces the tables required by the font flavor.
- Validates `cmap`, `loca`, `hmtx`, `post` and `kern` up front,
  so queries on a loaded font are infallible.
- Resolves TrueType glyph outlines lazily, flattening composite glyphs.
- Zero unsafe.
- Stateless. No mutable methods. A [`Font`] can be shared between threads.

## Safety

- The library must not panic. Any panic considered as a critical bug and should be reported.
- The library forbids the unsafe code.
- Every length and offset is checked against the data before it is used.
- All recursive methods have a depth limit.
- Allocations sized from counts stored in a font are made only after the
  count was checked against the data length.

## Error handling

Loading a font either succeeds completely or returns a single [`Error`]
that names the offending table. [`Error::kind`] maps each error onto
a coarse [`ErrorKind`].

Structures that are recognized but intentionally ignored
(like unsupported `cmap` subtable formats) are skipped with a warning,
when the `logging` feature is enabled.
*/

#![doc(html_root_url = "https://docs.rs/sfnt-decoder/0.1.0")]

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(missing_copy_implementations)]
#![warn(missing_debug_implementations)]

use core::fmt;

#[cfg(feature = "logging")]
macro_rules! warn {
    ($($arg:tt)+) => (
        log::log!(log::Level::Warn, $($arg)+);
    )
}

#[cfg(not(feature = "logging"))]
macro_rules! warn {
    ($($arg:tt)+) => () // do nothing
}

mod directory;
mod error;
pub mod parser;
pub mod tables;

#[cfg(test)]
mod writer;

use parser::FromData;
use tables::{cmap, glyf, head, hhea, hmtx, kern, loca, maxp, name, os2, post};

pub use directory::{table_checksum, TableRecord};
pub use error::{Error, ErrorKind, Result};
pub use tables::cmap::MAX_CMAP_SEGMENTS;
pub use tables::glyf::{Contour, Contours, Point, MAX_COMPONENT_DEPTH};
pub use tables::head::LongDateTime;
pub use tables::name::name_id;
pub use tables::os2::{Weight, Width};


/// A type-safe wrapper for glyph ID.
#[repr(transparent)]
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Default, Hash, Debug)]
pub struct GlyphId(pub u16);

impl FromData for GlyphId {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        u16::parse(data).map(GlyphId)
    }
}

impl fmt::Display for GlyphId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}


/// An OpenType table tag.
///
/// A 4-byte array, usually printable ASCII.
/// Invalid tags are still representable, since they occur in real fonts.
#[repr(transparent)]
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Tag(pub [u8; 4]);

impl Tag {
    /// Character to glyph index mapping table.
    pub const CMAP: Tag = Tag(*b"cmap");
    /// Font header table.
    pub const HEAD: Tag = Tag(*b"head");
    /// Horizontal header table.
    pub const HHEA: Tag = Tag(*b"hhea");
    /// Horizontal metrics table.
    pub const HMTX: Tag = Tag(*b"hmtx");
    /// Maximum profile table.
    pub const MAXP: Tag = Tag(*b"maxp");
    /// Naming table.
    pub const NAME: Tag = Tag(*b"name");
    /// OS/2 and Windows metrics table.
    pub const OS_2: Tag = Tag(*b"OS/2");
    /// PostScript table.
    pub const POST: Tag = Tag(*b"post");
    /// Glyph data table.
    pub const GLYF: Tag = Tag(*b"glyf");
    /// Index to location table.
    pub const LOCA: Tag = Tag(*b"loca");
    /// Kerning table.
    pub const KERN: Tag = Tag(*b"kern");
    /// Compact Font Format table.
    pub const CFF: Tag = Tag(*b"CFF ");
    /// Compact Font Format 2 table.
    pub const CFF2: Tag = Tag(*b"CFF2");

    /// Creates a tag from raw bytes.
    #[inline]
    pub const fn new(bytes: &[u8; 4]) -> Self {
        Tag(*bytes)
    }

    /// Creates a tag from a big-endian `u32`.
    #[inline]
    pub const fn from_u32(n: u32) -> Self {
        Tag(n.to_be_bytes())
    }

    /// Returns the tag as a big-endian `u32`.
    #[inline]
    pub const fn to_u32(self) -> u32 {
        u32::from_be_bytes(self.0)
    }
}

impl FromData for Tag {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        u32::parse(data).map(Tag::from_u32)
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for &b in &self.0 {
            if (0x20..=0x7E).contains(&b) {
                write!(f, "{}", b as char)?;
            } else {
                write!(f, "\\x{:02X}", b)?;
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Tag(\"{}\")", self)
    }
}


/// A line metrics.
///
/// Used for underline and strikeout.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct LineMetrics {
    /// Line position.
    pub position: i16,

    /// Line thickness.
    pub thickness: i16,
}


/// A rectangle.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
#[allow(missing_docs)]
pub struct Rect {
    pub x_min: i16,
    pub y_min: i16,
    pub x_max: i16,
    pub y_max: i16,
}

impl Rect {
    /// Returns rect's width.
    #[inline]
    pub fn width(&self) -> i16 {
        self.x_max.wrapping_sub(self.x_min)
    }

    /// Returns rect's height.
    #[inline]
    pub fn height(&self) -> i16 {
        self.y_max.wrapping_sub(self.y_min)
    }
}


/// A trait for glyph outline construction.
pub trait OutlineBuilder {
    /// Appends a MoveTo segment.
    ///
    /// Start of a contour.
    fn move_to(&mut self, x: f32, y: f32);

    /// Appends a LineTo segment.
    fn line_to(&mut self, x: f32, y: f32);

    /// Appends a QuadTo segment.
    fn quad_to(&mut self, x1: f32, y1: f32, x: f32, y: f32);

    /// Appends a CurveTo segment.
    fn curve_to(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, x: f32, y: f32);

    /// Appends a ClosePath segment.
    ///
    /// End of a contour.
    fn close(&mut self);
}


/// An outline flavor of a font, as declared by its SFNT version.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Flavor {
    /// `0x00010000`. Outlines are stored in `glyf` and `loca`.
    TrueType,
    /// `OTTO`. Outlines are stored in `CFF ` or `CFF2`.
    Cff,
}


/// A media type of the raw font data, for embedding.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum MediaType {
    /// `font/truetype`
    TrueType,
    /// `font/opentype`
    OpenType,
}

impl MediaType {
    /// Returns the MIME type string.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::TrueType => "font/truetype",
            MediaType::OpenType => "font/opentype",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}


/// Tables every later decoder depends on.
///
/// Decoded first, in this order, and handed to the remaining decoders.
#[derive(Clone, Copy, Debug)]
struct Foundation {
    head: head::Table,
    maxp: maxp::Table,
    hhea: hhea::Table,
}

impl Foundation {
    fn parse(data: &[u8], dir: &directory::Directory) -> Result<Self> {
        let head = head::Table::parse(dir.required(data, Tag::HEAD)?)?;
        let maxp = maxp::Table::parse(dir.required(data, Tag::MAXP)?, dir.flavor())?;
        let hhea = hhea::Table::parse(dir.required(data, Tag::HHEA)?, maxp.number_of_glyphs)?;
        Ok(Foundation { head, maxp, hhea })
    }
}


/// A decoded font.
///
/// Owns all decoded tables and borrows the font data.
/// Outlines are resolved on request and never cached.
#[derive(Clone)]
pub struct Font<'a> {
    data: &'a [u8],
    directory: directory::Directory,
    head: head::Table,
    maxp: maxp::Table,
    hhea: hhea::Table,
    hmtx: hmtx::Table<'a>,
    cmap: cmap::Table<'a>,
    name: name::Table<'a>,
    os2: os2::Table,
    post: post::Table<'a>,
    glyf: Option<glyf::Table<'a>>,
    kern: Option<kern::Table<'a>>,
}

impl<'a> Font<'a> {
    /// Decodes a font from raw data.
    ///
    /// This method does all the validation, so it's a bit expensive.
    ///
    /// Required tables: `cmap`, `head`, `hhea`, `hmtx`, `maxp`, `name`, `OS/2` and `post`.
    /// TrueType fonts also require `glyf` and `loca`,
    /// while CFF fonts require either `CFF ` or `CFF2`.
    pub fn from_data(data: &'a [u8]) -> Result<Self> {
        let directory = directory::Directory::parse(data)?;
        let Foundation { head, maxp, hhea } = Foundation::parse(data, &directory)?;
        let number_of_glyphs = maxp.number_of_glyphs;

        let loca = match directory.flavor() {
            Flavor::TrueType => {
                let loca_data = directory.required(data, Tag::LOCA)?;
                Some(loca::Table::parse(loca_data, number_of_glyphs, head.index_to_location_format)?)
            }
            Flavor::Cff => None,
        };

        let mut cmap = None;
        let mut glyf = None;
        let mut hmtx = None;
        let mut kern = None;
        let mut name = None;
        let mut os2 = None;
        let mut post = None;
        for record in directory.records() {
            let table_data = match record.data(data) {
                Some(v) => v,
                None => return Err(Error::TableOutOfBounds(record.tag)),
            };

            match record.tag {
                Tag::CMAP => cmap = Some(cmap::Table::parse(table_data, number_of_glyphs)?),
                Tag::GLYF => {
                    if let Some(loca) = loca {
                        glyf = Some(glyf::Table::parse(table_data, loca)?);
                    }
                }
                Tag::HMTX => {
                    hmtx = Some(hmtx::Table::parse(table_data, hhea.number_of_h_metrics, number_of_glyphs)?);
                }
                Tag::KERN => kern = kern::Table::parse(table_data)?,
                Tag::NAME => name = Some(name::Table::parse(table_data)?),
                Tag::OS_2 => os2 = Some(os2::Table::parse(table_data)?),
                Tag::POST => post = Some(post::Table::parse(table_data, number_of_glyphs)?),
                _ => {}
            }
        }

        Ok(Font {
            data,
            head,
            maxp,
            hhea,
            hmtx: hmtx.ok_or(Error::MissingTable(Tag::HMTX))?,
            cmap: cmap.ok_or(Error::MissingTable(Tag::CMAP))?,
            name: name.ok_or(Error::MissingTable(Tag::NAME))?,
            os2: os2.ok_or(Error::MissingTable(Tag::OS_2))?,
            post: post.ok_or(Error::MissingTable(Tag::POST))?,
            glyf: match directory.flavor() {
                Flavor::TrueType => Some(glyf.ok_or(Error::MissingTable(Tag::GLYF))?),
                Flavor::Cff => None,
            },
            kern,
            directory,
        })
    }

    /// Returns the font flavor.
    #[inline]
    pub fn flavor(&self) -> Flavor {
        self.directory.flavor()
    }

    /// Returns the original font data with its media type, ready for embedding.
    #[inline]
    pub fn raw(&self) -> (MediaType, &'a [u8]) {
        let media_type = match self.flavor() {
            Flavor::TrueType => MediaType::TrueType,
            Flavor::Cff => MediaType::OpenType,
        };

        (media_type, self.data)
    }

    /// Returns an iterator over the table directory records, in file order.
    ///
    /// Includes tables this crate doesn't decode.
    #[inline]
    pub fn tables(&self) -> impl Iterator<Item = TableRecord> + '_ {
        self.directory.records().iter().copied()
    }

    /// Returns the raw data of a table, if present.
    #[inline]
    pub fn table_data(&self, tag: Tag) -> Option<&'a [u8]> {
        self.directory.find(tag)?.data(self.data)
    }

    /// Checks the whole-font checksum stored in `head`.
    ///
    /// Many fonts in the wild have a wrong value here,
    /// so this is not checked during loading.
    pub fn verify_checksum_adjustment(&self) -> bool {
        let head_offset = match self.directory.find(Tag::HEAD) {
            Some(record) => record.offset as usize,
            None => return false,
        };

        let sum = table_checksum(self.data)
            .wrapping_sub(self.head.checksum_adjustment);
        let expected = 0xB1B0AFBAu32.wrapping_sub(sum);

        // A font checksum is defined for 4-byte aligned `head` tables only.
        head_offset % 4 == 0 && expected == self.head.checksum_adjustment
    }

    /// Returns a [Font Header Table](https://docs.microsoft.com/en-us/typography/opentype/spec/head).
    #[inline]
    pub fn head(&self) -> &head::Table {
        &self.head
    }

    /// Returns a [Maximum Profile Table](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp).
    #[inline]
    pub fn maxp(&self) -> &maxp::Table {
        &self.maxp
    }

    /// Returns a [Horizontal Header Table](https://docs.microsoft.com/en-us/typography/opentype/spec/hhea).
    #[inline]
    pub fn hhea(&self) -> &hhea::Table {
        &self.hhea
    }

    /// Returns a [Horizontal Metrics Table](https://docs.microsoft.com/en-us/typography/opentype/spec/hmtx).
    #[inline]
    pub fn hmtx(&self) -> &hmtx::Table<'a> {
        &self.hmtx
    }

    /// Returns a [Character to Glyph Index Mapping Table](https://docs.microsoft.com/en-us/typography/opentype/spec/cmap).
    #[inline]
    pub fn cmap(&self) -> &cmap::Table<'a> {
        &self.cmap
    }

    /// Returns a [Naming Table](https://docs.microsoft.com/en-us/typography/opentype/spec/name).
    #[inline]
    pub fn name(&self) -> &name::Table<'a> {
        &self.name
    }

    /// Returns an [OS/2 and Windows Metrics Table](https://docs.microsoft.com/en-us/typography/opentype/spec/os2).
    #[inline]
    pub fn os2(&self) -> &os2::Table {
        &self.os2
    }

    /// Returns a [PostScript Table](https://docs.microsoft.com/en-us/typography/opentype/spec/post).
    #[inline]
    pub fn post(&self) -> &post::Table<'a> {
        &self.post
    }

    /// Returns a [Glyph Data Table](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf).
    ///
    /// Present only in TrueType fonts.
    #[inline]
    pub fn glyf(&self) -> Option<&glyf::Table<'a>> {
        self.glyf.as_ref()
    }

    /// Returns a [Kerning Table](https://docs.microsoft.com/en-us/typography/opentype/spec/kern).
    #[inline]
    pub fn kern(&self) -> Option<&kern::Table<'a>> {
        self.kern.as_ref()
    }

    /// Returns the number of glyphs in the font.
    ///
    /// Never zero.
    #[inline]
    pub fn number_of_glyphs(&self) -> u16 {
        self.maxp.number_of_glyphs.get()
    }

    /// Returns font's units per EM.
    #[inline]
    pub fn units_per_em(&self) -> u16 {
        self.head.units_per_em
    }

    /// Returns a bounding box that large enough to enclose any glyph from the font.
    #[inline]
    pub fn global_bounding_box(&self) -> Rect {
        self.head.global_bbox
    }

    /// Returns font's ascender value.
    ///
    /// Uses the typographic ascender when `OS/2` asks for it.
    #[inline]
    pub fn ascender(&self) -> i16 {
        match self.os2.typo_metrics() {
            Some(m) if self.os2.use_typographic_metrics() => m.ascender,
            _ => self.hhea.ascender,
        }
    }

    /// Returns font's descender value.
    ///
    /// Uses the typographic descender when `OS/2` asks for it.
    #[inline]
    pub fn descender(&self) -> i16 {
        match self.os2.typo_metrics() {
            Some(m) if self.os2.use_typographic_metrics() => m.descender,
            _ => self.hhea.descender,
        }
    }

    /// Returns font's height.
    #[inline]
    pub fn height(&self) -> i16 {
        self.ascender().saturating_sub(self.descender())
    }

    /// Returns font's line gap.
    ///
    /// Uses the typographic line gap when `OS/2` asks for it.
    #[inline]
    pub fn line_gap(&self) -> i16 {
        match self.os2.typo_metrics() {
            Some(m) if self.os2.use_typographic_metrics() => m.line_gap,
            _ => self.hhea.line_gap,
        }
    }

    /// Returns font's x height.
    ///
    /// Available only in `OS/2` version 2 and later.
    #[inline]
    pub fn x_height(&self) -> Option<i16> {
        self.os2.x_height
    }

    /// Returns font's capital height.
    ///
    /// Available only in `OS/2` version 2 and later.
    #[inline]
    pub fn capital_height(&self) -> Option<i16> {
        self.os2.capital_height
    }

    /// Returns font's italic angle in counter-clockwise degrees from the vertical.
    #[inline]
    pub fn italic_angle(&self) -> f32 {
        self.post.italic_angle.0
    }

    /// Returns font's underline metrics.
    #[inline]
    pub fn underline_metrics(&self) -> LineMetrics {
        self.post.underline_metrics
    }

    /// Returns font's strikeout metrics.
    #[inline]
    pub fn strikeout_metrics(&self) -> LineMetrics {
        self.os2.strikeout_metrics
    }

    /// Checks that font is marked as *Monospaced*.
    #[inline]
    pub fn is_monospaced(&self) -> bool {
        self.post.is_fixed_pitch
    }

    /// Checks that font is marked as *Regular*.
    #[inline]
    pub fn is_regular(&self) -> bool {
        self.os2.is_regular()
    }

    /// Checks that font is marked as *Italic*.
    #[inline]
    pub fn is_italic(&self) -> bool {
        self.os2.is_italic()
    }

    /// Checks that font is marked as *Bold*.
    #[inline]
    pub fn is_bold(&self) -> bool {
        self.os2.is_bold()
    }

    /// Checks that font is marked as *Oblique*.
    #[inline]
    pub fn is_oblique(&self) -> bool {
        self.os2.is_oblique()
    }

    /// Returns font's weight.
    #[inline]
    pub fn weight(&self) -> Weight {
        self.os2.weight()
    }

    /// Returns font's width.
    #[inline]
    pub fn width(&self) -> Width {
        self.os2.width()
    }

    /// Returns font's family name.
    ///
    /// *Typographic Family* is preferred over *Family*.
    #[inline]
    pub fn family_name(&self) -> Option<String> {
        self.name.family_name()
    }

    /// Returns font's PostScript name.
    #[inline]
    pub fn post_script_name(&self) -> Option<String> {
        self.name.post_script_name()
    }

    /// Resolves a glyph ID for a character.
    ///
    /// Subtables are tried in the encoding record order.
    /// Returns `GlyphId(0)` when the character is not mapped.
    #[inline]
    pub fn glyph_index(&self, c: char) -> GlyphId {
        self.cmap.glyph_index(u32::from(c)).unwrap_or_default()
    }

    /// Returns a glyph name.
    ///
    /// Returns an empty string when the glyph has no name.
    #[inline]
    pub fn glyph_name(&self, glyph_id: GlyphId) -> &'a str {
        self.post.glyph_name(glyph_id).unwrap_or("")
    }

    /// Returns glyph's horizontal advance.
    ///
    /// Returns `0` for an out-of-range glyph ID.
    #[inline]
    pub fn glyph_advance(&self, glyph_id: GlyphId) -> u16 {
        self.hmtx.advance(glyph_id).unwrap_or(0)
    }

    /// Returns glyph's left side bearing.
    #[inline]
    pub fn glyph_left_side_bearing(&self, glyph_id: GlyphId) -> Option<i16> {
        self.hmtx.side_bearing(glyph_id)
    }

    /// Returns a kerning adjustment for a glyph pair.
    ///
    /// Returns `0` when the font has no kerning for this pair.
    #[inline]
    pub fn glyphs_kerning(&self, left: GlyphId, right: GlyphId) -> i16 {
        match self.kern {
            Some(ref kern) => kern.glyphs_kerning(left, right),
            None => 0,
        }
    }

    /// Resolves a glyph outline.
    ///
    /// Composite glyphs are flattened into a single contour set.
    ///
    /// Returns `Ok(None)` for empty glyphs, like a space.
    ///
    /// # Errors
    ///
    /// - [`Error::Unsupported`] for CFF fonts and point-matching composite components.
    /// - [`Error::LimitExceeded`] when composite glyphs nest deeper than [`MAX_COMPONENT_DEPTH`].
    /// - [`Error::MalformedTable`] for an out-of-range glyph ID or malformed glyph data.
    pub fn glyph_outline(&self, glyph_id: GlyphId) -> Result<Option<Contour<'a>>> {
        match self.glyf {
            Some(ref glyf) => glyf.outline(glyph_id),
            None => {
                let tag = if self.directory.find(Tag::CFF2).is_some() { Tag::CFF2 } else { Tag::CFF };
                Err(Error::unsupported(tag, "CFF outlines"))
            }
        }
    }

    /// Outlines a glyph into the `builder` and returns its bounding box.
    ///
    /// Returns `Ok(None)` for empty glyphs.
    pub fn outline_glyph(
        &self,
        glyph_id: GlyphId,
        builder: &mut dyn OutlineBuilder,
    ) -> Result<Option<Rect>> {
        Ok(self.glyph_outline(glyph_id)?.map(|contour| {
            contour.outline(builder);
            contour.bbox
        }))
    }
}

impl fmt::Debug for Font<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Font")
            .field("flavor", &self.flavor())
            .field("number_of_glyphs", &self.number_of_glyphs())
            .field("units_per_em", &self.units_per_em())
            .finish()
    }
}

// Makes sure a loaded font can be queried from any thread.
#[allow(dead_code)]
fn assert_send_sync() {
    fn is_send_sync<T: Send + Sync>() {}
    is_send_sync::<Font<'static>>();
    is_send_sync::<Error>();
}
