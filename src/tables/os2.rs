//! An [OS/2 and Windows Metrics Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/os2) implementation.

use crate::{Error, LineMetrics, Result, Tag};
use crate::error::Context;
use crate::parser::Stream;


/// A font [weight](https://docs.microsoft.com/en-us/typography/opentype/spec/os2#usweightclass).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[allow(missing_docs)]
pub enum Weight {
    Thin,
    ExtraLight,
    Light,
    Normal,
    Medium,
    SemiBold,
    Bold,
    ExtraBold,
    Black,
    Other(u16),
}

impl Weight {
    /// Returns a numeric representation of a weight.
    #[inline]
    pub fn to_number(self) -> u16 {
        match self {
            Weight::Thin        => 100,
            Weight::ExtraLight  => 200,
            Weight::Light       => 300,
            Weight::Normal      => 400,
            Weight::Medium      => 500,
            Weight::SemiBold    => 600,
            Weight::Bold        => 700,
            Weight::ExtraBold   => 800,
            Weight::Black       => 900,
            Weight::Other(n)    => n,
        }
    }
}

impl From<u16> for Weight {
    #[inline]
    fn from(value: u16) -> Self {
        match value {
            100 => Weight::Thin,
            200 => Weight::ExtraLight,
            300 => Weight::Light,
            400 => Weight::Normal,
            500 => Weight::Medium,
            600 => Weight::SemiBold,
            700 => Weight::Bold,
            800 => Weight::ExtraBold,
            900 => Weight::Black,
            _   => Weight::Other(value),
        }
    }
}

impl Default for Weight {
    #[inline]
    fn default() -> Self {
        Weight::Normal
    }
}


/// A font [width](https://docs.microsoft.com/en-us/typography/opentype/spec/os2#uswidthclass).
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Debug)]
#[allow(missing_docs)]
pub enum Width {
    UltraCondensed,
    ExtraCondensed,
    Condensed,
    SemiCondensed,
    Normal,
    SemiExpanded,
    Expanded,
    ExtraExpanded,
    UltraExpanded,
}

impl Width {
    /// Returns a numeric representation of a width.
    #[inline]
    pub fn to_number(self) -> u16 {
        match self {
            Width::UltraCondensed   => 1,
            Width::ExtraCondensed   => 2,
            Width::Condensed        => 3,
            Width::SemiCondensed    => 4,
            Width::Normal           => 5,
            Width::SemiExpanded     => 6,
            Width::Expanded         => 7,
            Width::ExtraExpanded    => 8,
            Width::UltraExpanded    => 9,
        }
    }
}

impl From<u16> for Width {
    /// Unknown classes are treated as `Normal`.
    #[inline]
    fn from(value: u16) -> Self {
        match value {
            1 => Width::UltraCondensed,
            2 => Width::ExtraCondensed,
            3 => Width::Condensed,
            4 => Width::SemiCondensed,
            6 => Width::SemiExpanded,
            7 => Width::Expanded,
            8 => Width::ExtraExpanded,
            9 => Width::UltraExpanded,
            _ => Width::Normal,
        }
    }
}

impl Default for Width {
    #[inline]
    fn default() -> Self {
        Width::Normal
    }
}


/// A script metrics used by subscript and superscript.
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct ScriptMetrics {
    /// Horizontal font size.
    pub x_size: i16,

    /// Vertical font size.
    pub y_size: i16,

    /// X offset.
    pub x_offset: i16,

    /// Y offset.
    pub y_offset: i16,
}

impl ScriptMetrics {
    fn parse(s: &mut Stream) -> Option<Self> {
        Some(ScriptMetrics {
            x_size: s.read()?,
            y_size: s.read()?,
            x_offset: s.read()?,
            y_offset: s.read()?,
        })
    }
}


/// Typographic vertical metrics.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct TypoMetrics {
    pub ascender: i16,
    pub descender: i16,
    pub line_gap: i16,
}


/// Windows clipping metrics.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct WindowsMetrics {
    pub ascent: u16,
    pub descent: u16,
}


// https://docs.microsoft.com/en-us/typography/opentype/spec/os2#fsselection
#[derive(Clone, Copy, Debug)]
struct SelectionFlags(u16);

impl SelectionFlags {
    #[inline] fn italic(self) -> bool { self.0 & (1 << 0) != 0 }
    #[inline] fn bold(self) -> bool { self.0 & (1 << 5) != 0 }
    #[inline] fn regular(self) -> bool { self.0 & (1 << 6) != 0 }
    #[inline] fn use_typo_metrics(self) -> bool { self.0 & (1 << 7) != 0 }
    #[inline] fn oblique(self) -> bool { self.0 & (1 << 9) != 0 }
}


/// An [OS/2 and Windows Metrics Table](https://docs.microsoft.com/en-us/typography/opentype/spec/os2).
///
/// Fields added by later versions are `None` for older tables.
#[allow(missing_docs)]
#[derive(Clone, Copy, Debug)]
pub struct Table {
    pub version: u16,
    pub x_avg_char_width: i16,
    pub weight_class: u16,
    pub width_class: u16,
    pub fs_type: u16,
    pub subscript_metrics: ScriptMetrics,
    pub superscript_metrics: ScriptMetrics,
    pub strikeout_metrics: LineMetrics,
    pub family_class: i16,
    pub panose: [u8; 10],
    pub unicode_ranges: [u32; 4],
    pub vendor_id: Tag,
    pub first_char_index: u16,
    pub last_char_index: u16,
    pub windows_metrics: Option<WindowsMetrics>,
    pub code_page_ranges: Option<[u32; 2]>,
    pub x_height: Option<i16>,
    pub capital_height: Option<i16>,
    pub default_char: Option<u16>,
    pub break_char: Option<u16>,
    pub max_context: Option<u16>,
    pub lower_optical_point_size: Option<u16>,
    pub upper_optical_point_size: Option<u16>,
    selection: SelectionFlags,
    typo_metrics: Option<TypoMetrics>,
}

impl Table {
    /// Parses a table from raw data.
    ///
    /// The table length must match its version exactly.
    /// Version 0 can be 68 or 78 bytes long, the latter with typographic metrics.
    pub fn parse(data: &[u8]) -> Result<Self> {
        let mut s = Stream::new(data);
        let version: u16 = s.read().context(Tag::OS_2, "truncated")?;
        let is_valid_length = match version {
            0 => data.len() == 68 || data.len() == 78,
            1 => data.len() == 86,
            2..=4 => data.len() == 96,
            5 => data.len() == 100,
            _ => return Err(Error::malformed(Tag::OS_2, format!("invalid version {}", version))),
        };

        if !is_valid_length {
            return Err(Error::malformed(
                Tag::OS_2,
                format!("invalid length {} for version {}", data.len(), version),
            ));
        }

        parse_fields(&mut s, version).context(Tag::OS_2, "truncated")
    }

    /// Returns typographic metrics.
    ///
    /// `None` for a version 0 table without them.
    #[inline]
    pub fn typo_metrics(&self) -> Option<TypoMetrics> {
        self.typo_metrics
    }

    /// Checks that typographic metrics should be used for line layout.
    #[inline]
    pub fn use_typographic_metrics(&self) -> bool {
        self.version >= 4 && self.selection.use_typo_metrics()
    }

    /// Returns the raw `fsSelection` flags.
    #[inline]
    pub fn selection_flags(&self) -> u16 {
        self.selection.0
    }

    /// Returns font's weight.
    #[inline]
    pub fn weight(&self) -> Weight {
        Weight::from(self.weight_class)
    }

    /// Returns font's width.
    #[inline]
    pub fn width(&self) -> Width {
        Width::from(self.width_class)
    }

    /// Checks that font is marked as *Regular*.
    #[inline]
    pub fn is_regular(&self) -> bool {
        self.selection.regular()
    }

    /// Checks that font is marked as *Italic*.
    #[inline]
    pub fn is_italic(&self) -> bool {
        self.selection.italic()
    }

    /// Checks that font is marked as *Bold*.
    #[inline]
    pub fn is_bold(&self) -> bool {
        self.selection.bold()
    }

    /// Checks that font is marked as *Oblique*.
    ///
    /// The flag is defined only since version 4.
    #[inline]
    pub fn is_oblique(&self) -> bool {
        self.version >= 4 && self.selection.oblique()
    }
}

fn parse_fields(s: &mut Stream, version: u16) -> Option<Table> {
    let x_avg_char_width = s.read()?;
    let weight_class = s.read()?;
    let width_class = s.read()?;
    let fs_type = s.read()?;
    let subscript_metrics = ScriptMetrics::parse(s)?;
    let superscript_metrics = ScriptMetrics::parse(s)?;
    let strikeout_thickness = s.read()?;
    let strikeout_position = s.read()?;
    let family_class = s.read()?;

    let mut panose = [0; 10];
    panose.copy_from_slice(s.read_bytes(10)?);

    let unicode_ranges = [s.read()?, s.read()?, s.read()?, s.read()?];
    let vendor_id = s.read()?;
    let selection = SelectionFlags(s.read()?);
    let first_char_index = s.read()?;
    let last_char_index = s.read()?;

    let mut table = Table {
        version,
        x_avg_char_width,
        weight_class,
        width_class,
        fs_type,
        subscript_metrics,
        superscript_metrics,
        strikeout_metrics: LineMetrics {
            position: strikeout_position,
            thickness: strikeout_thickness,
        },
        family_class,
        panose,
        unicode_ranges,
        vendor_id,
        first_char_index,
        last_char_index,
        windows_metrics: None,
        code_page_ranges: None,
        x_height: None,
        capital_height: None,
        default_char: None,
        break_char: None,
        max_context: None,
        lower_optical_point_size: None,
        upper_optical_point_size: None,
        selection,
        typo_metrics: None,
    };

    // A short version 0 table ends here.
    if s.at_end() {
        return Some(table);
    }

    table.typo_metrics = Some(TypoMetrics {
        ascender: s.read()?,
        descender: s.read()?,
        line_gap: s.read()?,
    });
    table.windows_metrics = Some(WindowsMetrics {
        ascent: s.read()?,
        descent: s.read()?,
    });

    if version < 1 {
        return Some(table);
    }

    table.code_page_ranges = Some([s.read()?, s.read()?]);

    if version < 2 {
        return Some(table);
    }

    table.x_height = Some(s.read()?);
    table.capital_height = Some(s.read()?);
    table.default_char = Some(s.read()?);
    table.break_char = Some(s.read()?);
    table.max_context = Some(s.read()?);

    if version < 5 {
        return Some(table);
    }

    table.lower_optical_point_size = Some(s.read()?);
    table.upper_optical_point_size = Some(s.read()?);

    Some(table)
}
