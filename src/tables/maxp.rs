//! A [Maximum Profile Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/maxp) implementation.

use core::num::NonZeroU16;

use crate::{Error, Flavor, Result, Tag};
use crate::error::Context;
use crate::parser::Stream;

const VERSION_0_5: u32 = 0x00005000;
const VERSION_1_0: u32 = 0x00010000;

/// Limits stored in a version 1.0 table.
#[allow(missing_docs)]
#[derive(Clone, Copy, PartialEq, Eq, Default, Debug)]
pub struct TrueTypeLimits {
    pub max_points: u16,
    pub max_contours: u16,
    pub max_composite_points: u16,
    pub max_composite_contours: u16,
    pub max_zones: u16,
    pub max_twilight_points: u16,
    pub max_storage: u16,
    pub max_function_defs: u16,
    pub max_instruction_defs: u16,
    pub max_stack_elements: u16,
    pub max_size_of_instructions: u16,
    pub max_component_elements: u16,
    pub max_component_depth: u16,
}


/// A [Maximum Profile Table](https://docs.microsoft.com/en-us/typography/opentype/spec/maxp).
#[derive(Clone, Copy, Debug)]
pub struct Table {
    /// The number of glyphs in the font.
    pub number_of_glyphs: NonZeroU16,
    /// TrueType limits. Present only in version 1.0.
    pub limits: Option<TrueTypeLimits>,
}

impl Table {
    /// Parses a table from raw data.
    ///
    /// Version 0.5 is accepted only for CFF fonts and version 1.0 only for TrueType.
    pub fn parse(data: &[u8], flavor: Flavor) -> Result<Self> {
        let mut s = Stream::new(data);
        let version: u32 = s.read().context(Tag::MAXP, "truncated")?;
        let number_of_glyphs: u16 = s.read().context(Tag::MAXP, "truncated")?;
        let number_of_glyphs = NonZeroU16::new(number_of_glyphs)
            .ok_or_else(|| Error::malformed(Tag::MAXP, "zero glyphs"))?;

        let limits = match (version, flavor, data.len()) {
            (VERSION_0_5, Flavor::Cff, 6) => None,
            (VERSION_1_0, Flavor::TrueType, 32) => Some(parse_limits(&mut s)?),
            _ => {
                return Err(Error::malformed(
                    Tag::MAXP,
                    format!("invalid version 0x{:08X} with length {}", version, data.len()),
                ));
            }
        };

        Ok(Table { number_of_glyphs, limits })
    }
}

fn parse_limits(s: &mut Stream) -> Result<TrueTypeLimits> {
    let mut read = || s.read::<u16>().context(Tag::MAXP, "truncated");
    Ok(TrueTypeLimits {
        max_points: read()?,
        max_contours: read()?,
        max_composite_points: read()?,
        max_composite_contours: read()?,
        max_zones: read()?,
        max_twilight_points: read()?,
        max_storage: read()?,
        max_function_defs: read()?,
        max_instruction_defs: read()?,
        max_stack_elements: read()?,
        max_size_of_instructions: read()?,
        max_component_elements: read()?,
        max_component_depth: read()?,
    })
}
