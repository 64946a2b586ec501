//! A [Glyph Data Table](
//! https://docs.microsoft.com/en-us/typography/opentype/spec/glyf) implementation.

use core::fmt;

use crate::{Error, GlyphId, OutlineBuilder, Rect, Result, Tag};
use crate::error::Context;
use crate::parser::{F2Dot14, Stream};
use crate::tables::loca;

/// The maximum composite glyph nesting level.
///
/// The glyph itself is at level 0, so the deepest allowed component is at level 7.
pub const MAX_COMPONENT_DEPTH: u8 = 8;

// https://docs.microsoft.com/en-us/typography/opentype/spec/glyf#simple-glyph-description
#[derive(Clone, Copy)]
struct SimpleGlyphFlags(u8);

impl SimpleGlyphFlags {
    const ON_CURVE_POINT: Self                          = Self(1 << 0);
    const X_SHORT_VECTOR: Self                          = Self(1 << 1);
    const Y_SHORT_VECTOR: Self                          = Self(1 << 2);
    const REPEAT_FLAG: Self                             = Self(1 << 3);
    const X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR: Self    = Self(1 << 4);
    const Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR: Self    = Self(1 << 5);

    #[inline] fn contains(&self, other: Self) -> bool { (self.0 & other.0) == other.0 }
}


// https://docs.microsoft.com/en-us/typography/opentype/spec/glyf#composite-glyph-description
#[derive(Clone, Copy)]
struct CompositeGlyphFlags(u16);

impl CompositeGlyphFlags {
    const ARG_1_AND_2_ARE_WORDS: Self     = Self(1 << 0);
    const ARGS_ARE_XY_VALUES: Self        = Self(1 << 1);
    const WE_HAVE_A_SCALE: Self           = Self(1 << 3);
    const MORE_COMPONENTS: Self           = Self(1 << 5);
    const WE_HAVE_AN_X_AND_Y_SCALE: Self  = Self(1 << 6);
    const WE_HAVE_A_TWO_BY_TWO: Self      = Self(1 << 7);

    #[inline] fn contains(&self, other: Self) -> bool { (self.0 & other.0) == other.0 }
}


/// A glyph point in font units.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Point {
    /// X coordinate.
    pub x: i16,
    /// Y coordinate.
    pub y: i16,
    /// Whether the point is on the curve or a quadratic control point.
    pub on_curve: bool,
}


/// A resolved glyph outline.
///
/// Composite glyphs are already flattened.
#[derive(Clone, PartialEq, Debug)]
pub struct Contour<'a> {
    /// The glyph this outline belongs to.
    pub glyph_id: GlyphId,
    /// The bounding box stored in the glyph header.
    pub bbox: Rect,
    /// TrueType instructions. Empty for composite glyphs.
    pub instructions: &'a [u8],
    /// The last point index of each closed sub-path.
    ///
    /// Guarantee to be strictly increasing.
    pub end_points: Vec<u16>,
    /// All points, in order.
    pub points: Vec<Point>,
}

impl<'a> Contour<'a> {
    /// Returns an iterator over closed sub-paths.
    #[inline]
    pub fn contours(&self) -> Contours<'_> {
        Contours {
            points: &self.points,
            end_points: &self.end_points,
            start: 0,
        }
    }

    /// Replays the outline as path segments.
    ///
    /// Consecutive off-curve points have an implicit on-curve point between them.
    pub fn outline(&self, builder: &mut dyn OutlineBuilder) {
        for points in self.contours() {
            // Contour must have at least 2 points.
            if points.len() >= 2 {
                outline_contour(points, builder);
            }
        }
    }
}

impl fmt::Display for Contour<'_> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "Glyph {}:", self.glyph_id)?;
        writeln!(f, "  Contours: {}", self.end_points.len())?;
        writeln!(f, "  XMin: {}", self.bbox.x_min)?;
        writeln!(f, "  YMin: {}", self.bbox.y_min)?;
        writeln!(f, "  XMax: {}", self.bbox.x_max)?;
        writeln!(f, "  YMax: {}", self.bbox.y_max)?;
        writeln!(f, "  EndPoints: {:?}", self.end_points)?;
        writeln!(f, "  Instruction length: {}", self.instructions.len())?;
        writeln!(f, "  Coordinates:")?;
        for p in &self.points {
            let on_curve = if p.on_curve { "On" } else { "Off" };
            writeln!(f, "    {:8} {:8} {:>3}", p.x, p.y, on_curve)?;
        }

        Ok(())
    }
}


/// An iterator over closed sub-paths of a [`Contour`].
#[derive(Clone, Copy, Debug)]
pub struct Contours<'a> {
    points: &'a [Point],
    end_points: &'a [u16],
    start: usize,
}

impl<'a> Iterator for Contours<'a> {
    type Item = &'a [Point];

    fn next(&mut self) -> Option<Self::Item> {
        let (end, rest) = self.end_points.split_first()?;
        self.end_points = rest;
        let end = usize::from(*end) + 1;
        let points = self.points.get(self.start..end)?;
        self.start = end;
        Some(points)
    }
}


/// A [Glyph Data Table](https://docs.microsoft.com/en-us/typography/opentype/spec/glyf).
#[derive(Clone, Copy, Debug)]
pub struct Table<'a> {
    data: &'a [u8],
    loca: loca::Table<'a>,
}

impl<'a> Table<'a> {
    /// Parses a table from raw data.
    ///
    /// The table length must be equal to the last `loca` offset.
    pub fn parse(data: &'a [u8], loca: loca::Table<'a>) -> Result<Self> {
        let expected = loca.last_offset().context(Tag::LOCA, "no offsets")?;
        if data.len() != expected {
            return Err(Error::malformed(
                Tag::GLYF,
                format!("invalid length {}, expected {}", data.len(), expected),
            ));
        }

        Ok(Table { data, loca })
    }

    /// Returns the raw glyph data.
    ///
    /// Empty for glyphs without an outline.
    pub fn glyph_data(&self, glyph_id: GlyphId) -> Result<&'a [u8]> {
        self.loca.glyph_range(glyph_id)
            .and_then(|range| self.data.get(range))
            .ok_or_else(|| Error::malformed(Tag::GLYF, format!("glyph {} is out of range", glyph_id)))
    }

    /// Resolves a glyph outline.
    ///
    /// Returns `Ok(None)` for an empty glyph or a glyph without contours.
    pub fn outline(&self, glyph_id: GlyphId) -> Result<Option<Contour<'a>>> {
        self.resolve(glyph_id, 0)
    }

    fn resolve(&self, glyph_id: GlyphId, depth: u8) -> Result<Option<Contour<'a>>> {
        let data = self.glyph_data(glyph_id)?;
        if data.is_empty() {
            return Ok(None);
        }

        let mut s = Stream::new(data);
        let number_of_contours: i16 = s.read().context(Tag::GLYF, "truncated glyph header")?;
        let bbox = Rect {
            x_min: s.read().context(Tag::GLYF, "truncated glyph header")?,
            y_min: s.read().context(Tag::GLYF, "truncated glyph header")?,
            x_max: s.read().context(Tag::GLYF, "truncated glyph header")?,
            y_max: s.read().context(Tag::GLYF, "truncated glyph header")?,
        };

        let contour = Contour {
            glyph_id,
            bbox,
            instructions: &[],
            end_points: Vec::new(),
            points: Vec::new(),
        };

        if number_of_contours > 0 {
            parse_simple(s, number_of_contours as u16, contour).map(Some)
        } else if number_of_contours < 0 {
            if depth >= MAX_COMPONENT_DEPTH {
                return Err(Error::limit(
                    Tag::GLYF,
                    format!("glyph {} is nested deeper than {} levels", glyph_id, MAX_COMPONENT_DEPTH),
                ));
            }

            self.parse_composite(s, depth, contour)
        } else {
            // A glyph without contours.
            Ok(None)
        }
    }

    fn parse_composite(
        &self,
        mut s: Stream<'a>,
        depth: u8,
        mut contour: Contour<'a>,
    ) -> Result<Option<Contour<'a>>> {
        type Flags = CompositeGlyphFlags;

        let glyph_id = contour.glyph_id;
        let truncated = || Error::malformed(Tag::GLYF, format!("glyph {} component is truncated", glyph_id));

        loop {
            let flags = CompositeGlyphFlags(s.read::<u16>().ok_or_else(truncated)?);
            let sub_glyph_id: GlyphId = s.read().ok_or_else(truncated)?;

            if !flags.contains(Flags::ARGS_ARE_XY_VALUES) {
                return Err(Error::unsupported(Tag::GLYF, "point-matching composite components"));
            }

            let (dx, dy) = if flags.contains(Flags::ARG_1_AND_2_ARE_WORDS) {
                let dx: i16 = s.read().ok_or_else(truncated)?;
                let dy: i16 = s.read().ok_or_else(truncated)?;
                (dx, dy)
            } else {
                let dx: i8 = s.read().ok_or_else(truncated)?;
                let dy: i8 = s.read().ok_or_else(truncated)?;
                (i16::from(dx), i16::from(dy))
            };

            let transform = if flags.contains(Flags::WE_HAVE_A_SCALE) {
                let scale: F2Dot14 = s.read().ok_or_else(truncated)?;
                Some(Transform { xx: scale, xy: F2Dot14::ZERO, yx: F2Dot14::ZERO, yy: scale })
            } else if flags.contains(Flags::WE_HAVE_AN_X_AND_Y_SCALE) {
                let xx = s.read().ok_or_else(truncated)?;
                let yy = s.read().ok_or_else(truncated)?;
                Some(Transform { xx, xy: F2Dot14::ZERO, yx: F2Dot14::ZERO, yy })
            } else if flags.contains(Flags::WE_HAVE_A_TWO_BY_TWO) {
                Some(Transform {
                    xx: s.read().ok_or_else(truncated)?,
                    xy: s.read().ok_or_else(truncated)?,
                    yx: s.read().ok_or_else(truncated)?,
                    yy: s.read().ok_or_else(truncated)?,
                })
            } else {
                None
            };

            // Empty sub-glyphs contribute nothing.
            if let Some(sub) = self.resolve(sub_glyph_id, depth + 1)? {
                append_component(&mut contour, sub, transform, dx, dy)?;
            }

            if !flags.contains(Flags::MORE_COMPONENTS) {
                break;
            }
        }

        if contour.end_points.is_empty() {
            Ok(None)
        } else {
            Ok(Some(contour))
        }
    }
}


/// A component 2x2 matrix.
#[derive(Clone, Copy, Debug)]
struct Transform {
    xx: F2Dot14,
    xy: F2Dot14,
    yx: F2Dot14,
    yy: F2Dot14,
}

impl Transform {
    #[inline]
    fn apply(&self, x: i16, y: i16) -> (i32, i32) {
        (
            self.xx.mul(x) + self.yx.mul(y),
            self.xy.mul(x) + self.yy.mul(y),
        )
    }
}

// Coordinates wrap at 16 bits, like the simple glyph deltas do.
fn append_component(
    contour: &mut Contour,
    sub: Contour,
    transform: Option<Transform>,
    dx: i16,
    dy: i16,
) -> Result<()> {
    let offset = contour.points.len();
    for end in &sub.end_points {
        let end = offset + usize::from(*end);
        if end > usize::from(core::u16::MAX) {
            return Err(Error::malformed(
                Tag::GLYF,
                format!("glyph {} has too many points", contour.glyph_id),
            ));
        }

        contour.end_points.push(end as u16);
    }

    contour.points.extend(sub.points.iter().map(|p| {
        let (x, y) = match transform {
            Some(ts) => ts.apply(p.x, p.y),
            None => (i32::from(p.x), i32::from(p.y)),
        };

        Point {
            x: (x + i32::from(dx)) as i16,
            y: (y + i32::from(dy)) as i16,
            on_curve: p.on_curve,
        }
    }));

    Ok(())
}

fn parse_simple<'a>(
    mut s: Stream<'a>,
    number_of_contours: u16,
    mut contour: Contour<'a>,
) -> Result<Contour<'a>> {
    type Flags = SimpleGlyphFlags;

    let glyph_id = contour.glyph_id;
    let truncated = |what: &str| Error::malformed(Tag::GLYF, format!("glyph {} {} are truncated", glyph_id, what));

    let end_points = s.read_array16::<u16>(number_of_contours).ok_or_else(|| truncated("end points"))?;
    let mut prev = None;
    for n in end_points {
        if prev.map_or(false, |prev| n <= prev) {
            return Err(Error::malformed(
                Tag::GLYF,
                format!("glyph {} end points are not increasing", glyph_id),
            ));
        }

        prev = Some(n);
    }

    // `number_of_contours` is positive, so there is at least one end point.
    let points_total = prev.map_or(0, |n| usize::from(n) + 1);

    let instructions_len: u16 = s.read().ok_or_else(|| truncated("instructions"))?;
    contour.instructions = s.read_bytes(usize::from(instructions_len)).ok_or_else(|| truncated("instructions"))?;

    // Flags are collected first, since coordinates sizes depend on them.
    // The vector grows only as flag bytes are consumed.
    let mut flags: Vec<Flags> = Vec::new();
    while flags.len() < points_total {
        let f = SimpleGlyphFlags(s.read::<u8>().ok_or_else(|| truncated("flags"))?);
        flags.push(f);

        if f.contains(Flags::REPEAT_FLAG) {
            let repeats: u8 = s.read().ok_or_else(|| truncated("flags"))?;
            if flags.len() + usize::from(repeats) > points_total {
                return Err(Error::malformed(
                    Tag::GLYF,
                    format!("glyph {} flag repeat overflows the point count", glyph_id),
                ));
            }

            for _ in 0..repeats {
                flags.push(f);
            }
        }
    }

    let mut xs = Vec::with_capacity(points_total);
    let mut x = 0i16;
    for f in &flags {
        let dx = read_coord(&mut s, *f, Flags::X_SHORT_VECTOR, Flags::X_IS_SAME_OR_POSITIVE_X_SHORT_VECTOR)
            .ok_or_else(|| truncated("x coordinates"))?;
        x = x.wrapping_add(dx);
        xs.push(x);
    }

    contour.points.reserve(points_total);
    let mut y = 0i16;
    for (f, x) in flags.iter().zip(xs) {
        let dy = read_coord(&mut s, *f, Flags::Y_SHORT_VECTOR, Flags::Y_IS_SAME_OR_POSITIVE_Y_SHORT_VECTOR)
            .ok_or_else(|| truncated("y coordinates"))?;
        y = y.wrapping_add(dy);
        contour.points.push(Point { x, y, on_curve: f.contains(Flags::ON_CURVE_POINT) });
    }

    contour.end_points = end_points.into_iter().collect();
    Ok(contour)
}

fn read_coord(
    s: &mut Stream,
    flags: SimpleGlyphFlags,
    short_vector: SimpleGlyphFlags,
    is_same_or_positive_short_vector: SimpleGlyphFlags,
) -> Option<i16> {
    let flags = (
        flags.contains(short_vector),
        flags.contains(is_same_or_positive_short_vector),
    );

    Some(match flags {
        (true, true) => {
            i16::from(s.read::<u8>()?)
        }
        (true, false) => {
            -i16::from(s.read::<u8>()?)
        }
        (false, true) => {
            // Keep previous coordinate.
            0
        }
        (false, false) => {
            s.read()?
        }
    })
}


#[derive(Clone, Copy, Debug)]
struct PointF {
    x: f32,
    y: f32,
}

impl PointF {
    #[inline]
    fn lerp(&self, other: PointF, t: f32) -> PointF {
        PointF {
            x: self.x + t * (other.x - self.x),
            y: self.y + t * (other.y - self.y),
        }
    }
}

fn outline_contour(points: &[Point], builder: &mut dyn OutlineBuilder) {
    let mut first_oncurve: Option<PointF> = None;
    let mut first_offcurve: Option<PointF> = None;
    let mut last_offcurve: Option<PointF> = None;
    for point in points {
        let p = PointF { x: f32::from(point.x), y: f32::from(point.y) };
        if first_oncurve.is_none() {
            if point.on_curve {
                first_oncurve = Some(p);
                builder.move_to(p.x, p.y);
            } else {
                match first_offcurve {
                    Some(offcurve) => {
                        let mid = offcurve.lerp(p, 0.5);
                        first_oncurve = Some(mid);
                        last_offcurve = Some(p);
                        builder.move_to(mid.x, mid.y);
                    }
                    None => {
                        first_offcurve = Some(p);
                    }
                }
            }
        } else {
            match (last_offcurve, point.on_curve) {
                (Some(offcurve), true) => {
                    last_offcurve = None;
                    builder.quad_to(offcurve.x, offcurve.y, p.x, p.y);
                }
                (Some(offcurve), false) => {
                    last_offcurve = Some(p);
                    let mid = offcurve.lerp(p, 0.5);
                    builder.quad_to(offcurve.x, offcurve.y, mid.x, mid.y);
                }
                (None, true) => {
                    builder.line_to(p.x, p.y);
                }
                (None, false) => {
                    last_offcurve = Some(p);
                }
            }
        }
    }

    loop {
        match (first_offcurve, last_offcurve) {
            (Some(offcurve1), Some(offcurve2)) => {
                last_offcurve = None;
                let mid = offcurve2.lerp(offcurve1, 0.5);
                builder.quad_to(offcurve2.x, offcurve2.y, mid.x, mid.y);
            }
            (Some(offcurve1), None) => {
                if let Some(p) = first_oncurve {
                    builder.quad_to(offcurve1.x, offcurve1.y, p.x, p.y);
                }
                break;
            }
            (None, Some(offcurve2)) => {
                if let Some(p) = first_oncurve {
                    builder.quad_to(offcurve2.x, offcurve2.y, p.x, p.y);
                }
                break;
            }
            (None, None) => {
                if let Some(p) = first_oncurve {
                    builder.line_to(p.x, p.y);
                }
                break;
            }
        }
    }

    builder.close();
}
