//! Binary parsing utils.
//!
//! This module should not be used directly, unless you're planning to parse
//! some tables manually.

use core::convert::TryInto;

/// A trait for parsing raw binary data of fixed size.
///
/// This is a low-level, internal trait that should not be used directly.
pub trait FromData: Sized {
    /// Object's raw data size.
    ///
    /// Not always the same as `mem::size_of`.
    const SIZE: usize;

    /// Parses an object from a raw data.
    fn parse(data: &[u8]) -> Option<Self>;
}

impl FromData for u8 {
    const SIZE: usize = 1;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.get(0).copied()
    }
}

impl FromData for i8 {
    const SIZE: usize = 1;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.get(0).copied().map(|n| n as i8)
    }
}

impl FromData for u16 {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.try_into().ok().map(u16::from_be_bytes)
    }
}

impl FromData for i16 {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.try_into().ok().map(i16::from_be_bytes)
    }
}

impl FromData for u32 {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.try_into().ok().map(u32::from_be_bytes)
    }
}

impl FromData for i32 {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.try_into().ok().map(i32::from_be_bytes)
    }
}

impl FromData for u64 {
    const SIZE: usize = 8;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        data.try_into().ok().map(u64::from_be_bytes)
    }
}


/// A [Fixed](https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types)
/// 16.16 number.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Fixed(pub f32);

impl FromData for Fixed {
    const SIZE: usize = 4;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        i32::parse(data).map(|n| Fixed(n as f32 / 65536.0))
    }
}


/// A [F2DOT14](https://docs.microsoft.com/en-us/typography/opentype/spec/otff#data-types)
/// 2.14 fixed-point number.
///
/// The raw value is kept as is, so transforms can be applied
/// with integer arithmetic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct F2Dot14(pub i16);

impl F2Dot14 {
    /// `1.0` in 2.14 representation.
    pub const ONE: Self = F2Dot14(1 << 14);

    /// `0.0` in 2.14 representation.
    pub const ZERO: Self = F2Dot14(0);

    /// Multiplies an integer by the current value.
    ///
    /// The product is rounded to the nearest integer by adding half of the
    /// scale unit before shifting.
    #[inline]
    pub fn mul(self, n: i16) -> i32 {
        const HALF: i64 = 1 << 13;
        ((i64::from(n) * i64::from(self.0) + HALF) >> 14) as i32
    }
}

impl FromData for F2Dot14 {
    const SIZE: usize = 2;

    #[inline]
    fn parse(data: &[u8]) -> Option<Self> {
        i16::parse(data).map(F2Dot14)
    }
}


/// A safe u32 to usize casting.
///
/// Rust doesn't implement `From<u32> for usize`,
/// because it has to support 16 bit targets.
/// We don't, so we can allow this.
pub trait NumFrom<T>: Sized {
    /// Converts u32 into usize.
    fn num_from(_: T) -> Self;
}

impl NumFrom<u32> for usize {
    #[inline]
    fn num_from(v: u32) -> Self {
        #[cfg(any(target_pointer_width = "32", target_pointer_width = "64"))]
        {
            v as usize
        }

        // compilation error on 16 bit targets
    }
}


/// A slice-like container that converts internal binary data only on access.
///
/// Array values are stored in a continuous data chunk.
#[derive(Clone, Copy)]
pub struct LazyArray<'a, T, Idx> {
    data: &'a [u8],
    data_type: core::marker::PhantomData<T>,
    len_type: core::marker::PhantomData<Idx>,
}

/// An alias to `LazyArray` with max length equal to `u16`.
pub type LazyArray16<'a, T> = LazyArray<'a, T, u16>;

/// An alias to `LazyArray` with max length equal to `u32`.
pub type LazyArray32<'a, T> = LazyArray<'a, T, u32>;

/// A u16/u32 length type used by `LazyArray`.
pub trait ArraySize: Copy + Ord {
    /// Associated 0.
    const ZERO: Self;

    /// Creates `ArraySize` from `usize`. Saturates on overflow.
    fn from_usize(n: usize) -> Self;

    /// Converts `ArraySize` to `usize`.
    fn to_usize(self) -> usize;
}

impl ArraySize for u16 {
    const ZERO: Self = 0;

    #[inline]
    fn from_usize(n: usize) -> Self {
        core::convert::TryFrom::try_from(n).unwrap_or(core::u16::MAX)
    }

    #[inline]
    fn to_usize(self) -> usize {
        usize::from(self)
    }
}

impl ArraySize for u32 {
    const ZERO: Self = 0;

    #[inline]
    fn from_usize(n: usize) -> Self {
        core::convert::TryFrom::try_from(n).unwrap_or(core::u32::MAX)
    }

    #[inline]
    fn to_usize(self) -> usize {
        usize::num_from(self)
    }
}

impl<T, Idx> Default for LazyArray<'_, T, Idx> {
    #[inline]
    fn default() -> Self {
        LazyArray {
            data: &[],
            data_type: core::marker::PhantomData,
            len_type: core::marker::PhantomData,
        }
    }
}

impl<'a, T: FromData, Idx: ArraySize> LazyArray<'a, T, Idx> {
    /// Creates a new `LazyArray`.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        LazyArray {
            data,
            data_type: core::marker::PhantomData,
            len_type: core::marker::PhantomData,
        }
    }

    /// Returns a value at `index`.
    #[inline]
    pub fn get(&self, index: Idx) -> Option<T> {
        if index >= self.len() {
            return None;
        }

        let start = index.to_usize() * T::SIZE;
        let end = start + T::SIZE;
        self.data.get(start..end).and_then(T::parse)
    }

    /// Returns the last value.
    #[inline]
    pub fn last(&self) -> Option<T> {
        let len = self.data.len() / T::SIZE;
        let index = len.checked_sub(1)?;
        self.get(Idx::from_usize(index))
    }

    /// Returns array's length.
    #[inline]
    pub fn len(&self) -> Idx {
        Idx::from_usize(self.data.len() / T::SIZE)
    }

    /// Checks if array is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == Idx::ZERO
    }

    /// Performs a binary search using specified closure.
    ///
    /// Returns the index and the value of a matched element.
    #[inline]
    pub fn binary_search_by<F>(&self, mut f: F) -> Option<(Idx, T)>
        where F: FnMut(&T) -> core::cmp::Ordering
    {
        // Based on Rust std implementation.

        use core::cmp::Ordering;

        let mut size = self.data.len() / T::SIZE;
        if size == 0 {
            return None;
        }

        let mut base = 0;
        while size > 1 {
            let half = size / 2;
            let mid = base + half;
            // mid is always in [0, size), that means mid is >= 0 and < size.
            // mid >= 0: by definition
            // mid < size: mid = size / 2 + size / 4 + size / 8 ...
            let cmp = f(&self.get(Idx::from_usize(mid))?);
            base = if cmp == Ordering::Greater { base } else { mid };
            size -= half;
        }

        // base is always in [0, size) because base <= mid.
        let value = self.get(Idx::from_usize(base))?;
        if f(&value) == Ordering::Equal { Some((Idx::from_usize(base), value)) } else { None }
    }
}

impl<'a, T: FromData + core::fmt::Debug + Copy, Idx: ArraySize> core::fmt::Debug for LazyArray<'a, T, Idx> {
    fn fmt(&self, f: &mut core::fmt::Formatter) -> core::fmt::Result {
        f.debug_list().entries(self.into_iter()).finish()
    }
}

impl<'a, T: FromData, Idx: ArraySize> IntoIterator for LazyArray<'a, T, Idx> {
    type Item = T;
    type IntoIter = LazyArrayIter<'a, T, Idx>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        LazyArrayIter {
            data: self,
            index: 0,
        }
    }
}


/// An iterator over `LazyArray`.
#[derive(Clone, Copy)]
#[allow(missing_debug_implementations)]
pub struct LazyArrayIter<'a, T, Idx> {
    data: LazyArray<'a, T, Idx>,
    index: usize,
}

impl<'a, T: FromData, Idx: ArraySize> Iterator for LazyArrayIter<'a, T, Idx> {
    type Item = T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        let start = self.index.checked_mul(T::SIZE)?;
        let end = start.checked_add(T::SIZE)?;
        let value = self.data.data.get(start..end).and_then(T::parse)?;
        self.index += 1;
        Some(value)
    }

    #[inline]
    fn count(self) -> usize {
        (self.data.data.len() / T::SIZE).saturating_sub(self.index)
    }
}


/// A streaming binary parser.
///
/// Every read is checked against the remaining length before anything is consumed,
/// so a failed read leaves the stream position untouched.
#[derive(Clone, Copy, Default, Debug)]
pub struct Stream<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Stream<'a> {
    /// Creates a new `Stream` parser.
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Stream { data, offset: 0 }
    }

    /// Checks that stream reached the end of the data.
    #[inline]
    pub fn at_end(&self) -> bool {
        self.offset >= self.data.len()
    }

    /// Returns the current offset.
    #[inline]
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Returns the number of bytes left to read.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.data.len().saturating_sub(self.offset)
    }

    /// Returns the trailing data.
    #[inline]
    pub fn tail(&self) -> Option<&'a [u8]> {
        self.data.get(self.offset..)
    }

    /// Advances by `FromData::SIZE`.
    ///
    /// Doesn't check bounds.
    #[inline]
    pub fn skip<T: FromData>(&mut self) {
        self.advance(T::SIZE);
    }

    /// Advances by the specified `len`.
    ///
    /// Doesn't check bounds.
    #[inline]
    pub fn advance(&mut self, len: usize) {
        self.offset = self.offset.saturating_add(len);
    }

    /// Parses the type from the stream.
    ///
    /// Returns `None` when there is not enough data left in the stream
    /// or the type parsing failed.
    #[inline]
    pub fn read<T: FromData>(&mut self) -> Option<T> {
        self.read_bytes(T::SIZE).and_then(T::parse)
    }

    /// Parses the type from the stream at offset.
    #[inline]
    pub fn read_at<T: FromData>(data: &[u8], offset: usize) -> Option<T> {
        let end = offset.checked_add(T::SIZE)?;
        data.get(offset..end).and_then(T::parse)
    }

    /// Reads N bytes from the stream.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> Option<&'a [u8]> {
        let end = self.offset.checked_add(len)?;
        let v = self.data.get(self.offset..end)?;
        self.offset = end;
        Some(v)
    }

    /// Reads the next `count` types as a slice.
    #[inline]
    pub fn read_array16<T: FromData>(&mut self, count: u16) -> Option<LazyArray16<'a, T>> {
        let len = usize::from(count) * T::SIZE;
        self.read_bytes(len).map(LazyArray16::new)
    }

    /// Reads the next `count` types as a slice.
    #[inline]
    pub fn read_array32<T: FromData>(&mut self, count: u32) -> Option<LazyArray32<'a, T>> {
        let len = usize::num_from(count).checked_mul(T::SIZE)?;
        self.read_bytes(len).map(LazyArray32::new)
    }
}
