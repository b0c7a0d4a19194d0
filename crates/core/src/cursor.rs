//! Underlying code unit sequences, in four capability tiers.
//!
//! A view decodes characters out of a cursor over code units. What the view
//! can offer depends on what the cursor can do:
//!
//! | tier | trait | view iteration |
//! |---|---|---|
//! | single pass | [`InputCursor`] | input only |
//! | multi pass | [`ForwardCursor`] | forward, restartable |
//! | bidirectional | [`BidirectionalCursor`] | forward and reverse |
//! | random access | [`RandomAccessCursor`] | plus indexing (fixed-width codecs) |
//!
//! Each tier is a supertrait of the next, so a cursor of a stronger tier can
//! be used anywhere a weaker one is asked for.

/// Single-pass source of code units.
pub trait InputCursor {
    type Unit: Copy;

    fn next_unit(&mut self) -> Option<Self::Unit>;
}

/// Restartable source: cloning saves the position.
pub trait ForwardCursor: InputCursor + Clone {
    /// Units consumed from the start of the sequence
    fn offset(&self) -> usize;

    fn at_end(&self) -> bool;
}

/// Source that can also step backward.
pub trait BidirectionalCursor: ForwardCursor {
    fn prev_unit(&mut self) -> Option<Self::Unit>;

    /// Move past the last unit.
    fn seek_end(&mut self) {
        while self.next_unit().is_some() {}
    }
}

/// Source with constant-time positioning.
pub trait RandomAccessCursor: BidirectionalCursor {
    /// Total number of units in the sequence
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Move to an absolute offset, clamped to the end.
    fn seek(&mut self, offset: usize);
}

/// Pull up to `n` units forward from `cursor`.
pub(crate) fn fill_forward<K, A>(cursor: &mut K, n: usize, limit: Option<usize>, out: &mut smallvec::SmallVec<A>)
where
    K: ForwardCursor,
    A: smallvec::Array<Item = K::Unit>,
{
    while out.len() < n {
        if limit.is_some_and(|limit| cursor.offset() >= limit) {
            break;
        }
        match cursor.next_unit() {
            Some(unit) => out.push(unit),
            None => break,
        }
    }
}

/// Pull up to `n` units backward from `cursor`, not going below `floor`.
/// The units are returned in sequence order.
pub(crate) fn fill_backward<K, A>(cursor: &mut K, n: usize, floor: usize, out: &mut smallvec::SmallVec<A>)
where
    K: BidirectionalCursor,
    A: smallvec::Array<Item = K::Unit>,
{
    while out.len() < n && cursor.offset() > floor {
        match cursor.prev_unit() {
            Some(unit) => out.push(unit),
            None => break,
        }
    }
    out.reverse();
}

/// Any iterator, read once.
#[derive(Debug)]
pub struct Units<I> {
    iter: I,
}

impl<I: Iterator> Units<I>
where
    I::Item: Copy,
{
    pub fn new<T: IntoIterator<IntoIter = I>>(iter: T) -> Self {
        Self {
            iter: iter.into_iter(),
        }
    }
}

impl<I: Iterator> InputCursor for Units<I>
where
    I::Item: Copy,
{
    type Unit = I::Item;

    fn next_unit(&mut self) -> Option<I::Item> {
        self.iter.next()
    }
}

/// A cloneable iterator, usable for multi-pass decoding.
#[derive(Debug, Clone)]
pub struct Multipass<I> {
    iter: I,
    offset: usize,
}

impl<I: Iterator + Clone> Multipass<I>
where
    I::Item: Copy,
{
    pub fn new<T: IntoIterator<IntoIter = I>>(iter: T) -> Self {
        Self {
            iter: iter.into_iter(),
            offset: 0,
        }
    }
}

impl<I: Iterator + Clone> InputCursor for Multipass<I>
where
    I::Item: Copy,
{
    type Unit = I::Item;

    fn next_unit(&mut self) -> Option<I::Item> {
        let unit = self.iter.next()?;
        self.offset += 1;
        Some(unit)
    }
}

impl<I: Iterator + Clone> ForwardCursor for Multipass<I>
where
    I::Item: Copy,
{
    fn offset(&self) -> usize {
        self.offset
    }

    fn at_end(&self) -> bool {
        self.iter.clone().next().is_none()
    }
}

/// A sequence stored as consecutive segments, like a rope or a list of
/// received buffers. Empty segments are allowed and skipped.
#[derive(Debug)]
pub struct SegmentedCursor<'a, U> {
    segments: &'a [&'a [U]],
    /// Current segment; `segments.len()` at the end
    seg: usize,
    /// Position inside the current segment, always in bounds before the end
    idx: usize,
    offset: usize,
}

impl<U> Clone for SegmentedCursor<'_, U> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, U: Copy> SegmentedCursor<'a, U> {
    pub fn new(segments: &'a [&'a [U]]) -> Self {
        let mut cursor = Self {
            segments,
            seg: 0,
            idx: 0,
            offset: 0,
        };
        cursor.skip_exhausted();
        cursor
    }

    fn skip_exhausted(&mut self) {
        while self.seg < self.segments.len() && self.idx >= self.segments[self.seg].len() {
            self.seg += 1;
            self.idx = 0;
        }
    }
}

impl<U: Copy> InputCursor for SegmentedCursor<'_, U> {
    type Unit = U;

    fn next_unit(&mut self) -> Option<U> {
        let unit = *self.segments.get(self.seg)?.get(self.idx)?;
        self.idx += 1;
        self.offset += 1;
        self.skip_exhausted();
        Some(unit)
    }
}

impl<U: Copy> ForwardCursor for SegmentedCursor<'_, U> {
    fn offset(&self) -> usize {
        self.offset
    }

    fn at_end(&self) -> bool {
        self.seg >= self.segments.len()
    }
}

impl<U: Copy> BidirectionalCursor for SegmentedCursor<'_, U> {
    fn prev_unit(&mut self) -> Option<U> {
        if self.idx > 0 {
            self.idx -= 1;
        } else {
            let seg = self.segments[..self.seg].iter().rposition(|s| !s.is_empty())?;
            self.seg = seg;
            self.idx = self.segments[seg].len() - 1;
        }
        self.offset -= 1;
        Some(self.segments[self.seg][self.idx])
    }

    fn seek_end(&mut self) {
        self.seg = self.segments.len();
        self.idx = 0;
        self.offset = self.segments.iter().map(|s| s.len()).sum();
    }
}

/// A contiguous slice.
#[derive(Debug)]
pub struct SliceCursor<'a, U> {
    units: &'a [U],
    pos: usize,
}

impl<U> Clone for SliceCursor<'_, U> {
    fn clone(&self) -> Self {
        Self { ..*self }
    }
}

impl<'a, U: Copy> SliceCursor<'a, U> {
    pub fn new(units: &'a [U]) -> Self {
        Self { units, pos: 0 }
    }

    /// Units not yet consumed.
    pub fn remaining(&self) -> &'a [U] {
        &self.units[self.pos..]
    }
}

impl<U: Copy> InputCursor for SliceCursor<'_, U> {
    type Unit = U;

    fn next_unit(&mut self) -> Option<U> {
        let unit = *self.units.get(self.pos)?;
        self.pos += 1;
        Some(unit)
    }
}

impl<U: Copy> ForwardCursor for SliceCursor<'_, U> {
    fn offset(&self) -> usize {
        self.pos
    }

    fn at_end(&self) -> bool {
        self.pos >= self.units.len()
    }
}

impl<U: Copy> BidirectionalCursor for SliceCursor<'_, U> {
    fn prev_unit(&mut self) -> Option<U> {
        self.pos = self.pos.checked_sub(1)?;
        Some(self.units[self.pos])
    }

    fn seek_end(&mut self) {
        self.pos = self.units.len();
    }
}

impl<U: Copy> RandomAccessCursor for SliceCursor<'_, U> {
    fn len(&self) -> usize {
        self.units.len()
    }

    fn seek(&mut self, offset: usize) {
        self.pos = offset.min(self.units.len());
    }
}
