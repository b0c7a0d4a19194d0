//! Lazily decoded views over code unit sequences.
//!
//! A [`View`] pairs a codec's initial state with a cursor over code units
//! and an error policy. Iterating it decodes one character per step, with
//! capabilities chosen by the cursor tier and the codec:
//!
//! - any cursor: [`InputIter`] by value (`for ch in view`)
//! - forward cursor: [`TextIter`] by reference (`view.iter()`), restartable
//!   by cloning
//! - bidirectional cursor and codec: `TextIter` is double-ended and can
//!   [`retreat`](TextIter::retreat)
//! - random-access cursor and fixed-width codec: [`View::len`],
//!   [`View::get`], [`TextIter::jump`] and [`TextIter::distance`]
//!
//! Items are `Result<Char, DecodeError>`. Under [`Strict`] a failed step
//! yields an `Err` and iteration may continue after it; under
//! [`Permissive`](crate::policy::Permissive) it yields the replacement
//! character instead.

use crate::codec::{BidirectionalCodec, Codec, Contract, Encoding, FixedWidthCodec, UnitBuf};
use crate::cursor::{
    fill_backward, fill_forward, BidirectionalCursor, ForwardCursor, InputCursor,
    RandomAccessCursor, SliceCursor, Units,
};
use crate::error::{CodecError, DecodeError};
use crate::policy::{ErrorPolicy, Strict};
use smallvec::SmallVec;
use std::fmt;
use std::marker::PhantomData;
use std::ops::Range;

/// What a view yields per character.
pub type Item<C> = Result<<C as Codec>::Char, DecodeError>;

/// End-of-iteration marker, compared against iterators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Sentinel;

/// A code unit sequence seen as a sequence of characters.
pub struct View<C: Codec, K, P = Strict> {
    state: C::State,
    cursor: K,
    _marker: PhantomData<fn() -> (C, P)>,
}

impl<C: Codec, K: InputCursor<Unit = C::Unit>> View<C, K, Strict> {
    /// View starting from the encoding's initial state.
    pub fn new(encoding: &Encoding<C>, cursor: K) -> Self {
        Self::with_state(cursor, encoding.initial_state().clone())
    }

    /// View starting from an explicit codec state.
    pub fn with_state(cursor: K, state: C::State) -> Self {
        Self {
            state,
            cursor,
            _marker: PhantomData,
        }
    }
}

impl<C: Codec, K, P> View<C, K, P> {
    /// The same view under another error policy.
    pub fn with_policy<Q: ErrorPolicy>(self) -> View<C, K, Q> {
        View {
            state: self.state,
            cursor: self.cursor,
            _marker: PhantomData,
        }
    }

    pub fn state(&self) -> &C::State {
        &self.state
    }

    pub fn cursor(&self) -> &K {
        &self.cursor
    }
}

impl<C, K, P> View<C, K, P>
where
    C: Codec,
    K: ForwardCursor<Unit = C::Unit>,
    P: ErrorPolicy,
{
    /// Restartable iterator from the start of the view.
    pub fn iter(&self) -> TextIter<C, K, P> {
        TextIter::new(self.state.clone(), self.cursor.clone())
    }
}

impl<C, K, P> View<C, K, P>
where
    C: FixedWidthCodec,
    K: RandomAccessCursor<Unit = C::Unit>,
    P: ErrorPolicy,
{
    /// Number of characters. A trailing partial character counts as one
    /// (it decodes to an underflow).
    pub fn len(&self) -> usize {
        #[allow(clippy::let_unit_value)]
        let () = Contract::<C>::FIXED_WIDTH;
        let remaining = self.cursor.len() - self.cursor.offset();
        remaining.div_ceil(C::MAX_CODE_UNITS)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Decode the `index`-th character directly.
    pub fn get(&self, index: usize) -> Option<Item<C>> {
        if index >= self.len() {
            return None;
        }

        let offset = index * C::MAX_CODE_UNITS;
        let mut cursor = self.cursor.clone();
        cursor.seek(self.cursor.offset() + offset);

        let mut window: UnitBuf<C::Unit> = SmallVec::new();
        fill_forward(&mut cursor, C::MAX_CODE_UNITS, None, &mut window);

        let mut state = self.state.clone();
        let step = C::decode(&mut state, &window);
        Some(match step.result {
            Ok(Some(ch)) => Ok(ch),
            // Fixed-width codecs never consume units without a character
            Ok(None) => P::on_decode_error::<C>(CodecError::DecodeInvalidSequence, offset),
            Err(kind) => P::on_decode_error::<C>(kind, offset),
        })
    }
}

impl<C: Codec, K: fmt::Debug, P> fmt::Debug for View<C, K, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("View")
            .field("codec", &std::any::type_name::<C>())
            .field("state", &self.state)
            .field("cursor", &self.cursor)
            .finish()
    }
}

impl<C, K, P> IntoIterator for View<C, K, P>
where
    C: Codec,
    K: InputCursor<Unit = C::Unit>,
    P: ErrorPolicy,
{
    type Item = Item<C>;
    type IntoIter = InputIter<C, K, P>;

    fn into_iter(self) -> InputIter<C, K, P> {
        InputIter::new(self.state, self.cursor)
    }
}

impl<'v, C, K, P> IntoIterator for &'v View<C, K, P>
where
    C: Codec,
    K: ForwardCursor<Unit = C::Unit>,
    P: ErrorPolicy,
{
    type Item = Item<C>;
    type IntoIter = TextIter<C, K, P>;

    fn into_iter(self) -> TextIter<C, K, P> {
        self.iter()
    }
}

impl<C: Codec> Encoding<C> {
    /// View over a slice of code units.
    pub fn view<'a>(&self, units: &'a [C::Unit]) -> View<C, SliceCursor<'a, C::Unit>> {
        View::new(self, SliceCursor::new(units))
    }

    /// Single-pass view over any iterator of code units.
    pub fn view_iter<I>(&self, units: I) -> View<C, Units<I::IntoIter>>
    where
        I: IntoIterator<Item = C::Unit>,
    {
        View::new(self, Units::new(units))
    }
}

/// Single-pass character iterator.
///
/// The next character is decoded ahead of time, so comparing against
/// [`Sentinel`] tells whether another character is available without
/// consuming it.
pub struct InputIter<C: Codec, K, P> {
    state: C::State,
    cursor: K,
    /// Units pulled from the cursor but not consumed yet
    window: UnitBuf<C::Unit>,
    /// Offset of `window[0]` in the sequence
    offset: usize,
    current: Option<Item<C>>,
    _policy: PhantomData<fn() -> P>,
}

impl<C, K, P> InputIter<C, K, P>
where
    C: Codec,
    K: InputCursor<Unit = C::Unit>,
    P: ErrorPolicy,
{
    fn new(state: C::State, cursor: K) -> Self {
        let mut iter = Self {
            state,
            cursor,
            window: SmallVec::new(),
            offset: 0,
            current: None,
            _policy: PhantomData,
        };
        iter.current = iter.decode_next();
        iter
    }

    fn decode_next(&mut self) -> Option<Item<C>> {
        loop {
            while self.window.len() < C::MAX_CODE_UNITS {
                match self.cursor.next_unit() {
                    Some(unit) => self.window.push(unit),
                    None => break,
                }
            }
            if self.window.is_empty() {
                return None;
            }

            let offset = self.offset;
            let step = C::decode(&mut self.state, &self.window);
            let consumed = step.consumed.clamp(1, self.window.len());
            self.window.drain(..consumed);
            self.offset += consumed;

            match step.result {
                Ok(Some(ch)) => return Some(Ok(ch)),
                Ok(None) => continue,
                Err(kind) => return Some(P::on_decode_error::<C>(kind, offset)),
            }
        }
    }

    /// Code units consumed by the decoder so far, including the units of the
    /// character decoded ahead.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// The character the next call to `next` returns.
    pub fn peek(&self) -> Option<&Item<C>> {
        self.current.as_ref()
    }
}

impl<C, K, P> Iterator for InputIter<C, K, P>
where
    C: Codec,
    K: InputCursor<Unit = C::Unit>,
    P: ErrorPolicy,
{
    type Item = Item<C>;

    fn next(&mut self) -> Option<Item<C>> {
        let item = self.current.take()?;
        self.current = self.decode_next();
        Some(item)
    }
}

/// True once nothing further is decodable. A pending error is still an
/// item, and decoding resumes after it.
impl<C: Codec, K, P> PartialEq<Sentinel> for InputIter<C, K, P> {
    fn eq(&self, _: &Sentinel) -> bool {
        self.current.is_none()
    }
}

/// Restartable character iterator.
///
/// Holds the current character and the unit range `[start, end)` it was
/// decoded from. Cloning the iterator saves its position.
pub struct TextIter<C: Codec, K, P> {
    state: C::State,
    start: K,
    end: K,
    current: Option<Item<C>>,
    /// Offset of the first character; reverse decoding stops here so a
    /// stripped byte order mark never comes back
    first: usize,
    /// Reverse iteration boundary and its codec state
    back: Option<(K, C::State)>,
    _policy: PhantomData<fn() -> P>,
}

impl<C: Codec, K: Clone, P> Clone for TextIter<C, K, P> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            start: self.start.clone(),
            end: self.end.clone(),
            current: self.current.clone(),
            first: self.first,
            back: self.back.clone(),
            _policy: PhantomData,
        }
    }
}

impl<C, K, P> TextIter<C, K, P>
where
    C: Codec,
    K: ForwardCursor<Unit = C::Unit>,
    P: ErrorPolicy,
{
    fn new(state: C::State, cursor: K) -> Self {
        let mut iter = Self {
            state,
            start: cursor.clone(),
            end: cursor,
            current: None,
            first: 0,
            back: None,
            _policy: PhantomData,
        };
        iter.advance();
        iter.first = iter.start.offset();
        iter
    }

    /// Decode the character that starts at `end`, making it current.
    fn advance(&mut self) {
        self.start = self.end.clone();
        let limit = self.back.as_ref().map(|(back, _)| back.offset());

        loop {
            if self.start.at_end() || limit.is_some_and(|limit| self.start.offset() >= limit) {
                self.current = None;
                return;
            }

            let mut probe = self.start.clone();
            let mut window: UnitBuf<C::Unit> = SmallVec::new();
            fill_forward(&mut probe, C::MAX_CODE_UNITS, limit, &mut window);
            if window.is_empty() {
                self.current = None;
                return;
            }

            let offset = self.start.offset();
            let step = C::decode(&mut self.state, &window);
            let consumed = step.consumed.clamp(1, window.len());
            let mut end = self.start.clone();
            for _ in 0..consumed {
                end.next_unit();
            }
            self.end = end;

            match step.result {
                Ok(Some(ch)) => {
                    self.current = Some(Ok(ch));
                    return;
                }
                Ok(None) => self.start = self.end.clone(),
                Err(kind) => {
                    self.current = Some(P::on_decode_error::<C>(kind, offset));
                    return;
                }
            }
        }
    }

    /// The current character, without moving.
    pub fn peek(&self) -> Option<&Item<C>> {
        self.current.as_ref()
    }

    /// Offset of the current character's first unit.
    pub fn offset(&self) -> usize {
        self.start.offset()
    }

    /// Units the current character was decoded from.
    pub fn unit_range(&self) -> Range<usize> {
        self.start.offset()..self.end.offset()
    }

    pub fn state(&self) -> &C::State {
        &self.state
    }
}

impl<C, K, P> Iterator for TextIter<C, K, P>
where
    C: Codec,
    K: ForwardCursor<Unit = C::Unit>,
    P: ErrorPolicy,
{
    type Item = Item<C>;

    fn next(&mut self) -> Option<Item<C>> {
        let item = self.current.take()?;
        self.advance();
        Some(item)
    }
}

impl<C, K, P> TextIter<C, K, P>
where
    C: BidirectionalCodec,
    K: BidirectionalCursor<Unit = C::Unit>,
    P: ErrorPolicy,
{
    /// Decode one step backward from `cursor`, not below `floor`.
    /// Returns the new position and the item, or `None` at the floor.
    fn decode_back(state: &mut C::State, cursor: &K, floor: usize) -> Option<(K, Item<C>)> {
        let mut cursor = cursor.clone();
        loop {
            if cursor.offset() <= floor {
                return None;
            }

            let mut probe = cursor.clone();
            let mut window: UnitBuf<C::Unit> = SmallVec::new();
            fill_backward(&mut probe, C::MAX_CODE_UNITS, floor, &mut window);
            if window.is_empty() {
                return None;
            }

            let step = C::rdecode(state, &window);
            let consumed = step.consumed.clamp(1, window.len());
            for _ in 0..consumed {
                cursor.prev_unit();
            }

            match step.result {
                Ok(Some(ch)) => return Some((cursor, Ok(ch))),
                Ok(None) => continue,
                Err(kind) => {
                    let item = P::on_decode_error::<C>(kind, cursor.offset());
                    return Some((cursor, item));
                }
            }
        }
    }

    /// Move to the previous character. Returns false at the first character.
    pub fn retreat(&mut self) -> bool {
        let Some((start, item)) = Self::decode_back(&mut self.state, &self.start, self.first) else {
            return false;
        };
        self.end = std::mem::replace(&mut self.start, start);
        self.current = Some(item);
        true
    }
}

impl<C, K, P> DoubleEndedIterator for TextIter<C, K, P>
where
    C: BidirectionalCodec,
    K: BidirectionalCursor<Unit = C::Unit>,
    P: ErrorPolicy,
{
    fn next_back(&mut self) -> Option<Item<C>> {
        self.current.as_ref()?;

        let (back, mut state) = match self.back.take() {
            Some(back) => back,
            None => {
                let mut back = self.end.clone();
                back.seek_end();
                (back, self.state.clone())
            }
        };

        match Self::decode_back(&mut state, &back, self.end.offset()) {
            Some((back, item)) => {
                self.back = Some((back, state));
                Some(item)
            }
            None => {
                // Only the pending front character is left
                self.back = Some((self.start.clone(), state));
                self.current.take()
            }
        }
    }
}

impl<C, K, P> TextIter<C, K, P>
where
    C: FixedWidthCodec,
    K: RandomAccessCursor<Unit = C::Unit>,
    P: ErrorPolicy,
{
    /// Move by `n` characters (negative moves backward), clamped to the
    /// sequence.
    pub fn jump(&mut self, n: isize) {
        #[allow(clippy::let_unit_value)]
        let () = Contract::<C>::FIXED_WIDTH;
        let width = C::MAX_CODE_UNITS as isize;
        let target = (self.start.offset() as isize).saturating_add(n.saturating_mul(width));
        let target = target.clamp(self.first as isize, self.start.len() as isize) as usize;
        self.end.seek(target);
        self.advance();
    }

    /// Number of characters from `self` to `other`.
    pub fn distance(&self, other: &Self) -> isize {
        #[allow(clippy::let_unit_value)]
        let () = Contract::<C>::FIXED_WIDTH;
        (other.start.offset() as isize - self.start.offset() as isize) / C::MAX_CODE_UNITS as isize
    }
}

impl<C, K, P> PartialEq for TextIter<C, K, P>
where
    C: Codec,
    K: ForwardCursor<Unit = C::Unit>,
{
    fn eq(&self, other: &Self) -> bool {
        self.start.offset() == other.start.offset() && self.current.is_some() == other.current.is_some()
    }
}

/// Stateless codecs compare positions: at the end of the sequence, or at
/// the boundary left by reverse iteration, means done. Stateful codecs rely
/// on whether a character is pending, since the end of the units may still
/// hold state-only input.
impl<C, K, P> PartialEq<Sentinel> for TextIter<C, K, P>
where
    C: Codec,
    K: ForwardCursor<Unit = C::Unit>,
{
    fn eq(&self, _: &Sentinel) -> bool {
        if C::STATELESS {
            let drained = self
                .back
                .as_ref()
                .is_some_and(|(back, _)| self.start.offset() >= back.offset());
            self.start.at_end() || drained
        } else {
            self.current.is_none()
        }
    }
}

impl<C: Codec, K, P> fmt::Debug for TextIter<C, K, P>
where
    K: ForwardCursor<Unit = C::Unit>,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TextIter")
            .field("state", &self.state)
            .field("start", &self.start.offset())
            .field("end", &self.end.offset())
            .field("current", &self.current)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::UnicodeChar;
    use crate::codec::{Utf16, Utf16Be, Utf16Bom, Utf32, Utf32Le, Utf8, Utf8Bom};
    use crate::cursor::{Multipass, SegmentedCursor};
    use crate::policy::Permissive;

    fn chars(text: &str) -> Vec<UnicodeChar> {
        text.chars().map(UnicodeChar::from).collect()
    }

    #[test]
    fn test_input_iter_decodes_all() {
        let enc = Encoding::<Utf8>::new();
        let decoded: Result<Vec<_>, _> = enc.view_iter("héllo €".bytes()).into_iter().collect();
        assert_eq!(decoded.unwrap(), chars("héllo €"));
    }

    #[test]
    fn test_input_iter_sentinel() {
        let enc = Encoding::<Utf8>::new();
        let mut iter = enc.view_iter(b"a".iter().copied()).into_iter();
        assert!(iter != Sentinel);
        assert_eq!(iter.next(), Some(Ok(UnicodeChar::new(0x61))));
        assert!(iter == Sentinel);
        assert_eq!(iter.next(), None);

        let empty = enc.view_iter(Vec::new()).into_iter();
        assert!(empty == Sentinel);
    }

    #[test]
    fn test_input_iter_error_then_resumes() {
        let enc = Encoding::<Utf8>::new();
        let mut iter = enc.view(&[0x61, 0xFF, 0x62]).into_iter();
        assert_eq!(iter.next(), Some(Ok(UnicodeChar::new(0x61))));
        // A pending error is not the end
        assert!(iter != Sentinel);
        assert_eq!(
            iter.next(),
            Some(Err(DecodeError::new(CodecError::DecodeInvalidSequence, 1)))
        );
        assert!(iter != Sentinel);
        assert_eq!(iter.next(), Some(Ok(UnicodeChar::new(0x62))));
        assert!(iter == Sentinel);
    }

    #[test]
    fn test_input_iter_sentinel_loop_sees_every_item() {
        let enc = Encoding::<Utf8>::new();
        let mut iter = enc.view_iter(vec![0x61, 0xFF, 0x62]).into_iter();
        let mut items = Vec::new();
        while iter != Sentinel {
            items.extend(iter.next());
        }
        assert_eq!(
            items,
            vec![
                Ok(UnicodeChar::new(0x61)),
                Err(DecodeError::new(CodecError::DecodeInvalidSequence, 1)),
                Ok(UnicodeChar::new(0x62)),
            ]
        );
    }

    #[test]
    fn test_text_iter_sentinel_after_next_back() {
        let enc = Encoding::<Utf8>::new();
        let view = enc.view(b"ab");
        let mut iter = view.iter();
        assert_eq!(iter.next_back(), Some(Ok(UnicodeChar::new(0x62))));
        assert!(iter != Sentinel);
        assert_eq!(iter.next_back(), Some(Ok(UnicodeChar::new(0x61))));
        assert!(iter == Sentinel);
        assert_eq!(iter.next(), None);

        // Meeting from both ends
        let mut iter = view.iter();
        assert_eq!(iter.next_back(), Some(Ok(UnicodeChar::new(0x62))));
        assert_eq!(iter.next(), Some(Ok(UnicodeChar::new(0x61))));
        assert!(iter == Sentinel);
    }

    #[test]
    fn test_jump_saturates() {
        let enc = Encoding::<Utf32Le>::new();
        let data = [0x61, 0, 0, 0, 0x62, 0, 0, 0];
        let view = enc.view(&data);

        let mut iter = view.iter();
        iter.jump(isize::MAX);
        assert!(iter == Sentinel);
        assert_eq!(iter.peek(), None);

        iter.jump(isize::MIN);
        assert_eq!(iter.peek(), Some(&Ok(UnicodeChar::new(0x61))));
        assert_eq!(iter.offset(), 0);
    }

    #[test]
    fn test_text_iter_is_restartable() {
        let enc = Encoding::<Utf8>::new();
        let data = "aé€".as_bytes();
        let view = View::new(&enc, Multipass::new(data.iter().copied()));

        let mut iter = view.iter();
        iter.next();
        let saved = iter.clone();
        let rest: Vec<_> = iter.map(|c| c.unwrap()).collect();
        let again: Vec<_> = saved.map(|c| c.unwrap()).collect();
        assert_eq!(rest, chars("é€"));
        assert_eq!(rest, again);

        // The view itself can be iterated any number of times
        assert_eq!((&view).into_iter().count(), 3);
        assert_eq!(view.iter().count(), 3);
    }

    #[test]
    fn test_unit_range() {
        let enc = Encoding::<Utf8>::new();
        let data = "a€b".as_bytes();
        let view = enc.view(data);
        let mut iter = view.iter();
        assert_eq!(iter.unit_range(), 0..1);
        iter.next();
        assert_eq!(iter.unit_range(), 1..4);
        assert_eq!(iter.offset(), 1);
    }

    #[test]
    fn test_bom_is_stripped_once() {
        let enc = Encoding::<Utf8Bom>::new();
        let data = [0xEF, 0xBB, 0xBF, 0x61, 0xEF, 0xBB, 0xBF];
        let decoded: Vec<_> = enc.view(&data).iter().map(|c| c.unwrap()).collect();
        assert_eq!(decoded, vec![UnicodeChar::new(0x61), UnicodeChar::new(0xFEFF)]);
    }

    #[test]
    fn test_reverse_matches_forward() {
        let enc = Encoding::<Utf8>::new();
        let text = "a\u{7FF}\u{FFFF}\u{10000}z";
        let view = enc.view(text.as_bytes());
        let mut backward: Vec<_> = view.iter().rev().map(|c| c.unwrap()).collect();
        backward.reverse();
        assert_eq!(backward, chars(text));
    }

    #[test]
    fn test_reverse_over_segments() {
        let enc = Encoding::<Utf16>::new();
        let units: [&[u16]; 3] = [&[0x0061, 0xD83D], &[], &[0xDE00, 0x0062]];
        let view = View::new(&enc, SegmentedCursor::new(&units));
        let backward: Vec<_> = view.iter().rev().map(|c| c.unwrap()).collect();
        assert_eq!(backward, vec![UnicodeChar::new(0x62), UnicodeChar::new(0x1F600), UnicodeChar::new(0x61)]);
    }

    #[test]
    fn test_double_ended_meet_in_the_middle() {
        let enc = Encoding::<Utf16Be>::new();
        let data = [0x00, 0x61, 0x00, 0x62, 0x00, 0x63];
        let view = enc.view(&data);
        let mut iter = view.iter();
        assert_eq!(iter.next(), Some(Ok(UnicodeChar::new(0x61))));
        assert_eq!(iter.next_back(), Some(Ok(UnicodeChar::new(0x63))));
        assert_eq!(iter.next_back(), Some(Ok(UnicodeChar::new(0x62))));
        assert_eq!(iter.next(), None);
        assert_eq!(iter.next_back(), None);
    }

    #[test]
    fn test_retreat_stops_at_bom() {
        let enc = Encoding::<Utf16Bom>::new();
        let data = [0xFF, 0xFE, 0x61, 0x00, 0x62, 0x00];
        let view = enc.view(&data);
        let mut iter = view.iter();
        assert_eq!(iter.offset(), 2);
        iter.next();
        assert_eq!(iter.peek(), Some(&Ok(UnicodeChar::new(0x62))));
        assert!(iter.retreat());
        assert_eq!(iter.peek(), Some(&Ok(UnicodeChar::new(0x61))));
        assert!(!iter.retreat());
        assert_eq!(iter.unit_range(), 2..4);
    }

    #[test]
    fn test_reverse_with_bom_excludes_mark() {
        let enc = Encoding::<Utf16Bom>::new();
        let data = [0xFE, 0xFF, 0x00, 0x61, 0x00, 0x62];
        let backward: Vec<_> = enc.view(&data).iter().rev().map(|c| c.unwrap()).collect();
        assert_eq!(backward, vec![UnicodeChar::new(0x62), UnicodeChar::new(0x61)]);
    }

    #[test]
    fn test_random_access() {
        let enc = Encoding::<Utf32Le>::new();
        let data = [0x61, 0, 0, 0, 0x00, 0xF6, 0x01, 0x00, 0x62, 0, 0, 0];
        let view = enc.view(&data);
        assert_eq!(view.len(), 3);
        assert_eq!(view.get(1), Some(Ok(UnicodeChar::new(0x1F600))));
        assert_eq!(view.get(3), None);

        let mut iter = view.iter();
        let start = iter.clone();
        iter.jump(2);
        assert_eq!(iter.peek(), Some(&Ok(UnicodeChar::new(0x62))));
        assert_eq!(start.distance(&iter), 2);
        iter.jump(-1);
        assert_eq!(iter.peek(), Some(&Ok(UnicodeChar::new(0x1F600))));
        iter.jump(10);
        assert!(iter == Sentinel);
    }

    #[test]
    fn test_random_access_partial_unit() {
        let enc = Encoding::<Utf32>::new();
        let view = enc.view(&[0x41, 0x42]);
        assert_eq!(view.len(), 2);

        let enc = Encoding::<Utf32Le>::new();
        let data = [0x41, 0, 0, 0, 0x42];
        let view = enc.view(&data);
        assert_eq!(view.len(), 2);
        assert_eq!(
            view.get(1),
            Some(Err(DecodeError::new(CodecError::DecodeUnderflow, 4)))
        );
    }

    #[test]
    fn test_permissive_substitutes() {
        let enc = Encoding::<Utf16>::new();
        let view = enc.view(&[0xD800]);
        let strict: Vec<_> = view.iter().collect();
        assert_eq!(strict, vec![Err(DecodeError::new(CodecError::DecodeUnderflow, 0))]);

        let permissive: Vec<_> = enc.view(&[0xD800]).with_policy::<Permissive>().iter().collect();
        assert_eq!(permissive, vec![Ok(UnicodeChar::new(0xFFFD))]);
    }

    #[test]
    fn test_text_iter_sentinel() {
        let enc = Encoding::<Utf8>::new();
        let data = [0x61];
        let view = enc.view(&data);
        let mut iter = view.iter();
        assert!(iter != Sentinel);
        iter.next();
        assert!(iter == Sentinel);

        // Stateful codec: a lone mark is input without characters
        let enc = Encoding::<Utf8Bom>::new();
        let data = [0xEF, 0xBB, 0xBF];
        let view = enc.view(&data);
        assert!(view.iter() == Sentinel);
    }

    #[test]
    fn test_text_iter_equality() {
        let enc = Encoding::<Utf8>::new();
        let data = "ab".as_bytes();
        let view = enc.view(data);
        let a = view.iter();
        let mut b = view.iter();
        assert!(a == b);
        b.next();
        assert!(a != b);
    }
}
