//! Codec interface and the concrete codecs.
//!
//! A codec is a pure function of (state, input) → (state, character-or-error).
//! Codecs are zero-sized types with associated functions so every
//! per-character call is statically dispatched. The state lives with the
//! caller (a view, an iterator or a sink) and is threaded through successive
//! calls on one stream.
//!
//! # Decode windows
//!
//! [`Codec::decode`] receives a window of up to [`Codec::MAX_CODE_UNITS`]
//! units starting at the current position. The window is only shorter than
//! that when the input ends; a codec that needs more units than it was given
//! therefore reports [`CodecError::DecodeUnderflow`]. Every step on a
//! non-empty window consumes at least one unit, errors included, so callers
//! always make forward progress.
//!
//! [`BidirectionalCodec::rdecode`] is the mirror image: the window *ends* at
//! the current position and `consumed` counts units from its end.

mod bom;
mod composite;
mod fixed;
mod utf16;
mod utf32;
mod utf8;

pub use bom::{Bom, BomFamily, BomState, BomTransition, Utf16Family, Utf32Family, Utf8Family};
pub use composite::{Composite, CompositeTransition};
pub use fixed::{FixedWidth, Trivial};
pub use utf16::Utf16;
pub use utf32::Utf32;
pub use utf8::Utf8;

use crate::error::CodecError;
use crate::unit::{BigEndian, CodeUnit, LittleEndian, NativeEndian, UnitSink};
use smallvec::SmallVec;
use std::fmt;
use std::marker::PhantomData;

/// UTF-16 over bytes, big-endian.
pub type Utf16Be = Composite<Utf16, FixedWidth<u16, BigEndian>>;
/// UTF-16 over bytes, little-endian.
pub type Utf16Le = Composite<Utf16, FixedWidth<u16, LittleEndian>>;
/// UTF-16 over bytes in host byte order.
pub type Utf16Ne = Composite<Utf16, FixedWidth<u16, NativeEndian>>;
/// UTF-32 over bytes, big-endian.
pub type Utf32Be = Composite<Utf32, FixedWidth<u32, BigEndian>>;
/// UTF-32 over bytes, little-endian.
pub type Utf32Le = Composite<Utf32, FixedWidth<u32, LittleEndian>>;
/// UTF-32 over bytes in host byte order.
pub type Utf32Ne = Composite<Utf32, FixedWidth<u32, NativeEndian>>;
/// UTF-8 with a byte order mark.
pub type Utf8Bom = Bom<Utf8Family>;
/// UTF-16 over bytes with a byte order mark selecting the byte order.
pub type Utf16Bom = Bom<Utf16Family>;
/// UTF-32 over bytes with a byte order mark selecting the byte order.
pub type Utf32Bom = Bom<Utf32Family>;

/// Scratch run of units; large enough for every codec in this crate.
pub(crate) type UnitBuf<U> = SmallVec<[U; 8]>;

/// Result of one decode step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Decoded<T> {
    /// Units consumed by this step (at least 1 on a non-empty window)
    pub consumed: usize,
    /// The decoded character, `None` when units were consumed without one
    pub result: Result<Option<T>, CodecError>,
}

impl<T> Decoded<T> {
    pub fn character(ch: T, consumed: usize) -> Self {
        Self {
            consumed,
            result: Ok(Some(ch)),
        }
    }

    pub fn no_character(consumed: usize) -> Self {
        Self {
            consumed,
            result: Ok(None),
        }
    }

    pub fn error(error: CodecError, consumed: usize) -> Self {
        Self {
            consumed,
            result: Err(error),
        }
    }

    pub fn underflow(consumed: usize) -> Self {
        Self::error(CodecError::DecodeUnderflow, consumed)
    }

    pub fn invalid(consumed: usize) -> Self {
        Self::error(CodecError::DecodeInvalidSequence, consumed)
    }

    /// Transform the decoded character, keeping the unit count.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Decoded<U> {
        Decoded {
            consumed: self.consumed,
            result: self.result.map(|ch| ch.map(f)),
        }
    }
}

/// State transition type of codecs that have none.
///
/// Uninhabited: a transition can never be requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoTransition {}

/// Stateful transcoding algorithm between code units and characters.
pub trait Codec {
    /// Character type produced by decode and consumed by encode
    type Char: Copy + PartialEq + fmt::Debug;

    /// Code unit type of the encoded form
    type Unit: CodeUnit;

    /// Per-stream state; `Default` is the initial state
    type State: Clone + Default + fmt::Debug;

    /// Explicit state change requests
    type Transition: Copy + fmt::Debug;

    const MIN_CODE_UNITS: usize;
    const MAX_CODE_UNITS: usize;

    /// True when `State` carries no information
    const STATELESS: bool;

    /// Character substituted by the permissive policy
    fn replacement() -> Self::Char;

    /// Move the codec state, possibly emitting units (a BOM, for instance).
    fn encode_state_transition<S: UnitSink<Self::Unit> + ?Sized>(
        state: &mut Self::State,
        transition: Self::Transition,
        out: &mut S,
    ) -> Result<(), CodecError>;

    /// Encode one character.
    ///
    /// On error nothing is guaranteed about units already emitted to `out`;
    /// callers that care encode into a scratch run.
    fn encode<S: UnitSink<Self::Unit> + ?Sized>(
        state: &mut Self::State,
        ch: Self::Char,
        out: &mut S,
    ) -> Result<(), CodecError>;

    /// Decode one step from the start of `units`.
    fn decode(state: &mut Self::State, units: &[Self::Unit]) -> Decoded<Self::Char>;
}

/// Codecs that can also run backward.
pub trait BidirectionalCodec: Codec {
    /// Decode one step from the end of `units`.
    fn rdecode(state: &mut Self::State, units: &[Self::Unit]) -> Decoded<Self::Char>;

    /// Encode one character, emitting its units last to first.
    fn rencode<S: UnitSink<Self::Unit> + ?Sized>(
        state: &mut Self::State,
        ch: Self::Char,
        out: &mut S,
    ) -> Result<(), CodecError> {
        let mut buf: UnitBuf<Self::Unit> = SmallVec::new();
        Self::encode(state, ch, &mut buf)?;
        for unit in buf.into_iter().rev() {
            out.put(unit);
        }
        Ok(())
    }
}

/// Stateless codecs where every character has the same width.
///
/// Implementing this unlocks random-access iteration.
pub trait FixedWidthCodec: Codec {}

/// Compile-time checks of the codec contract.
pub(crate) struct Contract<C>(PhantomData<C>);

impl<C: Codec> Contract<C> {
    pub(crate) const WIDTHS: () = assert!(
        C::MIN_CODE_UNITS >= 1 && C::MIN_CODE_UNITS <= C::MAX_CODE_UNITS,
        "codec declares MIN_CODE_UNITS > MAX_CODE_UNITS"
    );
}

impl<C: FixedWidthCodec> Contract<C> {
    pub(crate) const FIXED_WIDTH: () = assert!(
        C::MIN_CODE_UNITS == C::MAX_CODE_UNITS && C::STATELESS,
        "fixed-width codec must have equal widths and no state"
    );
}

/// A codec paired with its initial state.
pub struct Encoding<C: Codec> {
    initial_state: C::State,
    _codec: PhantomData<fn() -> C>,
}

impl<C: Codec> Encoding<C> {
    /// Encoding starting from the codec's default state.
    pub fn new() -> Self {
        Self::with_initial_state(C::State::default())
    }

    /// Encoding starting from an explicit state, e.g. a BOM codec whose byte
    /// order is already known.
    pub fn with_initial_state(initial_state: C::State) -> Self {
        #[allow(clippy::let_unit_value)]
        let () = Contract::<C>::WIDTHS;
        Self {
            initial_state,
            _codec: PhantomData,
        }
    }

    pub fn initial_state(&self) -> &C::State {
        &self.initial_state
    }

    pub fn min_code_units(&self) -> usize {
        C::MIN_CODE_UNITS
    }

    pub fn max_code_units(&self) -> usize {
        C::MAX_CODE_UNITS
    }
}

impl<C: Codec> Default for Encoding<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C: Codec> Clone for Encoding<C> {
    fn clone(&self) -> Self {
        Self::with_initial_state(self.initial_state.clone())
    }
}

impl<C: Codec> fmt::Debug for Encoding<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Encoding")
            .field("codec", &std::any::type_name::<C>())
            .field("initial_state", &self.initial_state)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::UnicodeChar;

    #[test]
    fn test_decoded_map() {
        let step = Decoded::character(0x41u32, 1).map(UnicodeChar::new);
        assert_eq!(step.consumed, 1);
        assert_eq!(step.result, Ok(Some(UnicodeChar::new(0x41))));

        let step: Decoded<u32> = Decoded::invalid(2);
        assert_eq!(
            step.map(UnicodeChar::new).result,
            Err(CodecError::DecodeInvalidSequence)
        );
    }

    #[test]
    fn test_encoding_widths() {
        let enc = Encoding::<Utf16Be>::new();
        assert_eq!(enc.min_code_units(), 2);
        assert_eq!(enc.max_code_units(), 4);

        let enc = Encoding::<Utf32Le>::new();
        assert_eq!(enc.min_code_units(), 4);
        assert_eq!(enc.max_code_units(), 4);
    }

    #[test]
    fn test_rencode_reverses_units() {
        let mut out = Vec::new();
        Utf8::rencode(&mut (), UnicodeChar::new(0x20AC), &mut out).unwrap();
        assert_eq!(out, vec![0xAC, 0x82, 0xE2]);
    }

    #[test]
    fn test_encoding_initial_state() {
        let state = BomState::fixed(crate::unit::ByteOrder::Little);
        let enc = Encoding::<Utf16Bom>::with_initial_state(state);
        assert_eq!(*enc.initial_state(), state);
        assert_eq!(*enc.clone().initial_state(), state);
    }
}
