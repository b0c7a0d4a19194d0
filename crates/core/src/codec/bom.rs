//! Byte order mark codecs.
//!
//! A [`Bom`] codec wraps a family of byte-serialized Unicode codecs, one per
//! byte order. On decode it looks at the very first step of the stream: a
//! U+FEFF there is a byte order mark, which is consumed without producing a
//! character and, for order-sensitive families, selects the byte order. From
//! then on the byte order is fixed and U+FEFF is an ordinary character.
//!
//! On encode the mark is written before the first character unless a
//! transition has already fixed the byte order, with or without writing it.

use super::{BidirectionalCodec, Codec, Decoded, Utf16Be, Utf16Le, Utf32Be, Utf32Le, Utf8};
use crate::character::UnicodeChar;
use crate::error::CodecError;
use crate::unit::{ByteOrder, UnitSink};
use std::marker::PhantomData;
use tracing::debug;

const BYTE_ORDER_MARK: u32 = 0xFEFF;

/// A pair of byte-serialized codecs that differ only in byte order.
pub trait BomFamily {
    type Big: BidirectionalCodec<Char = UnicodeChar, Unit = u8>;
    type Little: BidirectionalCodec<Char = UnicodeChar, Unit = u8>;

    /// False when the mark carries no byte order (UTF-8)
    const ORDER_SENSITIVE: bool;
}

/// UTF-8 with an optional leading EF BB BF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Utf8Family;

impl BomFamily for Utf8Family {
    type Big = Utf8;
    type Little = Utf8;
    const ORDER_SENSITIVE: bool = false;
}

/// UTF-16 over bytes, FE FF or FF FE.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Utf16Family;

impl BomFamily for Utf16Family {
    type Big = Utf16Be;
    type Little = Utf16Le;
    const ORDER_SENSITIVE: bool = true;
}

/// UTF-32 over bytes, 00 00 FE FF or FF FE 00 00.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Utf32Family;

impl BomFamily for Utf32Family {
    type Big = Utf32Be;
    type Little = Utf32Le;
    const ORDER_SENSITIVE: bool = true;
}

/// Byte order mark handling state.
///
/// The default state has not seen or written a mark yet and assumes
/// big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BomState {
    /// True once the byte order can no longer change
    pub bom_fixed: bool,
    pub byte_order: ByteOrder,
}

impl BomState {
    /// State with the byte order already decided, e.g. from a transport
    /// header. No mark will be written or stripped.
    pub fn fixed(byte_order: ByteOrder) -> Self {
        Self {
            bom_fixed: true,
            byte_order,
        }
    }
}

/// Encode-side requests for a [`Bom`] codec.
///
/// The `*Written` variants emit a mark; the `ToAssume*` variants fix the
/// byte order silently, for output whose mark was written elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BomTransition {
    /// Forget the byte order; the next character writes a mark again
    ToInitial,
    ToBomWritten,
    ToBeBomWritten,
    ToLeBomWritten,
    ToAssumeBomWritten,
    ToAssumeBeBomWritten,
    ToAssumeLeBomWritten,
}

impl BomTransition {
    /// Requested byte order (if any) and whether a mark is emitted.
    fn request(self) -> (Option<ByteOrder>, bool) {
        match self {
            BomTransition::ToInitial => (None, false),
            BomTransition::ToBomWritten => (None, true),
            BomTransition::ToBeBomWritten => (Some(ByteOrder::Big), true),
            BomTransition::ToLeBomWritten => (Some(ByteOrder::Little), true),
            BomTransition::ToAssumeBomWritten => (None, false),
            BomTransition::ToAssumeBeBomWritten => (Some(ByteOrder::Big), false),
            BomTransition::ToAssumeLeBomWritten => (Some(ByteOrder::Little), false),
        }
    }
}

/// Unicode over bytes with byte order mark detection.
#[derive(Debug, Clone, Copy, Default)]
pub struct Bom<F> {
    _family: PhantomData<fn() -> F>,
}

impl<F: BomFamily> Bom<F> {
    fn encode_in<S: UnitSink<u8> + ?Sized>(
        order: ByteOrder,
        ch: UnicodeChar,
        out: &mut S,
    ) -> Result<(), CodecError> {
        match order {
            ByteOrder::Big => F::Big::encode(&mut Default::default(), ch, out),
            ByteOrder::Little => F::Little::encode(&mut Default::default(), ch, out),
        }
    }

    fn decode_in(order: ByteOrder, units: &[u8]) -> Decoded<UnicodeChar> {
        match order {
            ByteOrder::Big => F::Big::decode(&mut Default::default(), units),
            ByteOrder::Little => F::Little::decode(&mut Default::default(), units),
        }
    }

    fn rdecode_in(order: ByteOrder, units: &[u8]) -> Decoded<UnicodeChar> {
        match order {
            ByteOrder::Big => F::Big::rdecode(&mut Default::default(), units),
            ByteOrder::Little => F::Little::rdecode(&mut Default::default(), units),
        }
    }

    fn is_mark(step: &Decoded<UnicodeChar>) -> bool {
        matches!(step.result, Ok(Some(ch)) if ch.code_point() == BYTE_ORDER_MARK)
    }
}

impl<F: BomFamily> Codec for Bom<F> {
    type Char = UnicodeChar;
    type Unit = u8;
    type State = BomState;
    type Transition = BomTransition;

    const MIN_CODE_UNITS: usize = <F::Big as Codec>::MIN_CODE_UNITS;
    const MAX_CODE_UNITS: usize = <F::Big as Codec>::MAX_CODE_UNITS;
    const STATELESS: bool = false;

    fn replacement() -> UnicodeChar {
        UnicodeChar::replacement()
    }

    fn encode_state_transition<S: UnitSink<u8> + ?Sized>(
        state: &mut BomState,
        transition: BomTransition,
        out: &mut S,
    ) -> Result<(), CodecError> {
        if transition == BomTransition::ToInitial {
            *state = BomState::default();
            return Ok(());
        }

        let (requested, write_mark) = transition.request();
        let requested = if F::ORDER_SENSITIVE { requested } else { None };

        if state.bom_fixed {
            return match requested {
                Some(order) if order != state.byte_order => {
                    debug!(
                        "rejecting {:?}: byte order already fixed to {:?}",
                        transition, state.byte_order
                    );
                    Err(CodecError::EncodeInvalidCharacter)
                }
                _ => Ok(()),
            };
        }

        let order = requested.unwrap_or(state.byte_order);
        if write_mark {
            Self::encode_in(order, UnicodeChar::new(BYTE_ORDER_MARK), out)?;
        }
        *state = BomState::fixed(order);
        Ok(())
    }

    fn encode<S: UnitSink<u8> + ?Sized>(
        state: &mut BomState,
        ch: UnicodeChar,
        out: &mut S,
    ) -> Result<(), CodecError> {
        if !state.bom_fixed {
            Self::encode_state_transition(state, BomTransition::ToBomWritten, out)?;
        }
        Self::encode_in(state.byte_order, ch, out)
    }

    fn decode(state: &mut BomState, units: &[u8]) -> Decoded<UnicodeChar> {
        if units.is_empty() {
            return Decoded::underflow(0);
        }
        if state.bom_fixed {
            return Self::decode_in(state.byte_order, units);
        }

        // First step of the stream: whatever it yields, the order is now fixed
        state.bom_fixed = true;

        let step = Self::decode_in(state.byte_order, units);
        if Self::is_mark(&step) {
            debug!("stripped byte order mark ({:?})", state.byte_order);
            return Decoded::no_character(step.consumed);
        }

        if F::ORDER_SENSITIVE {
            let swapped = state.byte_order.swapped();
            let alternate = Self::decode_in(swapped, units);
            if Self::is_mark(&alternate) {
                debug!("stripped byte order mark, switching to {:?}", swapped);
                state.byte_order = swapped;
                return Decoded::no_character(alternate.consumed);
            }
        }

        step
    }
}

impl<F: BomFamily> BidirectionalCodec for Bom<F> {
    /// Backward decoding never strips a mark: it cannot know whether it has
    /// reached the start of the stream.
    fn rdecode(state: &mut BomState, units: &[u8]) -> Decoded<UnicodeChar> {
        Self::rdecode_in(state.byte_order, units)
    }
}
