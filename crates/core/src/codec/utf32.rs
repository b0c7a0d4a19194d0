//! UTF-32 codec over native 32-bit units.

use super::{BidirectionalCodec, Codec, Decoded, FixedWidthCodec, NoTransition};
use crate::character::{is_scalar_value, UnicodeChar};
use crate::error::CodecError;
use crate::unit::UnitSink;

/// UTF-32 over `u32` units.
///
/// Every character is exactly one unit, so the codec supports random access.
/// An out-of-range unit is rejected on its own; the next unit is the
/// resynchronization point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Utf32;

fn decode_unit(unit: u32) -> Decoded<UnicodeChar> {
    if is_scalar_value(unit) {
        Decoded::character(UnicodeChar::new(unit), 1)
    } else {
        Decoded::invalid(1)
    }
}

impl Codec for Utf32 {
    type Char = UnicodeChar;
    type Unit = u32;
    type State = ();
    type Transition = NoTransition;

    const MIN_CODE_UNITS: usize = 1;
    const MAX_CODE_UNITS: usize = 1;
    const STATELESS: bool = true;

    fn replacement() -> UnicodeChar {
        UnicodeChar::replacement()
    }

    fn encode_state_transition<S: UnitSink<u32> + ?Sized>(
        _state: &mut (),
        transition: NoTransition,
        _out: &mut S,
    ) -> Result<(), CodecError> {
        match transition {}
    }

    fn encode<S: UnitSink<u32> + ?Sized>(
        _state: &mut (),
        ch: UnicodeChar,
        out: &mut S,
    ) -> Result<(), CodecError> {
        if !is_scalar_value(ch.code_point()) {
            return Err(CodecError::EncodeInvalidCharacter);
        }
        out.put(ch.code_point());
        Ok(())
    }

    fn decode(_state: &mut (), units: &[u32]) -> Decoded<UnicodeChar> {
        match units.first() {
            Some(&unit) => decode_unit(unit),
            None => Decoded::underflow(0),
        }
    }
}

impl BidirectionalCodec for Utf32 {
    fn rdecode(_state: &mut (), units: &[u32]) -> Decoded<UnicodeChar> {
        match units.last() {
            Some(&unit) => decode_unit(unit),
            None => Decoded::underflow(0),
        }
    }
}

impl FixedWidthCodec for Utf32 {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode() {
        assert_eq!(
            Utf32::decode(&mut (), &[0x1F600]),
            Decoded::character(UnicodeChar::new(0x1F600), 1)
        );
        assert_eq!(Utf32::decode(&mut (), &[0xD800]), Decoded::invalid(1));
        assert_eq!(Utf32::decode(&mut (), &[0x110000]), Decoded::invalid(1));
        assert_eq!(Utf32::rdecode(&mut (), &[0x41, 0x42]), Decoded::character(UnicodeChar::new(0x42), 1));
    }

    #[test]
    fn test_encode() {
        let mut out = Vec::new();
        Utf32::encode(&mut (), UnicodeChar::new(0x10000), &mut out).unwrap();
        assert_eq!(out, vec![0x10000]);
        assert_eq!(
            Utf32::encode(&mut (), UnicodeChar::new(0xDFFF), &mut out),
            Err(CodecError::EncodeInvalidCharacter)
        );
    }
}
