//! UTF-16 codec over native 16-bit units.
//!
//! The byte-serialized forms (`Utf16Be`, `Utf16Le`, `Utf16Ne`) are composites
//! of this codec with a fixed-width byte codec.

use super::{BidirectionalCodec, Codec, Decoded, NoTransition};
use crate::character::{is_scalar_value, UnicodeChar};
use crate::error::CodecError;
use crate::unit::UnitSink;

/// UTF-16 over `u16` units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Utf16;

#[inline]
fn is_high_surrogate(unit: u16) -> bool {
    (0xD800..=0xDBFF).contains(&unit)
}

#[inline]
fn is_low_surrogate(unit: u16) -> bool {
    (0xDC00..=0xDFFF).contains(&unit)
}

#[inline]
fn combine(hi: u16, lo: u16) -> u32 {
    0x10000 + ((((hi & 0x3FF) as u32) << 10) | (lo & 0x3FF) as u32)
}

impl Codec for Utf16 {
    type Char = UnicodeChar;
    type Unit = u16;
    type State = ();
    type Transition = NoTransition;

    const MIN_CODE_UNITS: usize = 1;
    const MAX_CODE_UNITS: usize = 2;
    const STATELESS: bool = true;

    fn replacement() -> UnicodeChar {
        UnicodeChar::replacement()
    }

    fn encode_state_transition<S: UnitSink<u16> + ?Sized>(
        _state: &mut (),
        transition: NoTransition,
        _out: &mut S,
    ) -> Result<(), CodecError> {
        match transition {}
    }

    fn encode<S: UnitSink<u16> + ?Sized>(
        _state: &mut (),
        ch: UnicodeChar,
        out: &mut S,
    ) -> Result<(), CodecError> {
        let cp = ch.code_point();
        if !is_scalar_value(cp) {
            return Err(CodecError::EncodeInvalidCharacter);
        }

        if cp < 0x10000 {
            out.put(cp as u16);
        } else {
            let v = cp - 0x10000;
            out.put(0xD800 | (v >> 10) as u16);
            out.put(0xDC00 | (v & 0x3FF) as u16);
        }
        Ok(())
    }

    fn decode(_state: &mut (), units: &[u16]) -> Decoded<UnicodeChar> {
        let Some(&first) = units.first() else {
            return Decoded::underflow(0);
        };

        if is_high_surrogate(first) {
            return match units.get(1) {
                None => Decoded::underflow(1),
                Some(&second) if is_low_surrogate(second) => {
                    Decoded::character(UnicodeChar::new(combine(first, second)), 2)
                }
                // The second unit is not consumed: it starts the next step
                Some(_) => Decoded::invalid(1),
            };
        }

        if is_low_surrogate(first) {
            // Skip the run of stray low surrogates visible in this window
            let stray = units.iter().take_while(|&&u| is_low_surrogate(u)).count();
            return Decoded::invalid(stray);
        }

        Decoded::character(UnicodeChar::new(first as u32), 1)
    }
}

impl BidirectionalCodec for Utf16 {
    fn rdecode(_state: &mut (), units: &[u16]) -> Decoded<UnicodeChar> {
        let n = units.len();
        let Some(&last) = units.last() else {
            return Decoded::underflow(0);
        };

        if is_low_surrogate(last) {
            if n >= 2 && is_high_surrogate(units[n - 2]) {
                return Decoded::character(UnicodeChar::new(combine(units[n - 2], last)), 2);
            }
            return Decoded::invalid(1);
        }

        if is_high_surrogate(last) {
            return Decoded::invalid(1);
        }

        Decoded::character(UnicodeChar::new(last as u32), 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode_one(cp: u32) -> Result<Vec<u16>, CodecError> {
        let mut out = Vec::new();
        Utf16::encode(&mut (), UnicodeChar::new(cp), &mut out)?;
        Ok(out)
    }

    #[test]
    fn test_surrogate_pair_encode() {
        assert_eq!(encode_one(0x10000).unwrap(), vec![0xD800, 0xDC00]);
        assert_eq!(encode_one(0x10FFFF).unwrap(), vec![0xDBFF, 0xDFFF]);
        assert_eq!(encode_one(0x1F600).unwrap(), vec![0xD83D, 0xDE00]);
        assert_eq!(encode_one(0xFFFF).unwrap(), vec![0xFFFF]);
    }

    #[test]
    fn test_encode_rejects_surrogate_code_points() {
        assert_eq!(encode_one(0xDC00), Err(CodecError::EncodeInvalidCharacter));
        assert_eq!(encode_one(0x110000), Err(CodecError::EncodeInvalidCharacter));
    }

    #[test]
    fn test_decode_pair() {
        assert_eq!(
            Utf16::decode(&mut (), &[0xD83D, 0xDE00]),
            Decoded::character(UnicodeChar::new(0x1F600), 2)
        );
        assert_eq!(
            Utf16::decode(&mut (), &[0x0041, 0xD800]),
            Decoded::character(UnicodeChar::new(0x41), 1)
        );
    }

    #[test]
    fn test_lone_high_surrogate() {
        assert_eq!(Utf16::decode(&mut (), &[0xD800]), Decoded::underflow(1));
        assert_eq!(Utf16::decode(&mut (), &[0xD800, 0x0041]), Decoded::invalid(1));
        assert_eq!(Utf16::decode(&mut (), &[0xD800, 0xD800]), Decoded::invalid(1));
    }

    #[test]
    fn test_stray_low_surrogates_are_skipped_together() {
        assert_eq!(Utf16::decode(&mut (), &[0xDC00, 0xDC01]), Decoded::invalid(2));
        assert_eq!(Utf16::decode(&mut (), &[0xDC00, 0x0041]), Decoded::invalid(1));
    }

    #[test]
    fn test_rdecode() {
        assert_eq!(
            Utf16::rdecode(&mut (), &[0xD83D, 0xDE00]),
            Decoded::character(UnicodeChar::new(0x1F600), 2)
        );
        assert_eq!(
            Utf16::rdecode(&mut (), &[0xD800, 0x0041]),
            Decoded::character(UnicodeChar::new(0x41), 1)
        );
        assert_eq!(Utf16::rdecode(&mut (), &[0x0041, 0xDC00]), Decoded::invalid(1));
        assert_eq!(Utf16::rdecode(&mut (), &[0x0041, 0xD800]), Decoded::invalid(1));
    }
}
