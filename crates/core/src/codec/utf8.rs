//! UTF-8 codec.
//!
//! Decoding classifies the lead byte, then checks each continuation byte
//! against the range allowed at its position. The second-byte ranges reject
//! overlong forms (E0 80..9F, F0 80..8F), surrogates (ED A0..BF) and code
//! points above U+10FFFF (F4 90..BF) without a separate validation pass.
//!
//! An ill-formed sequence consumes its maximal ill-formed prefix: the lead
//! byte plus every continuation byte that was still acceptable. The unit that
//! broke the sequence is left for the next step, since it may start a valid
//! character.

use super::{BidirectionalCodec, Codec, Decoded, NoTransition};
use crate::character::{is_scalar_value, UnicodeChar};
use crate::error::CodecError;
use crate::unit::UnitSink;

/// UTF-8 over bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Utf8;

#[inline]
fn is_continuation(byte: u8) -> bool {
    byte & 0xC0 == 0x80
}

/// Sequence length, payload bits of the lead, and the allowed range of the
/// second byte. `None` for bytes that cannot start a sequence.
#[inline]
fn classify_lead(byte: u8) -> Option<(usize, u32, u8, u8)> {
    match byte {
        0x00..=0x7F => Some((1, byte as u32, 0, 0)),
        0xC2..=0xDF => Some((2, (byte & 0x1F) as u32, 0x80, 0xBF)),
        0xE0 => Some((3, 0, 0xA0, 0xBF)),
        0xE1..=0xEC | 0xEE..=0xEF => Some((3, (byte & 0x0F) as u32, 0x80, 0xBF)),
        0xED => Some((3, 0x0D, 0x80, 0x9F)),
        0xF0 => Some((4, 0, 0x90, 0xBF)),
        0xF1..=0xF3 => Some((4, (byte & 0x07) as u32, 0x80, 0xBF)),
        0xF4 => Some((4, 0x04, 0x80, 0x8F)),
        _ => None,
    }
}

fn decode_forward(units: &[u8]) -> Decoded<UnicodeChar> {
    let Some((len, mut code_point, lo, hi)) = classify_lead(units[0]) else {
        return Decoded::invalid(1);
    };

    for i in 1..len {
        let Some(&byte) = units.get(i) else {
            return Decoded::underflow(units.len());
        };
        let (lo, hi) = if i == 1 { (lo, hi) } else { (0x80, 0xBF) };
        if byte < lo || byte > hi {
            return Decoded::invalid(i);
        }
        code_point = (code_point << 6) | (byte & 0x3F) as u32;
    }

    Decoded::character(UnicodeChar::new(code_point), len)
}

impl Codec for Utf8 {
    type Char = UnicodeChar;
    type Unit = u8;
    type State = ();
    type Transition = NoTransition;

    const MIN_CODE_UNITS: usize = 1;
    const MAX_CODE_UNITS: usize = 4;
    const STATELESS: bool = true;

    fn replacement() -> UnicodeChar {
        UnicodeChar::replacement()
    }

    fn encode_state_transition<S: UnitSink<u8> + ?Sized>(
        _state: &mut (),
        transition: NoTransition,
        _out: &mut S,
    ) -> Result<(), CodecError> {
        match transition {}
    }

    fn encode<S: UnitSink<u8> + ?Sized>(
        _state: &mut (),
        ch: UnicodeChar,
        out: &mut S,
    ) -> Result<(), CodecError> {
        let cp = ch.code_point();
        if !is_scalar_value(cp) {
            return Err(CodecError::EncodeInvalidCharacter);
        }

        if cp < 0x80 {
            out.put(cp as u8);
        } else if cp < 0x800 {
            out.put(0xC0 | (cp >> 6) as u8);
            out.put(0x80 | (cp & 0x3F) as u8);
        } else if cp < 0x10000 {
            out.put(0xE0 | (cp >> 12) as u8);
            out.put(0x80 | ((cp >> 6) & 0x3F) as u8);
            out.put(0x80 | (cp & 0x3F) as u8);
        } else {
            out.put(0xF0 | (cp >> 18) as u8);
            out.put(0x80 | ((cp >> 12) & 0x3F) as u8);
            out.put(0x80 | ((cp >> 6) & 0x3F) as u8);
            out.put(0x80 | (cp & 0x3F) as u8);
        }
        Ok(())
    }

    fn decode(_state: &mut (), units: &[u8]) -> Decoded<UnicodeChar> {
        if units.is_empty() {
            return Decoded::underflow(0);
        }
        decode_forward(units)
    }
}

impl BidirectionalCodec for Utf8 {
    fn rdecode(_state: &mut (), units: &[u8]) -> Decoded<UnicodeChar> {
        let n = units.len();
        if n == 0 {
            return Decoded::underflow(0);
        }

        let last = units[n - 1];
        if last < 0x80 {
            return Decoded::character(UnicodeChar::new(last as u32), 1);
        }
        if !is_continuation(last) {
            // A lead byte with nothing after it
            return Decoded::invalid(1);
        }

        // Walk back over at most three continuation bytes to a lead byte,
        // then validate forward over exactly that run so both directions
        // agree on what the run decodes to.
        let floor = n.saturating_sub(4);
        let mut start = n - 1;
        while start > floor && is_continuation(units[start]) {
            start -= 1;
        }
        if is_continuation(units[start]) {
            return Decoded::invalid(1);
        }

        let step = decode_forward(&units[start..]);
        match step.result {
            Ok(Some(ch)) if step.consumed == n - start => Decoded::character(ch, step.consumed),
            _ => Decoded::invalid(1),
        }
    }
}
