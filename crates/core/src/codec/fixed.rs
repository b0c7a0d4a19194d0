//! Fixed-width codecs: the building blocks of the byte-serialized encodings.
//!
//! [`FixedWidth`] reads and writes one multi-byte unit from a byte stream in
//! a fixed byte order. It is the inner half of `Utf16Be` and friends.
//! [`Trivial`] maps each unit straight to a code point of a character set.

use super::{BidirectionalCodec, Codec, Decoded, FixedWidthCodec, NoTransition};
use crate::character::{Character, CharacterSet};
use crate::error::CodecError;
use crate::unit::{CodeUnit, Endian, UnitSink};
use std::marker::PhantomData;

/// One `T` serialized as `T::BYTES` bytes in byte order `O`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedWidth<T, O> {
    _marker: PhantomData<fn() -> (T, O)>,
}

impl<T: CodeUnit, O: Endian> Codec for FixedWidth<T, O> {
    type Char = T;
    type Unit = u8;
    type State = ();
    type Transition = NoTransition;

    const MIN_CODE_UNITS: usize = T::BYTES;
    const MAX_CODE_UNITS: usize = T::BYTES;
    const STATELESS: bool = true;

    fn replacement() -> T {
        T::REPLACEMENT
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
        ch: T,
        out: &mut S,
    ) -> Result<(), CodecError> {
        ch.write_bytes(O::ORDER, out);
        Ok(())
    }

    fn decode(_state: &mut (), units: &[u8]) -> Decoded<T> {
        if units.len() < T::BYTES {
            // Trailing partial unit
            return Decoded::underflow(units.len());
        }
        Decoded::character(T::read_bytes(O::ORDER, units), T::BYTES)
    }
}

impl<T: CodeUnit, O: Endian> BidirectionalCodec for FixedWidth<T, O> {
    fn rdecode(_state: &mut (), units: &[u8]) -> Decoded<T> {
        if units.len() < T::BYTES {
            return Decoded::underflow(units.len());
        }
        let start = units.len() - T::BYTES;
        Decoded::character(T::read_bytes(O::ORDER, &units[start..]), T::BYTES)
    }
}

impl<T: CodeUnit, O: Endian> FixedWidthCodec for FixedWidth<T, O> {}

/// Identity mapping between units of type `U` and characters of set `S`.
///
/// Encoding rejects code points above the smaller of the unit's range and the
/// set's range; decoding rejects units above the set's range.
#[derive(Debug, Clone, Copy, Default)]
pub struct Trivial<U, S> {
    _marker: PhantomData<fn() -> (U, S)>,
}

impl<U: CodeUnit, S: CharacterSet> Trivial<U, S> {
    const LIMIT: u32 = if U::MAX < S::MAX_CODE_POINT {
        U::MAX
    } else {
        S::MAX_CODE_POINT
    };

    fn decode_unit(unit: U) -> Decoded<Character<S>> {
        let value = unit.to_u32();
        if value > S::MAX_CODE_POINT {
            return Decoded::invalid(1);
        }
        Decoded::character(Character::new(value), 1)
    }
}

impl<U: CodeUnit, S: CharacterSet> Codec for Trivial<U, S> {
    type Char = Character<S>;
    type Unit = U;
    type State = ();
    type Transition = NoTransition;

    const MIN_CODE_UNITS: usize = 1;
    const MAX_CODE_UNITS: usize = 1;
    const STATELESS: bool = true;

    fn replacement() -> Character<S> {
        Character::replacement()
    }

    fn encode_state_transition<W: UnitSink<U> + ?Sized>(
        _state: &mut (),
        transition: NoTransition,
        _out: &mut W,
    ) -> Result<(), CodecError> {
        match transition {}
    }

    fn encode<W: UnitSink<U> + ?Sized>(
        _state: &mut (),
        ch: Character<S>,
        out: &mut W,
    ) -> Result<(), CodecError> {
        let cp = ch.code_point();
        if cp > Self::LIMIT {
            return Err(CodecError::EncodeInvalidCharacter);
        }
        let unit = U::from_u32(cp).ok_or(CodecError::EncodeInvalidCharacter)?;
        out.put(unit);
        Ok(())
    }

    fn decode(_state: &mut (), units: &[U]) -> Decoded<Character<S>> {
        match units.first() {
            Some(&unit) => Self::decode_unit(unit),
            None => Decoded::underflow(0),
        }
    }
}

impl<U: CodeUnit, S: CharacterSet> BidirectionalCodec for Trivial<U, S> {
    fn rdecode(_state: &mut (), units: &[U]) -> Decoded<Character<S>> {
        match units.last() {
            Some(&unit) => Self::decode_unit(unit),
            None => Decoded::underflow(0),
        }
    }
}

impl<U: CodeUnit, S: CharacterSet> FixedWidthCodec for Trivial<U, S> {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Ascii, Unicode};
    use crate::unit::{BigEndian, LittleEndian};

    type U16Be = FixedWidth<u16, BigEndian>;
    type U32Le = FixedWidth<u32, LittleEndian>;

    #[test]
    fn test_fixed_width_decode() {
        assert_eq!(U16Be::decode(&mut (), &[0x00, 0x41, 0x00]), Decoded::character(0x0041, 2));
        assert_eq!(
            U32Le::decode(&mut (), &[0x00, 0xF6, 0x01, 0x00]),
            Decoded::character(0x1F600, 4)
        );
    }

    #[test]
    fn test_fixed_width_partial_unit() {
        assert_eq!(U16Be::decode(&mut (), &[0x00]), Decoded::underflow(1));
        assert_eq!(U32Le::decode(&mut (), &[0x00, 0x01, 0x02]), Decoded::underflow(3));
    }

    #[test]
    fn test_fixed_width_rdecode_reads_last_unit() {
        assert_eq!(
            U16Be::rdecode(&mut (), &[0x00, 0x41, 0x00, 0x42]),
            Decoded::character(0x0042, 2)
        );
    }

    #[test]
    fn test_fixed_width_encode() {
        let mut out = Vec::new();
        U16Be::encode(&mut (), 0xFEFF, &mut out).unwrap();
        U32Le::encode(&mut (), 0x10000, &mut out).unwrap();
        assert_eq!(out, vec![0xFE, 0xFF, 0x00, 0x00, 0x01, 0x00]);
    }

    #[test]
    fn test_trivial_ascii() {
        type AsciiBytes = Trivial<u8, Ascii>;

        assert_eq!(
            AsciiBytes::decode(&mut (), &[0x41]),
            Decoded::character(Character::<Ascii>::new(0x41), 1)
        );
        assert_eq!(AsciiBytes::decode(&mut (), &[0x80]), Decoded::invalid(1));

        let mut out = Vec::new();
        AsciiBytes::encode(&mut (), Character::new(0x7F), &mut out).unwrap();
        assert_eq!(out, vec![0x7F]);
        assert_eq!(
            AsciiBytes::encode(&mut (), Character::new(0x80), &mut out),
            Err(CodecError::EncodeInvalidCharacter)
        );
        assert_eq!(AsciiBytes::replacement().code_point(), 0x3F);
    }

    #[test]
    fn test_trivial_limit_is_unit_range() {
        type Latin = Trivial<u8, Unicode>;

        let mut out = Vec::new();
        Latin::encode(&mut (), Character::new(0xFF), &mut out).unwrap();
        assert_eq!(
            Latin::encode(&mut (), Character::new(0x100), &mut out),
            Err(CodecError::EncodeInvalidCharacter)
        );
        assert_eq!(out, vec![0xFF]);
    }
}
