//! Character sinks: encode characters into a code unit destination.

use crate::codec::{Codec, Encoding, UnitBuf};
use crate::error::EncodeError;
use crate::policy::{ErrorPolicy, Strict};
use crate::unit::UnitSink;
use smallvec::SmallVec;
use std::fmt;
use std::marker::PhantomData;

/// Encodes characters into `W` with codec `C` under policy `P`.
///
/// Each character is encoded into a scratch run first and only copied to
/// `W` once the codec accepted it, so a rejected character never leaves
/// partial units behind. The codec state is likewise only committed on
/// success.
pub struct Sink<C: Codec, W, P = Strict> {
    state: C::State,
    out: W,
    written: usize,
    _marker: PhantomData<fn() -> (C, P)>,
}

impl<C: Codec, W: UnitSink<C::Unit>> Sink<C, W, Strict> {
    pub fn new(encoding: &Encoding<C>, out: W) -> Self {
        Self::with_state(out, encoding.initial_state().clone())
    }

    pub fn with_state(out: W, state: C::State) -> Self {
        Self {
            state,
            out,
            written: 0,
            _marker: PhantomData,
        }
    }
}

impl<C: Codec, W: UnitSink<C::Unit>, P: ErrorPolicy> Sink<C, W, P> {
    /// The same sink under another error policy.
    pub fn with_policy<Q: ErrorPolicy>(self) -> Sink<C, W, Q> {
        Sink {
            state: self.state,
            out: self.out,
            written: self.written,
            _marker: PhantomData,
        }
    }

    fn commit(&mut self, state: C::State, scratch: UnitBuf<C::Unit>) {
        self.state = state;
        self.written += scratch.len();
        for unit in scratch {
            self.out.put(unit);
        }
    }

    /// Encode one character.
    pub fn write(&mut self, ch: C::Char) -> Result<(), EncodeError> {
        let mut scratch: UnitBuf<C::Unit> = SmallVec::new();
        let mut state = self.state.clone();

        if let Err(kind) = C::encode(&mut state, ch, &mut scratch) {
            // Roll back before the policy gets a say
            scratch.clear();
            state = self.state.clone();
            P::on_encode_error::<C, _>(&mut state, kind, &mut scratch)?;
        }

        self.commit(state, scratch);
        Ok(())
    }

    /// Encode every character, stopping at the first failure.
    pub fn write_all<I: IntoIterator<Item = C::Char>>(&mut self, chars: I) -> Result<(), EncodeError> {
        for ch in chars {
            self.write(ch)?;
        }
        Ok(())
    }

    /// Request a codec state transition, e.g. writing a byte order mark.
    pub fn transition(&mut self, transition: C::Transition) -> Result<(), EncodeError> {
        let mut scratch: UnitBuf<C::Unit> = SmallVec::new();
        let mut state = self.state.clone();

        match C::encode_state_transition(&mut state, transition, &mut scratch) {
            Ok(()) => {
                self.commit(state, scratch);
                Ok(())
            }
            Err(kind) => P::on_transition_error(kind, transition),
        }
    }

    pub fn state(&self) -> &C::State {
        &self.state
    }

    /// Code units written so far.
    pub fn units_written(&self) -> usize {
        self.written
    }

    pub fn get_ref(&self) -> &W {
        &self.out
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<C: Codec, W: fmt::Debug, P> fmt::Debug for Sink<C, W, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sink")
            .field("codec", &std::any::type_name::<C>())
            .field("state", &self.state)
            .field("written", &self.written)
            .field("out", &self.out)
            .finish()
    }
}

impl<C: Codec> Encoding<C> {
    /// Sink writing into `out` under the strict policy.
    pub fn sink<W: UnitSink<C::Unit>>(&self, out: W) -> Sink<C, W> {
        Sink::new(self, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::{Ascii, Character, UnicodeChar};
    use crate::codec::{BomState, BomTransition, Trivial, Utf16Bom, Utf16Le, Utf8, Utf8Bom};
    use crate::error::CodecError;
    use crate::policy::Permissive;
    use crate::unit::ByteOrder;

    #[test]
    fn test_write_all() {
        let enc = Encoding::<Utf16Le>::new();
        let mut sink = enc.sink(Vec::new());
        sink.write_all("a€".chars().map(UnicodeChar::from)).unwrap();
        assert_eq!(sink.units_written(), 4);
        assert_eq!(sink.into_inner(), vec![0x61, 0x00, 0xAC, 0x20]);
    }

    #[test]
    fn test_strict_rejects_without_partial_output() {
        let enc = Encoding::<Utf8>::new();
        let mut sink = enc.sink(Vec::new());
        sink.write(UnicodeChar::new(0x41)).unwrap();
        assert_eq!(
            sink.write(UnicodeChar::new(0xD800)),
            Err(EncodeError::Codec(CodecError::EncodeInvalidCharacter))
        );
        sink.write(UnicodeChar::new(0x42)).unwrap();
        assert_eq!(sink.get_ref(), &vec![0x41, 0x42]);
    }

    #[test]
    fn test_permissive_substitutes_replacement() {
        let enc = Encoding::<Trivial<u8, Ascii>>::new();
        let mut sink = enc.sink(Vec::new()).with_policy::<Permissive>();
        sink.write_all([0x61, 0xE9, 0x62].map(Character::<Ascii>::new)).unwrap();
        assert_eq!(sink.into_inner(), b"a?b".to_vec());
    }

    #[test]
    fn test_bom_written_once() {
        let enc = Encoding::<Utf8Bom>::new();
        let mut sink = enc.sink(Vec::new());
        sink.write(UnicodeChar::new(0x61)).unwrap();
        sink.write(UnicodeChar::new(0x62)).unwrap();
        assert_eq!(sink.into_inner(), vec![0xEF, 0xBB, 0xBF, 0x61, 0x62]);
    }

    #[test]
    fn test_failed_write_keeps_state() {
        // The mark is only written along with an accepted character
        let enc = Encoding::<Utf8Bom>::new();
        let mut sink = enc.sink(Vec::new());
        assert!(sink.write(UnicodeChar::new(0x110000)).is_err());
        assert_eq!(*sink.state(), BomState::default());
        sink.write(UnicodeChar::new(0x61)).unwrap();
        assert_eq!(sink.into_inner(), vec![0xEF, 0xBB, 0xBF, 0x61]);
    }

    #[test]
    fn test_transition_policies() {
        let enc = Encoding::<Utf16Bom>::with_initial_state(BomState::fixed(ByteOrder::Little));

        let mut strict = enc.sink(Vec::new());
        assert_eq!(
            strict.transition(BomTransition::ToBeBomWritten),
            Err(EncodeError::Transition(CodecError::EncodeInvalidCharacter))
        );

        let mut permissive = enc.sink(Vec::new()).with_policy::<Permissive>();
        permissive.transition(BomTransition::ToBeBomWritten).unwrap();
        permissive.write(UnicodeChar::new(0x61)).unwrap();
        assert_eq!(*permissive.state(), BomState::fixed(ByteOrder::Little));
        assert_eq!(permissive.into_inner(), vec![0x61, 0x00]);
    }

    #[test]
    fn test_explicit_transition_writes_mark() {
        let enc = Encoding::<Utf16Bom>::new();
        let mut sink = enc.sink(Vec::new());
        sink.transition(BomTransition::ToLeBomWritten).unwrap();
        sink.write(UnicodeChar::new(0x61)).unwrap();
        assert_eq!(sink.units_written(), 4);
        assert_eq!(sink.into_inner(), vec![0xFF, 0xFE, 0x61, 0x00]);
    }
}
