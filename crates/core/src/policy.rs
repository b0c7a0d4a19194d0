//! Error policies: what views and sinks do when a codec reports an error.
//!
//! The policy is a type parameter, so the choice costs nothing at runtime.
//!
//! - [`Strict`] surfaces every failure to the caller.
//! - [`Permissive`] substitutes the codec's replacement character and keeps
//!   going.
//!
//! Either way the codec state stays usable: a decode error is reported at the
//! resynchronized position and the next step starts after the rejected units.

use crate::codec::Codec;
use crate::error::{CodecError, DecodeError, EncodeError};
use crate::unit::UnitSink;
use std::fmt;
use tracing::{debug, trace};

/// Reaction to codec failures.
pub trait ErrorPolicy {
    /// Decode step at `offset` failed with `kind`.
    fn on_decode_error<C: Codec>(kind: CodecError, offset: usize) -> Result<C::Char, DecodeError>;

    /// The codec rejected a character. `state` and `out` are the ones the
    /// failed attempt started from; a policy may encode something else.
    fn on_encode_error<C: Codec, S: UnitSink<C::Unit> + ?Sized>(
        state: &mut C::State,
        kind: CodecError,
        out: &mut S,
    ) -> Result<(), EncodeError>;

    /// The codec rejected a state transition.
    fn on_transition_error<T: fmt::Debug>(kind: CodecError, transition: T) -> Result<(), EncodeError>;
}

/// Fail on every error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Strict;

impl ErrorPolicy for Strict {
    fn on_decode_error<C: Codec>(kind: CodecError, offset: usize) -> Result<C::Char, DecodeError> {
        Err(DecodeError::new(kind, offset))
    }

    fn on_encode_error<C: Codec, S: UnitSink<C::Unit> + ?Sized>(
        _state: &mut C::State,
        kind: CodecError,
        _out: &mut S,
    ) -> Result<(), EncodeError> {
        Err(EncodeError::Codec(kind))
    }

    fn on_transition_error<T: fmt::Debug>(kind: CodecError, _transition: T) -> Result<(), EncodeError> {
        Err(EncodeError::Transition(kind))
    }
}

/// Substitute the replacement character instead of failing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Permissive;

impl ErrorPolicy for Permissive {
    fn on_decode_error<C: Codec>(kind: CodecError, offset: usize) -> Result<C::Char, DecodeError> {
        let replacement = C::replacement();
        trace!("substituting {:?} for {} at code unit {}", replacement, kind, offset);
        Ok(replacement)
    }

    fn on_encode_error<C: Codec, S: UnitSink<C::Unit> + ?Sized>(
        state: &mut C::State,
        kind: CodecError,
        out: &mut S,
    ) -> Result<(), EncodeError> {
        let replacement = C::replacement();
        trace!("substituting {:?} for an unencodable character ({})", replacement, kind);
        C::encode(state, replacement, out).map_err(EncodeError::Substitution)
    }

    fn on_transition_error<T: fmt::Debug>(kind: CodecError, transition: T) -> Result<(), EncodeError> {
        debug!("ignoring state transition {:?}: {}", transition, kind);
        Ok(())
    }
}
