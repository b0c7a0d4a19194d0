//! Error types for the utfview system.
//!
//! Codecs report a [`CodecError`] status for every step that did not produce
//! a clean result. The error-policy layer turns those statuses into the
//! caller-visible [`DecodeError`] and [`EncodeError`] values (strict policy)
//! or into substitutions (permissive policy).

use thiserror::Error;

/// Top-level error type for all operations in the system.
///
/// Each variant corresponds to a specific failure domain:
/// - Decode: an ill-formed or truncated code unit sequence
/// - Encode: a character or state transition the codec rejected
/// - Cache: a caching cursor read after it was invalidated
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Error {
    /// Decoding failed under the strict policy
    #[error("decode error: {0}")]
    Decode(#[from] DecodeError),

    /// Encoding failed (strict policy, or substitution failed)
    #[error("encode error: {0}")]
    Encode(#[from] EncodeError),

    /// Caching adapter misuse
    #[error("cache error: {0}")]
    Cache(#[from] CacheError),
}

/// Status reported by a single codec call.
///
/// "No error" is not a variant: a clean step is the `Ok` side of the
/// surrounding `Result`.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CodecError {
    /// Input ended in the middle of a character
    #[error("input ended in the middle of a character")]
    DecodeUnderflow,

    /// Ill-formed code unit pattern: lone surrogate, overlong form,
    /// out-of-range code point
    #[error("invalid code unit sequence")]
    DecodeInvalidSequence,

    /// Code point not representable, or a state transition that conflicts
    /// with an already fixed byte order
    #[error("character cannot be encoded")]
    EncodeInvalidCharacter,
}

/// A decode failure surfaced by the strict policy.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("{kind} at code unit {offset}")]
pub struct DecodeError {
    /// What went wrong
    pub kind: CodecError,
    /// Offset (in code units) of the first unit of the failed step
    pub offset: usize,
}

impl DecodeError {
    pub fn new(kind: CodecError, offset: usize) -> Self {
        Self { kind, offset }
    }
}

/// Encode failures.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum EncodeError {
    /// The codec rejected the character
    #[error("cannot encode character: {0}")]
    Codec(CodecError),

    /// The codec rejected a state transition
    #[error("state transition rejected: {0}")]
    Transition(CodecError),

    /// Permissive policy: the replacement character could not be encoded either
    #[error("replacement character cannot be encoded: {0}")]
    Substitution(CodecError),
}

impl EncodeError {
    /// The underlying codec status.
    pub fn kind(&self) -> CodecError {
        match *self {
            EncodeError::Codec(kind)
            | EncodeError::Transition(kind)
            | EncodeError::Substitution(kind) => kind,
        }
    }
}

/// Caching adapter errors.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CacheError {
    /// The cursor points before the retained part of the buffer
    #[error("cursor at element {index} was invalidated by clear_cache (cache now starts at {base})")]
    Invalidated { index: usize, base: usize },
}

/// Type alias for Result with our Error type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_error_display() {
        let err = DecodeError::new(CodecError::DecodeUnderflow, 7);
        assert_eq!(
            err.to_string(),
            "input ended in the middle of a character at code unit 7"
        );
    }

    #[test]
    fn test_encode_error_kind() {
        let err = EncodeError::Substitution(CodecError::EncodeInvalidCharacter);
        assert_eq!(err.kind(), CodecError::EncodeInvalidCharacter);
    }

    #[test]
    fn test_error_from() {
        let err: Error = CacheError::Invalidated { index: 1, base: 4 }.into();
        assert!(matches!(err, Error::Cache(CacheError::Invalidated { .. })));
    }

    #[test]
    fn test_cache_error_display() {
        let err: Error = CacheError::Invalidated { index: 1, base: 4 }.into();
        assert_eq!(
            err.to_string(),
            "cache error: cursor at element 1 was invalidated by clear_cache (cache now starts at 4)"
        );
    }
}
