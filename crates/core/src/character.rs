//! Character model: character sets and characters.
//!
//! A [`Character`] is a (character set, code point) pair. The set is either
//! fixed by the type ([`Unicode`], [`Ascii`]) or carried at runtime
//! ([`AnyCharset`]). Two characters are equal only when both the set id and
//! the code point match.

use std::fmt;
use std::hash::Hash;

/// Identifier of a character set.
///
/// Only the handful of ids this crate itself produces are named; anything
/// else is reported as "unknown".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CharsetId(pub u32);

impl CharsetId {
    pub const UNKNOWN: CharsetId = CharsetId(0);
    pub const UNICODE: CharsetId = CharsetId(1);
    pub const ASCII: CharsetId = CharsetId(2);

    /// Human readable name of the character set.
    pub fn name(self) -> &'static str {
        match self {
            CharsetId::UNICODE => "unicode",
            CharsetId::ASCII => "ascii",
            _ => "unknown",
        }
    }
}

impl fmt::Display for CharsetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A character set: the code space a [`Character`] lives in.
pub trait CharacterSet: Copy + Eq + Hash + fmt::Debug + Default {
    /// Largest code point of the set
    const MAX_CODE_POINT: u32;

    /// Code point substituted for undecodable input
    const REPLACEMENT: u32;

    fn id(&self) -> CharsetId;
}

/// The Unicode character set (code space 0..=0x10FFFF).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Unicode;

impl CharacterSet for Unicode {
    const MAX_CODE_POINT: u32 = 0x10FFFF;
    const REPLACEMENT: u32 = 0xFFFD;

    fn id(&self) -> CharsetId {
        CharsetId::UNICODE
    }
}

/// 7-bit ASCII.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Ascii;

impl CharacterSet for Ascii {
    const MAX_CODE_POINT: u32 = 0x7F;
    const REPLACEMENT: u32 = 0x3F; // '?'

    fn id(&self) -> CharsetId {
        CharsetId::ASCII
    }
}

/// A character set chosen at runtime.
///
/// The default value is tagged [`CharsetId::UNKNOWN`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AnyCharset {
    id: CharsetId,
}

impl AnyCharset {
    pub fn new(id: CharsetId) -> Self {
        Self { id }
    }
}

impl Default for AnyCharset {
    fn default() -> Self {
        Self::new(CharsetId::UNKNOWN)
    }
}

impl CharacterSet for AnyCharset {
    const MAX_CODE_POINT: u32 = u32::MAX;
    const REPLACEMENT: u32 = 0xFFFD;

    fn id(&self) -> CharsetId {
        self.id
    }
}

/// A code point tagged with its character set.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Character<S: CharacterSet = Unicode> {
    set: S,
    code_point: u32,
}

/// Shorthand for the character type produced by the Unicode codecs.
pub type UnicodeChar = Character<Unicode>;

impl<S: CharacterSet> Character<S> {
    /// Character of a statically known set.
    ///
    /// The code point is not validated; codecs reject unrepresentable values
    /// at encode time.
    pub fn new(code_point: u32) -> Self {
        Self {
            set: S::default(),
            code_point,
        }
    }

    /// Character of an explicit set value (needed for [`AnyCharset`]).
    pub fn with_set(set: S, code_point: u32) -> Self {
        Self { set, code_point }
    }

    /// The set's substitution character.
    pub fn replacement() -> Self {
        Self::new(S::REPLACEMENT)
    }

    pub fn code_point(&self) -> u32 {
        self.code_point
    }

    pub fn charset(&self) -> S {
        self.set
    }

    pub fn charset_id(&self) -> CharsetId {
        self.set.id()
    }

    /// Forget the static set, keeping its id at runtime.
    pub fn erase(self) -> Character<AnyCharset> {
        Character::with_set(AnyCharset::new(self.set.id()), self.code_point)
    }
}

impl Character<Unicode> {
    /// Convert to a Rust `char`; `None` for surrogates and out-of-range values.
    pub fn to_char(self) -> Option<char> {
        char::from_u32(self.code_point)
    }

    /// True for Unicode scalar values (0..=0x10FFFF minus surrogates).
    pub fn is_scalar_value(&self) -> bool {
        is_scalar_value(self.code_point)
    }
}

impl From<char> for Character<Unicode> {
    fn from(c: char) -> Self {
        Character::new(c as u32)
    }
}

impl PartialEq<char> for Character<Unicode> {
    fn eq(&self, other: &char) -> bool {
        self.code_point == *other as u32
    }
}

impl<S: CharacterSet> fmt::Debug for Character<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "U+{:04X}", self.code_point)?;
        if self.set.id() != CharsetId::UNICODE {
            write!(f, " ({})", self.set.id())?;
        }
        Ok(())
    }
}

/// True for Unicode scalar values.
#[inline]
pub fn is_scalar_value(code_point: u32) -> bool {
    code_point <= 0x10FFFF && !(0xD800..=0xDFFF).contains(&code_point)
}
