//! utfview-core: Unicode transcoding over arbitrary code unit sequences
//!
//! This library decodes and encodes text between raw code unit storage
//! (bytes, 16-bit or 32-bit integers) and characters:
//! - Codecs for UTF-8, UTF-16 and UTF-32 in every byte order, with or
//!   without a byte order mark
//! - Generic fixed-width, trivial and composite codecs to build more
//! - Lazy character views over single-pass, forward, bidirectional and
//!   random-access sequences
//! - Strict or permissive handling of ill-formed input
//!
//! # Architecture
//!
//! The system is designed around clear module boundaries:
//! - `character`: Character sets and characters
//! - `unit`: Code units, byte order and unit sinks
//! - `codec`: The codec traits and every concrete codec
//! - `cursor`: Underlying sequences, by capability tier
//! - `view`: Decoding iterators over cursors
//! - `sink`: Encoding into unit destinations
//! - `policy`: Strict and permissive error handling
//! - `cache`: Multi-pass cursors over single-pass sources
//! - `metrics`: Observable decode behavior
//!
//! # Design Principles
//!
//! - **Static dispatch**: Codecs are zero-sized types; capabilities are
//!   trait bounds checked at compile time
//! - **No panics**: Ill-formed input is an error value, never a crash
//! - **Always progress**: Every decode step consumes at least one unit
//!
//! # Example
//!
//! ```
//! use utfview_core::{decode, encode, Encoding, Utf16Be};
//! use utfview_core::character::UnicodeChar;
//!
//! let enc = Encoding::<Utf16Be>::new();
//! let units = encode(&enc, "h€".chars().map(UnicodeChar::from)).unwrap();
//! assert_eq!(units, vec![0x00, 0x68, 0x20, 0xAC]);
//!
//! let chars = decode(&enc, &units).unwrap();
//! assert_eq!(chars, vec!['h', '€']);
//! ```

pub mod cache;
pub mod character;
pub mod codec;
pub mod cursor;
pub mod error;
pub mod metrics;
pub mod policy;
pub mod sink;
pub mod unit;
pub mod view;

// Re-export commonly used types
pub use codec::{
    BidirectionalCodec, Codec, Encoding, FixedWidthCodec, Utf16, Utf16Be, Utf16Bom, Utf16Le,
    Utf16Ne, Utf32, Utf32Be, Utf32Bom, Utf32Le, Utf32Ne, Utf8, Utf8Bom,
};
pub use error::{CodecError, DecodeError, EncodeError, Error, Result};
pub use policy::{ErrorPolicy, Permissive, Strict};
pub use sink::Sink;
pub use view::{InputIter, Sentinel, TextIter, View};

/// Decode a whole slice under the strict policy.
pub fn decode<C: Codec>(
    encoding: &Encoding<C>,
    units: &[C::Unit],
) -> std::result::Result<Vec<C::Char>, DecodeError> {
    encoding.view(units).into_iter().collect()
}

/// Encode a whole character sequence under the strict policy.
pub fn encode<C, I>(encoding: &Encoding<C>, chars: I) -> std::result::Result<Vec<C::Unit>, EncodeError>
where
    C: Codec,
    I: IntoIterator<Item = C::Char>,
{
    let mut sink = encoding.sink(Vec::new());
    sink.write_all(chars)?;
    Ok(sink.into_inner())
}
