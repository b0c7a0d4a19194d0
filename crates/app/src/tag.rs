//! Encoding names accepted on the command line.

use clap::ValueEnum;
use std::fmt;

/// An encoding of the input file.
///
/// The plain `utf-16` and `utf-32` forms read units in host byte order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum EncodingTag {
    #[value(name = "utf-8")]
    Utf8,
    #[value(name = "utf-8-bom")]
    Utf8Bom,
    #[value(name = "utf-16")]
    Utf16,
    #[value(name = "utf-16-bom")]
    Utf16Bom,
    #[value(name = "utf-16-be")]
    Utf16Be,
    #[value(name = "utf-16-le")]
    Utf16Le,
    #[value(name = "utf-32")]
    Utf32,
    #[value(name = "utf-32-bom")]
    Utf32Bom,
    #[value(name = "utf-32-be")]
    Utf32Be,
    #[value(name = "utf-32-le")]
    Utf32Le,
}

impl EncodingTag {
    pub fn name(self) -> &'static str {
        match self {
            EncodingTag::Utf8 => "utf-8",
            EncodingTag::Utf8Bom => "utf-8-bom",
            EncodingTag::Utf16 => "utf-16",
            EncodingTag::Utf16Bom => "utf-16-bom",
            EncodingTag::Utf16Be => "utf-16-be",
            EncodingTag::Utf16Le => "utf-16-le",
            EncodingTag::Utf32 => "utf-32",
            EncodingTag::Utf32Bom => "utf-32-bom",
            EncodingTag::Utf32Be => "utf-32-be",
            EncodingTag::Utf32Le => "utf-32-le",
        }
    }

    /// Bytes per code unit of the encoded form.
    pub fn unit_bytes(self) -> usize {
        match self {
            EncodingTag::Utf8 | EncodingTag::Utf8Bom => 1,
            EncodingTag::Utf16
            | EncodingTag::Utf16Bom
            | EncodingTag::Utf16Be
            | EncodingTag::Utf16Le => 2,
            EncodingTag::Utf32
            | EncodingTag::Utf32Bom
            | EncodingTag::Utf32Be
            | EncodingTag::Utf32Le => 4,
        }
    }
}

impl fmt::Display for EncodingTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
