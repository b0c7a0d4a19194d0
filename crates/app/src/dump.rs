//! The character dump: one line per decoded character.

use crate::tag::EncodingTag;
use anyhow::Result;
use std::io::Write;
use tracing::{debug, warn};
use utfview_core::character::UnicodeChar;
use utfview_core::metrics::Metrics;
use utfview_core::{
    Codec, Encoding, ErrorPolicy, Permissive, Utf16Be, Utf16Bom, Utf16Le, Utf16Ne, Utf32Be,
    Utf32Bom, Utf32Le, Utf32Ne, Utf8, Utf8Bom,
};

/// Decode `bytes` as `tag` and write the dump to `out`.
pub fn run<W: Write>(
    tag: EncodingTag,
    bytes: &[u8],
    permissive: bool,
    out: &mut W,
    metrics: &mut Metrics,
) -> Result<()> {
    debug!("decoding {} bytes as {}", bytes.len(), tag);
    match tag {
        EncodingTag::Utf8 => dump::<Utf8, W>(bytes, permissive, out, metrics),
        EncodingTag::Utf8Bom => dump::<Utf8Bom, W>(bytes, permissive, out, metrics),
        EncodingTag::Utf16 => dump::<Utf16Ne, W>(bytes, permissive, out, metrics),
        EncodingTag::Utf16Bom => dump::<Utf16Bom, W>(bytes, permissive, out, metrics),
        EncodingTag::Utf16Be => dump::<Utf16Be, W>(bytes, permissive, out, metrics),
        EncodingTag::Utf16Le => dump::<Utf16Le, W>(bytes, permissive, out, metrics),
        EncodingTag::Utf32 => dump::<Utf32Ne, W>(bytes, permissive, out, metrics),
        EncodingTag::Utf32Bom => dump::<Utf32Bom, W>(bytes, permissive, out, metrics),
        EncodingTag::Utf32Be => dump::<Utf32Be, W>(bytes, permissive, out, metrics),
        EncodingTag::Utf32Le => dump::<Utf32Le, W>(bytes, permissive, out, metrics),
    }
}

/// Dump with a concrete codec.
///
/// Decoding itself is always strict so every error can be counted; in
/// permissive mode the error is then handed to the permissive policy for
/// its substitute.
pub fn dump<C, W>(bytes: &[u8], permissive: bool, out: &mut W, metrics: &mut Metrics) -> Result<()>
where
    C: Codec<Unit = u8, Char = UnicodeChar>,
    W: Write,
{
    let encoding = Encoding::<C>::new();
    metrics.units_in += bytes.len() as u64;

    for item in encoding.view(bytes) {
        let ch = match item {
            Ok(ch) => {
                metrics.record_character();
                ch
            }
            Err(err) if permissive => {
                warn!("{}", err);
                metrics.record_error(err.kind, true);
                Permissive::on_decode_error::<C>(err.kind, err.offset)?
            }
            Err(err) => {
                metrics.record_error(err.kind, false);
                return Err(anyhow::Error::new(err).context("input is not well-formed"));
            }
        };
        writeln!(out, "U+{:04X} {}", ch.code_point(), ch.charset_id())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;
    use utfview_core::encode;

    fn dump_to_string(tag: EncodingTag, bytes: &[u8], permissive: bool) -> (Result<()>, String, Metrics) {
        let mut out = Vec::new();
        let mut metrics = Metrics::new();
        let result = run(tag, bytes, permissive, &mut out, &mut metrics);
        (result, String::from_utf8(out).unwrap(), metrics)
    }

    #[test]
    fn test_dump_format() {
        let (result, text, metrics) = dump_to_string(EncodingTag::Utf8, "a€".as_bytes(), false);
        result.unwrap();
        assert_eq!(text, "U+0061 unicode\nU+20AC unicode\n");
        assert_eq!(metrics.characters, 2);
        assert_eq!(metrics.units_in, 4);
    }

    #[test]
    fn test_dump_strips_bom() {
        let (result, text, _) =
            dump_to_string(EncodingTag::Utf16Bom, &[0xFF, 0xFE, 0x3D, 0xD8, 0x00, 0xDE], false);
        result.unwrap();
        assert_eq!(text, "U+1F600 unicode\n");
    }

    #[test]
    fn test_dump_strict_failure_keeps_prefix() {
        let (result, text, metrics) = dump_to_string(EncodingTag::Utf8, &[0x61, 0xC0, 0x62], false);
        assert!(result.is_err());
        assert_eq!(text, "U+0061 unicode\n");
        assert_eq!(metrics.invalid_sequence_errors, 1);
    }

    #[test]
    fn test_dump_permissive_substitutes() {
        let (result, text, metrics) =
            dump_to_string(EncodingTag::Utf16Be, &[0x00, 0x61, 0xD8, 0x00], true);
        result.unwrap();
        assert_eq!(text, "U+0061 unicode\nU+FFFD unicode\n");
        assert_eq!(metrics.replacement_characters, 1);
        assert_eq!(metrics.underflow_errors, 1);
    }

    #[test]
    fn test_native_forms_use_host_order() {
        let mut bytes = Vec::new();
        bytes.extend_from_slice(&0x20ACu16.to_ne_bytes());
        let (result, text, _) = dump_to_string(EncodingTag::Utf16, &bytes, false);
        result.unwrap();
        assert_eq!(text, "U+20AC unicode\n");

        let bytes = 0x1F600u32.to_ne_bytes();
        let (result, text, _) = dump_to_string(EncodingTag::Utf32, &bytes, false);
        result.unwrap();
        assert_eq!(text, "U+1F600 unicode\n");
    }

    #[test]
    fn test_random_text_line_per_character() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let text: Vec<UnicodeChar> = (0..200).map(|_| UnicodeChar::from(rng.gen::<char>())).collect();
        let bytes = encode(&Encoding::<Utf32Le>::new(), text.iter().copied()).unwrap();

        let (result, dumped, metrics) = dump_to_string(EncodingTag::Utf32Le, &bytes, false);
        result.unwrap();
        assert_eq!(dumped.lines().count(), text.len());
        assert_eq!(metrics.characters, text.len() as u64);
        for (line, ch) in dumped.lines().zip(&text) {
            assert_eq!(line, format!("U+{:04X} unicode", ch.code_point()));
        }
    }
}
