//! Property tests over arbitrary text and arbitrary unit sequences.

use proptest::prelude::*;
use utfview_core::character::UnicodeChar;
use utfview_core::{
    decode, encode, BidirectionalCodec, CodecError, Encoding, Permissive, Utf16, Utf16Bom,
    Utf32Be, Utf8,
};

fn text() -> impl Strategy<Value = Vec<UnicodeChar>> {
    prop::collection::vec(any::<char>().prop_map(UnicodeChar::from), 0..64)
}

/// Forward items of a view, reversed iteration collected back to front.
fn both_directions<C: BidirectionalCodec>(
    units: &[C::Unit],
) -> (Vec<Result<C::Char, CodecError>>, Vec<Result<C::Char, CodecError>>) {
    let enc = Encoding::<C>::new();
    let view = enc.view(units).with_policy::<Permissive>();
    let forward = view.iter().map(|r| r.map_err(|e| e.kind)).collect();
    let mut backward: Vec<_> = view.iter().rev().map(|r| r.map_err(|e| e.kind)).collect();
    backward.reverse();
    (forward, backward)
}

proptest! {
    #[test]
    fn test_round_trip_utf8(text in text()) {
        let enc = Encoding::<Utf8>::new();
        let units = encode(&enc, text.iter().copied()).unwrap();
        let expected: String = text.iter().filter_map(|c| c.to_char()).collect();
        prop_assert_eq!(&units, &expected.into_bytes());
        prop_assert_eq!(decode(&enc, &units).unwrap(), text);
    }

    #[test]
    fn test_round_trip_utf16(text in text()) {
        let enc = Encoding::<Utf16>::new();
        let units = encode(&enc, text.iter().copied()).unwrap();
        let expected: String = text.iter().filter_map(|c| c.to_char()).collect();
        prop_assert_eq!(&units, &expected.encode_utf16().collect::<Vec<_>>());
        prop_assert_eq!(decode(&enc, &units).unwrap(), text);
    }

    #[test]
    fn test_round_trip_bom_forms(text in text()) {
        let enc = Encoding::<Utf16Bom>::new();
        let units = encode(&enc, text.iter().copied()).unwrap();
        if !text.is_empty() {
            prop_assert_eq!(&units[..2], &[0xFEu8, 0xFF][..]);
        }
        prop_assert_eq!(decode(&enc, &units).unwrap(), text.clone());

        let enc = Encoding::<Utf32Be>::new();
        let units = encode(&enc, text.iter().copied()).unwrap();
        prop_assert_eq!(units.len(), text.len() * 4);
        prop_assert_eq!(decode(&enc, &units).unwrap(), text);
    }

    #[test]
    fn test_reverse_symmetry_well_formed(text in text()) {
        let units = encode(&Encoding::<Utf8>::new(), text.iter().copied()).unwrap();
        let (forward, backward) = both_directions::<Utf8>(&units);
        prop_assert_eq!(&forward, &backward);
        prop_assert_eq!(forward.len(), text.len());
    }

    #[test]
    fn test_utf8_agrees_with_std(bytes in prop::collection::vec(any::<u8>(), 0..32)) {
        let decoded = decode(&Encoding::<Utf8>::new(), &bytes);
        match std::str::from_utf8(&bytes) {
            Ok(s) => {
                let expected: Vec<UnicodeChar> = s.chars().map(UnicodeChar::from).collect();
                prop_assert_eq!(decoded.unwrap(), expected);
            }
            Err(_) => prop_assert!(decoded.is_err()),
        }
    }

    #[test]
    fn test_permissive_always_terminates(bytes in prop::collection::vec(any::<u8>(), 0..64)) {
        let enc = Encoding::<Utf8>::new();
        let count = enc.view(&bytes).with_policy::<Permissive>().into_iter().count();
        // Every step consumes at least one unit
        prop_assert!(count <= bytes.len());
        let all_ok = enc
            .view(&bytes)
            .with_policy::<Permissive>()
            .into_iter()
            .all(|r| r.is_ok());
        prop_assert!(all_ok);
    }

    #[test]
    fn test_truncation_is_underflow(text in text(), cut in 1usize..4) {
        let enc = Encoding::<Utf8>::new();
        let mut units = encode(&enc, text.iter().copied()).unwrap();
        units.extend_from_slice(&[0xF0, 0x9F, 0x98, 0x80][..4 - cut]);
        let offset = units.len() - (4 - cut);
        let err = decode(&enc, &units).unwrap_err();
        prop_assert_eq!(err.kind, CodecError::DecodeUnderflow);
        prop_assert_eq!(err.offset, offset);
    }
}
