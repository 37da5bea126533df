//! Property-based tests for the byte cursor using proptest.
//!
//! These tests generate random buffers and cursor moves to check that
//! reads stay in bounds and the cursor only moves on success.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use proptest::prelude::*;
use zd_helpers::{BinaryReader, Error};

// =============================================================================
// Sequential Reads
// =============================================================================

proptest! {
    /// Walking with next() visits every byte once, in order
    #[test]
    fn next_visits_every_byte(data in prop::collection::vec(any::<u8>(), 0..256)) {
        let mut reader = BinaryReader::new(data.clone());
        let mut seen = Vec::with_capacity(data.len());
        while let Some(b) = reader.next() {
            seen.push(b);
        }
        prop_assert_eq!(seen, data.clone());
        prop_assert!(!reader.can_next());
        prop_assert_eq!(reader.position(), data.len().checked_sub(1));
    }

    /// read(n) either returns exactly n bytes or fails without moving
    #[test]
    fn read_is_all_or_nothing(
        data in prop::collection::vec(any::<u8>(), 0..64),
        lens in prop::collection::vec(0usize..24, 1..8)
    ) {
        let mut reader = BinaryReader::new(data.clone());
        let mut consumed = 0usize;
        for len in lens {
            let before = reader.position();
            match reader.read(len) {
                Ok(chunk) => {
                    prop_assert_eq!(chunk, &data[consumed..consumed + len]);
                    consumed += len;
                },
                Err(Error::OutOfBounds { requested, len: total, .. }) => {
                    prop_assert_eq!(requested, len);
                    prop_assert_eq!(total, data.len());
                    prop_assert!(consumed + len > data.len());
                    prop_assert_eq!(reader.position(), before);
                },
                Err(other) => prop_assert!(false, "unexpected error {:?}", other),
            }
        }
        prop_assert_eq!(reader.read_remaining(), &data[consumed..]);
    }

    /// Typed reads agree with byteorder on the same bytes
    #[test]
    fn typed_reads_match_byteorder(data in prop::collection::vec(any::<u8>(), 8..32)) {
        let mut reader = BinaryReader::new(data.clone());
        prop_assert_eq!(reader.read_u32().unwrap(), BigEndian::read_u32(&data[..4]));
        prop_assert_eq!(
            reader.read_i32_as::<LittleEndian>().unwrap(),
            LittleEndian::read_i32(&data[4..8])
        );
        reader.reset();
        prop_assert_eq!(reader.read_u64().unwrap(), BigEndian::read_u64(&data[..8]));
    }

    /// Hex and base64 constructors see the same bytes
    #[test]
    fn encoded_constructors_agree(data in prop::collection::vec(any::<u8>(), 0..64)) {
        use base64::Engine;

        let from_hex = BinaryReader::from_hex(&hex::encode(&data)).unwrap();
        let from_b64 = BinaryReader::from_base64(
            &base64::engine::general_purpose::STANDARD.encode(&data),
        ).unwrap();
        prop_assert_eq!(&from_hex, &from_b64);
        prop_assert_eq!(from_hex.as_bytes(), data.as_slice());
    }
}

// =============================================================================
// Seeking
// =============================================================================

proptest! {
    /// seek lands on the requested index or reports out-of-bounds
    #[test]
    fn seek_in_range_only(len in 0usize..64, index in 0usize..80) {
        let mut reader = BinaryReader::new(vec![7u8; len]);
        let result = reader.seek(index);
        if index < len {
            prop_assert!(result.is_ok());
            prop_assert_eq!(reader.position(), Some(index));
            prop_assert_eq!(reader.current(), Some(7));
        } else {
            prop_assert!(result.is_err());
            prop_assert_eq!(reader.position(), None);
        }
    }

    /// Seeking forward then back by the same offset restores the position
    #[test]
    fn seek_offset_is_reversible(len in 2usize..64, start in 0usize..64, step in 1isize..16) {
        prop_assume!(start < len);
        let mut reader = BinaryReader::new(vec![0u8; len]);
        reader.seek(start).unwrap();
        if reader.seek_offset(step).is_ok() {
            reader.seek_offset(-step).unwrap();
            prop_assert_eq!(reader.position(), Some(start));
        } else {
            prop_assert_eq!(reader.position(), Some(start));
        }
    }

    /// Offsets anywhere in the isize range never panic and never move a
    /// cursor on failure
    #[test]
    fn seek_offset_any_offset(
        len in 0usize..32,
        steps in 0usize..32,
        offset in prop_oneof![
            Just(isize::MIN),
            Just(isize::MAX),
            Just(isize::MIN + 1),
            Just(isize::MAX - 1),
            any::<isize>(),
        ]
    ) {
        let mut reader = BinaryReader::new(vec![1u8; len]);
        for _ in 0..steps {
            reader.next();
        }
        let before = reader.position();
        if reader.seek_offset(offset).is_err() {
            prop_assert_eq!(reader.position(), before);
        } else {
            prop_assert!(reader.position().is_none_or(|p| p < len));
        }
    }

    /// Look-ahead with extreme offsets neither panics nor moves the cursor
    #[test]
    fn look_ahead_any_offset(
        data in prop::collection::vec(0u8..3, 1..32),
        at in 0usize..32,
        offset in prop_oneof![Just(isize::MIN), Just(isize::MAX), any::<isize>()]
    ) {
        let mut reader = BinaryReader::new(data.clone());
        let _ = reader.seek(at % data.len());
        let before = reader.position();

        if let Some(found) = reader.index_of(&[1], offset, None) {
            prop_assert_eq!(data[found], 1);
        }
        let mut visited = 0usize;
        reader.reverse(offset, |_, i| {
            visited += 1;
            i >= data.len()
        });
        prop_assert!(visited <= data.len());
        prop_assert_eq!(reader.position(), before);
    }

    /// An unbounded limit only depends on whether the reader can advance
    #[test]
    fn can_next_until_unbounded(len in 0usize..16, steps in 0usize..20) {
        let mut reader = BinaryReader::new(vec![0u8; len]);
        for _ in 0..steps {
            reader.next();
        }
        prop_assert_eq!(reader.can_next_until(usize::MAX), reader.can_next());
    }
}

// =============================================================================
// Searching
// =============================================================================

proptest! {
    /// index_of agrees with a naive window search from the buffer start
    #[test]
    fn index_of_matches_naive_search(
        data in prop::collection::vec(0u8..4, 0..64),
        needle in prop::collection::vec(0u8..4, 1..4)
    ) {
        let reader = BinaryReader::new(data.clone());
        let expected = data.windows(needle.len()).position(|w| w == needle.as_slice());
        // before the first byte the search starts at position -1, clamped to 0
        prop_assert_eq!(reader.index_of(&needle, 0, None), expected);
    }

    /// reverse_count counts only the run directly before the position
    #[test]
    fn reverse_count_counts_trailing_run(prefix in "[a-z]{0,8}", run in 0usize..10) {
        let text = format!("{prefix}{}\"", "\\".repeat(run));
        let mut reader = BinaryReader::from(text.as_str());
        reader.seek(text.len() - 1).unwrap();
        prop_assert_eq!(reader.reverse_count(b'\\'), run);
    }
}
