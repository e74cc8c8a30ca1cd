//! Tests for the trigram hash and the fixed-size Bloom filter.

use super::*;
use crate::text::{canonicalize, extract_trigrams, Trigram};
use proptest::prelude::*;

fn rounds(k: u8) -> Rounds {
    Rounds::new(k).expect("valid rounds")
}

/// Straight transcription of the hash loop, used as a cross-check.
fn reference_hash(tri: &Trigram) -> u64 {
    let mut h: i64 = 5381;
    for i in 0..33 {
        h = ((h << 5).wrapping_add(h)) ^ i64::from(tri[i % 3]);
    }
    if h < 0 {
        h.wrapping_neg() as u64
    } else {
        h as u64
    }
}

// ========== Hash Tests ==========

#[test]
fn test_hash_deterministic() {
    let first = trigram_hash(b"abc");
    for _ in 0..10 {
        assert_eq!(trigram_hash(b"abc"), first);
    }
}

#[test]
fn test_hash_known_values() {
    assert_eq!(trigram_hash(b"abc"), 6_337_603_364_639_291_003);
    assert_eq!(trigram_hash(b"the"), 8_147_236_685_761_944_004);
    assert_eq!(trigram_hash(b"###"), 7_683_267_895_046_435_962);
    assert_eq!(trigram_hash(b"z9#"), 7_896_664_637_330_696_859);
}

#[test]
fn test_bit_positions_known_values() {
    // "abc": 11-bit windows 1659, 1190, 626
    let mut filter = BloomFilter::new();
    filter.insert(b"abc", rounds(3));

    assert_eq!(filter.count_ones(), 3);
    assert!(filter.is_set(1659));
    assert!(filter.is_set(1190));
    assert!(filter.is_set(626));
}

#[test]
fn test_hash_never_negative() {
    // Every trigram over the canonical alphabet fits in 63 bits
    let alphabet = b"abcdefghijklmnopqrstuvwxyz0123456789#";
    for &a in alphabet {
        for &b in alphabet {
            for &c in alphabet {
                assert!(trigram_hash(&[a, b, c]) <= i64::MAX as u64);
            }
        }
    }
}

#[test]
fn test_hash_matches_shift_add_formulation() {
    for tri in [b"abc", b"the", b"#12", b"zzz", b"and"] {
        assert_eq!(trigram_hash(tri), reference_hash(tri));
    }
}

#[test]
fn test_hash_is_order_sensitive() {
    assert_ne!(trigram_hash(b"abc"), trigram_hash(b"cba"));
}

// ========== Rounds Tests ==========

#[test]
fn test_rounds_range() {
    assert!(Rounds::new(0).is_err());
    assert_eq!(rounds(1).get(), 1);
    assert_eq!(rounds(3).get(), 3);

    let err = Rounds::new(4).unwrap_err();
    assert_eq!(err.code(), "BLOOM-001");
}

#[test]
fn test_rounds_serde() {
    let r: Rounds = serde_json::from_str("2").expect("deserialize");
    assert_eq!(r, rounds(2));
    assert_eq!(serde_json::to_string(&r).expect("serialize"), "2");
    assert!(serde_json::from_str::<Rounds>("7").is_err());
}

// ========== Filter Tests ==========

#[test]
fn test_filter_new_is_empty() {
    let filter = BloomFilter::new();
    assert_eq!(filter.count_ones(), 0);
    assert!(!filter.test(b"abc", rounds(1)));
}

#[test]
fn test_filter_insert_sets_expected_bits() {
    let mut filter = BloomFilter::new();
    filter.insert(b"abc", rounds(3));

    let hash = trigram_hash(b"abc");
    for i in 0..3 {
        let pos = ((hash >> (11 * i)) % 2048) as usize;
        assert!(filter.is_set(pos), "round {i} bit {pos} should be set");
    }
    assert!(filter.count_ones() <= 3);
}

#[test]
fn test_filter_insert_and_test() {
    let mut filter = BloomFilter::new();
    filter.insert(b"hel", rounds(2));

    assert!(filter.test(b"hel", rounds(2)));
}

#[test]
fn test_filter_one_round_subset_of_two() {
    // Round 0 is shared, so a 2-round insert also satisfies a 1-round test
    let mut filter = BloomFilter::new();
    filter.insert(b"xyz", rounds(2));

    assert!(filter.test(b"xyz", rounds(1)));
}

#[test]
fn test_filter_saturated_matches_everything() {
    let filter = BloomFilter::saturated();

    assert_eq!(filter.count_ones(), FILTER_BITS as u32);
    assert!(filter.test(b"any", rounds(3)));
    assert!((filter.fill_ratio() - 1.0).abs() < f64::EPSILON);
}

#[test]
fn test_filter_build_uses_prefix_only() {
    // element_count = 3 covers "abcde" -> abc, bcd, cde
    let filter = BloomFilter::build("abcdefgh", rounds(1), 3).expect("build");

    assert!(filter.test(b"abc", rounds(1)));
    assert!(filter.test(b"bcd", rounds(1)));
    assert!(filter.test(b"cde", rounds(1)));

    let expected = BloomFilter::from_trigrams([b"abc", b"bcd", b"cde"], rounds(1));
    assert_eq!(filter, expected);
}

#[test]
fn test_filter_build_rejects_short_text() {
    let err = BloomFilter::build("abcd", rounds(2), 3).unwrap_err();

    match err {
        crate::Error::TextTooShort { required, actual } => {
            assert_eq!(required, 5);
            assert_eq!(actual, 4);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_filter_build_exact_length() {
    assert!(BloomFilter::build("abcde", rounds(2), 3).is_ok());
}

#[test]
fn test_filter_build_rejects_oversized_element_count() {
    let err = BloomFilter::build("abcdefgh", rounds(2), usize::MAX).unwrap_err();

    match err {
        crate::Error::TextTooShort { required, actual } => {
            assert_eq!(required, usize::MAX);
            assert_eq!(actual, 8);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_filter_overlap() {
    let a = BloomFilter::from_trigrams([b"abc"], rounds(1));
    let empty = BloomFilter::new();
    let full = BloomFilter::saturated();

    assert_eq!(a.overlap(&empty), 0);
    assert_eq!(a.overlap(&full), a.count_ones());
    assert_eq!(a.overlap(&a), 1);
}

#[test]
fn test_filter_bytes_layout() {
    let mut bytes = [0u8; FILTER_BYTES];
    // bit 10 -> byte 1, bit 2
    bytes[1] = 0b0000_0100;
    // bit 2047 -> byte 255, bit 7
    bytes[255] = 0b1000_0000;

    let filter = BloomFilter::from_bytes(&bytes);

    assert!(filter.is_set(10));
    assert!(filter.is_set(2047));
    assert_eq!(filter.count_ones(), 2);
    assert_eq!(filter.to_bytes(), bytes);
}

#[test]
fn test_filter_estimated_fpr() {
    let empty = BloomFilter::new();
    assert!(empty.estimated_fpr(rounds(2)).abs() < f64::EPSILON);

    let mut bytes = [0u8; FILTER_BYTES];
    bytes[..128].fill(0xFF);
    let half = BloomFilter::from_bytes(&bytes);
    assert!((half.estimated_fpr(rounds(2)) - 0.25).abs() < 1e-9);
}

#[test]
fn test_filter_no_false_negatives_on_real_text() {
    let canonical = canonicalize(
        "It was the best of times, it was the worst of times, it was the age of wisdom",
    );
    let filter = BloomFilter::build(&canonical, rounds(3), canonical.len() - 2).expect("build");

    for tri in extract_trigrams(&canonical) {
        assert!(filter.test(&tri, rounds(3)));
    }
}

// ========== Properties ==========

fn trigram_strategy() -> impl Strategy<Value = Trigram> {
    proptest::array::uniform3(prop_oneof![b'a'..=b'z', b'0'..=b'9', Just(b'#')])
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Property: inserting never clears a bit and inserted trigrams always test true
    #[test]
    fn prop_filter_monotonic(
        k in 1u8..=3,
        trigrams in proptest::collection::vec(trigram_strategy(), 1..200)
    ) {
        let k = rounds(k);
        let mut filter = BloomFilter::new();

        for (i, tri) in trigrams.iter().enumerate() {
            let before = filter.clone();
            filter.insert(tri, k);

            prop_assert_eq!(filter.overlap(&before), before.count_ones());
            for earlier in &trigrams[..=i] {
                prop_assert!(filter.test(earlier, k));
            }
        }
    }

    /// Property: hash is always non-negative as a signed value
    #[test]
    fn prop_hash_fits_63_bits(tri in proptest::array::uniform3(any::<u8>())) {
        prop_assert!(trigram_hash(&tri) <= 1u64 << 63);
        prop_assert_eq!(trigram_hash(&tri), reference_hash(&tri));
    }
}
