//! End-to-end tests of the search engine.
//!
//! These exercise the full stack - index construction, cursor traversal,
//! both approximate-search drivers and the facade - on literal scenarios
//! and on randomized texts with fixed seeds.

use gxi::index::BiFmIndex;
use gxi::search::{
    search, search_one, search_scheme, search_trivial, scheme_for, MaxError, MaxErrorRate, Mode,
    SearchConfig,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

const A: u8 = 0;
const C: u8 = 1;
const G: u8 = 2;
const T: u8 = 3;

/// Encode an ASCII DNA string as 0-based ranks.
fn dna(s: &str) -> Vec<u8> {
    s.bytes()
        .map(|b| match b {
            b'A' => A,
            b'C' => C,
            b'G' => G,
            b'T' => T,
            _ => panic!("not a DNA symbol: {}", b as char),
        })
        .collect()
}

/// All hit positions of `query` under `budget`, through the trivial
/// driver, deduplicated and sorted.
fn trivial_positions(index: &BiFmIndex<'_>, query: &[u8], budget: MaxError) -> Vec<u64> {
    let mut positions = Vec::new();
    search_trivial::<false>(index, query, budget, &mut |cursor| {
        positions.extend(cursor.locate());
        false
    });
    positions.sort_unstable();
    positions.dedup();
    positions
}

#[test]
fn test_exact_search_repeated_hit() {
    let text = dna("ACGTACGT");
    let index = BiFmIndex::new(&text);

    let query = dna("ACGT");
    let hits = search(&index, &[&query], &SearchConfig::new());
    assert_eq!(hits, vec![vec![0, 4]]);
}

#[test]
fn test_multi_query() {
    let text = dna("ACGTACGT");
    let index = BiFmIndex::new(&text);

    let q1 = dna("ACGT");
    let q2 = dna("GG");
    let q3 = dna("CGTA");
    let hits = search(&index, &[&q1, &q2, &q3], &SearchConfig::new());
    assert_eq!(hits, vec![vec![0, 4], vec![], vec![1]]);
}

#[test]
fn test_one_substitution_by_rate() {
    let text = dna("ACGTACGT");
    let index = BiFmIndex::new(&text);
    let config = SearchConfig::new().max_error_rate(MaxErrorRate {
        total: 0.25,
        substitution: 0.25,
        insertion: 0.0,
        deletion: 0.0,
    });

    let q1 = dna("ACGT");
    let q2 = dna("ACGGACG"); // length 7: floor(1.75) = 1 substitution
    let q3 = dna("CGTC");
    let q4 = dna("CGG"); // length 3: floor(0.75) = exact only
    let hits = search(&index, &[&q1, &q2, &q3, &q4], &config);
    assert_eq!(hits, vec![vec![0, 4], vec![0], vec![1], vec![]]);
}

#[test]
fn test_bidirectional_cycle_invariant() {
    let text = dna("GAATTAATGAAC");
    let index = BiFmIndex::new(&text);
    let mut cursor = index.root();

    assert!(cursor.extend_right_seq(&dna("AAC")));
    assert!(cursor.cycle_back());
    assert_eq!(cursor.query(), dna("AAT").as_slice());
    assert_eq!(cursor.last_char(), T);

    assert!(cursor.extend_left_symbol(G));
    assert!(cursor.cycle_front());
    assert_eq!(cursor.query(), dna("TAAT").as_slice());
    assert_eq!(cursor.last_char(), T);
}

#[test]
fn test_sibling_ordering() {
    let text = dna("ACGGTAGGACG");
    let index = gxi::index::FmIndex::new(&text);
    let mut cursor = index.root();

    assert!(cursor.extend_right());
    assert_eq!((cursor.last_char(), cursor.count()), (A, 3));
    assert!(cursor.cycle_back());
    assert_eq!((cursor.last_char(), cursor.count()), (C, 2));
    assert!(cursor.cycle_back());
    assert_eq!((cursor.last_char(), cursor.count()), (G, 5));
    assert!(cursor.cycle_back());
    assert_eq!((cursor.last_char(), cursor.count()), (T, 1));

    let at_t = cursor;
    assert!(!cursor.cycle_back());
    assert_eq!(cursor, at_t);
}

#[test]
fn test_scheme_equivalence_on_random_text() {
    let mut rng = StdRng::seed_from_u64(42);
    let text: Vec<u8> = (0..100).map(|_| rng.gen_range(0..4)).collect();
    let index = BiFmIndex::new(&text);

    let scheme = scheme_for(0, 2);
    let budget = MaxError::substitutions(2);

    // Queries of length 5: every window of the text plus random queries
    // that may not occur at all.
    let mut queries: Vec<Vec<u8>> = (0..text.len() - 5).map(|i| text[i..i + 5].to_vec()).collect();
    for _ in 0..50 {
        queries.push((0..5).map(|_| rng.gen_range(0..4)).collect());
    }

    for query in &queries {
        let mut scheme_hits = Vec::new();
        search_scheme::<false>(&index, query, budget, &scheme, &mut |cursor| {
            scheme_hits.extend(cursor.locate());
            false
        });
        scheme_hits.sort_unstable();
        scheme_hits.dedup();

        assert_eq!(
            scheme_hits,
            trivial_positions(&index, query, budget),
            "query {query:?}"
        );
    }
}

#[test]
fn test_facade_matches_naive_hamming_scan() {
    let mut rng = StdRng::seed_from_u64(7);
    let text: Vec<u8> = (0..150).map(|_| rng.gen_range(0..4)).collect();
    let index = BiFmIndex::new(&text);

    for query_len in [4usize, 6, 9] {
        for _ in 0..20 {
            let start = rng.gen_range(0..text.len() - query_len);
            let mut query = text[start..start + query_len].to_vec();
            // Corrupt one position half of the time.
            if rng.gen_bool(0.5) {
                let i = rng.gen_range(0..query_len);
                query[i] = (query[i] + rng.gen_range(1..4)) % 4;
            }

            for max_sub in 0..3u8 {
                let config = SearchConfig::new().max_error(MaxError::substitutions(max_sub));
                let expected: Vec<u64> = (0..=text.len() - query_len)
                    .filter(|&i| {
                        query
                            .iter()
                            .zip(&text[i..i + query_len])
                            .filter(|(a, b)| a != b)
                            .count()
                            <= max_sub as usize
                    })
                    .map(|i| i as u64)
                    .collect();

                assert_eq!(
                    search_one(&index, &query, &config),
                    expected,
                    "query {query:?}, {max_sub} substitutions"
                );
            }
        }
    }
}

#[test]
fn test_cursor_invariants_on_random_walks() {
    let mut rng = StdRng::seed_from_u64(1234);
    let text: Vec<u8> = (0..200).map(|_| rng.gen_range(0..4)).collect();
    let index = BiFmIndex::new(&text);

    for _ in 0..100 {
        let mut cursor = index.root();
        for _ in 0..rng.gen_range(1..10) {
            let sym = rng.gen_range(0..4);
            let ok = if rng.gen_bool(0.5) {
                cursor.extend_right_symbol(sym)
            } else {
                cursor.extend_left_symbol(sym)
            };
            if !ok {
                break;
            }

            // Twin intervals always carry the same count.
            let (fl, fr) = cursor.fwd_range();
            let (rl, rr) = cursor.rev_range();
            assert_eq!(fr - fl, rr - rl);
            assert_eq!(cursor.count(), fr - fl + 1);

            // The reconstructed query reaches the same node.
            let query = cursor.query().to_vec();
            let mut replay = index.root();
            assert!(replay.extend_right_seq(&query));
            assert_eq!(replay, cursor);

            // Every located position dereferences back to the query.
            for pos in cursor.locate() {
                let pos = pos as usize;
                assert_eq!(&text[pos..pos + query.len()], query.as_slice());
            }
        }
    }
}

#[test]
fn test_cycling_is_strictly_increasing() {
    let mut rng = StdRng::seed_from_u64(99);
    let text: Vec<u8> = (0..150).map(|_| rng.gen_range(0..4)).collect();
    let index = BiFmIndex::new(&text);

    for _ in 0..50 {
        let mut cursor = index.root();
        let depth = rng.gen_range(1..6);
        let mut ok = true;
        for _ in 0..depth {
            if !cursor.extend_right() {
                ok = false;
                break;
            }
        }
        if !ok {
            continue;
        }

        let mut previous = cursor.last_char();
        while cursor.cycle_back() {
            assert!(cursor.last_char() > previous);
            assert!(cursor.count() >= 1);
            previous = cursor.last_char();
        }
    }
}

#[test]
fn test_locate_round_trip_via_exact_search() {
    let mut rng = StdRng::seed_from_u64(5);
    let text: Vec<u8> = (0..120).map(|_| rng.gen_range(0..4)).collect();
    let index = BiFmIndex::new(&text);

    for query_len in [2usize, 3, 5, 8] {
        for start in (0..text.len() - query_len).step_by(7) {
            let query = &text[start..start + query_len];
            let expected: Vec<u64> = (0..=text.len() - query_len)
                .filter(|&i| &text[i..i + query_len] == query)
                .map(|i| i as u64)
                .collect();

            let mut cursor = index.root();
            assert!(cursor.extend_right_seq(query));
            let mut located = cursor.locate();
            located.sort_unstable();
            assert_eq!(located, expected);
        }
    }
}

#[test]
fn test_store_load_search_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("genome");

    let text = dna("GAATTAATGAACACGTACGT");
    let index = BiFmIndex::new(&text);
    index.store(&path).unwrap();

    let loaded = BiFmIndex::load(&path, &text).unwrap();
    let config = SearchConfig::new().max_error(MaxError::substitutions(1));

    let query = dna("AATG");
    assert_eq!(
        search(&loaded, &[&query], &config),
        search(&index, &[&query], &config)
    );
}

#[test]
fn test_best_mode_finds_lowest_error_level() {
    let text = dna("ACGTACGT");
    let index = BiFmIndex::new(&text);
    let config = SearchConfig::new()
        .max_error(MaxError::substitutions(2))
        .mode(Mode::Best);

    // "ACTT" has no exact match; its best match needs one substitution.
    let query = dna("ACTT");
    let hits = search(&index, &[&query], &config);
    assert_eq!(hits[0].len(), 1);
    let pos = hits[0][0] as usize;
    let mismatches = query
        .iter()
        .zip(&text[pos..pos + 4])
        .filter(|(a, b)| a != b)
        .count();
    assert_eq!(mismatches, 1);
}
