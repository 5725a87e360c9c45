//! Search schemes and the precomputed optimum tables.
//!
//! A search scheme splits the query into blocks and plans, per search, the
//! order in which blocks are visited and how many errors may have
//! accumulated after each block. Together the searches of a scheme cover
//! every error distribution up to the target budget; a good scheme covers
//! each distribution exactly once, which is where the speedup over plain
//! backtracking comes from.

/// One search of a scheme: a permutation `pi` of block numbers `1..=k`
/// naming the visit order, and cumulative lower/upper error bounds after
/// each visited block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Search {
    pub pi: Vec<u8>,
    pub l: Vec<u8>,
    pub u: Vec<u8>,
}

impl Search {
    /// Number of query blocks this search is defined over.
    #[inline]
    pub fn blocks(&self) -> usize {
        self.pi.len()
    }
}

/// A collection of searches jointly covering an error budget.
pub type SearchScheme = Vec<Search>;

macro_rules! search {
    (pi: $pi:expr, l: $l:expr, u: $u:expr) => {
        Search {
            pi: $pi.to_vec(),
            l: $l.to_vec(),
            u: $u.to_vec(),
        }
    };
}

/// The precomputed optimum scheme for `(min_errors, max_errors)`, if one
/// is shipped.
pub fn optimum_scheme(min_errors: u8, max_errors: u8) -> Option<SearchScheme> {
    match (min_errors, max_errors) {
        (0, 0) => Some(vec![search!(pi: [2, 1, 3], l: [0, 0, 0], u: [0, 0, 0])]),
        (0, 1) => Some(vec![
            search!(pi: [1, 2], l: [0, 0], u: [0, 1]),
            search!(pi: [2, 1], l: [0, 1], u: [0, 1]),
        ]),
        (1, 1) => Some(vec![
            search!(pi: [1, 2], l: [0, 1], u: [0, 1]),
            search!(pi: [2, 1], l: [0, 1], u: [0, 1]),
        ]),
        (0, 2) => Some(vec![
            search!(pi: [1, 2, 3, 4], l: [0, 0, 1, 1], u: [0, 0, 2, 2]),
            search!(pi: [3, 2, 1, 4], l: [0, 0, 0, 0], u: [0, 1, 1, 2]),
            search!(pi: [4, 3, 2, 1], l: [0, 0, 0, 2], u: [0, 1, 2, 2]),
        ]),
        (0, 3) => Some(vec![
            search!(pi: [1, 2, 3, 4, 5], l: [0, 0, 0, 0, 3], u: [0, 2, 2, 3, 3]),
            search!(pi: [2, 3, 4, 5, 1], l: [0, 0, 0, 2, 2], u: [0, 1, 2, 2, 3]),
            search!(pi: [3, 4, 5, 2, 1], l: [0, 0, 1, 1, 1], u: [0, 1, 1, 2, 3]),
            search!(pi: [5, 4, 3, 2, 1], l: [0, 0, 0, 0, 0], u: [0, 0, 3, 3, 3]),
        ]),
        _ => None,
    }
}

/// Single-block scheme covering `(min_errors, max_errors)` with no
/// pruning; it degenerates into plain backtracking.
pub fn trivial_scheme(min_errors: u8, max_errors: u8) -> SearchScheme {
    debug_assert!(min_errors <= max_errors);
    vec![search!(pi: [1], l: [min_errors], u: [max_errors])]
}

/// The scheme for `(min_errors, max_errors)`: the precomputed optimum if
/// shipped, the trivial fallback otherwise.
pub fn scheme_for(min_errors: u8, max_errors: u8) -> SearchScheme {
    optimum_scheme(min_errors, max_errors).unwrap_or_else(|| trivial_scheme(min_errors, max_errors))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Can `search` admit a run where block `b` (1-based) receives
    /// `distribution[b - 1]` errors?
    fn admits(search: &Search, distribution: &[u8]) -> bool {
        let mut cumulative = 0u8;
        for (i, &block) in search.pi.iter().enumerate() {
            cumulative += distribution[block as usize - 1];
            if cumulative < search.l[i] || cumulative > search.u[i] {
                return false;
            }
        }
        true
    }

    fn distributions(blocks: usize, total: u8) -> Vec<Vec<u8>> {
        let mut out = Vec::new();
        let mut current = vec![0u8; blocks];
        fn rec(current: &mut Vec<u8>, i: usize, left: u8, out: &mut Vec<Vec<u8>>) {
            if i == current.len() {
                if left == 0 {
                    out.push(current.clone());
                }
                return;
            }
            for e in 0..=left {
                current[i] = e;
                rec(current, i + 1, left - e, out);
            }
        }
        rec(&mut current, 0, total, &mut out);
        out
    }

    #[test]
    fn test_tables_well_formed() {
        for (min, max) in [(0, 0), (0, 1), (1, 1), (0, 2), (0, 3)] {
            let scheme = optimum_scheme(min, max).unwrap();
            for search in &scheme {
                assert_eq!(search.pi.len(), search.l.len());
                assert_eq!(search.pi.len(), search.u.len());
                // pi is a permutation of 1..=k
                let mut pi = search.pi.clone();
                pi.sort_unstable();
                let expected: Vec<u8> = (1..=search.blocks() as u8).collect();
                assert_eq!(pi, expected);
                // bounds are cumulative and consistent
                for i in 0..search.blocks() {
                    assert!(search.l[i] <= search.u[i]);
                    assert!(search.u[i] <= max);
                }
                assert!(*search.u.last().unwrap() == max);
            }
        }
    }

    #[test]
    fn test_schemes_cover_every_distribution() {
        for (min, max) in [(0u8, 0u8), (0, 1), (1, 1), (0, 2), (0, 3)] {
            let scheme = optimum_scheme(min, max).unwrap();
            let blocks = scheme[0].blocks();
            for total in min..=max {
                for dist in distributions(blocks, total) {
                    assert!(
                        scheme.iter().any(|s| admits(s, &dist)),
                        "({min},{max}) misses distribution {dist:?}"
                    );
                }
            }
        }
    }

    #[test]
    fn test_fallback_for_unsupported_pair() {
        assert!(optimum_scheme(0, 4).is_none());
        let scheme = scheme_for(0, 4);
        assert_eq!(scheme.len(), 1);
        assert_eq!(scheme[0].blocks(), 1);
        assert_eq!(scheme[0].l, vec![0]);
        assert_eq!(scheme[0].u, vec![4]);
    }
}
