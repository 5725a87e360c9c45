//! Backward-search and bidirectional-search primitives.
//!
//! Every cursor extension bottoms out here. All three primitives operate
//! on closed suffix-array intervals `[l, r]`, return `None` instead of an
//! empty interval, never allocate and never panic. Character-level entry
//! points translate through the alphabet strategy once (the identity
//! strategy makes that translation free); the compact-level cores do the
//! interval arithmetic and are what the sibling scans call directly.

use crate::index::alphabet::{Char, Comp};
use crate::index::csa::CompressedSuffixArray;

/// A pair of synchronized intervals: the primary side just searched and
/// the mirror side kept in lockstep.
pub type BiInterval = ((u64, u64), (u64, u64));

/// One backward-search step: from the interval of some string w, find the
/// interval of `ch`-prepended w (which is w extended *rightwards* in the
/// external text, since the CSA indexes the reversed text).
///
/// Returns `None` when the extended string does not occur, including when
/// the reduced strategy reports `ch` absent from the text.
#[inline]
pub fn backward_search(
    csa: &CompressedSuffixArray,
    l: u64,
    r: u64,
    ch: Char,
) -> Option<(u64, u64)> {
    let comp = csa.char_to_comp(ch);
    if comp == 0 && ch > 0 {
        return None;
    }
    backward_search_comp(csa, l, r, comp)
}

/// Compact-code core of [`backward_search`].
pub(crate) fn backward_search_comp(
    csa: &CompressedSuffixArray,
    l: u64,
    r: u64,
    comp: Comp,
) -> Option<(u64, u64)> {
    debug_assert!(l <= r && r < csa.size());
    debug_assert!(comp >= 1 && comp < csa.sigma());

    let c_begin = csa.c(comp);

    // A full interval needs no rank queries: the answer is the whole
    // C-table bucket of `comp`.
    if r + 1 - l == csa.size() {
        let occurrences = csa.c(comp + 1) - c_begin;
        if occurrences == 0 {
            return None;
        }
        return Some((c_begin, c_begin + occurrences - 1));
    }

    let rank_l = csa.rank(l, comp);
    let rank_r = csa.rank(r + 1, comp);
    if rank_r == rank_l {
        return None;
    }
    Some((c_begin + rank_l, c_begin + rank_r - 1))
}

/// One bidirectional-search step.
///
/// `(l_fwd, r_fwd)` is the interval of some string w on the primary side,
/// `(l_bwd, r_bwd)` the interval of the reversed w on the mirror side.
/// On success the primary interval covers `ch`-prepended w and the mirror
/// interval shrinks in place to stay synchronized. Both intervals always
/// keep equal counts.
#[inline]
pub fn bidirectional_search(
    csa: &CompressedSuffixArray,
    fwd: (u64, u64),
    bwd: (u64, u64),
    ch: Char,
) -> Option<BiInterval> {
    let comp = csa.char_to_comp(ch);
    if comp == 0 && ch > 0 {
        return None;
    }
    bidirectional_search_comp(csa, fwd, bwd, comp)
}

/// Compact-code core of [`bidirectional_search`].
pub(crate) fn bidirectional_search_comp(
    csa: &CompressedSuffixArray,
    (l_fwd, r_fwd): (u64, u64),
    (l_bwd, r_bwd): (u64, u64),
    comp: Comp,
) -> Option<BiInterval> {
    debug_assert!(l_fwd <= r_fwd && r_fwd < csa.size());
    debug_assert!(r_bwd + 1 - l_bwd == r_fwd + 1 - l_fwd);
    debug_assert!(comp >= 1 && comp < csa.sigma());

    let c_begin = csa.c(comp);

    if r_fwd + 1 - l_fwd == csa.size() {
        let occurrences = csa.c(comp + 1) - c_begin;
        if occurrences == 0 {
            return None;
        }
        let fwd = (c_begin, c_begin + occurrences - 1);
        return Some((fwd, fwd));
    }

    let (rank_l, smaller, greater) = csa.lex_count(l_fwd, r_fwd + 1, comp);
    let occurrences = (r_fwd + 1 - l_fwd) - smaller - greater;
    if occurrences == 0 {
        return None;
    }

    let fwd = (c_begin + rank_l, c_begin + rank_l + occurrences - 1);
    let bwd = (l_bwd + smaller, r_bwd - greater);
    debug_assert_eq!(fwd.1 - fwd.0, bwd.1 - bwd.0);
    Some((fwd, bwd))
}

/// Bidirectional-search variant for sibling cycling.
///
/// `(l_fwd, r_fwd)` is the *parent* interval on the primary side and
/// `(_, r_bwd)` the mirror interval of the sibling being cycled away
/// from. Sibling edges of one parent partition the mirror interval in
/// compact-code order and every label strictly between the old and the
/// new edge is empty, so the new mirror interval starts right after the
/// old one and carries the primary interval's count.
pub(crate) fn bidirectional_cycle_comp(
    csa: &CompressedSuffixArray,
    (l_fwd, r_fwd): (u64, u64),
    r_bwd: u64,
    comp: Comp,
) -> Option<BiInterval> {
    debug_assert!(l_fwd <= r_fwd && r_fwd < csa.size());
    debug_assert!(comp >= 1 && comp < csa.sigma());

    let c_begin = csa.c(comp);
    let (rank_l, smaller, greater) = csa.lex_count(l_fwd, r_fwd + 1, comp);
    let occurrences = (r_fwd + 1 - l_fwd) - smaller - greater;
    if occurrences == 0 {
        return None;
    }

    let fwd = (c_begin + rank_l, c_begin + rank_l + occurrences - 1);
    let bwd = (r_bwd + 1, r_bwd + occurrences);
    debug_assert_eq!(fwd.1 - fwd.0, bwd.1 - bwd.0);
    Some((fwd, bwd))
}
