//! Approximate search by plain backtracking.
//!
//! The driver walks the query left to right while extending a
//! bidirectional cursor to the right, branching into substitutions,
//! insertions and deletions as long as their budgets allow. Two guards
//! shape the branching: a deletion may not be the first operation and may
//! not immediately follow an insertion (either order of that pair is
//! already covered as a substitution). Once the budget is exhausted the
//! remaining query suffix is matched in one exact extension.
//!
//! Besides serving mixed-edit and best/strata searches directly, this
//! driver is the reference the search-scheme driver is validated against.

use crate::cursor::BiCursor;
use crate::index::alphabet::Symbol;
use crate::index::bi::BiFmIndex;
use crate::search::config::MaxError;

/// Search `query` in `index` with the given error budget, invoking
/// `delegate` once per hit (a cursor snapshot covering one alignment).
///
/// With `ABORT_ON_HIT`, a `true` return from the delegate unwinds the
/// whole search; without it the delegate's return value is ignored.
/// Returns whether the search was aborted.
pub fn search_trivial<'a, 't, const ABORT_ON_HIT: bool>(
    index: &'a BiFmIndex<'t>,
    query: &[Symbol],
    budget: MaxError,
    delegate: &mut dyn FnMut(&BiCursor<'a, 't>) -> bool,
) -> bool {
    debug_assert!(!query.is_empty());
    // A deletion may not open the alignment.
    recurse::<ABORT_ON_HIT>(index.root(), query, 0, budget, true, false, delegate)
}

fn recurse<'a, 't, const ABORT_ON_HIT: bool>(
    cursor: BiCursor<'a, 't>,
    query: &[Symbol],
    query_pos: usize,
    budget: MaxError,
    allow_ins: bool,
    allow_del: bool,
    delegate: &mut dyn FnMut(&BiCursor<'a, 't>) -> bool,
) -> bool {
    // Exact tail: budget spent or query consumed.
    if query_pos == query.len() || budget.total == 0 {
        let mut tail = cursor;
        if query_pos == query.len() || tail.extend_right_seq(&query[query_pos..]) {
            let stop = delegate(&tail);
            return ABORT_ON_HIT && stop;
        }
        return false;
    }

    // Insertion: the query symbol is skipped, the cursor stays.
    if budget.insertion > 0 && allow_ins {
        let next = MaxError {
            total: budget.total - 1,
            insertion: budget.insertion - 1,
            ..budget
        };
        if recurse::<ABORT_ON_HIT>(cursor, query, query_pos + 1, next, true, false, delegate) {
            return true;
        }
    }

    if budget.substitution > 0 || budget.deletion > 0 {
        // Enumerate every child edge once; each serves both as a
        // match/mismatch against the query symbol and as a deleted text
        // symbol.
        let mut child = cursor;
        if child.extend_right() {
            loop {
                let delta = child.last_char() != query[query_pos];

                if !delta || budget.substitution > 0 {
                    let next = MaxError {
                        total: budget.total - delta as u8,
                        substitution: budget.substitution - delta as u8,
                        ..budget
                    };
                    if recurse::<ABORT_ON_HIT>(child, query, query_pos + 1, next, true, true, delegate)
                    {
                        return true;
                    }
                }

                if budget.deletion > 0 && allow_del {
                    let next = MaxError {
                        total: budget.total - 1,
                        deletion: budget.deletion - 1,
                        ..budget
                    };
                    if recurse::<ABORT_ON_HIT>(child, query, query_pos, next, false, true, delegate)
                    {
                        return true;
                    }
                }

                if !child.cycle_back() {
                    break;
                }
            }
        }
    } else {
        // No edits that consume a text symbol remain: follow the query.
        let mut child = cursor;
        if child.extend_right_symbol(query[query_pos]) {
            if recurse::<ABORT_ON_HIT>(child, query, query_pos + 1, budget, true, true, delegate) {
                return true;
            }
        }
    }

    false
}
