//! Approximate search driven by search schemes.
//!
//! For every search of a scheme the query is partitioned into blocks, the
//! cursor starts at the first visited block and grows left or right per
//! the block permutation. Blocks whose error allowance is exhausted are
//! matched in one exact extension; elsewhere the recursion branches into
//! substitutions, insertions and deletions exactly as far as the
//! cumulative per-block bounds allow. Reported hits therefore carry error
//! counts inside `[l_i, u_i]` for every prefix of the block order.

use crate::cursor::BiCursor;
use crate::index::alphabet::Symbol;
use crate::index::bi::BiFmIndex;
use crate::search::config::MaxError;
use crate::search::schemes::Search;
use smallvec::SmallVec;

/// Cumulative block lengths in visit order plus the query position where
/// the first visited block begins.
struct BlockInfo {
    lengths: SmallVec<[usize; 8]>,
    start: usize,
}

/// Per-block lengths (block number order): the query length split evenly,
/// remainder to the lowest-numbered blocks. Then per search: cumulative
/// lengths in `pi` order and the start position of the first block.
fn block_info(scheme: &[Search], query_len: usize) -> Vec<BlockInfo> {
    let blocks = scheme[0].blocks();
    let base = query_len / blocks;
    let rest = query_len - blocks * base;

    let mut block_lengths: SmallVec<[usize; 8]> = SmallVec::with_capacity(blocks);
    for block in 0..blocks {
        block_lengths.push(base + usize::from(block < rest));
    }

    scheme
        .iter()
        .map(|search| {
            let mut lengths: SmallVec<[usize; 8]> = SmallVec::with_capacity(blocks);
            let mut start = 0;
            lengths.push(block_lengths[search.pi[0] as usize - 1]);
            for i in 1..blocks {
                let len = block_lengths[search.pi[i] as usize - 1];
                lengths.push(lengths[i - 1] + len);
                if search.pi[i] < search.pi[0] {
                    start += len;
                }
            }
            BlockInfo { lengths, start }
        })
        .collect()
}

/// Shared state of one search's recursion.
struct SearchRun<'s, 'd, 'a, 't> {
    query: &'s [Symbol],
    search: &'s Search,
    lengths: &'s [usize],
    delegate: &'d mut dyn FnMut(&BiCursor<'a, 't>) -> bool,
}

/// Search `query` in `index` under `scheme` with the given error budget,
/// invoking `delegate` once per hit.
///
/// With `ABORT_ON_HIT`, a `true` return from the delegate unwinds the
/// whole search; without it the delegate's return value is ignored.
/// Returns whether the search was aborted. The query must be at least as
/// long as the scheme's block count.
pub fn search_scheme<'a, 't, const ABORT_ON_HIT: bool>(
    index: &'a BiFmIndex<'t>,
    query: &[Symbol],
    budget: MaxError,
    scheme: &[Search],
    delegate: &mut dyn FnMut(&BiCursor<'a, 't>) -> bool,
) -> bool {
    debug_assert!(!scheme.is_empty());
    debug_assert!(query.len() >= scheme[0].blocks());

    let info = block_info(scheme, query.len());

    for (search, info) in scheme.iter().zip(&info) {
        let mut run = SearchRun {
            query,
            search,
            lengths: &info.lengths,
            delegate: &mut *delegate,
        };
        let hit = step::<ABORT_ON_HIT>(
            &mut run,
            index.root(),
            info.start,
            info.start + 1,
            0,
            0,
            true,
            budget,
        );
        if ABORT_ON_HIT && hit {
            return true;
        }
    }
    false
}

/// One recursion step. `lb` and `rb` delimit the covered query range as
/// `query[lb .. rb - 1]`; `errors` counts edits spent so far against the
/// cumulative bounds of `block_id`.
#[allow(clippy::too_many_arguments)]
fn step<'a, 't, const ABORT: bool>(
    run: &mut SearchRun<'_, '_, 'a, 't>,
    cursor: BiCursor<'a, 't>,
    lb: usize,
    rb: usize,
    errors: u8,
    block_id: usize,
    go_right: bool,
    budget: MaxError,
) -> bool {
    let max_left_in_block = run.search.u[block_id] - errors;
    let min_left_in_block = run.search.l[block_id].saturating_sub(errors);

    // Done: every block consumed within bounds and the cursor matches the
    // whole query.
    if min_left_in_block == 0 && lb == 0 && rb == run.query.len() + 1 {
        let stop = (run.delegate)(&cursor);
        return ABORT && stop;
    }

    // Exact segment: no errors may be spent in the rest of this block.
    if (max_left_in_block == 0 && rb - lb - 1 != run.lengths[block_id])
        || (budget.total == 0 && min_left_in_block == 0)
    {
        return step_exact::<ABORT>(run, cursor, lb, rb, errors, block_id, go_right, budget);
    }

    if budget.total > 0 {
        // Insertion: advance the covered range, keep the cursor.
        if budget.insertion > 0 {
            let lb2 = lb - usize::from(!go_right);
            let rb2 = rb + usize::from(go_right);
            let budget2 = MaxError {
                total: budget.total - 1,
                insertion: budget.insertion - 1,
                ..budget
            };
            let hit = if rb - lb == run.lengths[block_id] {
                // The inserted symbol completes the block; deletions may
                // still pile up at the boundary, so do not advance yet.
                step_deletion::<ABORT>(run, cursor, lb2, rb2, errors + 1, block_id, go_right, budget2)
            } else {
                step::<ABORT>(run, cursor, lb2, rb2, errors + 1, block_id, go_right, budget2)
            };
            if ABORT && hit {
                return true;
            }
        }

        let hit = step_children::<ABORT>(
            run,
            cursor,
            lb,
            rb,
            errors,
            block_id,
            go_right,
            min_left_in_block,
            budget,
        );
        if ABORT && hit {
            return true;
        }
    }

    false
}

/// Match the remainder of the current block in one exact extension, then
/// move on to the next block.
#[allow(clippy::too_many_arguments)]
fn step_exact<'a, 't, const ABORT: bool>(
    run: &mut SearchRun<'_, '_, 'a, 't>,
    cursor: BiCursor<'a, 't>,
    lb: usize,
    rb: usize,
    errors: u8,
    block_id: usize,
    go_right: bool,
    budget: MaxError,
) -> bool {
    let blocks = run.search.blocks();
    let block_id2 = (block_id + 1).min(blocks - 1);
    let go_right2 =
        block_id + 1 < blocks && run.search.pi[block_id + 1] > run.search.pi[block_id];

    if go_right {
        let infix_lb = rb - 1;
        let infix_rb = lb + run.lengths[block_id];

        let mut extended = cursor;
        if !extended.extend_right_seq(&run.query[infix_lb..infix_rb]) {
            return false;
        }

        let hit = step::<ABORT>(
            run,
            extended,
            lb,
            infix_rb + 1,
            errors,
            block_id2,
            go_right2,
            budget,
        );
        if ABORT && hit {
            return true;
        }
    } else {
        let infix_lb = rb - 1 - run.lengths[block_id];
        let infix_rb = lb;

        let mut extended = cursor;
        if !extended.extend_left_seq(&run.query[infix_lb..infix_rb]) {
            return false;
        }

        let hit = step::<ABORT>(
            run,
            extended,
            infix_lb,
            rb,
            errors,
            block_id2,
            go_right2,
            budget,
        );
        if ABORT && hit {
            return true;
        }
    }

    false
}

/// Block boundary reached with deletions still allowed: spend any number
/// of deletions here before advancing to the next block.
#[allow(clippy::too_many_arguments)]
fn step_deletion<'a, 't, const ABORT: bool>(
    run: &mut SearchRun<'_, '_, 'a, 't>,
    cursor: BiCursor<'a, 't>,
    lb: usize,
    rb: usize,
    errors: u8,
    block_id: usize,
    go_right: bool,
    budget: MaxError,
) -> bool {
    let max_left_in_block = run.search.u[block_id] - errors;
    let min_left_in_block = run.search.l[block_id].saturating_sub(errors);

    if min_left_in_block == 0 {
        let blocks = run.search.blocks();
        let block_id2 = (block_id + 1).min(blocks - 1);
        let go_right2 = run.search.pi[block_id2] > run.search.pi[block_id2 - 1];

        let hit = step::<ABORT>(run, cursor, lb, rb, errors, block_id2, go_right2, budget);
        if ABORT && hit {
            return true;
        }
    }

    // No deletions past the query's outer edge.
    let at_outer_edge = run.search.pi[block_id] == 1 && !go_right;
    if !at_outer_edge
        && max_left_in_block > 0
        && budget.total > 0
        && budget.deletion > 0
    {
        let mut child = cursor;
        if (go_right && child.extend_right()) || (!go_right && child.extend_left()) {
            let budget2 = MaxError {
                total: budget.total - 1,
                deletion: budget.deletion - 1,
                ..budget
            };
            loop {
                let hit = step_deletion::<ABORT>(
                    run,
                    child,
                    lb,
                    rb,
                    errors + 1,
                    block_id,
                    go_right,
                    budget2,
                );
                if ABORT && hit {
                    return true;
                }
                let cycled = if go_right {
                    child.cycle_back()
                } else {
                    child.cycle_front()
                };
                if !cycled {
                    break;
                }
            }
        }
    }

    false
}

/// Enumerate the child edges at the cursor; each consumed text symbol is
/// tried as a match/substitution against the query and as a deletion.
#[allow(clippy::too_many_arguments)]
fn step_children<'a, 't, const ABORT: bool>(
    run: &mut SearchRun<'_, '_, 'a, 't>,
    cursor: BiCursor<'a, 't>,
    lb: usize,
    rb: usize,
    errors: u8,
    block_id: usize,
    go_right: bool,
    min_left_in_block: u8,
    budget: MaxError,
) -> bool {
    let mut child = cursor;
    if !((go_right && child.extend_right()) || (!go_right && child.extend_left())) {
        return false;
    }

    let chars_left = run.lengths[block_id] - (rb - lb - 1);
    let lb2 = lb - usize::from(!go_right);
    let rb2 = rb + usize::from(go_right);

    loop {
        let query_sym = if go_right {
            run.query[rb - 1]
        } else {
            run.query[lb - 1]
        };
        let delta = child.last_char() != query_sym;

        // Without deletions the minimum for this block must still be
        // reachable from the characters that remain in it.
        let prune = budget.deletion == 0
            && min_left_in_block > 0
            && chars_left + usize::from(delta) < min_left_in_block as usize + 1;

        if !prune {
            if !delta || budget.substitution > 0 {
                let budget2 = MaxError {
                    total: budget.total - delta as u8,
                    substitution: budget.substitution - delta as u8,
                    ..budget
                };
                let errors2 = errors + delta as u8;

                let hit = if rb - lb == run.lengths[block_id] {
                    // This symbol completes the block.
                    if budget.deletion > 0 {
                        // Deletions may continue at the boundary; direction
                        // and block stay put until they are resolved.
                        step_deletion::<ABORT>(
                            run, child, lb2, rb2, errors2, block_id, go_right, budget2,
                        )
                    } else {
                        let blocks = run.search.blocks();
                        let block_id2 = (block_id + 1).min(blocks - 1);
                        let go_right2 =
                            run.search.pi[block_id2] > run.search.pi[block_id2 - 1];
                        step::<ABORT>(
                            run, child, lb2, rb2, errors2, block_id2, go_right2, budget2,
                        )
                    }
                } else {
                    step::<ABORT>(run, child, lb2, rb2, errors2, block_id, go_right, budget2)
                };
                if ABORT && hit {
                    return true;
                }
            }

            // Deletion: consume the text symbol, keep the query range.
            if budget.deletion > 0 {
                let budget2 = MaxError {
                    total: budget.total - 1,
                    deletion: budget.deletion - 1,
                    ..budget
                };
                let hit = step::<ABORT>(
                    run,
                    child,
                    lb,
                    rb,
                    errors + 1,
                    block_id,
                    go_right,
                    budget2,
                );
                if ABORT && hit {
                    return true;
                }
            }
        }

        let cycled = if go_right {
            child.cycle_back()
        } else {
            child.cycle_front()
        };
        if !cycled {
            break;
        }
    }

    false
}
