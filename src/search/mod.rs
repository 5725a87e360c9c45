//! Query search over a bidirectional index.
//!
//! This module provides the approximate-search machinery:
//!
//! - [`config`] - Error budgets, reporting modes, the [`SearchConfig`] bundle
//! - [`trivial`] - Plain backtracking driver
//! - [`schemes`] - Search-scheme tables and the trivial fallback
//! - [`scheme`] - The search-scheme driver
//!
//! plus the top-level facade: [`search`] for text positions,
//! [`search_cursors`] for cursor snapshots, [`search_on_hit`] for
//! streaming delivery, and [`search_parallel`] for multi-query batches.
//!
//! The facade picks a driver per query: substitution-only budgets in
//! [`Mode::All`] go through the search-scheme driver when a precomputed
//! scheme fits; mixed edit kinds and the best/strata modes need per-level
//! control and use plain backtracking.

pub mod config;
pub mod scheme;
pub mod schemes;
pub mod trivial;

pub use config::{ErrorLimit, MaxError, MaxErrorRate, Mode, SearchConfig};
pub use scheme::search_scheme;
pub use schemes::{optimum_scheme, scheme_for, trivial_scheme, Search, SearchScheme};
pub use trivial::search_trivial;

use crate::cursor::BiCursor;
use crate::index::alphabet::Symbol;
use crate::index::bi::BiFmIndex;
use crate::index::csa::TextPosition;
use rayon::prelude::*;

/// Search every query in the index and return, per query, the matching
/// text positions (sorted, deduplicated). Result order matches query
/// order.
pub fn search(
    index: &BiFmIndex<'_>,
    queries: &[&[Symbol]],
    config: &SearchConfig,
) -> Vec<Vec<TextPosition>> {
    queries
        .iter()
        .map(|query| search_one(index, query, config))
        .collect()
}

/// Search one query and return the matching text positions (sorted,
/// deduplicated; a single position in [`Mode::Best`]).
pub fn search_one(
    index: &BiFmIndex<'_>,
    query: &[Symbol],
    config: &SearchConfig,
) -> Vec<TextPosition> {
    let snapshots = search_one_cursors(index, query, config);

    if config.mode == Mode::Best {
        // One hit is reported; its interval may still cover several text
        // positions, of which one is enough.
        return snapshots
            .first()
            .and_then(|cursor| cursor.lazy_locate().next())
            .into_iter()
            .collect();
    }

    let mut positions: Vec<TextPosition> = snapshots
        .iter()
        .flat_map(|cursor| cursor.locate())
        .collect();
    positions.sort_unstable();
    positions.dedup();
    positions
}

/// Like [`search`], but queries run in parallel. Hit delivery inside each
/// query is unchanged and result order still matches query order.
pub fn search_parallel(
    index: &BiFmIndex<'_>,
    queries: &[&[Symbol]],
    config: &SearchConfig,
) -> Vec<Vec<TextPosition>> {
    queries
        .par_iter()
        .map(|query| search_one(index, query, config))
        .collect()
}

/// Search every query and return, per query, the hit cursors (snapshots
/// of the affix tree, one per reported alignment).
pub fn search_cursors<'a, 't>(
    index: &'a BiFmIndex<'t>,
    queries: &[&[Symbol]],
    config: &SearchConfig,
) -> Vec<Vec<BiCursor<'a, 't>>> {
    queries
        .iter()
        .map(|query| search_one_cursors(index, query, config))
        .collect()
}

/// Search every query, streaming each hit to `on_hit` as
/// `(query_index, cursor)` in discovery order instead of collecting.
/// Returning `true` from the delegate stops the current query's search;
/// later queries still run.
pub fn search_on_hit(
    index: &BiFmIndex<'_>,
    queries: &[&[Symbol]],
    config: &SearchConfig,
    on_hit: &mut dyn FnMut(usize, &BiCursor<'_, '_>) -> bool,
) {
    for (query_index, query) in queries.iter().enumerate() {
        if query.is_empty() {
            continue;
        }
        let budget = config.budget_for(query.len());
        match config.mode {
            Mode::All => {
                drive_all::<true>(index, query, budget, &mut |cursor| {
                    on_hit(query_index, cursor)
                });
            }
            _ => {
                // The level-iterating modes need the full per-level result
                // before anything can be reported.
                for cursor in search_one_cursors(index, query, config) {
                    if on_hit(query_index, &cursor) {
                        break;
                    }
                }
            }
        }
    }
}

/// Core per-query dispatch producing hit snapshots.
fn search_one_cursors<'a, 't>(
    index: &'a BiFmIndex<'t>,
    query: &[Symbol],
    config: &SearchConfig,
) -> Vec<BiCursor<'a, 't>> {
    if query.is_empty() {
        return Vec::new();
    }

    let budget = config.budget_for(query.len());
    let mut snapshots = Vec::new();

    match config.mode {
        Mode::All => {
            drive_all::<false>(index, query, budget, &mut |cursor| {
                snapshots.push(*cursor);
                false
            });
        }
        Mode::Best => {
            // Raise the total budget until the first level with a hit.
            let mut level = MaxError { total: 0, ..budget };
            while snapshots.is_empty() && level.total <= budget.total {
                search_trivial::<true>(index, query, level, &mut |cursor| {
                    snapshots.push(*cursor);
                    true
                });
                level.total += 1;
            }
        }
        Mode::AllBest => {
            let mut level = MaxError { total: 0, ..budget };
            while snapshots.is_empty() && level.total <= budget.total {
                search_trivial::<false>(index, query, level, &mut |cursor| {
                    snapshots.push(*cursor);
                    false
                });
                level.total += 1;
            }
        }
        Mode::Strata(strata) => {
            // Find the best level first, then rerun once with the widened
            // budget and report everything it admits.
            let mut level = MaxError { total: 0, ..budget };
            let mut found = false;
            while !found && level.total <= budget.total {
                search_trivial::<true>(index, query, level, &mut |_| {
                    found = true;
                    true
                });
                level.total += 1;
            }
            if found {
                // The loop overshot the best level by one.
                level.total = level.total - 1 + strata;
                search_trivial::<false>(index, query, level, &mut |cursor| {
                    snapshots.push(*cursor);
                    false
                });
            }
        }
    }

    snapshots
}

/// Run a [`Mode::All`] search through the best-fitting driver.
fn drive_all<'a, 't, const ABORT_ON_HIT: bool>(
    index: &'a BiFmIndex<'t>,
    query: &[Symbol],
    budget: MaxError,
    delegate: &mut dyn FnMut(&BiCursor<'a, 't>) -> bool,
) -> bool {
    if let Some(scheme) = eligible_scheme(query, budget) {
        search_scheme::<ABORT_ON_HIT>(index, query, budget, &scheme, delegate)
    } else {
        search_trivial::<ABORT_ON_HIT>(index, query, budget, delegate)
    }
}

/// The precomputed scheme serving this query and budget, if any.
///
/// Schemes prune by planning error positions; with insertions or
/// deletions in play the alignment borders shift and plain backtracking
/// is used instead. The query must also be long enough to give every
/// block at least one character.
fn eligible_scheme(query: &[Symbol], budget: MaxError) -> Option<SearchScheme> {
    if budget.insertion > 0 || budget.deletion > 0 {
        return None;
    }
    let scheme = optimum_scheme(0, budget.total)?;
    if query.len() < scheme[0].blocks() {
        return None;
    }
    Some(scheme)
}
