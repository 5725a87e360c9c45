//! Bidirectional affix-tree cursor.
//!
//! The cursor keeps two suffix-array intervals in lockstep - one over the
//! text, one over its reversal - so the current query can grow at either
//! end. Which end grew last matters: sibling cycling and projection to a
//! unidirectional cursor are only defined relative to the last extension
//! direction, and the cursor carries that direction to back the debug
//! assertions.

use crate::cursor::primitives::{bidirectional_cycle_comp, bidirectional_search_comp};
use crate::cursor::unidirectional::Cursor;
use crate::index::alphabet::{Comp, Symbol};
use crate::index::bi::BiFmIndex;
use crate::index::csa::TextPosition;

/// Direction of a bidirectional extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Right,
    Left,
}

/// Cursor into the implicit affix tree of a [`BiFmIndex`].
///
/// All modifying operations return whether they succeeded and leave the
/// cursor unchanged on failure. Cursors are plain values; copies serve as
/// snapshots during a search.
#[derive(Clone, Copy)]
pub struct BiCursor<'a, 't> {
    index: &'a BiFmIndex<'t>,
    fwd_lb: u64,
    fwd_rb: u64,
    rev_lb: u64,
    rev_rb: u64,
    /// Parent interval on the side of the last extension.
    parent_lb: u64,
    parent_rb: u64,
    last_char: Comp,
    depth: u64,
    last_dir: Option<Direction>,
}

impl<'a, 't> BiCursor<'a, 't> {
    /// Cursor at the root: both intervals span the whole index.
    pub(crate) fn at_root(index: &'a BiFmIndex<'t>) -> Self {
        let rb = index.size() - 1;
        BiCursor {
            index,
            fwd_lb: 0,
            fwd_rb: rb,
            rev_lb: 0,
            rev_rb: rb,
            parent_lb: 1,
            parent_rb: 0,
            last_char: 0,
            depth: 0,
            last_dir: None,
        }
    }

    /// The index this cursor traverses.
    #[inline]
    pub fn index(&self) -> &'a BiFmIndex<'t> {
        self.index
    }

    /// Length of the query searched so far.
    #[inline]
    pub fn depth(&self) -> u64 {
        debug_assert!(
            self.depth != 0
                || (self.fwd_lb == 0
                    && self.rev_lb == 0
                    && self.fwd_rb == self.index.size() - 1
                    && self.rev_rb == self.index.size() - 1)
        );
        self.depth
    }

    /// Whether the cursor is at the root.
    #[inline]
    pub fn is_root(&self) -> bool {
        self.depth == 0
    }

    /// Number of occurrences of the current query in the text.
    #[inline]
    pub fn count(&self) -> u64 {
        debug_assert_eq!(self.fwd_rb - self.fwd_lb, self.rev_rb - self.rev_lb);
        1 + self.fwd_rb - self.fwd_lb
    }

    /// Suffix-array interval over the text.
    #[inline]
    pub fn fwd_range(&self) -> (u64, u64) {
        (self.fwd_lb, self.fwd_rb)
    }

    /// Suffix-array interval over the reversed text.
    #[inline]
    pub fn rev_range(&self) -> (u64, u64) {
        (self.rev_lb, self.rev_rb)
    }

    /// Extend the query to the right by the smallest symbol that still
    /// occurs in the text.
    pub fn extend_right(&mut self) -> bool {
        let csa = self.index.fwd.csa();
        for comp in 1..csa.sigma() {
            if let Some((fwd, rev)) = bidirectional_search_comp(
                csa,
                (self.fwd_lb, self.fwd_rb),
                (self.rev_lb, self.rev_rb),
                comp,
            ) {
                self.commit_right(fwd, rev, comp);
                return true;
            }
        }
        false
    }

    /// Extend the query to the right by the symbol `sym`.
    pub fn extend_right_symbol(&mut self, sym: Symbol) -> bool {
        let csa = self.index.fwd.csa();
        let comp = csa.char_to_comp(sym as u16 + 1);
        if comp == 0 {
            return false;
        }
        if let Some((fwd, rev)) = bidirectional_search_comp(
            csa,
            (self.fwd_lb, self.fwd_rb),
            (self.rev_lb, self.rev_rb),
            comp,
        ) {
            self.commit_right(fwd, rev, comp);
            return true;
        }
        false
    }

    /// Extend the query to the right by a whole sequence, restoring the
    /// cursor if any step fails. The sequence must not be empty.
    pub fn extend_right_seq(&mut self, seq: &[Symbol]) -> bool {
        debug_assert!(!seq.is_empty());

        let csa = self.index.fwd.csa();
        let (mut fwd, mut rev) = ((self.fwd_lb, self.fwd_rb), (self.rev_lb, self.rev_rb));
        let mut parent = fwd;
        let mut last = 0;

        for &sym in seq {
            let comp = csa.char_to_comp(sym as u16 + 1);
            if comp == 0 {
                return false;
            }
            parent = fwd;
            match bidirectional_search_comp(csa, fwd, rev, comp) {
                Some((f, r)) => {
                    fwd = f;
                    rev = r;
                    last = comp;
                }
                None => return false,
            }
        }

        self.fwd_lb = fwd.0;
        self.fwd_rb = fwd.1;
        self.rev_lb = rev.0;
        self.rev_rb = rev.1;
        self.parent_lb = parent.0;
        self.parent_rb = parent.1;
        self.last_char = last;
        self.depth += seq.len() as u64;
        self.last_dir = Some(Direction::Right);
        true
    }

    /// Extend the query to the left by the smallest symbol that still
    /// occurs in the text.
    pub fn extend_left(&mut self) -> bool {
        let csa = self.index.rev.csa();
        for comp in 1..csa.sigma() {
            if let Some((rev, fwd)) = bidirectional_search_comp(
                csa,
                (self.rev_lb, self.rev_rb),
                (self.fwd_lb, self.fwd_rb),
                comp,
            ) {
                self.commit_left(fwd, rev, comp);
                return true;
            }
        }
        false
    }

    /// Extend the query to the left by the symbol `sym`.
    pub fn extend_left_symbol(&mut self, sym: Symbol) -> bool {
        let csa = self.index.rev.csa();
        let comp = csa.char_to_comp(sym as u16 + 1);
        if comp == 0 {
            return false;
        }
        if let Some((rev, fwd)) = bidirectional_search_comp(
            csa,
            (self.rev_lb, self.rev_rb),
            (self.fwd_lb, self.fwd_rb),
            comp,
        ) {
            self.commit_left(fwd, rev, comp);
            return true;
        }
        false
    }

    /// Extend the query to the left by a whole sequence (the sequence is
    /// prepended as a unit), restoring the cursor if any step fails. The
    /// sequence must not be empty.
    pub fn extend_left_seq(&mut self, seq: &[Symbol]) -> bool {
        debug_assert!(!seq.is_empty());

        let csa = self.index.rev.csa();
        let (mut fwd, mut rev) = ((self.fwd_lb, self.fwd_rb), (self.rev_lb, self.rev_rb));
        let mut parent = rev;
        let mut last = 0;

        // Prepending a sequence means feeding its symbols right-to-left.
        for &sym in seq.iter().rev() {
            let comp = csa.char_to_comp(sym as u16 + 1);
            if comp == 0 {
                return false;
            }
            parent = rev;
            match bidirectional_search_comp(csa, rev, fwd, comp) {
                Some((r, f)) => {
                    rev = r;
                    fwd = f;
                    last = comp;
                }
                None => return false,
            }
        }

        self.fwd_lb = fwd.0;
        self.fwd_rb = fwd.1;
        self.rev_lb = rev.0;
        self.rev_rb = rev.1;
        self.parent_lb = parent.0;
        self.parent_rb = parent.1;
        self.last_char = last;
        self.depth += seq.len() as u64;
        self.last_dir = Some(Direction::Left);
        true
    }

    /// Replace the rightmost query symbol by the next lexicographically
    /// larger one that still occurs. Only defined when the last extension
    /// went right.
    pub fn cycle_back(&mut self) -> bool {
        debug_assert!(self.depth > 0, "cycling at the root is undefined");
        debug_assert_eq!(
            self.last_dir,
            Some(Direction::Right),
            "cycle_back after a left extension is undefined"
        );

        let csa = self.index.fwd.csa();
        for comp in self.last_char + 1..csa.sigma() {
            if let Some((fwd, rev)) = bidirectional_cycle_comp(
                csa,
                (self.parent_lb, self.parent_rb),
                self.rev_rb,
                comp,
            ) {
                self.fwd_lb = fwd.0;
                self.fwd_rb = fwd.1;
                self.rev_lb = rev.0;
                self.rev_rb = rev.1;
                self.last_char = comp;
                return true;
            }
        }
        false
    }

    /// Replace the leftmost query symbol by the next lexicographically
    /// larger one that still occurs. Only defined when the last extension
    /// went left.
    pub fn cycle_front(&mut self) -> bool {
        debug_assert!(self.depth > 0, "cycling at the root is undefined");
        debug_assert_eq!(
            self.last_dir,
            Some(Direction::Left),
            "cycle_front after a right extension is undefined"
        );

        let csa = self.index.rev.csa();
        for comp in self.last_char + 1..csa.sigma() {
            if let Some((rev, fwd)) = bidirectional_cycle_comp(
                csa,
                (self.parent_lb, self.parent_rb),
                self.fwd_rb,
                comp,
            ) {
                self.fwd_lb = fwd.0;
                self.fwd_rb = fwd.1;
                self.rev_lb = rev.0;
                self.rev_rb = rev.1;
                self.last_char = comp;
                return true;
            }
        }
        false
    }

    /// The symbol on the last-extended end of the query (rightmost after
    /// a right extension, leftmost after a left one).
    pub fn last_char(&self) -> Symbol {
        debug_assert!(self.depth > 0, "the root has no incoming edge");
        (self.index.fwd.csa().comp_to_char(self.last_char) - 1) as Symbol
    }

    /// The query searched so far, as a slice of the borrowed text.
    pub fn query(&self) -> &'t [Symbol] {
        let start = (self.offset() - self.index.fwd.csa().sa(self.fwd_lb)) as usize;
        &self.index.text()[start..start + self.depth as usize]
    }

    /// Text positions of all occurrences of the current query.
    pub fn locate(&self) -> Vec<TextPosition> {
        let offset = self.offset();
        let csa = self.index.fwd.csa();
        (self.fwd_lb..=self.fwd_rb)
            .map(|i| offset - csa.sa(i))
            .collect()
    }

    /// Text positions of all occurrences, produced on demand.
    pub fn lazy_locate(&self) -> impl Iterator<Item = TextPosition> + 'a {
        let offset = self.offset();
        let csa = self.index.fwd.csa();
        (self.fwd_lb..=self.fwd_rb).map(move |i| offset - csa.sa(i))
    }

    /// Project to a unidirectional cursor on the text index.
    ///
    /// If the last extension went left, the projected parent interval is
    /// invalidated so a later `cycle_back` trips the debug assertion; it
    /// becomes valid again after the first right extension on the
    /// projection.
    pub fn to_fwd_cursor(&self) -> Cursor<'a, 't> {
        let parent = if self.last_dir == Some(Direction::Right) {
            (self.parent_lb, self.parent_rb)
        } else {
            (1, 0)
        };
        Cursor::from_raw(
            &self.index.fwd,
            (self.fwd_lb, self.fwd_rb),
            parent,
            self.last_char,
            self.depth,
        )
    }

    /// Project to a unidirectional cursor on the reversed-text index.
    /// Right extension on the projection corresponds to left extension
    /// here. Parent validity mirrors [`Self::to_fwd_cursor`].
    pub fn to_rev_cursor(&self) -> Cursor<'a, 't> {
        let parent = if self.last_dir == Some(Direction::Left) {
            (self.parent_lb, self.parent_rb)
        } else {
            (1, 0)
        };
        Cursor::from_raw(
            &self.index.rev,
            (self.rev_lb, self.rev_rb),
            parent,
            self.last_char,
            self.depth,
        )
    }

    #[inline]
    fn commit_right(&mut self, fwd: (u64, u64), rev: (u64, u64), comp: Comp) {
        self.parent_lb = self.fwd_lb;
        self.parent_rb = self.fwd_rb;
        self.fwd_lb = fwd.0;
        self.fwd_rb = fwd.1;
        self.rev_lb = rev.0;
        self.rev_rb = rev.1;
        self.last_char = comp;
        self.depth += 1;
        self.last_dir = Some(Direction::Right);
    }

    #[inline]
    fn commit_left(&mut self, fwd: (u64, u64), rev: (u64, u64), comp: Comp) {
        self.parent_lb = self.rev_lb;
        self.parent_rb = self.rev_rb;
        self.fwd_lb = fwd.0;
        self.fwd_rb = fwd.1;
        self.rev_lb = rev.0;
        self.rev_rb = rev.1;
        self.last_char = comp;
        self.depth += 1;
        self.last_dir = Some(Direction::Left);
    }

    #[inline]
    fn offset(&self) -> u64 {
        self.index.size() - self.depth - 1
    }
}

/// Position in the implicit affix tree is fully described by the forward
/// interval and the depth.
impl PartialEq for BiCursor<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        // Parent bookkeeping lives on the side of the last extension, so
        // it is only comparable between cursors that last grew the same
        // way.
        debug_assert!(
            !(self.fwd_lb == other.fwd_lb
                && self.fwd_rb == other.fwd_rb
                && self.depth == other.depth
                && self.last_dir == other.last_dir)
                || self.depth == 0
                || (self.parent_lb == other.parent_lb
                    && self.parent_rb == other.parent_rb
                    && self.last_char == other.last_char),
            "equal positions imply equal parent state"
        );
        self.fwd_lb == other.fwd_lb && self.fwd_rb == other.fwd_rb && self.depth == other.depth
    }
}

impl Eq for BiCursor<'_, '_> {}

impl std::fmt::Debug for BiCursor<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BiCursor")
            .field("fwd", &(self.fwd_lb, self.fwd_rb))
            .field("rev", &(self.rev_lb, self.rev_rb))
            .field("depth", &self.depth)
            .finish()
    }
}
