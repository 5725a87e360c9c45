//! Unidirectional suffix-tree cursor.
//!
//! The cursor walks the implicit (non-compacted) suffix tree of an
//! [`FmIndex`] one character at a time. Every modifying operation returns
//! whether it succeeded and leaves the cursor untouched on failure, so a
//! cursor is never in an invalid state. Cursors are plain values: copy
//! them to snapshot a position in the tree.

use crate::cursor::primitives::backward_search_comp;
use crate::index::alphabet::{Comp, Symbol};
use crate::index::csa::TextPosition;
use crate::index::fm::FmIndex;

/// Cursor into the implicit suffix tree of an [`FmIndex`].
///
/// At the root the parent interval is the invalid sentinel `(1, 0)`;
/// cycling there is a contract violation caught by debug assertions.
#[derive(Clone, Copy)]
pub struct Cursor<'a, 't> {
    index: &'a FmIndex<'t>,
    lb: u64,
    rb: u64,
    parent_lb: u64,
    parent_rb: u64,
    last_char: Comp,
    depth: u64,
}

impl<'a, 't> Cursor<'a, 't> {
    /// Cursor at the root: the full suffix-array interval, depth 0.
    pub(crate) fn at_root(index: &'a FmIndex<'t>) -> Self {
        Cursor {
            index,
            lb: 0,
            rb: index.size() - 1,
            parent_lb: 1,
            parent_rb: 0,
            last_char: 0,
            depth: 0,
        }
    }

    /// Projection constructor used by the bidirectional cursor.
    pub(crate) fn from_raw(
        index: &'a FmIndex<'t>,
        (lb, rb): (u64, u64),
        (parent_lb, parent_rb): (u64, u64),
        last_char: Comp,
        depth: u64,
    ) -> Self {
        Cursor {
            index,
            lb,
            rb,
            parent_lb,
            parent_rb,
            last_char,
            depth,
        }
    }

    /// The index this cursor traverses.
    #[inline]
    pub fn index(&self) -> &'a FmIndex<'t> {
        self.index
    }

    /// Current suffix-array interval.
    #[inline]
    pub fn sa_range(&self) -> (u64, u64) {
        (self.lb, self.rb)
    }

    /// Length of the query searched so far.
    #[inline]
    pub fn depth(&self) -> u64 {
        debug_assert!(self.depth != 0 || (self.lb == 0 && self.rb == self.index.size() - 1));
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
        1 + self.rb - self.lb
    }

    /// Extend the query to the right by the smallest symbol that still
    /// occurs in the text. Scans the alphabet from the smallest compact
    /// code upwards.
    pub fn extend_right(&mut self) -> bool {
        let csa = self.index.csa();
        for comp in 1..csa.sigma() {
            if let Some((lb, rb)) = backward_search_comp(csa, self.lb, self.rb, comp) {
                self.parent_lb = self.lb;
                self.parent_rb = self.rb;
                self.lb = lb;
                self.rb = rb;
                self.last_char = comp;
                self.depth += 1;
                return true;
            }
        }
        false
    }

    /// Extend the query to the right by the symbol `sym`.
    pub fn extend_right_symbol(&mut self, sym: Symbol) -> bool {
        let csa = self.index.csa();
        let comp = csa.char_to_comp(sym as u16 + 1);
        if comp == 0 {
            return false;
        }
        if let Some((lb, rb)) = backward_search_comp(csa, self.lb, self.rb, comp) {
            self.parent_lb = self.lb;
            self.parent_rb = self.rb;
            self.lb = lb;
            self.rb = rb;
            self.last_char = comp;
            self.depth += 1;
            return true;
        }
        false
    }

    /// Extend the query to the right by a whole sequence.
    ///
    /// If any step fails the cursor is left exactly as it was before the
    /// call. The sequence must not be empty.
    pub fn extend_right_seq(&mut self, seq: &[Symbol]) -> bool {
        debug_assert!(!seq.is_empty());

        let csa = self.index.csa();
        let (mut lb, mut rb) = (self.lb, self.rb);
        let (mut parent_lb, mut parent_rb) = (lb, rb);
        let mut last = 0;

        for &sym in seq {
            let comp = csa.char_to_comp(sym as u16 + 1);
            if comp == 0 {
                return false;
            }
            parent_lb = lb;
            parent_rb = rb;
            match backward_search_comp(csa, lb, rb, comp) {
                Some((l, r)) => {
                    lb = l;
                    rb = r;
                    last = comp;
                }
                None => return false,
            }
        }

        self.lb = lb;
        self.rb = rb;
        self.parent_lb = parent_lb;
        self.parent_rb = parent_rb;
        self.last_char = last;
        self.depth += seq.len() as u64;
        true
    }

    /// Replace the last symbol of the query by the next lexicographically
    /// larger one that still occurs. Depth and parent are unchanged.
    ///
    /// Calling this on the root, or on a cursor whose parent interval was
    /// invalidated by a cross-direction projection, is a contract
    /// violation.
    pub fn cycle_back(&mut self) -> bool {
        debug_assert!(self.depth > 0, "cycling at the root is undefined");
        debug_assert!(
            self.parent_lb <= self.parent_rb,
            "cycling without a valid parent interval"
        );

        let csa = self.index.csa();
        for comp in self.last_char + 1..csa.sigma() {
            if let Some((lb, rb)) = backward_search_comp(csa, self.parent_lb, self.parent_rb, comp)
            {
                self.lb = lb;
                self.rb = rb;
                self.last_char = comp;
                return true;
            }
        }
        false
    }

    /// The symbol on the edge from the parent to the current node.
    pub fn last_char(&self) -> Symbol {
        debug_assert!(self.depth > 0, "the root has no incoming edge");
        (self.index.csa().comp_to_char(self.last_char) - 1) as Symbol
    }

    /// Reconstruct the query searched so far from the text.
    pub fn query(&self) -> Vec<Symbol> {
        let start = (self.offset() - self.index.csa().sa(self.lb)) as usize;
        (start..start + self.depth as usize)
            .map(|i| self.index.text().at(i))
            .collect()
    }

    /// Text positions of all occurrences of the current query, eagerly
    /// collected. The only allocating cursor operation besides `query`.
    pub fn locate(&self) -> Vec<TextPosition> {
        let offset = self.offset();
        let csa = self.index.csa();
        (self.lb..=self.rb).map(|i| offset - csa.sa(i)).collect()
    }

    /// Text positions of all occurrences, produced on demand.
    pub fn lazy_locate(&self) -> impl Iterator<Item = TextPosition> + 'a {
        let offset = self.offset();
        let csa = self.index.csa();
        (self.lb..=self.rb).map(move |i| offset - csa.sa(i))
    }

    /// One cursor per alphabet symbol: the children that exist, in
    /// symbol order, padded with root cursors for the symbols that do
    /// not label an edge here.
    pub fn children(&self) -> Vec<Cursor<'a, 't>> {
        let csa = self.index.csa();
        let mut result = Vec::with_capacity(csa.sigma() as usize - 1);

        for comp in 1..csa.sigma() {
            if let Some((lb, rb)) = backward_search_comp(csa, self.lb, self.rb, comp) {
                let mut child = *self;
                child.parent_lb = self.lb;
                child.parent_rb = self.rb;
                child.lb = lb;
                child.rb = rb;
                child.last_char = comp;
                child.depth = self.depth + 1;
                result.push(child);
            }
        }

        while result.len() < csa.sigma() as usize - 1 {
            result.push(Cursor::at_root(self.index));
        }
        result
    }

    /// Distance from a suffix-array entry to its text position; the
    /// indexed text is reversed, hence the flipped arithmetic.
    #[inline]
    fn offset(&self) -> u64 {
        self.index.size() - self.depth - 1
    }
}

/// Position in the implicit suffix tree is fully described by the
/// suffix-array interval and the depth.
impl PartialEq for Cursor<'_, '_> {
    fn eq(&self, other: &Self) -> bool {
        debug_assert!(
            !(self.lb == other.lb && self.rb == other.rb && self.depth == other.depth)
                || self.depth == 0
                || (self.parent_lb == other.parent_lb && self.parent_rb == other.parent_rb),
            "equal intervals imply equal parent state"
        );
        self.lb == other.lb && self.rb == other.rb && self.depth == other.depth
    }
}

impl Eq for Cursor<'_, '_> {}

impl std::fmt::Debug for Cursor<'_, '_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Cursor")
            .field("lb", &self.lb)
            .field("rb", &self.rb)
            .field("depth", &self.depth)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: u8 = 0;
    const C: u8 = 1;
    const G: u8 = 2;
    const T: u8 = 3;

    #[test]
    fn test_root_spans_whole_index() {
        let text = vec![A, C, G, T];
        let index = FmIndex::new(&text);
        let root = index.root();

        assert!(root.is_root());
        assert_eq!(root.sa_range(), (0, 4));
        assert_eq!(root.count(), 5);
    }

    #[test]
    fn test_extend_and_locate() {
        let text = vec![A, C, G, T, A, C, G, T];
        let index = FmIndex::new(&text);
        let mut cursor = index.root();

        assert!(cursor.extend_right_seq(&[A, C, G, T]));
        assert_eq!(cursor.depth(), 4);
        assert_eq!(cursor.count(), 2);

        let mut positions = cursor.locate();
        positions.sort_unstable();
        assert_eq!(positions, vec![0, 4]);
    }

    #[test]
    fn test_lazy_locate_matches_locate() {
        let text = vec![A, C, G, T, A, C, G, T];
        let index = FmIndex::new(&text);
        let mut cursor = index.root();
        assert!(cursor.extend_right_symbol(G));

        let mut eager = cursor.locate();
        let mut lazy: Vec<u64> = cursor.lazy_locate().collect();
        eager.sort_unstable();
        lazy.sort_unstable();
        assert_eq!(eager, lazy);
    }

    #[test]
    fn test_failed_extension_leaves_cursor_unchanged() {
        let text = vec![A, C, G, T];
        let index = FmIndex::new(&text);
        let mut cursor = index.root();
        assert!(cursor.extend_right_symbol(C));
        let before = cursor;

        // "CA" does not occur; neither does a partial rollback trace.
        assert!(!cursor.extend_right_seq(&[A, C]));
        assert_eq!(cursor, before);
        assert_eq!(cursor.depth(), 1);
    }

    #[test]
    fn test_sibling_ordering() {
        // Counts per first symbol: A 3, C 2, G 5, T 1.
        let text = vec![A, C, G, G, T, A, G, G, A, C, G];
        let index = FmIndex::new(&text);
        let mut cursor = index.root();

        assert!(cursor.extend_right());
        assert_eq!(cursor.last_char(), A);
        assert_eq!(cursor.count(), 3);

        assert!(cursor.cycle_back());
        assert_eq!(cursor.last_char(), C);
        assert_eq!(cursor.count(), 2);

        assert!(cursor.cycle_back());
        assert_eq!(cursor.last_char(), G);
        assert_eq!(cursor.count(), 5);

        assert!(cursor.cycle_back());
        assert_eq!(cursor.last_char(), T);
        assert_eq!(cursor.count(), 1);

        let at_t = cursor;
        assert!(!cursor.cycle_back());
        assert_eq!(cursor, at_t);
        assert_eq!(cursor.last_char(), T);
    }

    #[test]
    fn test_query_reconstruction() {
        let text = vec![G, A, A, T, T, A, A, T, G, A, A, C];
        let index = FmIndex::new(&text);
        let mut cursor = index.root();

        assert!(cursor.extend_right_seq(&[A, A, T]));
        assert_eq!(cursor.query(), vec![A, A, T]);
        assert_eq!(cursor.count(), 2);
    }

    #[test]
    fn test_extension_equals_reconstruction() {
        let text = vec![A, C, G, G, T, A, G, G, A, C, G];
        let index = FmIndex::new(&text);

        let mut walked = index.root();
        assert!(walked.extend_right());
        assert!(walked.extend_right());
        let query = walked.query();

        let mut direct = index.root();
        assert!(direct.extend_right_seq(&query));
        assert_eq!(walked, direct);
    }

    #[test]
    fn test_children_padded_with_roots() {
        let text = vec![A, C, G, T];
        let index = FmIndex::new(&text);
        let mut cursor = index.root();
        assert!(cursor.extend_right_symbol(C));

        let children = cursor.children();
        assert_eq!(children.len(), 4);
        // Only "CG" exists below "C"; the rest are root padding.
        assert_eq!(children.iter().filter(|c| !c.is_root()).count(), 1);
        assert_eq!(children[0].query(), vec![C, G]);
    }

    #[test]
    fn test_locate_round_trip() {
        let text = vec![A, C, G, G, T, A, G, G, A, C, G];
        let index = FmIndex::new(&text);
        let mut cursor = index.root();
        assert!(cursor.extend_right_seq(&[G, G]));

        for pos in cursor.locate() {
            let pos = pos as usize;
            assert_eq!(&text[pos..pos + 2], &[G, G]);
        }
    }
}
