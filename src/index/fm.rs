//! Unidirectional FM index.
//!
//! The index is built over the *reversed* text plus a minimum sentinel, so
//! extending the query to the right maps onto the cheap left-prepend of
//! backward search. The text itself is only borrowed; reconstructing a
//! query or dereferencing located positions goes back to that borrow.

use crate::cursor::Cursor;
use crate::index::alphabet::Symbol;
use crate::index::csa::CompressedSuffixArray;

/// Maximum external symbol rank: `rank + 1` must leave room for the
/// sentinel in a byte.
pub const MAX_SYMBOL: Symbol = 254;

/// A borrowed text, read either forwards or backwards.
///
/// The reverse side of a bidirectional index sees the same bytes as the
/// forward side through this projection; no second copy is ever made.
#[derive(Debug, Clone, Copy)]
pub enum TextView<'t> {
    Forward(&'t [u8]),
    Reversed(&'t [u8]),
}

impl<'t> TextView<'t> {
    #[inline]
    pub fn len(&self) -> usize {
        match self {
            TextView::Forward(t) | TextView::Reversed(t) => t.len(),
        }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Symbol at logical position `i`.
    #[inline]
    pub fn at(&self, i: usize) -> Symbol {
        match self {
            TextView::Forward(t) => t[i],
            TextView::Reversed(t) => t[t.len() - 1 - i],
        }
    }

    /// Logical symbols in reverse order (the order the CSA indexes them).
    fn iter_reversed(&self) -> impl Iterator<Item = Symbol> + '_ {
        (0..self.len()).rev().map(move |i| self.at(i))
    }
}

/// Unidirectional FM index over a borrowed text.
///
/// Supports exact-substring counting and locating through [`Cursor`],
/// which walks the implicit (non-compacted) suffix tree of the text.
pub struct FmIndex<'t> {
    text: TextView<'t>,
    csa: CompressedSuffixArray,
}

impl<'t> FmIndex<'t> {
    /// Build an index over `text`, given as 0-based symbol ranks.
    ///
    /// The text must be non-empty, every rank must be at most
    /// [`MAX_SYMBOL`], and the borrow must outlive the index.
    pub fn new(text: &'t [u8]) -> Self {
        Self::from_view(TextView::Forward(text))
    }

    pub(crate) fn from_view(text: TextView<'t>) -> Self {
        assert!(!text.is_empty(), "cannot index an empty text");

        let chars: Vec<u8> = text
            .iter_reversed()
            .map(|s| {
                assert!(s <= MAX_SYMBOL, "symbol rank {s} exceeds MAX_SYMBOL");
                s + 1
            })
            .collect();

        FmIndex {
            text,
            csa: CompressedSuffixArray::construct(chars),
        }
    }

    pub(crate) fn from_csa(text: TextView<'t>, csa: CompressedSuffixArray) -> Self {
        FmIndex { text, csa }
    }

    /// Indexed length, sentinel included (`text.len() + 1`).
    #[inline]
    pub fn size(&self) -> u64 {
        self.csa.size()
    }

    /// Whether the indexed text is empty (never true for a built index).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size() <= 1
    }

    /// A cursor at the root of the implicit suffix tree.
    pub fn root<'a>(&'a self) -> Cursor<'a, 't> {
        Cursor::at_root(self)
    }

    /// The underlying suffix array structure.
    #[inline]
    pub fn csa(&self) -> &CompressedSuffixArray {
        &self.csa
    }

    /// The borrowed text view.
    #[inline]
    pub fn text(&self) -> TextView<'t> {
        self.text
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_size_includes_sentinel() {
        let text = vec![0u8, 1, 2, 3];
        let index = FmIndex::new(&text);
        assert_eq!(index.size(), 5);
        assert!(!index.is_empty());
    }

    #[test]
    fn test_reversed_view_projection() {
        let text = vec![0u8, 1, 2];
        let view = TextView::Reversed(&text);
        assert_eq!(view.len(), 3);
        assert_eq!(view.at(0), 2);
        assert_eq!(view.at(2), 0);
    }

    #[test]
    #[should_panic(expected = "empty")]
    fn test_empty_text_rejected() {
        let text: Vec<u8> = Vec::new();
        let _ = FmIndex::new(&text);
    }
}
