//! Bidirectional FM index.
//!
//! Two unidirectional indices over the same borrowed text - one built from
//! the text, one from its reversed view - that together encode an implicit
//! affix tree. A [`BiCursor`] extends queries in both directions while the
//! twin suffix-array intervals stay synchronized.

use crate::cursor::{BiCursor, Cursor};
use crate::index::fm::{FmIndex, TextView};

/// Bidirectional FM index over a borrowed text.
pub struct BiFmIndex<'t> {
    /// Index of the text; serves right-extensions of the query.
    pub(crate) fwd: FmIndex<'t>,
    /// Index of the reversed text; serves left-extensions.
    pub(crate) rev: FmIndex<'t>,
}

impl<'t> BiFmIndex<'t> {
    /// Build a bidirectional index over `text` (0-based symbol ranks).
    ///
    /// Only a borrow is accepted: both sides and every cursor refer back
    /// to the same text, and the reverse side reads it through a reversed
    /// projection rather than a copy.
    pub fn new(text: &'t [u8]) -> Self {
        BiFmIndex {
            fwd: FmIndex::from_view(TextView::Forward(text)),
            rev: FmIndex::from_view(TextView::Reversed(text)),
        }
    }

    pub(crate) fn from_parts(fwd: FmIndex<'t>, rev: FmIndex<'t>) -> Self {
        BiFmIndex { fwd, rev }
    }

    /// Indexed length, sentinel included.
    #[inline]
    pub fn size(&self) -> u64 {
        self.fwd.size()
    }

    /// Whether the indexed text is empty (never true for a built index).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.fwd.is_empty()
    }

    /// The borrowed text.
    #[inline]
    pub fn text(&self) -> &'t [u8] {
        match self.fwd.text() {
            TextView::Forward(t) => t,
            TextView::Reversed(_) => unreachable!("forward side always holds the forward view"),
        }
    }

    /// A bidirectional cursor at the root of the implicit affix tree.
    pub fn root<'a>(&'a self) -> BiCursor<'a, 't> {
        BiCursor::at_root(self)
    }

    /// A unidirectional cursor on the text index (right-extensions only).
    pub fn fwd_root<'a>(&'a self) -> Cursor<'a, 't> {
        self.fwd.root()
    }

    /// A unidirectional cursor on the reversed-text index. Extending it to
    /// the right corresponds to extending the bidirectional query to the
    /// left.
    pub fn rev_root<'a>(&'a self) -> Cursor<'a, 't> {
        self.rev.root()
    }
}
