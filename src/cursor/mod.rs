//! Suffix-tree and affix-tree traversal.
//!
//! - [`primitives`] - Backward-search and bidirectional-search steps
//! - [`unidirectional`] - [`Cursor`] over the implicit suffix tree
//! - [`bidirectional`] - [`BiCursor`] over the implicit affix tree
//!
//! Cursors are cheap value types: every extension costs one or sigma rank
//! queries, snapshots are plain copies, and a failed operation never
//! changes cursor state.

pub mod bidirectional;
pub mod primitives;
pub mod unidirectional;

pub use bidirectional::{BiCursor, Direction};
pub use primitives::{backward_search, bidirectional_search, BiInterval};
pub use unidirectional::Cursor;
