//! # GXI - Genomic Search Index
//!
//! GXI is a substring-search engine for large texts over small ordered
//! alphabets (DNA being the motivating case). It builds a compressed
//! self-index and answers exact and approximate queries without ever
//! scanning the text again.
//!
//! ## Architecture
//!
//! The crate is organized into these main modules:
//!
//! - [`index`] - Index construction, alphabet strategies, persistence
//! - [`cursor`] - Suffix-tree and affix-tree traversal cursors
//! - [`search`] - Approximate-search drivers, search schemes, and the
//!   top-level search facade
//!
//! ## Quick Start
//!
//! ```ignore
//! use gxi::index::BiFmIndex;
//! use gxi::search::{search, MaxError, Mode, SearchConfig};
//!
//! // Text symbols are 0-based alphabet ranks (A=0, C=1, G=2, T=3).
//! let text = vec![0u8, 1, 2, 3, 0, 1, 2, 3]; // "ACGTACGT"
//! let index = BiFmIndex::new(&text);
//!
//! let config = SearchConfig::new()
//!     .max_error(MaxError { total: 1, substitution: 1, insertion: 0, deletion: 0 })
//!     .mode(Mode::All);
//!
//! let query = vec![0u8, 1, 2, 3];
//! let hits = search(&index, &[&query], &config);
//! assert_eq!(hits[0], vec![0, 4]);
//! ```
//!
//! ## Design
//!
//! Queries walk the implicit suffix tree (unidirectional index) or affix
//! tree (bidirectional index) one character at a time. The bidirectional
//! cursor keeps twin suffix-array intervals over the text and its reversal
//! in lockstep, which lets approximate search extend a query in whichever
//! direction discards candidates fastest. Approximate matching runs either
//! as plain backtracking or under precomputed *search schemes* that split
//! the query into blocks and plan where errors may fall, pruning redundant
//! backtracking paths.

pub mod cursor;
pub mod index;
pub mod search;
