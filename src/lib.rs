//! # artree - an Adaptive Radix Tree
//!
//! An in-memory ordered associative index over byte keys, implemented as an
//! Adaptive Radix Tree (ART): a trie whose inner nodes change their physical
//! representation with the number of children.
//!
//! ## Overview
//!
//! - **Adaptive nodes**: four inner-node layouts (4, 16, 48, 256 children)
//!   that grow and shrink with fanout
//! - **Path compression**: one-child chains are folded into a per-node
//!   compressed prefix, with a small inline window and on-demand
//!   reconstruction for longer paths
//! - **Ordered**: enumeration and prefix queries yield keys in ascending
//!   lexicographic order
//! - **Fast operations**: O(k) point lookup, insert, and delete, where k is
//!   the key length in bytes
//!
//! ## Quick start
//!
//! ```rust
//! use artree::AdaptiveRadixTree;
//!
//! let mut tree = AdaptiveRadixTree::new();
//!
//! tree.insert(b"hello", "world".to_string());
//! tree.insert(b"hell", "no".to_string());
//!
//! assert_eq!(tree.search(b"hello"), Some(&"world".to_string()));
//! assert_eq!(tree.search(b"missing"), None);
//!
//! // All values whose key starts with "hell", in key order.
//! let matches = tree.prefix_search(b"hell");
//! assert_eq!(matches.len(), 2);
//! ```
//!
//! ## Keys
//!
//! Keys are opaque byte sequences. Internally each stored key carries a
//! trailing `0x00` terminator (appended when the caller's key contains no
//! `0x00` byte), which keeps the stored key set prefix-free: "a" and "aa"
//! can coexist. The terminator byte is therefore reserved; callers that
//! need binary keys embedding `0x00` must use a prefix-free encoding of
//! their own.
//!
//! The tree is not internally synchronized; wrap it in an external lock for
//! concurrent use.

#[macro_use]
mod trace;

// Private implementation modules
mod keys;
mod node;
mod prefix;

// Internal modules (public for benchmarking, not part of the stable API)
#[doc(hidden)]
pub mod mapping;
#[doc(hidden)]
pub mod utils;

// Public API modules
pub mod stats;
pub mod tree;

// Re-export main types for convenience
pub use node::{Node, NodeKind};
pub use tree::AdaptiveRadixTree;
