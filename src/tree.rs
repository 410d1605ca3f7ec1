//! Adaptive Radix Tree implementation.
//!
//! This module contains the main [`AdaptiveRadixTree`] type and the tree-level
//! algorithms: point search, prefix search, insert, remove, and pre-order
//! enumeration. The per-layout child bookkeeping lives in [`crate::mapping`];
//! compressed-path handling in [`crate::prefix`].

use std::borrow::Cow;

use crate::keys::{longest_common_prefix, terminated};
use crate::node::{Content, Node};
use crate::prefix::{MAX_PREFIX_LEN, Prefix};
use crate::stats::{TreeStats, finalize_tree_stats, update_tree_stats};

/// An ordered, byte-keyed, in-memory associative index.
///
/// Inner nodes adapt their physical layout (4, 16, 48, or 256 child slots)
/// to their fanout, and one-child chains are folded into per-node compressed
/// prefixes, so point operations run in O(k) for a k-byte key while
/// enumeration and prefix queries come back in ascending key order.
///
/// Keys are normalized with a trailing `0x00` terminator (see the crate docs)
/// which makes the stored key set prefix-free: a key and its extension can
/// coexist. Re-inserting an existing key is a silent no-op; the first value
/// written wins.
///
/// # Examples
///
/// ```rust
/// use artree::AdaptiveRadixTree;
///
/// let mut tree = AdaptiveRadixTree::new();
/// tree.insert(b"apple", 1);
/// tree.insert(b"application", 2);
///
/// assert_eq!(tree.search(b"apple"), Some(&1));
/// assert_eq!(tree.search(b"orange"), None);
///
/// // Values for all keys starting with "app", in key order.
/// assert_eq!(tree.prefix_search(b"app"), vec![&1, &2]);
/// ```
pub struct AdaptiveRadixTree<V> {
    root: Option<Box<Node<V>>>,
    size: usize,
}

impl<V> Default for AdaptiveRadixTree<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> AdaptiveRadixTree<V> {
    /// Create a new empty tree.
    pub fn new() -> Self {
        Self {
            root: None,
            size: 0,
        }
    }

    /// Number of live keys (leaves) in the tree.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// True when no keys are stored.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Look up the value stored under `key`.
    pub fn search(&self, key: &[u8]) -> Option<&V> {
        let key = terminated(key);
        let mut cur = self.root.as_deref()?;
        let mut depth = 0;
        loop {
            if let Content::Leaf(leaf) = &cur.content {
                return (leaf.key.as_ref() == key.as_ref()).then_some(&leaf.value);
            }

            // The key must run along the whole compressed path to continue.
            if cur.prefix_mismatch(&key, depth) != cur.prefix.len() {
                return None;
            }
            depth += cur.prefix.len();
            if depth >= key.len() {
                // Terminators guarantee an inner node is never a hit.
                return None;
            }
            cur = cur.seek_child(key[depth])?;
            depth += 1;
        }
    }

    /// All values whose key starts with `prefix`, in ascending key order.
    ///
    /// The query is unterminated: an empty prefix yields every value. An
    /// empty tree (or no match) yields an empty vector.
    pub fn prefix_search(&self, prefix: &[u8]) -> Vec<&V> {
        let mut results = Vec::new();
        if let Some(root) = self.root.as_deref()
            && let Some(subtree) = Self::prefix_descend(root, prefix)
        {
            Self::collect_values(subtree, &mut results);
        }
        results
    }

    /// Walks toward the smallest subtree containing every key that starts
    /// with `prefix`. Unlike point search the compare is relaxed: the query
    /// may run out in the middle of a node's compressed path and still match.
    fn prefix_descend<'a>(root: &'a Node<V>, prefix: &[u8]) -> Option<&'a Node<V>> {
        let mut cur = root;
        let mut depth = 0;
        loop {
            if depth >= prefix.len() {
                return Some(cur);
            }
            if let Content::Leaf(leaf) = &cur.content {
                return leaf.user_key().starts_with(prefix).then_some(cur);
            }

            let mismatch = cur.prefix_mismatch(prefix, depth);
            if mismatch != cur.prefix.len() {
                // Either the query ran out inside the compressed path (the
                // whole subtree matches), or it diverged (nothing does).
                return (depth + mismatch == prefix.len()).then_some(cur);
            }
            depth += cur.prefix.len();
            if depth >= prefix.len() {
                return Some(cur);
            }
            cur = cur.seek_child(prefix[depth])?;
            depth += 1;
        }
    }

    fn collect_values<'a>(node: &'a Node<V>, results: &mut Vec<&'a V>) {
        if let Content::Leaf(leaf) = &node.content {
            results.push(&leaf.value);
            return;
        }
        for (_, child) in node.iter() {
            Self::collect_values(child, results);
        }
    }

    /// Insert `value` under `key`. Re-inserting an existing key is a silent
    /// no-op: the first value written wins.
    pub fn insert(&mut self, key: &[u8], value: V) {
        let key = terminated(key);
        // An owned cow is exactly the case where the sentinel was appended;
        // the leaf records it so the raw key can be handed back intact.
        let appended = matches!(key, Cow::Owned(_));
        let Some(root) = self.root.as_deref_mut() else {
            self.root = Some(Box::new(Node::new_leaf(&key, value, appended)));
            self.size = 1;
            return;
        };
        if Self::insert_recurse(root, &key, value, appended, 0) {
            self.size += 1;
        }
    }

    /// Returns true when a new leaf was attached. The `&mut Node` doubles as
    /// the slot handle: splits rewrite the current node in place via
    /// `mem::replace`, so no parent back-pointer is needed.
    fn insert_recurse(
        cur: &mut Node<V>,
        key: &[u8],
        value: V,
        appended: bool,
        depth: usize,
    ) -> bool {
        if let Content::Leaf(leaf) = &cur.content {
            if leaf.key.as_ref() == key {
                // First writer wins.
                return false;
            }

            // Lazy expansion ends here: the leaf is replaced by a node4
            // holding it and the new leaf as siblings, with their shared
            // byte run as the compressed path.
            trace_log!(depth, "splitting leaf into node4");
            let limit = longest_common_prefix(&leaf.key, key, depth);
            let old_edge = leaf.key[depth + limit];
            let new_edge = key[depth + limit];
            let branch = Node::new_inner(Prefix::new(&key[depth..], limit));
            let existing = std::mem::replace(cur, branch);
            cur.add_child(old_edge, existing);
            cur.add_child(new_edge, Node::new_leaf(key, value, appended));
            return true;
        }

        if !cur.prefix.is_empty() {
            let mismatch = cur.prefix_mismatch(key, depth);
            if mismatch != cur.prefix.len() {
                // The key leaves the compressed path partway: a fresh node4
                // takes over the shared part, the current node keeps the
                // remainder past the diverging byte.
                debug_log!(depth, mismatch, "splitting compressed path");
                let branch_prefix = Prefix::new(cur.prefix.inline(), mismatch);
                let (edge, demoted_prefix) = if cur.prefix.len() < MAX_PREFIX_LEN {
                    (
                        cur.prefix.at(mismatch),
                        cur.prefix.split_off_front(mismatch + 1),
                    )
                } else {
                    // The diverging byte and the remainder are not all
                    // inline; recover them from a descendant key.
                    let remainder_len = cur.prefix.len() - mismatch - 1;
                    let mut window = [0u8; MAX_PREFIX_LEN];
                    let (edge, filled) = {
                        let min_key = &cur.minimum_leaf().key;
                        let start = depth + mismatch + 1;
                        let take = remainder_len
                            .min(MAX_PREFIX_LEN)
                            .min(min_key.len().saturating_sub(start));
                        window[..take].copy_from_slice(&min_key[start..start + take]);
                        (min_key[depth + mismatch], take)
                    };
                    (edge, Prefix::new(&window[..filled], remainder_len))
                };
                cur.prefix = demoted_prefix;
                let demoted = std::mem::replace(cur, Node::new_inner(branch_prefix));
                cur.add_child(edge, demoted);
                cur.add_child(key[depth + mismatch], Node::new_leaf(key, value, appended));
                return true;
            }
        }

        let depth = depth + cur.prefix.len();
        let Some(child) = cur.seek_child_mut(key[depth]) else {
            cur.add_child(key[depth], Node::new_leaf(key, value, appended));
            return true;
        };
        Self::insert_recurse(child, key, value, appended, depth + 1)
    }

    /// Remove the value stored under `key`. A missing key is a silent no-op.
    pub fn remove(&mut self, key: &[u8]) {
        let key = terminated(key);
        let Some(root) = self.root.as_deref_mut() else {
            return;
        };

        // A matching root leaf empties the tree outright.
        if let Content::Leaf(leaf) = &root.content {
            if leaf.key.as_ref() == key.as_ref() {
                self.root = None;
                self.size = 0;
            }
            return;
        }

        if Self::remove_recurse(root, &key, 0) {
            self.size -= 1;
        }
    }

    /// `cur` is always an inner node here. Returns true when a leaf was
    /// detached. Underfull layouts demote themselves on the way out, and a
    /// node4 down to one child collapses into it in place.
    fn remove_recurse(cur: &mut Node<V>, key: &[u8], mut depth: usize) -> bool {
        if !cur.prefix.is_empty() {
            if cur.prefix_mismatch(key, depth) != cur.prefix.len() {
                return false;
            }
            depth += cur.prefix.len();
        }
        if depth >= key.len() {
            return false;
        }

        let edge = key[depth];
        let Some(child) = cur.seek_child_mut(edge) else {
            return false;
        };

        if let Content::Leaf(leaf) = &child.content {
            if leaf.key.as_ref() == key {
                cur.delete_child(edge);
                return true;
            }
            return false;
        }

        Self::remove_recurse(child, key, depth + 1)
    }

    /// Pre-order traversal over every node, inner nodes included. Children
    /// are visited in ascending key-byte order, so leaves arrive in
    /// ascending order of their stored keys; callers filter leaves with
    /// [`Node::is_leaf`].
    pub fn each<F>(&self, mut visitor: F)
    where
        F: FnMut(&Node<V>),
    {
        if let Some(root) = self.root.as_deref() {
            Self::each_recurse(root, &mut visitor);
        }
    }

    fn each_recurse<F>(node: &Node<V>, visitor: &mut F)
    where
        F: FnMut(&Node<V>),
    {
        visitor(node);
        for (_, child) in node.iter() {
            Self::each_recurse(child, visitor);
        }
    }

    /// The lexicographically smallest stored key and its value.
    pub fn minimum(&self) -> Option<(&[u8], &V)> {
        let leaf = self.root.as_deref()?.minimum_leaf();
        Some((leaf.user_key(), &leaf.value))
    }

    /// The lexicographically largest stored key and its value.
    pub fn maximum(&self) -> Option<(&[u8], &V)> {
        let leaf = self.root.as_deref()?.maximum_leaf();
        Some((leaf.user_key(), &leaf.value))
    }

    /// A snapshot of the tree's physical shape: node counts per layout,
    /// occupancy, leaf count, and height.
    pub fn tree_stats(&self) -> TreeStats {
        let mut stats = TreeStats::default();
        if let Some(root) = self.root.as_deref() {
            Self::stats_recurse(root, &mut stats, 1);
            finalize_tree_stats(&mut stats);
        }
        stats
    }

    fn stats_recurse(node: &Node<V>, stats: &mut TreeStats, height: usize) {
        if height > stats.max_height {
            stats.max_height = height;
        }
        if node.is_leaf() {
            stats.num_leaves += 1;
        } else {
            update_tree_stats(stats, node);
        }
        for (_, child) in node.iter() {
            Self::stats_recurse(child, stats, height + 1);
        }
    }
}
