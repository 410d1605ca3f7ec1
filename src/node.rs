use crate::mapping::NodeMapping;
use crate::mapping::direct_mapping::DirectMapping;
use crate::mapping::indexed_mapping::IndexedMapping;
use crate::mapping::keyed_mapping::KeyedMapping;
use crate::prefix::Prefix;

// Inner nodes of type Node4 must have between 2 and 4 children.
pub(crate) const NODE4_MIN: usize = 2;
pub(crate) const NODE4_MAX: usize = 4;

// Inner nodes of type Node16 must have between 5 and 16 children.
pub(crate) const NODE16_MIN: usize = 5;
pub(crate) const NODE16_MAX: usize = 16;

// Inner nodes of type Node48 must have between 17 and 48 children.
pub(crate) const NODE48_MIN: usize = 17;
pub(crate) const NODE48_MAX: usize = 48;

// Inner nodes of type Node256 must have between 49 and 256 children.
pub(crate) const NODE256_MIN: usize = 49;
pub(crate) const NODE256_MAX: usize = 256;

/// The physical layout a node currently uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Leaf,
    Node4,
    Node16,
    Node48,
    Node256,
}

/// A terminal node: one full stored key and its value. `terminated` records
/// whether the boundary appended the sentinel byte; a raw key may end in
/// `0x00` of its own, so this is never re-derived from the stored bytes.
pub(crate) struct Leaf<V> {
    pub(crate) key: Box<[u8]>,
    pub(crate) value: V,
    pub(crate) terminated: bool,
}

impl<V> Leaf<V> {
    /// The key as the caller supplied it.
    pub(crate) fn user_key(&self) -> &[u8] {
        if self.terminated {
            &self.key[..self.key.len() - 1]
        } else {
            &self.key
        }
    }
}

pub(crate) enum Content<V> {
    Leaf(Leaf<V>),
    Node4(KeyedMapping<Box<Node<V>>, NODE4_MAX>),
    Node16(KeyedMapping<Box<Node<V>>, NODE16_MAX>),
    Node48(IndexedMapping<Box<Node<V>>, NODE48_MAX>),
    Node256(DirectMapping<Box<Node<V>>>),
}

/// A tree node: a compressed-path header shared by all layouts, plus the
/// layout-specific payload. Leaves ignore the prefix; their full key is
/// stored outright.
pub struct Node<V> {
    pub(crate) prefix: Prefix,
    pub(crate) content: Content<V>,
}

impl<V> Node<V> {
    #[inline]
    pub(crate) fn new_leaf(key: &[u8], value: V, terminated: bool) -> Self {
        Self {
            prefix: Prefix::default(),
            content: Content::Leaf(Leaf {
                key: Box::from(key),
                value,
                terminated,
            }),
        }
    }

    #[inline]
    pub(crate) fn new_inner(prefix: Prefix) -> Self {
        Self {
            prefix,
            content: Content::Node4(KeyedMapping::new()),
        }
    }

    /// Which layout this node currently uses.
    pub fn kind(&self) -> NodeKind {
        match &self.content {
            Content::Leaf(_) => NodeKind::Leaf,
            Content::Node4(_) => NodeKind::Node4,
            Content::Node16(_) => NodeKind::Node16,
            Content::Node48(_) => NodeKind::Node48,
            Content::Node256(_) => NodeKind::Node256,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(&self.content, Content::Leaf(_))
    }

    pub fn is_inner(&self) -> bool {
        !self.is_leaf()
    }

    /// The value stored here, for leaves.
    pub fn value(&self) -> Option<&V> {
        let Content::Leaf(leaf) = &self.content else {
            return None;
        };
        Some(&leaf.value)
    }

    /// The key stored here as the caller supplied it, for leaves.
    pub fn key(&self) -> Option<&[u8]> {
        let Content::Leaf(leaf) = &self.content else {
            return None;
        };
        Some(leaf.user_key())
    }

    pub fn num_children(&self) -> usize {
        match &self.content {
            Content::Leaf(_) => 0,
            Content::Node4(m) => m.num_children(),
            Content::Node16(m) => m.num_children(),
            Content::Node48(m) => m.num_children(),
            Content::Node256(m) => m.num_children(),
        }
    }

    /// Child capacity of the current layout.
    pub fn capacity(&self) -> usize {
        match &self.content {
            Content::Leaf(_) => 0,
            Content::Node4(_) => NODE4_MAX,
            Content::Node16(_) => NODE16_MAX,
            Content::Node48(_) => NODE48_MAX,
            Content::Node256(_) => NODE256_MAX,
        }
    }

    pub(crate) fn seek_child(&self, key: u8) -> Option<&Node<V>> {
        match &self.content {
            Content::Leaf(_) => None,
            Content::Node4(m) => m.seek_child(key).map(|n| n.as_ref()),
            Content::Node16(m) => m.seek_child(key).map(|n| n.as_ref()),
            Content::Node48(m) => m.seek_child(key).map(|n| n.as_ref()),
            Content::Node256(m) => m.seek_child(key).map(|n| n.as_ref()),
        }
    }

    pub(crate) fn seek_child_mut(&mut self, key: u8) -> Option<&mut Node<V>> {
        match &mut self.content {
            Content::Leaf(_) => None,
            Content::Node4(m) => m.seek_child_mut(key).map(|n| n.as_mut()),
            Content::Node16(m) => m.seek_child_mut(key).map(|n| n.as_mut()),
            Content::Node48(m) => m.seek_child_mut(key).map(|n| n.as_mut()),
            Content::Node256(m) => m.seek_child_mut(key).map(|n| n.as_mut()),
        }
    }

    /// Attaches `child` under `key`, promoting the layout first when full.
    pub(crate) fn add_child(&mut self, key: u8, child: Node<V>) {
        if self.is_full() {
            self.grow();
        }
        let child = Box::new(child);
        match &mut self.content {
            Content::Node4(m) => m.add_child(key, child),
            Content::Node16(m) => m.add_child(key, child),
            Content::Node48(m) => m.add_child(key, child),
            Content::Node256(m) => m.add_child(key, child),
            Content::Leaf(_) => unreachable!("add_child on a leaf"),
        }
    }

    /// Detaches the child under `key`, demoting the layout when the count
    /// drops below the variant minimum.
    pub(crate) fn delete_child(&mut self, key: u8) -> Option<Box<Node<V>>> {
        let deleted = match &mut self.content {
            Content::Leaf(_) => None,
            Content::Node4(m) => m.delete_child(key),
            Content::Node16(m) => m.delete_child(key),
            Content::Node48(m) => m.delete_child(key),
            Content::Node256(m) => m.delete_child(key),
        }?;
        if self.num_children() < self.min_size() {
            self.shrink();
        }
        Some(deleted)
    }

    /// Ascending byte-order iteration over the direct children.
    pub(crate) fn iter(&self) -> Box<dyn Iterator<Item = (u8, &Node<V>)> + '_> {
        match &self.content {
            Content::Leaf(_) => Box::new(std::iter::empty()),
            Content::Node4(m) => Box::new(m.iter().map(|(k, n)| (k, n.as_ref()))),
            Content::Node16(m) => Box::new(m.iter().map(|(k, n)| (k, n.as_ref()))),
            Content::Node48(m) => Box::new(m.iter().map(|(k, n)| (k, n.as_ref()))),
            Content::Node256(m) => Box::new(m.iter().map(|(k, n)| (k, n.as_ref()))),
        }
    }

    /// The leaf reached by always taking the smallest child byte. Besides
    /// answering minimum-key queries, this is how prefix bytes beyond the
    /// inline window are recovered: every leaf below a node carries the
    /// node's full compressed path in its key.
    pub(crate) fn minimum_leaf(&self) -> &Leaf<V> {
        let mut cur = self;
        loop {
            let child = match &cur.content {
                Content::Leaf(leaf) => return leaf,
                Content::Node4(m) => m.first(),
                Content::Node16(m) => m.first(),
                Content::Node48(m) => m.first(),
                Content::Node256(m) => m.first(),
            };
            cur = child.expect("inner node with no children");
        }
    }

    /// The leaf reached by always taking the largest child byte.
    pub(crate) fn maximum_leaf(&self) -> &Leaf<V> {
        let mut cur = self;
        loop {
            let child = match &cur.content {
                Content::Leaf(leaf) => return leaf,
                Content::Node4(m) => m.last(),
                Content::Node16(m) => m.last(),
                Content::Node48(m) => m.last(),
                Content::Node256(m) => m.last(),
            };
            cur = child.expect("inner node with no children");
        }
    }

    /// First position in `[0, prefix_len)` where the compressed path and
    /// `key` (from `depth`) disagree, or where `key` runs out. Bytes past
    /// the inline window are read from the minimum descendant leaf.
    pub(crate) fn prefix_mismatch(&self, key: &[u8], depth: usize) -> usize {
        let prefix_len = self.prefix.len();
        let inline = self.prefix.inline();
        let mut reconstructed: Option<&[u8]> = None;
        let mut idx = 0;
        while idx < prefix_len && depth + idx < key.len() {
            let expected = if idx < inline.len() {
                inline[idx]
            } else {
                let leaf_key =
                    *reconstructed.get_or_insert_with(|| self.minimum_leaf().key.as_ref());
                match leaf_key.get(depth + idx) {
                    Some(b) => *b,
                    None => break,
                }
            };
            if key[depth + idx] != expected {
                break;
            }
            idx += 1;
        }
        idx
    }

    #[inline]
    fn is_full(&self) -> bool {
        match &self.content {
            Content::Node4(m) => m.num_children() >= NODE4_MAX,
            Content::Node16(m) => m.num_children() >= NODE16_MAX,
            Content::Node48(m) => m.num_children() >= NODE48_MAX,
            // 256 distinct key bytes cannot overflow the widest layout.
            Content::Node256(_) => false,
            Content::Leaf(_) => unreachable!("is_full on a leaf"),
        }
    }

    fn min_size(&self) -> usize {
        match &self.content {
            Content::Leaf(_) => 0,
            Content::Node4(_) => NODE4_MIN,
            Content::Node16(_) => NODE16_MIN,
            Content::Node48(_) => NODE48_MIN,
            Content::Node256(_) => NODE256_MIN,
        }
    }

    fn grow(&mut self) {
        match &mut self.content {
            Content::Node4(m) => {
                trace_log!("growing Node4 to Node16");
                self.content = Content::Node16(KeyedMapping::from_resized_grow(m));
            }
            Content::Node16(m) => {
                trace_log!("growing Node16 to Node48");
                self.content = Content::Node48(IndexedMapping::from_keyed(m));
            }
            Content::Node48(m) => {
                trace_log!("growing Node48 to Node256");
                self.content = Content::Node256(DirectMapping::from_indexed(m));
            }
            Content::Node256(_) => unreachable!("Node256 cannot grow"),
            Content::Leaf(_) => unreachable!("grow on a leaf"),
        }
    }

    fn shrink(&mut self) {
        match &mut self.content {
            Content::Node4(m) => {
                // A node4 left with a single child is replaced by that child.
                // An inner child absorbs the collapsed edge into its prefix;
                // a leaf child simply takes this node's place.
                debug_log!("collapsing Node4 into its remaining child");
                let (edge, child) = m.take_single_child();
                let child = *child;
                if child.is_leaf() {
                    self.prefix = Prefix::default();
                } else {
                    self.prefix = Prefix::for_collapse(&self.prefix, edge, &child.prefix);
                }
                self.content = child.content;
            }
            Content::Node16(m) => {
                trace_log!("shrinking Node16 to Node4");
                self.content = Content::Node4(KeyedMapping::from_resized_shrink(m));
            }
            Content::Node48(m) => {
                trace_log!("shrinking Node48 to Node16");
                self.content = Content::Node16(KeyedMapping::from_indexed(m));
            }
            Content::Node256(m) => {
                trace_log!("shrinking Node256 to Node48");
                self.content = Content::Node48(IndexedMapping::from_direct(m));
            }
            Content::Leaf(_) => unreachable!("shrink on a leaf"),
        }
    }
}
