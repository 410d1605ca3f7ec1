//! The compressed-path block carried by every inner node.
//!
//! Path compression folds single-child chains into a per-node prefix. Only
//! the first [`MAX_PREFIX_LEN`] bytes are stored inline; the logical length
//! may be larger, in which case the missing bytes are recovered from the key
//! of any descendant leaf (every leaf below a node shares the node's full
//! prefix).

/// Bytes of a node's compressed path stored inline. Anything beyond this is
/// reconstructed from a descendant leaf's key.
pub(crate) const MAX_PREFIX_LEN: usize = 10;

/// A bounded view of an inner node's compressed path.
///
/// `len` is the logical prefix length and may exceed [`MAX_PREFIX_LEN`];
/// `data` then holds a truncated window of the first bytes only.
#[derive(Clone, Debug, Default)]
pub(crate) struct Prefix {
    len: usize,
    data: [u8; MAX_PREFIX_LEN],
}

impl Prefix {
    /// Builds a prefix of logical length `len`, filling the inline window
    /// from `src`. The copy is clamped both by the window capacity and by
    /// the bytes actually available in `src`.
    pub(crate) fn new(src: &[u8], len: usize) -> Self {
        let mut data = [0u8; MAX_PREFIX_LEN];
        let filled = len.min(MAX_PREFIX_LEN).min(src.len());
        data[..filled].copy_from_slice(&src[..filled]);
        Self { len, data }
    }

    /// Logical length of the compressed path.
    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.len
    }

    #[inline(always)]
    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// True when the logical length exceeds the inline window.
    #[inline(always)]
    pub(crate) fn is_truncated(&self) -> bool {
        self.len > MAX_PREFIX_LEN
    }

    /// The inline window: the first `min(len, MAX_PREFIX_LEN)` path bytes.
    #[inline]
    pub(crate) fn inline(&self) -> &[u8] {
        &self.data[..self.len.min(MAX_PREFIX_LEN)]
    }

    /// Byte at `pos` within the inline window.
    #[inline(always)]
    pub(crate) fn at(&self, pos: usize) -> u8 {
        self.data[pos]
    }

    /// The prefix that remains after removing the first `n` path bytes.
    /// Valid only while the whole path is inline.
    pub(crate) fn split_off_front(&self, n: usize) -> Self {
        debug_assert!(!self.is_truncated());
        debug_assert!(n <= self.len);
        Self::new(&self.data[n..self.len], self.len - n)
    }

    /// The prefix of a node that absorbs its parent during a collapse: the
    /// parent's path, then the edge byte that selected the child, then the
    /// child's own path. The inline window keeps as much of that
    /// concatenation as fits; the logical length tracks all of it.
    pub(crate) fn for_collapse(parent: &Self, edge: u8, child: &Self) -> Self {
        let mut data = parent.data;
        let mut filled = parent.len.min(MAX_PREFIX_LEN);
        if filled < MAX_PREFIX_LEN {
            data[filled] = edge;
            filled += 1;
        }
        if filled < MAX_PREFIX_LEN {
            let take = child.inline().len().min(MAX_PREFIX_LEN - filled);
            data[filled..filled + take].copy_from_slice(&child.data[..take]);
        }
        Self {
            len: parent.len + 1 + child.len,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{MAX_PREFIX_LEN, Prefix};

    #[test]
    fn inline_window_clamps() {
        let p = Prefix::new(b"abcdefghijklmnop", 16);
        assert_eq!(p.len(), 16);
        assert!(p.is_truncated());
        assert_eq!(p.inline(), b"abcdefghij");

        let q = Prefix::new(b"abc", 3);
        assert_eq!(q.len(), 3);
        assert!(!q.is_truncated());
        assert_eq!(q.inline(), b"abc");
    }

    #[test]
    fn split_off_front_shifts_window() {
        let p = Prefix::new(b"abcdef", 6);
        let rest = p.split_off_front(2);
        assert_eq!(rest.len(), 4);
        assert_eq!(rest.inline(), b"cdef");
    }

    #[test]
    fn collapse_concatenates_up_to_cap() {
        let parent = Prefix::new(b"ab", 2);
        let child = Prefix::new(b"xyz", 3);
        let merged = Prefix::for_collapse(&parent, b'-', &child);
        assert_eq!(merged.len(), 6);
        assert_eq!(merged.inline(), b"ab-xyz");
    }

    #[test]
    fn collapse_keeps_logical_length_past_cap() {
        let parent = Prefix::new(b"abcdefghi", 9);
        let child = Prefix::new(b"stuvwx", 6);
        let merged = Prefix::for_collapse(&parent, b'0', &child);
        assert_eq!(merged.len(), 9 + 1 + 6);
        assert!(merged.is_truncated());
        assert_eq!(merged.inline().len(), MAX_PREFIX_LEN);
        assert_eq!(merged.inline(), b"abcdefghi0");
    }
}
