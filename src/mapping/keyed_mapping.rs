use crate::mapping::NodeMapping;
use crate::mapping::indexed_mapping::IndexedMapping;
use crate::utils::u8_keys::{
    u8_keys_find_insert_position_sorted, u8_keys_find_key_position_sorted,
};

/// Maps key bytes to children through a sorted array of keys and a parallel
/// array of child slots. Used by the two smallest layouts: at width 4 the
/// lookup is a linear scan, at width 16 a binary search. Insertion and
/// deletion shift the tail to keep the first `num_children` entries sorted,
/// which is also what gives ascending-byte iteration for free.
pub struct KeyedMapping<N, const WIDTH: usize> {
    pub(crate) keys: [u8; WIDTH],
    pub(crate) children: [Option<N>; WIDTH],
    pub(crate) num_children: u8,
}

impl<N, const WIDTH: usize> Default for KeyedMapping<N, WIDTH> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N, const WIDTH: usize> KeyedMapping<N, WIDTH> {
    #[inline]
    pub fn new() -> Self {
        Self {
            keys: [0; WIDTH],
            children: [const { None }; WIDTH],
            num_children: 0,
        }
    }

    /// Promotion from a smaller sorted layout. Entries are already in order,
    /// so a straight copy suffices.
    pub fn from_resized_grow<const OLD_WIDTH: usize>(km: &mut KeyedMapping<N, OLD_WIDTH>) -> Self {
        debug_assert!(WIDTH > OLD_WIDTH);
        let mut new = KeyedMapping::new();
        for i in 0..km.num_children as usize {
            new.keys[i] = km.keys[i];
            new.children[i] = km.children[i].take();
        }
        new.num_children = km.num_children;
        km.num_children = 0;
        new
    }

    /// Demotion from a larger sorted layout; only the live entries move.
    pub fn from_resized_shrink<const OLD_WIDTH: usize>(
        km: &mut KeyedMapping<N, OLD_WIDTH>,
    ) -> Self {
        debug_assert!(WIDTH < OLD_WIDTH);
        debug_assert!(km.num_children as usize <= WIDTH);
        let mut new = KeyedMapping::new();
        for i in 0..km.num_children as usize {
            new.keys[i] = km.keys[i];
            new.children[i] = km.children[i].take();
        }
        new.num_children = km.num_children;
        km.num_children = 0;
        new
    }

    /// Demotion from the indexed layout. The index iterates in byte order,
    /// so appending preserves sortedness.
    pub fn from_indexed<const IDX_WIDTH: usize>(im: &mut IndexedMapping<N, IDX_WIDTH>) -> Self {
        debug_assert!(im.num_children() <= WIDTH);
        let mut new = KeyedMapping::new();
        im.move_into(&mut new);
        new
    }

    /// Takes the sole remaining entry out of the mapping. Used when a node
    /// of this layout collapses into its last child.
    pub fn take_single_child(&mut self) -> (u8, N) {
        debug_assert_eq!(self.num_children, 1);
        let key = self.keys[0];
        let child = self.children[0].take().expect("child slot out of sync");
        self.num_children = 0;
        (key, child)
    }

    pub(crate) fn first(&self) -> Option<&N> {
        if self.num_children == 0 {
            return None;
        }
        self.children[0].as_ref()
    }

    pub(crate) fn last(&self) -> Option<&N> {
        if self.num_children == 0 {
            return None;
        }
        self.children[self.num_children as usize - 1].as_ref()
    }

    /// Ascending byte-order iteration over the live entries.
    #[inline]
    pub(crate) fn iter(&self) -> impl Iterator<Item = (u8, &N)> {
        (0..self.num_children as usize)
            .map(|i| (self.keys[i], self.children[i].as_ref().expect("child slot out of sync")))
    }
}

impl<N, const WIDTH: usize> NodeMapping<N, WIDTH> for KeyedMapping<N, WIDTH> {
    fn add_child(&mut self, key: u8, node: N) {
        let n = self.num_children as usize;
        debug_assert!(n < WIDTH, "add_child on a full mapping");
        let idx = u8_keys_find_insert_position_sorted::<WIDTH>(key, &self.keys, n);
        for i in (idx..n).rev() {
            self.keys[i + 1] = self.keys[i];
            self.children[i + 1] = self.children[i].take();
        }
        self.keys[idx] = key;
        self.children[idx] = Some(node);
        self.num_children += 1;
    }

    fn seek_child(&self, key: u8) -> Option<&N> {
        let idx =
            u8_keys_find_key_position_sorted::<WIDTH>(key, &self.keys, self.num_children as usize)?;
        self.children[idx].as_ref()
    }

    fn seek_child_mut(&mut self, key: u8) -> Option<&mut N> {
        let idx =
            u8_keys_find_key_position_sorted::<WIDTH>(key, &self.keys, self.num_children as usize)?;
        self.children[idx].as_mut()
    }

    fn delete_child(&mut self, key: u8) -> Option<N> {
        let n = self.num_children as usize;
        let idx = u8_keys_find_key_position_sorted::<WIDTH>(key, &self.keys, n)?;
        let deleted = self.children[idx].take();

        // Compact the tail left so the live region stays sorted and dense.
        for i in idx..n - 1 {
            self.keys[i] = self.keys[i + 1];
            self.children[i] = self.children[i + 1].take();
        }
        self.keys[n - 1] = 0;
        self.children[n - 1] = None;
        self.num_children -= 1;

        deleted
    }

    #[inline(always)]
    fn num_children(&self) -> usize {
        self.num_children as usize
    }
}
