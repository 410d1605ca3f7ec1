//! Model-based property tests: every action sequence is applied both to the
//! tree and to a `BTreeMap`, and the two must agree at every step.
//!
//! Two key populations are exercised separately. The variable-length
//! strategies never contain `0x00` (a shorter key embedding the terminator
//! byte can alias a longer one, which the tree reserves to callers with a
//! prefix-free encoding). Fixed-width binary keys ARE such an encoding, so
//! they get their own property with `0x00` bytes everywhere, the all-zero
//! key included.

use std::collections::BTreeMap;

use proptest::prelude::*;
use proptest_derive::Arbitrary;

use artree::AdaptiveRadixTree;

/// Reference implementation with the tree's first-writer-wins insert.
#[derive(Default)]
struct Model {
    map: BTreeMap<Vec<u8>, u64>,
}

impl Model {
    fn insert(&mut self, key: Vec<u8>, value: u64) {
        self.map.entry(key).or_insert(value);
    }

    fn get(&self, key: &[u8]) -> Option<&u64> {
        self.map.get(key)
    }

    fn remove(&mut self, key: &[u8]) {
        self.map.remove(key);
    }

    fn len(&self) -> usize {
        self.map.len()
    }

    fn prefix_values(&self, prefix: &[u8]) -> Vec<u64> {
        self.map
            .iter()
            .filter(|(k, _)| k.starts_with(prefix))
            .map(|(_, v)| *v)
            .collect()
    }
}

#[derive(Debug, Clone)]
struct Key(Vec<u8>);

impl Arbitrary for Key {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            // Empty key
            Just(Key(vec![])),
            // Short arbitrary keys, terminator byte excluded
            prop::collection::vec(1u8..=255, 1..4).prop_map(Key),
            // Medium arbitrary keys
            prop::collection::vec(1u8..=255, 4..24).prop_map(Key),
            // Path-shaped keys that exercise shared prefixes
            "[a-c]{1,6}/[a-c]{1,6}".prop_map(|s| Key(s.into_bytes())),
            // A long fixed stem pushes prefixes past the inline window
            "[a-d]{1,4}".prop_map(|s| {
                let mut key = b"shared-stem-longer-than-the-window/".to_vec();
                key.extend_from_slice(s.as_bytes());
                Key(key)
            }),
        ]
        .boxed()
    }
}

#[derive(Arbitrary, Debug, Clone)]
enum Action {
    Insert(Key, u64),
    Search(Key),
    Remove(Key),
    PrefixSearch(Key),
}

/// A fixed-width big-endian key: prefix-free by construction, so `0x00`
/// bytes are legal anywhere, including a trailing data byte and the
/// all-zero key.
#[derive(Debug, Clone, Copy)]
struct BinKey([u8; 8]);

impl Arbitrary for BinKey {
    type Parameters = ();
    type Strategy = BoxedStrategy<Self>;

    fn arbitrary_with(_: Self::Parameters) -> Self::Strategy {
        prop_oneof![
            // A dense low range is mostly zero bytes and collides often.
            (0u64..4096).prop_map(|v| BinKey(v.to_be_bytes())),
            // Multiples of 256 end in a genuine 0x00 data byte.
            (0u64..256).prop_map(|v| BinKey((v << 8).to_be_bytes())),
            any::<u64>().prop_map(|v| BinKey(v.to_be_bytes())),
        ]
        .boxed()
    }
}

fn apply_actions(actions: &[Action]) -> (AdaptiveRadixTree<u64>, Model) {
    let mut tree = AdaptiveRadixTree::new();
    let mut model = Model::default();
    for action in actions {
        match action {
            Action::Insert(key, value) => {
                tree.insert(&key.0, *value);
                model.insert(key.0.clone(), *value);
            }
            Action::Search(key) => {
                assert_eq!(tree.search(&key.0), model.get(&key.0), "key {:?}", key.0);
            }
            Action::Remove(key) => {
                tree.remove(&key.0);
                model.remove(&key.0);
            }
            Action::PrefixSearch(key) => {
                let got: Vec<u64> = tree.prefix_search(&key.0).into_iter().copied().collect();
                assert_eq!(got, model.prefix_values(&key.0), "prefix {:?}", key.0);
            }
        }
        assert_eq!(tree.size(), model.len());
    }
    (tree, model)
}

proptest! {
    #[test]
    fn tree_matches_model(actions in prop::collection::vec(any::<Action>(), 1..120)) {
        let (tree, model) = apply_actions(&actions);

        // Every surviving key is retrievable, and nothing else is.
        for (key, value) in &model.map {
            prop_assert_eq!(tree.search(key), Some(value));
        }

        // Enumeration yields leaves in the model's (sorted) key order.
        let mut enumerated = Vec::new();
        tree.each(|node| {
            if let Some(key) = node.key() {
                enumerated.push(key.to_vec());
            }
        });
        let expected: Vec<Vec<u8>> = model.map.keys().cloned().collect();
        prop_assert_eq!(enumerated, expected);

        // Extremes agree with the model.
        prop_assert_eq!(
            tree.minimum().map(|(k, v)| (k.to_vec(), *v)),
            model.map.first_key_value().map(|(k, v)| (k.clone(), *v))
        );
        prop_assert_eq!(
            tree.maximum().map(|(k, v)| (k.to_vec(), *v)),
            model.map.last_key_value().map(|(k, v)| (k.clone(), *v))
        );
    }

    #[test]
    fn insert_all_then_remove_all_is_empty(
        keys in prop::collection::btree_set(prop::collection::vec(1u8..=255, 0..16), 1..60),
        removal_seed in any::<u64>(),
    ) {
        let mut tree = AdaptiveRadixTree::new();
        for (i, key) in keys.iter().enumerate() {
            tree.insert(key, i as u64);
        }
        prop_assert_eq!(tree.size(), keys.len());

        // Remove in an order decorrelated from insertion.
        let mut shuffled: Vec<&Vec<u8>> = keys.iter().collect();
        shuffled.sort_by_key(|k| {
            k.iter()
                .fold(removal_seed, |acc, b| acc.wrapping_mul(31).wrapping_add(*b as u64))
        });
        for key in shuffled {
            tree.remove(key);
        }

        prop_assert_eq!(tree.size(), 0);
        prop_assert!(tree.is_empty());
        let mut visited = 0;
        tree.each(|_| visited += 1);
        prop_assert_eq!(visited, 0);
    }

    #[test]
    fn fixed_width_binary_keys_match_model(
        entries in prop::collection::vec((any::<BinKey>(), any::<u64>()), 1..200),
        probe_len in 0usize..=8,
    ) {
        let mut tree = AdaptiveRadixTree::new();
        let mut model: BTreeMap<[u8; 8], u64> = BTreeMap::new();
        for (key, value) in &entries {
            tree.insert(&key.0, *value);
            model.entry(key.0).or_insert(*value);
        }
        prop_assert_eq!(tree.size(), model.len());

        for (key, value) in &model {
            prop_assert_eq!(tree.search(key), Some(value));
        }

        // Full 8-byte keys come back whole, in sorted order.
        let mut enumerated = Vec::new();
        tree.each(|node| {
            if let Some(key) = node.key() {
                enumerated.push(key.to_vec());
            }
        });
        let expected: Vec<Vec<u8>> = model.keys().map(|k| k.to_vec()).collect();
        prop_assert_eq!(enumerated, expected);

        prop_assert_eq!(
            tree.minimum().map(|(k, v)| (k.to_vec(), *v)),
            model.first_key_value().map(|(k, v)| (k.to_vec(), *v))
        );
        prop_assert_eq!(
            tree.maximum().map(|(k, v)| (k.to_vec(), *v)),
            model.last_key_value().map(|(k, v)| (k.to_vec(), *v))
        );

        // Probe with a prefix of an inserted key so hits actually occur;
        // the probe may contain (or consist of) zero bytes.
        let BinKey(first) = entries[0].0;
        let probe = &first[..probe_len];
        let got: Vec<u64> = tree.prefix_search(probe).into_iter().copied().collect();
        let expected: Vec<u64> = model
            .iter()
            .filter(|(k, _)| k.starts_with(probe))
            .map(|(_, v)| *v)
            .collect();
        prop_assert_eq!(got, expected);

        for key in model.keys() {
            tree.remove(key);
        }
        prop_assert_eq!(tree.size(), 0);
        prop_assert!(tree.is_empty());
    }

    #[test]
    fn prefix_search_is_ordered_and_exact(
        keys in prop::collection::btree_set("[a-c]{0,8}", 1..80),
        probe in "[a-c]{0,4}",
    ) {
        let mut tree = AdaptiveRadixTree::new();
        for key in &keys {
            tree.insert(key.as_bytes(), key.clone());
        }

        let got: Vec<String> = tree.prefix_search(probe.as_bytes()).into_iter().cloned().collect();
        let expected: Vec<String> = keys
            .iter()
            .filter(|k| k.starts_with(&probe))
            .cloned()
            .collect();
        prop_assert_eq!(got, expected);
    }
}
