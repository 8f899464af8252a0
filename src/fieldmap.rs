//! An order-preserving map of unique keys that backs encoded objects.
//!
//! Field order is part of an object's identity on the wire, so this type
//! stores its entries as a plain vector in the order they were supplied and
//! iterates in that same order. The decoder uses it to preserve stream
//! order; encoders of fixed records hand it fields in declaration order.
//!
//! Conversions from the standard map types sort entries lexicographically by
//! key, so free-form maps always encode in one documented, reproducible
//! order regardless of the source map's iteration quirks.
//!
//! # Example
//!
//! ```
//! use std::collections::{BTreeMap, HashMap};
//! use smile::prelude::*;
//!
//! let key = Bytes::from("a");
//! let value = 1;
//!
//! // from a `BTreeMap` (already sorted)
//! let mut btmap = BTreeMap::new();
//! btmap.insert(key.clone(), value);
//!
//! let bt_fm = FieldMap::from(btmap);
//!
//! // from a `HashMap` (sorted during conversion)
//! let mut hashmap = HashMap::new();
//! hashmap.insert(key.clone(), value);
//!
//! let hm_fm = FieldMap::from(hashmap);
//!
//! // from explicit entries, kept in the given order
//! let vec_fm = FieldMap::from_entries(vec![(key.clone(), value)]);
//!
//! assert_eq!(bt_fm, hm_fm);
//! assert_eq!(bt_fm, vec_fm);
//! ```

use std::{
    collections::{BTreeMap, HashMap},
    hash::*,
    slice::Iter,
    vec::IntoIter,
};

#[derive(Eq, PartialEq, Ord, PartialOrd, Clone, Hash, Debug, Default)]
/// A map implemented as a [`Vec`] of pairs that preserves entry order.
///
/// See also: [module level documentation](`crate::fieldmap`).
pub struct FieldMap<K: Ord, V>(Vec<(K, V)>);

impl<K: Ord, V> FieldMap<K, V> {
    /// Creates a [`FieldMap`] from a vector of key-value pairs, keeping them
    /// in the given order.
    ///
    /// # Arguments
    ///
    /// * `v: Vec<(K, V)>` - The entries, in the order they should encode.
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::*;
    ///
    /// let fm = FieldMap::from_entries(vec![(2, "bar"), (1, "foo"), (3, "baz")]);
    ///
    /// // entry order is preserved
    /// assert_eq!(fm.iter().next(), Some(&(2, "bar")));
    /// ```
    ///
    /// # Panics
    ///
    /// This function will panic if two entries share a key:
    ///
    /// ```should_panic
    /// use smile::prelude::*;
    ///
    /// let fm = FieldMap::from_entries(vec![("a", ""), ("a", "")]);
    /// ```
    pub fn from_entries(v: Vec<(K, V)>) -> Self {
        let mut keys: Vec<&K> = v.iter().map(|(k, _)| k).collect();
        keys.sort_unstable();
        for w in keys.windows(2) {
            if w[0] == w[1] {
                panic!("`FieldMap` keys must be unique")
            }
        }
        FieldMap(v)
    }

    /// Returns length.
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::*;
    ///
    /// let fm = FieldMap::from_entries(vec![("foo", "bar")]);
    ///
    /// assert_eq!(fm.len(), 1);
    /// ```
    pub fn len(&self) -> usize { self.0.len() }

    /// Indicates whether the [`FieldMap`] is empty.
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::*;
    ///
    /// let fm = FieldMap::from_entries(Vec::<(u8, u8)>::new());
    ///
    /// assert!(fm.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool { self.0.is_empty() }

    /// Returns an [`Iter`] of the key value pairs, in entry order.
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::*;
    ///
    /// let fm = FieldMap::from_entries(vec![(1, "foo"), (2, "bar")]);
    ///
    /// let (k, v) = fm.iter().next().unwrap();
    ///
    /// assert_eq!((k, v), (&1, &"foo"))
    /// ```
    pub fn iter(&self) -> Iter<(K, V)> { self.0.iter() }

    /// Looks up the value stored under `key`, scanning in entry order.
    ///
    /// # Example
    ///
    /// ```
    /// use smile::prelude::*;
    ///
    /// let fm = FieldMap::from_entries(vec![(1, "foo"), (2, "bar")]);
    ///
    /// assert_eq!(fm.get(&2), Some(&"bar"));
    /// assert_eq!(fm.get(&3), None);
    /// ```
    pub fn get(&self, key: &K) -> Option<&V> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Indicates whether `key` is present.
    pub fn contains_key(&self, key: &K) -> bool { self.get(key).is_some() }
}

impl<K: Ord + Hash, V> FieldMap<K, V> {
    /// Consumes a [`FieldMap`], producing a [`HashMap`] from the entries.
    ///
    /// # Example
    ///
    /// ```
    /// use std::collections::HashMap;
    /// use smile::prelude::*;
    ///
    /// let fm = FieldMap::from_entries(vec![(1, "foo"), (2, "bar")]);
    ///
    /// let hmap: HashMap<u8, &str> = fm.into_hashmap();
    /// ```
    pub fn into_hashmap<S: BuildHasher + Default>(self) -> HashMap<K, V, S> {
        self.into_iter().collect()
    }
}

impl<K: Ord + Hash, V, S: BuildHasher> From<HashMap<K, V, S>> for FieldMap<K, V> {
    fn from(hm: HashMap<K, V, S>) -> Self {
        let mut v: Vec<(K, V)> = hm.into_iter().collect();
        v.sort_unstable_by(|(k1, _), (k2, _)| k1.cmp(k2));
        FieldMap(v)
    }
}

impl<K: Ord, V> From<BTreeMap<K, V>> for FieldMap<K, V> {
    fn from(bt: BTreeMap<K, V>) -> Self { FieldMap(bt.into_iter().collect()) }
}

impl<K: Ord, V> IntoIterator for FieldMap<K, V> {
    type IntoIter = IntoIter<(K, V)>;
    type Item = (K, V);

    fn into_iter(self) -> IntoIter<(K, V)> { self.0.into_iter() }
}
