//! Back-reference tables.
//!
//! When a header flag enables sharing, a string that has already appeared in
//! the document may be replaced on the wire by a small index into a table of
//! previously seen strings. The codec only defines the token slots; how the
//! table stores and bounds its entries is this module's concern, behind the
//! [`StringTable`] trait so callers can substitute their own policy.
//!
//! Both encoder and decoder insert every *eligible* literal string in stream
//! order, which keeps their indexes aligned without any negotiation. Tables
//! are scoped to a single document and reset at the start of every call.

use super::constants::*;
use bytes::Bytes;
use std::collections::HashMap;

/// True for strings worth remembering in a shared table: non-empty and no
/// longer than the short-token range.
pub(crate) fn shareable(bs: &Bytes) -> bool { !bs.is_empty() && bs.len() <= SHARED_MAX_LEN }

/// A dictionary of previously seen strings, indexed densely from zero.
pub trait StringTable {
    /// Returns the index under which `s` was previously inserted, if any.
    fn lookup(&self, s: &Bytes) -> Option<usize>;

    /// Remembers `s`, returning its new index, or `None` when the table is
    /// full (the caller then falls back to a literal encoding).
    fn insert(&mut self, s: &Bytes) -> Option<usize>;

    /// Returns the string stored at `index`.
    fn get(&self, index: usize) -> Option<&Bytes>;

    /// Forgets all entries; called at every document boundary.
    fn clear(&mut self);

    /// Number of entries currently stored.
    fn len(&self) -> usize;

    /// Indicates whether the table is empty.
    fn is_empty(&self) -> bool { self.len() == 0 }
}

/// The default [`StringTable`]: first-seen strings keep their index for the
/// rest of the document, and a full table stops accepting new entries.
#[derive(Clone, Debug, Default)]
pub struct SharedStringTable {
    entries: Vec<Bytes>,
    index: HashMap<Bytes, usize>,
    capacity: usize,
}

impl SharedStringTable {
    /// Creates a table that holds at most `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Self {
        SharedStringTable {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
            capacity,
        }
    }

    /// A table sized for the string-value token's 5-bit index space.
    pub fn string_values() -> Self { Self::with_capacity(SHARED_STRING_CAPACITY) }

    /// A table sized for the name token's 6-bit index space.
    pub fn names() -> Self { Self::with_capacity(SHARED_NAME_CAPACITY) }
}

impl StringTable for SharedStringTable {
    fn lookup(&self, s: &Bytes) -> Option<usize> { self.index.get(s).cloned() }

    fn insert(&mut self, s: &Bytes) -> Option<usize> {
        if let Some(&i) = self.index.get(s) {
            return Some(i);
        }
        if self.entries.len() >= self.capacity {
            return None;
        }
        let i = self.entries.len();
        self.entries.push(s.clone());
        self.index.insert(s.clone(), i);
        Some(i)
    }

    fn get(&self, index: usize) -> Option<&Bytes> { self.entries.get(index) }

    fn clear(&mut self) {
        self.entries.clear();
        self.index.clear();
    }

    fn len(&self) -> usize { self.entries.len() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indexes_are_first_seen_order() {
        let mut t = SharedStringTable::with_capacity(4);
        assert_eq!(t.insert(&Bytes::from("a")), Some(0));
        assert_eq!(t.insert(&Bytes::from("b")), Some(1));
        assert_eq!(t.insert(&Bytes::from("a")), Some(0));
        assert_eq!(t.lookup(&Bytes::from("b")), Some(1));
        assert_eq!(t.get(1), Some(&Bytes::from("b")));
        assert_eq!(t.len(), 2);
    }

    #[test]
    fn full_table_rejects_new_entries() {
        let mut t = SharedStringTable::with_capacity(2);
        assert_eq!(t.insert(&Bytes::from("a")), Some(0));
        assert_eq!(t.insert(&Bytes::from("b")), Some(1));
        assert_eq!(t.insert(&Bytes::from("c")), None);
        // existing entries still resolve
        assert_eq!(t.insert(&Bytes::from("a")), Some(0));
        assert_eq!(t.lookup(&Bytes::from("c")), None);
    }

    #[test]
    fn clear_resets_indexes() {
        let mut t = SharedStringTable::with_capacity(2);
        t.insert(&Bytes::from("a"));
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.insert(&Bytes::from("b")), Some(0));
    }
}
