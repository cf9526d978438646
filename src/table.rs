//! Table: open-addressing storage, linear probing, tombstones, growth and
//! the insertion-order chain.

use crate::config::Config;
use crate::error::Error;
use crate::hash::{FoldHasher, KeyHasher};
use crate::iter::{Drain, Iter};
use crate::slot::{Entry, Link, Slot};
use crate::word::Word;
use core::fmt;
use core::mem;

/// Outcome of [`Table::get_or_insert`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum GetOrInsert {
    /// The key was live; carries its stored value. The offered value was discarded.
    Existed(Word),
    /// The key was absent and now maps to the offered value.
    Inserted(Word),
}

impl GetOrInsert {
    /// The value the key maps to after the call.
    #[inline]
    pub fn value(self) -> Word {
        match self {
            GetOrInsert::Existed(v) | GetOrInsert::Inserted(v) => v,
        }
    }

    #[inline]
    pub fn existed(self) -> bool {
        matches!(self, GetOrInsert::Existed(_))
    }
}

enum Probe {
    Occupied(usize),
    Vacant(usize),
}

/// Hash table from borrowed byte keys to [`Word`] values.
///
/// Keys are borrowed for `'k` and never copied or freed; the table owns only
/// its slot array. Iteration follows first-insertion order.
pub struct Table<'k, H = FoldHasher> {
    pub(crate) slots: Vec<Slot<'k>>,
    // Slots written since the last resize, tombstones included.
    length: usize,
    tombstones: usize,
    pub(crate) head: Link,
    tail: Link,
    config: Config,
    hasher: H,
}

impl<'k> Table<'k> {
    /// Creates an empty table with the default [`Config`].
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// # Panics
    ///
    /// Panics if `config` fails [`Config::validate`] or the slot array cannot
    /// be allocated. Use [`Table::try_with_config`] to handle either case.
    pub fn with_config(config: Config) -> Self {
        Self::with_config_and_hasher(config, FoldHasher)
    }

    pub fn try_with_config(config: Config) -> Result<Self, Error> {
        Self::try_with_config_and_hasher(config, FoldHasher)
    }
}

impl Default for Table<'_> {
    fn default() -> Self {
        Self::new()
    }
}

// Appends `index` to the chain described by `head`/`tail`. A `None` tail
// means the chain is empty and the head itself is the link to fill.
fn append(slots: &mut [Slot<'_>], head: &mut Link, tail: &mut Link, index: usize) {
    match *tail {
        Some(t) => slots[t].set_next(Some(index)),
        None => *head = Some(index),
    }
    *tail = Some(index);
}

fn alloc_slots<'k>(capacity: usize) -> Result<Vec<Slot<'k>>, Error> {
    let mut slots = Vec::new();
    if let Err(source) = slots.try_reserve_exact(capacity) {
        tracing::warn!(capacity, "slot array allocation failed");
        return Err(Error::AllocationFailed { capacity, source });
    }
    slots.resize(capacity, Slot::Empty);
    Ok(slots)
}

impl<'k, H: KeyHasher> Table<'k, H> {
    pub fn with_hasher(hasher: H) -> Self {
        Self::with_config_and_hasher(Config::default(), hasher)
    }

    /// # Panics
    ///
    /// Same conditions as [`Table::with_config`].
    pub fn with_config_and_hasher(config: Config, hasher: H) -> Self {
        match Self::try_with_config_and_hasher(config, hasher) {
            Ok(t) => t,
            Err(e) => panic!("cannot create table: {e}"),
        }
    }

    pub fn try_with_config_and_hasher(config: Config, hasher: H) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self {
            slots: alloc_slots(config.initial_capacity)?,
            length: 0,
            tombstones: 0,
            head: None,
            tail: None,
            config,
            hasher,
        })
    }

    /// Number of live entries.
    #[inline]
    pub fn len(&self) -> usize {
        self.length - self.tombstones
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of slots in the backing array.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[inline]
    pub fn hasher(&self) -> &H {
        &self.hasher
    }

    fn probe(&self, key: &[u8], hash: u32) -> Probe {
        let capacity = self.slots.len();
        let mut index = hash as usize % capacity;
        // Terminates: `length < capacity` leaves at least one empty slot.
        loop {
            match &self.slots[index] {
                Slot::Empty => return Probe::Vacant(index),
                Slot::Live(e) if e.matches(key, hash) => return Probe::Occupied(index),
                _ => {}
            }
            index += 1;
            if index == capacity {
                index = 0;
            }
        }
    }

    fn find_index(&self, key: &[u8]) -> Option<usize> {
        let hash = self.hasher.hash_key(key);
        match self.probe(key, hash) {
            Probe::Occupied(i) => Some(i),
            Probe::Vacant(_) => None,
        }
    }

    fn entry_mut(&mut self, index: usize) -> &mut Entry<'k> {
        match &mut self.slots[index] {
            Slot::Live(e) => e,
            _ => unreachable!("probe reported a live slot"),
        }
    }

    fn reserve_one(&mut self) -> Result<(), Error> {
        if self.config.needs_growth(self.length, self.slots.len()) {
            self.resize()?;
        }
        Ok(())
    }

    fn occupy(&mut self, index: usize, key: &'k [u8], hash: u32, value: Word) {
        self.slots[index] = Slot::Live(Entry {
            key,
            hash,
            value,
            next: None,
        });
        append(&mut self.slots, &mut self.head, &mut self.tail, index);
        self.length += 1;
    }

    /// Returns the value bound to `key`, if it is live.
    pub fn get<K>(&self, key: &K) -> Option<Word>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let index = self.find_index(key.as_ref())?;
        match &self.slots[index] {
            Slot::Live(e) => Some(e.value),
            _ => None,
        }
    }

    pub fn contains_key<K>(&self, key: &K) -> bool
    where
        K: AsRef<[u8]> + ?Sized,
    {
        self.find_index(key.as_ref()).is_some()
    }

    /// Binds `key` to `value`, growing first if the write could exceed the
    /// load factor.
    ///
    /// Overwriting a live key replaces only the value; the stored key
    /// reference and the entry's place in iteration order are kept. Returns
    /// the previous value in that case.
    pub fn insert<K>(&mut self, key: &'k K, value: Word) -> Result<Option<Word>, Error>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        self.reserve_one()?;
        let key = key.as_ref();
        let hash = self.hasher.hash_key(key);
        match self.probe(key, hash) {
            Probe::Vacant(i) => {
                self.occupy(i, key, hash, value);
                Ok(None)
            }
            Probe::Occupied(i) => Ok(Some(mem::replace(&mut self.entry_mut(i).value, value))),
        }
    }

    /// Looks `key` up and binds it to `value` only if it was absent.
    pub fn get_or_insert<K>(&mut self, key: &'k K, value: Word) -> Result<GetOrInsert, Error>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        self.reserve_one()?;
        let key = key.as_ref();
        let hash = self.hasher.hash_key(key);
        match self.probe(key, hash) {
            Probe::Vacant(i) => {
                self.occupy(i, key, hash, value);
                Ok(GetOrInsert::Inserted(value))
            }
            Probe::Occupied(i) => Ok(GetOrInsert::Existed(self.entry_mut(i).value)),
        }
    }

    /// Like [`insert`](Self::insert), but an overwrite first hands the old
    /// key reference and value to `dispose`, then replaces both the stored
    /// key reference and the value. A fresh insert does not call `dispose`.
    pub fn soft_insert<K, F>(&mut self, key: &'k K, value: Word, dispose: F) -> Result<(), Error>
    where
        K: AsRef<[u8]> + ?Sized,
        F: FnOnce(&'k [u8], Word),
    {
        self.reserve_one()?;
        let key = key.as_ref();
        let hash = self.hasher.hash_key(key);
        match self.probe(key, hash) {
            Probe::Vacant(i) => self.occupy(i, key, hash, value),
            Probe::Occupied(i) => {
                let entry = self.entry_mut(i);
                dispose(entry.key, entry.value);
                entry.key = key;
                entry.value = value;
            }
        }
        Ok(())
    }

    /// Removes `key`, returning its value. Absent keys are a no-op.
    ///
    /// The slot becomes a tombstone: probes continue through it and it stays
    /// allocated until the next resize.
    pub fn remove<K>(&mut self, key: &K) -> Option<Word>
    where
        K: AsRef<[u8]> + ?Sized,
    {
        let index = self.find_index(key.as_ref())?;
        let entry = self.slots[index].bury()?;
        self.tombstones += 1;
        Some(entry.value)
    }

    /// Removes `key`, handing its stored key reference and value to
    /// `dispose` first. Returns whether an entry was removed.
    pub fn remove_with<K, F>(&mut self, key: &K, dispose: F) -> bool
    where
        K: AsRef<[u8]> + ?Sized,
        F: FnOnce(&'k [u8], Word),
    {
        let Some(index) = self.find_index(key.as_ref()) else {
            return false;
        };
        let entry = *self.entry_mut(index);
        dispose(entry.key, entry.value);
        self.slots[index].bury();
        self.tombstones += 1;
        true
    }

    /// Grows the slot array by the configured growth factor and rehashes.
    ///
    /// Live entries are placed by their cached hash in original insertion
    /// order; tombstones are dropped. On error the table is unchanged.
    pub fn resize(&mut self) -> Result<(), Error> {
        let old_capacity = self.slots.len();
        let new_capacity = self.config.grown_capacity(old_capacity)?;
        let mut slots = alloc_slots(new_capacity)?;

        let mut head = None;
        let mut tail = None;
        let mut live = 0;
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let slot = self.slots[index];
            cursor = slot.next();
            let Slot::Live(entry) = slot else {
                continue;
            };

            let mut to = entry.hash as usize % new_capacity;
            while !matches!(slots[to], Slot::Empty) {
                to = (to + 1) % new_capacity;
            }
            slots[to] = Slot::Live(Entry { next: None, ..entry });
            append(&mut slots, &mut head, &mut tail, to);
            live += 1;
        }
        debug_assert_eq!(live, self.len());

        tracing::debug!(
            old_capacity,
            new_capacity,
            live,
            dropped_tombstones = self.tombstones,
            "table resized"
        );

        self.slots = slots;
        self.head = head;
        self.tail = tail;
        self.length = live;
        self.tombstones = 0;
        Ok(())
    }

    /// Live entries in insertion order.
    pub fn iter(&self) -> Iter<'_, 'k> {
        Iter::new(&self.slots, self.head, self.len())
    }

    /// Calls `visitor` with each live key and value in insertion order.
    pub fn for_each<F>(&self, mut visitor: F)
    where
        F: FnMut(&'k [u8], Word),
    {
        for (key, value) in self.iter() {
            visitor(key, value);
        }
    }

    /// Yields every live entry in insertion order and leaves the table empty.
    /// Capacity is kept. The table is emptied when the `Drain` is dropped,
    /// whether or not it was fully consumed.
    pub fn drain(&mut self) -> Drain<'_, 'k, H> {
        Drain::new(self)
    }

    /// Drops every entry without visiting it. Capacity is kept.
    pub fn clear(&mut self) {
        self.slots.fill(Slot::Empty);
        self.length = 0;
        self.tombstones = 0;
        self.head = None;
        self.tail = None;
    }

    #[cfg(test)]
    pub(crate) fn tombstones(&self) -> usize {
        self.tombstones
    }

    #[cfg(test)]
    pub(crate) fn written(&self) -> usize {
        self.length
    }
}

impl<'a, 'k, H: KeyHasher> IntoIterator for &'a Table<'k, H> {
    type Item = (&'k [u8], Word);
    type IntoIter = Iter<'a, 'k>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<H: KeyHasher> fmt::Debug for Table<'_, H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map()
            .entries(
                self.iter()
                    .map(|(k, v)| (String::from_utf8_lossy(k), v.get())),
            )
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Clone, Default)]
    struct ConstHasher;
    impl KeyHasher for ConstHasher {
        fn hash_key(&self, _key: &[u8]) -> u32 {
            0 // force all keys onto one probe run
        }
    }

    fn w(v: usize) -> Word {
        Word::new(v)
    }

    fn keys_in_order<'k, H: KeyHasher>(t: &Table<'k, H>) -> Vec<&'k [u8]> {
        t.iter().map(|(k, _)| k).collect()
    }

    /// Invariant: a fresh table has the default capacity and no entries.
    #[test]
    fn new_table_is_empty() {
        let t = Table::new();
        assert_eq!(t.len(), 0);
        assert!(t.is_empty());
        assert_eq!(t.capacity(), Config::DEFAULT_CAPACITY);
        assert_eq!(t.iter().count(), 0);
        assert!(t.get("missing").is_none());
    }

    /// Invariant: `insert` then `get` returns the bound value; absent keys miss.
    #[test]
    fn insert_then_get() {
        let mut t = Table::new();
        assert_eq!(t.insert("hello", w(1)).unwrap(), None);
        assert_eq!(t.insert("world", w(2)).unwrap(), None);
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("hello"), Some(w(1)));
        assert_eq!(t.get(b"world"), Some(w(2)));
        assert_eq!(t.get("!"), None);
        assert!(t.contains_key("hello"));
        assert!(!t.contains_key("hell"));
    }

    /// Invariant: a stored zero word is a live value, not an empty slot.
    #[test]
    fn zero_value_is_live() {
        let mut t = Table::new();
        t.insert("zero", Word::ZERO).unwrap();
        assert_eq!(t.get("zero"), Some(Word::ZERO));
        assert_eq!(t.len(), 1);
        assert_eq!(t.remove("zero"), Some(Word::ZERO));
        assert!(t.get("zero").is_none());
    }

    /// Invariant: the empty byte string is an ordinary key.
    #[test]
    fn empty_key() {
        let mut t = Table::new();
        t.insert("", w(5)).unwrap();
        assert_eq!(t.get(""), Some(w(5)));
        assert!(t.get("x").is_none());
    }

    /// Invariant: overwriting keeps `len`, returns the old value, keeps the
    /// first key reference and the entry's position in iteration order.
    #[test]
    fn overwrite_keeps_key_reference_and_order() {
        let first = String::from("k");
        let second = String::from("k");
        let mut t = Table::new();
        t.insert(first.as_str(), w(1)).unwrap();
        t.insert("other", w(2)).unwrap();
        assert_eq!(t.insert(second.as_str(), w(3)).unwrap(), Some(w(1)));
        assert_eq!(t.len(), 2);
        assert_eq!(t.get("k"), Some(w(3)));

        let (k, v) = t.iter().next().unwrap();
        assert_eq!(k.as_ptr(), first.as_ptr());
        assert_eq!(v, w(3));
        assert_eq!(keys_in_order(&t), vec![b"k".as_slice(), b"other"]);
    }

    /// Invariant: removing tombstones the slot; counters track it and absent
    /// removes change nothing.
    #[test]
    fn remove_tombstones_slot() {
        let mut t = Table::new();
        t.insert("a", w(1)).unwrap();
        t.insert("b", w(2)).unwrap();
        assert_eq!(t.remove("a"), Some(w(1)));
        assert_eq!(t.len(), 1);
        assert_eq!(t.written(), 2);
        assert_eq!(t.tombstones(), 1);

        assert_eq!(t.remove("a"), None);
        assert_eq!(t.remove("nope"), None);
        assert_eq!(t.len(), 1);
        assert_eq!(t.tombstones(), 1);
        assert_eq!(keys_in_order(&t), vec![b"b".as_slice()]);
    }

    /// Invariant: probes continue past tombstones, so entries further along a
    /// collision run stay reachable after an earlier one is removed.
    #[test]
    fn lookup_skips_tombstones() {
        let mut t = Table::with_hasher(ConstHasher);
        assert_eq!(t.hasher().hash_key(b"anything"), 0);
        t.insert("a", w(1)).unwrap();
        t.insert("b", w(2)).unwrap();
        t.insert("c", w(3)).unwrap();
        t.remove("a");
        t.remove("b");
        assert_eq!(t.get("c"), Some(w(3)));
        assert!(t.get("a").is_none());
        assert!(t.get("b").is_none());
    }

    /// Invariant: distinct keys with identical hashes resolve independently.
    #[test]
    fn collisions_resolve_by_bytes() {
        let mut t = Table::with_hasher(ConstHasher);
        let keys = ["ab", "ba", "abc", "a", ""];
        for (i, k) in keys.iter().enumerate() {
            t.insert(*k, w(i)).unwrap();
        }
        for (i, k) in keys.iter().enumerate() {
            assert_eq!(t.get(*k), Some(w(i)));
        }
        assert_eq!(t.len(), keys.len());
    }

    /// Invariant: re-inserting a removed key takes a fresh slot at the end of
    /// iteration order; the tombstone stays until resize.
    #[test]
    fn reinsert_after_remove_moves_to_end() {
        let mut t = Table::new();
        t.insert("a", w(1)).unwrap();
        t.insert("b", w(2)).unwrap();
        t.remove("a");
        t.insert("a", w(3)).unwrap();
        assert_eq!(t.len(), 2);
        assert_eq!(t.written(), 3);
        assert_eq!(keys_in_order(&t), vec![b"b".as_slice(), b"a"]);
        assert_eq!(t.get("a"), Some(w(3)));
    }

    /// Invariant: the insert that would cross the load factor grows the
    /// table first; with defaults that is the 23rd write into 30 slots.
    #[test]
    fn grows_at_load_factor() {
        let keys: Vec<String> = (0..23).map(|i| format!("key{i}")).collect();
        let mut t = Table::new();
        for (i, k) in keys.iter().take(22).enumerate() {
            t.insert(k.as_str(), w(i)).unwrap();
        }
        assert_eq!(t.capacity(), 30);
        t.insert(keys[22].as_str(), w(22)).unwrap();
        assert_eq!(t.capacity(), 60);
        assert_eq!(t.len(), 23);
        for (i, k) in keys.iter().enumerate() {
            assert_eq!(t.get(k.as_str()), Some(w(i)));
        }
    }

    /// Invariant: resize drops tombstones, resets counters, and keeps the
    /// surviving entries in insertion order.
    #[test]
    fn resize_drops_tombstones_and_keeps_order() {
        let mut t = Table::new();
        for k in ["a", "b", "c", "d"] {
            t.insert(k, w(k.len())).unwrap();
        }
        t.remove("b");
        t.remove("d");
        assert_eq!(t.tombstones(), 2);

        t.resize().unwrap();
        assert_eq!(t.capacity(), 60);
        assert_eq!(t.tombstones(), 0);
        assert_eq!(t.written(), 2);
        assert_eq!(t.len(), 2);
        assert_eq!(keys_in_order(&t), vec![b"a".as_slice(), b"c"]);

        // The chain tail is valid after resize: appends land at the end.
        t.insert("e", w(5)).unwrap();
        assert_eq!(keys_in_order(&t), vec![b"a".as_slice(), b"c", b"e"]);
    }

    /// Invariant: resize of a table whose chain tail is a tombstone rebuilds
    /// a chain ending at the last live entry.
    #[test]
    fn resize_with_tombstoned_tail() {
        let mut t = Table::with_hasher(ConstHasher);
        t.insert("a", w(1)).unwrap();
        t.insert("z", w(2)).unwrap();
        t.remove("z");
        t.insert("y", w(3)).unwrap();
        assert_eq!(keys_in_order(&t), vec![b"a".as_slice(), b"y"]);
        t.resize().unwrap();
        t.insert("x", w(4)).unwrap();
        assert_eq!(keys_in_order(&t), vec![b"a".as_slice(), b"y", b"x"]);
    }

    /// Invariant: `get_or_insert` reports existence and never replaces a live value.
    #[test]
    fn get_or_insert_semantics() {
        let mut t = Table::new();
        let r = t.get_or_insert("k", w(1)).unwrap();
        assert_eq!(r, GetOrInsert::Inserted(w(1)));
        assert!(!r.existed());

        let r = t.get_or_insert("k", w(2)).unwrap();
        assert_eq!(r, GetOrInsert::Existed(w(1)));
        assert!(r.existed());
        assert_eq!(r.value(), w(1));
        assert_eq!(t.get("k"), Some(w(1)));
        assert_eq!(t.len(), 1);
    }

    /// Invariant: `soft_insert` disposes of the previous key and value on
    /// overwrite only, then stores the new key reference.
    #[test]
    fn soft_insert_disposes_on_overwrite() {
        let first = String::from("k");
        let second = String::from("k");
        let disposed = RefCell::new(Vec::new());
        let mut t = Table::new();

        t.soft_insert(first.as_str(), w(1), |k, v| disposed.borrow_mut().push((k, v)))
            .unwrap();
        assert!(disposed.borrow().is_empty());

        t.soft_insert(second.as_str(), w(2), |k, v| disposed.borrow_mut().push((k, v)))
            .unwrap();
        let seen = disposed.borrow();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0.as_ptr(), first.as_ptr());
        assert_eq!(seen[0].1, w(1));

        let (k, v) = t.iter().next().unwrap();
        assert_eq!(k.as_ptr(), second.as_ptr());
        assert_eq!(v, w(2));
        assert_eq!(t.len(), 1);
    }

    /// Invariant: `remove_with` hands the entry to the callback exactly once
    /// and does nothing for absent keys.
    #[test]
    fn remove_with_disposes_once() {
        let mut calls = Vec::new();
        let mut t = Table::new();
        t.insert("k", w(9)).unwrap();

        assert!(t.remove_with("k", |k, v| calls.push((k.to_vec(), v))));
        assert!(!t.remove_with("k", |k, v| calls.push((k.to_vec(), v))));
        assert!(!t.remove_with("never", |k, v| calls.push((k.to_vec(), v))));
        assert_eq!(calls, vec![(b"k".to_vec(), w(9))]);
        assert!(t.is_empty());
        assert_eq!(t.tombstones(), 1);
    }

    /// Invariant: `for_each` visits the same live entries, in the same order, as `iter`.
    #[test]
    fn for_each_matches_iter() {
        let mut t = Table::new();
        for (i, k) in ["x", "y", "z"].iter().enumerate() {
            t.insert(*k, w(i)).unwrap();
        }
        t.remove("y");
        let mut seen = Vec::new();
        t.for_each(|k, v| seen.push((k, v)));
        let expected: Vec<_> = t.iter().collect();
        assert_eq!(seen, expected);
        assert_eq!(seen, vec![(b"x".as_slice(), w(0)), (b"z".as_slice(), w(2))]);
        assert_eq!((&t).into_iter().len(), 2);
    }

    /// Invariant: draining yields live entries in order and leaves an empty
    /// table with its capacity; the table is reusable afterwards.
    #[test]
    fn drain_empties_in_order() {
        let mut t = Table::new();
        for (i, k) in ["a", "b", "c"].iter().enumerate() {
            t.insert(*k, w(i)).unwrap();
        }
        t.remove("b");
        let drained: Vec<_> = t.drain().collect();
        assert_eq!(drained, vec![(b"a".as_slice(), w(0)), (b"c".as_slice(), w(2))]);
        assert!(t.is_empty());
        assert_eq!(t.written(), 0);
        assert_eq!(t.tombstones(), 0);
        assert_eq!(t.capacity(), 30);
        assert!(t.get("a").is_none());

        t.insert("d", w(3)).unwrap();
        assert_eq!(keys_in_order(&t), vec![b"d".as_slice()]);
    }

    /// Invariant: a partially consumed drain still empties the table when dropped.
    #[test]
    fn partial_drain_clears() {
        let mut t = Table::new();
        t.insert("a", w(1)).unwrap();
        t.insert("b", w(2)).unwrap();
        {
            let mut d = t.drain();
            assert_eq!(d.len(), 2);
            assert_eq!(d.next(), Some((b"a".as_slice(), w(1))));
            assert_eq!(d.len(), 1);
        }
        assert!(t.is_empty());
        assert!(t.get("b").is_none());
    }

    /// Invariant: a leaked drain leaves the table exactly as it was.
    #[test]
    fn forgotten_drain_leaves_table_intact() {
        let mut t = Table::new();
        t.insert("a", w(1)).unwrap();
        let mut d = t.drain();
        let _ = d.next();
        mem::forget(d);
        assert_eq!(t.len(), 1);
        assert_eq!(t.get("a"), Some(w(1)));
    }

    /// Invariant: `clear` drops everything, keeps capacity and resets the chain.
    #[test]
    fn clear_resets() {
        let mut t = Table::new();
        for i in 0..40usize {
            t.insert("same", w(i)).unwrap();
        }
        t.insert("b", w(1)).unwrap();
        let cap = t.capacity();
        t.clear();
        assert!(t.is_empty());
        assert_eq!(t.capacity(), cap);
        assert_eq!(t.iter().count(), 0);
        t.insert("c", w(2)).unwrap();
        assert_eq!(keys_in_order(&t), vec![b"c".as_slice()]);
    }

    /// Invariant: invalid configs are rejected by `try_*` constructors.
    #[test]
    fn try_with_config_rejects_invalid() {
        assert!(matches!(
            Table::try_with_config(Config::new().with_initial_capacity(0)),
            Err(Error::ZeroCapacity)
        ));
        assert!(matches!(
            Table::try_with_config(Config::new().with_max_load_factor(1.0)),
            Err(Error::InvalidLoadFactor(_))
        ));
        assert!(matches!(
            Table::try_with_config(Config::new().with_growth_factor(0)),
            Err(Error::InvalidGrowthFactor(0))
        ));
    }

    /// Invariant: an unsatisfiable slot array is reported as an allocation error.
    #[test]
    fn oversized_array_is_allocation_error() {
        let r = Table::try_with_config(Config::new().with_initial_capacity(usize::MAX / 2));
        assert!(matches!(
            r,
            Err(Error::AllocationFailed { capacity, .. }) if capacity == usize::MAX / 2
        ));
    }

    /// Invariant: a growth whose slot array cannot be allocated reports
    /// `AllocationFailed` and leaves the table exactly as it was.
    #[test]
    fn failed_growth_leaves_table_unchanged() {
        let config = Config::new()
            .with_initial_capacity(4)
            .with_max_load_factor(0.5)
            .with_growth_factor(usize::MAX / 8);
        let mut t = Table::with_config(config);
        t.insert("a", w(1)).unwrap();
        t.insert("b", w(2)).unwrap();
        let (written, tombstones) = (t.written(), t.tombstones());

        // Third write would exceed 0.5 * 4, so growth is attempted and fails.
        let r = t.insert("c", w(3));
        assert!(matches!(
            r,
            Err(Error::AllocationFailed { capacity, .. }) if capacity == 4 * (usize::MAX / 8)
        ));
        assert_eq!(t.capacity(), 4);
        assert_eq!(t.len(), 2);
        assert_eq!(t.written(), written);
        assert_eq!(t.tombstones(), tombstones);
        assert_eq!(t.get("a"), Some(w(1)));
        assert_eq!(t.get("b"), Some(w(2)));
        assert!(t.get("c").is_none());
        assert_eq!(keys_in_order(&t), vec![b"a".as_slice(), b"b".as_slice()]);
    }

    /// Invariant: a growth factor that overflows the capacity is reported by
    /// `resize` without touching the table.
    #[test]
    fn overflowing_growth_is_reported() {
        let config = Config::new()
            .with_initial_capacity(4)
            .with_growth_factor(usize::MAX);
        let mut t = Table::with_config(config);
        t.insert("a", w(1)).unwrap();
        assert!(matches!(t.resize(), Err(Error::CapacityOverflow)));
        assert_eq!(t.capacity(), 4);
        assert_eq!(t.len(), 1);
        assert_eq!(t.get("a"), Some(w(1)));
    }

    #[test]
    #[should_panic(expected = "cannot create table")]
    fn with_config_panics_on_invalid() {
        let _ = Table::with_config(Config::new().with_initial_capacity(0));
    }

    /// Invariant: a tiny table with a custom growth factor still honors
    /// `length < capacity` and finds every key.
    #[test]
    fn custom_config_growth() {
        let config = Config::new()
            .with_initial_capacity(1)
            .with_max_load_factor(0.5)
            .with_growth_factor(3);
        let keys: Vec<String> = (0..50).map(|i| i.to_string()).collect();
        let mut t = Table::with_config(config);
        for (i, k) in keys.iter().enumerate() {
            t.insert(k.as_str(), w(i)).unwrap();
            assert!(t.written() < t.capacity());
        }
        assert_eq!(t.capacity() % 3, 0);
        for (i, k) in keys.iter().enumerate() {
            assert_eq!(t.get(k.as_str()), Some(w(i)));
        }
    }

    /// Invariant: `Debug` renders entries in insertion order.
    #[test]
    fn debug_lists_entries_in_order() {
        let mut t = Table::new();
        t.insert("b", w(2)).unwrap();
        t.insert("a", w(1)).unwrap();
        assert_eq!(format!("{t:?}"), r#"{"b": 2, "a": 1}"#);
    }
}
