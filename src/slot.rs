//! Slot: one cell of the open-addressing array.
//!
//! A slot is in exactly one of three states. `Empty` terminates a probe,
//! `Tombstone` does not, and both tombstoned and live slots stay threaded on
//! the insertion-order chain until the next resize.

use crate::word::Word;

/// Index of the next slot in insertion order, `None` at the chain tail.
pub(crate) type Link = Option<usize>;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(crate) struct Entry<'k> {
    pub(crate) key: &'k [u8],
    pub(crate) hash: u32,
    pub(crate) value: Word,
    pub(crate) next: Link,
}

impl<'k> Entry<'k> {
    #[inline]
    pub(crate) fn matches(&self, key: &[u8], hash: u32) -> bool {
        self.hash == hash && self.key.len() == key.len() && self.key == key
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub(crate) enum Slot<'k> {
    #[default]
    Empty,
    Tombstone {
        next: Link,
    },
    Live(Entry<'k>),
}

impl<'k> Slot<'k> {
    #[inline]
    pub(crate) fn next(&self) -> Link {
        match self {
            Slot::Empty => None,
            Slot::Tombstone { next } => *next,
            Slot::Live(e) => e.next,
        }
    }

    /// Relinks a chained slot. Empty slots are never on the chain.
    #[inline]
    pub(crate) fn set_next(&mut self, link: Link) {
        match self {
            Slot::Empty => debug_assert!(false, "empty slot is not on the chain"),
            Slot::Tombstone { next } => *next = link,
            Slot::Live(e) => e.next = link,
        }
    }

    /// Turns a live slot into a tombstone, returning the entry it held.
    #[inline]
    pub(crate) fn bury(&mut self) -> Option<Entry<'k>> {
        match *self {
            Slot::Live(e) => {
                *self = Slot::Tombstone { next: e.next };
                Some(e)
            }
            _ => None,
        }
    }
}
