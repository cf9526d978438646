//! Insertion-order traversal by following the slot chain.

use crate::hash::KeyHasher;
use crate::slot::{Link, Slot};
use crate::table::Table;
use crate::word::Word;
use core::iter::FusedIterator;

/// Iterator over live entries of a [`Table`] in insertion order.
pub struct Iter<'a, 'k> {
    slots: &'a [Slot<'k>],
    cursor: Link,
    remaining: usize,
}

impl<'a, 'k> Iter<'a, 'k> {
    pub(crate) fn new(slots: &'a [Slot<'k>], head: Link, live: usize) -> Self {
        Self {
            slots,
            cursor: head,
            remaining: live,
        }
    }
}

impl<'a, 'k> Iterator for Iter<'a, 'k> {
    type Item = (&'k [u8], Word);

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.cursor {
            let slot = &self.slots[index];
            self.cursor = slot.next();
            if let Slot::Live(e) = slot {
                self.remaining -= 1;
                return Some((e.key, e.value));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_, '_> {}
impl FusedIterator for Iter<'_, '_> {}

impl Clone for Iter<'_, '_> {
    fn clone(&self) -> Self {
        Self {
            slots: self.slots,
            cursor: self.cursor,
            remaining: self.remaining,
        }
    }
}

/// Draining iterator returned by [`Table::drain`].
///
/// Slots are only read while iterating; the table is cleared when the
/// `Drain` is dropped. Leaking it leaves the table untouched.
pub struct Drain<'a, 'k, H: KeyHasher> {
    table: &'a mut Table<'k, H>,
    cursor: Link,
    remaining: usize,
}

impl<'a, 'k, H: KeyHasher> Drain<'a, 'k, H> {
    pub(crate) fn new(table: &'a mut Table<'k, H>) -> Self {
        let cursor = table.head;
        let remaining = table.len();
        Self {
            table,
            cursor,
            remaining,
        }
    }
}

impl<'k, H: KeyHasher> Iterator for Drain<'_, 'k, H> {
    type Item = (&'k [u8], Word);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(index) = self.cursor {
            let slot = self.table.slots[index];
            self.cursor = slot.next();
            if let Slot::Live(e) = slot {
                self.remaining -= 1;
                return Some((e.key, e.value));
            }
        }
        None
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<H: KeyHasher> ExactSizeIterator for Drain<'_, '_, H> {}
impl<H: KeyHasher> FusedIterator for Drain<'_, '_, H> {}

impl<H: KeyHasher> Drop for Drain<'_, '_, H> {
    fn drop(&mut self) {
        self.table.clear();
    }
}
