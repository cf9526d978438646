//! wordmap: a single-threaded, open-addressing hash table from borrowed
//! byte keys to word-sized values, traversed in insertion order.
//!
//! Internal Design:
//!
//! Summary
//! - Goal: a small embeddable map whose only allocation is one flat slot
//!   array, with deterministic iteration order.
//! - Layers:
//!   - `fold_hash` (in `hash`): FNV-1a-style 64-bit mix over 8-byte
//!     blocks, folded to a 32-bit digest that is cached per slot.
//!   - `Slot` (in `slot`): tri-state cell (empty, tombstone, live) that
//!     also carries the next-index link of the insertion-order chain.
//!   - `Table<'k, H>`: probe resolution, the insert family, tombstone
//!     removal, growth with full rehash; generic over `H: KeyHasher`.
//!
//! Constraints
//! - Keys are `&'k [u8]`; the table never copies or frees them and the
//!   lifetime makes the caller's storage outlive every entry.
//! - Values are a single `Word` (integer or opaque handle).
//! - `length < capacity` after every mutation, so every probe ends at an
//!   empty slot or a match.
//!
//! Probing and deletion
//! - Linear probing from `hash % capacity`. Tombstones do not stop a
//!   probe; only an empty slot does. New entries take the terminating
//!   empty slot, never a tombstone, because tombstones stay linked on the
//!   chain until the next resize.
//!
//! Growth
//! - An insert whose write could push `(length + 1) / capacity` past the
//!   configured load factor grows first. Growth multiplies capacity,
//!   walks the old chain once, drops tombstones, and re-probes each live
//!   entry by its cached hash into the new array in the same order.
//! - A failed allocation surfaces as `Error::AllocationFailed` and leaves
//!   the table as it was.
//!
//! Disposal
//! - `soft_insert` and `remove_with` take a closure that receives the old
//!   key reference and value before they leave the table; `drain` hands
//!   back every entry instead. Closure captures replace user-data
//!   pointers.
//!
//! Notes and non-goals
//! - No internal synchronization; mutation needs `&mut Table`.
//! - Capacity never shrinks.
//! - The hash is for distribution only.

mod config;
mod error;
mod hash;
mod iter;
mod slot;
mod table;
mod table_proptest;
mod word;

// Public surface
pub use config::Config;
pub use error::Error;
pub use hash::{fold_hash, FoldHasher, KeyHasher};
pub use iter::{Drain, Iter};
pub use table::{GetOrInsert, Table};
pub use word::Word;
