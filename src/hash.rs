//! Key hashing: an FNV-1a-style 64-bit mix over 8-byte blocks, folded to 32 bits.
//!
//! The digest is for bucket distribution only. It is deterministic for a
//! given byte sequence but makes no promise of stability across versions.

const SEED: u64 = 2166136261;
const BLOCK_MULTIPLIER: u64 = 0xbf58476d1ce4e5b9;
const TAIL_MULTIPLIER: u64 = 0xd6e8feb86659fd93;

/// Hashes `key` to the 32-bit digest cached in every live slot.
pub fn fold_hash(key: &[u8]) -> u32 {
    let mut hash = SEED;

    let mut blocks = key.chunks_exact(8);
    for block in &mut blocks {
        let mut word = [0u8; 8];
        word.copy_from_slice(block);
        hash ^= u64::from_le_bytes(word);
        hash = hash.wrapping_mul(BLOCK_MULTIPLIER);
    }

    let tail = blocks.remainder();
    if !tail.is_empty() {
        // Low byte carries the key length; tail byte i lands at bit 8 * (i + 1).
        let mut last = (key.len() & 0xff) as u64;
        for (i, &b) in tail.iter().enumerate() {
            last |= (b as u64) << (8 * (i + 1));
        }
        hash ^= last;
        hash = hash.wrapping_mul(TAIL_MULTIPLIER);
    }

    (hash ^ (hash >> 32)) as u32
}

/// Hash function seam for [`Table`](crate::Table).
///
/// Implementations must return the same digest for equal byte sequences for
/// as long as the table lives.
pub trait KeyHasher {
    fn hash_key(&self, key: &[u8]) -> u32;
}

/// The default hasher, backed by [`fold_hash`].
#[derive(Copy, Clone, Debug, Default)]
pub struct FoldHasher;

impl KeyHasher for FoldHasher {
    #[inline]
    fn hash_key(&self, key: &[u8]) -> u32 {
        fold_hash(key)
    }
}

impl<H: KeyHasher + ?Sized> KeyHasher for &H {
    #[inline]
    fn hash_key(&self, key: &[u8]) -> u32 {
        (**self).hash_key(key)
    }
}
