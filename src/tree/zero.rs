//! Roots of all-zero subtrees
use crate::node::Hasher;

/// Roots of all-zero subtrees, indexed by height: `0` is the zero chunk, `h` is the root of a
/// subtree of `2^h` zero chunks.
#[derive(Debug, Clone)]
pub struct ZeroHashes<const HASH_SIZE: usize> {
    hashes: Vec<[u8; HASH_SIZE]>,
}

impl<const HASH_SIZE: usize> ZeroHashes<HASH_SIZE> {
    /// Computes the zero roots for heights `0..=max_height`.
    pub fn new(hasher: &impl Hasher<HASH_SIZE>, max_height: u32) -> Self {
        let mut hashes = Vec::with_capacity(max_height as usize + 1);
        hashes.push([0; HASH_SIZE]);
        for i in 1..=max_height as usize {
            let below = hashes[i - 1];
            hashes.push(hasher.hash_pair(&below, &below));
        }
        Self { hashes }
    }

    /// Root of a zero subtree of the given height, if it was computed.
    pub fn at(&self, height: u32) -> Option<[u8; HASH_SIZE]> {
        self.hashes.get(height as usize).copied()
    }

    pub fn max_height(&self) -> u32 {
        (self.hashes.len() - 1) as u32
    }
}
