//! Merkleization of raw bytes.
//!
//! The buffer is cut into 32-byte chunks, the last one zero-padded. Chunk `i` becomes the
//! leaf at gindex `2^depth + i`. Leaves past the last chunk are zero; each maximal all-zero
//! subtree is kept as a single leaf carrying its zero root, so its inside is not
//! materialized and cannot be navigated into.
use crate::node::{Hasher, Node};
use crate::tree::ZeroHashes;
use crate::TreeError;

pub const BYTES_PER_CHUNK: usize = 32;

/// Deepest tree [`merkleize`] accepts.
pub const MAX_DEPTH: u32 = 32;

/// Smallest depth whose leaf level holds `chunks` chunks.
pub fn min_depth(chunks: usize) -> u32 {
    chunks.max(1).next_power_of_two().trailing_zeros()
}

/// Builds the tree of `data` with its chunks at `depth`, or at the smallest depth that fits
/// them all when `depth` is `None`.
pub fn merkleize(
    data: &[u8],
    depth: Option<u32>,
    hasher: &impl Hasher<32>,
) -> Result<Node<32>, TreeError> {
    let chunks: Vec<[u8; BYTES_PER_CHUNK]> = data
        .chunks(BYTES_PER_CHUNK)
        .map(|bytes| {
            let mut chunk = [0; BYTES_PER_CHUNK];
            chunk[..bytes.len()].copy_from_slice(bytes);
            chunk
        })
        .collect();
    let min = min_depth(chunks.len());
    let depth = depth.unwrap_or(min);
    if depth < min || depth > MAX_DEPTH {
        return Err(TreeError::InvalidDepth {
            depth,
            chunks: chunks.len(),
        });
    }
    let zero = ZeroHashes::new(hasher, depth);
    Ok(subtree(&chunks, depth, &zero))
}

fn subtree(chunks: &[[u8; BYTES_PER_CHUNK]], height: u32, zero: &ZeroHashes<32>) -> Node<32> {
    if chunks.is_empty() {
        // heights never exceed the table
        return Node::new_leaf(zero.at(height).unwrap_or_default());
    }
    if height == 0 {
        return Node::new_leaf(chunks[0]);
    }
    let half = (1usize << (height - 1)).min(chunks.len());
    let (left, right) = chunks.split_at(half);
    Node::new_branch(
        subtree(left, height - 1, zero),
        subtree(right, height - 1, zero),
    )
}
