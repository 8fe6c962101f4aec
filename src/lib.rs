//! Generalized-index Merkle multiproofs
//!
//! This crate works on immutable binary Merkle trees addressed by generalized indices
//! (gindices), the path encoding used by SSZ: the root is `1` and the children of `n` are
//! `2n` and `2n + 1`.
//!
//! It provides:
//! - Gindex arithmetic and parsing
//! - A shared, memoizing tree [`Node`] with an injected [`Hasher`]
//! - Multiproofs: the minimal witnesses proving any set of nodes against the root
//! - JSON tree dumps with detection of aliased subtrees
//! - Merkleization of raw bytes into 32-byte chunk trees

mod dump;
mod error;
mod gindex;
mod node;
mod proof;
mod tree;

pub use dump::{dump, dump_subtree, TreeView};
pub use error::TreeError;
pub use gindex::{parse_gindex_list, Gindex};
pub use node::{Branch, Hasher, Leaf, Node, Sha256Hasher};
pub use proof::{compute_root, Multiproof, ProofEntry, Role, WitnessPlan};
pub use tree::{merkleize, min_depth, ZeroHashes, BYTES_PER_CHUNK, MAX_DEPTH};

#[cfg(test)]
mod tests;
