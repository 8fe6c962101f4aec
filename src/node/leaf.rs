use std::fmt::Display;

/// A Leaf is a node that has no children and only holds its hash.
/// It is either a chunk of the serialized data or the root of a subtree
/// whose content is not materialized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf<const HASH_SIZE: usize> {
    node_hash: [u8; HASH_SIZE],
}

impl<const HASH_SIZE: usize> Leaf<HASH_SIZE> {
    pub fn new(node_hash: [u8; HASH_SIZE]) -> Self {
        Self { node_hash }
    }

    /// Returns the hash of the node. NO HASHING IS DONE HERE.
    pub fn hash(&self) -> [u8; HASH_SIZE] {
        self.node_hash
    }
}

impl<const HASH_SIZE: usize> Display for Leaf<HASH_SIZE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Leaf {{ hash: {} }}", hex::encode(self.hash().as_slice()))
    }
}
