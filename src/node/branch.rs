use std::fmt::Display;
use std::sync::{Arc, OnceLock};

use super::{Hasher, Node};

/// A branch is a node that has exactly 2 children.
///
/// Its root is computed on first request and kept for the lifetime of the branch.
/// Trees are immutable, so the cached value never goes stale. Concurrent first requests
/// block on a single computation.
#[derive(Debug, Clone)]
pub struct Branch<const HASH_SIZE: usize> {
    left: Arc<Node<HASH_SIZE>>,
    right: Arc<Node<HASH_SIZE>>,
    root: OnceLock<[u8; HASH_SIZE]>,
}

impl<const HASH_SIZE: usize> Branch<HASH_SIZE> {
    /// Creates a new [`Branch`]. No hashing is done until [`Branch::merkle_root`] is called.
    pub fn new(left: Node<HASH_SIZE>, right: Node<HASH_SIZE>) -> Self {
        Self::new_with_arc_children(Arc::new(left), Arc::new(right))
    }

    pub fn new_with_arc_children(
        left: Arc<Node<HASH_SIZE>>,
        right: Arc<Node<HASH_SIZE>>,
    ) -> Self {
        Self {
            left,
            right,
            root: OnceLock::new(),
        }
    }

    /// Root of this branch, hashing the children the first time only.
    ///
    /// A tree is meant to be merkleized with a single hasher: once stored, the root is
    /// returned whatever hasher is passed afterwards.
    pub fn merkle_root(&self, hasher: &impl Hasher<HASH_SIZE>) -> [u8; HASH_SIZE] {
        *self.root.get_or_init(|| {
            hasher.hash_pair(
                &self.left.merkle_root(hasher),
                &self.right.merkle_root(hasher),
            )
        })
    }

    /// Returns the root if it was already computed. NO HASHING IS DONE HERE.
    pub fn cached_root(&self) -> Option<[u8; HASH_SIZE]> {
        self.root.get().copied()
    }

    /// Returns the left and right children of this branch.
    pub fn children(&self) -> (&Arc<Node<HASH_SIZE>>, &Arc<Node<HASH_SIZE>>) {
        (&self.left, &self.right)
    }

    /// Returns the left children of this branch.
    pub fn left(&self) -> &Node<HASH_SIZE> {
        &self.left
    }

    /// Returns the right children of this branch.
    pub fn right(&self) -> &Node<HASH_SIZE> {
        &self.right
    }

    /// Whether both children are the same node instance.
    pub fn is_aliased(&self) -> bool {
        Arc::ptr_eq(&self.left, &self.right)
    }
}

impl<const HASH_SIZE: usize> Display for Branch<HASH_SIZE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.cached_root() {
            Some(root) => write!(f, "Branch {{ root: {} }}", hex::encode(root.as_slice())),
            None => write!(f, "Branch {{ root: <not computed> }}"),
        }
    }
}
