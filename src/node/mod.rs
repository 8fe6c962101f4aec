mod branch;
mod leaf;

use std::fmt::{Debug, Display};
use std::sync::Arc;

use sha2::{Digest, Sha256};

pub use branch::Branch;
pub use leaf::Leaf;

use crate::{Gindex, TreeError};

/// Hash function combining two child roots into their parent's root.
///
/// It is passed explicitly to every call that computes roots. Any
/// `Fn(&[u8; N], &[u8; N]) -> [u8; N]` closure is a hasher.
///
/// # Type Parameters
/// * `HASH_SIZE` - The size of the hash digest in bytes
pub trait Hasher<const HASH_SIZE: usize> {
    fn hash_pair(&self, left: &[u8; HASH_SIZE], right: &[u8; HASH_SIZE]) -> [u8; HASH_SIZE];
}

impl<const HASH_SIZE: usize, F> Hasher<HASH_SIZE> for F
where
    F: Fn(&[u8; HASH_SIZE], &[u8; HASH_SIZE]) -> [u8; HASH_SIZE],
{
    fn hash_pair(&self, left: &[u8; HASH_SIZE], right: &[u8; HASH_SIZE]) -> [u8; HASH_SIZE] {
        self(left, right)
    }
}

/// `sha256(left || right)`, the SSZ merkleization hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl Hasher<32> for Sha256Hasher {
    fn hash_pair(&self, left: &[u8; 32], right: &[u8; 32]) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize().into()
    }
}

/// A node of an immutable binary Merkle tree.
///
/// Subtrees are shared through [`Arc`], so the same node may appear in several trees.
/// It must never be both children of one branch though; see [`crate::dump`].
///
/// # Type Parameters
/// * `HASH_SIZE` - The size of the hash digest in bytes
#[derive(Clone)]
pub enum Node<const HASH_SIZE: usize> {
    /// A node holding its hash and nothing else
    Leaf(Leaf<HASH_SIZE>),
    /// A node with two children
    Branch(Branch<HASH_SIZE>),
}

impl<const HASH_SIZE: usize> Debug for Node<HASH_SIZE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leaf(leaf) => write!(f, "Leaf {{ hash: {:?} }}", leaf.hash()),
            Self::Branch(branch) => write!(f, "Branch {{ root: {:?} }}", branch.cached_root()),
        }
    }
}

impl<const HASH_SIZE: usize> Display for Node<HASH_SIZE> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Leaf(leaf) => write!(f, "{}", leaf),
            Self::Branch(branch) => write!(f, "{}", branch),
        }
    }
}

impl<const HASH_SIZE: usize> Node<HASH_SIZE> {
    /// Creates a [`Node::Leaf`] holding `hash`
    pub fn new_leaf(hash: [u8; HASH_SIZE]) -> Self {
        Self::Leaf(Leaf::new(hash))
    }

    /// Creates a [`Node::Branch`] from 2 [`Node`]
    pub fn new_branch(left: Node<HASH_SIZE>, right: Node<HASH_SIZE>) -> Self {
        Self::Branch(Branch::new(left, right))
    }

    /// Creates a [`Node::Branch`] over already shared children
    pub fn new_branch_with_arc_children(
        left: Arc<Node<HASH_SIZE>>,
        right: Arc<Node<HASH_SIZE>>,
    ) -> Self {
        Self::Branch(Branch::new_with_arc_children(left, right))
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    /// Left child. Fails with [`TreeError::NotInternal`] on a leaf.
    pub fn left(&self) -> Result<&Arc<Node<HASH_SIZE>>, TreeError> {
        self.children().map(|(left, _)| left)
    }

    /// Right child. Fails with [`TreeError::NotInternal`] on a leaf.
    pub fn right(&self) -> Result<&Arc<Node<HASH_SIZE>>, TreeError> {
        self.children().map(|(_, right)| right)
    }

    /// Both children. Fails with [`TreeError::NotInternal`] on a leaf.
    #[allow(clippy::type_complexity)]
    pub fn children(
        &self,
    ) -> Result<(&Arc<Node<HASH_SIZE>>, &Arc<Node<HASH_SIZE>>), TreeError> {
        match self {
            Self::Leaf(_) => Err(TreeError::NotInternal),
            Self::Branch(branch) => Ok(branch.children()),
        }
    }

    /// Navigates to `gindex`, taking this node as the root.
    ///
    /// Fails with [`TreeError::NotFound`] when the path runs past a leaf, which is also how
    /// subtrees that are only known by their hash present themselves.
    pub fn get(&self, gindex: Gindex) -> Result<&Node<HASH_SIZE>, TreeError> {
        let mut current = self;
        for right in gindex.bit_path() {
            current = match current {
                Self::Leaf(_) => return Err(TreeError::NotFound { gindex }),
                Self::Branch(branch) if right => branch.right(),
                Self::Branch(branch) => branch.left(),
            };
        }
        Ok(current)
    }

    /// Merkle root of this node. Branches hash their children once and keep the result.
    pub fn merkle_root(&self, hasher: &impl Hasher<HASH_SIZE>) -> [u8; HASH_SIZE] {
        match self {
            Self::Leaf(leaf) => leaf.hash(),
            Self::Branch(branch) => branch.merkle_root(hasher),
        }
    }
}
