//! Full dumps of a tree, one hash per node.
use std::io::Write;

use serde::{Serialize, Serializer};

use crate::node::{Hasher, Node};
use crate::{Gindex, TreeError};

/// A dumped node. Leaves only have a root, branches also have both children.
///
/// Serializes as `{"left": .., "right": .., "root": "0x.."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeView<const HASH_SIZE: usize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Box<TreeView<HASH_SIZE>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Box<TreeView<HASH_SIZE>>>,
    #[serde(serialize_with = "serialize_hash")]
    pub root: [u8; HASH_SIZE],
}

fn serialize_hash<S: Serializer, const HASH_SIZE: usize>(
    hash: &[u8; HASH_SIZE],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format!("0x{}", hex::encode(hash.as_slice())))
}

impl<const HASH_SIZE: usize> TreeView<HASH_SIZE> {
    /// Number of dumped nodes.
    pub fn node_count(&self) -> usize {
        1 + [&self.left, &self.right]
            .into_iter()
            .flatten()
            .map(|child| child.node_count())
            .sum::<usize>()
    }

    /// Writes the view as JSON indented with 2 spaces, followed by a newline.
    pub fn write_json(&self, mut writer: impl Write) -> std::io::Result<()> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writeln!(writer)
    }
}

/// Dumps the whole tree rooted at `node`.
///
/// Fails with [`TreeError::AliasedSubtree`] as soon as a branch has the same instance as
/// both children, instead of dumping that instance twice.
pub fn dump<const HASH_SIZE: usize>(
    node: &Node<HASH_SIZE>,
    hasher: &impl Hasher<HASH_SIZE>,
) -> Result<TreeView<HASH_SIZE>, TreeError> {
    dump_at(node, Gindex::ROOT, hasher)
}

/// Dumps the subtree at `gindex` of the tree rooted at `root`.
pub fn dump_subtree<const HASH_SIZE: usize>(
    root: &Node<HASH_SIZE>,
    gindex: Gindex,
    hasher: &impl Hasher<HASH_SIZE>,
) -> Result<TreeView<HASH_SIZE>, TreeError> {
    dump_at(root.get(gindex)?, gindex, hasher)
}

fn dump_at<const HASH_SIZE: usize>(
    node: &Node<HASH_SIZE>,
    gindex: Gindex,
    hasher: &impl Hasher<HASH_SIZE>,
) -> Result<TreeView<HASH_SIZE>, TreeError> {
    let Node::Branch(branch) = node else {
        return Ok(TreeView {
            left: None,
            right: None,
            root: node.merkle_root(hasher),
        });
    };
    if branch.is_aliased() {
        return Err(TreeError::AliasedSubtree { gindex });
    }
    // nodes deeper than 63 levels have no gindex
    let child = |right| gindex.child(right).ok_or(TreeError::NotFound { gindex });
    let left = dump_at(branch.left(), child(false)?, hasher)?;
    let right = dump_at(branch.right(), child(true)?, hasher)?;
    Ok(TreeView {
        left: Some(Box::new(left)),
        right: Some(Box::new(right)),
        root: branch.merkle_root(hasher),
    })
}
