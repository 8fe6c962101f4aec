//! Multiproofs over generalized indices.
//!
//! A multiproof proves several nodes of a tree at once. Besides the target values, a verifier
//! needs the witnesses: the siblings of every node on the paths from the root to the targets
//! that are not themselves on one of those paths.
//!
//! Building a multiproof is split in two steps:
//! - [`WitnessPlan::new`] only looks at gindices and computes which nodes are needed.
//! - [`Multiproof::generate`] resolves those nodes in a tree. Nodes the tree cannot
//!   resolve are reported as not available instead of failing the whole proof.
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Display};

use crate::node::{Hasher, Node};
use crate::{Gindex, TreeError};

/// Interest and witness sets of a batch of targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WitnessPlan {
    targets: BTreeSet<Gindex>,
    interest: BTreeSet<Gindex>,
    witnesses: Vec<Gindex>,
}

impl WitnessPlan {
    /// Computes the minimal set of witnesses for `targets`.
    ///
    /// Duplicated and nested targets are allowed. The root never enters the interest set:
    /// targeting it contributes nothing, its value is read from the tree directly.
    pub fn new(targets: impl IntoIterator<Item = Gindex>) -> Self {
        let targets: BTreeSet<Gindex> = targets.into_iter().collect();
        let interest: BTreeSet<Gindex> = targets
            .iter()
            .flat_map(|target| target.path_from_root())
            .collect();
        let witnesses: BTreeSet<Gindex> = interest
            .iter()
            .filter_map(|gindex| gindex.sibling())
            .filter(|sibling| !interest.contains(sibling))
            .collect();
        Self {
            targets,
            interest,
            witnesses: witnesses.into_iter().collect(),
        }
    }

    /// Deduplicated targets, ascending.
    pub fn targets(&self) -> &BTreeSet<Gindex> {
        &self.targets
    }

    /// Every gindex on a path from the root to a target, root excluded, targets included.
    pub fn interest(&self) -> &BTreeSet<Gindex> {
        &self.interest
    }

    /// Witness gindices, ascending.
    pub fn witnesses(&self) -> &[Gindex] {
        &self.witnesses
    }
}

/// Role of a node in a multiproof.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Root,
    Leaf,
    Witness,
}

impl Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Root => "root",
            Self::Leaf => "leaf",
            Self::Witness => "witn",
        })
    }
}

/// A node of a multiproof. `value` is `None` when the tree could not resolve the gindex.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProofEntry<const HASH_SIZE: usize> {
    pub role: Role,
    pub gindex: Gindex,
    pub value: Option<[u8; HASH_SIZE]>,
}

impl<const HASH_SIZE: usize> ProofEntry<HASH_SIZE> {
    fn resolve(
        role: Role,
        gindex: Gindex,
        root: &Node<HASH_SIZE>,
        hasher: &impl Hasher<HASH_SIZE>,
    ) -> Self {
        let value = root
            .get(gindex)
            .ok()
            .map(|node| node.merkle_root(hasher));
        Self {
            role,
            gindex,
            value,
        }
    }
}

impl<const HASH_SIZE: usize> Display for ProofEntry<HASH_SIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(
                f,
                "{} {:6b}: 0x{}",
                self.role,
                self.gindex,
                hex::encode(value.as_slice())
            ),
            None => write!(f, "{} {:6b}: ? (not available)", self.role, self.gindex),
        }
    }
}

/// Root, target values and witness values of a tree for a batch of targets.
#[derive(Debug, Clone)]
pub struct Multiproof<const HASH_SIZE: usize> {
    root: [u8; HASH_SIZE],
    leaves: Vec<ProofEntry<HASH_SIZE>>,
    witnesses: Vec<ProofEntry<HASH_SIZE>>,
}

impl<const HASH_SIZE: usize> Multiproof<HASH_SIZE> {
    /// Builds the multiproof of `targets` in the tree rooted at `root`.
    pub fn generate(
        root: &Node<HASH_SIZE>,
        targets: impl IntoIterator<Item = Gindex>,
        hasher: &impl Hasher<HASH_SIZE>,
    ) -> Self {
        Self::from_plan(root, &WitnessPlan::new(targets), hasher)
    }

    /// Resolves the nodes of an already computed plan.
    pub fn from_plan(
        root: &Node<HASH_SIZE>,
        plan: &WitnessPlan,
        hasher: &impl Hasher<HASH_SIZE>,
    ) -> Self {
        let leaves = plan
            .targets()
            .iter()
            .map(|gindex| ProofEntry::resolve(Role::Leaf, *gindex, root, hasher))
            .collect();
        let witnesses = plan
            .witnesses()
            .iter()
            .map(|gindex| ProofEntry::resolve(Role::Witness, *gindex, root, hasher))
            .collect();
        Self {
            root: root.merkle_root(hasher),
            leaves,
            witnesses,
        }
    }

    pub fn root(&self) -> [u8; HASH_SIZE] {
        self.root
    }

    /// Target entries, ascending.
    pub fn leaves(&self) -> &[ProofEntry<HASH_SIZE>] {
        &self.leaves
    }

    /// Witness entries, ascending.
    pub fn witnesses(&self) -> &[ProofEntry<HASH_SIZE>] {
        &self.witnesses
    }

    /// Root entry followed by targets and witnesses.
    pub fn entries(&self) -> impl Iterator<Item = ProofEntry<HASH_SIZE>> + '_ {
        let root = ProofEntry {
            role: Role::Root,
            gindex: Gindex::ROOT,
            value: Some(self.root),
        };
        std::iter::once(root).chain(self.leaves.iter().chain(&self.witnesses).cloned())
    }

    /// Whether every target and witness was resolved.
    pub fn is_complete(&self) -> bool {
        self.leaves
            .iter()
            .chain(&self.witnesses)
            .all(|entry| entry.value.is_some())
    }

    /// Recomputes the root from the targets and witnesses and compares it to `expected_root`.
    pub fn verify(
        &self,
        expected_root: &[u8; HASH_SIZE],
        hasher: &impl Hasher<HASH_SIZE>,
    ) -> Result<(), TreeError> {
        let known = self
            .leaves
            .iter()
            .chain(&self.witnesses)
            .filter_map(|entry| entry.value.map(|value| (entry.gindex, value)));
        if compute_root(known, hasher)? == *expected_root {
            Ok(())
        } else {
            Err(TreeError::InvalidMultiproof)
        }
    }
}

impl<const HASH_SIZE: usize> Display for Multiproof<HASH_SIZE> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in self.entries() {
            writeln!(f, "{}", entry)?;
        }
        Ok(())
    }
}

/// Recomputes the root from known node values.
///
/// Sibling pairs are replaced by their parent, deepest first, until the root is reached.
/// A parent that is already known must match the value folded from its children. A node
/// whose sibling is missing is ignored when one of its ancestors is known, since that
/// ancestor covers it. Fails with [`TreeError::InvalidMultiproof`] on a mismatch or when
/// the root cannot be reached.
pub fn compute_root<const HASH_SIZE: usize>(
    known: impl IntoIterator<Item = (Gindex, [u8; HASH_SIZE])>,
    hasher: &impl Hasher<HASH_SIZE>,
) -> Result<[u8; HASH_SIZE], TreeError> {
    let mut known: BTreeMap<Gindex, [u8; HASH_SIZE]> = known.into_iter().collect();
    // gindices at the same depth are siblings or unrelated, so deepest-first never combines
    // a node before all of its descendants were folded into it
    let mut pending: Vec<Gindex> = known.keys().copied().collect();
    pending.sort_by_key(|gindex| gindex.depth());
    while let Some(gindex) = pending.pop() {
        let (Some(sibling), Some(parent)) = (gindex.sibling(), gindex.parent()) else {
            continue;
        };
        let Some(other) = known.get(&sibling).copied() else {
            if has_known_ancestor(&known, gindex) {
                continue;
            }
            return Err(TreeError::InvalidMultiproof);
        };
        // the left node of a complete pair does the folding
        if gindex.is_right() {
            continue;
        }
        let Some(node) = known.get(&gindex).copied() else {
            return Err(TreeError::InvalidMultiproof);
        };
        let value = hasher.hash_pair(&node, &other);
        match known.get(&parent) {
            Some(expected) if *expected != value => return Err(TreeError::InvalidMultiproof),
            Some(_) => {}
            None => {
                known.insert(parent, value);
                let at = pending.partition_point(|queued| queued.depth() <= parent.depth());
                pending.insert(at, parent);
            }
        }
    }
    known
        .get(&Gindex::ROOT)
        .copied()
        .ok_or(TreeError::InvalidMultiproof)
}

fn has_known_ancestor<V>(known: &BTreeMap<Gindex, V>, gindex: Gindex) -> bool {
    std::iter::successors(gindex.parent(), |ancestor| ancestor.parent())
        .any(|ancestor| known.contains_key(&ancestor))
}
