//! Generalized indices.
//!
//! A gindex encodes the path from the root of a binary tree to one of its nodes:
//! the root is `1`, the children of `n` are `2n` and `2n + 1`. The bits following the
//! leading `1` read, from most to least significant, as the left (`0`) / right (`1`)
//! turns taken from the root.
use std::fmt::{self, Binary, Display};
use std::str::FromStr;

use bitvec::order::Msb0;
use bitvec::vec::BitVec;
use bitvec::view::BitView;

use crate::TreeError;

/// A generalized index. Always `>= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Gindex(u64);

impl Gindex {
    /// The root of the tree.
    pub const ROOT: Gindex = Gindex(1);

    /// Creates a gindex, rejecting `0`.
    pub fn new(value: u64) -> Result<Self, TreeError> {
        if value == 0 {
            return Err(TreeError::InvalidGindex {
                item: None,
                input: value.to_string(),
            });
        }
        Ok(Self(value))
    }

    /// Returns the raw integer.
    pub fn value(self) -> u64 {
        self.0
    }

    pub fn is_root(self) -> bool {
        self.0 == 1
    }

    /// Number of steps from the root to this node.
    pub fn depth(self) -> u32 {
        u64::BITS - 1 - self.0.leading_zeros()
    }

    /// The other child of this node's parent. The root has no sibling.
    pub fn sibling(self) -> Option<Gindex> {
        (!self.is_root()).then_some(Gindex(self.0 ^ 1))
    }

    /// The root has no parent.
    pub fn parent(self) -> Option<Gindex> {
        (!self.is_root()).then_some(Gindex(self.0 >> 1))
    }

    /// Returns `None` if the child does not fit in 64 bits.
    pub fn left_child(self) -> Option<Gindex> {
        self.child(false)
    }

    /// Returns `None` if the child does not fit in 64 bits.
    pub fn right_child(self) -> Option<Gindex> {
        self.child(true)
    }

    /// Child in the given direction (`false` = left, `true` = right).
    pub fn child(self, right: bool) -> Option<Gindex> {
        if self.depth() == u64::BITS - 1 {
            return None;
        }
        Some(Gindex((self.0 << 1) | right as u64))
    }

    /// Whether this node is the right child of its parent.
    pub fn is_right(self) -> bool {
        !self.is_root() && self.0 & 1 == 1
    }

    /// Direction bits from the root down to this node, leading root bit excluded.
    /// `true` means "go right".
    pub fn bit_path(self) -> BitVec<u64, Msb0> {
        let skip = self.0.leading_zeros() as usize + 1;
        self.0.view_bits::<Msb0>()[skip..].to_bitvec()
    }

    /// Every gindex strictly below the root on the way to this one, this one included.
    pub fn path_from_root(self) -> impl Iterator<Item = Gindex> {
        self.bit_path().into_iter().scan(1u64, |n, right| {
            *n = (*n << 1) | right as u64;
            Some(Gindex(*n))
        })
    }
}

impl TryFrom<u64> for Gindex {
    type Error = TreeError;

    fn try_from(value: u64) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl Display for Gindex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Binary for Gindex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        Binary::fmt(&self.0, f)
    }
}

/// Parses an unsigned integer in any base: `0x` hexadecimal, `0o` or a leading `0` octal,
/// `0b` binary, decimal otherwise.
impl FromStr for Gindex {
    type Err = TreeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TreeError::InvalidGindex {
            item: None,
            input: s.to_string(),
        };
        // integer parsing tolerates a `+` sign, gindices are digits only
        if !s.bytes().all(|byte| byte.is_ascii_alphanumeric()) {
            return Err(invalid());
        }
        let lower = s.to_ascii_lowercase();
        let parsed = if let Some(digits) = lower.strip_prefix("0x") {
            u64::from_str_radix(digits, 16)
        } else if let Some(digits) = lower.strip_prefix("0o") {
            u64::from_str_radix(digits, 8)
        } else if let Some(digits) = lower.strip_prefix("0b") {
            u64::from_str_radix(digits, 2)
        } else if lower.len() > 1 && lower.starts_with('0') {
            u64::from_str_radix(&lower[1..], 8)
        } else {
            lower.parse::<u64>()
        };
        let value = parsed.map_err(|_| invalid())?;
        Self::new(value).map_err(|_| invalid())
    }
}

/// Parses a comma separated list of gindices. Blank items are skipped, duplicates are kept.
pub fn parse_gindex_list(list: &str) -> Result<Vec<Gindex>, TreeError> {
    let mut gindices = Vec::new();
    for (item, token) in list.split(',').enumerate() {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let gindex = token
            .parse::<Gindex>()
            .map_err(|_| TreeError::InvalidGindex {
                item: Some(item),
                input: token.to_string(),
            })?;
        gindices.push(gindex);
    }
    Ok(gindices)
}
