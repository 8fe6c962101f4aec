//! Error types for gindex navigation, multiproofs and tree dumps

use thiserror::Error;

use crate::Gindex;

/// Error type for tree operations
#[derive(Debug, Error, PartialEq, Eq, Clone)]
pub enum TreeError {
    /// A gindex token was zero or could not be parsed
    #[error(
        "invalid gindex{}: {input:?}",
        .item.map(|item| format!(" (list item {item})")).unwrap_or_default()
    )]
    InvalidGindex { item: Option<usize>, input: String },
    /// The path to the gindex runs past a leaf or into data that is not materialized
    #[error("node {gindex} not found in tree")]
    NotFound { gindex: Gindex },
    /// Children were requested from a leaf
    #[error("node is not an internal node")]
    NotInternal,
    /// Both children of the branch at `gindex` are the same node instance
    #[error("left and right child of node {gindex} are the same instance")]
    AliasedSubtree { gindex: Gindex },
    /// The known nodes are not enough to recompute the root, or they recompute another root
    #[error("invalid multiproof")]
    InvalidMultiproof,
    /// The requested tree depth is too small for the data or exceeds the supported maximum
    #[error("invalid tree depth {depth} for {chunks} chunks")]
    InvalidDepth { depth: u32, chunks: usize },
}
