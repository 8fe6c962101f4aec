//! Building trees out of flat data.
mod chunks;
mod zero;

pub use chunks::{merkleize, min_depth, BYTES_PER_CHUNK, MAX_DEPTH};
pub use zero::ZeroHashes;
