#![deny(clippy::all)]
//! An append-only binary Merkle tree with inclusion proofs.
//!
//! Leaves are digests of caller data, appended in order. The root commits
//! to every leaf; an inclusion proof lets anyone holding only the root check
//! that a given item sits at a given index.
//!
//! ```
//! use append_merkle_tree::MerkleTree;
//!
//! let mut tree: MerkleTree = MerkleTree::new();
//! for item in [&b"a"[..], b"b", b"c", b"d"] {
//!     tree.add(item);
//! }
//!
//! let proof = tree.intermediary_hashes_by_index(2).unwrap();
//! assert_eq!(proof.len(), 2);
//! assert!(tree.validate_existence(b"c", 2, &proof).unwrap());
//! ```
//!
//! Odd levels pad their last node with itself. Appends are cheap; internal
//! levels are rebuilt by [`internal::InternalMerkleTree::recalculate`] and
//! reads on a dirty tree compute what they need from the current leaves.

mod domain;
mod error;
mod interfaces;

pub use domain::hash::{
    from_hex,
    sha256::{Sha256Normal, Sha256Tagged},
    to_hex, Hash, HashMethod, HASH_SIZE,
};
pub use domain::node::{InternalNode, Leaf, Node};
pub use domain::proof::{expected_proof_len, MerkleProof, ProofStep, Side};
pub use domain::tree::{MerkleTree, MerkleTreeSha256};
pub use error::{Error, Result};

/// Proof over the default hash method.
pub type MerkleProofSha256 = MerkleProof<Sha256Normal>;

/// Privileged operations: raw digest inserts and explicit recalculation.
pub mod internal {
    pub use crate::domain::tree::internal::InternalMerkleTree;
}

/// Serialization of a tree for transport or persistence.
pub mod external {
    pub use crate::interfaces::json::{ExternalMerkleTree, TreeSnapshot};
}
