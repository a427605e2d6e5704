use log::debug;

use super::MerkleTree;
use crate::domain::hash::{from_hex, to_hex, HashMethod};
use crate::domain::node::Node;
use crate::error::{Error, Result};

/// Operations reserved for trusted collaborators such as log replay:
/// inserting precomputed digests and rebuilding the internal levels.
///
/// Not re-exported at the crate root; import it from
/// `append_merkle_tree::internal` to opt in.
pub trait InternalMerkleTree {
    /// Append an already computed leaf digest (hex). Returns its index.
    fn insert(&mut self, hash: &str) -> Result<usize>;

    /// Like `insert`, also returning the created leaf node.
    fn raw_insert(&mut self, hash: &str) -> Result<(usize, Node)>;

    /// Rebuild every internal level from the leaves and return the root.
    fn recalculate(&mut self) -> Result<String>;
}

impl<Method: HashMethod> InternalMerkleTree for MerkleTree<Method> {
    fn insert(&mut self, hash: &str) -> Result<usize> {
        self.raw_insert(hash).map(|(index, _)| index)
    }

    fn raw_insert(&mut self, hash: &str) -> Result<(usize, Node)> {
        let index = self.push_leaf(from_hex(hash)?);
        let leaf = *self.leaf(index)?;
        Ok((index, Node::Leaf(leaf)))
    }

    fn recalculate(&mut self) -> Result<String> {
        let root = self.rebuild().ok_or(Error::EmptyTree)?;
        debug!("Recalculated root {} over {} leaves", to_hex(&root), self.length());
        Ok(to_hex(&root))
    }
}
