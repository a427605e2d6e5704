use std::fmt;

use super::hash::{to_hex, Hash};

/// A leaf: the digest of one caller-supplied item at a fixed position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Leaf {
    pub index: usize,
    pub hash: Hash,
}

/// A computed node on `level >= 1`. `left` and `right` are positions on
/// `level - 1`; they are equal when the node was padded with itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InternalNode {
    pub level: usize,
    pub position: usize,
    pub hash: Hash,
    pub left: usize,
    pub right: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Node {
    Leaf(Leaf),
    Internal(InternalNode),
}

impl Node {
    pub fn hash(&self) -> &Hash {
        match self {
            Node::Leaf(leaf) => &leaf.hash,
            Node::Internal(node) => &node.hash,
        }
    }

    /// Position on the node's level; for leaves this is the leaf index.
    pub fn index(&self) -> usize {
        match self {
            Node::Leaf(leaf) => leaf.index,
            Node::Internal(node) => node.position,
        }
    }

    pub fn level(&self) -> usize {
        match self {
            Node::Leaf(_) => 0,
            Node::Internal(node) => node.level,
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, Node::Leaf(_))
    }

    pub fn hash_hex(&self) -> String {
        to_hex(self.hash())
    }
}

impl From<Leaf> for Node {
    fn from(leaf: Leaf) -> Self {
        Node::Leaf(leaf)
    }
}

impl From<InternalNode> for Node {
    fn from(node: InternalNode) -> Self {
        Node::Internal(node)
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.hash_hex())
    }
}
