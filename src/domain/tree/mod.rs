use log::{debug, info};
use rayon::prelude::*;
use std::marker::PhantomData;
use std::ops::Range;
use std::sync::OnceLock;
use std::time::Instant;

use super::hash::{sha256::Sha256Normal, to_hex, Hash, HashMethod};
use super::node::{Leaf, Node};
use super::proof::{expected_proof_len, MerkleProof, ProofStep, Side};
use crate::error::{Error, Result};

pub(crate) mod builder;
pub mod internal;

use builder::BuiltTree;

/// An append-only binary Merkle tree.
///
/// Appends only touch the leaf list and drop the built levels, so a batch of
/// appends costs no hashing beyond the leaves. The first read afterwards
/// (`root()`, a proof, a validation) rebuilds the levels once and keeps them
/// until the next append; [`InternalMerkleTree::recalculate`](internal::InternalMerkleTree::recalculate)
/// does the same eagerly.
#[derive(Debug, Clone)]
pub struct MerkleTree<Method: HashMethod = Sha256Normal> {
    leaves: Vec<Leaf>,
    built: OnceLock<BuiltTree>, // empty while dirty
    method: PhantomData<Method>,
}

pub type MerkleTreeSha256 = MerkleTree<Sha256Normal>;

impl<Method: HashMethod> Default for MerkleTree<Method> {
    fn default() -> Self {
        Self {
            leaves: Vec::new(),
            built: OnceLock::from(BuiltTree::default()),
            method: PhantomData,
        }
    }
}

impl<Method: HashMethod> MerkleTree<Method> {
    /// An empty tree: no leaves and no root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree from raw items, hashing them in parallel.
    pub fn from_leaves_data<T: AsRef<[u8]> + Sync>(items: &[T]) -> Self {
        let hashed: Vec<Hash> = items
            .par_iter()
            .map(|item| Method::hash_leaf(item.as_ref()))
            .collect();
        Self::from_leaves_hashes(hashed)
    }

    /// Build a tree from already-hashed leaves.
    pub fn from_leaves_hashes(hashes: Vec<Hash>) -> Self {
        let total_start = Instant::now();
        let mut tree = Self::new();
        tree.leaves = hashes
            .into_iter()
            .enumerate()
            .map(|(index, hash)| Leaf { index, hash })
            .collect();
        tree.rebuild();
        info!(
            "Total duration of from_leaves_hashes ({} leaves): {:?}",
            tree.leaves.len(),
            total_start.elapsed()
        );
        tree
    }

    /// Hash `data` and append it as the next leaf.
    pub fn add(&mut self, data: &[u8]) -> (usize, String) {
        let hash = Method::hash_leaf(data);
        (self.push_leaf(hash), to_hex(&hash))
    }

    /// Add many items at once. Returns the range of assigned indices.
    pub fn append<T: AsRef<[u8]> + Sync>(&mut self, items: &[T]) -> Range<usize> {
        let first = self.leaves.len();
        let hashed: Vec<Hash> = items
            .par_iter()
            .map(|item| Method::hash_leaf(item.as_ref()))
            .collect();
        for hash in hashed {
            self.push_leaf(hash);
        }
        first..self.leaves.len()
    }

    pub(crate) fn push_leaf(&mut self, hash: Hash) -> usize {
        let index = self.leaves.len();
        self.leaves.push(Leaf { index, hash });
        self.built = OnceLock::new();
        index
    }

    pub(crate) fn leaf(&self, index: usize) -> Result<&Leaf> {
        self.leaves.get(index).ok_or(Error::IndexOutOfRange {
            index,
            length: self.leaves.len(),
        })
    }

    /// Rebuild all internal levels from the current leaves.
    pub(crate) fn rebuild(&mut self) -> Option<Hash> {
        let built = BuiltTree::build::<Method>(&self.leaves);
        let root = built.root;
        self.built = OnceLock::from(built);
        root
    }

    /// Levels for the current leaves, built on first use after an append.
    fn built(&self) -> &BuiltTree {
        self.built.get_or_init(|| {
            debug!("Tree is dirty, building levels for read");
            BuiltTree::build::<Method>(&self.leaves)
        })
    }

    /// Leaf digest at `index`, hex encoded.
    pub fn hash_at(&self, index: usize) -> Result<String> {
        self.leaf(index).map(|leaf| to_hex(&leaf.hash))
    }

    pub fn length(&self) -> usize {
        self.leaves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty()
    }

    /// Number of internal levels, `ceil(log2(length))`.
    pub fn height(&self) -> usize {
        expected_proof_len(self.leaves.len())
    }

    /// True when leaves were appended and nothing has rebuilt the levels
    /// since.
    pub fn is_dirty(&self) -> bool {
        self.built.get().is_none()
    }

    /// The Merkle root of the current leaves.
    pub fn root_hash(&self) -> Result<Hash> {
        self.built().root.ok_or(Error::EmptyTree)
    }

    /// Hex encoded [`MerkleTree::root_hash`].
    pub fn root(&self) -> Result<String> {
        self.root_hash().map(|root| to_hex(&root))
    }

    pub fn leaves(&self) -> impl Iterator<Item = &Leaf> {
        self.leaves.iter()
    }

    /// Index of the first leaf holding `hash`.
    pub fn index_of_hash(&self, hash: &Hash) -> Option<usize> {
        self.leaves.iter().position(|leaf| &leaf.hash == hash)
    }

    /// Index of the first leaf holding the digest of `data`.
    pub fn index_of_data(&self, data: &[u8]) -> Option<usize> {
        self.index_of_hash(&Method::hash_leaf(data))
    }

    /// Node at `level` and `position`; level 0 holds the leaves.
    pub fn node(&self, level: usize, position: usize) -> Option<Node> {
        if level == 0 {
            return self.leaves.get(position).copied().map(Node::Leaf);
        }
        self.built()
            .levels
            .get(level - 1)
            .and_then(|nodes| nodes.get(position))
            .copied()
            .map(Node::Internal)
    }

    /// Inclusion proof for the leaf at `index`.
    pub fn proof(&self, index: usize) -> Result<MerkleProof<Method>> {
        self.leaf(index)?;
        let levels = &self.built().levels;
        let hash_on = |level: usize, position: usize| -> Option<Hash> {
            if level == 0 {
                self.leaves.get(position).map(|leaf| leaf.hash)
            } else {
                levels[level - 1].get(position).map(|node| node.hash)
            }
        };

        let mut steps = Vec::with_capacity(levels.len());
        let mut position = index;
        for level in 0..levels.len() {
            // past the end of an odd level the node is its own sibling
            let hash = hash_on(level, position ^ 1)
                .or_else(|| hash_on(level, position))
                .ok_or(Error::IndexOutOfRange {
                    index: position,
                    length: self.leaves.len(),
                })?;
            steps.push(ProofStep {
                hash,
                side: Side::of_sibling(position),
            });
            position /= 2;
        }

        Ok(MerkleProof::new(index, steps))
    }

    /// Hex encoded sibling hashes from the leaf at `index` up to the root.
    pub fn intermediary_hashes_by_index(&self, index: usize) -> Result<Vec<String>> {
        self.proof(index).map(|proof| proof.proof_hashes_hex())
    }

    /// Check that `original` is the leaf at `index`, given the sibling
    /// hashes returned by [`MerkleTree::intermediary_hashes_by_index`].
    ///
    /// Returns `Ok(false)` when the data or the proof do not match the
    /// current root. A proof produced for a tree of another size fails with
    /// [`Error::ProofLengthMismatch`].
    pub fn validate_existence<S: AsRef<str>>(
        &self,
        original: &[u8],
        index: usize,
        intermediary_hashes: &[S],
    ) -> Result<bool> {
        self.leaf(index)?;
        self.check_proof_len(intermediary_hashes.len())?;
        let proof = MerkleProof::<Method>::from_hex_hashes(index, intermediary_hashes)?;
        Ok(proof.verify_data(&self.root_hash()?, original))
    }

    /// Like [`MerkleTree::validate_existence`], using the sides stored in
    /// the proof.
    pub fn validate_proof(&self, original: &[u8], proof: &MerkleProof<Method>) -> Result<bool> {
        self.leaf(proof.leaf_index)?;
        self.check_proof_len(proof.len())?;
        Ok(proof.verify_data(&self.root_hash()?, original))
    }

    fn check_proof_len(&self, actual: usize) -> Result<()> {
        let expected = expected_proof_len(self.leaves.len());
        if actual != expected {
            return Err(Error::ProofLengthMismatch { expected, actual });
        }
        Ok(())
    }
}
