use std::marker::PhantomData;

use serde::{Deserialize, Serialize};

use super::hash::{from_hex, to_hex, Hash, HashMethod};
use crate::error::Result;

/// Which side of the path node a sibling sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Side of the sibling of the node at `position` on its level.
    pub fn of_sibling(position: usize) -> Self {
        if position % 2 == 0 {
            Side::Right
        } else {
            Side::Left
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProofStep {
    #[serde(with = "hex_hash")]
    pub hash: Hash,
    pub side: Side,
}

/// An inclusion proof: the sibling hashes from the leaf level up to (but
/// not including) the root, each with its side.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MerkleProof<Method: HashMethod> {
    pub leaf_index: usize,
    pub steps: Vec<ProofStep>,
    #[serde(skip)]
    method: PhantomData<Method>,
}

impl<Method: HashMethod> MerkleProof<Method> {
    pub fn new(leaf_index: usize, steps: Vec<ProofStep>) -> Self {
        Self {
            leaf_index,
            steps,
            method: PhantomData,
        }
    }

    /// Rebuild a proof from bare sibling hashes. The side at each level
    /// follows from the bits of `leaf_index`.
    pub fn from_hashes(leaf_index: usize, hashes: &[Hash]) -> Self {
        let mut position = leaf_index;
        let steps = hashes
            .iter()
            .map(|hash| {
                let step = ProofStep {
                    hash: *hash,
                    side: Side::of_sibling(position),
                };
                position /= 2;
                step
            })
            .collect();
        Self::new(leaf_index, steps)
    }

    /// Same as [`MerkleProof::from_hashes`] for hex encoded hashes.
    pub fn from_hex_hashes<S: AsRef<str>>(leaf_index: usize, hashes: &[S]) -> Result<Self> {
        let hashes = hashes
            .iter()
            .map(|h| from_hex(h.as_ref()))
            .collect::<Result<Vec<_>>>()?;
        Ok(Self::from_hashes(leaf_index, &hashes))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub fn proof_hashes(&self) -> Vec<Hash> {
        self.steps.iter().map(|step| step.hash).collect()
    }

    pub fn proof_hashes_hex(&self) -> Vec<String> {
        self.steps.iter().map(|step| to_hex(&step.hash)).collect()
    }

    /// Compute the Merkle root by folding over `(sibling, side)`.
    pub fn root(&self, leaf_hash: &Hash) -> Hash {
        self.steps.iter().fold(*leaf_hash, |current, step| match step.side {
            Side::Left => Method::hash_nodes(&step.hash, &current),
            Side::Right => Method::hash_nodes(&current, &step.hash),
        })
    }

    /// Verify a proof by comparing the recomputed root with `root`.
    pub fn verify(&self, root: &Hash, leaf_hash: &Hash) -> bool {
        &self.root(leaf_hash) == root
    }

    /// Like `verify`, but hashes `data` into the leaf first.
    pub fn verify_data(&self, root: &Hash, data: &[u8]) -> bool {
        self.verify(root, &Method::hash_leaf(data))
    }
}

/// Number of sibling hashes in a proof for a tree of `leaf_count` leaves:
/// `ceil(log2(leaf_count))`, and 0 for zero or one leaf.
pub fn expected_proof_len(leaf_count: usize) -> usize {
    if leaf_count <= 1 {
        0
    } else {
        (usize::BITS - (leaf_count - 1).leading_zeros()) as usize
    }
}

pub(crate) mod hex_hash {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    use crate::domain::hash::{from_hex, to_hex, Hash};

    pub fn serialize<S: Serializer>(hash: &Hash, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&to_hex(hash))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Hash, D::Error> {
        let value = String::deserialize(deserializer)?;
        from_hex(&value).map_err(D::Error::custom)
    }
}
