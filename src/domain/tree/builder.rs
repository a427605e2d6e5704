use log::debug;
use rayon::prelude::*;
use std::time::Instant;

use crate::domain::{
    hash::{Hash, HashMethod},
    node::{InternalNode, Leaf},
};

/// Levels at least this wide are paired up on the rayon pool.
const PARALLEL_LEVEL_WIDTH: usize = 1 << 12;

/// Internal levels and root computed from one leaf sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct BuiltTree {
    pub levels: Vec<Vec<InternalNode>>, // levels[0] is level 1
    pub root: Option<Hash>,
}

impl BuiltTree {
    pub fn build<Method: HashMethod>(leaves: &[Leaf]) -> Self {
        let levels = build_levels::<Method>(leaves);
        let root = root_of(leaves, &levels);
        Self { levels, root }
    }
}

/// Build every internal level bottom-up. Index 0 of the result is level 1
/// (the parents of the leaves); the last level holds the single root node.
/// An odd node at the end of a level is paired with itself.
pub(crate) fn build_levels<Method: HashMethod>(leaves: &[Leaf]) -> Vec<Vec<InternalNode>> {
    let start = Instant::now();
    let mut levels: Vec<Vec<InternalNode>> = Vec::new();
    let mut current: Vec<Hash> = leaves.iter().map(|leaf| leaf.hash).collect();

    while current.len() > 1 {
        let level = levels.len() + 1;
        let nodes = pair_up::<Method>(level, &current);
        current = nodes.iter().map(|node| node.hash).collect();
        levels.push(nodes);
    }

    debug!(
        "Building {} levels over {} leaves took {:?}",
        levels.len(),
        leaves.len(),
        start.elapsed()
    );
    levels
}

/// Root of a built tree: the top internal node, or the only leaf.
pub(crate) fn root_of(leaves: &[Leaf], levels: &[Vec<InternalNode>]) -> Option<Hash> {
    match levels.last() {
        Some(top) => top.first().map(|node| node.hash),
        None => leaves.first().map(|leaf| leaf.hash),
    }
}

fn pair_up<Method: HashMethod>(level: usize, below: &[Hash]) -> Vec<InternalNode> {
    pair_up_with::<Method>(level, below, below.len() >= PARALLEL_LEVEL_WIDTH)
}

fn pair_up_with<Method: HashMethod>(
    level: usize,
    below: &[Hash],
    parallel: bool,
) -> Vec<InternalNode> {
    let combine = |(position, pair): (usize, &[Hash])| {
        let left = 2 * position;
        let right = if pair.len() == 2 { left + 1 } else { left };
        InternalNode {
            level,
            position,
            hash: Method::hash_nodes(&pair[0], pair.last().unwrap_or(&pair[0])),
            left,
            right,
        }
    };

    if parallel {
        below.par_chunks(2).enumerate().map(combine).collect()
    } else {
        below.chunks(2).enumerate().map(combine).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::hash::sha256::Sha256Normal;

    fn leaves(data: &[&[u8]]) -> Vec<Leaf> {
        data.iter()
            .enumerate()
            .map(|(index, d)| Leaf {
                index,
                hash: Sha256Normal::hash_leaf(d),
            })
            .collect()
    }

    #[test]
    fn test_no_levels_for_zero_or_one_leaf() {
        assert!(build_levels::<Sha256Normal>(&[]).is_empty());
        assert_eq!(root_of(&[], &[]), None);

        let single = leaves(&[b"only"]);
        let levels = build_levels::<Sha256Normal>(&single);
        assert!(levels.is_empty());
        assert_eq!(root_of(&single, &levels), Some(single[0].hash));
    }

    #[test]
    fn test_odd_level_pads_with_itself() {
        let l = leaves(&[b"1", b"2", b"3"]);
        let levels = build_levels::<Sha256Normal>(&l);
        assert_eq!(levels.len(), 2);
        assert_eq!(levels[0].len(), 2);

        let padded = &levels[0][1];
        assert_eq!(padded.left, 2);
        assert_eq!(padded.right, 2);
        assert_eq!(padded.hash, Sha256Normal::hash_nodes(&l[2].hash, &l[2].hash));

        let n01 = Sha256Normal::hash_nodes(&l[0].hash, &l[1].hash);
        let expected = Sha256Normal::hash_nodes(&n01, &padded.hash);
        assert_eq!(root_of(&l, &levels), Some(expected));
    }

    #[test]
    fn test_parallel_and_sequential_pairing_agree() {
        // odd width so the padded tail goes through both paths
        let hashes: Vec<Hash> = (0..PARALLEL_LEVEL_WIDTH + 1)
            .map(|i| Sha256Normal::hash_leaf(&(i as u64).to_le_bytes()))
            .collect();
        let parallel = pair_up_with::<Sha256Normal>(1, &hashes, true);
        let sequential = pair_up_with::<Sha256Normal>(1, &hashes, false);

        assert_eq!(parallel.len(), PARALLEL_LEVEL_WIDTH / 2 + 1);
        assert_eq!(parallel, sequential);
        assert_eq!(pair_up::<Sha256Normal>(1, &hashes), parallel);

        let tail = parallel.last().unwrap();
        assert_eq!(tail.left, PARALLEL_LEVEL_WIDTH);
        assert_eq!(tail.right, PARALLEL_LEVEL_WIDTH);
        assert_eq!(
            tail.hash,
            Sha256Normal::hash_nodes(&hashes[PARALLEL_LEVEL_WIDTH], &hashes[PARALLEL_LEVEL_WIDTH])
        );
    }

    #[test]
    fn test_built_tree_matches_levels() {
        let l = leaves(&[b"1", b"2", b"3", b"4", b"5"]);
        let built = BuiltTree::build::<Sha256Normal>(&l);
        assert_eq!(built.levels, build_levels::<Sha256Normal>(&l));
        assert_eq!(built.root, root_of(&l, &built.levels));
        assert_eq!(BuiltTree::build::<Sha256Normal>(&[]), BuiltTree::default());
    }
}
