use super::{Hash, HashMethod};
use sha2::{digest::FixedOutput, Digest, Sha256};

/// Prefix for leaf hashes in the RFC 6962 scheme
pub const LEAF_HASH_PREFIX: u8 = 0x00;

/// Prefix for internal node hashes in the RFC 6962 scheme
pub const NODE_HASH_PREFIX: u8 = 0x01;

/// Plain SHA-256: `H(data)` for leaves, `H(left ++ right)` for nodes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Normal;

impl HashMethod for Sha256Normal {
    fn hash_leaf(data: &[u8]) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(data);
        hasher.finalize_fixed().into()
    }

    fn hash_nodes(left: &Hash, right: &Hash) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update(left);
        hasher.update(right);
        hasher.finalize_fixed().into()
    }
}

/// Domain-separated SHA-256 (RFC 6962): leaf and node inputs carry a
/// one-byte prefix so a leaf digest can never pass for an internal node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Sha256Tagged;

impl HashMethod for Sha256Tagged {
    fn hash_leaf(data: &[u8]) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update([LEAF_HASH_PREFIX]);
        hasher.update(data);
        hasher.finalize_fixed().into()
    }

    fn hash_nodes(left: &Hash, right: &Hash) -> Hash {
        let mut hasher = Sha256::new();
        hasher.update([NODE_HASH_PREFIX]);
        hasher.update(left);
        hasher.update(right);
        hasher.finalize_fixed().into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normal_leaf_is_plain_sha256() {
        let expected: Hash = Sha256::digest(b"a").into();
        assert_eq!(Sha256Normal::hash_leaf(b"a"), expected);
        assert_eq!(
            hex::encode(expected),
            "ca978112ca1bbdcafac231b39a23dc4da786eff8147c4e72b9807785afee48bb"
        );
    }

    #[test]
    fn test_hash_nodes_is_not_commutative() {
        let a = Sha256Normal::hash_leaf(b"left");
        let b = Sha256Normal::hash_leaf(b"right");
        assert_ne!(Sha256Normal::hash_nodes(&a, &b), Sha256Normal::hash_nodes(&b, &a));
        assert_ne!(Sha256Tagged::hash_nodes(&a, &b), Sha256Tagged::hash_nodes(&b, &a));
    }

    #[test]
    fn test_tagged_differs_from_normal() {
        let data = b"test data";
        assert_ne!(Sha256Tagged::hash_leaf(data), Sha256Normal::hash_leaf(data));

        // A node hash over 64 bytes must not equal the leaf hash of the same 64 bytes
        let left = [0u8; 32];
        let right = [1u8; 32];
        let mut concat = left.to_vec();
        concat.extend_from_slice(&right);
        assert_ne!(
            Sha256Tagged::hash_nodes(&left, &right),
            Sha256Tagged::hash_leaf(&concat)
        );
        // ...which is exactly what happens without domain separation
        assert_eq!(
            Sha256Normal::hash_nodes(&left, &right),
            Sha256Normal::hash_leaf(&concat)
        );
    }
}
