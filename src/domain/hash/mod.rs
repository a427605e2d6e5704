use crate::error::{Error, Result};

pub mod sha256;

/// Digest width in bytes.
pub const HASH_SIZE: usize = 32;

/// A fixed-width digest, used for leaves and internal nodes alike.
pub type Hash = [u8; HASH_SIZE];

pub trait HashMethod {
    /// Hash a leaf's data.
    fn hash_leaf(data: &[u8]) -> Hash;

    /// Hash two child nodes together. Must not be commutative: the order of
    /// `left` and `right` is part of the hashed input.
    fn hash_nodes(left: &Hash, right: &Hash) -> Hash;
}

/// Lowercase hex form of a digest, as used in every external representation.
pub fn to_hex(hash: &Hash) -> String {
    hex::encode(hash)
}

/// Parse a hex digest. An optional `0x` prefix is accepted.
pub fn from_hex(value: &str) -> Result<Hash> {
    let trimmed = value.strip_prefix("0x").unwrap_or(value);
    let bytes = hex::decode(trimmed).map_err(|e| Error::InvalidDigest(format!("{value}: {e}")))?;
    bytes.try_into().map_err(|bytes: Vec<u8>| {
        Error::InvalidDigest(format!(
            "{value}: expected {HASH_SIZE} bytes, got {}",
            bytes.len()
        ))
    })
}
