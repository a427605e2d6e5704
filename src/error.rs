//! Error types for append-merkle-tree

use thiserror::Error;

/// Errors that can occur in Merkle tree operations
#[derive(Error, Debug)]
pub enum Error {
    /// Leaf index is not below the current leaf count
    #[error("Index out of range: {index} >= length {length}")]
    IndexOutOfRange { index: usize, length: usize },

    /// Proof was generated for a tree of a different size
    #[error("Proof length mismatch: expected {expected} hashes, got {actual}")]
    ProofLengthMismatch { expected: usize, actual: usize },

    /// The tree has no leaves, so it has no root
    #[error("Merkle tree is empty")]
    EmptyTree,

    /// A digest string is not hex or not 32 bytes wide
    #[error("Invalid digest: {0}")]
    InvalidDigest(String),

    /// A snapshot's root does not match the root rebuilt from its leaves
    #[error("Root mismatch: expected {expected}, got {actual}")]
    RootMismatch { expected: String, actual: String },

    /// A snapshot's declared length disagrees with its leaves
    #[error("Length mismatch: declared {declared}, found {found} leaves")]
    LengthMismatch { declared: usize, found: usize },

    /// JSON encoding or decoding error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for Merkle tree operations
pub type Result<T> = std::result::Result<T, Error>;
