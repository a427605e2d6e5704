use itertools::Itertools;
use std::fmt;

use crate::domain::hash::{to_hex, HashMethod};
use crate::domain::tree::MerkleTree;

/// Leaves listed by the plain summary; `{:#}` lists all of them.
const SUMMARY_LEAVES: usize = 8;

/// Human-readable summary: one header line, then up to `SUMMARY_LEAVES`
/// leaf lines. The alternate form (`{:#}`) lists every leaf.
impl<Method: HashMethod> fmt::Display for MerkleTree<Method> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let root = self.root().unwrap_or_else(|_| "<empty>".to_string());
        write!(
            f,
            "MerkleTree(length={}, height={}, root={})",
            self.length(),
            self.height(),
            root
        )?;
        if self.is_empty() {
            return Ok(());
        }

        let shown = if f.alternate() {
            self.length()
        } else {
            SUMMARY_LEAVES.min(self.length())
        };
        let leaves = self
            .leaves()
            .take(shown)
            .map(|leaf| format!("  [{}] {}", leaf.index, to_hex(&leaf.hash)))
            .join("\n");
        write!(f, "\n{leaves}")?;
        if shown < self.length() {
            write!(f, "\n  ... {} more leaves", self.length() - shown)?;
        }
        Ok(())
    }
}
