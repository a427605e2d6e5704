pub mod hash;
pub mod node;
pub mod proof;
pub mod tree;
