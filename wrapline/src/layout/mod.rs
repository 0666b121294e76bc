//! Layout tree for wrapline.
//!
//! # Architecture
//!
//! ```text
//! SourceSequence (owns leaves) <- LeafId handles <- Row <- Column
//!                                                   ^
//!                                        Index maps leaf -> row
//! ```
//!
//! Rows hold [`LayoutNode::Reference`] handles, never leaves, so removing a
//! leaf from the sequence cannot leave a row pointing at freed memory.

pub mod leaf;
pub mod source;
pub mod cursor;
pub mod index;

// containers must come before node (node imports container types)
pub mod containers;
pub mod node;

// Re-export core types
pub use containers::{Column, Composite, Row};
pub use cursor::{ContainerKind, Cursor};
pub use index::{Index, IndexEntry, RowId};
pub use leaf::{Leaf, LeafContent};
pub use node::LayoutNode;
pub use source::{LeafId, SourceSequence};
