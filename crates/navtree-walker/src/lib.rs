//! Path addressing and the current-container walker.
//!
//! A [`NodePath`] is the external key of a node: the internal keys from the
//! root (exclusive) down to the node. [`TreeWalker`] owns a
//! [`NodeTree`](navtree_core::NodeTree) and tracks which container is being
//! displayed.

mod path;
mod walker;

pub use path::NodePath;
pub use walker::TreeWalker;
