//! Core types and traits for navtree.
//!
//! This crate provides the fundamental data structures of the navigation
//! model: node keys, leaf and container nodes, the [`NodeTree`] registry with
//! its container operations, the collaborator capabilities the tree consumes,
//! and the shared configuration and error types.

mod config;
mod error;
mod filter;
mod key;
mod node;
mod source;
mod tree;

pub use config::{NavConfig, NavConfigBuilder};
pub use error::{BoxError, NavError, NavResult};
pub use filter::WildcardFilter;
pub use key::{GENERATED_KEY_MARKER, KeyGenerator, NodeKey, PATH_SEPARATOR};
pub use node::{ContainerState, Node, NodeAction, NodeKind, NodeType, truncate_label};
pub use source::{
    ChildDescriptor, ChildrenLoader, LoaderFn, NameExists, NameExistsFn, NoChildren, NoNames,
};
pub use tree::{Ancestors, NodeTree};
