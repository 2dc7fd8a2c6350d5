//! Session-level navigation for navtree.
//!
//! [`NavigationController`] is the entry point: it owns a
//! [`TreeWalker`](navtree_walker::TreeWalker), drives the [`EditLock`] and
//! generates unique names for created and copied nodes.

mod controller;
mod lock;
mod naming;
mod outcome;

pub use controller::NavigationController;
pub use lock::EditLock;
pub use naming::{NameGenerator, candidate_name};
pub use outcome::Sentinel;
