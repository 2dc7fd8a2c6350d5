//! File-backed catalog for navtree.
//!
//! A [`Catalog`] is a nested document of entries read from JSON or TOML. It
//! implements both collaborator capabilities of the model, so a whole
//! navigation session can be driven from one file:
//!
//! ```no_run
//! use std::rc::Rc;
//!
//! use navtree_catalog::Catalog;
//! use navtree_core::NavConfig;
//! use navtree_session::NavigationController;
//!
//! let config = NavConfig::default();
//! let catalog = Rc::new(Catalog::from_path("console.toml", &config.root_key)?);
//! let controller = NavigationController::new(&config, Rc::clone(&catalog), catalog)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod catalog;
mod error;

pub use catalog::{Catalog, CatalogEntry};
pub use error::{CatalogError, CatalogResult};
