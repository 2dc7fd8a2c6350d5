//! Collaborator capabilities consumed by the navigation model.
//!
//! The model never talks to persistence directly. It asks a [`ChildrenLoader`]
//! for the contents of a container the first time they are needed and a
//! [`NameExists`] predicate whether a candidate name is free.

use std::rc::Rc;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::BoxError;
use crate::key::NodeKey;
use crate::node::NodeAction;

/// Description of one child as reported by a [`ChildrenLoader`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChildDescriptor {
    /// Explicit key; a key is generated when absent.
    #[serde(default)]
    pub key: Option<NodeKey>,

    /// Display title.
    pub title: String,

    /// Whether the child is a container (populated lazily in turn).
    #[serde(default)]
    pub is_container: bool,

    /// Outcome returned when the child is performed.
    #[serde(default)]
    pub outcome: Option<String>,

    /// Explicit display label; derived from the title when absent.
    #[serde(default)]
    pub label: Option<String>,

    /// Behaviour when performed.
    #[serde(default)]
    pub action: NodeAction,

    /// Edit-lock participation; the tree default applies when absent.
    #[serde(default)]
    pub lockable: Option<bool>,
}

impl ChildDescriptor {
    /// Describe a leaf.
    pub fn leaf(title: impl Into<String>) -> Self {
        Self {
            key: None,
            title: title.into(),
            is_container: false,
            outcome: None,
            label: None,
            action: NodeAction::default(),
            lockable: None,
        }
    }

    /// Describe a container.
    pub fn container(title: impl Into<String>) -> Self {
        Self {
            is_container: true,
            ..Self::leaf(title)
        }
    }

    /// Set an explicit key.
    pub fn with_key(mut self, key: NodeKey) -> Self {
        self.key = Some(key);
        self
    }

    /// Set the outcome.
    pub fn with_outcome(mut self, outcome: impl Into<String>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    /// Set the action.
    pub fn with_action(mut self, action: NodeAction) -> Self {
        self.action = action;
        self
    }

    /// Set edit-lock participation.
    pub fn with_lockable(mut self, lockable: bool) -> Self {
        self.lockable = Some(lockable);
        self
    }
}

/// Supplies the children of a container on first access.
pub trait ChildrenLoader {
    /// Return the ordered children of `container`.
    fn load_children(&self, container: &NodeKey) -> Result<Vec<ChildDescriptor>, BoxError>;
}

/// Answers whether a name is already in use within a scope.
pub trait NameExists {
    /// Return `true` when `candidate` is taken inside `scope`.
    fn name_exists(&self, scope: &NodeKey, candidate: &str) -> Result<bool, BoxError>;
}

impl<T: ChildrenLoader + ?Sized> ChildrenLoader for Box<T> {
    fn load_children(&self, container: &NodeKey) -> Result<Vec<ChildDescriptor>, BoxError> {
        (**self).load_children(container)
    }
}

impl<T: ChildrenLoader + ?Sized> ChildrenLoader for Rc<T> {
    fn load_children(&self, container: &NodeKey) -> Result<Vec<ChildDescriptor>, BoxError> {
        (**self).load_children(container)
    }
}

impl<T: ChildrenLoader + ?Sized> ChildrenLoader for Arc<T> {
    fn load_children(&self, container: &NodeKey) -> Result<Vec<ChildDescriptor>, BoxError> {
        (**self).load_children(container)
    }
}

impl<T: NameExists + ?Sized> NameExists for Box<T> {
    fn name_exists(&self, scope: &NodeKey, candidate: &str) -> Result<bool, BoxError> {
        (**self).name_exists(scope, candidate)
    }
}

impl<T: NameExists + ?Sized> NameExists for Rc<T> {
    fn name_exists(&self, scope: &NodeKey, candidate: &str) -> Result<bool, BoxError> {
        (**self).name_exists(scope, candidate)
    }
}

impl<T: NameExists + ?Sized> NameExists for Arc<T> {
    fn name_exists(&self, scope: &NodeKey, candidate: &str) -> Result<bool, BoxError> {
        (**self).name_exists(scope, candidate)
    }
}

/// Adapter turning a closure into a [`ChildrenLoader`].
#[derive(Debug, Clone, Copy)]
pub struct LoaderFn<F>(pub F);

impl<F> ChildrenLoader for LoaderFn<F>
where
    F: Fn(&NodeKey) -> Result<Vec<ChildDescriptor>, BoxError>,
{
    fn load_children(&self, container: &NodeKey) -> Result<Vec<ChildDescriptor>, BoxError> {
        (self.0)(container)
    }
}

/// Adapter turning a closure into a [`NameExists`] predicate.
#[derive(Debug, Clone, Copy)]
pub struct NameExistsFn<F>(pub F);

impl<F> NameExists for NameExistsFn<F>
where
    F: Fn(&NodeKey, &str) -> Result<bool, BoxError>,
{
    fn name_exists(&self, scope: &NodeKey, candidate: &str) -> Result<bool, BoxError> {
        (self.0)(scope, candidate)
    }
}

/// Loader for trees built entirely by hand: every container starts empty.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoChildren;

impl ChildrenLoader for NoChildren {
    fn load_children(&self, _container: &NodeKey) -> Result<Vec<ChildDescriptor>, BoxError> {
        Ok(Vec::new())
    }
}

/// Predicate reporting every name as free.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoNames;

impl NameExists for NoNames {
    fn name_exists(&self, _scope: &NodeKey, _candidate: &str) -> Result<bool, BoxError> {
        Ok(false)
    }
}
