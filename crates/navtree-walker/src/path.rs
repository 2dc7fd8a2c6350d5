//! External keys: root-to-node sequences of internal keys.

use std::fmt;
use std::str::FromStr;

use itertools::Itertools;

use navtree_core::{NavError, NodeKey, PATH_SEPARATOR};

/// Ordered keys from (but excluding) the root down to a node.
///
/// The canonical text form joins the keys with `/`, e.g. `content/articles`.
/// The empty path addresses the root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct NodePath(Vec<NodeKey>);

impl NodePath {
    /// Create a path from its segments.
    pub fn new(segments: Vec<NodeKey>) -> Self {
        Self(segments)
    }

    /// The empty path.
    pub fn root() -> Self {
        Self::default()
    }

    /// All segments, outermost first.
    pub fn segments(&self) -> &[NodeKey] {
        &self.0
    }

    /// The last segment: the key of the addressed node.
    pub fn leaf(&self) -> Option<&NodeKey> {
        self.0.last()
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if this is the root path.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Extend the path by one segment.
    pub fn child(&self, key: NodeKey) -> Self {
        let mut segments = self.0.clone();
        segments.push(key);
        Self(segments)
    }

    /// The path with its last segment removed.
    pub fn parent(&self) -> Option<Self> {
        let (_, rest) = self.0.split_last()?;
        Some(Self(rest.to_vec()))
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.iter().join(&PATH_SEPARATOR.to_string()))
    }
}

impl FromStr for NodePath {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.split(PATH_SEPARATOR)
            .filter(|segment| !segment.is_empty())
            .map(NodeKey::new)
            .collect::<Result<Vec<_>, _>>()
            .map(Self)
    }
}

impl From<Vec<NodeKey>> for NodePath {
    fn from(segments: Vec<NodeKey>) -> Self {
        Self(segments)
    }
}
