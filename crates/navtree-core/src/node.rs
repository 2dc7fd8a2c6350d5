//! Leaf and container node types.

use std::borrow::Cow;

use compact_str::CompactString;
use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::error::{NavError, NavResult};
use crate::filter::WildcardFilter;
use crate::key::NodeKey;
use crate::source::ChildDescriptor;

/// What happens when a node is performed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Display, EnumString, Serialize, Deserialize,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NodeAction {
    /// Focus the node and return its outcome.
    #[default]
    Navigate,
    /// Lock the node for editing, then navigate.
    Edit,
    /// Release the edit lock, then navigate.
    Release,
    /// Release the edit lock and move up to the parent container.
    GotoParent,
}

/// Runtime type of a node, used to narrow selection queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum NodeType {
    Leaf,
    Container,
}

/// Per-container state: children, filter and walker cursor.
#[derive(Debug, Clone, Default)]
pub struct ContainerState {
    /// Child keys in display order; `None` until first populated.
    pub(crate) children: Option<Vec<NodeKey>>,
    /// Active wildcard filter.
    pub(crate) filter: Option<WildcardFilter>,
    /// Walker cursor into the filtered rows.
    pub(crate) row_index: Option<usize>,
}

impl ContainerState {
    /// Whether the children have been loaded or allocated.
    pub fn is_populated(&self) -> bool {
        self.children.is_some()
    }

    /// Children if populated.
    pub fn children(&self) -> Option<&[NodeKey]> {
        self.children.as_deref()
    }

    /// The active filter pattern, if any.
    pub fn filter(&self) -> Option<&str> {
        self.filter.as_ref().map(WildcardFilter::pattern)
    }

    /// The walker cursor.
    pub fn row_index(&self) -> Option<usize> {
        self.row_index
    }
}

/// Leaf or container payload of a node.
#[derive(Debug, Clone)]
pub enum NodeKind {
    /// A plain addressable entry.
    Leaf,
    /// A category owning an ordered list of children.
    Container(ContainerState),
}

impl NodeKind {
    /// Check if this is a container.
    pub fn is_container(&self) -> bool {
        matches!(self, NodeKind::Container(_))
    }

    /// Runtime type.
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Leaf => NodeType::Leaf,
            NodeKind::Container(_) => NodeType::Container,
        }
    }
}

/// A single addressable element of the navigation tree.
///
/// Nodes are plain values until added to a [`NodeTree`](crate::NodeTree).
/// From then on the tree owns them and hands out shared references only,
/// so the key and parent link cannot change behind the registry's back.
#[derive(Debug, Clone)]
pub struct Node {
    key: NodeKey,
    title: CompactString,
    label: Option<CompactString>,
    outcome: Option<CompactString>,
    pub(crate) parent: Option<NodeKey>,
    pub(crate) selected_row: bool,
    lockable: bool,
    action: NodeAction,
    pub(crate) kind: NodeKind,
}

impl Node {
    /// Create a leaf node.
    pub fn leaf(key: NodeKey, title: &str) -> NavResult<Self> {
        Self::with_kind(key, title, NodeKind::Leaf)
    }

    /// Create an unpopulated container node.
    pub fn container(key: NodeKey, title: &str) -> NavResult<Self> {
        Self::with_kind(key, title, NodeKind::Container(ContainerState::default()))
    }

    /// Create a node from a loader descriptor under the given key.
    pub fn from_descriptor(
        key: NodeKey,
        descriptor: &ChildDescriptor,
        lockable_by_default: bool,
    ) -> NavResult<Self> {
        let mut node = if descriptor.is_container {
            Self::container(key, &descriptor.title)?
        } else {
            Self::leaf(key, &descriptor.title)?
        };
        node.label = descriptor.label.as_deref().map(CompactString::from);
        node.outcome = descriptor.outcome.as_deref().map(CompactString::from);
        node.action = descriptor.action;
        node.lockable = descriptor.lockable.unwrap_or(lockable_by_default);
        Ok(node)
    }

    fn with_kind(key: NodeKey, title: &str, kind: NodeKind) -> NavResult<Self> {
        if title.trim().is_empty() {
            return Err(NavError::invalid_argument(format!(
                "node {key} requires a non-blank title"
            )));
        }

        Ok(Self {
            key,
            title: title.into(),
            label: None,
            outcome: None,
            parent: None,
            selected_row: false,
            lockable: true,
            action: NodeAction::default(),
            kind,
        })
    }

    /// Set the outcome token.
    pub fn with_outcome(mut self, outcome: impl Into<CompactString>) -> Self {
        self.outcome = Some(outcome.into());
        self
    }

    /// Set an explicit display label.
    pub fn with_label(mut self, label: impl Into<CompactString>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Set the perform behaviour.
    pub fn with_action(mut self, action: NodeAction) -> Self {
        self.action = action;
        self
    }

    /// Set edit-lock participation.
    pub fn with_lockable(mut self, lockable: bool) -> Self {
        self.lockable = lockable;
        self
    }

    /// Mark a container as loaded with no children, so the loader is never
    /// consulted for it. No effect on leaves.
    pub fn with_no_children(mut self) -> Self {
        if let NodeKind::Container(state) = &mut self.kind {
            state.children.get_or_insert_with(Vec::new);
        }
        self
    }

    /// Replace the key. Only possible while the node is not yet in a tree.
    pub fn set_key(&mut self, key: NodeKey) {
        self.key = key;
    }

    /// The node's key.
    pub fn key(&self) -> &NodeKey {
        &self.key
    }

    /// The node's title.
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The explicit label, or the title when none was set.
    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.title)
    }

    /// The label truncated to `width` characters.
    pub fn display_label(&self, width: usize) -> Cow<'_, str> {
        truncate_label(self.label(), width)
    }

    /// The outcome token; `None` means the node is not navigable.
    pub fn outcome(&self) -> Option<&str> {
        self.outcome.as_deref()
    }

    /// Key of the owning container; `None` for the root and detached nodes.
    pub fn parent(&self) -> Option<&NodeKey> {
        self.parent.as_ref()
    }

    /// The transient selection flag.
    pub fn is_selected(&self) -> bool {
        self.selected_row
    }

    /// Whether the node participates in the edit lock.
    pub fn is_lockable(&self) -> bool {
        self.lockable
    }

    /// The perform behaviour.
    pub fn action(&self) -> NodeAction {
        self.action
    }

    /// Leaf or container payload.
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// Runtime type.
    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    /// Check if this node is a container.
    pub fn is_container(&self) -> bool {
        self.kind.is_container()
    }

    /// Container state, if this node is a container.
    pub fn container_state(&self) -> Option<&ContainerState> {
        match &self.kind {
            NodeKind::Container(state) => Some(state),
            NodeKind::Leaf => None,
        }
    }

    pub(crate) fn container_state_mut(&mut self) -> Option<&mut ContainerState> {
        match &mut self.kind {
            NodeKind::Container(state) => Some(state),
            NodeKind::Leaf => None,
        }
    }
}

/// Truncate a label to `width` characters, marking the cut with "...".
pub fn truncate_label(label: &str, width: usize) -> Cow<'_, str> {
    if label.chars().count() <= width {
        return Cow::Borrowed(label);
    }

    const ELLIPSIS: &str = "...";
    let keep = width.saturating_sub(ELLIPSIS.len());
    let mut truncated: String = label.chars().take(keep).collect();
    truncated.push_str(&ELLIPSIS[..width.min(ELLIPSIS.len())]);
    Cow::Owned(truncated)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(k: &'static str) -> NodeKey {
        NodeKey::from_static(k)
    }

    #[test]
    fn test_blank_title_is_rejected() {
        let err = Node::leaf(key("a"), "  ").unwrap_err();
        assert!(matches!(err, NavError::InvalidArgument { .. }));
    }

    #[test]
    fn test_leaf_defaults() {
        let node = Node::leaf(key("a"), "Articles").unwrap();
        assert_eq!(node.label(), "Articles");
        assert_eq!(node.outcome(), None);
        assert_eq!(node.parent(), None);
        assert!(!node.is_selected());
        assert!(!node.is_container());
        assert_eq!(node.action(), NodeAction::Navigate);
    }

    #[test]
    fn test_container_starts_unpopulated() {
        let node = Node::container(key("c"), "Content").unwrap();
        let state = node.container_state().unwrap();
        assert!(!state.is_populated());
        assert_eq!(state.row_index(), None);
        assert_eq!(node.node_type(), NodeType::Container);

        let loaded = node.with_no_children();
        assert!(loaded.container_state().unwrap().is_populated());
        assert_eq!(loaded.container_state().unwrap().children(), Some(&[][..]));
    }

    #[test]
    fn test_from_descriptor_copies_metadata() {
        let descriptor = ChildDescriptor::leaf("Edit article")
            .with_outcome("edit-article")
            .with_action(NodeAction::Edit);
        let node = Node::from_descriptor(key("e"), &descriptor, false).unwrap();
        assert_eq!(node.outcome(), Some("edit-article"));
        assert_eq!(node.action(), NodeAction::Edit);
        assert!(!node.is_lockable());
    }

    #[test]
    fn test_set_key_before_registration() {
        let mut node = Node::leaf(key("a"), "Articles").unwrap();
        node.set_key(key("L1"));
        assert_eq!(node.key().as_str(), "L1");
    }

    #[test]
    fn test_truncate_label() {
        assert_eq!(truncate_label("Short", 10), "Short");
        assert_eq!(truncate_label("A much longer title", 10), "A much ...");
        assert_eq!(truncate_label("Überschrift", 11), "Überschrift");
        assert_eq!(truncate_label("abcdef", 2), "..");
    }

    #[test]
    fn test_action_parses_kebab_case() {
        assert_eq!("goto-parent".parse::<NodeAction>().unwrap(), NodeAction::GotoParent);
        assert_eq!(NodeAction::Release.to_string(), "release");
    }
}
