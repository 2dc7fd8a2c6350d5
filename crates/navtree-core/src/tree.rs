//! The node registry and container operations.
//!
//! [`NodeTree`] is an arena keyed by [`NodeKey`]: every attached node lives in
//! one flat registry, containers hold the keys of their children and children
//! hold the key of their parent. Ownership therefore flows one way, from the
//! registry to the nodes, and the parent link is a plain lookup key.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use tracing::{debug, trace};

use crate::config::NavConfig;
use crate::error::{NavError, NavResult};
use crate::filter::WildcardFilter;
use crate::key::{GENERATED_KEY_MARKER, KeyGenerator, NodeKey};
use crate::node::{ContainerState, Node, NodeType};
use crate::source::ChildrenLoader;

/// Lazily populated tree of navigation nodes.
pub struct NodeTree {
    registry: IndexMap<NodeKey, Node>,
    root: NodeKey,
    keys: KeyGenerator,
    loader: Box<dyn ChildrenLoader>,
    lockable_by_default: bool,
}

impl fmt::Debug for NodeTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeTree")
            .field("root", &self.root)
            .field("nodes", &self.registry.len())
            .finish_non_exhaustive()
    }
}

impl NodeTree {
    /// Create a tree holding only an unpopulated root container.
    pub fn new(config: &NavConfig, loader: impl ChildrenLoader + 'static) -> NavResult<Self> {
        let root = Node::container(config.root_key.clone(), &config.root_title)?
            .with_lockable(config.lockable_by_default);
        let root_key = root.key().clone();

        let mut registry = IndexMap::new();
        registry.insert(root_key.clone(), root);

        Ok(Self {
            registry,
            root: root_key,
            keys: KeyGenerator::new(config.key_prefix.as_str()),
            loader: Box::new(loader),
            lockable_by_default: config.lockable_by_default,
        })
    }

    /// Key of the root container.
    pub fn root(&self) -> &NodeKey {
        &self.root
    }

    /// Number of registered nodes, root included.
    pub fn len(&self) -> usize {
        self.registry.len()
    }

    /// A tree always holds at least its root.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Check whether a key is registered.
    pub fn contains(&self, key: &NodeKey) -> bool {
        self.registry.contains_key(key)
    }

    /// Look up a node; a miss is a normal outcome.
    pub fn get(&self, key: &NodeKey) -> Option<&Node> {
        self.registry.get(key)
    }

    /// Look up a node that must be attached.
    pub fn node(&self, key: &NodeKey) -> NavResult<&Node> {
        self.registry
            .get(key)
            .ok_or_else(|| NavError::UnknownNode { key: key.clone() })
    }

    /// All registered nodes in registration order.
    pub fn iter(&self) -> impl Iterator<Item = (&NodeKey, &Node)> {
        self.registry.iter()
    }

    /// Allocate a fresh key that is not registered.
    pub fn next_key(&mut self) -> NodeKey {
        let registry = &self.registry;
        self.keys.next_key(|key| registry.contains_key(key))
    }

    /// Build a detached leaf under a fresh key.
    pub fn new_leaf(&mut self, title: &str) -> NavResult<Node> {
        let key = self.next_key();
        Ok(Node::leaf(key, title)?.with_lockable(self.lockable_by_default))
    }

    /// Build a detached, unpopulated container under a fresh key.
    pub fn new_container(&mut self, title: &str) -> NavResult<Node> {
        let key = self.next_key();
        Ok(Node::container(key, title)?.with_lockable(self.lockable_by_default))
    }

    fn container(&self, key: &NodeKey) -> NavResult<&ContainerState> {
        self.node(key)?
            .container_state()
            .ok_or_else(|| NavError::NotAContainer { key: key.clone() })
    }

    fn container_mut(&mut self, key: &NodeKey) -> NavResult<&mut ContainerState> {
        self.registry
            .get_mut(key)
            .ok_or_else(|| NavError::UnknownNode { key: key.clone() })?
            .container_state_mut()
            .ok_or_else(|| NavError::NotAContainer { key: key.clone() })
    }

    /// Whether a container's children have been loaded or allocated.
    pub fn is_populated(&self, key: &NodeKey) -> NavResult<bool> {
        Ok(self.container(key)?.is_populated())
    }

    /// Load a container's children through the loader if not done yet.
    ///
    /// The whole batch is validated before any child is registered, so a bad
    /// descriptor leaves the container unpopulated.
    pub fn populate(&mut self, key: &NodeKey) -> NavResult<()> {
        if self.container(key)?.is_populated() {
            return Ok(());
        }

        let descriptors = self
            .loader
            .load_children(key)
            .map_err(NavError::Collaborator)?;

        let mut claimed = HashSet::new();
        for explicit in descriptors.iter().filter_map(|d| d.key.as_ref()) {
            if explicit.is_generated() {
                return Err(NavError::invalid_argument(format!(
                    "loader key {explicit} under {key} uses the reserved '{GENERATED_KEY_MARKER}' prefix"
                )));
            }
            if self.registry.contains_key(explicit) || !claimed.insert(explicit.clone()) {
                return Err(NavError::invalid_argument(format!(
                    "loader returned duplicate key {explicit} under {key}"
                )));
            }
        }

        let mut nodes = Vec::with_capacity(descriptors.len());
        for descriptor in &descriptors {
            let child_key = match &descriptor.key {
                Some(explicit) => explicit.clone(),
                None => {
                    let registry = &self.registry;
                    let generated = self
                        .keys
                        .next_key(|k| registry.contains_key(k) || claimed.contains(k));
                    claimed.insert(generated.clone());
                    generated
                }
            };
            nodes.push(Node::from_descriptor(
                child_key,
                descriptor,
                self.lockable_by_default,
            )?);
        }

        let mut children = Vec::with_capacity(nodes.len());
        for mut node in nodes {
            node.parent = Some(key.clone());
            children.push(node.key().clone());
            self.register(node);
        }

        debug!(container = %key, count = children.len(), "Populated container");
        self.container_mut(key)?.children = Some(children);
        Ok(())
    }

    /// Children of a container, loading them on first access.
    pub fn children(&mut self, key: &NodeKey) -> NavResult<&[NodeKey]> {
        self.populate(key)?;
        self.loaded_children(key)
    }

    /// Children of a container without triggering a load (empty when unloaded).
    pub fn loaded_children(&self, key: &NodeKey) -> NavResult<&[NodeKey]> {
        Ok(self.container(key)?.children().unwrap_or(&[]))
    }

    /// Append a detached node to a container and register it.
    pub fn add_node(&mut self, container: &NodeKey, mut node: Node) -> NavResult<NodeKey> {
        if self.registry.contains_key(node.key()) {
            return Err(NavError::invalid_argument(format!(
                "node {} is already registered",
                node.key()
            )));
        }

        let key = node.key().clone();
        self.container_mut(container)?
            .children
            .get_or_insert_with(Vec::new)
            .push(key.clone());
        node.parent = Some(container.clone());
        self.register(node);

        debug!(container = %container, key = %key, "Added node");
        Ok(key)
    }

    /// Detach a node (and its subtree) from its parent and the registry.
    ///
    /// The subtree is unregistered first and the parent's child list updated
    /// second. The detached node is returned with no parent and, for a
    /// container, no children.
    pub fn remove_node(&mut self, key: &NodeKey) -> NavResult<Node> {
        if *key == self.root {
            return Err(NavError::illegal_state("the root cannot be removed"));
        }

        let parent = self
            .node(key)?
            .parent
            .clone()
            .ok_or_else(|| NavError::illegal_state(format!("node {key} has no parent")))?;

        let position = self
            .loaded_children(&parent)?
            .iter()
            .position(|child| child == key)
            .ok_or_else(|| NavError::ChildNotFound {
                container: parent.clone(),
                child: key.clone(),
            })?;

        let mut node = self.forget_subtree(key)?;
        if let Some(children) = self.container_mut(&parent)?.children.as_mut() {
            children.remove(position);
        }

        node.parent = None;
        node.selected_row = false;
        if let Some(state) = node.container_state_mut() {
            state.children = None;
            state.row_index = None;
        }

        debug!(container = %parent, key = %key, "Removed node");
        Ok(node)
    }

    /// Drop a container's children so they are reloaded on next access.
    pub fn reset_children(&mut self, key: &NodeKey) -> NavResult<()> {
        let children = self.container(key)?.children().unwrap_or(&[]).to_vec();
        for child in &children {
            self.forget_subtree(child)?;
        }

        let state = self.container_mut(key)?;
        state.children = None;
        state.row_index = None;

        debug!(container = %key, dropped = children.len(), "Reset children");
        Ok(())
    }

    /// Add a node to the registry.
    fn register(&mut self, node: Node) {
        trace!(key = %node.key(), "Registered node");
        self.registry.insert(node.key().clone(), node);
    }

    /// Drop a node from the registry.
    fn forget(&mut self, key: &NodeKey) -> Option<Node> {
        trace!(key = %key, "Forgot node");
        self.registry.shift_remove(key)
    }

    /// Unregister a node and every loaded descendant, returning the node.
    fn forget_subtree(&mut self, key: &NodeKey) -> NavResult<Node> {
        let node = self
            .forget(key)
            .ok_or_else(|| NavError::UnknownNode { key: key.clone() })?;

        let mut pending: Vec<NodeKey> = node
            .container_state()
            .and_then(ContainerState::children)
            .map(<[NodeKey]>::to_vec)
            .unwrap_or_default();
        while let Some(next) = pending.pop() {
            if let Some(descendant) = self.forget(&next) {
                if let Some(children) = descendant
                    .container_state()
                    .and_then(ContainerState::children)
                {
                    pending.extend_from_slice(children);
                }
            }
        }

        Ok(node)
    }

    /// Set or clear a container's wildcard filter.
    pub fn set_filter(&mut self, key: &NodeKey, pattern: Option<&str>) -> NavResult<()> {
        let filter = match pattern {
            Some(pattern) => WildcardFilter::compile(pattern)?,
            None => None,
        };
        debug!(container = %key, filter = ?pattern, "Set filter");
        self.container_mut(key)?.filter = filter;
        Ok(())
    }

    /// The container's active filter pattern.
    pub fn filter(&self, key: &NodeKey) -> NavResult<Option<&str>> {
        Ok(self.container(key)?.filter())
    }

    /// Loaded children that pass the container's filter, without touching selection.
    pub fn matching_children(&self, key: &NodeKey) -> NavResult<Vec<NodeKey>> {
        let state = self.container(key)?;
        let children = state.children().unwrap_or(&[]);
        Ok(match &state.filter {
            None => children.to_vec(),
            Some(filter) => children
                .iter()
                .filter(|child| {
                    self.registry
                        .get(*child)
                        .is_some_and(|node| filter.matches(node.title()))
                })
                .cloned()
                .collect(),
        })
    }

    /// The filtered view of a container, loading it if needed.
    ///
    /// Children hidden by the filter lose their selection flag. When the view
    /// is non-empty and nothing in it is selected, the first row is selected,
    /// so a filtered view always shows one selected row.
    pub fn filtered_nodes(&mut self, key: &NodeKey) -> NavResult<Vec<NodeKey>> {
        self.populate(key)?;

        let state = self.container(key)?;
        let children = state.children().unwrap_or(&[]).to_vec();
        let Some(filter) = state.filter.clone() else {
            return Ok(children);
        };

        let mut matched = Vec::with_capacity(children.len());
        for child in children {
            if let Some(node) = self.registry.get_mut(&child) {
                if filter.matches(node.title()) {
                    matched.push(child);
                } else if node.selected_row {
                    node.selected_row = false;
                }
            }
        }

        let any_selected = matched
            .iter()
            .any(|child| self.registry.get(child).is_some_and(Node::is_selected));
        if !any_selected {
            if let Some(first) = matched.first().and_then(|k| self.registry.get_mut(k)) {
                trace!(container = %key, key = %first.key(), "Auto-selected first row");
                first.selected_row = true;
            }
        }

        Ok(matched)
    }

    /// Select a node and clear the flag on its siblings.
    pub fn select_row(&mut self, key: &NodeKey) -> NavResult<()> {
        let parent = self
            .node(key)?
            .parent
            .clone()
            .ok_or_else(|| NavError::illegal_state(format!("node {key} has no parent")))?;

        let siblings = self.loaded_children(&parent)?.to_vec();
        for sibling in &siblings {
            if let Some(node) = self.registry.get_mut(sibling) {
                node.selected_row = sibling == key;
            }
        }
        Ok(())
    }

    /// Clear a node's selection flag.
    pub fn deselect_row(&mut self, key: &NodeKey) -> NavResult<()> {
        self.registry
            .get_mut(key)
            .ok_or_else(|| NavError::UnknownNode { key: key.clone() })?
            .selected_row = false;
        Ok(())
    }

    /// First selected child, optionally restricted to one node type.
    pub fn find_selected(
        &self,
        container: &NodeKey,
        type_filter: Option<NodeType>,
    ) -> NavResult<Option<&Node>> {
        Ok(self
            .loaded_children(container)?
            .iter()
            .filter_map(|child| self.registry.get(child))
            .find(|node| {
                node.is_selected() && type_filter.is_none_or(|ty| node.node_type() == ty)
            }))
    }

    /// True when the container has no children or has not been loaded.
    pub fn is_container_empty(&self, key: &NodeKey) -> NavResult<bool> {
        Ok(self.container(key)?.children().is_none_or(<[NodeKey]>::is_empty))
    }

    /// The container's row cursor.
    pub fn row_index(&self, key: &NodeKey) -> NavResult<Option<usize>> {
        Ok(self.container(key)?.row_index)
    }

    /// Move the row cursor. Out-of-range values are accepted; check
    /// [`is_row_available`](Self::is_row_available) before reading.
    pub fn set_row_index(&mut self, key: &NodeKey, index: Option<usize>) -> NavResult<()> {
        trace!(container = %key, index = ?index, "Set row index");
        self.container_mut(key)?.row_index = index;
        Ok(())
    }

    /// Whether the cursor points at an existing filtered row.
    pub fn is_row_available(&self, key: &NodeKey) -> NavResult<bool> {
        let Some(index) = self.container(key)?.row_index else {
            return Ok(false);
        };
        Ok(index < self.matching_children(key)?.len())
    }

    /// The node under the cursor, if the row is available.
    pub fn row_data(&self, key: &NodeKey) -> NavResult<Option<&Node>> {
        let Some(index) = self.container(key)?.row_index else {
            return Ok(None);
        };
        Ok(self
            .matching_children(key)?
            .get(index)
            .and_then(|child| self.registry.get(child)))
    }

    /// Keys of the ancestors of `key`, nearest first, ending with the root.
    pub fn ancestors<'a>(&'a self, key: &NodeKey) -> Ancestors<'a> {
        Ancestors {
            tree: self,
            next: self.registry.get(key).and_then(Node::parent),
        }
    }

    /// Whether `key` is `ancestor` or lies below it.
    pub fn is_within(&self, key: &NodeKey, ancestor: &NodeKey) -> bool {
        (key == ancestor && self.contains(key)) || self.ancestors(key).any(|k| k == ancestor)
    }

    /// Number of edges between the root and `key`.
    pub fn depth(&self, key: &NodeKey) -> Option<usize> {
        self.contains(key).then(|| self.ancestors(key).count())
    }
}

/// Iterator over the parent chain of a node.
pub struct Ancestors<'a> {
    tree: &'a NodeTree,
    next: Option<&'a NodeKey>,
}

impl<'a> Iterator for Ancestors<'a> {
    type Item = &'a NodeKey;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.tree.registry.get(current).and_then(Node::parent);
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::BoxError;
    use crate::source::{ChildDescriptor, LoaderFn, NoChildren};

    fn key(k: &'static str) -> NodeKey {
        NodeKey::from_static(k)
    }

    fn empty_tree() -> NodeTree {
        NodeTree::new(&NavConfig::default(), NoChildren).unwrap()
    }

    fn fruit_tree() -> NodeTree {
        let mut tree = empty_tree();
        let root = tree.root().clone();
        for title in ["Apple", "Banana", "Avocado"] {
            let node = tree.new_leaf(title).unwrap();
            tree.add_node(&root, node).unwrap();
        }
        tree
    }

    fn titles(tree: &NodeTree, keys: &[NodeKey]) -> Vec<String> {
        keys.iter()
            .map(|k| tree.get(k).unwrap().title().to_string())
            .collect()
    }

    #[test]
    fn test_new_tree_has_unpopulated_root() {
        let tree = empty_tree();
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.root().as_str(), "root");
        assert!(!tree.is_populated(tree.root()).unwrap());
        assert!(tree.is_container_empty(tree.root()).unwrap());
    }

    #[test]
    fn test_add_and_remove_round_trip() {
        let mut tree = empty_tree();
        let root = tree.root().clone();
        let leaf = Node::leaf(key("L1"), "Leaf").unwrap();

        tree.add_node(&root, leaf).unwrap();
        assert_eq!(tree.children(&root).unwrap().len(), 1);
        assert_eq!(tree.get(&key("L1")).unwrap().parent(), Some(&root));

        let removed = tree.remove_node(&key("L1")).unwrap();
        assert_eq!(removed.parent(), None);
        assert!(tree.children(&root).unwrap().is_empty());
        assert!(!tree.contains(&key("L1")));
    }

    #[test]
    fn test_duplicate_key_is_rejected() {
        let mut tree = empty_tree();
        let root = tree.root().clone();
        tree.add_node(&root, Node::leaf(key("L1"), "One").unwrap()).unwrap();
        let err = tree
            .add_node(&root, Node::leaf(key("L1"), "Two").unwrap())
            .unwrap_err();
        assert!(matches!(err, NavError::InvalidArgument { .. }));
    }

    #[test]
    fn test_remove_root_is_illegal() {
        let mut tree = empty_tree();
        let root = tree.root().clone();
        assert!(matches!(
            tree.remove_node(&root),
            Err(NavError::IllegalState { .. })
        ));
    }

    #[test]
    fn test_add_to_leaf_fails() {
        let mut tree = fruit_tree();
        let apple = tree.loaded_children(tree.root()).unwrap()[0].clone();
        let node = tree.new_leaf("Seed").unwrap();
        assert!(matches!(
            tree.add_node(&apple, node),
            Err(NavError::NotAContainer { .. })
        ));
    }

    #[test]
    fn test_lazy_population_calls_loader_once() {
        use std::cell::Cell;
        use std::rc::Rc;

        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        let loader = LoaderFn(move |_: &NodeKey| -> Result<Vec<ChildDescriptor>, BoxError> {
            counter.set(counter.get() + 1);
            Ok(vec![
                ChildDescriptor::container("Content"),
                ChildDescriptor::leaf("Settings").with_key(key("settings")),
            ])
        });

        let mut tree = NodeTree::new(&NavConfig::default(), loader).unwrap();
        let root = tree.root().clone();
        assert_eq!(tree.children(&root).unwrap().len(), 2);
        assert_eq!(tree.children(&root).unwrap().len(), 2);
        assert_eq!(calls.get(), 1);
        assert!(tree.contains(&key("settings")));
        assert!(tree.contains(&key("~n1")));
    }

    #[test]
    fn test_population_rejects_duplicate_keys_atomically() {
        let loader = LoaderFn(|_: &NodeKey| -> Result<Vec<ChildDescriptor>, BoxError> {
            Ok(vec![
                ChildDescriptor::leaf("One").with_key(key("dup")),
                ChildDescriptor::leaf("Two").with_key(key("dup")),
            ])
        });
        let mut tree = NodeTree::new(&NavConfig::default(), loader).unwrap();
        let root = tree.root().clone();
        assert!(tree.children(&root).is_err());
        assert!(!tree.is_populated(&root).unwrap());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_generated_keys_avoid_explicit_keys_in_batch() {
        let loader = LoaderFn(|_: &NodeKey| -> Result<Vec<ChildDescriptor>, BoxError> {
            Ok(vec![
                ChildDescriptor::leaf("Generated"),
                ChildDescriptor::leaf("Explicit").with_key(key("n1")),
            ])
        });
        let mut tree = NodeTree::new(&NavConfig::default(), loader).unwrap();
        let root = tree.root().clone();
        let children = tree.children(&root).unwrap().to_vec();
        assert_eq!(children.len(), 2);
        assert_eq!(children[0].as_str(), "~n1");
        assert_eq!(tree.get(&key("n1")).unwrap().title(), "Explicit");
    }

    #[test]
    fn test_loader_cannot_use_generated_namespace() {
        let loader = LoaderFn(|_: &NodeKey| -> Result<Vec<ChildDescriptor>, BoxError> {
            Ok(vec![ChildDescriptor::leaf("Sneaky").with_key(key("~n1"))])
        });
        let mut tree = NodeTree::new(&NavConfig::default(), loader).unwrap();
        let root = tree.root().clone();
        let err = tree.children(&root).unwrap_err();
        assert!(matches!(err, NavError::InvalidArgument { .. }));
        assert!(!tree.is_populated(&root).unwrap());
    }

    #[test]
    fn test_root_follows_lockable_default() {
        let config = NavConfig::builder()
            .lockable_by_default(false)
            .build()
            .unwrap();
        let tree = NodeTree::new(&config, NoChildren).unwrap();
        assert!(!tree.node(tree.root()).unwrap().is_lockable());
        assert!(NodeTree::new(&NavConfig::default(), NoChildren)
            .unwrap()
            .node(&key("root"))
            .unwrap()
            .is_lockable());
    }

    #[test]
    fn test_wildcard_filter_selects_first_match() {
        let mut tree = fruit_tree();
        let root = tree.root().clone();
        tree.set_filter(&root, Some("A*")).unwrap();

        let filtered = tree.filtered_nodes(&root).unwrap();
        assert_eq!(titles(&tree, &filtered), vec!["Apple", "Avocado"]);

        let selected: Vec<_> = filtered
            .iter()
            .filter(|k| tree.get(k).unwrap().is_selected())
            .collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(tree.get(selected[0]).unwrap().title(), "Apple");
    }

    #[test]
    fn test_filter_deselects_hidden_rows() {
        let mut tree = fruit_tree();
        let root = tree.root().clone();
        let banana = tree.loaded_children(&root).unwrap()[1].clone();
        tree.select_row(&banana).unwrap();

        tree.set_filter(&root, Some("a*")).unwrap();
        let filtered = tree.filtered_nodes(&root).unwrap();

        assert!(!tree.get(&banana).unwrap().is_selected());
        assert!(tree.get(&filtered[0]).unwrap().is_selected());
    }

    #[test]
    fn test_filter_keeps_existing_selection() {
        let mut tree = fruit_tree();
        let root = tree.root().clone();
        let avocado = tree.loaded_children(&root).unwrap()[2].clone();
        tree.select_row(&avocado).unwrap();

        tree.set_filter(&root, Some("A*")).unwrap();
        tree.filtered_nodes(&root).unwrap();
        let again = tree.filtered_nodes(&root).unwrap();

        let selected: Vec<_> = again
            .iter()
            .filter(|k| tree.get(k).unwrap().is_selected())
            .cloned()
            .collect();
        assert_eq!(selected, vec![avocado]);
    }

    #[test]
    fn test_blank_filter_returns_all_children() {
        let mut tree = fruit_tree();
        let root = tree.root().clone();
        tree.set_filter(&root, Some("   ")).unwrap();
        assert_eq!(tree.filter(&root).unwrap(), None);
        assert_eq!(tree.filtered_nodes(&root).unwrap().len(), 3);
    }

    #[test]
    fn test_invalid_filter_leaves_previous_filter() {
        let mut tree = fruit_tree();
        let root = tree.root().clone();
        tree.set_filter(&root, Some("B*")).unwrap();
        assert!(tree.set_filter(&root, Some("[")).is_err());
        assert_eq!(tree.filter(&root).unwrap(), Some("B*"));
    }

    #[test]
    fn test_find_selected_honours_type_filter() {
        let mut tree = fruit_tree();
        let root = tree.root().clone();
        assert!(tree.find_selected(&root, None).unwrap().is_none());

        let apple = tree.loaded_children(&root).unwrap()[0].clone();
        tree.select_row(&apple).unwrap();
        assert_eq!(
            tree.find_selected(&root, Some(NodeType::Leaf)).unwrap().map(Node::key),
            Some(&apple)
        );
        assert!(
            tree.find_selected(&root, Some(NodeType::Container))
                .unwrap()
                .is_none()
        );
    }

    #[test]
    fn test_select_row_is_exclusive() {
        let mut tree = fruit_tree();
        let root = tree.root().clone();
        let children = tree.loaded_children(&root).unwrap().to_vec();
        tree.select_row(&children[0]).unwrap();
        tree.select_row(&children[2]).unwrap();
        let selected = children
            .iter()
            .filter(|k| tree.get(k).unwrap().is_selected())
            .count();
        assert_eq!(selected, 1);
        assert!(tree.get(&children[2]).unwrap().is_selected());
    }

    #[test]
    fn test_row_cursor_bounds() {
        let mut tree = fruit_tree();
        let root = tree.root().clone();
        assert!(!tree.is_row_available(&root).unwrap());

        tree.set_row_index(&root, Some(1)).unwrap();
        assert!(tree.is_row_available(&root).unwrap());
        assert_eq!(tree.row_data(&root).unwrap().unwrap().title(), "Banana");

        tree.set_row_index(&root, Some(10)).unwrap();
        assert_eq!(tree.row_index(&root).unwrap(), Some(10));
        assert!(!tree.is_row_available(&root).unwrap());
        assert!(tree.row_data(&root).unwrap().is_none());
    }

    #[test]
    fn test_remove_container_forgets_subtree() {
        let mut tree = empty_tree();
        let root = tree.root().clone();
        let section = tree.new_container("Section").unwrap();
        let section = tree.add_node(&root, section).unwrap();
        let page = tree.new_leaf("Page").unwrap();
        let page = tree.add_node(&section, page).unwrap();

        let removed = tree.remove_node(&section).unwrap();
        assert!(!tree.contains(&section));
        assert!(!tree.contains(&page));
        assert!(!removed.container_state().unwrap().is_populated());
        assert_eq!(tree.len(), 1);
    }

    #[test]
    fn test_reset_children_forces_reload() {
        let mut tree = fruit_tree();
        let root = tree.root().clone();
        tree.set_row_index(&root, Some(0)).unwrap();
        tree.reset_children(&root).unwrap();

        assert!(!tree.is_populated(&root).unwrap());
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.row_index(&root).unwrap(), None);
        // NoChildren reloads an empty list.
        assert!(tree.children(&root).unwrap().is_empty());
    }

    #[test]
    fn test_ancestors_and_depth() {
        let mut tree = empty_tree();
        let root = tree.root().clone();
        let a = tree.new_container("A").unwrap();
        let a = tree.add_node(&root, a).unwrap();
        let b = tree.new_leaf("B").unwrap();
        let b = tree.add_node(&a, b).unwrap();

        let chain: Vec<_> = tree.ancestors(&b).cloned().collect();
        assert_eq!(chain, vec![a.clone(), root.clone()]);
        assert_eq!(tree.depth(&b), Some(2));
        assert_eq!(tree.depth(&root), Some(0));
        assert!(tree.is_within(&b, &a));
        assert!(tree.is_within(&a, &a));
        assert!(!tree.is_within(&a, &b));
    }
}
