//! The current-container cursor over a [`NodeTree`].

use tracing::{debug, trace, warn};

use navtree_core::{NavError, NavResult, Node, NodeKey, NodeTree};

use crate::path::NodePath;

/// Walks a [`NodeTree`], tracking the container being displayed and the
/// last focused node.
///
/// Structural mutations that can detach nodes go through the walker so the
/// current container always refers to a registered container.
#[derive(Debug)]
pub struct TreeWalker {
    tree: NodeTree,
    current: NodeKey,
    focus: Option<NodeKey>,
}

impl TreeWalker {
    /// Start walking at the root of `tree`.
    pub fn new(tree: NodeTree) -> Self {
        let current = tree.root().clone();
        Self {
            tree,
            current,
            focus: None,
        }
    }

    /// The underlying tree.
    pub fn tree(&self) -> &NodeTree {
        &self.tree
    }

    /// Key of the root container.
    pub fn root(&self) -> &NodeKey {
        self.tree.root()
    }

    /// Look up a node by internal key.
    pub fn get(&self, key: &NodeKey) -> Option<&Node> {
        self.tree.get(key)
    }

    /// The container currently displayed.
    pub fn current_container(&self) -> &NodeKey {
        &self.current
    }

    /// Move the cursor to a container.
    pub fn set_current_container(&mut self, key: &NodeKey) -> NavResult<()> {
        if !self.tree.node(key)?.is_container() {
            return Err(NavError::NotAContainer { key: key.clone() });
        }
        trace!(container = %key, "Set current container");
        self.current = key.clone();
        Ok(())
    }

    /// Leaf key of the last focused node.
    pub fn focus_key(&self) -> Option<&NodeKey> {
        self.focus.as_ref()
    }

    /// Remember the node addressed by `path`. Only the last segment is kept.
    pub fn set_focus(&mut self, path: &NodePath) {
        self.focus = path.leaf().cloned();
        trace!(focus = ?self.focus, "Set focus");
    }

    pub fn clear_focus(&mut self) {
        self.focus = None;
    }

    /// Resolve an external key to a node.
    ///
    /// Only the last segment is looked up; the earlier segments are not
    /// checked against the actual ancestry. On a hit the node's parent
    /// becomes the current container and its cursor is placed on the node,
    /// or cleared when the parent's filter hides it.
    pub fn resolve_path(&mut self, path: &NodePath) -> Option<&Node> {
        let leaf = path.leaf()?;
        let parent = self.tree.get(leaf)?.parent().cloned();

        if let Some(parent) = parent {
            if let Err(err) = self.place_cursor(&parent, leaf) {
                warn!(path = %path, error = %err, "Failed to place cursor");
            }
        }
        self.tree.get(leaf)
    }

    fn place_cursor(&mut self, container: &NodeKey, key: &NodeKey) -> NavResult<()> {
        let row = self
            .tree
            .matching_children(container)?
            .iter()
            .position(|child| child == key);
        self.tree.set_row_index(container, row)?;
        self.current = container.clone();
        Ok(())
    }

    /// Load every container along `path` and return the key of the last one.
    ///
    /// Unlike [`resolve_path`](Self::resolve_path) each segment must be a
    /// child of the one before it. The empty path loads the root.
    pub fn load_path(&mut self, path: &NodePath) -> NavResult<NodeKey> {
        let mut current = self.tree.root().clone();
        for segment in path.segments() {
            if !self.tree.children(&current)?.contains(segment) {
                return Err(NavError::ChildNotFound {
                    container: current,
                    child: segment.clone(),
                });
            }
            current = segment.clone();
        }
        self.tree.populate(&current)?;
        trace!(path = %path, container = %current, "Loaded path");
        Ok(current)
    }

    /// Build the external key of a registered node. The root maps to the
    /// empty path.
    pub fn build_path(&self, key: &NodeKey) -> Option<NodePath> {
        if !self.tree.contains(key) {
            return None;
        }
        let root = self.tree.root();
        let mut segments: Vec<NodeKey> = std::iter::once(key)
            .chain(self.tree.ancestors(key))
            .take_while(|k| *k != root)
            .cloned()
            .collect();
        segments.reverse();
        Some(NodePath::new(segments))
    }

    /// Descend into the container under the cursor.
    ///
    /// Returns `false`, leaving the cursor alone, when no row is under the
    /// cursor or the row is a leaf.
    pub fn enter_container(&mut self) -> bool {
        let target = match self.tree.row_data(&self.current) {
            Ok(Some(node)) if node.is_container() => node.key().clone(),
            Ok(Some(node)) => {
                warn!(key = %node.key(), "Cannot enter a leaf");
                return false;
            }
            Ok(None) => {
                warn!(container = %self.current, "No row under the cursor");
                return false;
            }
            Err(err) => {
                warn!(container = %self.current, error = %err, "Cannot read cursor row");
                return false;
            }
        };
        trace!(from = %self.current, to = %target, "Entered container");
        self.current = target;
        true
    }

    /// Ascend to the parent of the current container.
    pub fn exit_container(&mut self) -> bool {
        let Some(parent) = self.tree.get(&self.current).and_then(Node::parent).cloned() else {
            warn!(container = %self.current, "Already at the root");
            return false;
        };
        trace!(from = %self.current, to = %parent, "Exited container");
        self.current = parent;
        true
    }

    /// Rows of the current container after filtering.
    pub fn current_rows(&mut self) -> NavResult<Vec<NodeKey>> {
        let current = self.current.clone();
        self.tree.filtered_nodes(&current)
    }

    /// Every node below `from` in depth-first order with its depth relative
    /// to `from`, loading containers on the way down.
    pub fn outline(
        &mut self,
        from: &NodeKey,
        max_depth: Option<usize>,
    ) -> NavResult<Vec<(usize, NodeKey)>> {
        let mut out = Vec::new();
        let mut pending = vec![(0usize, from.clone())];
        while let Some((depth, key)) = pending.pop() {
            if depth > 0 {
                out.push((depth, key.clone()));
            }
            if max_depth.is_some_and(|max| depth >= max) || !self.tree.node(&key)?.is_container() {
                continue;
            }
            let children = self.tree.children(&key)?;
            pending.extend(children.iter().rev().map(|child| (depth + 1, child.clone())));
        }
        Ok(out)
    }

    /// Children of a container, loading them on first access.
    pub fn children(&mut self, key: &NodeKey) -> NavResult<&[NodeKey]> {
        self.tree.children(key)
    }

    /// The filtered view of a container.
    pub fn filtered_nodes(&mut self, key: &NodeKey) -> NavResult<Vec<NodeKey>> {
        self.tree.filtered_nodes(key)
    }

    pub fn set_filter(&mut self, key: &NodeKey, pattern: Option<&str>) -> NavResult<()> {
        self.tree.set_filter(key, pattern)
    }

    pub fn select_row(&mut self, key: &NodeKey) -> NavResult<()> {
        self.tree.select_row(key)
    }

    pub fn set_row_index(&mut self, key: &NodeKey, index: Option<usize>) -> NavResult<()> {
        self.tree.set_row_index(key, index)
    }

    /// Build a detached leaf under a fresh key.
    pub fn new_leaf(&mut self, title: &str) -> NavResult<Node> {
        self.tree.new_leaf(title)
    }

    /// Build a detached container under a fresh key.
    pub fn new_container(&mut self, title: &str) -> NavResult<Node> {
        self.tree.new_container(title)
    }

    pub fn add_node(&mut self, container: &NodeKey, node: Node) -> NavResult<NodeKey> {
        self.tree.add_node(container, node)
    }

    /// Detach a node and its subtree.
    pub fn remove_node(&mut self, key: &NodeKey) -> NavResult<Node> {
        let parent = self.tree.node(key)?.parent().cloned();
        let removed = self.tree.remove_node(key)?;
        if let Some(parent) = parent {
            self.repair(&parent);
        }
        Ok(removed)
    }

    /// Drop a container's children so they reload on next access.
    pub fn reset_children(&mut self, key: &NodeKey) -> NavResult<()> {
        self.tree.reset_children(key)?;
        self.repair(key);
        Ok(())
    }

    /// Move the cursor to `survivor` if the current container was dropped,
    /// and forget a focus that no longer resolves.
    fn repair(&mut self, survivor: &NodeKey) {
        if !self.tree.contains(&self.current) {
            debug!(from = %self.current, to = %survivor, "Current container detached");
            self.current = survivor.clone();
        }
        if self.focus.as_ref().is_some_and(|key| !self.tree.contains(key)) {
            self.focus = None;
        }
    }
}
