//! Session-scoped navigation state.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexSet;
use tracing::{debug, warn};

use navtree_core::{
    ChildrenLoader, NameExists, NavConfig, NavError, NavResult, Node, NodeAction, NodeKey,
    NodeTree,
};
use navtree_walker::{NodePath, TreeWalker};

use crate::lock::EditLock;
use crate::naming::NameGenerator;
use crate::outcome::Sentinel;

/// One user's view of the navigation tree.
///
/// Owns the [`TreeWalker`] and adds the displayed category, the edit lock,
/// the set of disclosed rows and unique naming for created or copied nodes.
pub struct NavigationController {
    walker: TreeWalker,
    names: Box<dyn NameExists>,
    naming: NameGenerator,
    lock: EditLock,
    current_category: NodeKey,
    starting_node: NodeKey,
    disclosed: IndexSet<NodePath>,
    label_width: usize,
}

impl fmt::Debug for NavigationController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NavigationController")
            .field("walker", &self.walker)
            .field("lock", &self.lock)
            .field("current_category", &self.current_category)
            .field("starting_node", &self.starting_node)
            .field("disclosed", &self.disclosed.len())
            .finish_non_exhaustive()
    }
}

impl NavigationController {
    /// Build a session over a fresh tree.
    ///
    /// The root level is loaded immediately to pick the starting node: the
    /// configured starting category if set, else the first root child, else
    /// the root itself.
    pub fn new(
        config: &NavConfig,
        loader: impl ChildrenLoader + 'static,
        names: impl NameExists + 'static,
    ) -> NavResult<Self> {
        let mut walker = TreeWalker::new(NodeTree::new(config, loader)?);
        let starting_node = starting_node(&mut walker, config.starting_category.as_ref())?;
        debug!(starting = %starting_node, "Created navigation session");

        Ok(Self {
            walker,
            names: Box::new(names),
            naming: NameGenerator::from_config(config),
            lock: EditLock::default(),
            current_category: starting_node.clone(),
            starting_node,
            disclosed: IndexSet::new(),
            label_width: config.label_width,
        })
    }

    pub fn walker(&self) -> &TreeWalker {
        &self.walker
    }

    /// Mutable access to the walker.
    ///
    /// Removals made here skip the session's own bookkeeping; use
    /// [`remove_node`](Self::remove_node) and
    /// [`reset_children`](Self::reset_children) instead.
    pub fn walker_mut(&mut self) -> &mut TreeWalker {
        &mut self.walker
    }

    pub fn tree(&self) -> &NodeTree {
        self.walker.tree()
    }

    /// The node focused when the session started.
    ///
    /// Moves to the surviving container when a removal or reset detaches it.
    pub fn starting_node(&self) -> &NodeKey {
        &self.starting_node
    }

    /// The category being displayed.
    pub fn current_category(&self) -> &NodeKey {
        &self.current_category
    }

    pub fn set_current_category(&mut self, key: &NodeKey) -> NavResult<()> {
        if !self.tree().node(key)?.is_container() {
            return Err(NavError::NotAContainer { key: key.clone() });
        }
        debug!(category = %key, "Switched category");
        self.current_category = key.clone();
        Ok(())
    }

    pub fn lock(&self) -> &EditLock {
        &self.lock
    }

    /// The node locked for editing, if any.
    pub fn current_item(&self) -> Option<&NodeKey> {
        self.lock.editing()
    }

    /// Lock `key` for editing.
    ///
    /// Focusing the node that already holds the lock is a no-op; any other
    /// node fails with [`NavError::EditInProgress`].
    pub fn focus(&mut self, key: &NodeKey) -> NavResult<()> {
        self.tree().node(key)?;
        if let Some(editing) = self.lock.editing() {
            if editing != key {
                return Err(NavError::EditInProgress {
                    requested: key.clone(),
                    editing: editing.clone(),
                });
            }
            return Ok(());
        }
        debug!(key = %key, "Entered edit lock");
        self.lock = EditLock::Editing(key.clone());
        Ok(())
    }

    /// Release the edit lock.
    pub fn exit(&mut self) {
        if let EditLock::Editing(key) = std::mem::take(&mut self.lock) {
            debug!(key = %key, "Released edit lock");
        }
    }

    /// Whether a node accepts interaction under the current lock.
    ///
    /// Nodes that do not take part in the lock are always enabled.
    pub fn is_enabled(&self, key: &NodeKey) -> NavResult<bool> {
        let node = self.attached(key)?;
        Ok(!node.is_lockable() || self.lock.admits(key))
    }

    /// Whether the category rows of a container accept interaction.
    pub fn are_category_nodes_enabled(&self, container: &NodeKey) -> NavResult<bool> {
        let node = self.attached(container)?;
        Ok(!(node.is_lockable() && self.lock.is_editing()))
    }

    fn attached(&self, key: &NodeKey) -> NavResult<&Node> {
        self.tree()
            .get(key)
            .ok_or_else(|| NavError::illegal_state(format!("node {key} is not attached")))
    }

    /// Run a node's action and return its outcome.
    ///
    /// Every action ends by focusing the node in the walker, selecting its
    /// row and handing back the node's outcome. `Release` falls back to the
    /// cancel outcome when the node has none.
    pub fn perform(&mut self, key: &NodeKey) -> NavResult<Option<String>> {
        let action = self.tree().node(key)?.action();
        if !self.is_enabled(key)? {
            if let Some(editing) = self.lock.editing() {
                return Err(NavError::NodeDisabled {
                    key: key.clone(),
                    editing: editing.clone(),
                });
            }
        }

        debug!(key = %key, action = %action, "Perform");
        match action {
            NodeAction::Navigate => self.navigate(key),
            NodeAction::Edit => {
                self.focus(key)?;
                self.navigate(key)
            }
            NodeAction::Release => {
                self.exit();
                Ok(Some(
                    self.navigate(key)?
                        .unwrap_or_else(|| Sentinel::Cancel.to_string()),
                ))
            }
            NodeAction::GotoParent => {
                self.exit();
                self.walker.exit_container();
                self.navigate(key)
            }
        }
    }

    fn navigate(&mut self, key: &NodeKey) -> NavResult<Option<String>> {
        if let Some(path) = self.walker.build_path(key) {
            self.walker.set_focus(&path);
        }
        let node = self.tree().node(key)?;
        if node.parent().is_some() {
            self.walker.select_row(key)?;
        }
        Ok(self.tree().node(key)?.outcome().map(str::to_string))
    }

    /// Perform the selected row of a container.
    ///
    /// When nothing is selected the no-selection sentinel is returned.
    pub fn perform_selected(&mut self, container: &NodeKey) -> NavResult<Option<String>> {
        self.walker.filtered_nodes(container)?;
        let selected = self
            .tree()
            .find_selected(container, None)?
            .map(|node| node.key().clone());

        match selected {
            Some(key) => self.perform(&key),
            None => {
                warn!(container = %container, "Nothing selected");
                Ok(Some(Sentinel::NoSelectionWarning.to_string()))
            }
        }
    }

    /// Generate a name in the current category.
    ///
    /// With `existing` only those names count as taken; otherwise the
    /// name-exists predicate is asked, scoped to the current category.
    pub fn unique_name(
        &self,
        base: &str,
        is_copy: bool,
        existing: Option<&HashSet<String>>,
    ) -> NavResult<String> {
        let scope = &self.current_category;
        let names = &self.names;
        self.naming
            .generate(base, is_copy, &mut rand::rng(), |candidate| match existing {
                Some(existing) => Ok(existing.contains(candidate)),
                None => names
                    .name_exists(scope, candidate)
                    .map_err(NavError::Collaborator),
            })
    }

    /// Generate a name that no child of `parent` carries and the predicate
    /// does not know in that scope.
    fn sibling_unique_name(
        &mut self,
        parent: &NodeKey,
        base: &str,
        is_copy: bool,
    ) -> NavResult<String> {
        let siblings = self.walker.children(parent)?.to_vec();
        let titles: HashSet<&str> = siblings
            .iter()
            .filter_map(|key| self.walker.get(key))
            .map(Node::title)
            .collect();

        let names = &self.names;
        self.naming
            .generate(base, is_copy, &mut rand::rng(), |candidate| {
                Ok(titles.contains(candidate)
                    || names
                        .name_exists(parent, candidate)
                        .map_err(NavError::Collaborator)?)
            })
    }

    /// Create a uniquely named child. New containers start loaded and empty.
    pub fn create_child(
        &mut self,
        parent: &NodeKey,
        base: &str,
        container: bool,
    ) -> NavResult<NodeKey> {
        let name = self.sibling_unique_name(parent, base, false)?;
        let node = if container {
            self.walker.new_container(&name)?.with_no_children()
        } else {
            self.walker.new_leaf(&name)?
        };
        let key = self.walker.add_node(parent, node)?;
        debug!(parent = %parent, key = %key, name = %name, "Created child");
        Ok(key)
    }

    /// Copy a node next to itself under a copy name.
    ///
    /// Outcome, action and lockability carry over. The copy is shallow: a
    /// copied container starts loaded and empty.
    pub fn copy_node(&mut self, key: &NodeKey) -> NavResult<NodeKey> {
        let source = self.tree().node(key)?;
        let parent = source
            .parent()
            .cloned()
            .ok_or_else(|| NavError::illegal_state("the root cannot be copied"))?;
        let title = source.title().to_string();
        let outcome = source.outcome().map(str::to_string);
        let action = source.action();
        let lockable = source.is_lockable();
        let is_container = source.is_container();

        let name = self.sibling_unique_name(&parent, &title, true)?;
        let mut node = if is_container {
            self.walker.new_container(&name)?.with_no_children()
        } else {
            self.walker.new_leaf(&name)?
        };
        node = node.with_action(action).with_lockable(lockable);
        if let Some(outcome) = outcome {
            node = node.with_outcome(outcome);
        }

        let copy = self.walker.add_node(&parent, node)?;
        debug!(source = %key, copy = %copy, name = %name, "Copied node");
        Ok(copy)
    }

    /// Detach a node and its subtree, releasing the lock if the edited node
    /// went with it.
    pub fn remove_node(&mut self, key: &NodeKey) -> NavResult<Node> {
        let parent = self.tree().node(key)?.parent().cloned();
        let removed = self.walker.remove_node(key)?;
        if let Some(parent) = parent {
            self.repair(&parent);
        }
        Ok(removed)
    }

    /// Drop a container's children so they reload on next access.
    pub fn reset_children(&mut self, key: &NodeKey) -> NavResult<()> {
        self.walker.reset_children(key)?;
        self.repair(key);
        Ok(())
    }

    fn repair(&mut self, survivor: &NodeKey) {
        if self
            .lock
            .editing()
            .is_some_and(|key| !self.walker.tree().contains(key))
        {
            debug!("Edited node detached");
            self.exit();
        }
        if !self.walker.tree().contains(&self.current_category) {
            debug!(from = %self.current_category, to = %survivor, "Category detached");
            self.current_category = survivor.clone();
        }
        if !self.walker.tree().contains(&self.starting_node) {
            debug!(from = %self.starting_node, to = %survivor, "Starting node detached");
            self.starting_node = survivor.clone();
        }
    }

    /// Display label of a node, truncated to the configured width.
    pub fn label(&self, key: &NodeKey) -> NavResult<String> {
        Ok(self
            .tree()
            .node(key)?
            .display_label(self.label_width)
            .into_owned())
    }

    /// Mark a row as expanded. Returns `false` if it already was.
    pub fn disclose(&mut self, path: NodePath) -> bool {
        self.disclosed.insert(path)
    }

    pub fn is_disclosed(&self, path: &NodePath) -> bool {
        self.disclosed.contains(path)
    }

    /// Disclosed rows in the order they were expanded.
    pub fn disclosed(&self) -> impl Iterator<Item = &NodePath> {
        self.disclosed.iter()
    }

    pub fn clear_disclosed(&mut self) {
        self.disclosed.clear();
    }
}

fn starting_node(walker: &mut TreeWalker, configured: Option<&NodeKey>) -> NavResult<NodeKey> {
    let root = walker.root().clone();
    let children = walker.children(&root)?;
    match configured {
        Some(key) if children.contains(key) => Ok(key.clone()),
        Some(key) => Err(NavError::invalid_argument(format!(
            "starting category {key} is not a root-level node"
        ))),
        None => Ok(children.first().cloned().unwrap_or(root)),
    }
}
