//! A navigation catalog read from a JSON or TOML document.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use navtree_core::{
    BoxError, ChildDescriptor, ChildrenLoader, GENERATED_KEY_MARKER, NameExists, NavError,
    NodeAction, NodeKey,
};

use crate::error::{CatalogError, CatalogResult};

/// One entry of a catalog document, with its children nested inline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogEntry {
    /// Explicit key. Entries without one get `<parent>.<position>`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<NodeKey>,

    pub title: String,

    /// Marks an entry as a container even when it lists no children.
    #[serde(default)]
    pub container: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub outcome: Option<String>,

    #[serde(default)]
    pub action: NodeAction,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lockable: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<CatalogEntry>,
}

impl CatalogEntry {
    fn is_container(&self) -> bool {
        self.container || !self.children.is_empty()
    }
}

#[derive(Debug, Default, Deserialize)]
struct CatalogDocument {
    #[serde(default)]
    entries: Vec<CatalogEntry>,
}

enum Format {
    Json,
    Toml,
}

/// Catalog contents indexed by container key.
///
/// Serves as both the children loader and the name-exists predicate of a
/// navigation tree. Every entry is keyed when the catalog is built, so the
/// tree never has to generate keys for catalog nodes.
#[derive(Debug, Clone)]
pub struct Catalog {
    root: NodeKey,
    levels: HashMap<NodeKey, Vec<ChildDescriptor>>,
}

impl Catalog {
    /// Read a catalog file, choosing the parser by extension.
    pub fn from_path(path: impl AsRef<Path>, root: &NodeKey) -> CatalogResult<Self> {
        let path = path.as_ref();
        let format = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Format::Json,
            Some("toml") => Format::Toml,
            _ => {
                return Err(CatalogError::UnsupportedFormat {
                    path: path.to_path_buf(),
                });
            }
        };

        let text = std::fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let catalog = match format {
            Format::Json => Self::from_json_str(&text, root)?,
            Format::Toml => Self::from_toml_str(&text, root)?,
        };
        debug!(
            path = %path.display(),
            containers = catalog.levels.len(),
            "Loaded catalog"
        );
        Ok(catalog)
    }

    /// Parse a JSON document of the form `{"entries": [...]}`.
    pub fn from_json_str(text: &str, root: &NodeKey) -> CatalogResult<Self> {
        let document: CatalogDocument = serde_json::from_str(text)?;
        Self::from_entries(root, document.entries)
    }

    /// Parse a TOML document made of `[[entries]]` tables.
    pub fn from_toml_str(text: &str, root: &NodeKey) -> CatalogResult<Self> {
        let document: CatalogDocument = toml::from_str(text)?;
        Self::from_entries(root, document.entries)
    }

    /// Index top-level entries as the children of `root`.
    pub fn from_entries(root: &NodeKey, entries: Vec<CatalogEntry>) -> CatalogResult<Self> {
        let mut levels = HashMap::new();
        let mut seen = HashSet::from([root.clone()]);
        let mut pending = vec![(root.clone(), entries)];

        while let Some((parent, entries)) = pending.pop() {
            let mut descriptors = Vec::with_capacity(entries.len());
            for (position, entry) in entries.into_iter().enumerate() {
                let key = match entry.key.clone() {
                    Some(key) if key.is_generated() => {
                        return Err(NavError::invalid_argument(format!(
                            "catalog key {key} uses the reserved '{GENERATED_KEY_MARKER}' prefix"
                        ))
                        .into());
                    }
                    Some(key) => key,
                    None => NodeKey::new(format!("{parent}.{}", position + 1))?,
                };
                if !seen.insert(key.clone()) {
                    return Err(CatalogError::DuplicateKey { key });
                }
                if entry.title.trim().is_empty() {
                    return Err(NavError::invalid_argument(format!(
                        "catalog entry {key} has a blank title"
                    ))
                    .into());
                }

                let is_container = entry.is_container();
                descriptors.push(ChildDescriptor {
                    key: Some(key.clone()),
                    title: entry.title,
                    is_container,
                    outcome: entry.outcome,
                    label: entry.label,
                    action: entry.action,
                    lockable: entry.lockable,
                });
                if is_container {
                    pending.push((key, entry.children));
                }
            }
            levels.insert(parent, descriptors);
        }

        Ok(Self {
            root: root.clone(),
            levels,
        })
    }

    /// Key the top-level entries hang under.
    pub fn root(&self) -> &NodeKey {
        &self.root
    }

    /// Descriptors of a container's children; empty for unknown keys.
    pub fn children_of(&self, container: &NodeKey) -> &[ChildDescriptor] {
        self.levels.get(container).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Number of containers, root included.
    pub fn container_count(&self) -> usize {
        self.levels.len()
    }

    /// Number of entries across all levels.
    pub fn entry_count(&self) -> usize {
        self.levels.values().map(Vec::len).sum()
    }

    /// Whether a child of `scope` carries `title`.
    pub fn contains_title(&self, scope: &NodeKey, title: &str) -> bool {
        self.children_of(scope).iter().any(|child| child.title == title)
    }
}

impl ChildrenLoader for Catalog {
    fn load_children(&self, container: &NodeKey) -> Result<Vec<ChildDescriptor>, BoxError> {
        trace!(container = %container, "Catalog lookup");
        Ok(self.children_of(container).to_vec())
    }
}

impl NameExists for Catalog {
    fn name_exists(&self, scope: &NodeKey, candidate: &str) -> Result<bool, BoxError> {
        Ok(self.contains_title(scope, candidate))
    }
}
