//! Navigation model configuration.

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::{NavError, NavResult};
use crate::key::NodeKey;

/// Configuration shared by the tree, walker and controller.
#[derive(Debug, Clone, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
#[serde(default)]
pub struct NavConfig {
    /// Key of the tree root.
    #[builder(default = "NodeKey::from_static(\"root\")")]
    pub root_key: NodeKey,

    /// Title of the tree root.
    #[builder(default = "\"Root\".to_string()")]
    pub root_title: String,

    /// Root-level category displayed first (None = first root child).
    #[builder(default)]
    pub starting_category: Option<NodeKey>,

    /// Prefix for generated node keys, placed after the reserved `~` marker.
    #[builder(default = "\"n\".to_string()")]
    pub key_prefix: String,

    /// Display label width in characters.
    #[builder(default = "30")]
    pub label_width: usize,

    /// Edit-lock participation for nodes whose descriptor does not say.
    #[builder(default = "true")]
    pub lockable_by_default: bool,

    /// Size of the deterministic unique-name phase.
    #[builder(default = "200")]
    pub deterministic_attempts: u32,

    /// Cap on the randomized unique-name phase (None = retry until a name is free).
    #[builder(default)]
    pub random_attempt_budget: Option<u64>,
}

impl NavConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref title) = self.root_title {
            if title.trim().is_empty() {
                return Err("Root title cannot be empty".to_string());
            }
        }
        if let Some(ref prefix) = self.key_prefix {
            if prefix.contains(crate::key::PATH_SEPARATOR) {
                return Err("Key prefix cannot contain the path separator".to_string());
            }
        }
        if let Some(0) = self.label_width {
            return Err("Label width must be positive".to_string());
        }
        Ok(())
    }
}

impl NavConfig {
    /// Create a new config builder.
    pub fn builder() -> NavConfigBuilder {
        NavConfigBuilder::default()
    }

    /// Apply the builder's checks to a config deserialized from a file.
    pub fn validate(&self) -> NavResult<()> {
        NavConfigBuilder {
            root_title: Some(self.root_title.clone()),
            key_prefix: Some(self.key_prefix.clone()),
            label_width: Some(self.label_width),
            ..NavConfigBuilder::default()
        }
        .validate()
        .map_err(NavError::invalid_argument)
    }
}

impl Default for NavConfig {
    fn default() -> Self {
        Self {
            root_key: NodeKey::from_static("root"),
            root_title: "Root".to_string(),
            starting_category: None,
            key_prefix: "n".to_string(),
            label_width: 30,
            lockable_by_default: true,
            deterministic_attempts: 200,
            random_attempt_budget: None,
        }
    }
}
