//! Node keys and key generation.

use std::fmt;
use std::str::FromStr;

use compact_str::{CompactString, format_compact};
use serde::{Deserialize, Serialize};

use crate::error::{NavError, NavResult};

/// Separator between segments of an external key.
pub const PATH_SEPARATOR: char = '/';

/// Leading character reserved for keys the tree generates itself.
///
/// Loaders never hand out keys starting with it, so a generated key cannot
/// clash with a key a container has not reported yet.
pub const GENERATED_KEY_MARKER: char = '~';

/// Internal key of a node, unique within one tree.
///
/// Keys are never blank and never contain [`PATH_SEPARATOR`], so any sequence
/// of keys can be joined into an unambiguous external key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct NodeKey(CompactString);

impl NodeKey {
    /// Create a key, rejecting blank text and text containing the path separator.
    pub fn new(key: impl AsRef<str>) -> NavResult<Self> {
        let key = key.as_ref();
        if key.trim().is_empty() {
            return Err(NavError::invalid_argument("node key cannot be blank"));
        }
        if key.contains(PATH_SEPARATOR) {
            return Err(NavError::invalid_argument(format!(
                "node key '{key}' cannot contain '{PATH_SEPARATOR}'"
            )));
        }
        Ok(Self(CompactString::from(key)))
    }

    /// Create a key from a literal.
    ///
    /// # Panics
    ///
    /// Panics on blank text or text containing [`PATH_SEPARATOR`], at compile
    /// time when used in a `const` item.
    pub const fn from_static(key: &'static str) -> Self {
        let bytes = key.as_bytes();
        let mut blank = true;
        let mut i = 0;
        while i < bytes.len() {
            assert!(bytes[i] != b'/', "node key cannot contain '/'");
            if !bytes[i].is_ascii_whitespace() {
                blank = false;
            }
            i += 1;
        }
        assert!(!blank, "node key cannot be blank");
        Self(CompactString::const_new(key))
    }

    /// Get the key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the key lives in the generated namespace.
    pub fn is_generated(&self) -> bool {
        self.0.starts_with(GENERATED_KEY_MARKER)
    }
}

impl fmt::Display for NodeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for NodeKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for NodeKey {
    type Err = NavError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for NodeKey {
    type Error = NavError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl TryFrom<&str> for NodeKey {
    type Error = NavError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<NodeKey> for String {
    fn from(key: NodeKey) -> Self {
        key.0.into()
    }
}

/// Monotonic key source scoped to one tree.
#[derive(Debug, Clone)]
pub struct KeyGenerator {
    prefix: CompactString,
    next: u64,
}

impl KeyGenerator {
    /// Create a generator producing `~<prefix><n>` starting at 1.
    pub fn new(prefix: impl Into<CompactString>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 1,
        }
    }

    /// Produce the next key that `is_taken` does not reject.
    pub fn next_key(&mut self, is_taken: impl Fn(&NodeKey) -> bool) -> NodeKey {
        loop {
            let key = NodeKey(format_compact!(
                "{GENERATED_KEY_MARKER}{}{}",
                self.prefix, self.next
            ));
            self.next += 1;
            if !is_taken(&key) {
                return key;
            }
        }
    }
}

impl Default for KeyGenerator {
    fn default() -> Self {
        Self::new("n")
    }
}
