//! The edit-lock state machine.

use navtree_core::NodeKey;

/// Whether the session is browsing freely or has one node locked for editing.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditLock {
    #[default]
    Browsing,
    Editing(NodeKey),
}

impl EditLock {
    /// The node being edited, if any.
    pub fn editing(&self) -> Option<&NodeKey> {
        match self {
            Self::Browsing => None,
            Self::Editing(key) => Some(key),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self, Self::Editing(_))
    }

    /// Enabled state of a lockable node under this lock.
    pub fn admits(&self, key: &NodeKey) -> bool {
        match self {
            Self::Browsing => true,
            Self::Editing(editing) => editing == key,
        }
    }
}
