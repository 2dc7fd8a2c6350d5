//! Reserved outcome tokens.

use strum::{Display, EnumString, IntoStaticStr};

/// Outcomes the session emits on its own rather than taking from a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, EnumString, IntoStaticStr)]
#[strum(serialize_all = "kebab-case")]
pub enum Sentinel {
    /// Nothing was selected when a selected row was performed.
    NoSelectionWarning,
    /// The edit was abandoned.
    Cancel,
}

impl Sentinel {
    pub fn as_str(self) -> &'static str {
        self.into()
    }

    /// Whether an outcome token is reserved.
    pub fn is_reserved(outcome: &str) -> bool {
        outcome.parse::<Self>().is_ok()
    }
}
