//! What the commit walk does with one stub

use serde::{Deserialize, Serialize};

/// The action to take for a type or location
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordAction {
    /// Not in the store yet - create it
    Create,
    /// In the store with different attributes - save it
    Update,
    /// In the store and identical - no write
    Unchanged,
    /// In the store and marked for deletion - remove it
    Delete,
    /// Marked for deletion but not in the store - nothing to do
    Ignore,
}

impl RecordAction {
    /// Whether this action writes to the store
    pub fn is_write(&self) -> bool {
        matches!(
            self,
            RecordAction::Create | RecordAction::Update | RecordAction::Delete
        )
    }
}

impl std::fmt::Display for RecordAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RecordAction::Create => write!(f, "create"),
            RecordAction::Update => write!(f, "update"),
            RecordAction::Unchanged => write!(f, "unchanged"),
            RecordAction::Delete => write!(f, "delete"),
            RecordAction::Ignore => write!(f, "ignore"),
        }
    }
}
