//! TreeRef value object - a parent reference in the hierarchy
//!
//! - `Root`: the top of the hierarchy (no parent)
//! - `Code`: a real node, named by its code (type code or site code)
//!
//! The ROOT sentinel is a distinct variant, never a magic string compared
//! against codes.

use serde::{Deserialize, Serialize};

/// Text used to display (and, for expansion settings, to spell) the ROOT sentinel
pub const ROOT_CODE: &str = "TOP";

/// Reference to a parent node, or to the root of the hierarchy
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TreeRef {
    /// No parent - the node sits at the top of the hierarchy
    #[default]
    Root,
    /// A real node identified by its code
    Code(String),
}

impl TreeRef {
    /// Build a reference from an optional code. Blank means root.
    pub fn from_code(code: Option<&str>) -> Self {
        match code.map(str::trim) {
            Some(code) if !code.is_empty() => TreeRef::Code(code.to_string()),
            _ => TreeRef::Root,
        }
    }

    /// Reference a real node
    pub fn code_of(code: impl Into<String>) -> Self {
        TreeRef::Code(code.into())
    }

    /// Returns true if this is the root sentinel
    pub fn is_root(&self) -> bool {
        matches!(self, TreeRef::Root)
    }

    /// The referenced code, if this is not the root
    pub fn code(&self) -> Option<&str> {
        match self {
            TreeRef::Root => None,
            TreeRef::Code(code) => Some(code),
        }
    }

    /// Same reference with its code lower-cased (site codes are case-insensitive)
    pub fn to_lowercase(&self) -> Self {
        match self {
            TreeRef::Root => TreeRef::Root,
            TreeRef::Code(code) => TreeRef::Code(code.to_lowercase()),
        }
    }
}

impl std::fmt::Display for TreeRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeRef::Root => write!(f, "{}", ROOT_CODE),
            TreeRef::Code(code) => write!(f, "{}", code),
        }
    }
}

impl From<Option<String>> for TreeRef {
    fn from(code: Option<String>) -> Self {
        TreeRef::from_code(code.as_deref())
    }
}
