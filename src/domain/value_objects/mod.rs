//! Domain Value Objects
//!
//! Immutable value types that represent domain concepts.

mod record_action;
mod row;
mod tree_ref;

pub use record_action::RecordAction;
pub use row::{parse_flag, Row, CUSTOM_DATA_PREFIX, UNCATEGORIZED_DATA_PREFIX};
pub use tree_ref::{TreeRef, ROOT_CODE};
