//! Domain Services
//!
//! Pure business logic services that operate on domain entities.
//! These services have no I/O dependencies and are easily testable.

mod planner;
pub mod tree_checker;
mod tree_validator;

pub use planner::{new_location_id, PlannedLocation, PlannedType, Planner};
pub use tree_checker::{assert_acyclic, compute_expansion_bounds, ExpansionBounds, TreeError};
pub use tree_validator::{TreeValidator, MAX_FIELD_LENGTH};
