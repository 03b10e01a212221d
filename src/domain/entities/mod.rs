//! Domain Entities
//!
//! - `LocationTypeStub` / `LocationStub` - one parsed input row each
//! - `TypeRecord` / `LocationRecord` - persisted shapes held by the tree store
//! - `LocationCollection` - read-only snapshot of the persisted tree
//! - `LocationDataModel` - custom-data fields a tenant has defined

mod collection;
mod data_model;
mod location_stub;
mod location_type_stub;
mod records;

pub use collection::LocationCollection;
pub use data_model::LocationDataModel;
pub use location_stub::{LocationSheetHeaders, LocationStub, RowFormatError};
pub use location_type_stub::{LocationTypeStub, TypeSheetHeaders};
pub use records::{LocationRecord, TypeRecord};
