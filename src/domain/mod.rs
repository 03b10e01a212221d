//! Domain Layer
//!
//! The reconciliation core: pure logic over location types and locations,
//! without I/O.
//!
//! ## Structure
//!
//! - `value_objects/` - `TreeRef`, `Row`, `RecordAction`
//! - `entities/` - row stubs, persisted records, the existing-tree snapshot
//! - `services/` - tree checker, tree validator, commit planner
//! - `ports/` - tree store and import event interfaces

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
