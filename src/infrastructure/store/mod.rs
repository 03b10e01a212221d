//! Tree store implementations

mod lock;
mod memory;
mod toml_store;

pub use lock::{LockError, TenantLock};
pub use memory::{InMemoryTreeStore, TenantTree};
pub use toml_store::TomlTreeStore;
