//! Command handlers

mod import;

pub use import::{cmd_import, cmd_validate};
