//! Common test utilities for locsync integration tests.
//!
//! This module provides:
//! - `TestEnv`: isolated temp directory plus helpers to run the CLI
//! - Fixtures: the basic state/county/city tree and workbook builders

#![allow(dead_code)]

pub mod env;
pub mod fixtures;

pub use env::*;
pub use fixtures::*;
