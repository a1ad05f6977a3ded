//! CLI command implementations.

pub mod common;
pub mod list;
pub mod update;
