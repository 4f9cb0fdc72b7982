//! Path generation module
//!
//! This module maps discovered source files to their output locations.

mod mapper;

pub use mapper::{ExtensionRule, PathMapper, relative_path};
