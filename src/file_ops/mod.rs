//! File operations module
//!
//! Reading source files and writing converted files.

mod reader;
mod writer;

pub use reader::read_source;
pub use writer::{ensure_parent_dir, write_atomically};
