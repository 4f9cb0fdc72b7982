//! File discovery module
//!
//! This module contains components for walking the input tree and deciding
//! which files are converted.

mod eligibility;
mod scanner;

pub use eligibility::{EligibilityPredicate, ExtensionFilter};
pub use scanner::{ScanFailure, ScanOptions, ScanResult, ensure_input_root, scan_tree};
