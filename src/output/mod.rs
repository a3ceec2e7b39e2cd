//! Output module for sweep results
//!
//! This module handles:
//! - The terminal outcome of a sweep
//! - Collecting per-run counters into a report
//! - Printing the report for the operator

mod report;

pub use report::{print_report, startup_failure_line, CrawlReport, Outcome};
