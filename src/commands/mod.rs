//! CLI command implementations.
//!
//! Each command is implemented in its own module.
//! Commands orchestrate the library components to perform user tasks.

pub mod check;
pub mod models;
pub mod report;

// Re-export main command functions
pub use check::{execute_check, validate_args};
pub use models::{CheckArgs, ReportArgs};
pub use report::execute_report;
