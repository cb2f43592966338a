//! Drift report rendering: JSON files, markdown for PR comments, and a
//! colored terminal summary.

pub mod json;
pub mod markdown;
pub mod terminal;

pub use json::{read_report, write_report};
pub use markdown::render_markdown;
pub use terminal::render_terminal_report;
