//! Report command implementation.
//!
//! Re-renders a previously written JSON drift report without touching any
//! environment.

use anyhow::{Context, Result};

use super::models::ReportArgs;
use crate::report::{read_report, render_markdown, render_terminal_report};

/// Execute the report command
pub fn execute_report(args: ReportArgs) -> Result<()> {
    let report = read_report(&args.file).context("Failed to read drift report")?;

    if let Some(path) = &args.markdown {
        std::fs::write(path, render_markdown(&report))
            .context("Failed to write markdown report")?;
        println!("📝 Markdown report written to {}", path.display());
    }

    if args.summary {
        println!("{}", render_terminal_report(&report));
    } else if args.markdown.is_none() {
        print!("{}", render_markdown(&report));
    }

    Ok(())
}
