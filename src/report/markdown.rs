//! Markdown rendering of a drift report.
//!
//! Produces the body a CI workflow posts as a pull-request comment. The
//! renderer only reads the report; posting is the workflow's job.

use crate::diff::comparators::Comparable;
use crate::diff::schema::{DriftReport, PairwiseDiff, Reconciliation};

/// Render a complete drift report as markdown
pub fn render_markdown(report: &DriftReport) -> String {
    let mut out = String::new();

    out.push_str("## Supabase Environment Drift Check\n\n");
    out.push_str(&format!(
        "Chain: `{}` · Generated: {}\n\n",
        if report.has_stg {
            "dev → stg → prd"
        } else {
            "dev → prd"
        },
        report.generated_at
    ));

    if report.has_drift {
        out.push_str("**Status: ⚠️ drift detected**\n\n");
    } else if report.failures.is_empty() {
        out.push_str("**Status: ✅ environments in sync**\n\n");
    }

    if let Some(entries) = &report.edge_functions {
        out.push_str(&render_kind("Edge Functions", entries));
    }
    if let Some(entries) = &report.rls_policies {
        out.push_str(&render_kind("RLS Policies", entries));
    }
    if let Some(entries) = &report.sql_functions {
        out.push_str(&render_kind("SQL Functions", entries));
    }
    if let Some(entries) = &report.schemas {
        out.push_str(&render_kind("Table Schemas", entries));
    }

    if !report.failures.is_empty() {
        out.push_str("### ❌ Failed checks\n\n");
        for failure in &report.failures {
            out.push_str(&format!("- **{}**: {}\n", failure.kind, failure.message));
        }
        out.push('\n');
    }

    out
}

fn render_kind<T: Comparable>(name: &str, entries: &[PairwiseDiff<T>]) -> String {
    let mut out = format!("### {}\n\n", name);

    for entry in entries {
        out.push_str(&format!("#### `{}`\n\n", entry.pair));
        out.push_str(&render_pair(&entry.result, entry.pair.sides()));
    }

    out
}

fn render_pair<T: Comparable>(result: &Reconciliation<T>, sides: (&str, &str)) -> String {
    let (first, second) = sides;

    if !result.has_drift() {
        return format!("✅ No drift ({} matching).\n\n", result.matching.len());
    }

    let mut out = String::new();

    if !result.only_in_first.is_empty() {
        out.push_str(&format!(
            "- **Only in {}** ({}): {}\n",
            first,
            result.only_in_first.len(),
            label_list(&result.only_in_first)
        ));
    }
    if !result.only_in_second.is_empty() {
        out.push_str(&format!(
            "- **Only in {}** ({}): {}\n",
            second,
            result.only_in_second.len(),
            label_list(&result.only_in_second)
        ));
    }
    if !result.differing.is_empty() {
        out.push_str(&format!("- **Changed** ({}):\n", result.differing.len()));
        for diff in &result.differing {
            out.push_str(&format!("  - `{}`\n", diff.first.label()));
            for line in &diff.differences {
                out.push_str(&format!("    - {}\n", line));
            }
        }
    }
    out.push_str(&format!("- Matching: {}\n\n", result.matching.len()));

    out
}

fn label_list<T: Comparable>(entities: &[T]) -> String {
    entities
        .iter()
        .map(|e| format!("`{}`", e.label()))
        .collect::<Vec<_>>()
        .join(", ")
}
