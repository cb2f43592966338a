//! Terminal output rendering for drift reports.
//!
//! Human-readable summary with visual cues for drifted kinds.

use colored::*;

use crate::diff::comparators::Comparable;
use crate::diff::schema::{DriftReport, PairwiseDiff};

/// Render a human-readable summary of a drift report for the terminal
pub fn render_terminal_report(report: &DriftReport) -> String {
    let mut out = String::new();

    out.push_str("\n🔍 ");
    out.push_str(&"Supabase Drift Check Summary".bold().to_string());
    out.push_str("\n---------------------------------------------------\n");
    out.push_str(&format!(
        "Chain: {}\n",
        if report.has_stg {
            "dev → stg → prd"
        } else {
            "dev → prd"
        }
    ));
    out.push_str("---------------------------------------------------\n");

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

    for failure in &report.failures {
        out.push_str(&format!(
            "❌ {}: {}\n",
            failure.kind.red(),
            failure.message
        ));
    }

    out.push('\n');
    if report.has_drift {
        out.push_str(&"⚠️  DRIFT DETECTED".red().bold().to_string());
    } else if report.failures.is_empty() {
        out.push_str(&"✅ Environments in sync".green().bold().to_string());
    }
    out.push('\n');

    out
}

fn render_kind<T: Comparable>(name: &str, entries: &[PairwiseDiff<T>]) -> String {
    let mut out = String::new();

    for entry in entries {
        let result = &entry.result;
        if !result.has_drift() {
            out.push_str(&format!(
                "✅ {} [{}]: {} matching\n",
                name,
                entry.pair,
                result.matching.len()
            ));
            continue;
        }

        out.push_str(&format!(
            "⚠️  {} [{}]: {} only-first, {} only-second, {} changed, {} matching\n",
            name.yellow(),
            entry.pair,
            result.only_in_first.len(),
            result.only_in_second.len(),
            result.differing.len(),
            result.matching.len()
        ));

        for diff in &result.differing {
            out.push_str(&format!("     {}\n", diff.first.label()));
            for line in &diff.differences {
                out.push_str(&format!("       - {}\n", line));
            }
        }
    }

    out
}
