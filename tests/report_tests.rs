//! Tests for report serialization and rendering.
//!
//! The JSON field names are a stable contract for CI consumers; these
//! tests pin them.

use pretty_assertions::assert_eq;
use tempfile::NamedTempFile;

use supadrift::diff::{build_chain, has_drift, CheckFailure, DriftReport, EnvironmentChain};
use supadrift::report::{read_report, render_markdown, render_terminal_report, write_report};
use supadrift::snapshot::schema::{EdgeFunction, RlsPolicy};

// ============================================================================
// SHARED TEST HELPERS
// ============================================================================

fn edge_fn(slug: &str, version: i64) -> EdgeFunction {
    EdgeFunction {
        id: format!("id-{slug}"),
        name: slug.to_string(),
        slug: slug.to_string(),
        status: "ACTIVE".to_string(),
        version,
        created_at: "2025-03-01T00:00:00Z".to_string(),
        updated_at: "2025-03-01T00:00:00Z".to_string(),
    }
}

fn policy(name: &str) -> RlsPolicy {
    RlsPolicy {
        schema_name: "public".to_string(),
        table_name: "users".to_string(),
        policy_name: name.to_string(),
        permissive: "PERMISSIVE".to_string(),
        roles: vec!["anon".to_string()],
        cmd: "SELECT".to_string(),
        qual: None,
        with_check: None,
    }
}

fn drifted_report() -> DriftReport {
    let chain = EnvironmentChain {
        dev: vec![edge_fn("foo", 1), edge_fn("bar", 1)],
        stg: None,
        prd: vec![edge_fn("foo", 2)],
    };
    let entries = build_chain(&chain);

    let policy_chain = EnvironmentChain {
        dev: vec![policy("p1")],
        stg: None,
        prd: vec![policy("p1")],
    };
    let policy_entries = build_chain(&policy_chain);

    let mut report = DriftReport::new(false);
    report.has_drift = has_drift(&entries);
    report.edge_functions = Some(entries);
    report.rls_policies = Some(policy_entries);
    report
}

fn failed_report() -> DriftReport {
    let chain = EnvironmentChain {
        dev: vec![edge_fn("foo", 1)],
        stg: None,
        prd: vec![edge_fn("foo", 1)],
    };
    let mut report = DriftReport::new(false);
    report.edge_functions = Some(build_chain(&chain));
    report.failures.push(CheckFailure {
        kind: "RLS Policies".to_string(),
        message: "connection refused".to_string(),
    });
    report
}

// ============================================================================
// SERIALIZATION SHAPE
// ============================================================================

#[test]
fn test_reconciliation_serializes_camel_case_buckets() {
    let report = drifted_report();
    let value = serde_json::to_value(&report).unwrap();

    let result = &value["edgeFunctions"][0]["result"];
    assert!(result.get("onlyInFirst").is_some());
    assert!(result.get("onlyInSecond").is_some());
    assert!(result.get("differing").is_some());
    assert!(result.get("matching").is_some());

    // Entity records are camelCase too
    assert_eq!(result["onlyInFirst"][0]["slug"], "bar");
    assert_eq!(result["onlyInFirst"][0]["createdAt"], "2025-03-01T00:00:00Z");
    assert_eq!(
        value["rlsPolicies"][0]["result"]["matching"][0]["policyName"],
        "p1"
    );
}

#[test]
fn test_pair_label_serialization() {
    let report = drifted_report();
    let value = serde_json::to_value(&report).unwrap();
    assert_eq!(value["edgeFunctions"][0]["pair"], "dev-prd");
}

#[test]
fn test_report_top_level_fields() {
    let report = drifted_report();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["hasDrift"], true);
    assert_eq!(value["hasStg"], false);
    assert!(value.get("reportVersion").is_some());
    assert!(value.get("generatedAt").is_some());
    // Unchecked kinds and empty failures are omitted entirely
    assert!(value.get("sqlFunctions").is_none());
    assert!(value.get("schemas").is_none());
    assert!(value.get("failures").is_none());
}

#[test]
fn test_differing_entry_shape() {
    let report = drifted_report();
    let value = serde_json::to_value(&report).unwrap();

    let entry = &value["edgeFunctions"][0]["result"]["differing"][0];
    assert_eq!(entry["first"]["version"], 1);
    assert_eq!(entry["second"]["version"], 2);
    assert_eq!(entry["differences"][0], "version: 1 → 2");
}

#[test]
fn test_report_round_trip_through_file() {
    let report = drifted_report();
    let temp_file = NamedTempFile::new().unwrap();

    write_report(&report, temp_file.path()).unwrap();
    let loaded = read_report(temp_file.path()).unwrap();

    assert_eq!(loaded.has_drift, report.has_drift);
    let entries = loaded.edge_functions.unwrap();
    assert_eq!(entries[0].result.differing.len(), 1);
    assert_eq!(
        entries[0].result.differing[0].differences,
        vec!["version: 1 → 2"]
    );
}

#[test]
fn test_failures_serialize_alongside_surviving_kinds() {
    let report = failed_report();
    let value = serde_json::to_value(&report).unwrap();

    assert_eq!(value["failures"][0]["kind"], "RLS Policies");
    assert_eq!(value["failures"][0]["message"], "connection refused");
    // The failed kind is absent while the successful one still carries results
    assert!(value.get("rlsPolicies").is_none());
    assert!(value.get("edgeFunctions").is_some());
    assert_eq!(value["hasDrift"], false);
}

#[test]
fn test_failures_survive_file_round_trip() {
    let report = failed_report();
    let temp_file = NamedTempFile::new().unwrap();

    write_report(&report, temp_file.path()).unwrap();
    let loaded = read_report(temp_file.path()).unwrap();

    assert_eq!(loaded.failures.len(), 1);
    assert_eq!(loaded.failures[0].kind, "RLS Policies");
    assert_eq!(loaded.failures[0].message, "connection refused");
}

// ============================================================================
// MARKDOWN RENDERING
// ============================================================================

#[test]
fn test_markdown_contains_sections_and_labels() {
    let report = drifted_report();
    let md = render_markdown(&report);

    assert!(md.contains("## Supabase Environment Drift Check"));
    assert!(md.contains("drift detected"));
    assert!(md.contains("### Edge Functions"));
    assert!(md.contains("#### `dev-prd`"));
    assert!(md.contains("**Only in dev** (1): `bar`"));
    assert!(md.contains("version: 1 → 2"));
    assert!(md.contains("### RLS Policies"));
    assert!(md.contains("No drift (1 matching)"));
}

#[test]
fn test_markdown_in_sync_report() {
    let chain = EnvironmentChain {
        dev: vec![edge_fn("foo", 1)],
        stg: None,
        prd: vec![edge_fn("foo", 1)],
    };
    let mut report = DriftReport::new(false);
    report.edge_functions = Some(build_chain(&chain));

    let md = render_markdown(&report);
    assert!(md.contains("environments in sync"));
    assert!(!md.contains("Changed"));
}

#[test]
fn test_markdown_renders_failed_checks_section() {
    let report = failed_report();
    let md = render_markdown(&report);

    assert!(md.contains("### ❌ Failed checks"));
    assert!(md.contains("- **RLS Policies**: connection refused"));
    // A run with failures must not claim the environments are in sync
    assert!(!md.contains("environments in sync"));
}

#[test]
fn test_markdown_staged_chain_header() {
    let report = DriftReport::new(true);
    let md = render_markdown(&report);
    assert!(md.contains("dev → stg → prd"));
}

// ============================================================================
// TERMINAL RENDERING
// ============================================================================

#[test]
fn test_terminal_summary_basic() {
    // Force plain output so assertions see raw text
    colored::control::set_override(false);

    let report = drifted_report();
    let out = render_terminal_report(&report);

    assert!(out.contains("Supabase Drift Check Summary"));
    assert!(out.contains("DRIFT DETECTED"));
    assert!(out.contains("version: 1 → 2"));
    assert!(out.contains("RLS Policies [dev-prd]: 1 matching"));
}

#[test]
fn test_terminal_summary_lists_failures() {
    colored::control::set_override(false);

    let report = failed_report();
    let out = render_terminal_report(&report);

    assert!(out.contains("❌ RLS Policies: connection refused"));
    assert!(out.contains("Edge Functions [dev-prd]: 1 matching"));
    assert!(!out.contains("Environments in sync"));
}
