//! Schema definitions for drift reports.
//!
//! Defines the structures that represent differences between environment
//! snapshots. Serialized field names (camelCase) are the stable report
//! shape consumed by CI tooling.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::snapshot::schema::{EdgeFunction, RlsPolicy, SqlFunction, TableSchema};

/// One entity present in both snapshots but with field-level differences
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityDiff<T> {
    /// Record from the first environment of the pair
    pub first: T,

    /// Record from the second environment of the pair
    pub second: T,

    /// Human-readable difference lines, in fixed per-kind check order
    pub differences: Vec<String>,
}

/// Four-way classification of two snapshots of one entity kind.
///
/// The four buckets are disjoint and exhaustive over the union of both
/// snapshots' identity keys. Produced fresh per comparison; immutable once
/// returned.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reconciliation<T> {
    pub only_in_first: Vec<T>,
    pub only_in_second: Vec<T>,
    pub differing: Vec<EntityDiff<T>>,
    pub matching: Vec<T>,
}

impl<T> Reconciliation<T> {
    /// An all-empty result (degenerate case of two empty snapshots)
    pub fn empty() -> Self {
        Self {
            only_in_first: Vec::new(),
            only_in_second: Vec::new(),
            differing: Vec::new(),
            matching: Vec::new(),
        }
    }

    /// True if anything other than the matching bucket is populated
    pub fn has_drift(&self) -> bool {
        !self.only_in_first.is_empty()
            || !self.only_in_second.is_empty()
            || !self.differing.is_empty()
    }
}

impl<T> Default for Reconciliation<T> {
    fn default() -> Self {
        Self::empty()
    }
}

/// Identity of one adjacent environment pair in the chain
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EnvironmentPair {
    DevStg,
    StgPrd,
    DevPrd,
}

impl EnvironmentPair {
    /// Short names of the (first, second) environments of the pair
    pub fn sides(&self) -> (&'static str, &'static str) {
        match self {
            EnvironmentPair::DevStg => ("dev", "stg"),
            EnvironmentPair::StgPrd => ("stg", "prd"),
            EnvironmentPair::DevPrd => ("dev", "prd"),
        }
    }
}

impl fmt::Display for EnvironmentPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (first, second) = self.sides();
        write!(f, "{}-{}", first, second)
    }
}

/// Reconciliation of one entity kind for one adjacent environment pair
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairwiseDiff<T> {
    pub pair: EnvironmentPair,
    pub result: Reconciliation<T>,
}

/// A check that could not run because snapshot acquisition failed
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckFailure {
    /// Entity kind display name (e.g. "Edge Functions")
    pub kind: String,

    /// Acquisition error message
    pub message: String,
}

/// Complete drift report across all checked kinds and environment pairs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DriftReport {
    /// Schema version for the report format
    pub report_version: String,

    /// Timestamp when the report was generated
    pub generated_at: String,

    /// Any difference across all checked kinds and pairs
    pub has_drift: bool,

    /// Whether a staging environment participated in the chain
    pub has_stg: bool,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edge_functions: Option<Vec<PairwiseDiff<EdgeFunction>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rls_policies: Option<Vec<PairwiseDiff<RlsPolicy>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sql_functions: Option<Vec<PairwiseDiff<SqlFunction>>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub schemas: Option<Vec<PairwiseDiff<TableSchema>>>,

    /// Kinds whose acquisition failed and were skipped (fail-soft)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub failures: Vec<CheckFailure>,
}

impl DriftReport {
    /// A fresh report with no kinds checked yet
    pub fn new(has_stg: bool) -> Self {
        Self {
            report_version: crate::utils::config::REPORT_VERSION.to_string(),
            generated_at: chrono::Utc::now().to_rfc3339(),
            has_drift: false,
            has_stg,
            edge_functions: None,
            rls_policies: None,
            sql_functions: None,
            schemas: None,
            failures: Vec::new(),
        }
    }
}
