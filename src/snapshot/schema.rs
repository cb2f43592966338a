//! Entity record definitions for the four checked metadata domains.
//!
//! These are the shapes handed to the diff core and embedded in the drift
//! report JSON. Field names serialize as camelCase; that is the stable
//! report shape and must not change casually.

use serde::{Deserialize, Serialize};

/// A deployed edge function, as reported by the management API
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeFunction {
    /// Opaque function id assigned by the platform
    pub id: String,

    /// Human-readable function name
    pub name: String,

    /// URL slug; the identity key across environments
    pub slug: String,

    /// Deployment status (e.g. "ACTIVE")
    pub status: String,

    /// Monotonic deployment version
    pub version: i64,

    pub created_at: String,
    pub updated_at: String,
}

/// A row-level-security policy from `pg_policies`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RlsPolicy {
    pub schema_name: String,
    pub table_name: String,
    pub policy_name: String,

    /// "PERMISSIVE" or "RESTRICTIVE"
    pub permissive: String,

    /// Roles the policy applies to, in catalog order
    pub roles: Vec<String>,

    /// Command the policy applies to (SELECT, INSERT, ...)
    pub cmd: String,

    /// USING predicate text; compared but never surfaced in reports
    pub qual: Option<String>,

    /// WITH CHECK predicate text; compared but never surfaced in reports
    pub with_check: Option<String>,
}

/// A user-defined SQL function from `pg_proc`
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SqlFunction {
    pub schema_name: String,
    pub function_name: String,

    /// Argument signature as rendered by `pg_get_function_arguments`;
    /// part of the identity key (overloads are distinct entities)
    pub arguments: String,

    pub return_type: String,

    /// Full definition text; whitespace-normalized before comparison
    pub definition: String,

    pub language: String,
    pub security_definer: bool,

    /// IMMUTABLE / STABLE / VOLATILE (unknown catalog codes pass through)
    pub volatility: String,
}

/// One column of a table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableColumn {
    pub column_name: String,
    pub data_type: String,
    pub is_nullable: bool,

    /// Default expression; compared but never surfaced in reports
    pub column_default: Option<String>,

    /// Carried for report consumers; not compared
    pub character_max_length: Option<i32>,
}

/// One index of a table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableIndex {
    pub index_name: String,
    pub index_def: String,
}

/// One constraint of a table
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableConstraint {
    pub constraint_name: String,

    /// Decoded constraint kind (PRIMARY KEY, FOREIGN KEY, ...); not compared
    pub constraint_type: String,

    pub constraint_def: String,
}

/// Full shape of one base table: columns, indexes, and constraints
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableSchema {
    pub schema_name: String,
    pub table_name: String,
    pub columns: Vec<TableColumn>,
    pub indexes: Vec<TableIndex>,
    pub constraints: Vec<TableConstraint>,
}
