//! Per-entity-kind comparison rules.
//!
//! Each entity kind supplies an identity key and a field-diff function to
//! the generic reconciler. Difference lines are emitted in a fixed per-kind
//! order; report consumers rely on that order, so it is pinned by tests.

use std::hash::Hash;

use super::normalizer::{format_roles, normalize_sql_text};
use super::reconcile::{classify, reconcile, Entry};
use super::schema::Reconciliation;
use crate::snapshot::schema::{
    EdgeFunction, RlsPolicy, SqlFunction, TableColumn, TableSchema,
};

/// An entity kind that can be reconciled across environments.
///
/// `key` defines which records are "the same" logical entity; `differences`
/// extracts the human-readable field-level mismatch lines (empty means the
/// records match); `label` names an entity in rendered reports.
pub trait Comparable: Clone {
    type Key: Eq + Hash + Clone;

    fn key(&self) -> Self::Key;
    fn differences(&self, other: &Self) -> Vec<String>;
    fn label(&self) -> String;
}

/// Reconcile two snapshots of one entity kind
pub fn reconcile_entities<T: Comparable>(first: &[T], second: &[T]) -> Reconciliation<T> {
    reconcile(first, second, T::key, T::differences)
}

impl Comparable for EdgeFunction {
    type Key = String;

    fn key(&self) -> String {
        self.slug.clone()
    }

    fn differences(&self, other: &Self) -> Vec<String> {
        let mut diffs = Vec::new();

        if self.version != other.version {
            diffs.push(format!("version: {} → {}", self.version, other.version));
        }
        if self.status != other.status {
            diffs.push(format!("status: {} → {}", self.status, other.status));
        }

        diffs
    }

    fn label(&self) -> String {
        self.slug.clone()
    }
}

impl Comparable for RlsPolicy {
    type Key = (String, String, String);

    fn key(&self) -> Self::Key {
        (
            self.schema_name.clone(),
            self.table_name.clone(),
            self.policy_name.clone(),
        )
    }

    fn differences(&self, other: &Self) -> Vec<String> {
        let mut diffs = Vec::new();

        if self.permissive != other.permissive {
            diffs.push(format!(
                "permissive: {} → {}",
                self.permissive, other.permissive
            ));
        }
        // Ordered sequence equality, not set equality
        if self.roles != other.roles {
            diffs.push(format!(
                "roles: {} → {}",
                format_roles(&self.roles),
                format_roles(&other.roles)
            ));
        }
        if self.cmd != other.cmd {
            diffs.push(format!("cmd: {} → {}", self.cmd, other.cmd));
        }
        // Predicate text is never surfaced, only its inequality
        if self.qual != other.qual {
            diffs.push("qual: definition differs".to_string());
        }
        if self.with_check != other.with_check {
            diffs.push("with_check: definition differs".to_string());
        }

        diffs
    }

    fn label(&self) -> String {
        format!(
            "{}.{}.{}",
            self.schema_name, self.table_name, self.policy_name
        )
    }
}

impl Comparable for SqlFunction {
    type Key = (String, String, String);

    fn key(&self) -> Self::Key {
        (
            self.schema_name.clone(),
            self.function_name.clone(),
            self.arguments.clone(),
        )
    }

    fn differences(&self, other: &Self) -> Vec<String> {
        let mut diffs = Vec::new();

        if self.return_type != other.return_type {
            diffs.push(format!(
                "return_type: {} → {}",
                self.return_type, other.return_type
            ));
        }
        if self.language != other.language {
            diffs.push(format!("language: {} → {}", self.language, other.language));
        }
        if self.security_definer != other.security_definer {
            diffs.push(format!(
                "security_definer: {} → {}",
                self.security_definer, other.security_definer
            ));
        }
        if self.volatility != other.volatility {
            diffs.push(format!(
                "volatility: {} → {}",
                self.volatility, other.volatility
            ));
        }
        // Bodies compare whitespace-insensitively and are never surfaced
        if normalize_sql_text(&self.definition) != normalize_sql_text(&other.definition) {
            diffs.push("definition: differs".to_string());
        }

        diffs
    }

    fn label(&self) -> String {
        format!(
            "{}.{}({})",
            self.schema_name, self.function_name, self.arguments
        )
    }
}

impl Comparable for TableSchema {
    type Key = (String, String);

    fn key(&self) -> Self::Key {
        (self.schema_name.clone(), self.table_name.clone())
    }

    /// Recursively reconciles columns, indexes, and constraints with the
    /// same keyed walk used at the entity level. Within each group the
    /// only-in lines interleave with mismatch lines in first-snapshot
    /// order, then only-in-second lines follow; groups concatenate as
    /// columns, indexes, constraints.
    fn differences(&self, other: &Self) -> Vec<String> {
        let mut diffs = Vec::new();

        for entry in classify(
            &self.columns,
            &other.columns,
            |c| c.column_name.clone(),
            column_differences,
        ) {
            match entry {
                Entry::OnlyInFirst(c) => {
                    diffs.push(format!("column \"{}\": only in dev", c.column_name));
                }
                Entry::OnlyInSecond(c) => {
                    diffs.push(format!("column \"{}\": only in prod", c.column_name));
                }
                Entry::Differing { differences, .. } => diffs.extend(differences),
                Entry::Matching(_) => {}
            }
        }

        for entry in classify(
            &self.indexes,
            &other.indexes,
            |i| i.index_name.clone(),
            // Full-text equality, no normalization
            |a, b| {
                if a.index_def != b.index_def {
                    vec![format!("index \"{}\": definition differs", a.index_name)]
                } else {
                    vec![]
                }
            },
        ) {
            match entry {
                Entry::OnlyInFirst(i) => {
                    diffs.push(format!("index \"{}\": only in dev", i.index_name));
                }
                Entry::OnlyInSecond(i) => {
                    diffs.push(format!("index \"{}\": only in prod", i.index_name));
                }
                Entry::Differing { differences, .. } => diffs.extend(differences),
                Entry::Matching(_) => {}
            }
        }

        for entry in classify(
            &self.constraints,
            &other.constraints,
            |c| c.constraint_name.clone(),
            |a, b| {
                if a.constraint_def != b.constraint_def {
                    vec![format!(
                        "constraint \"{}\": definition differs",
                        a.constraint_name
                    )]
                } else {
                    vec![]
                }
            },
        ) {
            match entry {
                Entry::OnlyInFirst(c) => {
                    diffs.push(format!("constraint \"{}\": only in dev", c.constraint_name));
                }
                Entry::OnlyInSecond(c) => {
                    diffs.push(format!(
                        "constraint \"{}\": only in prod",
                        c.constraint_name
                    ));
                }
                Entry::Differing { differences, .. } => diffs.extend(differences),
                Entry::Matching(_) => {}
            }
        }

        diffs
    }

    fn label(&self) -> String {
        format!("{}.{}", self.schema_name, self.table_name)
    }
}

/// Field mismatches for a column present on both sides, in fixed order:
/// data type, nullability, default (default content is never surfaced)
fn column_differences(a: &TableColumn, b: &TableColumn) -> Vec<String> {
    let mut diffs = Vec::new();

    if a.data_type != b.data_type {
        diffs.push(format!(
            "column \"{}\" data_type: {} → {}",
            a.column_name, a.data_type, b.data_type
        ));
    }
    if a.is_nullable != b.is_nullable {
        diffs.push(format!(
            "column \"{}\" nullable: {} → {}",
            a.column_name, a.is_nullable, b.is_nullable
        ));
    }
    if a.column_default != b.column_default {
        diffs.push(format!("column \"{}\" default: differs", a.column_name));
    }

    diffs
}
