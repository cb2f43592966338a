//! Drift reconciliation core.
//!
//! Pure, synchronous comparison of environment snapshots: a generic keyed
//! reconciler, per-entity-kind comparators, field normalization, and the
//! pairwise chain over the environment sequence. No I/O happens here; every
//! operation is total over its inputs, so there is no error type.

pub mod chain;
pub mod comparators;
pub mod normalizer;
pub mod reconcile;
pub mod schema;

// Public API exports
pub use chain::{build_chain, has_drift, EnvironmentChain};
pub use comparators::{reconcile_entities, Comparable};
pub use normalizer::{map_volatility, normalize_sql_text};
pub use reconcile::{classify, reconcile, Entry};
pub use schema::{
    CheckFailure, DriftReport, EntityDiff, EnvironmentPair, PairwiseDiff, Reconciliation,
};
