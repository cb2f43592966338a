//! Snapshot acquisition: entity records and the clients that fetch them.
//!
//! Everything here is upstream of the diff core. Acquisition failures are
//! reported to the caller per entity kind; the core is only invoked with
//! complete snapshots.

pub mod api;
pub mod db;
pub mod schema;

// Re-export main types
pub use api::ManagementApi;
pub use schema::{
    EdgeFunction, RlsPolicy, SqlFunction, TableColumn, TableConstraint, TableIndex, TableSchema,
};
