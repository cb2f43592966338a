//! Configuration and constants for the CLI.

use std::time::Duration;

/// Base URL of the Supabase management API
pub const SUPABASE_API_URL: &str = "https://api.supabase.com";

/// Default timeout for management API requests
pub const DEFAULT_API_TIMEOUT: Duration = Duration::from_secs(30);

/// Timeout for acquiring a database connection from the pool
pub const DB_ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Maximum connections per environment database pool
pub const DB_MAX_CONNECTIONS: u32 = 4;

/// Current drift report schema version
pub const REPORT_VERSION: &str = "1.0.0";

/// Schemas excluded from database checks by default.
///
/// These are managed by Supabase itself; differences there track platform
/// rollout, not application drift.
pub const DEFAULT_EXCLUDED_SCHEMAS: &str =
    "auth,storage,realtime,extensions,vault,graphql,graphql_public,pgbouncer,supabase_functions";
