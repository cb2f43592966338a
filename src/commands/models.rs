use std::path::PathBuf;

/// Arguments for the check command
///
/// **Public** - used by main.rs to construct from CLI args
#[derive(Debug, Clone)]
pub struct CheckArgs {
    /// Management API access token
    pub access_token: String,

    /// Development project ref (management API)
    pub dev_project_ref: String,

    /// Development database connection URL
    pub dev_db_url: String,

    /// Staging project ref (optional; paired with stg_db_url)
    pub stg_project_ref: Option<String>,

    /// Staging database connection URL (optional; paired with stg_project_ref)
    pub stg_db_url: Option<String>,

    /// Production project ref
    pub prd_project_ref: String,

    /// Production database connection URL
    pub prd_db_url: String,

    /// Which entity kinds to check
    pub check_edge_functions: bool,
    pub check_rls_policies: bool,
    pub check_sql_functions: bool,
    pub check_schemas: bool,

    /// Exit non-zero when drift is found
    pub fail_on_drift: bool,

    /// Schemas excluded from all database checks
    pub excluded_schemas: Vec<String>,

    /// Path to write the JSON drift report
    pub output: Option<PathBuf>,

    /// Path to write the markdown report (PR comment body)
    pub markdown: Option<PathBuf>,

    /// Print a human-readable summary to the terminal
    pub summary: bool,
}

/// Arguments for the report command
#[derive(Debug, Clone)]
pub struct ReportArgs {
    /// Path to a previously written JSON drift report
    pub file: PathBuf,

    /// Path to write the markdown rendering
    pub markdown: Option<PathBuf>,

    /// Print the terminal summary instead of markdown on stdout
    pub summary: bool,
}
