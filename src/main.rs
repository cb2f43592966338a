//! Supadrift CLI
//!
//! Detects drift between Supabase deployment environments across edge
//! functions, RLS policies, SQL functions, and table schemas, and reports
//! it for CI.

use anyhow::Result;
use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

use supadrift::commands::{execute_check, execute_report, CheckArgs, ReportArgs};
use supadrift::utils::config::DEFAULT_EXCLUDED_SCHEMAS;

/// Supadrift - environment drift detection for Supabase projects
#[derive(Parser, Debug)]
#[command(name = "supadrift")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Available commands
#[derive(Subcommand, Debug)]
enum Commands {
    /// Check environments for drift and produce a report
    Check {
        /// Management API access token
        #[arg(long, env = "SUPABASE_ACCESS_TOKEN", hide_env_values = true)]
        access_token: String,

        /// Development project ref
        #[arg(long, env = "DEV_PROJECT_REF")]
        dev_project_ref: String,

        /// Development database connection URL
        #[arg(long, env = "DEV_DB_URL", hide_env_values = true)]
        dev_db_url: String,

        /// Staging project ref (enables the dev-stg / stg-prd chain)
        #[arg(long, env = "STG_PROJECT_REF")]
        stg_project_ref: Option<String>,

        /// Staging database connection URL
        #[arg(long, env = "STG_DB_URL", hide_env_values = true)]
        stg_db_url: Option<String>,

        /// Production project ref
        #[arg(long, env = "PRD_PROJECT_REF")]
        prd_project_ref: String,

        /// Production database connection URL
        #[arg(long, env = "PRD_DB_URL", hide_env_values = true)]
        prd_db_url: String,

        /// Skip the edge functions check
        #[arg(long)]
        skip_edge_functions: bool,

        /// Skip the RLS policies check
        #[arg(long)]
        skip_rls_policies: bool,

        /// Skip the SQL functions check
        #[arg(long)]
        skip_sql_functions: bool,

        /// Skip the table schemas check
        #[arg(long)]
        skip_schemas: bool,

        /// Exit non-zero when drift is found
        #[arg(long)]
        fail_on_drift: bool,

        /// Comma-separated schemas excluded from database checks
        #[arg(long, env = "EXCLUDED_SCHEMAS", value_delimiter = ',', default_value = DEFAULT_EXCLUDED_SCHEMAS)]
        excluded_schemas: Vec<String>,

        /// Path to write the JSON drift report
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Path to write the markdown report (PR comment body)
        #[arg(long)]
        markdown: Option<PathBuf>,

        /// Print a human-readable summary to the terminal
        #[arg(long)]
        summary: bool,
    },

    /// Re-render a previously written JSON drift report
    Report {
        /// Path to the JSON drift report
        #[arg(short, long)]
        file: PathBuf,

        /// Path to write the markdown rendering
        #[arg(long)]
        markdown: Option<PathBuf>,

        /// Print the terminal summary instead of markdown
        #[arg(long)]
        summary: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup logging
    let log_level = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(log_level)).init();

    // Execute command
    match cli.command {
        Commands::Check {
            access_token,
            dev_project_ref,
            dev_db_url,
            stg_project_ref,
            stg_db_url,
            prd_project_ref,
            prd_db_url,
            skip_edge_functions,
            skip_rls_policies,
            skip_sql_functions,
            skip_schemas,
            fail_on_drift,
            excluded_schemas,
            output,
            markdown,
            summary,
        } => {
            let args = CheckArgs {
                access_token,
                dev_project_ref,
                dev_db_url,
                stg_project_ref,
                stg_db_url,
                prd_project_ref,
                prd_db_url,
                check_edge_functions: !skip_edge_functions,
                check_rls_policies: !skip_rls_policies,
                check_sql_functions: !skip_sql_functions,
                check_schemas: !skip_schemas,
                fail_on_drift,
                excluded_schemas,
                output,
                markdown,
                summary,
            };

            execute_check(args).await?;
        }

        Commands::Report {
            file,
            markdown,
            summary,
        } => {
            execute_report(ReportArgs {
                file,
                markdown,
                summary,
            })?;
        }
    }

    Ok(())
}
