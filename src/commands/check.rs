//! Check command implementation.
//!
//! Runs the four entity-kind checks as concurrent tasks, fail-soft per
//! kind: a kind whose snapshot acquisition fails is recorded and skipped,
//! and the remaining kinds still reconcile. The run as a whole fails at
//! the end if anything errored, or if drift was found and --fail-on-drift
//! is set.

use anyhow::{bail, Context, Result};
use log::{error, info, warn};
use sqlx::postgres::PgPool;
use std::io::Write;

use super::models::CheckArgs;
use crate::diff::chain::{build_chain, has_drift, EnvironmentChain};
use crate::diff::schema::{CheckFailure, DriftReport, PairwiseDiff};
use crate::report::{render_markdown, render_terminal_report, write_report};
use crate::snapshot::api::ManagementApi;
use crate::snapshot::db;
use crate::snapshot::schema::{EdgeFunction, RlsPolicy, SqlFunction, TableSchema};

/// Validate cross-argument invariants before doing any work
pub fn validate_args(args: &CheckArgs) -> Result<()> {
    match (&args.stg_project_ref, &args.stg_db_url) {
        (Some(_), None) | (None, Some(_)) => {
            bail!("staging requires both --stg-project-ref and --stg-db-url (or neither)")
        }
        _ => Ok(()),
    }
}

/// One pool per environment database
struct DbPools {
    dev: PgPool,
    stg: Option<PgPool>,
    prd: PgPool,
}

/// Execute the check command
pub async fn execute_check(args: CheckArgs) -> Result<()> {
    validate_args(&args)?;
    let has_stg = args.stg_project_ref.is_some();

    info!("Starting Supabase environment drift check...");

    let api = ManagementApi::new(&args.access_token)
        .context("Failed to build management API client")?;

    let pools = DbPools {
        dev: db::connect(&args.dev_db_url).context("Invalid dev database URL")?,
        stg: args
            .stg_db_url
            .as_deref()
            .map(db::connect)
            .transpose()
            .context("Invalid stg database URL")?,
        prd: db::connect(&args.prd_db_url).context("Invalid prd database URL")?,
    };

    info!("Running checks in parallel...");
    let (edge, rls, funcs, tables) = tokio::join!(
        async {
            if args.check_edge_functions {
                Some(check_edge_functions(&api, &args).await)
            } else {
                None
            }
        },
        async {
            if args.check_rls_policies {
                Some(check_rls_policies(&pools, &args.excluded_schemas).await)
            } else {
                None
            }
        },
        async {
            if args.check_sql_functions {
                Some(check_sql_functions(&pools, &args.excluded_schemas).await)
            } else {
                None
            }
        },
        async {
            if args.check_schemas {
                Some(check_schemas(&pools, &args.excluded_schemas).await)
            } else {
                None
            }
        },
    );

    let mut report = DriftReport::new(has_stg);
    record(&mut report, "Edge Functions", edge, |r, v| {
        r.edge_functions = Some(v)
    });
    record(&mut report, "RLS Policies", rls, |r, v| {
        r.rls_policies = Some(v)
    });
    record(&mut report, "SQL Functions", funcs, |r, v| {
        r.sql_functions = Some(v)
    });
    record(&mut report, "Schemas", tables, |r, v| r.schemas = Some(v));

    if let Some(path) = &args.output {
        write_report(&report, path).context("Failed to write drift report JSON")?;
        println!("📊 Drift report written to {}", path.display());
    }

    if let Some(path) = &args.markdown {
        std::fs::write(path, render_markdown(&report))
            .context("Failed to write markdown report")?;
        println!("📝 Markdown report written to {}", path.display());
    }

    if args.summary {
        println!("{}", render_terminal_report(&report));
    }

    write_github_outputs(&report).context("Failed to write GitHub outputs")?;

    if !report.failures.is_empty() {
        let messages: Vec<String> = report
            .failures
            .iter()
            .map(|f| format!("{}: {}", f.kind, f.message))
            .collect();
        bail!("Errors occurred during checks: {}", messages.join("; "));
    }

    if report.has_drift {
        warn!("Differences detected between environments");
        if args.fail_on_drift {
            bail!("Differences detected between environments (--fail-on-drift)");
        }
    } else {
        info!("No differences between environments");
    }

    Ok(())
}

/// Fold one kind's outcome into the report (fail-soft on errors)
fn record<T>(
    report: &mut DriftReport,
    name: &str,
    outcome: Option<Result<Vec<PairwiseDiff<T>>>>,
    set: impl FnOnce(&mut DriftReport, Vec<PairwiseDiff<T>>),
) {
    match outcome {
        None => info!("{}: skipped", name),
        Some(Ok(entries)) => {
            if has_drift(&entries) {
                warn!("Differences found in {}", name);
                report.has_drift = true;
            }
            set(report, entries);
        }
        Some(Err(e)) => {
            error!("Error in {}: {:#}", name, e);
            report.failures.push(CheckFailure {
                kind: name.to_string(),
                message: format!("{:#}", e),
            });
        }
    }
}

async fn check_edge_functions(
    api: &ManagementApi,
    args: &CheckArgs,
) -> Result<Vec<PairwiseDiff<EdgeFunction>>> {
    info!("Fetching edge functions...");
    let chain = match &args.stg_project_ref {
        Some(stg_ref) => {
            let (dev, stg, prd) = tokio::try_join!(
                api.edge_functions(&args.dev_project_ref),
                api.edge_functions(stg_ref),
                api.edge_functions(&args.prd_project_ref),
            )?;
            EnvironmentChain {
                dev,
                stg: Some(stg),
                prd,
            }
        }
        None => {
            let (dev, prd) = tokio::try_join!(
                api.edge_functions(&args.dev_project_ref),
                api.edge_functions(&args.prd_project_ref),
            )?;
            EnvironmentChain {
                dev,
                stg: None,
                prd,
            }
        }
    };
    Ok(build_chain(&chain))
}

async fn check_rls_policies(
    pools: &DbPools,
    excluded: &[String],
) -> Result<Vec<PairwiseDiff<RlsPolicy>>> {
    info!("Fetching RLS policies...");
    let chain = match &pools.stg {
        Some(stg_pool) => {
            let (dev, stg, prd) = tokio::try_join!(
                db::rls_policies(&pools.dev, excluded),
                db::rls_policies(stg_pool, excluded),
                db::rls_policies(&pools.prd, excluded),
            )?;
            EnvironmentChain {
                dev,
                stg: Some(stg),
                prd,
            }
        }
        None => {
            let (dev, prd) = tokio::try_join!(
                db::rls_policies(&pools.dev, excluded),
                db::rls_policies(&pools.prd, excluded),
            )?;
            EnvironmentChain {
                dev,
                stg: None,
                prd,
            }
        }
    };
    Ok(build_chain(&chain))
}

async fn check_sql_functions(
    pools: &DbPools,
    excluded: &[String],
) -> Result<Vec<PairwiseDiff<SqlFunction>>> {
    info!("Fetching SQL functions...");
    let chain = match &pools.stg {
        Some(stg_pool) => {
            let (dev, stg, prd) = tokio::try_join!(
                db::sql_functions(&pools.dev, excluded),
                db::sql_functions(stg_pool, excluded),
                db::sql_functions(&pools.prd, excluded),
            )?;
            EnvironmentChain {
                dev,
                stg: Some(stg),
                prd,
            }
        }
        None => {
            let (dev, prd) = tokio::try_join!(
                db::sql_functions(&pools.dev, excluded),
                db::sql_functions(&pools.prd, excluded),
            )?;
            EnvironmentChain {
                dev,
                stg: None,
                prd,
            }
        }
    };
    Ok(build_chain(&chain))
}

async fn check_schemas(
    pools: &DbPools,
    excluded: &[String],
) -> Result<Vec<PairwiseDiff<TableSchema>>> {
    info!("Fetching table schemas...");
    let chain = match &pools.stg {
        Some(stg_pool) => {
            let (dev, stg, prd) = tokio::try_join!(
                db::table_schemas(&pools.dev, excluded),
                db::table_schemas(stg_pool, excluded),
                db::table_schemas(&pools.prd, excluded),
            )?;
            EnvironmentChain {
                dev,
                stg: Some(stg),
                prd,
            }
        }
        None => {
            let (dev, prd) = tokio::try_join!(
                db::table_schemas(&pools.dev, excluded),
                db::table_schemas(&pools.prd, excluded),
            )?;
            EnvironmentChain {
                dev,
                stg: None,
                prd,
            }
        }
    };
    Ok(build_chain(&chain))
}

/// Append machine-readable outputs for GitHub Actions, when running there
fn write_github_outputs(report: &DriftReport) -> Result<()> {
    let Some(path) = std::env::var_os("GITHUB_OUTPUT") else {
        return Ok(());
    };

    let mut file = std::fs::OpenOptions::new()
        .append(true)
        .create(true)
        .open(path)?;

    append_github_outputs(report, &mut file)
}

/// Emit the `key=value` lines consumed by later workflow steps
fn append_github_outputs(report: &DriftReport, out: &mut impl Write) -> Result<()> {
    writeln!(out, "has_drift={}", report.has_drift)?;
    writeln!(out, "drift_report={}", serde_json::to_string(report)?)?;

    Ok(())
}
