//! Postgres catalog queries for RLS policies, SQL functions, and table
//! schemas.
//!
//! Each environment is reached through its own connection pool. Catalog
//! identifier columns are cast to `text` in SQL so rows decode as plain
//! strings.

use log::{debug, info};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::Row;

use super::schema::{
    RlsPolicy, SqlFunction, TableColumn, TableConstraint, TableIndex, TableSchema,
};
use crate::diff::normalizer::map_volatility;
use crate::utils::config::{DB_ACQUIRE_TIMEOUT, DB_MAX_CONNECTIONS};
use crate::utils::error::DbError;

const RLS_POLICIES_QUERY: &str = r#"
SELECT
  schemaname::text AS schema_name,
  tablename::text AS table_name,
  policyname::text AS policy_name,
  permissive::text AS permissive,
  roles::text[] AS roles,
  cmd::text AS cmd,
  qual::text AS qual,
  with_check::text AS with_check
FROM pg_policies
WHERE schemaname <> ALL($1)
ORDER BY schemaname, tablename, policyname
"#;

const TARGET_SCHEMAS_QUERY: &str = r#"
SELECT nspname::text AS schema_name
FROM pg_namespace
WHERE nspname NOT LIKE 'pg_%'
  AND nspname <> 'information_schema'
  AND nspname <> ALL($1)
ORDER BY nspname
"#;

const SQL_FUNCTIONS_QUERY: &str = r#"
SELECT
  n.nspname::text AS schema_name,
  p.proname::text AS function_name,
  pg_get_function_arguments(p.oid) AS arguments,
  pg_get_function_result(p.oid) AS return_type,
  pg_get_functiondef(p.oid) AS definition,
  l.lanname::text AS language,
  p.prosecdef AS security_definer,
  p.provolatile::text AS volatility
FROM pg_proc p
JOIN pg_namespace n ON p.pronamespace = n.oid
JOIN pg_language l ON p.prolang = l.oid
WHERE n.nspname = ANY($1)
  AND p.prokind = 'f'
ORDER BY n.nspname, p.proname
"#;

const TABLES_QUERY: &str = r#"
SELECT
  table_schema::text AS schema_name,
  table_name::text AS table_name
FROM information_schema.tables
WHERE table_type = 'BASE TABLE'
  AND table_schema <> ALL($1)
  AND table_schema NOT LIKE 'pg_%'
  AND table_schema <> 'information_schema'
ORDER BY table_schema, table_name
"#;

const COLUMNS_QUERY: &str = r#"
SELECT
  column_name::text AS column_name,
  data_type::text AS data_type,
  is_nullable::text AS is_nullable,
  column_default::text AS column_default,
  character_maximum_length::int4 AS character_max_length
FROM information_schema.columns
WHERE table_schema = $1 AND table_name = $2
ORDER BY ordinal_position
"#;

const INDEXES_QUERY: &str = r#"
SELECT
  indexname::text AS index_name,
  indexdef::text AS index_def
FROM pg_indexes
WHERE schemaname = $1 AND tablename = $2
ORDER BY indexname
"#;

const CONSTRAINTS_QUERY: &str = r#"
SELECT
  c.conname::text AS constraint_name,
  CASE c.contype
    WHEN 'p' THEN 'PRIMARY KEY'
    WHEN 'f' THEN 'FOREIGN KEY'
    WHEN 'u' THEN 'UNIQUE'
    WHEN 'c' THEN 'CHECK'
    WHEN 'x' THEN 'EXCLUDE'
    ELSE c.contype::text
  END AS constraint_type,
  pg_get_constraintdef(c.oid) AS constraint_def
FROM pg_constraint c
JOIN pg_namespace n ON n.oid = c.connamespace
JOIN pg_class t ON t.oid = c.conrelid
WHERE n.nspname = $1 AND t.relname = $2
ORDER BY c.conname
"#;

/// Build a lazy pool for one environment database.
///
/// Connections are only established when the first query runs, so a bad
/// URL or unreachable host surfaces per entity-kind check (fail-soft)
/// rather than aborting the whole run up front.
pub fn connect(db_url: &str) -> Result<PgPool, DbError> {
    PgPoolOptions::new()
        .max_connections(DB_MAX_CONNECTIONS)
        .acquire_timeout(DB_ACQUIRE_TIMEOUT)
        .connect_lazy(db_url)
        .map_err(DbError::InvalidUrl)
}

/// Fetch all RLS policies outside the excluded schemas
pub async fn rls_policies(
    pool: &PgPool,
    excluded_schemas: &[String],
) -> Result<Vec<RlsPolicy>, DbError> {
    let rows = sqlx::query(RLS_POLICIES_QUERY)
        .bind(excluded_schemas)
        .fetch_all(pool)
        .await?;

    let mut policies = Vec::with_capacity(rows.len());
    for row in rows {
        policies.push(RlsPolicy {
            schema_name: row.try_get("schema_name")?,
            table_name: row.try_get("table_name")?,
            policy_name: row.try_get("policy_name")?,
            permissive: row.try_get("permissive")?,
            roles: row.try_get("roles")?,
            cmd: row.try_get("cmd")?,
            qual: row.try_get("qual")?,
            with_check: row.try_get("with_check")?,
        });
    }

    info!("fetched {} RLS policies", policies.len());
    Ok(policies)
}

/// Fetch user-defined SQL functions from all non-system target schemas.
///
/// Volatility codes are mapped to keywords here, before anything compares
/// or reports them.
pub async fn sql_functions(
    pool: &PgPool,
    excluded_schemas: &[String],
) -> Result<Vec<SqlFunction>, DbError> {
    let schema_rows = sqlx::query(TARGET_SCHEMAS_QUERY)
        .bind(excluded_schemas)
        .fetch_all(pool)
        .await?;

    let mut target_schemas = Vec::with_capacity(schema_rows.len());
    for row in schema_rows {
        target_schemas.push(row.try_get::<String, _>("schema_name")?);
    }
    debug!("target schemas: {:?}", target_schemas);

    if target_schemas.is_empty() {
        return Ok(Vec::new());
    }

    let rows = sqlx::query(SQL_FUNCTIONS_QUERY)
        .bind(&target_schemas)
        .fetch_all(pool)
        .await?;

    let mut functions = Vec::with_capacity(rows.len());
    for row in rows {
        let volatility: String = row.try_get("volatility")?;
        functions.push(SqlFunction {
            schema_name: row.try_get("schema_name")?,
            function_name: row.try_get("function_name")?,
            arguments: row.try_get("arguments")?,
            return_type: row.try_get("return_type")?,
            definition: row.try_get("definition")?,
            language: row.try_get("language")?,
            security_definer: row.try_get("security_definer")?,
            volatility: map_volatility(&volatility),
        });
    }

    info!("fetched {} SQL functions", functions.len());
    Ok(functions)
}

/// Fetch the full shape of every base table outside the excluded schemas
pub async fn table_schemas(
    pool: &PgPool,
    excluded_schemas: &[String],
) -> Result<Vec<TableSchema>, DbError> {
    let table_rows = sqlx::query(TABLES_QUERY)
        .bind(excluded_schemas)
        .fetch_all(pool)
        .await?;

    let mut schemas = Vec::with_capacity(table_rows.len());
    for table_row in table_rows {
        let schema_name: String = table_row.try_get("schema_name")?;
        let table_name: String = table_row.try_get("table_name")?;

        let (columns, indexes, constraints) = tokio::try_join!(
            fetch_columns(pool, &schema_name, &table_name),
            fetch_indexes(pool, &schema_name, &table_name),
            fetch_constraints(pool, &schema_name, &table_name),
        )?;

        schemas.push(TableSchema {
            schema_name,
            table_name,
            columns,
            indexes,
            constraints,
        });
    }

    info!("fetched {} table schemas", schemas.len());
    Ok(schemas)
}

async fn fetch_columns(
    pool: &PgPool,
    schema_name: &str,
    table_name: &str,
) -> Result<Vec<TableColumn>, DbError> {
    let rows = sqlx::query(COLUMNS_QUERY)
        .bind(schema_name)
        .bind(table_name)
        .fetch_all(pool)
        .await?;

    let mut columns = Vec::with_capacity(rows.len());
    for row in rows {
        let is_nullable: String = row.try_get("is_nullable")?;
        columns.push(TableColumn {
            column_name: row.try_get("column_name")?,
            data_type: row.try_get("data_type")?,
            is_nullable: is_nullable == "YES",
            column_default: row.try_get("column_default")?,
            character_max_length: row.try_get("character_max_length")?,
        });
    }
    Ok(columns)
}

async fn fetch_indexes(
    pool: &PgPool,
    schema_name: &str,
    table_name: &str,
) -> Result<Vec<TableIndex>, DbError> {
    let rows = sqlx::query(INDEXES_QUERY)
        .bind(schema_name)
        .bind(table_name)
        .fetch_all(pool)
        .await?;

    let mut indexes = Vec::with_capacity(rows.len());
    for row in rows {
        indexes.push(TableIndex {
            index_name: row.try_get("index_name")?,
            index_def: row.try_get("index_def")?,
        });
    }
    Ok(indexes)
}

async fn fetch_constraints(
    pool: &PgPool,
    schema_name: &str,
    table_name: &str,
) -> Result<Vec<TableConstraint>, DbError> {
    let rows = sqlx::query(CONSTRAINTS_QUERY)
        .bind(schema_name)
        .bind(table_name)
        .fetch_all(pool)
        .await?;

    let mut constraints = Vec::with_capacity(rows.len());
    for row in rows {
        constraints.push(TableConstraint {
            constraint_name: row.try_get("constraint_name")?,
            constraint_type: row.try_get("constraint_type")?,
            constraint_def: row.try_get("constraint_def")?,
        });
    }
    Ok(constraints)
}
