//! Supabase management API client for edge function snapshots.

use log::{debug, info};
use reqwest::Client;
use serde::Deserialize;

use super::schema::EdgeFunction;
use crate::utils::config::{DEFAULT_API_TIMEOUT, SUPABASE_API_URL};
use crate::utils::error::ApiError;

/// Client for the hosted management API
pub struct ManagementApi {
    client: Client,
    base_url: String,
    access_token: String,
}

/// Wire shape of one function row as the API returns it (snake_case).
///
/// Timestamps have shipped as both strings and epoch numbers across API
/// versions, so they are taken as raw JSON values and stringified.
#[derive(Debug, Deserialize)]
struct EdgeFunctionRow {
    id: String,
    name: String,
    slug: String,
    status: String,
    version: i64,
    #[serde(default)]
    created_at: Option<serde_json::Value>,
    #[serde(default)]
    updated_at: Option<serde_json::Value>,
}

impl ManagementApi {
    /// Create a client with the default base URL and timeout
    pub fn new(access_token: impl Into<String>) -> Result<Self, ApiError> {
        Self::with_base_url(access_token, SUPABASE_API_URL)
    }

    /// Create a client against a custom base URL (used by tests)
    pub fn with_base_url(
        access_token: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(DEFAULT_API_TIMEOUT)
            .build()
            .map_err(ApiError::RequestFailed)?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            access_token: access_token.into(),
        })
    }

    /// Fetch the deployed edge functions of one project
    pub async fn edge_functions(&self, project_ref: &str) -> Result<Vec<EdgeFunction>, ApiError> {
        let url = format!("{}/v1/projects/{}/functions", self.base_url, project_ref);
        debug!("GET {}", url);

        let response = self
            .client
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await
            .map_err(ApiError::RequestFailed)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::ErrorResponse {
                project_ref: project_ref.to_string(),
                status,
                body,
            });
        }

        let rows: Vec<EdgeFunctionRow> = response.json().await.map_err(ApiError::RequestFailed)?;
        info!(
            "fetched {} edge functions for project {}",
            rows.len(),
            project_ref
        );

        Ok(rows.into_iter().map(EdgeFunction::from).collect())
    }
}

impl From<EdgeFunctionRow> for EdgeFunction {
    fn from(row: EdgeFunctionRow) -> Self {
        EdgeFunction {
            id: row.id,
            name: row.name,
            slug: row.slug,
            status: row.status,
            version: row.version,
            created_at: stringify(row.created_at),
            updated_at: stringify(row.updated_at),
        }
    }
}

fn stringify(value: Option<serde_json::Value>) -> String {
    match value {
        None | Some(serde_json::Value::Null) => String::new(),
        Some(serde_json::Value::String(s)) => s,
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_conversion_string_timestamps() {
        let row: EdgeFunctionRow = serde_json::from_str(
            r#"{"id":"abc","name":"foo","slug":"foo","status":"ACTIVE","version":3,
                "created_at":"2025-01-01T00:00:00Z","updated_at":"2025-01-02T00:00:00Z"}"#,
        )
        .unwrap();
        let func = EdgeFunction::from(row);
        assert_eq!(func.slug, "foo");
        assert_eq!(func.version, 3);
        assert_eq!(func.created_at, "2025-01-01T00:00:00Z");
    }

    #[test]
    fn test_row_conversion_numeric_timestamps() {
        let row: EdgeFunctionRow = serde_json::from_str(
            r#"{"id":"abc","name":"foo","slug":"foo","status":"ACTIVE","version":1,
                "created_at":1735689600000,"updated_at":null}"#,
        )
        .unwrap();
        let func = EdgeFunction::from(row);
        assert_eq!(func.created_at, "1735689600000");
        assert_eq!(func.updated_at, "");
    }
}
