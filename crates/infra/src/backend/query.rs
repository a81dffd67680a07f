//! Table reads and writes over the backend's REST interface

use std::sync::Arc;

use learnhub_domain::constants::REST_PATH;
use learnhub_domain::BackendError;
use reqwest::header::HeaderValue;
use reqwest::{Method, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use super::endpoint::RestEndpoint;
use crate::errors::{error_from_response, InfraError};

/// Rows returned by a table operation plus the HTTP status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryResponse<T> {
    pub data: Vec<T>,
    pub status: u16,
}

/// Filtered read of a single table.
///
/// Built by [`crate::backend::BackendClient::from`]; nothing is sent until
/// [`QueryBuilder::execute`].
#[derive(Debug, Clone)]
pub struct QueryBuilder {
    endpoint: Arc<RestEndpoint>,
    table: String,
    columns: String,
    filters: Vec<(String, String)>,
    order: Option<(String, bool)>,
    limit: Option<usize>,
    access_token: Option<String>,
}

impl QueryBuilder {
    pub(crate) fn new(endpoint: Arc<RestEndpoint>, table: impl Into<String>) -> Self {
        Self {
            endpoint,
            table: table.into(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
            access_token: None,
        }
    }

    /// Columns to return, in the provider's select syntax. Defaults to `*`.
    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    /// Keep rows where `column` equals `value`.
    pub fn eq(mut self, column: impl Into<String>, value: impl ToString) -> Self {
        self.filters.push((column.into(), format!("eq.{}", value.to_string())));
        self
    }

    pub fn order(mut self, column: impl Into<String>, ascending: bool) -> Self {
        self.order = Some((column.into(), ascending));
        self
    }

    pub fn limit(mut self, count: usize) -> Self {
        self.limit = Some(count);
        self
    }

    /// Run the query as the signed-in user instead of the anonymous role.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    /// Send the query and decode the rows.
    ///
    /// # Errors
    /// Transport failures, non-success statuses and undecodable bodies are
    /// all returned as [`BackendError`].
    #[instrument(skip(self), fields(table = %self.table))]
    pub async fn execute<T: DeserializeOwned>(&self) -> Result<QueryResponse<T>, BackendError> {
        let mut url = self.endpoint.url(&format!("{REST_PATH}{}", self.table))?;
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("select", &self.columns);
            for (column, filter) in &self.filters {
                pairs.append_pair(column, filter);
            }
            if let Some((column, ascending)) = &self.order {
                let direction = if *ascending { "asc" } else { "desc" };
                pairs.append_pair("order", &format!("{column}.{direction}"));
            }
            if let Some(limit) = self.limit {
                pairs.append_pair("limit", &limit.to_string());
            }
        }

        let builder = match &self.access_token {
            Some(token) => self.endpoint.request_as(Method::GET, url, token),
            None => self.endpoint.request(Method::GET, url),
        };

        let response = self.endpoint.http().send(builder).await?;
        let result = decode_rows(response).await?;
        debug!(rows = result.data.len(), status = result.status, "query completed");
        Ok(result)
    }
}

/// Insert rows into `table` and return the stored representation.
#[instrument(skip(endpoint, rows))]
pub(crate) async fn insert<R, T>(
    endpoint: &RestEndpoint,
    table: &str,
    rows: &R,
) -> Result<QueryResponse<T>, BackendError>
where
    R: Serialize + ?Sized,
    T: DeserializeOwned,
{
    let url = endpoint.url(&format!("{REST_PATH}{table}"))?;
    let builder = endpoint
        .request(Method::POST, url)
        .header("Prefer", HeaderValue::from_static("return=representation"))
        .json(rows);

    let response = endpoint.http().send(builder).await?;
    decode_rows(response).await
}

/// Decode a row-returning response, normalising failures.
///
/// A single object body is accepted as one row.
pub(crate) async fn decode_rows<T: DeserializeOwned>(
    response: Response,
) -> Result<QueryResponse<T>, BackendError> {
    let status = response.status();
    if !status.is_success() {
        return Err(error_from_response(response).await);
    }

    let bytes = response.bytes().await.map_err(|err| BackendError::from(InfraError::from(err)))?;
    if bytes.iter().all(u8::is_ascii_whitespace) {
        return Ok(QueryResponse { data: Vec::new(), status: status.as_u16() });
    }

    let value: serde_json::Value =
        serde_json::from_slice(&bytes).map_err(|e| BackendError::decode(e.to_string()))?;
    let data = if value.is_array() {
        serde_json::from_value::<Vec<T>>(value)
    } else {
        serde_json::from_value::<T>(value).map(|row| vec![row])
    }
    .map_err(|e| BackendError::decode(e.to_string()))?;

    Ok(QueryResponse { data, status: status.as_u16() })
}
