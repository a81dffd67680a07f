//! Session lookup against the backend's auth service

use learnhub_domain::constants::AUTH_USER_PATH;
use learnhub_domain::BackendError;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, instrument};

use super::endpoint::RestEndpoint;
use crate::errors::{error_from_response, InfraError};

/// User behind an access token.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub app_metadata: Map<String, Value>,
    #[serde(default)]
    pub user_metadata: Map<String, Value>,
}

/// Auth operations, borrowed from a [`crate::backend::BackendClient`].
#[derive(Debug, Clone, Copy)]
pub struct AuthClient<'a> {
    endpoint: &'a RestEndpoint,
}

impl<'a> AuthClient<'a> {
    pub(crate) fn new(endpoint: &'a RestEndpoint) -> Self {
        Self { endpoint }
    }

    /// Resolve the user for an access token.
    ///
    /// # Errors
    /// An empty token is rejected locally as a 401; provider rejections keep
    /// their status and code.
    #[instrument(skip_all)]
    pub async fn get_user(&self, access_token: &str) -> Result<AuthUser, BackendError> {
        if access_token.trim().is_empty() {
            return Err(BackendError::http(401, "missing access token"));
        }

        let url = self.endpoint.url(AUTH_USER_PATH)?;
        let request = self.endpoint.request_as(Method::GET, url, access_token);
        let response = self.endpoint.http().send(request).await?;

        if !response.status().is_success() {
            return Err(error_from_response(response).await);
        }

        let user: AuthUser =
            response.json().await.map_err(|err| BackendError::from(InfraError::from(err)))?;
        debug!(user_id = %user.id, "resolved session user");
        Ok(user)
    }
}
