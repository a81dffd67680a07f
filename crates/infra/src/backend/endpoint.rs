//! Authenticated access to the backend's HTTP surface

use learnhub_domain::constants::API_KEY_HEADER;
use learnhub_domain::{BackendConfig, BackendError, LearnHubError, TransportKind};
use reqwest::{Method, RequestBuilder};
use url::Url;

use crate::http::HttpClient;

/// Base URL, public key and HTTP client shared by every backend call.
#[derive(Debug, Clone)]
pub struct RestEndpoint {
    http: HttpClient,
    base_url: Url,
    anon_key: String,
}

impl RestEndpoint {
    /// Validate the backend configuration and bind it to an HTTP client.
    ///
    /// # Errors
    /// Returns `LearnHubError::Config` if the URL does not parse, is not
    /// http(s), or the key is empty.
    pub fn new(config: &BackendConfig, http: HttpClient) -> Result<Self, LearnHubError> {
        let mut base_url = Url::parse(config.url.trim()).map_err(|e| {
            LearnHubError::Config(format!("Invalid backend URL '{}': {}", config.url, e))
        })?;

        if !matches!(base_url.scheme(), "http" | "https") {
            return Err(LearnHubError::Config(format!(
                "Backend URL must use http or https, got '{}'",
                base_url.scheme()
            )));
        }

        if config.anon_key.trim().is_empty() {
            return Err(LearnHubError::Config("Backend API key must not be empty".to_string()));
        }

        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Ok(Self { http, base_url, anon_key: config.anon_key.clone() })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn http(&self) -> &HttpClient {
        &self.http
    }

    /// Resolve a path (leading slash optional) against the base URL.
    pub fn url(&self, path: &str) -> Result<Url, BackendError> {
        self.base_url.join(path.trim_start_matches('/')).map_err(|e| {
            BackendError::transport(TransportKind::RequestBuild, format!("invalid path '{path}': {e}"))
        })
    }

    /// Request authorised with the public key.
    pub fn request(&self, method: Method, url: Url) -> RequestBuilder {
        self.request_as(method, url, &self.anon_key)
    }

    /// Request authorised with a caller-supplied access token.
    pub fn request_as(&self, method: Method, url: Url, token: &str) -> RequestBuilder {
        self.http
            .request(method, url)
            .header(API_KEY_HEADER, &self.anon_key)
            .bearer_auth(token)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(url: &str, key: &str) -> BackendConfig {
        BackendConfig { url: url.to_string(), anon_key: key.to_string() }
    }

    fn endpoint(url: &str) -> Result<RestEndpoint, LearnHubError> {
        RestEndpoint::new(&config(url, "public-key"), HttpClient::new().unwrap())
    }

    #[test]
    fn joins_paths_under_base_path() {
        let nested = endpoint("https://db.example.co/proxy").unwrap();
        assert_eq!(
            nested.url("/rest/v1/courses").unwrap().as_str(),
            "https://db.example.co/proxy/rest/v1/courses"
        );

        let bare = endpoint("https://db.example.co").unwrap();
        assert_eq!(bare.url("rest/v1/").unwrap().as_str(), "https://db.example.co/rest/v1/");
    }

    #[test]
    fn rejects_invalid_configuration() {
        assert!(matches!(endpoint("not a url"), Err(LearnHubError::Config(_))));
        assert!(matches!(endpoint("ftp://db.example.co"), Err(LearnHubError::Config(_))));

        let empty_key = RestEndpoint::new(
            &config("https://db.example.co", "  "),
            HttpClient::new().unwrap(),
        );
        assert!(matches!(empty_key, Err(LearnHubError::Config(_))));
    }
}
