use log::debug;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

use crate::error::{GitLabMcpError, Result};

const USER_AGENT: &str = concat!("gitlab-ci-mcp/", env!("CARGO_PKG_VERSION"));

/// Authenticated client for the GitLab REST v4 API.
#[derive(Debug)]
pub struct GitLabClient {
    client: Client,
    api_url: Url,
    token: String,
}

impl GitLabClient {
    /// Builds a client for the given instance without contacting it.
    ///
    /// # Errors
    ///
    /// Returns a configuration error if the HTTP client cannot be built or
    /// the base URL does not parse.
    pub fn new(base_url: &str, token: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| GitLabMcpError::Config(format!("Failed to create HTTP client: {e}")))?;

        let api_url = Url::parse(base_url)
            .map_err(|e| GitLabMcpError::Config(format!("Invalid base URL: {e}")))?
            .join("api/v4/")
            .map_err(|e| GitLabMcpError::Config(format!("Invalid API base URL: {e}")))?;

        Ok(Self {
            client,
            api_url,
            token: token.to_string(),
        })
    }

    /// Performs the authentication handshake against `/user`.
    ///
    /// GitLab rejects the call for a bad or expired token, which makes this
    /// the earliest point a misconfigured token can be detected.
    ///
    /// # Errors
    ///
    /// Returns a connection error wrapping the transport or HTTP failure.
    pub async fn authenticate(&self) -> Result<()> {
        let url = self.endpoint("user")?;
        let response = self
            .auth_request(self.client.get(url))
            .send()
            .await
            .map_err(|e| GitLabMcpError::Connection(e.to_string()))?;

        if !response.status().is_success() {
            return Err(GitLabMcpError::Connection(format!(
                "authentication failed with status {}",
                response.status()
            )));
        }

        Ok(())
    }

    /// Issues an authenticated GET and deserializes the JSON body.
    ///
    /// Returns `Ok(None)` on 404 so callers can drive not-found fallbacks;
    /// any other non-success status is an API error carrying the response
    /// body.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<Option<T>> {
        match self.get(path, query).await? {
            Some(response) => Ok(Some(response.json().await?)),
            None => Ok(None),
        }
    }

    /// Issues an authenticated GET and returns the raw body text.
    ///
    /// Same 404 semantics as [`GitLabClient::get_json`].
    pub async fn get_text(&self, path: &str) -> Result<Option<String>> {
        match self.get(path, &[]).await? {
            Some(response) => Ok(Some(response.text().await?)),
            None => Ok(None),
        }
    }

    /// Percent-encoded path segment for a project id or full path.
    pub fn project_segment(project: &str) -> String {
        urlencoding::encode(project).into_owned()
    }

    async fn get(&self, path: &str, query: &[(&str, &str)]) -> Result<Option<Response>> {
        let url = self.endpoint(path)?;
        debug!("GET {url}");

        let response = self
            .auth_request(self.client.get(url).query(query))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GitLabMcpError::Api(format!(
                "GET {path} failed with status {status}: {body}"
            )));
        }

        Ok(Some(response))
    }

    fn auth_request(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        request.bearer_auth(&self.token)
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.api_url
            .join(path)
            .map_err(|e| GitLabMcpError::Config(format!("Invalid API path '{path}': {e}")))
    }
}
