use std::env;

use crate::error::{GitLabMcpError, Result};

/// Environment variable holding the GitLab instance base URL.
pub const GITLAB_URL_VAR: &str = "GITLAB_URL";
/// Environment variable holding the access token.
pub const GITLAB_TOKEN_VAR: &str = "GITLAB_API_KEY";
/// Environment variable holding the project id or full path.
pub const GITLAB_PROJECT_VAR: &str = "GITLAB_PROJECT_NAME";

/// Connection settings for a GitLab instance, sourced from the environment.
#[derive(Debug, Clone)]
pub struct GitLabConfig {
    /// GitLab instance base URL (e.g. <https://gitlab.com>)
    pub base_url: String,

    /// Personal or project access token
    pub token: String,

    /// Project id or full path (e.g. "group/project")
    pub project: String,
}

impl GitLabConfig {
    /// Reads the configuration from the process environment.
    ///
    /// Looked up fresh on every call, never cached, so that repeated test
    /// invocations observe environment changes deterministically.
    ///
    /// # Errors
    ///
    /// Returns a configuration error naming the first missing variable.
    /// Empty values count as missing.
    pub fn from_env() -> Result<Self> {
        Ok(Self {
            base_url: require_env(GITLAB_URL_VAR)?,
            token: require_env(GITLAB_TOKEN_VAR)?,
            project: require_env(GITLAB_PROJECT_VAR)?,
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    match env::var(name) {
        Ok(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(GitLabMcpError::Config(format!(
            "{name} environment variable is not set"
        ))),
    }
}
