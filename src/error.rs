use thiserror::Error;

#[derive(Error, Debug)]
pub enum GitLabMcpError {
    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("Failed to connect to GitLab: {0}")]
    Connection(String),

    #[error("Project '{0}' not found")]
    ProjectNotFound(String),

    #[error("Job #{0} not found")]
    JobNotFound(u64),

    #[error("Failed to resolve current commit: {0}")]
    CommitResolution(String),

    #[error("Failed to fetch jobs for commit {commit_sha}: {message}")]
    JobQuery { commit_sha: String, message: String },

    #[error("Failed to fetch log for job #{job_id}: {message}")]
    LogQuery { job_id: u64, message: String },

    #[error("GitLab API request failed: {0}")]
    Api(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, GitLabMcpError>;
