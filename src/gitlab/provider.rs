use log::{debug, info};

use crate::config::GitLabConfig;
use crate::error::{GitLabMcpError, Result};

use super::client::GitLabClient;
use super::types::{CommitJob, Job, Pipeline, Project};

/// Query facade over a single GitLab project's CI data.
///
/// The module-level entry points re-read the environment and re-authenticate
/// on every call, so concurrent invocations share no state and environment
/// changes between calls are always observed.
pub struct GitLabProvider {
    client: GitLabClient,
    project: String,
}

impl GitLabProvider {
    /// Creates a provider from explicit settings without contacting GitLab.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL is invalid.
    pub fn new(base_url: &str, project: String, token: &str) -> Result<Self> {
        let client = GitLabClient::new(base_url, token)?;

        Ok(Self { client, project })
    }

    /// Reads configuration from the environment and performs the
    /// authentication handshake.
    ///
    /// # Errors
    ///
    /// Returns a configuration error for a missing environment variable or a
    /// connection error if the handshake fails.
    pub async fn connect() -> Result<Self> {
        let config = GitLabConfig::from_env()?;
        let provider = Self::new(&config.base_url, config.project, &config.token)?;
        provider.client.authenticate().await?;

        Ok(provider)
    }

    /// Resolves the configured project.
    ///
    /// Tries an exact lookup by id or path first; only when that returns 404
    /// does it fall back to a search, taking the first match. Other API
    /// failures propagate with their original message.
    ///
    /// # Errors
    ///
    /// Returns `ProjectNotFound` when neither lookup nor search matches.
    pub async fn resolve_project(&self) -> Result<Project> {
        let segment = GitLabClient::project_segment(&self.project);
        if let Some(project) = self
            .client
            .get_json::<Project>(&format!("projects/{segment}"), &[])
            .await?
        {
            return Ok(project);
        }

        debug!(
            "Exact lookup for '{}' returned 404, falling back to search",
            self.project
        );

        let matches: Option<Vec<Project>> = self
            .client
            .get_json("projects", &[("search", self.project.as_str())])
            .await?;

        matches
            .unwrap_or_default()
            .into_iter()
            .next()
            .ok_or_else(|| GitLabMcpError::ProjectNotFound(self.project.clone()))
    }

    /// Lists all jobs across every pipeline matching the given commit.
    ///
    /// A commit with no pipelines yields an empty list, not an error. Jobs
    /// keep the API's ordering: pipelines in listing order, then each
    /// pipeline's jobs in their returned order.
    pub async fn jobs_for_commit(&self, commit_sha: &str) -> Result<Vec<CommitJob>> {
        let project = self.resolve_project().await?;
        let base = format!("projects/{}", project.id);

        let pipelines: Vec<Pipeline> = self
            .client
            .get_json(&format!("{base}/pipelines"), &[("sha", commit_sha)])
            .await?
            .unwrap_or_default();

        if pipelines.is_empty() {
            info!("No pipelines found for commit {commit_sha}");
            return Ok(Vec::new());
        }

        info!(
            "Found {} pipelines for commit {commit_sha}",
            pipelines.len()
        );

        let mut jobs = Vec::new();
        for pipeline in pipelines {
            // The list endpoint returns summaries only; fetch the full
            // pipeline before listing its jobs.
            let detail: Pipeline = self
                .client
                .get_json(&format!("{base}/pipelines/{}", pipeline.id), &[])
                .await?
                .ok_or_else(|| {
                    GitLabMcpError::Api(format!("pipeline {} not found", pipeline.id))
                })?;

            let pipeline_jobs: Vec<Job> = self
                .client
                .get_json(&format!("{base}/pipelines/{}/jobs", detail.id), &[])
                .await?
                .unwrap_or_default();

            jobs.extend(
                pipeline_jobs
                    .into_iter()
                    .map(|job| CommitJob::from_job(job, detail.id, commit_sha)),
            );
        }

        Ok(jobs)
    }

    /// Fetches the raw console log (trace) for a job.
    ///
    /// # Errors
    ///
    /// Returns `JobNotFound` when the job id does not exist in the project.
    pub async fn job_trace(&self, job_id: u64) -> Result<String> {
        let project = self.resolve_project().await?;
        let base = format!("projects/{}", project.id);

        let job: Job = self
            .client
            .get_json(&format!("{base}/jobs/{job_id}"), &[])
            .await?
            .ok_or(GitLabMcpError::JobNotFound(job_id))?;

        self.client
            .get_text(&format!("{base}/jobs/{}/trace", job.id))
            .await?
            .ok_or(GitLabMcpError::JobNotFound(job_id))
    }
}

/// Lists jobs for a commit, connecting fresh from the environment.
///
/// Any failure at any stage is wrapped into a single error that embeds the
/// commit SHA alongside the original failure text.
pub async fn list_jobs_for_commit(commit_sha: &str) -> Result<Vec<CommitJob>> {
    let result = async {
        let provider = GitLabProvider::connect().await?;
        provider.jobs_for_commit(commit_sha).await
    }
    .await;

    result.map_err(|e| GitLabMcpError::JobQuery {
        commit_sha: commit_sha.to_string(),
        message: e.to_string(),
    })
}

/// Fetches a job's console log, connecting fresh from the environment.
///
/// A missing job keeps its dedicated error so callers can tell the cases
/// apart; every other failure is wrapped with the job id and the original
/// failure text.
pub async fn fetch_console_log(job_id: u64) -> Result<String> {
    let result = async {
        let provider = GitLabProvider::connect().await?;
        provider.job_trace(job_id).await
    }
    .await;

    result.map_err(|e| match e {
        GitLabMcpError::JobNotFound(_) => e,
        other => GitLabMcpError::LogQuery {
            job_id,
            message: other.to_string(),
        },
    })
}
