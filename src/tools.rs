//! The two operations exposed over the tool surface.
//!
//! Both are total: every internal failure is rendered into the returned
//! string, so callers never see an error value and nothing propagates across
//! the tool boundary.

use crate::error::Result;
use crate::git;
use crate::gitlab::provider;
use crate::output;

/// Lists the CI jobs attached to the working tree's current commit.
pub async fn get_current_commit_jobs() -> String {
    match commit_jobs_report().await {
        Ok(report) => report,
        Err(e) => output::render_error(&e),
    }
}

async fn commit_jobs_report() -> Result<String> {
    let commit_sha = git::resolve_current_commit()?;
    let jobs = provider::list_jobs_for_commit(&commit_sha).await?;

    Ok(output::render_commit_jobs(&commit_sha, &jobs))
}

/// Fetches the console log of a CI job by id.
pub async fn get_job_log(job_id: u64) -> String {
    match job_log_report(job_id).await {
        Ok(report) => report,
        Err(e) => output::render_error(&e),
    }
}

async fn job_log_report(job_id: u64) -> Result<String> {
    let log = provider::fetch_console_log(job_id).await?;

    Ok(output::render_job_log(job_id, &log))
}
