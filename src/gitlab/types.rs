use chrono::{DateTime, Utc};
use serde::Deserialize;

/// A GitLab project as returned by the projects API.
#[derive(Debug, Clone, Deserialize)]
pub struct Project {
    /// Numeric project id
    pub id: u64,
    /// Full project path (e.g. "group/project")
    pub path_with_namespace: String,
}

/// A CI pipeline as returned by the pipelines API.
#[derive(Debug, Clone, Deserialize)]
pub struct Pipeline {
    /// Numeric pipeline id
    pub id: u64,
    /// Commit SHA the pipeline ran against
    pub sha: String,
    /// Pipeline status (e.g. "success", "failed")
    pub status: String,
}

/// Execution status of a CI job.
///
/// GitLab reports more states than the ones rendered here (e.g. `created`,
/// `manual`, `waiting_for_resource`); anything outside the six rendered
/// states deserializes to [`JobStatus::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Success,
    Failed,
    Running,
    Pending,
    Canceled,
    Skipped,
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    /// The lowercase status text as reported by the API.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Success => "success",
            JobStatus::Failed => "failed",
            JobStatus::Running => "running",
            JobStatus::Pending => "pending",
            JobStatus::Canceled => "canceled",
            JobStatus::Skipped => "skipped",
            JobStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for JobStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job within a pipeline, as returned by the jobs API.
#[derive(Debug, Clone, Deserialize)]
pub struct Job {
    /// Numeric job id
    pub id: u64,
    /// Job name as defined in .gitlab-ci.yml
    pub name: String,
    /// Final or current job status
    pub status: JobStatus,
    /// Stage this job belongs to
    pub stage: String,
    /// When the job was created
    pub created_at: DateTime<Utc>,
    /// When the job finished, if it has
    pub finished_at: Option<DateTime<Utc>>,
}

/// A job flattened across all pipelines matching a commit, tagged with the
/// pipeline it belongs to and the commit that was queried.
#[derive(Debug, Clone)]
pub struct CommitJob {
    pub id: u64,
    pub name: String,
    pub status: JobStatus,
    pub stage: String,
    pub created_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
    pub pipeline_id: u64,
    pub commit_sha: String,
}

impl CommitJob {
    pub(crate) fn from_job(job: Job, pipeline_id: u64, commit_sha: &str) -> Self {
        Self {
            id: job.id,
            name: job.name,
            status: job.status,
            stage: job.stage,
            created_at: job.created_at,
            finished_at: job.finished_at,
            pipeline_id,
            commit_sha: commit_sha.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_status_deserializes_known_states() {
        let cases = [
            ("\"success\"", JobStatus::Success),
            ("\"failed\"", JobStatus::Failed),
            ("\"running\"", JobStatus::Running),
            ("\"pending\"", JobStatus::Pending),
            ("\"canceled\"", JobStatus::Canceled),
            ("\"skipped\"", JobStatus::Skipped),
        ];

        for (json, expected) in cases {
            let status: JobStatus = serde_json::from_str(json).unwrap();
            assert_eq!(status, expected);
        }
    }

    #[test]
    fn test_job_status_falls_back_to_unknown() {
        for json in ["\"created\"", "\"manual\"", "\"waiting_for_resource\""] {
            let status: JobStatus = serde_json::from_str(json).unwrap();
            assert_eq!(status, JobStatus::Unknown);
        }
    }

    #[test]
    fn test_job_status_display_matches_wire_text() {
        assert_eq!(JobStatus::Success.to_string(), "success");
        assert_eq!(JobStatus::Unknown.to_string(), "unknown");
    }

    #[test]
    fn test_job_deserializes_with_null_finished_at() {
        let job: Job = serde_json::from_str(
            r#"{
                "id": 42,
                "name": "build",
                "status": "running",
                "stage": "build",
                "created_at": "2024-05-01T12:00:00.000Z",
                "finished_at": null
            }"#,
        )
        .unwrap();

        assert_eq!(job.id, 42);
        assert_eq!(job.status, JobStatus::Running);
        assert!(job.finished_at.is_none());
    }

    #[test]
    fn test_commit_job_tags_pipeline_and_commit() {
        let job: Job = serde_json::from_str(
            r#"{
                "id": 7,
                "name": "test",
                "status": "success",
                "stage": "test",
                "created_at": "2024-05-01T12:00:00.000Z",
                "finished_at": "2024-05-01T12:05:00.000Z"
            }"#,
        )
        .unwrap();

        let record = CommitJob::from_job(job, 99, "deadbeefcafe");
        assert_eq!(record.id, 7);
        assert_eq!(record.pipeline_id, 99);
        assert_eq!(record.commit_sha, "deadbeefcafe");
        assert!(record.finished_at.is_some());
    }
}
