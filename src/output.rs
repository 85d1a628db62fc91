use console::style;

use crate::error::GitLabMcpError;
use crate::gitlab::types::{CommitJob, JobStatus};

/// Glyph shown in front of each job block.
pub fn status_glyph(status: JobStatus) -> &'static str {
    match status {
        JobStatus::Success => "✅",
        JobStatus::Failed => "❌",
        JobStatus::Running => "🔄",
        JobStatus::Pending => "⏳",
        JobStatus::Canceled => "🚫",
        JobStatus::Skipped => "⏭️",
        JobStatus::Unknown => "❓",
    }
}

fn short_sha(sha: &str) -> &str {
    sha.get(..8).unwrap_or(sha)
}

/// Renders the job report for a commit.
///
/// An empty job list renders a single "no jobs found" line rather than an
/// error; a commit without pipelines is an ordinary answer.
pub fn render_commit_jobs(commit_sha: &str, jobs: &[CommitJob]) -> String {
    let sha8 = short_sha(commit_sha);

    if jobs.is_empty() {
        return format!("no jobs found for commit {sha8}");
    }

    let blocks: Vec<String> = jobs
        .iter()
        .map(|job| {
            format!(
                "{} **{}** (ID: {})\n  - Stage: {}\n  - Status: {}\n  - Pipeline ID: {}",
                status_glyph(job.status),
                job.name,
                job.id,
                job.stage,
                job.status,
                job.pipeline_id
            )
        })
        .collect();

    format!("Jobs for commit {sha8}:\n\n{}", blocks.join("\n\n"))
}

/// Renders a job's console log inside a fenced block.
pub fn render_job_log(job_id: u64, log: &str) -> String {
    format!("Console log for job #{job_id}:\n```\n{log}\n```")
}

/// Renders any failure as the plain-text form returned over the tool surface.
pub fn render_error(error: &GitLabMcpError) -> String {
    format!("Error: {error}")
}

/// Prints the stderr banner shown by the CLI test paths.
pub fn print_banner() {
    eprintln!(
        "{} {}",
        style("🦊 gitlab-ci-mcp").magenta().bold(),
        style(env!("CARGO_PKG_VERSION")).dim()
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn make_job(id: u64, name: &str, status: JobStatus, pipeline_id: u64) -> CommitJob {
        CommitJob {
            id,
            name: name.to_string(),
            status,
            stage: "test".to_string(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            finished_at: None,
            pipeline_id,
            commit_sha: "0123456789abcdef0123456789abcdef01234567".to_string(),
        }
    }

    #[test]
    fn test_empty_job_list_renders_exact_message() {
        let rendered = render_commit_jobs("0123456789abcdef0123456789abcdef01234567", &[]);
        assert_eq!(rendered, "no jobs found for commit 01234567");
    }

    #[test]
    fn test_short_commit_sha_is_kept_whole() {
        let rendered = render_commit_jobs("abc", &[]);
        assert_eq!(rendered, "no jobs found for commit abc");
    }

    #[test]
    fn test_report_contains_one_block_per_job() {
        let jobs = vec![
            make_job(11, "build", JobStatus::Success, 1),
            make_job(12, "deploy", JobStatus::Failed, 2),
        ];

        let rendered = render_commit_jobs("0123456789abcdef0123456789abcdef01234567", &jobs);

        assert!(rendered.starts_with("Jobs for commit 01234567:"));
        assert!(rendered.contains("✅ **build** (ID: 11)"));
        assert!(rendered.contains("❌ **deploy** (ID: 12)"));
        assert!(rendered.contains("  - Stage: test"));
        assert!(rendered.contains("  - Status: failed"));
        assert!(rendered.contains("  - Pipeline ID: 2"));
    }

    #[test]
    fn test_jobs_render_in_given_order() {
        let jobs = vec![
            make_job(2, "second", JobStatus::Success, 1),
            make_job(1, "first", JobStatus::Success, 1),
        ];

        let rendered = render_commit_jobs("0123456789abcdef0123456789abcdef01234567", &jobs);
        let second = rendered.find("second").unwrap();
        let first = rendered.find("first").unwrap();
        assert!(second < first);
    }

    #[test]
    fn test_status_glyph_table() {
        assert_eq!(status_glyph(JobStatus::Success), "✅");
        assert_eq!(status_glyph(JobStatus::Failed), "❌");
        assert_eq!(status_glyph(JobStatus::Running), "🔄");
        assert_eq!(status_glyph(JobStatus::Pending), "⏳");
        assert_eq!(status_glyph(JobStatus::Canceled), "🚫");
        assert_eq!(status_glyph(JobStatus::Skipped), "⏭️");
    }

    #[test]
    fn test_unrecognized_status_uses_fallback_glyph() {
        assert_eq!(status_glyph(JobStatus::Unknown), "❓");

        let jobs = vec![make_job(5, "manual-step", JobStatus::Unknown, 1)];
        let rendered = render_commit_jobs("0123456789abcdef0123456789abcdef01234567", &jobs);
        assert!(rendered.contains("❓ **manual-step** (ID: 5)"));
    }

    #[test]
    fn test_render_job_log_wraps_in_fenced_block() {
        let rendered = render_job_log(42, "line one\nline two");
        assert_eq!(
            rendered,
            "Console log for job #42:\n```\nline one\nline two\n```"
        );
    }

    #[test]
    fn test_render_error_uses_marker_prefix() {
        let rendered = render_error(&GitLabMcpError::JobNotFound(9));
        assert_eq!(rendered, "Error: Job #9 not found");
    }
}
