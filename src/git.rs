use std::path::Path;
use std::process::Command;

use crate::error::{GitLabMcpError, Result};

/// Resolves the HEAD commit SHA of the repository in the working directory.
///
/// Runs `git rev-parse HEAD`. Fails if git is unavailable, the working
/// directory is not inside a repository, or the command exits non-zero.
/// The result is the full 40-character hex SHA.
pub fn resolve_current_commit() -> Result<String> {
    resolve_commit_in(Path::new("."))
}

fn resolve_commit_in(repo_dir: &Path) -> Result<String> {
    let output = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .current_dir(repo_dir)
        .output()
        .map_err(|e| GitLabMcpError::CommitResolution(format!("failed to run git: {e}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(GitLabMcpError::CommitResolution(format!(
            "git rev-parse HEAD failed: {}",
            stderr.trim()
        )));
    }

    let sha = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if sha.is_empty() {
        return Err(GitLabMcpError::CommitResolution(
            "git rev-parse HEAD returned empty output".to_string(),
        ));
    }

    Ok(sha)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn git(dir: &Path, args: &[&str]) {
        let output = Command::new("git")
            .args(args)
            .current_dir(dir)
            .output()
            .unwrap();
        assert!(
            output.status.success(),
            "git {:?} failed: {}",
            args,
            String::from_utf8_lossy(&output.stderr)
        );
    }

    fn init_repo() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        git(dir.path(), &["init"]);
        git(dir.path(), &["config", "user.name", "ci-test"]);
        git(dir.path(), &["config", "user.email", "ci-test@example.com"]);
        git(dir.path(), &["commit", "--allow-empty", "-m", "initial"]);
        dir
    }

    #[test]
    fn test_resolves_full_hex_sha() {
        let repo = init_repo();
        let sha = resolve_commit_in(repo.path()).unwrap();
        assert_eq!(sha.len(), 40, "expected a full SHA, got: {sha}");
        assert!(sha.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_fails_outside_a_repository() {
        let dir = tempfile::tempdir().unwrap();
        let err = resolve_commit_in(dir.path()).unwrap_err();
        assert!(err.to_string().contains("git rev-parse"));
    }
}
