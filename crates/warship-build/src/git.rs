use std::path::PathBuf;
use std::process::Command;

use warship_core::CommitMessageSource;

/// Reads commit messages from the git checkout in the workspace.
pub struct GitHistory {
    repo_dir: PathBuf,
}

impl GitHistory {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }
}

impl CommitMessageSource for GitHistory {
    /// `git log -1 --pretty=%B`. Any failure means "no message".
    fn latest_commit_message(&self) -> Option<String> {
        let output = match Command::new("git")
            .args(["log", "-1", "--pretty=%B"])
            .current_dir(&self.repo_dir)
            .output()
        {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!(error = %e, "failed to execute git log");
                return None;
            }
        };

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                status = %output.status,
                stderr = %stderr.trim(),
                "git log failed, ignoring commit message"
            );
            return None;
        }

        Some(String::from_utf8_lossy(&output.stdout).trim().to_owned())
    }
}
