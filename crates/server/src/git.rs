//! Change log commits via the git CLI.

use crate::{Result, ServerError};
use shelfsync_models::UserInfo;
use std::path::{Path, PathBuf};
use std::process::Output;
use tokio::process::Command;
use tracing::debug;

/// Records state changes as commits in a local repository.
///
/// Commits stay local; nothing is ever pushed or pulled.
#[derive(Clone)]
pub struct GitLog {
    repo_dir: PathBuf,
}

impl GitLog {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// Stage `file` and commit it as a state change to `page`.
    ///
    /// The commit message names the page and the acting user; a user
    /// without a name is recorded as "unknown user". When both a name
    /// and an email are present they also become the commit author.
    pub async fn commit_state_change(
        &self,
        file: &Path,
        page: &str,
        user: &UserInfo,
    ) -> Result<()> {
        let output = Command::new("git")
            .current_dir(&self.repo_dir)
            .args(["add", "--"])
            .arg(file)
            .output()
            .await?;
        if !output.status.success() {
            return Err(git_failure("add", &output));
        }

        let display_name = if user.name.is_empty() {
            "unknown user"
        } else {
            &user.name
        };
        let message = format!("Update state for {} by {}", page, display_name);

        let mut command = Command::new("git");
        command
            .current_dir(&self.repo_dir)
            .args(["commit", "-m", &message]);
        if !user.name.is_empty() && !user.email.is_empty() {
            command.arg(format!("--author={} <{}>", user.name, user.email));
        }
        command.arg("--").arg(file);

        let output = command.output().await?;
        if !output.status.success() {
            return Err(git_failure("commit", &output));
        }

        debug!(page, "recorded state change commit");
        Ok(())
    }
}

fn git_failure(command: &str, output: &Output) -> ServerError {
    // git reports some failures on stdout (e.g. "nothing to commit")
    let source = if output.stderr.is_empty() {
        &output.stdout
    } else {
        &output.stderr
    };
    ServerError::Git {
        command: command.to_string(),
        detail: String::from_utf8_lossy(source).trim().to_string(),
    }
}
