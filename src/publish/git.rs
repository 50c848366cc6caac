//! Version control operations used for publishing.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, instrument};

use super::changes::parse_porcelain_status;
use crate::error::AppError;

/// Side-effecting repository operations. Every call either completes or
/// returns an error; nothing is retried.
#[async_trait]
pub trait VersionControl: Send + Sync {
    /// Modified and untracked paths, relative to the repository root
    async fn changed_paths(&self) -> Result<Vec<String>, AppError>;

    /// Location of the working directory below the repository root, with a
    /// trailing `/`. Empty at the root itself.
    async fn root_prefix(&self) -> Result<String, AppError> {
        Ok(String::new())
    }

    async fn stage(&self, path: &Path) -> Result<(), AppError>;

    async fn set_config(&self, key: &str, value: &str) -> Result<(), AppError>;

    async fn commit(&self, message: &str) -> Result<(), AppError>;

    async fn push(&self) -> Result<(), AppError>;
}

/// [`VersionControl`] backed by the `git` executable.
#[derive(Debug, Clone)]
pub struct GitCli {
    repo_dir: PathBuf,
}

impl GitCli {
    pub fn new(repo_dir: impl Into<PathBuf>) -> Self {
        Self {
            repo_dir: repo_dir.into(),
        }
    }

    /// Runs `git <args>` in the repository and returns stdout.
    #[instrument(skip(self))]
    async fn run(&self, args: &[&str]) -> Result<String, AppError> {
        let subcommand = args.first().copied().unwrap_or("git");

        let output = Command::new("git")
            .args(args)
            .current_dir(&self.repo_dir)
            .stdin(Stdio::null())
            .output()
            .await
            .map_err(|e| AppError::git_error(subcommand, format!("failed to run git: {e}")))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let message = if stderr.is_empty() {
                String::from_utf8_lossy(&output.stdout).trim().to_string()
            } else {
                stderr
            };
            return Err(AppError::git_error(subcommand, message));
        }

        debug!("git {} succeeded", args.join(" "));
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

#[async_trait]
impl VersionControl for GitCli {
    async fn changed_paths(&self) -> Result<Vec<String>, AppError> {
        let output = self
            .run(&["status", "--porcelain", "--untracked-files=all"])
            .await?;
        Ok(parse_porcelain_status(&output))
    }

    async fn root_prefix(&self) -> Result<String, AppError> {
        let output = self.run(&["rev-parse", "--show-prefix"]).await?;
        Ok(output.trim().to_string())
    }

    async fn stage(&self, path: &Path) -> Result<(), AppError> {
        let path = path.to_string_lossy();
        self.run(&["add", &*path]).await?;
        Ok(())
    }

    async fn set_config(&self, key: &str, value: &str) -> Result<(), AppError> {
        self.run(&["config", key, value]).await?;
        Ok(())
    }

    async fn commit(&self, message: &str) -> Result<(), AppError> {
        self.run(&["commit", "-m", message]).await?;
        Ok(())
    }

    async fn push(&self) -> Result<(), AppError> {
        self.run(&["push"]).await?;
        Ok(())
    }
}
