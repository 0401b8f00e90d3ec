//! Repository access for the snap pipeline.
//!
//! [`RepositoryClient`] is the narrow capability the pipeline needs: list the
//! authors in history, then rewrite history through two dispatch scripts.
//! [`GitCliClient`] implements it by shelling out to `git`.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use git2::Repository;
use tokio::process::Command;
use tracing::{debug, info, instrument, warn};

use super::shortlog::parse_shortlog;
use crate::config::ThanosConfig;
use crate::dispatch::shell_quote;
use crate::errors::GitError;
use crate::models::AuthorRecord;

/// What the pipeline needs from a repository.
#[allow(async_fn_in_trait)]
pub trait RepositoryClient {
    /// One record per distinct author in history.
    async fn list_authors(&self) -> Result<Vec<AuthorRecord>, GitError>;

    /// Rewrite the author of every commit on every branch and tag, using the
    /// two executables to map an original author name to its replacement
    /// name and address.
    async fn rewrite_history(&self, name_script: &Path, email_script: &Path) -> Result<(), GitError>;
}

/// [`RepositoryClient`] backed by the `git` command-line tool.
#[derive(Debug, Clone)]
pub struct GitCliClient {
    git_binary: String,
    work_dir: PathBuf,
    revisions: Vec<String>,
}

impl GitCliClient {
    /// Locate the repository containing `start` and prepare a client for it.
    pub fn discover<P: AsRef<Path>>(start: P, config: &ThanosConfig) -> Result<Self, GitError> {
        let start = start.as_ref();
        let repo = Repository::discover(start)
            .map_err(|_| GitError::RepositoryNotFound(start.display().to_string()))?;
        let work_dir = repo.workdir().unwrap_or_else(|| repo.path()).to_path_buf();
        info!(
            path = %work_dir.display(),
            bare = repo.is_bare(),
            "opened git repository"
        );
        Ok(Self {
            git_binary: config.rewrite.git_binary.clone(),
            work_dir,
            revisions: config.selection.revisions.clone(),
        })
    }

    /// Directory the `git` commands run in.
    pub fn work_dir(&self) -> &Path {
        &self.work_dir
    }

    async fn run_git(&self, args: &[&str], envs: &[(&str, &str)]) -> Result<String, GitError> {
        let mut cmd = Command::new(&self.git_binary);
        cmd.current_dir(&self.work_dir)
            .args(args)
            .envs(envs.iter().copied())
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let subcommand = args.first().copied().unwrap_or_default();
        debug!(cmd = ?format!("git {}", args.join(" ")), "running git command");
        let output = cmd.output().await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                GitError::BinaryNotFound(self.git_binary.clone())
            } else {
                GitError::IoError(e)
            }
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            let exit_code = output.status.code().unwrap_or(-1);
            warn!(subcommand, exit_code, %stderr, "git command failed");
            return Err(GitError::CommandFailed {
                command: subcommand.to_string(),
                exit_code,
                stderr,
            });
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl RepositoryClient for GitCliClient {
    #[instrument(skip(self), fields(path = %self.work_dir.display()))]
    async fn list_authors(&self) -> Result<Vec<AuthorRecord>, GitError> {
        let mut args = vec!["shortlog", "-sne"];
        args.extend(self.revisions.iter().map(String::as_str));
        args.push("--");
        let output = self.run_git(&args, &[]).await?;
        Ok(parse_shortlog(&output))
    }

    #[instrument(skip(self), fields(path = %self.work_dir.display()))]
    async fn rewrite_history(&self, name_script: &Path, email_script: &Path) -> Result<(), GitError> {
        let filter = env_filter(name_script, email_script);
        info!("rewriting author history on all branches and tags");
        let output = self
            .run_git(
                &[
                    "filter-branch",
                    "-f",
                    "--env-filter",
                    filter.as_str(),
                    "--tag-name-filter",
                    "cat",
                    "--",
                    "--branches",
                    "--tags",
                ],
                &[("FILTER_BRANCH_SQUELCH_WARNING", "1")],
            )
            .await?;
        debug!(%output, "filter-branch finished");
        Ok(())
    }
}

/// The per-commit shell snippet handed to `git filter-branch --env-filter`.
///
/// Both scripts are keyed by the commit's current author name. The address is
/// only looked up, and the identity only replaced, when the name lookup hits.
pub fn env_filter(name_script: &Path, email_script: &Path) -> String {
    let name_script = shell_quote(&name_script.to_string_lossy());
    let email_script = shell_quote(&email_script.to_string_lossy());
    format!(
        "NEW_NAME=$({name_script} \"$GIT_AUTHOR_NAME\")\n\
         if [ -n \"$NEW_NAME\" ]\n\
         then\n  \
           NEW_EMAIL=$({email_script} \"$GIT_AUTHOR_NAME\")\n  \
           GIT_AUTHOR_NAME=\"$NEW_NAME\"\n  \
           GIT_AUTHOR_EMAIL=\"$NEW_EMAIL\"\n\
         fi\n"
    )
}
