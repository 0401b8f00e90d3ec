//! The snap pipeline: list authors, select, build lookup scripts, rewrite.
//!
//! Each step finishes before the next begins. The dispatch scripts live only
//! for the duration of the rewrite call and are removed whether it succeeds,
//! fails, is interrupted, or the run future is dropped.

use std::future::Future;
use std::path::PathBuf;

use rand::Rng;
use tracing::{info, instrument, warn};

use crate::config::ThanosConfig;
use crate::dispatch::LookupScripts;
use crate::errors::{ConfigError, CoreError};
use crate::git::RepositoryClient;
use crate::models::SnapReport;
use crate::scratch::ScriptPair;
use crate::selection::SelectionPolicy;

/// Drives one selection-and-redaction run against a repository.
pub struct SnapPipeline<C> {
    client: C,
    policy: SelectionPolicy,
    scratch_dir: Option<PathBuf>,
}

impl<C: RepositoryClient> SnapPipeline<C> {
    pub fn new(client: C, config: &ThanosConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            client,
            policy: SelectionPolicy::from_config(&config.selection)?,
            scratch_dir: config.rewrite.scratch_dir.clone(),
        })
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Run the pipeline. With `dry_run` the selection is made and reported
    /// but history is left alone.
    pub async fn run<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
        dry_run: bool,
    ) -> Result<SnapReport, CoreError> {
        self.run_until(rng, dry_run, std::future::pending::<()>())
            .await
    }

    /// Like [`run`](Self::run), but abandon the rewrite as soon as
    /// `interrupt` resolves. The scripts are removed and
    /// [`CoreError::Interrupted`] is returned.
    #[instrument(skip(self, rng, interrupt))]
    pub async fn run_until<R, S>(
        &self,
        rng: &mut R,
        dry_run: bool,
        interrupt: S,
    ) -> Result<SnapReport, CoreError>
    where
        R: Rng + ?Sized,
        S: Future,
    {
        let authors = self.client.list_authors().await?;
        let authors_seen = authors.len();
        info!(authors = authors_seen, "listed authors");

        let selected = self.policy.select(authors, rng);
        let mut report = SnapReport {
            authors_seen,
            selected,
            rewritten: false,
        };

        if report.selected.is_empty() {
            info!("no authors selected, history left unchanged");
            return Ok(report);
        }
        if dry_run {
            info!(selected = report.selected.len(), "dry run, history left unchanged");
            return Ok(report);
        }

        let scripts = LookupScripts::build(&report.selected, rng);
        let pair = ScriptPair::materialize(&scripts, self.scratch_dir.as_deref())?;
        tokio::select! {
            result = self.client.rewrite_history(pair.name_path(), pair.email_path()) => result?,
            _ = interrupt => {
                warn!("interrupted during rewrite, removing dispatch scripts");
                return Err(CoreError::Interrupted);
            }
        }
        pair.release()?;

        report.rewritten = true;
        info!(selected = report.selected.len(), "history rewritten");
        Ok(report)
    }
}
