//! One synchronization run: acquire, fetch, write, revoke, detect, publish.

use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::{error, info, instrument};

use crate::config::{ChangeDetection, Config};
use crate::data_fetcher::models::{Credential, EventCollection, FetchOutcome};
use crate::data_fetcher::traits::{CredentialProvider, SourceFetcher};
use crate::error::AppError;
use crate::publish::{
    ChangeSet, DigestChangeDetector, DigestDetection, Notifier, PublishReport, PublishSettings,
    Publisher, VersionControl,
};
use crate::snapshot::{SnapshotKind, SnapshotWriter, WriteStatus};

/// The collaborators a run talks to.
#[derive(Clone, Copy)]
pub struct Services<'a> {
    pub credentials: &'a dyn CredentialProvider,
    pub sources: &'a dyn SourceFetcher,
    pub vcs: &'a dyn VersionControl,
    pub notifier: &'a dyn Notifier,
}

/// Per-invocation options that are not part of the environment config.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Repository the output directory lives in
    pub repo_dir: PathBuf,
    /// Fetch and write, but neither notify nor commit
    pub dry_run: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            repo_dir: PathBuf::from("."),
            dry_run: false,
        }
    }
}

/// Summary of a completed run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub writes: BTreeMap<SnapshotKind, WriteStatus>,
    pub changes: ChangeSet,
    pub publish: PublishReport,
}

impl RunReport {
    pub fn written(&self) -> usize {
        self.writes
            .values()
            .filter(|status| **status == WriteStatus::Written)
            .count()
    }
}

enum Fetched {
    Cms(FetchOutcome<Value>),
    Events(FetchOutcome<EventCollection>),
}

/// Runs the whole synchronization once.
///
/// Individual fetch failures only skip their snapshot. A failure to write a
/// snapshot ends the run with an error, after the credential was revoked.
#[instrument(skip_all, fields(repo_dir = %options.repo_dir.display()))]
pub async fn run(
    config: &Config,
    services: Services<'_>,
    options: &RunOptions,
) -> Result<RunReport, AppError> {
    let writer = SnapshotWriter::new(options.repo_dir.join(&config.output_dir));
    writer.ensure_root().await?;

    let credential = match services.credentials.acquire().await {
        Ok(credential) => Some(credential),
        Err(e) => {
            error!("Could not acquire a credential, event snapshots will be skipped: {e}");
            None
        }
    };

    let fetched = fetch_all(services.sources, credential.as_ref(), &config.cms_locale).await;
    let writes = write_all(&writer, &fetched).await;

    if let Some(credential) = credential {
        match services.credentials.revoke(credential).await {
            Ok(()) => info!("Credential revoked"),
            Err(e) => error!("Failed to revoke credential: {e}"),
        }
    }

    let writes = writes?;

    let (changes, digests) = detect_changes(config, services.vcs, writer.root()).await?;

    let mut settings = PublishSettings::from_config(config);
    if options.dry_run {
        info!("Dry run, not notifying or committing");
        settings = settings.dry_run();
    }
    let push_disabled = settings.push_disabled;
    let publish = Publisher::new(services.vcs, services.notifier, settings)
        .publish(&changes)
        .await?;

    // Unpublished changes keep the old digests and are reported again next run
    if let Some(digests) = digests {
        let delivered = publish.pushed || (publish.committed && push_disabled);
        if !options.dry_run && (delivered || changes.is_empty()) {
            digests.record().await?;
        } else if digests.is_pending() {
            info!("Changes were not published, keeping previous digests");
        }
    }

    let report = RunReport {
        writes,
        changes,
        publish,
    };
    info!(
        "Run finished, {} of {} snapshots written",
        report.written(),
        report.writes.len()
    );
    Ok(report)
}

async fn fetch_all(
    sources: &dyn SourceFetcher,
    credential: Option<&Credential>,
    locale: &str,
) -> Vec<(SnapshotKind, Fetched)> {
    let mut fetched = Vec::with_capacity(SnapshotKind::ALL.len());

    for kind in SnapshotKind::ALL {
        if let Some(page) = kind.cms_page() {
            fetched.push((kind, Fetched::Cms(sources.fetch_cms(page, locale).await)));
        } else if let Some(environment) = kind.event_environment() {
            let outcome = match credential {
                Some(credential) => sources.fetch_events(credential, environment).await,
                None => FetchOutcome::failure(
                    AppError::credential_unavailable("acquisition failed").to_string(),
                ),
            };
            fetched.push((kind, Fetched::Events(outcome)));
        }
    }

    fetched
}

/// Writes every outcome, even after an earlier write failed, and returns the
/// first failure.
async fn write_all(
    writer: &SnapshotWriter,
    fetched: &[(SnapshotKind, Fetched)],
) -> Result<BTreeMap<SnapshotKind, WriteStatus>, AppError> {
    let mut writes = BTreeMap::new();
    let mut first_error = None;

    for (kind, outcome) in fetched {
        let result = match outcome {
            Fetched::Cms(outcome) => writer.persist_scalar(*kind, outcome).await,
            Fetched::Events(outcome) => writer.persist_events(*kind, outcome).await,
        };
        match result {
            Ok(status) => {
                writes.insert(*kind, status);
            }
            Err(e) => {
                error!("Failed to write {} snapshot: {e}", kind.name());
                first_error.get_or_insert(e);
            }
        }
    }

    match first_error {
        Some(e) => Err(e),
        None => Ok(writes),
    }
}

async fn detect_changes(
    config: &Config,
    vcs: &dyn VersionControl,
    root: &Path,
) -> Result<(ChangeSet, Option<DigestDetection>), AppError> {
    let (changes, digests) = match config.change_detection {
        ChangeDetection::Git => {
            let prefix = vcs.root_prefix().await?;
            let paths = vcs.changed_paths().await?;
            let output_dir = Path::new(&prefix).join(&config.output_dir);
            (ChangeSet::from_changed_paths(&output_dir, &paths), None)
        }
        ChangeDetection::Digest => {
            let detection = DigestChangeDetector::new(root).detect().await?;
            (detection.changes.clone(), Some(detection))
        }
    };

    if changes.is_empty() {
        info!("No snapshot changed");
    } else {
        info!("Changed snapshots: {}", changes.labels().join(", "));
    }
    Ok((changes, digests))
}
