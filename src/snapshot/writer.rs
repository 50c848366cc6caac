use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::{SnapshotKind, records_dir};
use crate::constants::layout::JSON_INDENT;
use crate::data_fetcher::models::{EventCollection, FetchOutcome};
use crate::error::AppError;

/// Whether a snapshot was written during this run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriteStatus {
    Written,
    /// The fetch failed and the previous snapshot was left untouched
    Skipped,
}

/// Serializes a value as pretty JSON indented with three spaces.
///
/// Change detection works on the text of these files, so the formatting must
/// stay stable between runs.
pub fn to_pretty_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, AppError> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(JSON_INDENT);
    let mut serializer = Serializer::with_formatter(&mut buf, formatter);
    value.serialize(&mut serializer)?;
    Ok(buf)
}

/// Writes snapshots below an output root.
#[derive(Debug, Clone)]
pub struct SnapshotWriter {
    root: PathBuf,
}

impl SnapshotWriter {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the output root if it does not exist yet.
    pub async fn ensure_root(&self) -> Result<(), AppError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Writes `<root>/<name>.json`, replacing any previous content.
    pub async fn write_scalar<T: Serialize + ?Sized>(
        &self,
        name: &str,
        payload: &T,
    ) -> Result<PathBuf, AppError> {
        let path = self.root.join(format!("{name}.json"));
        fs::write(&path, to_pretty_json(payload)?).await?;
        debug!("Wrote {}", path.display());
        Ok(path)
    }

    /// Writes `<root>/<name>.json` and rebuilds `<root>/<name>/events/` from scratch
    /// with one `<id>.json` per record, so records missing from `records` disappear.
    ///
    /// Returns the number of record files written.
    pub async fn write_collection<T, R, F>(
        &self,
        name: &str,
        payload: &T,
        records: &[R],
        id_of: F,
    ) -> Result<usize, AppError>
    where
        T: Serialize + ?Sized,
        R: Serialize,
        F: Fn(&R) -> &str,
    {
        self.write_scalar(name, payload).await?;

        let dir = records_dir(&self.root, name);
        if fs::try_exists(&dir).await? {
            fs::remove_dir_all(&dir).await?;
        }
        fs::create_dir_all(&dir).await?;

        for record in records {
            let id = id_of(record);
            validate_record_id(id)?;
            fs::write(dir.join(format!("{id}.json")), to_pretty_json(record)?).await?;
        }

        debug!("Wrote {} records to {}", records.len(), dir.display());
        Ok(records.len())
    }

    /// Persists a scalar fetch result. Failed fetches leave the snapshot untouched.
    pub async fn persist_scalar<T: Serialize>(
        &self,
        kind: SnapshotKind,
        outcome: &FetchOutcome<T>,
    ) -> Result<WriteStatus, AppError> {
        match outcome {
            FetchOutcome::Success { data } => {
                self.write_scalar(kind.name(), data).await?;
                info!("Updated {} snapshot", kind.name());
                Ok(WriteStatus::Written)
            }
            FetchOutcome::Failure { reason } => {
                warn!("Skipping {} snapshot: {reason}", kind.name());
                Ok(WriteStatus::Skipped)
            }
        }
    }

    /// Persists an events fetch result. Failed fetches leave the snapshot and
    /// its record directory untouched.
    pub async fn persist_events(
        &self,
        kind: SnapshotKind,
        outcome: &FetchOutcome<EventCollection>,
    ) -> Result<WriteStatus, AppError> {
        match outcome {
            FetchOutcome::Success { data } => {
                let count = self
                    .write_collection(kind.name(), data, &data.events, |event| {
                        event.event_id.as_str()
                    })
                    .await?;
                info!("Updated {} snapshot with {count} events", kind.name());
                Ok(WriteStatus::Written)
            }
            FetchOutcome::Failure { reason } => {
                warn!("Skipping {} snapshot: {reason}", kind.name());
                Ok(WriteStatus::Skipped)
            }
        }
    }
}

/// Record ids become file stems, so they must not be able to escape the directory.
fn validate_record_id(id: &str) -> Result<(), AppError> {
    if id.is_empty()
        || id == "."
        || id == ".."
        || id.contains(['/', '\\', '\0'])
    {
        return Err(AppError::invalid_record(format!(
            "record id '{id}' cannot be used as a file name"
        )));
    }
    Ok(())
}
