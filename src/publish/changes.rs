//! Working tree inspection and change classification

use chrono::Utc;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::layout::DIGEST_MANIFEST;
use crate::error::AppError;
use crate::snapshot::SnapshotKind;
use crate::snapshot::digest::{DigestManifest, file_digest};

/// Snapshots whose file changed during this run. Built once, then read-only.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    changed: BTreeSet<SnapshotKind>,
}

/// What to publish for a non-empty [`ChangeSet`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishDecision {
    /// A primary snapshot changed, so downstream consumers should hear about it
    pub notify: bool,
    pub labels: Vec<&'static str>,
    pub commit_message: String,
}

impl ChangeSet {
    pub fn from_kinds(kinds: impl IntoIterator<Item = SnapshotKind>) -> Self {
        Self {
            changed: kinds.into_iter().collect(),
        }
    }

    /// Classifies changed working tree paths against the known snapshot files.
    ///
    /// `output_dir` is the snapshot directory relative to the repository's
    /// top level, which is how git reports paths. Paths must match exactly.
    pub fn from_changed_paths<S: AsRef<str>>(output_dir: &Path, changed_paths: &[S]) -> Self {
        let changed = SnapshotKind::ALL
            .into_iter()
            .filter(|kind| {
                let target = normalize(&kind.file_path(output_dir));
                changed_paths.iter().any(|p| p.as_ref() == target)
            })
            .collect();

        Self { changed }
    }

    pub fn is_empty(&self) -> bool {
        self.changed.is_empty()
    }

    pub fn contains(&self, kind: SnapshotKind) -> bool {
        self.changed.contains(&kind)
    }

    /// Changed snapshots in commit message order
    pub fn kinds(&self) -> impl Iterator<Item = SnapshotKind> + '_ {
        self.changed.iter().copied()
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.kinds().map(|kind| kind.label()).collect()
    }

    /// Derives the publish decision, `None` when nothing changed.
    pub fn decision(&self) -> Option<PublishDecision> {
        if self.is_empty() {
            return None;
        }

        let labels = self.labels();
        Some(PublishDecision {
            notify: self.kinds().any(|kind| kind.is_primary()),
            commit_message: format!("Modified {}", labels.join(", ")),
            labels,
        })
    }
}

fn normalize(path: &Path) -> String {
    let rendered = path.to_string_lossy().replace('\\', "/");
    rendered.trim_start_matches("./").to_string()
}

/// Parses `git status --porcelain` (v1) output into paths.
///
/// Modified, added, deleted and untracked entries all count as changed. For
/// renames only the destination is kept.
pub fn parse_porcelain_status(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.len() > 3)
        .map(|line| {
            let entry = &line[3..];
            let path = entry.rsplit_once(" -> ").map_or(entry, |(_, to)| to);
            path.trim_matches('"').to_string()
        })
        .collect()
}

/// Detects changes by comparing snapshot digests with the ones recorded at
/// the end of the previous successful publish.
#[derive(Debug, Clone)]
pub struct DigestChangeDetector {
    root: PathBuf,
}

/// Result of a digest comparison. The current digests are only recorded
/// once the changes were published, see [`DigestDetection::record`].
#[derive(Debug, Clone)]
pub struct DigestDetection {
    pub changes: ChangeSet,
    manifest_path: PathBuf,
    previous: DigestManifest,
    current: DigestManifest,
}

impl DigestDetection {
    /// Whether recording would change the stored manifest
    pub fn is_pending(&self) -> bool {
        self.current.digests != self.previous.digests
    }

    /// Stores the current digests as the baseline for the next run.
    pub async fn record(&self) -> Result<(), AppError> {
        if !self.is_pending() {
            return Ok(());
        }
        self.current.save(&self.manifest_path).await?;
        debug!("Recorded snapshot digests in {}", self.manifest_path.display());
        Ok(())
    }
}

impl DigestChangeDetector {
    /// `root` is the snapshot directory the writer uses.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn manifest_path(&self) -> PathBuf {
        self.root.join(DIGEST_MANIFEST)
    }

    /// Compares current digests with the manifest. Nothing is written; call
    /// [`DigestDetection::record`] after the changes were published.
    ///
    /// Snapshots without a file are never reported; snapshots missing from
    /// the manifest always are.
    pub async fn detect(&self) -> Result<DigestDetection, AppError> {
        let manifest_path = self.manifest_path();
        let previous = DigestManifest::load(&manifest_path).await?;

        let mut current = DigestManifest {
            recorded_at: Some(Utc::now()),
            ..DigestManifest::default()
        };
        let mut changed = BTreeSet::new();

        for kind in SnapshotKind::ALL {
            let Some(digest) = file_digest(&kind.file_path(&self.root)).await? else {
                continue;
            };
            if previous.get(kind.name()) != Some(digest.as_str()) {
                debug!("Digest of {} changed", kind.name());
                changed.insert(kind);
            }
            current.digests.insert(kind.name().to_string(), digest);
        }

        Ok(DigestDetection {
            changes: ChangeSet { changed },
            manifest_path,
            previous,
            current,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;
    use tokio::fs;

    #[test]
    fn test_no_changes_means_no_decision() {
        let changes = ChangeSet::from_changed_paths(Path::new("output"), &["README.md"]);
        assert!(changes.is_empty());
        assert_eq!(changes.decision(), None);
    }

    #[test]
    fn test_labels_follow_fixed_order() {
        let changes = ChangeSet::from_changed_paths(
            Path::new("output"),
            &[
                "output/events-dev.json",
                "output/cms-scoring-rules.json",
                "output/events.json",
                "output/cms.json",
            ],
        );

        let decision = changes.decision().unwrap();
        assert_eq!(
            decision.commit_message,
            "Modified Frontend CMS, Scoring Rules CMS, Events, Events (Dev)"
        );
        assert!(decision.notify);
    }

    #[test]
    fn test_secondary_only_does_not_notify() {
        let changes = ChangeSet::from_changed_paths(
            Path::new("output"),
            &["output/cms-scoring-rules.json", "output/events-dev.json"],
        );

        let decision = changes.decision().unwrap();
        assert!(!decision.notify);
        assert_eq!(decision.labels, vec!["Scoring Rules CMS", "Events (Dev)"]);
    }

    #[test]
    fn test_primary_events_notifies() {
        let changes = ChangeSet::from_changed_paths(Path::new("output"), &["output/events.json"]);
        let decision = changes.decision().unwrap();
        assert!(decision.notify);
        assert_eq!(decision.commit_message, "Modified Events");
    }

    #[test]
    fn test_record_files_alone_do_not_count() {
        let changes = ChangeSet::from_changed_paths(
            Path::new("output"),
            &["output/events/events/abc.json", "output/events-dev/events/x.json"],
        );
        assert!(changes.is_empty());
    }

    #[test]
    fn test_similar_names_do_not_match() {
        let changes = ChangeSet::from_changed_paths(
            Path::new("output"),
            &["output/events.json.bak", "other/cms.json", "foo/output/cms.json"],
        );
        assert!(changes.is_empty());
    }

    #[test]
    fn test_output_dir_below_repository_root() {
        let changes = ChangeSet::from_changed_paths(
            Path::new("sync/output"),
            &["sync/output/cms.json", "output/events.json"],
        );
        assert_eq!(changes.kinds().collect::<Vec<_>>(), vec![SnapshotKind::FrontendCms]);
    }

    #[test]
    fn test_leading_dot_is_ignored() {
        let changes = ChangeSet::from_changed_paths(Path::new("./output"), &["output/cms.json"]);
        assert!(changes.contains(SnapshotKind::FrontendCms));
    }

    #[test]
    fn test_parse_porcelain_status() {
        let output = " M output/cms.json\n?? output/events/events/new.json\nR  old.json -> output/events.json\n D output/events-dev/events/gone.json\n?? \"output/odd name.json\"\n";
        assert_eq!(
            parse_porcelain_status(output),
            vec![
                "output/cms.json",
                "output/events/events/new.json",
                "output/events.json",
                "output/events-dev/events/gone.json",
                "output/odd name.json",
            ]
        );
    }

    #[tokio::test]
    async fn test_digest_detector_reports_then_settles() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("cms.json"), "{}").await.unwrap();
        fs::write(root.join("events.json"), "{\"events\": []}").await.unwrap();

        let detector = DigestChangeDetector::new(root);
        let first = detector.detect().await.unwrap();
        assert_eq!(
            first.changes.kinds().collect::<Vec<_>>(),
            vec![SnapshotKind::FrontendCms, SnapshotKind::Events]
        );
        first.record().await.unwrap();

        let second = detector.detect().await.unwrap();
        assert!(second.changes.is_empty());
        assert!(!second.is_pending());

        fs::write(root.join("cms-leaderboards.json"), "{}").await.unwrap();
        let third = detector.detect().await.unwrap();
        assert_eq!(
            third.changes.kinds().collect::<Vec<_>>(),
            vec![SnapshotKind::LeaderboardsCms]
        );
        assert!(!third.changes.decision().unwrap().notify);
    }

    #[tokio::test]
    async fn test_unrecorded_changes_are_reported_again() {
        let temp_dir = tempdir().unwrap();
        let root = temp_dir.path();
        fs::write(root.join("cms.json"), "{}").await.unwrap();

        let detector = DigestChangeDetector::new(root);
        let first = detector.detect().await.unwrap();
        assert!(first.is_pending());
        assert!(!detector.manifest_path().exists());

        let second = detector.detect().await.unwrap();
        assert!(second.changes.contains(SnapshotKind::FrontendCms));
    }
}
