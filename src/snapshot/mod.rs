//! Snapshot registry and persistence.
//!
//! Every logical data source is bound to exactly one [`SnapshotKind`]. The
//! kind decides the file name, the label used in commit messages and whether
//! a change to it is reported to the downstream webhook.

pub mod digest;
pub mod writer;

use std::path::{Path, PathBuf};

use crate::constants::layout::RECORDS_DIR;
use crate::data_fetcher::models::{CmsPage, EventEnvironment};

pub use writer::{SnapshotWriter, WriteStatus, to_pretty_json};

/// Shape of a snapshot's payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SnapshotShape {
    /// A single JSON document
    Scalar,
    /// A JSON document plus one file per contained record
    Collection,
}

/// The snapshots this tool maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum SnapshotKind {
    FrontendCms,
    LeaderboardsCms,
    ScoringRulesCms,
    Events,
    DevEvents,
}

impl SnapshotKind {
    /// All snapshots, in the order their labels appear in commit messages.
    pub const ALL: [SnapshotKind; 5] = [
        SnapshotKind::FrontendCms,
        SnapshotKind::LeaderboardsCms,
        SnapshotKind::ScoringRulesCms,
        SnapshotKind::Events,
        SnapshotKind::DevEvents,
    ];

    /// File stem of the snapshot under the output root
    pub fn name(&self) -> &'static str {
        match self {
            SnapshotKind::FrontendCms => "cms",
            SnapshotKind::LeaderboardsCms => "cms-leaderboards",
            SnapshotKind::ScoringRulesCms => "cms-scoring-rules",
            SnapshotKind::Events => "events",
            SnapshotKind::DevEvents => "events-dev",
        }
    }

    /// Change label used in commit messages
    pub fn label(&self) -> &'static str {
        match self {
            SnapshotKind::FrontendCms => "Frontend CMS",
            SnapshotKind::LeaderboardsCms => "Leaderboards CMS",
            SnapshotKind::ScoringRulesCms => "Scoring Rules CMS",
            SnapshotKind::Events => "Events",
            SnapshotKind::DevEvents => "Events (Dev)",
        }
    }

    /// Primary snapshots trigger the webhook when they change. Secondary ones
    /// only show up in the commit message. New kinds must be added here explicitly.
    pub fn is_primary(&self) -> bool {
        match self {
            SnapshotKind::FrontendCms | SnapshotKind::Events => true,
            SnapshotKind::LeaderboardsCms
            | SnapshotKind::ScoringRulesCms
            | SnapshotKind::DevEvents => false,
        }
    }

    pub fn shape(&self) -> SnapshotShape {
        match self {
            SnapshotKind::Events | SnapshotKind::DevEvents => SnapshotShape::Collection,
            _ => SnapshotShape::Scalar,
        }
    }

    /// CMS page feeding this snapshot, for scalar snapshots
    pub fn cms_page(&self) -> Option<CmsPage> {
        match self {
            SnapshotKind::FrontendCms => Some(CmsPage::TournamentInformation),
            SnapshotKind::LeaderboardsCms => Some(CmsPage::LeaderboardInformation),
            SnapshotKind::ScoringRulesCms => Some(CmsPage::ScoringRulesInformation),
            SnapshotKind::Events | SnapshotKind::DevEvents => None,
        }
    }

    /// Events service feeding this snapshot, for collection snapshots
    pub fn event_environment(&self) -> Option<EventEnvironment> {
        match self {
            SnapshotKind::Events => Some(EventEnvironment::Live),
            SnapshotKind::DevEvents => Some(EventEnvironment::Prod),
            _ => None,
        }
    }

    pub fn file_name(&self) -> String {
        format!("{}.json", self.name())
    }

    /// `<root>/<name>.json`
    pub fn file_path(&self, root: &Path) -> PathBuf {
        root.join(self.file_name())
    }

    /// `<root>/<name>/events`, only for collection snapshots
    pub fn records_dir(&self, root: &Path) -> Option<PathBuf> {
        match self.shape() {
            SnapshotShape::Collection => Some(records_dir(root, self.name())),
            SnapshotShape::Scalar => None,
        }
    }
}

pub(crate) fn records_dir(root: &Path, name: &str) -> PathBuf {
    root.join(name).join(RECORDS_DIR)
}
