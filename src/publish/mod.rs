//! Change detection and publishing of snapshot updates.

pub mod changes;
pub mod git;
pub mod publisher;
pub mod webhook;

pub use changes::{
    ChangeSet, DigestChangeDetector, DigestDetection, PublishDecision, parse_porcelain_status,
};
pub use git::{GitCli, VersionControl};
pub use publisher::{PublishReport, PublishSettings, Publisher, WebhookStatus};
pub use webhook::{Notifier, WebhookNotifier};
