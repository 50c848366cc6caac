use std::path::PathBuf;
use tracing::{error, info};

use super::changes::ChangeSet;
use super::git::VersionControl;
use super::webhook::Notifier;
use crate::config::{Config, WebhookTarget, webhook_target};
use crate::constants::publish::{BOT_EMAIL, BOT_NAME};
use crate::error::AppError;

/// The part of the configuration the publisher acts on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishSettings {
    /// Path staged before committing, relative to the repository root
    pub output_dir: PathBuf,
    pub webhook_url: Option<String>,
    pub webhook_auth: Option<String>,
    pub commit_disabled: bool,
    pub push_disabled: bool,
}

impl PublishSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            output_dir: config.output_dir.clone(),
            webhook_url: config.webhook_url.clone(),
            webhook_auth: config.webhook_auth.clone(),
            commit_disabled: config.commit_disabled(),
            push_disabled: config.push_disabled(),
        }
    }

    /// Settings for a run that must not leave the machine: no webhook, no commit.
    pub fn dry_run(mut self) -> Self {
        self.webhook_url = None;
        self.webhook_auth = None;
        self.commit_disabled = true;
        self
    }

    fn webhook(&self) -> Option<WebhookTarget<'_>> {
        webhook_target(self.webhook_url.as_deref(), self.webhook_auth.as_deref())
    }
}

/// What happened to the webhook during a publish.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WebhookStatus {
    /// No primary snapshot changed
    #[default]
    NotTriggered,
    /// A primary snapshot changed but no destination is configured
    NotConfigured,
    Sent,
    /// The request failed or was rejected; the error was logged
    Failed,
}

/// Side effects performed by a publish.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PublishReport {
    pub commit_message: Option<String>,
    pub webhook: WebhookStatus,
    pub committed: bool,
    pub pushed: bool,
}

/// Turns a [`ChangeSet`] into webhook, commit and push side effects.
pub struct Publisher<'a> {
    vcs: &'a dyn VersionControl,
    notifier: &'a dyn Notifier,
    settings: PublishSettings,
}

impl<'a> Publisher<'a> {
    pub fn new(
        vcs: &'a dyn VersionControl,
        notifier: &'a dyn Notifier,
        settings: PublishSettings,
    ) -> Self {
        Self {
            vcs,
            notifier,
            settings,
        }
    }

    /// Publishes the changes of one run.
    ///
    /// Webhook problems are logged and do not stop the commit. Any git failure
    /// aborts the remaining git steps and is returned.
    pub async fn publish(&self, changes: &ChangeSet) -> Result<PublishReport, AppError> {
        let Some(decision) = changes.decision() else {
            info!("No snapshot changes, nothing to publish");
            return Ok(PublishReport::default());
        };

        let mut report = PublishReport {
            webhook: self.send_webhook(decision.notify).await,
            ..PublishReport::default()
        };

        info!("{}", decision.commit_message);
        report.commit_message = Some(decision.commit_message.clone());

        if self.settings.commit_disabled {
            info!("GIT_DO_NOT_COMMIT is set, not committing");
            return Ok(report);
        }

        self.vcs.stage(&self.settings.output_dir).await?;
        self.vcs.set_config("user.email", BOT_EMAIL).await?;
        self.vcs.set_config("user.name", BOT_NAME).await?;
        self.vcs.set_config("commit.gpgsign", "false").await?;
        self.vcs.commit(&decision.commit_message).await?;
        report.committed = true;

        if self.settings.push_disabled {
            info!("GIT_DO_NOT_PUSH is set, not pushing");
            return Ok(report);
        }

        self.vcs.push().await?;
        report.pushed = true;
        info!("Pushed snapshot changes");

        Ok(report)
    }

    async fn send_webhook(&self, triggered: bool) -> WebhookStatus {
        if !triggered {
            return WebhookStatus::NotTriggered;
        }
        let Some(target) = self.settings.webhook() else {
            info!("Webhook not configured, skipping notification");
            return WebhookStatus::NotConfigured;
        };

        match self.notifier.notify(target).await {
            Ok(()) => WebhookStatus::Sent,
            Err(e) => {
                error!("Failed to send webhook - {e}");
                WebhookStatus::Failed
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::SnapshotKind;
    use async_trait::async_trait;
    use std::path::Path;
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingGit {
        calls: Mutex<Vec<String>>,
        fail_on: Option<&'static str>,
    }

    impl RecordingGit {
        fn failing_on(step: &'static str) -> Self {
            Self {
                fail_on: Some(step),
                ..Self::default()
            }
        }

        fn record(&self, call: String) -> Result<(), AppError> {
            let step = call.split_whitespace().next().unwrap_or_default().to_string();
            self.calls.lock().unwrap().push(call);
            match self.fail_on {
                Some(failing) if failing == step => Err(AppError::git_error(step, "boom")),
                _ => Ok(()),
            }
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl VersionControl for RecordingGit {
        async fn changed_paths(&self) -> Result<Vec<String>, AppError> {
            Ok(vec![])
        }
        async fn stage(&self, path: &Path) -> Result<(), AppError> {
            self.record(format!("add {}", path.display()))
        }
        async fn set_config(&self, key: &str, value: &str) -> Result<(), AppError> {
            self.record(format!("config {key} {value}"))
        }
        async fn commit(&self, message: &str) -> Result<(), AppError> {
            self.record(format!("commit {message}"))
        }
        async fn push(&self) -> Result<(), AppError> {
            self.record("push".to_string())
        }
    }

    #[derive(Default)]
    struct CountingNotifier {
        sent: Mutex<u32>,
        reject: bool,
    }

    #[async_trait]
    impl Notifier for CountingNotifier {
        async fn notify(&self, _target: WebhookTarget<'_>) -> Result<(), AppError> {
            *self.sent.lock().unwrap() += 1;
            if self.reject {
                Err(AppError::webhook_rejected(500, "nope"))
            } else {
                Ok(())
            }
        }
    }

    fn settings() -> PublishSettings {
        PublishSettings {
            output_dir: PathBuf::from("output"),
            webhook_url: Some("https://hooks.example.com".to_string()),
            webhook_auth: Some("token".to_string()),
            commit_disabled: false,
            push_disabled: false,
        }
    }

    #[tokio::test]
    async fn test_empty_change_set_does_nothing() {
        let git = RecordingGit::default();
        let notifier = CountingNotifier::default();

        let report = Publisher::new(&git, &notifier, settings())
            .publish(&ChangeSet::default())
            .await
            .unwrap();

        assert_eq!(report, PublishReport::default());
        assert!(git.calls().is_empty());
        assert_eq!(*notifier.sent.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_full_publish_sequence() {
        let git = RecordingGit::default();
        let notifier = CountingNotifier::default();
        let changes = ChangeSet::from_kinds([SnapshotKind::Events, SnapshotKind::LeaderboardsCms]);

        let report = Publisher::new(&git, &notifier, settings())
            .publish(&changes)
            .await
            .unwrap();

        assert_eq!(report.webhook, WebhookStatus::Sent);
        assert!(report.committed && report.pushed);
        assert_eq!(
            git.calls(),
            vec![
                "add output".to_string(),
                format!("config user.email {BOT_EMAIL}"),
                format!("config user.name {BOT_NAME}"),
                "config commit.gpgsign false".to_string(),
                "commit Modified Leaderboards CMS, Events".to_string(),
                "push".to_string(),
            ]
        );
        assert_eq!(*notifier.sent.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_secondary_change_skips_webhook() {
        let git = RecordingGit::default();
        let notifier = CountingNotifier::default();
        let changes = ChangeSet::from_kinds([SnapshotKind::ScoringRulesCms]);

        let report = Publisher::new(&git, &notifier, settings())
            .publish(&changes)
            .await
            .unwrap();

        assert_eq!(report.webhook, WebhookStatus::NotTriggered);
        assert_eq!(report.commit_message.as_deref(), Some("Modified Scoring Rules CMS"));
        assert_eq!(*notifier.sent.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_missing_webhook_config_is_not_an_error() {
        let git = RecordingGit::default();
        let notifier = CountingNotifier::default();
        let mut settings = settings();
        settings.webhook_auth = None;

        let report = Publisher::new(&git, &notifier, settings)
            .publish(&ChangeSet::from_kinds([SnapshotKind::FrontendCms]))
            .await
            .unwrap();

        assert_eq!(report.webhook, WebhookStatus::NotConfigured);
        assert!(report.pushed);
        assert_eq!(*notifier.sent.lock().unwrap(), 0);
    }

    #[tokio::test]
    async fn test_rejected_webhook_does_not_stop_commit() {
        let git = RecordingGit::default();
        let notifier = CountingNotifier {
            reject: true,
            ..CountingNotifier::default()
        };

        let report = Publisher::new(&git, &notifier, settings())
            .publish(&ChangeSet::from_kinds([SnapshotKind::Events]))
            .await
            .unwrap();

        assert_eq!(report.webhook, WebhookStatus::Failed);
        assert!(report.committed && report.pushed);
    }

    #[tokio::test]
    async fn test_do_not_commit_skips_all_git_calls() {
        let git = RecordingGit::default();
        let notifier = CountingNotifier::default();
        let mut settings = settings();
        settings.commit_disabled = true;

        let report = Publisher::new(&git, &notifier, settings)
            .publish(&ChangeSet::from_kinds([SnapshotKind::Events]))
            .await
            .unwrap();

        assert!(git.calls().is_empty());
        assert!(!report.committed && !report.pushed);
        assert_eq!(report.commit_message.as_deref(), Some("Modified Events"));
        assert_eq!(report.webhook, WebhookStatus::Sent);
    }

    #[tokio::test]
    async fn test_do_not_push_commits_only() {
        let git = RecordingGit::default();
        let notifier = CountingNotifier::default();
        let mut settings = settings();
        settings.push_disabled = true;

        let report = Publisher::new(&git, &notifier, settings)
            .publish(&ChangeSet::from_kinds([SnapshotKind::Events]))
            .await
            .unwrap();

        assert!(report.committed);
        assert!(!report.pushed);
        assert!(!git.calls().contains(&"push".to_string()));
    }

    #[tokio::test]
    async fn test_git_failure_aborts_remaining_steps() {
        let git = RecordingGit::failing_on("commit");
        let notifier = CountingNotifier::default();

        let result = Publisher::new(&git, &notifier, settings())
            .publish(&ChangeSet::from_kinds([SnapshotKind::Events]))
            .await;

        assert!(matches!(result, Err(AppError::Git { .. })));
        let calls = git.calls();
        assert!(calls.last().unwrap().starts_with("commit"));
        assert!(!calls.contains(&"push".to_string()));
    }

    #[tokio::test]
    async fn test_dry_run_settings() {
        let git = RecordingGit::default();
        let notifier = CountingNotifier::default();

        let report = Publisher::new(&git, &notifier, settings().dry_run())
            .publish(&ChangeSet::from_kinds([SnapshotKind::FrontendCms]))
            .await
            .unwrap();

        assert_eq!(report.webhook, WebhookStatus::NotConfigured);
        assert!(git.calls().is_empty());
    }
}
