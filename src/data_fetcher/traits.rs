//! Seams between the pipeline and the upstream services.

use async_trait::async_trait;
use serde_json::Value;

use crate::data_fetcher::models::{CmsPage, Credential, EventCollection, EventEnvironment, FetchOutcome};
use crate::error::AppError;

/// Issues and revokes the short-lived credential used for a run.
#[async_trait]
pub trait CredentialProvider: Send + Sync {
    /// Obtain a fresh credential. Called at most once per run.
    async fn acquire(&self) -> Result<Credential, AppError>;

    /// Invalidate a credential. Consumes it so it cannot be revoked twice.
    async fn revoke(&self, credential: Credential) -> Result<(), AppError>;
}

/// Fetches the payload behind every snapshot.
///
/// Implementations never return an error: every upstream problem is reported
/// as a failed [`FetchOutcome`] so one source cannot affect another.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    /// Fetch a CMS page. Needs no credential.
    async fn fetch_cms(&self, page: CmsPage, locale: &str) -> FetchOutcome<Value>;

    /// Download the events visible to the credential's account.
    async fn fetch_events(
        &self,
        credential: &Credential,
        environment: EventEnvironment,
    ) -> FetchOutcome<EventCollection>;
}
