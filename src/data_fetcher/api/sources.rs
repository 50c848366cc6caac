//! CMS page and events download fetchers

use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{error, info, instrument, warn};

use super::fetch_utils::fetch_json;
use super::urls::{build_cms_page_url, build_events_download_url};
use crate::config::{Config, ServiceEndpoints};
use crate::data_fetcher::models::{
    CmsPage, Credential, EventCollection, EventEnvironment, FetchOutcome,
};
use crate::data_fetcher::traits::SourceFetcher;
use crate::error::AppError;

/// Fetches CMS pages from the content service and events from the events services.
pub struct EpicSourceFetcher {
    client: Client,
    endpoints: ServiceEndpoints,
}

impl EpicSourceFetcher {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            endpoints: config.endpoints.clone(),
        }
    }

    fn events_service(&self, environment: EventEnvironment) -> &str {
        match environment {
            EventEnvironment::Live => &self.endpoints.events_service_live,
            EventEnvironment::Prod => &self.endpoints.events_service_prod,
        }
    }
}

fn into_outcome<T>(source: &str, result: Result<T, AppError>) -> FetchOutcome<T> {
    match &result {
        Err(e) if e.is_acquisition_failure() => {
            warn!("Fetching {source} failed, keeping previous snapshot: {e}")
        }
        Err(e) => error!("Unexpected error while fetching {source}: {e}"),
        Ok(_) => {}
    }
    FetchOutcome::from(result)
}

#[async_trait]
impl SourceFetcher for EpicSourceFetcher {
    #[instrument(skip(self))]
    async fn fetch_cms(&self, page: CmsPage, locale: &str) -> FetchOutcome<Value> {
        let url = build_cms_page_url(&self.endpoints.content_service, page.page_id(), locale);
        let result = fetch_json::<Value>(self.client.get(&url), &url).await;

        if result.is_ok() {
            info!("Fetched CMS page {}", page.page_id());
        }
        into_outcome(page.page_id(), result)
    }

    #[instrument(skip(self, credential))]
    async fn fetch_events(
        &self,
        credential: &Credential,
        environment: EventEnvironment,
    ) -> FetchOutcome<EventCollection> {
        let url = build_events_download_url(self.events_service(environment), credential.account_id());
        let request = self.client.get(&url).bearer_auth(credential.access_token());
        let result = fetch_json::<EventCollection>(request, &url).await;

        if let Ok(collection) = &result {
            info!(
                "Fetched {} {} events",
                collection.events.len(),
                environment.as_str()
            );
        }
        into_outcome(&format!("{} events", environment.as_str()), result)
    }
}
