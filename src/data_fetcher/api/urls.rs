//! URL building utilities for upstream endpoints

use crate::constants::events::{PLATFORM, REGION};

/// Builds the OAuth token endpoint URL.
///
/// # Example
/// ```
/// use tournament_sync::data_fetcher::api::build_token_url;
///
/// let url = build_token_url("https://account.example.com");
/// assert_eq!(url, "https://account.example.com/account/api/oauth/token");
/// ```
pub fn build_token_url(account_service: &str) -> String {
    format!("{account_service}/account/api/oauth/token")
}

/// Builds the URL that kills the session behind an access token.
///
/// # Example
/// ```
/// use tournament_sync::data_fetcher::api::build_kill_session_url;
///
/// let url = build_kill_session_url("https://account.example.com", "eg1~abc");
/// assert_eq!(url, "https://account.example.com/account/api/oauth/sessions/kill/eg1~abc");
/// ```
pub fn build_kill_session_url(account_service: &str, access_token: &str) -> String {
    format!("{account_service}/account/api/oauth/sessions/kill/{access_token}")
}

/// Builds a CMS page URL for the given locale.
///
/// # Example
/// ```
/// use tournament_sync::data_fetcher::api::build_cms_page_url;
///
/// let url = build_cms_page_url("https://content.example.com", "tournamentinformation", "en-US");
/// assert_eq!(
///     url,
///     "https://content.example.com/content/api/pages/fortnite-game/tournamentinformation?lang=en-US"
/// );
/// ```
pub fn build_cms_page_url(content_service: &str, page: &str, locale: &str) -> String {
    format!("{content_service}/content/api/pages/fortnite-game/{page}?lang={locale}")
}

/// Builds the events download URL for an account.
///
/// # Example
/// ```
/// use tournament_sync::data_fetcher::api::build_events_download_url;
///
/// let url = build_events_download_url("https://events.example.com", "acc1");
/// assert_eq!(
///     url,
///     "https://events.example.com/api/v1/events/Fortnite/download/acc1?region=NAE&platform=Windows&teamAccountIds=acc1"
/// );
/// ```
pub fn build_events_download_url(events_service: &str, account_id: &str) -> String {
    format!(
        "{events_service}/api/v1/events/Fortnite/download/{account_id}?region={REGION}&platform={PLATFORM}&teamAccountIds={account_id}"
    )
}
