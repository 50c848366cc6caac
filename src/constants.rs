//! Application-wide constants and configuration values
//!
//! This module centralizes endpoint defaults, file layout names and
//! the fixed values used when publishing so they live in one place.

/// Default timeout for HTTP requests in seconds
pub const DEFAULT_HTTP_TIMEOUT_SECONDS: u64 = 30;

/// Maximum number of idle connections per host in the HTTP client pool
pub const HTTP_POOL_MAX_IDLE_PER_HOST: usize = 10;

/// User agent sent with every outgoing request
pub const USER_AGENT: &str = concat!("tournament_sync/", env!("CARGO_PKG_VERSION"));

/// Default directory snapshots are written to, relative to the repository root
pub const DEFAULT_OUTPUT_DIR: &str = "output";

/// Default locale requested from the content service
pub const DEFAULT_CMS_LOCALE: &str = "en-US";

/// Length every credential component must have
pub const CREDENTIAL_FIELD_LENGTH: usize = 32;

/// Default upstream service endpoints
pub mod endpoints {
    /// Account service issuing and revoking access tokens
    pub const ACCOUNT_SERVICE: &str = "https://account-public-service-prod.ol.epicgames.com";

    /// Content service serving the CMS pages
    pub const CONTENT_SERVICE: &str = "https://fortnitecontent-website-prod07.ol.epicgames.com";

    /// Live events service
    pub const EVENTS_SERVICE_LIVE: &str = "https://events-public-service-live.ol.epicgames.com";

    /// Prod events service, published as the dev events snapshot
    pub const EVENTS_SERVICE_PROD: &str = "https://events-public-service-prod.ol.epicgames.com";
}

/// Query parameters used for the event download
pub mod events {
    pub const REGION: &str = "NAE";
    pub const PLATFORM: &str = "Windows";
}

/// CMS page identifiers on the content service
pub mod cms_pages {
    pub const TOURNAMENT_INFORMATION: &str = "tournamentinformation";
    pub const LEADERBOARD_INFORMATION: &str = "leaderboardinformation";
    pub const SCORING_RULES_INFORMATION: &str = "scoringrulesinformation";
}

/// Snapshot file layout
pub mod layout {
    /// Subdirectory of a collection snapshot holding one file per record
    pub const RECORDS_DIR: &str = "events";

    /// Indentation used for every JSON file written
    pub const JSON_INDENT: &[u8] = b"   ";

    /// Digest manifest kept by the digest change detector
    pub const DIGEST_MANIFEST: &str = ".snapshot-digests.json";
}

/// Values used when publishing through git and the webhook
pub mod publish {
    /// Committer name bound for the run
    pub const BOT_NAME: &str = "github-actions[bot]";

    /// Committer email bound for the run
    pub const BOT_EMAIL: &str = "41898282+github-actions[bot]@users.noreply.github.com";

    /// Event type sent in the repository dispatch payload
    pub const WEBHOOK_EVENT_TYPE: &str = "tournaments-data-updated";

    /// Accept header expected by the dispatch endpoint
    pub const WEBHOOK_ACCEPT: &str = "application/vnd.github+json";
}

/// Environment variable names
pub mod env_vars {
    pub const CLIENT_ID: &str = "EPIC_CLIENT_ID";
    pub const CLIENT_SECRET: &str = "EPIC_CLIENT_SECRET";
    pub const ACCOUNT_ID: &str = "EPIC_ACCOUNT_ID";
    pub const DEVICE_ID: &str = "EPIC_DEVICE_ID";
    pub const DEVICE_SECRET: &str = "EPIC_DEVICE_SECRET";

    pub const WEBHOOK_URL: &str = "WEBHOOK_URL";
    pub const WEBHOOK_AUTH: &str = "WEBHOOK_AUTH";
    pub const GIT_DO_NOT_COMMIT: &str = "GIT_DO_NOT_COMMIT";
    pub const GIT_DO_NOT_PUSH: &str = "GIT_DO_NOT_PUSH";

    pub const OUTPUT_DIR: &str = "SYNC_OUTPUT_DIR";
    pub const HTTP_TIMEOUT: &str = "SYNC_HTTP_TIMEOUT";
    pub const CMS_LOCALE: &str = "SYNC_CMS_LOCALE";
    pub const CHANGE_DETECTION: &str = "SYNC_CHANGE_DETECTION";

    pub const ACCOUNT_SERVICE_URL: &str = "EPIC_ACCOUNT_SERVICE_URL";
    pub const CONTENT_SERVICE_URL: &str = "EPIC_CONTENT_SERVICE_URL";
    pub const EVENTS_SERVICE_URL_LIVE: &str = "EPIC_EVENTS_SERVICE_URL_LIVE";
    pub const EVENTS_SERVICE_URL_PROD: &str = "EPIC_EVENTS_SERVICE_URL_PROD";
}
