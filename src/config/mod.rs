use crate::constants::{self, env_vars};
use crate::error::AppError;
use clap::ValueEnum;
use std::collections::HashMap;
use std::fmt;
use std::path::{Path, PathBuf};

pub mod validation;

use validation::{is_switch_enabled, non_empty, validate_credential_field, validate_output_dir};

/// Device-auth credential components used to obtain an access token.
#[derive(Clone, PartialEq, Eq)]
pub struct DeviceCredentials {
    pub client_id: String,
    pub client_secret: String,
    pub account_id: String,
    pub device_id: String,
    pub device_secret: String,
}

impl fmt::Debug for DeviceCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeviceCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("account_id", &self.account_id)
            .field("device_id", &self.device_id)
            .field("device_secret", &"<redacted>")
            .finish()
    }
}

/// Base URLs of the upstream services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceEndpoints {
    pub account_service: String,
    pub content_service: String,
    pub events_service_live: String,
    pub events_service_prod: String,
}

impl Default for ServiceEndpoints {
    fn default() -> Self {
        ServiceEndpoints {
            account_service: constants::endpoints::ACCOUNT_SERVICE.to_string(),
            content_service: constants::endpoints::CONTENT_SERVICE.to_string(),
            events_service_live: constants::endpoints::EVENTS_SERVICE_LIVE.to_string(),
            events_service_prod: constants::endpoints::EVENTS_SERVICE_PROD.to_string(),
        }
    }
}

/// How the publisher finds out which snapshots changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum ChangeDetection {
    /// Ask `git status` for modified and untracked files
    #[default]
    Git,
    /// Compare content digests against the manifest from the previous run
    Digest,
}

/// Webhook destination. Only exists when both URL and token are configured.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WebhookTarget<'a> {
    pub url: &'a str,
    pub auth: &'a str,
}

pub(crate) fn webhook_target<'a>(
    url: Option<&'a str>,
    auth: Option<&'a str>,
) -> Option<WebhookTarget<'a>> {
    match (url, auth) {
        (Some(url), Some(auth)) => Some(WebhookTarget { url, auth }),
        _ => None,
    }
}

/// Validated runtime configuration.
///
/// Built once at startup from the environment and passed explicitly to every
/// component that needs part of it.
#[derive(Debug, Clone)]
pub struct Config {
    pub credentials: DeviceCredentials,
    /// Repository dispatch URL. Notification is disabled when unset.
    pub webhook_url: Option<String>,
    /// Token for the repository dispatch URL. Notification is disabled when unset.
    pub webhook_auth: Option<String>,
    /// Raw `GIT_DO_NOT_COMMIT` value, see [`Config::commit_disabled`]
    pub git_do_not_commit: Option<String>,
    /// Raw `GIT_DO_NOT_PUSH` value, see [`Config::push_disabled`]
    pub git_do_not_push: Option<String>,
    /// Directory snapshots are written to, relative to the repository root
    pub output_dir: PathBuf,
    /// HTTP timeout in seconds for upstream requests
    pub http_timeout_seconds: u64,
    /// Locale requested for CMS pages
    pub cms_locale: String,
    pub change_detection: ChangeDetection,
    pub endpoints: ServiceEndpoints,
}

impl Config {
    /// Loads configuration from the process environment.
    ///
    /// A `.env` file in the working directory is loaded first when present;
    /// variables already set in the environment win over it.
    ///
    /// # Returns
    /// * `Ok(Config)` - Environment is valid
    /// * `Err(AppError)` - A required value is missing or malformed
    pub fn load() -> Result<Self, AppError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("Loaded environment from {}", path.display());
        }

        let vars = std::env::vars_os()
            .filter_map(|(key, value)| Some((key.into_string().ok()?, value.into_string().ok()?)));

        Self::from_vars(vars)
    }

    /// Validates a raw set of environment variables.
    ///
    /// # Environment Variables
    /// - `EPIC_CLIENT_ID`, `EPIC_CLIENT_SECRET`, `EPIC_ACCOUNT_ID`,
    ///   `EPIC_DEVICE_ID`, `EPIC_DEVICE_SECRET` - required, 32 characters each
    /// - `WEBHOOK_URL`, `WEBHOOK_AUTH` - optional webhook destination
    /// - `GIT_DO_NOT_COMMIT`, `GIT_DO_NOT_PUSH` - optional kill-switches
    /// - `SYNC_OUTPUT_DIR` - snapshot directory (default: `output`)
    /// - `SYNC_HTTP_TIMEOUT` - HTTP timeout in seconds (default: 30)
    /// - `SYNC_CMS_LOCALE` - CMS locale (default: `en-US`)
    /// - `SYNC_CHANGE_DETECTION` - `git` or `digest` (default: `git`)
    /// - `EPIC_ACCOUNT_SERVICE_URL`, `EPIC_CONTENT_SERVICE_URL`,
    ///   `EPIC_EVENTS_SERVICE_URL_LIVE`, `EPIC_EVENTS_SERVICE_URL_PROD` - endpoint overrides
    pub fn from_vars<I, K, V>(vars: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut env: HashMap<String, String> = vars
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();

        let required =
            |name: &str| validate_credential_field(name, env.get(name).map(String::as_str));
        let credentials = DeviceCredentials {
            client_id: required(env_vars::CLIENT_ID)?,
            client_secret: required(env_vars::CLIENT_SECRET)?,
            account_id: required(env_vars::ACCOUNT_ID)?,
            device_id: required(env_vars::DEVICE_ID)?,
            device_secret: required(env_vars::DEVICE_SECRET)?,
        };

        let change_detection = match non_empty(env.remove(env_vars::CHANGE_DETECTION)) {
            Some(raw) => ChangeDetection::from_str(raw.trim(), true).map_err(|_| {
                AppError::config_error(format!(
                    "Invalid environment config: {} must be 'git' or 'digest' (rule: enum), value is '{raw}'",
                    env_vars::CHANGE_DETECTION
                ))
            })?,
            None => ChangeDetection::default(),
        };

        let http_timeout_seconds = env
            .get(env_vars::HTTP_TIMEOUT)
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(constants::DEFAULT_HTTP_TIMEOUT_SECONDS);

        let defaults = ServiceEndpoints::default();
        let mut endpoint = |name: &str, fallback: String| {
            non_empty(env.remove(name))
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(fallback)
        };
        let endpoints = ServiceEndpoints {
            account_service: endpoint(env_vars::ACCOUNT_SERVICE_URL, defaults.account_service),
            content_service: endpoint(env_vars::CONTENT_SERVICE_URL, defaults.content_service),
            events_service_live: endpoint(
                env_vars::EVENTS_SERVICE_URL_LIVE,
                defaults.events_service_live,
            ),
            events_service_prod: endpoint(
                env_vars::EVENTS_SERVICE_URL_PROD,
                defaults.events_service_prod,
            ),
        };

        let output_dir = match non_empty(env.remove(env_vars::OUTPUT_DIR)) {
            Some(raw) => validate_output_dir(env_vars::OUTPUT_DIR, raw.trim())?,
            None => PathBuf::from(constants::DEFAULT_OUTPUT_DIR),
        };

        Ok(Config {
            credentials,
            webhook_url: non_empty(env.remove(env_vars::WEBHOOK_URL)),
            webhook_auth: non_empty(env.remove(env_vars::WEBHOOK_AUTH)),
            git_do_not_commit: env.remove(env_vars::GIT_DO_NOT_COMMIT),
            git_do_not_push: env.remove(env_vars::GIT_DO_NOT_PUSH),
            output_dir,
            http_timeout_seconds,
            cms_locale: non_empty(env.remove(env_vars::CMS_LOCALE))
                .unwrap_or_else(|| constants::DEFAULT_CMS_LOCALE.to_string()),
            change_detection,
            endpoints,
        })
    }

    /// Overrides the snapshot directory, with the same rules as `SYNC_OUTPUT_DIR`.
    pub fn set_output_dir(&mut self, source: &str, value: &Path) -> Result<(), AppError> {
        self.output_dir = validate_output_dir(source, &value.to_string_lossy())?;
        Ok(())
    }

    /// Returns the webhook destination when both URL and token are configured.
    pub fn webhook(&self) -> Option<WebhookTarget<'_>> {
        webhook_target(self.webhook_url.as_deref(), self.webhook_auth.as_deref())
    }

    /// Whether `GIT_DO_NOT_COMMIT` suppresses staging, committing and pushing.
    pub fn commit_disabled(&self) -> bool {
        is_switch_enabled(self.git_do_not_commit.as_deref())
    }

    /// Whether `GIT_DO_NOT_PUSH` suppresses pushing.
    pub fn push_disabled(&self) -> bool {
        is_switch_enabled(self.git_do_not_push.as_deref())
    }
}
