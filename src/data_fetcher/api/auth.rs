//! Device-auth credential provider for the account service

use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, instrument};

use super::fetch_utils::{fetch_json, send_checked};
use super::urls::{build_kill_session_url, build_token_url};
use crate::config::{Config, DeviceCredentials};
use crate::data_fetcher::models::{Credential, TokenResponse};
use crate::data_fetcher::traits::CredentialProvider;
use crate::error::AppError;

/// Exchanges the configured device credentials for an access token and kills
/// the token's session afterwards.
pub struct DeviceAuthProvider {
    client: Client,
    account_service: String,
    credentials: DeviceCredentials,
}

impl DeviceAuthProvider {
    pub fn new(client: Client, config: &Config) -> Self {
        Self {
            client,
            account_service: config.endpoints.account_service.clone(),
            credentials: config.credentials.clone(),
        }
    }
}

#[async_trait]
impl CredentialProvider for DeviceAuthProvider {
    #[instrument(skip(self))]
    async fn acquire(&self) -> Result<Credential, AppError> {
        let url = build_token_url(&self.account_service);
        let creds = &self.credentials;

        let request = self
            .client
            .post(&url)
            .basic_auth(&creds.client_id, Some(&creds.client_secret))
            .form(&[
                ("grant_type", "device_auth"),
                ("account_id", creds.account_id.as_str()),
                ("device_id", creds.device_id.as_str()),
                ("secret", creds.device_secret.as_str()),
                ("token_type", "eg1"),
            ]);

        let token: TokenResponse = fetch_json(request, &url)
            .await
            .map_err(|e| AppError::auth_error(e.to_string()))?;

        if token.access_token.trim().is_empty() {
            return Err(AppError::auth_error("token endpoint returned an empty access token"));
        }

        let account_id = token
            .account_id
            .unwrap_or_else(|| creds.account_id.clone());
        info!("Acquired access token for account {account_id}");

        Ok(Credential::new(token.access_token, account_id, token.expires_at))
    }

    #[instrument(skip(self, credential))]
    async fn revoke(&self, credential: Credential) -> Result<(), AppError> {
        let url = build_kill_session_url(&self.account_service, credential.access_token());
        let log_url = build_kill_session_url(&self.account_service, "<redacted>");

        let request = self.client.delete(&url).bearer_auth(credential.access_token());
        send_checked(request, &log_url).await?;

        info!("Revoked access token for account {}", credential.account_id());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data_fetcher::api::http_client::create_test_http_client;
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_string_contains, header, header_exists, method, path},
    };

    fn create_mock_config(account_service: String) -> Config {
        let mut config = Config::from_vars([
            ("EPIC_CLIENT_ID", "c".repeat(32)),
            ("EPIC_CLIENT_SECRET", "s".repeat(32)),
            ("EPIC_ACCOUNT_ID", "a".repeat(32)),
            ("EPIC_DEVICE_ID", "d".repeat(32)),
            ("EPIC_DEVICE_SECRET", "x".repeat(32)),
        ])
        .unwrap();
        config.endpoints.account_service = account_service;
        config
    }

    #[tokio::test]
    async fn test_acquire_sends_device_auth_grant() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/account/api/oauth/token"))
            .and(header_exists("authorization"))
            .and(body_string_contains("grant_type=device_auth"))
            .and(body_string_contains(format!("device_id={}", "d".repeat(32))))
            .and(body_string_contains("token_type=eg1"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "eg1~token",
                "expires_at": "2024-05-01T12:00:00.000Z",
                "account_id": "a".repeat(32)
            })))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider =
            DeviceAuthProvider::new(create_test_http_client(), &create_mock_config(mock_server.uri()));
        let credential = provider.acquire().await.unwrap();

        assert_eq!(credential.access_token(), "eg1~token");
        assert_eq!(credential.account_id(), "a".repeat(32));
        assert!(credential.expires_at().is_some());
    }

    #[tokio::test]
    async fn test_acquire_rejected_grant_is_auth_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/account/api/oauth/token"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "errorCode": "errors.com.epicgames.account.invalid_account_credentials"
            })))
            .mount(&mock_server)
            .await;

        let provider =
            DeviceAuthProvider::new(create_test_http_client(), &create_mock_config(mock_server.uri()));
        let result = provider.acquire().await;

        assert!(matches!(result, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_acquire_empty_body_is_auth_error() {
        let mock_server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&mock_server)
            .await;

        let provider =
            DeviceAuthProvider::new(create_test_http_client(), &create_mock_config(mock_server.uri()));
        assert!(matches!(provider.acquire().await, Err(AppError::Auth(_))));
    }

    #[tokio::test]
    async fn test_revoke_kills_session() {
        let mock_server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/account/api/oauth/sessions/kill/eg1~token"))
            .and(header("authorization", "Bearer eg1~token"))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&mock_server)
            .await;

        let provider =
            DeviceAuthProvider::new(create_test_http_client(), &create_mock_config(mock_server.uri()));
        let credential = Credential::new("eg1~token", "a".repeat(32), None);

        provider.revoke(credential).await.unwrap();
    }

    #[tokio::test]
    async fn test_revoke_failure_is_reported() {
        let mock_server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(500))
            .mount(&mock_server)
            .await;

        let provider =
            DeviceAuthProvider::new(create_test_http_client(), &create_mock_config(mock_server.uri()));
        let result = provider
            .revoke(Credential::new("eg1~token", "acc", None))
            .await;

        let err = result.unwrap_err();
        assert!(matches!(err, AppError::ApiServerError { status: 500, .. }));
        assert!(!err.to_string().contains("eg1~token"));
    }
}
