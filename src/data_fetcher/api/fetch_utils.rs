//! Generic HTTP request helpers with status classification and error handling

use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, error, instrument};

use crate::error::AppError;

/// Sends a request and parses the JSON body.
///
/// Upstream fetches are attempted once. Every way a response can be unusable
/// (transport error, non-success status, empty body, non-JSON body, JSON of the
/// wrong shape) is turned into a specific [`AppError`].
///
/// # Arguments
/// * `request` - Prepared request, including any auth headers
/// * `url` - URL the request targets, used for logging and errors
///
/// # Returns
/// * `Result<T, AppError>` - Parsed response data or error
#[instrument(skip(request))]
pub(super) async fn fetch_json<T: DeserializeOwned>(
    request: RequestBuilder,
    url: &str,
) -> Result<T, AppError> {
    let response = send_checked(request, url).await?;

    let response_text = match response.text().await {
        Ok(text) => text,
        Err(e) => {
            error!("Failed to read response text from URL {}: {}", url, e);
            return Err(AppError::ApiFetch(e));
        }
    };

    debug!("Response length: {} bytes", response_text.len());

    parse_body(&response_text, url)
}

/// Sends a request and fails on transport errors or non-success statuses.
#[instrument(skip(request))]
pub(super) async fn send_checked(request: RequestBuilder, url: &str) -> Result<Response, AppError> {
    let response = match request.send().await {
        Ok(resp) => resp,
        Err(e) => {
            error!("Request failed for URL {}: {}", url, e);
            return Err(if e.is_timeout() {
                AppError::network_timeout(url)
            } else if e.is_connect() {
                AppError::network_connection(url, e.to_string())
            } else {
                AppError::ApiFetch(e)
            });
        }
    };

    let status = response.status();
    debug!("Response status: {status}");

    if !status.is_success() {
        let status_code = status.as_u16();
        let reason = status.canonical_reason().unwrap_or("Unknown error");

        error!("HTTP {} - {} (URL: {})", status_code, reason, url);

        return Err(match status_code {
            404 => AppError::api_not_found(url),
            429 => AppError::api_rate_limit(reason, url),
            400..=499 => AppError::api_client_error(status_code, reason, url),
            502 | 503 => AppError::api_service_unavailable(status_code, reason, url),
            _ => AppError::api_server_error(status_code, reason, url),
        });
    }

    Ok(response)
}

/// Parses a response body, classifying failures the way the API reports them.
pub(super) fn parse_body<T: DeserializeOwned>(response_text: &str, url: &str) -> Result<T, AppError> {
    match serde_json::from_str::<T>(response_text) {
        Ok(parsed) => Ok(parsed),
        Err(e) => {
            error!("Failed to parse API response: {} (URL: {})", e, url);
            error!(
                "Response text (first 200 chars): {}",
                &response_text.chars().take(200).collect::<String>()
            );

            let trimmed = response_text.trim_start();
            if trimmed.is_empty() {
                Err(AppError::api_no_data("Response body is empty", url))
            } else if !trimmed.starts_with('{') && !trimmed.starts_with('[') {
                Err(AppError::api_malformed_json("Response is not valid JSON", url))
            } else {
                Err(AppError::api_unexpected_structure(e.to_string(), url))
            }
        }
    }
}
