//! HTTP client for the Notion REST API.
//!
//! Handles bearer authentication, the `Notion-Version` header, timeouts,
//! exponential backoff retry, and mapping of error envelopes to `NmError`.

use std::time::Duration;

use reqwest::header::RETRY_AFTER;
use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use nm_core::config::NotionConfig;
use nm_core::error::{NmError, NmResult};

use crate::response::ApiErrorBody;

/// Retry configuration for HTTP requests.
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts.
    pub max_retries: u32,
    /// Base delay between retries (doubles each attempt).
    pub base_delay: Duration,
    /// Maximum delay cap.
    pub max_delay: Duration,
    /// HTTP status codes that trigger a retry.
    pub retryable_statuses: Vec<u16>,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(8),
            retryable_statuses: vec![429, 502, 503, 504],
        }
    }
}

/// HTTP client for communicating with Notion.
///
/// Wraps reqwest::Client with authentication, header injection, retry
/// logic, and error handling.
#[derive(Clone)]
pub struct ApiClient {
    inner: Client,
    /// API root without trailing slash (e.g. "https://api.notion.com/v1").
    base_url: String,
    /// Integration token sent as a bearer credential.
    token: String,
    /// Value of the `Notion-Version` header.
    notion_version: String,
    /// Default request timeout.
    timeout: Duration,
    /// Retry configuration.
    retry_config: RetryConfig,
}

impl ApiClient {
    /// Create a new ApiClient from the Notion configuration.
    pub fn new(config: &NotionConfig) -> NmResult<Self> {
        if config.token.trim().is_empty() {
            return Err(NmError::MissingConfig("notion.token".into()));
        }

        let timeout = Duration::from_millis(config.api_timeout_ms);
        let inner = Client::builder()
            .timeout(timeout)
            .connect_timeout(Duration::from_secs(15))
            .user_agent(format!(
                "{}/{}",
                nm_core::constants::APP_NAME,
                nm_core::constants::APP_VERSION
            ))
            .build()
            .map_err(|e| NmError::Http(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            inner,
            base_url: config.base_url.trim().trim_end_matches('/').to_string(),
            token: config.token.trim().to_string(),
            notion_version: config.notion_version.clone(),
            timeout,
            retry_config: RetryConfig::default(),
        })
    }

    /// Set custom retry configuration.
    pub fn with_retry_config(mut self, config: RetryConfig) -> Self {
        self.retry_config = config;
        self
    }

    /// Get the API root URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Build the full URL for an API path.
    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Internal: build a request for the given method, URL, and optional JSON body.
    fn build_request(
        &self,
        method: Method,
        url: &str,
        body: Option<&serde_json::Value>,
    ) -> RequestBuilder {
        let mut builder = self
            .inner
            .request(method, url)
            .timeout(self.timeout)
            .bearer_auth(&self.token)
            .header("Notion-Version", &self.notion_version);
        if let Some(b) = body {
            builder = builder.json(b);
        }
        builder
    }

    /// Execute a request with exponential backoff retry.
    async fn request_with_retry(
        &self,
        method: Method,
        path: &str,
        body: Option<&serde_json::Value>,
    ) -> NmResult<Response> {
        let url = self.url(path);
        debug!("{} {}", method, path);

        let mut last_error: Option<NmError> = None;
        let mut server_delay: Option<Duration> = None;

        for attempt in 0..=self.retry_config.max_retries {
            if attempt > 0 {
                let delay = server_delay
                    .take()
                    .unwrap_or_else(|| self.calculate_retry_delay(attempt - 1));
                warn!(
                    "retrying {} {} (attempt {}/{}) after {:.1}s",
                    method,
                    path,
                    attempt + 1,
                    self.retry_config.max_retries + 1,
                    delay.as_secs_f64()
                );
                tokio::time::sleep(delay).await;
            }

            let builder = self.build_request(method.clone(), &url, body);

            match builder.send().await {
                Ok(response) => {
                    let status = response.status();

                    if self
                        .retry_config
                        .retryable_statuses
                        .contains(&status.as_u16())
                        && attempt < self.retry_config.max_retries
                    {
                        warn!("retryable status {} from {}", status.as_u16(), path);
                        server_delay = retry_after(&response, self.retry_config.max_delay);
                        last_error = Some(Self::check_status(response).await.err().unwrap_or_else(
                            || NmError::Http(format!("retryable status {status}")),
                        ));
                        continue;
                    }

                    return Self::check_status(response).await;
                }
                Err(e) => {
                    let is_retryable = e.is_timeout() || e.is_connect();
                    let err = Self::classify_error(e);

                    if is_retryable && attempt < self.retry_config.max_retries {
                        warn!("retryable error on {}: {}", path, err);
                        last_error = Some(err);
                        continue;
                    }

                    return Err(err);
                }
            }
        }

        Err(last_error.unwrap_or_else(|| NmError::Http("max retries exceeded".into())))
    }

    /// Calculate retry delay with exponential backoff.
    fn calculate_retry_delay(&self, attempt: u32) -> Duration {
        let base_ms = self.retry_config.base_delay.as_millis() as u64;
        let delay_ms = base_ms.saturating_mul(1u64 << attempt.min(32));
        let max_ms = self.retry_config.max_delay.as_millis() as u64;
        Duration::from_millis(delay_ms.min(max_ms))
    }

    // --- Public HTTP methods ---

    /// Execute a GET request with automatic retry.
    pub async fn get(&self, path: &str) -> NmResult<Response> {
        self.request_with_retry(Method::GET, path, None).await
    }

    /// Execute a POST request with a JSON body.
    pub async fn post(&self, path: &str, body: &serde_json::Value) -> NmResult<Response> {
        self.request_with_retry(Method::POST, path, Some(body)).await
    }

    /// Execute a PATCH request with a JSON body.
    pub async fn patch(&self, path: &str, body: &serde_json::Value) -> NmResult<Response> {
        self.request_with_retry(Method::PATCH, path, Some(body)).await
    }

    // --- Response helpers ---

    /// Deserialize a response body.
    pub async fn parse_response<T: DeserializeOwned>(response: Response) -> NmResult<T> {
        response
            .json::<T>()
            .await
            .map_err(|e| NmError::Serialization(format!("failed to parse response: {e}")))
    }

    /// Convenience: GET + parse.
    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> NmResult<T> {
        let resp = self.get(path).await?;
        Self::parse_response(resp).await
    }

    /// Convenience: POST + parse.
    pub async fn post_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> NmResult<T> {
        let resp = self.post(path, body).await?;
        Self::parse_response(resp).await
    }

    /// Convenience: PATCH + parse.
    pub async fn patch_json<T: DeserializeOwned>(
        &self,
        path: &str,
        body: &serde_json::Value,
    ) -> NmResult<T> {
        let resp = self.patch(path, body).await?;
        Self::parse_response(resp).await
    }

    /// Check the HTTP status code and convert to NmError if needed.
    async fn check_status(response: Response) -> NmResult<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body))
    }

    /// Classify a reqwest error into an NmError variant.
    fn classify_error(e: reqwest::Error) -> NmError {
        if e.is_timeout() {
            NmError::Timeout(e.to_string())
        } else if e.is_connect() {
            NmError::Http(format!("connection failed: {e}"))
        } else {
            NmError::Http(e.to_string())
        }
    }
}

/// Map a non-success status and its body to an error.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> NmError {
    let envelope: Option<ApiErrorBody> = serde_json::from_str(body).ok();
    let message = envelope
        .as_ref()
        .map(|e| e.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.to_string());

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => NmError::AuthFailed(message),
        StatusCode::NOT_FOUND => NmError::NotFound(message),
        StatusCode::TOO_MANY_REQUESTS => NmError::RateLimited(message),
        _ => NmError::Api {
            status: status.as_u16(),
            code: envelope
                .map(|e| e.code)
                .unwrap_or_else(|| "unknown".to_string()),
            message,
        },
    }
}

/// Delay from a `Retry-After` header, if present and numeric, capped at `max`.
fn retry_after(response: &Response, max: Duration) -> Option<Duration> {
    response
        .headers()
        .get(RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| parse_retry_after(v, max))
}

fn parse_retry_after(value: &str, max: Duration) -> Option<Duration> {
    let secs = value.trim().parse::<f64>().ok()?;
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    Some(Duration::from_secs_f64(secs.min(max.as_secs_f64())))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> NotionConfig {
        NotionConfig {
            token: "secret_test".into(),
            base_url: "https://api.notion.com/v1/".into(),
            ..NotionConfig::default()
        }
    }

    #[test]
    fn test_missing_token_rejected() {
        let config = NotionConfig::default();
        assert!(matches!(
            ApiClient::new(&config),
            Err(NmError::MissingConfig(_))
        ));
    }

    #[test]
    fn test_url_building() {
        let client = ApiClient::new(&test_config()).unwrap();
        assert_eq!(client.base_url(), "https://api.notion.com/v1");
        assert_eq!(
            client.url("/databases/abc/query"),
            "https://api.notion.com/v1/databases/abc/query"
        );
        assert_eq!(client.url("pages"), "https://api.notion.com/v1/pages");
    }

    #[test]
    fn test_retry_delay_calculation() {
        let client = ApiClient::new(&test_config()).unwrap();
        assert_eq!(client.calculate_retry_delay(0), Duration::from_secs(1));
        assert_eq!(client.calculate_retry_delay(1), Duration::from_secs(2));
        assert_eq!(client.calculate_retry_delay(2), Duration::from_secs(4));
    }

    #[test]
    fn test_retry_delay_capped() {
        let client = ApiClient::new(&test_config()).unwrap();
        assert_eq!(client.calculate_retry_delay(10), Duration::from_secs(8));
        assert_eq!(client.calculate_retry_delay(100), Duration::from_secs(8));
    }

    #[test]
    fn test_parse_retry_after() {
        let cap = Duration::from_secs(8);
        assert_eq!(parse_retry_after("2", cap), Some(Duration::from_secs(2)));
        assert_eq!(parse_retry_after(" 0.5 ", cap), Some(Duration::from_millis(500)));
        assert_eq!(parse_retry_after("1e30", cap), Some(cap));
        assert_eq!(parse_retry_after("-1", cap), None);
        assert_eq!(parse_retry_after("NaN", cap), None);
        assert_eq!(parse_retry_after("inf", cap), None);
        assert_eq!(parse_retry_after("Wed, 21 Oct 2015 07:28:00 GMT", cap), None);
    }

    #[test]
    fn test_classify_auth_and_not_found() {
        let body = r#"{"object":"error","status":401,"code":"unauthorized","message":"API token is invalid."}"#;
        match classify_status(StatusCode::UNAUTHORIZED, body) {
            NmError::AuthFailed(m) => assert_eq!(m, "API token is invalid."),
            other => panic!("unexpected: {other}"),
        }
        assert!(matches!(
            classify_status(StatusCode::NOT_FOUND, ""),
            NmError::NotFound(_)
        ));
    }

    #[test]
    fn test_classify_validation_error() {
        let body = r#"{"object":"error","status":400,"code":"validation_error","message":"body.filter is invalid"}"#;
        match classify_status(StatusCode::BAD_REQUEST, body) {
            NmError::Api { status, code, message } => {
                assert_eq!(status, 400);
                assert_eq!(code, "validation_error");
                assert_eq!(message, "body.filter is invalid");
            }
            other => panic!("unexpected: {other}"),
        }
    }

    #[test]
    fn test_classify_non_json_body() {
        match classify_status(StatusCode::BAD_GATEWAY, "<html>bad gateway</html>") {
            NmError::Api { status, code, .. } => {
                assert_eq!(status, 502);
                assert_eq!(code, "unknown");
            }
            other => panic!("unexpected: {other}"),
        }
    }
}
