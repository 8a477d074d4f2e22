//! Shared HTTP transport for the Gemini endpoints.

use std::time::Duration;

use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use super::error::LlmError;

/// Configuration for HTTP client resilience.
///
/// Retries are off by default; set `max_retries` to opt in to backoff on
/// 429, 5xx and transport errors.
#[derive(Debug, Clone)]
pub struct HttpClientConfig {
    pub timeout: Duration,
    /// Extra attempts after the first one. Zero sends every request exactly once.
    pub max_retries: u32,
    /// Base duration for exponential backoff
    pub initial_retry_delay: Duration,
    /// Cap on the backoff duration
    pub max_retry_delay: Duration,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(120),
            max_retries: 0,
            initial_retry_delay: Duration::from_millis(500),
            max_retry_delay: Duration::from_secs(10),
        }
    }
}

/// File bytes and metadata for a multipart upload.
#[derive(Debug, Clone)]
pub struct MultipartUpload {
    pub metadata: serde_json::Value,
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl MultipartUpload {
    fn to_form(&self) -> Result<reqwest::multipart::Form, LlmError> {
        let metadata = reqwest::multipart::Part::text(self.metadata.to_string())
            .mime_str("application/json")
            .map_err(|e| LlmError::ProviderConfiguration(format!("Invalid metadata part: {e}")))?;

        let file = reqwest::multipart::Part::bytes(self.bytes.clone())
            .file_name(self.file_name.clone())
            .mime_str(&self.mime_type)
            .map_err(|e| {
                LlmError::ProviderConfiguration(format!(
                    "Invalid MIME type '{}': {e}",
                    self.mime_type
                ))
            })?;

        Ok(reqwest::multipart::Form::new()
            .part("metadata", metadata)
            .part("file", file))
    }
}

/// HTTP client with optional retry logic and exponential backoff.
pub struct HttpClient {
    client: reqwest::Client,
    config: HttpClientConfig,
}

impl HttpClient {
    pub fn new(config: HttpClientConfig, user_agent: Option<&str>) -> Result<Self, LlmError> {
        let default_ua = format!("gemini-farm/{}", env!("CARGO_PKG_VERSION"));
        let ua = user_agent.unwrap_or(&default_ua);

        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(ua)
            .build()
            .map_err(|e| {
                LlmError::ProviderConfiguration(format!("Failed to build reqwest client: {e}"))
            })?;

        Ok(Self { client, config })
    }

    /// POST a JSON body and decode a JSON response.
    #[tracing::instrument(
        name = "http_post_json",
        skip(self, headers, body),
        fields(url = %url),
        err
    )]
    pub async fn post_json<Req, Res>(
        &self,
        url: &str,
        headers: &[(String, String)],
        body: &Req,
    ) -> Result<Res, LlmError>
    where
        Req: Serialize,
        Res: DeserializeOwned,
    {
        let body_value = serde_json::to_value(body).map_err(|e| LlmError::Parse {
            message: "Failed to serialize request".to_string(),
            source: Box::new(e),
        })?;

        self.send_with_retry(|| Ok(self.client.post(url).json(&body_value)), headers)
            .await
    }

    /// POST a multipart form (JSON metadata part plus file part).
    #[tracing::instrument(
        name = "http_post_multipart",
        skip(self, headers, upload),
        fields(url = %url, file = %upload.file_name, bytes = upload.bytes.len()),
        err
    )]
    pub async fn post_multipart<Res>(
        &self,
        url: &str,
        headers: &[(String, String)],
        upload: &MultipartUpload,
    ) -> Result<Res, LlmError>
    where
        Res: DeserializeOwned,
    {
        // The form is consumed by send, so it is rebuilt for every attempt.
        self.send_with_retry(
            || Ok(self.client.post(url).multipart(upload.to_form()?)),
            headers,
        )
        .await
    }

    /// Retries on 429 (rate limit), 5xx and transport errors while attempts remain.
    /// Fails immediately on other 4xx errors.
    async fn send_with_retry<F, Res>(
        &self,
        build: F,
        headers: &[(String, String)],
    ) -> Result<Res, LlmError>
    where
        F: Fn() -> Result<reqwest::RequestBuilder, LlmError>,
        Res: DeserializeOwned,
    {
        let mut last_error: Option<LlmError> = None;

        for attempt in 0..=self.config.max_retries {
            let mut req_builder = build()?;
            for (name, value) in headers {
                req_builder = req_builder.header(name, value);
            }

            match req_builder.send().await {
                Err(e) => {
                    warn!(attempt, error = %e, "HTTP request failed");
                    last_error = Some(LlmError::Network {
                        message: format!(
                            "Request failed (attempt {}/{})",
                            attempt + 1,
                            self.config.max_retries + 1
                        ),
                        source: Box::new(e),
                    });
                }
                Ok(res) => {
                    let status = res.status();

                    if status.is_success() {
                        debug!(status = %status, "HTTP request successful");

                        let response_text = res.text().await.map_err(|e| LlmError::Network {
                            message: "Failed to read response body".to_string(),
                            source: Box::new(e),
                        })?;

                        return serde_json::from_str(&response_text).map_err(|e| {
                            LlmError::Parse {
                                message: "Failed to parse API response".to_string(),
                                source: Box::new(e),
                            }
                        });
                    }

                    warn!(attempt, status = %status, "API returned error status");

                    let is_retryable = status == reqwest::StatusCode::TOO_MANY_REQUESTS
                        || status.is_server_error();
                    let error_text = res
                        .text()
                        .await
                        .unwrap_or_else(|_| "Unknown error".to_string());
                    let message = api_error_message(&error_text);

                    if !is_retryable {
                        return Err(LlmError::Api {
                            message,
                            status_code: Some(status.as_u16()),
                            source: None,
                        });
                    }

                    last_error = Some(LlmError::Api {
                        message,
                        status_code: Some(status.as_u16()),
                        source: None,
                    });
                }
            }

            if attempt < self.config.max_retries {
                tokio::time::sleep(self.retry_delay(attempt)).await;
            }
        }

        Err(last_error.unwrap_or_else(|| LlmError::Api {
            message: format!(
                "Request failed after max retries ({}) with unknown error",
                self.config.max_retries
            ),
            status_code: None,
            source: None,
        }))
    }

    fn retry_delay(&self, attempt: u32) -> Duration {
        let base_delay =
            self.config.initial_retry_delay.as_millis() as f64 * 2_f64.powi(attempt as i32);

        // +/- 10% jitter (0.9 to 1.1)
        let jitter_factor = rand::random::<f64>() * 0.2 + 0.9;
        let delay_ms = (base_delay * jitter_factor) as u64;

        Duration::from_millis(delay_ms).min(self.config.max_retry_delay)
    }
}

/// Pull `error.message` out of a Google API error body, falling back to the raw text.
fn api_error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("error")?
                .get("message")?
                .as_str()
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.to_string())
}
