//! reqwest-backed implementation of the preferences API.

use std::time::Duration;

use reqwest::RequestBuilder;

use super::{ApiError, ApiResponse, ApiResult, PreferenceApi, SearchPreferences, UpsertPreference};
use crate::config::ClientConfig;
use crate::util::{compact_text, is_http_url};

const UPSERT_ROUTE: &str = "/api/preferences/upsert";
const DELETE_ROUTE: &str = "/api/preferences/delete";
const SEARCH_ROUTE: &str = "/api/preferences/search";
const LIST_ROUTE: &str = "/api/preferences/list";

/// HTTP client for the preferences endpoints of the resume backend.
#[derive(Debug, Clone)]
pub struct HttpPreferenceApi {
    base_url: String,
    client: reqwest::Client,
}

impl HttpPreferenceApi {
    /// Builds a client for an explicit API base URL.
    pub fn new(base_url: impl Into<String>) -> ApiResult<Self> {
        Self::with_timeout(base_url, None)
    }

    /// Builds a client whose requests give up after `timeout`.
    pub fn with_timeout(
        base_url: impl Into<String>,
        timeout: Option<Duration>,
    ) -> ApiResult<Self> {
        let base_url = normalize_base_url(&base_url.into())?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        Ok(Self {
            base_url,
            client: builder.build()?,
        })
    }

    pub fn from_config(config: &ClientConfig) -> ApiResult<Self> {
        Self::with_timeout(&config.api_base_url, config.request_timeout())
    }

    /// Returns the base URL this client was configured with.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn send(&self, request: RequestBuilder) -> ApiResult<ApiResponse> {
        let response = request.header("Accept", "application/json").send().await?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|error| {
                ApiError::Transport(format!("failed to read response body: {error}"))
            })?;
        if !(200..300).contains(&status) {
            tracing::debug!(status, body = %compact_text(&body), "preferences API returned an error");
        }
        Ok(ApiResponse { status, body })
    }
}

impl PreferenceApi for HttpPreferenceApi {
    async fn upsert(&self, request: &UpsertPreference) -> ApiResult<ApiResponse> {
        self.send(
            self.client
                .post(format!("{}{UPSERT_ROUTE}", self.base_url))
                .json(request),
        )
        .await
    }

    async fn delete(&self, id: &str) -> ApiResult<ApiResponse> {
        let url = format!(
            "{}{DELETE_ROUTE}/{}",
            self.base_url,
            urlencoding::encode(id)
        );
        self.send(self.client.delete(url)).await
    }

    async fn search(&self, request: &SearchPreferences) -> ApiResult<ApiResponse> {
        self.send(
            self.client
                .post(format!("{}{SEARCH_ROUTE}", self.base_url))
                .json(request),
        )
        .await
    }

    async fn list(&self, user_id: Option<&str>) -> ApiResult<ApiResponse> {
        let mut request = self.client.get(format!("{}{LIST_ROUTE}", self.base_url));
        if let Some(user_id) = user_id {
            request = request.query(&[("userId", user_id)]);
        }
        self.send(request).await
    }
}

fn normalize_base_url(raw: &str) -> ApiResult<String> {
    let base = raw.trim().trim_end_matches('/').to_string();
    if base.is_empty() {
        return Err(ApiError::InvalidConfiguration(
            "API base URL must not be empty".to_string(),
        ));
    }
    if !is_http_url(&base) {
        return Err(ApiError::InvalidConfiguration(
            "API base URL must include http:// or https://".to_string(),
        ));
    }
    Ok(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_base_url_rejects_invalid_values() {
        assert!(normalize_base_url("").is_err());
        assert!(normalize_base_url("example.com").is_err());
    }

    #[test]
    fn normalize_base_url_trims_trailing_slash() {
        assert_eq!(
            normalize_base_url("https://resume.example.com/").unwrap(),
            "https://resume.example.com"
        );
    }

    #[test]
    fn client_keeps_normalized_base_url() {
        let api = HttpPreferenceApi::new(" http://localhost:8787/ ").unwrap();
        assert_eq!(api.base_url(), "http://localhost:8787");
    }
}
