use std::time::Duration;

use futures_util::StreamExt;
use news_logging::news_debug;
use reqwest::header::{ACCEPT, CONTENT_TYPE};

use crate::types::ErrorBody;
use crate::{FailureKind, FetchError, SearchRequest, SearchResponse};

#[derive(Debug, Clone)]
pub struct SearchSettings {
    pub base_url: String,
    pub endpoint_path: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub redirect_limit: usize,
    pub max_bytes: u64,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            base_url: "https://news-dash-api.vercel.app".to_string(),
            endpoint_path: "/api/news".to_string(),
            connect_timeout: Duration::from_secs(10),
            // Export pages can hold the whole result set.
            request_timeout: Duration::from_secs(60),
            redirect_limit: 5,
            max_bytes: 32 * 1024 * 1024,
        }
    }
}

impl SearchSettings {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Self::default()
        }
    }

    pub fn endpoint(&self) -> Result<reqwest::Url, FetchError> {
        reqwest::Url::parse(&self.base_url)
            .and_then(|base| base.join(&self.endpoint_path))
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))
    }
}

#[async_trait::async_trait]
pub trait SearchClient: Send + Sync {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestSearchClient {
    settings: SearchSettings,
}

impl ReqwestSearchClient {
    pub fn new(settings: SearchSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &SearchSettings {
        &self.settings
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .redirect(reqwest::redirect::Policy::limited(self.settings.redirect_limit))
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))
    }

    async fn read_body(&self, response: reqwest::Response) -> Result<Vec<u8>, FetchError> {
        let max_bytes = self.settings.max_bytes;
        if let Some(content_len) = response.content_length() {
            if content_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }
        Ok(bytes)
    }
}

#[async_trait::async_trait]
impl SearchClient for ReqwestSearchClient {
    async fn search(&self, request: &SearchRequest) -> Result<SearchResponse, FetchError> {
        let endpoint = self.settings.endpoint()?;
        let body = serde_json::to_vec(request)
            .map_err(|err| FetchError::new(FailureKind::Encoding, err.to_string()))?;
        let client = self.build_client()?;

        news_debug!(
            "POST {} page={} page_size={}",
            endpoint,
            request.page,
            request.page_size
        );
        let response = client
            .post(endpoint)
            .header(CONTENT_TYPE, "application/json")
            .header(ACCEPT, "application/json")
            .body(body)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = self.read_body(response).await?;

        if !status.is_success() {
            return Err(
                FetchError::new(FailureKind::HttpStatus(status.as_u16()), status.to_string())
                    .with_server_message(server_message(&bytes)),
            );
        }

        serde_json::from_slice::<SearchResponse>(&bytes).map_err(|err| {
            FetchError::new(FailureKind::InvalidResponse, err.to_string())
                .with_server_message(server_message(&bytes))
        })
    }
}

fn server_message(bytes: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorBody>(bytes)
        .ok()
        .and_then(|body| body.error)
        .filter(|msg| !msg.trim().is_empty())
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_redirect() {
        return FetchError::new(FailureKind::RedirectLimitExceeded, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
