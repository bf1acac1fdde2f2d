use std::time::Duration;

use livesearch_core::Story;
use serde::Deserialize;

use crate::{FetchError, FetchKey};

/// Base URL of the public story index.
pub const DEFAULT_ENDPOINT_BASE: &str = "http://hn.algolia.com/api/v1";

#[derive(Debug, Clone)]
pub struct FetchSettings {
    pub endpoint_base: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for FetchSettings {
    fn default() -> Self {
        Self {
            endpoint_base: DEFAULT_ENDPOINT_BASE.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// Wire shape of a search response. Anything without a `hits` array is
/// treated as malformed.
#[derive(Debug, Deserialize)]
struct SearchPage {
    hits: Vec<Story>,
}

/// Executes one search request. The pipeline only depends on this trait,
/// which keeps the network edge swappable in tests.
#[async_trait::async_trait]
pub trait StoryFetcher: Send + Sync {
    async fn fetch(&self, key: &FetchKey) -> Result<Vec<Story>, FetchError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestFetcher {
    settings: FetchSettings,
}

impl ReqwestFetcher {
    pub fn new(settings: FetchSettings) -> Self {
        Self { settings }
    }

    fn build_client(&self) -> Result<reqwest::Client, FetchError> {
        reqwest::Client::builder()
            .connect_timeout(self.settings.connect_timeout)
            .timeout(self.settings.request_timeout)
            .build()
            .map_err(|err| FetchError::Network(err.to_string()))
    }

    fn endpoint(&self, key: &FetchKey) -> Result<reqwest::Url, FetchError> {
        let raw = format!(
            "{}/{}",
            self.settings.endpoint_base.trim_end_matches('/'),
            key.subject.path_segment()
        );
        let mut url =
            reqwest::Url::parse(&raw).map_err(|err| FetchError::InvalidUrl(err.to_string()))?;
        // query_pairs_mut percent-encodes the user's raw text.
        url.query_pairs_mut().append_pair("query", &key.query);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl StoryFetcher for ReqwestFetcher {
    async fn fetch(&self, key: &FetchKey) -> Result<Vec<Story>, FetchError> {
        let url = self.endpoint(key)?;
        let client = self.build_client()?;

        let response = client.get(url).send().await.map_err(map_reqwest_error)?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = response.bytes().await.map_err(map_reqwest_error)?;
        let page: SearchPage = serde_json::from_slice(&body)
            .map_err(|err| FetchError::MalformedBody(err.to_string()))?;
        Ok(page.hits)
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::Timeout;
    }
    FetchError::Network(err.to_string())
}
