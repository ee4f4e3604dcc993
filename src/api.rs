//! API client for paper data
//!
//! Uses shared types from galaxy-types for API responses and implements
//! [`PaperSource`] so a navigator can fetch through it directly.

use std::time::Duration;

use async_trait::async_trait;
use galaxy_core::{FetchError, PaperSource};
use galaxy_types::{ApiErrorBody, Breadth, PaperSet};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Errors building an [`ApiClient`].
#[derive(Debug, thiserror::Error)]
pub enum ApiClientError {
    #[error("invalid base url: {0}")]
    InvalidBaseUrl(#[from] url::ParseError),

    #[error("base url cannot carry a path: {0}")]
    CannotBeABase(String),

    #[error("failed to build http client: {0}")]
    Http(#[from] reqwest::Error),
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: Url,
    http: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, ApiClientError> {
        let base_url = Url::parse(base_url)?;
        if base_url.cannot_be_a_base() {
            return Err(ApiClientError::CannotBeABase(base_url.to_string()));
        }
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { base_url, http })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `{base}/seg/seg/...` with each segment percent-encoded.
    fn endpoint(&self, segments: &[&str], query: Option<(&str, &str)>) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        if let Some((key, value)) = query {
            url.query_pairs_mut().append_pair(key, value);
        }
        url
    }

    pub async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!(%url, "GET");
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<ApiErrorBody>(&body)
                .ok()
                .and_then(|b| b.message);
            return Err(FetchError::from_status(status.as_u16(), message));
        }

        response
            .json::<T>()
            .await
            .map_err(|e| FetchError::Decode(e.to_string()))
    }

    /// URL of a field's root paper set.
    pub fn field_papers_url(&self, field: &str, breadth: Breadth) -> Url {
        let query = breadth.is_broad().then_some(("fallback", "true"));
        self.endpoint(&["api", "fields", field, "papers"], query)
    }

    /// URL of a paper's references.
    pub fn references_url(&self, paper_id: &str, breadth: Breadth) -> Url {
        let query = breadth.is_broad().then_some(("broaden", "true"));
        self.endpoint(&["api", "papers", paper_id, "references"], query)
    }
}

#[async_trait]
impl PaperSource for ApiClient {
    async fn field_papers(&self, field: &str, breadth: Breadth) -> Result<PaperSet, FetchError> {
        self.get(self.field_papers_url(field, breadth)).await
    }

    async fn references(
        &self,
        paper_id: &str,
        breadth: Breadth,
    ) -> Result<PaperSet, FetchError> {
        self.get(self.references_url(paper_id, breadth)).await
    }
}
