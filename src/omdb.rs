use crate::config::Config;
use crate::errors::{CategorizedError, ErrorKind};
use crate::models::{MovieDetail, MovieSummary};
use crate::pagination;
use crate::retry::{retry_with_backoff, RetryPolicy};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

const SEARCH_TYPE: &str = "movie";

#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    pub movies: Vec<MovieSummary>,
    pub total_results: u32,
    pub total_pages: u32,
}

#[async_trait]
pub trait MovieDirectory: Send + Sync {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, CategorizedError>;
    async fn details(&self, id: &str) -> Result<MovieDetail, CategorizedError>;
}

#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

/// Single HTTP GET, no retries. Errors mean the request never produced a response.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<RawResponse>;
}

#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: Client,
}

impl ReqwestTransport {
    pub fn new() -> Result<Self> {
        let user_agent = format!("cinesearch/{}", env!("CARGO_PKG_VERSION"));
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .user_agent(user_agent)
            .build()
            .context("Failed to build OMDb HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    async fn fetch(&self, url: &str) -> Result<RawResponse> {
        let res = self.client.get(url).send().await.context("request failed")?;
        let status = res.status().as_u16();
        let body = res.text().await.context("reading body failed")?;
        Ok(RawResponse { status, body })
    }
}

#[derive(Clone)]
pub struct OmdbClient {
    transport: Arc<dyn Transport>,
    api_key: String,
    base_url: String,
    timeout: Duration,
    retry: RetryPolicy,
}

impl OmdbClient {
    pub fn from_config(config: &Config) -> Result<Self> {
        let transport = Arc::new(ReqwestTransport::new()?);
        Self::with_transport(transport, config)
    }

    pub fn with_transport(transport: Arc<dyn Transport>, config: &Config) -> Result<Self> {
        Ok(Self {
            transport,
            api_key: config.require_api_key()?.to_string(),
            base_url: config.base_url.clone(),
            timeout: config.request_timeout,
            retry: config.retry.clone(),
        })
    }

    pub fn search_url(&self, query: &str, page: u32) -> String {
        format!(
            "{}?apikey={}&s={}&type={SEARCH_TYPE}&page={page}",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(query)
        )
    }

    pub fn details_url(&self, id: &str) -> String {
        format!(
            "{}?apikey={}&i={}&plot=full",
            self.base_url,
            urlencoding::encode(&self.api_key),
            urlencoding::encode(id)
        )
    }

    /// Fetch and decode with timeout and retry. Only network failures are retried.
    async fn get_json<T: for<'de> Deserialize<'de>>(
        &self,
        url: &str,
    ) -> Result<T, CategorizedError> {
        let body = retry_with_backoff(
            || self.attempt(url),
            &self.retry,
            |e: &CategorizedError| e.kind == ErrorKind::Network,
        )
        .await?;
        parse_envelope(&body)
    }

    async fn attempt(&self, url: &str) -> Result<String, CategorizedError> {
        let res = match tokio::time::timeout(self.timeout, self.transport.fetch(url)).await {
            Ok(Ok(res)) => res,
            Ok(Err(e)) => {
                warn!("OMDb request failed: {:#}", e);
                return Err(CategorizedError::network(format!("{e:#}")));
            }
            Err(_) => {
                warn!("OMDb request timed out after {:?}", self.timeout);
                return Err(CategorizedError::timeout(self.timeout));
            }
        };
        if res.status >= 500 && serde_json::from_str::<Envelope>(&res.body).is_err() {
            return Err(CategorizedError::network(format!("HTTP {}", res.status)));
        }
        Ok(res.body)
    }
}

#[async_trait]
impl MovieDirectory for OmdbClient {
    async fn search(&self, query: &str, page: u32) -> Result<SearchPage, CategorizedError> {
        #[derive(Deserialize)]
        struct SearchResponse {
            #[serde(rename = "Search", default)]
            search: Vec<MovieSummary>,
            #[serde(rename = "totalResults", default)]
            total_results: Option<String>,
        }

        debug!("OMDb search '{}' page {}", query, page);
        let data: SearchResponse = self.get_json(&self.search_url(query, page)).await?;
        let total_results = data
            .total_results
            .as_deref()
            .and_then(|t| t.trim().parse::<u32>().ok())
            .unwrap_or(0);
        Ok(SearchPage {
            movies: data.search,
            total_results,
            total_pages: pagination::total_pages(total_results),
        })
    }

    async fn details(&self, id: &str) -> Result<MovieDetail, CategorizedError> {
        debug!("OMDb details '{}'", id);
        self.get_json(&self.details_url(id)).await
    }
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(rename = "Response")]
    response: Option<String>,
    #[serde(rename = "Error")]
    error: Option<String>,
}

fn parse_envelope<T: for<'de> Deserialize<'de>>(body: &str) -> Result<T, CategorizedError> {
    let envelope: Envelope = serde_json::from_str(body).map_err(CategorizedError::unexpected)?;
    let failed = envelope
        .response
        .as_deref()
        .is_some_and(|r| r.eq_ignore_ascii_case("false"));
    if failed {
        let text = envelope.error.unwrap_or_default();
        debug!("OMDb reported error: {}", text);
        return Err(CategorizedError::from_service_text(&text));
    }
    serde_json::from_str(body).map_err(CategorizedError::unexpected)
}
