use std::fmt;

use reqwest::Client;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::config::Config;
use crate::error::ApiError;

use super::payload::{LookupEnvelope, LookupOutcome, SearchEnvelope, SearchOutcome};

/// Fixed title term used for the trending slice.
pub const TRENDING_TERM: &str = "movie";
/// Release year used for the trending slice.
pub const TRENDING_YEAR: &str = "2023";

/// Read-only client for the three request shapes the app needs. Cheap to
/// clone; clones share the underlying connection pool.
#[derive(Clone)]
pub struct OmdbClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl OmdbClient {
    /// Build a client from `config`. The request timeout covers the whole
    /// exchange, and an elapsed timeout surfaces as [`ApiError::Transport`].
    pub fn new(config: &Config) -> Result<Self, ApiError> {
        let http = Client::builder()
            .timeout(config.request_timeout)
            .user_agent(concat!("movieverse/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    /// Default catalog slice shown when no search is active.
    pub async fn trending(&self) -> Result<SearchOutcome, ApiError> {
        let envelope: SearchEnvelope = self
            .get(&[("s", TRENDING_TERM), ("type", "movie"), ("y", TRENDING_YEAR)])
            .await?;
        Ok(envelope.into())
    }

    /// Title search. The query is URL-encoded by the request builder.
    pub async fn search(&self, query: &str) -> Result<SearchOutcome, ApiError> {
        let envelope: SearchEnvelope = self.get(&[("s", query)]).await?;
        Ok(envelope.into())
    }

    /// Full record for one title, with the untruncated plot.
    pub async fn lookup(&self, id: &str) -> Result<LookupOutcome, ApiError> {
        let envelope: LookupEnvelope = self.get(&[("i", id), ("plot", "full")]).await?;
        Ok(envelope.into())
    }

    async fn get<T: DeserializeOwned>(&self, params: &[(&str, &str)]) -> Result<T, ApiError> {
        debug!(?params, "movie database request");

        // Strip the URL from transport errors: it carries the API key.
        let response = self
            .http
            .get(&self.base_url)
            .query(&[("apikey", self.api_key.as_str())])
            .query(params)
            .send()
            .await
            .map_err(|err| ApiError::Transport(err.without_url()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ApiError::Status(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|err| ApiError::Transport(err.without_url()))?;
        Ok(serde_json::from_slice(&body)?)
    }
}

impl fmt::Debug for OmdbClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OmdbClient")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}
