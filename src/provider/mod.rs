//! Transport to the movie metadata provider (OMDb).
//!
//! `MetadataProvider` is the only network-facing seam in the crate. The real
//! implementation talks HTTP; `FakeProvider` serves canned bodies for tests.

use anyhow::Result;
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

use crate::config::{ApiKey, Config};

/// Transport-level failures. None of these reach the caller of a comparison:
/// the fetcher folds them into an absent result.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("response is not JSON: {0}")]
    InvalidJson(String),
}

pub trait MetadataProvider: Send + Sync {
    /// Fetch the raw provider payload for a title.
    fn fetch(&self, title: &str) -> Result<Value, ProviderError>;
}

/// OMDb client over blocking HTTP.
pub struct OmdbClient {
    endpoint: String,
    api_key: ApiKey,
    client: reqwest::blocking::Client,
}

impl OmdbClient {
    pub fn new(config: &Config, api_key: ApiKey) -> Result<Self> {
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(secs) = config.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        Ok(Self {
            endpoint: config.endpoint.clone(),
            api_key,
            client,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl MetadataProvider for OmdbClient {
    fn fetch(&self, title: &str) -> Result<Value, ProviderError> {
        debug!(title, endpoint = %self.endpoint, "querying provider");

        // The URL carries the api key, so it is stripped from every error.
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[("t", title), ("apikey", self.api_key.expose())])
            .send()
            .map_err(|e| ProviderError::Transport(e.without_url().to_string()))?;

        debug!(title, status = %response.status(), "provider responded");

        response.json::<Value>().map_err(|e| {
            if e.is_decode() {
                ProviderError::InvalidJson(e.without_url().to_string())
            } else {
                ProviderError::Transport(e.without_url().to_string())
            }
        })
    }
}

/// Provider with canned responses, keyed by the exact title requested.
///
/// Titles without a canned response get OMDb's not-found payload.
#[derive(Default)]
pub struct FakeProvider {
    responses: HashMap<String, Result<Value, ProviderError>>,
    requested: Mutex<Vec<String>>,
}

impl FakeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `title` with the given JSON body.
    pub fn with_movie(mut self, title: &str, body: Value) -> Self {
        self.responses.insert(title.to_string(), Ok(body));
        self
    }

    /// Answer `title` with a transport-level failure.
    pub fn with_error(mut self, title: &str, error: ProviderError) -> Self {
        self.responses.insert(title.to_string(), Err(error));
        self
    }

    /// Titles fetched so far, in call order.
    pub fn requested(&self) -> Vec<String> {
        self.requested
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .clone()
    }
}

impl MetadataProvider for FakeProvider {
    fn fetch(&self, title: &str) -> Result<Value, ProviderError> {
        self.requested
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(title.to_string());

        match self.responses.get(title) {
            Some(response) => response.clone(),
            None => Ok(json!({
                "Response": "False",
                "Error": "Movie not found!"
            })),
        }
    }
}
