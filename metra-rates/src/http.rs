//! HTTP rate source
//!
//! Fetches `{ "<base>": { "<code>": rate } }` documents from a URL template
//! such as the fawazahmed0 currency API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde_json::Value as JsonValue;
use tracing::debug;

use crate::source::{parse_rate_payload, RateSource, RateTable};
use crate::RateSourceError;

/// Default URL template; `{base}` is replaced by the lower-cased base code
pub const DEFAULT_RATE_SOURCE_URL: &str =
    "https://cdn.jsdelivr.net/npm/@fawazahmed0/currency-api@latest/v1/currencies/{base}.json";

/// Default bound on a single fetch
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Rate source backed by an HTTP JSON endpoint
#[derive(Debug, Clone)]
pub struct HttpRateSource {
    url_template: String,
    client: Client,
}

impl HttpRateSource {
    pub fn new(url_template: &str, timeout: Duration) -> Result<Self, RateSourceError> {
        let client = Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(2)
            .build()?;

        Ok(Self {
            url_template: url_template.to_string(),
            client,
        })
    }

    /// Source using the default endpoint and timeout
    pub fn with_defaults() -> Result<Self, RateSourceError> {
        Self::new(DEFAULT_RATE_SOURCE_URL, DEFAULT_REQUEST_TIMEOUT)
    }

    pub fn url_for(&self, base: &str) -> String {
        self.url_template.replace("{base}", &base.to_lowercase())
    }
}

#[async_trait]
impl RateSource for HttpRateSource {
    async fn fetch_rates(&self, base: &str) -> Result<RateTable, RateSourceError> {
        let url = self.url_for(base);
        debug!(%url, "fetching rates");

        let response = self.client.get(&url).send().await.map_err(classify)?;

        check_status(response.status())?;
        let body = response.bytes().await.map_err(classify)?;
        decode_rates(&body, base)
    }
}

fn check_status(status: StatusCode) -> Result<(), RateSourceError> {
    if status.is_success() {
        Ok(())
    } else {
        Err(RateSourceError::Status { status: status.as_u16() })
    }
}

fn decode_rates(body: &[u8], base: &str) -> Result<RateTable, RateSourceError> {
    let payload: JsonValue = serde_json::from_slice(body)?;
    parse_rate_payload(&payload, base)
}

fn classify(err: reqwest::Error) -> RateSourceError {
    if err.is_timeout() {
        RateSourceError::Timeout
    } else if err.is_decode() {
        RateSourceError::Parse(err.to_string())
    } else {
        RateSourceError::Request(err)
    }
}
