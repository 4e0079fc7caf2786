//! API Ninjas Bitcoin price client
//!
//! This module fetches the current Bitcoin market snapshot from the API Ninjas
//! endpoint and parses it into a `BitcoinInfo`.

use std::future::Future;
use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::cache::Fetcher;
use crate::error::FetchError;

/// Default endpoint for Bitcoin market data
pub const API_NINJAS_BITCOIN_URL: &str = "https://api.api-ninjas.com/v1/bitcoin";

/// Header carrying the API key
const API_KEY_HEADER: &str = "X-Api-Key";

/// Default request timeout
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Bitcoin market snapshot as returned by the upstream API
///
/// Prices are kept as the decimal strings the API sends, so values pass
/// through without float rounding.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BitcoinInfo {
    /// Current price in USD
    pub price: String,
    /// When the upstream produced this snapshot (Unix seconds)
    pub timestamp: i64,
    /// Absolute price change over the last 24 hours
    #[serde(rename = "24h_price_change")]
    pub price_change_24h: String,
    /// Relative price change over the last 24 hours, in percent
    #[serde(rename = "24h_price_change_percent")]
    pub price_change_percent_24h: String,
    /// Highest price over the last 24 hours
    #[serde(rename = "24h_high")]
    pub high_24h: String,
    /// Lowest price over the last 24 hours
    #[serde(rename = "24h_low")]
    pub low_24h: String,
    /// Traded volume over the last 24 hours
    #[serde(rename = "24h_volume")]
    pub volume_24h: String,
}

/// Client for fetching Bitcoin data from the API Ninjas endpoint
#[derive(Debug, Clone)]
pub struct BitcoinClient {
    client: Client,
    url: String,
    api_key: Option<String>,
}

impl BitcoinClient {
    /// Create a client for the default endpoint with the default timeout
    pub fn new() -> Result<Self, FetchError> {
        Self::with_timeout(API_NINJAS_BITCOIN_URL, DEFAULT_TIMEOUT)
    }

    /// Create a client for `url` whose requests give up after `timeout`
    pub fn with_timeout(url: impl Into<String>, timeout: Duration) -> Result<Self, FetchError> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, url))
    }

    /// Create a client from an existing HTTP client
    pub fn with_client(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
            api_key: None,
        }
    }

    /// Attach an API key, sent as `X-Api-Key` on every request
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// The endpoint this client talks to
    pub fn url(&self) -> &str {
        &self.url
    }

    /// Fetch the current Bitcoin snapshot
    ///
    /// # Returns
    /// * `Ok(BitcoinInfo)` - the parsed snapshot
    /// * `Err(FetchError)` - transport failure, non-2xx status, or unexpected body
    pub async fn fetch_bitcoin_info(&self) -> Result<BitcoinInfo, FetchError> {
        let mut request = self.client.get(&self.url);
        if let Some(api_key) = &self.api_key {
            request = request.header(API_KEY_HEADER, api_key);
        }

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let text = response.text().await?;
        parse_response(&text)
    }
}

impl Fetcher<BitcoinInfo> for BitcoinClient {
    fn fetch(&self) -> impl Future<Output = Result<BitcoinInfo, FetchError>> + Send {
        self.fetch_bitcoin_info()
    }
}

/// Parse a response body into a `BitcoinInfo`
fn parse_response(text: &str) -> Result<BitcoinInfo, FetchError> {
    Ok(serde_json::from_str(text)?)
}
