//! Outbound lookup of the caller's public IP
//!
//! The client performs a single GET against the configured IP-echo endpoint
//! and returns the trimmed body. Failures are split in two: anything that
//! kept the HTTP exchange from completing is [`LookupError::Network`],
//! everything else is [`LookupError::Other`].

use std::time::Duration;

use checkip_edge_sdk::handler::BoxFuture;
use thiserror::Error;

use crate::config::{HandlerConfig, LOOKUP_TIMEOUT};

/// Why a lookup produced no IP.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    /// Refused connection, DNS failure, timeout, non-2xx status, broken body stream
    #[error("network failure: {0}")]
    Network(String),

    /// Unusable endpoint URL, undecodable body, anything unanticipated
    #[error("unexpected failure: {0}")]
    Other(String),
}

impl LookupError {
    /// Classify a reqwest failure.
    ///
    /// Builder errors mean the request never left the process (bad URL or
    /// scheme); every other reqwest error interrupted the exchange itself.
    fn from_reqwest(err: reqwest::Error) -> Self {
        if err.is_builder() {
            LookupError::Other(err.to_string())
        } else {
            LookupError::Network(err.to_string())
        }
    }
}

/// Something that can find out the caller's public IP.
pub trait LocationLookup: Send + Sync + 'static {
    /// Fetch the IP as trimmed text.
    fn fetch(&self) -> BoxFuture<'_, Result<String, LookupError>>;

    /// Where the lookup goes, for logging.
    fn endpoint(&self) -> &str;
}

/// reqwest-backed lookup against an IP-echo service.
#[derive(Debug, Clone)]
pub struct CheckIpClient {
    client: reqwest::Client,
    endpoint_url: String,
}

impl CheckIpClient {
    /// Build a client with the standard five second timeout.
    pub fn new(config: &HandlerConfig) -> Result<Self, reqwest::Error> {
        Self::with_timeout(config, LOOKUP_TIMEOUT)
    }

    /// Build a client with a custom timeout.
    pub fn with_timeout(config: &HandlerConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
        })
    }

    /// Perform the lookup.
    pub async fn fetch_ip(&self) -> Result<String, LookupError> {
        let response = self
            .client
            .get(&self.endpoint_url)
            .send()
            .await
            .map_err(LookupError::from_reqwest)?;

        tracing::debug!(
            endpoint = %self.endpoint_url,
            status = response.status().as_u16(),
            "Lookup service responded"
        );

        let body = response
            .error_for_status()
            .map_err(LookupError::from_reqwest)?
            .bytes()
            .await
            .map_err(LookupError::from_reqwest)?;

        let text = std::str::from_utf8(&body)
            .map_err(|e| LookupError::Other(format!("response body is not UTF-8: {}", e)))?;

        Ok(text.trim().to_string())
    }
}

impl LocationLookup for CheckIpClient {
    fn fetch(&self) -> BoxFuture<'_, Result<String, LookupError>> {
        Box::pin(self.fetch_ip())
    }

    fn endpoint(&self) -> &str {
        &self.endpoint_url
    }
}
