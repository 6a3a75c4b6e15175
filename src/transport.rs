use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::StatusCode;

use crate::error::{FritzError, Result};

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(2);

/// Performs the raw HTTP GETs against the fritz box.
pub trait Transport {
    /// Fetches `url` and returns the response body.
    fn get(&self, url: &str) -> Result<String>;
}

/// [`Transport`] backed by a blocking reqwest client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        Self::with_timeout(DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(HttpTransport { client })
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send()?;
        let status = response.status();
        debug!(
            "[fritz api] {} status: {:?} {:?}",
            response.url().path(),
            status,
            status.canonical_reason().unwrap_or_default()
        );
        if status == StatusCode::FORBIDDEN {
            return Err(FritzError::Forbidden);
        }
        Ok(response.error_for_status()?.text()?)
    }
}
