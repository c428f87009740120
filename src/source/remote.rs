//! Remote resource fetching.

use std::sync::OnceLock;
use std::time::Duration;

use reqwest::blocking::Client;

use crate::error::{BundleError, Result};

/// Blocking HTTP fetcher shared by all builds of an engine.
///
/// The client is created on first use, so engines without remote sources
/// never start one.
#[derive(Debug)]
pub struct Fetcher {
    timeout: Duration,
    client: OnceLock<Client>,
}

impl Default for Fetcher {
    fn default() -> Self {
        Self::new(Duration::from_secs(30))
    }
}

impl Fetcher {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            client: OnceLock::new(),
        }
    }

    fn client(&self, url: &str) -> Result<&Client> {
        if let Some(client) = self.client.get() {
            return Ok(client);
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("sheaf/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|err| BundleError::Fetch {
                url: url.to_string(),
                status: None,
                reason: format!("failed to create HTTP client: {err}"),
            })?;

        // A concurrent first use may have won the race; either client works.
        Ok(self.client.get_or_init(|| client))
    }

    /// Fetch `url` as text. Anything but a 2xx response is an error.
    pub fn fetch(&self, url: &str) -> Result<String> {
        crate::debug!("fetch"; "{}", url);

        let response = self
            .client(url)?
            .get(url)
            .send()
            .map_err(|err| BundleError::Fetch {
                url: url.to_string(),
                status: err.status().map(|s| s.as_u16()),
                reason: err.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(BundleError::Fetch {
                url: url.to_string(),
                status: Some(status.as_u16()),
                reason: format!("HTTP {status}"),
            });
        }

        response.text().map_err(|err| BundleError::Fetch {
            url: url.to_string(),
            status: Some(status.as_u16()),
            reason: format!("failed to read response body: {err}"),
        })
    }
}
