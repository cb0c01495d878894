//! Blocking HTTP client for wiki pages and images. One GET per call, no caching, no retries.

use crate::scraper::error::ScraperError;
use scraper::Html;
use std::time::{Duration, Instant};

const DEFAULT_USER_AGENT: &str = concat!("wikipub/", env!("CARGO_PKG_VERSION"));
const MAX_REDIRECTS: usize = 10;

/// Blocking HTTP client that optionally enforces a delay between requests.
#[derive(Debug)]
pub struct WikiClient {
    inner: reqwest::blocking::Client,
    delay: Duration,
    last_request: Option<Instant>,
}

impl WikiClient {
    /// Build a client with the default User-Agent, reqwest's default timeout, and no delay.
    pub fn new() -> Result<Self, reqwest::Error> {
        Self::builder().build()
    }

    /// Builder for custom User-Agent, timeout, and/or delay.
    pub fn builder() -> WikiClientBuilder {
        WikiClientBuilder::default()
    }

    /// GET `url` and parse the body as an HTML document. Non-2xx statuses are errors.
    pub fn get_html(&mut self, url: &str) -> Result<Html, ScraperError> {
        let response = self.get(url)?;
        let body = response.text().map_err(|e| ScraperError::BodyRead {
            url: url.to_string(),
            source: e,
        })?;
        Ok(Html::parse_document(&body))
    }

    /// GET `url` and return the raw body bytes. Non-2xx statuses are errors.
    pub fn get_bytes(&mut self, url: &str) -> Result<Vec<u8>, ScraperError> {
        let response = self.get(url)?;
        let bytes = response.bytes().map_err(|e| ScraperError::BodyRead {
            url: url.to_string(),
            source: e,
        })?;
        Ok(bytes.to_vec())
    }

    fn get(&mut self, url: &str) -> Result<reqwest::blocking::Response, ScraperError> {
        self.wait_delay();
        tracing::debug!(url, "GET");
        let response = self
            .inner
            .get(url)
            .send()
            .map_err(|e| ScraperError::Network {
                url: url.to_string(),
                source: e,
            });
        self.last_request = Some(Instant::now());
        let response = response?;
        let status = response.status();
        if !status.is_success() {
            return Err(ScraperError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(response)
    }

    fn wait_delay(&mut self) {
        if let Some(last) = self.last_request {
            let elapsed = last.elapsed();
            if elapsed < self.delay {
                std::thread::sleep(self.delay - elapsed);
            }
        }
    }
}

/// Builder for WikiClient with optional User-Agent, timeout, and delay.
#[derive(Debug, Default)]
pub struct WikiClientBuilder {
    user_agent: Option<String>,
    timeout_secs: Option<u64>,
    delay_secs: u64,
}

impl WikiClientBuilder {
    /// Set a custom User-Agent. If not set, `wikipub/<version>` is used.
    pub fn user_agent(mut self, ua: impl Into<String>) -> Self {
        self.user_agent = Some(ua.into());
        self
    }

    /// Set request timeout in seconds. If not set, reqwest's default applies.
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }

    /// Set delay between requests in seconds. Default 0.
    pub fn delay_secs(mut self, secs: u64) -> Self {
        self.delay_secs = secs;
        self
    }

    pub fn build(self) -> Result<WikiClient, reqwest::Error> {
        let user_agent = self
            .user_agent
            .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string());
        let mut builder = reqwest::blocking::Client::builder()
            .cookie_store(true)
            .user_agent(user_agent)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS));
        if let Some(secs) = self.timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        Ok(WikiClient {
            inner: builder.build()?,
            delay: Duration::from_secs(self.delay_secs),
            last_request: None,
        })
    }
}
