//! Single-shot HTML retrieval for business websites.

use std::future::Future;
use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, ACCEPT_LANGUAGE, CONTENT_TYPE};
use reqwest::redirect::Policy;
use reqwest::{Client, Url};

use crate::error::FetchError;
use crate::url_guard::check_host;

const CONNECT_TIMEOUT_SECS: u64 = 5;
const MAX_REDIRECTS: usize = 10;

/// Source of page markup for the enricher.
///
/// Implementations must bound their own running time; the enricher awaits a
/// fetch exactly once per business and never retries.
pub trait Fetch {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<String, FetchError>> + Send;
}

/// HTTP fetcher: one GET, bounded timeout, browser-like headers.
#[derive(Debug, Clone)]
pub struct PageFetcher {
    client: Client,
}

impl PageFetcher {
    /// Builds a fetcher whose requests give up after `timeout_secs`.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        Self::build(timeout_secs, user_agent, false)
    }

    /// Like [`PageFetcher::new`], but redirects may also land on loopback
    /// hosts. Only local test servers need this.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn allowing_loopback(timeout_secs: u64, user_agent: &str) -> Result<Self, FetchError> {
        Self::build(timeout_secs, user_agent, true)
    }

    fn build(timeout_secs: u64, user_agent: &str, allow_loopback: bool) -> Result<Self, FetchError> {
        let mut headers = HeaderMap::new();
        headers.insert(
            ACCEPT,
            HeaderValue::from_static(
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            ),
        );
        headers.insert(
            ACCEPT_LANGUAGE,
            HeaderValue::from_static("pt-BR,pt;q=0.9,en;q=0.8"),
        );

        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS.min(timeout_secs)))
            .user_agent(user_agent)
            .default_headers(headers)
            .redirect(guarded_redirects(allow_loopback))
            .build()?;
        Ok(Self { client })
    }
}

/// Follows up to [`MAX_REDIRECTS`] hops, re-running the URL guard's host
/// check on each one.
fn guarded_redirects(allow_loopback: bool) -> Policy {
    Policy::custom(move |attempt| {
        if attempt.previous().len() >= MAX_REDIRECTS {
            return attempt.error("too many redirects");
        }
        match check_host(attempt.url(), allow_loopback) {
            Ok(()) => attempt.follow(),
            Err(rejection) => {
                tracing::debug!(target_url = %attempt.url(), %rejection, "redirect refused");
                attempt.error(rejection)
            }
        }
    })
}

impl Fetch for PageFetcher {
    async fn fetch(&self, url: &Url) -> Result<String, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }

        // A missing content-type is given the benefit of the doubt.
        if let Some(content_type) = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
        {
            if !content_type.to_ascii_lowercase().contains("html") {
                return Err(FetchError::NotHtml {
                    url: url.to_string(),
                    content_type: content_type.to_string(),
                });
            }
        }

        Ok(response.text().await?)
    }
}
