//! HTTP client adapter using reqwest.
//!
//! Automatic redirect following is disabled. Every hop is re-issued from the
//! original request description, so a redirected POST keeps its method, body
//! and headers, up to a fixed number of hops.

use std::time::Duration;

use reqwest::header::LOCATION;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use rdpgate_application::{ApplicationError, ApplicationResult};

use crate::config::PlatformConfig;

/// A platform response after redirects have been resolved.
#[derive(Debug, Clone)]
pub struct PlatformResponse {
    /// Final HTTP status.
    pub status: u16,
    /// Canonical reason phrase for `status`.
    pub reason: Option<String>,
    /// Raw response body.
    pub body: Vec<u8>,
    /// URL that produced this response.
    pub url: Url,
}

impl PlatformResponse {
    /// Returns true for 2xx statuses.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.status >= 200 && self.status < 300
    }

    /// Returns true if the body is empty or whitespace only.
    #[must_use]
    pub fn body_is_blank(&self) -> bool {
        self.body.iter().all(u8::is_ascii_whitespace)
    }
}

/// reqwest-backed client that follows redirects explicitly and boundedly.
#[derive(Debug, Clone)]
pub struct RedirectingHttpClient {
    client: Client,
    max_redirects: usize,
    timeout: Duration,
}

impl RedirectingHttpClient {
    /// Creates a client from platform settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying client cannot be created.
    pub fn new(config: &PlatformConfig) -> ApplicationResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| ApplicationError::Transport {
                message: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self::with_client(
            client,
            config.max_redirects,
            config.request_timeout(),
        ))
    }

    /// Creates a client around an existing reqwest client.
    ///
    /// The given client must not follow redirects itself.
    #[must_use]
    pub const fn with_client(client: Client, max_redirects: usize, timeout: Duration) -> Self {
        Self {
            client,
            max_redirects,
            timeout,
        }
    }

    /// Maximum redirects followed per request.
    #[must_use]
    pub const fn max_redirects(&self) -> usize {
        self.max_redirects
    }

    /// Sends the request built by `build`, re-building it for every redirect hop.
    ///
    /// 301, 302, 307 and 308 responses carrying a `Location` header are
    /// followed; relative locations resolve against the current URL. The
    /// deadline covers the whole chain, not a single hop.
    ///
    /// # Errors
    ///
    /// - [`ApplicationError::Transport`] on connection failures
    /// - [`ApplicationError::Timeout`] when the chain exceeds its deadline
    /// - [`ApplicationError::RedirectExhausted`] past the hop bound
    /// - [`ApplicationError::InvalidUrl`] for unparseable locations
    pub async fn send<F>(&self, url: Url, build: F) -> ApplicationResult<PlatformResponse>
    where
        F: Fn(&Client, Url) -> RequestBuilder + Sync,
    {
        let timeout_ms = u64::try_from(self.timeout.as_millis()).unwrap_or(u64::MAX);
        tokio::time::timeout(self.timeout, self.follow(url, &build))
            .await
            .map_err(|_| ApplicationError::Timeout { timeout_ms })?
    }

    async fn follow<F>(&self, mut url: Url, build: &F) -> ApplicationResult<PlatformResponse>
    where
        F: Fn(&Client, Url) -> RequestBuilder + Sync,
    {
        let mut hops = 0;

        loop {
            let response = build(&self.client, url.clone())
                .send()
                .await
                .map_err(Self::map_error)?;
            let status = response.status();

            if let Some(location) = Self::redirect_location(&response) {
                let next = url
                    .join(&location)
                    .map_err(|e| ApplicationError::InvalidUrl(format!("{e}: {location}")))?;

                if hops >= self.max_redirects {
                    tracing::warn!(max = self.max_redirects, location = %next, "redirect limit exceeded");
                    return Err(ApplicationError::RedirectExhausted {
                        max_hops: self.max_redirects,
                        last_location: next.to_string(),
                    });
                }

                hops += 1;
                tracing::debug!(hop = hops, status = status.as_u16(), from = %url, to = %next, "following redirect");
                url = next;
                continue;
            }

            let body = response
                .bytes()
                .await
                .map_err(|e| ApplicationError::Transport {
                    message: format!("failed to read body: {e}"),
                })?
                .to_vec();

            return Ok(PlatformResponse {
                status: status.as_u16(),
                reason: status.canonical_reason().map(str::to_string),
                body,
                url,
            });
        }
    }

    /// Returns the `Location` of a followable redirect response.
    fn redirect_location(response: &reqwest::Response) -> Option<String> {
        if !Self::is_followable(response.status()) {
            return None;
        }
        response
            .headers()
            .get(LOCATION)
            .and_then(|value| value.to_str().ok())
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .map(str::to_string)
    }

    const fn is_followable(status: StatusCode) -> bool {
        matches!(
            status,
            StatusCode::MOVED_PERMANENTLY
                | StatusCode::FOUND
                | StatusCode::TEMPORARY_REDIRECT
                | StatusCode::PERMANENT_REDIRECT
        )
    }

    /// Maps reqwest errors to `ApplicationError::Transport`, keeping the cause chain.
    fn map_error(error: reqwest::Error) -> ApplicationError {
        let mut message = error.to_string();
        let mut source = std::error::Error::source(&error);
        while let Some(cause) = source {
            message.push_str(": ");
            message.push_str(&cause.to_string());
            source = cause.source();
        }
        ApplicationError::Transport { message }
    }
}
