//! HTTP fetcher implementation
//!
//! This module handles all network access for the walker:
//! - Building the HTTP client with timeouts and a user agent
//! - A global admission gate capping in-flight requests
//! - Retry with linear backoff for transient failures
//! - Classifying responses into `Success`, `NotFound` and `Failed`
//!
//! The network itself sits behind the [`Transport`] trait so the retry and
//! admission logic can be exercised without sockets.

use crate::config::FetcherConfig;
use crate::crawler::retry::RetryPolicy;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client, StatusCode};
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::Semaphore;
use url::Url;

/// Result of fetching one URL
#[derive(Debug, Clone)]
pub enum FetchOutcome {
    /// The page exists and its body was read
    Success {
        /// Page body content
        body: String,
        /// HTTP status code
        status: u16,
        /// Final URL after redirects
        final_url: Url,
    },

    /// HTTP 404: this branch of the tree does not exist
    NotFound,

    /// Retries were exhausted (or the error was not retryable)
    Failed(FetchError),
}

impl FetchOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success { .. })
    }

    /// The response body, if the fetch succeeded
    pub fn body(&self) -> Option<&str> {
        match self {
            Self::Success { body, .. } => Some(body),
            _ => None,
        }
    }
}

/// Why a fetch ended in `Failed`
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("admission gate closed")]
    GateClosed,
}

/// Failures below the HTTP layer
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("request timeout")]
    Timeout,

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}

impl From<reqwest::Error> for TransportError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            Self::Timeout
        } else if e.is_connect() {
            Self::Connect(e.to_string())
        } else {
            Self::Other(e.to_string())
        }
    }
}

/// A raw HTTP response as seen by the fetcher
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub final_url: Url,
    /// Body text; only read for 2xx responses
    pub body: String,
}

/// A single GET round-trip
#[async_trait]
pub trait Transport: Send + Sync {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportError>;
}

/// [`Transport`] backed by a `reqwest` client
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn get(&self, url: &Url) -> Result<RawResponse, TransportError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        let final_url = response.url().clone();

        let body = if status.is_success() {
            response.text().await?
        } else {
            String::new()
        };

        Ok(RawResponse {
            status: status.as_u16(),
            final_url,
            body,
        })
    }
}

/// Builds an HTTP client with proper configuration
///
/// Redirects are followed transparently (up to 10 hops); the request
/// timeout is the only deadline a fetch has.
pub fn build_http_client(config: &FetcherConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .timeout(config.request_timeout())
        .connect_timeout(config.connect_timeout())
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// What a single attempt tells the retry loop
enum Attempt {
    Done(FetchOutcome),
    Retry(FetchError),
}

/// Classifies one attempt's result
///
/// | Condition | Action |
/// |-----------|--------|
/// | 2xx | `Success` |
/// | 404 | `NotFound`, never retried |
/// | any other status | retry, then `Failed(Status)` |
/// | transport error | retry, then `Failed(Transport)` |
fn classify(result: Result<RawResponse, TransportError>) -> Attempt {
    match result {
        Ok(response) if response.status == StatusCode::NOT_FOUND.as_u16() => {
            Attempt::Done(FetchOutcome::NotFound)
        }
        Ok(response) if (200..300).contains(&response.status) => {
            Attempt::Done(FetchOutcome::Success {
                body: response.body,
                status: response.status,
                final_url: response.final_url,
            })
        }
        Ok(response) => Attempt::Retry(FetchError::Status(response.status)),
        Err(e) => Attempt::Retry(FetchError::Transport(e)),
    }
}

/// Fetches pages under a shared concurrency ceiling with retry
///
/// The gate is held only for the duration of a single attempt; backoff
/// sleeps happen outside it so a retrying task does not starve others.
pub struct Fetcher<T: Transport = HttpTransport> {
    transport: T,
    gate: Arc<Semaphore>,
    policy: RetryPolicy,
}

impl Fetcher<HttpTransport> {
    /// Builds a fetcher over a real HTTP client
    pub fn from_config(config: &FetcherConfig) -> Result<Self, reqwest::Error> {
        let client = build_http_client(config)?;
        Ok(Self::new(
            HttpTransport::new(client),
            config.max_concurrent_requests as usize,
            RetryPolicy::from_config(config),
        ))
    }
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T, max_concurrent: usize, policy: RetryPolicy) -> Self {
        Self {
            transport,
            gate: Arc::new(Semaphore::new(max_concurrent.max(1))),
            policy,
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Fetches a URL, retrying transient failures
    ///
    /// Never returns an error: every failure is folded into
    /// [`FetchOutcome::Failed`] for the caller to turn into a skip.
    pub async fn fetch(&self, url: &Url) -> FetchOutcome {
        let mut attempt = 1;

        loop {
            let result = {
                let _permit = match self.gate.acquire().await {
                    Ok(permit) => permit,
                    Err(_) => return FetchOutcome::Failed(FetchError::GateClosed),
                };
                self.transport.get(url).await
            };

            let error = match classify(result) {
                Attempt::Done(outcome) => return outcome,
                Attempt::Retry(error) => error,
            };

            if !self.policy.should_retry(attempt) {
                tracing::warn!(
                    "Giving up on {} after {} attempt(s): {}",
                    url,
                    attempt,
                    error
                );
                return FetchOutcome::Failed(error);
            }

            let delay = self.policy.backoff(attempt);
            tracing::debug!(
                "Attempt {} for {} failed ({}), retrying in {:?}",
                attempt,
                url,
                error,
                delay
            );
            if !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            attempt += 1;
        }
    }
}
