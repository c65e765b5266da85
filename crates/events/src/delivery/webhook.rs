//! Webhook delivery with exponential-backoff retry.
//!
//! [`WebhookDelivery`] sends a JSON-encoded [`PublishedEvent`] to external
//! URLs via HTTP POST. Failed attempts are retried with exponential backoff
//! (1 s, 2 s, 4 s by default) before giving up on that URL.

use std::time::Duration;

use tokio::sync::broadcast;

use crate::bus::PublishedEvent;

/// Retry delays in seconds (exponential backoff: 1s, 2s, 4s).
const RETRY_DELAYS_SECS: [u64; 3] = [1, 2, 4];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

/// Error type for webhook delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum WebhookError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The remote server returned a non-2xx status code.
    #[error("Webhook returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// WebhookDelivery
// ---------------------------------------------------------------------------

/// Delivers registry events to external webhook endpoints.
pub struct WebhookDelivery {
    client: reqwest::Client,
    retry_delays: Vec<Duration>,
}

impl WebhookDelivery {
    /// Create a new delivery service with a pre-configured HTTP client.
    pub fn new() -> Result<Self, WebhookError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            retry_delays: RETRY_DELAYS_SECS
                .iter()
                .map(|secs| Duration::from_secs(*secs))
                .collect(),
        })
    }

    /// Override the backoff schedule. One retry is made per entry.
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    /// Forward every bus event to every URL, in publish order.
    ///
    /// Delivery is sequential so each endpoint observes the stream in
    /// sequence order. A URL that keeps failing is skipped for that event
    /// only. The loop exits when the bus is dropped.
    pub async fn run(self, urls: Vec<String>, mut receiver: broadcast::Receiver<PublishedEvent>) {
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    for url in &urls {
                        if let Err(e) = self.deliver(url, &event).await {
                            tracing::error!(
                                url = %url,
                                sequence = event.sequence,
                                error = %e,
                                "Dropping event for webhook"
                            );
                        }
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Webhook forwarder lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, webhook forwarder shutting down");
                    break;
                }
            }
        }
    }

    /// Deliver an event to a webhook URL with retry.
    ///
    /// Returns `Ok(())` on the first successful attempt, otherwise the error
    /// from the final attempt.
    pub async fn deliver(&self, url: &str, event: &PublishedEvent) -> Result<(), WebhookError> {
        for (attempt, delay) in self.retry_delays.iter().enumerate() {
            match self.try_send(url, event).await {
                Ok(()) => return Ok(()),
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        url,
                        error = %e,
                        "Webhook delivery attempt failed, retrying"
                    );
                    tokio::time::sleep(*delay).await;
                }
            }
        }

        // Final attempt after the last backoff.
        match self.try_send(url, event).await {
            Ok(()) => Ok(()),
            Err(e) => {
                tracing::error!(url, error = %e, "Webhook delivery failed after all retries");
                Err(e)
            }
        }
    }

    /// Execute a single POST request and check the response status.
    async fn try_send(&self, url: &str, event: &PublishedEvent) -> Result<(), WebhookError> {
        let response = self.client.post(url).json(event).send().await?;
        if !response.status().is_success() {
            return Err(WebhookError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
