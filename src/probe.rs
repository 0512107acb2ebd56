//! Liveness probing of source endpoints.
//!
//! Each record's URL gets one lightweight request; a record is live when the
//! endpoint answers with a status below 400 within the per-request timeout.
//! Connection errors, TLS errors, timeouts and 4xx/5xx answers all count as
//! "not live" and are never retried.
//!
//! # Architecture
//!
//! - [`LivenessCheck`]: the single-URL check
//! - [`HeadCheck`]: the HTTP implementation used in production
//! - [`filter_live`]: runs a check over a collection with bounded concurrency
//!
//! Certificate validation is disabled on purpose: the probe asks whether
//! something answers, not whether it can be trusted.

use crate::config::{PROBE_PROGRESS_EVERY, PROBE_USER_AGENT};
use crate::error::Result;
use crate::models::Scored;
use futures::stream::{self, StreamExt};
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument};

/// A check that decides whether one endpoint currently responds.
pub trait LivenessCheck {
    async fn is_live(&self, url: &str) -> bool;
}

/// HEAD request with redirects followed and certificate checks disabled.
#[derive(Debug, Clone)]
pub struct HeadCheck {
    client: reqwest::Client,
}

impl HeadCheck {
    /// Build the shared HTTP client with a per-request `timeout`.
    ///
    /// # Errors
    ///
    /// Returns [`crate::error::CurateError::HttpClient`] if the TLS backend
    /// cannot be initialized.
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(PROBE_USER_AGENT)
            .danger_accept_invalid_certs(true)
            .build()?;
        Ok(Self::from_client(client))
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        HeadCheck { client }
    }
}

impl LivenessCheck for HeadCheck {
    async fn is_live(&self, url: &str) -> bool {
        match self.client.head(url).send().await {
            Ok(resp) => {
                let status = resp.status();
                debug!(%url, %status, "Probe answered");
                status.as_u16() < 400
            }
            Err(e) => {
                debug!(%url, error = %e, "Probe failed");
                false
            }
        }
    }
}

/// Keep only the records whose endpoints are live.
///
/// At most `concurrency` checks are in flight at once and they may finish in
/// any order, but the returned records keep their input order so later
/// stable sorts break score ties the same way on every run.
///
/// # Arguments
///
/// * `sources` - Scored records to check, in ranking input order
/// * `checker` - The liveness check applied to each record's URL
/// * `concurrency` - Maximum checks in flight (values below 1 act as 1)
///
/// # Returns
///
/// The live subset of `sources`, in input order. Records with an empty URL
/// are dropped without a request.
#[instrument(level = "info", skip(sources, checker), fields(total = sources.len()))]
pub async fn filter_live<C: LivenessCheck>(
    sources: Vec<Scored>,
    checker: &C,
    concurrency: usize,
) -> Vec<Scored> {
    let t0 = Instant::now();
    let total = sources.len();
    info!(total, concurrency, "Probing sources");

    let mut checks = stream::iter(sources.into_iter().enumerate())
        .map(|(index, item)| async move {
            let url = item.source.url();
            let live = !url.is_empty() && checker.is_live(url).await;
            (index, item, live)
        })
        .buffer_unordered(concurrency.max(1));

    let mut live = Vec::new();
    let mut done = 0usize;
    while let Some((index, item, is_live)) = checks.next().await {
        done += 1;
        if is_live {
            live.push((index, item));
        }
        if done % PROBE_PROGRESS_EVERY == 0 {
            info!(done, total, live = live.len(), "Probe progress");
        }
    }
    live.sort_unstable_by_key(|(index, _)| *index);

    info!(
        total,
        live = live.len(),
        elapsed_ms = t0.elapsed().as_millis() as u64,
        "Probe complete"
    );
    live.into_iter().map(|(_, item)| item).collect()
}
