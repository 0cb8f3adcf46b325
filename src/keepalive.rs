//! Keep-alive task: periodic self-ping against the service's health endpoint.
//!
//! Hosting platforms spin instances down after a stretch without traffic.
//! While active, this task issues an HTTP GET against the service's own
//! `/health` on a fixed interval so the instance stays warm. Ping failures
//! are purely observational: the counter accumulates and a diagnostic is
//! emitted past a threshold, but the timer keeps running until an explicit
//! [`KeepAlive::stop`] or process exit.

use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tokio::sync::Notify;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::metrics;

/// Header that marks self-ping traffic, so the health endpoint can answer
/// minimally instead of building the full status payload.
pub const KEEP_ALIVE_HEADER: &str = "x-keep-alive";

/// Snapshot of the keep-alive counters. Pure read, no side effects.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KeepAliveStats {
    pub is_active: bool,
    pub total_pings: u64,
    pub last_ping_time: Option<DateTime<Utc>>,
    pub failed_pings: u32,
    pub interval_minutes: u64,
}

/// Self-ping task with an explicit start/stop lifecycle.
///
/// Cheaply cloneable; all clones share the same state, so exactly one timer
/// can be active process-wide.
#[derive(Debug, Clone)]
pub struct KeepAlive {
    inner: Arc<Inner>,
}

#[derive(Debug)]
struct Inner {
    http: reqwest::Client,
    target_url: String,
    interval: Duration,
    max_failed_pings: u32,
    production: bool,
    active: AtomicBool,
    total_pings: AtomicU64,
    failed_pings: AtomicU32,
    last_ping: RwLock<Option<DateTime<Utc>>>,
    shutdown: Notify,
}

impl KeepAlive {
    /// Build the task from configuration. Does not start the timer.
    pub fn new(config: &Config) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.keep_alive_timeout_secs))
            .user_agent("KeepAlive/1.0")
            .build()
            .expect("failed to create HTTP client");

        Self {
            inner: Arc::new(Inner {
                http,
                target_url: format!("{}/health", config.self_base_url()),
                interval: Duration::from_secs(config.keep_alive_interval_secs),
                max_failed_pings: config.keep_alive_max_failures,
                production: config.is_production(),
                active: AtomicBool::new(false),
                total_pings: AtomicU64::new(0),
                failed_pings: AtomicU32::new(0),
                last_ping: RwLock::new(None),
                shutdown: Notify::new(),
            }),
        }
    }

    /// Activate the timer: an immediate ping, then one every interval.
    ///
    /// No-op outside production and when already active (idempotent — a
    /// second call never produces a duplicate timer).
    pub fn start(&self) {
        if !self.inner.production {
            info!("keep-alive disabled outside production");
            return;
        }

        if self
            .inner
            .active
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            warn!("keep-alive already active");
            return;
        }

        info!(
            interval_secs = self.inner.interval.as_secs(),
            target = %self.inner.target_url,
            "starting keep-alive"
        );

        let inner = Arc::clone(&self.inner);
        tokio::spawn(async move {
            // The first tick completes immediately, which gives the ping on
            // activation; subsequent ticks follow the configured period. The
            // shutdown signal is only consulted between pings, so a ping that
            // is already in flight runs to completion.
            let mut ticker = tokio::time::interval(inner.interval);
            loop {
                tokio::select! {
                    _ = ticker.tick() => inner.perform_ping().await,
                    _ = inner.shutdown.notified() => break,
                }
            }
        });
    }

    /// Deactivate the timer. No-op when already inactive.
    ///
    /// Cancels the next scheduled tick; a ping already in flight is not
    /// interrupted and still updates the counters when it completes.
    pub fn stop(&self) {
        if self
            .inner
            .active
            .compare_exchange(true, false, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return;
        }

        self.inner.shutdown.notify_one();
        info!("keep-alive stopped");
    }

    /// Whether the timer is currently active.
    pub fn is_active(&self) -> bool {
        self.inner.active.load(Ordering::SeqCst)
    }

    /// Snapshot of the counters.
    pub fn stats(&self) -> KeepAliveStats {
        let last_ping_time = *self
            .inner
            .last_ping
            .read()
            .expect("keep-alive last_ping lock poisoned");

        KeepAliveStats {
            is_active: self.is_active(),
            total_pings: self.inner.total_pings.load(Ordering::SeqCst),
            last_ping_time,
            failed_pings: self.inner.failed_pings.load(Ordering::SeqCst),
            interval_minutes: self.inner.interval.as_secs() / 60,
        }
    }
}

impl Inner {
    /// One ping against the health endpoint. Never propagates an error;
    /// the outcome only moves the counters.
    async fn perform_ping(&self) {
        debug!(target = %self.target_url, "keep-alive ping");

        let response = self
            .http
            .get(&self.target_url)
            .header(KEEP_ALIVE_HEADER, "true")
            .send()
            .await;

        match response {
            Ok(resp) if resp.status().is_success() || resp.status().is_redirection() => {
                self.total_pings.fetch_add(1, Ordering::SeqCst);
                self.failed_pings.store(0, Ordering::SeqCst);
                *self
                    .last_ping
                    .write()
                    .expect("keep-alive last_ping lock poisoned") = Some(Utc::now());
                metrics::inc_pings_ok();
                debug!("keep-alive ping ok");
            }
            Ok(resp) => {
                warn!(status = %resp.status(), "keep-alive ping returned non-success");
                self.record_failure();
            }
            Err(err) => {
                warn!("keep-alive ping failed: {err}");
                self.record_failure();
            }
        }
    }

    fn record_failure(&self) {
        metrics::inc_pings_failed();
        let failed = self.failed_pings.fetch_add(1, Ordering::SeqCst) + 1;
        if failed >= self.max_failed_pings {
            // Diagnostic only. The timer keeps running; the next chance to
            // recover is the next scheduled tick.
            error!(failed, "keep-alive: consecutive failed pings");
        }
    }
}
