//! Unread badge poller.
//!
//! Polls an [`UnreadSource`] immediately on spawn and then on a fixed
//! interval, publishing a [`BadgeSnapshot`] through a `watch` channel.
//!
//! - The next fetch is scheduled only after the previous one resolves, so
//!   requests never overlap.
//! - Consecutive failures back off exponentially (`interval * 2^failures`,
//!   capped at `max_backoff`).
//! - A failed fetch keeps the last good count and marks the snapshot stale.
//! - [`PollerHandle::stop`] (or dropping the handle) cancels the task.

use std::sync::Arc;
use std::time::Duration;

use gymdesk_types::config::PollerConfig;
use gymdesk_types::error::ChatError;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::chat::badge::badge_label;

/// Anything that can report the global unread count.
pub trait UnreadSource: Send + Sync {
    fn fetch_unread_count(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, ChatError>> + Send;
}

impl<T: UnreadSource> UnreadSource for Arc<T> {
    fn fetch_unread_count(
        &self,
    ) -> impl std::future::Future<Output = Result<u64, ChatError>> + Send {
        (**self).fetch_unread_count()
    }
}

/// Latest known badge state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BadgeSnapshot {
    /// Last successfully fetched count.
    pub count: u64,
    /// Rendered badge, `None` when nothing should be shown.
    pub label: Option<String>,
    /// `true` when the most recent fetch failed and `count` is carried over.
    pub stale: bool,
    pub consecutive_failures: u32,
    pub last_error: Option<String>,
    /// Completed fetch attempts, successful or not.
    pub polls: u64,
}

/// Poller timing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollerSettings {
    pub interval: Duration,
    pub max_backoff: Duration,
}

impl Default for PollerSettings {
    fn default() -> Self {
        Self::from(&PollerConfig::default())
    }
}

impl From<&PollerConfig> for PollerSettings {
    fn from(config: &PollerConfig) -> Self {
        Self {
            interval: Duration::from_millis(config.interval_ms.max(1)),
            max_backoff: Duration::from_millis(config.max_backoff_ms),
        }
    }
}

impl PollerSettings {
    /// Delay before the next fetch given the current failure streak.
    pub fn delay_after(&self, consecutive_failures: u32) -> Duration {
        if consecutive_failures == 0 {
            return self.interval;
        }
        let factor = 1u32 << consecutive_failures.min(16);
        let cap = self.max_backoff.max(self.interval);
        self.interval.saturating_mul(factor).min(cap)
    }
}

/// A poller that has not been started yet.
pub struct UnreadPoller<S: UnreadSource> {
    source: S,
    settings: PollerSettings,
}

impl<S: UnreadSource + 'static> UnreadPoller<S> {
    pub fn new(source: S, settings: PollerSettings) -> Self {
        Self { source, settings }
    }

    /// Start polling on the current Tokio runtime.
    pub fn spawn(self) -> PollerHandle {
        let cancel = CancellationToken::new();
        let (tx, rx) = watch::channel(BadgeSnapshot::default());

        let task = tokio::spawn(run(self.source, self.settings, tx, cancel.clone()));

        PollerHandle {
            cancel,
            snapshots: rx,
            task: Some(task),
        }
    }
}

async fn run<S: UnreadSource>(
    source: S,
    settings: PollerSettings,
    tx: watch::Sender<BadgeSnapshot>,
    cancel: CancellationToken,
) {
    let mut snapshot = BadgeSnapshot::default();

    loop {
        let outcome = tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = source.fetch_unread_count() => result,
        };

        match outcome {
            Ok(count) => {
                snapshot.count = count;
                snapshot.label = badge_label(count);
                snapshot.stale = false;
                snapshot.consecutive_failures = 0;
                snapshot.last_error = None;
            }
            Err(e) => {
                snapshot.stale = true;
                snapshot.consecutive_failures = snapshot.consecutive_failures.saturating_add(1);
                snapshot.last_error = Some(e.to_string());
                warn!(
                    error = %e,
                    consecutive_failures = snapshot.consecutive_failures,
                    "unread count poll failed"
                );
            }
        }
        snapshot.polls += 1;
        tx.send_replace(snapshot.clone());

        let delay = settings.delay_after(snapshot.consecutive_failures);
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(delay) => {}
        }
    }

    debug!(polls = snapshot.polls, "unread poller stopped");
}

/// Handle to a running poller. Dropping it cancels the task.
pub struct PollerHandle {
    cancel: CancellationToken,
    snapshots: watch::Receiver<BadgeSnapshot>,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    /// A receiver that is notified on every completed poll.
    pub fn subscribe(&self) -> watch::Receiver<BadgeSnapshot> {
        self.snapshots.clone()
    }

    /// The most recently published snapshot.
    pub fn current(&self) -> BadgeSnapshot {
        self.snapshots.borrow().clone()
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|t| !t.is_finished())
    }

    /// Cancel polling and wait for the task to exit.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(error = %e, "unread poller task ended abnormally");
            }
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
