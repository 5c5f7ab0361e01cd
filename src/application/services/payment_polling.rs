//! # Payment Status Polling
//!
//! Waits for a payment gateway to settle a payment.
//!
//! The [`PaymentStatusPoller`] asks a [`PaymentStatusSource`] for the status
//! of a payment reference at a fixed interval until the status is terminal
//! or the overall timeout elapses. A failing lookup is logged and the next
//! tick tries again.

use crate::application::error::ApplicationResult;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::{debug, info, warn};

/// Status reported by a payment gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    /// Not settled yet.
    Pending,
    /// Settled successfully.
    Successful,
    /// Declined or abandoned.
    Failed,
}

impl PaymentStatus {
    /// Returns true for `Successful` and `Failed`.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::Successful | Self::Failed)
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => write!(f, "pending"),
            Self::Successful => write!(f, "successful"),
            Self::Failed => write!(f, "failed"),
        }
    }
}

/// Final result of a polling run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PollOutcome {
    /// The gateway reported success.
    Successful,
    /// The gateway reported failure.
    Failed,
    /// No terminal status before the timeout.
    TimedOut,
}

impl fmt::Display for PollOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Successful => write!(f, "successful"),
            Self::Failed => write!(f, "failed"),
            Self::TimedOut => write!(f, "timed out"),
        }
    }
}

/// Looks up the current status of a payment.
#[async_trait]
pub trait PaymentStatusSource: Send + Sync + fmt::Debug {
    /// Returns the gateway status for `reference`.
    ///
    /// # Errors
    ///
    /// Returns an error when the gateway cannot be reached.
    async fn status(&self, reference: &str) -> ApplicationResult<PaymentStatus>;
}

/// Polling cadence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PollingConfig {
    /// Seconds between two lookups.
    pub interval_secs: u64,
    /// Seconds before giving up.
    pub timeout_secs: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 5,
            timeout_secs: 300,
        }
    }
}

impl PollingConfig {
    /// Creates a polling configuration.
    #[must_use]
    pub fn new(interval_secs: u64, timeout_secs: u64) -> Self {
        Self {
            interval_secs,
            timeout_secs,
        }
    }

    /// Returns the interval as a duration.
    #[inline]
    #[must_use]
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    /// Returns the timeout as a duration.
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Polls a [`PaymentStatusSource`] until the payment settles.
#[derive(Debug, Clone)]
pub struct PaymentStatusPoller {
    source: Arc<dyn PaymentStatusSource>,
    config: PollingConfig,
}

impl PaymentStatusPoller {
    /// Creates a poller.
    #[must_use]
    pub fn new(source: Arc<dyn PaymentStatusSource>, config: PollingConfig) -> Self {
        Self { source, config }
    }

    /// Returns the polling configuration.
    #[must_use]
    pub fn config(&self) -> PollingConfig {
        self.config
    }

    /// Polls until the payment is successful, failed or the timeout elapses.
    ///
    /// The first lookup happens immediately.
    pub async fn poll(&self, reference: &str) -> PollOutcome {
        match timeout(self.config.timeout(), self.until_terminal(reference)).await {
            Ok(outcome) => {
                info!(reference, ?outcome, "payment settled");
                outcome
            }
            Err(_) => {
                warn!(reference, timeout_secs = self.config.timeout_secs, "payment polling timed out");
                PollOutcome::TimedOut
            }
        }
    }

    async fn until_terminal(&self, reference: &str) -> PollOutcome {
        let mut attempt: u32 = 0;
        loop {
            attempt = attempt.saturating_add(1);
            match self.source.status(reference).await {
                Ok(PaymentStatus::Successful) => return PollOutcome::Successful,
                Ok(PaymentStatus::Failed) => return PollOutcome::Failed,
                Ok(PaymentStatus::Pending) => {
                    debug!(reference, attempt, "payment still pending");
                }
                Err(e) => {
                    warn!(reference, attempt, error = %e, "payment status lookup failed");
                }
            }
            sleep(self.config.interval()).await;
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::application::error::ApplicationError;
    use std::collections::VecDeque;
    use tokio::sync::Mutex;

    /// Replays scripted answers, then keeps answering pending.
    #[derive(Debug, Default)]
    struct ScriptedSource {
        answers: Mutex<VecDeque<ApplicationResult<PaymentStatus>>>,
        calls: Mutex<u32>,
    }

    impl ScriptedSource {
        fn with(answers: Vec<ApplicationResult<PaymentStatus>>) -> Arc<Self> {
            Arc::new(Self {
                answers: Mutex::new(answers.into()),
                calls: Mutex::new(0),
            })
        }

        async fn calls(&self) -> u32 {
            *self.calls.lock().await
        }
    }

    #[async_trait]
    impl PaymentStatusSource for ScriptedSource {
        async fn status(&self, _reference: &str) -> ApplicationResult<PaymentStatus> {
            *self.calls.lock().await += 1;
            self.answers
                .lock()
                .await
                .pop_front()
                .unwrap_or(Ok(PaymentStatus::Pending))
        }
    }

    #[test]
    fn default_cadence() {
        let config = PollingConfig::default();
        assert_eq!(config.interval(), Duration::from_secs(5));
        assert_eq!(config.timeout(), Duration::from_secs(300));
    }

    #[test]
    fn terminal_statuses() {
        assert!(!PaymentStatus::Pending.is_terminal());
        assert!(PaymentStatus::Successful.is_terminal());
        assert!(PaymentStatus::Failed.is_terminal());
    }

    #[tokio::test(start_paused = true)]
    async fn returns_on_success() {
        let source = ScriptedSource::with(vec![
            Ok(PaymentStatus::Pending),
            Ok(PaymentStatus::Pending),
            Ok(PaymentStatus::Successful),
        ]);
        let poller = PaymentStatusPoller::new(source.clone(), PollingConfig::default());

        assert_eq!(poller.poll("ref-1").await, PollOutcome::Successful);
        assert_eq!(source.calls().await, 3);
    }

    #[tokio::test(start_paused = true)]
    async fn returns_on_failure() {
        let source = ScriptedSource::with(vec![Ok(PaymentStatus::Failed)]);
        let poller = PaymentStatusPoller::new(source, PollingConfig::default());

        assert_eq!(poller.poll("ref-2").await, PollOutcome::Failed);
    }

    #[tokio::test(start_paused = true)]
    async fn lookup_errors_do_not_stop_polling() {
        let source = ScriptedSource::with(vec![
            Err(ApplicationError::internal("gateway unreachable")),
            Ok(PaymentStatus::Successful),
        ]);
        let poller = PaymentStatusPoller::new(source.clone(), PollingConfig::default());

        assert_eq!(poller.poll("ref-3").await, PollOutcome::Successful);
        assert_eq!(source.calls().await, 2);
    }

    #[tokio::test(start_paused = true)]
    async fn times_out_when_never_settled() {
        let source = ScriptedSource::with(Vec::new());
        let poller = PaymentStatusPoller::new(source.clone(), PollingConfig::new(5, 18));

        assert_eq!(poller.poll("ref-4").await, PollOutcome::TimedOut);
        // lookups at 0, 5, 10 and 15 seconds
        assert_eq!(source.calls().await, 4);
    }
}
