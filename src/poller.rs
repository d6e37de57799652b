use std::time::Duration;
use thiserror::Error;
use tracing::{error, info, instrument, warn};

use crate::api::{FetchError, StatusApi};
use crate::model::{translate, UnknownStatusError};
use crate::notify::{DeliveryError, Notifier};
use crate::validate::{validate, ShapeError};

/// Everything that can go wrong inside one tick. All variants are
/// tick-local: the loop logs them and keeps going. Only missing credentials
/// abort the process, and that happens before the loop starts.
#[derive(Debug, Error)]
pub enum TickError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error(transparent)]
    Shape(#[from] ShapeError),
    #[error(transparent)]
    UnknownStatus(#[from] UnknownStatusError),
    #[error(transparent)]
    Delivery(#[from] DeliveryError),
}

impl TickError {
    /// A failure in the notifier itself must not be reported through the
    /// notifier again.
    fn originated_in_notifier(&self) -> bool {
        matches!(self, TickError::Delivery(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Notified,
    Unchanged,
    Failed,
}

/// Holds the last successfully delivered message and decides whether a
/// candidate is worth sending. Check and commit are separate steps: the
/// caller commits only after the transport confirmed delivery, so the stored
/// value never reflects a message that failed to go out.
#[derive(Debug, Default)]
pub struct ChangeGate {
    last_sent: Option<String>,
}

impl ChangeGate {
    pub fn should_notify(&self, candidate: &str) -> bool {
        self.last_sent.as_deref() != Some(candidate)
    }

    pub fn commit(&mut self, candidate: &str) {
        self.last_sent = Some(candidate.to_string());
    }

    pub fn last_sent(&self) -> Option<&str> {
        self.last_sent.as_deref()
    }
}

/// The poll-check-notify state machine. Single task; the only suspension
/// points are the two outbound calls and the fixed sleep between ticks.
pub struct Poller<A, N> {
    api: A,
    notifier: N,
    window: i64,
    status_gate: ChangeGate,
    report_gate: ChangeGate,
}

impl<A: StatusApi, N: Notifier> Poller<A, N> {
    /// `window` is the fixed `from_date` cursor, derived once at startup as
    /// now minus the configured lookback.
    pub fn new(api: A, notifier: N, window: i64) -> Self {
        Self {
            api,
            notifier,
            window,
            status_gate: ChangeGate::default(),
            report_gate: ChangeGate::default(),
        }
    }

    pub fn last_sent_message(&self) -> Option<&str> {
        self.status_gate.last_sent()
    }

    async fn tick(&mut self) -> Result<TickOutcome, TickError> {
        let payload = self.api.fetch(self.window).await?;
        let record = validate(&payload)?;
        let message = translate(&record)?;

        if !self.status_gate.should_notify(&message) {
            info!(homework = %record.homework_name, "status unchanged; nothing to send");
            return Ok(TickOutcome::Unchanged);
        }

        self.notifier.send(&message).await?;
        self.status_gate.commit(&message);
        info!(%message, "status notification delivered");
        Ok(TickOutcome::Notified)
    }

    /// One full iteration including the failure policy. Never propagates an
    /// error: every failure is classified, logged exactly once, and at most
    /// one best-effort report goes out per tick.
    #[instrument(skip_all)]
    pub async fn run_once(&mut self) -> TickOutcome {
        match self.tick().await {
            Ok(outcome) => outcome,
            Err(err) => {
                error!(%err, "tick failed");
                if !err.originated_in_notifier() {
                    self.report_failure(&err).await;
                }
                TickOutcome::Failed
            }
        }
    }

    /// Best-effort chat report of a tick failure, deduplicated through its
    /// own gate so a persistent upstream fault produces one message rather
    /// than one per tick.
    async fn report_failure(&mut self, err: &TickError) {
        let report = format!("Watcher failure: {err}");
        if !self.report_gate.should_notify(&report) {
            return;
        }
        match self.notifier.send(&report).await {
            Ok(()) => self.report_gate.commit(&report),
            Err(send_err) => warn!(%send_err, "could not deliver failure report"),
        }
    }

    /// Drive the loop forever at a fixed cadence. The sleep runs on every
    /// path out of a tick, so the cadence is uniform across outcomes.
    pub async fn run(mut self, interval: Duration) {
        info!(window = self.window, interval_secs = interval.as_secs(), "starting poll loop");
        loop {
            self.run_once().await;
            tokio::time::sleep(interval).await;
        }
    }
}
