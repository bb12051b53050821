//! Poll loop tying the fetcher, validator, translator and notifier together

use std::time::Duration;

use tracing::{debug, error, info};

use crate::config::PollerConfig;
use crate::error::Result;
use crate::models::PollResponse;

use super::fetcher::StatusSource;
use super::notifier::{Messenger, Notifier};
use super::translator::parse_status;
use super::validator::into_poll_response;

/// Prefix of every failure report sent to the chat
pub const FAILURE_PREFIX: &str = "Сбой в работе программы";

/// What a single cycle did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CycleOutcome {
    /// The response carried no status changes
    Idle,
    /// The response carried status changes; this many messages reached the chat
    Delivered(usize),
    /// The cycle failed
    Failed {
        /// Formatted failure message
        message: String,
        /// Whether the failure was reported to the chat
        notified: bool,
    },
}

/// Orchestrates poll cycles and owns the time cursor and the last reported failure
pub struct Poller<S, M> {
    source: S,
    notifier: Notifier<M>,
    cursor: i64,
    last_error: Option<String>,
    interval: Duration,
    reset_error_on_success: bool,
}

impl<S: StatusSource, M: Messenger> Poller<S, M> {
    /// Create a new poller starting at `cursor`
    pub fn new(source: S, notifier: Notifier<M>, config: &PollerConfig, cursor: i64) -> Self {
        Self {
            source,
            notifier,
            cursor,
            last_error: None,
            interval: config.interval,
            reset_error_on_success: config.reset_error_on_success,
        }
    }

    /// Current time cursor
    pub fn cursor(&self) -> i64 {
        self.cursor
    }

    /// Last failure message, if any
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Run cycles forever, sleeping the configured interval between them
    pub async fn run(&mut self) {
        info!(
            cursor = self.cursor,
            interval = %humantime::format_duration(self.interval),
            "Bot started"
        );

        loop {
            self.tick().await;
            tokio::time::sleep(self.interval).await;
        }
    }

    /// Run one cycle and report its failure, if any
    pub async fn tick(&mut self) -> CycleOutcome {
        match self.poll_once().await {
            Ok(None) => {
                self.on_success();
                CycleOutcome::Idle
            }
            Ok(Some(delivered)) => {
                self.on_success();
                CycleOutcome::Delivered(delivered)
            }
            Err(e) => {
                let message = format!("{FAILURE_PREFIX}: {e}");
                error!(cursor = self.cursor, "{message}");

                let notified = if self.last_error.as_deref() == Some(message.as_str()) {
                    debug!("Failure already reported, not notifying again");
                    false
                } else {
                    self.notifier.notify(&message).await
                };
                self.last_error = Some(message.clone());

                CycleOutcome::Failed { message, notified }
            }
        }
    }

    /// Fetch, validate and announce status changes
    ///
    /// Returns `None` when there was nothing to announce, otherwise the number
    /// of messages that reached the chat. The cursor advances as soon as the
    /// response is valid. A bad record aborts the remaining records of the
    /// cycle.
    pub async fn poll_once(&mut self) -> Result<Option<usize>> {
        let response = self.poll().await?;

        if response.is_empty() {
            debug!("No new statuses in the API response");
            return Ok(None);
        }

        let mut delivered = 0;
        for item in &response.homeworks {
            let message = parse_status(item)?;
            if self.notifier.notify(&message).await {
                delivered += 1;
            }
        }

        Ok(Some(delivered))
    }

    /// Fetch and validate one response, advancing the cursor
    pub async fn poll(&mut self) -> Result<PollResponse> {
        let payload = self.source.fetch(self.cursor).await?;
        let response = into_poll_response(payload)?;

        debug!(
            previous = self.cursor,
            current = response.current_date,
            homeworks = response.homeworks.len(),
            "Advancing time cursor"
        );
        self.cursor = response.current_date;

        Ok(response)
    }

    fn on_success(&mut self) {
        if self.reset_error_on_success && self.last_error.take().is_some() {
            debug!("Cleared last reported failure after a successful cycle");
        }
    }
}
