use anyhow::{Result, bail};
use flume::{SendTimeoutError, Sender};
use log::debug;
use std::time::Duration;

use sdrview_messages::Event;

use crate::cancel::CancellationToken;

/// How long a blocked send waits before re-checking cancellation.
const SEND_POLL: Duration = Duration::from_millis(100);

/// Delivers events from a source thread to the UI.
///
/// The event channel is bounded, so sending blocks while the UI is behind.
/// A disconnected channel cancels the token: nobody is left to render frames.
#[derive(Debug, Clone)]
pub struct EventSink {
    event_tx: Sender<Event>,
    cancel: CancellationToken,
}

impl EventSink {
    pub fn new(event_tx: Sender<Event>, cancel: CancellationToken) -> Self {
        Self { event_tx, cancel }
    }

    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancel.is_cancelled()
    }

    pub fn send(&self, event: Event) -> Result<()> {
        let mut event = event;
        loop {
            if self.cancel.is_cancelled() {
                bail!("source cancelled");
            }
            match self.event_tx.send_timeout(event, SEND_POLL) {
                Ok(()) => return Ok(()),
                Err(SendTimeoutError::Timeout(pending)) => event = pending,
                Err(SendTimeoutError::Disconnected(_)) => {
                    debug!("Event channel disconnected, cancelling source");
                    self.cancel.cancel();
                    bail!("event channel disconnected");
                }
            }
        }
    }
}
