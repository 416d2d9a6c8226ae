use anyhow::Result;
use log::{info, warn};
use std::time::Duration;

use crate::cancel::CancellationToken;

/// Delay between a lost connection and the next attempt.
pub const RECONNECT_DELAY: Duration = Duration::from_secs(1);

/// Keeps a link alive: runs a connection attempt, waits a fixed delay when it
/// ends and tries again, forever, until the token is cancelled.
#[derive(Debug, Clone)]
pub(crate) struct Supervisor {
    name: &'static str,
    delay: Duration,
    cancel: CancellationToken,
}

impl Supervisor {
    pub fn new(name: &'static str, delay: Duration, cancel: CancellationToken) -> Self {
        Self {
            name,
            delay,
            cancel,
        }
    }

    /// Returns the number of attempts made.
    ///
    /// `attempt` returning `Ok` means the peer closed the link cleanly.
    /// `on_lost` receives the reason before each wait.
    pub fn run<A, L>(&self, mut attempt: A, mut on_lost: L) -> u64
    where
        A: FnMut() -> Result<()>,
        L: FnMut(String),
    {
        let mut attempts = 0;
        while !self.cancel.is_cancelled() {
            attempts += 1;
            let reason = match attempt() {
                Ok(()) => "closed by peer".to_owned(),
                Err(e) => format!("{e:#}"),
            };
            if self.cancel.is_cancelled() {
                break;
            }

            warn!(
                "{} link lost ({}), reconnecting in {:?} (attempt {})",
                self.name, reason, self.delay, attempts
            );
            on_lost(reason);
            if self.cancel.sleep(self.delay) {
                break;
            }
        }
        info!("{} link supervisor stopped after {} attempts", self.name, attempts);
        attempts
    }
}
