mod cancel;
mod control;
mod link;
mod reconnect;
mod sink;
pub mod sources;

use anyhow::Result;
use flume::{Receiver, Sender};
use log::{debug, error, info, warn};
use sdrview_messages::{Command, ControlRequest, EngineState, Event, LinkStatus, SourceConfig};
use std::thread;
use std::time::Duration;

pub use cancel::CancellationToken;
pub use control::ControlLink;
pub use reconnect::RECONNECT_DELAY;
pub use sink::EventSink;

/// The engine backend.
/// Owns the active frame source and processes commands from the UI.
pub struct Engine {
    cmd_rx: Receiver<Command>,
    event_tx: Sender<Event>,
    current_config: SourceConfig,
    reconnect_delay: Duration,
    should_exit: bool,
}

/// Threads running one source configuration.
struct RunningSource {
    cancel: CancellationToken,
    source: Option<thread::JoinHandle<Result<()>>>,
    control: Option<(Sender<ControlRequest>, thread::JoinHandle<()>)>,
}

impl RunningSource {
    fn source_finished(&self) -> bool {
        self.source.as_ref().is_none_or(|handle| handle.is_finished())
    }

    fn shutdown(self) {
        self.cancel.cancel();
        if let Some(handle) = self.source {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(e)) => warn!("Source stopped with error: {:#}", e),
                Err(_) => error!("Source thread panicked"),
            }
        }
        if let Some((control_tx, handle)) = self.control {
            drop(control_tx);
            if handle.join().is_err() {
                error!("Control thread panicked");
            }
        }
    }
}

impl Engine {
    /// Create a new Engine instance.
    pub fn new(
        cmd_rx: Receiver<Command>,
        event_tx: Sender<Event>,
        source_config: SourceConfig,
    ) -> Self {
        debug!("Constructing a new engine");
        Self {
            cmd_rx,
            event_tx,
            current_config: source_config,
            reconnect_delay: RECONNECT_DELAY,
            should_exit: false,
        }
    }

    /// Override the fixed delay between reconnect attempts.
    pub fn with_reconnect_delay(mut self, delay: Duration) -> Self {
        self.reconnect_delay = delay;
        self
    }

    /// Run the engine (blocking).
    /// Runs in a loop that restarts the source when the configuration changes.
    pub fn run(mut self) -> Result<()> {
        while !self.should_exit {
            self.run_source_iteration()?;
        }
        info!("Engine stopped");
        Ok(())
    }

    fn run_source_iteration(&mut self) -> Result<()> {
        let state = EngineState {
            source_config: self.current_config.clone(),
        };
        self.event_tx.send(Event::StateSnapshot(state))?;

        let running = self.start_source();
        self.process_commands(&running);
        running.shutdown();
        Ok(())
    }

    fn start_source(&self) -> RunningSource {
        let cancel = CancellationToken::new();
        let sink = EventSink::new(self.event_tx.clone(), cancel.clone());
        info!("Starting source {}", self.current_config.describe());

        let source = match sources::build_source(&self.current_config, self.reconnect_delay) {
            Ok(mut source) => {
                let sink = sink.clone();
                Some(thread::spawn(move || source.run(&sink)))
            }
            Err(e) => {
                warn!("Cannot start source: {:#}", e);
                let _ = sink.send(Event::Link(LinkStatus::Disconnected(format!("{e:#}"))));
                None
            }
        };

        let control = match &self.current_config {
            SourceConfig::WebSocket {
                control_url: Some(url),
                ..
            } => {
                let (control_tx, control_rx) = flume::unbounded();
                let link = ControlLink::new(url.clone(), self.reconnect_delay);
                let handle = thread::spawn(move || link.run(&sink, &control_rx));
                Some((control_tx, handle))
            }
            _ => None,
        };

        RunningSource {
            cancel,
            source,
            control,
        }
    }

    fn process_commands(&mut self, running: &RunningSource) {
        let mut reported_finish = false;
        loop {
            let msg = self.cmd_rx.recv_timeout(Duration::from_millis(100));

            match msg {
                Ok(Command::Stop) | Err(flume::RecvTimeoutError::Disconnected) => {
                    debug!("Engine received stop");
                    self.should_exit = true;
                    break;
                }
                Ok(Command::ChangeSource(new_config)) => {
                    debug!("Engine received source change to {:?}", new_config);
                    self.current_config = new_config;
                    break;
                }
                Ok(Command::Control(request)) => match &running.control {
                    Some((control_tx, _)) => {
                        let _ = control_tx.send(request);
                    }
                    None => warn!("No control channel configured, dropping {:?}", request),
                },
                Err(flume::RecvTimeoutError::Timeout) => {
                    if running.cancel.is_cancelled() {
                        // The UI dropped its event receiver
                        self.should_exit = true;
                        break;
                    }
                    if !reported_finish && running.source_finished() {
                        info!("Source finished, waiting for commands");
                        reported_finish = true;
                    }
                }
            }
        }
    }
}
