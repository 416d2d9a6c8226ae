use anyhow::{Context, Result};
use flume::Receiver;
use log::{debug, info, trace, warn};
use std::time::Duration;
use tungstenite::Message;

use sdrview_messages::{ControlRequest, DeviceSnapshot, Event};

use crate::link::{self, Poll, Socket};
use crate::reconnect::Supervisor;
use crate::sink::EventSink;

/// JSON side channel of the spectrum server.
///
/// Incoming text messages are device snapshots, outgoing ones are control requests.
pub struct ControlLink {
    url: String,
    reconnect_delay: Duration,
}

impl ControlLink {
    pub fn new(url: String, reconnect_delay: Duration) -> Self {
        Self {
            url,
            reconnect_delay,
        }
    }

    /// Run until cancelled. Requests queued while disconnected are sent after reconnecting.
    pub fn run(&self, sink: &EventSink, requests: &Receiver<ControlRequest>) {
        let supervisor =
            Supervisor::new("control", self.reconnect_delay, sink.cancel_token().clone());
        supervisor.run(|| self.session(sink, requests), |_reason| {});
    }

    fn session(&self, sink: &EventSink, requests: &Receiver<ControlRequest>) -> Result<()> {
        let mut socket = link::open(&self.url)?;
        info!("Control channel connected to {}", self.url);

        while !sink.is_cancelled() {
            for request in requests.try_iter() {
                send_request(&mut socket, &request)?;
            }

            match link::poll(&mut socket)? {
                Poll::Idle => {}
                Poll::Closed => return Ok(()),
                Poll::Message(Message::Text(text)) => match DeviceSnapshot::from_json(&text) {
                    Ok(snapshot) => sink.send(Event::Device(snapshot))?,
                    Err(e) => warn!("Ignoring malformed device snapshot: {}", e),
                },
                Poll::Message(other) => trace!("Ignoring control message {:?}", other),
            }
        }

        link::close(&mut socket);
        Ok(())
    }
}

fn send_request(socket: &mut Socket, request: &ControlRequest) -> Result<()> {
    let json = request.to_json().context("cannot encode control request")?;
    debug!("Sending control request {}", json);
    socket
        .send(Message::text(json))
        .context("cannot send control request")
}
