use anyhow::Result;
use log::{debug, info, trace};
use std::time::Duration;
use tungstenite::Message;

use sdrview_messages::{Event, LinkStatus, WireFormat, wire};

use crate::link::{self, Poll};
use crate::reconnect::Supervisor;
use crate::sink::EventSink;

use super::FrameSource;

/// Frames streamed by a spectrum server as binary websocket messages.
pub struct WebSocketSource {
    url: String,
    format: WireFormat,
    reconnect_delay: Duration,
    dropped: u64,
}

impl WebSocketSource {
    pub fn new(url: String, format: WireFormat, reconnect_delay: Duration) -> Self {
        Self {
            url,
            format,
            reconnect_delay,
            dropped: 0,
        }
    }

    fn stream_once(&mut self, sink: &EventSink) -> Result<()> {
        sink.send(Event::Link(LinkStatus::Connecting))?;
        let mut socket = link::open(&self.url)?;
        info!("Connected to {} ({} frames)", self.url, self.format);
        sink.send(Event::Link(LinkStatus::Connected))?;

        while !sink.is_cancelled() {
            match link::poll(&mut socket)? {
                Poll::Idle => {}
                Poll::Closed => return Ok(()),
                Poll::Message(Message::Binary(payload)) => {
                    match wire::decode(self.format, &payload) {
                        Ok(frame) => sink.send(Event::Frame(frame))?,
                        Err(e) => {
                            self.dropped += 1;
                            debug!("Dropping frame ({} dropped so far): {}", self.dropped, e);
                        }
                    }
                }
                Poll::Message(other) => trace!("Ignoring non-binary message {:?}", other),
            }
        }

        link::close(&mut socket);
        Ok(())
    }
}

impl FrameSource for WebSocketSource {
    fn run(&mut self, sink: &EventSink) -> Result<()> {
        let supervisor = Supervisor::new("frame", self.reconnect_delay, sink.cancel_token().clone());
        supervisor.run(
            || self.stream_once(sink),
            |reason| {
                let _ = sink.send(Event::Link(LinkStatus::Disconnected(reason)));
            },
        );
        Ok(())
    }
}
