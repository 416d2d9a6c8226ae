mod file;
mod generator;
mod websocket;

use anyhow::{Context, Result};
use std::time::Duration;

use sdrview_messages::SourceConfig;

use crate::sink::EventSink;

pub use file::FrameFileSource;
pub use generator::ToneGenerator;
pub use websocket::WebSocketSource;

/// Something that produces spectrum frames (network link, capture file, generator).
pub trait FrameSource: Send {
    /// Produce events until the source is exhausted or the sink is cancelled.
    fn run(&mut self, sink: &EventSink) -> Result<()>;
}

/// Build the frame source for a configuration.
pub fn build_source(
    config: &SourceConfig,
    reconnect_delay: Duration,
) -> Result<Box<dyn FrameSource>> {
    let source: Box<dyn FrameSource> = match config {
        SourceConfig::WebSocket { url, format, .. } => Box::new(WebSocketSource::new(
            url.clone(),
            *format,
            reconnect_delay,
        )),
        SourceConfig::File {
            path,
            format,
            interval,
            loop_on_eof,
        } => Box::new(
            FrameFileSource::open(path, *format, *loop_on_eof, *interval)
                .with_context(|| format!("cannot open capture {}", path.display()))?,
        ),
        SourceConfig::Generator {
            sample_rate,
            center_frequency,
            tone_offset,
            fft_size,
            interval,
        } => Box::new(ToneGenerator::new(
            *sample_rate,
            *center_frequency,
            *tone_offset,
            *fft_size,
            *interval,
        )),
    };
    Ok(source)
}
