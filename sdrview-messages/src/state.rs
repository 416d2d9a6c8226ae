use crate::{Hertz, WireFormat};
use std::path::PathBuf;
use std::time::Duration;

/// Current state of the engine, sent every time a source is (re)started.
#[derive(Debug, Clone)]
pub struct EngineState {
    /// Current source configuration
    pub source_config: SourceConfig,
}

/// Where spectrum frames come from.
#[derive(Debug, Clone, PartialEq)]
pub enum SourceConfig {
    /// Binary frames from a spectrum server.
    WebSocket {
        url: String,
        /// Optional JSON control channel of the same server
        control_url: Option<String>,
        format: WireFormat,
    },
    /// Replay a capture file of concatenated frames.
    File {
        path: PathBuf,
        format: WireFormat,
        interval: Duration,
        loop_on_eof: bool,
    },
    /// Synthesize frames with a single tone.
    Generator {
        sample_rate: Hertz,
        center_frequency: Hertz,
        tone_offset: Hertz,
        fft_size: usize,
        interval: Duration,
    },
}

impl SourceConfig {
    pub fn describe(&self) -> String {
        match self {
            SourceConfig::WebSocket { url, format, .. } => format!("{url} ({format})"),
            SourceConfig::File { path, format, .. } => format!("{} ({format})", path.display()),
            SourceConfig::Generator {
                center_frequency,
                tone_offset,
                ..
            } => format!(
                "tone generator at {} + {}",
                center_frequency.pretty(),
                tone_offset.pretty()
            ),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        SourceConfig::WebSocket {
            url: "ws://127.0.0.1:8080/fft".to_owned(),
            control_url: None,
            format: WireFormat::Legacy,
        }
    }
}

/// Health of a network link, shown as the connectivity indicator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkStatus {
    Connecting,
    Connected,
    Disconnected(String),
}

impl LinkStatus {
    pub fn is_connected(&self) -> bool {
        matches!(self, LinkStatus::Connected)
    }
}

impl std::fmt::Display for LinkStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LinkStatus::Connecting => f.write_str("connecting"),
            LinkStatus::Connected => f.write_str("connected"),
            LinkStatus::Disconnected(reason) => write!(f, "disconnected: {reason}"),
        }
    }
}
