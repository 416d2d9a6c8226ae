use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, bail};
pub use clap::Parser;
use clap::ValueEnum;

use sdrview_messages::{Hertz, SourceConfig, WireFormat};
use sdrview_ui::ViewOptions;
use sdrview_ui::range::{DEFAULT_MAX_DB, DEFAULT_MIN_DB, DisplayRange};
use sdrview_ui::waterfall::DEFAULT_HISTORY_ROWS;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FormatArg {
    Legacy,
    Extended,
}

impl From<FormatArg> for WireFormat {
    fn from(format: FormatArg) -> Self {
        match format {
            FormatArg::Legacy => WireFormat::Legacy,
            FormatArg::Extended => WireFormat::Extended,
        }
    }
}

/// Live spectrum and waterfall viewer for an FFT streaming server.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Cli {
    /// WebSocket URL of the binary FFT stream.
    #[arg(long, default_value = "ws://127.0.0.1:8080/fft")]
    pub url: String,

    /// WebSocket URL of the JSON control channel.
    /// Device panel stays empty if not given.
    #[arg(long)]
    pub control_url: Option<String>,

    /// Layout of the binary frames.
    #[arg(long, value_enum, default_value_t = FormatArg::Legacy)]
    pub format: FormatArg,

    /// Replay a capture file of concatenated frames instead of connecting.
    #[arg(long)]
    pub replay: Option<PathBuf>,

    /// Delay between replayed frames.
    #[arg(long, default_value_t = 50)]
    pub replay_interval_ms: u64,

    /// Start the capture file over when it ends.
    #[arg(long)]
    pub loop_replay: bool,

    /// Show a synthetic tone instead of connecting.
    /// Takes precedence over --replay and --url.
    #[arg(long)]
    pub generator: bool,

    /// Number of rows kept in the waterfall.
    #[arg(long, default_value_t = DEFAULT_HISTORY_ROWS)]
    pub history_rows: usize,

    /// Level at the bottom of the plot, in dB.
    #[arg(long, default_value_t = DEFAULT_MIN_DB, allow_negative_numbers = true)]
    pub min_db: f32,

    /// Level at the top of the plot, in dB.
    #[arg(long, default_value_t = DEFAULT_MAX_DB, allow_negative_numbers = true)]
    pub max_db: f32,

    /// Averaging factor, 0 disables averaging.
    #[arg(long, default_value_t = 0, value_parser = clap::value_parser!(u32).range(0..=100))]
    pub averaging: u32,
}

impl Cli {
    pub fn source_config(&self) -> SourceConfig {
        let format = WireFormat::from(self.format);
        if self.generator {
            SourceConfig::Generator {
                sample_rate: Hertz::mhz(2),
                center_frequency: Hertz::mhz(100),
                tone_offset: Hertz::khz(250),
                fft_size: 1024,
                interval: Duration::from_millis(50),
            }
        } else if let Some(path) = &self.replay {
            SourceConfig::File {
                path: path.clone(),
                format,
                interval: Duration::from_millis(self.replay_interval_ms),
                loop_on_eof: self.loop_replay,
            }
        } else {
            SourceConfig::WebSocket {
                url: self.url.clone(),
                control_url: self.control_url.clone(),
                format,
            }
        }
    }

    pub fn view_options(&self) -> anyhow::Result<ViewOptions> {
        if self.history_rows == 0 {
            bail!("--history-rows must be at least 1");
        }
        let range = DisplayRange::new(self.min_db, self.max_db).with_context(|| {
            format!(
                "invalid display range {} .. {} dB, --max-db must be above --min-db",
                self.min_db, self.max_db
            )
        })?;
        Ok(ViewOptions {
            history_rows: self.history_rows,
            range,
            averaging_factor: self.averaging,
        })
    }
}
