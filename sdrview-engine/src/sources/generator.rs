use anyhow::Result;
use log::info;
use std::time::Duration;

use sdrview_messages::{Event, Hertz, SpectrumFrame};

use crate::sink::EventSink;

use super::FrameSource;

const NOISE_FLOOR_DB: f32 = -90.0;
const NOISE_RIPPLE_DB: f32 = 4.0;
const TONE_DB: f32 = -20.0;

/// Synthesizes frames containing one tone above a rippling noise floor.
///
/// Bins are laid out like a shifted FFT: the center frequency sits at bin `n / 2`.
#[derive(Debug)]
pub struct ToneGenerator {
    sample_rate: Hertz,
    center_frequency: Hertz,
    tone_offset: Hertz,
    fft_size: usize,
    interval: Duration,
    frame_index: u64,
}

impl ToneGenerator {
    pub fn new(
        sample_rate: Hertz,
        center_frequency: Hertz,
        tone_offset: Hertz,
        fft_size: usize,
        interval: Duration,
    ) -> Self {
        Self {
            sample_rate,
            center_frequency,
            tone_offset,
            fft_size: fft_size.max(2),
            interval,
            frame_index: 0,
        }
    }

    /// Bin index the tone lands in.
    pub fn tone_bin(&self) -> usize {
        let bin_width = self.sample_rate.0 as f64 / self.fft_size as f64;
        let offset_bins = if bin_width > 0.0 {
            (self.tone_offset.0 as f64 / bin_width).round() as usize
        } else {
            0
        };
        (self.fft_size / 2 + offset_bins).min(self.fft_size - 1)
    }

    pub fn next_frame(&mut self) -> SpectrumFrame {
        let phase = self.frame_index as f32 * 0.7;
        let tone_bin = self.tone_bin();

        let magnitudes: Vec<f32> = (0..self.fft_size)
            .map(|i| {
                if i == tone_bin {
                    TONE_DB
                } else {
                    NOISE_FLOOR_DB + NOISE_RIPPLE_DB * (i as f32 * 0.37 + phase).sin()
                }
            })
            .collect();
        let peaks = magnitudes
            .iter()
            .enumerate()
            .map(|(i, &m)| m + (NOISE_RIPPLE_DB * (i as f32 * 0.11 - phase).cos()).abs())
            .collect();

        self.frame_index += 1;
        SpectrumFrame {
            sample_rate: self.sample_rate,
            center_frequency: self.center_frequency,
            capture: None,
            magnitudes,
            peaks,
        }
    }
}

impl FrameSource for ToneGenerator {
    fn run(&mut self, sink: &EventSink) -> Result<()> {
        info!(
            "Generating {} bin frames, tone at bin {}",
            self.fft_size,
            self.tone_bin()
        );
        loop {
            let frame = self.next_frame();
            sink.send(Event::Frame(frame))?;
            if sink.cancel_token().sleep(self.interval) {
                return Ok(());
            }
        }
    }
}
