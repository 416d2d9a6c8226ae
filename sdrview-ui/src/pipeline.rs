use sdrview_messages::SpectrumFrame;

use crate::range::DisplayRange;

/// Fraction of its magnitude a held maximum relaxes by on every frame.
pub const MAX_HOLD_DECAY: f32 = 0.0025;
pub const MAX_AVERAGING_FACTOR: u32 = 100;

/// Held maximum after one frame without a higher sample.
///
/// Moves away from zero for negative dB and towards it for positive dB, so the
/// held value never increases on its own.
pub fn decay(held: f32) -> f32 {
    held - MAX_HOLD_DECAY * held.abs()
}

/// Smoothing weight of a new frame for an averaging factor.
pub fn alpha(averaging_factor: u32) -> f32 {
    2.0 / (averaging_factor as f32 + 1.0)
}

/// Running state of the render pipeline: averaging, max-hold and mode switches.
///
/// Buffers are sized to the bin count of the last accepted frame and reset when it changes.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderState {
    averaging_factor: u32,
    running_average: Option<Vec<f32>>,
    max_hold: bool,
    running_max: Option<Vec<f32>>,
    range: DisplayRange,
    paused: bool,
    show_peaks: bool,
}

impl Default for RenderState {
    fn default() -> Self {
        Self::new(DisplayRange::default(), 0)
    }
}

impl RenderState {
    pub fn new(range: DisplayRange, averaging_factor: u32) -> Self {
        Self {
            averaging_factor: averaging_factor.min(MAX_AVERAGING_FACTOR),
            running_average: None,
            max_hold: false,
            running_max: None,
            range,
            paused: false,
            show_peaks: false,
        }
    }

    /// Feed one frame. Returns false, leaving every buffer untouched, while paused.
    pub fn process(&mut self, frame: &SpectrumFrame) -> bool {
        if self.paused {
            return false;
        }
        self.update_average(frame.bins(self.show_peaks));
        self.update_max_hold();
        true
    }

    fn update_average(&mut self, bins: &[f32]) {
        let factor = self.averaging_factor;
        match self.running_average.as_mut() {
            Some(average) if average.len() == bins.len() => {
                if factor == 0 {
                    average.copy_from_slice(bins);
                } else {
                    let alpha = alpha(factor);
                    for (avg, &bin) in average.iter_mut().zip(bins) {
                        *avg += alpha * (bin - *avg);
                    }
                }
            }
            _ => self.running_average = Some(bins.to_vec()),
        }
    }

    fn update_max_hold(&mut self) {
        if !self.max_hold {
            self.running_max = None;
            return;
        }
        let Some(bins) = self.running_average.as_deref() else {
            return;
        };
        match self.running_max.as_mut() {
            Some(held) if held.len() == bins.len() => {
                for (max, &bin) in held.iter_mut().zip(bins) {
                    *max = bin.max(decay(*max));
                }
            }
            _ => self.running_max = Some(bins.to_vec()),
        }
    }

    /// Bins to draw for the last accepted frame.
    pub fn display_bins(&self) -> Option<&[f32]> {
        self.running_average.as_deref()
    }

    pub fn max_hold_bins(&self) -> Option<&[f32]> {
        self.running_max.as_deref()
    }

    pub fn averaging_factor(&self) -> u32 {
        self.averaging_factor
    }

    pub fn set_averaging_factor(&mut self, factor: u32) {
        self.averaging_factor = factor.min(MAX_AVERAGING_FACTOR);
    }

    pub fn increase_averaging(&mut self) {
        self.set_averaging_factor(self.averaging_factor.saturating_add(1));
    }

    pub fn decrease_averaging(&mut self) {
        self.set_averaging_factor(self.averaging_factor.saturating_sub(1));
    }

    pub fn max_hold(&self) -> bool {
        self.max_hold
    }

    /// Toggling either way drops the held trace; it is reseeded from the next frame.
    pub fn toggle_max_hold(&mut self) {
        self.max_hold = !self.max_hold;
        self.running_max = None;
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn toggle_pause(&mut self) {
        self.paused = !self.paused;
    }

    pub fn show_peaks(&self) -> bool {
        self.show_peaks
    }

    pub fn toggle_peaks(&mut self) {
        self.show_peaks = !self.show_peaks;
    }

    pub fn range(&self) -> &DisplayRange {
        &self.range
    }

    pub fn range_mut(&mut self) -> &mut DisplayRange {
        &mut self.range
    }
}
