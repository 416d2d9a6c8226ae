use sdrview_messages::{CaptureWindow, DeviceSnapshot, Hertz, SpectrumFrame};

use crate::axes::{AxisKey, AxisLabels};
use crate::colormap::Palette;
use crate::input::Action;
use crate::pipeline::RenderState;
use crate::range::DisplayRange;
use crate::spectrum::trace_heights;
use crate::waterfall::Waterfall;

/// Header fields of the last frame that reached the pipeline.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameInfo {
    pub sample_rate: Hertz,
    pub center_frequency: Hertz,
    pub capture: Option<CaptureWindow>,
    pub bins: usize,
}

/// Startup settings of the display.
#[derive(Debug, Clone, Copy)]
pub struct ViewOptions {
    pub history_rows: usize,
    pub range: DisplayRange,
    pub averaging_factor: u32,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            history_rows: crate::waterfall::DEFAULT_HISTORY_ROWS,
            range: DisplayRange::default(),
            averaging_factor: 0,
        }
    }
}

/// Everything drawn for the spectrum: pipeline state, waterfall, plot traces and labels.
///
/// Frames and plot resizes are the two update entry points.
pub struct SpectrumView {
    state: RenderState,
    palette: Palette,
    waterfall: Waterfall,
    trace: Vec<usize>,
    max_trace: Option<Vec<usize>>,
    plot_height: usize,
    labels: AxisLabels,
    last_frame: Option<FrameInfo>,
}

impl SpectrumView {
    pub fn new(options: ViewOptions) -> Self {
        Self {
            state: RenderState::new(options.range, options.averaging_factor),
            palette: Palette::default(),
            waterfall: Waterfall::new(options.history_rows),
            trace: Vec::new(),
            max_trace: None,
            plot_height: 0,
            labels: AxisLabels::default(),
            last_frame: None,
        }
    }

    /// Run a frame through the pipeline. Returns false if it was dropped because of pause.
    pub fn on_frame(&mut self, frame: &SpectrumFrame) -> bool {
        if !self.state.process(frame) {
            return false;
        }
        if let Some(bins) = self.state.display_bins() {
            self.waterfall.push_row(bins, self.state.range(), &self.palette);
        }
        self.last_frame = Some(FrameInfo {
            sample_rate: frame.sample_rate,
            center_frequency: frame.center_frequency,
            capture: frame.capture,
            bins: frame.len(),
        });
        self.rebuild_traces();
        true
    }

    /// The plot area changed height.
    pub fn resize(&mut self, plot_height: usize) {
        if plot_height != self.plot_height {
            self.plot_height = plot_height;
            self.rebuild_traces();
        }
    }

    fn rebuild_traces(&mut self) {
        let range = *self.state.range();
        self.trace = self
            .state
            .display_bins()
            .map(|bins| trace_heights(bins, &range, self.plot_height))
            .unwrap_or_default();
        self.max_trace = self
            .state
            .max_hold_bins()
            .map(|bins| trace_heights(bins, &range, self.plot_height));
    }

    /// Apply a display action. Fullscreen belongs to the window and is not handled here.
    pub fn apply(&mut self, action: Action) -> bool {
        match action {
            Action::TogglePause => self.state.toggle_pause(),
            Action::ToggleMaxHold => self.state.toggle_max_hold(),
            Action::TogglePeaks => self.state.toggle_peaks(),
            Action::AveragingUp => self.state.increase_averaging(),
            Action::AveragingDown => self.state.decrease_averaging(),
            Action::ShiftUp => self.state.range_mut().shift_up(),
            Action::ShiftDown => self.state.range_mut().shift_down(),
            Action::ZoomIn => self.state.range_mut().zoom_in(),
            Action::ZoomOut => self.state.range_mut().zoom_out(),
            Action::CycleColors => self.palette = Palette::new(self.palette.table().next()),
            Action::ToggleFullscreen => return false,
        }
        if matches!(
            action,
            Action::ShiftUp | Action::ShiftDown | Action::ZoomIn | Action::ZoomOut | Action::ToggleMaxHold
        ) {
            self.rebuild_traces();
        }
        true
    }

    /// Refresh axis labels for the plot width and the current tuning.
    pub fn update_labels(&mut self, width_px: usize, device: Option<&DeviceSnapshot>) {
        let Some(frame) = self.last_frame else {
            return;
        };
        let offset = device.map(DeviceSnapshot::conversion_offset).unwrap_or(0.0);
        let span = match frame.sample_rate.as_hz() {
            0 => device.and_then(DeviceSnapshot::sample_rate).map_or(0, Hertz::as_hz),
            hz => hz,
        };
        self.labels.update(AxisKey {
            center_hz: frame.center_frequency.as_hz() as f64 + offset,
            span_hz: span as f64,
            range: *self.state.range(),
            width_px,
        });
    }

    pub fn state(&self) -> &RenderState {
        &self.state
    }

    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    pub fn waterfall(&self) -> &Waterfall {
        &self.waterfall
    }

    pub fn waterfall_mut(&mut self) -> &mut Waterfall {
        &mut self.waterfall
    }

    /// Heights of the current trace, in pixels above the plot bottom.
    pub fn trace(&self) -> &[usize] {
        &self.trace
    }

    pub fn max_trace(&self) -> Option<&[usize]> {
        self.max_trace.as_deref()
    }

    pub fn plot_height(&self) -> usize {
        self.plot_height
    }

    pub fn labels(&self) -> &AxisLabels {
        &self.labels
    }

    pub fn last_frame(&self) -> Option<&FrameInfo> {
        self.last_frame.as_ref()
    }
}
