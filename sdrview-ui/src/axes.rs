use crate::range::DisplayRange;

const LEVEL_STEP_DB: f32 = 10.0;

/// One axis label and where it sits along the axis (0.0 = left/bottom edge).
#[derive(Debug, Clone, PartialEq)]
pub struct Tick {
    pub fraction: f32,
    pub label: String,
}

/// Round a raw tick spacing up to 1, 2 or 5 times a power of ten.
pub fn nice_step(raw: f64) -> f64 {
    if !raw.is_finite() || raw <= 0.0 {
        return 1.0;
    }
    let magnitude = 10f64.powi(raw.log10().floor() as i32);
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}

pub fn format_frequency(hz: f64) -> String {
    let abs = hz.abs();
    if abs >= 1e9 {
        format!("{:.4} GHz", hz / 1e9)
    } else if abs >= 1e6 {
        format!("{:.3} MHz", hz / 1e6)
    } else if abs >= 1e3 {
        format!("{:.1} kHz", hz / 1e3)
    } else {
        format!("{hz:.0} Hz")
    }
}

/// Ticks on round frequencies across `center ± span / 2`, at most about `max_ticks` of them.
pub fn frequency_ticks(center_hz: f64, span_hz: f64, max_ticks: usize) -> Vec<Tick> {
    if span_hz <= 0.0 || max_ticks == 0 {
        return Vec::new();
    }
    let step = nice_step(span_hz / max_ticks as f64);
    let low = center_hz - span_hz / 2.0;
    let high = center_hz + span_hz / 2.0;

    let mut ticks = Vec::new();
    let mut index = (low / step).ceil();
    let mut previous = None;
    // far from zero the f64 index stops advancing, so the count is capped too
    while ticks.len() < max_ticks + 2 {
        let freq = index * step;
        if freq > high + step * 1e-9 || previous.is_some_and(|p| freq <= p) {
            break;
        }
        ticks.push(Tick {
            fraction: ((freq - low) / span_hz) as f32,
            label: format_frequency(freq),
        });
        previous = Some(freq);
        index += 1.0;
    }
    ticks
}

/// Ticks every 10 dB inside the display window, fraction measured from the bottom.
pub fn level_ticks(range: &DisplayRange) -> Vec<Tick> {
    let mut ticks = Vec::new();
    let mut level = (range.min_db() / LEVEL_STEP_DB).ceil() * LEVEL_STEP_DB;
    while level <= range.max_db() {
        ticks.push(Tick {
            fraction: range.fraction(level),
            label: format!("{level:.0}"),
        });
        level += LEVEL_STEP_DB;
    }
    ticks
}

/// Inputs the labels depend on.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisKey {
    pub center_hz: f64,
    pub span_hz: f64,
    pub range: DisplayRange,
    pub width_px: usize,
}

/// Axis labels, recomputed only when their inputs change.
#[derive(Debug, Default)]
pub struct AxisLabels {
    key: Option<AxisKey>,
    frequency: Vec<Tick>,
    level: Vec<Tick>,
}

impl AxisLabels {
    /// Returns true if the labels were rebuilt.
    pub fn update(&mut self, key: AxisKey) -> bool {
        if self.key == Some(key) {
            return false;
        }
        let max_ticks = (key.width_px / 120).max(2);
        self.frequency = frequency_ticks(key.center_hz, key.span_hz, max_ticks);
        self.level = level_ticks(&key.range);
        self.key = Some(key);
        true
    }

    pub fn frequency(&self) -> &[Tick] {
        &self.frequency
    }

    pub fn level(&self) -> &[Tick] {
        &self.level
    }
}
