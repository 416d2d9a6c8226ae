use crate::Hertz;

/// Wall-clock instant reported by the spectrum server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct Timestamp {
    pub seconds: i32,
    pub nanoseconds: i32,
}

impl Timestamp {
    pub fn as_secs_f64(self) -> f64 {
        f64::from(self.seconds) + f64::from(self.nanoseconds) * 1e-9
    }
}

/// Time span covered by the FFTs folded into one frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaptureWindow {
    pub start: Timestamp,
    pub end: Timestamp,
}

impl CaptureWindow {
    /// Duration of the window in seconds. Negative if the server clocks went backwards.
    pub fn duration_secs(&self) -> f64 {
        self.end.as_secs_f64() - self.start.as_secs_f64()
    }
}

/// One decoded spectrum message.
///
/// `magnitudes` and `peaks` always hold the same number of bins.
#[derive(Debug, Clone, PartialEq)]
pub struct SpectrumFrame {
    /// Sample rate of the digitiser when the FFTs were taken
    pub sample_rate: Hertz,
    /// Center frequency of the capture
    pub center_frequency: Hertz,
    /// Only carried by the extended wire format
    pub capture: Option<CaptureWindow>,
    /// Power per bin of the most recent FFT, in dB
    pub magnitudes: Vec<f32>,
    /// Maximum power per bin since the previous frame, in dB
    pub peaks: Vec<f32>,
}

impl SpectrumFrame {
    /// Number of bins in the frame.
    pub fn len(&self) -> usize {
        self.magnitudes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.magnitudes.is_empty()
    }

    /// Either the live magnitudes or the peak-hold bins.
    pub fn bins(&self, peaks: bool) -> &[f32] {
        if peaks { &self.peaks } else { &self.magnitudes }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capture_duration() {
        let window = CaptureWindow {
            start: Timestamp { seconds: 10, nanoseconds: 500_000_000 },
            end: Timestamp { seconds: 12, nanoseconds: 0 },
        };
        assert_eq!(window.duration_secs(), 1.5);
    }
}
