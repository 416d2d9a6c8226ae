//! Binary spectrum frame codec.
//!
//! Every field is big-endian. Both layouts end with an `i32` bin count `N`
//! followed by `N` magnitude floats and `N` peak floats:
//!
//! ```text
//! legacy:   i32 sps | i32 center_hz  | i32 start | i32 end                          | i32 N | f32[N] | f32[N]
//! extended: i32 sps | f32 center_mhz | i32 start_s | i32 start_ns | i32 end_s | i32 end_ns | i32 N | f32[N] | f32[N]
//! ```

use thiserror::Error;

use crate::{CaptureWindow, Hertz, SpectrumFrame, Timestamp};

const WORD: usize = 4;

/// Layout of the binary frames sent by the spectrum server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum WireFormat {
    /// Integer Hz center frequency, single-word capture times
    #[default]
    Legacy,
    /// Float MHz center frequency, second/nanosecond capture times
    Extended,
}

impl WireFormat {
    /// Size of the fixed header, bin count included.
    pub const fn header_len(self) -> usize {
        match self {
            WireFormat::Legacy => 5 * WORD,
            WireFormat::Extended => 7 * WORD,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WireFormat::Legacy => "legacy",
            WireFormat::Extended => "extended",
        }
    }
}

impl std::fmt::Display for WireFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Reasons a buffer could not be turned into a [`SpectrumFrame`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("truncated frame: need {expected} bytes, got {actual}")]
    Truncated { expected: usize, actual: usize },
    #[error("negative bin count {0}")]
    NegativeCount(i32),
    #[error("invalid {field} in frame header")]
    InvalidField { field: &'static str },
}

/// Big-endian reader over a buffer whose length has already been checked.
struct BeReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BeReader<'a> {
    fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    fn word(&mut self) -> [u8; WORD] {
        let mut word = [0u8; WORD];
        word.copy_from_slice(&self.buf[self.pos..self.pos + WORD]);
        self.pos += WORD;
        word
    }

    fn i32(&mut self) -> i32 {
        i32::from_be_bytes(self.word())
    }

    fn f32(&mut self) -> f32 {
        f32::from_be_bytes(self.word())
    }

    fn f32s(&mut self, n: usize) -> Vec<f32> {
        (0..n).map(|_| self.f32()).collect()
    }
}

fn count_to_len(count: i32) -> Result<usize, FrameError> {
    usize::try_from(count).map_err(|_| FrameError::NegativeCount(count))
}

fn total_len(format: WireFormat, bins: usize) -> usize {
    bins.saturating_mul(2 * WORD)
        .saturating_add(format.header_len())
}

/// Full length in bytes of the frame starting at `buf`, derived from its header.
///
/// Only the header has to be present.
pub fn frame_len(format: WireFormat, buf: &[u8]) -> Result<usize, FrameError> {
    let header_len = format.header_len();
    if buf.len() < header_len {
        return Err(FrameError::Truncated {
            expected: header_len,
            actual: buf.len(),
        });
    }
    let mut reader = BeReader::new(&buf[header_len - WORD..header_len]);
    let bins = count_to_len(reader.i32())?;
    Ok(total_len(format, bins))
}

/// Decode one frame. Bytes past the declared payload are ignored.
pub fn decode(format: WireFormat, buf: &[u8]) -> Result<SpectrumFrame, FrameError> {
    let expected = frame_len(format, buf)?;
    if buf.len() < expected {
        return Err(FrameError::Truncated {
            expected,
            actual: buf.len(),
        });
    }

    let mut reader = BeReader::new(buf);
    let sample_rate = reader.i32();
    let (center_frequency, capture) = match format {
        WireFormat::Legacy => {
            let center_hz = reader.i32();
            // start and end are single words the extended layout replaced
            let _start = reader.i32();
            let _end = reader.i32();
            let center = u64::try_from(center_hz)
                .map(Hertz)
                .map_err(|_| FrameError::InvalidField {
                    field: "center frequency",
                })?;
            (center, None)
        }
        WireFormat::Extended => {
            let center = Hertz::from_mhz_f32(reader.f32()).ok_or(FrameError::InvalidField {
                field: "center frequency",
            })?;
            let start = Timestamp {
                seconds: reader.i32(),
                nanoseconds: reader.i32(),
            };
            let end = Timestamp {
                seconds: reader.i32(),
                nanoseconds: reader.i32(),
            };
            (center, Some(CaptureWindow { start, end }))
        }
    };
    let bins = count_to_len(reader.i32())?;

    let sample_rate = u64::try_from(sample_rate)
        .map(Hertz)
        .map_err(|_| FrameError::InvalidField {
            field: "sample rate",
        })?;

    let magnitudes = reader.f32s(bins);
    let peaks = reader.f32s(bins);

    Ok(SpectrumFrame {
        sample_rate,
        center_frequency,
        capture,
        magnitudes,
        peaks,
    })
}

/// Encode a frame in the given layout.
///
/// Values that do not fit a header word saturate. The legacy layout keeps only
/// the whole seconds of the capture window.
pub fn encode(format: WireFormat, frame: &SpectrumFrame) -> Vec<u8> {
    let bins = frame.magnitudes.len().min(frame.peaks.len());
    let mut out = Vec::with_capacity(total_len(format, bins));
    let capture = frame.capture.unwrap_or_default();
    let saturate = |v: u64| i32::try_from(v).unwrap_or(i32::MAX);

    out.extend_from_slice(&saturate(frame.sample_rate.0).to_be_bytes());
    match format {
        WireFormat::Legacy => {
            out.extend_from_slice(&saturate(frame.center_frequency.0).to_be_bytes());
            out.extend_from_slice(&capture.start.seconds.to_be_bytes());
            out.extend_from_slice(&capture.end.seconds.to_be_bytes());
        }
        WireFormat::Extended => {
            out.extend_from_slice(&(frame.center_frequency.as_mhz() as f32).to_be_bytes());
            for word in [
                capture.start.seconds,
                capture.start.nanoseconds,
                capture.end.seconds,
                capture.end.nanoseconds,
            ] {
                out.extend_from_slice(&word.to_be_bytes());
            }
        }
    }
    out.extend_from_slice(&saturate(bins as u64).to_be_bytes());
    for value in frame.magnitudes[..bins].iter().chain(&frame.peaks[..bins]) {
        out.extend_from_slice(&value.to_be_bytes());
    }
    out
}
