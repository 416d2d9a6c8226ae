use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::Hertz;

/// Tuned frequency as reported by the control channel.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FrequencySetting {
    /// Tuner frequency in Hz
    pub value: f64,
    /// Offset of an external up/down converter in Hz, added to `value`
    #[serde(default)]
    pub conversion: f64,
}

impl FrequencySetting {
    /// RF frequency seen at the antenna.
    pub fn effective(&self) -> f64 {
        self.value + self.conversion
    }
}

/// Device configuration pushed by the server on the control channel.
///
/// Only the fields the display needs are typed; the rest is kept verbatim so
/// the side panel can show it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceSnapshot {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digitiser_sample_rate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<FrequencySetting>,
    #[serde(flatten)]
    pub other: Map<String, Value>,
}

impl DeviceSnapshot {
    pub fn from_json(text: &str) -> serde_json::Result<Self> {
        serde_json::from_str(text)
    }

    pub fn sample_rate(&self) -> Option<Hertz> {
        self.digitiser_sample_rate.map(Hertz)
    }

    /// Converter offset to add to the frame's center frequency, in Hz.
    pub fn conversion_offset(&self) -> f64 {
        self.frequency.map(|f| f.conversion).unwrap_or(0.0)
    }
}

/// A configuration change sent to the server, shaped like a partial snapshot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ControlRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frequency: Option<FrequencySetting>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub digitiser_sample_rate: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gain: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fft_size: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fft_window: Option<String>,
}

impl ControlRequest {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_keeps_unknown_fields() {
        let snapshot = DeviceSnapshot::from_json(
            r#"{
                "digitiserSampleRate": 2048000,
                "frequency": {"value": 100000000, "conversion": -9750000},
                "gain": 32.8,
                "fftSize": 2048,
                "sources": ["rtlsdr", "file"]
            }"#,
        )
        .unwrap();

        assert_eq!(snapshot.sample_rate(), Some(Hertz(2_048_000)));
        let frequency = snapshot.frequency.unwrap();
        assert_eq!(frequency.effective(), 90_250_000.0);
        assert_eq!(snapshot.conversion_offset(), -9_750_000.0);
        assert_eq!(snapshot.other.len(), 3);
        assert_eq!(snapshot.other["fftSize"], Value::from(2048));
    }

    #[test]
    fn test_snapshot_without_numeric_fields() {
        let snapshot = DeviceSnapshot::from_json(r#"{"gain": 10}"#).unwrap();
        assert_eq!(snapshot.sample_rate(), None);
        assert_eq!(snapshot.conversion_offset(), 0.0);
    }

    #[test]
    fn test_control_request_serializes_only_set_fields() {
        let request = ControlRequest {
            gain: Some(20.0),
            ..Default::default()
        };
        assert_eq!(request.to_json().unwrap(), r#"{"gain":20.0}"#);
        assert!(ControlRequest::default().is_empty());
        assert!(!request.is_empty());
    }
}
