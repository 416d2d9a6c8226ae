use sdrview_messages::{Hertz, WireFormat, wire};
use sdrview_ui::input::Action;
use sdrview_ui::range::{DisplayRange, squeeze};
use sdrview_ui::{SpectrumView, ViewOptions};

const PLOT_HEIGHT: usize = 90;

/// A 4 bin frame in the legacy layout, written out word by word.
fn legacy_bytes(magnitudes: [f32; 4], peaks: [f32; 4]) -> Vec<u8> {
    let mut bytes = Vec::new();
    bytes.extend_from_slice(&2_000_000i32.to_be_bytes());
    bytes.extend_from_slice(&100_000_000i32.to_be_bytes());
    bytes.extend_from_slice(&0i32.to_be_bytes());
    bytes.extend_from_slice(&0i32.to_be_bytes());
    bytes.extend_from_slice(&4i32.to_be_bytes());
    for value in magnitudes.iter().chain(&peaks) {
        bytes.extend_from_slice(&value.to_be_bytes());
    }
    bytes
}

fn view() -> SpectrumView {
    let mut view = SpectrumView::new(ViewOptions {
        history_rows: 64,
        range: DisplayRange::new(-70.0, 20.0).unwrap(),
        averaging_factor: 0,
    });
    view.resize(PLOT_HEIGHT);
    view
}

#[test]
fn test_wire_bytes_to_trace() {
    let magnitudes = [-80.0, -40.0, -10.0, 0.0];
    let bytes = legacy_bytes(magnitudes, [-70.0, -30.0, -5.0, 5.0]);
    let frame = wire::decode(WireFormat::Legacy, &bytes).unwrap();
    assert_eq!(frame.sample_rate, Hertz::mhz(2));
    assert_eq!(frame.center_frequency, Hertz::mhz(100));

    let mut view = view();
    assert!(view.on_frame(&frame));

    let expected: Vec<usize> = magnitudes
        .iter()
        .map(|&m| squeeze(m, -70.0, 20.0, PLOT_HEIGHT))
        .collect();
    assert_eq!(view.trace(), expected.as_slice());
    assert_eq!(view.trace(), &[0, 30, 60, 70]);
    assert_eq!(view.waterfall().raster().filled_rows(), 1);
    assert_eq!(view.waterfall().raster().width(), 4);
}

#[test]
fn test_peak_mode_draws_peaks() {
    let bytes = legacy_bytes([-80.0, -40.0, -10.0, 0.0], [-70.0, -30.0, -5.0, 5.0]);
    let frame = wire::decode(WireFormat::Legacy, &bytes).unwrap();

    let mut view = view();
    view.apply(Action::TogglePeaks);
    view.on_frame(&frame);
    assert_eq!(view.trace(), &[0, 40, 65, 75]);
}

#[test]
fn test_pause_freezes_trace_and_waterfall() {
    let first = legacy_bytes([-80.0, -40.0, -10.0, 0.0], [-70.0, -30.0, -5.0, 5.0]);
    let loud = legacy_bytes([10.0; 4], [20.0; 4]);

    let mut view = view();
    view.apply(Action::ToggleMaxHold);
    view.on_frame(&wire::decode(WireFormat::Legacy, &first).unwrap());
    view.apply(Action::TogglePause);

    let state = view.state().clone();
    let raster = view.waterfall().raster().clone();
    let trace = view.trace().to_vec();
    let held = view.max_trace().map(<[usize]>::to_vec);

    for _ in 0..10 {
        let frame = wire::decode(WireFormat::Legacy, &loud).unwrap();
        assert!(!view.on_frame(&frame));
    }

    assert_eq!(view.state(), &state);
    assert_eq!(view.waterfall().raster(), &raster);
    assert_eq!(view.trace(), trace.as_slice());
    assert_eq!(view.max_trace().map(<[usize]>::to_vec), held);
}

#[test]
fn test_truncated_frame_never_reaches_view() {
    let bytes = legacy_bytes([0.0; 4], [0.0; 4]);
    let err = wire::decode(WireFormat::Legacy, &bytes[..bytes.len() - 1]).unwrap_err();
    assert_eq!(
        err,
        wire::FrameError::Truncated {
            expected: bytes.len(),
            actual: bytes.len() - 1
        }
    );
}
