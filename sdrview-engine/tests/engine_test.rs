use std::net::{TcpListener, TcpStream};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use tungstenite::{Message, WebSocket};

use sdrview_engine::Engine;
use sdrview_messages::{
    Command, ControlRequest, Event, Hertz, LinkStatus, SourceConfig, SpectrumFrame, WireFormat,
    wire,
};

// Test helpers to reduce boilerplate

fn generator_config() -> SourceConfig {
    SourceConfig::Generator {
        sample_rate: Hertz(48_000),
        center_frequency: Hertz::mhz(100),
        tone_offset: Hertz::khz(10),
        fft_size: 1024,
        interval: Duration::from_millis(5),
    }
}

fn setup_engine(
    config: SourceConfig,
) -> (
    flume::Sender<Command>,
    flume::Receiver<Event>,
    JoinHandle<anyhow::Result<()>>,
) {
    let (cmd_tx, cmd_rx) = flume::unbounded::<Command>();
    let (event_tx, event_rx) = flume::bounded::<Event>(1);

    let handle = thread::spawn(move || {
        let engine = Engine::new(cmd_rx, event_tx, config)
            .with_reconnect_delay(Duration::from_millis(50));
        engine.run()
    });

    (cmd_tx, event_rx, handle)
}

fn teardown_engine(cmd_tx: flume::Sender<Command>, handle: JoinHandle<anyhow::Result<()>>) {
    cmd_tx.send(Command::Stop).unwrap();
    let result = handle.join().expect("Engine thread should not panic");
    assert!(result.is_ok(), "Engine should stop cleanly: {result:?}");
}

fn next_event(event_rx: &flume::Receiver<Event>) -> Event {
    event_rx
        .recv_timeout(Duration::from_secs(5))
        .expect("Should receive an event")
}

fn expect_state_snapshot(event_rx: &flume::Receiver<Event>) -> SourceConfig {
    match next_event(event_rx) {
        Event::StateSnapshot(state) => state.source_config,
        other => panic!("Expected StateSnapshot, got {:?}", other),
    }
}

fn frame(bins: &[f32]) -> SpectrumFrame {
    SpectrumFrame {
        sample_rate: Hertz(2_000_000),
        center_frequency: Hertz::mhz(100),
        capture: None,
        magnitudes: bins.to_vec(),
        peaks: bins.iter().map(|b| b + 3.0).collect(),
    }
}

fn accept(listener: &TcpListener) -> WebSocket<TcpStream> {
    let (stream, _) = listener.accept().unwrap();
    match tungstenite::accept(stream) {
        Ok(socket) => socket,
        Err(e) => panic!("websocket handshake failed: {e}"),
    }
}

fn drain_until_closed(socket: &mut WebSocket<TcpStream>) {
    while socket.read().is_ok() {}
}

fn unused_port_url() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("ws://{addr}/fft")
}

#[test]
fn test_engine_construction() {
    let (cmd_tx, cmd_rx) = flume::unbounded::<Command>();
    let (event_tx, event_rx) = flume::unbounded::<Event>();

    // Construct engine - should not panic
    let _engine = Engine::new(cmd_rx, event_tx, SourceConfig::default());

    drop(cmd_tx);
    drop(event_rx);
}

#[test]
fn test_engine_sends_state_snapshot() {
    let (cmd_tx, event_rx, handle) = setup_engine(generator_config());

    assert_eq!(expect_state_snapshot(&event_rx), generator_config());

    teardown_engine(cmd_tx, handle);
}

#[test]
fn test_engine_sends_generated_frames() {
    let (cmd_tx, event_rx, handle) = setup_engine(generator_config());
    expect_state_snapshot(&event_rx);

    for _ in 0..5 {
        match next_event(&event_rx) {
            Event::Frame(frame) => {
                assert_eq!(frame.len(), 1024);
                assert_eq!(frame.peaks.len(), 1024);
                assert_eq!(frame.center_frequency, Hertz::mhz(100));
            }
            other => panic!("Expected Frame, got {:?}", other),
        }
    }

    teardown_engine(cmd_tx, handle);
}

#[test]
fn test_engine_restarts_on_source_change() {
    let (cmd_tx, event_rx, handle) = setup_engine(generator_config());
    expect_state_snapshot(&event_rx);

    let new_config = SourceConfig::Generator {
        sample_rate: Hertz(96_000),
        center_frequency: Hertz::mhz(433),
        tone_offset: Hertz(0),
        fft_size: 256,
        interval: Duration::from_millis(5),
    };
    cmd_tx.send(Command::ChangeSource(new_config.clone())).unwrap();

    // Frames from the old source may still be in flight
    let state = loop {
        match next_event(&event_rx) {
            Event::StateSnapshot(state) => break state,
            Event::Frame(_) => continue,
            other => panic!("Unexpected event {:?}", other),
        }
    };
    assert_eq!(state.source_config, new_config);

    match next_event(&event_rx) {
        Event::Frame(frame) => assert_eq!(frame.len(), 256),
        other => panic!("Expected Frame, got {:?}", other),
    }

    teardown_engine(cmd_tx, handle);
}

#[test]
fn test_engine_runs_without_panic_when_ui_leaves() {
    let (cmd_tx, event_rx, handle) = setup_engine(generator_config());

    thread::sleep(Duration::from_millis(100));
    drop(event_rx);

    let _ = cmd_tx.send(Command::Stop);
    let result = handle.join();
    assert!(result.is_ok(), "Engine thread should not panic");
}

#[test]
fn test_missing_capture_reports_disconnected() {
    let config = SourceConfig::File {
        path: "/nonexistent/capture.bin".into(),
        format: WireFormat::Legacy,
        interval: Duration::ZERO,
        loop_on_eof: false,
    };
    let (cmd_tx, event_rx, handle) = setup_engine(config);
    expect_state_snapshot(&event_rx);

    match next_event(&event_rx) {
        Event::Link(LinkStatus::Disconnected(reason)) => {
            assert!(reason.contains("capture"), "unexpected reason {reason}")
        }
        other => panic!("Expected Disconnected, got {:?}", other),
    }

    teardown_engine(cmd_tx, handle);
}

#[test]
fn test_websocket_frames_decoded_and_link_reconnects() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let url = format!("ws://{}/fft", listener.local_addr().unwrap());

    let first = frame(&[-80.0, -40.0, -10.0, 0.0]);
    let second = frame(&[-20.0, -25.0]);
    let third = frame(&[-1.0]);

    let payloads = vec![
        wire::encode(WireFormat::Legacy, &first),
        // Truncated: declares 4 bins but carries none
        wire::encode(WireFormat::Legacy, &first)[..20].to_vec(),
        wire::encode(WireFormat::Legacy, &second),
    ];
    let reconnect_payload = wire::encode(WireFormat::Legacy, &third);

    let server = thread::spawn(move || {
        let mut socket = accept(&listener);
        for payload in payloads {
            socket.send(Message::binary(payload)).unwrap();
        }
        socket.close(None).unwrap();
        drain_until_closed(&mut socket);

        let mut socket = accept(&listener);
        socket.send(Message::binary(reconnect_payload)).unwrap();
        drain_until_closed(&mut socket);
    });

    let (cmd_tx, event_rx, handle) = setup_engine(SourceConfig::WebSocket {
        url,
        control_url: None,
        format: WireFormat::Legacy,
    });
    expect_state_snapshot(&event_rx);

    let mut frames = Vec::new();
    let mut statuses = Vec::new();
    while frames.len() < 3 {
        match next_event(&event_rx) {
            Event::Frame(frame) => frames.push(frame),
            Event::Link(status) => statuses.push(status),
            other => panic!("Unexpected event {:?}", other),
        }
    }

    assert_eq!(frames, vec![first, second, third]);
    assert!(matches!(
        statuses.as_slice(),
        [
            LinkStatus::Connecting,
            LinkStatus::Connected,
            LinkStatus::Disconnected(_),
            LinkStatus::Connecting,
            LinkStatus::Connected,
        ]
    ));

    teardown_engine(cmd_tx, handle);
    server.join().unwrap();
}

#[test]
fn test_control_channel_snapshot_and_request() {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let control_url = format!("ws://{}/control", listener.local_addr().unwrap());
    let (received_tx, received_rx) = flume::unbounded::<String>();

    let server = thread::spawn(move || {
        let mut socket = accept(&listener);
        socket
            .send(Message::text(
                r#"{"digitiserSampleRate": 2400000, "frequency": {"value": 145000000, "conversion": 0}, "gain": 12}"#,
            ))
            .unwrap();
        loop {
            match socket.read() {
                Ok(Message::Text(text)) => {
                    received_tx.send(text.to_string()).unwrap();
                    break;
                }
                Ok(_) => continue,
                Err(e) => panic!("control client went away: {e}"),
            }
        }
        socket.close(None).unwrap();
        drain_until_closed(&mut socket);
    });

    let (cmd_tx, event_rx, handle) = setup_engine(SourceConfig::WebSocket {
        url: unused_port_url(),
        control_url: Some(control_url),
        format: WireFormat::Extended,
    });
    expect_state_snapshot(&event_rx);

    let snapshot = loop {
        match next_event(&event_rx) {
            Event::Device(snapshot) => break snapshot,
            Event::Link(_) => continue,
            other => panic!("Unexpected event {:?}", other),
        }
    };
    assert_eq!(snapshot.sample_rate(), Some(Hertz(2_400_000)));
    assert_eq!(snapshot.other["gain"], serde_json::json!(12));

    cmd_tx
        .send(Command::Control(ControlRequest {
            gain: Some(30.0),
            ..Default::default()
        }))
        .unwrap();

    // Keep draining link events so the engine never blocks on a full channel
    let request = loop {
        if let Ok(text) = received_rx.try_recv() {
            break text;
        }
        let _ = event_rx.recv_timeout(Duration::from_millis(20));
    };
    assert_eq!(request, r#"{"gain":30.0}"#);

    teardown_engine(cmd_tx, handle);
    server.join().unwrap();
}
