use crate::{DeviceSnapshot, EngineState, LinkStatus, SpectrumFrame};

/// Events sent from the engine to the UI.
#[derive(Debug)]
pub enum Event {
    /// Sent whenever the engine (re)starts a source.
    StateSnapshot(EngineState),
    /// Connectivity of the frame link changed.
    Link(LinkStatus),
    /// A decoded spectrum frame.
    Frame(SpectrumFrame),
    /// Device configuration pushed on the control channel.
    Device(DeviceSnapshot),
}
