mod command;
mod device;
mod event;
mod frame;
mod state;
mod units;
pub mod wire;

pub use command::Command;
pub use device::{ControlRequest, DeviceSnapshot, FrequencySetting};
pub use event::Event;
pub use frame::{CaptureWindow, SpectrumFrame, Timestamp};
pub use state::{EngineState, LinkStatus, SourceConfig};
pub use units::Hertz;
pub use wire::{FrameError, WireFormat};
