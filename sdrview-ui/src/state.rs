use flume::Sender;

use crate::control_panel::ControlPanel;
use crate::view::{SpectrumView, ViewOptions};
use sdrview_messages::{Command, DeviceSnapshot, EngineState, Event, LinkStatus};

/// Local UI state derived from engine events.
pub struct UiState {
    /// Current engine state (from StateSnapshot)
    pub engine_state: Option<EngineState>,

    /// Frame link health
    pub link: LinkStatus,

    /// Last configuration pushed on the control channel
    pub device: Option<DeviceSnapshot>,

    pub view: SpectrumView,

    pub control_panel: ControlPanel,
}

impl UiState {
    pub fn new(cmd_tx: Sender<Command>, options: ViewOptions) -> Self {
        Self {
            engine_state: None,
            link: LinkStatus::Connecting,
            device: None,
            view: SpectrumView::new(options),
            control_panel: ControlPanel::new(cmd_tx),
        }
    }

    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::StateSnapshot(state) => {
                self.control_panel
                    .update_from_engine_state(&state.source_config);
                self.engine_state = Some(state);
            }
            Event::Link(status) => {
                if let LinkStatus::Disconnected(reason) = &status {
                    log::info!("frame link down: {reason}");
                }
                self.link = status;
            }
            Event::Frame(frame) => {
                self.view.on_frame(&frame);
            }
            Event::Device(snapshot) => {
                self.control_panel.update_from_device(&snapshot);
                self.device = Some(snapshot);
            }
        }
    }
}
