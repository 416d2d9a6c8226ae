use crate::{ControlRequest, SourceConfig};

/// Commands sent from the UI to the engine.
#[derive(Debug)]
pub enum Command {
    /// Stop the engine and tear down the active source.
    Stop,
    /// Change the input source. Engine will stop the current source and start the new one.
    ChangeSource(SourceConfig),
    /// Forward a configuration change to the server's control channel.
    Control(ControlRequest),
}
