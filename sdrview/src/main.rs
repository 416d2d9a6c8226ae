mod config;

use config::{Cli, Parser};
use sdrview_engine::Engine;
use sdrview_messages::Command;

use log::LevelFilter;
use std::io::Write;

fn main() -> anyhow::Result<()> {
    env_logger::builder()
        .format(|buf, record| {
            writeln!(
                buf,
                "{:<5} - mod path |{}| - target | {} | args: |{}|",
                record.level(),
                record.module_path().unwrap_or(""),
                record.target(),
                record.args()
            )
        })
        .filter_level(LevelFilter::Warn)
        .filter_module("sdrview", LevelFilter::Info)
        .filter_module("sdrview_engine", LevelFilter::Info)
        .filter_module("sdrview_ui", LevelFilter::Info)
        .parse_default_env()
        .init();

    let cli = Cli::parse();
    let view_options = cli.view_options()?;
    let source_config = cli.source_config();
    log::info!("starting with {}", source_config.describe());

    // Commands are never dropped; at most one event is in flight to the UI
    let (cmd_tx, cmd_rx) = flume::unbounded();
    let (event_tx, event_rx) = flume::bounded(1);

    let engine_handle = std::thread::Builder::new()
        .name("engine".into())
        .spawn(move || {
            let engine = Engine::new(cmd_rx, event_tx, source_config);
            if let Err(e) = engine.run() {
                log::error!("engine failed: {e:#}");
            }
        })?;

    // Run UI on main thread (blocking)
    let ui_result = sdrview_ui::run(event_rx, cmd_tx.clone(), view_options);

    // UI has exited - send stop command to engine
    let _ = cmd_tx.send(Command::Stop);

    engine_handle
        .join()
        .map_err(|_| anyhow::anyhow!("Engine thread panicked"))?;

    ui_result
}
