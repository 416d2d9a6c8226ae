pub mod axes;
pub mod colormap;
mod control_panel;
pub mod input;
pub mod pipeline;
pub mod range;
pub mod spectrum;
mod state;
pub mod view;
pub mod waterfall;

use eframe::egui::{self, Color32, RichText, ViewportCommand, vec2};
use sdrview_messages::{Command, Event, LinkStatus};

use input::Action;
use spectrum::SpectrumPlot;
use state::UiState;
pub use view::{SpectrumView, ViewOptions};

/// Share of the central panel given to the line plot; the waterfall takes the rest.
const PLOT_SHARE: f32 = 0.4;

/// Main application struct implementing the egui App trait.
pub struct SdrViewApp {
    /// Receiver for events from engine
    event_rx: flume::Receiver<Event>,

    /// Local application state
    state: UiState,
}

impl SdrViewApp {
    fn new(
        event_rx: flume::Receiver<Event>,
        cmd_tx: flume::Sender<Command>,
        options: ViewOptions,
    ) -> Self {
        Self {
            event_rx,
            state: UiState::new(cmd_tx, options),
        }
    }

    fn perform(&mut self, ctx: &egui::Context, action: Action) {
        if action == Action::ToggleFullscreen {
            let fullscreen = ctx.input(|i| i.viewport().fullscreen.unwrap_or(false));
            ctx.send_viewport_cmd(ViewportCommand::Fullscreen(!fullscreen));
        } else {
            self.state.view.apply(action);
        }
    }

    fn status_bar(&self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let color = match &self.state.link {
                LinkStatus::Connected => Color32::GREEN,
                LinkStatus::Connecting => Color32::YELLOW,
                LinkStatus::Disconnected(_) => Color32::RED,
            };
            ui.label(RichText::new("●").color(color))
                .on_hover_text(self.state.link.to_string());

            if let Some(engine_state) = &self.state.engine_state {
                ui.label(engine_state.source_config.describe());
            }
            if let Some(frame) = self.state.view.last_frame() {
                ui.separator();
                ui.label(format!(
                    "{} @ {}, {} bins",
                    frame.center_frequency.pretty(),
                    frame.sample_rate.pretty(),
                    frame.bins
                ));
                if let Some(capture) = frame.capture {
                    ui.label(format!("{:.3} s", capture.duration_secs()));
                }
            }

            let render = self.state.view.state();
            ui.separator();
            ui.label(format!("avg {}", render.averaging_factor()));
            ui.label(format!(
                "{:.0}..{:.0} dB",
                render.range().min_db(),
                render.range().max_db()
            ));
            ui.label(self.state.view.palette().table().label());
            if render.show_peaks() {
                ui.label("peak");
            }
            if render.max_hold() {
                ui.label(RichText::new("max hold").color(Color32::LIGHT_RED));
            }
            if render.paused() {
                ui.label(RichText::new("PAUSED").strong());
            }
        });
    }
}

impl eframe::App for SdrViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Pull every pending event so the bounded channel frees up
        while let Ok(event) = self.event_rx.try_recv() {
            self.state.handle_event(event);
        }

        let mut actions = input::shortcut_actions(ctx);
        actions.extend(self.state.control_panel.take_actions());
        for action in actions {
            self.perform(ctx, action);
        }

        ctx.request_repaint();

        egui::TopBottomPanel::top("status").show(ctx, |ui| self.status_bar(ui));

        egui::SidePanel::right("control_panel")
            .default_width(250.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    ui.add(&mut self.state.control_panel);
                });
            });

        egui::CentralPanel::default().show(ctx, |ui| {
            if self.state.engine_state.is_none() {
                ui.centered_and_justified(|ui| {
                    ui.label("Waiting for engine connection...");
                });
                return;
            }

            let available = ui.available_size();
            let plot_height = (available.y * PLOT_SHARE).floor();
            let view = &mut self.state.view;
            view.resize(plot_height as usize);
            view.update_labels(available.x as usize, self.state.device.as_ref());

            ui.allocate_ui(vec2(available.x, plot_height), |ui| {
                ui.add(SpectrumPlot {
                    trace: view.trace(),
                    max_hold: view.max_trace(),
                    extent: view.plot_height(),
                    palette: view.palette(),
                    labels: view.labels(),
                });
            });
            ui.add(view.waterfall_mut());
        });
    }
}

/// Entry point for the UI module.
///
/// Runs the eframe application on the main thread (blocking).
pub fn run(
    event_rx: flume::Receiver<Event>,
    cmd_tx: flume::Sender<Command>,
    view_options: ViewOptions,
) -> anyhow::Result<()> {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 800.0])
            .with_title("SDR View"),
        ..Default::default()
    };

    eframe::run_native(
        "SDR View",
        options,
        Box::new(move |_cc| Ok(Box::new(SdrViewApp::new(event_rx, cmd_tx, view_options)))),
    )
    .map_err(|e| anyhow::anyhow!("unsupported graphics environment: {e}"))?;

    Ok(())
}
