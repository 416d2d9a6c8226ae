use eframe::egui::{Checkbox, ComboBox, DragValue, Grid, Response, TextEdit, Ui, Widget};
use flume::Sender;
use std::path::PathBuf;
use std::time::Duration;

use crate::input::Action;
use sdrview_messages::{
    Command, ControlRequest, DeviceSnapshot, FrequencySetting, Hertz, SourceConfig, WireFormat,
};

/// Which source type is selected in the UI dropdown.
#[derive(Debug, Clone, Copy, PartialEq)]
enum SourceType {
    WebSocket,
    File,
    Generator,
}

impl SourceType {
    const ALL: [SourceType; 3] = [SourceType::WebSocket, SourceType::File, SourceType::Generator];

    fn label(&self) -> &'static str {
        match self {
            Self::WebSocket => "Spectrum Server",
            Self::File => "Capture File",
            Self::Generator => "Tone Generator",
        }
    }

    fn from_config(config: &SourceConfig) -> Self {
        match config {
            SourceConfig::WebSocket { .. } => Self::WebSocket,
            SourceConfig::File { .. } => Self::File,
            SourceConfig::Generator { .. } => Self::Generator,
        }
    }

    fn default_config(self) -> SourceConfig {
        match self {
            Self::WebSocket => SourceConfig::default(),
            Self::File => SourceConfig::File {
                path: PathBuf::new(),
                format: WireFormat::Legacy,
                interval: Duration::from_millis(50),
                loop_on_eof: true,
            },
            Self::Generator => SourceConfig::Generator {
                sample_rate: Hertz::mhz(2),
                center_frequency: Hertz::mhz(100),
                tone_offset: Hertz::khz(250),
                fft_size: 1024,
                interval: Duration::from_millis(50),
            },
        }
    }
}

/// Tuning fields of the control channel form.
#[derive(Debug, Clone, Copy, PartialEq)]
struct TuningForm {
    frequency_mhz: f64,
    conversion_hz: f64,
    gain_db: f64,
}

/// Side panel: source selection, device configuration and display controls.
pub struct ControlPanel {
    cmd_tx: Sender<Command>,
    pending_config: SourceConfig,
    has_pending_changes: bool,
    waiting_for_apply: bool,
    device: Option<DeviceSnapshot>,
    tuning: TuningForm,
    actions: Vec<Action>,
}

impl ControlPanel {
    pub fn new(cmd_tx: Sender<Command>) -> Self {
        Self {
            cmd_tx,
            pending_config: SourceConfig::default(),
            has_pending_changes: false,
            waiting_for_apply: false,
            device: None,
            tuning: TuningForm {
                frequency_mhz: 100.0,
                conversion_hz: 0.0,
                gain_db: 0.0,
            },
            actions: Vec::new(),
        }
    }

    /// Update from engine state snapshot.
    pub fn update_from_engine_state(&mut self, config: &SourceConfig) {
        self.pending_config = config.clone();
        self.has_pending_changes = false;
        self.waiting_for_apply = false;
    }

    /// Refresh the device grid and the tuning form from a control channel snapshot.
    pub fn update_from_device(&mut self, snapshot: &DeviceSnapshot) {
        if let Some(frequency) = snapshot.frequency {
            self.tuning.frequency_mhz = frequency.value / 1e6;
            self.tuning.conversion_hz = frequency.conversion;
        }
        if let Some(gain) = snapshot.other.get("gain").and_then(|g| g.as_f64()) {
            self.tuning.gain_db = gain;
        }
        self.device = Some(snapshot.clone());
    }

    /// Display actions requested through the panel buttons since the last call.
    pub fn take_actions(&mut self) -> Vec<Action> {
        std::mem::take(&mut self.actions)
    }

    fn current_source_type(&self) -> SourceType {
        SourceType::from_config(&self.pending_config)
    }

    fn switch_source_type(&mut self, new_type: SourceType) {
        if new_type == self.current_source_type() {
            return;
        }
        self.pending_config = new_type.default_config();
        self.has_pending_changes = true;
    }

    fn send_change_source(&self) {
        let _ = self
            .cmd_tx
            .send(Command::ChangeSource(self.pending_config.clone()));
    }

    fn control_request(&self) -> ControlRequest {
        ControlRequest {
            frequency: Some(FrequencySetting {
                value: (self.tuning.frequency_mhz * 1e6).round(),
                conversion: self.tuning.conversion_hz,
            }),
            gain: Some(self.tuning.gain_db),
            ..Default::default()
        }
    }

    fn send_control(&self) {
        let _ = self.cmd_tx.send(Command::Control(self.control_request()));
    }

    fn source_ui(&mut self, ui: &mut Ui) {
        ui.heading("Input Source");
        ui.separator();

        let fields_enabled = !self.waiting_for_apply;

        let current_type = self.current_source_type();
        ui.add_enabled_ui(fields_enabled, |ui| {
            ComboBox::from_label("Source")
                .selected_text(current_type.label())
                .show_ui(ui, |ui| {
                    for source_type in SourceType::ALL {
                        if ui
                            .selectable_label(current_type == source_type, source_type.label())
                            .clicked()
                        {
                            self.switch_source_type(source_type);
                        }
                    }
                });
        });

        ui.add_space(10.0);

        let mut changed = false;
        ui.add_enabled_ui(fields_enabled, |ui| match &mut self.pending_config {
            SourceConfig::WebSocket {
                url,
                control_url,
                format,
            } => {
                ui.horizontal(|ui| {
                    ui.label("URL:");
                    changed |= ui
                        .add(TextEdit::singleline(url).hint_text("ws://host:port/fft"))
                        .changed();
                });
                ui.horizontal(|ui| {
                    ui.label("Control:");
                    let mut text = control_url.clone().unwrap_or_default();
                    if ui
                        .add(TextEdit::singleline(&mut text).hint_text("optional"))
                        .changed()
                    {
                        *control_url = Some(text).filter(|t| !t.trim().is_empty());
                        changed = true;
                    }
                });
                changed |= format_combo(ui, "ws_format", format);
            }
            SourceConfig::File {
                path,
                format,
                interval,
                loop_on_eof,
            } => {
                ui.horizontal(|ui| {
                    ui.label("Path:");
                    let mut path_str = path.display().to_string();
                    if ui
                        .add(TextEdit::singleline(&mut path_str).hint_text("/path/to/capture.fft"))
                        .changed()
                    {
                        *path = PathBuf::from(path_str);
                        changed = true;
                    }
                });
                changed |= format_combo(ui, "file_format", format);
                changed |= interval_value(ui, interval);
                changed |= ui.add(Checkbox::new(loop_on_eof, "Loop")).changed();
            }
            SourceConfig::Generator {
                sample_rate,
                center_frequency,
                tone_offset,
                fft_size,
                interval,
            } => {
                changed |= hertz_value(ui, "Sample Rate:", sample_rate, 1000.0);
                changed |= hertz_value(ui, "Center:", center_frequency, 10_000.0);
                changed |= hertz_value(ui, "Tone Offset:", tone_offset, 1000.0);
                ui.horizontal(|ui| {
                    ui.label("FFT Size:");
                    changed |= ui
                        .add(DragValue::new(fft_size).range(2..=65_536))
                        .changed();
                });
                changed |= interval_value(ui, interval);
            }
        });
        self.has_pending_changes |= changed;

        ui.add_space(10.0);

        let can_apply = self.has_pending_changes && !self.waiting_for_apply;
        ui.add_enabled_ui(can_apply, |ui| {
            if ui.button("Apply").clicked() {
                self.waiting_for_apply = true;
                self.send_change_source();
            }
        });
    }

    fn device_ui(&mut self, ui: &mut Ui) {
        ui.heading("Device");
        ui.separator();

        let Some(device) = &self.device else {
            ui.label("No control channel data");
            return;
        };

        Grid::new("device_snapshot").striped(true).show(ui, |ui| {
            if let Some(rate) = device.sample_rate() {
                ui.label("Sample rate");
                ui.label(rate.pretty());
                ui.end_row();
            }
            if let Some(frequency) = device.frequency {
                ui.label("Frequency");
                ui.label(format!("{:.6} MHz", frequency.effective() / 1e6));
                ui.end_row();
            }
            for (key, value) in &device.other {
                ui.label(key);
                ui.label(value.to_string());
                ui.end_row();
            }
        });

        ui.add_space(6.0);
        ui.horizontal(|ui| {
            ui.label("Tune:");
            ui.add(
                DragValue::new(&mut self.tuning.frequency_mhz)
                    .speed(0.01)
                    .max_decimals(6)
                    .suffix(" MHz"),
            );
        });
        ui.horizontal(|ui| {
            ui.label("Gain:");
            ui.add(DragValue::new(&mut self.tuning.gain_db).speed(0.5).suffix(" dB"));
        });
        if ui.button("Send").clicked() {
            self.send_control();
        }
    }

    fn display_ui(&mut self, ui: &mut Ui) {
        ui.heading("Display");
        ui.separator();

        ui.horizontal_wrapped(|ui| {
            for action in Action::ALL {
                if ui
                    .button(action.label())
                    .on_hover_text(format!("{:?}", action.key()))
                    .clicked()
                {
                    self.actions.push(action);
                }
            }
        });
    }
}

fn format_combo(ui: &mut Ui, id: &str, format: &mut WireFormat) -> bool {
    let before = *format;
    ComboBox::from_id_salt(id)
        .selected_text(format.label())
        .show_ui(ui, |ui| {
            for option in [WireFormat::Legacy, WireFormat::Extended] {
                ui.selectable_value(format, option, option.label());
            }
        });
    before != *format
}

fn hertz_value(ui: &mut Ui, label: &str, value: &mut Hertz, speed: f64) -> bool {
    ui.horizontal(|ui| {
        ui.label(label);
        ui.add(DragValue::new(&mut value.0).speed(speed).suffix(" Hz"))
            .changed()
    })
    .inner
}

fn interval_value(ui: &mut Ui, interval: &mut Duration) -> bool {
    ui.horizontal(|ui| {
        ui.label("Interval:");
        let mut millis = interval.as_millis() as u64;
        let changed = ui
            .add(DragValue::new(&mut millis).range(1..=10_000).suffix(" ms"))
            .changed();
        if changed {
            *interval = Duration::from_millis(millis);
        }
        changed
    })
    .inner
}

impl Widget for &mut ControlPanel {
    fn ui(self, ui: &mut Ui) -> Response {
        self.source_ui(ui);
        ui.add_space(16.0);
        self.device_ui(ui);
        ui.add_space(16.0);
        self.display_ui(ui);

        ui.response()
    }
}
