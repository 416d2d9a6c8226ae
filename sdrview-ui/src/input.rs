use eframe::egui::{Context, Event, InputState, Key};

/// User operations on the display, from keys or panel buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    TogglePause,
    ToggleMaxHold,
    TogglePeaks,
    AveragingUp,
    AveragingDown,
    ShiftUp,
    ShiftDown,
    ZoomIn,
    ZoomOut,
    CycleColors,
    ToggleFullscreen,
}

impl Action {
    pub const ALL: [Action; 11] = [
        Action::TogglePause,
        Action::ToggleMaxHold,
        Action::TogglePeaks,
        Action::AveragingUp,
        Action::AveragingDown,
        Action::ShiftUp,
        Action::ShiftDown,
        Action::ZoomIn,
        Action::ZoomOut,
        Action::CycleColors,
        Action::ToggleFullscreen,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::TogglePause => "Pause",
            Action::ToggleMaxHold => "Max hold",
            Action::TogglePeaks => "Live / peak",
            Action::AveragingUp => "Average +",
            Action::AveragingDown => "Average -",
            Action::ShiftUp => "Range up",
            Action::ShiftDown => "Range down",
            Action::ZoomIn => "Zoom in",
            Action::ZoomOut => "Zoom out",
            Action::CycleColors => "Colours",
            Action::ToggleFullscreen => "Fullscreen",
        }
    }

    pub fn key(self) -> Key {
        match self {
            Action::TogglePause => Key::Space,
            Action::ToggleMaxHold => Key::M,
            Action::TogglePeaks => Key::P,
            Action::AveragingUp => Key::A,
            Action::AveragingDown => Key::Z,
            Action::ShiftUp => Key::ArrowUp,
            Action::ShiftDown => Key::ArrowDown,
            Action::ZoomIn => Key::PageUp,
            Action::ZoomOut => Key::PageDown,
            Action::CycleColors => Key::C,
            Action::ToggleFullscreen => Key::F,
        }
    }
}

pub fn action_for_key(key: Key) -> Option<Action> {
    Action::ALL.into_iter().find(|action| action.key() == key)
}

/// Actions for the keys pressed this frame, in press order. Key repeats are ignored.
pub fn pressed_actions(input: &InputState) -> Vec<Action> {
    input
        .events
        .iter()
        .filter_map(|event| match event {
            Event::Key {
                key,
                pressed: true,
                repeat: false,
                modifiers,
                ..
            } if modifiers.is_none() => action_for_key(*key),
            _ => None,
        })
        .collect()
}

/// Shortcut actions for this frame. Nothing fires while a text field has keyboard focus.
pub fn shortcut_actions(ctx: &Context) -> Vec<Action> {
    if ctx.wants_keyboard_input() {
        return Vec::new();
    }
    ctx.input(pressed_actions)
}
