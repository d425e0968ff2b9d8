use serde::{Deserialize, Serialize};

/// Logical player inputs recognised by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    MoveLeft,
    MoveRight,
    SoftDrop,
    RotateLeft,
    RotateRight,
    Hold,
    HardDrop,
    Quit,
}

impl Control {
    pub const LEN: usize = 8;

    pub const ALL: [Self; Self::LEN] = [
        Control::MoveLeft,
        Control::MoveRight,
        Control::SoftDrop,
        Control::RotateLeft,
        Control::RotateRight,
        Control::Hold,
        Control::HardDrop,
        Control::Quit,
    ];

    const fn index(self) -> usize {
        self as usize
    }
}

/// Per-control "is down" flags and held-duration counters.
///
/// Adapters flip the flags from whatever input events they see; the engine
/// calls [`KeyState::update_all`] once per tick, which advances the counter
/// of every held control and resets the rest. Durations are measured in
/// ticks, so a control pushed this tick has a duration of `1`.
///
/// # Example
///
/// ```
/// use blocktick_engine::{Control, KeyState};
///
/// let mut keys = KeyState::new();
/// keys.key_down(Control::MoveLeft);
/// keys.update_all();
/// assert!(keys.is_pushed(Control::MoveLeft));
/// keys.update_all();
/// assert!(!keys.is_pushed(Control::MoveLeft));
/// assert!(keys.is_pressed(Control::MoveLeft));
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct KeyState {
    down: [bool; Control::LEN],
    durations: [u32; Control::LEN],
}

impl KeyState {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            down: [false; Control::LEN],
            durations: [0; Control::LEN],
        }
    }

    pub fn key_down(&mut self, control: Control) {
        self.set(control, true);
    }

    pub fn key_up(&mut self, control: Control) {
        self.set(control, false);
    }

    pub fn set(&mut self, control: Control, down: bool) {
        self.down[control.index()] = down;
    }

    #[must_use]
    pub fn is_down(&self, control: Control) -> bool {
        self.down[control.index()]
    }

    /// Advances every held control by one tick and zeroes released ones.
    pub fn update_all(&mut self) {
        for (duration, &down) in self.durations.iter_mut().zip(&self.down) {
            *duration = if down { duration.saturating_add(1) } else { 0 };
        }
    }

    /// Number of consecutive ticks the control has been held.
    #[must_use]
    pub fn duration(&self, control: Control) -> u32 {
        self.durations[control.index()]
    }

    /// True only on the first tick of a press.
    #[must_use]
    pub fn is_pushed(&self, control: Control) -> bool {
        self.duration(control) == 1
    }

    #[must_use]
    pub fn is_pressed(&self, control: Control) -> bool {
        self.duration(control) > 0
    }

    /// Delayed auto-shift: fires on the first tick, then every tick once the
    /// control has been held longer than `das` ticks.
    #[must_use]
    pub fn is_pressed_with_das(&self, control: Control, das: u32) -> bool {
        let duration = self.duration(control);
        duration == 1 || duration > das
    }
}
