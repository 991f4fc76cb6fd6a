use crate::foundation::core::Point;

/// Mouse buttons the UI reacts to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MouseButton {
    /// Primary button.
    #[default]
    Left,
    /// Secondary button.
    Right,
    /// Wheel button.
    Middle,
}

/// Per-tick input, pulled by [`crate::Game::update`].
pub trait InputSource {
    /// Cursor position in screen pixels.
    fn cursor_position(&self) -> Point;

    /// Return `true` if `button` was clicked since the previous tick.
    fn was_clicked(&self, button: MouseButton) -> bool;
}

/// One scripted input change.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct ScriptedEvent {
    /// Tick the event applies to.
    pub tick: u64,
    /// Cursor position from this tick on.
    pub cursor: Point,
    /// Button clicked on this tick only.
    #[serde(default)]
    pub click: Option<MouseButton>,
}

/// Input replayed from a list of events, for headless runs and tests.
///
/// The cursor holds its last scripted position; clicks last for exactly one tick.
#[derive(Clone, Debug, Default)]
pub struct ScriptedInput {
    events: Vec<ScriptedEvent>,
    cursor: Point,
    clicked: Vec<MouseButton>,
}

impl ScriptedInput {
    /// Script from `events` in any order.
    pub fn new(mut events: Vec<ScriptedEvent>) -> Self {
        events.sort_by_key(|e| e.tick);
        Self {
            events,
            cursor: Point::ORIGIN,
            clicked: Vec::new(),
        }
    }

    /// Move to the state for `tick`.
    pub fn seek(&mut self, tick: u64) {
        self.clicked.clear();
        for e in self.events.iter().take_while(|e| e.tick <= tick) {
            self.cursor = e.cursor;
            if e.tick == tick {
                self.clicked.extend(e.click);
            }
        }
    }

    /// Move the cursor directly.
    pub fn move_to(&mut self, cursor: Point) {
        self.cursor = cursor;
    }

    /// Report a click until the next [`ScriptedInput::seek`] or [`ScriptedInput::release`].
    pub fn click(&mut self, button: MouseButton) {
        self.clicked.push(button);
    }

    /// Forget pending clicks.
    pub fn release(&mut self) {
        self.clicked.clear();
    }
}

impl InputSource for ScriptedInput {
    fn cursor_position(&self) -> Point {
        self.cursor
    }

    fn was_clicked(&self, button: MouseButton) -> bool {
        self.clicked.contains(&button)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/game/input.rs"]
mod tests;
