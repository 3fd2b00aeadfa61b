use std::{
    collections::{HashMap, HashSet},
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

use crossterm::event::KeyCode;
use device::hal::{Button, Buttons};

/// most terminals report key repeats but no releases, so a key counts as held this long after
/// its last press or repeat. release events end the hold early where the terminal reports them.
pub const HOLD: Duration = Duration::from_millis(150);

/// keys seen by the terminal thread, shared with the handheld threads.
#[derive(Clone, Default)]
pub struct KeyState(Arc<Mutex<HashMap<KeyCode, Instant>>>);

impl KeyState {
    pub fn press(&self, code: KeyCode) {
        if let Ok(mut keys) = self.0.lock() {
            keys.insert(code, Instant::now());
        }
    }

    pub fn release(&self, code: KeyCode) {
        if let Ok(mut keys) = self.0.lock() {
            keys.remove(&code);
        }
    }

    pub fn is_held(&self, code: KeyCode, now: Instant) -> bool {
        self.0.lock().is_ok_and(|keys| {
            keys.get(&code)
                .is_some_and(|pressed_at| now.saturating_duration_since(*pressed_at) < HOLD)
        })
    }
}

/// the keyboard keys standing in for one handheld's buttons.
pub struct Keypad {
    keys: KeyState,
    bindings: [(Button, KeyCode); 3],
    pressed: HashSet<Button>,
}

impl Keypad {
    /// `w`, `s` and space.
    pub fn player_one(keys: KeyState) -> Self {
        Self::new(
            keys,
            [
                (Button::Up, KeyCode::Char('w')),
                (Button::Down, KeyCode::Char('s')),
                (Button::A, KeyCode::Char(' ')),
            ],
        )
    }

    /// arrow keys and enter.
    pub fn player_two(keys: KeyState) -> Self {
        Self::new(
            keys,
            [
                (Button::Up, KeyCode::Up),
                (Button::Down, KeyCode::Down),
                (Button::A, KeyCode::Enter),
            ],
        )
    }

    fn new(keys: KeyState, bindings: [(Button, KeyCode); 3]) -> Self {
        Self {
            keys,
            bindings,
            pressed: HashSet::new(),
        }
    }
}

impl Buttons for Keypad {
    fn poll(&mut self) {
        let now = Instant::now();
        self.pressed = self
            .bindings
            .iter()
            .filter(|(_, code)| self.keys.is_held(*code, now))
            .map(|(button, _)| *button)
            .collect();
    }

    fn pressed(&self, button: Button) -> bool {
        self.pressed.contains(&button)
    }
}
