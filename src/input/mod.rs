use std::collections::{HashMap, HashSet};

pub use winit::keyboard::KeyCode;

/// Discrete input the message windows react to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Trigger {
    Up,
    Down,
    Ok,
    Cancel,
}

/// Triggers that fired this frame.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Triggers {
    fired: HashSet<Trigger>,
}

impl Triggers {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn of(triggers: &[Trigger]) -> Self {
        Self { fired: triggers.iter().copied().collect() }
    }

    pub fn press(&mut self, trigger: Trigger) {
        self.fired.insert(trigger);
    }

    pub fn is_triggered(&self, trigger: Trigger) -> bool {
        self.fired.contains(&trigger)
    }

    pub fn is_empty(&self) -> bool {
        self.fired.is_empty()
    }
}

/// Raw key state for a single frame.
#[derive(Debug, Default)]
pub struct KeyState {
    pub keys_held: HashSet<KeyCode>,
    pub keys_pressed: HashSet<KeyCode>,
    /// Set when something else (a text field, a menu) consumed the keyboard.
    pub key_consumed: bool,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key: KeyCode) {
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    pub fn clear_frame_state(&mut self) {
        self.keys_pressed.clear();
        self.key_consumed = false;
    }

    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }
}

/// Binds triggers to one or more keys.
#[derive(Debug, Clone)]
pub struct TriggerMap {
    bindings: HashMap<Trigger, Vec<KeyCode>>,
}

impl TriggerMap {
    pub fn new() -> Self {
        Self { bindings: HashMap::new() }
    }

    pub fn bind(&mut self, trigger: Trigger, key: KeyCode) {
        self.bindings.entry(trigger).or_default().push(key);
    }

    /// True if any key bound to `trigger` was pressed this frame and the
    /// keyboard was not consumed.
    pub fn is_pressed(&self, trigger: Trigger, keys: &KeyState) -> bool {
        !keys.key_consumed
            && self
                .bindings
                .get(&trigger)
                .is_some_and(|bound| bound.iter().any(|k| keys.is_key_pressed(*k)))
    }

    /// Collapse this frame's key presses into triggers.
    pub fn triggers(&self, keys: &KeyState) -> Triggers {
        let mut out = Triggers::none();
        for trigger in [Trigger::Up, Trigger::Down, Trigger::Ok, Trigger::Cancel] {
            if self.is_pressed(trigger, keys) {
                out.press(trigger);
            }
        }
        out
    }
}

impl Default for TriggerMap {
    /// Arrow keys, Enter/Space/Z for OK, Escape/X/Backspace for cancel.
    fn default() -> Self {
        let mut map = Self::new();
        map.bind(Trigger::Up, KeyCode::ArrowUp);
        map.bind(Trigger::Down, KeyCode::ArrowDown);
        for key in [KeyCode::Enter, KeyCode::Space, KeyCode::KeyZ] {
            map.bind(Trigger::Ok, key);
        }
        for key in [KeyCode::Escape, KeyCode::KeyX, KeyCode::Backspace] {
            map.bind(Trigger::Cancel, key);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_bindings_produce_triggers() {
        let map = TriggerMap::default();
        let mut keys = KeyState::new();
        keys.press(KeyCode::KeyZ);
        keys.press(KeyCode::ArrowDown);
        let t = map.triggers(&keys);
        assert!(t.is_triggered(Trigger::Ok));
        assert!(t.is_triggered(Trigger::Down));
        assert!(!t.is_triggered(Trigger::Cancel));
    }

    #[test]
    fn held_key_fires_once() {
        let map = TriggerMap::default();
        let mut keys = KeyState::new();
        keys.press(KeyCode::Enter);
        assert!(map.is_pressed(Trigger::Ok, &keys));
        keys.clear_frame_state();
        keys.press(KeyCode::Enter);
        assert!(!map.is_pressed(Trigger::Ok, &keys));
    }

    #[test]
    fn consumed_keyboard_blocks_triggers() {
        let map = TriggerMap::default();
        let mut keys = KeyState::new();
        keys.press(KeyCode::Escape);
        keys.key_consumed = true;
        assert!(map.triggers(&keys).is_empty());
    }
}
