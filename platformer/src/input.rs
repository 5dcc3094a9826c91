use std::collections::{HashMap, HashSet};

use winit::{
    event::{ElementState, KeyEvent},
    keyboard::{KeyCode, PhysicalKey},
};

/// Tracks keyboard state across frames.
#[derive(Clone, Debug, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    keys_released: HashSet<KeyCode>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear per-frame pressed/released flags.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.keys_released.clear();
    }

    /// Handle a keyboard input event from winit.
    pub fn handle_key(&mut self, event: &KeyEvent) {
        if let PhysicalKey::Code(keycode) = event.physical_key {
            match event.state {
                ElementState::Pressed => self.press(keycode),
                ElementState::Released => self.release(keycode),
            }
        }
    }

    /// Record a key going down. Repeats while already held are not new presses.
    pub fn press(&mut self, key: KeyCode) {
        if self.keys_down.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    pub fn release(&mut self, key: KeyCode) {
        if self.keys_down.remove(&key) {
            self.keys_released.insert(key);
        }
    }

    /// Returns true if the key is currently held down.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Returns true if the key was pressed this frame.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Returns true if the key was released this frame.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }
}

/// Logical inputs the scene reacts to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Action {
    Left,
    Right,
    /// Primary jump key.
    Jump,
    /// Secondary jump key.
    JumpAlt,
    Restart,
    DebugToggle,
}

impl Action {
    pub const ALL: [Action; 6] = [
        Action::Left,
        Action::Right,
        Action::Jump,
        Action::JumpAlt,
        Action::Restart,
        Action::DebugToggle,
    ];
}

/// Read access to the logical input state of one frame.
pub trait Controls {
    /// The action is held this frame.
    fn held(&self, action: Action) -> bool;

    /// The action went down this frame.
    fn just_pressed(&self, action: Action) -> bool;

    fn jump_held(&self) -> bool {
        self.held(Action::Jump) || self.held(Action::JumpAlt)
    }

    fn jump_pressed(&self) -> bool {
        self.just_pressed(Action::Jump) || self.just_pressed(Action::JumpAlt)
    }
}

/// Key bindings from physical keys to actions.
///
/// Several keys may drive one action; the action is held when any of
/// them is.
#[derive(Clone, Debug)]
pub struct InputMap {
    actions: HashMap<Action, Vec<KeyCode>>,
}

impl InputMap {
    /// Create an empty input map.
    pub fn new() -> Self {
        Self {
            actions: HashMap::new(),
        }
    }

    /// Bind a key to an action.
    pub fn bind_key(&mut self, action: Action, key: KeyCode) {
        let keys = self.actions.entry(action).or_default();
        if !keys.contains(&key) {
            keys.push(key);
        }
    }

    /// Keys bound to an action.
    pub fn keys(&self, action: Action) -> &[KeyCode] {
        self.actions.get(&action).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Check if an action is currently held down.
    pub fn action_down(&self, input: &InputState, action: Action) -> bool {
        self.keys(action).iter().any(|&k| input.is_key_down(k))
    }

    /// Check if an action was pressed this frame.
    pub fn action_pressed(&self, input: &InputState, action: Action) -> bool {
        self.keys(action).iter().any(|&k| input.is_key_pressed(k))
    }

    /// Resolve the current key state into an owned per-frame action set.
    pub fn snapshot(&self, input: &InputState) -> ActionSnapshot {
        let mut snapshot = ActionSnapshot::new();
        for action in Action::ALL {
            if self.action_down(input, action) {
                snapshot.held.insert(action);
            }
            if self.action_pressed(input, action) {
                snapshot.pressed.insert(action);
            }
        }
        snapshot
    }
}

impl Default for InputMap {
    /// Arrow keys plus A/D to move, Up or Space to jump, R to restart, T for debug drawing.
    fn default() -> Self {
        let mut map = Self::new();
        map.bind_key(Action::Left, KeyCode::ArrowLeft);
        map.bind_key(Action::Left, KeyCode::KeyA);
        map.bind_key(Action::Right, KeyCode::ArrowRight);
        map.bind_key(Action::Right, KeyCode::KeyD);
        map.bind_key(Action::Jump, KeyCode::ArrowUp);
        map.bind_key(Action::JumpAlt, KeyCode::Space);
        map.bind_key(Action::Restart, KeyCode::KeyR);
        map.bind_key(Action::DebugToggle, KeyCode::KeyT);
        map
    }
}

/// Owned action state for one frame.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ActionSnapshot {
    held: HashSet<Action>,
    pressed: HashSet<Action>,
}

impl ActionSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark an action as held.
    #[must_use]
    pub fn hold(mut self, action: Action) -> Self {
        self.held.insert(action);
        self
    }

    /// Mark an action as pressed this frame (which also holds it).
    #[must_use]
    pub fn press(mut self, action: Action) -> Self {
        self.held.insert(action);
        self.pressed.insert(action);
        self
    }
}

impl Controls for ActionSnapshot {
    fn held(&self, action: Action) -> bool {
        self.held.contains(&action)
    }

    fn just_pressed(&self, action: Action) -> bool {
        self.pressed.contains(&action)
    }
}

/// Live view of an `InputState` through an `InputMap`.
pub struct BoundInput<'a> {
    pub map: &'a InputMap,
    pub state: &'a InputState,
}

impl Controls for BoundInput<'_> {
    fn held(&self, action: Action) -> bool {
        self.map.action_down(self.state, action)
    }

    fn just_pressed(&self, action: Action) -> bool {
        self.map.action_pressed(self.state, action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_is_an_edge_and_hold_persists() {
        let mut input = InputState::new();
        input.press(KeyCode::Space);
        assert!(input.is_key_pressed(KeyCode::Space));
        assert!(input.is_key_down(KeyCode::Space));

        input.begin_frame();
        // Key repeat while held is not a new press.
        input.press(KeyCode::Space);
        assert!(!input.is_key_pressed(KeyCode::Space));
        assert!(input.is_key_down(KeyCode::Space));

        input.release(KeyCode::Space);
        assert!(input.is_key_released(KeyCode::Space));
        assert!(!input.is_key_down(KeyCode::Space));
    }

    #[test]
    fn default_bindings_cover_both_key_sets() {
        let map = InputMap::default();
        let mut input = InputState::new();
        input.press(KeyCode::KeyA);
        input.press(KeyCode::Space);

        let bound = BoundInput {
            map: &map,
            state: &input,
        };
        assert!(bound.held(Action::Left));
        assert!(!bound.held(Action::Right));
        assert!(bound.jump_pressed());
        assert!(!bound.just_pressed(Action::Jump));
    }

    #[test]
    fn snapshot_matches_live_view() {
        let map = InputMap::default();
        let mut input = InputState::new();
        input.press(KeyCode::ArrowRight);
        input.begin_frame();
        input.press(KeyCode::KeyR);

        let snapshot = map.snapshot(&input);
        assert_eq!(
            snapshot,
            ActionSnapshot::new()
                .hold(Action::Right)
                .press(Action::Restart)
        );
    }

    #[test]
    fn binding_twice_does_not_duplicate() {
        let mut map = InputMap::new();
        map.bind_key(Action::Jump, KeyCode::KeyW);
        map.bind_key(Action::Jump, KeyCode::KeyW);
        assert_eq!(map.keys(Action::Jump), &[KeyCode::KeyW]);
        assert!(map.keys(Action::Restart).is_empty());
    }
}
