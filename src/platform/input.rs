//! Keyboard input: logical actions, bindings and held-key tracking

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Logical actions the simulation asks about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Action {
    Left,
    Right,
    Jump,
}

/// "Is this action held right now?"
pub trait InputSource {
    fn is_held(&self, action: Action) -> bool;
}

/// Physical keys (DOM `KeyboardEvent.key` values) per action
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyBindings {
    pub left: Vec<String>,
    pub right: Vec<String>,
    pub jump: Vec<String>,
}

impl Default for KeyBindings {
    fn default() -> Self {
        let keys = |list: &[&str]| list.iter().map(|k| k.to_string()).collect();
        Self {
            left: keys(&["ArrowLeft", "a"]),
            right: keys(&["ArrowRight", "d"]),
            jump: keys(&["ArrowUp", "w", " "]),
        }
    }
}

impl KeyBindings {
    pub fn keys_for(&self, action: Action) -> &[String] {
        match action {
            Action::Left => &self.left,
            Action::Right => &self.right,
            Action::Jump => &self.jump,
        }
    }

    /// First action bound to `key`, if any
    pub fn action_for(&self, key: &str) -> Option<Action> {
        [Action::Left, Action::Right, Action::Jump]
            .into_iter()
            .find(|&action| self.keys_for(action).iter().any(|k| k == key))
    }
}

/// Held keys, fed from key-down/key-up events
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<String>,
    bindings: KeyBindings,
}

impl KeyState {
    pub fn new(bindings: KeyBindings) -> Self {
        Self {
            held: HashSet::new(),
            bindings,
        }
    }

    /// Record a key press. Returns true when the key is bound to an action
    /// (the host can then suppress the browser default, e.g. page scroll).
    pub fn key_down(&mut self, key: &str) -> bool {
        self.held.insert(key.to_string());
        self.bindings.action_for(key).is_some()
    }

    pub fn key_up(&mut self, key: &str) {
        self.held.remove(key);
    }

    /// Forget every held key (window lost focus, key-ups will never arrive)
    pub fn release_all(&mut self) {
        self.held.clear();
    }
}

impl InputSource for KeyState {
    fn is_held(&self, action: Action) -> bool {
        self.bindings
            .keys_for(action)
            .iter()
            .any(|key| self.held.contains(key))
    }
}
