//! Keyboard state to per-player intents
//!
//! Level-triggered: a held key is a sustained intent. No debouncing.

use std::collections::HashSet;

use crate::sim::{PlayerId, PlayerIntent, TickInput};

/// Keys the game listens to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    D,
    W,
    S,
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
}

impl Key {
    /// Parse a host key name, case-insensitive. Unknown keys map to None.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "a" => Some(Key::A),
            "d" => Some(Key::D),
            "w" => Some(Key::W),
            "s" => Some(Key::S),
            "arrowleft" => Some(Key::ArrowLeft),
            "arrowright" => Some(Key::ArrowRight),
            "arrowup" => Some(Key::ArrowUp),
            "arrowdown" => Some(Key::ArrowDown),
            _ => None,
        }
    }
}

/// One player's controls
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyBindings {
    pub left: Key,
    pub right: Key,
    pub jump: Key,
    pub throw: Key,
}

impl KeyBindings {
    pub fn for_player(id: PlayerId) -> Self {
        match id {
            PlayerId::One => Self {
                left: Key::A,
                right: Key::D,
                jump: Key::W,
                throw: Key::S,
            },
            PlayerId::Two => Self {
                left: Key::ArrowLeft,
                right: Key::ArrowRight,
                jump: Key::ArrowUp,
                throw: Key::ArrowDown,
            },
        }
    }
}

/// Currently held keys
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashSet<Key>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn key_down(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.held.insert(key);
        }
    }

    pub fn key_up(&mut self, name: &str) {
        if let Some(key) = Key::from_name(name) {
            self.held.remove(&key);
        }
    }

    pub fn is_held(&self, key: Key) -> bool {
        self.held.contains(&key)
    }

    /// Release everything (e.g. on focus loss)
    pub fn clear(&mut self) {
        self.held.clear();
    }

    /// Intent for one player; right wins when both directions are held
    pub fn intent(&self, bindings: &KeyBindings) -> PlayerIntent {
        let horizontal = if self.is_held(bindings.right) {
            1
        } else if self.is_held(bindings.left) {
            -1
        } else {
            0
        };
        PlayerIntent {
            horizontal,
            jump: self.is_held(bindings.jump),
            throw: self.is_held(bindings.throw),
        }
    }

    /// Snapshot both players' intents for the next tick
    pub fn snapshot(&self) -> TickInput {
        TickInput {
            players: PlayerId::ALL.map(|id| self.intent(&KeyBindings::for_player(id))),
        }
    }
}
