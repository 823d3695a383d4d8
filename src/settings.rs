//! Game settings and preferences
//!
//! Persisted as JSON next to the high score.

use serde::{Deserialize, Serialize};

use crate::platform::{KeyBindings, KeyValueStore};

/// A boolean setting flipped from a hotkey
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingToggle {
    Particles,
    ShowFps,
}

impl SettingToggle {
    /// Hotkey for each toggle, as a DOM `KeyboardEvent.key` value
    pub fn for_key(key: &str) -> Option<Self> {
        match key {
            "p" | "P" => Some(SettingToggle::Particles),
            "f" | "F" => Some(SettingToggle::ShowFps),
            _ => None,
        }
    }
}

/// Game settings/preferences
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Particle effects (trail, explosions, sparkles, confetti)
    pub particles: bool,
    /// Show FPS counter
    pub show_fps: bool,
    pub key_bindings: KeyBindings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            particles: true,
            show_fps: false,
            key_bindings: KeyBindings::default(),
        }
    }
}

impl Settings {
    /// Storage key
    pub const STORAGE_KEY: &'static str = "crown_dash_settings";

    /// Load settings, falling back to defaults on any failure
    pub fn load(store: &dyn KeyValueStore) -> Self {
        match store.get(Self::STORAGE_KEY) {
            Ok(Some(json)) => match serde_json::from_str(&json) {
                Ok(settings) => {
                    log::info!("Loaded settings from storage");
                    settings
                }
                Err(e) => {
                    log::warn!("Stored settings are invalid, using defaults: {}", e);
                    Self::default()
                }
            },
            Ok(None) => {
                log::info!("Using default settings");
                Self::default()
            }
            Err(e) => {
                log::warn!("Settings unavailable, using defaults: {}", e);
                Self::default()
            }
        }
    }

    pub fn toggle(&mut self, toggle: SettingToggle) {
        match toggle {
            SettingToggle::Particles => {
                self.particles = !self.particles;
                log::info!("Particles {}", if self.particles { "on" } else { "off" });
            }
            SettingToggle::ShowFps => {
                self.show_fps = !self.show_fps;
                log::info!("FPS display {}", if self.show_fps { "on" } else { "off" });
            }
        }
    }

    pub fn save(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(self) {
            Ok(json) => match store.set(Self::STORAGE_KEY, &json) {
                Ok(()) => log::info!("Settings saved"),
                Err(e) => log::warn!("Settings not saved: {}", e),
            },
            Err(e) => log::warn!("Settings not serialized: {}", e),
        }
    }
}
