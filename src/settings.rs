//! Match rules and timings
//!
//! Loaded from a JSON file; any field left out takes its default.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors loading or validating settings
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("Failed to read settings: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse settings: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid setting `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: &'static str,
    },
}

/// Tunable match rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // === Round rules ===
    /// Seconds on the round clock; the defender wins when it runs out
    pub round_duration_secs: u32,
    /// Unshielded hits that win the round for the attacker
    pub hits_to_win_round: u32,
    /// Rounds needed to win the match (2 = best of three)
    pub rounds_to_win: u32,

    // === Combat ===
    pub throw_cooldown_ms: u32,
    /// How long speed, jump, and heavy gravity buffs last
    pub buff_duration_ms: u32,
    pub item_spawn_interval_ms: u32,
    /// Items on the field at once
    pub max_items: usize,

    // === Announcements ===
    pub intro_delay_ms: u32,
    pub round_announce_ms: u32,
    pub role_announce_ms: u32,
    pub round_result_ms: u32,
    pub game_result_ms: u32,

    // === Audio ===
    /// Background music volume (0.0 - 1.0)
    pub music_volume: f32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            round_duration_secs: 30,
            hits_to_win_round: 3,
            rounds_to_win: 2,

            throw_cooldown_ms: 500,
            buff_duration_ms: 5000,
            item_spawn_interval_ms: 7000,
            max_items: 3,

            intro_delay_ms: 3000,
            round_announce_ms: 2000,
            role_announce_ms: 2000,
            round_result_ms: 3000,
            game_result_ms: 3000,

            music_volume: 0.5,
        }
    }
}

impl Settings {
    /// Parse and validate settings from JSON text
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let settings: Settings = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Load settings from a JSON file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, SettingsError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let settings = Self::from_json(&json)?;
        log::info!("Loaded settings from {}", path.display());
        Ok(settings)
    }

    /// Reject values that would stall or break the match
    pub fn validate(&self) -> Result<(), SettingsError> {
        let invalid = |field, reason| Err(SettingsError::Invalid { field, reason });

        if self.round_duration_secs == 0 {
            return invalid("round_duration_secs", "must be at least 1");
        }
        if self.hits_to_win_round == 0 {
            return invalid("hits_to_win_round", "must be at least 1");
        }
        if self.rounds_to_win == 0 {
            return invalid("rounds_to_win", "must be at least 1");
        }
        let durations = [
            ("throw_cooldown_ms", self.throw_cooldown_ms),
            ("buff_duration_ms", self.buff_duration_ms),
            ("item_spawn_interval_ms", self.item_spawn_interval_ms),
            ("intro_delay_ms", self.intro_delay_ms),
            ("round_announce_ms", self.round_announce_ms),
            ("role_announce_ms", self.role_announce_ms),
            ("round_result_ms", self.round_result_ms),
            ("game_result_ms", self.game_result_ms),
        ];
        if let Some((field, _)) = durations.into_iter().find(|&(_, ms)| ms == 0) {
            return invalid(field, "must be positive");
        }
        if !(0.0..=1.0).contains(&self.music_volume) {
            return invalid("music_volume", "must be between 0.0 and 1.0");
        }
        Ok(())
    }
}
