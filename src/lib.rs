//! ThrowDodge - a two-player local arena game
//!
//! Core modules:
//! - `sim`: Deterministic simulation (physics, collisions, round state machine)
//! - `input`: Raw key state to per-player intents
//! - `runner`: Fixed-timestep frame driver
//! - `hud`: Read-only score/timer/banner projection for presentation
//! - `audio`: Background music collaborator
//! - `settings`: Data-driven match rules

pub mod audio;
pub mod hud;
pub mod input;
pub mod runner;
pub mod settings;
pub mod sim;

pub use settings::{Settings, SettingsError};

/// Game configuration constants
///
/// Velocities and accelerations are in pixels per tick at `SIM_HZ`.
pub mod consts {
    /// Simulation rate
    pub const SIM_HZ: u32 = 60;
    /// Fixed simulation timestep
    pub const SIM_DT: f32 = 1.0 / SIM_HZ as f32;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Longest frame delta the driver will account for (seconds)
    pub const MAX_FRAME_DT: f32 = 0.1;

    /// Playfield dimensions
    pub const GAME_WIDTH: f32 = 1000.0;
    pub const GAME_HEIGHT: f32 = 600.0;

    /// Player defaults
    pub const PLAYER_WIDTH: f32 = 75.0;
    pub const PLAYER_HEIGHT: f32 = 30.0;
    pub const PLAYER_SPEED: f32 = 7.0;
    /// Defender jump impulse (negative = up)
    pub const JUMP_STRENGTH: f32 = -9.0;
    /// Attacker hop impulse (positive = down, away from the ceiling)
    pub const ATTACKER_HOP_STRENGTH: f32 = 6.0;

    /// Base downward acceleration
    pub const BASE_GRAVITY: f32 = 0.3;

    /// Projectile defaults
    pub const PROJECTILE_SIZE: f32 = 12.0;
    pub const THROW_SPEED: f32 = 24.0;
    /// Horizontal velocity per unit of steering input at throw time
    pub const THROW_STEER: f32 = 3.0;
    /// Horizontal spread between triple-shot projectiles
    pub const TRIPLE_SHOT_SPREAD: f32 = 2.0;
    /// Curve coefficient is drawn from [-CURVE_MAX, CURVE_MAX)
    pub const CURVE_MAX: f32 = 0.1;
    /// Horizontal nudge toward the defender past the midline
    pub const HOMING_STRENGTH: f32 = 0.15;
    /// Offsets at or below this are ignored to prevent jitter
    pub const HOMING_DEADZONE: f32 = 1.0;

    /// Item defaults
    pub const ITEM_SIZE: f32 = 15.0;
    /// Items spawn this far from the side walls
    pub const ITEM_SPAWN_MARGIN: f32 = 100.0;

    /// Buff multipliers
    pub const SPEED_BOOST: f32 = 1.5;
    pub const JUMP_BOOST: f32 = 1.3;
    pub const HEAVY_GRAVITY_FACTOR: f32 = 2.0;

    /// Particles per burst
    pub const PARTICLE_BURST: usize = 10;
    pub const PARTICLE_LIFESPAN: u32 = 100;
    /// Notification lifetime (2 seconds)
    pub const NOTIFICATION_LIFESPAN: u32 = 120;
    /// Notification rise per tick
    pub const NOTIFICATION_RISE: f32 = 0.5;

    /// Player colors (0xRRGGBB)
    pub const PLAYER_ONE_COLOR: u32 = 0x00FFFF;
    pub const PLAYER_TWO_COLOR: u32 = 0xFF00FF;
}

/// Convert a wall-clock duration to whole simulation ticks (rounded up)
#[inline]
pub fn ms_to_ticks(ms: u32) -> u64 {
    (u64::from(ms) * u64::from(consts::SIM_HZ)).div_ceil(1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ms_to_ticks() {
        assert_eq!(ms_to_ticks(500), 30);
        assert_eq!(ms_to_ticks(1000), 60);
        assert_eq!(ms_to_ticks(5000), 300);
        assert_eq!(ms_to_ticks(7000), 420);
        assert_eq!(ms_to_ticks(0), 0);
        // Partial ticks round up so a timer never fires early
        assert_eq!(ms_to_ticks(10), 1);
    }
}
