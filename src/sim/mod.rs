//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Timers live in the epoch-tagged schedule, never in the host
//! - No rendering, audio, or platform dependencies

pub mod collision;
pub mod flow;
pub mod items;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::Rect;
pub use flow::{end_round, new_game, start_game};
pub use schedule::{Schedule, TimedBuff, TimerEvent};
pub use state::{
    Banner, GameEvent, GamePhase, GameState, Item, ItemKind, Notification, Particle, Player,
    PlayerId, Projectile, Role, SimContext, ceiling_line, floor_line,
};
pub use tick::{PlayerIntent, TickInput, throw, tick};
