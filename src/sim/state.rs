//! Game state and core simulation types
//!
//! Entity models with their per-tick update rules, plus the match-level
//! state owned by the round state machine.

use std::fmt;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::collision::Rect;
use super::schedule::{Schedule, TimedBuff, TimerEvent};
use super::tick::PlayerIntent;
use crate::consts::*;
use crate::settings::Settings;

/// Current phase of the match
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GamePhase {
    /// Title shown before the first round
    Starting,
    /// "Round N" announcement, no players on the field
    Intermission,
    /// Players placed, roles announced, simulation frozen
    RoundStarting,
    /// Active play (the only phase the simulation step runs in)
    InRound,
    /// Round result shown
    RoundOver,
    /// Match decided
    GameOver,
}

/// One of the two seats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PlayerId {
    One,
    Two,
}

impl PlayerId {
    pub const ALL: [PlayerId; 2] = [PlayerId::One, PlayerId::Two];

    #[inline]
    pub fn index(self) -> usize {
        match self {
            PlayerId::One => 0,
            PlayerId::Two => 1,
        }
    }

    #[inline]
    pub fn other(self) -> Self {
        match self {
            PlayerId::One => PlayerId::Two,
            PlayerId::Two => PlayerId::One,
        }
    }

    pub fn color(self) -> u32 {
        match self {
            PlayerId::One => PLAYER_ONE_COLOR,
            PlayerId::Two => PLAYER_TWO_COLOR,
        }
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PlayerId::One => write!(f, "Player 1"),
            PlayerId::Two => write!(f, "Player 2"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Attacker,
    Defender,
}

/// Global physics modifiers, passed to every physics update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SimContext {
    pub base_gravity: f32,
    /// Current gravity (doubled while heavy gravity is active)
    pub gravity: f32,
    /// Tick at which heavy gravity runs out
    pub heavy_gravity_until: Option<u64>,
}

impl Default for SimContext {
    fn default() -> Self {
        Self {
            base_gravity: BASE_GRAVITY,
            gravity: BASE_GRAVITY,
            heavy_gravity_until: None,
        }
    }
}

impl SimContext {
    pub fn reset(&mut self) {
        self.gravity = self.base_gravity;
        self.heavy_gravity_until = None;
    }
}

/// Floor line the defender stands on (the box bottom rests here)
#[inline]
pub fn floor_line() -> f32 {
    GAME_HEIGHT - PLAYER_HEIGHT * 2.5
}

/// Highest point the attacker's box top can reach
#[inline]
pub fn ceiling_line() -> f32 {
    PLAYER_HEIGHT
}

/// A player on the field
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    /// Top-left corner
    pub pos: Vec2,
    pub size: Vec2,
    pub vel_y: f32,
    pub role: Role,
    pub color: u32,
    pub base_speed: f32,
    pub speed: f32,
    pub base_jump: f32,
    pub jump_strength: f32,
    pub grounded: bool,
    pub can_hop: bool,
    pub has_shield: bool,
    pub has_triple_shot: bool,
    pub has_curve_shot: bool,
    /// Tick at which the speed boost runs out
    pub speed_boost_until: Option<u64>,
    /// Tick at which the jump boost runs out
    pub jump_boost_until: Option<u64>,
}

impl Player {
    /// Create a player at rest on its role's line
    pub fn new(id: PlayerId, role: Role) -> Self {
        let x = GAME_WIDTH / 2.0 - PLAYER_WIDTH / 2.0;
        let (y, grounded) = match role {
            Role::Attacker => (ceiling_line(), false),
            Role::Defender => (floor_line() - PLAYER_HEIGHT, true),
        };
        Self {
            id,
            pos: Vec2::new(x, y),
            size: Vec2::new(PLAYER_WIDTH, PLAYER_HEIGHT),
            vel_y: 0.0,
            role,
            color: id.color(),
            base_speed: PLAYER_SPEED,
            speed: PLAYER_SPEED,
            base_jump: JUMP_STRENGTH,
            jump_strength: JUMP_STRENGTH,
            grounded,
            can_hop: true,
            has_shield: false,
            has_triple_shot: false,
            has_curve_shot: false,
            speed_boost_until: None,
            jump_boost_until: None,
        }
    }

    #[inline]
    pub fn is_attacker(&self) -> bool {
        self.role == Role::Attacker
    }

    pub fn rect(&self) -> Rect {
        Rect {
            min: self.pos,
            size: self.size,
        }
    }

    #[inline]
    pub fn center_x(&self) -> f32 {
        self.pos.x + self.size.x / 2.0
    }

    /// Apply movement and jump intent for this tick
    pub fn apply_input(&mut self, intent: &PlayerIntent) {
        self.pos.x += f32::from(intent.horizontal) * self.speed;
        self.pos.x = self.pos.x.clamp(0.0, GAME_WIDTH - self.size.x);

        if !intent.jump {
            return;
        }
        match self.role {
            Role::Attacker if self.can_hop => {
                self.vel_y = ATTACKER_HOP_STRENGTH;
                self.can_hop = false;
            }
            Role::Defender if self.grounded => {
                self.vel_y = self.jump_strength;
                self.grounded = false;
            }
            _ => {}
        }
    }

    /// Vertical integration and clamping
    pub fn tick(&mut self, ctx: &SimContext) {
        match self.role {
            Role::Attacker => {
                // Hover: a weak upward pull brings the attacker back to the ceiling
                self.vel_y -= ctx.base_gravity * 0.5;
                self.pos.y += self.vel_y;
                if self.pos.y <= ceiling_line() {
                    self.pos.y = ceiling_line();
                    self.vel_y = 0.0;
                    self.can_hop = true;
                }
            }
            Role::Defender => {
                self.vel_y += ctx.gravity;
                self.pos.y += self.vel_y;
                let floor = floor_line();
                if self.pos.y + self.size.y >= floor {
                    self.pos.y = floor - self.size.y;
                    self.vel_y = 0.0;
                    self.grounded = true;
                }
                if self.pos.y < 0.0 {
                    self.pos.y = 0.0;
                    self.vel_y = self.vel_y.max(0.0);
                }
            }
        }
    }
}

/// A thrown projectile
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
    pub vel: Vec2,
    /// Per-tick horizontal acceleration (curve-shot only)
    pub curve: f32,
    pub size: f32,
    pub color: u32,
    /// Cleared on hit or miss, swept after the tick
    pub alive: bool,
}

impl Projectile {
    pub fn new(pos: Vec2, vel: Vec2, color: u32, curve: f32) -> Self {
        Self {
            pos,
            vel,
            curve,
            size: PROJECTILE_SIZE,
            color,
            alive: true,
        }
    }

    /// Advance one tick, homing toward `target_x` once past the midline
    pub fn tick(&mut self, ctx: &SimContext, target_x: f32, field_height: f32) {
        self.vel.y += ctx.gravity;
        self.vel.x += self.curve;

        if self.pos.y >= field_height / 2.0 {
            let offset = target_x - self.pos.x;
            if offset.abs() > HOMING_DEADZONE {
                self.vel.x += offset.signum() * HOMING_STRENGTH;
            }
        }

        self.pos += self.vel;
    }

    #[inline]
    pub fn is_below(&self, field_height: f32) -> bool {
        self.pos.y > field_height
    }
}

/// Item types, split into attacker-only and defender-only pools
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    Shield,
    Booster,
    JumpBoost,
    TripleShot,
    CurveShot,
    HeavyGravity,
}

impl ItemKind {
    pub const DEFENDER_POOL: [ItemKind; 3] =
        [ItemKind::Shield, ItemKind::Booster, ItemKind::JumpBoost];
    pub const ATTACKER_POOL: [ItemKind; 3] = [
        ItemKind::TripleShot,
        ItemKind::CurveShot,
        ItemKind::HeavyGravity,
    ];

    /// The only role allowed to collect this item
    pub fn role(self) -> Role {
        match self {
            ItemKind::Shield | ItemKind::Booster | ItemKind::JumpBoost => Role::Defender,
            ItemKind::TripleShot | ItemKind::CurveShot | ItemKind::HeavyGravity => Role::Attacker,
        }
    }

    /// Pickup notification text
    pub fn label(self) -> &'static str {
        match self {
            ItemKind::Shield => "Shield!",
            ItemKind::Booster => "Speed up!",
            ItemKind::JumpBoost => "Jump boost!",
            ItemKind::TripleShot => "Triple shot!",
            ItemKind::CurveShot => "Curve shot!",
            ItemKind::HeavyGravity => "Heavy gravity!",
        }
    }

    /// Fill color for drawing the pickup
    pub fn color(self) -> u32 {
        match self {
            ItemKind::Shield => 0xFFFFFF,
            ItemKind::Booster => 0xFFFF00,
            ItemKind::JumpBoost => 0x00FF00,
            ItemKind::TripleShot => 0xFF00FF,
            ItemKind::CurveShot => 0xFF9900,
            ItemKind::HeavyGravity => 0x6600CC,
        }
    }
}

/// A pickup waiting on the field (never despawns on its own)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Item {
    /// Center
    pub pos: Vec2,
    pub kind: ItemKind,
    pub size: f32,
}

impl Item {
    pub fn new(pos: Vec2, kind: ItemKind) -> Self {
        Self {
            pos,
            kind,
            size: ITEM_SIZE,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::centered(self.pos, self.size)
    }
}

/// A particle for visual effects
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Particle {
    pub pos: Vec2,
    pub vel: Vec2,
    pub size: f32,
    pub color: u32,
    /// Ticks remaining
    pub lifespan: u32,
}

impl Particle {
    pub fn new<R: Rng>(pos: Vec2, color: u32, rng: &mut R) -> Self {
        Self {
            pos,
            vel: Vec2::new(
                (rng.random::<f32>() - 0.5) * 4.0,
                (rng.random::<f32>() - 0.5) * 4.0,
            ),
            size: rng.random::<f32>() * 3.0 + 1.0,
            color,
            lifespan: PARTICLE_LIFESPAN,
        }
    }

    pub fn tick(&mut self) {
        self.pos += self.vel;
        self.lifespan = self.lifespan.saturating_sub(1);
    }

    /// Fade factor (1 = fresh, 0 = gone)
    pub fn alpha(&self) -> f32 {
        self.lifespan as f32 / PARTICLE_LIFESPAN as f32
    }
}

/// Floating text tied to the player that triggered it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub text: String,
    pub pos: Vec2,
    pub color: u32,
    pub lifespan: u32,
    pub opacity: f32,
}

impl Notification {
    /// Place above the attacker's lane or below the defender's
    pub fn for_player(text: impl Into<String>, player: &Player) -> Self {
        let y = if player.is_attacker() {
            GAME_HEIGHT * 0.2
        } else {
            GAME_HEIGHT * 0.9
        };
        Self {
            text: text.into(),
            pos: Vec2::new(player.center_x(), y),
            color: player.color,
            lifespan: NOTIFICATION_LIFESPAN,
            opacity: 1.0,
        }
    }

    pub fn tick(&mut self) {
        self.pos.y -= NOTIFICATION_RISE;
        self.lifespan = self.lifespan.saturating_sub(1);
        self.opacity = self.lifespan as f32 / NOTIFICATION_LIFESPAN as f32;
    }
}

/// On-screen transition message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Banner {
    Title,
    Round(u32),
    Attacks(PlayerId),
    RoundWinner(PlayerId),
    FinalWinner(PlayerId),
}

impl fmt::Display for Banner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Banner::Title => write!(f, "ThrowDodge"),
            Banner::Round(n) => write!(f, "Round {n}"),
            Banner::Attacks(id) => write!(f, "{id} attacks!"),
            Banner::RoundWinner(id) => write!(f, "{id} wins the round!"),
            Banner::FinalWinner(id) => write!(f, "Final winner: {id}"),
        }
    }
}

/// Things that happened this tick, for presentation and audio
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    PhaseChanged { from: GamePhase, to: GamePhase },
    RoundStarted { round: u32, attacker: PlayerId },
    /// Background music should begin (first round only)
    MusicStart,
    Thrown { by: PlayerId, count: usize },
    DefenderHit { shielded: bool, hits: u32 },
    ProjectileMissed,
    ItemSpawned { kind: ItemKind },
    ItemCollected { by: PlayerId, kind: ItemKind },
    /// `player` is None for field-wide buffs (heavy gravity)
    BuffExpired { player: Option<PlayerId>, buff: TimedBuff },
    RoundEnded { round: u32, winner: PlayerId },
    GameOver { winner: PlayerId },
}

/// Complete game state (deterministic, serializable)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GameState {
    /// Match seed for reproducibility
    pub seed: u64,
    pub rng: Pcg32,
    pub settings: Settings,
    pub phase: GamePhase,
    /// Current round (1-based)
    pub round: u32,
    /// Rounds won, indexed by `PlayerId::index`
    pub rounds_won: [u32; 2],
    /// Attacker of the current (or most recent) round
    pub attacker: Option<PlayerId>,
    /// Both players, present from round setup until the next intermission
    pub players: Option<[Player; 2]>,
    pub projectiles: Vec<Projectile>,
    pub items: Vec<Item>,
    pub particles: Vec<Particle>,
    pub notifications: Vec<Notification>,
    pub ctx: SimContext,
    /// Unshielded hits the defender took this round
    pub defender_hits: u32,
    /// Seconds left in the round
    pub round_timer: u32,
    /// Throw cooldown gate
    pub can_throw: bool,
    pub banner: Option<Banner>,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Advanced whenever pending timers must be invalidated
    pub epoch: u32,
    pub schedule: Schedule,
    /// Events since the last drain
    #[serde(skip)]
    pub events: Vec<GameEvent>,
}

impl GameState {
    /// Create a new match and start the intro
    pub fn new(seed: u64, settings: Settings) -> Self {
        let mut state = Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            settings,
            phase: GamePhase::Starting,
            round: 1,
            rounds_won: [0, 0],
            attacker: None,
            players: None,
            projectiles: Vec::new(),
            items: Vec::new(),
            particles: Vec::new(),
            notifications: Vec::new(),
            ctx: SimContext::default(),
            defender_hits: 0,
            round_timer: 0,
            can_throw: true,
            banner: None,
            time_ticks: 0,
            epoch: 0,
            schedule: Schedule::new(),
            events: Vec::new(),
        };
        super::flow::start_game(&mut state);
        state
    }

    pub fn defender_id(&self) -> Option<PlayerId> {
        self.attacker.map(PlayerId::other)
    }

    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.as_ref().map(|p| &p[id.index()])
    }

    pub fn player_mut(&mut self, id: PlayerId) -> Option<&mut Player> {
        self.players.as_mut().map(|p| &mut p[id.index()])
    }

    pub fn attacker(&self) -> Option<&Player> {
        self.attacker.and_then(|id| self.player(id))
    }

    pub fn defender(&self) -> Option<&Player> {
        self.defender_id().and_then(|id| self.player(id))
    }

    pub fn wins(&self, id: PlayerId) -> u32 {
        self.rounds_won[id.index()]
    }

    /// Queue a timer in the current epoch
    pub fn schedule_in(&mut self, delay_ticks: u64, event: TimerEvent) {
        self.schedule
            .push(self.time_ticks, delay_ticks, self.epoch, event);
    }

    /// Invalidate every pending timer
    pub fn advance_epoch(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
        self.schedule.prune_stale(self.epoch);
    }

    pub fn set_phase(&mut self, phase: GamePhase) {
        if self.phase == phase {
            return;
        }
        log::info!("Phase {:?} -> {:?}", self.phase, phase);
        self.events.push(GameEvent::PhaseChanged {
            from: self.phase,
            to: phase,
        });
        self.phase = phase;
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Take all events produced since the last call
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Spawn a burst of debris at `pos`
    pub fn spawn_particles(&mut self, pos: Vec2, color: u32) {
        for _ in 0..PARTICLE_BURST {
            let particle = Particle::new(pos, color, &mut self.rng);
            self.particles.push(particle);
        }
    }

    /// Clear everything that only lives for one round
    pub fn clear_round_entities(&mut self) {
        self.projectiles.clear();
        self.items.clear();
        self.particles.clear();
        self.notifications.clear();
    }
}
