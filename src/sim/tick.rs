//! Fixed timestep simulation tick
//!
//! One call advances the match by exactly one tick: the simulation step runs
//! first (only while a round is live), then any timers that came due fire.
//! Running the step first means a third hit always beats the round timer
//! when both land on the same tick.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::flow;
use super::items;
use super::state::{GameEvent, GamePhase, GameState, PlayerId, Projectile};
use super::schedule::TimerEvent;
use crate::consts::*;
use crate::ms_to_ticks;

/// What one player wants to do this tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerIntent {
    /// -1 left, 0 none, +1 right
    pub horizontal: i8,
    pub jump: bool,
    pub throw: bool,
}

/// Input commands for a single tick, indexed by `PlayerId::index`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    pub players: [PlayerIntent; 2],
}

impl TickInput {
    pub fn intent(&self, id: PlayerId) -> &PlayerIntent {
        &self.players[id.index()]
    }
}

/// Advance the game state by one fixed timestep
pub fn tick(state: &mut GameState, input: &TickInput) {
    if state.phase == GamePhase::GameOver {
        return;
    }

    state.time_ticks += 1;

    if state.phase == GamePhase::InRound {
        step(state, input);
    }

    flow::fire_due_timers(state);
}

/// The live-round simulation step
fn step(state: &mut GameState, input: &TickInput) {
    let Some(attacker_id) = state.attacker else {
        return;
    };
    let defender_id = attacker_id.other();

    handle_throwing(state, attacker_id, input.intent(attacker_id));

    if let Some(players) = state.players.as_mut() {
        for player in players.iter_mut() {
            player.apply_input(input.intent(player.id));
            player.tick(&state.ctx);
        }
    }

    for particle in &mut state.particles {
        particle.tick();
    }
    state.particles.retain(|p| p.lifespan > 0);

    for notification in &mut state.notifications {
        notification.tick();
    }
    state.notifications.retain(|n| n.lifespan > 0);

    update_projectiles(state, defender_id);

    if state.phase == GamePhase::InRound {
        items::collect_items(state);
    }
}

/// Move projectiles, resolve hits and misses, sweep the dead ones
fn update_projectiles(state: &mut GameState, defender_id: PlayerId) {
    let Some(defender_rect) = state.player(defender_id).map(|d| d.rect()) else {
        return;
    };
    let target_x = defender_rect.center_x();
    let hits_to_win = state.settings.hits_to_win_round;

    let mut bursts: Vec<(Vec2, u32)> = Vec::new();
    let mut round_won = false;

    for i in 0..state.projectiles.len() {
        let proj = &mut state.projectiles[i];
        proj.tick(&state.ctx, target_x, GAME_HEIGHT);

        if defender_rect.contains_point(proj.pos) {
            proj.alive = false;
            bursts.push((proj.pos, proj.color));

            let shielded = match state.player_mut(defender_id) {
                Some(defender) if defender.has_shield => {
                    defender.has_shield = false;
                    true
                }
                _ => false,
            };
            if !shielded {
                state.defender_hits += 1;
            }
            log::debug!("Defender hit (shielded: {shielded}), hits: {}", state.defender_hits);
            state.push_event(GameEvent::DefenderHit {
                shielded,
                hits: state.defender_hits,
            });

            if state.defender_hits >= hits_to_win {
                round_won = true;
                break;
            }
        } else if proj.is_below(GAME_HEIGHT) {
            proj.alive = false;
            bursts.push((proj.pos, proj.color));
            state.push_event(GameEvent::ProjectileMissed);
        }
    }

    state.projectiles.retain(|p| p.alive);
    for (pos, color) in bursts {
        state.spawn_particles(pos, color);
    }

    if round_won {
        if let Some(attacker) = state.attacker {
            flow::end_round(state, attacker);
        }
    }
}

/// Throw if the attacker asks and the cooldown gate is open
fn handle_throwing(state: &mut GameState, attacker_id: PlayerId, intent: &PlayerIntent) {
    if !state.can_throw || !intent.throw {
        return;
    }

    let count = throw(state, attacker_id, intent.horizontal);
    if count == 0 {
        return;
    }

    state.can_throw = false;
    let cooldown = ms_to_ticks(state.settings.throw_cooldown_ms);
    state.schedule_in(cooldown, TimerEvent::ReopenThrowGate);
    state.push_event(GameEvent::Thrown {
        by: attacker_id,
        count,
    });
    log::debug!("{attacker_id} threw {count} projectile(s)");
}

/// Spawn projectiles from the attacker's bottom center, consuming shot buffs
///
/// Returns how many projectiles were spawned.
pub fn throw(state: &mut GameState, attacker_id: PlayerId, steer: i8) -> usize {
    let curve_roll = state.rng.random::<f32>();
    let Some(attacker) = state.player_mut(attacker_id) else {
        return 0;
    };
    if !attacker.is_attacker() {
        return 0;
    }

    let origin = Vec2::new(attacker.center_x(), attacker.pos.y + attacker.size.y);
    let vel_x = f32::from(steer) * THROW_STEER;
    let color = attacker.color;

    let thrown: Vec<Projectile> = if attacker.has_triple_shot {
        attacker.has_triple_shot = false;
        (-1..=1)
            .map(|i| {
                let vel = Vec2::new(i as f32 * TRIPLE_SHOT_SPREAD + vel_x, THROW_SPEED);
                Projectile::new(origin, vel, color, 0.0)
            })
            .collect()
    } else {
        let curve = if attacker.has_curve_shot {
            (curve_roll - 0.5) * 2.0 * CURVE_MAX
        } else {
            0.0
        };
        attacker.has_curve_shot = false;
        vec![Projectile::new(origin, Vec2::new(vel_x, THROW_SPEED), color, curve)]
    };

    let count = thrown.len();
    state.projectiles.extend(thrown);
    count
}
