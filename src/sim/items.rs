//! Item spawning, pickup, and timed buffs

use glam::Vec2;
use rand::Rng;

use super::schedule::{TimedBuff, TimerEvent};
use super::state::{GameEvent, GameState, Item, ItemKind, Notification, PlayerId, Role};
use crate::consts::*;
use crate::ms_to_ticks;

/// Spawn one random item unless the field is already full
///
/// Attacker items appear in the upper lane, defender items in the lower one.
pub fn spawn_item(state: &mut GameState) {
    if state.items.len() >= state.settings.max_items {
        return;
    }

    let attacker_item = state.rng.random_bool(0.5);
    let pool = if attacker_item {
        &ItemKind::ATTACKER_POOL
    } else {
        &ItemKind::DEFENDER_POOL
    };
    let kind = pool[state.rng.random_range(0..pool.len())];

    let x = state.rng.random::<f32>() * (GAME_WIDTH - 2.0 * ITEM_SPAWN_MARGIN) + ITEM_SPAWN_MARGIN;
    let y = if attacker_item {
        GAME_HEIGHT * 0.25
    } else {
        GAME_HEIGHT * 0.75
    };

    state.items.push(Item::new(Vec2::new(x, y), kind));
    state.push_event(GameEvent::ItemSpawned { kind });
}

/// Hand each item to its role's player if they touch it
pub fn collect_items(state: &mut GameState) {
    let (Some(attacker), Some(defender)) = (state.attacker, state.defender_id()) else {
        return;
    };

    let mut collected = Vec::new();
    state.items.retain(|item| {
        let id = match item.kind.role() {
            Role::Attacker => attacker,
            Role::Defender => defender,
        };
        let touching = state
            .players
            .as_ref()
            .is_some_and(|p| p[id.index()].rect().overlaps(&item.rect()));
        if touching {
            collected.push((id, item.kind));
        }
        !touching
    });

    for (id, kind) in collected {
        activate_item(state, id, kind);
    }
}

/// Apply an item's effect to `id`
pub fn activate_item(state: &mut GameState, id: PlayerId, kind: ItemKind) {
    let now = state.time_ticks;
    let duration = ms_to_ticks(state.settings.buff_duration_ms);

    let Some(player) = state.player_mut(id) else {
        return;
    };
    let notification = Notification::for_player(kind.label(), player);

    let timed = match kind {
        ItemKind::Shield => {
            player.has_shield = true;
            None
        }
        ItemKind::Booster => {
            player.speed = player.base_speed * SPEED_BOOST;
            player.speed_boost_until = Some(now + duration);
            Some(TimedBuff::SpeedBoost)
        }
        ItemKind::JumpBoost => {
            player.jump_strength = player.base_jump * JUMP_BOOST;
            player.jump_boost_until = Some(now + duration);
            Some(TimedBuff::JumpBoost)
        }
        ItemKind::TripleShot => {
            player.has_triple_shot = true;
            None
        }
        ItemKind::CurveShot => {
            player.has_curve_shot = true;
            None
        }
        ItemKind::HeavyGravity => {
            state.ctx.gravity = state.ctx.base_gravity * HEAVY_GRAVITY_FACTOR;
            state.ctx.heavy_gravity_until = Some(now + duration);
            Some(TimedBuff::HeavyGravity)
        }
    };

    log::debug!("{id} picked up {kind:?}");
    state.notifications.push(notification);
    state.push_event(GameEvent::ItemCollected { by: id, kind });

    if let Some(buff) = timed {
        state.schedule_in(duration, TimerEvent::BuffExpired { player: id, buff });
    }
}

/// Revert a timed buff if its window has actually closed
///
/// A second pickup of the same buff pushes the window out, so the first
/// expiry timer finds the buff still live and leaves it alone.
pub fn expire_buff(state: &mut GameState, id: PlayerId, buff: TimedBuff) {
    let now = state.time_ticks;
    let expired = |until: Option<u64>| until.is_some_and(|t| t <= now);

    let reverted = match buff {
        TimedBuff::HeavyGravity => {
            if expired(state.ctx.heavy_gravity_until) {
                state.ctx.reset();
                true
            } else {
                false
            }
        }
        TimedBuff::SpeedBoost => match state.player_mut(id) {
            Some(p) if expired(p.speed_boost_until) => {
                p.speed = p.base_speed;
                p.speed_boost_until = None;
                true
            }
            _ => false,
        },
        TimedBuff::JumpBoost => match state.player_mut(id) {
            Some(p) if expired(p.jump_boost_until) => {
                p.jump_strength = p.base_jump;
                p.jump_boost_until = None;
                true
            }
            _ => false,
        },
    };

    if reverted {
        log::debug!("{buff:?} expired");
        let player = (buff != TimedBuff::HeavyGravity).then_some(id);
        state.push_event(GameEvent::BuffExpired { player, buff });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;
    use crate::sim::state::{GamePhase, Player};

    /// A live round with Player 1 attacking
    fn in_round_state() -> GameState {
        let mut state = GameState::new(42, Settings::default());
        state.advance_epoch();
        state.phase = GamePhase::InRound;
        state.attacker = Some(PlayerId::One);
        state.players = Some([
            Player::new(PlayerId::One, Role::Attacker),
            Player::new(PlayerId::Two, Role::Defender),
        ]);
        state
    }

    #[test]
    fn test_spawn_item_lanes_and_bounds() {
        let mut state = in_round_state();
        for _ in 0..50 {
            state.items.clear();
            spawn_item(&mut state);
            let item = &state.items[0];
            assert!(item.pos.x >= ITEM_SPAWN_MARGIN);
            assert!(item.pos.x < GAME_WIDTH - ITEM_SPAWN_MARGIN);
            let expected_y = match item.kind.role() {
                Role::Attacker => GAME_HEIGHT * 0.25,
                Role::Defender => GAME_HEIGHT * 0.75,
            };
            assert_eq!(item.pos.y, expected_y);
        }
    }

    #[test]
    fn test_spawn_item_respects_cap() {
        let mut state = in_round_state();
        for _ in 0..10 {
            spawn_item(&mut state);
        }
        assert_eq!(state.items.len(), state.settings.max_items);
    }

    #[test]
    fn test_only_matching_role_collects() {
        let mut state = in_round_state();
        // Defender item placed right on the attacker
        let attacker_center = state.attacker().unwrap().rect().min + Vec2::new(10.0, 10.0);
        state.items.push(Item::new(attacker_center, ItemKind::Shield));
        collect_items(&mut state);
        assert_eq!(state.items.len(), 1);
        assert!(!state.attacker().unwrap().has_shield);

        // Attacker item placed on the attacker
        state.items.push(Item::new(attacker_center, ItemKind::TripleShot));
        collect_items(&mut state);
        assert_eq!(state.items.len(), 1);
        assert!(state.attacker().unwrap().has_triple_shot);
        assert_eq!(state.notifications.len(), 1);
        assert_eq!(state.notifications[0].text, "Triple shot!");
    }

    #[test]
    fn test_booster_expires_after_duration() {
        let mut state = in_round_state();
        activate_item(&mut state, PlayerId::Two, ItemKind::Booster);
        let p = state.player(PlayerId::Two).unwrap();
        assert_eq!(p.speed, PLAYER_SPEED * SPEED_BOOST);

        state.time_ticks += ms_to_ticks(state.settings.buff_duration_ms) - 1;
        expire_buff(&mut state, PlayerId::Two, TimedBuff::SpeedBoost);
        assert_eq!(state.player(PlayerId::Two).unwrap().speed, PLAYER_SPEED * SPEED_BOOST);

        state.time_ticks += 1;
        expire_buff(&mut state, PlayerId::Two, TimedBuff::SpeedBoost);
        assert_eq!(state.player(PlayerId::Two).unwrap().speed, PLAYER_SPEED);
    }

    #[test]
    fn test_jump_boost_multiplies_jump() {
        let mut state = in_round_state();
        activate_item(&mut state, PlayerId::Two, ItemKind::JumpBoost);
        let p = state.player(PlayerId::Two).unwrap();
        assert!((p.jump_strength - JUMP_STRENGTH * JUMP_BOOST).abs() < 1e-6);
    }

    #[test]
    fn test_repeat_pickup_extends_window() {
        let mut state = in_round_state();
        activate_item(&mut state, PlayerId::Two, ItemKind::Booster);
        state.time_ticks += 100;
        activate_item(&mut state, PlayerId::Two, ItemKind::Booster);

        // First timer's due time arrives: still boosted
        state.time_ticks = ms_to_ticks(state.settings.buff_duration_ms);
        expire_buff(&mut state, PlayerId::Two, TimedBuff::SpeedBoost);
        assert_eq!(state.player(PlayerId::Two).unwrap().speed, PLAYER_SPEED * SPEED_BOOST);

        state.time_ticks += 100;
        expire_buff(&mut state, PlayerId::Two, TimedBuff::SpeedBoost);
        assert_eq!(state.player(PlayerId::Two).unwrap().speed, PLAYER_SPEED);
    }

    #[test]
    fn test_heavy_gravity_doubles_field_gravity() {
        let mut state = in_round_state();
        activate_item(&mut state, PlayerId::One, ItemKind::HeavyGravity);
        assert_eq!(state.ctx.gravity, BASE_GRAVITY * 2.0);
        assert!(state.schedule.iter().any(|e| e.event
            == TimerEvent::BuffExpired {
                player: PlayerId::One,
                buff: TimedBuff::HeavyGravity
            }));
    }
}
