//! Property tests over random key mashing

use proptest::prelude::*;

use throw_dodge::Settings;
use throw_dodge::consts::*;
use throw_dodge::sim::{
    GamePhase, GameState, ItemKind, PlayerId, PlayerIntent, Role, TickInput, ceiling_line,
    floor_line, items, tick,
};

fn intent() -> impl Strategy<Value = PlayerIntent> {
    (-1i8..=1, any::<bool>(), any::<bool>()).prop_map(|(horizontal, jump, throw)| PlayerIntent {
        horizontal,
        jump,
        throw,
    })
}

fn tick_input() -> impl Strategy<Value = TickInput> {
    (intent(), intent()).prop_map(|(a, b)| TickInput { players: [a, b] })
}

/// Fast-forward a fresh match to its first live tick
fn live_round(seed: u64) -> GameState {
    let mut state = GameState::new(seed, Settings::default());
    let idle = TickInput::default();
    while state.phase != GamePhase::InRound {
        tick(&mut state, &idle);
    }
    state
}

fn check_invariants(state: &GameState) {
    if let Some(players) = &state.players {
        let attackers = players.iter().filter(|p| p.role == Role::Attacker).count();
        assert_eq!(attackers, 1);
        for p in players {
            assert!(p.pos.x >= 0.0 && p.pos.x + p.size.x <= GAME_WIDTH);
            match p.role {
                Role::Attacker => assert!(p.pos.y >= ceiling_line()),
                Role::Defender => {
                    assert!(p.pos.y >= 0.0);
                    assert!(p.pos.y + p.size.y <= floor_line());
                }
            }
        }
    }
    assert!(state.defender_hits <= state.settings.hits_to_win_round);
    assert!(state.items.len() <= state.settings.max_items);
    assert!(state.rounds_won.iter().all(|&w| w <= state.settings.rounds_to_win));
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn physics_bounds_hold(seed in any::<u64>(), inputs in prop::collection::vec(tick_input(), 1..600)) {
        let mut state = live_round(seed);
        for input in &inputs {
            tick(&mut state, input);
            check_invariants(&state);
        }
    }

    #[test]
    fn bounds_hold_under_buffs(seed in any::<u64>(), inputs in prop::collection::vec(tick_input(), 1..400)) {
        let mut state = live_round(seed);
        let attacker = state.attacker.unwrap();
        items::activate_item(&mut state, attacker, ItemKind::HeavyGravity);
        items::activate_item(&mut state, attacker.other(), ItemKind::JumpBoost);
        items::activate_item(&mut state, attacker.other(), ItemKind::Booster);
        for input in &inputs {
            tick(&mut state, input);
            check_invariants(&state);
        }
    }

    #[test]
    fn matches_always_finish(seed in any::<u64>(), input in tick_input()) {
        let mut state = GameState::new(seed, Settings::default());
        for _ in 0..20_000 {
            if state.phase == GamePhase::GameOver {
                break;
            }
            tick(&mut state, &input);
            check_invariants(&state);
        }
        prop_assert_eq!(state.phase, GamePhase::GameOver);
        let best = *state.rounds_won.iter().max().unwrap();
        prop_assert_eq!(best, 2);
        let total: u32 = state.rounds_won.iter().sum();
        prop_assert!(total == 2 || total == 3);
    }
}

#[test]
fn heavy_gravity_window_is_exact() {
    let mut state = live_round(8);
    let attacker = state.attacker.unwrap();
    items::activate_item(&mut state, attacker, ItemKind::HeavyGravity);
    assert_eq!(state.ctx.gravity, BASE_GRAVITY * 2.0);

    let idle = TickInput::default();
    let window = throw_dodge::ms_to_ticks(5000);
    for _ in 0..window - 1 {
        tick(&mut state, &idle);
    }
    assert_eq!(state.ctx.gravity, BASE_GRAVITY * 2.0);
    tick(&mut state, &idle);
    assert_eq!(state.ctx.gravity, BASE_GRAVITY);
}

#[test]
fn heavy_gravity_doubles_defender_fall_but_not_attacker_hover() {
    let mut state = live_round(5);
    let attacker = state.attacker.unwrap();
    let defender = attacker.other();
    let started = state.time_ticks;
    items::activate_item(&mut state, attacker, ItemKind::HeavyGravity);

    let heavy = BASE_GRAVITY * HEAVY_GRAVITY_FACTOR;
    let vel = |state: &GameState, id: PlayerId| state.player(id).unwrap().vel_y;
    let idle = TickInput::default();
    let mut both_jump = TickInput::default();
    both_jump.players[0].jump = true;
    both_jump.players[1].jump = true;

    // Defender jumps, attacker hops down off the ceiling
    tick(&mut state, &both_jump);
    for _ in 0..10 {
        let (d0, a0) = (vel(&state, defender), vel(&state, attacker));
        tick(&mut state, &idle);
        assert!((vel(&state, defender) - d0 - heavy).abs() < 1e-4);
        assert!((vel(&state, attacker) - a0 + BASE_GRAVITY * 0.5).abs() < 1e-4);
    }

    let window = throw_dodge::ms_to_ticks(5000);
    while state.time_ticks < started + window + 5 {
        tick(&mut state, &idle);
    }
    assert_eq!(state.ctx.gravity, BASE_GRAVITY);
    assert!(state.player(defender).unwrap().grounded);

    let mut jump = TickInput::default();
    jump.players[defender.index()].jump = true;
    tick(&mut state, &jump);
    for _ in 0..10 {
        let d0 = vel(&state, defender);
        tick(&mut state, &idle);
        assert!((vel(&state, defender) - d0 - BASE_GRAVITY).abs() < 1e-4);
    }
}

#[test]
fn defender_jump_is_higher_under_jump_boost() {
    fn peak(boosted: bool) -> f32 {
        let mut state = live_round(3);
        let defender = state.defender_id().unwrap();
        if boosted {
            items::activate_item(&mut state, defender, ItemKind::JumpBoost);
        }
        let mut jump = TickInput::default();
        jump.players[defender.index()].jump = true;
        let mut top = f32::MAX;
        tick(&mut state, &jump);
        for _ in 0..120 {
            tick(&mut state, &TickInput::default());
            top = top.min(state.player(defender).unwrap().pos.y);
        }
        top
    }
    assert!(peak(true) < peak(false));
}

#[test]
fn player_ids_are_stable_indices() {
    assert_eq!(PlayerId::One.index(), 0);
    assert_eq!(PlayerId::Two.index(), 1);
    assert_eq!(PlayerId::One.other(), PlayerId::Two);
}
