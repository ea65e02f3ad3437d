//! Round and match state machine
//!
//! `Starting -> Intermission -> RoundStarting -> InRound -> RoundOver ->
//! (Intermission | GameOver)`. Every transition is a scheduled timer; the
//! transition into `RoundOver` is the only one triggered from the simulation
//! step (third hit) or the countdown (time out).

use rand::Rng;

use super::items;
use super::schedule::TimerEvent;
use super::state::{Banner, GameEvent, GamePhase, GameState, Player, PlayerId, Role};
use crate::consts::SIM_HZ;
use crate::ms_to_ticks;

/// Show the title and queue the first round announcement
pub fn start_game(state: &mut GameState) {
    state.set_phase(GamePhase::Starting);
    state.banner = Some(Banner::Title);
    let delay = ms_to_ticks(state.settings.intro_delay_ms);
    state.schedule_in(delay, TimerEvent::ShowIntermission);
}

/// Throw away the current match and start over with a fresh seed
pub fn new_game(state: &mut GameState, seed: u64) {
    use rand::SeedableRng;

    log::info!("New game with seed {seed}");
    state.advance_epoch();
    state.seed = seed;
    state.rng = rand_pcg::Pcg32::seed_from_u64(seed);
    state.round = 1;
    state.rounds_won = [0, 0];
    state.attacker = None;
    state.players = None;
    state.clear_round_entities();
    state.ctx.reset();
    state.defender_hits = 0;
    state.round_timer = 0;
    state.can_throw = true;
    start_game(state);
}

/// Fire every timer that is due, skipping ones from a stale epoch
pub fn fire_due_timers(state: &mut GameState) {
    while let Some(entry) = state.schedule.pop_due(state.time_ticks) {
        if entry.epoch != state.epoch {
            log::trace!("Dropping stale timer {:?}", entry.event);
            continue;
        }
        handle_timer(state, entry.event);
    }
}

fn handle_timer(state: &mut GameState, event: TimerEvent) {
    match event {
        TimerEvent::ShowIntermission => show_intermission(state),
        TimerEvent::StartRound => start_round(state),
        TimerEvent::BeginPlay => begin_play(state),
        TimerEvent::RoundSecond => round_second(state),
        TimerEvent::SpawnItem => {
            if state.phase == GamePhase::InRound {
                items::spawn_item(state);
                let interval = ms_to_ticks(state.settings.item_spawn_interval_ms);
                state.schedule_in(interval, TimerEvent::SpawnItem);
            }
        }
        TimerEvent::ReopenThrowGate => state.can_throw = true,
        TimerEvent::BuffExpired { player, buff } => items::expire_buff(state, player, buff),
        TimerEvent::EndGame { winner } => end_game(state, winner),
    }
}

/// Announce the upcoming round with an empty field
pub fn show_intermission(state: &mut GameState) {
    state.set_phase(GamePhase::Intermission);
    state.banner = Some(Banner::Round(state.round));
    state.players = None;
    let delay = ms_to_ticks(state.settings.round_announce_ms);
    state.schedule_in(delay, TimerEvent::StartRound);
}

/// Reset the field, pick roles, and announce the attacker
pub fn start_round(state: &mut GameState) {
    state.set_phase(GamePhase::RoundStarting);
    state.clear_round_entities();
    state.defender_hits = 0;
    state.can_throw = true;
    state.ctx.reset();
    state.round_timer = state.settings.round_duration_secs;

    // Coin flip for the first round, strict alternation after that
    let attacker = match state.attacker {
        Some(previous) if state.round > 1 => previous.other(),
        _ => {
            if state.rng.random_bool(0.5) {
                PlayerId::One
            } else {
                PlayerId::Two
            }
        }
    };
    state.attacker = Some(attacker);

    let mut players = [
        Player::new(PlayerId::One, Role::Defender),
        Player::new(PlayerId::Two, Role::Defender),
    ];
    players[attacker.index()] = Player::new(attacker, Role::Attacker);
    state.players = Some(players);

    state.banner = Some(Banner::Attacks(attacker));
    log::info!("Round {}: {attacker} attacks", state.round);
    state.push_event(GameEvent::RoundStarted {
        round: state.round,
        attacker,
    });
    if state.round == 1 {
        state.push_event(GameEvent::MusicStart);
    }

    let delay = ms_to_ticks(state.settings.role_announce_ms);
    state.schedule_in(delay, TimerEvent::BeginPlay);
}

/// The round goes live: start the countdown and item spawns
pub fn begin_play(state: &mut GameState) {
    state.set_phase(GamePhase::InRound);
    state.banner = None;
    state.schedule_in(u64::from(SIM_HZ), TimerEvent::RoundSecond);
    let interval = ms_to_ticks(state.settings.item_spawn_interval_ms);
    state.schedule_in(interval, TimerEvent::SpawnItem);
}

fn round_second(state: &mut GameState) {
    if state.phase != GamePhase::InRound {
        return;
    }
    state.round_timer = state.round_timer.saturating_sub(1);
    if state.round_timer == 0 {
        if let Some(defender) = state.defender_id() {
            end_round(state, defender);
        }
    } else {
        state.schedule_in(u64::from(SIM_HZ), TimerEvent::RoundSecond);
    }
}

/// Close the live round in `winner`'s favor and queue what comes next
///
/// All timers from the round (countdown, spawns, buffs, throw cooldown) are
/// invalidated here.
pub fn end_round(state: &mut GameState, winner: PlayerId) {
    if state.phase != GamePhase::InRound {
        return;
    }
    state.advance_epoch();
    state.set_phase(GamePhase::RoundOver);
    state.banner = Some(Banner::RoundWinner(winner));
    state.rounds_won[winner.index()] += 1;

    log::info!(
        "{winner} wins round {} (score {} : {})",
        state.round,
        state.rounds_won[0],
        state.rounds_won[1]
    );
    state.push_event(GameEvent::RoundEnded {
        round: state.round,
        winner,
    });

    if state.wins(winner) >= state.settings.rounds_to_win {
        let delay = ms_to_ticks(state.settings.game_result_ms);
        state.schedule_in(delay, TimerEvent::EndGame { winner });
    } else {
        state.round += 1;
        let delay = ms_to_ticks(state.settings.round_result_ms);
        state.schedule_in(delay, TimerEvent::ShowIntermission);
    }
}

/// Terminal transition
pub fn end_game(state: &mut GameState, winner: PlayerId) {
    state.set_phase(GamePhase::GameOver);
    state.banner = Some(Banner::FinalWinner(winner));
    log::info!("Final winner: {winner}");
    state.push_event(GameEvent::GameOver { winner });
}
