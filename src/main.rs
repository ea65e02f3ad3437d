//! ThrowDodge entry point
//!
//! Runs a headless match with idle input through the frame driver and logs
//! what happens. A real front end swaps the idle `KeyState` for live keyboard
//! events and renders `GameState` each frame.
//!
//! Usage: `throw-dodge [seed] [settings.json]`

use std::error::Error;
use std::time::{SystemTime, UNIX_EPOCH};

use throw_dodge::Settings;
use throw_dodge::audio::{BackgroundMusic, SilentOutput};
use throw_dodge::hud::HudSnapshot;
use throw_dodge::input::KeyState;
use throw_dodge::runner::FrameDriver;
use throw_dodge::sim::{GameEvent, GamePhase, GameState};

/// Simulated display refresh for the headless run
const FRAME_DT: f32 = 1.0 / 60.0;
/// Give up after this many frames (a default match needs well under 10k)
const MAX_FRAMES: u32 = 100_000;

fn main() -> Result<(), Box<dyn Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("ThrowDodge (headless) starting...");

    let mut args = std::env::args().skip(1);
    let seed = match args.next() {
        Some(s) => s.parse::<u64>()?,
        None => SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0),
    };
    let settings = match args.next() {
        Some(path) => Settings::load(path)?,
        None => {
            log::info!("Using default settings");
            Settings::default()
        }
    };

    let mut music = BackgroundMusic::new(SilentOutput, settings.music_volume);
    let mut state = GameState::new(seed, settings);
    log::info!("Game initialized with seed: {seed}");

    let keys = KeyState::new();
    let mut driver = FrameDriver::new();
    let mut last_message = String::new();

    for _ in 0..MAX_FRAMES {
        driver.advance(&mut state, &keys, FRAME_DT);

        let events = state.drain_events();
        music.handle_events(&events);
        for event in &events {
            match event {
                GameEvent::RoundEnded { round, winner } => {
                    log::info!("Round {round} to {winner}");
                }
                GameEvent::ItemSpawned { kind } => log::debug!("Item spawned: {kind:?}"),
                _ => {}
            }
        }

        let hud = HudSnapshot::from_state(&state);
        if !hud.message.is_empty() && hud.message != last_message {
            log::info!("[{}] {}", hud.round_score, hud.message);
        }
        last_message = hud.message;

        if state.phase == GamePhase::GameOver {
            break;
        }
    }

    log::info!(
        "Finished after {} ticks, final score {} : {}",
        driver.total_ticks,
        state.rounds_won[0],
        state.rounds_won[1]
    );
    Ok(())
}
