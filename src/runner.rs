//! Fixed-timestep frame driver
//!
//! The host calls `advance` once per display frame with the real elapsed
//! time. The driver turns that into whole simulation ticks so physics
//! behaves the same at 30, 60, or 144 Hz.

use crate::consts::*;
use crate::input::KeyState;
use crate::sim::{GameState, tick};

/// Accumulates frame time and runs whole ticks
#[derive(Debug, Clone, Default)]
pub struct FrameDriver {
    accumulator: f32,
    /// Ticks run over the driver's lifetime
    pub total_ticks: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Run as many ticks as `frame_dt` seconds cover, sampling input once
    ///
    /// Long stalls are capped so a hitch never turns into a burst of
    /// catch-up ticks. Returns the number of ticks run.
    pub fn advance(&mut self, state: &mut GameState, keys: &KeyState, frame_dt: f32) -> u32 {
        // A bogus timestamp (NaN or infinite) counts as no time passing
        let frame_dt = if frame_dt.is_finite() {
            frame_dt.clamp(0.0, MAX_FRAME_DT)
        } else {
            0.0
        };
        self.accumulator += frame_dt;

        let input = keys.snapshot();
        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            tick(state, &input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        self.total_ticks += u64::from(substeps);
        substeps
    }

    /// Fraction of a tick left over (for render interpolation)
    pub fn alpha(&self) -> f32 {
        self.accumulator / SIM_DT
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Settings;

    #[test]
    fn test_one_tick_per_60hz_frame() {
        let mut state = GameState::new(1, Settings::default());
        let mut driver = FrameDriver::new();
        let keys = KeyState::new();
        // Slightly over one step to stay clear of float rounding
        assert_eq!(driver.advance(&mut state, &keys, SIM_DT * 1.01), 1);
        assert_eq!(state.time_ticks, 1);
    }

    #[test]
    fn test_refresh_rate_independent() {
        let keys = KeyState::new();

        let mut slow = GameState::new(1, Settings::default());
        let mut slow_driver = FrameDriver::new();
        for _ in 0..300 {
            slow_driver.advance(&mut slow, &keys, 1.0 / 30.0);
        }

        let mut fast = GameState::new(1, Settings::default());
        let mut fast_driver = FrameDriver::new();
        for _ in 0..1440 {
            fast_driver.advance(&mut fast, &keys, 1.0 / 144.0);
        }

        // Ten seconds either way, within a tick of rounding
        let diff = slow.time_ticks.abs_diff(fast.time_ticks);
        assert!(diff <= 1, "slow {} vs fast {}", slow.time_ticks, fast.time_ticks);
        assert!((599..=601).contains(&slow.time_ticks));
    }

    #[test]
    fn test_long_frame_is_capped() {
        let mut state = GameState::new(1, Settings::default());
        let mut driver = FrameDriver::new();
        let ran = driver.advance(&mut state, &KeyState::new(), 5.0);
        assert!(ran <= MAX_SUBSTEPS);
        assert!(driver.alpha() < (MAX_FRAME_DT / SIM_DT));
    }

    #[test]
    fn test_non_finite_frame_is_ignored() {
        let mut state = GameState::new(1, Settings::default());
        let mut driver = FrameDriver::new();
        let keys = KeyState::new();
        assert_eq!(driver.advance(&mut state, &keys, f32::NAN), 0);
        assert_eq!(driver.advance(&mut state, &keys, f32::INFINITY), 0);

        let mut ran = 0;
        for _ in 0..60 {
            ran += driver.advance(&mut state, &keys, 1.0 / 60.0);
        }
        assert!((59..=61).contains(&ran), "ran {ran}");
        assert!(driver.alpha().is_finite());
    }
}
