//! Background music collaborator
//!
//! The simulation only emits `GameEvent::MusicStart`; the host supplies a
//! `MusicOutput` that actually plays sound. Hosts may refuse to start audio
//! before the user has interacted with the page, in which case the start is
//! deferred to the next interaction instead of failing.

use thiserror::Error;

use crate::sim::GameEvent;

/// Why playback could not start
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AudioError {
    /// Host blocked autoplay until a user gesture
    #[error("Autoplay blocked by host")]
    Blocked,
    /// No audio device or context
    #[error("Audio unavailable: {0}")]
    Unavailable(String),
}

/// Host audio backend
pub trait MusicOutput {
    fn set_volume(&mut self, volume: f32);
    fn play(&mut self) -> Result<(), AudioError>;
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MusicState {
    Idle,
    /// Waiting for a user interaction to retry
    Deferred,
    Playing,
    /// Gave up (no audio device)
    Disabled,
}

/// Starts the background track on round one
pub struct BackgroundMusic<O: MusicOutput> {
    output: O,
    volume: f32,
    state: MusicState,
}

impl<O: MusicOutput> BackgroundMusic<O> {
    pub fn new(output: O, volume: f32) -> Self {
        Self {
            output,
            volume,
            state: MusicState::Idle,
        }
    }

    pub fn state(&self) -> MusicState {
        self.state
    }

    pub fn output(&self) -> &O {
        &self.output
    }

    /// React to simulation events
    pub fn handle_events<'a>(&mut self, events: impl IntoIterator<Item = &'a GameEvent>) {
        for event in events {
            if *event == GameEvent::MusicStart && self.state == MusicState::Idle {
                self.output.set_volume(self.volume);
                self.try_play();
            }
        }
    }

    /// Retry a blocked start after a click or key press
    pub fn on_user_interaction(&mut self) {
        if self.state == MusicState::Deferred {
            self.try_play();
        }
    }

    fn try_play(&mut self) {
        self.state = match self.output.play() {
            Ok(()) => MusicState::Playing,
            Err(AudioError::Blocked) => {
                log::warn!("Autoplay was prevented, music starts on next interaction");
                MusicState::Deferred
            }
            Err(e) => {
                log::warn!("{e} - music disabled");
                MusicState::Disabled
            }
        };
    }
}

/// Output that plays nothing (headless runs)
#[derive(Debug, Default)]
pub struct SilentOutput;

impl MusicOutput for SilentOutput {
    fn set_volume(&mut self, _volume: f32) {}

    fn play(&mut self) -> Result<(), AudioError> {
        Ok(())
    }
}
