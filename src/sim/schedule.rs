//! Scheduled-event queue
//!
//! Every timed transition (announcement delays, the round countdown, item
//! spawns, buff expiry, throw cooldown) is a single-fire entry here. Entries
//! carry the epoch they were scheduled in; the dispatcher drops any entry
//! whose epoch is no longer current, so timers from a finished round can
//! never touch the next one.

use serde::{Deserialize, Serialize};

use super::state::PlayerId;

/// Buffs that revert on a timer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimedBuff {
    SpeedBoost,
    JumpBoost,
    HeavyGravity,
}

/// What happens when an entry comes due
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimerEvent {
    /// Intro or round result finished: announce the next round
    ShowIntermission,
    /// Round announcement finished: set up players and roles
    StartRound,
    /// Role announcement finished: the round goes live
    BeginPlay,
    /// One second of round time elapsed
    RoundSecond,
    /// Periodic item spawn
    SpawnItem,
    /// Throw cooldown elapsed
    ReopenThrowGate,
    /// A timed buff may have run out
    BuffExpired { player: PlayerId, buff: TimedBuff },
    /// Result display finished and someone has enough rounds
    EndGame { winner: PlayerId },
}

/// A queued timer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Scheduled {
    pub due_tick: u64,
    /// Insertion order, breaks ties between entries due on the same tick
    pub seq: u64,
    pub epoch: u32,
    pub event: TimerEvent,
}

/// Pending timers, fired in (due_tick, seq) order
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Schedule {
    entries: Vec<Scheduled>,
    next_seq: u64,
}

impl Schedule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `event` to fire `delay_ticks` after `now`
    pub fn push(&mut self, now: u64, delay_ticks: u64, epoch: u32, event: TimerEvent) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.entries.push(Scheduled {
            due_tick: now + delay_ticks,
            seq,
            epoch,
            event,
        });
    }

    /// Remove and return the earliest entry due at or before `now`
    pub fn pop_due(&mut self, now: u64) -> Option<Scheduled> {
        let idx = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.due_tick <= now)
            .min_by_key(|(_, e)| (e.due_tick, e.seq))
            .map(|(i, _)| i)?;
        Some(self.entries.swap_remove(idx))
    }

    /// Drop entries scheduled in any epoch other than `epoch`
    pub fn prune_stale(&mut self, epoch: u32) {
        self.entries.retain(|e| e.epoch == epoch);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Scheduled> {
        self.entries.iter()
    }
}
